//! Generic interactive chat session over any LlmClient.
//!
//! Drives the prompt loop, slash commands, model cycling, tool execution,
//! optional streaming display, and transcript persistence. The four
//! interactive binaries differ only in the client, system prompt, tool set,
//! and banner text they configure here.

use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::agent::{self, ToolRunner};
use crate::chat::commands::{self, SlashCommand};
use crate::chat::editor;
use crate::chat::history::ConversationStore;
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient, Message, ToolDefinition, stream_to_stdout};

/// Per-tool configuration of a chat session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub system: String,
    /// Models the /model command cycles through; the first is the default
    pub models: Vec<String>,
    /// Display name for the assistant ("Claude", "Assistant", ...)
    pub label: String,
    pub welcome: String,
    pub farewell: String,
    pub tools: Vec<ToolDefinition>,
    pub max_tool_calls: usize,
    pub runner: ToolRunner,
    pub editor: String,
    /// Stream responses token by token instead of printing them whole
    pub stream: bool,
    /// Start from the rolling history file instead of an empty conversation
    pub resume_history: bool,
    /// Treat a bare "exit" as /quit
    pub plain_exit: bool,
    /// Save a timestamped transcript after every exchange
    pub autosave: bool,
}

impl SessionOptions {
    pub fn new(system: impl Into<String>, models: Vec<String>) -> Self {
        Self {
            system: system.into(),
            models,
            label: "Assistant".to_string(),
            welcome: "Welcome to gait chat. Type /help for commands.".to_string(),
            farewell: "Goodbye.".to_string(),
            tools: Vec::new(),
            max_tool_calls: agent::MAX_TOOL_CALLS,
            runner: ToolRunner::default(),
            editor: editor::resolve_editor(None),
            stream: false,
            resume_history: false,
            plain_exit: false,
            autosave: false,
        }
    }
}

/// An interactive conversation bound to one client
pub struct ChatSession<C> {
    client: C,
    options: SessionOptions,
    store: ConversationStore,
    messages: Vec<Message>,
    current_model: usize,
}

impl<C: LlmClient> ChatSession<C> {
    pub fn new(client: C, options: SessionOptions, store: ConversationStore) -> Self {
        let messages = if options.resume_history {
            store.load_history()
        } else {
            Vec::new()
        };
        Self {
            client,
            options,
            store,
            messages,
            current_model: 0,
        }
    }

    /// Model used for the next request
    pub fn current_model(&self) -> &str {
        self.options
            .models
            .get(self.current_model)
            .map(String::as_str)
            .unwrap_or_else(|| self.client.model())
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn cycle_model(&mut self) {
        if self.options.models.len() > 1 {
            self.current_model = (self.current_model + 1) % self.options.models.len();
        }
        println!(
            "{} {}",
            "Switched to model:".green().bold(),
            self.current_model()
        );
    }

    fn separator() {
        println!("{}", "─".repeat(60).dimmed());
    }

    /// Run the REPL until /quit or end of input
    pub async fn run(&mut self) -> Result<()> {
        println!("{}", self.options.welcome.cyan().bold());
        Self::separator();

        let stdin = io::stdin();
        loop {
            print!("{} ", "You (type /help for commands):".green().bold());
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            if !self.handle_input(input).await? {
                break;
            }
            Self::separator();
        }

        println!("{}", self.options.farewell.cyan().bold());
        self.store.save_history(&self.messages)?;
        Ok(())
    }

    /// Handle one line of input; returns false when the session should end
    pub async fn handle_input(&mut self, input: &str) -> Result<bool> {
        if self.options.plain_exit && input.eq_ignore_ascii_case("exit") {
            return Ok(false);
        }

        if let Some(command) = commands::parse(input) {
            return self.handle_command(command).await;
        }

        match self.send(input.to_string()).await {
            Ok(()) => {
                if self.options.autosave
                    && let Err(e) = self.store.save(&self.messages)
                {
                    log::warn!("Failed to autosave conversation: {e}");
                }
            }
            Err(e) => println!("{} {}", "Error:".red().bold(), e),
        }
        Ok(true)
    }

    async fn handle_command(&mut self, command: SlashCommand) -> Result<bool> {
        match command {
            SlashCommand::Help => println!("{}", commands::help_text()),
            SlashCommand::Model => self.cycle_model(),
            SlashCommand::Edit => match editor::compose(&self.options.editor) {
                Ok(text) if !text.is_empty() => {
                    println!("{} {}", "You:".green().bold(), text);
                    if let Err(e) = self.send(text).await {
                        println!("{} {}", "Error:".red().bold(), e);
                    }
                }
                Ok(_) => {}
                Err(e) => println!("{} {}", "Error:".red().bold(), e),
            },
            SlashCommand::Clear => {
                self.messages.clear();
                println!("{}", "Conversation cleared.".green().bold());
            }
            SlashCommand::Save => match self.store.save(&self.messages) {
                Ok(path) => println!(
                    "{} {}",
                    "Conversation saved as".green().bold(),
                    path.display()
                ),
                Err(e) => println!("{} {}", "Error:".red().bold(), e),
            },
            SlashCommand::Load(filename) => match self.store.load(&filename) {
                Ok(messages) => {
                    self.messages = messages;
                    println!("{} {}", "Loaded conversation from".green().bold(), filename);
                }
                Err(e) => println!("{} {}", "Error:".red().bold(), e),
            },
            SlashCommand::List => {
                let names = self.store.list();
                if names.is_empty() {
                    println!("{}", "No saved conversations found.".yellow());
                } else {
                    println!("{}", "Saved conversations:".cyan().bold());
                    for name in names {
                        println!("- {name}");
                    }
                }
            }
            SlashCommand::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Send one user message and display the response
    async fn send(&mut self, content: String) -> Result<()> {
        let model = self.current_model().to_string();

        if self.options.stream {
            self.messages.push(Message::user(content));
            let request = CompletionRequest::new(&self.options.system)
                .with_messages(self.messages.clone())
                .with_model(&model);

            print!("{} ", format!("{}:", self.options.label).blue().bold());
            io::stdout().flush()?;

            let result = stream_to_stdout(&self.client, request).await;
            println!();

            let response = result?;
            self.messages.push(Message::assistant(response.content));
        } else {
            self.messages.push(Message::user(content));
            let text = agent::run_turn(
                &self.client,
                &self.options.system,
                &mut self.messages,
                &self.options.tools,
                Some(model.as_str()),
                &self.options.runner,
                self.options.max_tool_calls,
                |call, result| {
                    println!(
                        "{} {} {}",
                        "Executed".yellow().bold(),
                        call.name,
                        call.input.to_string().yellow()
                    );
                    println!("{}", result.content.trim().dimmed());
                },
            )
            .await?;

            println!(
                "{} {}",
                format!("{}:", self.options.label).blue().bold(),
                text
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MockLlmClient};
    use tempfile::TempDir;

    fn test_session(dir: &TempDir) -> ChatSession<MockLlmClient> {
        let options = SessionOptions::new(
            "You are a test assistant",
            vec!["model-a".to_string(), "model-b".to_string()],
        );
        ChatSession::new(
            MockLlmClient::new(),
            options,
            ConversationStore::new(dir.path()),
        )
    }

    #[test]
    fn test_current_model_defaults_to_first() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);
        assert_eq!(session.current_model(), "model-a");
    }

    #[test]
    fn test_cycle_model_wraps() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.cycle_model();
        assert_eq!(session.current_model(), "model-b");
        session.cycle_model();
        assert_eq!(session.current_model(), "model-a");
    }

    #[test]
    fn test_current_model_falls_back_to_client() {
        let dir = TempDir::new().unwrap();
        let options = SessionOptions::new("sys", Vec::new());
        let session = ChatSession::new(
            MockLlmClient::new(),
            options,
            ConversationStore::new(dir.path()),
        );
        assert_eq!(session.current_model(), "mock-model");
    }

    #[tokio::test]
    async fn test_send_appends_messages() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.client.push_response(CompletionResponse {
            content: "answer".to_string(),
            ..Default::default()
        });

        assert!(session.handle_input("a question").await.unwrap());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].text(), Some("answer"));
    }

    #[tokio::test]
    async fn test_send_uses_selected_model() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.cycle_model();
        session.handle_input("hi").await.unwrap();

        let requests = session.client.requests();
        assert_eq!(requests[0].model.as_deref(), Some("model-b"));
        assert_eq!(requests[0].system, "You are a test assistant");
    }

    #[tokio::test]
    async fn test_streaming_send_appends_messages() {
        let dir = TempDir::new().unwrap();
        let mut options = SessionOptions::new("sys", vec!["model-a".to_string()]);
        options.stream = true;
        let mut session = ChatSession::new(
            MockLlmClient::new(),
            options,
            ConversationStore::new(dir.path()),
        );
        session.client.push_response(CompletionResponse {
            content: "streamed answer".to_string(),
            ..Default::default()
        });

        session.handle_input("question").await.unwrap();
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].text(), Some("streamed answer"));
    }

    #[tokio::test]
    async fn test_quit_command_ends_session() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        assert!(!session.handle_input("/quit").await.unwrap());
        assert!(!session.handle_input("/exit").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_command() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.handle_input("hello").await.unwrap();
        assert!(!session.messages().is_empty());

        session.handle_input("/clear").await.unwrap();
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_via_commands() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        session.handle_input("remember this").await.unwrap();
        session.handle_input("/save").await.unwrap();

        let names = session.store.list();
        assert_eq!(names.len(), 1);

        session.handle_input("/clear").await.unwrap();
        let load = format!("/load {}", names[0]);
        session.handle_input(&load).await.unwrap();
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_resume_history() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());
        store
            .save_history(&[Message::user("old"), Message::assistant("context")])
            .unwrap();

        let mut options = SessionOptions::new("sys", vec!["m".to_string()]);
        options.resume_history = true;
        let session = ChatSession::new(MockLlmClient::new(), options, store);
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_exit_option() {
        let dir = TempDir::new().unwrap();
        let mut options = SessionOptions::new("sys", vec!["m".to_string()]);
        options.plain_exit = true;
        let mut session = ChatSession::new(
            MockLlmClient::new(),
            options,
            ConversationStore::new(dir.path()),
        );
        assert!(!session.handle_input("exit").await.unwrap());
        assert!(!session.handle_input("EXIT").await.unwrap());
    }

    #[tokio::test]
    async fn test_exit_is_a_message_without_plain_exit() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        assert!(session.handle_input("exit").await.unwrap());
        assert_eq!(session.messages().len(), 2);
    }

    #[tokio::test]
    async fn test_autosave_writes_transcript() {
        let dir = TempDir::new().unwrap();
        let mut options = SessionOptions::new("sys", vec!["m".to_string()]);
        options.autosave = true;
        let mut session = ChatSession::new(
            MockLlmClient::new(),
            options,
            ConversationStore::new(dir.path()),
        );
        session.handle_input("hello").await.unwrap();
        assert_eq!(session.store.list().len(), 1);
    }

    #[tokio::test]
    async fn test_load_missing_file_keeps_session_alive() {
        let dir = TempDir::new().unwrap();
        let mut session = test_session(&dir);
        assert!(session.handle_input("/load nope.json").await.unwrap());
        assert!(session.messages().is_empty());
    }
}
