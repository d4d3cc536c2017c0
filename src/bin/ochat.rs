use std::time::Duration;

use clap::Parser;
use eyre::Result;

use gait::agent::{ToolRunner, shell_tool};
use gait::chat::editor::resolve_editor;
use gait::chat::{ChatSession, ConversationStore, SessionOptions};
use gait::config::Config;
use gait::llm::{OpenAiClient, OpenAiConfig};
use gait::logging;

const MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini"];

const SYSTEM_PROMPT: &str = "You are a fun and quirky AI assistant in a terminal. \
You have access to the execute_shell_command tool; use it whenever running a command \
would help answer the user. Be aware of the current working directory and the files \
you create. Be entertaining, use wordplay, and stay accurate.";

/// ochat: interactive OpenAI chat with shell tool calling
#[derive(Parser, Debug)]
#[command(name = "ochat", version, about = "ochat: interactive OpenAI chat with tools")]
struct Args {
    /// Start with this model instead of the default
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("ochat");
    let args = Args::parse();
    let config = Config::load();

    let mut models: Vec<String> = MODELS.iter().map(|m| m.to_string()).collect();
    if let Some(model) = args.model.or(config.openai_model.clone()) {
        models.retain(|m| m != &model);
        models.insert(0, model);
    }

    let client = OpenAiClient::new(OpenAiConfig::with_model(models[0].clone()))?;

    let mut options = SessionOptions::new(SYSTEM_PROMPT, models);
    options.label = "Assistant".to_string();
    options.welcome =
        "Welcome to the Fun OpenAI Chat! Where AI meets witty banter! Type /help for commands."
            .to_string();
    options.farewell =
        "Thanks for chatting! May your code be bug-free and your puns be groan-worthy!".to_string();
    options.tools = vec![shell_tool()];
    options.max_tool_calls = config.agent.max_tool_calls;
    options.runner = ToolRunner {
        timeout: Duration::from_millis(config.agent.command_timeout_ms),
        scripts_dir: config.agent.scripts_dir.clone(),
    };
    options.editor = resolve_editor(config.editor.as_deref());

    let store = ConversationStore::new(
        config
            .history_dir
            .clone()
            .unwrap_or_else(ConversationStore::default_dir),
    );

    ChatSession::new(client, options, store).run().await?;
    Ok(())
}
