use std::time::Duration;

use clap::Parser;
use eyre::Result;

use gait::agent::{ToolRunner, save_code_tool, shell_tool};
use gait::chat::editor::resolve_editor;
use gait::chat::{ChatSession, ConversationStore, SessionOptions};
use gait::config::Config;
use gait::llm::{OpenAiClient, OpenAiConfig};
use gait::logging;

const MODELS: &[&str] = &["gpt-4o-mini", "gpt-4o", "gpt-4-turbo"];

/// oia: OpenAI Interactive Agent
#[derive(Parser, Debug)]
#[command(name = "oia", version, about = "oia: OpenAI agent with shell and code tools")]
struct Args {
    /// Start with this model instead of the default
    #[arg(short, long)]
    model: Option<String>,
}

fn system_prompt(scripts_dir: &std::path::Path) -> String {
    format!(
        "You are an AI assistant in a terminal. You have access to the following tools:\n\
         - execute_shell_command: Execute shell commands.\n\
         - save_and_run_code: Save code to a file and optionally execute it.\n\
         \n\
         Be aware of the current working directory and the files you create in {}.",
        scripts_dir.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("oia");
    let args = Args::parse();
    let config = Config::load();

    let mut models: Vec<String> = MODELS.iter().map(|m| m.to_string()).collect();
    if let Some(model) = args.model.or(config.openai_model.clone()) {
        models.retain(|m| m != &model);
        models.insert(0, model);
    }

    let client = OpenAiClient::new(OpenAiConfig::with_model(models[0].clone()))?;

    let mut options = SessionOptions::new(system_prompt(&config.agent.scripts_dir), models);
    options.label = "Assistant".to_string();
    options.welcome =
        "Welcome to the Improved OpenAI Chat with Function Calling! Type /help for available commands."
            .to_string();
    options.farewell = "Goodbye!".to_string();
    options.tools = vec![shell_tool(), save_code_tool()];
    options.max_tool_calls = config.agent.max_tool_calls;
    options.runner = ToolRunner {
        timeout: Duration::from_millis(config.agent.command_timeout_ms),
        scripts_dir: config.agent.scripts_dir.clone(),
    };
    options.editor = resolve_editor(config.editor.as_deref());
    options.resume_history = true;

    let store = ConversationStore::new(
        config
            .history_dir
            .clone()
            .unwrap_or_else(ConversationStore::default_dir),
    );

    ChatSession::new(client, options, store).run().await?;
    Ok(())
}
