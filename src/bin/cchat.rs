use clap::Parser;
use eyre::Result;

use gait::chat::{ChatSession, ConversationStore, SessionOptions};
use gait::chat::editor::resolve_editor;
use gait::config::Config;
use gait::llm::{AnthropicClient, AnthropicConfig};
use gait::logging;

const MODELS: &[&str] = &[
    "claude-3-5-sonnet-20240620",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

const SYSTEM_PROMPT: &str = "You are Claude, chatting in a terminal. Keep responses concise \
and formatted as plain text suitable for a terminal window.";

/// cchat: Advanced Claude Chat
#[derive(Parser, Debug)]
#[command(name = "cchat", version, about = "cchat: interactive Claude chat")]
struct Args {
    /// Start with this model instead of the default
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("cchat");
    let args = Args::parse();
    let config = Config::load();

    let mut models: Vec<String> = MODELS.iter().map(|m| m.to_string()).collect();
    if let Some(model) = args.model.or(config.anthropic_model.clone()) {
        models.retain(|m| m != &model);
        models.insert(0, model);
    }

    let client = AnthropicClient::new(AnthropicConfig {
        model: models[0].clone(),
        max_tokens: 1000,
        ..Default::default()
    })?;

    let mut options = SessionOptions::new(SYSTEM_PROMPT, models);
    options.label = "Claude".to_string();
    options.welcome = "Welcome to Advanced Claude Chat! Type /help for available commands.".to_string();
    options.farewell = "Thank you for using Advanced Claude Chat!".to_string();
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
