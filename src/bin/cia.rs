use clap::Parser;
use eyre::Result;

use gait::chat::{ChatSession, ConversationStore, SessionOptions};
use gait::config::Config;
use gait::llm::{AnthropicClient, AnthropicConfig};
use gait::logging;

const DEFAULT_MODEL: &str = "claude-3-opus-20240229";

/// cia: Claude Interactive Agent
#[derive(Parser, Debug)]
#[command(name = "cia", version, about = "cia: Claude interactive agent with streaming")]
struct Args {
    /// Model to use (default: claude-3-opus-20240229)
    #[arg(short, long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("cia");
    let args = Args::parse();
    let config = Config::load();

    let model = args
        .model
        .or(config.anthropic_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let client = AnthropicClient::new(AnthropicConfig {
        model: model.clone(),
        max_tokens: 4096,
        ..Default::default()
    })?;

    let mut options = SessionOptions::new("", vec![model]);
    options.label = "Claude".to_string();
    options.welcome =
        "Welcome to Claude Interactive Agent (CIA)! Type 'exit' or press Ctrl+C to quit.".to_string();
    options.farewell = "Exiting gracefully...".to_string();
    options.stream = true;
    options.plain_exit = true;
    options.resume_history = true;
    options.autosave = true;

    let store = ConversationStore::new(
        config
            .history_dir
            .clone()
            .unwrap_or_else(ConversationStore::default_dir),
    );

    ChatSession::new(client, options, store).run().await?;
    Ok(())
}
