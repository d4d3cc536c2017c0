use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::openai::DEFAULT_MODEL;
use gait::llm::{CompletionRequest, LlmClient, OpenAiClient, OpenAiConfig};
use gait::logging;

const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// osum: OpenAI Summarization
#[derive(Parser, Debug)]
#[command(name = "osum", version, about = "osum: text summarization via OpenAI")]
struct Args {
    /// The text to summarize
    text: Option<String>,

    /// Model to use (default: gpt-4o-mini)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of tokens in the summary
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Temperature for sampling
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Read text from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write output to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("osum");
    let args = Args::parse();
    let config = Config::load();

    let text = input::read_text(args.text.as_deref(), args.file.as_deref())?;

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let request = CompletionRequest::new("You are a helpful assistant that summarizes text.")
        .with_user_message(format!("Please summarize the following text:\n\n{text}"))
        .with_max_tokens(args.max_tokens)
        .with_temperature(args.temperature)
        .with_model(&model);

    let response = client.complete(request).await?;

    let rendered = if args.json {
        serde_json::to_string_pretty(&json!({
            "summary": response.content,
            "model": response.model,
            "usage": response.usage
        }))?
    } else {
        [
            "Summary:".to_string(),
            response.content.clone(),
            String::new(),
            format!("Model: {}", response.model),
            format!("Usage: {}", response.usage),
        ]
        .join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
