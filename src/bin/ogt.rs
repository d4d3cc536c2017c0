use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::openai::DEFAULT_MODEL;
use gait::llm::{CompletionRequest, LlmClient, OpenAiClient, OpenAiConfig, stream_to_stdout};
use gait::logging;

const DEFAULT_MAX_TOKENS: u32 = 150;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// ogt: OpenAI Generate Tokens
#[derive(Parser, Debug)]
#[command(name = "ogt", version, about = "ogt: one-shot OpenAI completion")]
struct Args {
    /// The prompt to send to the model
    prompt: Option<String>,

    /// Model to use (default: gpt-4o-mini)
    #[arg(short, long)]
    model: Option<String>,

    /// Maximum number of tokens in the response
    #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Sampling temperature
    #[arg(short = 'T', long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: f32,

    /// Stream the output token by token
    #[arg(short, long)]
    stream: bool,

    /// Read the prompt from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write the response to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Diagnostics on stderr (model, token limits, response length)
    #[arg(short, long)]
    verbose: bool,

    /// Set a custom system message
    #[arg(short = 'S', long)]
    system: Option<String>,

    /// Output the response in JSON format
    #[arg(short, long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("ogt");
    let args = Args::parse();
    let config = Config::load();

    let prompt = input::read_text(args.prompt.as_deref(), args.file.as_deref())?;
    let prompt = prompt.trim().to_string();

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let request = CompletionRequest::new(args.system.clone().unwrap_or_default())
        .with_user_message(&prompt)
        .with_max_tokens(args.max_tokens)
        .with_temperature(args.temperature)
        .with_model(&model);

    let response = if args.stream {
        let response = stream_to_stdout(&client, request).await?;
        println!();
        response
    } else {
        client.complete(request).await?
    };

    if let Some(path) = &args.output {
        std::fs::write(path, &response.content)?;
    }

    if args.verbose {
        eprintln!("Model: {model}");
        eprintln!("Max tokens: {}", args.max_tokens);
        eprintln!("Temperature: {}", args.temperature);
        eprintln!("Response length: {} characters", response.content.len());
    }

    if args.json {
        println!("{}", json!({ "response": response.content }));
    } else if !args.stream && args.output.is_none() {
        println!("{}", response.content);
    }

    Ok(())
}
