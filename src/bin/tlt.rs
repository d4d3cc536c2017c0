use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::openai::DEFAULT_MODEL;
use gait::llm::{CompletionRequest, LlmClient, OpenAiClient, OpenAiConfig};
use gait::logging;

// Lower temperature for more deterministic translations
const TEMPERATURE: f32 = 0.3;

/// Target languages tlt can translate to
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Language {
    Arabic,
    Bengali,
    Chinese,
    Dutch,
    English,
    French,
    German,
    Hindi,
    Indonesian,
    Italian,
    Japanese,
    Korean,
    Portuguese,
    Russian,
    Spanish,
    Swahili,
    Swedish,
    Tamil,
    Turkish,
    Urdu,
}

impl Language {
    fn title(self) -> &'static str {
        match self {
            Language::Arabic => "Arabic",
            Language::Bengali => "Bengali",
            Language::Chinese => "Chinese",
            Language::Dutch => "Dutch",
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Hindi => "Hindi",
            Language::Indonesian => "Indonesian",
            Language::Italian => "Italian",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Spanish => "Spanish",
            Language::Swahili => "Swahili",
            Language::Swedish => "Swedish",
            Language::Tamil => "Tamil",
            Language::Turkish => "Turkish",
            Language::Urdu => "Urdu",
        }
    }
}

/// tlt: Translate Language Tokens
#[derive(Parser, Debug)]
#[command(name = "tlt", version, about = "tlt: text translation via OpenAI")]
struct Args {
    /// The text to translate
    text: Option<String>,

    /// Target language
    #[arg(short, long, value_enum)]
    language: Language,

    /// Model to use (default: gpt-4o-mini)
    #[arg(short, long)]
    model: Option<String>,

    /// Read text from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write output to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    json: bool,

    /// Include the source text in the output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("tlt");
    let args = Args::parse();
    let config = Config::load();

    let text = input::read_text(args.text.as_deref(), args.file.as_deref())?;

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let target = args.language.title();
    let request = CompletionRequest::new("You are a helpful assistant that translates text accurately.")
        .with_user_message(format!("Translate the following text to {target}:\n\n{text}"))
        .with_temperature(TEMPERATURE)
        .with_model(&model);

    let response = client.complete(request).await?;

    let rendered = if args.json {
        let mut obj = json!({
            "translation": response.content,
            "target_language": target,
            "model": response.model,
            "usage": response.usage
        });
        if args.verbose {
            obj["source_text"] = json!(text);
        }
        serde_json::to_string_pretty(&obj)?
    } else {
        let mut lines = vec![
            format!("Translation to {target}:"),
            response.content.clone(),
            String::new(),
            format!("Model: {}", response.model),
            format!("Usage: {}", response.usage),
        ];
        if args.verbose {
            lines.insert(0, format!("Source text: {text}\n"));
        }
        lines.join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
