use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::{CompletionRequest, LlmClient, OpenAiClient, OpenAiConfig};
use gait::logging;

const DEFAULT_MODEL: &str = "gpt-4o";
const TEMPERATURE: f32 = 0.2;

/// Kinds of analysis agt can perform
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Analysis {
    Sentiment,
    Emotion,
    Subjectivity,
    Sarcasm,
    Stance,
    Intent,
    Topic,
    Keywords,
    Entities,
    Summary,
}

impl Analysis {
    fn name(self) -> &'static str {
        match self {
            Analysis::Sentiment => "sentiment",
            Analysis::Emotion => "emotion",
            Analysis::Subjectivity => "subjectivity",
            Analysis::Sarcasm => "sarcasm",
            Analysis::Stance => "stance",
            Analysis::Intent => "intent",
            Analysis::Topic => "topic",
            Analysis::Keywords => "keywords",
            Analysis::Entities => "entities",
            Analysis::Summary => "summary",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Analysis::Sentiment => "Sentiment",
            Analysis::Emotion => "Emotion",
            Analysis::Subjectivity => "Subjectivity",
            Analysis::Sarcasm => "Sarcasm",
            Analysis::Stance => "Stance",
            Analysis::Intent => "Intent",
            Analysis::Topic => "Topic",
            Analysis::Keywords => "Keywords",
            Analysis::Entities => "Entities",
            Analysis::Summary => "Summary",
        }
    }
}

/// agt: Sentiment Analysis Tool
#[derive(Parser, Debug)]
#[command(name = "agt", version, about = "agt: text analysis via OpenAI")]
struct Args {
    /// Text to analyze
    text: Vec<String>,

    /// Analysis to perform
    #[arg(short, long, value_enum)]
    analysis: Analysis,

    /// Model to use (default: gpt-4o)
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

    /// Include the original text in the output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("agt");
    let args = Args::parse();
    let config = Config::load();

    let positional = if args.text.is_empty() {
        None
    } else {
        Some(args.text.join(" "))
    };
    let text = input::read_text(positional.as_deref(), args.file.as_deref())?;
    let text = text.trim().to_string();

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let kind = args.analysis.name();
    let request = CompletionRequest::new(format!(
        "You are an expert in {kind} analysis. Provide a concise, accurate {kind} analysis of the given text."
    ))
    .with_user_message(format!("Analyze the following text:\n\n{text}"))
    .with_temperature(TEMPERATURE)
    .with_model(&model);

    let response = client.complete(request).await?;

    let rendered = if args.json {
        let mut obj = json!({
            "analysis": response.content,
            "analysis_type": kind,
            "model": response.model,
            "usage": response.usage
        });
        if args.verbose {
            obj["original_text"] = json!(text);
        }
        serde_json::to_string_pretty(&obj)?
    } else {
        let mut lines = vec![
            format!("{} Analysis:", args.analysis.title()),
            response.content.clone(),
            String::new(),
            format!("Model: {}", response.model),
            format!("Usage: {}", response.usage),
        ];
        if args.verbose {
            lines.insert(0, format!("Original text: {text}\n"));
        }
        lines.join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
