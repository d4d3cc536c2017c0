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

/// Languages cgen can target
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Language {
    Python,
    Javascript,
    Java,
    C,
    Cpp,
    Csharp,
    Go,
    Rust,
    Swift,
    Kotlin,
    Ruby,
    Php,
    Typescript,
    Scala,
    Haskell,
}

impl Language {
    fn title(self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::Javascript => "JavaScript",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::Csharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Swift => "Swift",
            Language::Kotlin => "Kotlin",
            Language::Ruby => "Ruby",
            Language::Php => "PHP",
            Language::Typescript => "TypeScript",
            Language::Scala => "Scala",
            Language::Haskell => "Haskell",
        }
    }
}

/// cgen: Code Creation Tool
#[derive(Parser, Debug)]
#[command(name = "cgen", version, about = "cgen: code generation via OpenAI")]
struct Args {
    /// Description of the code to create
    description: Vec<String>,

    /// Target language for the generated code
    #[arg(short, long, value_enum)]
    language: Option<Language>,

    /// Model to use (default: gpt-4o)
    #[arg(short, long)]
    model: Option<String>,

    /// Read the description from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write output to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    json: bool,

    /// Include the description in the output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("cgen");
    let args = Args::parse();
    let config = Config::load();

    let positional = if args.description.is_empty() {
        None
    } else {
        Some(args.description.join(" "))
    };
    let description = input::read_text(positional.as_deref(), args.file.as_deref())?;
    let description = description.trim().to_string();

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let mut prompt = format!("Create code for the following description:\n\n{description}");
    if let Some(language) = args.language {
        prompt.push_str(&format!("\n\nPlease write the code in {}.", language.title()));
    }

    let request = CompletionRequest::new(
        "You are an expert programmer capable of creating code based on descriptions.",
    )
    .with_user_message(prompt)
    .with_temperature(TEMPERATURE)
    .with_model(&model);

    let response = client.complete(request).await?;
    let language = args.language.map(Language::title).unwrap_or("unspecified");

    let rendered = if args.json {
        let mut obj = json!({
            "code": response.content,
            "language": language,
            "model": response.model,
            "usage": response.usage
        });
        if args.verbose {
            obj["description"] = json!(description);
        }
        serde_json::to_string_pretty(&obj)?
    } else {
        let mut lines = vec![
            response.content.clone(),
            String::new(),
            format!("Language: {language}"),
            format!("Model: {}", response.model),
            format!("Usage: {}", response.usage),
        ];
        if args.verbose {
            lines.insert(0, format!("Description: {description}\n"));
        }
        lines.join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
