use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::{CompletionRequest, LlmClient, Message, OpenAiClient, OpenAiConfig};
use gait::logging;

const DEFAULT_MODEL: &str = "gpt-4o";
const TEMPERATURE: f32 = 0.2;

/// Transpilation targets
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
    fn name(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Csharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Typescript => "typescript",
            Language::Scala => "scala",
            Language::Haskell => "haskell",
        }
    }
}

/// cct: Code Completion Tokens
#[derive(Parser, Debug)]
#[command(name = "cct", version, about = "cct: code operations via OpenAI")]
struct Args {
    /// Model to use (default: gpt-4o)
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Read code from a file
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Write output to a file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Include the source code in the output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Complete the given code
    Complete { code: Option<String> },

    /// Explain the given code
    Explain { code: Option<String> },

    /// Analyze the given code and suggest improvements
    Analyze { code: Option<String> },

    /// Refactor the given code
    Refactor { code: Option<String> },

    /// Add comments to the given code
    Comment { code: Option<String> },

    /// Transpile the given code to another language
    Transpile {
        code: Option<String>,

        /// Target language for transpilation
        #[arg(long, value_enum)]
        to: Language,
    },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Complete { .. } => "complete",
            Command::Explain { .. } => "explain",
            Command::Analyze { .. } => "analyze",
            Command::Refactor { .. } => "refactor",
            Command::Comment { .. } => "comment",
            Command::Transpile { .. } => "transpile",
        }
    }

    fn code(&self) -> Option<&str> {
        match self {
            Command::Complete { code }
            | Command::Explain { code }
            | Command::Analyze { code }
            | Command::Refactor { code }
            | Command::Comment { code }
            | Command::Transpile { code, .. } => code.as_deref(),
        }
    }

    fn instruction(&self) -> String {
        match self {
            Command::Complete { .. } => "Please complete this code.".to_string(),
            Command::Explain { .. } => "Please explain this code in detail.".to_string(),
            Command::Analyze { .. } => {
                "Please analyze this code and suggest improvements.".to_string()
            }
            Command::Refactor { .. } => {
                "Please refactor this code to improve its structure and efficiency.".to_string()
            }
            Command::Comment { .. } => "Please add detailed comments to this code.".to_string(),
            Command::Transpile { to, .. } => {
                format!("Please transpile this code to {}.", to.name())
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("cct");
    let args = Args::parse();
    let config = Config::load();

    let code = input::read_text(args.command.code(), args.file.as_deref())?;

    let model = args
        .model
        .clone()
        .or(config.openai_model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::with_model(&model))?;

    let request = CompletionRequest::new("You are a helpful assistant that works with code.")
        .with_user_message(format!("Here's the code:\n\n{code}\n\n"))
        .with_message(Message::user(args.command.instruction()))
        .with_temperature(TEMPERATURE)
        .with_model(&model);

    let response = client.complete(request).await?;

    let rendered = if args.json {
        let mut obj = json!({
            "result": response.content,
            "command": args.command.name(),
            "model": response.model,
            "usage": response.usage
        });
        if args.verbose {
            obj["source_code"] = json!(code);
        }
        serde_json::to_string_pretty(&obj)?
    } else {
        let mut lines = vec![
            format!("Command: {}", args.command.name()),
            String::new(),
            response.content.clone(),
            String::new(),
            format!("Model: {}", response.model),
            format!("Usage: {}", response.usage),
        ];
        if args.verbose {
            lines.insert(0, format!("Source code:\n{code}\n"));
        }
        lines.join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
