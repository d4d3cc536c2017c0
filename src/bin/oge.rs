use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eyre::Result;
use serde_json::json;

use gait::config::Config;
use gait::input;
use gait::llm::openai::DEFAULT_EMBEDDING_MODEL;
use gait::llm::{EmbeddingRequest, OpenAiClient, OpenAiConfig};
use gait::logging;

/// Wire encoding for embedding vectors
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Encoding {
    Float,
    Base64,
}

impl Encoding {
    fn name(self) -> &'static str {
        match self {
            Encoding::Float => "float",
            Encoding::Base64 => "base64",
        }
    }
}

/// oge: OpenAI Generate Embeddings
#[derive(Parser, Debug)]
#[command(name = "oge", version, about = "oge: embedding generation via OpenAI")]
struct Args {
    /// The text to generate embeddings for
    text: Option<String>,

    /// Embedding model to use (default: text-embedding-3-large)
    #[arg(short, long)]
    model: Option<String>,

    /// Read text from a file, one input per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Write output to a file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    json: bool,

    /// Encoding format for embeddings
    #[arg(short, long, value_enum, default_value = "float")]
    encoding: Encoding,

    /// Number of dimensions (text-embedding-3 and later only)
    #[arg(short, long)]
    dimensions: Option<u32>,

    /// Unique identifier representing your end-user
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("oge");
    let args = Args::parse();
    let config = Config::load();

    let inputs = input::read_inputs(args.text.as_deref(), args.file.as_deref())?;

    let model = args
        .model
        .clone()
        .or(config.embedding_model)
        .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());
    let client = OpenAiClient::new(OpenAiConfig::default())?;

    let request = EmbeddingRequest {
        model: Some(model),
        input: inputs,
        encoding_format: args.encoding.name().to_string(),
        dimensions: args.dimensions,
        user: args.user.clone(),
    };

    let response = client.embed(request).await?;

    let rendered = if args.json {
        let data: Vec<_> = response
            .data
            .iter()
            .map(|d| json!({ "index": d.index, "embedding": d.embedding }))
            .collect();
        serde_json::to_string_pretty(&json!({
            "data": data,
            "model": response.model,
            "usage": response.usage
        }))?
    } else {
        let mut lines = Vec::new();
        for row in &response.data {
            lines.push(format!("Embedding {}:", row.index));
            lines.push(row.embedding.to_string());
            lines.push(String::new());
        }
        lines.push(format!("Model: {}", response.model));
        lines.push(format!("Usage: {}", response.usage));
        lines.join("\n")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
