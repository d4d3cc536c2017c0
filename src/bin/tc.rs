use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use serde_json::json;

use gait::input;
use gait::logging;
use gait::tokenizer;

/// tc: Token Count
#[derive(Parser, Debug)]
#[command(name = "tc", version, about = "tc: token counting with tiktoken encodings")]
struct Args {
    /// The text to tokenize
    text: Option<String>,

    /// Tokenizer encoding (o200k_base is used by gpt-4o and gpt-4o-mini)
    #[arg(short, long, default_value = tokenizer::DEFAULT_ENCODING)]
    model: String,

    /// Only output the token count
    #[arg(short, long)]
    count: bool,

    /// Output the individual token ids
    #[arg(short, long)]
    tokens: bool,

    /// Pretty print each token with its decoded text
    #[arg(short, long)]
    pretty: bool,

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

fn main() -> Result<()> {
    logging::init("tc");
    let args = Args::parse();

    let text = input::read_text(args.text.as_deref(), args.file.as_deref())?;

    let bpe = tokenizer::load(&args.model)?;
    let tokens = tokenizer::encode(&bpe, &text);
    let count = tokens.len();

    let rendered = if args.json {
        serde_json::to_string_pretty(&json!({
            "count": count,
            "tokens": if args.tokens { json!(tokens) } else { json!(null) },
            "pretty": if args.pretty {
                json!(tokenizer::pretty_tokens(&bpe, &tokens))
            } else {
                json!(null)
            }
        }))?
    } else if args.count {
        count.to_string()
    } else if args.tokens {
        tokens
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    } else if args.pretty {
        tokenizer::pretty_tokens(&bpe, &tokens)
    } else {
        format!("Token count: {count}")
    };

    input::write_or_print(&rendered, args.output.as_deref())?;
    Ok(())
}
