//! Local token counting with tiktoken encodings.

use tiktoken_rs::CoreBPE;

use crate::error::{GaitError, Result};

/// Encodings tc knows how to load
pub const ENCODINGS: &[&str] = &["o200k_base", "cl100k_base", "p50k_base", "r50k_base"];

/// Default encoding, used by gpt-4o and gpt-4o-mini
pub const DEFAULT_ENCODING: &str = "o200k_base";

/// Load a BPE encoding by name
pub fn load(encoding: &str) -> Result<CoreBPE> {
    let bpe = match encoding {
        "o200k_base" => tiktoken_rs::o200k_base(),
        "cl100k_base" => tiktoken_rs::cl100k_base(),
        "p50k_base" => tiktoken_rs::p50k_base(),
        "r50k_base" => tiktoken_rs::r50k_base(),
        other => {
            return Err(GaitError::Tokenizer(format!(
                "unsupported encoding '{}' (expected one of: {})",
                other,
                ENCODINGS.join(", ")
            )));
        }
    };
    bpe.map_err(|e| GaitError::Tokenizer(e.to_string()))
}

/// Encode text; special token markers are treated as ordinary text
pub fn encode(bpe: &CoreBPE, text: &str) -> Vec<u32> {
    bpe.encode_ordinary(text)
}

/// Render one `id: "decoded"` line per token
pub fn pretty_tokens(bpe: &CoreBPE, tokens: &[u32]) -> String {
    tokens
        .iter()
        .map(|&token| {
            let decoded = bpe
                .decode(vec![token])
                .unwrap_or_else(|_| "<invalid utf-8>".to_string());
            format!("{}: {:?}", token, decoded)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
