//! Input and output plumbing shared by the tool binaries.
//!
//! Every one-shot tool resolves its text the same way: an explicit file wins,
//! then the positional argument, then piped stdin. An interactive terminal
//! with no argument is an error rather than a hang.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::Path;

use crate::error::{GaitError, Result};

/// Resolve tool input text: file > positional > piped stdin.
pub fn read_text(positional: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        return Ok(fs::read_to_string(path)?);
    }
    if let Some(text) = positional {
        return Ok(text.to_string());
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(GaitError::NoInput);
    }
    let mut buf = String::new();
    stdin.lock().read_to_string(&mut buf)?;
    Ok(buf)
}

/// Like [`read_text`] but splits file/stdin input into lines, one embedding
/// input per line. A positional argument stays a single item.
pub fn read_inputs(positional: Option<&str>, file: Option<&Path>) -> Result<Vec<String>> {
    if let Some(text) = positional
        && file.is_none()
    {
        return Ok(vec![text.to_string()]);
    }
    let text = read_text(None, file)?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Write rendered output to a file when requested, otherwise print it.
pub fn write_or_print(output: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{output}")?;
        }
    }
    Ok(())
}
