//! Compose a message in the user's editor, as /edit does.

use std::fs;
use std::io::Write as _;
use std::process::Command;

use crate::error::{GaitError, Result};

const TEMPLATE: &str = "# Type your message here. Lines starting with # will be ignored.\n";

/// Resolve the editor: explicit config value, then $EDITOR, then vim
pub fn resolve_editor(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| std::env::var("EDITOR").ok())
        .unwrap_or_else(|| "vim".to_string())
}

/// Open the editor on a temp file and return the composed message with
/// comment lines removed.
pub fn compose(editor: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("gait-message-")
        .suffix(".txt")
        .tempfile()?;
    file.write_all(TEMPLATE.as_bytes())?;
    file.flush()?;

    let status = Command::new(editor)
        .arg(file.path())
        .status()
        .map_err(|e| GaitError::Editor(format!("failed to launch '{editor}': {e}")))?;
    if !status.success() {
        return Err(GaitError::Editor(format!("'{editor}' exited with {status}")));
    }

    let content = fs::read_to_string(file.path())?;
    Ok(strip_comments(&content))
}

/// Drop `#`-prefixed lines and surrounding whitespace
fn strip_comments(content: &str) -> String {
    content
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
