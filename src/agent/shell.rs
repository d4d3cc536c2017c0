//! Shell and code-saving tools exposed to the model by the agent REPLs.
//!
//! Tool failures are reported as text back to the model rather than as
//! process errors, so a bad command never kills the session.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use chrono::Local;
use tokio::process::Command;

/// Run a shell command with a timeout, returning output or a failure report.
pub async fn execute_shell_command(command: &str, timeout: Duration) -> String {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return format!("Failed to start command: {e}"),
    };

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Err(_) => format!("Command timed out after {} seconds", timeout.as_secs()),
        Ok(Err(e)) => format!("An error occurred: {e}"),
        Ok(Ok(output)) => {
            if output.status.success() {
                String::from_utf8_lossy(&output.stdout).to_string()
            } else {
                format!(
                    "Command exited with non-zero status. Stderr: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                )
            }
        }
    }
}

/// File extension for a language name, .txt when unrecognized
fn extension_for(language: &str) -> &'static str {
    match language.to_lowercase().as_str() {
        "python" => ".py",
        "javascript" => ".js",
        "bash" => ".sh",
        "c" => ".c",
        "cpp" => ".cpp",
        "java" => ".java",
        "go" => ".go",
        "ruby" => ".rb",
        "perl" => ".pl",
        "php" => ".php",
        "rust" => ".rs",
        _ => ".txt",
    }
}

/// Interpreter command line for an extension, None when not runnable
fn runner_for(extension: &str, path: &Path) -> Option<String> {
    let path = path.display();
    match extension {
        ".py" => Some(format!("python3 {path}")),
        ".sh" => Some(format!("bash {path}")),
        ".go" => Some(format!("go run {path}")),
        ".rb" => Some(format!("ruby {path}")),
        _ => None,
    }
}

/// Save model-produced code under `scripts_dir` and optionally execute it.
pub async fn save_and_run_code(
    scripts_dir: &Path,
    code: &str,
    language: &str,
    execute: bool,
    timeout: Duration,
) -> String {
    if let Err(e) = std::fs::create_dir_all(scripts_dir) {
        return format!("Failed to create {}: {e}", scripts_dir.display());
    }

    let extension = extension_for(language);
    let filename = format!("{}_script{}", Local::now().format("%Y%m%d_%H%M%S"), extension);
    let filepath = scripts_dir.join(filename);

    if let Err(e) = std::fs::write(&filepath, code) {
        return format!("Failed to write {}: {e}", filepath.display());
    }

    let mut result = format!("Code saved to {}", filepath.display());
    if execute {
        match runner_for(extension, &filepath) {
            Some(command) => {
                let exec_result = execute_shell_command(&command, timeout).await;
                result.push_str(&format!("\nExecution result:\n{exec_result}"));
            }
            None => {
                return format!("Execution not supported for language: {language}");
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_execute_success_captures_stdout() {
        let output = execute_shell_command("echo hello", TIMEOUT).await;
        assert_eq!(output.trim(), "hello");
    }

    #[tokio::test]
    async fn test_execute_failure_reports_stderr() {
        let output = execute_shell_command("echo oops >&2 && false", TIMEOUT).await;
        assert!(output.contains("non-zero status"));
        assert!(output.contains("oops"));
    }

    #[tokio::test]
    async fn test_execute_timeout() {
        let output = execute_shell_command("sleep 5", Duration::from_millis(100)).await;
        assert!(output.contains("timed out"));
    }

    #[tokio::test]
    async fn test_execute_unknown_command() {
        let output = execute_shell_command("nonexistent_command_xyz123", TIMEOUT).await;
        assert!(output.contains("non-zero status"));
    }

    #[test]
    fn test_extension_for_known_languages() {
        assert_eq!(extension_for("python"), ".py");
        assert_eq!(extension_for("Rust"), ".rs");
        assert_eq!(extension_for("brainfuck"), ".txt");
    }

    #[test]
    fn test_runner_for_supported() {
        let path = Path::new("/tmp/x.py");
        assert_eq!(runner_for(".py", path).unwrap(), "python3 /tmp/x.py");
        assert!(runner_for(".rs", path).is_none());
    }

    #[tokio::test]
    async fn test_save_code_without_execution() {
        let dir = TempDir::new().unwrap();
        let result = save_and_run_code(dir.path(), "print('hi')", "python", false, TIMEOUT).await;
        assert!(result.starts_with("Code saved to"));

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        assert!(name.to_str().unwrap().ends_with("_script.py"));
    }

    #[tokio::test]
    async fn test_save_and_run_bash() {
        let dir = TempDir::new().unwrap();
        let result = save_and_run_code(dir.path(), "echo ran", "bash", true, TIMEOUT).await;
        assert!(result.contains("Code saved to"));
        assert!(result.contains("Execution result:"));
        assert!(result.contains("ran"));
    }

    #[tokio::test]
    async fn test_save_unsupported_execution() {
        let dir = TempDir::new().unwrap();
        let result = save_and_run_code(dir.path(), "fn main() {}", "rust", true, TIMEOUT).await;
        assert!(result.contains("Execution not supported"));
    }
}
