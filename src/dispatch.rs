//! Dispatch logic: resolve a registered tool to a sibling binary and run it.
//!
//! Path resolution is anchored to the dispatcher's own executable, never the
//! caller's working directory, so an install tree can be relocated as a unit.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;

use crate::error::Result;
use crate::registry::{self, ToolEntry};

/// Directory containing the dispatcher executable
pub fn install_dir() -> Result<PathBuf> {
    let exe = env::current_exe()?;
    // current_exe may come back relative; prefer the canonical form.
    let exe = exe.canonicalize().unwrap_or(exe);
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::other("dispatcher executable has no parent directory"))?;
    Ok(dir.to_path_buf())
}

/// On-disk path of a tool binary relative to an install directory
pub fn tool_path(base: &Path, entry: &ToolEntry) -> PathBuf {
    base.join(format!("{}{}", entry.bin, env::consts::EXE_SUFFIX))
}

/// Dispatch one invocation: look up `name`, spawn its binary with `args`
/// forwarded verbatim and stdio inherited, and map the outcome to this
/// process's exit code.
///
/// The three documented error paths (unknown tool, missing binary, child
/// failure) print a message and return a normal exit code. Anything else,
/// spawn failures included, propagates as an error.
pub fn run(name: &str, args: &[String]) -> Result<i32> {
    let Some(entry) = registry::find(name) else {
        println!("Unknown tool: {name}");
        println!("Run 'gait help' to list available tools.");
        return Ok(1);
    };

    let dir = install_dir()?;
    let path = tool_path(&dir, entry);
    if !path.exists() {
        println!("Tool '{}' not found at {}", entry.name, path.display());
        return Ok(1);
    }

    info!("dispatching {} -> {}", name, path.display());

    // status() inherits stdin/stdout/stderr and always reaps the child.
    let status = Command::new(&path).args(args).status()?;

    match status.code() {
        Some(0) => Ok(0),
        Some(code) => {
            println!("gait: {} exited with code {}", entry.name, code);
            Ok(code)
        }
        None => {
            println!("gait: {} terminated by signal", entry.name);
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_path_joins_base() {
        let entry = registry::find("tc").unwrap();
        let path = tool_path(Path::new("/opt/gait"), entry);
        let expected = format!("tc{}", env::consts::EXE_SUFFIX);
        assert_eq!(path, Path::new("/opt/gait").join(expected));
    }

    #[test]
    fn test_tool_path_uses_bin_name() {
        for entry in registry::TOOLS {
            let path = tool_path(Path::new("/base"), entry);
            let file = path.file_name().unwrap().to_str().unwrap();
            assert!(file.starts_with(entry.bin));
        }
    }

    #[test]
    fn test_install_dir_is_a_directory_path() {
        let dir = install_dir().unwrap();
        assert!(dir.is_absolute());
    }

    #[test]
    fn test_run_unknown_tool_exits_one_without_spawning() {
        let code = run("bogus", &[]).unwrap();
        assert_eq!(code, 1);
    }

    #[test]
    fn test_run_missing_binary_exits_one() {
        // The test harness binary lives in target/.../deps, where no tool
        // binaries are installed alongside it.
        let dir = install_dir().unwrap();
        let entry = registry::find("tc").unwrap();
        if !tool_path(&dir, entry).exists() {
            let code = run("tc", &[]).unwrap();
            assert_eq!(code, 1);
        }
    }
}
