//! Logging setup shared by every gait binary.
//!
//! Log lines go to a file under the user-local data directory so interactive
//! and piped output stays clean. If the file cannot be opened, logging falls
//! back to env_logger's stderr default.

use std::fs;
use std::path::PathBuf;

use log::info;

/// Initialize logging for a binary. Respects RUST_LOG for filtering.
pub fn init(bin: &str) {
    match open_log_target() {
        Ok((target, path)) => {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(target))
                .init();
            info!("{bin} logging to {}", path.display());
        }
        Err(_) => {
            env_logger::Builder::from_default_env().init();
        }
    }
}

fn open_log_target() -> std::io::Result<(Box<fs::File>, PathBuf)> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gait")
        .join("logs");
    fs::create_dir_all(&log_dir)?;

    let log_file = log_dir.join("gait.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)?;
    Ok((Box::new(file), log_file))
}
