//! User configuration for the tool binaries.
//!
//! Optional YAML file at `~/.config/gait/gait.yml` (fallback `./gait.yml`).
//! Everything defaults; flags always win over config. The dispatcher never
//! loads this.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Override for the default OpenAI chat model
    pub openai_model: Option<String>,
    /// Override for the default Anthropic model
    pub anthropic_model: Option<String>,
    /// Override for the default embedding model
    pub embedding_model: Option<String>,
    /// Where chat transcripts are written
    pub history_dir: Option<PathBuf>,
    /// Editor for /edit composition (falls back to $EDITOR, then vim)
    pub editor: Option<String>,
    pub agent: AgentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Cap on tool-call rounds in a single agent turn
    pub max_tool_calls: usize,
    /// Timeout for a single shell tool invocation
    pub command_timeout_ms: u64,
    /// Directory where save_and_run_code writes scripts
    pub scripts_dir: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_calls: 128,
            command_timeout_ms: 30_000,
            scripts_dir: PathBuf::from("scripts"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain: ~/.config/gait/gait.yml,
    /// then ./gait.yml, then defaults.
    pub fn load() -> Self {
        if let Some(config_dir) = dirs::config_dir() {
            let primary = config_dir.join("gait").join("gait.yml");
            if primary.exists() {
                match Self::load_from_file(&primary) {
                    Ok(config) => return config,
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary.display(), e);
                    }
                }
            }
        }

        let fallback = PathBuf::from("gait.yml");
        if fallback.exists() {
            match Self::load_from_file(&fallback) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback.display(), e);
                }
            }
        }

        Self::default()
    }

    fn load_from_file(path: &Path) -> eyre::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        log::info!("Loaded config from: {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.openai_model.is_none());
        assert!(config.anthropic_model.is_none());
        assert_eq!(config.agent.max_tool_calls, 128);
        assert_eq!(config.agent.command_timeout_ms, 30_000);
        assert_eq!(config.agent.scripts_dir, PathBuf::from("scripts"));
    }

    #[test]
    fn test_load_from_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "openai_model: gpt-4o").unwrap();
        writeln!(file, "agent:").unwrap();
        writeln!(file, "  max_tool_calls: 16").unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.openai_model.as_deref(), Some("gpt-4o"));
        assert!(config.anthropic_model.is_none());
        assert_eq!(config.agent.max_tool_calls, 16);
        // Unspecified nested fields keep defaults.
        assert_eq!(config.agent.command_timeout_ms, 30_000);
    }

    #[test]
    fn test_load_from_file_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "openai_model: [unterminated").unwrap();
        assert!(Config::load_from_file(file.path()).is_err());
    }
}
