//! Conversation persistence for the interactive tools.
//!
//! Two kinds of files, as in the original tools: timestamped transcripts
//! written on /save (and after each agent turn), and a rolling
//! `conversation_history.json` reloaded on startup.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::llm::Message;

const HISTORY_FILE: &str = "conversation_history.json";

/// File-backed store for conversation transcripts
#[derive(Debug, Clone)]
pub struct ConversationStore {
    dir: PathBuf,
}

impl ConversationStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the user-local data directory
    pub fn default_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gait")
            .join("conversations")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save a transcript as a timestamped JSON file, returning its path
    pub fn save(&self, messages: &[Message]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let filename = format!("conversation_{}.json", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.dir.join(filename);
        fs::write(&path, serde_json::to_string_pretty(messages)?)?;
        Ok(path)
    }

    /// Load a transcript by filename (relative to the store) or full path
    pub fn load(&self, filename: &str) -> Result<Vec<Message>> {
        let path = {
            let candidate = PathBuf::from(filename);
            if candidate.is_absolute() {
                candidate
            } else {
                self.dir.join(candidate)
            }
        };
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// List saved transcripts, sorted by name (and so by timestamp)
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter_map(|e| e.file_name().into_string().ok())
            .filter(|name| name.starts_with("conversation_") && name.ends_with(".json"))
            .filter(|name| name != HISTORY_FILE)
            .collect();
        names.sort();
        names
    }

    /// Persist the rolling history file
    pub fn save_history(&self, messages: &[Message]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(HISTORY_FILE);
        fs::write(path, serde_json::to_string(messages)?)?;
        Ok(())
    }

    /// Load the rolling history; missing or corrupt files start empty
    pub fn load_history(&self) -> Vec<Message> {
        let path = self.dir.join(HISTORY_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Corrupt history file {}: {}", path.display(), e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_messages() -> Vec<Message> {
        vec![Message::user("hello"), Message::assistant("hi there")]
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        let path = store.save(&sample_messages()).unwrap();
        assert!(path.exists());

        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("conversation_"));

        let loaded = store.load(&name).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].text(), Some("hello"));
        assert_eq!(loaded[1].text(), Some("hi there"));
    }

    #[test]
    fn test_load_absolute_path() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());
        let path = store.save(&sample_messages()).unwrap();

        let loaded = store.load(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());
        assert!(store.load("conversation_nope.json").is_err());
    }

    #[test]
    fn test_list_excludes_history_file() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        store.save(&sample_messages()).unwrap();
        store.save_history(&sample_messages()).unwrap();

        let names = store.list();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("conversation_"));
        assert_ne!(names[0], HISTORY_FILE);
    }

    #[test]
    fn test_list_empty_when_dir_missing() {
        let store = ConversationStore::new("/nonexistent/gait-test");
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_history_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());

        assert!(store.load_history().is_empty());
        store.save_history(&sample_messages()).unwrap();
        assert_eq!(store.load_history().len(), 2);
    }

    #[test]
    fn test_corrupt_history_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = ConversationStore::new(dir.path());
        fs::write(dir.path().join(HISTORY_FILE), "{not json").unwrap();
        assert!(store.load_history().is_empty());
    }
}
