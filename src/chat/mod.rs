//! Interactive chat machinery shared by cchat, cia, ochat, and oia.

pub mod commands;
pub mod editor;
pub mod history;
pub mod session;

pub use commands::SlashCommand;
pub use history::ConversationStore;
pub use session::{ChatSession, SessionOptions};
