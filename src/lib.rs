//! gait - a dispatcher and toolbelt of single-purpose AI CLI tools
//!
//! The `gait` binary maps a short command name to one of thirteen sibling
//! tool binaries and execs it; this library holds everything the tools share.

pub mod agent;
pub mod chat;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod llm;
pub mod logging;
pub mod registry;
pub mod tokenizer;

pub use error::{GaitError, Result};
