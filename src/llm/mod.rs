//! LLM client layer
//!
//! This module provides:
//! - Provider-agnostic message and tool types
//! - The LlmClient trait
//! - AnthropicClient and OpenAiClient implementations
//! - SSE streaming support

pub mod anthropic;
pub mod client;
pub mod openai;
pub mod streaming;
pub mod types;

pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use client::{LlmClient, MockLlmClient, stream_to_stdout};
pub use openai::{EmbeddingRequest, EmbeddingResponse, OpenAiClient, OpenAiConfig};
pub use streaming::{StreamAccumulator, StreamChunk, create_stream_channel};
pub use types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason,
    ToolCall, ToolDefinition, ToolResult, Usage,
};
