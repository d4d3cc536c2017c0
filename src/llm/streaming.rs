//! Streaming support for LLM responses.
//!
//! Both providers deliver completions as Server-Sent Events. The payload
//! shapes differ, so the accumulator has one entry point per provider; both
//! fold events into the same final [`CompletionResponse`] and emit
//! [`StreamChunk`]s for live display.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::llm::types::{CompletionResponse, StopReason, Usage};

/// Chunk emitted to consumers during streaming
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// Text content delta
    Text(String),
    /// Stream completed
    Done,
    /// Stream error reported in-band by the provider
    Error(String),
}

/// Create a bounded channel for stream chunks
pub fn create_stream_channel(buffer: usize) -> (mpsc::Sender<StreamChunk>, mpsc::Receiver<StreamChunk>) {
    mpsc::channel(buffer)
}

/// Folds raw SSE data payloads into a completion response.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    text: String,
    usage: Usage,
    stop_reason: StopReason,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one Anthropic SSE data payload.
    ///
    /// ```text
    /// event: content_block_delta
    /// data: {"type":"content_block_delta","delta":{"type":"text_delta","text":"Hi"}}
    /// ```
    pub fn on_anthropic(&mut self, data: &str) -> Option<StreamChunk> {
        let event: Value = serde_json::from_str(data).ok()?;
        match event["type"].as_str()? {
            "message_start" => {
                if let Some(input) = event["message"]["usage"]["input_tokens"].as_u64() {
                    self.usage.input_tokens = input;
                }
                None
            }
            "content_block_delta" => {
                let text = event["delta"]["text"].as_str()?;
                self.text.push_str(text);
                Some(StreamChunk::Text(text.to_string()))
            }
            "message_delta" => {
                if let Some(output) = event["usage"]["output_tokens"].as_u64() {
                    self.usage.output_tokens = output;
                }
                if let Some(reason) = event["delta"]["stop_reason"].as_str() {
                    self.stop_reason = parse_stop_reason(reason);
                }
                None
            }
            "message_stop" => Some(StreamChunk::Done),
            "error" => {
                let message = event["error"]["message"]
                    .as_str()
                    .unwrap_or("unknown stream error")
                    .to_string();
                Some(StreamChunk::Error(message))
            }
            _ => None,
        }
    }

    /// Process one OpenAI SSE data payload. The stream terminates with a
    /// literal `[DONE]` sentinel rather than a typed event.
    pub fn on_openai(&mut self, data: &str) -> Option<StreamChunk> {
        if data.trim() == "[DONE]" {
            return Some(StreamChunk::Done);
        }
        let event: Value = serde_json::from_str(data).ok()?;
        let choice = event["choices"].get(0)?;
        if let Some(reason) = choice["finish_reason"].as_str() {
            self.stop_reason = match reason {
                "length" => StopReason::MaxTokens,
                "tool_calls" => StopReason::ToolUse,
                _ => StopReason::EndTurn,
            };
        }
        let text = choice["delta"]["content"].as_str()?;
        self.text.push_str(text);
        Some(StreamChunk::Text(text.to_string()))
    }

    /// Accumulated text so far
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Finish the stream and produce the response
    pub fn into_response(self, model: &str) -> CompletionResponse {
        CompletionResponse {
            content: self.text,
            tool_calls: Vec::new(),
            stop_reason: self.stop_reason,
            usage: self.usage,
            model: model.to_string(),
        }
    }
}

pub(crate) fn parse_stop_reason(reason: &str) -> StopReason {
    match reason {
        "tool_use" => StopReason::ToolUse,
        "max_tokens" => StopReason::MaxTokens,
        "stop_sequence" => StopReason::StopSequence,
        _ => StopReason::EndTurn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anthropic_text_delta() {
        let mut acc = StreamAccumulator::new();
        let chunk = acc.on_anthropic(
            r#"{"type":"content_block_delta","index":0,"delta":{"type":"text_delta","text":"Hello"}}"#,
        );
        assert_eq!(chunk, Some(StreamChunk::Text("Hello".to_string())));
        assert_eq!(acc.text(), "Hello");
    }

    #[test]
    fn test_anthropic_accumulates_across_deltas() {
        let mut acc = StreamAccumulator::new();
        acc.on_anthropic(r#"{"type":"content_block_delta","delta":{"text":"Hello "}}"#);
        acc.on_anthropic(r#"{"type":"content_block_delta","delta":{"text":"World"}}"#);
        assert_eq!(acc.text(), "Hello World");
    }

    #[test]
    fn test_anthropic_usage_and_stop() {
        let mut acc = StreamAccumulator::new();
        acc.on_anthropic(r#"{"type":"message_start","message":{"usage":{"input_tokens":12}}}"#);
        acc.on_anthropic(
            r#"{"type":"message_delta","delta":{"stop_reason":"max_tokens"},"usage":{"output_tokens":34}}"#,
        );
        let resp = acc.into_response("claude-3-5-sonnet-20240620");
        assert_eq!(resp.usage.input_tokens, 12);
        assert_eq!(resp.usage.output_tokens, 34);
        assert_eq!(resp.stop_reason, StopReason::MaxTokens);
        assert_eq!(resp.model, "claude-3-5-sonnet-20240620");
    }

    #[test]
    fn test_anthropic_message_stop() {
        let mut acc = StreamAccumulator::new();
        let chunk = acc.on_anthropic(r#"{"type":"message_stop"}"#);
        assert_eq!(chunk, Some(StreamChunk::Done));
    }

    #[test]
    fn test_anthropic_error_event() {
        let mut acc = StreamAccumulator::new();
        let chunk =
            acc.on_anthropic(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#);
        assert_eq!(chunk, Some(StreamChunk::Error("Overloaded".to_string())));
    }

    #[test]
    fn test_anthropic_ping_ignored() {
        let mut acc = StreamAccumulator::new();
        assert!(acc.on_anthropic(r#"{"type":"ping"}"#).is_none());
    }

    #[test]
    fn test_anthropic_invalid_json_ignored() {
        let mut acc = StreamAccumulator::new();
        assert!(acc.on_anthropic("not json").is_none());
    }

    #[test]
    fn test_openai_delta() {
        let mut acc = StreamAccumulator::new();
        let chunk = acc.on_openai(r#"{"choices":[{"delta":{"content":"Hi"},"finish_reason":null}]}"#);
        assert_eq!(chunk, Some(StreamChunk::Text("Hi".to_string())));
        assert_eq!(acc.text(), "Hi");
    }

    #[test]
    fn test_openai_done_sentinel() {
        let mut acc = StreamAccumulator::new();
        assert_eq!(acc.on_openai("[DONE]"), Some(StreamChunk::Done));
        assert_eq!(acc.on_openai(" [DONE] "), Some(StreamChunk::Done));
    }

    #[test]
    fn test_openai_finish_reason_length() {
        let mut acc = StreamAccumulator::new();
        acc.on_openai(r#"{"choices":[{"delta":{},"finish_reason":"length"}]}"#);
        let resp = acc.into_response("gpt-4o-mini");
        assert_eq!(resp.stop_reason, StopReason::MaxTokens);
    }

    #[test]
    fn test_openai_empty_delta_no_chunk() {
        let mut acc = StreamAccumulator::new();
        assert!(acc.on_openai(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).is_none());
    }

    #[test]
    fn test_parse_stop_reason_fallback() {
        assert_eq!(parse_stop_reason("end_turn"), StopReason::EndTurn);
        assert_eq!(parse_stop_reason("tool_use"), StopReason::ToolUse);
        assert_eq!(parse_stop_reason("stop_sequence"), StopReason::StopSequence);
        assert_eq!(parse_stop_reason("anything"), StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_stream_channel() {
        let (tx, mut rx) = create_stream_channel(8);
        tx.send(StreamChunk::Text("a".to_string())).await.unwrap();
        tx.send(StreamChunk::Done).await.unwrap();
        drop(tx);

        assert_eq!(rx.recv().await, Some(StreamChunk::Text("a".to_string())));
        assert_eq!(rx.recv().await, Some(StreamChunk::Done));
        assert_eq!(rx.recv().await, None);
    }
}
