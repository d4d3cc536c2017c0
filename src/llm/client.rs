//! Core LLM client trait
//!
//! Both provider clients implement [`LlmClient`], so the chat session and
//! agent loop stay provider-agnostic.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::llm::streaming::StreamChunk;
use crate::llm::types::{CompletionRequest, CompletionResponse};

/// Stateless LLM client - each call is independent
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Single completion request, blocking until complete
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Streaming completion; text deltas are sent over `tx` as they arrive
    /// and the final response is returned when the stream closes.
    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse>;

    /// Default model this client targets
    fn model(&self) -> &str;
}

/// Stream a completion, printing text deltas to stdout as they arrive.
/// Returns the final accumulated response.
pub async fn stream_to_stdout<C>(client: &C, request: CompletionRequest) -> Result<CompletionResponse>
where
    C: LlmClient + ?Sized,
{
    use crate::llm::streaming::create_stream_channel;
    use std::io::Write as _;

    let (tx, mut rx) = create_stream_channel(64);
    let printer = tokio::spawn(async move {
        while let Some(chunk) = rx.recv().await {
            match chunk {
                StreamChunk::Text(text) => {
                    print!("{text}");
                    let _ = std::io::stdout().flush();
                }
                StreamChunk::Done => break,
                StreamChunk::Error(message) => {
                    eprintln!("stream error: {message}");
                }
            }
        }
    });

    let result = client.stream(request, tx).await;
    let _ = printer.await;
    result
}

/// Scripted client for tests: returns queued responses in order and records
/// every request it receives.
#[derive(Debug, Default)]
pub struct MockLlmClient {
    responses: Mutex<VecDeque<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be returned by the next call
    pub fn push_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> CompletionResponse {
        self.responses.lock().unwrap().pop_front().unwrap_or(CompletionResponse {
            content: "mock response".to_string(),
            model: "mock-model".to_string(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(self.next_response())
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        let response = self.next_response();
        let _ = tx.send(StreamChunk::Text(response.content.clone())).await;
        let _ = tx.send(StreamChunk::Done).await;
        Ok(response)
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
