//! OpenAI API client
//!
//! Chat Completions (including function tools and SSE streaming) and the
//! Embeddings API over reqwest.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use reqwest_eventsource::{Event, EventSource};
use serde_json::{Value, json};
use tokio::sync::mpsc;

use crate::error::{GaitError, Result};
use crate::llm::client::LlmClient;
use crate::llm::streaming::{StreamAccumulator, StreamChunk};
use crate::llm::types::{
    CompletionRequest, CompletionResponse, ContentBlock, Message, MessageContent, Role, StopReason,
    ToolCall, Usage,
};

/// Chat Completions endpoint
const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Embeddings endpoint
const OPENAI_EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-large";

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub max_tokens: Option<u32>,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            timeout: Duration::from_secs(300),
        }
    }
}

impl OpenAiConfig {
    /// Create a new config with a specific model
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Request for the Embeddings API
#[derive(Debug, Clone)]
pub struct EmbeddingRequest {
    pub model: Option<String>,
    pub input: Vec<String>,
    /// "float" or "base64"
    pub encoding_format: String,
    pub dimensions: Option<u32>,
    pub user: Option<String>,
}

impl EmbeddingRequest {
    pub fn new(input: Vec<String>) -> Self {
        Self {
            model: None,
            input,
            encoding_format: "float".to_string(),
            dimensions: None,
            user: None,
        }
    }
}

/// One embedding row; the payload is a float array or a base64 string
/// depending on the requested encoding format.
#[derive(Debug, Clone)]
pub struct EmbeddingData {
    pub index: u64,
    pub embedding: Value,
}

/// Response from the Embeddings API
#[derive(Debug, Clone)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
    pub model: String,
    pub usage: Usage,
}

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl OpenAiClient {
    /// Create a new client, reading OPENAI_API_KEY from the environment
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| GaitError::MissingApiKey("OPENAI_API_KEY".to_string()))?;
        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Map one provider-agnostic message onto Chat Completions messages.
    ///
    /// Tool results become their own "tool" role messages, and an assistant
    /// turn with tool_use blocks becomes an assistant message carrying
    /// tool_calls with stringified arguments.
    fn push_message(out: &mut Vec<Value>, message: &Message) {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };

        match &message.content {
            MessageContent::Text(text) => {
                out.push(json!({ "role": role, "content": text }));
            }
            MessageContent::Blocks(blocks) => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();

                for block in blocks {
                    match block {
                        ContentBlock::Text { text: t } => {
                            if !text.is_empty() {
                                text.push('\n');
                            }
                            text.push_str(t);
                        }
                        ContentBlock::ToolUse { id, name, input } => {
                            tool_calls.push(json!({
                                "id": id,
                                "type": "function",
                                "function": {
                                    "name": name,
                                    "arguments": input.to_string()
                                }
                            }));
                        }
                        ContentBlock::ToolResult {
                            tool_use_id,
                            content,
                            ..
                        } => {
                            out.push(json!({
                                "role": "tool",
                                "tool_call_id": tool_use_id,
                                "content": content
                            }));
                        }
                    }
                }

                if !tool_calls.is_empty() {
                    let content = if text.is_empty() { Value::Null } else { json!(text) };
                    out.push(json!({
                        "role": "assistant",
                        "content": content,
                        "tool_calls": tool_calls
                    }));
                } else if !text.is_empty() {
                    out.push(json!({ "role": role, "content": text }));
                }
            }
        }
    }

    /// Build the request body for Chat Completions
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request.model.as_ref().unwrap_or(&self.config.model);

        let mut messages: Vec<Value> = Vec::new();
        if !request.system.is_empty() {
            messages.push(json!({ "role": "system", "content": request.system }));
        }
        for message in &request.messages {
            Self::push_message(&mut messages, message);
        }

        let mut body = json!({
            "model": model,
            "messages": messages
        });

        if let Some(max_tokens) = request.max_tokens.or(self.config.max_tokens) {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temperature) = request.temperature {
            body["temperature"] = json!(temperature);
        }
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request.tools.iter().map(|t| t.to_openai_schema()).collect();
            body["tools"] = json!(tools);
            body["tool_choice"] = json!("auto");
        }

        body
    }

    /// Parse the Chat Completions response
    fn parse_response(&self, body: Value) -> Result<CompletionResponse> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| GaitError::InvalidResponse("missing choices".to_string()))?;
        let message = &choice["message"];

        let stop_reason = match choice["finish_reason"].as_str() {
            Some("tool_calls") | Some("function_call") => StopReason::ToolUse,
            Some("length") => StopReason::MaxTokens,
            _ => StopReason::EndTurn,
        };

        let usage = if let Some(u) = body.get("usage") {
            Usage::new(
                u["prompt_tokens"].as_u64().unwrap_or(0),
                u["completion_tokens"].as_u64().unwrap_or(0),
            )
        } else {
            Usage::default()
        };
        self.usage.lock().unwrap().add(&usage);

        let model = body["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        let content = message["content"].as_str().unwrap_or("").to_string();

        let mut tool_calls = Vec::new();
        if let Some(calls) = message["tool_calls"].as_array() {
            for call in calls {
                let id = call["id"].as_str().unwrap_or("").to_string();
                let name = call["function"]["name"].as_str().unwrap_or("").to_string();
                // Arguments arrive as a JSON-encoded string.
                let raw = call["function"]["arguments"].as_str().unwrap_or("{}");
                let input = serde_json::from_str(raw)
                    .unwrap_or_else(|_| Value::String(raw.to_string()));
                tool_calls.push(ToolCall::new(id, name, input));
            }
        }

        Ok(CompletionResponse {
            content,
            tool_calls,
            stop_reason,
            usage,
            model,
        })
    }

    /// Send a request and return the parsed JSON body
    async fn send_request(&self, url: &str, body: Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(GaitError::RateLimited { retry_after });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GaitError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Generate embeddings for a batch of inputs
    pub async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = request
            .model
            .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string());

        let mut body = json!({
            "model": model,
            "input": request.input,
            "encoding_format": request.encoding_format
        });
        if let Some(dimensions) = request.dimensions {
            body["dimensions"] = json!(dimensions);
        }
        if let Some(user) = request.user {
            body["user"] = json!(user);
        }

        let response = self.send_request(OPENAI_EMBEDDINGS_URL, body).await?;
        Self::parse_embedding_response(response)
    }

    fn parse_embedding_response(body: Value) -> Result<EmbeddingResponse> {
        let rows = body["data"]
            .as_array()
            .ok_or_else(|| GaitError::InvalidResponse("missing data array".to_string()))?;

        let data = rows
            .iter()
            .map(|row| EmbeddingData {
                index: row["index"].as_u64().unwrap_or(0),
                embedding: row["embedding"].clone(),
            })
            .collect();

        let usage = Usage::new(body["usage"]["prompt_tokens"].as_u64().unwrap_or(0), 0);
        let model = body["model"].as_str().unwrap_or("").to_string();

        Ok(EmbeddingResponse { data, model, usage })
    }

    /// Get cumulative token usage across all calls
    pub fn total_usage(&self) -> Usage {
        *self.usage.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.build_request(&request);
        let response = self.send_request(OPENAI_CHAT_URL, body).await?;
        self.parse_response(response)
    }

    async fn stream(
        &self,
        request: CompletionRequest,
        tx: mpsc::Sender<StreamChunk>,
    ) -> Result<CompletionResponse> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| self.config.model.clone());

        let mut body = self.build_request(&request);
        body["stream"] = json!(true);

        let builder = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body);

        let mut source = EventSource::new(builder).map_err(|e| GaitError::Stream(e.to_string()))?;
        let mut acc = StreamAccumulator::new();

        while let Some(event) = source.next().await {
            match event {
                Ok(Event::Open) => {}
                Ok(Event::Message(msg)) => {
                    if let Some(chunk) = acc.on_openai(&msg.data) {
                        let done = matches!(chunk, StreamChunk::Done);
                        if tx.send(chunk).await.is_err() || done {
                            source.close();
                            break;
                        }
                    }
                }
                Err(reqwest_eventsource::Error::StreamEnded) => break,
                Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                    let message = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    return Err(GaitError::Api {
                        status: status.as_u16(),
                        message,
                    });
                }
                Err(e) => {
                    source.close();
                    return Err(GaitError::Stream(e.to_string()));
                }
            }
        }

        let response = acc.into_response(&model);
        self.usage.lock().unwrap().add(&response.usage);
        Ok(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .finish()
    }
}
