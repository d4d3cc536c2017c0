//! Agent tool loop: tool schemas, execution, and the complete→execute→continue
//! cycle used by the interactive agent REPLs.

pub mod shell;

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;

use crate::error::Result;
use crate::llm::{
    CompletionRequest, LlmClient, Message, ToolCall, ToolDefinition, ToolResult,
};

/// Cap on tool-call rounds within a single user turn
pub const MAX_TOOL_CALLS: usize = 128;

/// Schema for the shell execution tool
pub fn shell_tool() -> ToolDefinition {
    ToolDefinition::new(
        "execute_shell_command",
        "Execute a shell command and return its output.",
        json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The shell command to execute."
                }
            },
            "required": ["command"]
        }),
    )
}

/// Schema for the save-and-run code tool
pub fn save_code_tool() -> ToolDefinition {
    ToolDefinition::new(
        "save_and_run_code",
        "Save code to a file under the scripts directory and optionally execute it.",
        json!({
            "type": "object",
            "properties": {
                "code": { "type": "string", "description": "The code to save." },
                "language": {
                    "type": "string",
                    "description": "Language of the code (python, bash, go, ruby, ...)."
                },
                "execute": {
                    "type": "boolean",
                    "description": "Whether to execute the saved file."
                }
            },
            "required": ["code", "language"]
        }),
    )
}

/// Executes tool calls requested by the model
#[derive(Debug, Clone)]
pub struct ToolRunner {
    pub timeout: Duration,
    pub scripts_dir: PathBuf,
}

impl Default for ToolRunner {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            scripts_dir: PathBuf::from("scripts"),
        }
    }
}

impl ToolRunner {
    /// Run one tool call and wrap its output as a tool result
    pub async fn run(&self, call: &ToolCall) -> ToolResult {
        match call.name.as_str() {
            "execute_shell_command" => match call.input["command"].as_str() {
                Some(command) => {
                    let output = shell::execute_shell_command(command, self.timeout).await;
                    ToolResult::success(&call.id, output)
                }
                None => ToolResult::error(&call.id, "missing 'command' argument"),
            },
            "save_and_run_code" => {
                let code = call.input["code"].as_str().unwrap_or("");
                let language = call.input["language"].as_str().unwrap_or("text");
                let execute = call.input["execute"].as_bool().unwrap_or(false);
                if code.is_empty() {
                    return ToolResult::error(&call.id, "missing 'code' argument");
                }
                let output = shell::save_and_run_code(
                    &self.scripts_dir,
                    code,
                    language,
                    execute,
                    self.timeout,
                )
                .await;
                ToolResult::success(&call.id, output)
            }
            other => ToolResult::error(&call.id, format!("unknown tool: {other}")),
        }
    }
}

/// Drive one user turn to completion, executing tool calls until the model
/// stops asking for them or the round cap is hit. Conversation history in
/// `messages` is extended in place with every intermediate turn.
pub async fn run_turn<C>(
    client: &C,
    system: &str,
    messages: &mut Vec<Message>,
    tools: &[ToolDefinition],
    model: Option<&str>,
    runner: &ToolRunner,
    max_tool_calls: usize,
    mut on_tool: impl FnMut(&ToolCall, &ToolResult),
) -> Result<String>
where
    C: LlmClient + ?Sized,
{
    let mut calls_made = 0usize;

    loop {
        let mut request = CompletionRequest::new(system)
            .with_messages(messages.clone())
            .with_tools(tools.to_vec());
        if let Some(model) = model {
            request = request.with_model(model);
        }

        let response = client.complete(request).await?;

        let continue_with_tools = response.stop_reason.needs_continuation()
            && !response.tool_calls.is_empty()
            && calls_made < max_tool_calls;

        if !continue_with_tools {
            messages.push(Message::assistant(response.content.clone()));
            return Ok(response.content);
        }

        messages.push(Message::assistant_tool_use(
            response.content.clone(),
            &response.tool_calls,
        ));

        let mut results = Vec::new();
        for call in &response.tool_calls {
            calls_made += 1;
            let result = runner.run(call).await;
            on_tool(call, &result);
            results.push(result);
        }
        messages.push(Message::tool_results(&results));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{CompletionResponse, MockLlmClient, StopReason};
    use serde_json::json;
    use tempfile::TempDir;

    fn tool_response(calls: Vec<ToolCall>) -> CompletionResponse {
        CompletionResponse {
            content: String::new(),
            tool_calls: calls,
            stop_reason: StopReason::ToolUse,
            ..Default::default()
        }
    }

    fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: text.to_string(),
            ..Default::default()
        }
    }

    fn test_runner(dir: &TempDir) -> ToolRunner {
        ToolRunner {
            timeout: Duration::from_secs(30),
            scripts_dir: dir.path().to_path_buf(),
        }
    }

    #[test]
    fn test_shell_tool_schema() {
        let tool = shell_tool();
        assert_eq!(tool.name, "execute_shell_command");
        assert_eq!(tool.input_schema["required"][0], "command");
    }

    #[test]
    fn test_save_code_tool_schema() {
        let tool = save_code_tool();
        assert_eq!(tool.name, "save_and_run_code");
        assert!(tool.input_schema["properties"]["execute"].is_object());
    }

    #[tokio::test]
    async fn test_runner_executes_shell() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let call = ToolCall::new("call_1", "execute_shell_command", json!({"command": "echo hi"}));

        let result = runner.run(&call).await;
        assert!(!result.is_error);
        assert_eq!(result.content.trim(), "hi");
    }

    #[tokio::test]
    async fn test_runner_missing_command_argument() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let call = ToolCall::new("call_1", "execute_shell_command", json!({}));

        let result = runner.run(&call).await;
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_runner_unknown_tool() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let call = ToolCall::new("call_1", "launch_rockets", json!({}));

        let result = runner.run(&call).await;
        assert!(result.is_error);
        assert!(result.content.contains("unknown tool"));
    }

    #[tokio::test]
    async fn test_run_turn_without_tools() {
        let client = MockLlmClient::new();
        client.push_response(text_response("plain answer"));

        let dir = TempDir::new().unwrap();
        let mut messages = vec![Message::user("hello")];
        let text = run_turn(
            &client,
            "system",
            &mut messages,
            &[shell_tool()],
            None,
            &test_runner(&dir),
            MAX_TOOL_CALLS,
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(text, "plain answer");
        // user + assistant
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn test_run_turn_with_tool_round() {
        let client = MockLlmClient::new();
        client.push_response(tool_response(vec![ToolCall::new(
            "call_1",
            "execute_shell_command",
            json!({"command": "echo from-tool"}),
        )]));
        client.push_response(text_response("final answer"));

        let dir = TempDir::new().unwrap();
        let mut messages = vec![Message::user("run echo")];
        let mut seen = Vec::new();
        let text = run_turn(
            &client,
            "system",
            &mut messages,
            &[shell_tool()],
            Some("gpt-4o"),
            &test_runner(&dir),
            MAX_TOOL_CALLS,
            |call, result| seen.push((call.name.clone(), result.content.clone())),
        )
        .await
        .unwrap();

        assert_eq!(text, "final answer");
        assert_eq!(seen.len(), 1);
        assert!(seen[0].1.contains("from-tool"));
        // user + assistant(tool_use) + user(tool_results) + assistant
        assert_eq!(messages.len(), 4);

        // The continuation request carried the tool history.
        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].model.as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn test_run_turn_respects_call_cap() {
        let client = MockLlmClient::new();
        // The model keeps asking for tools; the cap forces a final round.
        for _ in 0..3 {
            client.push_response(tool_response(vec![ToolCall::new(
                "call_n",
                "execute_shell_command",
                json!({"command": "true"}),
            )]));
        }
        client.push_response(text_response("done"));

        let dir = TempDir::new().unwrap();
        let mut messages = vec![Message::user("loop")];
        let text = run_turn(
            &client,
            "system",
            &mut messages,
            &[shell_tool()],
            None,
            &test_runner(&dir),
            2,
            |_, _| {},
        )
        .await
        .unwrap();

        // Two tool rounds executed, then the cap stopped the third even
        // though the model asked for more.
        assert_eq!(text, "");
        assert_eq!(client.requests().len(), 3);
    }
}
