//! Scripted chat-completion provider
//!
//! Replays queued responses in order and records every conversation it was
//! sent, so tests can drive the assistant without a network.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use warehouse_inventory_server::agent::llm::{
    CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, Message, ToolCall,
};
use warehouse_inventory_server::agent::ToolDefinition;

/// One recorded completion request.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub messages: Vec<Message>,
    pub offered_tools: usize,
}

#[derive(Clone, Default)]
pub struct ScriptedLlm {
    responses: Arc<Mutex<VecDeque<CompletionResponse>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response requesting the given `(name, arguments)` tool calls.
    pub fn then_tool_calls(self, calls: &[(&str, &str)]) -> Self {
        let tool_calls = calls
            .iter()
            .enumerate()
            .map(|(i, (name, arguments))| ToolCall {
                id: format!("call_{}", i + 1),
                name: name.to_string(),
                arguments: arguments.to_string(),
            })
            .collect();
        self.push(CompletionResponse {
            message: Message::assistant_with_tools("", tool_calls),
            finish_reason: FinishReason::ToolCalls,
            usage: None,
        })
    }

    /// Queues a plain text response.
    pub fn then_answer(self, content: &str) -> Self {
        self.push(CompletionResponse {
            message: Message::assistant(content),
            finish_reason: FinishReason::Stop,
            usage: None,
        })
    }

    fn push(self, response: CompletionResponse) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            messages: messages.to_vec(),
            offered_tools: tools.map_or(0, |t| t.len()),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| LlmError::Connection("script exhausted".to_string()))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}
