//! Single-round tool-calling loop behind the assistant endpoint.

use super::sanitize::sanitize_final_answer;
use super::state::{AssistantReply, ConversationState, ToolInvocationRecord};
use crate::agent::llm::{
    CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message, ToolCall, ToolChoice,
};
use crate::agent::prompt::build_system_prompt;
use crate::agent::tools::{run_tool_call, InventoryTool, ToolContext, ToolDefinition};
use crate::inventory::InventoryStore;
use crate::server::metrics;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_COMPLETION_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("The model returned an empty answer")]
    EmptyAnswer,
}

/// Completion options of the two model calls.
#[derive(Debug, Clone)]
pub struct AssistantOptions {
    /// Call offering the tool catalogue.
    pub first_call: CompletionOptions,
    /// Call producing the final answer, made without tools.
    pub final_call: CompletionOptions,
}

impl AssistantOptions {
    pub fn new(temperature: f32, max_tokens: u32, timeout: Duration) -> Self {
        let base = CompletionOptions {
            temperature,
            max_tokens: Some(max_tokens),
            tool_choice: None,
            timeout,
        };
        Self {
            first_call: CompletionOptions {
                tool_choice: Some(ToolChoice::Auto),
                ..base.clone()
            },
            final_call: base,
        }
    }
}

impl Default for AssistantOptions {
    fn default() -> Self {
        let defaults = CompletionOptions::default();
        Self::new(
            defaults.temperature,
            DEFAULT_MAX_COMPLETION_TOKENS,
            defaults.timeout,
        )
    }
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Answers natural-language prompts about the inventory.
///
/// Holds no per-prompt state, one instance serves all requests.
pub struct InventoryAssistant {
    llm: Arc<dyn LlmProvider>,
    store: Arc<dyn InventoryStore>,
    tools: Vec<ToolDefinition>,
    options: AssistantOptions,
    clock: Clock,
}

impl InventoryAssistant {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        store: Arc<dyn InventoryStore>,
        options: AssistantOptions,
    ) -> Self {
        Self {
            llm,
            store,
            tools: InventoryTool::catalogue(),
            options,
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used for the prompt date and expiry windows.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.llm.name()
    }

    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Answers `prompt` for a caller of `warehouse_id`. Tools only see and
    /// change that warehouse's products.
    pub async fn run(
        &self,
        prompt: &str,
        warehouse_id: i64,
    ) -> Result<AssistantReply, AssistantError> {
        let now = (self.clock)();
        let context = ToolContext { warehouse_id, now };
        let mut messages = vec![Message::system(build_system_prompt(now)), Message::user(prompt)];
        let mut tool_invocations = Vec::new();
        let mut state = ConversationState::AwaitingFirstDecision;

        let raw_answer = loop {
            state = match state {
                ConversationState::AwaitingFirstDecision => {
                    let response = self
                        .complete(&messages, Some(self.tools.as_slice()), &self.options.first_call)
                        .await?;
                    let requested = response
                        .message
                        .requested_tool_calls()
                        .map(<[ToolCall]>::to_vec);
                    match requested {
                        Some(tool_calls) => {
                            debug!("Model requested {} tool call(s)", tool_calls.len());
                            messages.push(response.message);
                            ConversationState::ExecutingToolCalls { tool_calls }
                        }
                        None => ConversationState::Completed {
                            answer: response.message.content,
                        },
                    }
                }

                ConversationState::ExecutingToolCalls { tool_calls } => {
                    for call in &tool_calls {
                        let record = self.execute_tool_call(call, &context);
                        messages.push(Message::tool_response(
                            &call.id,
                            &call.name,
                            record.result.to_string(),
                        ));
                        tool_invocations.push(record);
                    }
                    ConversationState::AwaitingFinalAnswer
                }

                ConversationState::AwaitingFinalAnswer => {
                    let response = self
                        .complete(&messages, None, &self.options.final_call)
                        .await?;
                    ConversationState::Completed {
                        answer: response.message.content,
                    }
                }

                ConversationState::Completed { answer } => break answer,
            };
        };

        let answer = sanitize_final_answer(&raw_answer);
        if answer.is_empty() {
            warn!("Model returned an empty answer for prompt");
            return Err(AssistantError::EmptyAnswer);
        }

        Ok(AssistantReply {
            answer,
            tool_invocations,
        })
    }

    fn execute_tool_call(&self, call: &ToolCall, context: &ToolContext) -> ToolInvocationRecord {
        let outcome = run_tool_call(&call.name, &call.arguments, self.store.as_ref(), context);
        info!(
            "Tool {} ({}) finished with {}",
            call.name,
            call.id,
            outcome.status.as_str()
        );
        metrics::record_tool_invocation(&call.name, outcome.status.as_str());

        ToolInvocationRecord {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            arguments: call.arguments.clone(),
            result: outcome.result,
            status: outcome.status,
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let start = Instant::now();
        let result = self.llm.complete(messages, tools, options).await;
        metrics::record_llm_call(self.llm.name(), start.elapsed(), result.is_ok());

        match &result {
            Ok(response) => {
                if let Some(usage) = &response.usage {
                    debug!(
                        "Completion used {} prompt + {} completion tokens",
                        usage.prompt_tokens, usage.completion_tokens
                    );
                }
            }
            Err(e) => warn!("Completion request to {} failed: {}", self.llm.name(), e),
        }
        result
    }
}
