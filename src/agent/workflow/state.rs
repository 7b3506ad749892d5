//! Conversation states of a single assistant prompt.

use crate::agent::llm::ToolCall;
use crate::agent::tools::ToolStatus;
use serde::Serialize;
use serde_json::Value;

/// Where a prompt is in its single tool-calling round.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationState {
    /// Waiting for the model to answer or request tools.
    AwaitingFirstDecision,

    /// The model requested tools, run them in order.
    ExecutingToolCalls { tool_calls: Vec<ToolCall> },

    /// Tool results are in the transcript, waiting for the final text.
    AwaitingFinalAnswer,

    /// Raw text of the final answer, before cleanup.
    Completed { answer: String },
}

/// One executed tool call, as recorded in the reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocationRecord {
    pub call_id: String,
    pub tool_name: String,
    /// Arguments exactly as emitted by the model.
    pub arguments: String,
    pub result: Value,
    pub status: ToolStatus,
}

/// Final outcome of a prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub answer: String,
    pub tool_invocations: Vec<ToolInvocationRecord>,
}

