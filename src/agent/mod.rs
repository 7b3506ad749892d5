//! Natural-language inventory assistant.
//!
//! A prompt goes through at most one round of tool calls:
//! - the model sees the prompt and the tool catalogue and may request tools
//! - requested tools run against the inventory store, in order
//! - a second call, without tools, produces the final answer

pub mod llm;
mod prompt;
pub mod tools;
pub mod workflow;

pub use llm::{
    ApiKeySource, CompletionOptions, CompletionResponse, LlmError, LlmProvider, Message,
    MessageRole, OpenAIProvider,
};
pub use prompt::{build_system_prompt, SYSTEM_PROMPT};
pub use tools::{InventoryTool, ToolDefinition, ToolError, ToolOutcome, ToolStatus};
pub use workflow::{
    AssistantError, AssistantOptions, AssistantReply, InventoryAssistant, ToolInvocationRecord,
};
