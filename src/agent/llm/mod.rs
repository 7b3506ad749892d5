//! Chat-completion provider abstraction.

mod openai;
mod provider;
mod types;

pub use openai::{ApiKeySource, OpenAIProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use provider::{CompletionOptions, LlmError, LlmProvider, ToolChoice};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage, ToolCall};
