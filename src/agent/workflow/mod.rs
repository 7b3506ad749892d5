//! Prompt execution: state machine, tool round and answer cleanup.

mod executor;
mod sanitize;
mod state;

pub use executor::{
    AssistantError, AssistantOptions, InventoryAssistant, DEFAULT_MAX_COMPLETION_TOKENS,
};
pub use sanitize::sanitize_final_answer;
pub use state::{AssistantReply, ConversationState, ToolInvocationRecord};
