//! Inventory operations the assistant can invoke.

mod args;
mod catalogue;
mod dates;

pub use catalogue::{
    run_tool_call, InventoryTool, ToolContext, ToolInvocation, ToolOutcome, ToolStatus,
    DEFAULT_EXPIRY_WINDOW_DAYS, MAX_EXPIRY_WINDOW_DAYS,
};
pub use dates::parse_expiry_date;

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Definition of a tool as advertised to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the tool's parameters.
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Failures that happen before a tool touches the store.
#[derive(Debug, Error, PartialEq)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The argument payload is not JSON at all.
    #[error("malformed arguments: {0}")]
    MalformedArguments(String),

    /// Valid JSON that does not fit the tool's parameters.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    pub fn status(&self) -> ToolStatus {
        match self {
            ToolError::UnknownTool(_) => ToolStatus::UnknownTool,
            ToolError::MalformedArguments(_) => ToolStatus::MalformedArguments,
            ToolError::InvalidArguments(_) => ToolStatus::InvalidArguments,
        }
    }

    /// The structured result handed back to the model in place of a tool output.
    pub fn into_outcome(self) -> ToolOutcome {
        let status = self.status();
        ToolOutcome {
            status,
            result: json!({ "error": self.to_string(), "kind": status.as_str() }),
        }
    }
}
