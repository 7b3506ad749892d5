//! Warehouse Inventory Server Library
//!
//! This library exposes the internal modules for the binary and the end to end tests.

pub mod agent;
pub mod config;
pub mod inventory;
pub mod server;
pub mod sqlite_persistence;
pub mod user;

// Re-export commonly used types for convenience
pub use agent::{InventoryAssistant, LlmProvider, OpenAIProvider};
pub use inventory::{InventoryStore, SqliteInventoryStore};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig, ServerState};
pub use user::{SqliteUserStore, UserManager, UserStore};
