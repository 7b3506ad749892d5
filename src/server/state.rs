use axum::extract::FromRef;

use crate::agent::InventoryAssistant;
use crate::inventory::InventoryStore;
use crate::user::UserManager;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedInventoryStore = Arc<dyn InventoryStore>;
pub type GuardedUserManager = Arc<UserManager>;
pub type GuardedAssistant = Arc<InventoryAssistant>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub inventory_store: GuardedInventoryStore,
    pub user_manager: GuardedUserManager,
    pub assistant: GuardedAssistant,
    pub version: String,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        inventory_store: GuardedInventoryStore,
        user_manager: GuardedUserManager,
        assistant: GuardedAssistant,
    ) -> Self {
        ServerState {
            config,
            start_time: Instant::now(),
            inventory_store,
            user_manager,
            assistant,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl FromRef<ServerState> for GuardedInventoryStore {
    fn from_ref(input: &ServerState) -> Self {
        input.inventory_store.clone()
    }
}

impl FromRef<ServerState> for GuardedUserManager {
    fn from_ref(input: &ServerState) -> Self {
        input.user_manager.clone()
    }
}

impl FromRef<ServerState> for GuardedAssistant {
    fn from_ref(input: &ServerState) -> Self {
        input.assistant.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
