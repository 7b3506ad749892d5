//! Test server lifecycle management
//!
//! Each test gets an isolated server with its own databases and a scripted
//! model behind the assistant.

use super::constants::*;
use super::fake_llm::ScriptedLlm;
use super::fixtures::{create_test_db_with_users, create_test_inventory, TEST_JWT_SECRET};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use warehouse_inventory_server::agent::{AssistantOptions, InventoryAssistant};
use warehouse_inventory_server::inventory::{InventoryStore, SqliteInventoryStore};
use warehouse_inventory_server::server::{make_app, RequestsLoggingLevel, ServerConfig, ServerState};
use warehouse_inventory_server::user::{SqliteUserStore, TokenIssuer, UserManager};

/// Test server instance with isolated databases
///
/// When dropped, the server gracefully shuts down and temp resources are cleaned up.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Inventory store for direct database access in tests
    pub inventory_store: Arc<dyn InventoryStore>,

    /// The model the assistant talks to
    pub llm: ScriptedLlm,

    // Private fields - keep resources alive until drop
    _temp_inventory_dir: TempDir,
    _temp_user_dir: TempDir,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a test server whose model has nothing scripted
    pub async fn spawn() -> Self {
        Self::spawn_with_llm(ScriptedLlm::new()).await
    }

    /// Spawns a new test server on a random port
    ///
    /// # Panics
    ///
    /// Panics if fixture creation, port binding or startup fails.
    pub async fn spawn_with_llm(llm: ScriptedLlm) -> Self {
        let (temp_inventory_dir, inventory_db_path) =
            create_test_inventory().expect("Failed to create test inventory");
        let (temp_user_dir, user_db_path) =
            create_test_db_with_users().expect("Failed to create test database");

        let inventory_store: Arc<dyn InventoryStore> = Arc::new(
            SqliteInventoryStore::new(&inventory_db_path).expect("Failed to open inventory store"),
        );
        let user_manager = Arc::new(UserManager::new(
            Arc::new(SqliteUserStore::new(&user_db_path).expect("Failed to open user store")),
            TokenIssuer::new(TEST_JWT_SECRET, chrono::Duration::days(1)),
        ));
        let assistant = Arc::new(InventoryAssistant::new(
            Arc::new(llm.clone()),
            inventory_store.clone(),
            AssistantOptions::default(),
        ));

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let config = ServerConfig {
            port,
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let app = make_app(ServerState::new(
            config,
            inventory_store.clone(),
            user_manager,
            assistant,
        ));

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            inventory_store,
            llm,
            _temp_inventory_dir: temp_inventory_dir,
            _temp_user_dir: temp_user_dir,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Waits for the server to become ready by polling the home endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }

    /// Id of a seeded product
    pub fn product_id(&self, sku: &str) -> i64 {
        self.inventory_store
            .get_product_by_sku(sku)
            .expect("Failed to read inventory")
            .unwrap_or_else(|| panic!("No product with sku {}", sku))
            .id
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
