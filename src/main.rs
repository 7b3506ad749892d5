use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use warehouse_inventory_server::agent::{
    AssistantOptions, InventoryAssistant, LlmProvider, OpenAIProvider,
};
use warehouse_inventory_server::config;
use warehouse_inventory_server::inventory::SqliteInventoryStore;
use warehouse_inventory_server::server::{metrics, run_server, RequestsLoggingLevel};
use warehouse_inventory_server::server::{ServerConfig, ServerState};
use warehouse_inventory_server::user::{SqliteUserStore, TokenIssuer, UserManager};

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory holding the inventory and user databases.
    #[clap(long, value_parser = parse_path)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Secret used to sign session tokens. Falls back to JWT_SECRET.
    #[clap(long)]
    pub jwt_secret: Option<String>,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            metrics_port: args.metrics_port,
            logging_level: args.logging_level.clone(),
            jwt_secret: args.jwt_secret.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // TOML overrides CLI
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);
    info!("  llm endpoint: {}", app_config.agent.llm.base_url);

    info!("Initializing metrics...");
    metrics::init_metrics();

    if !app_config.inventory_db_path().exists() {
        info!(
            "Creating new inventory database at {:?}",
            app_config.inventory_db_path()
        );
    }
    let inventory_store = Arc::new(SqliteInventoryStore::new(app_config.inventory_db_path())?);

    if !app_config.user_db_path().exists() {
        info!(
            "Creating new user database at {:?}",
            app_config.user_db_path()
        );
    }
    let user_store = Arc::new(SqliteUserStore::new(app_config.user_db_path())?);
    let user_manager = Arc::new(UserManager::new(
        user_store,
        TokenIssuer::new(&app_config.jwt_secret, app_config.jwt_ttl),
    ));

    let llm_settings = &app_config.agent.llm;
    let llm = Arc::new(OpenAIProvider::new(
        llm_settings.base_url.clone(),
        llm_settings.model.clone(),
        llm_settings.api_key_source(),
    ));
    if let Err(e) = llm.health_check().await {
        warn!("Model endpoint is not reachable yet: {}", e);
    }
    let assistant_options: AssistantOptions = app_config.agent.assistant_options();
    let assistant = Arc::new(InventoryAssistant::new(
        llm,
        inventory_store.clone(),
        assistant_options,
    ));

    info!(
        "Assistant backed by {} model {}",
        assistant.provider_name(),
        assistant.model()
    );

    let state = ServerState::new(
        ServerConfig {
            requests_logging_level: app_config.logging_level.clone(),
            port: app_config.port,
            metrics_port: app_config.metrics_port,
        },
        inventory_store,
        user_manager,
        assistant,
    );

    info!("Ready to serve at port {}!", app_config.port);
    info!("Metrics available at port {}!", app_config.metrics_port);
    run_server(state).await
}
