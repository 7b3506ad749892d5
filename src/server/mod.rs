mod api_error;
mod assistant_routes;
mod auth_routes;
pub mod config;
mod http_layers;
mod inventory_routes;
pub mod metrics;
pub mod server;
pub(self) mod session;
pub mod state;
mod validation;

pub use config::ServerConfig;
pub use http_layers::*;
pub use server::{make_app, make_metrics_app, run_server};
pub use state::ServerState;
