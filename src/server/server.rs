use anyhow::Result;
use std::future::IntoFuture;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::info;

use super::assistant_routes::post_prompt;
use super::auth_routes::{signin, signup};
use super::inventory_routes::{
    get_product_batches, get_products, get_products_with_quantity, post_product, post_restock,
};
use super::metrics::metrics_handler;
use super::{log_requests, state::*};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub version: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    Json(ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        version: state.version.clone(),
    })
}

pub fn make_app(state: ServerState) -> Router {
    let auth_routes: Router = Router::new()
        .route("/signup", post(signup))
        .route("/signin", post(signin))
        .with_state(state.clone());

    let inventory_routes: Router = Router::new()
        .route("/products", post(post_product).get(get_products))
        .route("/products/withQuantity", get(get_products_with_quantity))
        .route("/products/{id}", get(get_product_batches))
        .route("/restock/{id}", post(post_restock))
        .with_state(state.clone());

    let assistant_routes: Router = Router::new()
        .route("/ai", post(post_prompt))
        .with_state(state.clone());

    Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .nest(
            "/api",
            auth_routes.merge(inventory_routes).merge(assistant_routes),
        )
        .layer(middleware::from_fn_with_state(state, log_requests))
        .layer(CorsLayer::permissive())
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

pub async fn run_server(state: ServerState) -> Result<()> {
    let port = state.config.port;
    let metrics_port = state.config.metrics_port;
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", metrics_port)).await?;

    info!("Serving the API on port {}", port);
    info!("Serving metrics on port {}", metrics_port);

    let api = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let metrics = axum::serve(metrics_listener, make_metrics_app())
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    tokio::try_join!(api, metrics)?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down");
}
