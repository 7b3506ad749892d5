use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all inventory server metrics
const PREFIX: &str = "inventory";

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.001, 0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Authentication Metrics
    pub static ref AUTH_SIGNIN_ATTEMPTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_auth_signin_attempts_total"), "Total signin attempts"),
        &["status"]
    ).expect("Failed to create auth_signin_attempts_total metric");

    // Assistant Metrics
    pub static ref ASSISTANT_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_assistant_requests_total"), "Assistant prompts by outcome"),
        &["outcome"]
    ).expect("Failed to create assistant_requests_total metric");

    pub static ref ASSISTANT_TOOL_INVOCATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_assistant_tool_invocations_total"),
            "Tool invocations requested by the model"
        ),
        &["tool", "status"]
    ).expect("Failed to create assistant_tool_invocations_total metric");

    pub static ref LLM_CALL_DURATION_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_llm_call_duration_seconds"),
            "Chat completion call duration in seconds"
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0])
    ).expect("Failed to create llm_call_duration_seconds metric");

    pub static ref LLM_CALL_ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_llm_call_errors_total"), "Failed chat completion calls"),
        &["provider"]
    ).expect("Failed to create llm_call_errors_total metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Already registered is fine, tests call this repeatedly
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(AUTH_SIGNIN_ATTEMPTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ASSISTANT_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ASSISTANT_TOOL_INVOCATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LLM_CALL_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(LLM_CALL_ERRORS_TOTAL.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

pub fn record_signin_attempt(status: &str) {
    AUTH_SIGNIN_ATTEMPTS_TOTAL.with_label_values(&[status]).inc();
}

/// Record the outcome of one assistant prompt
pub fn record_assistant_request(outcome: &str) {
    ASSISTANT_REQUESTS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_tool_invocation(tool: &str, status: &str) {
    ASSISTANT_TOOL_INVOCATIONS_TOTAL
        .with_label_values(&[tool, status])
        .inc();
}

/// Record a chat completion call, successful or not
pub fn record_llm_call(provider: &str, duration: Duration, success: bool) {
    LLM_CALL_DURATION_SECONDS.observe(duration.as_secs_f64());
    if !success {
        LLM_CALL_ERRORS_TOTAL.with_label_values(&[provider]).inc();
    }
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_default();
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}
