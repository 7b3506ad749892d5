//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per endpoint. When routes or request
//! formats change, update only this file.

use super::constants::*;
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client carrying an optional bearer token
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    token: Option<String>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Creates a client signed in as the warehouse 1 user
    pub async fn authenticated(base_url: String) -> Self {
        Self::authenticated_as(base_url, TEST_USER, TEST_PASS).await
    }

    /// Creates a client signed in with the given credentials
    ///
    /// # Panics
    ///
    /// Panics if signing in fails.
    pub async fn authenticated_as(base_url: String, username: &str, password: &str) -> Self {
        let mut client = Self::new(base_url);

        let response = client.signin(username, password).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Test user authentication failed"
        );
        let body: Value = response.json().await.expect("Signin body is not JSON");
        let token = body["token"]
            .as_str()
            .expect("Signin body has no token")
            .to_string();
        client.token = Some(token);

        client
    }

    /// Replaces the bearer token sent with requests
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    // ========================================================================
    // Public Endpoints
    // ========================================================================

    /// GET /
    pub async fn get_home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Authentication Endpoints
    // ========================================================================

    /// POST /api/signup
    pub async fn signup(&self, body: Value) -> Response {
        self.client
            .post(self.url("/api/signup"))
            .json(&body)
            .send()
            .await
            .expect("Signup request failed")
    }

    /// POST /api/signin
    pub async fn signin(&self, username: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/signin"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Signin request failed")
    }

    // ========================================================================
    // Inventory Endpoints
    // ========================================================================

    /// POST /api/products
    pub async fn create_product(&self, body: Value) -> Response {
        self.authorize(self.client.post(self.url("/api/products")))
            .json(&body)
            .send()
            .await
            .expect("Create product request failed")
    }

    /// GET /api/products
    pub async fn get_products(&self) -> Response {
        self.authorize(self.client.get(self.url("/api/products")))
            .send()
            .await
            .expect("Get products request failed")
    }

    /// GET /api/products/withQuantity
    pub async fn get_products_with_quantity(&self) -> Response {
        self.authorize(self.client.get(self.url("/api/products/withQuantity")))
            .send()
            .await
            .expect("Get products with quantity request failed")
    }

    /// GET /api/products/{id}
    pub async fn get_product_batches(&self, product_id: i64) -> Response {
        self.authorize(
            self.client
                .get(self.url(&format!("/api/products/{}", product_id))),
        )
        .send()
        .await
        .expect("Get product batches request failed")
    }

    /// POST /api/restock/{id}
    pub async fn restock(&self, product_id: i64, body: Value) -> Response {
        self.authorize(
            self.client
                .post(self.url(&format!("/api/restock/{}", product_id))),
        )
        .json(&body)
        .send()
        .await
        .expect("Restock request failed")
    }

    // ========================================================================
    // Assistant Endpoints
    // ========================================================================

    /// POST /api/ai
    pub async fn ask(&self, prompt: &str) -> Response {
        self.authorize(self.client.post(self.url("/api/ai")))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .expect("Assistant request failed")
    }
}
