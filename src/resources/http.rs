//! HTTP transport used by API resources

use std::sync::Arc;

use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};

use crate::error::{MercadopagoError, Result};
use crate::resources::options::RequestOptions;

/// Status and JSON body of an API call.
///
/// Non-2xx answers are returned as-is; interpreting `status` is the
/// caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub response: serde_json::Value,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin wrapper over a shared `reqwest::Client`.
///
/// Hosts may hand their own client to the resource accessors, e.g. one
/// configured with a proxy.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

impl HttpClient {
    /// Builds a client with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::Api`] if the TLS backend cannot be
    /// initialised.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("mercadopago-oauth/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MercadopagoError::Api(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::from_client(Arc::new(client)))
    }

    /// Reuses an existing client.
    pub fn from_client(client: Arc<Client>) -> Self {
        Self { client }
    }

    /// Sends one request and reads the body as JSON.
    ///
    /// An empty body is reported as `null`; a non-JSON body is kept as a
    /// JSON string.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: &RequestOptions,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        let idempotency_key = matches!(method, Method::POST | Method::PUT)
            .then(|| uuid::Uuid::new_v4().to_string());
        let headers = options.headers(idempotency_key.as_deref())?;
        let url = format!("{}{}", options.base_url.trim_end_matches('/'), path);

        tracing::debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method, &url)
            .headers(headers)
            .timeout(options.connection_timeout);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(MercadopagoError::Http)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(MercadopagoError::Http)?;

        let response = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        Ok(ApiResponse { status, response })
    }
}
