//! Mercadopago OAuth authorization-code flow driver
//!
//! # Flow overview
//!
//! 1. The host redirects the browser to [`OAuthFlow::authorization_url`].
//! 2. Mercadopago redirects back to the callback URL with `code` and `state`.
//! 3. The host checks `state` with
//!    [`verify_state`](super::state::verify_state).
//! 4. [`OAuthFlow::exchange_token`] POSTs the code to the token endpoint and
//!    returns the raw HTTP response; later the refresh token is exchanged
//!    the same way.
//!
//! The driver performs no retries and sets no timeout of its own: transport
//! failures surface as [`MercadopagoError::Http`] and non-2xx statuses are
//! left for the caller to inspect.

use std::sync::Arc;

use crate::config::Config;
use crate::error::{MercadopagoError, Result};
use crate::oauth::params::{
    bearer_headers, build_authorization_url, build_payload, build_query_string, Endpoint,
    QueryParams, TokenPayload,
};

/// Builds authorization URLs and exchanges codes and refresh tokens.
///
/// Holds the configuration by shared reference; it is read-only once the
/// driver exists, so clones of the driver may be used from concurrent
/// request handlers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use mercadopago_oauth::config::Config;
/// use mercadopago_oauth::oauth::flow::OAuthFlow;
/// use mercadopago_oauth::oauth::params::{Endpoint, QueryParams};
///
/// let config = Config {
///     client_id: Some("1314151617108901".to_string()),
///     state: Some("abc".to_string()),
///     callback_url: Some("http://localhost:5000/callback".to_string()),
///     ..Config::default()
/// };
/// let flow = OAuthFlow::new(Arc::new(reqwest::Client::new()), Arc::new(config));
///
/// let url = flow.authorization_url(Endpoint::Authorization, &QueryParams::new());
/// assert!(url.starts_with("https://auth.mercadopago.com.ar/authorization?response_type=code"));
/// ```
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    http: Arc<reqwest::Client>,
    config: Arc<Config>,
}

impl OAuthFlow {
    /// Creates a driver over a shared HTTP client and configuration.
    pub fn new(http: Arc<reqwest::Client>, config: Arc<Config>) -> Self {
        Self { http, config }
    }

    /// The configuration this driver reads from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the OIDC query string, falling back to configuration for
    /// every field left unset in `params`.
    pub fn query_string(&self, params: &QueryParams) -> String {
        build_query_string(&self.config, params)
    }

    /// Resolves an endpoint by its configuration name.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::UnknownEndpoint`] for any name other than
    /// `authorization_endpoint` or `token_endpoint`.
    pub fn location(&self, name: &str) -> Result<&str> {
        let endpoint: Endpoint = name.parse()?;
        Ok(endpoint.resolve(&self.config))
    }

    /// Builds `"{endpoint}?{query_string}"`.
    pub fn authorization_url(&self, endpoint: Endpoint, params: &QueryParams) -> String {
        let url = build_authorization_url(&self.config, endpoint, params);
        tracing::debug!(endpoint = %endpoint, "Built authorization URL");
        url
    }

    /// Base token payload from the configured credentials and callback URL.
    pub fn payload(&self) -> TokenPayload {
        build_payload(
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
            self.config.callback_url.as_deref(),
        )
    }

    /// Builds the payload for a code exchange and/or a refresh.
    ///
    /// With an authorization code the payload gains
    /// `grant_type=authorization_code` and `code`; with a refresh token it
    /// gains `grant_type=refresh_token` and `refresh_token`. When both are
    /// given both are applied in that order, so the refresh grant type wins.
    /// Empty strings count as absent.
    pub fn token_payload(
        &self,
        authorization_code: Option<&str>,
        refresh_token: Option<&str>,
    ) -> TokenPayload {
        let mut payload = self.payload();
        if let Some(code) = authorization_code.filter(|c| !c.is_empty()) {
            payload = payload.with_authorization_code(code);
        }
        if let Some(token) = refresh_token.filter(|t| !t.is_empty()) {
            payload = payload.with_refresh_token(token);
        }
        payload
    }

    /// POSTs a code exchange or refresh request to `endpoint`.
    ///
    /// The payload is sent as query parameters with
    /// `Authorization: Bearer <access_token>` and
    /// `Content-Type: application/json` headers. The response is returned
    /// untouched whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::InvalidHeader`] for an access token that
    /// cannot be sent as a header and [`MercadopagoError::Http`] when the
    /// request itself fails.
    pub async fn exchange_token(
        &self,
        endpoint: &str,
        access_token: &str,
        authorization_code: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<reqwest::Response> {
        let headers = bearer_headers(access_token)?;
        let payload = self.token_payload(authorization_code, refresh_token);

        tracing::debug!(
            endpoint,
            grant_type = payload.get("grant_type").unwrap_or("none"),
            "Sending token request"
        );

        let response = self
            .http
            .post(endpoint)
            .headers(headers)
            .query(&payload)
            .send()
            .await
            .map_err(MercadopagoError::Http)?;

        tracing::debug!(status = %response.status(), "Token endpoint responded");
        Ok(response)
    }

    /// Exchanges an authorization code at the configured token endpoint,
    /// authenticating with the configured application access token.
    pub async fn exchange_code(&self, authorization_code: &str) -> Result<reqwest::Response> {
        let access_token = self.app_access_token()?;
        self.exchange_token(
            &self.config.token_endpoint,
            access_token,
            Some(authorization_code),
            None,
        )
        .await
    }

    /// Exchanges a refresh token at the configured token endpoint,
    /// authenticating with the configured application access token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<reqwest::Response> {
        let access_token = self.app_access_token()?;
        self.exchange_token(
            &self.config.token_endpoint,
            access_token,
            None,
            Some(refresh_token),
        )
        .await
    }

    fn app_access_token(&self) -> Result<&str> {
        self.config.app_access_token.as_deref().ok_or_else(|| {
            MercadopagoError::Config("app_access_token must be set".to_string()).into()
        })
    }
}
