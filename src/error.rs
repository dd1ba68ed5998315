//! Error types for mercadopago-oauth
//!
//! This module defines the error types surfaced by the OAuth flow driver,
//! the resource accessors and the host sample application, using
//! `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for mercadopago-oauth operations
///
/// The taxonomy is intentionally small: an unknown endpoint name is the
/// only local validation performed by the flow driver, transport failures
/// are passed through from `reqwest`, and HTTP status codes returned by the
/// authorization server are only translated by the optional typed helpers.
#[derive(Error, Debug)]
pub enum MercadopagoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An endpoint name other than `authorization_endpoint` or
    /// `token_endpoint` was requested
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// The `state` returned on the callback does not match the one sent
    #[error("State mismatch: expected {expected}, got {actual}")]
    StateMismatch {
        /// The state embedded in the authorization request
        expected: String,
        /// The state received on the callback
        actual: String,
    },

    /// A header value could not be built (e.g. a token with a newline)
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),

    /// The token endpoint answered with a non-success status
    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Payments API request errors
    #[error("API error: {0}")]
    Api(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for mercadopago-oauth operations
///
/// Uses `anyhow::Error` so callers can attach context; the concrete
/// [`MercadopagoError`] is recoverable with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
