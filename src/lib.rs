//! mercadopago-oauth - Mercadopago OAuth integration library
//!
//! This library connects a host web application to Mercadopago through the
//! OAuth 2.0 authorization-code flow, and exposes the Mercadopago API
//! resources authenticated with the application's access token.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `mercadopago`: The [`Mercadopago`] integration object and resource accessors
//! - `oauth`: Query strings, authorization URLs, token payloads and exchanges
//! - `resources`: API resource handles and their HTTP transport
//! - `assets`: `<script>` tags for the client-side SDK
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `server`: Sample host application
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use mercadopago_oauth::{Config, Mercadopago};
//! use mercadopago_oauth::oauth::params::{Endpoint, QueryParams};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_yaml("client_id: \"1314151617108901\"")?;
//!     let mercadopago = Mercadopago::new(config);
//!
//!     let url = mercadopago.authorization_url(Endpoint::Authorization, &QueryParams::new());
//!     println!("Connect your account: {}", url);
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mercadopago;
pub mod oauth;
pub mod resources;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use error::{MercadopagoError, Result};
pub use mercadopago::Mercadopago;
pub use oauth::{Endpoint, OAuthFlow, OAuthToken, QueryParams, TokenResponse};
pub use resources::{ApiResponse, Resource, ResourceKind};
