//! Configuration management for mercadopago-oauth
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//!
//! Every setting that has a sensible default is filled in by serde when it
//! is absent from the source, so values supplied by the host are never
//! overwritten. The anti-forgery `state` is the exception: it is seeded by
//! [`Config::seed_defaults`] from an injectable generator when the
//! [`Mercadopago`](crate::Mercadopago) driver is constructed.

use crate::error::{MercadopagoError, Result};
use crate::oauth::state::StateGenerator;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default Mercadopago authorization endpoint (Argentina site)
pub const DEFAULT_AUTHORIZATION_ENDPOINT: &str = "https://auth.mercadopago.com.ar/authorization";

/// Default Mercadopago OAuth token endpoint
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://api.mercadopago.com/oauth/token";

/// Default Mercadopago REST API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.mercadopago.com/v1";

/// Default CDN serving the Mercadopago client-side SDK
pub const DEFAULT_CDN_BASE: &str = "https://sdk.mercadopago.com";

/// Flat Mercadopago integration settings
///
/// Mirrors the settings a host application configures before the first
/// authorization request. Credentials have no defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Application access token injected into API resource requests and
    /// sent as the bearer credential to the token endpoint
    #[serde(default)]
    pub app_access_token: Option<String>,

    /// Authorization server endpoint the browser is redirected to
    #[serde(default = "default_authorization_endpoint")]
    pub authorization_endpoint: String,

    /// Base URL of the Mercadopago REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Redirect URI registered for the application
    #[serde(default)]
    pub callback_url: Option<String>,

    /// Application client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// Application client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Post-login landing URL
    #[serde(default)]
    pub org_connection_completed_url: Option<String>,

    /// Anti-forgery state round-tripped through the redirect
    #[serde(default)]
    pub state: Option<String>,

    /// Token endpoint used for code exchange and refresh
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,

    /// OAuth response type
    #[serde(default = "default_response_type")]
    pub response_type: String,

    /// Serve the client-side SDK from the host's static path instead of the CDN
    #[serde(default)]
    pub serve_local: bool,

    /// URL prefix under which the host serves static files
    #[serde(default = "default_static_url_path")]
    pub static_url_path: String,

    /// CDN base for the client-side SDK
    #[serde(default = "default_cdn_base")]
    pub cdn_base: String,

    /// Pinned client-side SDK version, if any
    #[serde(default)]
    pub js_version: Option<String>,

    /// Subresource Integrity hash for the pinned SDK version
    #[serde(default)]
    pub js_integrity: Option<String>,
}

fn default_authorization_endpoint() -> String {
    DEFAULT_AUTHORIZATION_ENDPOINT.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

fn default_response_type() -> String {
    "code".to_string()
}

fn default_static_url_path() -> String {
    "/static".to_string()
}

fn default_cdn_base() -> String {
    DEFAULT_CDN_BASE.to_string()
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Parse configuration from a YAML string
    ///
    /// Fields absent from the document take their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use mercadopago_oauth::config::Config;
    ///
    /// let config = Config::from_yaml("client_id: \"1314151617108901\"\n").unwrap();
    /// assert_eq!(config.client_id.as_deref(), Some("1314151617108901"));
    /// assert_eq!(config.response_type, "code");
    /// ```
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| MercadopagoError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| MercadopagoError::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_yaml(&contents)
    }

    /// Fill in defaults that serde cannot provide, never overwriting a
    /// value the host already set
    ///
    /// Currently this only seeds `state` from `generator`.
    pub fn seed_defaults(&mut self, generator: &dyn StateGenerator) {
        if self.state.is_none() {
            self.state = Some(generator.generate());
            tracing::debug!("Seeded anti-forgery state token");
        }
    }

    fn apply_env_vars(&mut self) {
        let optional = |name: &str| std::env::var(name).ok();

        if let Some(v) = optional("MERCADOPAGO_APP_ACCESS_TOKEN") {
            self.app_access_token = Some(v);
        }
        if let Some(v) = optional("MERCADOPAGO_AUTHORIZATION_ENDPOINT") {
            self.authorization_endpoint = v;
        }
        if let Some(v) = optional("MERCADOPAGO_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = optional("MERCADOPAGO_CALLBACK_URL") {
            self.callback_url = Some(v);
        }
        if let Some(v) = optional("MERCADOPAGO_CLIENT_ID") {
            self.client_id = Some(v);
        }
        if let Some(v) = optional("MERCADOPAGO_CLIENT_SECRET") {
            self.client_secret = Some(v);
        }
        if let Some(v) = optional("MERCADOPAGO_ORG_CONNECTION_COMPLETED_URL") {
            self.org_connection_completed_url = Some(v);
        }
        if let Some(v) = optional("MERCADOPAGO_TOKEN_ENDPOINT") {
            self.token_endpoint = v;
        }
        if let Some(v) = optional("MERCADOPAGO_RESPONSE_TYPE") {
            self.response_type = v;
        }

        if let Some(serve_local) = optional("MERCADOPAGO_SERVE_LOCAL") {
            match serve_local.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.serve_local = true,
                "0" | "false" | "no" => self.serve_local = false,
                _ => tracing::warn!("Invalid MERCADOPAGO_SERVE_LOCAL: {}", serve_local),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
        if let Some(client_id) = &cli.client_id {
            self.client_id = Some(client_id.clone());
        }
        if let Some(callback_url) = &cli.callback_url {
            self.callback_url = Some(callback_url.clone());
        }
        if cli.serve_local {
            self.serve_local = true;
        }
    }

    /// Validate the configuration
    ///
    /// Ensures endpoint URLs are absolute and the response type is set.
    /// Credentials are not required here; see
    /// [`validate_credentials`](Self::validate_credentials).
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("authorization_endpoint", &self.authorization_endpoint),
            ("token_endpoint", &self.token_endpoint),
            ("base_url", &self.base_url),
            ("cdn_base", &self.cdn_base),
        ] {
            Url::parse(value).map_err(|e| {
                MercadopagoError::Config(format!("{} is not a valid URL ({}): {}", name, value, e))
            })?;
        }

        if self.response_type.is_empty() {
            return Err(
                MercadopagoError::Config("response_type cannot be empty".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Ensure the credentials needed to complete OAuth are present
    ///
    /// # Errors
    ///
    /// Returns a [`MercadopagoError::Config`] naming the first missing key
    pub fn validate_credentials(&self) -> Result<()> {
        for (name, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("callback_url", &self.callback_url),
            ("app_access_token", &self.app_access_token),
        ] {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(MercadopagoError::Config(format!("{} must be set", name)).into());
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_access_token: None,
            authorization_endpoint: default_authorization_endpoint(),
            base_url: default_base_url(),
            callback_url: None,
            client_id: None,
            client_secret: None,
            org_connection_completed_url: None,
            state: None,
            token_endpoint: default_token_endpoint(),
            response_type: default_response_type(),
            serve_local: false,
            static_url_path: default_static_url_path(),
            cdn_base: default_cdn_base(),
            js_version: None,
            js_integrity: None,
        }
    }
}
