/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `authorize` -- Print an authorization URL
- `token`     -- Run a code exchange or a refresh against the token endpoint
- `serve`     -- Run the sample web app

These handlers are small and only wire configuration into the library's
[`Mercadopago`](crate::Mercadopago) integration.
*/

use crate::config::Config;
use crate::error::Result;
use crate::Mercadopago;

// Authorization URL command handler
pub mod authorize {
    //! Prints the URL the user agent is sent to.

    use super::*;
    use crate::oauth::params::{Endpoint, QueryParams};

    /// Builds the authorization URL for `endpoint` from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Loaded configuration
    /// * `endpoint` - Endpoint name, `authorization_endpoint` or `token_endpoint`
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::MercadopagoError::UnknownEndpoint`] for any
    /// other name.
    pub fn authorization_url(config: Config, endpoint: &str) -> Result<String> {
        let endpoint: Endpoint = endpoint.parse()?;
        let mercadopago = Mercadopago::new(config);
        Ok(mercadopago.authorization_url(endpoint, &QueryParams::new()))
    }

    /// Prints the authorization URL to stdout.
    pub fn run(config: Config, endpoint: &str) -> Result<()> {
        let url = authorization_url(config, endpoint)?;
        println!("{}", url);
        Ok(())
    }
}

// Token exchange command handler
pub mod token {
    //! Code exchange and refresh from the command line.
    //!
    //! The raw status and body are printed so failed exchanges can be
    //! inspected as Mercadopago returned them.

    use super::*;

    /// Exchanges an authorization code and prints the response.
    pub async fn exchange(config: Config, code: &str) -> Result<()> {
        config.validate_credentials()?;
        let mercadopago = Mercadopago::new(config);
        tracing::info!("Exchanging authorization code");
        let response = mercadopago.oauth().exchange_code(code).await?;
        print_response(response).await
    }

    /// Exchanges a refresh token and prints the response.
    pub async fn refresh(config: Config, refresh_token: &str) -> Result<()> {
        config.validate_credentials()?;
        let mercadopago = Mercadopago::new(config);
        tracing::info!("Refreshing access token");
        let response = mercadopago.oauth().refresh(refresh_token).await?;
        print_response(response).await
    }

    async fn print_response(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        let body = response.text().await?;
        println!("HTTP {}", status);

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
            Err(_) => println!("{}", body),
        }

        if !status.is_success() {
            tracing::warn!("Token endpoint returned {}", status);
        }
        Ok(())
    }
}

// Sample app command handler
pub mod serve {
    //! Runs the sample host application.

    use super::*;
    use crate::error::MercadopagoError;
    use std::net::SocketAddr;

    /// Parses `addr` and serves the sample app on it.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::Config`] if `addr` is not a socket
    /// address, or any error raised while binding.
    pub async fn run(config: Config, addr: &str) -> Result<()> {
        let addr: SocketAddr = addr.parse().map_err(|e| {
            MercadopagoError::Config(format!("Invalid listen address {}: {}", addr, e))
        })?;

        if config.validate_credentials().is_err() {
            tracing::warn!("Client credentials are incomplete; token exchanges will fail");
        }

        crate::server::serve(Mercadopago::new(config), addr).await
    }
}
