//! Command-line interface definition for the sample app
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands to serve the sample host, print an authorization
//! URL and run token exchanges by hand.

use clap::{Parser, Subcommand};

/// mercadopago-oauth - Mercadopago OAuth sample host
///
/// Connect a Mercadopago account through the authorization-code flow and
/// exchange or refresh its tokens.
#[derive(Parser, Debug, Clone)]
#[command(name = "mercadopago-oauth")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the application's client id
    #[arg(long)]
    pub client_id: Option<String>,

    /// Override the redirect URI registered with Mercadopago
    #[arg(long)]
    pub callback_url: Option<String>,

    /// Serve the client-side SDK from the local static path
    #[arg(long)]
    pub serve_local: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the sample web app
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = "127.0.0.1:5000")]
        addr: String,
    },

    /// Print the authorization URL built from configuration
    AuthorizeUrl {
        /// Endpoint name (authorization_endpoint, token_endpoint)
        #[arg(short, long, default_value = "authorization_endpoint")]
        endpoint: String,
    },

    /// Exchange an authorization code for tokens
    Exchange {
        /// Code returned to the callback URL
        #[arg(long)]
        code: String,
    },

    /// Exchange a refresh token for new tokens
    Refresh {
        /// Refresh token from a previous exchange
        #[arg(long)]
        token: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve_default_addr() {
        let cli = Cli::try_parse_from(["mercadopago-oauth", "serve"]).unwrap();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        if let Commands::Serve { addr } = cli.command {
            assert_eq!(addr, "127.0.0.1:5000");
        } else {
            panic!("Expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_authorize_url_with_endpoint() {
        let cli = Cli::try_parse_from([
            "mercadopago-oauth",
            "authorize-url",
            "--endpoint",
            "token_endpoint",
        ])
        .unwrap();
        if let Commands::AuthorizeUrl { endpoint } = cli.command {
            assert_eq!(endpoint, "token_endpoint");
        } else {
            panic!("Expected AuthorizeUrl command");
        }
    }

    #[test]
    fn test_cli_parse_exchange_requires_code() {
        assert!(Cli::try_parse_from(["mercadopago-oauth", "exchange"]).is_err());

        let cli =
            Cli::try_parse_from(["mercadopago-oauth", "exchange", "--code", "TG-123"]).unwrap();
        assert!(matches!(cli.command, Commands::Exchange { code } if code == "TG-123"));
    }

    #[test]
    fn test_cli_parse_refresh() {
        let cli =
            Cli::try_parse_from(["mercadopago-oauth", "refresh", "--token", "TG-r"]).unwrap();
        assert!(matches!(cli.command, Commands::Refresh { token } if token == "TG-r"));
    }

    #[test]
    fn test_cli_parse_global_overrides() {
        let cli = Cli::try_parse_from([
            "mercadopago-oauth",
            "-v",
            "--client-id",
            "1148860861802028",
            "--serve-local",
            "serve",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(cli.serve_local);
        assert_eq!(cli.client_id.as_deref(), Some("1148860861802028"));
        assert_eq!(cli.callback_url, None);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["mercadopago-oauth"]).is_err());
    }
}
