//! mercadopago-oauth - Mercadopago OAuth sample host
//!
#![doc = "Main entry point for the Mercadopago OAuth sample host."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mercadopago_oauth::cli::{Cli, Commands};
use mercadopago_oauth::commands;
use mercadopago_oauth::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Serve { addr } => {
            tracing::info!("Starting sample app");
            commands::serve::run(config, &addr).await?;
            Ok(())
        }
        Commands::AuthorizeUrl { endpoint } => {
            tracing::debug!("Building authorization URL for {}", endpoint);
            commands::authorize::run(config, &endpoint)?;
            Ok(())
        }
        Commands::Exchange { code } => {
            commands::token::exchange(config, &code).await?;
            Ok(())
        }
        Commands::Refresh { token } => {
            commands::token::refresh(config, &token).await?;
            Ok(())
        }
    }
}

/// Initialize tracing/logging
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` lowers the crate's
/// level to debug.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "mercadopago_oauth=debug"
    } else {
        "mercadopago_oauth=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
