//! Sample host application for the Mercadopago OAuth flow
//!
//! A small axum app showing how a host wires the integration into its
//! routes:
//!
//! - `GET  /`         -- settings page with the connect form and the SDK tag
//! - `POST /`         -- start the flow: remember `state`, 302 to Mercadopago
//! - `GET  /callback` -- verify `state`, exchange `code`, keep the token
//! - `POST /call-api` -- GET an API path with the connected account's token
//! - `POST /refresh`  -- exchange the stored refresh token
//! - `GET  /logout`   -- forget the token
//!
//! Token material lives in a single in-memory [`Session`]; a real host
//! would keep it in its own per-user session store.

mod handlers;
mod pages;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::sync::RwLock;

use crate::error::{MercadopagoError, Result};
use crate::oauth::token::OAuthToken;
use crate::Mercadopago;

pub use handlers::AppError;

/// Token material and pending flow data kept between requests.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// `state` sent with the last authorization redirect
    pub pending_state: Option<String>,
    /// Token obtained from the last successful exchange
    pub token: Option<OAuthToken>,
    /// Pretty-printed body of the last `/call-api` request
    pub api_response: Option<String>,
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub mercadopago: Mercadopago,
    pub session: Arc<RwLock<Session>>,
}

impl AppState {
    pub fn new(mercadopago: Mercadopago) -> Self {
        Self {
            mercadopago,
            session: Arc::new(RwLock::new(Session::default())),
        }
    }
}

/// Builds the sample app's routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::start_oidc))
        .route("/callback", get(handlers::process_callback))
        .route("/call-api", post(handlers::call_api))
        .route("/refresh", post(handlers::refresh_token))
        .route("/logout", get(handlers::logout))
        .with_state(state)
}

/// Serves the sample app until the process is stopped.
///
/// # Errors
///
/// Returns [`MercadopagoError::Io`] if the address cannot be bound.
pub async fn serve(mercadopago: Mercadopago, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(MercadopagoError::Io)?;
    let local = listener.local_addr().map_err(MercadopagoError::Io)?;
    tracing::info!("Listening on http://{}", local);

    axum::serve(listener, router(AppState::new(mercadopago)))
        .await
        .map_err(MercadopagoError::Io)?;
    Ok(())
}
