//! Route handlers for the sample app

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;

use crate::error::MercadopagoError;
use crate::oauth::params::{Endpoint, QueryParams};
use crate::oauth::state::verify_state;
use crate::oauth::token::TokenResponse;
use crate::resources::RequestOptions;
use crate::server::{pages, AppState};

/// Error rendered as the generic error page.
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn bad_request(error: anyhow::Error) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(error: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {:#}", self.error);
        (self.status, Html(pages::error(&self.error.to_string()))).into_response()
    }
}

/// 302 Found, the status browsers follow for the OAuth redirects.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub(crate) async fn index(State(state): State<AppState>) -> Html<String> {
    let session = state.session.read().await;
    let mercadopago = &state.mercadopago;
    Html(pages::index(
        mercadopago.config(),
        mercadopago.state(),
        &mercadopago.load_js(None, None),
        session.token.as_ref(),
        session.api_response.as_deref(),
    ))
}

/// Starts the flow with the state this process issued. Form fields posted
/// by the browser are not trusted for the redirect.
pub(crate) async fn start_oidc(State(state): State<AppState>) -> Response {
    let issued = state.mercadopago.state().to_string();
    let url = state
        .mercadopago
        .authorization_url(Endpoint::Authorization, &QueryParams::new());

    state.session.write().await.pending_state = Some(issued);
    tracing::info!("Redirecting to Mercadopago authorization");
    found(&url)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

pub(crate) async fn process_callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<Response, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::bad_request(
            MercadopagoError::Api(format!("authorization denied: {}", error)).into(),
        ));
    }

    let expected = state
        .session
        .write()
        .await
        .pending_state
        .take()
        .unwrap_or_else(|| state.mercadopago.state().to_string());
    verify_state(&expected, params.state.as_deref()).map_err(AppError::bad_request)?;

    let code = params.code.ok_or_else(|| {
        AppError::bad_request(
            MercadopagoError::Api("authorization code missing from callback".to_string()).into(),
        )
    })?;

    let response = state.mercadopago.oauth().exchange_code(&code).await?;
    let token = TokenResponse::from_response(response).await?.into_oauth_token();
    tracing::info!(user_id = ?token.user_id, "Mercadopago account connected");
    state.session.write().await.token = Some(token);

    let landing = state
        .mercadopago
        .config()
        .org_connection_completed_url
        .clone()
        .unwrap_or_else(|| "/".to_string());
    Ok(found(&landing))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CallApiForm {
    path: String,
}

/// GETs `path` on the API with the connected account's access token.
pub(crate) async fn call_api(
    State(state): State<AppState>,
    Form(form): Form<CallApiForm>,
) -> Result<Response, AppError> {
    let access_token = state
        .session
        .read()
        .await
        .token
        .as_ref()
        .map(|t| t.access_token.clone())
        .ok_or_else(|| {
            AppError::bad_request(
                MercadopagoError::Api("connect an account before calling the API".to_string())
                    .into(),
            )
        })?;

    let path = if form.path.starts_with('/') {
        form.path
    } else {
        format!("/{}", form.path)
    };
    let options = RequestOptions::default()
        .with_access_token(access_token)
        .with_base_url(state.mercadopago.api_root());

    let result = state
        .mercadopago
        .http_client()
        .request(reqwest::Method::GET, &path, &options, &[], None)
        .await?;
    tracing::info!(status = result.status, "Called {}", path);

    let pretty = serde_json::to_string_pretty(&result.response)?;
    state.session.write().await.api_response = Some(pretty);
    Ok(found("/"))
}

pub(crate) async fn refresh_token(State(state): State<AppState>) -> Result<Response, AppError> {
    let refresh = state
        .session
        .read()
        .await
        .token
        .as_ref()
        .and_then(|t| t.refresh_token.clone())
        .ok_or_else(|| {
            AppError::bad_request(
                MercadopagoError::Api("no refresh token in session".to_string()).into(),
            )
        })?;

    let response = state.mercadopago.oauth().refresh(&refresh).await?;
    let token = TokenResponse::from_response(response).await?.into_oauth_token();
    state.session.write().await.token = Some(token);
    tracing::info!("Refreshed Mercadopago access token");
    Ok(found("/"))
}

pub(crate) async fn logout(State(state): State<AppState>) -> Response {
    let mut session = state.session.write().await;
    session.token = None;
    session.api_response = None;
    found("/")
}
