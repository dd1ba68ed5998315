//! Typed view of the Mercadopago token endpoint response
//!
//! [`exchange_token`](super::flow::OAuthFlow::exchange_token) hands back the
//! raw HTTP response. Hosts that want the body as a struct use
//! [`TokenResponse::from_response`] and convert it with
//! [`TokenResponse::into_oauth_token`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{MercadopagoError, Result};

/// Raw JSON body returned by `POST /oauth/token`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub user_id: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub live_mode: Option<bool>,
}

impl TokenResponse {
    /// Reads a token response body, failing on non-success statuses.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::TokenEndpoint`] carrying the status and
    /// body when the server did not answer 2xx, or
    /// [`MercadopagoError::Http`] when the body is not valid token JSON.
    pub async fn from_response(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MercadopagoError::TokenEndpoint {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let token = response
            .json::<TokenResponse>()
            .await
            .map_err(MercadopagoError::Http)?;
        Ok(token)
    }

    /// Converts `expires_in` seconds into an absolute UTC `expires_at`.
    ///
    /// A lifetime too large to represent leaves `expires_at` unset.
    pub fn into_oauth_token(self) -> OAuthToken {
        let expires_at = self
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(chrono::Duration::try_seconds)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        if expires_at.is_none() && self.expires_in.is_some() {
            tracing::warn!("Ignoring out-of-range expires_in: {:?}", self.expires_in);
        }

        OAuthToken {
            access_token: self.access_token,
            token_type: self.token_type,
            expires_at,
            refresh_token: self.refresh_token,
            scope: self.scope,
            user_id: self.user_id,
            public_key: self.public_key,
            live_mode: self.live_mode.unwrap_or(false),
        }
    }
}

/// Token material a host keeps in its session after a successful exchange.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::oauth::token::OAuthToken;
///
/// let token = OAuthToken {
///     access_token: "APP_USR-1".to_string(),
///     token_type: "bearer".to_string(),
///     expires_at: None,
///     refresh_token: None,
///     scope: None,
///     user_id: None,
///     public_key: None,
///     live_mode: false,
/// };
///
/// // A token with no expiry is never considered expired.
/// assert!(!token.is_expired());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default)]
    pub live_mode: bool,
}

impl OAuthToken {
    /// Returns `true` when the access token expires within 60 seconds.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            None => false,
            Some(expires_at) => Utc::now() >= expires_at - chrono::Duration::seconds(60),
        }
    }
}
