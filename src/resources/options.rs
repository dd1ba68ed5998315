//! Per-request options for Mercadopago API resources

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{MercadopagoError, Result};

/// Root of the Mercadopago REST API; resource paths carry their own
/// version prefix.
pub const DEFAULT_API_ROOT: &str = "https://api.mercadopago.com";

/// Default connection timeout applied to resource requests.
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(60);

/// Options attached to every request a resource sends.
///
/// The access token is always overwritten with the application access
/// token when the resource is built through
/// [`Mercadopago`](crate::Mercadopago).
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::resources::RequestOptions;
///
/// let options = RequestOptions::default()
///     .with_integrator_id("dev_24c65fb163bf11ea96500242ac130004")
///     .with_custom_header("x-meli-session-id", "device-1");
///
/// assert_eq!(options.base_url, "https://api.mercadopago.com");
/// assert_eq!(options.custom_headers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOptions {
    /// Bearer token sent as `Authorization`
    pub access_token: Option<String>,
    /// Per-request timeout
    pub connection_timeout: Duration,
    /// Extra headers sent verbatim
    pub custom_headers: BTreeMap<String, String>,
    /// `x-corporation-id`
    pub corporation_id: Option<String>,
    /// `x-integrator-id`
    pub integrator_id: Option<String>,
    /// `x-platform-id`
    pub platform_id: Option<String>,
    /// API root the resource paths are appended to
    pub base_url: String,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            access_token: None,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            custom_headers: BTreeMap::new(),
            corporation_id: None,
            integrator_id: None,
            platform_id: None,
            base_url: DEFAULT_API_ROOT.to_string(),
        }
    }
}

impl RequestOptions {
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    pub fn with_custom_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_corporation_id(mut self, id: impl Into<String>) -> Self {
        self.corporation_id = Some(id.into());
        self
    }

    pub fn with_integrator_id(mut self, id: impl Into<String>) -> Self {
        self.integrator_id = Some(id.into());
        self
    }

    pub fn with_platform_id(mut self, id: impl Into<String>) -> Self {
        self.platform_id = Some(id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builds the headers for one request.
    ///
    /// `idempotency_key` is sent as `x-idempotency-key` when present.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::InvalidHeader`] for a header name or
    /// value that is not valid HTTP.
    pub fn headers(&self, idempotency_key: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &self.access_token {
            let bearer = format!("Bearer {}", token);
            headers.insert(AUTHORIZATION, header_value("authorization", &bearer)?);
        }

        let optional = [
            ("x-corporation-id", self.corporation_id.as_deref()),
            ("x-integrator-id", self.integrator_id.as_deref()),
            ("x-platform-id", self.platform_id.as_deref()),
            ("x-idempotency-key", idempotency_key),
        ];
        for (name, value) in optional {
            if let Some(value) = value {
                headers.insert(HeaderName::from_static(name), header_value(name, value)?);
            }
        }

        for (name, value) in &self.custom_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| MercadopagoError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value(name, value)?);
        }

        Ok(headers)
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| MercadopagoError::InvalidHeader(name.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RequestOptions::default();
        assert!(options.access_token.is_none());
        assert_eq!(options.connection_timeout, Duration::from_secs(60));
        assert_eq!(options.base_url, DEFAULT_API_ROOT);
    }

    #[test]
    fn test_headers_include_bearer_and_ids() {
        let options = RequestOptions::default()
            .with_access_token("APP_USR-1")
            .with_corporation_id("corp")
            .with_platform_id("plat");
        let headers = options.headers(Some("key-1")).unwrap();

        assert_eq!(headers[AUTHORIZATION], "Bearer APP_USR-1");
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers["x-corporation-id"], "corp");
        assert_eq!(headers["x-platform-id"], "plat");
        assert_eq!(headers["x-idempotency-key"], "key-1");
        assert!(headers.get("x-integrator-id").is_none());
    }

    #[test]
    fn test_headers_without_token_omit_authorization() {
        let headers = RequestOptions::default().headers(None).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
        assert!(headers.get("x-idempotency-key").is_none());
    }

    #[test]
    fn test_custom_headers_are_sent() {
        let headers = RequestOptions::default()
            .with_custom_header("x-meli-session-id", "device-1")
            .headers(None)
            .unwrap();
        assert_eq!(headers["x-meli-session-id"], "device-1");
    }

    #[test]
    fn test_invalid_custom_header_name() {
        let err = RequestOptions::default()
            .with_custom_header("bad header", "v")
            .headers(None)
            .unwrap_err();
        assert!(err.to_string().contains("bad header"));
    }
}
