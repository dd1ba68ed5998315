//! Query strings, token payloads and headers for the OAuth flow
//!
//! Query values are inserted verbatim: no percent-encoding is applied. A
//! value containing `&`, `=` or spaces appears unescaped in the output and
//! producing a well-formed URL is the caller's responsibility.

use std::fmt;
use std::str::FromStr;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::config::Config;
use crate::error::{MercadopagoError, Result};

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// The two configured OAuth endpoints.
///
/// Parsed from the names `authorization_endpoint` and `token_endpoint`;
/// every other name is rejected.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::oauth::params::Endpoint;
///
/// let endpoint: Endpoint = "token_endpoint".parse().unwrap();
/// assert_eq!(endpoint, Endpoint::Token);
/// assert!("userinfo_endpoint".parse::<Endpoint>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `authorization_endpoint`
    Authorization,
    /// `token_endpoint`
    Token,
}

impl Endpoint {
    /// Returns the configuration name of the endpoint.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::Authorization => "authorization_endpoint",
            Endpoint::Token => "token_endpoint",
        }
    }

    /// Resolves the endpoint to its configured absolute URL.
    pub fn resolve<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Endpoint::Authorization => &config.authorization_endpoint,
            Endpoint::Token => &config.token_endpoint,
        }
    }
}

impl FromStr for Endpoint {
    type Err = MercadopagoError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "authorization_endpoint" => Ok(Endpoint::Authorization),
            "token_endpoint" => Ok(Endpoint::Token),
            other => Err(MercadopagoError::UnknownEndpoint(other.to_string())),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// QueryParams
// ---------------------------------------------------------------------------

/// Per-call overrides for the authorization query string.
///
/// Each `None` field falls back to the matching configuration value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Overrides `response_type`
    pub response_type: Option<String>,
    /// Overrides `client_id`
    pub client_id: Option<String>,
    /// Overrides `state`
    pub state: Option<String>,
    /// Overrides `redirect_uri` (the configured callback URL)
    pub redirect_uri: Option<String>,
}

impl QueryParams {
    /// All values taken from configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the response type.
    pub fn response_type(mut self, value: impl Into<String>) -> Self {
        self.response_type = Some(value.into());
        self
    }

    /// Sets the client id.
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    /// Sets the state.
    pub fn state(mut self, value: impl Into<String>) -> Self {
        self.state = Some(value.into());
        self
    }

    /// Sets the redirect URI.
    pub fn redirect_uri(mut self, value: impl Into<String>) -> Self {
        self.redirect_uri = Some(value.into());
        self
    }
}

/// Builds `response_type=..&client_id=..&state=..&redirect_uri=..`.
///
/// Fields are always emitted in that order; unset configuration values
/// render as empty strings.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::config::Config;
/// use mercadopago_oauth::oauth::params::{build_query_string, QueryParams};
///
/// let config = Config {
///     client_id: Some("1314151617108901".to_string()),
///     state: Some("s1".to_string()),
///     callback_url: Some("http://localhost:5000/callback".to_string()),
///     ..Config::default()
/// };
///
/// assert_eq!(
///     build_query_string(&config, &QueryParams::new()),
///     "response_type=code&client_id=1314151617108901&state=s1&redirect_uri=http://localhost:5000/callback"
/// );
/// ```
pub fn build_query_string(config: &Config, params: &QueryParams) -> String {
    let pick = |explicit: &Option<String>, configured: Option<&str>| -> String {
        explicit
            .as_deref()
            .or(configured)
            .unwrap_or_default()
            .to_string()
    };

    let pairs = [
        (
            "response_type",
            pick(&params.response_type, Some(config.response_type.as_str())),
        ),
        ("client_id", pick(&params.client_id, config.client_id.as_deref())),
        ("state", pick(&params.state, config.state.as_deref())),
        (
            "redirect_uri",
            pick(&params.redirect_uri, config.callback_url.as_deref()),
        ),
    ];

    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds `"{endpoint}?{query_string}"` for the given endpoint.
pub fn build_authorization_url(
    config: &Config,
    endpoint: Endpoint,
    params: &QueryParams,
) -> String {
    format!(
        "{}?{}",
        endpoint.resolve(config),
        build_query_string(config, params)
    )
}

// ---------------------------------------------------------------------------
// TokenPayload
// ---------------------------------------------------------------------------

/// Insertion-ordered parameters sent to the token endpoint.
///
/// Re-inserting an existing key replaces its value in place, so the last
/// write wins while the original position is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPayload {
    entries: Vec<(String, String)>,
}

impl TokenPayload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Returns the value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the payload has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn as_pairs(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Adds `grant_type=authorization_code` and `code`.
    pub fn with_authorization_code(mut self, code: &str) -> Self {
        self.insert("grant_type", "authorization_code");
        self.insert("code", code);
        self
    }

    /// Adds `grant_type=refresh_token` and `refresh_token`.
    pub fn with_refresh_token(mut self, refresh_token: &str) -> Self {
        self.insert("grant_type", "refresh_token");
        self.insert("refresh_token", refresh_token);
        self
    }
}

impl Serialize for TokenPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Builds the base `{client_id, client_secret, redirect_uri}` payload.
///
/// Credentials missing from configuration are left out, so they are not
/// sent at all.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::oauth::params::build_payload;
///
/// let payload = build_payload(Some("123456"), Some("098765"), Some("https://example/"));
/// let keys: Vec<&str> = payload.keys().collect();
/// assert_eq!(keys, ["client_id", "client_secret", "redirect_uri"]);
/// assert_eq!(payload.get("client_secret"), Some("098765"));
/// ```
pub fn build_payload(
    client_id: Option<&str>,
    client_secret: Option<&str>,
    redirect_uri: Option<&str>,
) -> TokenPayload {
    let mut payload = TokenPayload::new();
    for (key, value) in [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("redirect_uri", redirect_uri),
    ] {
        if let Some(value) = value {
            payload.insert(key, value);
        }
    }
    payload
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Builds `Authorization: Bearer <token>` and
/// `Content-Type: application/json`.
///
/// # Errors
///
/// Returns [`MercadopagoError::InvalidHeader`] when the token contains
/// characters not allowed in a header value.
pub fn bearer_headers(access_token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", access_token))
        .map_err(|_| MercadopagoError::InvalidHeader(AUTHORIZATION.to_string()))?;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Config {
        Config {
            client_id: Some("1314151617108901".to_string()),
            client_secret: Some("C8HUg6ErZF".to_string()),
            callback_url: Some("http://localhost:5000/callback".to_string()),
            state: Some("5e092018-0ab8-11ed-8e81-e00af63ae0de".to_string()),
            ..Config::default()
        }
    }

    // -----------------------------------------------------------------------
    // Endpoint
    // -----------------------------------------------------------------------

    #[test]
    fn test_endpoint_parse_known_names() {
        assert_eq!(
            "authorization_endpoint".parse::<Endpoint>().unwrap(),
            Endpoint::Authorization
        );
        assert_eq!("token_endpoint".parse::<Endpoint>().unwrap(), Endpoint::Token);
    }

    #[test]
    fn test_endpoint_parse_unknown_name_fails() {
        let err = "TOKEN_ENDPOINT".parse::<Endpoint>().unwrap_err();
        assert!(matches!(err, MercadopagoError::UnknownEndpoint(ref n) if n == "TOKEN_ENDPOINT"));
    }

    #[test]
    fn test_endpoint_resolves_defaults() {
        let config = Config::default();
        assert_eq!(
            Endpoint::Authorization.resolve(&config),
            "https://auth.mercadopago.com.ar/authorization"
        );
        assert_eq!(
            Endpoint::Token.resolve(&config),
            "https://api.mercadopago.com/oauth/token"
        );
    }

    #[test]
    fn test_endpoint_display_round_trips_name() {
        for endpoint in [Endpoint::Authorization, Endpoint::Token] {
            assert_eq!(endpoint.to_string().parse::<Endpoint>().unwrap(), endpoint);
        }
    }

    // -----------------------------------------------------------------------
    // Query string
    // -----------------------------------------------------------------------

    #[test]
    fn test_query_string_from_config() {
        assert_eq!(
            build_query_string(&configured(), &QueryParams::new()),
            "response_type=code&client_id=1314151617108901\
             &state=5e092018-0ab8-11ed-8e81-e00af63ae0de\
             &redirect_uri=http://localhost:5000/callback"
        );
    }

    #[test]
    fn test_query_string_explicit_values_win() {
        let params = QueryParams::new()
            .response_type("token")
            .client_id("1148860861802028")
            .state("04c9ab49")
            .redirect_uri("http://127.0.0.1/cb");
        assert_eq!(
            build_query_string(&configured(), &params),
            "response_type=token&client_id=1148860861802028&state=04c9ab49&redirect_uri=http://127.0.0.1/cb"
        );
    }

    #[test]
    fn test_query_string_values_are_not_escaped() {
        let params = QueryParams::new().redirect_uri("http://h/cb?a=1&b=two words");
        let qs = build_query_string(&configured(), &params);
        assert!(qs.ends_with("&redirect_uri=http://h/cb?a=1&b=two words"));
    }

    #[test]
    fn test_query_string_unset_values_render_empty() {
        let qs = build_query_string(&Config::default(), &QueryParams::new());
        assert_eq!(qs, "response_type=code&client_id=&state=&redirect_uri=");
    }

    #[test]
    fn test_query_string_is_stable_across_calls() {
        let config = configured();
        let first = build_query_string(&config, &QueryParams::new());
        let second = build_query_string(&config, &QueryParams::new());
        assert_eq!(first, second);
    }

    #[test]
    fn test_authorization_url_joins_endpoint_and_query() {
        let config = configured();
        let qs = build_query_string(&config, &QueryParams::new());
        assert_eq!(
            build_authorization_url(&config, Endpoint::Authorization, &QueryParams::new()),
            format!("https://auth.mercadopago.com.ar/authorization?{qs}")
        );
        assert_eq!(
            build_authorization_url(&config, Endpoint::Token, &QueryParams::new()),
            format!("https://api.mercadopago.com/oauth/token?{qs}")
        );
    }

    // -----------------------------------------------------------------------
    // Payload
    // -----------------------------------------------------------------------

    #[test]
    fn test_build_payload_exact_entries() {
        let payload = build_payload(Some("123456"), Some("098765"), Some("https://example/"));
        assert_eq!(
            payload.as_pairs(),
            &[
                ("client_id".to_string(), "123456".to_string()),
                ("client_secret".to_string(), "098765".to_string()),
                ("redirect_uri".to_string(), "https://example/".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_payload_skips_missing_credentials() {
        let payload = build_payload(None, None, Some("https://example/"));
        assert_eq!(payload.len(), 1);
        assert!(!payload.contains_key("client_id"));
    }

    #[test]
    fn test_payload_with_authorization_code() {
        let payload =
            build_payload(Some("1"), Some("2"), Some("3")).with_authorization_code("TG-1");
        assert_eq!(payload.get("grant_type"), Some("authorization_code"));
        assert_eq!(payload.get("code"), Some("TG-1"));
        assert!(!payload.contains_key("refresh_token"));
    }

    #[test]
    fn test_payload_with_refresh_token() {
        let payload = build_payload(Some("1"), Some("2"), Some("3")).with_refresh_token("TG-2");
        assert_eq!(payload.get("grant_type"), Some("refresh_token"));
        assert_eq!(payload.get("refresh_token"), Some("TG-2"));
        assert!(!payload.contains_key("code"));
    }

    #[test]
    fn test_payload_with_both_refresh_grant_wins() {
        let payload = build_payload(Some("1"), Some("2"), Some("3"))
            .with_authorization_code("TG-1")
            .with_refresh_token("TG-2");
        assert_eq!(payload.get("grant_type"), Some("refresh_token"));
        assert_eq!(payload.get("code"), Some("TG-1"));
        let keys: Vec<&str> = payload.keys().collect();
        assert_eq!(
            keys,
            [
                "client_id",
                "client_secret",
                "redirect_uri",
                "grant_type",
                "code",
                "refresh_token"
            ]
        );
    }

    #[test]
    fn test_payload_serializes_as_ordered_map() {
        let payload = build_payload(Some("1"), None, Some("http://x/"));
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"client_id":"1","redirect_uri":"http://x/"}"#);
    }

    // -----------------------------------------------------------------------
    // Headers
    // -----------------------------------------------------------------------

    #[test]
    fn test_bearer_headers() {
        for token in ["YOUR_ACCESS_TOKEN", "foo", "bar"] {
            let headers = bearer_headers(token).unwrap();
            assert_eq!(headers[AUTHORIZATION], format!("Bearer {token}").as_str());
            assert_eq!(headers[CONTENT_TYPE], "application/json");
            assert_eq!(headers.len(), 2);
        }
    }

    #[test]
    fn test_bearer_headers_rejects_newline() {
        let err = bearer_headers("bad\ntoken").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MercadopagoError>(),
            Some(MercadopagoError::InvalidHeader(_))
        ));
    }
}
