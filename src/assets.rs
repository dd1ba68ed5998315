//! `<script>` tags for the Mercadopago client-side SDK
//!
//! The SDK is loaded either from the Mercadopago CDN or from the host's own
//! static path, optionally pinned with a Subresource Integrity hash.

use std::fmt;

use crate::config::Config;

/// File name of the client-side SDK, both on the CDN and locally.
pub const JS_FILENAME: &str = "v2";

/// Directory under the host's static path holding the local SDK copy.
pub const LOCAL_JS_DIR: &str = "js/mercadopago";

/// HTML that is safe to embed in a template without escaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wraps already-safe HTML.
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    /// Borrow the HTML.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the HTML.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `<script src="{url}"></script>`
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::assets::simple_script;
///
/// assert_eq!(simple_script("https://x/y.js"), r#"<script src="https://x/y.js"></script>"#);
/// ```
pub fn simple_script(url: &str) -> String {
    format!(r#"<script src="{}"></script>"#, url)
}

/// `<script src="{url}" integrity="{sri}" crossorigin="anonymous"></script>`
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::assets::script_with_sri;
///
/// assert_eq!(
///     script_with_sri("https://x/y.js", "sha256-ABC"),
///     r#"<script src="https://x/y.js" integrity="sha256-ABC" crossorigin="anonymous"></script>"#
/// );
/// ```
pub fn script_with_sri(url: &str, sri: &str) -> String {
    format!(
        r#"<script src="{}" integrity="{}" crossorigin="anonymous"></script>"#,
        url, sri
    )
}

/// Renders the SDK `<script>` tag according to the asset settings in
/// [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct AssetLoader<'a> {
    config: &'a Config,
}

impl<'a> AssetLoader<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Script tag for the SDK.
    ///
    /// `version` defaults to the configured `js_version`. An explicit `sri`
    /// always wins; otherwise the configured `js_integrity` is used only
    /// when the requested version is the configured one and the SDK comes
    /// from the CDN.
    pub fn load_js(&self, version: Option<&str>, sri: Option<&str>) -> Markup {
        let version = version.or(self.config.js_version.as_deref());
        let sri = self.resolve_sri(version, sri);
        Markup::new(self.js_script(sri))
    }

    fn resolve_sri(&self, version: Option<&str>, sri: Option<&str>) -> Option<String> {
        if let Some(sri) = sri {
            return Some(sri.to_string());
        }
        if version == self.config.js_version.as_deref() && !self.config.serve_local {
            return self.config.js_integrity.clone();
        }
        None
    }

    /// URL the SDK is loaded from.
    pub fn js_url(&self) -> String {
        if self.config.serve_local {
            format!(
                "{}/{}/{}.js",
                self.config.static_url_path.trim_end_matches('/'),
                LOCAL_JS_DIR,
                JS_FILENAME
            )
        } else {
            format!(
                "{}/js/{}",
                self.config.cdn_base.trim_end_matches('/'),
                JS_FILENAME
            )
        }
    }

    fn js_script(&self, sri: Option<String>) -> String {
        let url = self.js_url();
        match sri.as_deref().filter(|s| !s.is_empty()) {
            Some(sri) => script_with_sri(&url, sri),
            None => simple_script(&url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKE_URL: &str = "https://cdn.jsdelivr.net/npm/fake@2.0/dist/fake.min.js";
    const FAKE_SRI: &str = "sha256-VxL9ZXOItJ0i4nJLm39HIoX8u3cCRPRkDjMSXZ/RiQQ=";

    #[test]
    fn test_simple_script() {
        assert_eq!(
            simple_script(FAKE_URL),
            r#"<script src="https://cdn.jsdelivr.net/npm/fake@2.0/dist/fake.min.js"></script>"#
        );
    }

    #[test]
    fn test_script_with_sri() {
        assert_eq!(
            script_with_sri(FAKE_URL, FAKE_SRI),
            format!(
                r#"<script src="{FAKE_URL}" integrity="{FAKE_SRI}" crossorigin="anonymous"></script>"#
            )
        );
    }

    #[test]
    fn test_load_js_from_cdn() {
        let config = Config::default();
        let js = AssetLoader::new(&config).load_js(None, None);
        assert_eq!(
            js.as_str(),
            r#"<script src="https://sdk.mercadopago.com/js/v2"></script>"#
        );
    }

    #[test]
    fn test_load_js_from_local_static_path() {
        let config = Config {
            serve_local: true,
            ..Config::default()
        };
        let js = AssetLoader::new(&config).load_js(None, None);
        assert_eq!(
            js.as_str(),
            r#"<script src="/static/js/mercadopago/v2.js"></script>"#
        );
    }

    #[test]
    fn test_explicit_sri_wins() {
        let config = Config::default();
        let js = AssetLoader::new(&config).load_js(None, Some("fake_integrity"));
        assert_eq!(
            js.as_str(),
            r#"<script src="https://sdk.mercadopago.com/js/v2" integrity="fake_integrity" crossorigin="anonymous"></script>"#
        );
    }

    #[test]
    fn test_configured_integrity_for_pinned_version() {
        let config = Config {
            js_version: Some("2.0".to_string()),
            js_integrity: Some("sha384-pinned".to_string()),
            ..Config::default()
        };
        let loader = AssetLoader::new(&config);
        assert!(loader
            .load_js(None, None)
            .as_str()
            .contains(r#"integrity="sha384-pinned""#));
        assert!(!loader
            .load_js(Some("2.1"), None)
            .as_str()
            .contains("integrity"));
    }

    #[test]
    fn test_configured_integrity_skipped_when_serving_locally() {
        let config = Config {
            serve_local: true,
            js_version: Some("2.0".to_string()),
            js_integrity: Some("sha384-pinned".to_string()),
            ..Config::default()
        };
        let js = AssetLoader::new(&config).load_js(None, None);
        assert!(!js.as_str().contains("integrity"));
    }

    #[test]
    fn test_markup_display() {
        let markup = Markup::new("<b>x</b>");
        assert_eq!(markup.to_string(), "<b>x</b>");
        assert_eq!(markup.into_string(), "<b>x</b>");
    }
}
