//! HTML for the sample app

use crate::assets::Markup;
use crate::config::Config;
use crate::oauth::token::OAuthToken;

const TITLE: &str = "Mercadopago API with Rust";

/// Minimal escaping for text placed in element bodies and attributes.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, script: &Markup, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        script,
        body
    )
}

fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        name,
        escape_html(value)
    )
}

/// Settings page with the connect form, plus token details once connected.
pub(crate) fn index(
    config: &Config,
    state: &str,
    script: &Markup,
    token: Option<&OAuthToken>,
    api_response: Option<&str>,
) -> String {
    let opt = |v: &Option<String>| escape_html(v.as_deref().unwrap_or_default());

    let mut body = format!(
        "<h1>{}</h1>\n<dl>\n<dt>client_id</dt><dd>{}</dd>\n<dt>callback_url</dt><dd>{}</dd>\n<dt>response_type</dt><dd>{}</dd>\n<dt>base_url</dt><dd>{}</dd>\n</dl>\n",
        TITLE,
        opt(&config.client_id),
        opt(&config.callback_url),
        escape_html(&config.response_type),
        escape_html(&config.base_url),
    );

    body.push_str("<form method=\"post\" action=\"/\">\n");
    body.push_str(&hidden("response_type", &config.response_type));
    body.push_str(&hidden("client_id", config.client_id.as_deref().unwrap_or_default()));
    body.push_str(&hidden("state", state));
    body.push_str(&hidden(
        "callback_url",
        config.callback_url.as_deref().unwrap_or_default(),
    ));
    body.push_str("\n<button type=\"submit\">Connect with Mercadopago</button>\n</form>\n");

    if let Some(token) = token {
        let details = serde_json::to_string_pretty(token).unwrap_or_default();
        body.push_str(&format!(
            "<h2>Access token details</h2>\n<pre>{}</pre>\n<form method=\"post\" action=\"/refresh\"><button type=\"submit\">Refresh token</button></form>\n<a href=\"/logout\">Logout</a>\n",
            escape_html(&details)
        ));
        body.push_str(
            "<h2>Call the API</h2>\n<form method=\"post\" action=\"/call-api\">\n\
             <input type=\"text\" name=\"path\" value=\"/v1/identification_types\">\n\
             <button type=\"submit\">GET</button>\n</form>\n",
        );
        if let Some(api_response) = api_response {
            body.push_str(&format!("<pre>{}</pre>\n", escape_html(api_response)));
        }
    }

    layout(TITLE, script, &body)
}

/// Generic error page.
pub(crate) fn error(message: &str) -> String {
    let title = "Mercadopago API error with Rust";
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<a href=\"/\">Back</a>\n",
        title,
        escape_html(message)
    );
    layout(title, &Markup::new(""), &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_index_contains_form_fields_and_script() {
        let config = Config {
            client_id: Some("1148860861802028".to_string()),
            callback_url: Some("http://localhost:5000/callback".to_string()),
            ..Config::default()
        };
        let script = Markup::new(r#"<script src="https://sdk.mercadopago.com/js/v2"></script>"#);
        let html = index(&config, "abc", &script, None, None);

        assert!(html.contains(r#"name="client_id" value="1148860861802028""#));
        assert!(html.contains(r#"name="state" value="abc""#));
        assert!(html.contains(script.as_str()));
        assert!(!html.contains("Access token details"));
    }

    #[test]
    fn test_error_page_escapes_message() {
        let html = error("<boom>");
        assert!(html.contains("&lt;boom&gt;"));
    }
}
