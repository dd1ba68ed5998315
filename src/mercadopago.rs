//! The `Mercadopago` integration object a host application registers once
//!
//! Construction is the configuration bootstrap: defaults are seeded into
//! the host's [`Config`] without overwriting anything it already set, then
//! the configuration is frozen behind an `Arc` and shared by the OAuth
//! flow driver, the asset loader and the resource accessors.

use std::sync::Arc;

use crate::assets::{AssetLoader, Markup};
use crate::config::Config;
use crate::error::Result;
use crate::oauth::flow::OAuthFlow;
use crate::oauth::params::{Endpoint, QueryParams, TokenPayload};
use crate::oauth::state::{RandomStateGenerator, StateGenerator};
use crate::resources::{HttpClient, RequestOptions, Resource, ResourceKind};

/// Mercadopago OAuth and API integration.
///
/// Cheap to clone; every clone shares the same configuration and HTTP
/// connection pool.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::config::Config;
/// use mercadopago_oauth::oauth::params::{Endpoint, QueryParams};
/// use mercadopago_oauth::Mercadopago;
///
/// let mercadopago = Mercadopago::with_state_generator(
///     Config {
///         client_id: Some("1314151617108901".to_string()),
///         callback_url: Some("http://localhost:5000/callback".to_string()),
///         ..Config::default()
///     },
///     &|| "5e092018".to_string(),
/// );
///
/// assert_eq!(
///     mercadopago.authorization_url(Endpoint::Authorization, &QueryParams::new()),
///     "https://auth.mercadopago.com.ar/authorization?response_type=code\
///      &client_id=1314151617108901&state=5e092018\
///      &redirect_uri=http://localhost:5000/callback"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Mercadopago {
    config: Arc<Config>,
    http: Arc<reqwest::Client>,
    flow: OAuthFlow,
}

impl Mercadopago {
    /// Attaches to `config`, seeding a random anti-forgery state if the
    /// host did not provide one.
    pub fn new(config: Config) -> Self {
        Self::with_state_generator(config, &RandomStateGenerator)
    }

    /// Attaches to `config`, seeding `state` from `generator` if unset.
    pub fn with_state_generator(config: Config, generator: &dyn StateGenerator) -> Self {
        Self::with_http_client(config, Arc::new(reqwest::Client::new()), generator)
    }

    /// Attaches to `config` using the host's HTTP client for token
    /// requests and resource calls.
    pub fn with_http_client(
        mut config: Config,
        http: Arc<reqwest::Client>,
        generator: &dyn StateGenerator,
    ) -> Self {
        config.seed_defaults(generator);
        let config = Arc::new(config);
        let flow = OAuthFlow::new(Arc::clone(&http), Arc::clone(&config));

        tracing::debug!(
            authorization_endpoint = %config.authorization_endpoint,
            token_endpoint = %config.token_endpoint,
            serve_local = config.serve_local,
            "Mercadopago integration initialized"
        );

        Self { config, http, flow }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The state embedded in authorization URLs built from configuration.
    pub fn state(&self) -> &str {
        self.config.state.as_deref().unwrap_or_default()
    }

    /// The OAuth flow driver.
    pub fn oauth(&self) -> &OAuthFlow {
        &self.flow
    }

    /// Transport sharing this integration's connection pool.
    pub fn http_client(&self) -> HttpClient {
        HttpClient::from_client(Arc::clone(&self.http))
    }

    /// API root derived from `base_url`, without the version segment.
    pub fn api_root(&self) -> &str {
        api_root(&self.config.base_url)
    }

    // -----------------------------------------------------------------------
    // OAuth
    // -----------------------------------------------------------------------

    /// See [`OAuthFlow::query_string`].
    pub fn query_string(&self, params: &QueryParams) -> String {
        self.flow.query_string(params)
    }

    /// See [`OAuthFlow::location`].
    pub fn location(&self, name: &str) -> Result<&str> {
        self.flow.location(name)
    }

    /// See [`OAuthFlow::authorization_url`].
    pub fn authorization_url(&self, endpoint: Endpoint, params: &QueryParams) -> String {
        self.flow.authorization_url(endpoint, params)
    }

    /// See [`OAuthFlow::payload`].
    pub fn payload(&self) -> TokenPayload {
        self.flow.payload()
    }

    /// See [`OAuthFlow::exchange_token`].
    pub async fn exchange_token(
        &self,
        endpoint: &str,
        access_token: &str,
        authorization_code: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Result<reqwest::Response> {
        self.flow
            .exchange_token(endpoint, access_token, authorization_code, refresh_token)
            .await
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    /// `<script>` tag loading the client-side SDK.
    pub fn load_js(&self, version: Option<&str>, sri: Option<&str>) -> Markup {
        AssetLoader::new(&self.config).load_js(version, sri)
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    /// Builds a handle for `kind`.
    ///
    /// The configured application access token is injected into the
    /// request options, including caller-supplied ones. Without caller
    /// options the API root is derived from `base_url`.
    pub fn resource(
        &self,
        kind: ResourceKind,
        http_client: Option<HttpClient>,
        request_options: Option<RequestOptions>,
    ) -> Resource {
        let http = http_client.unwrap_or_else(|| self.http_client());
        let mut options = request_options
            .unwrap_or_else(|| RequestOptions::default().with_base_url(self.api_root()));
        if let Some(token) = &self.config.app_access_token {
            options.access_token = Some(token.clone());
        }
        Resource::new(kind, options, http)
    }
}

/// Strips the version segment from the configured API base URL.
fn api_root(base_url: &str) -> &str {
    let trimmed = base_url.trim_end_matches('/');
    trimmed.strip_suffix("/v1").unwrap_or(trimmed)
}

macro_rules! resource_accessors {
    ($($name:ident, $name_with:ident => $kind:ident;)*) => {
        impl Mercadopago {
            $(
                #[doc = concat!("`", stringify!($kind), "` resource with default transport and options.")]
                pub fn $name(&self) -> Resource {
                    self.resource(ResourceKind::$kind, None, None)
                }

                #[doc = concat!("`", stringify!($kind), "` resource with optional transport and options overrides.")]
                pub fn $name_with(
                    &self,
                    http_client: Option<HttpClient>,
                    request_options: Option<RequestOptions>,
                ) -> Resource {
                    self.resource(ResourceKind::$kind, http_client, request_options)
                }
            )*
        }
    };
}

resource_accessors! {
    advanced_payment, advanced_payment_with => AdvancedPayment;
    card, card_with => Card;
    card_token, card_token_with => CardToken;
    chargeback, chargeback_with => Chargeback;
    customer, customer_with => Customer;
    disbursement_refund, disbursement_refund_with => DisbursementRefund;
    identification_type, identification_type_with => IdentificationType;
    merchant_order, merchant_order_with => MerchantOrder;
    payment, payment_with => Payment;
    payment_methods, payment_methods_with => PaymentMethods;
    plan, plan_with => Plan;
    preapproval, preapproval_with => PreApproval;
    preference, preference_with => Preference;
    refund, refund_with => Refund;
    subscription, subscription_with => Subscription;
    user, user_with => User;
}
