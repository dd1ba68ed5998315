//! Mercadopago API resource handles
//!
//! A [`Resource`] pairs a [`ResourceKind`] with the [`RequestOptions`] and
//! [`HttpClient`] used to reach it. Resources are pass-through: they build
//! the path, attach the bearer token and return the API's status and JSON
//! body without interpreting them.
//!
//! # Module Layout
//!
//! - [`http`]    -- transport and [`ApiResponse`]
//! - [`options`] -- [`RequestOptions`] value object

pub mod http;
pub mod options;

use std::fmt;

use reqwest::Method;

use crate::error::{MercadopagoError, Result};

pub use http::{ApiResponse, HttpClient};
pub use options::RequestOptions;

/// Placeholder substituted with the parent id in nested resource paths.
const PARENT: &str = "{parent}";

/// The closed set of API resources reachable through the accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    AdvancedPayment,
    Card,
    CardToken,
    Chargeback,
    Customer,
    DisbursementRefund,
    IdentificationType,
    MerchantOrder,
    Payment,
    PaymentMethods,
    Plan,
    PreApproval,
    Preference,
    Refund,
    Subscription,
    User,
}

impl ResourceKind {
    /// Every kind, in accessor order.
    pub const ALL: [ResourceKind; 16] = [
        ResourceKind::AdvancedPayment,
        ResourceKind::Card,
        ResourceKind::CardToken,
        ResourceKind::Chargeback,
        ResourceKind::Customer,
        ResourceKind::DisbursementRefund,
        ResourceKind::IdentificationType,
        ResourceKind::MerchantOrder,
        ResourceKind::Payment,
        ResourceKind::PaymentMethods,
        ResourceKind::Plan,
        ResourceKind::PreApproval,
        ResourceKind::Preference,
        ResourceKind::Refund,
        ResourceKind::Subscription,
        ResourceKind::User,
    ];

    /// Path template relative to the API root. Nested kinds contain
    /// `{parent}`.
    pub fn path_template(&self) -> &'static str {
        match self {
            ResourceKind::AdvancedPayment => "/v1/advanced_payments",
            ResourceKind::Card => "/v1/customers/{parent}/cards",
            ResourceKind::CardToken => "/v1/card_tokens",
            ResourceKind::Chargeback => "/v1/chargebacks",
            ResourceKind::Customer => "/v1/customers",
            ResourceKind::DisbursementRefund => "/v1/advanced_payments/{parent}/refunds",
            ResourceKind::IdentificationType => "/v1/identification_types",
            ResourceKind::MerchantOrder => "/merchant_orders",
            ResourceKind::Payment => "/v1/payments",
            ResourceKind::PaymentMethods => "/v1/payment_methods",
            ResourceKind::Plan => "/preapproval_plan",
            ResourceKind::PreApproval | ResourceKind::Subscription => "/preapproval",
            ResourceKind::Preference => "/checkout/preferences",
            ResourceKind::Refund => "/v1/payments/{parent}/refunds",
            ResourceKind::User => "/users/me",
        }
    }

    /// Whether the path needs a parent id.
    pub fn is_nested(&self) -> bool {
        self.path_template().contains(PARENT)
    }

    /// Whether the API exposes `{path}/search` for this kind.
    pub fn supports_search(&self) -> bool {
        matches!(
            self,
            ResourceKind::AdvancedPayment
                | ResourceKind::Customer
                | ResourceKind::MerchantOrder
                | ResourceKind::Payment
                | ResourceKind::Plan
                | ResourceKind::PreApproval
                | ResourceKind::Preference
                | ResourceKind::Subscription
        )
    }

    /// snake_case name, matching the accessor method.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::AdvancedPayment => "advanced_payment",
            ResourceKind::Card => "card",
            ResourceKind::CardToken => "card_token",
            ResourceKind::Chargeback => "chargeback",
            ResourceKind::Customer => "customer",
            ResourceKind::DisbursementRefund => "disbursement_refund",
            ResourceKind::IdentificationType => "identification_type",
            ResourceKind::MerchantOrder => "merchant_order",
            ResourceKind::Payment => "payment",
            ResourceKind::PaymentMethods => "payment_methods",
            ResourceKind::Plan => "plan",
            ResourceKind::PreApproval => "preapproval",
            ResourceKind::Preference => "preference",
            ResourceKind::Refund => "refund",
            ResourceKind::Subscription => "subscription",
            ResourceKind::User => "user",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Handle to one API resource.
///
/// # Examples
///
/// ```no_run
/// use mercadopago_oauth::config::Config;
/// use mercadopago_oauth::Mercadopago;
///
/// # async fn example() -> mercadopago_oauth::error::Result<()> {
/// let mercadopago = Mercadopago::new(Config {
///     app_access_token: Some("APP_USR-...".to_string()),
///     ..Config::default()
/// });
///
/// let payment = mercadopago.payment().find_by_id("1234567").await?;
/// println!("{} {}", payment.status, payment.response);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Resource {
    kind: ResourceKind,
    options: RequestOptions,
    http: HttpClient,
    parent: Option<String>,
}

impl Resource {
    pub fn new(kind: ResourceKind, options: RequestOptions, http: HttpClient) -> Self {
        Self {
            kind,
            options,
            http,
            parent: None,
        }
    }

    /// Scopes a nested resource (cards, refunds) to its parent id.
    pub fn for_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Some(parent_id.into());
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn request_options(&self) -> &RequestOptions {
        &self.options
    }

    /// Resolved path relative to the API root.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::Api`] for a nested kind with no parent.
    pub fn path(&self) -> Result<String> {
        let template = self.kind.path_template();
        if !self.kind.is_nested() {
            return Ok(template.to_string());
        }
        match &self.parent {
            Some(parent) => Ok(template.replace(PARENT, &path_segment(parent)?)),
            None => Err(MercadopagoError::Api(format!(
                "{} requires a parent id; call for_parent first",
                self.kind
            ))
            .into()),
        }
    }

    /// Path of a single item, `{path}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`MercadopagoError::Api`] for an empty, `.` or `..` id, or
    /// when [`path`](Self::path) fails.
    pub fn item_path(&self, id: &str) -> Result<String> {
        Ok(format!("{}/{}", self.path()?, path_segment(id)?))
    }

    /// `GET {path}/{id}`
    pub async fn find_by_id(&self, id: &str) -> Result<ApiResponse> {
        let path = self.item_path(id)?;
        self.send(Method::GET, &path, &[], None).await
    }

    /// `GET {path}` with optional filters, e.g. a customer's cards or the
    /// identification types of the account's site.
    pub async fn list(&self, filters: &[(&str, &str)]) -> Result<ApiResponse> {
        let path = self.path()?;
        self.send(Method::GET, &path, filters, None).await
    }

    /// `GET {path}/search` where the API offers it, otherwise `GET {path}`.
    pub async fn search(&self, filters: &[(&str, &str)]) -> Result<ApiResponse> {
        let mut path = self.path()?;
        if self.kind.supports_search() {
            path.push_str("/search");
        }
        self.send(Method::GET, &path, filters, None).await
    }

    /// `POST {path}`
    pub async fn create(&self, body: &serde_json::Value) -> Result<ApiResponse> {
        let path = self.path()?;
        self.send(Method::POST, &path, &[], Some(body)).await
    }

    /// `PUT {path}/{id}`
    pub async fn update(&self, id: &str, body: &serde_json::Value) -> Result<ApiResponse> {
        let path = self.item_path(id)?;
        self.send(Method::PUT, &path, &[], Some(body)).await
    }

    /// `DELETE {path}/{id}`
    pub async fn delete(&self, id: &str) -> Result<ApiResponse> {
        let path = self.item_path(id)?;
        self.send(Method::DELETE, &path, &[], None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
    ) -> Result<ApiResponse> {
        self.http
            .request(method, path, &self.options, query, body)
            .await
    }
}

/// Percent-encodes an id so it stays a single path segment.
fn path_segment(id: &str) -> Result<String> {
    if matches!(id, "" | "." | "..") {
        return Err(MercadopagoError::Api(format!("invalid resource id: {:?}", id)).into());
    }
    Ok(url::form_urlencoded::byte_serialize(id.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resource(kind: ResourceKind) -> Resource {
        Resource::new(kind, RequestOptions::default(), HttpClient::new().unwrap())
    }

    #[test]
    fn test_all_kinds_have_unique_names() {
        let mut names: Vec<&str> = ResourceKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ResourceKind::ALL.len());
    }

    #[test]
    fn test_flat_resource_path() {
        assert_eq!(resource(ResourceKind::Payment).path().unwrap(), "/v1/payments");
        assert_eq!(resource(ResourceKind::User).path().unwrap(), "/users/me");
    }

    #[test]
    fn test_nested_resource_requires_parent() {
        let err = resource(ResourceKind::Card).path().unwrap_err();
        assert!(err.to_string().contains("card requires a parent id"));
    }

    #[test]
    fn test_nested_resource_path_with_parent() {
        let cards = resource(ResourceKind::Card).for_parent("123-abc");
        assert_eq!(cards.path().unwrap(), "/v1/customers/123-abc/cards");

        let refunds = resource(ResourceKind::Refund).for_parent("987");
        assert_eq!(refunds.path().unwrap(), "/v1/payments/987/refunds");
    }

    #[test]
    fn test_item_path_encodes_reserved_characters() {
        let payments = resource(ResourceKind::Payment);
        assert_eq!(payments.item_path("1234567").unwrap(), "/v1/payments/1234567");
        assert_eq!(payments.item_path("../x").unwrap(), "/v1/payments/..%2Fx");
        assert_eq!(payments.item_path("a?b#c").unwrap(), "/v1/payments/a%3Fb%23c");
        assert_eq!(payments.item_path("a b").unwrap(), "/v1/payments/a%20b");
    }

    #[test]
    fn test_item_path_rejects_dot_segments() {
        let payments = resource(ResourceKind::Payment);
        for id in ["", ".", ".."] {
            let err = payments.item_path(id).unwrap_err();
            assert!(err.to_string().contains("invalid resource id"));
        }
    }

    #[test]
    fn test_parent_id_is_encoded() {
        let cards = resource(ResourceKind::Card).for_parent("1/../../users");
        assert_eq!(cards.path().unwrap(), "/v1/customers/1%2F..%2F..%2Fusers/cards");
        assert!(resource(ResourceKind::Card).for_parent("..").path().is_err());
    }

    #[test]
    fn test_subscription_shares_preapproval_path() {
        assert_eq!(
            ResourceKind::Subscription.path_template(),
            ResourceKind::PreApproval.path_template()
        );
    }

    #[test]
    fn test_nested_kinds() {
        let nested: Vec<ResourceKind> = ResourceKind::ALL
            .into_iter()
            .filter(ResourceKind::is_nested)
            .collect();
        assert_eq!(
            nested,
            [
                ResourceKind::Card,
                ResourceKind::DisbursementRefund,
                ResourceKind::Refund
            ]
        );
    }
}
