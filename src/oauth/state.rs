//! Anti-forgery `state` generation and verification
//!
//! The `state` value is generated once when the driver is constructed and
//! embedded in every authorization URL. Verifying it when the browser comes
//! back is an explicit host-side step: the flow driver never compares it on
//! its own.

use base64::Engine as _;

use crate::error::{MercadopagoError, Result};

/// Source of anti-forgery `state` values.
///
/// Any `Fn() -> String` closure is a generator, which makes the value
/// deterministic in tests:
///
/// ```
/// use mercadopago_oauth::oauth::state::StateGenerator;
///
/// let fixed = || "04c9ab49-09fd-11ed-9e3f-e00af63ae0de".to_string();
/// assert_eq!(fixed.generate(), "04c9ab49-09fd-11ed-9e3f-e00af63ae0de");
/// ```
pub trait StateGenerator: Send + Sync {
    /// Produces a new state value.
    fn generate(&self) -> String;
}

impl<F> StateGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn generate(&self) -> String {
        self()
    }
}

/// Default generator: 16 cryptographically random bytes encoded as
/// base64url without padding (22 characters).
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStateGenerator;

impl StateGenerator for RandomStateGenerator {
    fn generate(&self) -> String {
        use rand::RngCore as _;
        let mut bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }
}

/// Checks the `state` returned on the callback against the one embedded in
/// the authorization request.
///
/// # Errors
///
/// Returns [`MercadopagoError::StateMismatch`] when the values differ or the
/// callback carried no state.
///
/// # Examples
///
/// ```
/// use mercadopago_oauth::oauth::state::verify_state;
///
/// assert!(verify_state("abc", Some("abc")).is_ok());
/// assert!(verify_state("abc", Some("xyz")).is_err());
/// assert!(verify_state("abc", None).is_err());
/// ```
pub fn verify_state(expected: &str, returned: Option<&str>) -> Result<()> {
    match returned {
        Some(actual) if actual == expected => Ok(()),
        other => {
            tracing::warn!("OAuth callback state did not match the issued state");
            Err(MercadopagoError::StateMismatch {
                expected: expected.to_string(),
                actual: other.unwrap_or_default().to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_state_is_url_safe_and_22_chars() {
        let state = RandomStateGenerator.generate();
        assert_eq!(state.len(), 22);
        assert!(state
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_random_state_produces_unique_values() {
        let a = RandomStateGenerator.generate();
        let b = RandomStateGenerator.generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_closure_generator() {
        let generator = || "fixed".to_string();
        assert_eq!(generator.generate(), "fixed");
    }

    #[test]
    fn test_verify_state_mismatch_reports_both_values() {
        let err = verify_state("issued", Some("forged")).unwrap_err();
        match err.downcast_ref::<MercadopagoError>() {
            Some(MercadopagoError::StateMismatch { expected, actual }) => {
                assert_eq!(expected, "issued");
                assert_eq!(actual, "forged");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_verify_state_missing_is_mismatch() {
        let err = verify_state("issued", None).unwrap_err();
        assert!(err.to_string().contains("State mismatch"));
    }
}
