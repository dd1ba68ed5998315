//! Mercadopago OAuth authorization-code flow
//!
//! # Module Layout
//!
//! - [`flow`]   -- the flow driver: authorization URLs and token requests
//! - [`params`] -- endpoint names, query strings, token payloads and headers
//! - [`state`]  -- anti-forgery state generation and verification
//! - [`token`]  -- typed token endpoint responses

pub mod flow;
pub mod params;
pub mod state;
pub mod token;

pub use flow::OAuthFlow;
pub use params::{Endpoint, QueryParams, TokenPayload};
pub use state::{verify_state, RandomStateGenerator, StateGenerator};
pub use token::{OAuthToken, TokenResponse};
