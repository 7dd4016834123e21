//! OAuth 2.0 authorization-code infrastructure.
//!
//! Provides the provider abstraction, pending-login state tokens and the
//! session-keyed credential store used by the login lifecycle.

mod provider;
mod state;
mod transport;

pub mod providers;
pub mod token;

pub use provider::{AuthorizationRequest, Provider, SCOPES};
pub use state::{generate_token, PendingLogin};
pub use transport::force_https;
