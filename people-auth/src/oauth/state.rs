//! CSRF state for a login that is waiting on the provider callback.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// A login started by `/login` whose callback has not arrived yet.
///
/// The state token is echoed back by the provider and must match before any code is
/// exchanged. The redirect URI is kept so the callback can be checked against the exact
/// value the authorization request was built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingLogin {
    state: String,
    redirect_uri: String,
    expires_at: DateTime<Utc>,
}

impl PendingLogin {
    /// Start a pending login with a fresh state token.
    pub fn new(redirect_uri: String, ttl: Duration) -> Self {
        Self {
            state: generate_token(),
            redirect_uri,
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Compare a returned state against this login's token.
    pub fn matches_state(&self, returned: &str) -> bool {
        self.state.as_bytes().ct_eq(returned.as_bytes()).into()
    }
}

/// Generate a cryptographically random token, hex encoded.
pub fn generate_token() -> String {
    let random_bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(random_bytes)
}
