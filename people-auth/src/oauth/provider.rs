//! OAuth provider trait and types.

use async_trait::async_trait;

use super::token::Credential;
use crate::error::Error;
use crate::people::{Connections, Person};

/// Scopes requested on every authorization: identity, profile, email and read access
/// to the user's contacts.
pub const SCOPES: [&str; 4] = [
    "openid",
    "https://www.googleapis.com/auth/userinfo.profile",
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/contacts.readonly",
];

/// Authorization request with URL and state management data.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Authorization URL to redirect the user to.
    pub url: String,
    /// CSRF state parameter embedded in the URL.
    pub state: String,
}

/// The identity provider and the directory API it fronts.
///
/// Every method other than `authorization_url` is a network call. Implementations
/// must not retry: an authorization code is single use, so replaying a failed exchange
/// is the caller's decision, made with the user in the loop.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Build the consent URL for the given state token and redirect URI.
    ///
    /// Requests offline access so the exchange yields a refresh token.
    fn authorization_url(&self, state: &str, redirect_uri: &str)
        -> Result<AuthorizationRequest, Error>;

    /// Exchange an authorization code for a credential.
    ///
    /// # Arguments
    ///
    /// * `code` - Authorization code from the OAuth callback
    /// * `redirect_uri` - The redirect URI the authorization request was built with
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Credential, Error>;

    /// Obtain a fresh access token using the credential's refresh token.
    ///
    /// Returns a replacement credential; the refresh token is carried over when the
    /// provider does not issue a new one.
    async fn refresh_credential(&self, credential: &Credential) -> Result<Credential, Error>;

    /// Fetch the signed-in user's own profile.
    async fn fetch_profile(&self, credential: &Credential) -> Result<Person, Error>;

    /// Fetch every connection of the signed-in user.
    async fn fetch_connections(&self, credential: &Credential) -> Result<Connections, Error>;
}
