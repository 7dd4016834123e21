//! Google OAuth provider implementation.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Response;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{
    oauth_error, people_error, Error, ErrorKind, OAuthErrorKind, PeopleErrorKind,
};
use crate::oauth::token::Credential;
use crate::oauth::{AuthorizationRequest, SCOPES};
use crate::people::{
    Connections, ConnectionsPage, Person, CONNECTIONS_PAGE_SIZE, CONNECTION_FIELDS, PROFILE_FIELDS,
};

/// Default Google OAuth 2.0 authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
/// Default Google OAuth 2.0 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
/// Default People API base URL.
pub const DEFAULT_PEOPLE_BASE_URL: &str = "https://people.googleapis.com/v1";

/// Token response from Google.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scope: Option<String>,
}

/// Configurable Google endpoint URLs.
#[derive(Debug, Clone)]
pub struct GoogleUrls {
    pub auth_url: String,
    pub token_url: String,
    pub people_base_url: String,
}

impl Default for GoogleUrls {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            people_base_url: DEFAULT_PEOPLE_BASE_URL.to_string(),
        }
    }
}

/// Google OAuth provider.
///
/// Handles the OAuth 2.0 authorization-code flow for Google accounts and reads the
/// signed-in user's profile and connections from the People API.
pub struct Provider {
    client_id: String,
    client_secret: SecretString,
    auth_url: Url,
    token_url: Url,
    people_base_url: String,
    http_client: reqwest::Client,
}

impl Provider {
    /// Create a new Google OAuth provider.
    ///
    /// # Arguments
    ///
    /// * `client_id` - Google OAuth client ID
    /// * `client_secret` - Google OAuth client secret
    /// * `urls` - Endpoint URLs, overridable for tests
    /// * `http_client` - Shared HTTP client
    pub fn new(
        client_id: String,
        client_secret: SecretString,
        urls: GoogleUrls,
        http_client: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            client_id,
            client_secret,
            auth_url: parse_endpoint(&urls.auth_url)?,
            token_url: parse_endpoint(&urls.token_url)?,
            people_base_url: urls.people_base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn credential_from(&self, response: TokenResponse, previous_refresh: Option<&SecretString>) -> Credential {
        let scopes = match response.scope {
            Some(scope) if !scope.trim().is_empty() => {
                scope.split_whitespace().map(str::to_string).collect()
            }
            _ => SCOPES.iter().map(|s| s.to_string()).collect(),
        };

        Credential {
            access_token: SecretString::from(response.access_token),
            refresh_token: response
                .refresh_token
                .map(SecretString::from)
                .or_else(|| previous_refresh.cloned()),
            token_endpoint: self.token_url.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            scopes,
            expires_at: response
                .expires_in
                .map(|seconds| Utc::now() + Duration::seconds(seconds)),
        }
    }

    async fn people_get<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = format!("{}/{}", self.people_base_url, path);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(credential.access_token.expose_secret())
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to reach People API {}: {:?}", path, e);
                Error::from(e)
            })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!("People API error on {}: {}", path, message);
            return Err(people_error(PeopleErrorKind::RequestFailed, &message));
        }

        decode(response, ErrorKind::People(PeopleErrorKind::InvalidResponse)).await
    }
}

#[async_trait]
impl crate::oauth::Provider for Provider {
    fn authorization_url(
        &self,
        state: &str,
        redirect_uri: &str,
    ) -> Result<AuthorizationRequest, Error> {
        let scopes = SCOPES.join(" ");
        let mut url = self.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &scopes)
            .append_pair("access_type", "offline")
            .append_pair("include_granted_scopes", "true")
            .append_pair("prompt", "consent")
            .append_pair("state", state);

        Ok(AuthorizationRequest {
            url: url.to_string(),
            state: state.to_string(),
        })
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<Credential, Error> {
        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_str()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging Google OAuth code for tokens");

        let response = self
            .http_client
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to exchange Google OAuth code: {:?}", e);
                Error::from(e)
            })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!("Google OAuth error: {}", message);
            return Err(oauth_error(OAuthErrorKind::TokenExchangeFailed, &message));
        }

        let tokens: TokenResponse =
            decode(response, ErrorKind::OAuth(OAuthErrorKind::InvalidResponse)).await?;
        info!("Successfully exchanged Google OAuth code for tokens");

        Ok(self.credential_from(tokens, None))
    }

    async fn refresh_credential(&self, credential: &Credential) -> Result<Credential, Error> {
        let refresh_token = credential.refresh_token.as_ref().ok_or_else(|| {
            oauth_error(
                OAuthErrorKind::TokenRefreshFailed,
                "No refresh token available",
            )
        })?;

        let form = [
            ("refresh_token", refresh_token.expose_secret().as_str()),
            ("client_id", credential.client_id.as_str()),
            ("client_secret", credential.client_secret.expose_secret().as_str()),
            ("grant_type", "refresh_token"),
        ];

        debug!("Refreshing Google access token");

        let response = self
            .http_client
            .post(credential.token_endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to refresh Google token: {:?}", e);
                Error::from(e)
            })?;

        if !response.status().is_success() {
            let message = failure_message(response).await;
            warn!("Google token refresh error: {}", message);
            return Err(oauth_error(OAuthErrorKind::TokenRefreshFailed, &message));
        }

        let tokens: TokenResponse =
            decode(response, ErrorKind::OAuth(OAuthErrorKind::InvalidResponse)).await?;
        info!("Successfully refreshed Google access token");

        // Google does not rotate refresh tokens, so the response usually omits it.
        Ok(self.credential_from(tokens, Some(refresh_token)))
    }

    async fn fetch_profile(&self, credential: &Credential) -> Result<Person, Error> {
        debug!("Fetching signed-in user's profile");
        self.people_get(credential, "people/me", &[("personFields", PROFILE_FIELDS)])
            .await
    }

    async fn fetch_connections(&self, credential: &Credential) -> Result<Connections, Error> {
        let page_size = CONNECTIONS_PAGE_SIZE.to_string();
        let mut connections = Connections::default();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![
                ("personFields", CONNECTION_FIELDS),
                ("pageSize", page_size.as_str()),
            ];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: ConnectionsPage = self
                .people_get(credential, "people/me/connections", &query)
                .await?;
            let next = page.next_page_token.clone().filter(|t| !t.is_empty());
            connections.extend_with(page);

            match next {
                Some(token) if page_token.as_deref() == Some(token.as_str()) => {
                    warn!("People API repeated page token, stopping pagination");
                    break;
                }
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!("Fetched {} connections", connections.people.len());
        Ok(connections)
    }
}

fn parse_endpoint(url: &str) -> Result<Url, Error> {
    Url::parse(url).map_err(|e| Error {
        source: Some(Box::new(e)),
        error_kind: ErrorKind::OAuth(OAuthErrorKind::InvalidEndpoint),
    })
}

async fn failure_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("{status}: {body}")
}

async fn decode<T: DeserializeOwned>(response: Response, invalid: ErrorKind) -> Result<T, Error> {
    response.json::<T>().await.map_err(|e| {
        warn!("Failed to parse Google response: {:?}", e);
        Error {
            source: Some(Box::new(e)),
            error_kind: invalid,
        }
    })
}
