//! OAuth credential and its flat, serializable record form.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, ErrorKind, TokenErrorKind};

/// The token bundle identifying an authenticated session.
///
/// Created by a successful code exchange and replaced wholesale by a refresh. Secrets
/// are redacted from `Debug` output.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Refresh token for obtaining new access tokens.
    pub refresh_token: Option<SecretString>,
    /// Token endpoint used for refreshes.
    pub token_endpoint: Url,
    /// OAuth client the credential was issued to.
    pub client_id: String,
    pub client_secret: SecretString,
    /// Granted scopes.
    pub scopes: BTreeSet<String>,
    /// When the access token expires, if the provider said.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Check if the access token is expired or about to expire soon.
    ///
    /// Returns true if token is expired or will expire within 5 minutes.
    pub fn is_expired(&self) -> bool {
        self.expires_at
            .map(|expires| {
                let now = Utc::now();
                let buffer = chrono::Duration::minutes(5);
                expires <= (now + buffer)
            })
            .unwrap_or(false)
    }

    /// Flatten into the record stored alongside a session.
    pub fn to_record(&self) -> CredentialRecord {
        CredentialRecord {
            token: self.access_token.expose_secret().clone(),
            refresh_token: self
                .refresh_token
                .as_ref()
                .map(|token| token.expose_secret().clone()),
            token_uri: self.token_endpoint.to_string(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.expose_secret().clone(),
            scopes: self.scopes.iter().cloned().collect(),
            expiry: self.expires_at,
        }
    }

    /// Rebuild a credential from its record.
    pub fn from_record(record: CredentialRecord) -> Result<Self, Error> {
        let token_endpoint = Url::parse(&record.token_uri).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Token(TokenErrorKind::InvalidRecord),
        })?;

        Ok(Self {
            access_token: SecretString::from(record.token),
            refresh_token: record.refresh_token.map(SecretString::from),
            token_endpoint,
            client_id: record.client_id,
            client_secret: SecretString::from(record.client_secret),
            scopes: record.scopes.into_iter().collect(),
            expires_at: record.expiry,
        })
    }
}

/// Flat key-value form of a [`Credential`], stable across process restarts.
///
/// Field names follow the usual OAuth client-library layout so a record can be carried
/// in a session cookie or any string-keyed store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub token: String,
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl CredentialRecord {
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Token(TokenErrorKind::InvalidRecord),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Token(TokenErrorKind::InvalidRecord),
        })
    }
}
