//! Google OAuth and People API client.
//!
//! Provides a Google provider configured from the service config.

use crate::error::Error;
use log::*;
use people_auth::http::ClientBuilder;
use people_auth::oauth::providers::google::{GoogleUrls, Provider as GoogleProvider};
use secrecy::SecretString;
use service::config::Config;
use std::time::Duration;

/// Create a Google provider from the service configuration.
///
/// # Returns
///
/// A configured provider, or a `Config` error if the client credentials are missing
/// or an endpoint URL does not parse.
pub fn new_provider(config: &Config) -> Result<GoogleProvider, Error> {
    let client_id = config
        .google_client_id()
        .ok_or_else(|| Error::config("GOOGLE_CLIENT_ID is not set"))?;
    let client_secret = config
        .google_client_secret()
        .ok_or_else(|| Error::config("GOOGLE_CLIENT_SECRET is not set"))?;

    let http_client = ClientBuilder::new()
        .with_timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let urls = GoogleUrls {
        auth_url: config.google_auth_url().to_string(),
        token_url: config.google_token_url().to_string(),
        people_base_url: config.google_people_base_url().to_string(),
    };

    debug!(
        "Configured Google provider: auth_url={}, token_url={}, people_base_url={}",
        urls.auth_url, urls.token_url, urls.people_base_url
    );

    let provider = GoogleProvider::new(client_id, SecretString::from(client_secret), urls, http_client)?;
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, InternalErrorKind};
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["contacts_directory"];
        argv.extend_from_slice(args);
        Config::parse_from(argv)
    }

    #[test]
    fn test_new_provider_requires_client_credentials() {
        let err = new_provider(&config(&[])).err().unwrap();
        assert_eq!(err.error_kind, DomainErrorKind::Internal(InternalErrorKind::Config));
    }

    #[test]
    fn test_new_provider_with_credentials() {
        let config = config(&[]).set_google_credentials("id".to_string(), "secret".to_string());
        assert!(new_provider(&config).is_ok());
    }

    #[test]
    fn test_new_provider_rejects_bad_endpoint() {
        let config = config(&["--google-token-url", "not a url"])
            .set_google_credentials("id".to_string(), "secret".to_string());

        let err = new_provider(&config).err().unwrap();
        assert_eq!(err.error_kind, DomainErrorKind::Internal(InternalErrorKind::Config));
    }
}
