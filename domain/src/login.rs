//! Credential lifecycle for one browser session.
//!
//! A session moves from `Unauthenticated` to `AwaitingCallback` when a login starts, and
//! to `Authenticated` once the provider callback is verified and its code exchanged.
//! Logging out returns it to `Unauthenticated` from any state.

use crate::error::{AuthErrorKind, Error};
use crate::gateway::{Credential, Provider, Storage};
use log::*;
use people_auth::oauth::{force_https, PendingLogin};
use serde::Serialize;
use std::sync::Arc;

/// Default lifetime of a started login waiting for its callback.
pub const DEFAULT_PENDING_TTL_SECS: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    Unauthenticated,
    AwaitingCallback,
    Authenticated,
}

/// Drives logins against a provider and keeps each session's credential in storage.
pub struct LoginFlow {
    provider: Arc<dyn Provider>,
    storage: Arc<dyn Storage>,
    pending_ttl: chrono::Duration,
}

impl LoginFlow {
    pub fn new(provider: Arc<dyn Provider>, storage: Arc<dyn Storage>) -> Self {
        Self {
            provider,
            storage,
            pending_ttl: chrono::Duration::seconds(DEFAULT_PENDING_TTL_SECS),
        }
    }

    pub fn with_pending_ttl(mut self, pending_ttl: chrono::Duration) -> Self {
        self.pending_ttl = pending_ttl;
        self
    }

    pub fn provider(&self) -> &dyn Provider {
        self.provider.as_ref()
    }

    /// Where the session currently is in the login lifecycle.
    ///
    /// A login in progress wins over an existing credential: starting a new login while
    /// signed in reports `AwaitingCallback` until it completes or is abandoned.
    pub async fn state(&self, session_id: &str) -> Result<LoginState, Error> {
        if let Some(pending) = self.storage.get_pending(session_id).await? {
            if !pending.is_expired() {
                return Ok(LoginState::AwaitingCallback);
            }
        }
        if self.storage.get(session_id).await?.is_some() {
            return Ok(LoginState::Authenticated);
        }
        Ok(LoginState::Unauthenticated)
    }

    pub async fn is_authenticated(&self, session_id: &str) -> Result<bool, Error> {
        Ok(self.storage.get(session_id).await?.is_some())
    }

    /// Start a login and return the provider consent URL to redirect the browser to.
    ///
    /// `redirect_uri` is upgraded to https before it is sent to the provider. Any earlier
    /// pending login for the session is replaced.
    pub async fn begin_login(&self, session_id: &str, redirect_uri: &str) -> Result<String, Error> {
        let redirect_uri = force_https(redirect_uri);
        let pending = PendingLogin::new(redirect_uri, self.pending_ttl);

        let request = self
            .provider
            .authorization_url(pending.state(), pending.redirect_uri())?;

        self.storage.store_pending(session_id, pending).await?;

        info!("Login started, redirecting to provider consent");
        Ok(request.url)
    }

    /// Finish a login from the provider callback.
    ///
    /// The returned state must match the session's pending login, which must not have
    /// expired, and `redirect_uri` must be the one the login was started with. A
    /// mismatch discards the pending login without calling the provider. A failed
    /// exchange leaves the pending login in place so the session stays `AwaitingCallback`.
    pub async fn complete_login(
        &self,
        session_id: &str,
        returned_state: &str,
        code: &str,
        redirect_uri: &str,
    ) -> Result<(), Error> {
        let pending = match self.storage.get_pending(session_id).await? {
            Some(pending) => pending,
            None => {
                warn!("Login callback received with no login in progress");
                return Err(Error::auth(
                    AuthErrorKind::StateMismatch,
                    "No login in progress for this session",
                ));
            }
        };

        if pending.is_expired() || !pending.matches_state(returned_state) {
            warn!("Login callback state did not match, discarding pending login");
            self.storage.delete_pending(session_id).await?;
            return Err(Error::auth(
                AuthErrorKind::StateMismatch,
                "State parameter does not match the login in progress",
            ));
        }

        let redirect_uri = force_https(redirect_uri);
        if redirect_uri != pending.redirect_uri() {
            warn!(
                "Login callback redirect URI {} differs from {}",
                redirect_uri,
                pending.redirect_uri()
            );
            self.storage.delete_pending(session_id).await?;
            return Err(Error::auth(
                AuthErrorKind::StateMismatch,
                "Redirect URI does not match the login in progress",
            ));
        }

        let credential = self
            .provider
            .exchange_code(code, pending.redirect_uri())
            .await
            .inspect_err(|e| warn!("Failed to exchange authorization code: {e:?}"))?;

        self.storage.store(session_id, credential).await?;
        self.storage.delete_pending(session_id).await?;

        info!("Login completed");
        Ok(())
    }

    /// Forget the session's credential and any login in progress. Idempotent.
    pub async fn logout(&self, session_id: &str) -> Result<(), Error> {
        self.storage.delete(session_id).await?;
        self.storage.delete_pending(session_id).await?;
        debug!("Session logged out");
        Ok(())
    }

    /// The session's credential, or `NotAuthenticated`.
    pub async fn credential(&self, session_id: &str) -> Result<Credential, Error> {
        self.storage.get(session_id).await?.ok_or_else(|| {
            Error::auth(
                AuthErrorKind::NotAuthenticated,
                "No credential stored for this session",
            )
        })
    }

    /// The session's credential, refreshed first if its access token is about to expire
    /// and it carries a refresh token.
    pub async fn fresh_credential(&self, session_id: &str) -> Result<Credential, Error> {
        let credential = self.credential(session_id).await?;
        if credential.is_expired() && credential.refresh_token.is_some() {
            return self.refresh(session_id).await;
        }
        Ok(credential)
    }

    /// Replace the session's credential with a refreshed one.
    pub async fn refresh(&self, session_id: &str) -> Result<Credential, Error> {
        let credential = self.credential(session_id).await?;
        let refreshed = self
            .provider
            .refresh_credential(&credential)
            .await
            .inspect_err(|e| warn!("Failed to refresh credential: {e:?}"))?;

        self.storage.store(session_id, refreshed.clone()).await?;
        debug!("Credential refreshed");
        Ok(refreshed)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StubProvider;
    use super::*;
    use crate::error::{DomainErrorKind, ExternalErrorKind};
    use crate::gateway::MemoryStorage;
    use secrecy::ExposeSecret;

    const SESSION: &str = "session-1";
    const CALLBACK: &str = "http://localhost:5000/login/callback";

    fn flow(provider: StubProvider) -> (LoginFlow, Arc<StubProvider>) {
        let provider = Arc::new(provider);
        let flow = LoginFlow::new(provider.clone(), Arc::new(MemoryStorage::new()));
        (flow, provider)
    }

    fn state_from(url: &str) -> String {
        let url = url::Url::parse(url).unwrap();
        url.query_pairs()
            .find(|(k, _)| k == "state")
            .map(|(_, v)| v.into_owned())
            .unwrap()
    }

    #[tokio::test]
    async fn test_new_session_is_unauthenticated() {
        let (flow, _) = flow(StubProvider::default());
        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::Unauthenticated);
        assert!(!flow.is_authenticated(SESSION).await.unwrap());
    }

    #[tokio::test]
    async fn test_begin_login_forces_https_redirect() {
        let (flow, _) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();

        assert!(url.contains("redirect_uri=https://localhost:5000/login/callback"));
        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::AwaitingCallback);
    }

    #[tokio::test]
    async fn test_full_login_round_trip() {
        let (flow, provider) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        flow.complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap();

        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::Authenticated);
        let credential = flow.credential(SESSION).await.unwrap();
        assert_eq!(credential.access_token.expose_secret(), "access-for-code-1");
        assert_eq!(
            provider.last_redirect_uri.lock().unwrap().as_deref(),
            Some("https://localhost:5000/login/callback")
        );
    }

    #[tokio::test]
    async fn test_state_mismatch_makes_no_network_call() {
        let (flow, provider) = flow(StubProvider::default());

        flow.begin_login(SESSION, CALLBACK).await.unwrap();
        let err = flow
            .complete_login(SESSION, "forged", "code-1", CALLBACK)
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::Auth(AuthErrorKind::StateMismatch));
        assert_eq!(provider.calls(), 0);
        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_callback_without_login_is_state_mismatch() {
        let (flow, provider) = flow(StubProvider::default());

        let err = flow
            .complete_login(SESSION, "anything", "code-1", CALLBACK)
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::Auth(AuthErrorKind::StateMismatch));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_expired_pending_login_is_rejected() {
        let provider = Arc::new(StubProvider::default());
        let flow = LoginFlow::new(provider.clone(), Arc::new(MemoryStorage::new()))
            .with_pending_ttl(chrono::Duration::seconds(-1));

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::Unauthenticated);

        let err = flow
            .complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::Auth(AuthErrorKind::StateMismatch));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_redirect_uri_mismatch_is_rejected() {
        let (flow, provider) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        let err = flow
            .complete_login(SESSION, &state_from(&url), "code-1", "http://evil.test/login/callback")
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::Auth(AuthErrorKind::StateMismatch));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_failure_keeps_login_pending() {
        let (flow, _) = flow(StubProvider {
            fail_exchange: true,
            ..Default::default()
        });

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        let err = flow
            .complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap_err();

        assert_eq!(err.error_kind, DomainErrorKind::External(ExternalErrorKind::Provider));
        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::AwaitingCallback);
        assert!(!flow.is_authenticated(SESSION).await.unwrap());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let (flow, _) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        flow.complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap();

        flow.logout(SESSION).await.unwrap();
        flow.logout(SESSION).await.unwrap();

        assert_eq!(flow.state(SESSION).await.unwrap(), LoginState::Unauthenticated);
        let err = flow.credential(SESSION).await.unwrap_err();
        assert_eq!(err.error_kind, DomainErrorKind::Auth(AuthErrorKind::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let (flow, _) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        flow.complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap();

        assert!(flow.is_authenticated(SESSION).await.unwrap());
        assert!(!flow.is_authenticated("session-2").await.unwrap());
    }

    #[tokio::test]
    async fn test_refresh_replaces_stored_credential() {
        let (flow, _) = flow(StubProvider::default());

        let url = flow.begin_login(SESSION, CALLBACK).await.unwrap();
        flow.complete_login(SESSION, &state_from(&url), "code-1", CALLBACK)
            .await
            .unwrap();

        flow.refresh(SESSION).await.unwrap();

        let credential = flow.credential(SESSION).await.unwrap();
        assert_eq!(credential.access_token.expose_secret(), "refreshed");
    }
}
