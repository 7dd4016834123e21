//! Storage trait for per-session login state.

use async_trait::async_trait;

use super::Credential;
use crate::error::Error;
use crate::oauth::PendingLogin;

/// Trait for storing and retrieving a session's credential and pending login.
///
/// Every record is owned by exactly one session and is never shared across sessions.
/// Writes replace a session's record wholesale; concurrent writers for the same session
/// resolve to the last write, never to a mix of both.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store the credential for a session, replacing any existing one.
    ///
    /// # Arguments
    ///
    /// * `session_id` - Opaque session identifier
    /// * `credential` - The credential to store
    async fn store(&self, session_id: &str, credential: Credential) -> Result<(), Error>;

    /// Retrieve the credential for a session.
    ///
    /// # Returns
    ///
    /// `Some(Credential)` if found, `None` if not found.
    async fn get(&self, session_id: &str) -> Result<Option<Credential>, Error>;

    /// Delete the credential for a session. Deleting a missing credential is not an error.
    async fn delete(&self, session_id: &str) -> Result<(), Error>;

    /// Store the pending login for a session, replacing any earlier one.
    async fn store_pending(&self, session_id: &str, pending: PendingLogin) -> Result<(), Error>;

    /// Retrieve the pending login for a session without consuming it.
    async fn get_pending(&self, session_id: &str) -> Result<Option<PendingLogin>, Error>;

    /// Delete the pending login for a session. Deleting a missing one is not an error.
    async fn delete_pending(&self, session_id: &str) -> Result<(), Error>;
}
