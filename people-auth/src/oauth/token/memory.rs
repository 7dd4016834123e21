//! In-process credential store.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::{Credential, CredentialRecord, Storage};
use crate::error::Error;
use crate::oauth::PendingLogin;

#[derive(Debug, Default, Clone)]
struct SessionRecord {
    credential: Option<CredentialRecord>,
    pending: Option<PendingLogin>,
}

impl SessionRecord {
    fn is_empty(&self) -> bool {
        self.credential.is_none() && self.pending.is_none()
    }
}

/// [`Storage`] backed by a concurrent map keyed by session id.
///
/// Credentials are kept in their flat [`CredentialRecord`] form, so every read goes
/// through the same reconstruction a cookie- or database-backed store would perform.
/// Each session's entry is guarded by the map's per-key lock.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    sessions: DashMap<String, SessionRecord>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions holding a credential or a pending login.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop pending logins that have expired, and any session left with nothing in it.
    pub fn cleanup_expired(&self) {
        self.sessions.retain(|_, record| {
            if record.pending.as_ref().is_some_and(PendingLogin::is_expired) {
                record.pending = None;
            }
            !record.is_empty()
        });
    }

    fn prune(&self, session_id: &str) {
        self.sessions.remove_if(session_id, |_, record| record.is_empty());
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn store(&self, session_id: &str, credential: Credential) -> Result<(), Error> {
        let record = credential.to_record();
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .credential = Some(record);
        debug!("Stored credential for session");
        Ok(())
    }

    async fn get(&self, session_id: &str) -> Result<Option<Credential>, Error> {
        let record = self
            .sessions
            .get(session_id)
            .and_then(|entry| entry.credential.clone());

        record.map(Credential::from_record).transpose()
    }

    async fn delete(&self, session_id: &str) -> Result<(), Error> {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.credential = None;
        }
        self.prune(session_id);
        Ok(())
    }

    async fn store_pending(&self, session_id: &str, pending: PendingLogin) -> Result<(), Error> {
        self.cleanup_expired();
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .pending = Some(pending);
        Ok(())
    }

    async fn get_pending(&self, session_id: &str) -> Result<Option<PendingLogin>, Error> {
        Ok(self
            .sessions
            .get(session_id)
            .and_then(|entry| entry.pending.clone()))
    }

    async fn delete_pending(&self, session_id: &str) -> Result<(), Error> {
        if let Some(mut entry) = self.sessions.get_mut(session_id) {
            entry.pending = None;
        }
        self.prune(session_id);
        Ok(())
    }
}
