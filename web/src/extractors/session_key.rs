use crate::error::{Error, WebErrorKind};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use log::*;
use tower_sessions::Session;
use uuid::Uuid;

const SESSION_KEY: &str = "sid";

/// The opaque key this browser session's credential is stored under.
///
/// Allocated on first use and kept in the cookie session from then on.
pub(crate) struct SessionKey(pub String);

impl<S> FromRequestParts<S> for SessionKey
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(status, msg)| {
                error!("Session layer missing ({status}): {msg}");
                Error::Web(WebErrorKind::Session)
            })?;

        let existing = session.get::<String>(SESSION_KEY).await.map_err(|e| {
            warn!("Failed to read session key: {e:?}");
            Error::Web(WebErrorKind::Session)
        })?;

        if let Some(key) = existing {
            return Ok(SessionKey(key));
        }

        let key = Uuid::new_v4().to_string();
        session.insert(SESSION_KEY, &key).await.map_err(|e| {
            warn!("Failed to store session key: {e:?}");
            Error::Web(WebErrorKind::Session)
        })?;
        trace!("Allocated a new session key");

        Ok(SessionKey(key))
    }
}
