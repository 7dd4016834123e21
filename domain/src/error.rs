//! Error types for the `domain` layer.
use people_auth::error::{
    Error as PeopleAuthError, ErrorKind as PeopleAuthErrorKind, HttpErrorKind, OAuthErrorKind,
};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field is used to hold the original error that caused
/// the domain error. `people-auth` errors are translated here so that `web` only ever
/// matches on domain kinds when choosing a response.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
    Auth(AuthErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Payload(PayloadErrorKind),
    Config,
    Storage,
    Other(String),
}

/// A provider payload that parsed but does not carry what the normalizer requires.
/// Never defaulted away: these surface as server errors.
#[derive(Debug, PartialEq)]
pub enum PayloadErrorKind {
    MissingField(String),
    NoPrimaryEmail,
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    /// The provider could not be reached or timed out. Retryable by the caller.
    Network,
    /// The provider answered with a rejection or an unreadable body.
    Provider,
}

/// Errors in the login lifecycle.
#[derive(Debug, PartialEq)]
pub enum AuthErrorKind {
    /// The callback did not match the session's pending login. Fatal to that attempt.
    StateMismatch,
    /// The session holds no credential.
    NotAuthenticated,
}

impl Error {
    pub fn payload(kind: PayloadErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Payload(kind)),
        }
    }

    pub fn auth(kind: AuthErrorKind, message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Auth(kind),
        }
    }

    pub fn config(message: &str) -> Self {
        Error {
            source: Some(message.to_string().into()),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `people-auth` layer to the `domain` layer.
impl From<PeopleAuthError> for Error {
    fn from(err: PeopleAuthError) -> Self {
        let error_kind = match &err.error_kind {
            // Errors that result from issues building the reqwest::Client instance. This
            // type of error will occur prior to any network calls being made.
            PeopleAuthErrorKind::Http(HttpErrorKind::BuilderFailed) => DomainErrorKind::Internal(
                InternalErrorKind::Other("Failed to build reqwest client".to_string()),
            ),
            PeopleAuthErrorKind::Http(_) => DomainErrorKind::External(ExternalErrorKind::Network),
            PeopleAuthErrorKind::OAuth(OAuthErrorKind::InvalidEndpoint) => {
                DomainErrorKind::Internal(InternalErrorKind::Config)
            }
            PeopleAuthErrorKind::OAuth(_) | PeopleAuthErrorKind::People(_) => {
                DomainErrorKind::External(ExternalErrorKind::Provider)
            }
            PeopleAuthErrorKind::Token(_) => DomainErrorKind::Internal(InternalErrorKind::Storage),
        };
        Error {
            source: Some(Box::new(err)),
            error_kind,
        }
    }
}
