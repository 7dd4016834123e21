use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use log::*;

use domain::error::{
    AuthErrorKind, DomainErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use crate::controller::LoginStatus;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Domain(DomainError),
    Web(WebErrorKind),
}

/// Failures that originate in the web layer itself.
#[derive(Debug, PartialEq)]
pub enum WebErrorKind {
    /// The cookie session could not be read or written.
    Session,
    /// The request is missing something the handler needs.
    Input,
}

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Domain(domain_error) => domain_error_into_response(domain_error),
            Error::Web(web_error_kind) => match web_error_kind {
                WebErrorKind::Session => {
                    error!("Session store failure");
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
                WebErrorKind::Input => (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response(),
            },
        }
    }
}

fn domain_error_into_response(domain_error: DomainError) -> Response {
    match domain_error.error_kind {
        DomainErrorKind::Auth(AuthErrorKind::NotAuthenticated) => {
            (StatusCode::OK, Json(LoginStatus::not_logged())).into_response()
        }
        DomainErrorKind::Auth(AuthErrorKind::StateMismatch) => {
            warn!("Rejected login callback: {:?}", domain_error.source);
            (StatusCode::BAD_REQUEST, "BAD REQUEST").into_response()
        }
        DomainErrorKind::External(external_error_kind) => {
            warn!("Upstream failure ({external_error_kind:?}): {:?}", domain_error.source);
            match external_error_kind {
                ExternalErrorKind::Network | ExternalErrorKind::Provider => {
                    (StatusCode::BAD_GATEWAY, "BAD GATEWAY").into_response()
                }
            }
        }
        DomainErrorKind::Internal(internal_error_kind) => {
            match &internal_error_kind {
                InternalErrorKind::Payload(kind) => {
                    error!("Unusable provider payload: {kind:?}")
                }
                InternalErrorKind::Config
                | InternalErrorKind::Storage
                | InternalErrorKind::Other(_) => {
                    error!("Internal error ({internal_error_kind:?}): {:?}", domain_error.source)
                }
            }
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
        }
    }
}

impl From<DomainError> for Error {
    fn from(err: DomainError) -> Self {
        Error::Domain(err)
    }
}
