use serde::Serialize;
use utoipa::ToSchema;

pub(crate) mod connection_controller;
pub(crate) mod health_check_controller;
pub(crate) mod oauth_controller;
pub(crate) mod profile_controller;

pub(crate) const NOT_LOGGED_MESSAGE: &str = "No Google account logged. Try to request /login";

/// The `{logged, message}` body returned by login, logout and to sessions without a credential.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct LoginStatus {
    logged: bool,
    message: String,
}

impl LoginStatus {
    pub fn logged_in() -> Self {
        Self {
            logged: true,
            message: "Logged in successfully. Get data requesting /connections".to_string(),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            logged: false,
            message: "Logged out successfully".to_string(),
        }
    }

    pub fn not_logged() -> Self {
        Self {
            logged: false,
            message: NOT_LOGGED_MESSAGE.to_string(),
        }
    }
}

/// Wraps a payload served to a signed-in session, adding `logged: true` beside its fields.
#[derive(Debug, Serialize)]
struct Logged<T: Serialize> {
    logged: bool,
    #[serde(flatten)]
    data: T,
}

impl<T: Serialize> Logged<T> {
    pub fn new(data: T) -> Self {
        Self { logged: true, data }
    }
}
