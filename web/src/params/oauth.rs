use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters Google appends when redirecting back to the callback.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct CallbackParams {
    /// Authorization code to exchange for a credential
    pub(crate) code: Option<String>,
    /// The state token issued by `/login`
    pub(crate) state: Option<String>,
    /// Set instead of `code` when the user denied consent
    pub(crate) error: Option<String>,
}
