use domain::grouping::ContactFilter;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for listing connections.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct IndexParams {
    /// Include connections without an email address. Any value other than
    /// `false`, `0` or empty turns this on.
    pub(crate) all: Option<String>,
}

impl IndexParams {
    pub(crate) fn filter(&self) -> ContactFilter {
        let all = self.all.as_deref().is_some_and(|value| {
            let value = value.trim();
            !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
        });
        ContactFilter::from_all_flag(all)
    }
}
