//! Transport-security helpers.

use tracing::debug;

const INSECURE_SCHEME: &str = "http://";
const SECURE_SCHEME: &str = "https://";

/// Rewrite a leading `http://` to `https://`.
///
/// Applied to every URL that takes part in the authorization request, the callback
/// comparison and the code exchange. Other schemes and already-secure URLs are returned
/// unchanged.
pub fn force_https(url: &str) -> String {
    match url.strip_prefix(INSECURE_SCHEME) {
        Some(rest) => {
            let secure = format!("{SECURE_SCHEME}{rest}");
            debug!("Upgraded insecure URL to https: {}", secure);
            secure
        }
        None => url.to_string(),
    }
}
