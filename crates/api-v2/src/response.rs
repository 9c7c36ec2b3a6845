//! Status-code policy of the v2 API.
//!
//! Every v2 response goes through [`accept`] before its body is looked at.
//! Authentication problems are never reported as absence.

use dashboard::{DashboardError, DashboardResult, HttpResponse};
use tracing::warn;

use crate::wire::ErrorBody;

/// How a rejection carrying an explanation is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    /// Plain-text 4xx bodies become [`DashboardError::Api`].
    Api,
    /// Any explained rejection becomes [`DashboardError::Validation`]; used
    /// for manifest writes so local and remote validation look the same.
    Validation,
}

/// Decides whether `response` carries the resource.
///
/// Returns `Ok(true)` for the expected status, `Ok(false)` when the resource
/// is absent, and an error when the rejection must be raised:
///
/// 1. 404 → absent.
/// 2. 401/403, or an error message about the API key → authentication error.
///    A JSON body is checked whatever the status; a plain-text body only on
///    a rejection, since manifest files are plain text.
/// 3. `expected` → accepted.
/// 4. An explained 4xx rejection → raised according to `rejection`.
/// 5. Anything else → absent.
pub(crate) fn accept(
    response: &HttpResponse,
    expected: u16,
    rejection: Rejection,
) -> DashboardResult<bool> {
    let status = response.status;
    if status == 404 {
        return Ok(false);
    }

    let message = if status != expected || response.is_json() {
        error_message(response)
    } else {
        None
    };
    if matches!(status, 401 | 403) || message.as_deref().is_some_and(mentions_api_key) {
        return Err(DashboardError::Authentication {
            message: message.unwrap_or_else(|| format!("HTTP {status}")),
        });
    }
    if status == expected {
        return Ok(true);
    }

    match (message, rejection) {
        (Some(message), Rejection::Validation) if (400..500).contains(&status) => {
            Err(DashboardError::validation(message))
        }
        (Some(message), Rejection::Api) if (400..500).contains(&status) && response.is_plain_text() => {
            Err(DashboardError::Api { status, message })
        }
        (message, _) => {
            warn!(status, expected, message = message.as_deref().unwrap_or(""), "unexpected v2 response; treating as absent");
            Ok(false)
        }
    }
}

/// Explanation carried by a rejection: the text of a plain-text body, or the
/// `message` field of a JSON body.
fn error_message(response: &HttpResponse) -> Option<String> {
    if response.is_plain_text() {
        let text = response.body.trim();
        return (!text.is_empty()).then(|| text.to_owned());
    }
    response.json::<ErrorBody>().ok().map(|body| body.message)
}

fn mentions_api_key(message: &str) -> bool {
    let lower = message.to_ascii_lowercase();
    lower.contains("api key") || lower.contains("api-key")
}
