use serde::Deserialize;

use crate::domain::{ErrorCode, Failure};
use crate::transport::translate::ErrorTranslator;

const TOKEN_PREFIX: &str = "Error: ";
const UNKNOWN_MESSAGE: &str = "Unknown Error";

#[derive(Debug, Clone, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
}

/// Turn a failed response body into a [`Failure`].
///
/// - unparseable body or blank `message`: `UNKNOWN_ERROR` / `"Unknown Error"`,
/// - `"Error: <TOKEN>"`: code `TOKEN`, message translated via `translator`,
/// - anything else: `UNKNOWN_ERROR` with the message verbatim.
pub fn classify_error_body(status: u16, body: &str, translator: &ErrorTranslator) -> Failure {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty());

    let Some(message) = message else {
        tracing::debug!(status, "provider error without a readable message");
        return Failure::new(ErrorCode::UNKNOWN_PROVIDER, UNKNOWN_MESSAGE);
    };

    match message.strip_prefix(TOKEN_PREFIX) {
        Some(token) if !token.trim().is_empty() => {
            tracing::debug!(status, token, "provider error");
            Failure::new(ErrorCode::new(token), translator.translate(token))
        }
        _ => {
            tracing::debug!(status, message = %message, "unclassified provider error");
            Failure::new(ErrorCode::UNKNOWN_PROVIDER, message)
        }
    }
}
