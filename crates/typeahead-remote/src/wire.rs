//! Wire format of the suggestion service.
//!
//! The service answers with a JSON array of `{"sickCd", "sickNm"}` objects.
//! Plain `{code, label}` objects are accepted too, as is an array wrapped in
//! a `{"data": [...]}` envelope.

use serde::Deserialize;
use typeahead_core::{LookupError, Suggestion};

/// Longest error body echoed back in [`LookupError::Status`].
const MAX_MESSAGE_LEN: usize = 200;

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Suggestion>),
    Wrapped { data: Vec<Suggestion> },
}

/// Decode a success body.
pub fn decode_suggestions(body: &[u8]) -> Result<Vec<Suggestion>, LookupError> {
    match serde_json::from_slice::<Payload>(body) {
        Ok(Payload::List(list)) | Ok(Payload::Wrapped { data: list }) => Ok(list),
        Err(e) => Err(LookupError::Decode(e.to_string())),
    }
}

/// Human-readable message for a failed response: a JSON `message` field if
/// present, else the (truncated) body, else the status reason.
pub fn error_message(body: &[u8], reason: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }

    if let Ok(ErrorBody { message }) = serde_json::from_slice(body) {
        return message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return reason.to_string();
    }
    text.chars().take(MAX_MESSAGE_LEN).collect()
}
