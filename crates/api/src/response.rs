//! Decoding of error bodies returned by the generation service.
//!
//! Success bodies are opaque PDF bytes and are never decoded here. Failure
//! bodies arrive over the same binary channel but carry a JSON document of
//! the form `{ "detail": ... }`; this module reinterprets those bytes as text
//! and extracts the message the user should see.

use coverletter_types::{SERVER_FALLBACK_MESSAGE, SubmitError};
use serde_json::Value;

/// Turns the raw body of a non-2xx response into a [`SubmitError`].
///
/// - a non-empty string `detail` is surfaced verbatim as [`SubmitError::Server`]
/// - a list of validation entries (`[{ "msg": ... }]`) is joined with `"; "`
/// - any other JSON document falls back to [`SERVER_FALLBACK_MESSAGE`]
/// - bytes that are not UTF-8 JSON yield [`SubmitError::Parse`]
pub fn decode_error_body(bytes: &[u8]) -> SubmitError {
    let Ok(text) = std::str::from_utf8(bytes) else {
        return SubmitError::Parse;
    };
    let Ok(body) = serde_json::from_str::<Value>(text) else {
        return SubmitError::Parse;
    };

    match body.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => SubmitError::Server(detail.clone()),
        Some(Value::Array(entries)) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                SubmitError::Server(SERVER_FALLBACK_MESSAGE.to_string())
            } else {
                SubmitError::Server(messages.join("; "))
            }
        }
        _ => SubmitError::Server(SERVER_FALLBACK_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_surfaced_verbatim() {
        let error = decode_error_body(br#"{"detail":"Invalid resume format"}"#);
        assert_eq!(error, SubmitError::Server("Invalid resume format".into()));
    }

    #[test]
    fn validation_entries_are_joined() {
        let body = br#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"value is not a valid email"}]}"#;
        assert_eq!(
            decode_error_body(body),
            SubmitError::Server("field required; value is not a valid email".into())
        );
    }

    #[test]
    fn json_without_detail_uses_server_fallback() {
        assert_eq!(
            decode_error_body(br#"{"error":"boom"}"#),
            SubmitError::Server(SERVER_FALLBACK_MESSAGE.into())
        );
        assert_eq!(
            decode_error_body(br#"{"detail":""}"#),
            SubmitError::Server(SERVER_FALLBACK_MESSAGE.into())
        );
    }

    #[test]
    fn json_that_is_not_an_object_uses_server_fallback() {
        let bodies: [&[u8]; 3] = [br#""oops""#, br#"["a"]"#, b"42"];
        for body in bodies {
            assert_eq!(
                decode_error_body(body),
                SubmitError::Server(SERVER_FALLBACK_MESSAGE.into()),
                "body: {}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn unreadable_bodies_are_parse_errors() {
        assert_eq!(decode_error_body(b"<html>Bad Gateway</html>"), SubmitError::Parse);
        assert_eq!(decode_error_body(&[0xff, 0xfe, 0x00]), SubmitError::Parse);
        assert_eq!(decode_error_body(b""), SubmitError::Parse);
    }
}
