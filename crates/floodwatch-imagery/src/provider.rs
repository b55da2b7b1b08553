//! Provider error-body decoding.

/// Turn a provider error payload into a human-readable message.
///
/// Failure bodies arrive either as (possibly binary-encoded) JSON or as
/// opaque text, depending on which layer of the provider rejected the
/// request. Try JSON first, fall back to a lossy text decode.
pub fn parse_provider_error(bytes: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(bytes) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
        if let Some(error) = value.get("error") {
            if let Some(text) = error.as_str() {
                return text.to_string();
            }
            if let Some(text) = error.get("message").and_then(|m| m.as_str()) {
                return text.to_string();
            }
            return error.to_string();
        }
        return value.to_string();
    }

    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_message_wins() {
        let body = br#"{"message": "Invalid time range", "code": 400}"#;
        assert_eq!(parse_provider_error(body), "Invalid time range");
    }

    #[test]
    fn error_string_is_used_when_message_is_absent() {
        let body = br#"{"error": "invalid_client"}"#;
        assert_eq!(parse_provider_error(body), "invalid_client");
    }

    #[test]
    fn nested_error_message_is_unwrapped() {
        let body = br#"{"error": {"status": 400, "message": "Requested band not present"}}"#;
        assert_eq!(parse_provider_error(body), "Requested band not present");
    }

    #[test]
    fn non_json_falls_back_to_text() {
        assert_eq!(parse_provider_error(b"upstream timeout"), "upstream timeout");
    }

    #[test]
    fn invalid_utf8_still_produces_a_message() {
        let message = parse_provider_error(&[0xff, 0xfe, 0x41]);
        assert!(message.contains('A'));
    }
}
