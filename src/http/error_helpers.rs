//! Error handling utilities for HTTP responses and error context formatting.

use crate::errors::GancioError;
use reqwest::Response;
use serde::de::DeserializeOwned;

/// Maximum characters of a malformed body to include in parse error messages
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Checks if an HTTP response is successful, returning it if so or an error otherwise.
///
/// Any status of 400 or above counts as a failure.
///
/// # Errors
///
/// Returns [`GancioError::Api`] with the request line, status code and the
/// complete response body on failure.
pub async fn check_response(method: &str, response: Response) -> Result<Response, GancioError> {
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        Err(read_error(method, response).await)
    } else {
        Ok(response)
    }
}

/// Reads a failed response into [`GancioError::Api`].
///
/// The path is taken from the final response URL, query string included. If the
/// body cannot be read, the body field describes the read failure.
pub async fn read_error(method: &str, response: Response) -> GancioError {
    let status_code = response.status().as_u16();
    let path = path_with_query(response.url());

    let body = response
        .text()
        .await
        .unwrap_or_else(|e| format!("Failed to read error body: {}", e));

    GancioError::Api {
        method: method.to_string(),
        path,
        status_code,
        body,
    }
}

fn path_with_query(url: &reqwest::Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Deserializes a success body, wrapping failures with a preview of the JSON.
///
/// # Errors
///
/// Returns [`GancioError::MalformedResponse`] naming `context` when the body does
/// not match `T`.
pub fn deserialize_with_context<T: DeserializeOwned>(
    json_str: &str,
    context: &str,
) -> Result<T, GancioError> {
    serde_json::from_str(json_str).map_err(|e| {
        GancioError::MalformedResponse(format!(
            "{context}: {}",
            format_json_parse_error(json_str, e)
        ))
    })
}

/// Formats JSON parsing context by including a preview of the raw JSON.
pub fn format_json_parse_error(json_str: &str, error: serde_json::Error) -> String {
    let preview = truncate_for_context(json_str, ERROR_BODY_PREVIEW_LENGTH);
    format!("JSON parse error: {} | Context: {}", error, preview)
}

/// Truncates a string to specified length, adding "..." if truncated.
///
/// Uses character-boundary-aware slicing to prevent panics on multi-byte UTF-8 characters.
pub(crate) fn truncate_for_context(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncate_at = s
            .char_indices()
            .take_while(|(i, c)| i + c.len_utf8() <= max_len)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..truncate_at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Event;

    #[test]
    fn test_truncate_for_context_short_string() {
        assert_eq!(truncate_for_context("Short", 100), "Short");
    }

    #[test]
    fn test_truncate_for_context_long_string() {
        let long_str = "a".repeat(300);
        let result = truncate_for_context(&long_str, 200);
        assert_eq!(result.len(), 203);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn test_truncate_for_context_utf8_boundary() {
        // 198 one-byte chars followed by a 4-byte emoji
        let emoji_str = "x".repeat(198) + "🎉";
        let result = truncate_for_context(&emoji_str, 200);
        assert_eq!(result.len(), 201);
        assert!(!result.contains("🎉"));
    }

    #[test]
    fn test_format_json_parse_error() {
        let json = r#"{"invalid": }"#;
        let err = serde_json::from_str::<serde_json::Value>(json).unwrap_err();
        let result = format_json_parse_error(json, err);
        assert!(result.contains("JSON parse error"));
        assert!(result.contains(r#"{"invalid": }"#));
    }

    #[test]
    fn test_deserialize_with_context_names_target() {
        let result = deserialize_with_context::<Event>(r#"{"title": 1}"#, "Event from detail");
        match result {
            Err(GancioError::MalformedResponse(msg)) => {
                assert!(msg.starts_with("Event from detail"));
                assert!(msg.contains(r#"{"title": 1}"#));
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_path_with_query() {
        let url = reqwest::Url::parse("http://localhost:13120/api/place?search=Hall").unwrap();
        assert_eq!(path_with_query(&url), "/api/place?search=Hall");
        let url = reqwest::Url::parse("http://localhost:13120/gancio/api/user").unwrap();
        assert_eq!(path_with_query(&url), "/gancio/api/user");
    }
}
