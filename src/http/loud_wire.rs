//! Wire-level debugging via LOUD_WIRE environment variable.
//!
//! When `LOUD_WIRE` is set to any value, prints API requests and responses to
//! stderr with pretty formatting and colors.
//!
//! # Usage
//!
//! ```bash
//! LOUD_WIRE=1 cargo test --test integration_tests -- --ignored
//! ```
//!
//! # Output Format
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - Timestamps and request IDs for correlation
//!
//! Passwords and tokens are redacted. File parts are summarized by size.

use super::payload::{IMAGE_PART, PLACEHOLDER_PART, Payload};
use colored::Colorize;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Cached check for whether LOUD_WIRE is enabled
static ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if LOUD_WIRE debugging is enabled.
///
/// The result is cached after first check, so `LOUD_WIRE` must be set before
/// the first API call is made.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Keys whose values never reach the terminal.
const REDACT_FIELDS: &[&str] = &["password", "access_token", "refresh_token"];

const REDACTED: &str = "<redacted>";

/// Maximum length of a non-JSON response body before truncation.
const BODY_PREVIEW_LENGTH: usize = 1000;

fn redact_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if REDACT_FIELDS.contains(&key.as_str()) {
                    *val = serde_json::Value::String(REDACTED.to_string());
                } else {
                    redact_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => arr.iter_mut().for_each(redact_json),
        _ => {}
    }
}

fn redact_pair(key: &str, value: &str) -> String {
    if REDACT_FIELDS.contains(&key) {
        format!("{key} = {REDACTED}")
    } else {
        format!("{key} = {value}")
    }
}

/// Renders a payload as display lines, redacted.
fn describe_payload(payload: &Payload) -> Vec<String> {
    match payload {
        Payload::Empty => Vec::new(),
        Payload::Query(pairs) | Payload::Form(pairs) => {
            pairs.iter().map(|(k, v)| redact_pair(k, v)).collect()
        }
        Payload::Json(body) => {
            let mut body = body.clone();
            redact_json(&mut body);
            colored_json::to_colored_json_auto(&body)
                .ok()
                .or_else(|| serde_json::to_string_pretty(&body).ok())
                .map(|s| s.lines().map(String::from).collect())
                .unwrap_or_default()
        }
        Payload::Multipart { fields, image } => {
            let mut lines: Vec<String> = fields.iter().map(|(k, v)| redact_pair(k, v)).collect();
            lines.push(match image {
                Some(image) => format!(
                    "{IMAGE_PART} = <file \"{}\", {} bytes>",
                    image.file_name,
                    image.bytes.len()
                ),
                None => format!("{PLACEHOLDER_PART} = <empty file>"),
            });
            lines
        }
    }
}

fn payload_label(payload: &Payload) -> &'static str {
    match payload {
        Payload::Empty => "",
        Payload::Query(_) => "Query",
        Payload::Json(_) => "Body (JSON)",
        Payload::Form(_) => "Body (form)",
        Payload::Multipart { .. } => "Body (multipart)",
    }
}

/// Format the current timestamp for log output.
fn timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Log prefix with timestamp and request ID.
fn prefix(request_id: usize) -> String {
    let ts = timestamp().dimmed();
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        ts,
        format!("[REQ#{}]", request_id).cyan()
    )
}

/// Log an outgoing HTTP request.
pub fn log_request(request_id: usize, method: &str, url: &str, authenticated: bool, payload: &Payload) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = ">>>".green().bold();
    let auth = if authenticated { " (bearer)" } else { "" };

    eprintln!("{prefix} {direction} {method} {url}{auth}");

    let lines = describe_payload(payload);
    if !lines.is_empty() {
        eprintln!("{prefix} {}:", payload_label(payload).green());
        for line in lines {
            eprintln!("{prefix}   {line}");
        }
    }
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    let direction = "<<<".red().bold();
    let status_text = if status < 400 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };

    eprintln!("{prefix} {direction} {status_text}");
}

/// Log an incoming HTTP response body.
pub fn log_response_body(request_id: usize, body: &str) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);

    if let Ok(mut parsed) = serde_json::from_str::<serde_json::Value>(body) {
        redact_json(&mut parsed);
        eprintln!("{prefix} {}:", "Response".red());
        let rendered = colored_json::to_colored_json_auto(&parsed)
            .ok()
            .or_else(|| serde_json::to_string_pretty(&parsed).ok())
            .unwrap_or_default();
        for line in rendered.lines() {
            eprintln!("{prefix} {line}");
        }
    } else {
        let truncated = super::error_helpers::truncate_for_context(body, BODY_PREVIEW_LENGTH);
        eprintln!("{prefix} {}: {truncated}", "Response".red());
    }
}
