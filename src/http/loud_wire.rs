//! Wire-level debugging via the LOUD_WIRE environment variable.
//!
//! When `LOUD_WIRE` is set to any value, every request, response status,
//! JSON body and SSE line is printed to stderr with colors.
//!
//! ```bash
//! LOUD_WIRE=1 cargo test --test session_flow_tests -- --nocapture
//! ```
//!
//! - Green `>>>` for outgoing requests
//! - Red `<<<` for incoming responses
//! - Blue for SSE lines
//!
//! The bearer token is never printed.

use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use serde_json::Value;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Request ID counter for correlating requests with responses
static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(1);

static ENABLED: OnceLock<bool> = OnceLock::new();

/// Check if LOUD_WIRE debugging is enabled.
///
/// Cached after the first call, so `LOUD_WIRE` must be set before the first
/// request is made.
#[must_use]
pub fn is_enabled() -> bool {
    *ENABLED.get_or_init(|| std::env::var("LOUD_WIRE").is_ok())
}

/// Get the next request ID for correlation.
#[must_use]
pub fn next_request_id() -> usize {
    REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Strings longer than this are cut when printed. Tutorbot descriptors can
/// embed whole prompt texts.
const TRUNCATE_THRESHOLD: usize = 300;

fn truncate_long_strings(value: &mut Value) {
    match value {
        Value::String(s) if s.len() > TRUNCATE_THRESHOLD => {
            let cut = (0..=TRUNCATE_THRESHOLD)
                .rev()
                .find(|i| s.is_char_boundary(*i))
                .unwrap_or(0);
            *s = format!("{}...", &s[..cut]);
        }
        Value::Object(map) => map.values_mut().for_each(truncate_long_strings),
        Value::Array(arr) => arr.iter_mut().for_each(truncate_long_strings),
        _ => {}
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn prefix(request_id: usize) -> String {
    format!(
        "{} {} {}",
        "[LOUD_WIRE]".bold(),
        timestamp().dimmed(),
        format!("[REQ#{request_id}]").cyan()
    )
}

fn print_json(prefix: &str, value: &Value) {
    let mut value = value.clone();
    truncate_long_strings(&mut value);
    let rendered = colored_json::to_colored_json_auto(&value)
        .ok()
        .or_else(|| serde_json::to_string_pretty(&value).ok());
    if let Some(rendered) = rendered {
        for line in rendered.lines() {
            eprintln!("{prefix} {line}");
        }
    }
}

/// Log an outgoing HTTP request.
pub fn log_request(
    request_id: usize,
    label: &str,
    url: &str,
    query: &[(&str, String)],
    body: Option<&Value>,
) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {} {label} {url}", ">>>".green().bold());

    for (key, value) in query {
        eprintln!("{prefix}   {}={value}", key.green());
    }

    if let Some(body) = body {
        eprintln!("{prefix} {}:", "Body".green());
        print_json(&prefix, body);
    }
}

/// Log an incoming HTTP response status.
pub fn log_response_status(request_id: usize, status: u16) {
    if !is_enabled() {
        return;
    }

    let status_text = if status < 300 {
        format!("{status} OK").green()
    } else {
        format!("{status} ERROR").red()
    };
    eprintln!("{} {} {status_text}", prefix(request_id), "<<<".red().bold());
}

/// Log an incoming JSON response body.
pub fn log_response_body(request_id: usize, body: &Value) {
    if !is_enabled() {
        return;
    }

    let prefix = prefix(request_id);
    eprintln!("{prefix} {}:", "Response".red());
    print_json(&prefix, body);
}

/// Log one raw SSE line.
pub fn log_sse_line(request_id: usize, line: &str) {
    if !is_enabled() {
        return;
    }

    eprintln!("{} {}: {line}", prefix(request_id), "SSE".blue().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_strings_untouched() {
        let mut value = json!({"content": "Let's break it down"});
        truncate_long_strings(&mut value);
        assert_eq!(value["content"], "Let's break it down");
    }

    #[test]
    fn test_long_nested_string_truncated() {
        let mut value = json!({"tutorbot": {"prompt": "P".repeat(1000)}, "n": 3});
        truncate_long_strings(&mut value);

        let prompt = value["tutorbot"]["prompt"].as_str().unwrap();
        assert_eq!(prompt.len(), TRUNCATE_THRESHOLD + 3);
        assert!(prompt.ends_with("..."));
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn test_truncate_respects_char_boundary() {
        let mut value = json!(["é".repeat(400)]);
        truncate_long_strings(&mut value);
        let s = value[0].as_str().unwrap();
        assert!(s.ends_with("..."));
        assert!(s.len() <= TRUNCATE_THRESHOLD + 3);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp();
        // YYYY-MM-DDTHH:MM:SSZ
        assert_eq!(ts.len(), 20, "unexpected timestamp {ts}");
        assert!(ts.ends_with('Z'));
        assert!(ts.contains('T'));
    }

    #[test]
    fn test_request_id_increments() {
        let id1 = next_request_id();
        let id2 = next_request_id();
        assert!(id2 > id1, "Request IDs should increment");
    }
}
