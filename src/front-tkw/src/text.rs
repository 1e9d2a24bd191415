//! Text shaping for the views: truncation, search, relative times, failure messages.
//!
//! Nothing here touches the DOM, so it is unit tested natively.

use serde_json::Value;

use crate::models::RequestFailure;

pub const PICKER_DETAILS_LIMIT: usize = 80;
pub const PICKER_STRUCTURE_LIMIT: usize = 60;
pub const HISTORY_TEXT_LIMIT: usize = 120;

/// The first `limit` characters of `s`, followed by "..." if anything was cut.
pub fn truncate(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

/// Case-insensitive substring match against any of `fields`. An empty term matches.
pub fn matches_search(fields: &[&str], term: &str) -> bool {
    let term = term.to_lowercase();
    fields.iter().any(|field| field.to_lowercase().contains(&term))
}

fn plural(count: u64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// Human age for a timestamp `age_ms` milliseconds in the past, e.g. "5 minutes ago".
///
/// Negative ages (clock skew) read as "just now".
pub fn relative_time(age_ms: f64) -> String {
    if !age_ms.is_finite() {
        return "unknown".to_string();
    }
    let seconds = (age_ms / 1000.0).max(0.0) as u64;
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if seconds < 60 {
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < 30 {
        plural(days, "day")
    } else if days < 365 {
        plural(days / 30, "month")
    } else {
        plural(days / 365, "year")
    }
}

/// CSS classes of the status badge for a request status.
pub fn badge_class(status: &str) -> &'static str {
    match status {
        "pending" => "badge badge-pending",
        "ready" => "badge badge-ready",
        "error" => "badge badge-error",
        _ => "badge",
    }
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// What to tell the user when an API call fails.
///
/// Understands the `{"error": kind, "details": ...}` bodies the server answers with.
pub fn failure_message(failure: &RequestFailure) -> String {
    match failure {
        RequestFailure::Network(_) => {
            "Network error: Unable to connect to the service. Please check your internet connection and try again."
                .to_string()
        }
        RequestFailure::Decode(reason) => format!("Unexpected response from the server: {}", reason),
        RequestFailure::Status { status, body } => {
            let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
            let details = &parsed["details"];
            match parsed["error"].as_str() {
                Some("invalid_input") => details.as_str().unwrap_or("Invalid input").to_string(),
                Some("service") => format!(
                    "Service error: {}",
                    details["message"].as_str().unwrap_or("automation request failed")
                ),
                Some("network") => "Service error: the automation service could not be reached.".to_string(),
                Some("store") => "Failed to save the project. Please try again.".to_string(),
                _ => format!("Request failed ({})", status),
            }
        }
    }
}
