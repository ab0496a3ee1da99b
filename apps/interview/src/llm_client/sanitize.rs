//! Response sanitizer — recovers a JSON object from noisy completion output.
//!
//! Models wrap JSON in code fences, prepend apologies, append commentary, and
//! occasionally get cut off mid-string by the token limit. This module turns
//! all of that into a `serde_json::Map`, or an empty map when there is nothing
//! recoverable. Sanitization failure must never abort the interview loop, so
//! this function has no error path at all.

use serde_json::{Map, Value};
use tracing::debug;

/// Sanitizes raw completion text and parses it into a JSON object.
///
/// Pure function: never panics, never errors. Returns an empty map when the
/// input contains no recoverable object. Recovery is best-effort and bounded —
/// a single quote-balance pass and a naive brace-balance pass, nothing more.
pub fn sanitize_and_parse(raw: &str) -> Map<String, Value> {
    let text = strip_control_chars(raw);
    let text = strip_fences(text.trim());
    let text = text.trim();

    let Some(start) = text.find('{') else {
        debug!("sanitize: no opening brace, returning empty object");
        return Map::new();
    };

    // Slice to the last closing brace when one exists; keep the tail otherwise
    // (the truncated-payload case, repaired below).
    let slice = match text.rfind('}') {
        Some(end) if end > start => &text[start..=end],
        _ => &text[start..],
    };

    let mut candidate = slice.trim_end().to_string();

    // A model cut off mid-string leaves an odd number of quotes.
    if candidate.matches('"').count() % 2 != 0 {
        candidate.push('"');
    }

    // Close any braces the truncation swallowed. Counting ignores string
    // context on purpose: cheap, and the quote repair above already closed
    // the one string a truncation can leave open.
    let open = candidate.matches('{').count();
    let close = candidate.matches('}').count();
    for _ in close..open {
        candidate.push('}');
    }

    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!("sanitize: parsed non-object value ({other}), returning empty object");
            Map::new()
        }
        Err(e) => {
            debug!("sanitize: unrecoverable payload ({e}), returning empty object");
            Map::new()
        }
    }
}

/// Removes control characters (below 0x20 except tab/newline/carriage-return,
/// plus DEL) and a leading byte-order mark.
fn strip_control_chars(text: &str) -> String {
    text.trim_start_matches('\u{feff}')
        .chars()
        .filter(|&c| c == '\t' || c == '\n' || c == '\r' || (c >= '\u{20}' && c != '\u{7f}'))
        .collect()
}

/// Strips a leading ``` (with optional language tag) and a trailing ```.
fn strip_fences(text: &str) -> &str {
    let mut text = text;
    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag line if present ("json", "JSON", etc.).
        text = match rest.find('\n') {
            Some(nl) => &rest[nl + 1..],
            None => rest,
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text
}
