//! Failure classification: arbitrary failure value → readable diagnostic.
//!
//! Snapshot backends and host surfaces report failures as loosely structured
//! key/value data rather than typed errors. This module recovers whatever
//! readable fields such a value carries and renders exactly one diagnostic
//! string from them — the only failure representation the UI layer ever
//! sees. The one special case is the cross-origin canvas-taint failure,
//! which gets a fixed remediation text instead of a field dump because the
//! raw backend message ("The canvas has been tainted…") is useless to the
//! person holding the paste buffer.
//!
//! The classifier is total: every input produces a string, none panics.

use serde_json::{Map, Value};

/// Fixed diagnostic for cross-origin image export failures.
///
/// Returned whenever the recovered fields carry a security-error name, the
/// DOM security error code 18, or a "tainted" message. Field dumps never
/// help here — the user needs the workaround, not the stack.
pub const CROSS_ORIGIN_EXPORT_HELP: &str = "\
Export failed: a cross-origin image blocked the snapshot.
A pasted third-party image forbids pixel reads, so the rendered card cannot be captured.

How to fix:
1. Remove the most recently pasted images.
2. Check for GIFs or unusually large high-resolution images.
3. Save the image manually and re-upload it.";

/// Turn an arbitrary failure value into a human-readable diagnostic string.
///
/// * `None` yields `"undefined"`, `Value::Null` yields `"null"`.
/// * Strings pass through unchanged.
/// * Objects have all their readable fields recovered into a flat mapping,
///   checked for the taint signature, summarised as an error when they look
///   like one (`name`/`message`/`stack`), and otherwise serialized.
/// * Anything else (numbers, booleans, arrays) serializes compactly.
pub fn classify(value: Option<&Value>) -> String {
    let value = match value {
        None => return "undefined".to_string(),
        Some(v) => v,
    };

    match value {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Object(fields) => classify_object(value, fields),
        other => compact(other),
    }
}

fn classify_object(value: &Value, fields: &Map<String, Value>) -> String {
    let info = recover_fields(fields);

    // Taint detection wins over every generic rendering.
    if is_taint_failure(&info) {
        return CROSS_ORIGIN_EXPORT_HELP.to_string();
    }

    // Error-like objects get the compact three-part summary.
    if info.contains_key("name") || info.contains_key("message") || info.contains_key("stack") {
        let mut parts = Vec::new();
        if let Some(name) = info.get("name") {
            parts.push(format!("error type: {name}"));
        }
        if let Some(message) = info.get("message") {
            parts.push(format!("error message: {message}"));
        }
        if let Some(stack) = info.get("stack") {
            let frames: Vec<&str> = stack.lines().take(3).collect();
            parts.push(format!("call stack: {}", frames.join("\n")));
        }
        return parts.join("\n");
    }

    if info.is_empty() {
        return format!("[unknown error object]: {}", compact(value));
    }

    let mut tagged = Map::new();
    tagged.insert("_type".to_string(), Value::String("object".to_string()));
    for (k, v) in info {
        tagged.insert(k, Value::String(v));
    }
    match serde_json::to_string_pretty(&tagged) {
        Ok(rendered) => rendered,
        Err(_) => format!("failed to parse error: {}", compact(value)),
    }
}

/// Recover every readable field into a flat string→string mapping.
///
/// Scalars are stringified the way a user would read them (no quotes around
/// strings); nested objects and arrays are kept as compact JSON.
fn recover_fields(fields: &Map<String, Value>) -> std::collections::BTreeMap<String, String> {
    let mut info = std::collections::BTreeMap::new();
    for (key, value) in fields {
        let rendered = match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            nested => compact(nested),
        };
        info.insert(key.clone(), rendered);
    }
    info
}

/// The three signatures of a cross-origin canvas-taint failure.
fn is_taint_failure(info: &std::collections::BTreeMap<String, String>) -> bool {
    if info.get("name").is_some_and(|n| n == "SecurityError") {
        return true;
    }
    if info.get("code").is_some_and(|c| c == "18") {
        return true;
    }
    info.get("message").is_some_and(|m| m.contains("tainted"))
}

fn compact(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<unrepresentable>".to_string())
}
