//! Error types for the cardsnap library.
//!
//! Two distinct failure modes get two distinct treatments:
//!
//! * [`ExportError`] — **Fatal for one export**: the export cannot produce an
//!   image (no render target, snapshot failure, clipboard denial). Caught at
//!   the orchestrator boundary, turned into a single diagnostic string via
//!   [`crate::pipeline::classify`], and surfaced through the progress
//!   callback. Nothing propagates further up.
//!
//! * Per-image inlining failures are **not errors at all**: the failed image
//!   is replaced with a placeholder graphic, counted, and logged with
//!   `warn!`. One unreachable image never aborts an export.
//!
//! The split lets callers treat an export as all-or-nothing while individual
//! pasted images degrade gracefully.

use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

/// A structured failure reported by a snapshot renderer backend.
///
/// Rasterizer backends differ wildly in how they describe failures; this
/// struct carries whatever readable fields the backend exposed so the
/// classifier can recover them. `code == 18` and `name == "SecurityError"`
/// are the canonical cross-origin canvas-taint signals.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SnapshotError {
    /// Backend error name, e.g. `"SecurityError"`.
    pub name: Option<String>,
    /// Numeric backend error code, e.g. `18` for a taint violation.
    pub code: Option<i64>,
    /// Human-readable message.
    pub message: String,
    /// Any additional key/value fields the backend exposed.
    pub details: Option<Value>,
}

impl SnapshotError {
    /// Build a plain-message error with no structured fields.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            name: None,
            code: None,
            message: message.into(),
            details: None,
        }
    }

    /// Flatten the error into a classifiable JSON value.
    ///
    /// Backend-provided `details` entries are inserted first so the
    /// explicitly typed fields win on key collision.
    pub fn to_value(&self) -> Value {
        let mut map = serde_json::Map::new();
        if let Some(Value::Object(details)) = &self.details {
            for (k, v) in details {
                map.insert(k.clone(), v.clone());
            }
        }
        if let Some(name) = &self.name {
            map.insert("name".into(), json!(name));
        }
        if let Some(code) = self.code {
            map.insert("code".into(), json!(code));
        }
        map.insert("message".into(), json!(self.message));
        Value::Object(map)
    }
}

/// All fatal errors produced by one export or text-generation call.
#[derive(Debug, Error)]
pub enum ExportError {
    // ── Export errors ─────────────────────────────────────────────────────
    /// No snapshot renderer is attached, so there is nothing to rasterize.
    #[error("Preview area not found")]
    TargetMissing,

    /// The snapshot renderer failed to rasterize the prepared card.
    #[error("Snapshot rendering failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// The system clipboard refused the write (permission denial).
    #[error("Clipboard access denied: {detail}")]
    ClipboardDenied { detail: String },

    /// The clipboard write failed for a reason other than permission.
    #[error("Clipboard write failed: {detail}")]
    ClipboardWriteFailed { detail: String },

    /// Could not create or write the output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Text-generation errors ────────────────────────────────────────────
    /// The text-generation API rejected the key (HTTP 401/403).
    #[error("Invalid API key (HTTP {status}) — check the key and retry")]
    InvalidApiKey { status: u16 },

    /// The text-generation API returned HTTP 429.
    #[error("API rate limit reached")]
    RateLimited,

    /// The text-generation API returned some other non-success status.
    #[error("Text generation failed: {message}")]
    TextGeneration { message: String },

    /// The request never completed (connect error, timeout, bad body).
    #[error("Request failed: {reason}")]
    Request { reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExportError {
    /// Convert the error into a value the classifier can introspect.
    ///
    /// Snapshot errors pass their backend fields through untouched; other
    /// variants synthesize a `name`/`message` pair so every failure funnels
    /// through the same classification path.
    pub fn failure_value(&self) -> Value {
        match self {
            ExportError::Snapshot(e) => e.to_value(),
            ExportError::ClipboardDenied { detail } => json!({
                "name": "NotAllowedError",
                "message": format!("clipboard write was not allowed: {detail}"),
            }),
            other => json!({
                "name": "ExportError",
                "message": other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_error_to_value_merges_details() {
        let e = SnapshotError {
            name: Some("SecurityError".into()),
            code: Some(18),
            message: "canvas is tainted".into(),
            details: Some(json!({"backend": "webview", "name": "shadowed"})),
        };
        let v = e.to_value();
        assert_eq!(v["name"], "SecurityError", "typed field must win");
        assert_eq!(v["code"], 18);
        assert_eq!(v["backend"], "webview");
    }

    #[test]
    fn clipboard_denied_value_carries_permission_name() {
        let e = ExportError::ClipboardDenied {
            detail: "occupied by another process".into(),
        };
        let v = e.failure_value();
        assert_eq!(v["name"], "NotAllowedError");
        assert!(v["message"].as_str().unwrap().contains("clipboard"));
    }

    #[test]
    fn target_missing_display() {
        assert_eq!(
            ExportError::TargetMissing.to_string(),
            "Preview area not found"
        );
    }

    #[test]
    fn rate_limit_display() {
        assert!(ExportError::RateLimited.to_string().contains("rate limit"));
    }
}
