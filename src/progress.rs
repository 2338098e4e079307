//! Progress-callback trait for export lifecycle events.
//!
//! Inject an `Arc<dyn ExportProgressCallback>` via
//! [`crate::export::CardExporter::with_callback`] to receive real-time
//! events as an export runs.
//!
//! # Why callbacks instead of return values?
//!
//! An export is driven from UI state — a busy flag while it runs, live
//! status text, a persistent error area, a transient success flash. The
//! callback approach maps 1:1 onto that: the host binds each event to its
//! own state store (a channel, an atomic, a reactive signal) without the
//! library knowing how the host renders. All methods have default no-op
//! implementations so callers only override what they care about.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Live status of a running export, rendered to the user as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    /// File export is starting.
    PreparingExport,
    /// Clipboard export is starting.
    PreparingCopy,
    /// Image `current` of `total` is being inlined (1-based).
    ProcessingImage { current: usize, total: usize },
    /// Markup prepared; waiting for layout to settle and the snapshot to run.
    Rendering,
    /// File export finished.
    ExportDone,
    /// Clipboard export finished.
    CopyDone,
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::PreparingExport => write!(f, "Preparing export…"),
            ExportStatus::PreparingCopy => write!(f, "Preparing copy…"),
            ExportStatus::ProcessingImage { current, total } => {
                write!(f, "Processing image {current}/{total}…")
            }
            ExportStatus::Rendering => write!(f, "Rendering…"),
            ExportStatus::ExportDone => write!(f, "Export complete!"),
            ExportStatus::CopyDone => write!(f, "Copied to clipboard!"),
        }
    }
}

/// Where a finished export went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutput {
    /// Saved to this path.
    File(PathBuf),
    /// Written to the system clipboard.
    Clipboard,
}

/// Summary of one successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output: ExportOutput,
    /// Images that fell back to the placeholder graphic.
    pub failed_images: usize,
}

/// Called by the export orchestrator as one export progresses.
///
/// Implementations must be `Send + Sync`; the status auto-clear fires from
/// a detached task. Within a single export, `on_export_start` comes first,
/// `on_export_finished` comes last, and exactly one of
/// `on_success`/`on_error` arrives in between. `on_status_cleared` arrives
/// later, after the configured clear delay.
pub trait ExportProgressCallback: Send + Sync {
    /// The export began; show a busy state and clear prior error/success.
    fn on_export_start(&self) {}

    /// New status text to display.
    fn on_status(&self, status: &ExportStatus) {
        let _ = status;
    }

    /// The export succeeded.
    fn on_success(&self, report: &ExportReport) {
        let _ = report;
    }

    /// The export failed; `diagnostic` is the complete, user-ready text.
    fn on_error(&self, diagnostic: &str) {
        let _ = diagnostic;
    }

    /// The success status (and any transient copied flag) should be cleared.
    fn on_status_cleared(&self) {}

    /// The export ended, successfully or not; clear the busy state.
    fn on_export_finished(&self) {}
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopExportCallback;

impl ExportProgressCallback for NoopExportCallback {}

/// Convenience alias matching the type stored in
/// [`crate::export::CardExporter`].
pub type ProgressCallback = Arc<dyn ExportProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn status_text_renders() {
        assert_eq!(
            ExportStatus::ProcessingImage { current: 2, total: 5 }.to_string(),
            "Processing image 2/5…"
        );
        assert_eq!(ExportStatus::PreparingCopy.to_string(), "Preparing copy…");
        assert_eq!(ExportStatus::ExportDone.to_string(), "Export complete!");
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopExportCallback;
        cb.on_export_start();
        cb.on_status(&ExportStatus::Rendering);
        cb.on_success(&ExportReport {
            output: ExportOutput::Clipboard,
            failed_images: 0,
        });
        cb.on_error("boom");
        cb.on_status_cleared();
        cb.on_export_finished();
    }

    #[test]
    fn arc_dyn_callback_works() {
        struct Counting {
            statuses: AtomicUsize,
        }
        impl ExportProgressCallback for Counting {
            fn on_status(&self, _status: &ExportStatus) {
                self.statuses.fetch_add(1, Ordering::SeqCst);
            }
        }

        let counting = Arc::new(Counting {
            statuses: AtomicUsize::new(0),
        });
        let cb: ProgressCallback = Arc::clone(&counting) as ProgressCallback;
        cb.on_status(&ExportStatus::Rendering);
        cb.on_status(&ExportStatus::ExportDone);
        assert_eq!(counting.statuses.load(Ordering::SeqCst), 2);
    }
}
