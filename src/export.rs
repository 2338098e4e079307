//! Export orchestration: card configuration → exported raster image.
//!
//! ## Sequence
//!
//! Both entry points run the same pipeline and differ only at the end:
//!
//! ```text
//! guard ──▶ sanitize ──▶ inline images ──▶ assemble card ──▶ settle ──▶ snapshot ──▶ file / clipboard
//! ```
//!
//! The prepared markup is handed straight to the snapshot renderer; no
//! shared render state is mutated for the handoff. All outcomes — status
//! text, success reports, classified failures, the busy lifecycle — flow
//! through the [`ExportProgressCallback`] rather than return values,
//! because an export is driven from UI state.
//!
//! Failures never escape: every error is classified into one diagnostic
//! string (see [`crate::pipeline::classify`]) and surfaced via
//! `on_error`, and the busy state is always released in a final step.

use crate::config::{CardConfig, ExportConfig};
use crate::error::ExportError;
use crate::layout::render_card_html;
use crate::pipeline::classify::classify;
use crate::pipeline::inline::{FetchInliner, HttpImageFetcher, ImageInliner};
use crate::pipeline::preprocess::preprocess_images;
use crate::pipeline::sanitize::sanitize;
use crate::pipeline::snapshot::{SnapshotOptions, SnapshotRenderer, SourcePolicy};
use crate::progress::{
    ExportOutput, ExportReport, ExportStatus, NoopExportCallback, ProgressCallback,
};
use crate::surface::{ClipboardSurface, DirectoryDownloads, DownloadSurface, SystemClipboard};
use crate::templates::template_or_default;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Friendlier replacement for clipboard permission failures.
pub const CLIPBOARD_DENIED_HELP: &str =
    "Clipboard access was denied — try exporting the image as a file instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportKind {
    File,
    Clipboard,
}

/// Orchestrates one card export across the pipeline stages and surfaces.
///
/// Construct with [`CardExporter::new`], then attach collaborators with the
/// `with_*` methods. Without a renderer every export fails the initial
/// guard — useful for prepare-only hosts, which use the pipeline functions
/// directly instead.
///
/// The exporter itself holds no mutable state; callers serialize export
/// requests by disabling triggers while the callback reports busy.
pub struct CardExporter {
    renderer: Option<Arc<dyn SnapshotRenderer>>,
    inliner: Arc<dyn ImageInliner>,
    downloads: Arc<dyn DownloadSurface>,
    clipboard: Arc<dyn ClipboardSurface>,
    callback: ProgressCallback,
    config: ExportConfig,
}

impl CardExporter {
    /// Exporter with production collaborators: HTTP image fetching, the
    /// current directory for downloads, the system clipboard, no renderer.
    pub fn new(config: ExportConfig) -> Self {
        let fetcher = Arc::new(HttpImageFetcher::new());
        let inliner = FetchInliner::with_timeouts(
            fetcher,
            config.direct_fetch_timeout,
            config.proxy_fetch_timeout,
        );
        Self {
            renderer: None,
            inliner: Arc::new(inliner),
            downloads: Arc::new(DirectoryDownloads::new(".")),
            clipboard: Arc::new(SystemClipboard),
            callback: Arc::new(NoopExportCallback),
            config,
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn SnapshotRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_inliner(mut self, inliner: Arc<dyn ImageInliner>) -> Self {
        self.inliner = inliner;
        self
    }

    pub fn with_downloads(mut self, downloads: Arc<dyn DownloadSurface>) -> Self {
        self.downloads = downloads;
        self
    }

    pub fn with_clipboard(mut self, clipboard: Arc<dyn ClipboardSurface>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_callback(mut self, callback: ProgressCallback) -> Self {
        self.callback = callback;
        self
    }

    /// Export the card as a downloadable PNG file.
    pub async fn export_to_file(&self, card: &CardConfig) {
        self.run(card, ExportKind::File).await;
    }

    /// Export the card as a PNG on the system clipboard.
    pub async fn export_to_clipboard(&self, card: &CardConfig) {
        self.run(card, ExportKind::Clipboard).await;
    }

    async fn run(&self, card: &CardConfig, kind: ExportKind) {
        // Guard before any state changes: with no renderer there is nothing
        // to rasterize, and the busy lifecycle never starts.
        let Some(renderer) = self.renderer.as_ref() else {
            self.callback
                .on_error(&ExportError::TargetMissing.to_string());
            return;
        };

        self.callback.on_export_start();
        self.callback.on_status(&match kind {
            ExportKind::File => ExportStatus::PreparingExport,
            ExportKind::Clipboard => ExportStatus::PreparingCopy,
        });

        match self.run_pipeline(renderer, card, kind).await {
            Ok(report) => {
                info!("export finished: {:?}", report.output);
                self.callback.on_success(&report);
                self.callback.on_status(&match kind {
                    ExportKind::File => ExportStatus::ExportDone,
                    ExportKind::Clipboard => ExportStatus::CopyDone,
                });
                self.schedule_status_clear();
            }
            Err(err) => {
                let diagnostic = self.diagnose(&err, kind);
                warn!("export failed: {err}");
                self.callback.on_error(&diagnostic);
            }
        }

        // Busy is released last, success or failure.
        self.callback.on_export_finished();
    }

    async fn run_pipeline(
        &self,
        renderer: &Arc<dyn SnapshotRenderer>,
        card: &CardConfig,
        kind: ExportKind,
    ) -> Result<ExportReport, ExportError> {
        let cleaned = sanitize(&card.content);

        let callback = &self.callback;
        let progress = |current: usize, total: usize| {
            callback.on_status(&ExportStatus::ProcessingImage { current, total });
        };
        let prepared = preprocess_images(&cleaned, self.inliner.as_ref(), Some(&progress)).await;
        if prepared.failed_images > 0 {
            warn!(
                "{} image(s) could not be inlined and were replaced with placeholders",
                prepared.failed_images
            );
        }

        let template = template_or_default(&card.template_id);
        let markup = render_card_html(card, template, &prepared.html);

        self.callback.on_status(&ExportStatus::Rendering);
        tokio::time::sleep(Duration::from_millis(self.config.settle_delay_ms)).await;

        let options = SnapshotOptions {
            pixel_ratio: match kind {
                ExportKind::File => self.config.file_pixel_ratio,
                ExportKind::Clipboard => self.config.clipboard_pixel_ratio,
            },
            background: if template.has_gradient_background() {
                None
            } else {
                Some(template.background.to_string())
            },
            policy: SourcePolicy::new(self.config.allowed_image_hosts.clone()),
        };
        let png = renderer.rasterize(&markup, &options).await?;

        let output = match kind {
            ExportKind::File => {
                let filename = format!("{}_{}.png", self.config.brand, unix_millis());
                ExportOutput::File(self.downloads.save(&filename, &png)?)
            }
            ExportKind::Clipboard => {
                self.clipboard.write_image(&png)?;
                ExportOutput::Clipboard
            }
        };

        Ok(ExportReport {
            output,
            failed_images: prepared.failed_images,
        })
    }

    /// Classify a failure into the single diagnostic string shown to the
    /// user, substituting the friendlier clipboard hint where it applies.
    fn diagnose(&self, err: &ExportError, kind: ExportKind) -> String {
        let diagnostic = classify(Some(&err.failure_value()));
        if kind == ExportKind::Clipboard
            && (diagnostic.contains("clipboard") || diagnostic.contains("NotAllowedError"))
        {
            return CLIPBOARD_DENIED_HELP.to_string();
        }
        diagnostic
    }

    /// Clear the success status after the configured delay without holding
    /// up the caller.
    fn schedule_status_clear(&self) {
        let callback = Arc::clone(&self.callback);
        let delay = Duration::from_millis(self.config.status_clear_delay_ms);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            callback.on_status_cleared();
        });
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnose_rewrites_clipboard_denials_on_the_copy_path() {
        let exporter = CardExporter::new(ExportConfig::default());
        let err = ExportError::ClipboardDenied {
            detail: "blocked".into(),
        };
        assert_eq!(
            exporter.diagnose(&err, ExportKind::Clipboard),
            CLIPBOARD_DENIED_HELP
        );
        assert_ne!(
            exporter.diagnose(&err, ExportKind::File),
            CLIPBOARD_DENIED_HELP,
            "file exports keep the raw classification"
        );
    }

    #[test]
    fn filename_timestamps_are_plausible() {
        let millis = unix_millis();
        // 2020-01-01 in milliseconds; anything earlier means a broken clock
        // fallback, which the format still tolerates.
        assert!(millis == 0 || millis > 1_577_836_800_000);
    }
}
