//! # cardsnap
//!
//! Style rich-text article content into a visual "card" and export the
//! rendered result as a raster image — to a file or the system clipboard.
//!
//! ## Why this crate?
//!
//! Exporting pasted rich text as an image sounds trivial until the content
//! contains cross-origin images: one of them is enough to taint the
//! rasterizer's canvas and fail the whole export with an inscrutable
//! security error. This crate owns the image-safe export pipeline — it
//! scrubs paste artifacts, re-fetches and embeds every external image as a
//! self-contained data URI (with proxy fallbacks for hotlink-protected
//! hosts), degrades unreachable images to a placeholder instead of
//! aborting, and classifies whatever failures remain into diagnostics a
//! person can act on.
//!
//! ## Pipeline Overview
//!
//! ```text
//! content
//!  │
//!  ├─ 1. Sanitize   collapse empty paragraphs, cap break runs, trim tails
//!  ├─ 2. Inline     every <img> → PNG data URI (direct fetch, then proxies)
//!  ├─ 3. Assemble   wrap the fragment in the template's card shell
//!  ├─ 4. Settle     fixed delay so layout and image decode finish
//!  ├─ 5. Snapshot   external renderer rasterizes the prepared markup
//!  └─ 6. Deliver    file download or clipboard write + progress/diagnostics
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardsnap::{CardConfig, CardExporter, ExportConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let card = CardConfig {
//!         content: "<p>Hello</p><img src='https://example.com/a.png'>".into(),
//!         template_id: "lavender".into(),
//!         ..CardConfig::default()
//!     };
//!     let exporter = CardExporter::new(ExportConfig::default());
//!     // .with_renderer(Arc::new(MyRenderer)) to attach a snapshot backend
//!     exporter.export_to_file(&card).await;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `cardsnap` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! cardsnap = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod surface;
pub mod templates;
pub mod textgen;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{CardConfig, CardSize, ExportConfig, ExportConfigBuilder, FontSize, MarginSize};
pub use error::{ExportError, SnapshotError};
pub use export::{CardExporter, CLIPBOARD_DENIED_HELP};
pub use layout::render_card_html;
pub use pipeline::classify::{classify, CROSS_ORIGIN_EXPORT_HELP};
pub use pipeline::inline::{FetchInliner, HttpImageFetcher, ImageFetcher, ImageInliner};
pub use pipeline::preprocess::{preprocess_images, PreparedContent, PLACEHOLDER_IMAGE};
pub use pipeline::sanitize::sanitize;
pub use pipeline::snapshot::{SnapshotOptions, SnapshotRenderer, SourcePolicy};
pub use progress::{
    ExportOutput, ExportProgressCallback, ExportReport, ExportStatus, NoopExportCallback,
    ProgressCallback,
};
pub use surface::{ClipboardSurface, DirectoryDownloads, DownloadSurface, SystemClipboard};
pub use templates::{template_or_default, Template, TEMPLATES};
pub use textgen::{smart_format, summarize, GlmClient, TextGenerator};
