//! Pipeline stages for image-safe card export.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different image fetcher or renderer
//! backend) without touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! content ──▶ sanitize ──▶ preprocess ──▶ snapshot     classify
//! (pasted HTML) (cleanup)  (inline imgs)  (rasterize)  (diagnose failures)
//! ```
//!
//! 1. [`sanitize`]   — deterministic cleanup of paste artifacts (empty
//!    paragraphs, break runs, trailing blocks)
//! 2. [`inline`]     — one image URL → self-contained PNG data URI, with a
//!    direct attempt and two proxy fallbacks, each bounded by a timeout
//! 3. [`preprocess`] — scan the fragment for image tags and inline each one
//!    sequentially, degrading failures to a placeholder graphic
//! 4. [`snapshot`]   — the renderer seam: prepared markup → PNG bytes,
//!    filtered by a source policy that keeps taintable images out
//! 5. [`classify`]   — arbitrary failure value → one readable diagnostic
//!    string, with a fixed remediation text for cross-origin taint failures

pub mod classify;
pub mod inline;
pub mod preprocess;
pub mod sanitize;
pub mod snapshot;
