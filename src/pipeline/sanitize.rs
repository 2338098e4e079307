//! Content sanitation: deterministic cleanup of rich-text paste artifacts.
//!
//! ## Why is sanitation necessary?
//!
//! Rich-text editors are generous with markup on paste: every source editor
//! leaves its own trail of empty paragraphs, stray `<br>` runs, and
//! `&nbsp;` padding. None of it is visible while editing, but a snapshot
//! renderer faithfully reproduces all of it as blank space at the bottom of
//! the exported card. These rules collapse the noise so the rendered card
//! looks the same regardless of where the content was copied from.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: empty-paragraph runs collapse
//! before trailing blocks are stripped (a run at the end collapses to one
//! block that the trailing pass then removes), and trailing `<br>`s are
//! stripped before mid-document break runs are capped so a trailing run
//! never survives as `<br><br>`.
//!
//! Applying [`sanitize`] to its own output is a no-op; the trailing-block
//! rules iterate to a fixed point so stripping one kind of block can never
//! expose another kind that then survives.

use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical single empty paragraph left behind by the collapse rule.
const EMPTY_PARAGRAPH: &str = "<p><br></p>";

// A paragraph or div counts as "empty" when it contains only whitespace,
// line-break tags, or non-breaking-space entities.
static RE_EMPTY_PARA_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<p[^>]*>(\s|<br\s*/?>|&nbsp;)*</p>\s*){2,}").unwrap());

static RE_ONLY_EMPTY_PARAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(<p[^>]*>(\s|<br\s*/?>|&nbsp;)*</p>\s*)+$").unwrap());

static RE_TRAILING_EMPTY_PARAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<p[^>]*>(\s|<br\s*/?>|&nbsp;)*</p>\s*)+$").unwrap());

static RE_TRAILING_EMPTY_DIVS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<div[^>]*>(\s|<br\s*/?>|&nbsp;)*</div>\s*)+$").unwrap());

static RE_TRAILING_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<br\s*/?>\s*)+$").unwrap());

static RE_BREAK_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(<br\s*/?>\s*){3,}").unwrap());

/// Normalise a pasted HTML fragment for visually stable rendering.
///
/// Rules (applied in order):
/// 1. Collapse runs of two-or-more empty paragraphs into a single
///    `<p><br></p>`
/// 2. Strip empty paragraph blocks trailing at the end of the document —
///    unless the whole document is empty paragraphs, which canonicalises to
///    a single `<p><br></p>` instead of vanishing
/// 3. Strip trailing empty `<div>` blocks
/// 4. Strip trailing `<br>` tags
/// 5. Collapse runs of 3-or-more `<br>` tags anywhere down to exactly 2
/// 6. Trim surrounding whitespace
pub fn sanitize(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let collapsed = RE_EMPTY_PARA_RUN.replace_all(html, EMPTY_PARAGRAPH);

    // A document of nothing but empty paragraphs keeps one canonical block;
    // stripping would otherwise erase the document entirely.
    if RE_ONLY_EMPTY_PARAS.is_match(&collapsed) {
        return EMPTY_PARAGRAPH.to_string();
    }

    // Trailing blocks can nest behind each other (…<p></p><div></div>), so
    // the three trailing rules iterate until nothing changes.
    let mut stripped = collapsed.into_owned();
    loop {
        let pass = RE_TRAILING_EMPTY_PARAS.replace_all(&stripped, "");
        let pass = RE_TRAILING_EMPTY_DIVS.replace_all(&pass, "");
        let pass = RE_TRAILING_BREAKS.replace_all(&pass, "").into_owned();
        if pass == stripped {
            break;
        }
        stripped = pass;
    }

    let capped = RE_BREAK_RUNS.replace_all(&stripped, "<br><br>");
    capped.trim().to_string()
}
