//! Content image preprocessing: make every `<img>` in a fragment safe to
//! rasterize.
//!
//! Scans the fragment for image tags in document order and runs each source
//! through the [`ImageInliner`](crate::pipeline::inline::ImageInliner).
//! Sources that cannot be inlined are swapped for a fixed placeholder
//! graphic instead of aborting the batch — a card with one broken image
//! still exports.
//!
//! Processing is strictly sequential, one image at a time. That bounds the
//! number of outstanding fetches and timers to one and keeps the progress
//! callback's `(current, total)` sequence monotonic without any locking.

use crate::pipeline::inline::{is_inline_uri, ImageInliner};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Inline SVG shown in place of an image that could not be inlined.
///
/// A 300×60 rounded box with explanatory text, URL-encoded so it works as a
/// `data:` URI without any base64 machinery.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml;charset=utf-8,\
%3Csvg xmlns='http://www.w3.org/2000/svg' width='300' height='60' viewBox='0 0 300 60'%3E\
%3Crect width='300' height='60' fill='%23f1f5f9' rx='8'/%3E\
%3Ctext x='50%25' y='50%25' dominant-baseline='middle' text-anchor='middle' \
font-family='sans-serif' font-size='14' fill='%2364748b'%3E\
External image (auto-handled on export)%3C/text%3E%3C/svg%3E";

// Matches an <img> tag and captures its quoted src value. Deliberately does
// not handle nested quotes or style-attribute background images; see the
// module docs in `sanitize` for the philosophy of cheap textual rules.
static RE_IMG_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["'][^>]*>"#).unwrap());

/// Result of one preprocessing pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent {
    /// The fragment with every image source inlined or replaced.
    pub html: String,
    /// How many images fell back to the placeholder.
    pub failed_images: usize,
}

/// Observer invoked once per image tag, with a 1-based index and the total.
pub type ImageProgress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Inline every external image in `html`, substituting the placeholder for
/// sources that fail conversion.
///
/// Already-inlined sources (`data:`/`blob:`) are left untouched, never
/// handed to the inliner, and never counted as failed — but they do count
/// toward the progress total, since the observer reports tags scanned, not
/// bytes fetched.
///
/// Never fails: per-image failures degrade to the placeholder and a
/// `warn!` log line.
pub async fn preprocess_images(
    html: &str,
    inliner: &dyn ImageInliner,
    on_progress: Option<ImageProgress<'_>>,
) -> PreparedContent {
    struct ImageRef {
        tag_start: usize,
        tag_end: usize,
        src_start: usize,
        src_end: usize,
    }

    let matches: Vec<ImageRef> = RE_IMG_TAG
        .captures_iter(html)
        .map(|caps| {
            let tag = caps.get(0).expect("match always has a full capture");
            let src = caps.get(1).expect("src group is not optional");
            ImageRef {
                tag_start: tag.start(),
                tag_end: tag.end(),
                src_start: src.start(),
                src_end: src.end(),
            }
        })
        .collect();

    let total = matches.len();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    let mut failed_images = 0;

    for (index, image) in matches.iter().enumerate() {
        out.push_str(&html[cursor..image.tag_start]);

        let src = &html[image.src_start..image.src_end];
        if is_inline_uri(src) {
            out.push_str(&html[image.tag_start..image.tag_end]);
        } else {
            let replacement = match inliner.inline(src).await {
                Some(data_uri) => data_uri,
                None => {
                    failed_images += 1;
                    warn!("substituting placeholder for image: {src}");
                    PLACEHOLDER_IMAGE.to_string()
                }
            };
            out.push_str(&html[image.tag_start..image.src_start]);
            out.push_str(&replacement);
            out.push_str(&html[image.src_end..image.tag_end]);
        }

        cursor = image.tag_end;
        if let Some(progress) = on_progress {
            progress(index + 1, total);
        }
    }
    out.push_str(&html[cursor..]);

    PreparedContent {
        html: out,
        failed_images,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    /// Inliner with a scripted answer, recording every source it was given.
    struct ScriptedInliner {
        answer: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedInliner {
        fn always(answer: Option<&str>) -> Self {
            Self {
                answer: answer.map(str::to_string),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl ImageInliner for ScriptedInliner {
        fn inline<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>> {
            Box::pin(async move {
                self.seen.lock().unwrap().push(url.to_string());
                self.answer.clone()
            })
        }
    }

    #[tokio::test]
    async fn no_images_is_a_no_op() {
        let inliner = ScriptedInliner::always(None);
        let out = preprocess_images("<p>plain text</p>", &inliner, None).await;
        assert_eq!(out.html, "<p>plain text</p>");
        assert_eq!(out.failed_images, 0);
        assert!(inliner.seen().is_empty());
    }

    #[tokio::test]
    async fn successful_inlining_rewrites_the_src_only() {
        let inliner = ScriptedInliner::always(Some("data:image/png;base64,OK"));
        let html = r#"<p>a</p><img class="pic" src="https://x.example/a.png" alt="a"><p>b</p>"#;
        let out = preprocess_images(html, &inliner, None).await;
        assert_eq!(
            out.html,
            r#"<p>a</p><img class="pic" src="data:image/png;base64,OK" alt="a"><p>b</p>"#
        );
        assert_eq!(out.failed_images, 0);
    }

    #[tokio::test]
    async fn already_inline_sources_are_skipped_entirely() {
        let inliner = ScriptedInliner::always(None);
        let html = r#"<img src="data:image/png;base64,AA"><img src='blob:https://x/1'>"#;
        let out = preprocess_images(html, &inliner, None).await;
        assert_eq!(out.html, html);
        assert_eq!(out.failed_images, 0);
        assert!(inliner.seen().is_empty(), "inliner must never see them");
    }

    #[tokio::test]
    async fn failures_become_placeholders_and_are_counted() {
        let inliner = ScriptedInliner::always(None);
        let html = r#"<img src="https://a.example/1.png"><img src="https://a.example/2.png"><img src="https://a.example/3.png">"#;
        let out = preprocess_images(html, &inliner, None).await;
        assert_eq!(out.failed_images, 3);
        assert_eq!(out.html.matches(PLACEHOLDER_IMAGE).count(), 3);
        assert!(!out.html.contains("https://a.example"));
    }

    #[tokio::test]
    async fn duplicate_tags_are_each_rewritten_in_place() {
        let inliner = ScriptedInliner::always(None);
        let html = r#"<img src="https://a.example/same.png"><p>mid</p><img src="https://a.example/same.png">"#;
        let out = preprocess_images(html, &inliner, None).await;
        assert_eq!(out.failed_images, 2);
        assert_eq!(out.html.matches(PLACEHOLDER_IMAGE).count(), 2);
        assert!(out.html.contains("<p>mid</p>"));
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_counts_skipped_tags() {
        let inliner = ScriptedInliner::always(Some("data:image/png;base64,OK"));
        let html = r#"<img src="data:image/gif;base64,AA"><img src="https://x/1.png"><img src='https://x/2.png'>"#;
        let reports = Mutex::new(Vec::new());
        let record = |current: usize, total: usize| {
            reports.lock().unwrap().push((current, total));
        };
        let out = preprocess_images(html, &inliner, Some(&record)).await;
        assert_eq!(out.failed_images, 0);
        assert_eq!(
            reports.into_inner().unwrap(),
            vec![(1, 3), (2, 3), (3, 3)],
            "one report per tag, 1-based, constant total"
        );
    }

    #[tokio::test]
    async fn single_quoted_sources_are_matched() {
        let inliner = ScriptedInliner::always(Some("data:image/png;base64,OK"));
        let out = preprocess_images("<img src='https://x/1.png'>", &inliner, None).await;
        assert!(out.html.contains("data:image/png;base64,OK"));
        assert_eq!(inliner.seen(), vec!["https://x/1.png".to_string()]);
    }
}
