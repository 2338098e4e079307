//! Image inlining: one external image URL → self-contained PNG data URI.
//!
//! ## Why inline at all?
//!
//! Snapshot renderers cannot read pixels out of a surface that referenced a
//! cross-origin image — the canvas is "tainted" and the whole export fails.
//! Re-fetching every image ourselves and embedding it as a `data:` URI
//! removes the cross-origin reference entirely, so the renderer only ever
//! sees self-contained markup.
//!
//! ## Fetch strategy
//!
//! An ordered candidate list with a per-candidate bound, short-circuiting
//! on the first success:
//!
//! 1. the URL itself, bounded by 5 seconds;
//! 2. two public image-proxy rewritings in fixed order, bounded by
//!    8 seconds each — for hosts that reject direct fetches with
//!    hotlink protection.
//!
//! Every failure mode (timeout, HTTP error, undecodable bytes) resolves to
//! `None` rather than an error; the caller substitutes a placeholder. PNG
//! is re-encoded regardless of the source format so the embedded data is
//! lossless and uniform.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::BoxFuture;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Whether a source is already self-contained (embedded data or an
/// ephemeral in-session blob) and needs no inlining.
pub fn is_inline_uri(src: &str) -> bool {
    src.starts_with("data:") || src.starts_with("blob:")
}

/// The two public image-proxy rewritings, in the order they are tried.
///
/// weserv re-encodes and caps the width at 800 px, which also tames
/// oversized upstream images; corsproxy passes bytes through untouched.
pub fn proxy_candidates(url: &str) -> [String; 2] {
    let encoded = urlencoding::encode(url);
    [
        format!("https://images.weserv.nl/?url={encoded}&w=800"),
        format!("https://corsproxy.io/?{encoded}"),
    ]
}

/// Fetches raw image bytes for one URL.
///
/// The seam exists so the inliner can be exercised without a network:
/// production uses [`HttpImageFetcher`], tests use a map-backed mock.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the body bytes behind `url`, or a short failure reason.
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, String>>;
}

/// [`ImageFetcher`] over a shared `reqwest` client.
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageFetcher for HttpImageFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Vec<u8>, String>> {
        Box::pin(async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| e.to_string())?;
            if !response.status().is_success() {
                return Err(format!("HTTP {}", response.status()));
            }
            let bytes = response.bytes().await.map_err(|e| e.to_string())?;
            Ok(bytes.to_vec())
        })
    }
}

/// Converts one image source into an inline data URI, or `None` on failure.
pub trait ImageInliner: Send + Sync {
    fn inline<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>>;
}

/// Production [`ImageInliner`]: fetch, decode, re-encode as PNG, base64.
pub struct FetchInliner {
    fetcher: Arc<dyn ImageFetcher>,
    direct_timeout: Duration,
    proxy_timeout: Duration,
}

impl FetchInliner {
    /// Inliner with the default 5 s direct / 8 s proxy bounds.
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self::with_timeouts(fetcher, Duration::from_secs(5), Duration::from_secs(8))
    }

    pub fn with_timeouts(
        fetcher: Arc<dyn ImageFetcher>,
        direct_timeout: Duration,
        proxy_timeout: Duration,
    ) -> Self {
        Self {
            fetcher,
            direct_timeout,
            proxy_timeout,
        }
    }

    /// One bounded fetch-and-encode attempt against a single candidate URL.
    async fn attempt(&self, url: &str, bound: Duration) -> Option<String> {
        let bytes = match timeout(bound, self.fetcher.fetch(url)).await {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(reason)) => {
                debug!("image fetch failed for {url}: {reason}");
                return None;
            }
            Err(_) => {
                debug!("image fetch timed out after {bound:?} for {url}");
                return None;
            }
        };
        encode_png_data_uri(&bytes)
    }
}

impl ImageInliner for FetchInliner {
    fn inline<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            if is_inline_uri(url) {
                return Some(url.to_string());
            }

            let mut candidates = vec![(url.to_string(), self.direct_timeout)];
            candidates.extend(
                proxy_candidates(url)
                    .into_iter()
                    .map(|proxied| (proxied, self.proxy_timeout)),
            );

            for (candidate, bound) in candidates {
                if let Some(data_uri) = self.attempt(&candidate, bound).await {
                    return Some(data_uri);
                }
            }

            warn!("image could not be inlined: {url}");
            None
        })
    }
}

/// Decode arbitrary image bytes and re-encode them as a PNG data URI.
///
/// Undecodable bytes (wrong content type, truncated download, a format the
/// decoder does not know) resolve to `None` — the same degradation as a
/// failed fetch.
fn encode_png_data_uri(bytes: &[u8]) -> Option<String> {
    let img = image::load_from_memory(bytes).ok()?;
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .ok()?;
    Some(format!("data:image/png;base64,{}", STANDARD.encode(&buf)))
}
