//! The snapshot renderer seam: prepared card markup → PNG bytes.
//!
//! Rasterization itself is an external collaborator (a headless browser, a
//! webview, an HTML-to-image service). The library owns only the contract:
//! the renderer receives fully prepared, self-contained markup plus
//! [`SnapshotOptions`], and returns PNG bytes or a structured
//! [`SnapshotError`](crate::error::SnapshotError) the classifier can
//! introspect.
//!
//! The prepared fragment is passed directly into the renderer — no shared
//! render state is mutated for the handoff, so nothing constrains who else
//! reads the preview while an export runs.

use crate::error::SnapshotError;
use crate::pipeline::inline::is_inline_uri;
use futures::future::BoxFuture;

/// Per-image inclusion policy applied by the renderer.
///
/// Un-inlined cross-origin images must not reach the rasterizer's canvas —
/// one of them is enough to taint the surface and fail the whole export.
/// The policy admits self-contained sources plus a short list of hosts
/// known to send permissive CORS headers (the QR and avatar services the
/// card shell itself embeds).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePolicy {
    allowed_hosts: Vec<String>,
}

impl SourcePolicy {
    pub fn new(allowed_hosts: Vec<String>) -> Self {
        Self { allowed_hosts }
    }

    /// Whether an image with this source may be included in the snapshot.
    pub fn allows(&self, src: &str) -> bool {
        if is_inline_uri(src) {
            return true;
        }
        self.allowed_hosts.iter().any(|host| src.contains(host.as_str()))
    }
}

/// Options for one rasterization call.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOptions {
    /// Device-pixel multiplier for the output image.
    pub pixel_ratio: f32,
    /// Solid background color, or `None` to let the markup paint itself
    /// (gradient templates cannot be expressed as a single color).
    pub background: Option<String>,
    /// Which image sources the renderer may include.
    pub policy: SourcePolicy,
}

/// External DOM-to-raster collaborator.
pub trait SnapshotRenderer: Send + Sync {
    /// Rasterize `html` into PNG bytes.
    ///
    /// Implementations must honour `options.policy` for every image node
    /// they encounter, excluding sources the policy rejects.
    fn rasterize<'a>(
        &'a self,
        html: &'a str,
        options: &'a SnapshotOptions,
    ) -> BoxFuture<'a, Result<Vec<u8>, SnapshotError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> SourcePolicy {
        SourcePolicy::new(vec![
            "api.qrserver.com".to_string(),
            "api.dicebear.com".to_string(),
        ])
    }

    #[test]
    fn inline_sources_are_always_allowed() {
        assert!(policy().allows("data:image/png;base64,AAAA"));
        assert!(policy().allows("blob:https://app.example/123"));
    }

    #[test]
    fn allowed_hosts_pass() {
        assert!(policy().allows("https://api.qrserver.com/v1/create-qr-code/?data=x"));
        assert!(policy().allows("https://api.dicebear.com/7.x/bottts/svg?seed=card"));
    }

    #[test]
    fn other_remote_sources_are_rejected() {
        assert!(!policy().allows("https://cdn.example.com/photo.jpg"));
        assert!(!policy().allows("http://evil.example/x.png"));
    }

    #[test]
    fn empty_policy_rejects_everything_remote() {
        let p = SourcePolicy::default();
        assert!(!p.allows("https://anything.example/a.png"));
        assert!(p.allows("data:image/png;base64,AA"));
    }
}
