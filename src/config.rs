//! Configuration types for card styling and export.
//!
//! Two structs, two owners:
//!
//! * [`CardConfig`] — the user-facing style/content record. Owned and
//!   mutated by the UI layer; the export pipeline only reads `content` and
//!   the derived style values and never writes back.
//!
//! * [`ExportConfig`] — pipeline knobs (timeouts, pixel ratios, allowed
//!   image hosts, brand name). Built via [`ExportConfigBuilder`] so callers
//!   set only what they care about and rely on documented defaults for the
//!   rest.

use crate::error::ExportError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body font size of the card content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    /// CSS `font-size` value for the card body.
    pub fn css_value(self) -> &'static str {
        match self {
            FontSize::Small => "13px",
            FontSize::Medium => "14px",
            FontSize::Large => "16px",
        }
    }
}

/// Inner padding of the card content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MarginSize {
    Compact,
    #[default]
    Standard,
    Loose,
}

impl MarginSize {
    /// CSS `padding` value for the card content block.
    pub fn css_value(self) -> &'static str {
        match self {
            MarginSize::Compact => "16px",
            MarginSize::Standard => "24px",
            MarginSize::Loose => "32px",
        }
    }
}

/// Overall aspect of the exported card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardSize {
    /// 3:4 portrait card.
    #[default]
    Portrait,
    /// 1:1 square card.
    Square,
    /// Height follows content.
    Long,
}

impl CardSize {
    /// CSS `aspect-ratio` value, or `None` when height follows content.
    pub fn aspect_ratio(self) -> Option<&'static str> {
        match self {
            CardSize::Portrait => Some("3 / 4"),
            CardSize::Square => Some("1 / 1"),
            CardSize::Long => None,
        }
    }
}

/// Style and content choices for one card.
///
/// A flat record: every field is independent, there is nothing to validate,
/// and cloning is cheap enough to snapshot per export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardConfig {
    /// Card title shown in the header area.
    pub title: String,
    /// Signature line shown in the footer bar.
    pub signature: String,
    /// The rich-text HTML fragment — the pipeline's input.
    pub content: String,
    /// Selected template id (see [`crate::templates`]).
    pub template_id: String,
    pub card_size: CardSize,
    /// CSS `font-family` stack for the card body.
    pub font_family: String,
    pub font_size: FontSize,
    pub margin: MarginSize,
    /// Optional avatar/logo URL shown next to the signature.
    pub logo: Option<String>,
    /// Link encoded into the article QR code; no QR block when unset.
    pub article_link: Option<String>,
    /// Caption under the article QR code.
    pub article_qr_text: Option<String>,
    /// Link encoded into the tool-promotion QR code.
    pub tool_link: Option<String>,
    /// Caption under the tool-promotion QR code.
    pub tool_qr_text: Option<String>,
    /// Whether the tool-promotion QR block is rendered at all.
    pub show_tool_qr: bool,
}

/// Pipeline knobs for one exporter instance.
///
/// Built via [`ExportConfig::builder()`] or [`ExportConfig::default()`].
///
/// # Example
/// ```rust
/// use cardsnap::ExportConfig;
///
/// let config = ExportConfig::builder()
///     .brand("mycards")
///     .settle_delay_ms(250)
///     .build()
///     .unwrap();
/// assert_eq!(config.brand, "mycards");
/// ```
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Brand prefix used in exported filenames (`<brand>_<timestamp>.png`).
    /// Default: `"cardsnap"`.
    pub brand: String,

    /// Wait between preparing the card markup and snapshotting it, so the
    /// renderer finishes layout and image decode. Default: 500 ms.
    pub settle_delay_ms: u64,

    /// Pixel density for file export. Default: 3.0.
    ///
    /// File export is the "keep this" path, so it gets the highest density
    /// a typical renderer can produce without exhausting memory.
    pub file_pixel_ratio: f32,

    /// Pixel density for clipboard export. Default: 2.0.
    ///
    /// Clipboards have practical payload limits and paste targets rarely
    /// benefit from 3x, so the copy path trades density for reliability.
    pub clipboard_pixel_ratio: f32,

    /// How long the success status stays visible before auto-clearing.
    /// Default: 2000 ms.
    pub status_clear_delay_ms: u64,

    /// Bound on the direct image fetch attempt. Default: 5 s.
    pub direct_fetch_timeout: Duration,

    /// Bound on each proxy fetch attempt. Default: 8 s.
    ///
    /// Proxies re-fetch and often re-encode the upstream image, so they get
    /// a longer leash than the direct attempt.
    pub proxy_fetch_timeout: Duration,

    /// Hosts whose images the snapshot source policy admits even when not
    /// inlined — services that send permissive CORS headers and therefore
    /// cannot taint the canvas. Default: the QR and avatar services the
    /// card shell itself embeds.
    pub allowed_image_hosts: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            brand: "cardsnap".to_string(),
            settle_delay_ms: 500,
            file_pixel_ratio: 3.0,
            clipboard_pixel_ratio: 2.0,
            status_clear_delay_ms: 2000,
            direct_fetch_timeout: Duration::from_secs(5),
            proxy_fetch_timeout: Duration::from_secs(8),
            allowed_image_hosts: vec![
                "api.qrserver.com".to_string(),
                "api.dicebear.com".to_string(),
            ],
        }
    }
}

impl ExportConfig {
    /// Create a new builder for `ExportConfig`.
    pub fn builder() -> ExportConfigBuilder {
        ExportConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ExportConfig`].
#[derive(Debug)]
pub struct ExportConfigBuilder {
    config: ExportConfig,
}

impl ExportConfigBuilder {
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.config.brand = brand.into();
        self
    }

    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    pub fn file_pixel_ratio(mut self, ratio: f32) -> Self {
        self.config.file_pixel_ratio = ratio;
        self
    }

    pub fn clipboard_pixel_ratio(mut self, ratio: f32) -> Self {
        self.config.clipboard_pixel_ratio = ratio;
        self
    }

    pub fn status_clear_delay_ms(mut self, ms: u64) -> Self {
        self.config.status_clear_delay_ms = ms;
        self
    }

    pub fn direct_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.direct_fetch_timeout = timeout;
        self
    }

    pub fn proxy_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.config.proxy_fetch_timeout = timeout;
        self
    }

    pub fn allowed_image_hosts(mut self, hosts: Vec<String>) -> Self {
        self.config.allowed_image_hosts = hosts;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExportConfig, ExportError> {
        let c = &self.config;
        if c.brand.is_empty() {
            return Err(ExportError::InvalidConfig("brand must not be empty".into()));
        }
        if c.file_pixel_ratio <= 0.0 || c.clipboard_pixel_ratio <= 0.0 {
            return Err(ExportError::InvalidConfig(
                "pixel ratios must be positive".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let c = ExportConfig::builder().build().unwrap();
        assert_eq!(c.brand, "cardsnap");
        assert_eq!(c.settle_delay_ms, 500);
        assert_eq!(c.file_pixel_ratio, 3.0);
        assert_eq!(c.clipboard_pixel_ratio, 2.0);
        assert_eq!(c.direct_fetch_timeout, Duration::from_secs(5));
        assert_eq!(c.proxy_fetch_timeout, Duration::from_secs(8));
    }

    #[test]
    fn builder_rejects_empty_brand() {
        assert!(ExportConfig::builder().brand("").build().is_err());
    }

    #[test]
    fn builder_rejects_zero_pixel_ratio() {
        assert!(ExportConfig::builder().file_pixel_ratio(0.0).build().is_err());
    }

    #[test]
    fn style_scale_css_values() {
        assert_eq!(FontSize::Small.css_value(), "13px");
        assert_eq!(FontSize::Medium.css_value(), "14px");
        assert_eq!(FontSize::Large.css_value(), "16px");
        assert_eq!(MarginSize::Compact.css_value(), "16px");
        assert_eq!(MarginSize::Loose.css_value(), "32px");
        assert_eq!(CardSize::Square.aspect_ratio(), Some("1 / 1"));
        assert_eq!(CardSize::Long.aspect_ratio(), None);
    }
}
