//! Card markup assembly: configuration + prepared fragment → full card HTML.
//!
//! The assembled markup is the rasterizer's entire input, so everything the
//! exported image shows must be here: template background, the content
//! block with derived style values, the QR footer, and the signature bar.
//! Pure string assembly — same inputs, same markup, byte for byte.

use crate::config::CardConfig;
use crate::templates::Template;

/// Shown inside the content block when the card has no content yet.
const EMPTY_CONTENT_HINT: &str =
    "<p style=\"color: #94a3b8; text-align: center; margin-top: 2rem;\">Nothing here yet — paste some content…</p>";

/// Assemble the complete card markup around a prepared content fragment.
///
/// `fragment` must already be sanitized and image-inlined; this function
/// only wraps it. User-entered text (title, signature, captions) is
/// HTML-escaped on the way in; the fragment itself is trusted markup.
pub fn render_card_html(card: &CardConfig, template: &Template, fragment: &str) -> String {
    let mut html = String::with_capacity(fragment.len() + 2048);

    let aspect = card
        .card_size
        .aspect_ratio()
        .map(|ratio| format!(" aspect-ratio: {ratio};"))
        .unwrap_or_default();

    html.push_str(&format!(
        "<div class=\"card\" style=\"display: flex; flex-direction: column; \
         background: {background}; font-family: {font};{aspect}\">",
        background = template.background,
        font = escape_attr(&card.font_family),
    ));

    // Content block
    html.push_str(&format!(
        "<div class=\"card-content\" style=\"flex: 1; border-radius: 16px; \
         padding: {padding}; font-size: {font_size}; color: {color};\">",
        padding = card.margin.css_value(),
        font_size = card.font_size.css_value(),
        color = template.text,
    ));
    if !card.title.trim().is_empty() {
        html.push_str(&format!("<h2>{}</h2>", escape_text(card.title.trim())));
    }
    if fragment.trim().is_empty() {
        html.push_str(EMPTY_CONTENT_HINT);
    } else {
        html.push_str(fragment);
    }
    html.push_str("</div>");

    // QR footer
    let article_qr = card
        .article_link
        .as_deref()
        .map(str::trim)
        .filter(|link| !link.is_empty());
    let tool_qr = card
        .tool_link
        .as_deref()
        .map(str::trim)
        .filter(|link| card.show_tool_qr && !link.is_empty());
    if article_qr.is_some() || tool_qr.is_some() {
        html.push_str("<div class=\"card-qr\" style=\"display: flex; justify-content: space-between; gap: 16px;\">");
        if let Some(link) = article_qr {
            let caption = card.article_qr_text.as_deref().unwrap_or("Scan to read the full article");
            html.push_str(&qr_block(link, caption, template.secondary));
        }
        if let Some(link) = tool_qr {
            let caption = card.tool_qr_text.as_deref().unwrap_or("Made with cardsnap");
            html.push_str(&qr_block(link, caption, template.secondary));
        }
        html.push_str("</div>");
    }

    // Signature bar
    html.push_str("<div class=\"card-signature\" style=\"display: flex; align-items: center; gap: 12px; \
                   background: rgba(255,255,255,0.15); border-radius: 12px; padding: 12px 16px;\">");
    if let Some(logo) = card.logo.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        html.push_str(&format!(
            "<img src=\"{}\" alt=\"logo\" style=\"width: 32px; height: 32px; border-radius: 50%;\">",
            escape_attr(logo)
        ));
    }
    html.push_str(&format!(
        "<span style=\"font-weight: bold; color: {};\">{}</span>",
        template.text,
        escape_text(if card.signature.is_empty() { "—" } else { &card.signature }),
    ));
    html.push_str("</div>");

    html.push_str("</div>");
    html
}

/// QR code block: service-generated code plus a caption.
fn qr_block(link: &str, caption: &str, caption_color: &str) -> String {
    format!(
        "<div class=\"qr-block\" style=\"display: flex; flex-direction: column; align-items: center; gap: 8px;\">\
         <img src=\"{qr}\" alt=\"QR code\" style=\"width: 80px; height: 80px;\" crossorigin=\"anonymous\">\
         <p style=\"font-size: 12px; color: {color};\">{caption}</p>\
         </div>",
        qr = qr_service_url(link),
        color = caption_color,
        caption = escape_text(caption),
    )
}

/// URL of the QR-code service image for one payload.
///
/// The host is part of the default snapshot source policy, so these images
/// survive the renderer's inclusion filter without being inlined.
pub fn qr_service_url(payload: &str) -> String {
    format!(
        "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={}&bgcolor=ffffff&margin=0",
        urlencoding::encode(payload)
    )
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::template_or_default;

    fn card() -> CardConfig {
        CardConfig {
            signature: "Ada".to_string(),
            content: String::new(),
            template_id: "minimal".to_string(),
            font_family: "sans-serif".to_string(),
            show_tool_qr: true,
            tool_link: Some("https://cardsnap.example".to_string()),
            ..CardConfig::default()
        }
    }

    #[test]
    fn wraps_the_fragment_with_template_styles() {
        let template = template_or_default("minimal");
        let html = render_card_html(&card(), template, "<p>Hi</p>");
        assert!(html.contains("<p>Hi</p>"));
        assert!(html.contains("background: #f8fafc"));
        assert!(html.contains("font-size: 14px"));
        assert!(html.contains("Ada"));
    }

    #[test]
    fn empty_fragment_gets_the_hint() {
        let template = template_or_default("minimal");
        let html = render_card_html(&card(), template, "  ");
        assert!(html.contains("Nothing here yet"));
    }

    #[test]
    fn article_qr_appears_only_with_a_link() {
        let template = template_or_default("minimal");
        let mut c = card();
        c.show_tool_qr = false;
        c.tool_link = None;
        let without = render_card_html(&c, template, "<p>x</p>");
        assert!(!without.contains("api.qrserver.com"));

        c.article_link = Some("https://example.com/post/1".to_string());
        let with = render_card_html(&c, template, "<p>x</p>");
        assert!(with.contains("api.qrserver.com"));
        assert!(with.contains("https%3A%2F%2Fexample.com%2Fpost%2F1"));
    }

    #[test]
    fn user_text_is_escaped() {
        let template = template_or_default("minimal");
        let mut c = card();
        c.signature = "<script>alert(1)</script>".to_string();
        let html = render_card_html(&c, template, "<p>x</p>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn portrait_card_sets_aspect_ratio() {
        let template = template_or_default("minimal");
        let html = render_card_html(&card(), template, "<p>x</p>");
        assert!(html.contains("aspect-ratio: 3 / 4"));
    }

    #[test]
    fn deterministic_output() {
        let template = template_or_default("lavender");
        let c = card();
        assert_eq!(
            render_card_html(&c, template, "<p>x</p>"),
            render_card_html(&c, template, "<p>x</p>")
        );
    }
}
