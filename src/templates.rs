//! The built-in card template catalog.
//!
//! A template is a small palette: card background (solid color or CSS
//! gradient), primary text color, and a secondary color for captions and
//! accents. The catalog is fixed; callers select a template by id and fall
//! back to the first entry when the id is unknown, so a stale saved id can
//! never leave a card unstyled.

/// Visual palette for one card style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Stable identifier stored in [`crate::config::CardConfig::template_id`].
    pub id: &'static str,
    /// Display name shown in pickers.
    pub name: &'static str,
    /// CSS background value — either a solid color or a `linear-gradient(…)`.
    pub background: &'static str,
    /// Primary text color.
    pub text: &'static str,
    /// Secondary text color for captions and accents.
    pub secondary: &'static str,
}

impl Template {
    /// Whether the background is a CSS gradient rather than a solid color.
    ///
    /// Gradients cannot be expressed as a snapshot background-color option,
    /// so the exporter skips the forced background for them and lets the
    /// card markup paint itself.
    pub fn has_gradient_background(&self) -> bool {
        self.background.contains("gradient")
    }
}

/// All built-in templates, in picker order.
pub const TEMPLATES: &[Template] = &[
    Template {
        id: "lavender",
        name: "Lavender",
        background: "linear-gradient(135deg, #a78bfa 0%, #f472b6 100%)",
        text: "#ffffff",
        secondary: "rgba(255, 255, 255, 0.8)",
    },
    Template {
        id: "midnight",
        name: "Midnight",
        background: "linear-gradient(135deg, #0f172a 0%, #1e293b 100%)",
        text: "#f8fafc",
        secondary: "rgba(248, 250, 252, 0.7)",
    },
    Template {
        id: "sunset",
        name: "Sunset",
        background: "linear-gradient(135deg, #f97316 0%, #ef4444 100%)",
        text: "#ffffff",
        secondary: "rgba(255, 255, 255, 0.8)",
    },
    Template {
        id: "forest",
        name: "Forest",
        background: "linear-gradient(135deg, #059669 0%, #065f46 100%)",
        text: "#ffffff",
        secondary: "rgba(255, 255, 255, 0.8)",
    },
    Template {
        id: "minimal",
        name: "Minimal",
        background: "#f8fafc",
        text: "#1e293b",
        secondary: "#64748b",
    },
];

/// Look up a template by id, falling back to the first catalog entry.
pub fn template_or_default(id: &str) -> &'static Template {
    TEMPLATES.iter().find(|t| t.id == id).unwrap_or(&TEMPLATES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_id() {
        assert_eq!(template_or_default("sunset").name, "Sunset");
    }

    #[test]
    fn unknown_id_falls_back_to_first() {
        assert_eq!(template_or_default("no-such-template").id, TEMPLATES[0].id);
    }

    #[test]
    fn gradient_detection() {
        assert!(template_or_default("lavender").has_gradient_background());
        assert!(!template_or_default("minimal").has_gradient_background());
    }

    #[test]
    fn ids_are_unique() {
        let mut ids: Vec<_> = TEMPLATES.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), TEMPLATES.len());
    }
}
