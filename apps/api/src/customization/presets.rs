//! Fixed lookup tables: spacing presets and per-template default configs.
//!
//! These tables are configuration data. Every template in [`TEMPLATES`] has a
//! distinct default and every [`SpacingPreset`] expands to concrete values.

use serde::Serialize;
use tracing::warn;

use crate::customization::template_config::TemplateConfig;

// ────────────────────────────────────────────────────────────────────────────
// Spacing presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacingPreset {
    Compact,
    Comfortable,
    Spacious,
}

/// Concrete spacing derived from a preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacingValues {
    /// Top/bottom page margin in mm.
    pub margin_top: f32,
    /// Left/right page margin in mm.
    pub margin_side: f32,
    /// Gap between sections in pt.
    pub section_gap: f32,
    /// Gap between items within a section in pt.
    pub item_gap: f32,
    pub line_height: f32,
}

impl SpacingPreset {
    pub const ALL: [SpacingPreset; 3] = [
        SpacingPreset::Compact,
        SpacingPreset::Comfortable,
        SpacingPreset::Spacious,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SpacingPreset::Compact => "compact",
            SpacingPreset::Comfortable => "comfortable",
            SpacingPreset::Spacious => "spacious",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn values(self) -> SpacingValues {
        match self {
            SpacingPreset::Compact => SpacingValues {
                margin_top: 12.0,
                margin_side: 12.0,
                section_gap: 8.0,
                item_gap: 4.0,
                line_height: 1.2,
            },
            SpacingPreset::Comfortable => SpacingValues {
                margin_top: 18.0,
                margin_side: 18.0,
                section_gap: 14.0,
                item_gap: 8.0,
                line_height: 1.4,
            },
            SpacingPreset::Spacious => SpacingValues {
                margin_top: 24.0,
                margin_side: 22.0,
                section_gap: 20.0,
                item_gap: 12.0,
                line_height: 1.6,
            },
        }
    }

    /// Returns `config` with this preset's name and derived spacing applied.
    pub fn apply_to(self, config: &TemplateConfig) -> TemplateConfig {
        let v = self.values();
        TemplateConfig {
            spacing_preset: self.name().to_string(),
            margin_top: v.margin_top,
            margin_side: v.margin_side,
            section_gap: v.section_gap,
            item_gap: v.item_gap,
            line_height: v.line_height,
            ..config.clone()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template catalogue
// ────────────────────────────────────────────────────────────────────────────

/// A template the editor can apply.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

pub const FALLBACK_TEMPLATE: &str = "modern-1";

pub const TEMPLATES: &[TemplateInfo] = &[
    TemplateInfo { id: "modern-1", name: "Modern", category: "modern" },
    TemplateInfo { id: "modern-2", name: "Modern Sidebar", category: "modern" },
    TemplateInfo { id: "classic-1", name: "Classic", category: "classic" },
    TemplateInfo { id: "minimal-1", name: "Minimal", category: "minimal" },
    TemplateInfo { id: "creative-1", name: "Creative", category: "creative" },
    TemplateInfo { id: "executive-1", name: "Executive", category: "professional" },
];

pub fn find_template(template_id: &str) -> Option<&'static TemplateInfo> {
    TEMPLATES.iter().find(|t| t.id == template_id)
}

struct Look {
    font_family: &'static str,
    font_size: f32,
    color_scheme: &'static str,
    layout_style: &'static str,
    header_style: &'static str,
    show_borders: bool,
    show_icons: bool,
    spacing: SpacingPreset,
}

fn build(look: Look) -> TemplateConfig {
    let v = look.spacing.values();
    TemplateConfig {
        font_family: look.font_family.to_string(),
        font_size: look.font_size,
        color_scheme: look.color_scheme.to_string(),
        layout_style: look.layout_style.to_string(),
        header_style: look.header_style.to_string(),
        show_borders: look.show_borders,
        show_icons: look.show_icons,
        spacing_preset: look.spacing.name().to_string(),
        margin_top: v.margin_top,
        margin_side: v.margin_side,
        section_gap: v.section_gap,
        item_gap: v.item_gap,
        line_height: v.line_height,
    }
}

/// Default configuration for a template. Unknown identifiers get the
/// `modern-1` defaults.
pub fn default_config(template_id: &str) -> TemplateConfig {
    let look = match template_id {
        "modern-1" => Look {
            font_family: "inter",
            font_size: 11.0,
            color_scheme: "default",
            layout_style: "single-column",
            header_style: "left",
            show_borders: true,
            show_icons: true,
            spacing: SpacingPreset::Comfortable,
        },
        "modern-2" => Look {
            font_family: "inter",
            font_size: 10.5,
            color_scheme: "blue",
            layout_style: "sidebar-left",
            header_style: "left",
            show_borders: false,
            show_icons: true,
            spacing: SpacingPreset::Compact,
        },
        "classic-1" => Look {
            font_family: "georgia",
            font_size: 11.0,
            color_scheme: "monochrome",
            layout_style: "single-column",
            header_style: "centered",
            show_borders: true,
            show_icons: false,
            spacing: SpacingPreset::Comfortable,
        },
        "minimal-1" => Look {
            font_family: "helvetica",
            font_size: 10.0,
            color_scheme: "slate",
            layout_style: "single-column",
            header_style: "minimal",
            show_borders: false,
            show_icons: false,
            spacing: SpacingPreset::Spacious,
        },
        "creative-1" => Look {
            font_family: "poppins",
            font_size: 10.5,
            color_scheme: "purple",
            layout_style: "two-column",
            header_style: "banner",
            show_borders: false,
            show_icons: true,
            spacing: SpacingPreset::Comfortable,
        },
        "executive-1" => Look {
            font_family: "merriweather",
            font_size: 11.5,
            color_scheme: "navy",
            layout_style: "single-column",
            header_style: "centered",
            show_borders: true,
            show_icons: false,
            spacing: SpacingPreset::Spacious,
        },
        other => {
            warn!("Unknown template '{other}', using {FALLBACK_TEMPLATE} defaults");
            return default_config(FALLBACK_TEMPLATE);
        }
    };
    build(look)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modern_1_defaults() {
        let config = default_config("modern-1");
        assert_eq!(config.font_family, "inter");
        assert_eq!(config.color_scheme, "default");
        assert!(config.show_borders);
        assert_eq!(config.spacing_preset, "comfortable");
        assert_eq!(config.line_height, 1.4);
    }

    #[test]
    fn test_every_template_has_distinct_defaults() {
        let configs: Vec<_> = TEMPLATES.iter().map(|t| default_config(t.id)).collect();
        for (i, a) in configs.iter().enumerate() {
            for b in configs.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unknown_template_falls_back() {
        assert_eq!(default_config("does-not-exist"), default_config(FALLBACK_TEMPLATE));
        assert!(find_template("does-not-exist").is_none());
        assert!(find_template(FALLBACK_TEMPLATE).is_some());
    }

    #[test]
    fn test_preset_lookup_is_total() {
        for preset in SpacingPreset::ALL {
            assert_eq!(SpacingPreset::from_name(preset.name()), Some(preset));
            assert!(preset.values().line_height > 0.0);
        }
        assert_eq!(SpacingPreset::from_name(" Compact "), Some(SpacingPreset::Compact));
        assert_eq!(SpacingPreset::from_name("cozy"), None);
    }

    #[test]
    fn test_apply_to_only_touches_spacing() {
        let base = default_config("classic-1");
        let compact = SpacingPreset::Compact.apply_to(&base);
        assert_eq!(compact.spacing_preset, "compact");
        assert_eq!(compact.section_gap, 8.0);
        assert_eq!(compact.font_family, base.font_family);
        assert_eq!(compact.show_borders, base.show_borders);
    }
}
