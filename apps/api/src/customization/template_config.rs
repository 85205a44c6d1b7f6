//! The template configuration value type.
//!
//! `TemplateConfig` is an immutable value: every change goes through
//! [`TemplateConfig::with_value`], which returns a new instance. The field set is
//! fixed and addressed through [`ConfigField`]; values arrive from the wire as
//! loosely typed JSON and are checked against the field's [`FieldKind`] before
//! they are applied.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::customization::CustomizationError;

// ────────────────────────────────────────────────────────────────────────────
// Config value type
// ────────────────────────────────────────────────────────────────────────────

/// Presentation options controlling how a resume renders.
///
/// Spacing fields are expressed in millimetres (margins) and points (gaps);
/// `line_height` is a unitless multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub font_family: String,
    pub font_size: f32,
    pub color_scheme: String,
    pub layout_style: String,
    pub header_style: String,
    pub show_borders: bool,
    pub show_icons: bool,
    pub spacing_preset: String,
    pub margin_top: f32,
    pub margin_side: f32,
    pub section_gap: f32,
    pub item_gap: f32,
    pub line_height: f32,
}

/// The named options of a [`TemplateConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfigField {
    FontFamily,
    FontSize,
    ColorScheme,
    LayoutStyle,
    HeaderStyle,
    ShowBorders,
    ShowIcons,
    SpacingPreset,
    MarginTop,
    MarginSide,
    SectionGap,
    ItemGap,
    LineHeight,
}

/// The kind of value a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty identifier or name.
    Text,
    Flag,
    /// Finite, non-negative number.
    Measure,
}

impl ConfigField {
    pub const ALL: [ConfigField; 13] = [
        ConfigField::FontFamily,
        ConfigField::FontSize,
        ConfigField::ColorScheme,
        ConfigField::LayoutStyle,
        ConfigField::HeaderStyle,
        ConfigField::ShowBorders,
        ConfigField::ShowIcons,
        ConfigField::SpacingPreset,
        ConfigField::MarginTop,
        ConfigField::MarginSide,
        ConfigField::SectionGap,
        ConfigField::ItemGap,
        ConfigField::LineHeight,
    ];

    /// Wire name of the field (camelCase).
    pub fn key(self) -> &'static str {
        match self {
            ConfigField::FontFamily => "fontFamily",
            ConfigField::FontSize => "fontSize",
            ConfigField::ColorScheme => "colorScheme",
            ConfigField::LayoutStyle => "layoutStyle",
            ConfigField::HeaderStyle => "headerStyle",
            ConfigField::ShowBorders => "showBorders",
            ConfigField::ShowIcons => "showIcons",
            ConfigField::SpacingPreset => "spacingPreset",
            ConfigField::MarginTop => "marginTop",
            ConfigField::MarginSide => "marginSide",
            ConfigField::SectionGap => "sectionGap",
            ConfigField::ItemGap => "itemGap",
            ConfigField::LineHeight => "lineHeight",
        }
    }

    /// snake_case alias of [`ConfigField::key`].
    pub fn snake_key(self) -> &'static str {
        match self {
            ConfigField::FontFamily => "font_family",
            ConfigField::FontSize => "font_size",
            ConfigField::ColorScheme => "color_scheme",
            ConfigField::LayoutStyle => "layout_style",
            ConfigField::HeaderStyle => "header_style",
            ConfigField::ShowBorders => "show_borders",
            ConfigField::ShowIcons => "show_icons",
            ConfigField::SpacingPreset => "spacing_preset",
            ConfigField::MarginTop => "margin_top",
            ConfigField::MarginSide => "margin_side",
            ConfigField::SectionGap => "section_gap",
            ConfigField::ItemGap => "item_gap",
            ConfigField::LineHeight => "line_height",
        }
    }

    /// Resolves a field from its exact camelCase or snake_case name.
    pub fn parse(key: &str) -> Result<Self, CustomizationError> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.snake_key() == key)
            .ok_or_else(|| CustomizationError::InvalidField(key.to_string()))
    }

    pub fn kind(self) -> FieldKind {
        match self {
            ConfigField::FontFamily
            | ConfigField::ColorScheme
            | ConfigField::LayoutStyle
            | ConfigField::HeaderStyle
            | ConfigField::SpacingPreset => FieldKind::Text,
            ConfigField::ShowBorders | ConfigField::ShowIcons => FieldKind::Flag,
            ConfigField::FontSize
            | ConfigField::MarginTop
            | ConfigField::MarginSide
            | ConfigField::SectionGap
            | ConfigField::ItemGap
            | ConfigField::LineHeight => FieldKind::Measure,
        }
    }
}

/// A single field value as supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl ConfigValue {
    /// Converts a JSON scalar. Arrays, objects and null have no config meaning.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(ConfigValue::Flag(*b)),
            Value::Number(n) => n.as_f64().map(ConfigValue::Number),
            Value::String(s) => Some(ConfigValue::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Flag(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Field access
// ────────────────────────────────────────────────────────────────────────────

impl TemplateConfig {
    /// Returns a copy with `field` replaced by `value`.
    ///
    /// This is a plain field replacement: setting `spacingPreset` here does not
    /// expand the preset. Preset expansion is the controller's job.
    pub fn with_value(
        &self,
        field: ConfigField,
        value: &ConfigValue,
    ) -> Result<TemplateConfig, CustomizationError> {
        let mut next = self.clone();
        next.set(field, value)?;
        Ok(next)
    }

    fn set(&mut self, field: ConfigField, value: &ConfigValue) -> Result<(), CustomizationError> {
        match field.kind() {
            FieldKind::Text => {
                let text = expect_text(field, value)?;
                let slot = match field {
                    ConfigField::FontFamily => &mut self.font_family,
                    ConfigField::ColorScheme => &mut self.color_scheme,
                    ConfigField::LayoutStyle => &mut self.layout_style,
                    ConfigField::HeaderStyle => &mut self.header_style,
                    _ => &mut self.spacing_preset,
                };
                *slot = text;
            }
            FieldKind::Flag => {
                let flag = expect_flag(field, value)?;
                if field == ConfigField::ShowBorders {
                    self.show_borders = flag;
                } else {
                    self.show_icons = flag;
                }
            }
            FieldKind::Measure => {
                let number = expect_measure(field, value)?;
                let slot = match field {
                    ConfigField::FontSize => &mut self.font_size,
                    ConfigField::MarginTop => &mut self.margin_top,
                    ConfigField::MarginSide => &mut self.margin_side,
                    ConfigField::SectionGap => &mut self.section_gap,
                    ConfigField::ItemGap => &mut self.item_gap,
                    _ => &mut self.line_height,
                };
                *slot = number;
            }
        }
        Ok(())
    }

    /// Overlays a saved configuration document on top of `self` (the template
    /// defaults). Unknown keys are ignored and invalid values keep the default,
    /// so documents saved by older or newer versions still load.
    pub fn merged_with(&self, saved: &Value) -> TemplateConfig {
        let Some(object) = saved.as_object() else {
            debug!("Saved template config is not an object, using defaults");
            return self.clone();
        };

        let mut merged = self.clone();
        for (key, raw) in object {
            let Ok(field) = ConfigField::parse(key) else {
                debug!("Ignoring unknown saved config key '{key}'");
                continue;
            };
            let applied = ConfigValue::from_json(raw)
                .ok_or_else(|| CustomizationError::InvalidValue {
                    field: key.clone(),
                    reason: "expected a scalar".to_string(),
                })
                .and_then(|value| merged.set(field, &value));
            if let Err(e) = applied {
                debug!("Keeping default for saved config key '{key}': {e}");
            }
        }
        merged
    }
}

fn expect_text(field: ConfigField, value: &ConfigValue) -> Result<String, CustomizationError> {
    match value {
        ConfigValue::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        ConfigValue::Text(_) => Err(invalid(field, "must not be empty")),
        _ => Err(invalid(field, "expected a string")),
    }
}

fn expect_flag(field: ConfigField, value: &ConfigValue) -> Result<bool, CustomizationError> {
    match value {
        ConfigValue::Flag(b) => Ok(*b),
        _ => Err(invalid(field, "expected a boolean")),
    }
}

fn expect_measure(field: ConfigField, value: &ConfigValue) -> Result<f32, CustomizationError> {
    let ConfigValue::Number(n) = value else {
        return Err(invalid(field, "expected a number"));
    };
    // Checked after narrowing: values beyond f32 range become infinite.
    let narrowed = *n as f32;
    if !narrowed.is_finite() || narrowed < 0.0 {
        return Err(invalid(field, "must be a finite, non-negative number"));
    }
    if narrowed == 0.0 && matches!(field, ConfigField::FontSize | ConfigField::LineHeight) {
        return Err(invalid(field, "must be greater than zero"));
    }
    Ok(narrowed)
}

fn invalid(field: ConfigField, reason: &str) -> CustomizationError {
    CustomizationError::InvalidValue {
        field: field.key().to_string(),
        reason: reason.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Partial updates
// ────────────────────────────────────────────────────────────────────────────

/// A validated set of field changes applied as one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigPatch {
    changes: BTreeMap<ConfigField, ConfigValue>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: ConfigField, value: impl Into<ConfigValue>) -> Self {
        self.changes.insert(field, value.into());
        self
    }

    /// Builds a patch from a JSON object. Any unknown key or non-scalar value
    /// rejects the whole object.
    pub fn from_json(object: &Map<String, Value>) -> Result<Self, CustomizationError> {
        let mut patch = ConfigPatch::new();
        for (key, raw) in object {
            let field = ConfigField::parse(key)?;
            let value = ConfigValue::from_json(raw).ok_or_else(|| CustomizationError::InvalidValue {
                field: key.clone(),
                reason: "expected a scalar".to_string(),
            })?;
            if patch.changes.insert(field, value).is_some() {
                return Err(CustomizationError::InvalidValue {
                    field: key.clone(),
                    reason: format!("'{}' is set more than once", field.key()),
                });
            }
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn get(&self, field: ConfigField) -> Option<&ConfigValue> {
        self.changes.get(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConfigField, &ConfigValue)> {
        self.changes.iter().map(|(f, v)| (*f, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::presets::default_config;
    use serde_json::json;

    #[test]
    fn test_parse_accepts_camel_and_snake_case() {
        assert_eq!(ConfigField::parse("showBorders").unwrap(), ConfigField::ShowBorders);
        assert_eq!(ConfigField::parse("show_borders").unwrap(), ConfigField::ShowBorders);
        assert_eq!(ConfigField::parse("spacing_preset").unwrap(), ConfigField::SpacingPreset);
        assert!(matches!(
            ConfigField::parse("fontWeight"),
            Err(CustomizationError::InvalidField(_))
        ));
    }

    #[test]
    fn test_parse_rejects_loose_spellings() {
        for key in ["SHOWBORDERS", "s_h_o_w_borders", "fontsize", "Show_Borders", "fontSize "] {
            assert!(
                matches!(ConfigField::parse(key), Err(CustomizationError::InvalidField(_))),
                "{key} should not resolve"
            );
        }
    }

    #[test]
    fn test_every_field_resolves_from_both_spellings() {
        for field in ConfigField::ALL {
            assert_eq!(ConfigField::parse(field.key()).unwrap(), field);
            assert_eq!(ConfigField::parse(field.snake_key()).unwrap(), field);
        }
    }

    #[test]
    fn test_measure_beyond_f32_range_rejected() {
        let base = default_config("modern-1");
        for n in [1e39, f64::MAX, -1e39] {
            assert!(matches!(
                base.with_value(ConfigField::FontSize, &ConfigValue::Number(n)),
                Err(CustomizationError::InvalidValue { .. })
            ));
        }
        let ok = base
            .with_value(ConfigField::FontSize, &ConfigValue::Number(12.5))
            .unwrap();
        assert_eq!(ok.font_size, 12.5);
    }

    #[test]
    fn test_with_value_leaves_original_untouched() {
        let base = default_config("modern-1");
        let next = base
            .with_value(ConfigField::ShowBorders, &ConfigValue::Flag(false))
            .unwrap();
        assert!(base.show_borders);
        assert!(!next.show_borders);
        assert_eq!(next.font_family, base.font_family);
    }

    #[test]
    fn test_with_value_rejects_wrong_kind() {
        let base = default_config("modern-1");
        assert!(base.with_value(ConfigField::ShowBorders, &"no".into()).is_err());
        assert!(base.with_value(ConfigField::FontFamily, &true.into()).is_err());
        assert!(base.with_value(ConfigField::MarginTop, &(-1.0).into()).is_err());
        assert!(base.with_value(ConfigField::FontSize, &0.0.into()).is_err());
        assert!(base.with_value(ConfigField::ColorScheme, &"  ".into()).is_err());
    }

    #[test]
    fn test_serializes_camel_case_keys() {
        let value = serde_json::to_value(default_config("modern-1")).unwrap();
        assert_eq!(value["fontFamily"], "inter");
        assert_eq!(value["showBorders"], true);
        assert_eq!(value["spacingPreset"], "comfortable");
    }

    #[test]
    fn test_merge_fills_missing_fields_from_defaults() {
        let defaults = default_config("modern-1");
        let merged = defaults.merged_with(&json!({ "colorScheme": "blue" }));
        assert_eq!(merged.color_scheme, "blue");
        assert_eq!(merged.font_family, defaults.font_family);
        assert_eq!(merged.line_height, defaults.line_height);
    }

    #[test]
    fn test_merge_ignores_unknown_and_invalid_keys() {
        let defaults = default_config("modern-1");
        let merged = defaults.merged_with(&json!({
            "legacyTheme": "dark",
            "showBorders": "yes",
            "fontSize": 12,
        }));
        assert!(merged.show_borders);
        assert_eq!(merged.font_size, 12.0);
    }

    #[test]
    fn test_merge_non_object_yields_defaults() {
        let defaults = default_config("classic-1");
        assert_eq!(defaults.merged_with(&json!("garbage")), defaults);
        assert_eq!(defaults.merged_with(&Value::Null), defaults);
    }

    #[test]
    fn test_patch_from_json_rejects_unknown_key() {
        let object = json!({ "showBorders": false, "bogus": 1 });
        let result = ConfigPatch::from_json(object.as_object().unwrap());
        assert!(matches!(result, Err(CustomizationError::InvalidField(k)) if k == "bogus"));
    }

    #[test]
    fn test_patch_from_json_rejects_duplicate_field() {
        let object = json!({ "showBorders": false, "show_borders": true });
        let result = ConfigPatch::from_json(object.as_object().unwrap());
        assert!(matches!(result, Err(CustomizationError::InvalidValue { .. })));
    }

    #[test]
    fn test_patch_from_json_collects_fields() {
        let object = json!({ "showBorders": false, "font_family": "lato", "itemGap": 6 });
        let patch = ConfigPatch::from_json(object.as_object().unwrap()).unwrap();
        assert_eq!(patch.len(), 3);
        assert_eq!(patch.get(ConfigField::FontFamily), Some(&ConfigValue::from("lato")));
        assert_eq!(patch.get(ConfigField::ItemGap), Some(&ConfigValue::Number(6.0)));
    }
}
