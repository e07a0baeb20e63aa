//! Render settings loading: the knobs a caller may override in a config
//! file, layered over the library's built-in defaults.
//!
//! Only the two backends' settings are sourced from disk; `LayoutSettings`
//! itself stays derived (`TextRenderSettings::layout_settings`) so there is
//! one place that decides how a text-column unit maps to layout units.
//! Unknown fields are ignored during deserialization so old config files
//! keep loading across additions.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use core_diagram::{EndClass, LayoutSettings};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextRenderSettings {
    pub end_class: EndClassConfig,
    pub max_width: Option<i64>,
}

impl Default for TextRenderSettings {
    fn default() -> Self {
        Self {
            end_class: EndClassConfig::Complex,
            max_width: None,
        }
    }
}

impl TextRenderSettings {
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings {
            max_width: self.max_width,
            ..LayoutSettings::text_defaults()
        }
    }

    pub fn end_class(&self) -> EndClass {
        self.end_class.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndClassConfig {
    Simple,
    Complex,
}

impl From<EndClassConfig> for EndClass {
    fn from(value: EndClassConfig) -> Self {
        match value {
            EndClassConfig::Simple => EndClass::Simple,
            EndClassConfig::Complex => EndClass::Complex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgRenderSettings {
    pub end_class: EndClassConfig,
    pub character_advance: f64,
    pub wide_character_advance: f64,
    pub line_height: f64,
    pub css: Option<String>,
}

impl Default for SvgRenderSettings {
    fn default() -> Self {
        Self {
            end_class: EndClassConfig::Complex,
            character_advance: 8.0,
            wide_character_advance: 16.0,
            line_height: 20.0,
            css: None,
        }
    }
}

impl SvgRenderSettings {
    pub fn layout_settings(&self) -> LayoutSettings {
        LayoutSettings::text_defaults()
    }

    pub fn end_class(&self) -> EndClass {
        self.end_class.into()
    }

    pub fn css(&self) -> &str {
        self.css.as_deref().unwrap_or(DEFAULT_CSS)
    }
}

/// Stylesheet embedded in every SVG document unless overridden.
pub const DEFAULT_CSS: &str = r#"
.terminal { fill: #e8e8e8; stroke: #333; }
.non-terminal { fill: #f4f4f4; stroke: #333; }
.comment { fill: none; stroke: none; font-style: italic; }
.group-box { stroke: #888; stroke-dasharray: 2,2; }
.line { stroke: #333; }
text { font-family: monospace; text-anchor: middle; }
"#;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub text: TextRenderSettings,
    pub svg: SvgRenderSettings,
}

impl RenderConfig {
    /// Loads a config file if `path` exists, falling back to defaults
    /// (logged at `info`) when it doesn't. A present-but-malformed file is
    /// an error, not a silent fallback.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no render config found, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading render config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("parsing render config at {}", path.display()))?;
        info!(path = %path.display(), "loaded render config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = RenderConfig::load("/nonexistent/railroad.toml").unwrap();
        assert_eq!(config.text.end_class(), EndClass::Complex);
    }

    #[test]
    fn parses_overrides_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railroad.toml");
        fs::write(&path, "[text]\nend_class = \"simple\"\nmax_width = 80\n").unwrap();
        let config = RenderConfig::load(&path).unwrap();
        assert_eq!(config.text.end_class(), EndClass::Simple);
        assert_eq!(config.text.max_width, Some(80));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("railroad.toml");
        fs::write(&path, "not valid toml =====").unwrap();
        assert!(RenderConfig::load(&path).is_err());
    }
}
