//! Configuration persistence for annotator settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::domain::Tool;

/// Stroke widths offered by the toolbar, in canvas pixels
pub const STROKE_WIDTH_CHOICES: [f32; 4] = [1.0, 2.0, 4.0, 6.0];

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Pure red, the pen color the editor opens with
        Self {
            r: 1.0,
            g: 0.0,
            b: 0.0,
        }
    }
}

impl ShapeColor {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` (or `RRGGBB`) hex string
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: f32::from(channel(0)?) / 255.0,
            g: f32::from(channel(2)?) / 255.0,
            b: f32::from(channel(4)?) / 255.0,
        })
    }

    /// Format as `#RRGGBB`
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba_u8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

/// Log level setting for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter string understood by env_logger
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Editor configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Color for new shapes
    pub shape_color: ShapeColor,
    /// Stroke width for new shapes
    pub stroke_width: f32,
    /// Tool active when the editor opens
    pub default_tool: Tool,
    /// Color of the dashed selection outline
    pub highlight_color: ShapeColor,
    /// Whether exported images keep the selection outline
    pub export_include_selection: bool,
    /// File name used for exported images
    pub export_file_name: String,
    /// Padding between the container edge and the drawing surface, per side
    pub viewport_padding: f32,
    /// Maximum number of undo steps kept in memory
    pub history_limit: usize,
    /// Log verbosity for the host binary
    pub log_level: LogLevel,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            shape_color: ShapeColor::default(),
            stroke_width: 2.0,
            default_tool: Tool::Freehand,
            highlight_color: crate::render::geometry::highlight::COLOR,
            export_include_selection: false,
            export_file_name: "annotated-image.png".to_string(),
            viewport_padding: 16.0,
            history_limit: 50,
            log_level: LogLevel::Warn,
        }
    }
}

impl EditorConfig {
    /// Directory name under the platform config dir
    pub const APP_DIR: &'static str = "heartscope";
    /// Config file name inside [`Self::APP_DIR`]
    pub const FILE_NAME: &'static str = "annotator.json";

    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(Self::APP_DIR).join(Self::FILE_NAME))
    }

    /// Load the config file from its default location
    ///
    /// A missing file or config directory yields defaults; an unreadable or
    /// malformed file is an error so the caller can report it once logging is up.
    pub fn try_load() -> anyhow::Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Read and validate a config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Replace out-of-range values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !STROKE_WIDTH_CHOICES.contains(&self.stroke_width) {
            log::warn!("Unsupported stroke width {} in config, using default", self.stroke_width);
            self.stroke_width = defaults.stroke_width;
        }
        if !(self.viewport_padding.is_finite() && self.viewport_padding >= 0.0) {
            self.viewport_padding = defaults.viewport_padding;
        }
        if self.export_file_name.trim().is_empty() {
            self.export_file_name = defaults.export_file_name;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip() {
        let c = ShapeColor::from_hex("#FF0000").unwrap();
        assert_eq!(c, ShapeColor::default());
        assert_eq!(ShapeColor::from_hex("00a3ff").unwrap().to_hex(), "#00A3FF");
    }

    #[test]
    fn test_hex_rejects_garbage() {
        assert!(ShapeColor::from_hex("#FFF").is_none());
        assert!(ShapeColor::from_hex("#GG0000").is_none());
        assert!(ShapeColor::from_hex("#ÿÿÿ").is_none());
    }

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.stroke_width, 2.0);
        assert!(STROKE_WIDTH_CHOICES.contains(&config.stroke_width));
        assert_eq!(config.default_tool, Tool::Freehand);
        assert!(!config.export_include_selection);
        assert_eq!(config.export_file_name, "annotated-image.png");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("annotator.json");
        let config = EditorConfig {
            stroke_width: 6.0,
            export_include_selection: true,
            ..EditorConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotator.json");
        std::fs::write(&path, r#"{ "stroke_width": -3, "default_tool": "circle" }"#).unwrap();
        let config = EditorConfig::load_from(&path).unwrap();
        assert_eq!(config.default_tool, Tool::Circle);
        assert_eq!(config.stroke_width, 2.0);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn test_stroke_width_outside_choices_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotator.json");
        std::fs::write(&path, r#"{ "stroke_width": 3 }"#).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap().stroke_width, 2.0);

        std::fs::write(&path, r#"{ "stroke_width": 4 }"#).unwrap();
        assert_eq!(EditorConfig::load_from(&path).unwrap().stroke_width, 4.0);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("annotator.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(EditorConfig::load_from(&path).is_err());
    }
}
