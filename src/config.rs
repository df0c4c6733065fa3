//! Engine configuration.
//!
//! An [`EngineConfig`] is built once at startup (usually from JSON) and used to
//! construct the font registry and template library shared by every editor
//! session.
//!
//! ```
//! use textfx_renderer::EngineConfig;
//!
//! let json = r#"{
//!     "fonts": { "Anton": "fonts/Anton-Regular.ttf" },
//!     "templateDir": "templates"
//! }"#;
//! let config = EngineConfig::from_json(json).unwrap();
//! assert_eq!(config.fonts.len(), 1);
//! assert!(config.preset("Fire Text").is_some());
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::layer::EffectKind;

// ============================================================================
// Style presets
// ============================================================================

/// A named bundle of text styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    pub name: String,
    pub text_color: String,
    pub outline_color: String,
    pub outline_width: u32,
    pub shadow_blur: u32,
    pub add_shadow: bool,
    pub add_glow: bool,
    #[serde(default)]
    pub effect: EffectKind,
}

#[allow(clippy::too_many_arguments)]
fn preset(
    name: &str,
    text_color: &str,
    outline_color: &str,
    outline_width: u32,
    shadow_blur: u32,
    add_shadow: bool,
    add_glow: bool,
    effect: EffectKind,
) -> StylePreset {
    StylePreset {
        name: name.to_string(),
        text_color: text_color.to_string(),
        outline_color: outline_color.to_string(),
        outline_width,
        shadow_blur,
        add_shadow,
        add_glow,
        effect,
    }
}

/// The stock preset table.
pub fn builtin_presets() -> Vec<StylePreset> {
    use EffectKind::*;
    vec![
        preset("Bold & Readable", "#FFFFFF", "#000000", 10, 5, true, false, Normal),
        preset("Neon Glow", "#00FFFF", "#FF00FF", 3, 20, false, true, Neon),
        preset("Chrome Metal", "#C0C0C0", "#808080", 4, 8, true, false, Chrome),
        preset("Fire Text", "#FF4500", "#FFD700", 5, 15, true, true, Fire),
        preset("Ice Frozen", "#B0E0E6", "#4682B4", 6, 10, true, true, Normal),
        preset("3D Shadow", "#FFFFFF", "#000000", 2, 0, true, false, ThreeD),
        preset("Gradient Rainbow", "#FF1493", "#8A2BE2", 3, 5, false, false, Gradient),
        preset("Gold Luxury", "#FFD700", "#B8860B", 8, 10, true, false, Normal),
    ]
}

// ============================================================================
// Canvas presets
// ============================================================================

/// Common social media canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case")]
pub enum CanvasPreset {
    InstagramSquare,
    InstagramStory,
    FacebookPost,
    TwitterPost,
    YoutubeThumbnail,
}

impl CanvasPreset {
    /// Every canvas preset, in menu order.
    pub const ALL: [CanvasPreset; 5] = [
        Self::InstagramSquare,
        Self::InstagramStory,
        Self::FacebookPost,
        Self::TwitterPost,
        Self::YoutubeThumbnail,
    ];

    /// `(width, height)` in pixels.
    pub fn size(self) -> (u32, u32) {
        match self {
            Self::InstagramSquare => (1080, 1080),
            Self::InstagramStory => (1080, 1920),
            Self::FacebookPost => (1200, 630),
            Self::TwitterPost => (1600, 900),
            Self::YoutubeThumbnail => (1280, 720),
        }
    }

    /// Human-readable name with the aspect ratio.
    pub fn label(self) -> &'static str {
        match self {
            Self::InstagramSquare => "Instagram Square (1:1)",
            Self::InstagramStory => "Instagram Story (9:16)",
            Self::FacebookPost => "Facebook Post (1.91:1)",
            Self::TwitterPost => "Twitter Post (16:9)",
            Self::YoutubeThumbnail => "YouTube Thumbnail (16:9)",
        }
    }
}

// ============================================================================
// EngineConfig
// ============================================================================

fn default_fallback_fonts() -> Vec<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .collect()
}

/// Startup configuration for fonts, templates and presets.
///
/// # JSON Format
///
/// ```json
/// {
///   "fonts": { "Montserrat Bold": "fonts/Montserrat-Bold.ttf" },
///   "fallbackFonts": ["/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"],
///   "templateDir": "templates",
///   "presets": []
/// }
/// ```
///
/// Omitted fields take their defaults: system fallback fonts, no template
/// directory and the built-in preset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Font key to font file, in file order. The first font that loads
    /// backs unknown keys.
    #[serde(default)]
    pub fonts: IndexMap<String, PathBuf>,

    /// Tried in order when a key is unknown or its file fails to load.
    #[serde(default = "default_fallback_fonts")]
    pub fallback_fonts: Vec<PathBuf>,

    /// Directory scanned for template backgrounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_dir: Option<PathBuf>,

    #[serde(default = "builtin_presets")]
    pub presets: Vec<StylePreset>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fonts: IndexMap::new(),
            fallback_fonts: default_fallback_fonts(),
            template_dir: None,
            presets: builtin_presets(),
        }
    }
}

impl EngineConfig {
    /// Creates a config with system fallback fonts and the built-in presets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a font file under `key`.
    pub fn with_font(mut self, key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.fonts.insert(key.into(), path.into());
        self
    }

    /// Sets the directory scanned for templates.
    pub fn with_template_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.template_dir = Some(dir.into());
        self
    }

    /// Looks up a style preset by name.
    pub fn preset(&self, name: &str) -> Option<&StylePreset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a config from JSON. Paths are kept as written.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads a JSON config file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&text).map_err(std::io::Error::other)?;
        if let Some(base) = path.parent() {
            config.rebase(base);
        }
        Ok(config)
    }

    fn rebase(&mut self, base: &Path) {
        for font in self.fonts.values_mut() {
            if font.is_relative() {
                *font = base.join(&*font);
            }
        }
        if let Some(dir) = self.template_dir.as_mut().filter(|d| d.is_relative()) {
            *dir = base.join(&*dir);
        }
    }
}
