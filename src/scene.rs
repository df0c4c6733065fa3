//! Serializable scene documents.
//!
//! A [`Scene`] describes a background and a stack of layers in JSON. It is
//! applied by replaying it through an [`Editor`], so the same validation and
//! fallback rules apply as for interactive edits.
//!
//! ```
//! use textfx_renderer::Scene;
//!
//! let json = r##"{
//!     "canvas": { "preset": "youtube-thumbnail", "background": { "color": "#202020" } },
//!     "layers": [
//!         { "type": "text", "text": "Hello", "effect": "neon", "x": 40, "y": 40 },
//!         { "type": "logo", "source": { "svgData": "<svg/>" }, "size": "small" }
//!     ]
//! }"##;
//! let scene = Scene::from_json(json).unwrap();
//! assert_eq!(scene.canvas.size(), (1280, 720));
//! assert_eq!(scene.layers.len(), 2);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canvas::CanvasOrigin;
use crate::color::parse_color;
use crate::config::{CanvasPreset, StylePreset};
use crate::editor::{EditResult, Editor};
use crate::error::{RenderResult, Status};
use crate::layer::text::MAX_STROKE;
use crate::layer::{
    Alignment, EffectKind, LogoLayerBuilder, LogoSize, LogoSource, SvgSource, TextLayerBuilder,
    TextRole,
};
use crate::template::load_upload;

// ============================================================================
// Canvas
// ============================================================================

/// Where the background comes from.
///
/// ```json
/// { "color": "#FFFFFF" }
/// { "image": "photos/beach.jpg" }
/// { "template": "sunset.png" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum BackgroundSettings {
    Color(String),
    Image(PathBuf),
    Template(String),
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self::Color("#FFFFFF".to_string())
    }
}

/// Canvas size and background of a scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    /// Named size; explicit `width`/`height` take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<CanvasPreset>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    #[serde(default)]
    pub background: BackgroundSettings,
}

impl CanvasSettings {
    /// Resolved `(width, height)`. Defaults to the Instagram square size.
    pub fn size(&self) -> (u32, u32) {
        let (pw, ph) = self.preset.unwrap_or(CanvasPreset::InstagramSquare).size();
        (self.width.unwrap_or(pw), self.height.unwrap_or(ph))
    }
}

// ============================================================================
// Layers
// ============================================================================

/// Text layer fields. Style fields left out keep the preset's value (if
/// any) or the default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct TextSettings {
    pub text: String,
    #[serde(default)]
    pub font: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default)]
    pub role: TextRole,
    #[serde(default)]
    pub alignment: Alignment,
    /// Name of a style preset applied before the fields below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_shadow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_glow: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<EffectKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<u8>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

/// Logo image reference. Exactly one field should be set.
///
/// ```json
/// { "path": "logo.png" }
/// { "svgData": "<svg>...</svg>" }
/// { "emoji": "🦆" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LogoSourceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl LogoSourceSettings {
    /// Loads the referenced image. Relative paths are joined to `base_dir`.
    pub fn load(&self, base_dir: &Path) -> RenderResult<Option<LogoSource>> {
        if let Some(path) = &self.path {
            let image = load_upload(&base_dir.join(path))?;
            return Ok(Some(image.into()));
        }
        if let Some(svg) = &self.svg_data {
            return Ok(Some(SvgSource::from_svg(svg.clone()).into()));
        }
        Ok(self.emoji.clone().map(|e| SvgSource::Emoji(e).into()))
    }
}

/// Logo layer fields. Omitted coordinates keep the builder default `(50, 50)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct LogoSettings {
    #[serde(default)]
    pub source: LogoSourceSettings,
    #[serde(default)]
    pub size: LogoSize,
    /// Overrides `size` with an exact longest edge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

/// One scene layer, tagged by `"type"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerSettings {
    Text(TextSettings),
    Logo(LogoSettings),
}

// ============================================================================
// Scene
// ============================================================================

/// A canvas plus layers, replayed through an [`Editor`] in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(default)]
    pub canvas: CanvasSettings,
    /// Bottom to top.
    #[serde(default)]
    pub layers: Vec<LayerSettings>,
}

impl Scene {
    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a scene from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads and parses a scene file.
    pub fn from_file(path: &Path) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&text).map_err(std::io::Error::other)?)
    }

    /// Replays the scene into `editor`, replacing its canvas and layers.
    ///
    /// Relative image paths are resolved against `base_dir`. Returns one
    /// result per layer; rejected layers are skipped. Only failures to read
    /// referenced image files abort the replay.
    pub fn apply(
        &self,
        editor: &mut Editor<'_>,
        presets: &[StylePreset],
        base_dir: &Path,
    ) -> RenderResult<(Status, Vec<EditResult>)> {
        let (width, height) = self.canvas.size();
        let origin = match &self.canvas.background {
            BackgroundSettings::Color(hex) => CanvasOrigin::SolidColor(parse_color(hex)),
            BackgroundSettings::Image(path) => {
                CanvasOrigin::UploadedImage(load_upload(&base_dir.join(path))?)
            }
            BackgroundSettings::Template(name) => CanvasOrigin::Template(name.clone()),
        };
        let canvas_status = editor.set_background(width, height, origin);

        let mut results = Vec::with_capacity(self.layers.len());
        for settings in &self.layers {
            let (result, visible) = match settings {
                LayerSettings::Text(text) => {
                    (editor.add_text_layer(text_builder(text, presets)), text.visible)
                }
                LayerSettings::Logo(logo) => {
                    let mut builder = LogoLayerBuilder::default().size(logo.size);
                    builder.source = logo.source.load(base_dir)?;
                    if let Some(px) = logo.target_size {
                        builder = builder.target_size(px);
                    }
                    let center = builder.center;
                    builder = builder.center(logo.x.unwrap_or(center.x), logo.y.unwrap_or(center.y));
                    (editor.add_logo_layer(builder), logo.visible)
                }
            };
            if let (Ok(Status::Added(id)), false) = (&result, visible) {
                if let Err(err) = editor.set_visible(*id, false) {
                    tracing::warn!(layer = id.0, error = %err, "could not hide scene layer");
                }
            }
            if let Err(err) = &result {
                tracing::warn!(error = %err, "scene layer rejected");
            }
            results.push(result);
        }
        Ok((canvas_status, results))
    }
}

fn text_builder(settings: &TextSettings, presets: &[StylePreset]) -> TextLayerBuilder {
    let mut builder = TextLayerBuilder::new(settings.text.clone())
        .font(settings.font.clone())
        .role(settings.role)
        .alignment(settings.alignment);

    if let Some(name) = &settings.preset {
        match presets.iter().find(|p| &p.name == name) {
            Some(preset) => builder = builder.preset(preset),
            None => tracing::warn!(preset = %name, "unknown style preset"),
        }
    }
    if let Some(px) = settings.font_size {
        builder = builder.font_size(px);
    }
    if let (Some(x), Some(y)) = (settings.x, settings.y) {
        builder = builder.at(x, y);
    }
    if let Some(hex) = &settings.text_color {
        builder = builder.text_color(hex);
    }
    if let Some(hex) = &settings.outline_color {
        builder = builder.outline_color(hex);
    }
    if let Some(width) = settings.outline_width {
        builder = builder.outline_width(width);
    }
    if let Some(shadow) = settings.add_shadow {
        builder.add_shadow = shadow;
    }
    if let Some(blur) = settings.shadow_blur {
        builder.shadow_blur = blur.min(MAX_STROKE);
    }
    if let Some(glow) = settings.add_glow {
        builder = builder.glow(glow);
    }
    if let Some(effect) = settings.effect {
        builder = builder.effect(effect);
    }
    if let Some(opacity) = settings.opacity {
        builder = builder.opacity(opacity);
    }
    builder
}
