//! Text layer records.

use palette::Srgb;
use serde::{Deserialize, Serialize};

use super::{LayerId, Point};
use crate::color::{BLACK, WHITE, parse_color};
use crate::config::StylePreset;

// ============================================================================
// Enums
// ============================================================================

/// Stamping algorithm used to draw a text layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    #[default]
    Normal,
    Neon,
    Chrome,
    Fire,
    #[serde(rename = "3d", alias = "threed")]
    ThreeD,
    Gradient,
}

impl EffectKind {
    /// Every effect, in menu order.
    pub const ALL: [EffectKind; 6] = [
        Self::Normal,
        Self::Neon,
        Self::Chrome,
        Self::Fire,
        Self::ThreeD,
        Self::Gradient,
    ];

    /// Lowercase name used in JSON and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Neon => "neon",
            Self::Chrome => "chrome",
            Self::Fire => "fire",
            Self::ThreeD => "3d",
            Self::Gradient => "gradient",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal placement used when a text layer has no explicit position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Whether the text is a heading or body copy. Only affects default placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum TextRole {
    Heading,
    #[default]
    Paragraph,
}

// ============================================================================
// TextLayer
// ============================================================================

/// A committed text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayer {
    pub id: LayerId,
    /// May contain line breaks; each line is stamped separately.
    pub text: String,
    /// Key into the font provider.
    pub font: String,
    pub font_size: u32,
    /// Explicit top-left anchor. Takes precedence over `alignment`.
    pub position: Option<Point>,
    pub role: TextRole,
    pub alignment: Alignment,
    pub text_color: Srgb<u8>,
    pub outline_color: Srgb<u8>,
    pub outline_width: u32,
    pub add_shadow: bool,
    pub shadow_blur: u32,
    pub add_glow: bool,
    pub effect: EffectKind,
    /// 0-100.
    pub opacity: u8,
    pub visible: bool,
}

impl TextLayer {
    /// Opacity as a 0.0-1.0 factor.
    pub fn opacity_factor(&self) -> f32 {
        f32::from(self.opacity.min(100)) / 100.0
    }

    /// Distance between consecutive line tops.
    pub fn line_height(&self) -> i32 {
        self.font_size as i32 + LINE_SPACING
    }
}

/// Extra pixels between lines of multi-line text.
pub const LINE_SPACING: i32 = 10;

// ============================================================================
// TextLayerBuilder
// ============================================================================

/// Field values for a text layer that has not been added yet.
///
/// Colors given as text go through [`parse_color`], so malformed input is
/// coerced rather than rejected.
///
/// ```
/// use textfx_renderer::{EffectKind, TextLayerBuilder};
///
/// let builder = TextLayerBuilder::new("Hello")
///     .font_size(48)
///     .at(20, 30)
///     .text_color("#FF0000")
///     .effect(EffectKind::Neon);
/// assert_eq!(builder.font_size, 48);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayerBuilder {
    pub text: String,
    pub font: String,
    pub font_size: u32,
    pub position: Option<Point>,
    pub role: TextRole,
    pub alignment: Alignment,
    pub text_color: Srgb<u8>,
    pub outline_color: Srgb<u8>,
    pub outline_width: u32,
    pub add_shadow: bool,
    pub shadow_blur: u32,
    pub add_glow: bool,
    pub effect: EffectKind,
    pub opacity: u8,
}

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: u32 = 60;

/// Largest accepted font size in pixels. Larger values are clamped.
pub const MAX_FONT_SIZE: u32 = 1024;

/// Largest accepted outline width or shadow blur in pixels. Larger values
/// are clamped.
pub const MAX_STROKE: u32 = 512;

impl TextLayerBuilder {
    /// Creates a builder with white text, a black outline and no effects.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            position: None,
            role: TextRole::Paragraph,
            alignment: Alignment::Left,
            text_color: WHITE,
            outline_color: BLACK,
            outline_width: 0,
            add_shadow: false,
            shadow_blur: 0,
            add_glow: false,
            effect: EffectKind::Normal,
            opacity: 100,
        }
    }

    /// Sets the font provider key. Unknown keys fall back at render time.
    pub fn font(mut self, key: impl Into<String>) -> Self {
        self.font = key.into();
        self
    }

    /// Sets the pixel size, clamped to `1..=MAX_FONT_SIZE`.
    pub fn font_size(mut self, px: u32) -> Self {
        self.font_size = px.clamp(1, MAX_FONT_SIZE);
        self
    }

    /// Pins the top-left of the first line to `(x, y)`.
    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.position = Some(Point::new(x, y));
        self
    }

    /// Sets the heading or paragraph role.
    pub fn role(mut self, role: TextRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the alignment used when no position is pinned.
    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the fill color from a `#RRGGBB` string.
    pub fn text_color(mut self, hex: &str) -> Self {
        self.text_color = parse_color(hex);
        self
    }

    /// Sets the outline color from a `#RRGGBB` string.
    pub fn outline_color(mut self, hex: &str) -> Self {
        self.outline_color = parse_color(hex);
        self
    }

    /// Sets the outline width, clamped to [`MAX_STROKE`]. Zero disables it.
    pub fn outline_width(mut self, px: u32) -> Self {
        self.outline_width = px.min(MAX_STROKE);
        self
    }

    /// Enables the drop shadow with `blur` steps, clamped to [`MAX_STROKE`].
    pub fn shadow(mut self, blur: u32) -> Self {
        self.add_shadow = true;
        self.shadow_blur = blur.min(MAX_STROKE);
        self
    }

    /// Turns the glow on or off.
    pub fn glow(mut self, enabled: bool) -> Self {
        self.add_glow = enabled;
        self
    }

    /// Sets the stamping effect.
    pub fn effect(mut self, effect: EffectKind) -> Self {
        self.effect = effect;
        self
    }

    /// Sets opacity, clamped to 0-100.
    pub fn opacity(mut self, percent: u8) -> Self {
        self.opacity = percent.min(100);
        self
    }

    /// Copies the styling fields of a preset.
    pub fn preset(mut self, preset: &StylePreset) -> Self {
        self.text_color = parse_color(&preset.text_color);
        self.outline_color = parse_color(&preset.outline_color);
        self.outline_width = preset.outline_width.min(MAX_STROKE);
        self.shadow_blur = preset.shadow_blur.min(MAX_STROKE);
        self.add_shadow = preset.add_shadow;
        self.add_glow = preset.add_glow;
        self.effect = preset.effect;
        self
    }

    /// True when the text has something other than whitespace.
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub(crate) fn into_layer(self, id: LayerId) -> TextLayer {
        TextLayer {
            id,
            text: self.text,
            font: self.font,
            font_size: self.font_size.clamp(1, MAX_FONT_SIZE),
            position: self.position,
            role: self.role,
            alignment: self.alignment,
            text_color: self.text_color,
            outline_color: self.outline_color,
            outline_width: self.outline_width.min(MAX_STROKE),
            add_shadow: self.add_shadow,
            shadow_blur: self.shadow_blur.min(MAX_STROKE),
            add_glow: self.add_glow,
            effect: self.effect,
            opacity: self.opacity.min(100),
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::FALLBACK_COLOR;
    use crate::config::builtin_presets;

    #[test]
    fn builder_coerces_bad_colors() {
        let builder = TextLayerBuilder::new("x").text_color("red").outline_color("#00FF00");
        assert_eq!(builder.text_color, FALLBACK_COLOR);
        assert_eq!(builder.outline_color, Srgb::new(0, 255, 0));
    }

    #[test]
    fn opacity_and_size_are_clamped() {
        let layer = TextLayerBuilder::new("x")
            .opacity(250)
            .font_size(0)
            .into_layer(LayerId(1));
        assert_eq!(layer.opacity, 100);
        assert_eq!(layer.font_size, 1);
        assert!((layer.opacity_factor() - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn oversized_strokes_are_clamped() {
        let layer = TextLayerBuilder::new("x")
            .outline_width(u32::MAX)
            .shadow(u32::MAX)
            .font_size(u32::MAX)
            .into_layer(LayerId(1));
        assert_eq!(layer.outline_width, MAX_STROKE);
        assert_eq!(layer.shadow_blur, MAX_STROKE);
        assert_eq!(layer.font_size, MAX_FONT_SIZE);

        let mut builder = TextLayerBuilder::new("x");
        builder.outline_width = u32::MAX;
        builder.shadow_blur = 1 << 31;
        let layer = builder.into_layer(LayerId(2));
        assert_eq!((layer.outline_width, layer.shadow_blur), (MAX_STROKE, MAX_STROKE));
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(!TextLayerBuilder::new("  \n ").has_text());
        assert!(TextLayerBuilder::new(" a ").has_text());
    }

    #[test]
    fn preset_copies_style() {
        let presets = builtin_presets();
        let neon = presets.iter().find(|p| p.effect == EffectKind::Neon).unwrap();
        let builder = TextLayerBuilder::new("x").preset(neon);
        assert_eq!(builder.effect, EffectKind::Neon);
        assert_eq!(builder.text_color, Srgb::new(0, 255, 255));
        assert_eq!(builder.outline_color, Srgb::new(255, 0, 255));
        assert!(builder.add_glow);
    }

    #[test]
    fn three_d_uses_short_name() {
        let kind: EffectKind = serde_json::from_str("\"3d\"").unwrap();
        assert_eq!(kind, EffectKind::ThreeD);
        assert_eq!(kind.to_string(), "3d");
        assert!(serde_json::from_str::<EffectKind>("\"sparkle\"").is_err());
    }
}
