//! Font resolution and glyph rasterization.
//!
//! A line of text is rasterized once into a [`GlyphMask`], an 8-bit coverage
//! image positioned relative to the line's top-left pen origin. Effects then
//! stamp that mask as many times as they need.
//!
//! Resolution never fails. A [`FontRegistry`] falls back from the requested
//! key to the first loaded font, then to the configured fallback files, and
//! finally to the built-in block face, which draws each visible character
//! as a solid box.

use std::path::Path;

use ab_glyph::{Font, FontArc, OutlinedGlyph, PxScale, ScaleFont, point};
use image::{GrayImage, Luma};
use indexmap::IndexMap;

use crate::config::EngineConfig;
use crate::error::{RenderError, RenderResult};

// ============================================================================
// Faces
// ============================================================================

/// A font face usable for rasterization.
#[derive(Clone)]
pub enum Face {
    Outline(FontArc),
    /// Built-in face of solid boxes, used when no font file is available.
    Block,
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(_) => f.write_str("Face::Outline"),
            Self::Block => f.write_str("Face::Block"),
        }
    }
}

// Block face metrics, in em.
const BLOCK_ADVANCE: f32 = 0.6;
const BLOCK_INK_X: (f32, f32) = (0.1, 0.6);
const BLOCK_INK_Y: (f32, f32) = (0.2, 0.9);
const BLOCK_ASCENT: f32 = 0.8;

/// A face realized at a pixel size.
#[derive(Debug, Clone)]
pub struct SizedFont {
    pub face: Face,
    pub px: f32,
}

impl SizedFont {
    /// Creates a sized font; `px` below one is raised to one.
    pub fn new(face: Face, px: u32) -> Self {
        Self {
            face,
            px: px.max(1) as f32,
        }
    }

    /// The built-in block face at `px`.
    pub fn block(px: u32) -> Self {
        Self::new(Face::Block, px)
    }

    /// True when this resolves to the built-in block face.
    pub fn is_block(&self) -> bool {
        matches!(self.face, Face::Block)
    }

    /// Distance from the line top to the baseline.
    pub fn ascent(&self) -> f32 {
        match &self.face {
            Face::Outline(font) => font.as_scaled(PxScale::from(self.px)).ascent(),
            Face::Block => BLOCK_ASCENT * self.px,
        }
    }

    /// Rasterizes one line (no line breaks) into a coverage mask.
    pub fn rasterize_line(&self, line: &str) -> GlyphMask {
        match &self.face {
            Face::Outline(font) => rasterize_outline(font, self.px, line),
            Face::Block => rasterize_block(self.px, line),
        }
    }
}

// ============================================================================
// GlyphMask
// ============================================================================

/// Ink coverage of one rasterized line.
///
/// `left`/`top` give the offset of `coverage`'s top-left corner from the pen
/// origin (the top-left anchor of the line).
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub coverage: GrayImage,
    pub left: i32,
    pub top: i32,
    /// Total horizontal advance of the line.
    pub advance: f32,
}

impl GlyphMask {
    /// A mask with no ink that still advances the pen.
    pub fn empty(advance: f32) -> Self {
        Self {
            coverage: GrayImage::new(0, 0),
            left: 0,
            top: 0,
            advance,
        }
    }

    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.coverage.width() == 0 || self.coverage.height() == 0
    }

    /// Width of the coverage image.
    pub fn width(&self) -> u32 {
        self.coverage.width()
    }

    /// Height of the coverage image.
    pub fn height(&self) -> u32 {
        self.coverage.height()
    }
}

fn rasterize_outline(font: &FontArc, px: f32, line: &str) -> GlyphMask {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);
    let baseline = scaled.ascent();

    let mut caret = 0.0f32;
    let mut prev = None;
    let mut outlined: Vec<OutlinedGlyph> = Vec::new();
    for ch in line.chars().filter(|c| !c.is_control()) {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = prev {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        prev = Some(id);
        if let Some(glyph) = font.outline_glyph(glyph) {
            outlined.push(glyph);
        }
    }

    let Some((min_x, min_y, max_x, max_y)) = outlined
        .iter()
        .map(|g| {
            let b = g.px_bounds();
            (
                b.min.x.floor() as i32,
                b.min.y.floor() as i32,
                b.max.x.ceil() as i32,
                b.max.y.ceil() as i32,
            )
        })
        .reduce(|a, b| (a.0.min(b.0), a.1.min(b.1), a.2.max(b.2), a.3.max(b.3)))
    else {
        return GlyphMask::empty(caret);
    };

    let width = (max_x - min_x).max(0) as u32;
    let height = (max_y - min_y).max(0) as u32;
    let mut coverage = GrayImage::new(width, height);
    for glyph in &outlined {
        let bounds = glyph.px_bounds();
        let ox = bounds.min.x.floor() as i32 - min_x;
        let oy = bounds.min.y.floor() as i32 - min_y;
        glyph.draw(|x, y, c| {
            let px = ox + x as i32;
            let py = oy + y as i32;
            if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                return;
            }
            let value = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
            let cell = coverage.get_pixel_mut(px as u32, py as u32);
            // Overlapping glyphs keep the stronger coverage.
            cell.0[0] = cell.0[0].max(value);
        });
    }

    GlyphMask {
        coverage,
        left: min_x,
        top: min_y,
        advance: caret,
    }
}

fn rasterize_block(px: f32, line: &str) -> GlyphMask {
    let chars: Vec<char> = line.chars().filter(|c| !c.is_control()).collect();
    let advance = chars.len() as f32 * BLOCK_ADVANCE * px;
    let Some(first_ink) = chars.iter().position(|c| !c.is_whitespace()) else {
        return GlyphMask::empty(advance);
    };
    let last_ink = chars.iter().rposition(|c| !c.is_whitespace()).unwrap_or(first_ink);

    let ink_x = |index: usize, edge: f32| ((index as f32 * BLOCK_ADVANCE + edge) * px).round() as i32;
    let left = ink_x(first_ink, BLOCK_INK_X.0);
    let right = ink_x(last_ink, BLOCK_INK_X.1);
    let top = (BLOCK_INK_Y.0 * px).round() as i32;
    let bottom = (BLOCK_INK_Y.1 * px).round() as i32;

    let width = (right - left).max(1) as u32;
    let height = (bottom - top).max(1) as u32;
    let mut coverage = GrayImage::new(width, height);
    for (index, ch) in chars.iter().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let x0 = (ink_x(index, BLOCK_INK_X.0) - left).max(0) as u32;
        let x1 = ((ink_x(index, BLOCK_INK_X.1) - left).max(0) as u32).min(width);
        for y in 0..height {
            for x in x0..x1 {
                coverage.put_pixel(x, y, Luma([255]));
            }
        }
    }

    GlyphMask {
        coverage,
        left,
        top,
        advance,
    }
}

// ============================================================================
// Font provider
// ============================================================================

/// Resolves a font key to a realized font. Must always return something
/// drawable.
pub trait FontProvider {
    fn resolve(&self, key: &str, px: u32) -> SizedFont;
}

/// Reads and parses a TrueType/OpenType file.
pub fn load_font(path: &Path) -> RenderResult<FontArc> {
    let data = std::fs::read(path)?;
    FontArc::try_from_vec(data).map_err(|_| RenderError::InvalidFont(path.display().to_string()))
}

/// Fonts loaded from an [`EngineConfig`].
#[derive(Clone, Default)]
pub struct FontRegistry {
    /// In configuration order; the first entry backs unknown keys.
    fonts: IndexMap<String, FontArc>,
    fallback: Option<FontArc>,
}

impl std::fmt::Debug for FontRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRegistry")
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl FontRegistry {
    /// A registry with no font files; every key resolves to the block face.
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Loads every configured font and the first loadable fallback.
    ///
    /// Fonts that fail to load are logged and skipped.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut fonts = IndexMap::new();
        for (key, path) in &config.fonts {
            match load_font(path) {
                Ok(font) => {
                    tracing::debug!(font = %key, path = %path.display(), "loaded font");
                    fonts.insert(key.clone(), font);
                }
                Err(err) => {
                    tracing::warn!(font = %key, path = %path.display(), error = %err, "failed to load font");
                }
            }
        }

        let fallback = config.fallback_fonts.iter().find_map(|path| match load_font(path) {
            Ok(font) => {
                tracing::debug!(path = %path.display(), "loaded fallback font");
                Some(font)
            }
            Err(_) => None,
        });
        if fonts.is_empty() && fallback.is_none() {
            tracing::warn!("no font files could be loaded, text will use the block face");
        }

        Self { fonts, fallback }
    }

    /// Registers an already-parsed font under `key`.
    pub fn insert(&mut self, key: impl Into<String>, font: FontArc) {
        self.fonts.insert(key.into(), font);
    }

    /// Loaded font keys in configuration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    /// True when at least one real font file was loaded.
    pub fn has_outline_font(&self) -> bool {
        !self.fonts.is_empty() || self.fallback.is_some()
    }
}

impl FontProvider for FontRegistry {
    fn resolve(&self, key: &str, px: u32) -> SizedFont {
        if let Some(font) = self.fonts.get(key) {
            return SizedFont::new(Face::Outline(font.clone()), px);
        }
        if !key.is_empty() {
            tracing::debug!(font = key, "unknown font key, using fallback");
        }
        let face = self
            .fonts
            .values()
            .next()
            .or(self.fallback.as_ref())
            .cloned()
            .map(Face::Outline)
            .unwrap_or(Face::Block);
        SizedFont::new(face, px)
    }
}
