//! Text effect rendering.
//!
//! Every effect is pure stamping: a line is rasterized once into a
//! [`GlyphMask`] and the same mask is blended into a transparent,
//! canvas-sized buffer several times at different offsets, colors and
//! alphas. Effects never touch the canvas itself; the compositor blends the
//! finished buffer.
//!
//! # Layout
//!
//! Text is split on line breaks. Line `i` has its top at
//! `anchor.y + i * (font_size + LINE_SPACING)`. Horizontally each line is
//! placed against the anchor according to [`Anchor`]: an explicit position
//! is always left anchored, otherwise the layer's role and alignment decide.

mod chrome;
mod depth;
mod fire;
mod gradient;
mod neon;
mod normal;

pub use chrome::Chrome;
pub use depth::Depth;
pub use fire::Fire;
pub use gradient::Gradient;
pub use neon::Neon;
pub use normal::Normal;

use image::{Rgba, RgbaImage};
use palette::Srgb;

use crate::color::with_alpha;
use crate::composite::alpha_blend;
use crate::error::{RenderError, RenderResult};
use crate::font::{GlyphMask, SizedFont};
use crate::layer::{Alignment, EffectKind, Point, TextLayer, TextRole};

// ============================================================================
// Effect trait
// ============================================================================

/// A stamping strategy for one line of text.
pub trait Effect {
    /// Draws `line` into `target`.
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, layer: &TextLayer);
}

/// Returns the stamping strategy for an effect kind.
pub fn effect_for(kind: EffectKind) -> &'static dyn Effect {
    match kind {
        EffectKind::Normal => &Normal,
        EffectKind::Neon => &Neon,
        EffectKind::Chrome => &Chrome,
        EffectKind::Fire => &Fire,
        EffectKind::ThreeD => &Depth,
        EffectKind::Gradient => &Gradient,
    }
}

/// Renders a text layer into a transparent `width` x `height` buffer.
///
/// Opacity is not applied here.
pub fn render_text_layer(
    layer: &TextLayer,
    font: &SizedFont,
    width: u32,
    height: u32,
) -> RenderResult<RgbaImage> {
    if width == 0 || height == 0 {
        return Err(RenderError::layer(layer.id, "canvas has no area"));
    }
    let mut buffer = RgbaImage::new(width, height);
    let effect = effect_for(layer.effect);
    for line in layout(layer, font, width, height) {
        effect.draw_line(&mut buffer, &line, layer);
    }
    Ok(buffer)
}

// ============================================================================
// Layout
// ============================================================================

/// How a line is positioned horizontally relative to the anchor x.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Line starts at x.
    Left,
    /// Line is centered on x.
    Middle,
    /// Line ends at x.
    Right,
}

/// Anchor point and mode for a layer on a canvas of the given size.
pub fn anchor_for(layer: &TextLayer, width: u32, height: u32) -> (Point, Anchor) {
    if let Some(position) = layer.position {
        return (position, Anchor::Left);
    }
    let w = width as f32;
    let h = height as f32;
    match layer.role {
        TextRole::Heading => (Point::new((width / 2) as i32, (h * 0.10) as i32), Anchor::Middle),
        TextRole::Paragraph => {
            let y = (h * 0.15) as i32;
            match layer.alignment {
                Alignment::Left => (Point::new((w * 0.1) as i32, y), Anchor::Left),
                Alignment::Center => (Point::new((width / 2) as i32, y), Anchor::Middle),
                Alignment::Right => (Point::new((w * 0.9) as i32, y), Anchor::Right),
            }
        }
    }
}

/// A rasterized line and its pen origin on the canvas.
#[derive(Debug, Clone)]
pub struct PlacedLine {
    pub mask: GlyphMask,
    /// Pen origin: left edge of the line's advance box.
    pub x: i32,
    /// Top of the line.
    pub y: i32,
}

impl PlacedLine {
    /// Canvas position of the mask's top-left corner.
    pub fn mask_origin(&self) -> (i32, i32) {
        (self.x.saturating_add(self.mask.left), self.y.saturating_add(self.mask.top))
    }

    /// Blends the glyph mask into `target`, shifted by `(dx, dy)`, in
    /// `color` with overall alpha `alpha`.
    pub fn stamp(&self, target: &mut RgbaImage, dx: i32, dy: i32, color: Srgb<u8>, alpha: u8) {
        if alpha == 0 || self.mask.is_empty() {
            return;
        }
        let (ox, oy) = self.mask_origin();
        stamp_mask(
            target,
            &self.mask,
            ox.saturating_add(dx),
            oy.saturating_add(dy),
            with_alpha(color, alpha),
        );
    }
}

/// Splits the layer text into lines and places each on the canvas.
pub fn layout(layer: &TextLayer, font: &SizedFont, width: u32, height: u32) -> Vec<PlacedLine> {
    let (anchor, mode) = anchor_for(layer, width, height);
    layer
        .text
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let mask = font.rasterize_line(line);
            let advance = mask.advance.round() as i32;
            let x = match mode {
                Anchor::Left => anchor.x,
                Anchor::Middle => anchor.x - advance / 2,
                Anchor::Right => anchor.x - advance,
            };
            PlacedLine {
                mask,
                x,
                y: anchor.y + i as i32 * layer.line_height(),
            }
        })
        .collect()
}

// ============================================================================
// Stamping primitives
// ============================================================================

/// Blends `color` through the coverage of `mask` with the mask's top-left
/// corner at `(x, y)`. Coverage scales the color's alpha.
pub fn stamp_mask(target: &mut RgbaImage, mask: &GlyphMask, x: i32, y: i32, color: Rgba<u8>) {
    let (tw, th) = (target.width() as i32, target.height() as i32);
    for (mx, my, coverage) in mask.coverage.enumerate_pixels() {
        let c = coverage.0[0];
        if c == 0 {
            continue;
        }
        let px = x.saturating_add(mx as i32);
        let py = y.saturating_add(my as i32);
        if px < 0 || py < 0 || px >= tw || py >= th {
            continue;
        }
        let alpha = (u16::from(c) * u16::from(color[3]) + 127) / 255;
        let src = Rgba([color[0], color[1], color[2], alpha as u8]);
        let dst = target.get_pixel_mut(px as u32, py as u32);
        *dst = alpha_blend(src, *dst);
    }
}

/// The eight neighbours at distance `r`: `(±r, 0), (0, ±r), (±r, ±r)`.
/// `r` saturates at `i32::MAX`.
pub fn ring(r: u32) -> [(i32, i32); 8] {
    let r = i32::try_from(r).unwrap_or(i32::MAX);
    [
        (-r, -r),
        (0, -r),
        (r, -r),
        (-r, 0),
        (r, 0),
        (-r, r),
        (0, r),
        (r, r),
    ]
}

/// Linearly decreasing alpha for step `step` of `steps` (step 1 is
/// strongest).
pub(crate) fn falloff(max_alpha: u8, step: u32, steps: u32) -> u8 {
    if steps == 0 || step > steps {
        return 0;
    }
    let remaining = u64::from(steps - step) + 1;
    (u64::from(max_alpha) * remaining / u64::from(steps)) as u8
}
