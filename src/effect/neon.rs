//! Neon tube: a colored halo around a bright white core.

use image::RgbaImage;

use super::{Effect, PlacedLine};
use crate::color::WHITE;
use crate::layer::TextLayer;

const MAX_RADIUS: u32 = 15;
const HALO_ALPHA: u32 = 120;
const ANGLE_STEP: usize = 30;
/// Halo points sit at half the nominal radius.
const SPREAD: f32 = 0.5;
const CORE_TINT_ALPHA: u8 = 200;

/// Halo in the outline color, white core, text color tint.
#[derive(Debug, Clone, Copy, Default)]
pub struct Neon;

impl Effect for Neon {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, layer: &TextLayer) {
        for radius in (1..=MAX_RADIUS).rev() {
            let alpha = (HALO_ALPHA * radius / MAX_RADIUS) as u8;
            let distance = radius as f32 * SPREAD;
            for degrees in (0..360).step_by(ANGLE_STEP) {
                let theta = (degrees as f32).to_radians();
                // Truncate toward zero so opposite points stay symmetric.
                let dx = (distance * theta.cos()) as i32;
                let dy = (distance * theta.sin()) as i32;
                line.stamp(target, dx, dy, layer.outline_color, alpha);
            }
        }
        line.stamp(target, 0, 0, WHITE, 255);
        line.stamp(target, 0, 0, layer.text_color, CORE_TINT_ALPHA);
    }
}
