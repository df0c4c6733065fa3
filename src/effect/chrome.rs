//! Brushed metal: stacked gray stamps with a highlight.

use image::RgbaImage;

use super::{Effect, PlacedLine};
use crate::color::{WHITE, gray};
use crate::layer::TextLayer;

const LAYERS: i32 = 3;
const BASE_GRAY: u8 = 80;
const GRAY_STEP: u8 = 40;
const HIGHLIGHT_ALPHA: u8 = 180;
const FACE_GRAY: u8 = 192;

/// Luminance only; the layer's colors are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chrome;

impl Effect for Chrome {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, _layer: &TextLayer) {
        for offset in (0..=LAYERS).rev() {
            let level = BASE_GRAY + GRAY_STEP * offset as u8;
            line.stamp(target, -offset, -offset, gray(level), 255);
        }
        line.stamp(target, 1, 1, WHITE, HIGHLIGHT_ALPHA);
        line.stamp(target, 0, 0, gray(FACE_GRAY), 255);
    }
}
