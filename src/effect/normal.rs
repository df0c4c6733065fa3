//! Plain text with optional glow, drop shadow and outline.

use image::RgbaImage;

use super::{Effect, PlacedLine, falloff, ring};
use crate::color::BLACK;
use crate::layer::TextLayer;
use crate::layer::text::MAX_STROKE;

/// Largest glow radius in pixels.
pub const GLOW_RADIUS: u32 = 15;
const GLOW_ALPHA: u8 = 100;
const SHADOW_ALPHA: u8 = 160;

/// Draws, in order: glow, shadow, outline, fill.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normal;

impl Effect for Normal {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, layer: &TextLayer) {
        if layer.add_glow {
            // Outermost ring first so the stronger inner rings land on top.
            for radius in (1..=GLOW_RADIUS).rev() {
                let alpha = falloff(GLOW_ALPHA, radius, GLOW_RADIUS);
                for (dx, dy) in ring(radius) {
                    line.stamp(target, dx, dy, layer.outline_color, alpha);
                }
            }
        }

        if layer.add_shadow && layer.shadow_blur > 0 {
            let steps = layer.shadow_blur.min(MAX_STROKE);
            for step in (1..=steps).rev() {
                let offset = step as i32;
                line.stamp(target, offset, offset, BLACK, falloff(SHADOW_ALPHA, step, steps));
            }
        }

        if layer.outline_width > 0 {
            for (dx, dy) in ring(layer.outline_width.min(MAX_STROKE)) {
                line.stamp(target, dx, dy, layer.outline_color, 255);
            }
        }

        line.stamp(target, 0, 0, layer.text_color, 255);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::render_text_layer;
    use crate::font::SizedFont;
    use crate::layer::{LayerId, TextLayerBuilder};

    fn render(builder: TextLayerBuilder) -> RgbaImage {
        let layer = builder.font_size(20).at(20, 20).into_layer(LayerId(1));
        render_text_layer(&layer, &SizedFont::block(20), 100, 100).unwrap()
    }

    // Block glyph "I" at (20, 20), size 20: ink covers x 22..32, y 24..38.

    #[test]
    fn fill_only() {
        let image = render(TextLayerBuilder::new("I").text_color("#FF0000"));
        assert_eq!(image.get_pixel(25, 30).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(21, 30).0[3], 0);
        assert_eq!(image.get_pixel(33, 30).0[3], 0);
    }

    #[test]
    fn outline_surrounds_fill() {
        let image = render(
            TextLayerBuilder::new("I")
                .text_color("#FF0000")
                .outline_color("#0000FF")
                .outline_width(3),
        );
        assert_eq!(image.get_pixel(25, 30).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(20, 30).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(34, 30).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(36, 30).0[3], 0);
    }

    #[test]
    fn shadow_falls_down_right() {
        let image = render(TextLayerBuilder::new("I").shadow(4));
        // Below-right of the glyph only the shadow reaches.
        let below_right = image.get_pixel(34, 40);
        assert!(below_right[3] > 0);
        assert_eq!(&below_right.0[..3], &[0, 0, 0]);
        // Above-left stays empty.
        assert_eq!(image.get_pixel(21, 23).0[3], 0);
    }

    #[test]
    fn huge_strokes_render_without_overflow() {
        let mut layer = TextLayerBuilder::new("I")
            .text_color("#FF0000")
            .shadow(1)
            .font_size(20)
            .at(20, 20)
            .into_layer(LayerId(1));
        layer.outline_width = u32::MAX;
        layer.shadow_blur = u32::MAX;
        let image = render_text_layer(&layer, &SizedFont::block(20), 100, 100).unwrap();
        assert_eq!(image.get_pixel(25, 30).0, [255, 0, 0, 255]);
    }

    #[test]
    fn glow_fades_with_distance() {
        let image = render(TextLayerBuilder::new("I").outline_color("#00FF00").glow(true));
        let near = image.get_pixel(21, 30)[3];
        let far = image.get_pixel(10, 30)[3];
        assert!(near > far, "glow should weaken outward ({near} vs {far})");
        assert!(far > 0);
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
    }
}
