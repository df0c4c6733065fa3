//! Vertical two-color gradient clipped to the glyphs.

use image::{Rgba, RgbaImage};

use super::{Effect, PlacedLine};
use crate::color::lerp;
use crate::composite::composite_over;
use crate::layer::TextLayer;

/// Text color at the top of the ink, outline color at the bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct Gradient;

impl Effect for Gradient {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, layer: &TextLayer) {
        let mask = &line.mask;
        if mask.is_empty() {
            return;
        }
        let height = mask.height();
        let fill = RgbaImage::from_fn(mask.width(), height, |x, y| {
            let color = lerp(layer.text_color, layer.outline_color, y as f32 / height as f32);
            let coverage = mask.coverage.get_pixel(x, y).0[0];
            Rgba([color.red, color.green, color.blue, coverage])
        });
        let (x, y) = line.mask_origin();
        composite_over(target, &fill, x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::render_text_layer;
    use crate::effect::tests::ink_bounds;
    use crate::font::SizedFont;
    use crate::layer::{EffectKind, LayerId, TextLayerBuilder};

    #[test]
    fn top_row_is_first_color_bottom_row_is_second() {
        let layer = TextLayerBuilder::new("II")
            .font_size(40)
            .at(10, 10)
            .text_color("#FF0000")
            .outline_color("#0000FF")
            .effect(EffectKind::Gradient)
            .into_layer(LayerId(1));
        let image = render_text_layer(&layer, &SizedFont::block(40), 120, 80).unwrap();

        let (x0, y0, _, y1) = ink_bounds(&image).unwrap();
        let top = image.get_pixel(x0 + 2, y0);
        let bottom = image.get_pixel(x0 + 2, y1);
        assert_eq!(top.0, [255, 0, 0, 255]);
        assert!(bottom[2] > 230 && bottom[0] < 25);
    }

    #[test]
    fn nothing_outside_the_glyph() {
        let layer = TextLayerBuilder::new("I")
            .font_size(20)
            .at(0, 0)
            .effect(EffectKind::Gradient)
            .into_layer(LayerId(1));
        let image = render_text_layer(&layer, &SizedFont::block(20), 40, 40).unwrap();
        assert_eq!(ink_bounds(&image), Some((2, 4, 11, 17)));
    }
}
