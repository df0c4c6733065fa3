//! Extruded 3D text.

use image::RgbaImage;

use super::{Effect, PlacedLine};
use crate::layer::TextLayer;

const DEPTH: i32 = 5;
const STEP: i32 = 2;
const EXTRUSION_ALPHA: u8 = 200;

/// Extrusion in the outline color, face in the text color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Depth;

impl Effect for Depth {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, layer: &TextLayer) {
        for i in (1..=DEPTH).rev() {
            line.stamp(target, i * STEP, i * STEP, layer.outline_color, EXTRUSION_ALPHA);
        }
        line.stamp(target, 0, 0, layer.text_color, 255);
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
    fn extrusion_trails_down_right() {
        let layer = TextLayerBuilder::new("I")
            .font_size(20)
            .at(10, 10)
            .text_color("#FFFFFF")
            .outline_color("#0000FF")
            .effect(EffectKind::ThreeD)
            .into_layer(LayerId(1));
        let image = render_text_layer(&layer, &SizedFont::block(20), 80, 80).unwrap();

        // Face ink: x 12..22, y 14..28. Extrusion shifts it by 10px.
        let (x0, y0, x1, y1) = ink_bounds(&image).unwrap();
        assert_eq!((x0, y0), (12, 14));
        assert_eq!((x1, y1), (31, 37));
        assert_eq!(image.get_pixel(15, 20).0, [255, 255, 255, 255]);

        let side = image.get_pixel(30, 36);
        assert_eq!((side[0], side[1], side[2]), (0, 0, 255));
        assert!(side[3] >= 200);
    }
}
