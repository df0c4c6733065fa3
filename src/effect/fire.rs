//! Flames: hot colors smeared upward with a horizontal flicker.

use image::RgbaImage;
use palette::Srgb;

use super::{Effect, PlacedLine};
use crate::layer::TextLayer;

/// Core to tip.
const FLAME: [Srgb<u8>; 5] = [
    Srgb::new(255, 255, 0),
    Srgb::new(255, 200, 0),
    Srgb::new(255, 140, 0),
    Srgb::new(255, 69, 0),
    Srgb::new(139, 0, 0),
];
const RISE: i32 = 2;
const ALPHA_STEP: u8 = 40;

/// Fixed palette; the layer's colors are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fire;

impl Effect for Fire {
    fn draw_line(&self, target: &mut RgbaImage, line: &PlacedLine, _layer: &TextLayer) {
        for (i, color) in FLAME.iter().enumerate() {
            let rise = i as i32 * RISE;
            let alpha = 255 - ALPHA_STEP * i as u8;
            line.stamp(target, 0, -rise, *color, alpha);
            if i > 0 {
                line.stamp(target, -1, 1 - rise, *color, alpha / 2);
                line.stamp(target, 1, 1 - rise, *color, alpha / 2);
            }
        }
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
    fn flame_rises_above_the_glyph() {
        let layer = TextLayerBuilder::new("I")
            .font_size(20)
            .at(20, 30)
            .effect(EffectKind::Fire)
            .into_layer(LayerId(1));
        let image = render_text_layer(&layer, &SizedFont::block(20), 80, 80).unwrap();

        // Glyph ink starts at y = 34; the last flame color rises 8px.
        let (x0, y0, x1, y1) = ink_bounds(&image).unwrap();
        assert_eq!(y0, 34 - 8);
        assert_eq!(y1, 34 + 13);
        assert_eq!((x0, x1), (21, 32));

        // The tip above the glyph is dark red; no blue anywhere.
        let tip = image.get_pixel(26, 26);
        assert_eq!((tip[0], tip[1], tip[2]), (139, 0, 0));
        assert!(image.pixels().all(|p| p[2] == 0));
    }
}
