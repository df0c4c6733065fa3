//! Compositing layers onto the canvas.
//!
//! Every visible layer is rendered into its own buffer and blended
//! source-over onto an accumulating copy of the base raster, in list order.
//! The accumulated image is finally flattened onto white so the output has
//! no transparency left.

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::effect;
use crate::error::RenderResult;
use crate::font::FontProvider;
use crate::layer::{Layer, LayerList};

/// A rendered layer buffer and where its top-left corner goes.
#[derive(Debug, Clone)]
pub struct Stamped {
    pub image: RgbaImage,
    pub x: i32,
    pub y: i32,
}

/// Renders one layer into a buffer positioned on a `width` x `height` canvas.
pub fn render_layer(
    layer: &Layer,
    fonts: &dyn FontProvider,
    width: u32,
    height: u32,
) -> RenderResult<Stamped> {
    match layer {
        Layer::Text(text) => {
            let font = fonts.resolve(&text.font, text.font_size);
            let mut image = effect::render_text_layer(text, &font, width, height)?;
            if text.opacity < 100 {
                scale_alpha(&mut image, text.opacity_factor());
            }
            Ok(Stamped { image, x: 0, y: 0 })
        }
        Layer::Logo(logo) => {
            let image = logo.rasterize()?;
            let (x, y) = logo.paste_origin(image.width(), image.height(), width, height);
            Ok(Stamped { image, x, y })
        }
    }
}

/// Blends every visible layer over `base` and returns the RGBA result.
///
/// A layer that fails to render is logged and skipped.
pub fn render_layers(base: &RgbaImage, layers: &LayerList, fonts: &dyn FontProvider) -> RgbaImage {
    let mut accum = base.clone();
    let (width, height) = accum.dimensions();
    for layer in layers.iter().filter(|l| l.is_visible()) {
        match render_layer(layer, fonts, width, height) {
            Ok(stamped) => composite_over(&mut accum, &stamped.image, stamped.x, stamped.y),
            Err(err) => {
                tracing::warn!(layer = %layer.id(), error = %err, "skipping layer that failed to render");
            }
        }
    }
    accum
}

/// Full render: layers over `base`, then flattened onto white.
pub fn render(base: &RgbaImage, layers: &LayerList, fonts: &dyn FontProvider) -> RgbImage {
    flatten_onto_white(&render_layers(base, layers, fonts))
}

/// Composites `src` over `dest` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `dest` are clipped.
pub fn composite_over(dest: &mut RgbaImage, src: &RgbaImage, x: i32, y: i32) {
    let dest_width = dest.width() as i32;
    let dest_height = dest.height() as i32;

    for (sx, sy, src_pixel) in src.enumerate_pixels() {
        if src_pixel[3] == 0 {
            continue;
        }
        let dx = x + sx as i32;
        let dy = y + sy as i32;
        if dx < 0 || dy < 0 || dx >= dest_width || dy >= dest_height {
            continue;
        }
        let dst_pixel = dest.get_pixel_mut(dx as u32, dy as u32);
        *dst_pixel = alpha_blend(*src_pixel, *dst_pixel);
    }
}

/// Source-over blend of two straight-alpha pixels.
pub fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

/// Multiplies every pixel's alpha by `factor` (0.0-1.0).
pub fn scale_alpha(image: &mut RgbaImage, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * factor).round() as u8;
    }
}

/// Composites `image` over opaque white and drops the alpha channel.
pub fn flatten_onto_white(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let p = alpha_blend(*image.get_pixel(x, y), Rgba([255, 255, 255, 255]));
        Rgb([p[0], p[1], p[2]])
    })
}
