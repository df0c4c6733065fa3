//! Canvas creation.
//!
//! A [`Canvas`] owns the opaque base raster every render starts from. It is
//! created from a solid color, an uploaded raster or a named template; a
//! template that cannot be resolved degrades to a white canvas and the
//! failure is reported through the returned [`Status`].

use image::imageops::FilterType;
use image::{Rgba, RgbaImage, imageops};
use palette::Srgb;

use crate::color::{WHITE, with_alpha};
use crate::composite::alpha_blend;
use crate::error::Status;
use crate::template::TemplateProvider;

/// Where a canvas background comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasOrigin {
    SolidColor(Srgb<u8>),
    UploadedImage(RgbaImage),
    /// Name resolved through a [`TemplateProvider`].
    Template(String),
}

impl CanvasOrigin {
    /// The origin without its payload.
    pub fn kind(&self) -> OriginKind {
        match self {
            Self::SolidColor(_) => OriginKind::SolidColor,
            Self::UploadedImage(_) => OriginKind::UploadedImage,
            Self::Template(_) => OriginKind::Template,
        }
    }
}

/// Which kind of [`CanvasOrigin`] produced a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginKind {
    /// Filled with one color, including the white template fallback.
    SolidColor,
    /// Resized from a user image.
    UploadedImage,
    /// Resized from a named template.
    Template,
}

/// An opaque base raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    base: RgbaImage,
    origin: OriginKind,
}

impl Canvas {
    /// Builds a `width` x `height` canvas. Never fails.
    ///
    /// Zero dimensions are raised to one pixel.
    pub fn create(
        width: u32,
        height: u32,
        origin: CanvasOrigin,
        templates: &dyn TemplateProvider,
    ) -> (Canvas, Status) {
        let (width, height) = (width.max(1), height.max(1));
        let kind = origin.kind();
        let base = match origin {
            CanvasOrigin::SolidColor(color) => solid(width, height, color),
            CanvasOrigin::UploadedImage(image) => fit(&image, width, height),
            CanvasOrigin::Template(name) => match templates.resolve(&name) {
                Ok(image) => fit(&image, width, height),
                Err(err) => {
                    tracing::warn!(template = %name, error = %err, "template unavailable, using white background");
                    let canvas = Canvas {
                        base: solid(width, height, WHITE),
                        origin: OriginKind::SolidColor,
                    };
                    let reason = format!("Template '{name}' could not be loaded");
                    return (canvas, Status::CanvasFallback { reason });
                }
            },
        };
        tracing::debug!(width, height, origin = ?kind, "canvas created");
        (Canvas { base, origin: kind }, Status::CanvasReady { width, height })
    }

    /// Solid color canvas; needs no template provider.
    pub fn solid(width: u32, height: u32, color: Srgb<u8>) -> Canvas {
        Canvas {
            base: solid(width.max(1), height.max(1), color),
            origin: OriginKind::SolidColor,
        }
    }

    /// The opaque base raster that layers are composited over.
    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.base.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.base.height()
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        self.base.dimensions()
    }

    /// How the base raster was produced.
    pub fn origin(&self) -> OriginKind {
        self.origin
    }
}

fn solid(width: u32, height: u32, color: Srgb<u8>) -> RgbaImage {
    RgbaImage::from_pixel(width, height, with_alpha(color, 255))
}

/// Stretches `image` to exactly `width` x `height` and makes it opaque.
fn fit(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 {
        return solid(width, height, WHITE);
    }
    let mut resized = if image.dimensions() == (width, height) {
        image.clone()
    } else {
        imageops::resize(image, width, height, FilterType::Lanczos3)
    };
    let white = Rgba([255, 255, 255, 255]);
    for pixel in resized.pixels_mut() {
        if pixel[3] < 255 {
            *pixel = alpha_blend(*pixel, white);
        }
    }
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn no_templates() -> BTreeMap<String, RgbaImage> {
        BTreeMap::new()
    }

    #[test]
    fn solid_color_fills_canvas() {
        let (canvas, status) = Canvas::create(
            30,
            20,
            CanvasOrigin::SolidColor(Srgb::new(1, 2, 3)),
            &no_templates(),
        );
        assert_eq!(status, Status::CanvasReady { width: 30, height: 20 });
        assert_eq!(canvas.dimensions(), (30, 20));
        assert!(canvas.base().pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn upload_is_resized_and_flattened() {
        let upload = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        let (canvas, _) = Canvas::create(40, 25, CanvasOrigin::UploadedImage(upload), &no_templates());
        assert_eq!(canvas.dimensions(), (40, 25));
        assert!(canvas.base().pixels().all(|p| p[3] == 255));
        assert_eq!(canvas.base().get_pixel(5, 5).0, [255, 255, 255, 255]);
        assert_eq!(canvas.origin(), OriginKind::UploadedImage);
    }

    #[test]
    fn template_is_resolved() {
        let mut templates = no_templates();
        templates.insert("green".into(), RgbaImage::from_pixel(8, 8, Rgba([0, 255, 0, 255])));
        let (canvas, status) = Canvas::create(8, 8, CanvasOrigin::Template("green".into()), &templates);
        assert!(matches!(status, Status::CanvasReady { .. }));
        assert_eq!(canvas.base().get_pixel(3, 3).0, [0, 255, 0, 255]);
    }

    #[test]
    fn missing_template_falls_back_to_white() {
        let (canvas, status) = Canvas::create(
            16,
            9,
            CanvasOrigin::Template("missing.png".into()),
            &no_templates(),
        );
        assert_eq!(canvas.dimensions(), (16, 9));
        assert!(canvas.base().pixels().all(|p| p.0 == [255, 255, 255, 255]));
        assert_eq!(canvas.origin(), OriginKind::SolidColor);
        match status {
            Status::CanvasFallback { reason } => assert!(reason.contains("missing.png")),
            other => panic!("unexpected status {other:?}"),
        }
    }
}
