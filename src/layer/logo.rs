//! Logo layer records.

use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};

use super::svg::SvgSource;
use super::{LayerId, Point};
use crate::error::{RenderError, RenderResult};

/// Named logo sizes (longest edge in pixels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum LogoSize {
    /// 50 px.
    Small,
    /// 100 px.
    #[default]
    Medium,
    /// 150 px.
    Large,
}

impl LogoSize {
    /// Longest edge in pixels for this size.
    pub fn pixels(self) -> u32 {
        match self {
            Self::Small => 50,
            Self::Medium => 100,
            Self::Large => 150,
        }
    }
}

/// Image content of a logo layer.
///
/// Rasters are shared behind an `Arc`, so history snapshots don't copy pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum LogoSource {
    Raster(Arc<RgbaImage>),
    Svg(SvgSource),
}

impl From<RgbaImage> for LogoSource {
    fn from(image: RgbaImage) -> Self {
        Self::Raster(Arc::new(image))
    }
}

impl From<SvgSource> for LogoSource {
    fn from(source: SvgSource) -> Self {
        Self::Svg(source)
    }
}

/// A committed logo layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoLayer {
    pub id: LayerId,
    pub source: LogoSource,
    /// Longest edge of the stamped logo, in pixels.
    pub target_size: u32,
    /// Where the logo's center should land.
    pub center: Point,
    pub visible: bool,
}

impl LogoLayer {
    /// Produces the logo scaled so its longest edge is `target_size`,
    /// keeping the aspect ratio.
    pub fn rasterize(&self) -> RenderResult<RgbaImage> {
        let size = self.target_size.max(1);
        match &self.source {
            LogoSource::Raster(image) => {
                if image.width() == 0 || image.height() == 0 {
                    return Err(RenderError::layer(self.id, "logo image is empty"));
                }
                // `resize` fits inside the box while preserving aspect ratio.
                let scaled = DynamicImage::ImageRgba8(image.as_ref().clone()).resize(
                    size,
                    size,
                    FilterType::Lanczos3,
                );
                Ok(scaled.to_rgba8())
            }
            LogoSource::Svg(svg) => svg.render(size),
        }
    }

    /// Top-left paste position for a stamp of the given size, centered on
    /// `center` and clamped to stay inside the canvas.
    pub fn paste_origin(&self, stamp_w: u32, stamp_h: u32, canvas_w: u32, canvas_h: u32) -> (i32, i32) {
        let x = (self.center.x - stamp_w as i32 / 2).max(0);
        let y = (self.center.y - stamp_h as i32 / 2).max(0);
        (
            x.min(canvas_w as i32 - stamp_w as i32),
            y.min(canvas_h as i32 - stamp_h as i32),
        )
    }
}

/// Field values for a logo layer that has not been added yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoLayerBuilder {
    pub source: Option<LogoSource>,
    pub target_size: u32,
    pub center: Point,
}

impl Default for LogoLayerBuilder {
    fn default() -> Self {
        Self {
            source: None,
            target_size: LogoSize::default().pixels(),
            center: Point::new(50, 50),
        }
    }
}

impl LogoLayerBuilder {
    /// Creates a builder centered at `(50, 50)` with the medium size.
    pub fn new(source: impl Into<LogoSource>) -> Self {
        Self {
            source: Some(source.into()),
            ..Self::default()
        }
    }

    /// Sets the longest edge from a named size.
    pub fn size(mut self, size: LogoSize) -> Self {
        self.target_size = size.pixels();
        self
    }

    /// Sets the longest edge in pixels.
    pub fn target_size(mut self, px: u32) -> Self {
        self.target_size = px.max(1);
        self
    }

    /// Sets the center point on the canvas.
    pub fn center(mut self, x: i32, y: i32) -> Self {
        self.center = Point::new(x, y);
        self
    }

    pub(crate) fn into_layer(self, id: LayerId, source: LogoSource) -> LogoLayer {
        LogoLayer {
            id,
            source,
            target_size: self.target_size.max(1),
            center: self.center,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn logo(source: LogoSource, target: u32, center: Point) -> LogoLayer {
        LogoLayer {
            id: LayerId(1),
            source,
            target_size: target,
            center,
            visible: true,
        }
    }

    #[test]
    fn raster_scaled_to_longest_edge() {
        let src = RgbaImage::from_pixel(400, 200, Rgba([0, 128, 255, 255]));
        let img = logo(src.into(), 100, Point::new(0, 0)).rasterize().unwrap();
        assert_eq!((img.width(), img.height()), (100, 50));
    }

    #[test]
    fn portrait_raster_keeps_ratio() {
        let src = RgbaImage::from_pixel(100, 300, Rgba([0, 0, 0, 255]));
        let img = logo(src.into(), 150, Point::new(0, 0)).rasterize().unwrap();
        assert_eq!((img.width(), img.height()), (50, 150));
    }

    #[test]
    fn empty_raster_is_an_error() {
        let layer = logo(RgbaImage::new(0, 0).into(), 100, Point::new(0, 0));
        assert!(layer.rasterize().is_err());
    }

    #[test]
    fn paste_origin_is_centered_and_clamped() {
        let layer = logo(RgbaImage::new(1, 1).into(), 100, Point::new(100, 100));
        assert_eq!(layer.paste_origin(100, 50, 300, 300), (50, 75));

        let corner = logo(RgbaImage::new(1, 1).into(), 100, Point::new(5, 295));
        assert_eq!(corner.paste_origin(100, 50, 300, 300), (0, 250));
    }

    #[test]
    fn size_presets() {
        assert_eq!(LogoSize::Small.pixels(), 50);
        assert_eq!(LogoSize::Medium.pixels(), 100);
        assert_eq!(LogoSize::Large.pixels(), 150);
        assert_eq!(LogoLayerBuilder::default().target_size, 100);
    }
}
