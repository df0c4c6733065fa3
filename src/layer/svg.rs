//! SVG logo sources rendered with resvg/usvg.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{RenderError, RenderResult};

/// Vector markup for a logo layer.
///
/// - Raw SVG markup
/// - An emoji character, resolved to its Twemoji SVG at render time
///   (`twemoji` feature)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgSource {
    Raw(String),
    Emoji(String),
}

impl SvgSource {
    /// Wraps raw SVG markup.
    pub fn from_svg(svg: impl Into<String>) -> Self {
        Self::Raw(svg.into())
    }

    /// Returns `None` if twemoji has no asset for the emoji.
    #[cfg(feature = "twemoji")]
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        use twemoji_assets::svg::SvgTwemojiAsset;

        SvgTwemojiAsset::from_emoji(emoji)?;
        Some(Self::Emoji(emoji.to_string()))
    }

    /// Resolves this source to SVG markup.
    pub fn resolve(&self) -> Option<&str> {
        match self {
            Self::Raw(svg) => Some(svg.as_str()),
            #[cfg(feature = "twemoji")]
            Self::Emoji(emoji) => {
                use twemoji_assets::svg::SvgTwemojiAsset;
                let asset = SvgTwemojiAsset::from_emoji(emoji)?;
                Some(asset.as_ref())
            }
            #[cfg(not(feature = "twemoji"))]
            Self::Emoji(_) => None,
        }
    }

    /// Renders so that the longer edge is `size` pixels.
    pub fn render(&self, size: u32) -> RenderResult<RgbaImage> {
        let svg = self
            .resolve()
            .ok_or_else(|| RenderError::svg("emoji source is not available"))?;
        render_svg(svg, size)
    }
}

/// Renders SVG markup so that its longer edge is `size` pixels, preserving
/// aspect ratio.
pub fn render_svg(svg_data: &str, size: u32) -> RenderResult<RgbaImage> {
    let tree = Tree::from_str(svg_data, &Options::default())
        .map_err(|e| RenderError::svg(e.to_string()))?;

    let svg_size = tree.size();
    let scale = (size as f32) / svg_size.width().max(svg_size.height());
    let width = (svg_size.width() * scale).round().max(1.0) as u32;
    let height = (svg_size.height() * scale).round().max(1.0) as u32;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| RenderError::svg(format!("cannot allocate {width}x{height} pixmap")))?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    // tiny_skia stores premultiplied pixels.
    RgbaImage::from_fn(pixmap.width(), pixmap.height(), |x, y| {
        pixmap
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                Rgba([c.red(), c.green(), c.blue(), c.alpha()])
            })
            .unwrap_or(Rgba([0, 0, 0, 0]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#ff0000"/></svg>"##;

    #[test]
    fn render_fits_longest_edge() {
        let img = render_svg(WIDE_SVG, 50).unwrap();
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 25);

        let center = img.get_pixel(25, 12);
        assert_eq!(center.0, [255, 0, 0, 255]);
    }

    #[test]
    fn invalid_markup_is_an_error() {
        let err = render_svg("<not svg", 50).unwrap_err();
        assert!(err.to_string().contains("svg error"));
    }

    #[test]
    fn raw_source_resolves() {
        let source: SvgSource = SvgSource::from_svg("<svg></svg>");
        assert_eq!(source.resolve(), Some("<svg></svg>"));
    }

    #[cfg(not(feature = "twemoji"))]
    #[test]
    fn emoji_without_feature_fails_to_render() {
        let source = SvgSource::Emoji("🦆".into());
        assert!(source.resolve().is_none());
        assert!(source.render(32).is_err());
    }

    #[cfg(feature = "twemoji")]
    #[test]
    fn emoji_source_renders() {
        let source = SvgSource::from_emoji("🦆").expect("duck emoji should be supported");
        let img = source.render(64).unwrap();
        assert!(img.width() == 64 || img.height() == 64);
    }
}
