//! textfx-renderer: layered text-effect compositing
//!
//! This crate builds raster images by stacking styled text and logo layers
//! on a background canvas. Text is drawn with one of several stamping
//! effects (outline, neon, chrome, fire, 3D, gradient), layers are blended
//! in order and the result is flattened to an opaque image.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use image::RgbaImage;
//! use textfx_renderer::{
//!     CanvasOrigin, EffectKind, Editor, FontRegistry, LogoLayerBuilder, TextLayerBuilder,
//!     parse_color,
//! };
//!
//! let fonts = FontRegistry::builtin();
//! let templates: BTreeMap<String, RgbaImage> = BTreeMap::new();
//! let mut editor = Editor::new(&fonts, &templates);
//!
//! editor.set_background(300, 200, CanvasOrigin::SolidColor(parse_color("#000000")));
//! editor
//!     .add_text_layer(
//!         TextLayerBuilder::new("Sale!")
//!             .at(20, 20)
//!             .text_color("#FF0000")
//!             .outline_color("#0000FF")
//!             .effect(EffectKind::Gradient),
//!     )
//!     .unwrap();
//! editor
//!     .add_logo_layer(LogoLayerBuilder::new(RgbaImage::new(40, 20)).center(250, 150))
//!     .unwrap();
//!
//! let image = editor.render().unwrap();
//! assert_eq!(image.dimensions(), (300, 200));
//!
//! // Every mutation before the last one can be undone.
//! editor.undo().unwrap();
//! assert_eq!(editor.layers().len(), 1);
//! ```
//!
//! # Configuration
//!
//! Fonts, templates and style presets are described by an [`EngineConfig`]
//! and loaded once into a [`FontRegistry`] and a [`TemplateLibrary`], which
//! every [`Editor`] borrows.

mod canvas;
mod color;
mod composite;
mod config;
mod editor;
mod error;
mod font;
mod history;
mod layer;
mod output;
mod scene;
mod template;

pub mod effect;

pub use canvas::{Canvas, CanvasOrigin, OriginKind};
pub use color::{
    BLACK, FALLBACK_COLOR, WHITE, parse_color, parse_color_opt, to_hex, try_parse_color,
};
pub use composite::{
    Stamped, alpha_blend, composite_over, flatten_onto_white, render, render_layer, render_layers,
};
pub use config::{CanvasPreset, EngineConfig, StylePreset, builtin_presets};
pub use editor::{EditResult, Editor};
pub use error::{EditError, RenderError, RenderResult, Status};
pub use font::{Face, FontProvider, FontRegistry, GlyphMask, SizedFont, load_font};
pub use history::{HISTORY_LIMIT, History};
pub use layer::svg::render_svg;
pub use layer::text::{DEFAULT_FONT_SIZE, LINE_SPACING, MAX_FONT_SIZE, MAX_STROKE};
pub use layer::{
    Alignment, EffectKind, Layer, LayerId, LayerList, LogoLayer, LogoLayerBuilder, LogoSize,
    LogoSource, Point, SvgSource, TextLayer, TextLayerBuilder, TextRole,
};
pub use output::{JPEG_QUALITY, OutputFormat, encode, save};
pub use scene::{
    BackgroundSettings, CanvasSettings, LayerSettings, LogoSettings, LogoSourceSettings, Scene,
    TextSettings,
};
pub use template::{MAX_UPLOAD_EDGE, TemplateLibrary, TemplateProvider, limit_upload, load_upload};
