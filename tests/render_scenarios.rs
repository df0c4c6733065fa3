use std::collections::BTreeMap;

use image::{Rgba, RgbImage, RgbaImage};
use textfx_renderer::{
    CanvasOrigin, EditError, Editor, EffectKind, FontRegistry, LayerId, LogoLayerBuilder,
    OutputFormat, Status, TextLayerBuilder, parse_color,
};

fn templates() -> BTreeMap<String, RgbaImage> {
    BTreeMap::new()
}

/// Bounding box of pixels that differ from `background`.
fn ink_bounds(image: &RgbImage, background: [u8; 3]) -> Option<(u32, u32, u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0 != background)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

#[test]
fn plain_text_only_inks_near_its_position() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(200, 200, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));
    editor
        .add_text_layer(
            TextLayerBuilder::new("Hi")
                .font_size(40)
                .text_color("#000000")
                .outline_width(0)
                .at(10, 10),
        )
        .unwrap();

    let image = editor.render().unwrap();
    let (x0, y0, x1, y1) = ink_bounds(&image, [255, 255, 255]).expect("text should leave ink");
    assert!(x0 >= 10 && y0 >= 10);
    assert!(x1 < 10 + 2 * 40 && y1 < 10 + 40);
    assert_eq!(image.get_pixel(150, 150).0, [255, 255, 255]);
}

#[test]
fn gradient_runs_top_to_bottom() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(300, 300, CanvasOrigin::SolidColor(parse_color("#000000")));
    editor
        .add_text_layer(
            TextLayerBuilder::new("Grad")
                .font_size(60)
                .at(20, 20)
                .text_color("#FF0000")
                .outline_color("#0000FF")
                .effect(EffectKind::Gradient),
        )
        .unwrap();

    let image = editor.render().unwrap();
    let (x0, y0, _, y1) = ink_bounds(&image, [0, 0, 0]).unwrap();
    let column = x0 + 3;
    let top = image.get_pixel(column, y0);
    let bottom = image.get_pixel(column, y1);
    assert!(top[0] > top[2], "top row should lean red: {top:?}");
    assert!(bottom[2] > bottom[0], "bottom row should lean blue: {bottom:?}");
}

#[test]
fn logo_keeps_aspect_ratio() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(300, 300, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));
    let source = RgbaImage::from_pixel(400, 200, Rgba([0, 0, 0, 255]));
    editor
        .add_logo_layer(LogoLayerBuilder::new(source).target_size(100).center(150, 150))
        .unwrap();

    let image = editor.render().unwrap();
    let (x0, y0, x1, y1) = ink_bounds(&image, [255, 255, 255]).unwrap();
    assert_eq!(x1 - x0 + 1, 100);
    assert_eq!(y1 - y0 + 1, 50);
    assert_eq!((x0, y0), (100, 125));
}

#[test]
fn logo_near_edge_stays_inside() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(120, 120, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));
    let source = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));
    editor
        .add_logo_layer(LogoLayerBuilder::new(source).target_size(50).center(119, 0))
        .unwrap();

    let image = editor.render().unwrap();
    assert_eq!(ink_bounds(&image, [255, 255, 255]), Some((70, 0, 119, 49)));
}

#[test]
fn remove_last_on_empty_list() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(50, 50, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));

    let status = editor.remove_last().unwrap();
    assert_eq!(status, Status::NoLayers);
    assert_eq!(status.to_string(), "No layers");
    assert!(editor.layers().is_empty());
    assert_eq!(editor.summary(), "No layers yet");
}

#[test]
fn later_layers_cover_earlier_ones() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(100, 100, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));
    let red = RgbaImage::from_pixel(30, 30, Rgba([255, 0, 0, 255]));
    let green = RgbaImage::from_pixel(30, 30, Rgba([0, 255, 0, 255]));
    editor.add_logo_layer(LogoLayerBuilder::new(red).target_size(30).center(50, 50)).unwrap();
    editor.add_logo_layer(LogoLayerBuilder::new(green).target_size(30).center(50, 50)).unwrap();
    assert_eq!(editor.render().unwrap().get_pixel(50, 50).0, [0, 255, 0]);

    editor.set_visible(LayerId(2), false).unwrap();
    assert_eq!(editor.render().unwrap().get_pixel(50, 50).0, [255, 0, 0]);
}

#[test]
fn oversized_outline_and_shadow_still_render() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(120, 120, CanvasOrigin::SolidColor(parse_color("#FFFFFF")));
    editor
        .add_text_layer(
            TextLayerBuilder::new("I")
                .font_size(40)
                .text_color("#FF0000")
                .outline_width(u32::MAX)
                .shadow(u32::MAX)
                .at(10, 10),
        )
        .unwrap();
    assert_eq!(editor.layers().len(), 1);

    let image = editor.render().expect("render should survive huge strokes");
    assert_eq!(image.get_pixel(20, 30).0, [255, 0, 0]);
}

#[test]
fn invalid_color_falls_back_without_failing() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(40, 40, CanvasOrigin::SolidColor(parse_color("not-a-color")));
    let image = editor.render().unwrap();
    assert!(image.pixels().all(|p| p.0 == [0, 0, 0]));
}

#[test]
fn editing_without_canvas_is_rejected() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    let err = editor.add_text_layer(TextLayerBuilder::new("x")).unwrap_err();
    assert_eq!(err, EditError::NoCanvas);
    assert_eq!(editor.next_id(), LayerId(1));
}

#[test]
fn rendered_image_saves_as_png_and_jpeg() {
    let fonts = FontRegistry::builtin();
    let templates = templates();
    let mut editor = Editor::new(&fonts, &templates);
    editor.set_background(64, 48, CanvasOrigin::SolidColor(parse_color("#336699")));
    editor
        .add_text_layer(TextLayerBuilder::new("ok").font_size(16).at(4, 4).effect(EffectKind::Fire))
        .unwrap();
    let image = editor.render().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("out.png");
    let jpg = dir.path().join("out.jpg");
    textfx_renderer::save(&image, &png, OutputFormat::Png).unwrap();
    textfx_renderer::save(&image, &jpg, OutputFormat::Jpeg).unwrap();

    let decoded = image::open(&png).unwrap().to_rgb8();
    assert_eq!(decoded, image);
    let decoded = image::open(&jpg).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (64, 48));
}
