//! Template backgrounds and uploaded image decoding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use image::imageops::FilterType;

use crate::error::{RenderError, RenderResult};

/// Uploads larger than this on either edge are downscaled to fit.
pub const MAX_UPLOAD_EDGE: u32 = 2048;

const TEMPLATE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Resolves template names to decoded rasters.
pub trait TemplateProvider {
    fn resolve(&self, name: &str) -> RenderResult<RgbaImage>;

    /// Known template names, sorted.
    fn names(&self) -> Vec<String>;
}

impl TemplateProvider for BTreeMap<String, RgbaImage> {
    fn resolve(&self, name: &str) -> RenderResult<RgbaImage> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

/// Templates discovered in a directory. Names are file names
/// (`"sunset.png"`); files are decoded on every resolve.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    entries: BTreeMap<String, PathBuf>,
}

impl TemplateLibrary {
    /// A library with no templates.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Scans `dir` (non-recursively) for png/jpg/jpeg files.
    ///
    /// A missing directory yields an empty library.
    pub fn scan(dir: &Path) -> RenderResult<Self> {
        let mut entries = BTreeMap::new();
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "template directory does not exist");
            return Ok(Self { entries });
        }
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() || !has_template_extension(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                entries.insert(name.to_string(), path.clone());
            }
        }
        tracing::debug!(dir = %dir.display(), count = entries.len(), "scanned templates");
        Ok(Self { entries })
    }

    /// Number of templates found.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File backing the template `name`.
    pub fn path(&self, name: &str) -> Option<&Path> {
        self.entries.get(name).map(PathBuf::as_path)
    }
}

fn has_template_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| TEMPLATE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

impl TemplateProvider for TemplateLibrary {
    fn resolve(&self, name: &str) -> RenderResult<RgbaImage> {
        let path = self
            .entries
            .get(name)
            .ok_or_else(|| RenderError::TemplateNotFound(name.to_string()))?;
        Ok(image::open(path)?.to_rgba8())
    }

    fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

/// Decodes an uploaded image, downscaling it to fit [`MAX_UPLOAD_EDGE`].
pub fn load_upload(path: &Path) -> RenderResult<RgbaImage> {
    let image = image::open(path)?;
    Ok(limit_upload(image.to_rgba8()))
}

/// Downscales a raster so neither edge exceeds [`MAX_UPLOAD_EDGE`].
pub fn limit_upload(image: RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w <= MAX_UPLOAD_EDGE && h <= MAX_UPLOAD_EDGE {
        return image;
    }
    tracing::debug!(width = w, height = h, "downscaling oversized upload");
    image::DynamicImage::ImageRgba8(image)
        .resize(MAX_UPLOAD_EDGE, MAX_UPLOAD_EDGE, FilterType::Lanczos3)
        .to_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn scan_picks_image_files_only() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))
            .save(dir.path().join("blue.png"))
            .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hi").unwrap();

        let library = TemplateLibrary::scan(dir.path()).unwrap();
        assert_eq!(library.names(), vec!["blue.png".to_string()]);

        let image = library.resolve("blue.png").unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert!(matches!(
            library.resolve("notes.txt"),
            Err(RenderError::TemplateNotFound(_))
        ));
    }

    #[test]
    fn corrupt_template_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"nope").unwrap();
        let library = TemplateLibrary::scan(dir.path()).unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.resolve("broken.png").is_err());
    }

    #[test]
    fn missing_directory_is_empty() {
        let library = TemplateLibrary::scan(Path::new("/no/such/templates")).unwrap();
        assert!(library.is_empty());
    }

    #[test]
    fn in_memory_templates() {
        let mut map = BTreeMap::new();
        map.insert("red".to_string(), RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 255])));
        assert!(map.resolve("red").is_ok());
        assert!(map.resolve("green").is_err());
    }

    #[test]
    fn oversized_upload_is_limited() {
        let image = limit_upload(RgbaImage::new(4096, 1024));
        assert_eq!(image.dimensions(), (2048, 512));

        let small = limit_upload(RgbaImage::new(300, 200));
        assert_eq!(small.dimensions(), (300, 200));
    }
}
