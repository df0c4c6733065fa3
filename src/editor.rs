//! Editing session.
//!
//! An [`Editor`] owns one canvas, its layer list and its undo history, and
//! borrows the font and template providers shared across sessions. Every
//! mutation returns a [`Status`] or an [`EditError`]; both display as the
//! short message shown to the user.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use image::RgbaImage;
//! use textfx_renderer::{CanvasOrigin, Editor, FontRegistry, TextLayerBuilder, parse_color};
//!
//! let fonts = FontRegistry::builtin();
//! let templates: BTreeMap<String, RgbaImage> = BTreeMap::new();
//! let mut editor = Editor::new(&fonts, &templates);
//!
//! editor.set_background(200, 100, CanvasOrigin::SolidColor(parse_color("#102030")));
//! let status = editor.add_text_layer(TextLayerBuilder::new("Hello").at(10, 10)).unwrap();
//! assert_eq!(status.to_string(), "Added layer 1");
//!
//! let image = editor.render().unwrap();
//! assert_eq!(image.dimensions(), (200, 100));
//! ```

use image::RgbImage;

use crate::canvas::{Canvas, CanvasOrigin};
use crate::composite;
use crate::error::{EditError, Status};
use crate::font::FontProvider;
use crate::history::History;
use crate::layer::{Layer, LayerId, LayerList, LogoLayerBuilder, TextLayerBuilder};
use crate::template::TemplateProvider;

/// Outcome of an editing operation. Both arms display as a status line.
pub type EditResult = Result<Status, EditError>;

/// One user's editing session.
pub struct Editor<'r> {
    fonts: &'r dyn FontProvider,
    templates: &'r dyn TemplateProvider,
    canvas: Option<Canvas>,
    layers: LayerList,
    history: History,
    next_id: u64,
    /// Bumped on every change that affects the rendered output.
    revision: u64,
    cache: Option<(u64, RgbImage)>,
}

impl<'r> Editor<'r> {
    /// Creates an editor with no canvas and no layers.
    pub fn new(fonts: &'r dyn FontProvider, templates: &'r dyn TemplateProvider) -> Self {
        Self {
            fonts,
            templates,
            canvas: None,
            layers: LayerList::new(),
            history: History::new(),
            next_id: 1,
            revision: 0,
            cache: None,
        }
    }

    // ------------------------------------------------------------------------
    // Canvas
    // ------------------------------------------------------------------------

    /// Replaces the background. Layers and history are discarded.
    ///
    /// Never fails: an unresolvable template yields a white canvas and a
    /// [`Status::CanvasFallback`].
    pub fn set_background(&mut self, width: u32, height: u32, origin: CanvasOrigin) -> Status {
        let (canvas, status) = Canvas::create(width, height, origin, self.templates);
        self.install(canvas);
        status
    }

    /// Installs a prepared canvas. Layers and history are discarded.
    pub fn set_canvas(&mut self, canvas: Canvas) -> Status {
        let (width, height) = canvas.dimensions();
        self.install(canvas);
        Status::CanvasReady { width, height }
    }

    fn install(&mut self, canvas: Canvas) {
        self.canvas = Some(canvas);
        self.layers.clear();
        self.history.clear();
        self.touch();
    }

    // ------------------------------------------------------------------------
    // Layer mutations
    // ------------------------------------------------------------------------

    /// Appends a text layer on top of the stack.
    pub fn add_text_layer(&mut self, mut builder: TextLayerBuilder) -> EditResult {
        let (width, height) = self.canvas.as_ref().ok_or(EditError::NoCanvas)?.dimensions();
        if !builder.has_text() {
            return Err(EditError::EmptyText);
        }
        builder.position = builder.position.map(|p| p.clamp_to(width, height));

        let id = self.allocate_id();
        self.commit(Layer::Text(builder.into_layer(id)));
        Ok(Status::Added(id))
    }

    /// Appends a logo layer on top of the stack.
    pub fn add_logo_layer(&mut self, mut builder: LogoLayerBuilder) -> EditResult {
        let (width, height) = self.canvas.as_ref().ok_or(EditError::NoCanvas)?.dimensions();
        let source = builder.source.take().ok_or(EditError::MissingLogo)?;
        builder.center = builder.center.clamp_to(width, height);

        let id = self.allocate_id();
        self.commit(Layer::Logo(builder.into_layer(id, source)));
        Ok(Status::Added(id))
    }

    /// Drops the topmost layer.
    pub fn remove_last(&mut self) -> EditResult {
        let Some(id) = self.layers.last().map(Layer::id) else {
            return Ok(Status::NoLayers);
        };
        self.history.snapshot(&self.layers);
        self.layers.remove_last();
        self.touch();
        tracing::debug!(layer = %id, "removed last layer");
        Ok(Status::Removed(id))
    }

    /// Drops the layer with `id`, wherever it sits in the stack.
    pub fn remove_layer(&mut self, id: LayerId) -> EditResult {
        if self.layers.get(id).is_none() {
            return Err(EditError::UnknownLayer(id));
        }
        self.history.snapshot(&self.layers);
        self.layers.remove(id);
        self.touch();
        Ok(Status::Removed(id))
    }

    /// Shows or hides a layer.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> EditResult {
        let current = self
            .layers
            .get(id)
            .map(Layer::is_visible)
            .ok_or(EditError::UnknownLayer(id))?;
        if current != visible {
            self.history.snapshot(&self.layers);
            if let Some(layer) = self.layers.get_mut(id) {
                layer.set_visible(visible);
            }
            self.touch();
        }
        Ok(Status::VisibilityChanged { id, visible })
    }

    /// Restores the layer list as it was before the last undoable change.
    pub fn undo(&mut self) -> EditResult {
        match self.history.undo() {
            Some(previous) => {
                self.layers = previous;
                self.touch();
                Ok(Status::Undone)
            }
            None => Ok(Status::NothingToUndo),
        }
    }

    /// Discards every layer and the undo history. Not undoable.
    pub fn clear_all(&mut self) -> EditResult {
        self.layers.clear();
        self.history.clear();
        self.touch();
        Ok(Status::Cleared)
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        id
    }

    fn commit(&mut self, layer: Layer) {
        self.history.snapshot(&self.layers);
        tracing::debug!(layer = %layer.id(), "adding layer");
        self.layers.append(layer);
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Flattened image of the canvas with all visible layers, or `None`
    /// when no background has been set.
    ///
    /// The last result is reused until something changes.
    pub fn render(&mut self) -> Option<RgbImage> {
        let canvas = self.canvas.as_ref()?;
        if let Some((revision, image)) = &self.cache {
            if *revision == self.revision {
                tracing::trace!(revision, "render cache hit");
                return Some(image.clone());
            }
        }
        let image = composite::render(canvas.base(), &self.layers, self.fonts);
        self.cache = Some((self.revision, image.clone()));
        Some(image)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The current canvas, if one has been set.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Layers in paint order.
    pub fn layers(&self) -> &LayerList {
        &self.layers
    }

    /// Undo snapshots.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Id the next added layer will receive.
    pub fn next_id(&self) -> LayerId {
        LayerId(self.next_id)
    }

    /// Bumped by every change that affects the rendered output.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Listing of the layer stack, one layer per line.
    pub fn summary(&self) -> String {
        self.layers.summary()
    }
}
