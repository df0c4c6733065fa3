//! Layer model.
//!
//! A [`LayerList`] is an ordered stack of [`Layer`]s. Index order is paint
//! order: index 0 is painted first (bottom), the last layer ends up on top.
//! Layers are never edited in place apart from their visibility flag;
//! correcting a layer means removing it and adding a new one.

pub mod logo;
pub mod svg;
pub mod text;

pub use logo::{LogoLayer, LogoLayerBuilder, LogoSize, LogoSource};
pub use svg::SvgSource;
pub use text::{Alignment, EffectKind, TextLayer, TextLayerBuilder, TextRole};

use serde::{Deserialize, Serialize};

// ============================================================================
// Identifiers and geometry
// ============================================================================

/// Stable layer identifier. Assigned in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct LayerId(pub u64);

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pixel position in canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Clamps the point into `[0, width) x [0, height)`.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let max_x = (width as i32 - 1).max(0);
        let max_y = (height as i32 - 1).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
        }
    }
}

// ============================================================================
// Layer
// ============================================================================

/// A single element of the layer stack.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Text(TextLayer),
    Logo(LogoLayer),
}

impl Layer {
    /// Returns the layer's id.
    pub fn id(&self) -> LayerId {
        match self {
            Self::Text(t) => t.id,
            Self::Logo(l) => l.id,
        }
    }

    /// Hidden layers are skipped by the compositor.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Text(t) => t.visible,
            Self::Logo(l) => l.visible,
        }
    }

    /// Shows or hides the layer.
    pub fn set_visible(&mut self, visible: bool) {
        match self {
            Self::Text(t) => t.visible = visible,
            Self::Logo(l) => l.visible = visible,
        }
    }

    /// Returns the text layer, if this is one.
    pub fn as_text(&self) -> Option<&TextLayer> {
        match self {
            Self::Text(t) => Some(t),
            Self::Logo(_) => None,
        }
    }

    /// Returns the logo layer, if this is one.
    pub fn as_logo(&self) -> Option<&LogoLayer> {
        match self {
            Self::Logo(l) => Some(l),
            Self::Text(_) => None,
        }
    }

    /// One-line description used in layer summaries.
    pub fn describe(&self) -> String {
        let marker = if self.is_visible() { "[x]" } else { "[ ]" };
        match self {
            Self::Text(t) => format!(
                "{marker} Layer {}: {} ({})",
                t.id,
                truncate(&t.text, SUMMARY_TEXT_CHARS),
                t.effect
            ),
            Self::Logo(l) => format!("{marker} Layer {}: Logo ({}px)", l.id, l.target_size),
        }
    }
}

const SUMMARY_TEXT_CHARS: usize = 20;

fn truncate(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

// ============================================================================
// LayerList
// ============================================================================

/// Ordered collection of layers; index order is z-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerList {
    layers: Vec<Layer>,
}

impl LayerList {
    /// Creates an empty layer list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a layer on top of the stack.
    pub fn append(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Removes and returns the topmost layer.
    pub fn remove_last(&mut self) -> Option<Layer> {
        self.layers.pop()
    }

    /// Removes the layer with the given id, wherever it sits in the stack.
    pub fn remove(&mut self, id: LayerId) -> Option<Layer> {
        let index = self.layers.iter().position(|l| l.id() == id)?;
        Some(self.layers.remove(index))
    }

    /// Removes every layer.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Number of layers, hidden ones included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Looks up a layer by id.
    pub fn get(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id() == id)
    }

    /// The topmost layer.
    pub fn last(&self) -> Option<&Layer> {
        self.layers.last()
    }

    /// Iterates bottom to top.
    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.layers.iter()
    }

    /// Highest id present in the list, if any.
    pub fn max_id(&self) -> Option<LayerId> {
        self.layers.iter().map(Layer::id).max()
    }

    /// Multi-line human readable listing of the stack.
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No layers yet".to_string();
        }
        self.layers
            .iter()
            .map(Layer::describe)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<Layer> for LayerList {
    fn from_iter<I: IntoIterator<Item = Layer>>(iter: I) -> Self {
        Self {
            layers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LayerList {
    type Item = &'a Layer;
    type IntoIter = std::slice::Iter<'a, Layer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(id: u64, body: &str) -> Layer {
        Layer::Text(TextLayerBuilder::new(body).into_layer(LayerId(id)))
    }

    #[test]
    fn append_and_remove_last_follow_stack_order() {
        let mut list = LayerList::new();
        assert!(list.remove_last().is_none());

        list.append(text(1, "bottom"));
        list.append(text(2, "top"));
        assert_eq!(list.len(), 2);
        assert_eq!(list.last().map(Layer::id), Some(LayerId(2)));

        let removed = list.remove_last().unwrap();
        assert_eq!(removed.id(), LayerId(2));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_by_id_keeps_order_of_others() {
        let mut list: LayerList = (1..=3).map(|i| text(i, "x")).collect();
        assert!(list.remove(LayerId(2)).is_some());
        assert!(list.remove(LayerId(2)).is_none());
        let ids: Vec<_> = list.iter().map(Layer::id).collect();
        assert_eq!(ids, vec![LayerId(1), LayerId(3)]);
        assert_eq!(list.max_id(), Some(LayerId(3)));
    }

    #[test]
    fn visibility_toggle() {
        let mut list: LayerList = [text(1, "a")].into_iter().collect();
        list.get_mut(LayerId(1)).unwrap().set_visible(false);
        assert!(!list.get(LayerId(1)).unwrap().is_visible());
    }

    #[test]
    fn summary_truncates_long_text() {
        let mut list = LayerList::new();
        assert_eq!(list.summary(), "No layers yet");

        list.append(text(1, "Hello"));
        list.append(text(2, "This line is definitely longer than twenty"));
        let summary = list.summary();
        let lines: Vec<_> = summary.lines().collect();
        assert_eq!(lines[0], "[x] Layer 1: Hello (normal)");
        assert_eq!(lines[1], "[x] Layer 2: This line is definit... (normal)");
    }

    #[test]
    fn point_clamp() {
        assert_eq!(Point::new(-5, 500).clamp_to(100, 200), Point::new(0, 199));
        assert_eq!(Point::new(10, 10).clamp_to(100, 200), Point::new(10, 10));
    }
}
