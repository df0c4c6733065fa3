//! Error and status types.
//!
//! Three kinds of outcome flow out of the engine:
//!
//! - [`RenderError`] for failures at I/O and rasterization boundaries
//!   (decoding files, parsing fonts or SVG, stamping a single layer).
//! - [`EditError`] for rejected editor operations. The layer list and history
//!   are left untouched when one of these is returned.
//! - [`Status`] for successful or no-op editor operations.
//!
//! Both [`EditError`] and [`Status`] format to the short human-readable
//! message shown to the user.

use crate::layer::LayerId;

/// Result alias for fallible I/O and rasterization.
pub type RenderResult<T> = Result<T, RenderError>;

/// Failures while loading inputs or rasterizing a layer.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid font '{0}'")]
    InvalidFont(String),

    #[error("template '{0}' not found")]
    TemplateNotFound(String),

    #[error("svg error: {0}")]
    Svg(String),

    #[error("layer {id}: {reason}")]
    Layer { id: LayerId, reason: String },
}

impl RenderError {
    /// Creates an SVG parse or render error.
    pub fn svg(msg: impl Into<String>) -> Self {
        Self::Svg(msg.into())
    }

    /// Creates an error attributed to one layer.
    pub fn layer(id: LayerId, reason: impl Into<String>) -> Self {
        Self::Layer {
            id,
            reason: reason.into(),
        }
    }
}

/// Rejection of an editor operation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Enter some text first")]
    EmptyText,

    #[error("Set a background first")]
    NoCanvas,

    #[error("Upload a logo first")]
    MissingLogo,

    #[error("No layer with id {0}")]
    UnknownLayer(LayerId),
}

/// Outcome of an editor operation that was accepted (possibly as a no-op).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// A layer was appended.
    Added(LayerId),
    /// A layer was removed.
    Removed(LayerId),
    /// Nothing to remove.
    NoLayers,
    /// The previous layer list was restored.
    Undone,
    /// The history stack was empty.
    NothingToUndo,
    /// All layers were discarded.
    Cleared,
    /// A new background was set.
    CanvasReady { width: u32, height: u32 },
    /// The requested background could not be resolved; a white canvas was used.
    CanvasFallback { reason: String },
    /// A layer's visibility flag was changed.
    VisibilityChanged { id: LayerId, visible: bool },
}

impl Status {
    /// Returns true for outcomes that changed nothing.
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::NoLayers | Self::NothingToUndo)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added(id) => write!(f, "Added layer {id}"),
            Self::Removed(id) => write!(f, "Removed layer {id}"),
            Self::NoLayers => f.write_str("No layers"),
            Self::Undone => f.write_str("Undone"),
            Self::NothingToUndo => f.write_str("Nothing to undo"),
            Self::Cleared => f.write_str("All layers cleared"),
            Self::CanvasReady { width, height } => {
                write!(f, "Canvas set ({width}x{height}). Add layers.")
            }
            Self::CanvasFallback { reason } => {
                write!(f, "{reason}. Using white background.")
            }
            Self::VisibilityChanged { id, visible: true } => write!(f, "Layer {id} shown"),
            Self::VisibilityChanged { id, visible: false } => write!(f, "Layer {id} hidden"),
        }
    }
}
