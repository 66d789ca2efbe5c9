//! Host-side collaborators: scrollable containers, anchor lookup and the
//! document bundling them

use std::fmt;
use std::sync::Arc;

use crate::interrupt::InterruptSource;

/// Scroll axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Axis {
    pub fn from_vertical(vertical: bool) -> Self {
        if vertical {
            Axis::Vertical
        } else {
            Axis::Horizontal
        }
    }
}

/// A container exposing a mutable scroll offset
///
/// Implementations use interior mutability; the controller reads and writes
/// offsets from the tick task.
pub trait ScrollView: Send + Sync {
    /// Current offset along `axis`, `None` if it cannot be read
    fn scroll_offset(&self, axis: Axis) -> Option<f64>;

    /// Request a new offset along `axis`
    ///
    /// A view may clamp or ignore the request; the controller re-reads the
    /// offset to find out what happened.
    fn set_scroll_offset(&self, axis: Axis, offset: f64);

    /// Whether the screen cell (`column`, `row`) lies inside this view
    fn contains(&self, column: u16, row: u16) -> bool;
}

impl fmt::Debug for dyn ScrollView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollView")
            .field("vertical", &self.scroll_offset(Axis::Vertical))
            .field("horizontal", &self.scroll_offset(Axis::Horizontal))
            .finish()
    }
}

/// Resolves named anchors to content coordinates
pub trait AnchorResolver: Send + Sync {
    /// `(x, y)` content position of `anchor`, `None` if it does not exist
    fn resolve(&self, anchor: &str) -> Option<(f64, f64)>;
}

/// The environment a scroll runs in
///
/// Supplies the default scroll views, anchor lookup and the input source
/// interrupt listeners are attached to.
#[derive(Clone, Default)]
pub struct Document {
    pub scroll_views: Vec<Arc<dyn ScrollView>>,
    pub anchors: Option<Arc<dyn AnchorResolver>>,
    pub input: Option<Arc<dyn InterruptSource>>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scroll_view(mut self, view: Arc<dyn ScrollView>) -> Self {
        self.scroll_views.push(view);
        self
    }

    pub fn with_anchors(mut self, anchors: Arc<dyn AnchorResolver>) -> Self {
        self.anchors = Some(anchors);
        self
    }

    pub fn with_input(mut self, input: Arc<dyn InterruptSource>) -> Self {
        self.input = Some(input);
        self
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("scroll_views", &self.scroll_views.len())
            .field("anchors", &self.anchors.is_some())
            .field("input", &self.input.is_some())
            .finish()
    }
}
