use crate::error::LoadError;
use crate::model::SourceId;
use serde::{Deserialize, Serialize};

/// Visible area of a document in its own user units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Bounding box of a packable element, in viewport units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementBounds {
    /// `id` of the element; empty if it has none.
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// 0 for the whole document, otherwise the 1-based index of the top-level group.
    pub element_index: u32,
    pub z_order: i32,
}

/// A loaded vector document. Shared read-only with the rasterizer, possibly across threads.
pub trait Document: Send + Sync {
    /// Output width in pixels at scale 1.
    fn width(&self) -> f32;
    /// Output height in pixels at scale 1.
    fn height(&self) -> f32;
    fn viewport(&self) -> Viewport;
    /// Bounds of each top-level drawable group, in paint order.
    fn groups(&self) -> Vec<ElementBounds>;

    /// Boxes to pack: the whole document, or one per top-level group when exploding.
    fn elements(&self, explode_groups: bool) -> Vec<ElementBounds> {
        if explode_groups {
            return self.groups();
        }
        let vp = self.viewport();
        vec![ElementBounds {
            name: String::new(),
            x: vp.x,
            y: vp.y,
            width: vp.width,
            height: vp.height,
            element_index: 0,
            z_order: 0,
        }]
    }

    /// Pixels per viewport unit on each axis at scale 1.
    fn pixel_ratio(&self) -> (f32, f32) {
        let vp = self.viewport();
        let sx = if vp.width > 0.0 {
            self.width() / vp.width
        } else {
            1.0
        };
        let sy = if vp.height > 0.0 {
            self.height() / vp.height
        } else {
            1.0
        };
        (sx, sy)
    }
}

/// Resolves a source identity to a loaded document.
pub trait DocumentLoader {
    type Document: Document;
    fn load(&mut self, source: &SourceId) -> Result<Self::Document, LoadError>;
}
