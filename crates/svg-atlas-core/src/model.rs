use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge (`x + w`).
    pub fn right(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge (`y + h`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.right() || r.x >= self.right() || self.y >= r.bottom() || r.y >= self.bottom())
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
}

/// Identity of an input document (usually a file path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
    /// File name without directories and extension (`assets/orc.json` -> `orc`).
    pub fn base_name(&self) -> String {
        self.as_path()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for SourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&Path> for SourceId {
    fn from(p: &Path) -> Self {
        Self(p.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for SourceId {
    fn from(p: PathBuf) -> Self {
        Self::from(p.as_path())
    }
}

/// Opaque handle from a packed rectangle back to its owning document
/// (the position of the input in registration order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRef(pub u32);

impl SourceRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A placed element within a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedRect {
    /// Element `id` attribute; empty when absent or when a whole document was packed.
    pub name: String,
    /// Corner of the element in its source document, before packing and scaling.
    pub original_x: i32,
    pub original_y: i32,
    /// Corner within the page (top-left origin).
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// Owning document.
    pub source: SourceRef,
    /// 0 for a whole document, otherwise the index of the exploded element.
    pub element_index: u32,
    /// Paint order within the source document.
    pub z_order: i32,
    /// Viewport size the element was scaled to for packing.
    pub dst_viewport_width: f32,
    pub dst_viewport_height: f32,
}

impl PackedRect {
    pub fn frame(&self) -> Rect {
        Rect::new(
            self.x.max(0) as u32,
            self.y.max(0) as u32,
            self.width.max(0) as u32,
            self.height.max(0) as u32,
        )
    }
}

/// Result of submitting one document to a packing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectStats {
    /// Bounding boxes derived from the document.
    pub collected: u32,
    /// Bounding boxes that fit a page and will be placed.
    pub packed: u32,
}

impl CollectStats {
    pub fn is_complete(&self) -> bool {
        self.packed >= self.collected
    }
    pub fn shortfall(&self) -> u32 {
        self.collected.saturating_sub(self.packed)
    }
}

/// One bin produced by a committed packing session.
#[derive(Debug, Clone)]
pub struct Bin {
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub rects: crate::record::RectBuffer,
}

impl Bin {
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }
}
