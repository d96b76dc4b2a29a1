//! Scene documents: a small serde vector format with a loader and a CPU rasterizer.
//!
//! ```yaml
//! width: 64
//! height: 64
//! groups:
//!   - id: head
//!     shapes:
//!       - { kind: ellipse, x: 8, y: 8, w: 48, h: 48, fill: [255, 200, 0, 255] }
//! ```

use crate::compositing::blend_pixel;
use crate::config::RenderingQuality;
use crate::document::{Document, DocumentLoader, ElementBounds, Viewport};
use crate::error::{LoadError, RasterError};
use crate::model::{PackedRect, SourceId};
use crate::page::Rasterizer;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Ellipse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    #[serde(default = "default_fill")]
    pub fill: [u8; 4],
}

impl Shape {
    fn contains(&self, px: f32, py: f32) -> bool {
        match self.kind {
            ShapeKind::Rect => px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h,
            ShapeKind::Ellipse => {
                let rx = self.w * 0.5;
                let ry = self.h * 0.5;
                if rx <= 0.0 || ry <= 0.0 {
                    return false;
                }
                let dx = (px - (self.x + rx)) / rx;
                let dy = (py - (self.y + ry)) / ry;
                dx * dx + dy * dy <= 1.0
            }
        }
    }
}

fn default_fill() -> [u8; 4] {
    [0, 0, 0, 255]
}

/// A top-level group: the unit packed when a document is exploded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneGroup {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl SceneGroup {
    /// Union of the shape boxes, `None` for a group without area.
    pub fn bounds(&self) -> Option<(f32, f32, f32, f32)> {
        let mut it = self.shapes.iter().filter(|s| s.w > 0.0 && s.h > 0.0);
        let first = it.next()?;
        let (mut x0, mut y0) = (first.x, first.y);
        let (mut x1, mut y1) = (first.x + first.w, first.y + first.h);
        for s in it {
            x0 = x0.min(s.x);
            y0 = y0.min(s.y);
            x1 = x1.max(s.x + s.w);
            y1 = y1.max(s.y + s.h);
        }
        Some((x0, y0, x1 - x0, y1 - y0))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    pub width: f32,
    pub height: f32,
    /// Defaults to `0 0 width height`.
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default)]
    pub groups: Vec<SceneGroup>,
}

impl SceneDocument {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            viewport: None,
            groups: Vec::new(),
        }
    }

    pub fn with_group(mut self, id: Option<&str>, shapes: Vec<Shape>) -> Self {
        self.groups.push(SceneGroup {
            id: id.map(str::to_string),
            shapes,
        });
        self
    }

    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let doc: Self = serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
        doc.checked()
    }

    pub fn from_yaml(text: &str) -> Result<Self, LoadError> {
        let doc: Self = serde_yaml::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))?;
        doc.checked()
    }

    fn checked(self) -> Result<Self, LoadError> {
        if !(self.width.is_finite() && self.width > 0.0 && self.height.is_finite() && self.height > 0.0) {
            return Err(LoadError::Parse(format!(
                "document size must be positive (got {}x{})",
                self.width, self.height
            )));
        }
        Ok(self)
    }
}

impl Document for SceneDocument {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn viewport(&self) -> Viewport {
        self.viewport
            .unwrap_or(Viewport::new(0.0, 0.0, self.width, self.height))
    }

    fn groups(&self) -> Vec<ElementBounds> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, g)| {
                let (x, y, width, height) = g.bounds()?;
                Some(ElementBounds {
                    name: g.id.clone().unwrap_or_default(),
                    x,
                    y,
                    width,
                    height,
                    element_index: i as u32 + 1,
                    z_order: i as i32,
                })
            })
            .collect()
    }
}

/// Loads scene documents from disk; `.json`, `.yaml` and `.yml` are recognized.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneLoader;

impl SceneLoader {
    pub fn new() -> Self {
        Self
    }
}

pub fn is_scene_path(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("json" | "yaml" | "yml")
    )
}

impl DocumentLoader for SceneLoader {
    type Document = SceneDocument;

    fn load(&mut self, source: &SourceId) -> Result<SceneDocument, LoadError> {
        let path = source.as_path();
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::NotFound(path.display().to_string()),
            _ => LoadError::Io(e),
        })?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => SceneDocument::from_json(&text),
            Some("yaml" | "yml") => SceneDocument::from_yaml(&text),
            other => Err(LoadError::Parse(format!(
                "unsupported document extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

/// Serves documents registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    docs: HashMap<SourceId, SceneDocument>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source: impl Into<SourceId>, doc: SceneDocument) {
        self.docs.insert(source.into(), doc);
    }

    pub fn with(mut self, source: impl Into<SourceId>, doc: SceneDocument) -> Self {
        self.insert(source, doc);
        self
    }
}

impl DocumentLoader for MemoryLoader {
    type Document = SceneDocument;

    fn load(&mut self, source: &SourceId) -> Result<SceneDocument, LoadError> {
        self.docs
            .get(source)
            .cloned()
            .ok_or_else(|| LoadError::NotFound(source.to_string()))
    }
}

/// CPU rasterizer for [`SceneDocument`] with box-filter supersampling.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneRasterizer;

impl SceneRasterizer {
    fn samples(quality: RenderingQuality) -> u32 {
        match quality {
            RenderingQuality::NonAntialiased => 1,
            RenderingQuality::Faster => 2,
            RenderingQuality::Better => 4,
        }
    }

    fn draw_rect(
        doc: &SceneDocument,
        rect: &PackedRect,
        surface: &mut RgbaImage,
        samples: u32,
    ) {
        let vp = doc.viewport();
        // page pixels per viewport unit
        let sx = if vp.width > 0.0 { rect.dst_viewport_width / vp.width } else { 1.0 };
        let sy = if vp.height > 0.0 { rect.dst_viewport_height / vp.height } else { 1.0 };
        let groups: Vec<&SceneGroup> = if rect.element_index == 0 {
            doc.groups.iter().collect()
        } else {
            doc.groups
                .get(rect.element_index as usize - 1)
                .into_iter()
                .collect()
        };

        // Page position of the viewport origin. The element's unrounded corner lands
        // exactly on the rect corner; the box size was rounded up from the size alone.
        let corner = match rect.element_index {
            0 => Some((vp.x, vp.y)),
            _ => groups.first().and_then(|g| g.bounds()).map(|(x, y, _, _)| (x, y)),
        };
        let (ox, oy) = match corner {
            Some((ex, ey)) => (
                rect.x as f32 - (ex - vp.x) * sx,
                rect.y as f32 - (ey - vp.y) * sy,
            ),
            None => (
                (rect.x - rect.original_x) as f32,
                (rect.y - rect.original_y) as f32,
            ),
        };

        let step = 1.0 / samples as f32;
        let total = (samples * samples) as f32;
        for group in groups {
            for shape in &group.shapes {
                let left = ox + (shape.x - vp.x) * sx;
                let top = oy + (shape.y - vp.y) * sy;
                let right = left + shape.w * sx;
                let bottom = top + shape.h * sy;
                // clip to the element's own frame so neighbours stay untouched
                let x0 = (left.floor() as i64).max(rect.x as i64);
                let y0 = (top.floor() as i64).max(rect.y as i64);
                let x1 = (right.ceil() as i64).min((rect.x + rect.width) as i64);
                let y1 = (bottom.ceil() as i64).min((rect.y + rect.height) as i64);
                for py in y0.max(0)..y1 {
                    for px in x0.max(0)..x1 {
                        let mut hits = 0u32;
                        for j in 0..samples {
                            for i in 0..samples {
                                let fx = px as f32 + (i as f32 + 0.5) * step;
                                let fy = py as f32 + (j as f32 + 0.5) * step;
                                let vx = (fx - ox) / sx + vp.x;
                                let vy = (fy - oy) / sy + vp.y;
                                if shape.contains(vx, vy) {
                                    hits += 1;
                                }
                            }
                        }
                        if hits > 0 {
                            blend_pixel(surface, px as u32, py as u32, shape.fill, hits as f32 / total);
                        }
                    }
                }
            }
        }
    }
}

impl Rasterizer<SceneDocument> for SceneRasterizer {
    fn draw_batch(
        &self,
        documents: &[SceneDocument],
        rects: &[PackedRect],
        surface: &mut RgbaImage,
        quality: RenderingQuality,
    ) -> Result<(), RasterError> {
        let (sw, sh) = surface.dimensions();
        let samples = Self::samples(quality);
        for rect in rects {
            let doc = documents
                .get(rect.source.index())
                .ok_or(RasterError::UnknownSource(rect.source.0))?;
            let inside = rect.x >= 0
                && rect.y >= 0
                && rect.width > 0
                && rect.height > 0
                && (rect.x as i64 + rect.width as i64) <= sw as i64
                && (rect.y as i64 + rect.height as i64) <= sh as i64;
            if !inside {
                return Err(RasterError::OutOfSurface {
                    width: sw,
                    height: sh,
                    x: rect.x,
                    y: rect.y,
                    w: rect.width,
                    h: rect.height,
                });
            }
            Self::draw_rect(doc, rect, surface, samples);
        }
        Ok(())
    }
}
