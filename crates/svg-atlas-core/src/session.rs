use crate::config::{MAX_PAGE_DIMENSION, is_pow2, next_pow2};
use crate::document::Document;
use crate::error::PackingError;
use crate::model::{Bin, CollectStats, PackedRect, SourceRef};
use crate::packer::{BinLimits, BuiltinPlacer, Placer, PlacementItem};
use crate::record::{self, NameTable, RecordLayout, RectBuffer};
use std::sync::Arc;
use tracing::{debug, info};

/// Observable state of a [`PackingSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Open,
}

struct OpenSession {
    limits: BinLimits,
    pow2: bool,
    scale: f32,
    rects: Vec<PackedRect>,
    packable: Vec<bool>,
}

/// Collects element boxes between `begin` and `end` and partitions them into bins.
pub struct PackingSession {
    placer: Box<dyn Placer>,
    layout: RecordLayout,
    open: Option<OpenSession>,
}

impl Default for PackingSession {
    fn default() -> Self {
        Self::new(Box::new(BuiltinPlacer::default()), RecordLayout::native())
    }
}

impl PackingSession {
    pub fn new(placer: Box<dyn Placer>, layout: RecordLayout) -> Self {
        Self {
            placer,
            layout,
            open: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.open.is_some() {
            SessionState::Open
        } else {
            SessionState::Idle
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    /// Opens a session. Arguments are checked as given; normalize them first.
    pub fn begin(
        &mut self,
        max_dimension: u32,
        border: u32,
        pow2: bool,
        scale: f32,
    ) -> Result<(), PackingError> {
        if self.open.is_some() {
            return Err(PackingError::AlreadyOpen);
        }
        if max_dimension == 0 {
            return Err(PackingError::InvalidArgument(
                "max_dimension must be > 0".into(),
            ));
        }
        if max_dimension > MAX_PAGE_DIMENSION {
            return Err(PackingError::InvalidArgument(format!(
                "max_dimension {max_dimension} exceeds {MAX_PAGE_DIMENSION}"
            )));
        }
        if pow2 && !is_pow2(max_dimension) {
            return Err(PackingError::InvalidArgument(format!(
                "max_dimension {max_dimension} is not a power of two"
            )));
        }
        if 2 * border as u64 + 1 > max_dimension as u64 {
            return Err(PackingError::InvalidArgument(format!(
                "border {border} leaves no room inside a {max_dimension}px page"
            )));
        }
        check_scale(scale, "scale")?;
        self.open = Some(OpenSession {
            limits: BinLimits {
                max_dimension,
                border,
            },
            pow2,
            scale,
            rects: Vec::new(),
            packable: Vec::new(),
        });
        Ok(())
    }

    /// Collects the element boxes of `document` scaled by `scale * local_scale`.
    ///
    /// Empty boxes are skipped. `packed` counts the boxes that fit an empty bin;
    /// a shortfall is reported, not rejected.
    pub fn add<D: Document + ?Sized>(
        &mut self,
        document: &D,
        source: SourceRef,
        explode_groups: bool,
        local_scale: f32,
    ) -> Result<CollectStats, PackingError> {
        let open = self.open.as_mut().ok_or(PackingError::NotOpen)?;
        check_scale(local_scale, "local_scale")?;

        let s = open.scale * local_scale;
        let vp = document.viewport();
        let (rx, ry) = document.pixel_ratio();
        let dst_w = document.width() * s;
        let dst_h = document.height() * s;

        let mut stats = CollectStats::default();
        for el in document.elements(explode_groups) {
            let left = (el.x - vp.x) * rx * s;
            let top = (el.y - vp.y) * ry * s;
            let Some((x0, y0, w, h)) =
                pixel_box(left, top, el.width * rx * s, el.height * ry * s)
            else {
                continue;
            };
            stats.collected += 1;
            let fits = open.limits.fits(w, h);
            if fits {
                stats.packed += 1;
            }
            open.rects.push(PackedRect {
                name: el.name,
                original_x: x0,
                original_y: y0,
                x: 0,
                y: 0,
                width: w as i32,
                height: h as i32,
                source,
                element_index: el.element_index,
                z_order: el.z_order,
                dst_viewport_width: dst_w,
                dst_viewport_height: dst_h,
            });
            open.packable.push(fits);
        }
        debug!(
            source = source.0,
            collected = stats.collected,
            packed = stats.packed,
            "collected element boxes"
        );
        Ok(stats)
    }

    /// Closes the session. Without `commit` everything collected is dropped.
    pub fn end(&mut self, commit: bool) -> Result<Vec<Bin>, PackingError> {
        let open = self.open.take().ok_or(PackingError::NotOpen)?;
        if !commit {
            debug!(discarded = open.rects.len(), "packing session discarded");
            return Ok(Vec::new());
        }
        let bins = self.partition(open)?;
        info!(bins = bins.len(), "packing session committed");
        Ok(bins)
    }

    fn partition(&self, open: OpenSession) -> Result<Vec<Bin>, PackingError> {
        let OpenSession {
            limits,
            pow2,
            rects,
            packable,
            ..
        } = open;

        let mut items: Vec<PlacementItem> = rects
            .iter()
            .enumerate()
            .filter(|(i, _)| packable[*i])
            .map(|(id, r)| PlacementItem {
                id,
                width: r.width as u32,
                height: r.height as u32,
            })
            .collect();
        // larger boxes first; the stable sort keeps collection order for ties
        items.sort_by(|a, b| {
            let aa = a.width as u64 * a.height as u64;
            let ba = b.width as u64 * b.height as u64;
            ba.cmp(&aa).then_with(|| b.width.max(b.height).cmp(&a.width.max(a.height)))
        });

        let mut names = NameTable::new();
        let mut encoded: Vec<(u32, u32, usize, Vec<u8>)> = Vec::new();
        while !items.is_empty() {
            let placements = self.placer.place(&items, &limits);
            if placements.is_empty() {
                return Err(PackingError::InvalidArgument(format!(
                    "placer left {} boxes unplaced in an empty bin",
                    items.len()
                )));
            }
            let mut page_rects = Vec::with_capacity(placements.len());
            let (mut extent_w, mut extent_h) = (0u32, 0u32);
            for p in &placements {
                let mut r = rects[p.id].clone();
                r.x = p.x as i32;
                r.y = p.y as i32;
                extent_w = extent_w.max(p.x + r.width as u32 + limits.border);
                extent_h = extent_h.max(p.y + r.height as u32 + limits.border);
                page_rects.push(r);
            }
            let placed: std::collections::HashSet<usize> =
                placements.iter().map(|p| p.id).collect();
            items.retain(|it| !placed.contains(&it.id));

            let width = page_side(extent_w, pow2, limits.max_dimension);
            let height = page_side(extent_h, pow2, limits.max_dimension);
            let mut bytes = Vec::with_capacity(page_rects.len() * self.layout.record_size());
            for r in &page_rects {
                record::encode(r, self.layout, &mut names, &mut bytes);
            }
            debug!(
                bin = encoded.len(),
                width,
                height,
                rects = page_rects.len(),
                "bin closed"
            );
            encoded.push((width, height, page_rects.len(), bytes));
        }

        // every bin shares the final table
        let names = Arc::new(names);
        Ok(encoded
            .into_iter()
            .enumerate()
            .map(|(index, (width, height, count, bytes))| Bin {
                index,
                width,
                height,
                rects: RectBuffer::new(self.layout, count, bytes, Arc::clone(&names)),
            })
            .collect())
    }
}

fn check_scale(v: f32, what: &str) -> Result<(), PackingError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(PackingError::InvalidArgument(format!(
            "{what} must be > 0 (got {v})"
        )))
    }
}

/// Snaps a scaled box to whole pixels. The corner is floored, the size is rounded up
/// from the size alone so it never depends on the fractional position and never grows
/// when the scale shrinks. `None` for empty or non-finite boxes.
fn pixel_box(left: f32, top: f32, width: f32, height: f32) -> Option<(i32, i32, u32, u32)> {
    if !(left.is_finite() && top.is_finite() && width.is_finite() && height.is_finite()) {
        return None;
    }
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some((
        left.floor() as i32,
        top.floor() as i32,
        width.ceil() as u32,
        height.ceil() as u32,
    ))
}

fn page_side(extent: u32, pow2: bool, max_dimension: u32) -> u32 {
    let side = extent.clamp(1, max_dimension);
    if pow2 {
        next_pow2(side).min(max_dimension)
    } else {
        side
    }
}
