use crate::config::{GeneratorConfig, MaxRectsHeuristic, PlacerKind, SkylineHeuristic};
use crate::model::Rect;

pub mod maxrects;
pub mod skyline;

/// Geometry of an empty bin handed to a placer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinLimits {
    pub max_dimension: u32,
    pub border: u32,
}

impl BinLimits {
    /// Area slots may occupy. Every slot is the element grown by `border` to the
    /// right and bottom, so the leading page edge is covered by the region offset and
    /// the trailing edge by the slot itself.
    pub fn region(&self) -> Rect {
        let b = self.border;
        let side = self.max_dimension.saturating_sub(b);
        Rect::new(b, b, side, side)
    }

    /// True if a `w x h` element fits an empty bin.
    pub fn fits(&self, w: u32, h: u32) -> bool {
        let need_w = w as u64 + 2 * self.border as u64;
        let need_h = h as u64 + 2 * self.border as u64;
        w > 0 && h > 0 && need_w <= self.max_dimension as u64 && need_h <= self.max_dimension as u64
    }
}

/// Places rectangles into a single bin.
///
/// Implementations must ensure no overlaps and keep every slot inside the region
/// they were created with. `pack` returns `None` if the slot cannot be placed.
pub trait BinPacker {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn pack(&mut self, w: u32, h: u32) -> Option<Rect>;
}

/// Size of one box to place, tagged with a caller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementItem {
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

/// Top-left corner assigned to a [`PlacementItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub id: usize,
    pub x: u32,
    pub y: u32,
}

/// Placement strategy: opens empty bins for a packing session.
pub trait Placer: Send {
    fn new_bin(&self, limits: &BinLimits) -> Box<dyn BinPacker>;

    /// Fills one empty bin with as many `items` as fit, in the given order,
    /// sweeping the remaining items again until a pass places nothing.
    fn place(&self, items: &[PlacementItem], limits: &BinLimits) -> Vec<Placement> {
        let mut bin = self.new_bin(limits);
        let mut placed = Vec::new();
        let mut remaining: Vec<&PlacementItem> = items.iter().collect();
        loop {
            let before = remaining.len();
            remaining.retain(|item| {
                if !bin.can_pack(item.width, item.height) {
                    return true;
                }
                match bin.pack(item.width, item.height) {
                    Some(r) => {
                        placed.push(Placement {
                            id: item.id,
                            x: r.x,
                            y: r.y,
                        });
                        false
                    }
                    None => true,
                }
            });
            if remaining.is_empty() || remaining.len() == before {
                break;
            }
        }
        placed
    }
}

/// Placers shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinPlacer {
    MaxRects(MaxRectsHeuristic),
    Skyline(SkylineHeuristic),
}

impl BuiltinPlacer {
    pub fn from_config(cfg: &GeneratorConfig) -> Self {
        match cfg.placer {
            PlacerKind::MaxRects => BuiltinPlacer::MaxRects(cfg.mr_heuristic),
            PlacerKind::Skyline => BuiltinPlacer::Skyline(cfg.skyline_heuristic),
        }
    }
}

impl Default for BuiltinPlacer {
    fn default() -> Self {
        BuiltinPlacer::MaxRects(MaxRectsHeuristic::BestAreaFit)
    }
}

impl Placer for BuiltinPlacer {
    fn new_bin(&self, limits: &BinLimits) -> Box<dyn BinPacker> {
        match *self {
            BuiltinPlacer::MaxRects(h) => {
                Box::new(maxrects::MaxRectsPacker::new(limits.region(), limits.border, h))
            }
            BuiltinPlacer::Skyline(h) => {
                Box::new(skyline::SkylinePacker::new(limits.region(), limits.border, h))
            }
        }
    }
}
