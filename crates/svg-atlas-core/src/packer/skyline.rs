use super::BinPacker;
use crate::config::SkylineHeuristic;
use crate::model::Rect;

#[derive(Clone, Copy, Debug)]
struct SkylineNode {
    x: u32,
    y: u32,
    w: u32,
}

impl SkylineNode {
    #[inline]
    fn right(&self) -> u32 {
        self.x + self.w
    }
}

/// Skyline bin: tracks the top profile of placed slots and drops new slots onto it.
pub struct SkylinePacker {
    region: Rect,
    spacing: u32,
    skylines: Vec<SkylineNode>,
    heuristic: SkylineHeuristic,
}

impl SkylinePacker {
    pub fn new(region: Rect, spacing: u32, heuristic: SkylineHeuristic) -> Self {
        let skylines = if region.w > 0 && region.h > 0 {
            vec![SkylineNode {
                x: region.x,
                y: region.y,
                w: region.w,
            }]
        } else {
            Vec::new()
        };
        Self {
            region,
            spacing,
            skylines,
            heuristic,
        }
    }

    fn can_put(&self, mut i: usize, w: u32, h: u32) -> Option<Rect> {
        let mut rect = Rect::new(self.skylines[i].x, 0, w, h);
        let mut width_left = w;
        loop {
            rect.y = rect.y.max(self.skylines[i].y);
            if !self.region.contains(&rect) {
                return None;
            }
            if self.skylines[i].w >= width_left {
                return Some(rect);
            }
            width_left -= self.skylines[i].w;
            i += 1;
            if i >= self.skylines.len() {
                return None;
            }
        }
    }

    fn wasted_area_for(&self, start: usize, r: &Rect) -> u64 {
        let mut area = 0u64;
        let mut width_left = r.w;
        let mut i = start;
        while width_left > 0 && i < self.skylines.len() {
            let seg = &self.skylines[i];
            let use_w = width_left.min(seg.w);
            area += (r.y.saturating_sub(seg.y) as u64) * use_w as u64;
            width_left -= use_w;
            i += 1;
        }
        area
    }

    fn find_skyline(&self, w: u32, h: u32) -> Option<(usize, Rect)> {
        let mut best: Option<(usize, Rect, (u64, u32))> = None;
        for i in 0..self.skylines.len() {
            let Some(r) = self.can_put(i, w, h) else {
                continue;
            };
            let score = match self.heuristic {
                SkylineHeuristic::BottomLeft => (r.bottom() as u64, self.skylines[i].w),
                SkylineHeuristic::MinWaste => (self.wasted_area_for(i, &r), r.bottom()),
            };
            if best.as_ref().is_none_or(|(_, _, s)| score < *s) {
                best = Some((i, r, score));
            }
        }
        best.map(|(i, r, _)| (i, r))
    }

    fn split(&mut self, index: usize, rect: &Rect) {
        self.skylines.insert(
            index,
            SkylineNode {
                x: rect.x,
                y: rect.bottom(),
                w: rect.w,
            },
        );
        let i = index + 1;
        while i < self.skylines.len() {
            let prev_right = self.skylines[i - 1].right();
            let cur = self.skylines[i];
            if cur.x >= prev_right {
                break;
            }
            let shrink = prev_right - cur.x;
            if cur.w <= shrink {
                self.skylines.remove(i);
            } else {
                self.skylines[i].x += shrink;
                self.skylines[i].w -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                self.skylines[i - 1].w += self.skylines[i].w;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl BinPacker for SkylinePacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        self.find_skyline(w + self.spacing, h + self.spacing).is_some()
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Rect> {
        if w == 0 || h == 0 {
            return None;
        }
        let (i, slot) = self.find_skyline(w + self.spacing, h + self.spacing)?;
        self.split(i, &slot);
        self.merge();
        Some(Rect::new(slot.x, slot.y, w, h))
    }
}
