use super::BinPacker;
use crate::config::MaxRectsHeuristic;
use crate::model::Rect;

/// MaxRects bin: keeps the list of maximal free rectangles and splits them on every placement.
pub struct MaxRectsPacker {
    region: Rect,
    spacing: u32,
    free: Vec<Rect>,
    used: Vec<Rect>,
    heuristic: MaxRectsHeuristic,
}

impl MaxRectsPacker {
    /// `spacing` is added to the right and bottom of every element to form its slot.
    pub fn new(region: Rect, spacing: u32, heuristic: MaxRectsHeuristic) -> Self {
        let free = if region.w > 0 && region.h > 0 {
            vec![region]
        } else {
            Vec::new()
        };
        Self {
            region,
            spacing,
            free,
            used: Vec::new(),
            heuristic,
        }
    }

    fn place_slot(&mut self, node: &Rect) {
        let mut next: Vec<Rect> = Vec::with_capacity(self.free.len() + 4);
        for fr in &self.free {
            if !fr.intersects(node) {
                next.push(*fr);
                continue;
            }
            let ix1 = fr.x.max(node.x);
            let iy1 = fr.y.max(node.y);
            let ix2 = fr.right().min(node.right());
            let iy2 = fr.bottom().min(node.bottom());

            if iy1 > fr.y {
                next.push(Rect::new(fr.x, fr.y, fr.w, iy1 - fr.y));
            }
            if iy2 < fr.bottom() {
                next.push(Rect::new(fr.x, iy2, fr.w, fr.bottom() - iy2));
            }
            if ix1 > fr.x {
                next.push(Rect::new(fr.x, fr.y, ix1 - fr.x, fr.h));
            }
            if ix2 < fr.right() {
                next.push(Rect::new(ix2, fr.y, fr.right() - ix2, fr.h));
            }
        }
        self.free = next;
        self.prune_free_list();
        self.used.push(*node);
    }

    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let a = self.free[i];
            let mut remove_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let b = self.free[j];
                if b.contains(&a) {
                    remove_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.remove(j);
                    continue;
                }
                j += 1;
            }
            if remove_i {
                self.free.remove(i);
            } else {
                i += 1;
            }
        }
    }

    fn score(&self, fr: &Rect, w: u32, h: u32) -> (i64, i64) {
        let leftover_h = fr.w as i64 - w as i64;
        let leftover_v = fr.h as i64 - h as i64;
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        let area_fit = fr.area() as i64 - (w as i64 * h as i64);
        match self.heuristic {
            MaxRectsHeuristic::BestAreaFit => (area_fit, short_fit),
            MaxRectsHeuristic::BestShortSideFit => (short_fit, long_fit),
            MaxRectsHeuristic::BestLongSideFit => (long_fit, short_fit),
            MaxRectsHeuristic::BottomLeft => (fr.y as i64 + h as i64, fr.x as i64),
            MaxRectsHeuristic::ContactPoint => {
                let contact = self.contact_point_score(&Rect::new(fr.x, fr.y, w, h));
                (-(contact as i64), area_fit)
            }
        }
    }

    fn find_position(&self, w: u32, h: u32) -> Option<Rect> {
        let mut best: Option<(Rect, (i64, i64), (u32, u32))> = None;
        for fr in &self.free {
            if fr.w < w || fr.h < h {
                continue;
            }
            if fr.w == w && fr.h == h {
                return Some(Rect::new(fr.x, fr.y, w, h));
            }
            let score = self.score(fr, w, h);
            // ties go to the higher, then the leftmost slot
            let tie = (fr.y + h, fr.x);
            let better = match &best {
                None => true,
                Some((_, s, t)) => score < *s || (score == *s && tie < *t),
            };
            if better {
                best = Some((Rect::new(fr.x, fr.y, w, h), score, tie));
            }
        }
        best.map(|(r, _, _)| r)
    }

    fn contact_point_score(&self, node: &Rect) -> u32 {
        let mut score = 0u32;
        if node.x == self.region.x || node.right() == self.region.right() {
            score += node.h;
        }
        if node.y == self.region.y || node.bottom() == self.region.bottom() {
            score += node.w;
        }
        for u in &self.used {
            if node.x == u.right() || u.x == node.right() {
                score += overlap_1d(node.y, node.bottom(), u.y, u.bottom());
            }
            if node.y == u.bottom() || u.y == node.bottom() {
                score += overlap_1d(node.x, node.right(), u.x, u.right());
            }
        }
        score
    }

    pub fn free_list_len(&self) -> usize {
        self.free.len()
    }
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    a2.min(b2).saturating_sub(a1.max(b1))
}

impl BinPacker for MaxRectsPacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        self.find_position(w + self.spacing, h + self.spacing).is_some()
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Rect> {
        if w == 0 || h == 0 {
            return None;
        }
        let slot = self.find_position(w + self.spacing, h + self.spacing)?;
        self.place_slot(&slot);
        Some(Rect::new(slot.x, slot.y, w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_fit_fills_region() {
        let mut p = MaxRectsPacker::new(Rect::new(1, 1, 10, 10), 1, MaxRectsHeuristic::BestAreaFit);
        let r = p.pack(9, 9);
        assert_eq!(r, Some(Rect::new(1, 1, 9, 9)));
        assert!(!p.can_pack(1, 1));
        assert_eq!(p.free_list_len(), 0);
    }

    #[test]
    fn slots_do_not_overlap() {
        let mut p = MaxRectsPacker::new(Rect::new(0, 0, 64, 64), 2, MaxRectsHeuristic::ContactPoint);
        let mut placed: Vec<Rect> = Vec::new();
        while let Some(r) = p.pack(10, 7) {
            let slot = Rect::new(r.x, r.y, r.w + 2, r.h + 2);
            assert!(placed.iter().all(|o| !o.intersects(&slot)));
            placed.push(slot);
        }
        assert!(!placed.is_empty());
    }
}
