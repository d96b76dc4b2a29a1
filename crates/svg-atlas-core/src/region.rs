//! Decoded page regions and lookups over them.
//!
//! Record coordinates use a top-left origin. Texture consumers usually expect
//! bottom-left, so every region also carries `flipped_y` and UVs computed from it.

use crate::config::next_pow2;
use crate::error::Result;
use crate::model::{PackedRect, SourceId};
use crate::record::RectBuffer;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;

/// How a page will be allocated as a texture, which decides the UV denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextureAllocation {
    #[default]
    Exact,
    PowerOfTwo,
}

/// Normalized texture coordinates, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub u0: f32,
    pub v0: f32,
    pub u1: f32,
    pub v1: f32,
}

/// A packed rectangle bound to the page it lives on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtlasRegion {
    /// Unique sprite name within the atlas; empty until assigned by a [`SpriteNamer`].
    pub key: String,
    pub rect: PackedRect,
    pub page: usize,
    pub page_width: u32,
    pub page_height: u32,
}

impl AtlasRegion {
    pub fn x(&self) -> i32 {
        self.rect.x
    }
    pub fn y(&self) -> i32 {
        self.rect.y
    }
    pub fn width(&self) -> i32 {
        self.rect.width
    }
    pub fn height(&self) -> i32 {
        self.rect.height
    }

    /// Y of the bottom edge measured from the bottom of the page.
    pub fn flipped_y(&self) -> i32 {
        self.page_height as i32 - self.rect.y - self.rect.height
    }

    pub fn uv(&self, alloc: TextureAllocation) -> UvRect {
        let (tw, th) = match alloc {
            TextureAllocation::Exact => (self.page_width, self.page_height),
            TextureAllocation::PowerOfTwo => (next_pow2(self.page_width), next_pow2(self.page_height)),
        };
        let tw = tw.max(1) as f32;
        let th = th.max(1) as f32;
        let fy = self.flipped_y() as f32;
        UvRect {
            u0: self.rect.x as f32 / tw,
            v0: fy / th,
            u1: (self.rect.x + self.rect.width) as f32 / tw,
            v1: (fy + self.rect.height as f32) / th,
        }
    }
}

/// Decodes one page's records into regions, in packer order.
pub fn build_regions(
    page_index: usize,
    page_width: u32,
    page_height: u32,
    buffer: &RectBuffer,
) -> Result<Vec<AtlasRegion>> {
    Ok(buffer
        .decode_all()?
        .into_iter()
        .map(|rect| AtlasRegion {
            key: String::new(),
            rect,
            page: page_index,
            page_width,
            page_height,
        })
        .collect())
}

/// Indexes `regions` by `key_fn`; on collisions the later region wins.
pub fn index_by<'a, K, F>(regions: impl IntoIterator<Item = &'a AtlasRegion>, key_fn: F) -> HashMap<K, AtlasRegion>
where
    K: Eq + Hash,
    F: Fn(&AtlasRegion) -> K,
{
    let mut map = HashMap::new();
    for r in regions {
        map.insert(key_fn(r), r.clone());
    }
    map
}

/// Lookup of regions by their sprite key.
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    map: HashMap<String, AtlasRegion>,
}

impl RegionIndex {
    pub fn new<'a>(regions: impl IntoIterator<Item = &'a AtlasRegion>) -> Self {
        Self {
            map: index_by(regions, |r| r.key.clone()),
        }
    }
    pub fn get(&self, key: &str) -> Option<&AtlasRegion> {
        self.map.get(key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
    pub fn iter(&self) -> hash_map::Iter<'_, String, AtlasRegion> {
        self.map.iter()
    }
}

/// Assigns unique sprite keys.
///
/// - whole document: `<base>`
/// - exploded element: `<base>#<id>`, or `<base>#unnamed` without an id
/// - repeats get an `(n)` suffix: `orc#head`, `orc#head(1)`, `orc#head(2)`
#[derive(Debug, Default)]
pub struct SpriteNamer {
    seen: HashMap<String, u32>,
}

pub const UNNAMED: &str = "unnamed";

impl SpriteNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&mut self, source: &SourceId, rect: &PackedRect) -> String {
        let base = source.base_name();
        let stem = if rect.element_index == 0 {
            base
        } else if rect.name.is_empty() {
            format!("{base}#{UNNAMED}")
        } else {
            format!("{base}#{}", rect.name)
        };
        self.unique(stem)
    }

    fn unique(&mut self, stem: String) -> String {
        let mut n = match self.seen.get(&stem) {
            None => {
                self.seen.insert(stem.clone(), 0);
                return stem;
            }
            Some(&n) => n,
        };
        loop {
            n += 1;
            let candidate = format!("{stem}({n})");
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(stem, n);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceRef;

    fn rect(name: &str, element_index: u32) -> PackedRect {
        PackedRect {
            name: name.into(),
            original_x: 0,
            original_y: 0,
            x: 0,
            y: 0,
            width: 1,
            height: 1,
            source: SourceRef(0),
            element_index,
            z_order: 0,
            dst_viewport_width: 1.0,
            dst_viewport_height: 1.0,
        }
    }

    #[test]
    fn namer_suffixes_repeats() {
        let src = SourceId::from("art/orc.json");
        let mut namer = SpriteNamer::new();
        assert_eq!(namer.name(&src, &rect("", 0)), "orc");
        assert_eq!(namer.name(&src, &rect("head", 1)), "orc#head");
        assert_eq!(namer.name(&src, &rect("head", 2)), "orc#head(1)");
        assert_eq!(namer.name(&src, &rect("head", 3)), "orc#head(2)");
        assert_eq!(namer.name(&src, &rect("", 4)), "orc#unnamed");
    }

    #[test]
    fn namer_skips_taken_suffix() {
        let src = SourceId::from("a.json");
        let mut namer = SpriteNamer::new();
        assert_eq!(namer.name(&src, &rect("x(1)", 1)), "a#x(1)");
        assert_eq!(namer.name(&src, &rect("x", 2)), "a#x");
        assert_eq!(namer.name(&src, &rect("x", 3)), "a#x(2)");
    }
}
