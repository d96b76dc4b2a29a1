use crate::page::Page;
use crate::region::{AtlasRegion, RegionIndex};
use serde::{Deserialize, Serialize};

/// Generated pages plus the regions drawn on them.
#[derive(Debug, Clone)]
pub struct Atlas {
    pages: Vec<Page>,
    regions: Vec<AtlasRegion>,
    index: RegionIndex,
}

impl Atlas {
    pub fn new(pages: Vec<Page>, regions: Vec<AtlasRegion>) -> Self {
        let index = RegionIndex::new(&regions);
        Self {
            pages,
            regions,
            index,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All regions, grouped by page and in packer order within a page.
    pub fn regions(&self) -> &[AtlasRegion] {
        &self.regions
    }

    pub fn page_regions(&self, page: usize) -> impl Iterator<Item = &AtlasRegion> {
        self.regions.iter().filter(move |r| r.page == page)
    }

    pub fn region(&self, key: &str) -> Option<&AtlasRegion> {
        self.index.get(key)
    }

    pub fn index(&self) -> &RegionIndex {
        &self.index
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> AtlasStats {
        let total_page_area: u64 = self
            .pages
            .iter()
            .map(|p| p.width() as u64 * p.height() as u64)
            .sum();
        let used_area: u64 = self
            .regions
            .iter()
            .map(|r| r.rect.width.max(0) as u64 * r.rect.height.max(0) as u64)
            .sum();
        let occupancy = if total_page_area > 0 {
            used_area as f64 / total_page_area as f64
        } else {
            0.0
        };
        AtlasStats {
            num_pages: self.pages.len(),
            num_regions: self.regions.len(),
            total_page_area,
            used_area,
            occupancy,
            max_page_width: self.pages.iter().map(Page::width).max().unwrap_or(0),
            max_page_height: self.pages.iter().map(Page::height).max().unwrap_or(0),
        }
    }
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtlasStats {
    pub num_pages: usize,
    pub num_regions: usize,
    /// Sum of width * height over all pages.
    pub total_page_area: u64,
    /// Sum of width * height over all regions.
    pub used_area: u64,
    /// `used_area / total_page_area` (0.0 to 1.0).
    pub occupancy: f64,
    pub max_page_width: u32,
    pub max_page_height: u32,
}

impl AtlasStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Regions: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px²",
            self.num_pages,
            self.num_regions,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_area,
        )
    }

    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_area)
    }
}
