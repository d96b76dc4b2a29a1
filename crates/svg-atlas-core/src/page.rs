use crate::compositing;
use crate::config::{FilterMode, RenderingQuality};
use crate::error::{AtlasError, RasterError, Result};
use crate::model::{Bin, PackedRect};
use crate::record::RectBuffer;
use image::RgbaImage;
use std::path::Path;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Paints packed elements onto a page surface.
pub trait Rasterizer<D>: Send + Sync {
    /// Draws every rectangle of one bin in a single call. `documents` is indexed by
    /// each rectangle's `source`.
    fn draw_batch(
        &self,
        documents: &[D],
        rects: &[PackedRect],
        surface: &mut RgbaImage,
        quality: RenderingQuality,
    ) -> std::result::Result<(), RasterError>;

    fn dilate_edges(&self, surface: &mut RgbaImage) {
        compositing::dilate_edges(surface);
    }
}

/// A rendered atlas page.
#[derive(Debug, Clone)]
pub struct Page {
    index: usize,
    pixels: RgbaImage,
    filter: FilterMode,
    rects: RectBuffer,
}

impl Page {
    pub fn index(&self) -> usize {
        self.index
    }
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
    pub fn filter(&self) -> FilterMode {
        self.filter
    }
    /// Records of the rectangles drawn on this page.
    pub fn rects(&self) -> &RectBuffer {
        &self.rects
    }
    pub fn rect_count(&self) -> usize {
        self.rects.len()
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.pixels
            .save_with_format(path.as_ref(), image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Turns bins into pages by rasterizing their rectangles.
pub struct AtlasPageBuilder<'a, D, R> {
    rasterizer: &'a R,
    documents: &'a [D],
    clear_color: [u8; 4],
    dilate_edges: bool,
    quality: RenderingQuality,
}

impl<'a, D, R> AtlasPageBuilder<'a, D, R>
where
    D: Send + Sync,
    R: Rasterizer<D>,
{
    pub fn new(rasterizer: &'a R, documents: &'a [D]) -> Self {
        Self {
            rasterizer,
            documents,
            clear_color: [0, 0, 0, 0],
            dilate_edges: true,
            quality: RenderingQuality::Better,
        }
    }

    pub fn clear_color(mut self, v: [u8; 4]) -> Self {
        self.clear_color = v;
        self
    }

    pub fn dilate_edges(mut self, v: bool) -> Self {
        self.dilate_edges = v;
        self
    }

    pub fn quality(mut self, v: RenderingQuality) -> Self {
        self.quality = v;
        self
    }

    /// Renders one bin.
    ///
    /// # Errors
    ///
    /// Record decoding errors propagate as-is; any rasterizer failure becomes
    /// [`AtlasError::RasterizationFailed`] for this bin.
    pub fn build(&self, bin: &Bin) -> Result<Page> {
        let rects = bin.rects.decode_all()?;
        let mut surface = RgbaImage::new(bin.width, bin.height);
        compositing::clear(&mut surface, self.clear_color);
        self.rasterizer
            .draw_batch(self.documents, &rects, &mut surface, self.quality)
            .map_err(|reason| AtlasError::RasterizationFailed {
                bin_index: bin.index,
                reason,
            })?;
        if self.dilate_edges {
            self.rasterizer.dilate_edges(&mut surface);
        }
        debug!(
            page = bin.index,
            width = bin.width,
            height = bin.height,
            rects = rects.len(),
            "page rendered"
        );
        Ok(Page {
            index: bin.index,
            pixels: surface,
            filter: FilterMode::for_dilation(self.dilate_edges),
            rects: bin.rects.clone(),
        })
    }

    /// Renders every bin, preserving order. On failure no page is returned; when
    /// building in parallel the reported bin is any one of the failing bins.
    pub fn build_all(&self, bins: &[Bin], parallel: bool) -> Result<Vec<Page>> {
        #[cfg(feature = "parallel")]
        {
            if parallel {
                return bins.par_iter().map(|b| self.build(b)).collect();
            }
        }
        #[cfg(not(feature = "parallel"))]
        let _ = parallel;
        bins.iter().map(|b| self.build(b)).collect()
    }
}
