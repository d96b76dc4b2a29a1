use crate::atlas::Atlas;
use crate::config::GeneratorConfig;
use crate::document::DocumentLoader;
use crate::error::{AtlasError, Result};
use crate::model::{CollectStats, SourceId, SourceRef};
use crate::packer::{BuiltinPlacer, Placer};
use crate::page::{AtlasPageBuilder, Rasterizer};
use crate::region::{SpriteNamer, build_regions};
use crate::session::PackingSession;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// One registered input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    pub source: SourceId,
    /// Pack each top-level group as its own element.
    pub explode_groups: bool,
    /// Multiplied with the generator scale.
    pub scale: f32,
}

/// Drives loading, packing, rasterization and region indexing for a set of inputs.
///
/// `generate` is all-or-nothing: either every collected element is placed and
/// rendered, or an error is returned and nothing is kept.
pub struct AtlasGenerator<L: DocumentLoader, R> {
    requested: GeneratorConfig,
    config: GeneratorConfig,
    loader: L,
    rasterizer: R,
    session: PackingSession,
    inputs: Vec<InputSpec>,
    // loaded documents, index-aligned with `inputs`
    documents: Vec<L::Document>,
}

impl<L, R> AtlasGenerator<L, R>
where
    L: DocumentLoader,
    R: Rasterizer<L::Document>,
{
    pub fn new(config: GeneratorConfig, loader: L, rasterizer: R) -> Result<Self> {
        let placer = Box::new(BuiltinPlacer::from_config(&config));
        Self::with_placer(config, loader, rasterizer, placer)
    }

    /// Same as [`AtlasGenerator::new`] with a caller-supplied placement strategy.
    pub fn with_placer(
        config: GeneratorConfig,
        loader: L,
        rasterizer: R,
        placer: Box<dyn Placer>,
    ) -> Result<Self> {
        config.validate()?;
        let effective = config.normalized();
        let session = PackingSession::new(placer, effective.record_layout);
        Ok(Self {
            requested: config,
            config: effective,
            loader,
            rasterizer,
            session,
            inputs: Vec::new(),
            documents: Vec::new(),
        })
    }

    /// Registers an input. Returns `false` if `source` is already registered.
    pub fn add_input(
        &mut self,
        source: impl Into<SourceId>,
        explode_groups: bool,
        scale: f32,
    ) -> Result<bool> {
        let source = source.into();
        if !(scale.is_finite() && scale > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "input scale must be > 0 (got {scale}) for '{source}'"
            )));
        }
        if self.inputs.iter().any(|i| i.source == source) {
            debug!(%source, "input already registered");
            return Ok(false);
        }
        self.inputs.push(InputSpec {
            source,
            explode_groups,
            scale,
        });
        Ok(true)
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    /// Effective (normalized) configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn scale(&self) -> f32 {
        self.config.scale
    }
    pub fn max_dimension(&self) -> u32 {
        self.config.max_dimension
    }
    pub fn border(&self) -> u32 {
        self.config.border
    }
    pub fn pow2(&self) -> bool {
        self.config.pow2
    }
    pub fn clear_color(&self) -> [u8; 4] {
        self.config.clear_color
    }
    pub fn dilate_edges(&self) -> bool {
        self.config.dilate_edges
    }

    pub fn set_scale(&mut self, v: f32) -> Result<()> {
        self.update(|c| c.scale = v)
    }
    pub fn set_max_dimension(&mut self, v: u32) -> Result<()> {
        self.update(|c| c.max_dimension = v)
    }
    pub fn set_border(&mut self, v: u32) -> Result<()> {
        self.update(|c| c.border = v)
    }
    pub fn set_pow2(&mut self, v: bool) -> Result<()> {
        self.update(|c| c.pow2 = v)
    }
    pub fn set_clear_color(&mut self, v: [u8; 4]) {
        self.requested.clear_color = v;
        self.config.clear_color = v;
    }
    pub fn set_dilate_edges(&mut self, v: bool) {
        self.requested.dilate_edges = v;
        self.config.dilate_edges = v;
    }

    // Normalization always starts from the requested values, so shrinking and
    // growing the page again restores the requested border.
    fn update(&mut self, f: impl FnOnce(&mut GeneratorConfig)) -> Result<()> {
        let mut next = self.requested.clone();
        f(&mut next);
        next.validate()?;
        self.config = next.normalized();
        self.requested = next;
        Ok(())
    }

    fn load_documents(&mut self) -> Result<()> {
        for input in &self.inputs[self.documents.len()..] {
            let doc = self
                .loader
                .load(&input.source)
                .map_err(|reason| AtlasError::SourceLoadFailed {
                    source_id: input.source.to_string(),
                    reason,
                })?;
            debug!(source = %input.source, "document loaded");
            self.documents.push(doc);
        }
        Ok(())
    }

    /// Collects every input without placing anything and reports per-input counts.
    pub fn collect_stats(&mut self) -> Result<Vec<(SourceId, CollectStats)>> {
        self.load_documents()?;
        let cfg = &self.config;
        self.session
            .begin(cfg.max_dimension, cfg.border, cfg.pow2, cfg.scale)?;
        let mut out = Vec::with_capacity(self.inputs.len());
        for (i, input) in self.inputs.iter().enumerate() {
            match self.session.add(
                &self.documents[i],
                SourceRef(i as u32),
                input.explode_groups,
                input.scale,
            ) {
                Ok(stats) => out.push((input.source.clone(), stats)),
                Err(e) => {
                    self.session.end(false)?;
                    return Err(e.into());
                }
            }
        }
        self.session.end(false)?;
        Ok(out)
    }

    /// Packs, rasterizes and indexes every registered input.
    ///
    /// # Errors
    ///
    /// - [`AtlasError::SourceLoadFailed`] before any packing starts
    /// - [`AtlasError::CapacityExceeded`] for the first input with elements larger than a page
    /// - [`AtlasError::RasterizationFailed`] if a page cannot be drawn
    #[instrument(skip_all, fields(inputs = self.inputs.len()))]
    pub fn generate(&mut self) -> Result<Atlas> {
        self.load_documents()?;
        let cfg = &self.config;
        self.session
            .begin(cfg.max_dimension, cfg.border, cfg.pow2, cfg.scale)?;

        for (i, input) in self.inputs.iter().enumerate() {
            let stats = match self.session.add(
                &self.documents[i],
                SourceRef(i as u32),
                input.explode_groups,
                input.scale,
            ) {
                Ok(stats) => stats,
                Err(e) => {
                    self.session.end(false)?;
                    return Err(e.into());
                }
            };
            if !stats.is_complete() {
                warn!(
                    source = %input.source,
                    collected = stats.collected,
                    packed = stats.packed,
                    "elements do not fit a page"
                );
                self.session.end(false)?;
                return Err(AtlasError::CapacityExceeded {
                    source_id: input.source.to_string(),
                    collected: stats.collected,
                    packed: stats.packed,
                    max_dimension: cfg.max_dimension,
                    scale: cfg.scale * input.scale,
                });
            }
        }
        let bins = self.session.end(true)?;

        let pages = AtlasPageBuilder::new(&self.rasterizer, &self.documents)
            .clear_color(cfg.clear_color)
            .dilate_edges(cfg.dilate_edges)
            .quality(cfg.quality)
            .build_all(&bins, cfg.parallel)?;

        let mut regions = Vec::new();
        for page in &pages {
            regions.extend(build_regions(page.index(), page.width(), page.height(), page.rects())?);
        }
        // keys follow input and element order, not placement order
        let mut order: Vec<usize> = (0..regions.len()).collect();
        order.sort_by_key(|&i| (regions[i].rect.source, regions[i].rect.element_index));
        let mut namer = SpriteNamer::new();
        for i in order {
            let src = regions[i].rect.source;
            let source = self
                .inputs
                .get(src.index())
                .map(|input| input.source.clone())
                .unwrap_or_else(|| SourceId::new(format!("source{}", src.0)));
            regions[i].key = namer.name(&source, &regions[i].rect);
        }

        let atlas = Atlas::new(pages, regions);
        info!(
            pages = atlas.pages().len(),
            regions = atlas.regions().len(),
            "atlas generated"
        );
        Ok(atlas)
    }
}
