//! Core library for packing vector documents into texture atlases.
//!
//! - Session: `PackingSession` collects element boxes (whole documents or exploded
//!   top-level groups) and partitions them into bins through a pluggable `Placer`
//! - Records: every bin travels as a fixed-stride binary buffer (`record`)
//! - Pages: `AtlasPageBuilder` rasterizes one bin per batch call, then optionally dilates edges
//! - Regions: decoded, Y-flipped and keyed records, indexed by sprite key
//! - `AtlasGenerator` drives the whole flow and is all-or-nothing
//!
//! Quick example:
//! ```ignore
//! use svg_atlas_core::prelude::*;
//! # fn main() -> svg_atlas_core::Result<()> {
//! let cfg = GeneratorConfig::builder().max_dimension(512).border(1).build();
//! let mut generator = AtlasGenerator::new(cfg, SceneLoader::new(), SceneRasterizer)?;
//! generator.add_input("art/orc.yaml", true, 1.0)?;
//! let atlas = generator.generate()?;
//! println!("pages: {}", atlas.pages().len());
//! # Ok(()) }
//! ```

pub mod atlas;
pub mod compositing;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod export_plist;
pub mod generator;
pub mod model;
pub mod packer;
pub mod page;
pub mod record;
pub mod region;
pub mod scene;
pub mod session;

pub use atlas::*;
pub use config::*;
pub use document::*;
pub use error::*;
pub use export::*;
pub use export_plist::*;
pub use generator::*;
pub use model::*;
pub use packer::{BinLimits, BinPacker, BuiltinPlacer, Placement, PlacementItem, Placer};
pub use page::*;
pub use record::{NameTable, RecordLayout, RectBuffer};
pub use region::*;
pub use scene::*;
pub use session::*;

/// Convenience prelude for common types and functions.
/// Importing `svg_atlas_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::{Atlas, AtlasStats};
    pub use crate::config::{
        FilterMode, GeneratorConfig, GeneratorConfigBuilder, MaxRectsHeuristic, PlacerKind,
        RenderingQuality, SkylineHeuristic,
    };
    pub use crate::document::{Document, DocumentLoader, ElementBounds, Viewport};
    pub use crate::error::{AtlasError, PackingError, Result};
    pub use crate::export::{AtlasMeta, to_json_array, to_json_hash, to_libgdx};
    pub use crate::export_plist::to_plist;
    pub use crate::generator::AtlasGenerator;
    pub use crate::model::{PackedRect, Rect, SourceId, SourceRef};
    pub use crate::page::{Page, Rasterizer};
    pub use crate::region::{AtlasRegion, RegionIndex, TextureAllocation, UvRect};
    pub use crate::scene::{MemoryLoader, SceneDocument, SceneLoader, SceneRasterizer};
    pub use crate::session::PackingSession;
}
