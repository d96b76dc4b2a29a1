use crate::atlas::Atlas;
use crate::config::{FilterMode, GeneratorConfig};
use crate::region::{AtlasRegion, TextureAllocation};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt::Write as _;

/// Atlas-level metadata shared by every exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasMeta {
    /// Schema version of the JSON formats; bumped on breaking changes.
    pub schema_version: String,
    pub app: String,
    pub version: String,
    pub format: String,
    pub scale: f32,
    pub power_of_two: bool,
    pub max_dimension: u32,
    pub border: u32,
    pub filter: FilterMode,
    pub clear_color: [u8; 4],
}

impl AtlasMeta {
    pub fn from_config(cfg: &GeneratorConfig) -> Self {
        Self {
            schema_version: "1".into(),
            app: "svg-atlas".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            format: "RGBA8888".into(),
            scale: cfg.scale,
            power_of_two: cfg.pow2,
            max_dimension: cfg.max_dimension,
            border: cfg.border,
            filter: cfg.filter(),
            clear_color: cfg.clear_color,
        }
    }
}

fn page_name(page_names: &[String], index: usize) -> String {
    page_names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("page{index}.png"))
}

fn sprite_value(r: &AtlasRegion) -> Value {
    let uv = r.uv(TextureAllocation::Exact);
    json!({
        "frame": {"x": r.x(), "y": r.y(), "w": r.width(), "h": r.height()},
        "flippedFrame": {"x": r.x(), "y": r.flipped_y(), "w": r.width(), "h": r.height()},
        "original": {"x": r.rect.original_x, "y": r.rect.original_y},
        "uv": {"u0": uv.u0, "v0": uv.v0, "u1": uv.u1, "v1": uv.v1},
        "zOrder": r.rect.z_order,
        "elementIndex": r.rect.element_index,
        "page": r.page,
    })
}

/// `{ pages: [{ image, size, sprites: [...] }], meta }`; sprites keep packer order.
pub fn to_json_array(atlas: &Atlas, meta: &AtlasMeta, page_names: &[String]) -> Value {
    let pages: Vec<Value> = atlas
        .pages()
        .iter()
        .map(|p| {
            let sprites: Vec<Value> = atlas
                .page_regions(p.index())
                .map(|r| {
                    let mut v = sprite_value(r);
                    v["key"] = Value::String(r.key.clone());
                    v
                })
                .collect();
            json!({
                "image": page_name(page_names, p.index()),
                "size": {"w": p.width(), "h": p.height()},
                "sprites": sprites,
            })
        })
        .collect();
    json!({ "pages": pages, "meta": meta })
}

/// `{ frames: { key: {...} }, meta }` with the page image listed in `meta.images`.
pub fn to_json_hash(atlas: &Atlas, meta: &AtlasMeta, page_names: &[String]) -> Value {
    let mut frames = serde_json::Map::new();
    for r in atlas.regions() {
        let mut v = sprite_value(r);
        v["pageSize"] = json!({"w": r.page_width, "h": r.page_height});
        frames.insert(r.key.clone(), v);
    }
    let mut meta_val = json!(meta);
    meta_val["images"] = json!(
        atlas
            .pages()
            .iter()
            .map(|p| page_name(page_names, p.index()))
            .collect::<Vec<_>>()
    );
    json!({ "frames": frames, "meta": meta_val })
}

/// libGDX/Spine text atlas. Coordinates are top-left, as the format expects.
pub fn to_libgdx(atlas: &Atlas, meta: &AtlasMeta, page_names: &[String]) -> String {
    let filter = match meta.filter {
        FilterMode::Linear => "Linear",
        FilterMode::Nearest => "Nearest",
    };
    let mut s = String::new();
    for p in atlas.pages() {
        let _ = writeln!(s);
        let _ = writeln!(s, "{}", page_name(page_names, p.index()));
        let _ = writeln!(s, "size: {},{}", p.width(), p.height());
        let _ = writeln!(s, "format: {}", meta.format);
        let _ = writeln!(s, "filter: {filter},{filter}");
        let _ = writeln!(s, "repeat: none");
        for r in atlas.page_regions(p.index()) {
            let _ = writeln!(s, "{}", r.key);
            let _ = writeln!(s, "  rotate: false");
            let _ = writeln!(s, "  xy: {}, {}", r.x(), r.y());
            let _ = writeln!(s, "  size: {}, {}", r.width(), r.height());
            let _ = writeln!(s, "  orig: {}, {}", r.width(), r.height());
            let _ = writeln!(s, "  offset: 0, 0");
            let _ = writeln!(s, "  index: -1");
        }
    }
    s
}
