use crate::record::RecordLayout;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Placement algorithm used by the packing session.
/// Key notes:
///   - the session protocol does not depend on the choice; any `Placer` can be plugged in
///   - `MaxRects` gives the tightest pages, `Skyline` is faster on large inputs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlacerKind {
    MaxRects,
    Skyline,
}

impl FromStr for PlacerKind {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "maxrects" => Ok(Self::MaxRects),
            "skyline" => Ok(Self::Skyline),
            _ => Err(()),
        }
    }
}

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MaxRectsHeuristic {
    BestAreaFit,
    BestShortSideFit,
    BestLongSideFit,
    BottomLeft,
    ContactPoint,
}

impl FromStr for MaxRectsHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            _ => Err(()),
        }
    }
}

/// Skyline placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkylineHeuristic {
    BottomLeft,
    MinWaste,
}

impl FromStr for SkylineHeuristic {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "minwaste" | "mw" => Ok(Self::MinWaste),
            _ => Err(()),
        }
    }
}

/// Rasterization quality requested from the rasterizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RenderingQuality {
    NonAntialiased,
    Faster,
    Better,
}

impl FromStr for RenderingQuality {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "non_antialiased" | "nonantialiased" | "none" => Ok(Self::NonAntialiased),
            "faster" => Ok(Self::Faster),
            "better" => Ok(Self::Better),
            _ => Err(()),
        }
    }
}

/// Minification/magnification filter hint for the texture backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Nearest,
    Linear,
}

impl FilterMode {
    /// Dilated pages are sampled linearly to hide the dilation seam.
    pub fn for_dilation(dilate_edges: bool) -> Self {
        if dilate_edges {
            FilterMode::Linear
        } else {
            FilterMode::Nearest
        }
    }
}

/// Missing fields take their `Default` values when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Scale applied to every collected document/element.
    pub scale: f32,
    /// Maximum page width and height in pixels.
    pub max_dimension: u32,
    /// Pixels between packed elements and around the page edges.
    pub border: u32,
    /// Force power-of-two page dimensions.
    pub pow2: bool,
    /// RGBA color pages are cleared to before rasterization.
    pub clear_color: [u8; 4],
    /// Run a 1-pixel dilate post-filter on every page.
    pub dilate_edges: bool,

    #[serde(default = "default_quality")]
    pub quality: RenderingQuality,
    #[serde(default)]
    pub record_layout: RecordLayout,
    #[serde(default = "default_placer")]
    pub placer: PlacerKind,
    #[serde(default = "default_mr_heuristic")]
    pub mr_heuristic: MaxRectsHeuristic,
    #[serde(default = "default_skyline_heuristic")]
    pub skyline_heuristic: SkylineHeuristic,
    /// Build pages in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            max_dimension: 1024,
            border: 1,
            pow2: false,
            clear_color: [0, 0, 0, 0],
            dilate_edges: true,
            quality: default_quality(),
            record_layout: RecordLayout::default(),
            placer: default_placer(),
            mr_heuristic: default_mr_heuristic(),
            skyline_heuristic: default_skyline_heuristic(),
            parallel: false,
        }
    }
}

impl GeneratorConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if:
    /// - `scale` is not a positive finite number
    /// - `max_dimension` is zero, or above [`MAX_PAGE_DIMENSION`] once pow2 rounding is applied
    ///
    /// An oversized `border` is not an error: `normalized` clamps it.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AtlasError;

        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(AtlasError::InvalidConfig(format!(
                "scale must be > 0 (got {})",
                self.scale
            )));
        }
        if self.max_dimension == 0 {
            return Err(AtlasError::InvalidConfig(
                "max_dimension must be > 0".into(),
            ));
        }
        let effective = normalize_max_dimension(self.max_dimension, self.pow2);
        if effective > MAX_PAGE_DIMENSION {
            return Err(AtlasError::InvalidConfig(format!(
                "max_dimension {effective} exceeds {MAX_PAGE_DIMENSION}"
            )));
        }
        Ok(())
    }

    /// Returns a copy with the power-of-two policy applied to `max_dimension`
    /// and `border` clamped so a packable interior of at least one pixel remains.
    pub fn normalized(&self) -> Self {
        let mut cfg = self.clone();
        cfg.max_dimension = normalize_max_dimension(cfg.max_dimension, cfg.pow2);
        cfg.border = clamp_border(cfg.border, cfg.max_dimension);
        cfg
    }

    pub fn filter(&self) -> FilterMode {
        FilterMode::for_dilation(self.dilate_edges)
    }
}

/// Largest page side a record can describe; record coordinates and sizes are `i32`.
pub const MAX_PAGE_DIMENSION: u32 = i32::MAX as u32;

/// Zero becomes 1; with `pow2` the value is rounded up to the next power of two.
pub fn normalize_max_dimension(max_dimension: u32, pow2: bool) -> u32 {
    if max_dimension == 0 {
        1
    } else if pow2 {
        next_pow2(max_dimension)
    } else {
        max_dimension
    }
}

/// Largest border that still leaves a 1-pixel interior: `2 * border + 1 <= max_dimension`.
pub fn max_border(max_dimension: u32) -> u32 {
    if max_dimension & 1 != 0 {
        max_dimension / 2
    } else {
        max_dimension.saturating_sub(1) / 2
    }
}

pub fn clamp_border(border: u32, max_dimension: u32) -> u32 {
    border.min(max_border(max_dimension))
}

pub fn is_pow2(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

pub fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v.saturating_add(1)
}

fn default_quality() -> RenderingQuality {
    RenderingQuality::Better
}
fn default_placer() -> PlacerKind {
    PlacerKind::MaxRects
}
fn default_mr_heuristic() -> MaxRectsHeuristic {
    MaxRectsHeuristic::BestAreaFit
}
fn default_skyline_heuristic() -> SkylineHeuristic {
    SkylineHeuristic::BottomLeft
}

/// Builder for `GeneratorConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct GeneratorConfigBuilder {
    cfg: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: GeneratorConfig::default(),
        }
    }
    pub fn scale(mut self, v: f32) -> Self {
        self.cfg.scale = v;
        self
    }
    pub fn max_dimension(mut self, v: u32) -> Self {
        self.cfg.max_dimension = v;
        self
    }
    pub fn border(mut self, v: u32) -> Self {
        self.cfg.border = v;
        self
    }
    pub fn pow2(mut self, v: bool) -> Self {
        self.cfg.pow2 = v;
        self
    }
    pub fn clear_color(mut self, v: [u8; 4]) -> Self {
        self.cfg.clear_color = v;
        self
    }
    pub fn dilate_edges(mut self, v: bool) -> Self {
        self.cfg.dilate_edges = v;
        self
    }
    pub fn quality(mut self, v: RenderingQuality) -> Self {
        self.cfg.quality = v;
        self
    }
    pub fn record_layout(mut self, v: RecordLayout) -> Self {
        self.cfg.record_layout = v;
        self
    }
    pub fn placer(mut self, v: PlacerKind) -> Self {
        self.cfg.placer = v;
        self
    }
    pub fn mr_heuristic(mut self, v: MaxRectsHeuristic) -> Self {
        self.cfg.mr_heuristic = v;
        self
    }
    pub fn skyline_heuristic(mut self, v: SkylineHeuristic) -> Self {
        self.cfg.skyline_heuristic = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> GeneratorConfig {
        self.cfg
    }
}

impl GeneratorConfig {
    /// Create a fluent builder for `GeneratorConfig`.
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }
}
