use thiserror::Error;

/// Misuse of the packing session protocol or invalid packer arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackingError {
    #[error("A packing session is already open")]
    AlreadyOpen,
    #[error("No packing session is open")]
    NotOpen,
    #[error("Invalid packing argument: {0}")]
    InvalidArgument(String),
}

/// Failure reported by a document loader.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unknown source: {0}")]
    NotFound(String),
}

/// Failure reported by a rasterizer while painting a batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("Unknown document handle {0}")]
    UnknownSource(u32),
    #[error("Surface {width}x{height} cannot hold rect at ({x},{y}) {w}x{h}")]
    OutOfSurface {
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        w: i32,
        h: i32,
    },
    #[error("Drawing failed: {0}")]
    Draw(String),
}

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Packing error: {0}")]
    Packing(#[from] PackingError),
    #[error(
        "Cannot pack all elements of '{source_id}': {packed} of {collected} fit a {max_dimension}px page at scale {scale}; increase the maximum dimension or reduce the scale"
    )]
    CapacityExceeded {
        source_id: String,
        collected: u32,
        packed: u32,
        max_dimension: u32,
        scale: f32,
    },
    #[error("Malformed rect record at offset {offset}: needed {needed} bytes, {available} available")]
    MalformedRecord {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("Rect record at offset {offset} references unknown name {index}")]
    UnknownName { offset: usize, index: u64 },
    #[error("Rasterization of bin {bin_index} failed: {reason}")]
    RasterizationFailed {
        bin_index: usize,
        #[source]
        reason: RasterError,
    },
    #[error("Failed to load source '{source_id}': {reason}")]
    SourceLoadFailed {
        source_id: String,
        #[source]
        reason: LoadError,
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl AtlasError {
    /// True for failures a caller can recover from by changing inputs or settings.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AtlasError::CapacityExceeded { .. } | AtlasError::SourceLoadFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;
