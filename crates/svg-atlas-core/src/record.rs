//! Fixed-stride binary records for packed rectangles.
//!
//! A page's rectangles travel as one contiguous little-endian buffer instead of
//! one object per rectangle. Layout of a single record:
//!
//! ```text
//! [0..R]        name reference   u32 (Compact) or u64 (Wide), index into a NameTable
//! [R..R+4]      original_x       i32
//! [R+4..R+8]    original_y       i32
//! [R+8..R+12]   x                i32
//! [R+12..R+16]  y                i32
//! [R+16..R+20]  width            i32
//! [R+20..R+24]  height           i32
//! [R+24..R+28]  source ref       u32
//! [R+28..R+32]  element_index    u32
//! [R+32..R+36]  z_order          i32
//! [R+36..R+40]  dst viewport w   f32
//! [R+40..R+44]  dst viewport h   f32
//! [R+44..]      padding          0 bytes (Compact, stride 48) or 4 bytes (Wide, stride 56)
//! ```
//!
//! Name reference 0 always means "no name".

use crate::error::{AtlasError, Result};
use crate::model::{PackedRect, SourceRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const FIELDS_SIZE: usize = 44;

/// Width of the name reference embedded in each record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordLayout {
    /// 4-byte name reference, 48-byte stride.
    Compact,
    /// 8-byte name reference, 56-byte stride (8-byte aligned).
    Wide,
}

impl RecordLayout {
    /// Layout matching the pointer width of the current target.
    pub fn native() -> Self {
        if cfg!(target_pointer_width = "64") {
            RecordLayout::Wide
        } else {
            RecordLayout::Compact
        }
    }

    pub fn name_ref_size(self) -> usize {
        match self {
            RecordLayout::Compact => 4,
            RecordLayout::Wide => 8,
        }
    }

    pub fn padding(self) -> usize {
        match self {
            RecordLayout::Compact => 0,
            RecordLayout::Wide => 4,
        }
    }

    /// Stride of one record in bytes. Query this before slicing a buffer.
    pub fn record_size(self) -> usize {
        self.name_ref_size() + FIELDS_SIZE + self.padding()
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::native()
    }
}

/// Interned element names referenced by records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTable {
    names: Vec<String>,
    lookup: HashMap<String, u32>,
}

impl Default for NameTable {
    fn default() -> Self {
        Self::new()
    }
}

impl NameTable {
    pub fn new() -> Self {
        Self {
            names: vec![String::new()],
            lookup: HashMap::new(),
        }
    }

    /// Returns the reference for `name`, adding it if needed. The empty name is always 0.
    pub fn intern(&mut self, name: &str) -> u32 {
        if name.is_empty() {
            return 0;
        }
        if let Some(&idx) = self.lookup.get(name) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.lookup.insert(name.to_string(), idx);
        idx
    }

    pub fn get(&self, index: u64) -> Option<&str> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Number of entries, including the reserved empty name.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.len() <= 1
    }
}

/// Appends the record for `rect` to `out`.
pub fn encode(rect: &PackedRect, layout: RecordLayout, names: &mut NameTable, out: &mut Vec<u8>) {
    out.reserve(layout.record_size());
    let name_ref = names.intern(&rect.name);
    match layout {
        RecordLayout::Compact => out.extend_from_slice(&name_ref.to_le_bytes()),
        RecordLayout::Wide => out.extend_from_slice(&(name_ref as u64).to_le_bytes()),
    }
    out.extend_from_slice(&rect.original_x.to_le_bytes());
    out.extend_from_slice(&rect.original_y.to_le_bytes());
    out.extend_from_slice(&rect.x.to_le_bytes());
    out.extend_from_slice(&rect.y.to_le_bytes());
    out.extend_from_slice(&rect.width.to_le_bytes());
    out.extend_from_slice(&rect.height.to_le_bytes());
    out.extend_from_slice(&rect.source.0.to_le_bytes());
    out.extend_from_slice(&rect.element_index.to_le_bytes());
    out.extend_from_slice(&rect.z_order.to_le_bytes());
    out.extend_from_slice(&rect.dst_viewport_width.to_le_bytes());
    out.extend_from_slice(&rect.dst_viewport_height.to_le_bytes());
    out.resize(out.len() + layout.padding(), 0);
}

/// Decodes the record starting at `offset`.
///
/// # Errors
///
/// [`AtlasError::MalformedRecord`] if fewer than `layout.record_size()` bytes remain,
/// [`AtlasError::UnknownName`] if the name reference is not in `names`.
pub fn decode(
    buffer: &[u8],
    offset: usize,
    layout: RecordLayout,
    names: &NameTable,
) -> Result<PackedRect> {
    let needed = layout.record_size();
    let available = buffer.len().saturating_sub(offset);
    if available < needed {
        return Err(AtlasError::MalformedRecord {
            offset,
            needed,
            available,
        });
    }
    let mut cur = Cursor {
        buf: &buffer[offset..offset + needed],
        pos: 0,
    };
    let name_ref = match layout {
        RecordLayout::Compact => u32::from_le_bytes(cur.take()) as u64,
        RecordLayout::Wide => u64::from_le_bytes(cur.take()),
    };
    let name = names
        .get(name_ref)
        .ok_or(AtlasError::UnknownName {
            offset,
            index: name_ref,
        })?
        .to_string();
    Ok(PackedRect {
        name,
        original_x: i32::from_le_bytes(cur.take()),
        original_y: i32::from_le_bytes(cur.take()),
        x: i32::from_le_bytes(cur.take()),
        y: i32::from_le_bytes(cur.take()),
        width: i32::from_le_bytes(cur.take()),
        height: i32::from_le_bytes(cur.take()),
        source: SourceRef(u32::from_le_bytes(cur.take())),
        element_index: u32::from_le_bytes(cur.take()),
        z_order: i32::from_le_bytes(cur.take()),
        dst_viewport_width: f32::from_le_bytes(cur.take()),
        dst_viewport_height: f32::from_le_bytes(cur.take()),
    })
}

/// Decodes `count` consecutive records starting at offset 0.
pub fn decode_all(
    buffer: &[u8],
    count: usize,
    layout: RecordLayout,
    names: &NameTable,
) -> Result<Vec<PackedRect>> {
    let stride = layout.record_size();
    (0..count)
        .map(|i| decode(buffer, i * stride, layout, names))
        .collect()
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl Cursor<'_> {
    // Callers check the record length up front, so every read is in bounds.
    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }
}

/// Contiguous records of one bin plus the name table they reference.
#[derive(Debug, Clone)]
pub struct RectBuffer {
    layout: RecordLayout,
    count: usize,
    bytes: Vec<u8>,
    names: Arc<NameTable>,
}

impl RectBuffer {
    pub fn new(layout: RecordLayout, count: usize, bytes: Vec<u8>, names: Arc<NameTable>) -> Self {
        Self {
            layout,
            count,
            bytes,
            names,
        }
    }

    /// Encodes `rects` into a buffer with its own name table.
    pub fn encode(rects: &[PackedRect], layout: RecordLayout) -> Self {
        let mut names = NameTable::new();
        let mut bytes = Vec::with_capacity(rects.len() * layout.record_size());
        for r in rects {
            encode(r, layout, &mut names, &mut bytes);
        }
        Self::new(layout, rects.len(), bytes, Arc::new(names))
    }

    pub fn decode_all(&self) -> Result<Vec<PackedRect>> {
        decode_all(&self.bytes, self.count, self.layout, &self.names)
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn layout(&self) -> RecordLayout {
        self.layout
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }
}
