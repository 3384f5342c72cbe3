//! Binary map and entity formats
//!
//! Both formats are flat, unversioned, and written in the host's native
//! byte order, matching the files the raycaster engine reads.
//!
//! Grid file:
//! ```text
//! width: i32, height: i32
//! 3x (walls, floors, ceiling): count: u64, count x i32
//! ```
//!
//! Entity file:
//! ```text
//! count: i32
//! count x: kind: i32 (1..=7), x y z scale_x scale_y: f32, active: u8,
//!          has_health: u8 [health: f32], has_direction: u8 [direction: f32]
//! ```
//!
//! Field order is the format. Reordering or inserting a field breaks every
//! existing save file.

use std::fmt;

use crate::world::{limits, Entity, EntityKind, GridLayer, Position, Scale, WorldGrids};

/// Error decoding a save file
#[derive(Debug, Clone, PartialEq)]
pub enum CodecError {
    /// Stream ended before a field could be read
    Truncated { needed: usize, remaining: usize },
    /// Width or height non-positive, or a cell count that overflows
    InvalidDimensions { width: i32, height: i32 },
    /// A layer's element count disagrees with width * height
    LayerSizeMismatch { layer: GridLayer, expected: usize, found: u64 },
    /// Entity kind value not in the known set
    UnknownEntityKind(i32),
    /// Entity count negative or above the limit
    InvalidCount(i32),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Truncated { needed, remaining } => {
                write!(f, "truncated: needed {} bytes, {} remaining", needed, remaining)
            }
            CodecError::InvalidDimensions { width, height } => {
                write!(f, "invalid map dimensions {}x{}", width, height)
            }
            CodecError::LayerSizeMismatch { layer, expected, found } => write!(
                f,
                "{} layer has {} cells, expected {}",
                layer.label(),
                found,
                expected
            ),
            CodecError::UnknownEntityKind(k) => write!(f, "unknown entity kind {}", k),
            CodecError::InvalidCount(n) => write!(f, "invalid entity count {}", n),
        }
    }
}

impl std::error::Error for CodecError {}

// ─────────────────────────────────────────────────────────────────────────────
// Primitive readers/writers
// ─────────────────────────────────────────────────────────────────────────────

struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    fn i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.buf.extend_from_slice(&v.to_ne_bytes());
    }

    fn bool(&mut self, v: bool) {
        self.buf.push(v as u8);
    }

    fn finish(self) -> Vec<u8> {
        self.buf
    }
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        if self.remaining() < N {
            return Err(CodecError::Truncated { needed: N, remaining: self.remaining() });
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn i32(&mut self) -> Result<i32, CodecError> {
        Ok(i32::from_ne_bytes(self.take()?))
    }

    fn u64(&mut self) -> Result<u64, CodecError> {
        Ok(u64::from_ne_bytes(self.take()?))
    }

    fn f32(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_ne_bytes(self.take()?))
    }

    fn bool(&mut self) -> Result<bool, CodecError> {
        let [b] = self.take::<1>()?;
        Ok(b != 0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Grids
// ─────────────────────────────────────────────────────────────────────────────

/// Encode the three layers of a map
pub fn encode_grids(grids: &WorldGrids) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(8 + 3 * (8 + 4 * grids.cell_count()));
    w.i32(grids.width());
    w.i32(grids.height());
    for layer in GridLayer::ALL {
        let cells = grids.layer(layer);
        w.u64(cells.len() as u64);
        for &cell in cells {
            w.i32(cell);
        }
    }
    w.finish()
}

/// Decode a map written by [`encode_grids`]
pub fn decode_grids(bytes: &[u8]) -> Result<WorldGrids, CodecError> {
    let mut r = ByteReader::new(bytes);
    let width = r.i32()?;
    let height = r.i32()?;
    // Size is bounded by the bytes actually present, not by a dimension cap
    let expected = match width.checked_mul(height) {
        Some(cells) if width >= 1 && height >= 1 => cells as usize,
        _ => return Err(CodecError::InvalidDimensions { width, height }),
    };

    let mut read_layer = |layer: GridLayer| -> Result<Vec<i32>, CodecError> {
        let count = r.u64()?;
        if count != expected as u64 {
            return Err(CodecError::LayerSizeMismatch { layer, expected, found: count });
        }
        let needed = expected * 4;
        if r.remaining() < needed {
            return Err(CodecError::Truncated { needed, remaining: r.remaining() });
        }
        (0..expected).map(|_| r.i32()).collect()
    };

    let walls = read_layer(GridLayer::Wall)?;
    let floors = read_layer(GridLayer::Floor)?;
    let ceiling = read_layer(GridLayer::Ceiling)?;

    WorldGrids::from_layers(width, height, walls, floors, ceiling)
        .ok_or(CodecError::InvalidDimensions { width, height })
}

// ─────────────────────────────────────────────────────────────────────────────
// Entities
// ─────────────────────────────────────────────────────────────────────────────

/// Encode entities in registry order. Identifiers are not stored.
pub fn encode_entities(entities: &[Entity]) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(4 + entities.len() * 32);
    w.i32(entities.len() as i32);
    for e in entities {
        w.i32(e.kind.wire());
        w.f32(e.position.x);
        w.f32(e.position.y);
        w.f32(e.position.z);
        w.f32(e.scale.x);
        w.f32(e.scale.y);
        w.bool(e.active);
        w.bool(e.health.is_some());
        if let Some(health) = e.health {
            w.f32(health);
        }
        w.bool(e.direction.is_some());
        if let Some(direction) = e.direction {
            w.f32(direction);
        }
    }
    w.finish()
}

/// Decode entities written by [`encode_entities`].
///
/// Decoded entities have an empty identifier; the registry assigns one
/// when they are inserted.
pub fn decode_entities(bytes: &[u8]) -> Result<Vec<Entity>, CodecError> {
    let mut r = ByteReader::new(bytes);
    let count = r.i32()?;
    if !(0..=limits::MAX_ENTITIES).contains(&count) {
        return Err(CodecError::InvalidCount(count));
    }

    // Smallest possible record is 27 bytes; cap the reservation by what's there
    let mut entities = Vec::with_capacity((count as usize).min(r.remaining() / 27));
    for _ in 0..count {
        let raw_kind = r.i32()?;
        let kind = EntityKind::from_wire(raw_kind).ok_or(CodecError::UnknownEntityKind(raw_kind))?;
        let position = Position { x: r.f32()?, y: r.f32()?, z: r.f32()? };
        let scale = Scale { x: r.f32()?, y: r.f32()? };
        let active = r.bool()?;
        let health = if r.bool()? { Some(r.f32()?) } else { None };
        let direction = if r.bool()? { Some(r.f32()?) } else { None };
        entities.push(Entity {
            identifier: String::new(),
            kind,
            position,
            scale,
            active,
            health,
            direction,
        });
    }
    Ok(entities)
}
