//! World module - the editable level state
//!
//! Three tile layers plus the list of placed entities. Both are owned by
//! the tick loop; other threads only ever talk to them through commands.

mod entity;
mod grids;

pub use entity::*;
pub use grids::*;

/// World units per grid cell (the engine's tile size)
pub const CELL_WORLD_SIZE: f32 = 64.0;

/// Validation limits to keep a bad file or typo from allocating gigabytes
pub mod limits {
    /// Maximum cells per layer of a map created in the editor (4096x4096).
    /// Loaded maps are bounded by the size of their file instead.
    pub const MAX_NEW_CELLS: i64 = 1 << 24;
    /// Maximum number of entities in a save file
    pub const MAX_ENTITIES: i32 = 1 << 20;
}
