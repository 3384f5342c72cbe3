//! Editor commands
//!
//! Every change to the world goes through a [`CommandPayload`]. Console
//! commands arrive from another thread through the [`CommandSlot`]
//! mailbox; pointer edits are produced on the tick thread itself. Both are
//! applied by the same dispatcher.

mod console;
mod reader;
mod slot;

pub use console::*;
pub use reader::*;
pub use slot::*;

use crate::world::{EntityKind, GridLayer};

/// Sentinel for "leave this field alone" in [`EntityEdit`]
pub const NO_CHANGE: i32 = -1;

/// Arguments of an entity edit
#[derive(Debug, Clone, PartialEq)]
pub struct EntityEdit {
    pub identifier: String,
    pub delete: bool,
    pub scale_x: f32,
    pub scale_y: f32,
    pub z: f32,
    /// New health, or [`NO_CHANGE`]
    pub health: i32,
    /// New direction, or `-1.0` for no change
    pub direction: f32,
}

impl EntityEdit {
    pub fn health_change(&self) -> Option<f32> {
        (self.health != NO_CHANGE).then_some(self.health as f32)
    }

    pub fn direction_change(&self) -> Option<f32> {
        (self.direction != NO_CHANGE as f32).then_some(self.direction)
    }
}

/// One requested operation on the world
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CommandPayload {
    #[default]
    None,
    /// Replace the grids with a map file
    Load { file_name: String },
    /// Replace the grids with empty ones of a new size
    Unload { width: i32, height: i32 },
    /// Write the grids to a map file
    Save { file_name: String },
    /// Write the entities to an entity file
    SaveEntities { file_name: String },
    /// Replace the entities with the contents of an entity file
    LoadEntities { file_name: String },
    EditEntity(EntityEdit),
    /// Stop the editor
    Quit,
    /// Set one cell of one layer
    PaintCell { layer: GridLayer, x: i32, y: i32, value: i32 },
    /// Place a new entity at a world position
    PlaceEntity { kind: EntityKind, x: f32, y: f32 },
    /// Remove entities within `radius` world units of a point
    RemoveEntitiesNear { x: f32, y: f32, radius: f32 },
}

impl CommandPayload {
    /// Short name for logs, matching the console keyword where there is one
    pub fn name(&self) -> &'static str {
        match self {
            CommandPayload::None => "none",
            CommandPayload::Load { .. } => "load",
            CommandPayload::Unload { .. } => "unload",
            CommandPayload::Save { .. } => "save",
            CommandPayload::SaveEntities { .. } => "saveEntities",
            CommandPayload::LoadEntities { .. } => "loadEntities",
            CommandPayload::EditEntity(_) => "editEntity",
            CommandPayload::Quit => "quit",
            CommandPayload::PaintCell { .. } => "paintCell",
            CommandPayload::PlaceEntity { .. } => "placeEntity",
            CommandPayload::RemoveEntitiesNear { .. } => "removeEntities",
        }
    }
}
