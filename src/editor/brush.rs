//! Brush - pointer and keyboard editing
//!
//! Translates sampled input into [`CommandPayload`]s. The brush never
//! touches the world itself; the tick loop hands its payloads to the
//! dispatcher.
//!
//! Controls:
//! - `Q`/`W`/`E`: edit walls / floors / ceiling
//! - `P`: switch palette bank (bank 0: `1-9` → 1..9, bank 1: `1-5` → 10..14)
//! - `0`: eraser (and entity removal on right click)
//! - Left drag: paint cells
//! - Right click: place entity of kind `value` (1-7), or remove nearby entities

use crate::command::CommandPayload;
use crate::world::{EntityKind, GridLayer, WorldGrids, CELL_WORLD_SIZE};

/// Pointer distance (pixels) within which right click removes entities
pub const REMOVE_RADIUS_PX: f32 = 10.0;

/// Mouse state sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub right_pressed: bool, // Just pressed this tick
}

/// Keyboard state sampled once per tick
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyState {
    /// Lowest digit key held, if any
    pub digit: Option<u8>,
    /// `P` went down this tick
    pub toggle_bank: bool,
    /// Layer key held
    pub layer: Option<GridLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaletteBank {
    #[default]
    Basic,
    Extended,
}

/// Current editing tool state
#[derive(Debug, Clone)]
pub struct Brush {
    /// Cell value painted by the left button
    pub value: i32,
    pub bank: PaletteBank,
    pub layer: GridLayer,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            value: 1,
            bank: PaletteBank::Basic,
            layer: GridLayer::Wall,
        }
    }
}

impl Brush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the brush from keyboard state
    pub fn handle_keys(&mut self, keys: &KeyState) {
        if keys.toggle_bank {
            self.bank = match self.bank {
                PaletteBank::Basic => PaletteBank::Extended,
                PaletteBank::Extended => PaletteBank::Basic,
            };
        }

        if let Some(digit) = keys.digit {
            let value = match (self.bank, digit) {
                (_, 0) => Some(0),
                (PaletteBank::Basic, 1..=9) => Some(digit as i32),
                (PaletteBank::Extended, 1..=5) => Some(digit as i32 + 9),
                _ => None,
            };
            if let Some(value) = value {
                self.value = value;
            }
        }

        if let Some(layer) = keys.layer {
            self.layer = layer;
        }
    }

    /// Commands for this tick's pointer state
    pub fn handle_mouse(
        &self,
        mouse: &MouseState,
        grids: &WorldGrids,
        cell_size: (f32, f32),
    ) -> Vec<CommandPayload> {
        let mut commands = Vec::new();
        let (cell_w, cell_h) = cell_size;

        if mouse.left_down {
            let x = (mouse.x / cell_w).floor() as i32;
            let y = (mouse.y / cell_h).floor() as i32;
            if grids.index(x, y).is_some() {
                commands.push(CommandPayload::PaintCell { layer: self.layer, x, y, value: self.value });
            }
        }

        if mouse.right_pressed {
            let world_x = mouse.x / cell_w * CELL_WORLD_SIZE;
            let world_y = mouse.y / cell_h * CELL_WORLD_SIZE;
            if self.value == 0 {
                commands.push(CommandPayload::RemoveEntitiesNear {
                    x: world_x,
                    y: world_y,
                    radius: REMOVE_RADIUS_PX / cell_w * CELL_WORLD_SIZE,
                });
            } else if let Some(kind) = EntityKind::from_wire(self.value) {
                commands.push(CommandPayload::PlaceEntity { kind, x: world_x, y: world_y });
            }
        }

        commands
    }
}
