//! 2D map view
//!
//! Draws the active layer and the entities, and samples pointer/keyboard
//! state for the brush. Read-only with respect to the world.

use log::{info, warn};
use macroquad::prelude::*;

use super::{Brush, KeyState, MouseState, PaletteBank};
use crate::config::EditorConfig;
use crate::world::{EntityKind, EntityRegistry, GridLayer, WorldGrids, CELL_WORLD_SIZE};

/// Entity marker size in pixels
const ENTITY_MARKER: f32 = 10.0;

/// Tile and entity textures. Missing files leave a `None`, drawn as a flat colour.
pub struct TextureSet {
    tiles: Vec<Option<Texture2D>>,
    entities: Vec<Option<Texture2D>>,
}

impl TextureSet {
    pub async fn load(config: &EditorConfig) -> Self {
        let mut tiles = Vec::with_capacity(config.tile_textures.len());
        for path in &config.tile_textures {
            tiles.push(load_one(path).await);
        }
        let mut entities = Vec::with_capacity(config.entity_textures.len());
        for path in &config.entity_textures {
            entities.push(load_one(path).await);
        }
        Self { tiles, entities }
    }

    /// Texture for cell value `value` (1-based)
    fn tile(&self, value: i32) -> Option<&Texture2D> {
        let index = usize::try_from(value - 1).ok()?;
        self.tiles.get(index)?.as_ref()
    }

    fn entity(&self, kind: EntityKind) -> Option<&Texture2D> {
        self.entities.get(kind.texture_slot())?.as_ref()
    }
}

async fn load_one(path: &str) -> Option<Texture2D> {
    match load_texture(path).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            info!("Loaded texture: {}", path);
            Some(texture)
        }
        Err(e) => {
            warn!("Failed to load texture {}: {}", path, e);
            None
        }
    }
}

/// Flat colour for a tile with no texture
fn fallback_tile_color(value: i32) -> Color {
    const PALETTE: [Color; 6] = [
        Color::new(0.55, 0.35, 0.30, 1.0),
        Color::new(0.35, 0.50, 0.35, 1.0),
        Color::new(0.30, 0.40, 0.60, 1.0),
        Color::new(0.60, 0.55, 0.30, 1.0),
        Color::new(0.50, 0.35, 0.55, 1.0),
        Color::new(0.40, 0.40, 0.40, 1.0),
    ];
    PALETTE[(value as usize - 1) % PALETTE.len()]
}

/// Sample the mouse for this tick
pub fn sample_mouse() -> MouseState {
    let (x, y) = mouse_position();
    MouseState {
        x,
        y,
        left_down: is_mouse_button_down(MouseButton::Left),
        right_pressed: is_mouse_button_pressed(MouseButton::Right),
    }
}

/// Sample the keyboard for this tick
pub fn sample_keys() -> KeyState {
    const DIGITS: [KeyCode; 10] = [
        KeyCode::Key0,
        KeyCode::Key1,
        KeyCode::Key2,
        KeyCode::Key3,
        KeyCode::Key4,
        KeyCode::Key5,
        KeyCode::Key6,
        KeyCode::Key7,
        KeyCode::Key8,
        KeyCode::Key9,
    ];

    let digit = DIGITS.iter().position(|&k| is_key_down(k)).map(|d| d as u8);
    let layer = if is_key_down(KeyCode::Q) {
        Some(GridLayer::Wall)
    } else if is_key_down(KeyCode::W) {
        Some(GridLayer::Floor)
    } else if is_key_down(KeyCode::E) {
        Some(GridLayer::Ceiling)
    } else {
        None
    };

    KeyState {
        digit,
        toggle_bank: is_key_pressed(KeyCode::P),
        layer,
    }
}

/// Draw the active layer and all entities
pub fn draw_world(
    grids: &WorldGrids,
    entities: &EntityRegistry,
    layer: GridLayer,
    cell_size: (f32, f32),
    textures: &TextureSet,
) {
    let (cell_w, cell_h) = cell_size;
    let outline = Color::from_rgba(30, 30, 30, 255);

    for y in 0..grids.height() {
        for x in 0..grids.width() {
            let value = grids.cell(layer, x, y).unwrap_or(0);
            let sx = x as f32 * cell_w + 1.0;
            let sy = y as f32 * cell_h + 1.0;
            let w = cell_w - 1.0;
            let h = cell_h - 1.0;

            if value > 0 {
                match textures.tile(value) {
                    Some(texture) => draw_texture_ex(
                        texture,
                        sx,
                        sy,
                        WHITE,
                        DrawTextureParams {
                            dest_size: Some(vec2(w, h)),
                            ..Default::default()
                        },
                    ),
                    None => draw_rectangle(sx, sy, w, h, fallback_tile_color(value)),
                }
            }
            draw_rectangle_lines(sx, sy, w, h, 1.0, outline);
        }
    }

    for entity in entities.iter() {
        let sx = entity.position.x / CELL_WORLD_SIZE * cell_w;
        let sy = entity.position.y / CELL_WORLD_SIZE * cell_h;
        let tint = if entity.active { WHITE } else { Color::new(1.0, 1.0, 1.0, 0.4) };
        match textures.entity(entity.kind) {
            Some(texture) => draw_texture_ex(
                texture,
                sx,
                sy,
                tint,
                DrawTextureParams {
                    dest_size: Some(vec2(ENTITY_MARKER, ENTITY_MARKER)),
                    ..Default::default()
                },
            ),
            None => draw_rectangle(sx, sy, ENTITY_MARKER, ENTITY_MARKER, Color::new(1.0, 0.8, 0.2, tint.a)),
        }
    }
}

/// Brush and map info to the right of the grid
pub fn draw_status(x: f32, brush: &Brush, grids: &WorldGrids, entity_count: usize) {
    let color = Color::from_rgba(200, 200, 200, 255);
    let bank = match brush.bank {
        PaletteBank::Basic => "1-9",
        PaletteBank::Extended => "10-14",
    };
    let lines = [
        format!("Layer: {} (Q/W/E)", brush.layer.label()),
        format!("Value: {} (bank {}, P)", brush.value, bank),
        format!("Map: {}x{}", grids.width(), grids.height()),
        format!("Entities: {}", entity_count),
    ];
    for (i, line) in lines.iter().enumerate() {
        draw_text(line, x, 24.0 + i as f32 * 20.0, 18.0, color);
    }
}
