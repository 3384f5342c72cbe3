//! Tile grids
//!
//! The map is three parallel flat layers (wall, floor, ceiling) of the same
//! size. A cell is addressed as `x + y * width`. Value `0` is empty, any
//! `n > 0` refers to tile texture `n - 1`.

use super::limits;

/// Which of the three grid layers an edit or view targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridLayer {
    /// Wall / obstruction layer
    #[default]
    Wall,
    Floor,
    Ceiling,
}

impl GridLayer {
    pub const ALL: [GridLayer; 3] = [GridLayer::Wall, GridLayer::Floor, GridLayer::Ceiling];

    /// Human-readable label (status line)
    pub fn label(&self) -> &'static str {
        match self {
            GridLayer::Wall => "Walls",
            GridLayer::Floor => "Floors",
            GridLayer::Ceiling => "Ceiling",
        }
    }
}

/// The three tile layers of a map
///
/// All three layers always hold exactly `width * height` cells. The only
/// way to change the dimensions is to replace the whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldGrids {
    width: i32,
    height: i32,
    walls: Vec<i32>,
    floors: Vec<i32>,
    ceiling: Vec<i32>,
}

impl WorldGrids {
    /// Create zero-filled layers of the given size.
    ///
    /// Returns `None` if either dimension is non-positive or the map would
    /// have more than [`limits::MAX_NEW_CELLS`] cells.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width < 1 || height < 1 || width as i64 * height as i64 > limits::MAX_NEW_CELLS {
            return None;
        }
        Some(Self::zeroed(width, height))
    }

    /// Like [`WorldGrids::new`], but clamps the dimensions into range
    /// instead of failing
    pub fn new_clamped(width: i32, height: i32) -> Self {
        let width = (width as i64).clamp(1, limits::MAX_NEW_CELLS);
        let height = (height as i64).clamp(1, limits::MAX_NEW_CELLS / width);
        Self::zeroed(width as i32, height as i32)
    }

    fn zeroed(width: i32, height: i32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            walls: vec![0; len],
            floors: vec![0; len],
            ceiling: vec![0; len],
        }
    }

    /// Assemble grids from decoded layers.
    ///
    /// Returns `None` unless all three layers have exactly `width * height`
    /// cells.
    pub fn from_layers(
        width: i32,
        height: i32,
        walls: Vec<i32>,
        floors: Vec<i32>,
        ceiling: Vec<i32>,
    ) -> Option<Self> {
        if width < 1 || height < 1 {
            return None;
        }
        let len = width.checked_mul(height)? as usize;
        if walls.len() != len || floors.len() != len || ceiling.len() != len {
            return None;
        }
        Some(Self { width, height, walls, floors, ceiling })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells in each layer
    pub fn cell_count(&self) -> usize {
        self.walls.len()
    }

    /// Read-only view of one layer
    pub fn layer(&self, layer: GridLayer) -> &[i32] {
        match layer {
            GridLayer::Wall => &self.walls,
            GridLayer::Floor => &self.floors,
            GridLayer::Ceiling => &self.ceiling,
        }
    }

    fn layer_mut(&mut self, layer: GridLayer) -> &mut [i32] {
        match layer {
            GridLayer::Wall => &mut self.walls,
            GridLayer::Floor => &mut self.floors,
            GridLayer::Ceiling => &mut self.ceiling,
        }
    }

    /// Flat index of a cell, or `None` if outside the map
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((x + y * self.width) as usize)
    }

    /// Value of a cell, or `None` if outside the map
    pub fn cell(&self, layer: GridLayer, x: i32, y: i32) -> Option<i32> {
        let idx = self.index(x, y)?;
        Some(self.layer(layer)[idx])
    }

    /// Set a cell. Returns false (and changes nothing) if outside the map.
    pub fn set_cell(&mut self, layer: GridLayer, x: i32, y: i32, value: i32) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.layer_mut(layer)[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Pixel size of one cell when the map is fitted into a square view
    pub fn cell_size(&self, view_size: f32) -> (f32, f32) {
        (view_size / self.width as f32, view_size / self.height as f32)
    }
}
