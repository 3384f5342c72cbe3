//! Map Editor
//!
//! - Dispatcher: the single writer of grids and entities
//! - Brush: pointer/keyboard input turned into commands
//! - View: top-down drawing of the active layer

mod brush;
mod dispatch;
mod view;

pub use brush::*;
pub use dispatch::*;
pub use view::*;
