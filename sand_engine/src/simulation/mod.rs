pub mod grid;
pub mod heat;
mod motion;
mod reactions;
pub mod universe;

pub use grid::Grid;
pub use heat::HeatField;
pub use universe::{Brush, Universe};
