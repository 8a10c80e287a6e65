pub mod palette;
pub mod settings;
pub mod systems;

/// Grid size in cells
pub const GRID_WIDTH: u32 = 128;
pub const GRID_HEIGHT: u32 = 128;
/// Screen pixels per cell
pub const DISPLAY_FACTOR: u32 = 4;
