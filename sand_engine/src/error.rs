use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
    /// The cell count, times the bytes stored per cell, overflows `isize`.
    #[error("grid of {width}x{height} cells does not fit in memory")]
    GridTooLarge { width: u32, height: u32 },
    #[error("unknown material id {0}")]
    UnknownMaterial(u8),
    #[error("invalid configuration: {field} = {value}")]
    InvalidConfig { field: &'static str, value: f64 },
}
