pub mod types;

pub use types::{AMBIENT_TEMPERATURE, MATERIAL_COUNT, Material, Mobility};
