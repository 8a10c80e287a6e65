//! A falling-sand cellular automaton.
//!
//! [`Universe`] owns a fixed-size grid of [`Material`] cells and a parallel
//! heat field. A host calls [`Universe::paint`] while the user draws,
//! [`Universe::tick`] once per frame, then renders [`Universe::cells`].

pub mod config;
pub mod elements;
pub mod error;
pub mod simulation;

pub use config::SimConfig;
pub use elements::{MATERIAL_COUNT, Material, Mobility};
pub use error::EngineError;
pub use simulation::{Brush, Universe};
