use crate::elements::{AMBIENT_TEMPERATURE, Material};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Upper bound for `conduction_weight`; keeps the diffusion sums small.
pub const MAX_CONDUCTION_WEIGHT: i32 = 1 << 16;

/// Upper bound for `explosion_radius`.
pub const MAX_EXPLOSION_RADIUS: i32 = 64;

/// Tunable constants for the simulation.
///
/// Probabilities are per cell per tick. None of them are load-bearing for
/// correctness; they control how the simulation feels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the random source. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Maximum cells a liquid searches sideways per tick.
    pub water_spread: u32,
    pub oil_spread: u32,
    pub acid_spread: u32,
    pub lava_spread: u32,
    /// Chance a denser material swaps down through a lighter one under it.
    pub displace_chance: f64,

    pub fire_decay_chance: f64,
    /// When fire burns out, chance it leaves smoke instead of empty space.
    pub fire_smoke_chance: f64,
    /// Multiplied by a neighbor's flammability to get its ignition chance.
    pub ignite_chance: f64,
    pub extinguish_chance: f64,
    pub smoke_decay_chance: f64,
    pub steam_decay_chance: f64,

    pub acid_dissolve_chance: f64,
    /// After dissolving something, chance the acid is used up too.
    pub acid_consume_chance: f64,
    pub lava_ignite_chance: f64,
    pub plant_growth_chance: f64,
    pub plant_absorb_chance: f64,
    pub ice_melt_chance: f64,

    pub explosion_radius: i32,
    /// Extra fire/smoke cells thrown around an explosion
    pub explosion_scatter: u32,

    /// Weight of a cell's own temperature against each neighbor's weight of 1.
    pub conduction_weight: i32,
    pub ambient_temperature: i16,
    /// Empty cells step one degree toward ambient once every this many ticks.
    pub ambient_relax_interval: u32,

    pub boil_chance: f64,
    pub freeze_chance: f64,
    pub condense_chance: f64,
    pub lava_cool_chance: f64,
    pub sand_melt_chance: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: None,
            water_spread: 4,
            oil_spread: 3,
            acid_spread: 3,
            lava_spread: 1,
            displace_chance: 0.6,
            fire_decay_chance: 0.0625,
            fire_smoke_chance: 0.5,
            ignite_chance: 0.2,
            extinguish_chance: 0.8,
            smoke_decay_chance: 0.0625,
            steam_decay_chance: 0.005,
            acid_dissolve_chance: 0.1,
            acid_consume_chance: 0.5,
            lava_ignite_chance: 0.5,
            plant_growth_chance: 0.02,
            plant_absorb_chance: 0.01,
            ice_melt_chance: 0.1,
            explosion_radius: 3,
            explosion_scatter: 10,
            conduction_weight: 1024,
            ambient_temperature: AMBIENT_TEMPERATURE,
            ambient_relax_interval: 10,
            boil_chance: 0.1,
            freeze_chance: 0.1,
            condense_chance: 0.05,
            lava_cool_chance: 0.1,
            sand_melt_chance: 0.02,
        }
    }
}

impl SimConfig {
    /// Same defaults with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Lateral search distance for a liquid, zero for everything else.
    pub const fn spread_for(&self, material: Material) -> u32 {
        match material {
            Material::Water => self.water_spread,
            Material::Oil => self.oil_spread,
            Material::Acid => self.acid_spread,
            Material::Lava => self.lava_spread,
            _ => 0,
        }
    }

    /// Check every probability is in `[0, 1]`, the heat weight is in
    /// `1..=MAX_CONDUCTION_WEIGHT` and the blast radius in `0..=MAX_EXPLOSION_RADIUS`.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), EngineError> {
        let chances = [
            ("displace_chance", self.displace_chance),
            ("fire_decay_chance", self.fire_decay_chance),
            ("fire_smoke_chance", self.fire_smoke_chance),
            ("ignite_chance", self.ignite_chance),
            ("extinguish_chance", self.extinguish_chance),
            ("smoke_decay_chance", self.smoke_decay_chance),
            ("steam_decay_chance", self.steam_decay_chance),
            ("acid_dissolve_chance", self.acid_dissolve_chance),
            ("acid_consume_chance", self.acid_consume_chance),
            ("lava_ignite_chance", self.lava_ignite_chance),
            ("plant_growth_chance", self.plant_growth_chance),
            ("plant_absorb_chance", self.plant_absorb_chance),
            ("ice_melt_chance", self.ice_melt_chance),
            ("boil_chance", self.boil_chance),
            ("freeze_chance", self.freeze_chance),
            ("condense_chance", self.condense_chance),
            ("lava_cool_chance", self.lava_cool_chance),
            ("sand_melt_chance", self.sand_melt_chance),
        ];
        for (field, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(EngineError::InvalidConfig { field, value });
            }
        }
        if !(1..=MAX_CONDUCTION_WEIGHT).contains(&self.conduction_weight) {
            return Err(EngineError::InvalidConfig {
                field: "conduction_weight",
                value: f64::from(self.conduction_weight),
            });
        }
        if !(0..=MAX_EXPLOSION_RADIUS).contains(&self.explosion_radius) {
            return Err(EngineError::InvalidConfig {
                field: "explosion_radius",
                value: f64::from(self.explosion_radius),
            });
        }
        Ok(())
    }
}
