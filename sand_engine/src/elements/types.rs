use crate::error::EngineError;

/// Materials that can occupy a grid cell.
///
/// The discriminants are the byte values stored in the cell buffer and the
/// indices of the host's color table, so the order must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Material {
    #[default]
    Empty = 0,
    Sand = 1,
    Water = 2,
    Stone = 3,
    Wood = 4,
    Fire = 5,
    Steam = 6,
    Oil = 7,
    Acid = 8,
    Lava = 9,
    Plant = 10,
    Ice = 11,
    Smoke = 12,
    Glass = 13,
    Obsidian = 14,
    Gunpowder = 15,
}

/// How a material moves during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mobility {
    None,
    /// Falls straight or diagonally and piles up
    Granular,
    /// Falls, then spreads sideways
    Liquid,
    /// Rises, then spreads sideways
    Gas,
    /// Never moves on its own
    Static,
    /// Short-lived; rises like a gas until it burns out
    Transient,
}

/// Number of material ids.
pub const MATERIAL_COUNT: usize = 16;

/// Temperature every cell starts at and empty space relaxes toward.
pub const AMBIENT_TEMPERATURE: i16 = 20;

impl Material {
    /// Every material, indexed by its id.
    pub const ALL: [Self; MATERIAL_COUNT] = [
        Self::Empty,
        Self::Sand,
        Self::Water,
        Self::Stone,
        Self::Wood,
        Self::Fire,
        Self::Steam,
        Self::Oil,
        Self::Acid,
        Self::Lava,
        Self::Plant,
        Self::Ice,
        Self::Smoke,
        Self::Glass,
        Self::Obsidian,
        Self::Gunpowder,
    ];

    /// Convert from a cell byte. Unknown ids read as `Empty`.
    pub const fn from_u8(id: u8) -> Self {
        if (id as usize) < MATERIAL_COUNT {
            Self::ALL[id as usize]
        } else {
            Self::Empty
        }
    }

    pub const fn id(self) -> u8 {
        self as u8
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Sand => "Sand",
            Self::Water => "Water",
            Self::Stone => "Stone",
            Self::Wood => "Wood",
            Self::Fire => "Fire",
            Self::Steam => "Steam",
            Self::Oil => "Oil",
            Self::Acid => "Acid",
            Self::Lava => "Lava",
            Self::Plant => "Plant",
            Self::Ice => "Ice",
            Self::Smoke => "Smoke",
            Self::Glass => "Glass",
            Self::Obsidian => "Obsidian",
            Self::Gunpowder => "Gunpowder",
        }
    }

    /// Short description for tooltips
    pub const fn description(self) -> &'static str {
        match self {
            Self::Empty => "Empty space",
            Self::Sand => "Falls and piles, sinks through liquids, melts into glass",
            Self::Water => "Flows and spreads, boils into steam",
            Self::Stone => "Solid barrier that doesn't move",
            Self::Wood => "Solid and flammable",
            Self::Fire => "Spreads to flammable materials, burns out",
            Self::Steam => "Rises and condenses back into water",
            Self::Oil => "Flammable liquid, floats on water",
            Self::Acid => "Dissolves most materials",
            Self::Lava => "Ignites things, hardens into obsidian on water",
            Self::Plant => "Grows next to water, flammable",
            Self::Ice => "Melts near fire or lava",
            Self::Smoke => "Rises and fades away",
            Self::Glass => "Solid, formed when sand gets hot",
            Self::Obsidian => "Solid, formed when lava meets water",
            Self::Gunpowder => "Falls like sand, explodes near fire",
        }
    }

    pub const fn mobility(self) -> Mobility {
        match self {
            Self::Empty => Mobility::None,
            Self::Sand | Self::Gunpowder => Mobility::Granular,
            Self::Water | Self::Oil | Self::Acid | Self::Lava => Mobility::Liquid,
            Self::Steam | Self::Smoke => Mobility::Gas,
            Self::Fire => Mobility::Transient,
            Self::Stone
            | Self::Wood
            | Self::Plant
            | Self::Ice
            | Self::Glass
            | Self::Obsidian => Mobility::Static,
        }
    }

    pub const fn is_liquid(self) -> bool {
        matches!(self.mobility(), Mobility::Liquid)
    }

    /// Gases and fire: anything that rises.
    pub const fn is_gas(self) -> bool {
        matches!(self.mobility(), Mobility::Gas | Mobility::Transient)
    }

    /// Solids block displacement: nothing sinks into them.
    pub const fn is_solid(self) -> bool {
        matches!(self.mobility(), Mobility::Granular | Mobility::Static)
    }

    /// Relative weight used for displacement. Denser materials sink through
    /// lighter non-solid ones.
    pub const fn density(self) -> i8 {
        match self {
            Self::Stone | Self::Obsidian => 100,
            Self::Glass => 60,
            Self::Sand => 50,
            Self::Gunpowder => 45,
            Self::Lava => 40,
            Self::Water | Self::Acid => 30,
            Self::Ice => 25,
            Self::Wood | Self::Plant => 20,
            Self::Oil => 10,
            Self::Empty => 0,
            Self::Fire | Self::Steam | Self::Smoke => -10,
        }
    }

    /// Temperature a freshly placed cell of this material starts at.
    pub const fn base_temperature(self) -> i16 {
        match self {
            Self::Fire => 800,
            Self::Lava => 30000,
            Self::Ice => -20,
            Self::Steam | Self::Smoke => 300,
            _ => AMBIENT_TEMPERATURE,
        }
    }

    /// Percent chance scale for catching fire. Zero means it never burns.
    pub const fn flammability(self) -> u8 {
        match self {
            Self::Wood | Self::Plant => 60,
            Self::Oil => 90,
            Self::Gunpowder => 100,
            _ => 0,
        }
    }

    pub const fn is_flammable(self) -> bool {
        self.flammability() > 0
    }

    /// Acid eats through this material.
    pub const fn is_dissolvable(self) -> bool {
        !matches!(
            self,
            Self::Empty
                | Self::Stone
                | Self::Glass
                | Self::Obsidian
                | Self::Acid
                | Self::Water
                | Self::Fire
                | Self::Steam
                | Self::Smoke
        )
    }

    /// Explosions never break these.
    pub const fn is_blast_proof(self) -> bool {
        matches!(self, Self::Stone | Self::Obsidian | Self::Glass)
    }

    /// Heat sources and sinks that keep their temperature regardless of
    /// their surroundings.
    pub const fn pinned_temperature(self) -> Option<i16> {
        match self {
            Self::Fire => Some(800),
            Self::Ice => Some(-20),
            _ => None,
        }
    }
}

impl TryFrom<u8> for Material {
    type Error = EngineError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        if (id as usize) < MATERIAL_COUNT {
            Ok(Self::ALL[id as usize])
        } else {
            Err(EngineError::UnknownMaterial(id))
        }
    }
}

impl From<Material> for u8 {
    fn from(material: Material) -> Self {
        material.id()
    }
}

impl std::fmt::Display for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
