#![allow(clippy::cast_possible_wrap)]

use crate::elements::{Material, Mobility};
use crate::simulation::universe::Universe;
use rand::Rng;

/// Up, down, left, right
const BORDERING: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// All 8 directions including corners
const SURROUNDING: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

impl Universe {
    /// Run one cell's rules for this tick: temperature changes, then
    /// chemistry, then movement for its mobility class.
    pub(crate) fn update_cell(&mut self, x: u32, y: u32) {
        let i = self.grid.xy_to_index(x, y);
        if self.moved[i] {
            return;
        }
        let material = self.grid.get_index(i);
        if material == Material::Empty {
            return;
        }

        if self.apply_heat(i, material) || self.react(x, y, i, material) {
            return;
        }

        match material.mobility() {
            Mobility::Granular => {
                self.move_granular(x, y);
            }
            Mobility::Liquid => {
                self.move_liquid(x, y, material);
            }
            Mobility::Gas | Mobility::Transient => {
                self.move_gas(x, y);
            }
            Mobility::Static | Mobility::None => {}
        }
    }

    /// Temperature-driven state changes. Returns true if the cell changed.
    fn apply_heat(&mut self, i: usize, material: Material) -> bool {
        let temp = self.heat.get(i);
        let (into, chance, keep_heat) = match material {
            Material::Water if temp > 100 => (Material::Steam, self.config.boil_chance, false),
            Material::Water if temp < -5 => (Material::Ice, self.config.freeze_chance, false),
            Material::Steam if temp < 80 => (Material::Water, self.config.condense_chance, false),
            Material::Lava if temp < 800 => (Material::Stone, self.config.lava_cool_chance, true),
            Material::Sand if temp > 500 => (Material::Glass, self.config.sand_melt_chance, true),
            _ => return false,
        };
        if !self.chance(chance) {
            return false;
        }
        if keep_heat {
            self.set_cell_keep_heat(i, into);
        } else {
            self.set_cell(i, into);
        }
        true
    }

    /// Material-specific chemistry. Returns true if the cell itself changed
    /// and should not move this tick.
    fn react(&mut self, x: u32, y: u32, i: usize, material: Material) -> bool {
        match material {
            Material::Fire => self.react_fire(x, y, i),
            Material::Lava => self.react_lava(x, y, i),
            Material::Acid => self.react_acid(x, y, i),
            Material::Plant => {
                self.grow_plant(x, y);
                false
            }
            Material::Ice => self.melt_ice(x, y, i),
            Material::Water => self.absorb_into_plant(x, y, i),
            Material::Gunpowder => {
                if self.bordering(x, y, |m| matches!(m, Material::Fire | Material::Lava)).is_some() {
                    self.explode(x, y);
                    return true;
                }
                false
            }
            Material::Smoke => self.decay(i, self.config.smoke_decay_chance),
            Material::Steam => self.decay(i, self.config.steam_decay_chance),
            Material::Empty
            | Material::Sand
            | Material::Stone
            | Material::Wood
            | Material::Oil
            | Material::Glass
            | Material::Obsidian => false,
        }
    }

    /// First in-bounds up/down/left/right neighbor matching `pred`.
    fn bordering(&self, x: u32, y: u32, pred: impl Fn(Material) -> bool) -> Option<usize> {
        BORDERING.iter().find_map(|&(dx, dy)| {
            let (nx, ny) = self.grid.offset(x, y, dx, dy)?;
            let n = self.grid.xy_to_index(nx, ny);
            pred(self.grid.get_index(n)).then_some(n)
        })
    }

    /// A uniformly chosen in-bounds up/down/left/right neighbor.
    fn random_bordering(&mut self, x: u32, y: u32) -> Option<(u32, u32)> {
        let (dx, dy) = BORDERING[self.rng.gen_range(0..BORDERING.len())];
        self.grid.offset(x, y, dx, dy)
    }

    fn decay(&mut self, i: usize, chance: f64) -> bool {
        if self.chance(chance) {
            self.set_cell(i, Material::Empty);
            return true;
        }
        false
    }

    fn react_fire(&mut self, x: u32, y: u32, i: usize) -> bool {
        if let Some(water) = self.bordering(x, y, |m| m == Material::Water) {
            if self.chance(self.config.extinguish_chance) {
                self.set_cell(water, Material::Steam);
                self.set_cell(i, Material::Empty);
                return true;
            }
        }

        for (dx, dy) in SURROUNDING {
            let Some((nx, ny)) = self.grid.offset(x, y, dx, dy) else {
                continue;
            };
            let n = self.grid.xy_to_index(nx, ny);
            let neighbor = self.grid.get_index(n);
            if neighbor == Material::Gunpowder {
                self.explode(nx, ny);
                return true;
            }
            if neighbor.is_flammable() && !self.moved[n] {
                let chance = self.config.ignite_chance * f64::from(neighbor.flammability()) / 100.0;
                if self.chance(chance) {
                    self.set_cell(n, Material::Fire);
                }
            }
        }

        if self.chance(self.config.fire_decay_chance) {
            let ash = if self.chance(self.config.fire_smoke_chance) {
                Material::Smoke
            } else {
                Material::Empty
            };
            self.set_cell(i, ash);
            return true;
        }
        false
    }

    fn react_lava(&mut self, x: u32, y: u32, i: usize) -> bool {
        for (dx, dy) in BORDERING {
            let Some((nx, ny)) = self.grid.offset(x, y, dx, dy) else {
                continue;
            };
            let n = self.grid.xy_to_index(nx, ny);
            match self.grid.get_index(n) {
                Material::Water => {
                    self.set_cell(i, Material::Obsidian);
                    self.set_cell(n, Material::Steam);
                    return true;
                }
                Material::Gunpowder => {
                    self.explode(nx, ny);
                    return true;
                }
                neighbor if neighbor.is_flammable() => {
                    if self.chance(self.config.lava_ignite_chance) {
                        self.set_cell(n, Material::Fire);
                    }
                }
                _ => {}
            }
        }
        false
    }

    fn react_acid(&mut self, x: u32, y: u32, i: usize) -> bool {
        let Some((nx, ny)) = self.random_bordering(x, y) else {
            return false;
        };
        let n = self.grid.xy_to_index(nx, ny);
        let neighbor = self.grid.get_index(n);

        if neighbor == Material::Lava {
            self.set_cell(i, Material::Fire);
            self.set_cell(n, Material::Steam);
            return true;
        }
        if neighbor.is_dissolvable() && self.chance(self.config.acid_dissolve_chance) {
            self.set_cell(n, Material::Empty);
            if self.chance(self.config.acid_consume_chance) {
                self.set_cell(i, Material::Empty);
                return true;
            }
        }
        false
    }

    /// Plants spread into empty cells that are themselves next to water.
    fn grow_plant(&mut self, x: u32, y: u32) {
        let Some((nx, ny)) = self.random_bordering(x, y) else {
            return;
        };
        let n = self.grid.xy_to_index(nx, ny);
        if self.grid.get_index(n) != Material::Empty {
            return;
        }
        let watered = self.bordering(nx, ny, |m| m == Material::Water).is_some();
        if watered && self.chance(self.config.plant_growth_chance) {
            self.set_cell(n, Material::Plant);
        }
    }

    fn absorb_into_plant(&mut self, x: u32, y: u32, i: usize) -> bool {
        if self.bordering(x, y, |m| m == Material::Plant).is_some()
            && self.chance(self.config.plant_absorb_chance)
        {
            self.set_cell(i, Material::Plant);
            return true;
        }
        false
    }

    fn melt_ice(&mut self, x: u32, y: u32, i: usize) -> bool {
        let hot = self
            .bordering(x, y, |m| matches!(m, Material::Fire | Material::Lava))
            .is_some();
        if hot && self.chance(self.config.ice_melt_chance) {
            self.set_cell(i, Material::Water);
            return true;
        }
        false
    }

    /// Blow a disc of fire and empty space around (cx, cy), then scatter
    /// fire and smoke a little further out. Stone, obsidian and glass survive.
    pub(crate) fn explode(&mut self, cx: u32, cy: u32) {
        let radius = self.config.explosion_radius;
        let radius_sq = radius * radius;
        tracing::trace!(x = cx, y = cy, radius, "explosion");

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let Some((nx, ny)) = self.grid.offset(cx, cy, dx, dy) else {
                    continue;
                };
                let n = self.grid.xy_to_index(nx, ny);
                if self.grid.get_index(n).is_blast_proof() {
                    continue;
                }
                let debris = if self.toss_coin() { Material::Fire } else { Material::Empty };
                self.set_cell(n, debris);
            }
        }

        let reach = radius * 2;
        for _ in 0..self.config.explosion_scatter {
            let dx = self.rng.gen_range(-reach..=reach);
            let dy = self.rng.gen_range(-reach..=reach);
            let Some((nx, ny)) = self.grid.offset(cx, cy, dx, dy) else {
                continue;
            };
            let n = self.grid.xy_to_index(nx, ny);
            if self.grid.get_index(n).is_blast_proof() {
                continue;
            }
            let debris = if self.toss_coin() { Material::Fire } else { Material::Smoke };
            self.set_cell(n, debris);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    fn universe_with(width: i32, height: i32, config: SimConfig) -> Universe {
        Universe::with_config(width, height, config).expect("valid dimensions")
    }

    #[test]
    fn lava_meeting_water_makes_obsidian_and_steam() {
        let mut u = universe_with(2, 1, SimConfig::seeded(5));
        u.paint(0, 0, Material::Lava, 0);
        u.paint(0, 1, Material::Water, 0);
        u.tick();
        assert_eq!(u.get(0, 0), Some(Material::Obsidian));
        assert_eq!(u.get(0, 1), Some(Material::Steam));
    }

    #[test]
    fn fire_ignites_wood() {
        let config = SimConfig {
            ignite_chance: 1.0,
            fire_decay_chance: 0.0,
            ..SimConfig::seeded(5)
        };
        let mut u = universe_with(3, 3, config);
        u.paint(1, 0, Material::Wood, 0);
        u.paint(1, 2, Material::Wood, 0);
        u.paint(1, 1, Material::Stone, 0);
        u.paint(2, 1, Material::Fire, 0);
        for _ in 0..50 {
            u.tick();
        }
        assert_eq!(u.count(Material::Wood), 0);
    }

    #[test]
    fn lava_ignites_flammable_neighbors() {
        let config = SimConfig {
            lava_ignite_chance: 1.0,
            ..SimConfig::seeded(5)
        };
        let mut u = universe_with(3, 1, config);
        u.paint(0, 0, Material::Wood, 0);
        u.paint(0, 1, Material::Lava, 0);
        u.tick();
        assert_eq!(u.count(Material::Wood), 0);
        assert_eq!(u.count(Material::Fire), 1);
        assert_eq!(u.count(Material::Lava), 1);
    }

    #[test]
    fn fire_burns_out_into_smoke_or_nothing() {
        let smoky = SimConfig {
            fire_decay_chance: 1.0,
            fire_smoke_chance: 1.0,
            ..SimConfig::seeded(5)
        };
        let mut u = universe_with(1, 1, smoky);
        u.paint(0, 0, Material::Fire, 0);
        u.tick();
        assert_eq!(u.get(0, 0), Some(Material::Smoke));

        let clean = SimConfig {
            fire_decay_chance: 1.0,
            fire_smoke_chance: 0.0,
            ..SimConfig::seeded(5)
        };
        let mut u = universe_with(1, 1, clean);
        u.paint(0, 0, Material::Fire, 0);
        u.tick();
        assert_eq!(u.get(0, 0), Some(Material::Empty));
    }

    #[test]
    fn fire_is_put_out_by_water() {
        let config = SimConfig {
            extinguish_chance: 1.0,
            ..SimConfig::seeded(5)
        };
        let mut u = universe_with(1, 2, config);
        u.paint(0, 0, Material::Fire, 0);
        u.paint(1, 0, Material::Water, 0);
        u.tick();
        assert_eq!(u.count(Material::Fire), 0);
        assert_eq!(u.get(1, 0), Some(Material::Steam));
    }

    #[test]
    fn gunpowder_explodes_next_to_fire() {
        let mut u = universe_with(15, 15, SimConfig::seeded(9));
        u.paint(14, 0, Material::Stone, 0);
        u.paint(7, 7, Material::Gunpowder, 0);
        u.paint(7, 8, Material::Fire, 0);
        u.tick();
        assert_eq!(u.count(Material::Gunpowder), 0);
        assert_eq!(u.get(14, 0), Some(Material::Stone));
    }

    #[test]
    fn explosions_spare_blast_proof_materials() {
        let mut u = universe_with(7, 7, SimConfig::seeded(2));
        u.paint(3, 3, Material::Glass, 1);
        u.explode(3, 3);
        assert_eq!(u.count(Material::Glass), 5);
    }

    #[test]
    fn acid_dissolves_wood_but_not_glass() {
        let config = SimConfig {
            acid_dissolve_chance: 1.0,
            acid_consume_chance: 0.0,
            ..SimConfig::seeded(4)
        };
        let mut u = universe_with(3, 3, config);
        u.paint(0, 0, Material::Glass, 3);
        u.paint(1, 1, Material::Acid, 0);
        u.paint(1, 2, Material::Wood, 0);
        for _ in 0..200 {
            u.tick();
        }
        assert_eq!(u.count(Material::Wood), 0);
        assert_eq!(u.count(Material::Glass), 7);
        assert_eq!(u.count(Material::Acid), 1);
    }

    #[test]
    fn acid_meeting_lava_makes_fire_and_steam() {
        let config = SimConfig {
            displace_chance: 0.0,
            fire_decay_chance: 0.0,
            ..SimConfig::seeded(4)
        };
        let mut u = universe_with(2, 1, config);
        u.paint(0, 0, Material::Acid, 0);
        u.paint(0, 1, Material::Lava, 0);
        // Acid touches one random side per tick
        for _ in 0..200 {
            u.tick();
            if u.count(Material::Acid) == 0 {
                break;
            }
        }
        assert_eq!(u.count(Material::Acid), 0);
        assert_eq!(u.count(Material::Lava), 0);
        assert_eq!(u.count(Material::Fire), 1);
        assert_eq!(u.count(Material::Steam), 1);
    }

    #[test]
    fn ice_melts_next_to_fire() {
        let config = SimConfig {
            ice_melt_chance: 1.0,
            fire_decay_chance: 0.0,
            ..SimConfig::seeded(6)
        };
        let mut u = universe_with(2, 1, config);
        u.paint(0, 0, Material::Ice, 0);
        u.paint(0, 1, Material::Fire, 0);
        u.tick();
        assert_eq!(u.get(0, 0), Some(Material::Water));
    }

    #[test]
    fn plant_grows_toward_water() {
        let config = SimConfig {
            plant_growth_chance: 1.0,
            plant_absorb_chance: 0.0,
            ..SimConfig::seeded(8)
        };
        let mut u = universe_with(3, 2, config);
        // Water held in a stone cup, with an empty cell above it next to the plant
        u.paint(1, 0, Material::Stone, 0);
        u.paint(1, 2, Material::Stone, 0);
        u.paint(1, 1, Material::Water, 0);
        u.paint(0, 0, Material::Plant, 0);
        for _ in 0..100 {
            u.tick();
        }
        assert_eq!(u.get(1, 1), Some(Material::Water));
        assert_eq!(u.get(0, 1), Some(Material::Plant));
    }

    #[test]
    fn hot_sand_turns_to_glass() {
        let config = SimConfig {
            sand_melt_chance: 1.0,
            ..SimConfig::seeded(1)
        };
        let mut u = universe_with(1, 1, config);
        u.paint(0, 0, Material::Sand, 0);
        u.heat.set(0, 900);
        u.tick();
        assert_eq!(u.get(0, 0), Some(Material::Glass));
        assert!(u.temperature(0, 0).is_some_and(|t| t > 500));
    }

    /// A lone cell of `material` held at `temp`, after one tick with every
    /// state change certain.
    fn after_one_tick_at(material: Material, temp: i16) -> (Material, i16) {
        let config = SimConfig {
            boil_chance: 1.0,
            freeze_chance: 1.0,
            condense_chance: 1.0,
            lava_cool_chance: 1.0,
            steam_decay_chance: 0.0,
            ..SimConfig::seeded(1)
        };
        let mut u = universe_with(1, 1, config);
        u.paint(0, 0, material, 0);
        u.heat.set(0, temp);
        u.tick();
        (
            u.get(0, 0).unwrap_or_default(),
            u.temperature(0, 0).unwrap_or_default(),
        )
    }

    #[test]
    fn temperature_drives_state_changes() {
        assert_eq!(after_one_tick_at(Material::Water, 200).0, Material::Steam);
        assert_eq!(after_one_tick_at(Material::Water, -50).0, Material::Ice);
        assert_eq!(after_one_tick_at(Material::Water, 50).0, Material::Water);
        assert_eq!(after_one_tick_at(Material::Steam, 20).0, Material::Water);
        assert_eq!(after_one_tick_at(Material::Steam, 200).0, Material::Steam);
        assert_eq!(after_one_tick_at(Material::Lava, 2000).0, Material::Lava);
    }

    #[test]
    fn cooled_lava_becomes_stone_and_keeps_its_heat() {
        assert_eq!(after_one_tick_at(Material::Lava, 500), (Material::Stone, 500));
    }

    #[test]
    fn smoke_fades_away() {
        let mut u = universe_with(4, 4, SimConfig::seeded(12));
        u.paint(3, 1, Material::Smoke, 0);
        for _ in 0..500 {
            u.tick();
        }
        assert_eq!(u.count(Material::Smoke), 0);
    }
}
