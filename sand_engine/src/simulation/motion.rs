use crate::elements::Material;
use crate::simulation::universe::Universe;

/// What happens when a moving cell looks at a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    /// Destination is free for this material
    Open,
    /// Destination is lighter and can be pushed out of the way
    Displace,
    Blocked,
}

/// Can `mover` sink into `target` from above (or from the side)?
fn sink_entry(mover: Material, target: Material) -> Entry {
    if target == Material::Empty || target.is_gas() {
        Entry::Open
    } else if !target.is_solid() && mover.density() > target.density() {
        Entry::Displace
    } else {
        Entry::Blocked
    }
}

/// Can a gas rise into `target`? Gases bubble up through liquids.
fn rise_entry(target: Material) -> Entry {
    if target == Material::Empty || target.is_liquid() {
        Entry::Open
    } else {
        Entry::Blocked
    }
}

impl Universe {
    /// Left/right in a random order
    fn directions(&mut self) -> [i32; 2] {
        if self.toss_coin() { [-1, 1] } else { [1, -1] }
    }

    /// Move into the cell at (x + dx, y + dy) if `entry` allows it.
    /// Returns true if the cell moved.
    fn try_enter(&mut self, x: u32, y: u32, dx: i32, dy: i32, entry: fn(Material, Material) -> Entry) -> bool {
        let Some((nx, ny)) = self.grid.offset(x, y, dx, dy) else {
            return false;
        };
        let i = self.grid.xy_to_index(x, y);
        let target_i = self.grid.xy_to_index(nx, ny);
        let mover = self.grid.get_index(i);
        let target = self.grid.get_index(target_i);
        let allowed = match entry(mover, target) {
            Entry::Open => true,
            Entry::Displace => self.chance(self.config.displace_chance),
            Entry::Blocked => false,
        };
        if allowed {
            self.swap(i, target_i);
        }
        allowed
    }

    /// Sand and gunpowder: straight down, then diagonally down.
    pub(crate) fn move_granular(&mut self, x: u32, y: u32) -> bool {
        if self.try_enter(x, y, 0, 1, sink_entry) {
            return true;
        }
        for dx in self.directions() {
            if self.try_enter(x, y, dx, 1, sink_entry) {
                return true;
            }
        }
        false
    }

    /// Liquids fall like granular material, then spread sideways.
    pub(crate) fn move_liquid(&mut self, x: u32, y: u32, material: Material) -> bool {
        if self.move_granular(x, y) {
            return true;
        }
        let spread = self.config.spread_for(material);
        for dir in self.directions() {
            if self.spread_liquid(x, y, material, dir, spread) {
                return true;
            }
        }
        false
    }

    /// Search up to `spread` cells in direction `dir` for somewhere to flow.
    ///
    /// The search passes through the liquid's own kind, stops at anything
    /// else, and takes the first empty cell that has a drop under it, or the
    /// farthest empty cell reached otherwise. A lighter liquid right next to
    /// the cell is displaced instead.
    fn spread_liquid(&mut self, x: u32, y: u32, material: Material, dir: i32, spread: u32) -> bool {
        let i = self.grid.xy_to_index(x, y);
        let mut target = None;

        for step in 1..=spread {
            let Some((nx, ny)) = self.grid.offset(x, y, dir * step as i32, 0) else {
                break;
            };
            let n = self.grid.get_index(self.grid.xy_to_index(nx, ny));
            if n == Material::Empty {
                target = Some((nx, ny));
                let below = self
                    .grid
                    .offset(nx, ny, 0, 1)
                    .map(|(bx, by)| self.grid.get(bx, by));
                if below == Some(Material::Empty) {
                    break;
                }
            } else if n == material {
                continue;
            } else {
                if step == 1 && target.is_none() {
                    return self.try_enter(x, y, dir, 0, sink_entry);
                }
                break;
            }
        }

        if let Some((tx, ty)) = target {
            let target_i = self.grid.xy_to_index(tx, ty);
            self.swap(i, target_i);
            return true;
        }
        false
    }

    /// Gases: straight up, diagonally up, then sideways into empty space.
    pub(crate) fn move_gas(&mut self, x: u32, y: u32) -> bool {
        if self.try_enter(x, y, 0, -1, |_, target| rise_entry(target)) {
            return true;
        }
        let dirs = self.directions();
        for dx in dirs {
            if self.try_enter(x, y, dx, -1, |_, target| rise_entry(target)) {
                return true;
            }
        }
        for dx in dirs {
            if self.try_enter(x, y, dx, 0, |_, target| {
                if target == Material::Empty { Entry::Open } else { Entry::Blocked }
            }) {
                return true;
            }
        }
        false
    }
}
