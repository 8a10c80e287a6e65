use crate::elements::Material;
use crate::simulation::grid::Grid;

/// Per-cell temperatures, parallel to the grid's cell buffer.
///
/// Diffusion reads a snapshot and writes into the back buffer, so the result
/// does not depend on visiting order.
#[derive(Debug, Clone)]
pub struct HeatField {
    temps: Vec<i16>,
    back: Vec<i16>,
}

const NEIGHBORS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

impl HeatField {
    pub(crate) fn new(len: usize, ambient: i16) -> Self {
        Self {
            temps: vec![ambient; len],
            back: vec![ambient; len],
        }
    }

    pub fn get(&self, i: usize) -> i16 {
        self.temps[i]
    }

    pub fn set(&mut self, i: usize, temp: i16) {
        self.temps[i] = temp;
    }

    /// Temperatures travel with the cell they belong to.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.temps.swap(a, b);
    }

    pub fn reset(&mut self, ambient: i16) {
        self.temps.fill(ambient);
        self.back.fill(ambient);
    }

    /// Advance conduction by one step.
    ///
    /// Each cell becomes the weighted average of itself (weight `self_weight`)
    /// and its in-bounds von Neumann neighbors (weight 1). Pinned materials
    /// keep their fixed temperature. Empty cells drift one degree toward
    /// ambient on a staggered schedule so open air slowly forgets heat.
    pub fn diffuse(
        &mut self,
        grid: &Grid,
        self_weight: i32,
        ambient: i16,
        relax_interval: u32,
        generation: u64,
    ) {
        let relax_interval = u64::from(relax_interval.max(1));
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let i = grid.xy_to_index(x, y);
                let material = grid.get_index(i);

                if let Some(pinned) = material.pinned_temperature() {
                    self.back[i] = pinned;
                    continue;
                }

                let mut sum = i64::from(self.temps[i]) * i64::from(self_weight);
                let mut count = i64::from(self_weight);
                for (dx, dy) in NEIGHBORS {
                    if let Some((nx, ny)) = grid.offset(x, y, dx, dy) {
                        sum += i64::from(self.temps[grid.xy_to_index(nx, ny)]);
                        count += 1;
                    }
                }

                // Round to nearest so small gradients still move heat.
                let mut avg = (sum + count / 2).div_euclid(count);

                if material == Material::Empty && (i as u64 + generation) % relax_interval == 0 {
                    avg += (i64::from(ambient) - avg).signum();
                }

                self.back[i] = clamp_temperature(avg);
            }
        }
        std::mem::swap(&mut self.temps, &mut self.back);
    }
}

fn clamp_temperature(value: i64) -> i16 {
    i16::try_from(value.clamp(i64::from(i16::MIN), i64::from(i16::MAX))).unwrap_or(i16::MAX)
}
