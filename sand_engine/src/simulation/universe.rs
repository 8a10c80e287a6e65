#![allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use crate::config::SimConfig;
use crate::elements::Material;
use crate::error::EngineError;
use crate::simulation::grid::Grid;
use crate::simulation::heat::HeatField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Storage per cell: the material byte, two `i16` heat buffers and the
/// `moved` marker.
const BYTES_PER_CELL: usize = 1 + 2 * size_of::<i16>() + 1;

/// What to draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    pub material: Material,
    pub radius: i32,
    /// When false, only Empty cells are written.
    pub overwrite: bool,
}

impl Brush {
    pub const fn new(material: Material, radius: i32) -> Self {
        Self {
            material,
            radius,
            overwrite: true,
        }
    }
}

/// A falling-sand world: the cell grid, its heat field and the rule state.
///
/// Only one call may be in flight at a time. `tick`, `paint*` and `clear`
/// take `&mut self`, so a borrowed [`Universe::cells`] view can never observe
/// a half-finished tick.
pub struct Universe {
    pub(crate) grid: Grid,
    pub(crate) heat: HeatField,
    /// Cells already updated (or written) during the current tick
    pub(crate) moved: Vec<bool>,
    pub(crate) rng: StdRng,
    pub(crate) generation: u64,
    pub(crate) config: SimConfig,
}

impl Universe {
    /// Create an all-Empty universe with default tuning.
    ///
    /// # Errors
    /// Fails when either dimension is not positive or the cell count overflows.
    pub fn new(width: i32, height: i32) -> Result<Self, EngineError> {
        Self::with_config(width, height, SimConfig::default())
    }

    /// Create an all-Empty universe with the given tuning.
    ///
    /// # Errors
    /// Fails on non-positive dimensions, an oversized grid, or an invalid config.
    pub fn with_config(width: i32, height: i32, config: SimConfig) -> Result<Self, EngineError> {
        let invalid = EngineError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        };
        let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
            return Err(invalid);
        };
        if w == 0 || h == 0 {
            return Err(invalid);
        }
        let too_large = EngineError::GridTooLarge { width: w, height: h };
        let len = (w as usize).checked_mul(h as usize).ok_or_else(|| too_large.clone())?;
        let bytes = len.checked_mul(BYTES_PER_CELL).ok_or_else(|| too_large.clone())?;
        if isize::try_from(bytes).is_err() {
            return Err(too_large);
        }
        config.validate()?;

        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        tracing::debug!(width = w, height = h, seed = ?config.seed, "created universe");

        Ok(Self {
            grid: Grid::new(w, h),
            heat: HeatField::new(len, config.ambient_temperature),
            moved: vec![false; len],
            rng,
            generation: 0,
            config,
        })
    }

    pub const fn width(&self) -> u32 {
        self.grid.width()
    }

    pub const fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Number of ticks run so far
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Row-major material ids, `width * height` bytes.
    ///
    /// The borrow ends before the next mutating call, so hosts copy out or
    /// finish rendering first.
    pub fn cells(&self) -> &[u8] {
        self.grid.as_bytes()
    }

    pub fn get(&self, row: i32, col: i32) -> Option<Material> {
        self.grid
            .signed_to_index(i64::from(col), i64::from(row))
            .map(|i| self.grid.get_index(i))
    }

    pub fn temperature(&self, row: i32, col: i32) -> Option<i16> {
        self.grid
            .signed_to_index(i64::from(col), i64::from(row))
            .map(|i| self.heat.get(i))
    }

    pub fn count(&self, material: Material) -> usize {
        self.grid.count(material)
    }

    /// Reset every cell to Empty and every temperature to ambient.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.heat.reset(self.config.ambient_temperature);
        self.moved.fill(false);
        tracing::debug!(generation = self.generation, "cleared universe");
    }

    /// Advance the simulation one step.
    ///
    /// Rows are swept bottom to top so falling cells outrun the sweep. The
    /// horizontal direction alternates every tick to avoid a left/right bias,
    /// and the `moved` markers stop any cell from being updated twice.
    pub fn tick(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.moved.fill(false);

        self.heat.diffuse(
            &self.grid,
            self.config.conduction_weight,
            self.config.ambient_temperature,
            self.config.ambient_relax_interval,
            self.generation,
        );

        let width = self.grid.width();
        let left_to_right = self.generation % 2 == 0;
        for y in (0..self.grid.height()).rev() {
            for step in 0..width {
                let x = if left_to_right { step } else { width - 1 - step };
                self.update_cell(x, y);
            }
        }
    }

    /// Fill a disc of Euclidean radius `radius` around `(row, col)`.
    ///
    /// A center outside the grid does nothing; cells of the disc that fall
    /// off the edge are clipped. Negative radii paint a single cell.
    pub fn paint(&mut self, row: i32, col: i32, material: Material, radius: i32) {
        self.paint_brush(row, col, &Brush::new(material, radius));
    }

    /// [`Universe::paint`] from a raw id. Unknown ids paint Empty.
    pub fn paint_raw(&mut self, row: i32, col: i32, material_id: u8, radius: i32) {
        self.paint(row, col, Material::from_u8(material_id), radius);
    }

    pub fn paint_brush(&mut self, row: i32, col: i32, brush: &Brush) {
        let (row, col) = (i64::from(row), i64::from(col));
        if self.grid.signed_to_index(col, row).is_none() {
            return;
        }

        // Anything wider than the grid covers all of it.
        let max_extent = i64::from(self.grid.width().max(self.grid.height()));
        let radius = i64::from(brush.radius).clamp(0, max_extent);
        let radius_sq = radius * radius;

        for dr in -radius..=radius {
            for dc in -radius..=radius {
                if dr * dr + dc * dc > radius_sq {
                    continue;
                }
                let Some(i) = self.grid.signed_to_index(col + dc, row + dr) else {
                    continue;
                };
                if brush.overwrite || self.grid.get_index(i) == Material::Empty {
                    self.set_cell(i, brush.material);
                }
            }
        }
    }

    /// Stamp `brush` at every point of the Bresenham line from `from` to `to`,
    /// both given as `(row, col)`.
    ///
    /// Endpoints are clamped onto the grid, so dragging far off-canvas costs
    /// at most one stamp per row or column.
    pub fn paint_line(&mut self, from: (i32, i32), to: (i32, i32), brush: &Brush) {
        let max_row = i64::from(self.grid.height()) - 1;
        let max_col = i64::from(self.grid.width()) - 1;
        let clamp_row = |r: i32| i64::from(r).clamp(0, max_row);
        let clamp_col = |c: i32| i64::from(c).clamp(0, max_col);
        let (mut y, mut x) = (clamp_row(from.0), clamp_col(from.1));
        let (y1, x1) = (clamp_row(to.0), clamp_col(to.1));

        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;

        loop {
            // Clamped coordinates always fit back into i32.
            self.paint_brush(y as i32, x as i32, brush);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Write a material with its base temperature and mark it as done for
    /// this tick.
    pub(crate) fn set_cell(&mut self, i: usize, material: Material) {
        self.grid.set_index(i, material);
        self.heat.set(i, material.base_temperature());
        self.moved[i] = true;
    }

    /// Change a cell's material without touching its temperature.
    pub(crate) fn set_cell_keep_heat(&mut self, i: usize, material: Material) {
        self.grid.set_index(i, material);
        self.moved[i] = true;
    }

    pub(crate) fn swap(&mut self, a: usize, b: usize) {
        self.grid.swap(a, b);
        self.heat.swap(a, b);
        self.moved[a] = true;
        self.moved[b] = true;
    }

    /// `probability` must be in `[0, 1]`; validated configs guarantee it.
    pub(crate) fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    pub(crate) fn toss_coin(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }
}
