use crate::elements::Material;

/// The cell buffer: one material byte per cell, row-major.
/// Index calculation: i = y * width + x
///
/// Bytes are only ever written from a [`Material`], so every byte is a valid id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<u8>,
    width: u32,
    height: u32,
}

impl Grid {
    /// Callers guarantee `width * height` fits in `usize`.
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![Material::Empty.id(); width as usize * height as usize],
            width,
            height,
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw bytes for rendering
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Set every cell to Empty
    pub fn clear(&mut self) {
        self.cells.fill(Material::Empty.id());
    }

    /// Get material at (x, y). Out of bounds reads as Empty.
    pub fn get(&self, x: u32, y: u32) -> Material {
        if !self.is_valid(x, y) {
            return Material::Empty;
        }
        self.get_index(self.xy_to_index(x, y))
    }

    /// Set material at (x, y). Out of bounds writes are dropped.
    pub fn set(&mut self, x: u32, y: u32, material: Material) {
        if !self.is_valid(x, y) {
            return;
        }
        let i = self.xy_to_index(x, y);
        self.cells[i] = material.id();
    }

    pub fn get_index(&self, i: usize) -> Material {
        self.cells
            .get(i)
            .map_or(Material::Empty, |&id| Material::from_u8(id))
    }

    pub fn set_index(&mut self, i: usize, material: Material) {
        if let Some(cell) = self.cells.get_mut(i) {
            *cell = material.id();
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        self.cells.swap(a, b);
    }

    /// Convert (x, y) to index
    pub const fn xy_to_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub const fn is_valid(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Offset (x, y) by (dx, dy), returning `None` when it leaves the grid.
    pub fn offset(&self, x: u32, y: u32, dx: i32, dy: i32) -> Option<(u32, u32)> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.is_valid(nx, ny).then_some((nx, ny))
    }

    /// Signed-coordinate variant used by painting, where callers overshoot.
    pub fn signed_to_index(&self, x: i64, y: i64) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        self.is_valid(x, y).then(|| self.xy_to_index(x, y))
    }

    pub fn count(&self, material: Material) -> usize {
        self.cells.iter().filter(|&&id| id == material.id()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn index_mapping_is_row_major() {
        let grid = Grid::new(4, 3);
        assert_eq!(grid.xy_to_index(0, 0), 0);
        assert_eq!(grid.xy_to_index(3, 0), 3);
        assert_eq!(grid.xy_to_index(0, 1), 4);
        assert_eq!(grid.xy_to_index(3, 2), 11);
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut grid = Grid::new(2, 2);
        grid.set(2, 0, Material::Sand);
        grid.set(0, 5, Material::Sand);
        assert_eq!(grid.get(9, 9), Material::Empty);
        assert_eq!(grid.count(Material::Sand), 0);
    }

    #[test]
    fn offsets_stop_at_edges() {
        let grid = Grid::new(3, 3);
        assert_eq!(grid.offset(0, 0, -1, 0), None);
        assert_eq!(grid.offset(2, 2, 0, 1), None);
        assert_eq!(grid.offset(1, 1, 1, -1), Some((2, 0)));
        assert_eq!(grid.signed_to_index(-1, 0), None);
        assert_eq!(grid.signed_to_index(2, 1), Some(5));
    }

    #[test]
    fn set_and_swap() {
        let mut grid = Grid::new(3, 1);
        grid.set(0, 0, Material::Sand);
        grid.set(2, 0, Material::Water);
        grid.swap(0, 2);
        assert_eq!(grid.get(0, 0), Material::Water);
        assert_eq!(grid.get(2, 0), Material::Sand);
        grid.clear();
        assert_eq!(grid.count(Material::Empty), 3);
    }
}
