/// Discretization of a wall into nx * ny equal cells. Never stored; always
/// re-derived from (wall_width, wall_height, step).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    pub cell_w: f64,
    pub cell_h: f64,
}

impl Grid {
    /// nx = max(1, round(W/step)), ny = max(1, round(H/step)). The floor at 1
    /// keeps a step larger than a wall dimension from producing an empty grid.
    pub fn derive(wall_width: f64, wall_height: f64, step: f64) -> Self {
        let nx = ((wall_width / step).round() as i64).max(1) as usize;
        let ny = ((wall_height / step).round() as i64).max(1) as usize;
        Self {
            nx,
            ny,
            cell_w: wall_width / nx as f64,
            cell_h: wall_height / ny as f64,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Center of the cell at (col, row), unrounded.
    pub fn centroid(&self, col: usize, row: usize) -> (f64, f64) {
        (
            (col as f64 + 0.5) * self.cell_w,
            (row as f64 + 0.5) * self.cell_h,
        )
    }
}
