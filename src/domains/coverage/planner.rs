use super::grid::Grid;
use super::types::{Obstacle, Waypoint};

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Half-open overlap test between the cell [cx1, cx2) x [cy1, cy2) and an
/// obstacle rectangle. Touching edges share zero area and do not count.
fn cell_overlaps(cx1: f64, cy1: f64, cx2: f64, cy2: f64, obs: &Obstacle) -> bool {
    let ox2 = obs.x + obs.width;
    let oy2 = obs.y + obs.height;
    cx1 < ox2 && obs.x < cx2 && cy1 < oy2 && obs.y < cy2
}

/// Generate a zigzag coverage path over the wall with grid step `step`.
///
/// Pure and deterministic: identical inputs always yield identical,
/// identically-ordered output. Even rows scan columns left to right, odd
/// rows right to left. A cell whose extent overlaps any obstacle is skipped
/// entirely; the centroids of all remaining cells are emitted in scan order,
/// rounded to 4 decimals.
pub fn plan(wall_width: f64, wall_height: f64, obstacles: &[Obstacle], step: f64) -> Vec<Waypoint> {
    let grid = Grid::derive(wall_width, wall_height, step);
    let half_w = grid.cell_w / 2.0;
    let half_h = grid.cell_h / 2.0;

    let mut path = Vec::with_capacity(grid.cell_count());
    for row in 0..grid.ny {
        for i in 0..grid.nx {
            let col = if row % 2 == 0 { i } else { grid.nx - 1 - i };
            let (x, y) = grid.centroid(col, row);
            let blocked = obstacles
                .iter()
                .any(|obs| cell_overlaps(x - half_w, y - half_h, x + half_w, y + half_h, obs));
            if !blocked {
                path.push(Waypoint {
                    x: round4(x),
                    y: round4(y),
                });
            }
        }
    }
    path
}
