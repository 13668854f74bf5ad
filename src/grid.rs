use serde::{Deserialize, Serialize};

/// A position in playfield coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from(v: (f64, f64)) -> Self {
        Point { x: v.0, y: v.1 }
    }
}

/// Upper bound on spawn points; larger grids are refused
pub const MAX_GRID_POINTS: usize = 10_000;

/// Fixed table of candidate spawn positions (cell centers), row-major.
///
/// Built once per playfield size and never mutated afterwards. Partial
/// cells at the right and bottom edges are dropped, so a 1300x650 field
/// with 100-unit cells yields 13 columns and 6 rows. A grid that would
/// hold more than [`MAX_GRID_POINTS`] points comes back empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnGrid {
    points: Vec<Point>,
    columns: usize,
    rows: usize,
    cell_size: f64,
}

impl SpawnGrid {
    pub fn build(width: f64, height: f64, cell_size: f64) -> Self {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Self::empty(cell_size);
        }

        let columns = whole_cells(width, cell_size);
        let rows = whole_cells(height, cell_size);
        // NaN here means an infinite side times an empty one
        let points = columns * rows;
        if points.is_nan() || points > MAX_GRID_POINTS as f64 {
            tracing::debug!(columns, rows, "spawn grid too large, refusing");
            return Self::empty(cell_size);
        }
        let (columns, rows) = (columns as usize, rows as usize);

        let points = (0..rows)
            .flat_map(|row| {
                (0..columns).map(move |col| {
                    Point::new(
                        (col as f64 + 0.5) * cell_size,
                        (row as f64 + 0.5) * cell_size,
                    )
                })
            })
            .collect();

        Self {
            points,
            columns,
            rows,
            cell_size,
        }
    }

    fn empty(cell_size: f64) -> Self {
        Self {
            points: Vec::new(),
            columns: 0,
            rows: 0,
            cell_size,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn get(&self, idx: usize) -> Option<Point> {
        self.points.get(idx).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }
}

fn whole_cells(extent: f64, cell_size: f64) -> f64 {
    if extent.is_finite() && extent > 0.0 {
        (extent / cell_size).floor()
    } else {
        0.0
    }
}

/// Smallest cell size that keeps a `width` x `height` field within
/// [`MAX_GRID_POINTS`]
pub fn min_cell_size(width: f64, height: f64) -> f64 {
    (width * height / MAX_GRID_POINTS as f64).sqrt()
}

/// Compute the spawn grid for a playfield. Pure: same inputs, same grid.
pub fn build_grid(width: f64, height: f64, cell_size: f64) -> SpawnGrid {
    SpawnGrid::build(width, height, cell_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_playfield_has_78_points() {
        let grid = build_grid(1300.0, 650.0, 100.0);

        assert_eq!(grid.columns(), 13);
        assert_eq!(grid.rows(), 6);
        assert_eq!(grid.len(), 78);
    }

    #[test]
    fn test_points_are_cell_centers() {
        let grid = build_grid(300.0, 200.0, 100.0);

        assert_eq!(grid.get(0), Some(Point::new(50.0, 50.0)));
        assert_eq!(grid.get(2), Some(Point::new(250.0, 50.0)));
        assert_eq!(grid.get(3), Some(Point::new(50.0, 150.0)));
        assert_eq!(grid.get(6), None);
    }

    #[test]
    fn test_points_evenly_spaced() {
        let grid = build_grid(1300.0, 650.0, 100.0);

        for pair in grid.points().windows(2) {
            if pair[0].y == pair[1].y {
                assert!((pair[1].x - pair[0].x - 100.0).abs() < 1e-9);
            }
        }
        for (i, a) in grid.points().iter().enumerate() {
            for b in &grid.points()[i + 1..] {
                assert!(a.distance(*b) >= 100.0 - 1e-9);
            }
        }
    }

    #[test]
    fn test_build_is_deterministic() {
        assert_eq!(
            build_grid(1024.0, 768.0, 64.0),
            build_grid(1024.0, 768.0, 64.0)
        );
    }

    #[test]
    fn test_degenerate_inputs_yield_empty_grid() {
        assert!(build_grid(1300.0, 650.0, 0.0).is_empty());
        assert!(build_grid(1300.0, 650.0, -10.0).is_empty());
        assert!(build_grid(1300.0, 650.0, f64::NAN).is_empty());
        assert!(build_grid(-5.0, 650.0, 100.0).is_empty());
        assert!(build_grid(99.0, 650.0, 100.0).is_empty());
    }

    #[test]
    fn test_distance() {
        assert_eq!(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0);
        assert_eq!(Point::new(1.0, 1.0).distance(Point::new(1.0, 1.0)), 0.0);
    }

    #[test]
    fn test_oversized_grid_is_refused() {
        assert!(build_grid(1300.0, 650.0, 0.001).is_empty());
        assert!(build_grid(1e300, 650.0, 1e-300).is_empty());
        assert_eq!(build_grid(1e300, 1e300, 1e-300).columns(), 0);
    }

    #[test]
    fn test_min_cell_size_fits_the_cap() {
        let cell = min_cell_size(1300.0, 650.0);
        let grid = build_grid(1300.0, 650.0, cell);

        assert!(!grid.is_empty());
        assert!(grid.len() <= MAX_GRID_POINTS);
    }
}
