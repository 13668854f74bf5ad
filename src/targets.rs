use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::grid::{Point, SpawnGrid};

/// A clickable circular hit region sitting on one grid point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    pub position: Point,
    pub radius: f64,
    /// Index of the grid point this target occupies
    pub cell: usize,
}

/// Owns the spawn grid and the active targets.
///
/// Targets live in a fixed arena of slots addressed by index. `occupied`
/// mirrors the grid cells held by live slots and is the single source of
/// truth for the no-shared-cell invariant.
#[derive(Debug)]
pub struct TargetField {
    grid: SpawnGrid,
    radius: f64,
    slots: Vec<Option<Target>>,
    occupied: HashSet<usize>,
    rng: StdRng,
}

impl TargetField {
    pub fn new(grid: SpawnGrid, radius: f64) -> Self {
        Self::with_rng(grid, radius, StdRng::from_entropy())
    }

    /// Deterministic placement, for replays and tests
    pub fn with_seed(grid: SpawnGrid, radius: f64, seed: u64) -> Self {
        Self::with_rng(grid, radius, StdRng::seed_from_u64(seed))
    }

    fn with_rng(grid: SpawnGrid, radius: f64, rng: StdRng) -> Self {
        Self {
            grid,
            radius,
            slots: Vec::new(),
            occupied: HashSet::new(),
            rng,
        }
    }

    pub fn grid(&self) -> &SpawnGrid {
        &self.grid
    }

    /// Swap in a grid for a new playfield size. Active targets are dropped.
    pub fn set_grid(&mut self, grid: SpawnGrid) {
        self.clear();
        self.grid = grid;
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.occupied.clear();
    }

    /// Replace the active set with up to `count` targets on distinct,
    /// uniformly chosen grid points. Returns how many were placed, which is
    /// less than `count` when the grid is too small.
    pub fn spawn_initial(&mut self, count: usize) -> usize {
        self.clear();

        let free: Vec<usize> = (0..self.grid.len()).collect();
        let cells: Vec<usize> = free
            .choose_multiple(&mut self.rng, count.min(free.len()))
            .copied()
            .collect();

        for cell in &cells {
            let target = self.target_at(*cell);
            self.occupied.insert(*cell);
            self.slots.push(target);
        }

        if cells.len() < count {
            tracing::debug!(
                requested = count,
                placed = cells.len(),
                grid_points = self.grid.len(),
                "spawn grid too small for requested target count"
            );
        }

        cells.len()
    }

    /// Move the target in `slot` to a fresh grid point.
    ///
    /// The replacement never lands on a cell held by another active target.
    /// The cell being vacated is only reused when it is the sole free cell.
    /// Returns the new target, or `None` if the slot was empty.
    pub fn respawn(&mut self, slot: usize) -> Option<Target> {
        let old = self.slots.get(slot).copied().flatten()?;
        self.occupied.remove(&old.cell);

        let free: Vec<usize> = (0..self.grid.len())
            .filter(|cell| !self.occupied.contains(cell) && *cell != old.cell)
            .collect();

        let cell = match free.choose(&mut self.rng) {
            Some(cell) => *cell,
            None => old.cell,
        };

        let target = self.target_at(cell);
        self.occupied.insert(cell);
        self.slots[slot] = target;
        target
    }

    fn target_at(&self, cell: usize) -> Option<Target> {
        self.grid.get(cell).map(|position| Target {
            position,
            radius: self.radius,
            cell,
        })
    }

    pub fn get(&self, slot: usize) -> Option<&Target> {
        self.slots.get(slot).and_then(|t| t.as_ref())
    }

    /// Live targets with their slot index
    pub fn active(&self) -> impl Iterator<Item = (usize, &Target)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, t)| t.as_ref().map(|t| (slot, t)))
    }

    pub fn active_count(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_occupied(&self, cell: usize) -> bool {
        self.occupied.contains(&cell)
    }
}
