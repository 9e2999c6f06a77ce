//! Land desirability field derived from amenity proximity.
//!
//! A multi-source breadth-first search runs outward from every park tile
//! over 4-connected neighbors. Tiles within the radius get a linear falloff
//! value, everything else sits on the floor. The field is ephemeral: it is
//! recomputed from the grid on demand and memoized on the grid revision.

use std::collections::VecDeque;

use crate::world::{Coord, Grid};

/// Desirability assigned to tiles out of reach of any amenity.
pub const FLOOR_VALUE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct LandValueField {
    side: u32,
    values: Vec<f64>,
}

impl LandValueField {
    /// Breadth-first diffusion from every amenity tile, capped at `radius`
    /// steps. FIFO expansion visits each tile at most once, so the recorded
    /// distance is minimal regardless of source order.
    pub fn compute(grid: &Grid, radius: u32) -> Self {
        let side = grid.side();
        let cell_count = (side * side) as usize;
        let mut distances = vec![u32::MAX; cell_count];
        let mut queue = VecDeque::new();

        for tile in grid.tiles() {
            if tile.kind.is_amenity() {
                let coord = tile.coord();
                if let Some(index) = grid.index(coord) {
                    if distances[index] != 0 {
                        distances[index] = 0;
                        queue.push_back(coord);
                    }
                }
            }
        }

        while let Some(coord) = queue.pop_front() {
            let Some(index) = grid.index(coord) else {
                continue;
            };
            let next = distances[index] + 1;
            if next >= radius {
                continue;
            }
            for neighbor in grid.neighbors(coord) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                if distances[neighbor_index] <= next {
                    continue;
                }
                distances[neighbor_index] = next;
                queue.push_back(neighbor);
            }
        }

        let values = distances
            .into_iter()
            .map(|distance| {
                if distance < radius {
                    1.0 - distance as f64 / radius as f64
                } else {
                    FLOOR_VALUE
                }
            })
            .collect();

        Self { side, values }
    }

    pub fn get(&self, coord: Coord) -> Option<f64> {
        if coord.x < self.side && coord.y < self.side {
            Some(self.values[(coord.y * self.side + coord.x) as usize])
        } else {
            None
        }
    }

    /// Surcharge input for the cost engine: absent coordinates read as zero.
    pub fn value_or_zero(&self, coord: Coord) -> f64 {
        self.get(coord).unwrap_or(0.0)
    }

    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return FLOOR_VALUE;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }
}

/// Memoized field keyed on the grid's revision counter, so repeated cost
/// queries between mutations share one BFS pass.
#[derive(Debug, Default)]
pub struct LandValueCache {
    cached: Option<(u64, LandValueField)>,
}

impl LandValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the memoized field. Required after restoring a grid snapshot:
    /// a restored grid reuses old revision numbers, so a later mutation can
    /// collide with the revision this cache was keyed on.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }

    pub fn field(&mut self, grid: &Grid, radius: u32) -> &LandValueField {
        let stale = match &self.cached {
            Some((revision, _)) => *revision != grid.revision(),
            None => true,
        };
        if stale {
            self.cached = Some((grid.revision(), LandValueField::compute(grid, radius)));
        }
        match &self.cached {
            Some((_, field)) => field,
            None => unreachable!("cache filled above"),
        }
    }
}
