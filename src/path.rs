//! A* route planning for autonomous agents.
//!
//! Uniform step cost over 4-connected walkable tiles with a Manhattan
//! heuristic, which is admissible on this grid, so returned paths are
//! optimal. Ties in `f = g + h` break on insertion order: re-running with
//! identical inputs yields an identical path.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::world::{Coord, Grid};

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    coord: Coord,
    f_cost: u64,
    sequence: u64,
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.sequence == other.sequence
    }
}

impl Eq for OpenNode {}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for a min-heap; earlier insertions win ties.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn walkable(grid: &Grid, coord: Coord) -> bool {
    grid.tile(coord).is_some_and(|tile| tile.kind.is_walkable())
}

/// Shortest walkable route from `start` to `goal`, inclusive of both
/// endpoints. `None` when either endpoint is out of bounds or blocked, or no
/// route exists.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if !walkable(grid, start) || !walkable(grid, goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut g_scores: HashMap<Coord, u64> = HashMap::new();
    let mut sequence = 0_u64;

    g_scores.insert(start, 0);
    open_set.push(OpenNode {
        coord: start,
        f_cost: start.manhattan_distance(goal),
        sequence,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            return Some(reconstruct(&came_from, current.coord));
        }
        let current_g = *g_scores.get(&current.coord).unwrap_or(&u64::MAX);

        for neighbor in grid.neighbors(current.coord) {
            if !walkable(grid, neighbor) {
                continue;
            }
            let tentative_g = current_g + 1;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u64::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.coord);
                g_scores.insert(neighbor, tentative_g);
                sequence += 1;
                open_set.push(OpenNode {
                    coord: neighbor,
                    f_cost: tentative_g + neighbor.manhattan_distance(goal),
                    sequence,
                });
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, mut current: Coord) -> Vec<Coord> {
    let mut path = vec![current];
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
