use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec};
use crate::grid::Grid;
use crate::utils::{self, FnvHashSet};

/// A maze carving algorithm.
///
/// Carving turns walls into passages on the step-2 lattice through a random interior start
/// until the carved region is a single spanning tree, then walls off the outer ring.
/// The grid is expected to be all walls when carving starts (`Grid::reset_to_all_walls`).
/// Carving cannot fail for any grid that `Grid::new` accepted.
pub trait Carver {
    fn carve(&mut self, grid: &mut Grid, rng: &mut XorShiftRng);
}

/// Which carver a generation cycle should use.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MazeAlgorithm {
    Dfs,
    Prim,
}

#[derive(Eq, PartialEq, Clone, Debug, Error)]
#[error("unknown maze algorithm '{0}', expected 'dfs' or 'prim'")]
pub struct ParseAlgorithmError(String);

impl MazeAlgorithm {
    pub fn carver(self) -> Box<dyn Carver> {
        match self {
            MazeAlgorithm::Dfs => Box::new(DepthFirstCarver::new()),
            MazeAlgorithm::Prim => Box::new(PrimCarver::new()),
        }
    }
}

impl Default for MazeAlgorithm {
    fn default() -> MazeAlgorithm {
        MazeAlgorithm::Prim
    }
}

impl FromStr for MazeAlgorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<MazeAlgorithm, ParseAlgorithmError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" => Ok(MazeAlgorithm::Dfs),
            "prim" => Ok(MazeAlgorithm::Prim),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

impl fmt::Display for MazeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeAlgorithm::Dfs => write!(f, "dfs"),
            MazeAlgorithm::Prim => write!(f, "prim"),
        }
    }
}

/// Apply the randomized depth first search (recursive backtracker) algorithm to a grid.
pub fn recursive_backtracker(grid: &mut Grid, rng: &mut XorShiftRng) {
    DepthFirstCarver::new().carve(grid, rng)
}

/// Apply the randomized Prim's algorithm to a grid.
pub fn prims(grid: &mut Grid, rng: &mut XorShiftRng) {
    PrimCarver::new().carve(grid, rng)
}

/// Iterative randomized depth first search.
///
/// From the cell on top of the stack we pick a random lattice neighbour that is still a wall,
/// knock down the wall in between and move there. When a cell has no such neighbour left we
/// backtrack by popping it. Every lattice cell is visited once because visited cells are passages
/// and passages are never candidates.
///
/// Neighbours exactly on the outer ring are candidates too, so the walk notices the edge, but they
/// are never pushed: the stack cannot grow outwards and `force_boundary_to_walls` closes them again,
/// leaving a dead end stub in the interior.
#[derive(Debug, Default)]
pub struct DepthFirstCarver {
    stack: Vec<Cartesian2DCoordinate>,
}

impl DepthFirstCarver {
    pub fn new() -> DepthFirstCarver {
        DepthFirstCarver { stack: vec![] }
    }
}

impl Carver for DepthFirstCarver {
    fn carve(&mut self, grid: &mut Grid, rng: &mut XorShiftRng) {
        self.stack.clear();

        let start = grid.random_interior_cell(rng);
        grid.carve_passage(start);
        self.stack.push(start);
        let mut steps = 0usize;

        while let Some(&current) = self.stack.last() {

            let unvisited: CoordinateSmallVec = grid.lattice_neighbours(current)
                .into_iter()
                .filter(|&neighbour| grid.is_wall(neighbour))
                .collect();

            if unvisited.is_empty() {
                self.stack.pop();
                continue;
            }

            let next = unvisited[rng.gen_range(0..unvisited.len())];
            grid.carve_passage(current.midpoint(next));
            grid.carve_passage(next);
            steps += 1;

            if grid.is_interior(next) {
                self.stack.push(next);
            }
        }

        grid.force_boundary_to_walls();
        debug!("dfs carved {} steps from {}, {} passages on a {}x{} grid",
               steps, start, grid.passages_count(), grid.width().0, grid.height().0);
    }
}

/// Randomized Prim's algorithm.
///
/// The passage region grows through a uniformly random member of its frontier: the wall cells two
/// steps away from some passage. A frontier cell in the interior becomes a passage and is joined to
/// one random passage beside it, so every new cell hangs off exactly one existing one.
///
/// Frontier cells on the outer ring are marked as border tiles instead. They still join up to a
/// neighbouring passage but never become passages themselves and never grow the frontier, so the
/// region cannot be extended from outside the interior.
#[derive(Debug)]
pub struct PrimCarver {
    frontier: Vec<Cartesian2DCoordinate>,
    in_frontier: FnvHashSet<Cartesian2DCoordinate>,
    neighbour_passages: CoordinateSmallVec,
}

impl PrimCarver {
    pub fn new() -> PrimCarver {
        PrimCarver {
            frontier: vec![],
            in_frontier: utils::fnv_hashset(0),
            neighbour_passages: CoordinateSmallVec::new(),
        }
    }

    // The vec gives uniform random removal, the set unique membership.
    fn push_frontier(&mut self, coord: Cartesian2DCoordinate) {
        if self.in_frontier.insert(coord) {
            self.frontier.push(coord);
        }
    }

    fn take_random_frontier(&mut self, rng: &mut XorShiftRng) -> Option<Cartesian2DCoordinate> {
        if self.frontier.is_empty() {
            return None;
        }
        let coord = self.frontier.swap_remove(rng.gen_range(0..self.frontier.len()));
        self.in_frontier.remove(&coord);
        Some(coord)
    }

    /// Sort the lattice neighbours of `coord` into new frontier cells and passages to link back to.
    fn visit_neighbours(&mut self, grid: &Grid, coord: Cartesian2DCoordinate, is_border_tile: bool) {
        for neighbour in grid.lattice_neighbours(coord) {
            if grid.is_wall(neighbour) {
                if !is_border_tile && !grid.is_border_tile(neighbour) {
                    self.push_frontier(neighbour);
                }
            } else {
                self.neighbour_passages.push(neighbour);
            }
        }
    }
}

impl Default for PrimCarver {
    fn default() -> PrimCarver {
        PrimCarver::new()
    }
}

impl Carver for PrimCarver {
    fn carve(&mut self, grid: &mut Grid, rng: &mut XorShiftRng) {
        self.frontier.clear();
        self.in_frontier.clear();
        self.neighbour_passages.clear();

        let start = grid.random_interior_cell(rng);
        grid.carve_passage(start);
        self.visit_neighbours(grid, start, false);
        self.neighbour_passages.clear();

        let mut border_tiles = 0usize;
        while let Some(cell) = self.take_random_frontier(rng) {

            let is_border_tile = !grid.is_interior(cell);
            if is_border_tile {
                grid.mark_border_tile(cell);
                border_tiles += 1;
            } else {
                grid.carve_passage(cell);
            }

            self.visit_neighbours(grid, cell, is_border_tile);

            if !self.neighbour_passages.is_empty() {
                let link = self.neighbour_passages[rng.gen_range(0..self.neighbour_passages.len())];
                grid.carve_passage(cell.midpoint(link));
                self.neighbour_passages.clear();
            }
        }

        grid.force_boundary_to_walls();
        debug!("prim carved from {}, {} passages and {} border tiles on a {}x{} grid",
               start, grid.passages_count(), border_tiles, grid.width().0, grid.height().0);
    }
}
