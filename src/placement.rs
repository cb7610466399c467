use std::fmt;

use log::{debug, warn};
use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::cells::Cartesian2DCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashSet};

/// What a marker stands for in the game built on top of the maze.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "start")]
    PlayerStart,
    #[serde(rename = "score")]
    Collectible,
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MarkerKind::PlayerStart => write!(f, "start"),
            MarkerKind::Collectible => write!(f, "score"),
        }
    }
}

/// A point of interest bound to a passage tile.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Cartesian2DCoordinate,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Error)]
pub enum PlacementError {
    #[error("cannot place {requested} {kind} marker(s): only {available} unoccupied passage tile(s)")]
    NoPassageAvailable {
        kind: MarkerKind,
        requested: usize,
        available: usize,
    },
}

/// Chooses passage tiles for markers so that no two markers of one generation cycle share a tile.
///
/// Call `reset_occupancy` once at the start of every new maze, before any `place`.
#[derive(Debug)]
pub struct MarkerPlacer {
    occupied: FnvHashSet<Cartesian2DCoordinate>,
}

impl MarkerPlacer {
    pub fn new() -> MarkerPlacer {
        MarkerPlacer { occupied: utils::fnv_hashset(16) }
    }

    pub fn reset_occupancy(&mut self) {
        self.occupied.clear();
    }

    #[inline]
    pub fn is_occupied(&self, coord: Cartesian2DCoordinate) -> bool {
        self.occupied.contains(&coord)
    }

    #[inline]
    pub fn occupied_count(&self) -> usize {
        self.occupied.len()
    }

    /// Pick `count` distinct, currently unoccupied passage tiles for markers of `kind`.
    ///
    /// Each marker goes on a uniformly random passage tile, drawing again while the tile is taken.
    /// The chosen tiles are occupied until the next `reset_occupancy`.
    ///
    /// Fails without placing anything when the grid has no passages or fewer unoccupied passages
    /// than `count`. This is recoverable: carve first, or carry on with zero markers.
    pub fn place(&mut self,
                 grid: &Grid,
                 kind: MarkerKind,
                 count: usize,
                 rng: &mut XorShiftRng)
                 -> Result<Vec<Cartesian2DCoordinate>, PlacementError> {

        let passages = grid.passages().collect::<Vec<_>>();
        let available = passages.iter().filter(|coord| !self.is_occupied(**coord)).count();

        if passages.is_empty() || count > available {
            let err = PlacementError::NoPassageAvailable { kind, requested: count, available };
            warn!("{}", err);
            return Err(err);
        }

        let mut placed = Vec::with_capacity(count);
        for _ in 0..count {
            let coord = loop {
                let candidate = passages[rng.gen_range(0..passages.len())];
                if !self.is_occupied(candidate) {
                    break candidate;
                }
            };
            self.occupied.insert(coord);
            placed.push(coord);
        }

        debug!("placed {} {} marker(s), {} tile(s) now occupied", count, kind, self.occupied.len());
        Ok(placed)
    }
}

impl Default for MarkerPlacer {
    fn default() -> MarkerPlacer {
        MarkerPlacer::new()
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::SeedableRng;

    use super::*;
    use crate::cells::TileState;
    use crate::generators::MazeAlgorithm;
    use crate::units::{Height, Width};

    fn carved(algorithm: MazeAlgorithm, w: usize, h: usize, rng: &mut XorShiftRng) -> Grid {
        let mut g = Grid::new(Width(w), Height(h)).expect("valid grid dimensions");
        algorithm.carver().carve(&mut g, rng);
        g
    }

    #[test]
    fn start_and_collectibles_on_a_prim_maze() {
        let mut rng = XorShiftRng::seed_from_u64(21);
        let g = carved(MazeAlgorithm::Prim, 21, 21, &mut rng);
        let mut placer = MarkerPlacer::new();
        placer.reset_occupancy();

        let start = placer.place(&g, MarkerKind::PlayerStart, 1, &mut rng).unwrap();
        let scores = placer.place(&g, MarkerKind::Collectible, 10, &mut rng).unwrap();
        assert_eq!(start.len(), 1);
        assert_eq!(scores.len(), 10);

        let all = start.iter().chain(scores.iter()).cloned().collect_vec();
        assert_eq!(all.iter().unique().count(), 11);
        for coord in all {
            assert!(g.is_passage(coord));
            assert!(!g.is_on_boundary_ring(coord));
            assert!(placer.is_occupied(coord));
        }
        assert_eq!(placer.occupied_count(), 11);
    }

    #[test]
    fn placing_on_an_uncarved_grid_fails() {
        let g = Grid::new(Width(7), Height(7)).unwrap();
        let mut rng = XorShiftRng::seed_from_u64(0);
        let mut placer = MarkerPlacer::new();
        assert_eq!(placer.place(&g, MarkerKind::PlayerStart, 1, &mut rng),
                   Err(PlacementError::NoPassageAvailable {
                       kind: MarkerKind::PlayerStart,
                       requested: 1,
                       available: 0,
                   }));
        assert_eq!(placer.occupied_count(), 0);
    }

    #[test]
    fn asking_for_more_markers_than_passages_fails() {
        let mut g = Grid::new(Width(5), Height(5)).unwrap();
        for &(x, y) in &[(1, 1), (2, 1), (3, 1)] {
            g.set_tile_state(Cartesian2DCoordinate::new(x, y), TileState::Passage).unwrap();
        }
        let mut rng = XorShiftRng::seed_from_u64(8);
        let mut placer = MarkerPlacer::new();

        assert_eq!(placer.place(&g, MarkerKind::Collectible, 4, &mut rng).unwrap_err(),
                   PlacementError::NoPassageAvailable {
                       kind: MarkerKind::Collectible,
                       requested: 4,
                       available: 3,
                   });

        placer.place(&g, MarkerKind::PlayerStart, 1, &mut rng).unwrap();
        assert!(placer.place(&g, MarkerKind::Collectible, 3, &mut rng).is_err());
        assert_eq!(placer.place(&g, MarkerKind::Collectible, 2, &mut rng).unwrap().len(), 2);
        assert!(placer.place(&g, MarkerKind::Collectible, 1, &mut rng).is_err());
        assert_eq!(placer.place(&g, MarkerKind::Collectible, 0, &mut rng), Ok(vec![]));
    }

    #[test]
    fn reset_frees_every_tile() {
        let mut rng = XorShiftRng::seed_from_u64(2);
        let g = carved(MazeAlgorithm::Dfs, 3, 3, &mut rng);
        let mut placer = MarkerPlacer::new();

        let first = placer.place(&g, MarkerKind::PlayerStart, 1, &mut rng).unwrap();
        assert!(placer.place(&g, MarkerKind::Collectible, 1, &mut rng).is_err());

        placer.reset_occupancy();
        assert_eq!(placer.occupied_count(), 0);
        assert_eq!(placer.place(&g, MarkerKind::Collectible, 1, &mut rng).unwrap(), first);
    }

    #[test]
    fn repeated_placements_never_share_a_tile() {
        fn p(counts: Vec<u8>, seed: u64) -> TestResult {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let g = carved(MazeAlgorithm::Dfs, 15, 15, &mut rng);
            let mut placer = MarkerPlacer::new();
            let mut all = vec![];

            for count in counts {
                let count = (count % 8) as usize;
                match placer.place(&g, MarkerKind::Collectible, count, &mut rng) {
                    Ok(coords) => all.extend(coords),
                    Err(_) => {
                        if count <= g.passages_count() - all.len() {
                            return TestResult::failed();
                        }
                    }
                }
            }
            let distinct = all.iter().unique().count();
            TestResult::from_bool(distinct == all.len() && distinct == placer.occupied_count())
        }
        quickcheck(p as fn(Vec<u8>, u64) -> TestResult)
    }
}
