//! One maze per level: reset, carve, place markers, and move on to the next level once every
//! collectible has been picked up.

use std::collections::BTreeMap;
use std::fmt;

use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::{Deserialize, Serialize};

use crate::cells::Cartesian2DCoordinate;
use crate::generators::{Carver, MazeAlgorithm};
use crate::grid::{Grid, GridError};
use crate::placement::{Marker, MarkerKind, MarkerPlacer};
use crate::units::{Height, Width};

/// Everything a generation cycle needs to know, passed in explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    pub algorithm: MazeAlgorithm,
    pub marker_counts: BTreeMap<MarkerKind, usize>,
    /// Fixes the random source so the same mazes come out every run.
    pub seed: Option<u64>,
}

impl Default for MazeConfig {
    fn default() -> MazeConfig {
        let mut marker_counts = BTreeMap::new();
        marker_counts.insert(MarkerKind::PlayerStart, 1);
        marker_counts.insert(MarkerKind::Collectible, 10);

        MazeConfig {
            width: 20,
            height: 20,
            algorithm: MazeAlgorithm::Prim,
            marker_counts,
            seed: None,
        }
    }
}

impl MazeConfig {
    pub fn validate(&self) -> Result<(), GridError> {
        Grid::check_dimensions(Width(self.width), Height(self.height)).map(|_| ())
    }

    /// How many markers of a kind each maze gets; kinds missing from the config get none.
    pub fn marker_count(&self, kind: MarkerKind) -> usize {
        self.marker_counts.get(&kind).cloned().unwrap_or(0)
    }
}

/// What picking something up at a coordinate did.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CollectOutcome {
    NothingCollected,
    Scored { score: usize, target: usize },
    /// The last collectible was picked up and a new maze has been generated for `level`.
    LevelComplete { level: u32 },
}

pub struct MazeSession {
    config: MazeConfig,
    grid: Grid,
    carver: Box<dyn Carver>,
    placer: MarkerPlacer,
    rng: XorShiftRng,
    seed: u64,
    markers: Vec<Marker>,
    level: u32,
    score: usize,
    score_target: usize,
}

impl fmt::Debug for MazeSession {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MazeSession :: config: {:?}, seed: {}, level: {}, score: {}/{}, markers: {}, grid: {:?}",
               self.config, self.seed, self.level, self.score, self.score_target, self.markers.len(), self.grid)
    }
}

impl MazeSession {
    /// Set up a session at level 1. No maze exists until the first `generate`.
    pub fn new(config: MazeConfig) -> Result<MazeSession, GridError> {
        let grid = Grid::new(Width(config.width), Height(config.height))?;
        let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("new {}x{} {} maze session with seed {}",
              config.width, config.height, config.algorithm, seed);

        Ok(MazeSession {
            carver: config.algorithm.carver(),
            config,
            grid,
            placer: MarkerPlacer::new(),
            rng: XorShiftRng::seed_from_u64(seed),
            seed,
            markers: vec![],
            level: 1,
            score: 0,
            score_target: 0,
        })
    }

    /// Carve a fresh maze over the whole grid and place the player start and the collectibles.
    ///
    /// A kind of marker that does not fit is logged and skipped, the maze itself is always usable.
    /// The score target becomes the number of collectibles actually placed, so a maze without
    /// collectibles has nothing to collect and only `advance_level` moves the session on.
    pub fn generate(&mut self) -> &[Marker] {
        self.grid.reset_to_all_walls();
        self.placer.reset_occupancy();
        self.markers.clear();
        self.score = 0;

        self.carver.carve(&mut self.grid, &mut self.rng);

        for &kind in &[MarkerKind::PlayerStart, MarkerKind::Collectible] {
            let count = self.config.marker_count(kind);
            match self.placer.place(&self.grid, kind, count, &mut self.rng) {
                Ok(positions) => {
                    self.markers.extend(positions.into_iter().map(|position| Marker { kind, position }))
                }
                Err(err) => warn!("level {} continues without {} markers: {}", self.level, kind, err),
            }
        }

        self.score_target = self.markers
            .iter()
            .filter(|marker| marker.kind == MarkerKind::Collectible)
            .count();
        if self.score_target == 0 {
            warn!("level {} has no collectibles to pick up", self.level);
        }

        debug!("level {} maze ready with {} markers", self.level, self.markers.len());
        &self.markers
    }

    /// Switch carving algorithm. The current maze is kept, the next `generate` uses the new one.
    pub fn set_algorithm(&mut self, algorithm: MazeAlgorithm) {
        if algorithm != self.config.algorithm {
            self.config.algorithm = algorithm;
            self.carver = algorithm.carver();
        }
    }

    /// Pick up whatever collectible sits at `coord`.
    ///
    /// Collecting the last one completes the level: the score goes back to zero, the level goes
    /// up and the next maze is generated straight away.
    pub fn collect(&mut self, coord: Cartesian2DCoordinate) -> CollectOutcome {
        let found = self.markers
            .iter()
            .position(|marker| marker.kind == MarkerKind::Collectible && marker.position == coord);
        let index = match found {
            Some(index) => index,
            None => return CollectOutcome::NothingCollected,
        };
        self.markers.remove(index);

        let target = self.score_target;
        if self.score < target {
            self.score += 1;
        }

        if self.score == target {
            CollectOutcome::LevelComplete { level: self.advance_level() }
        } else {
            CollectOutcome::Scored { score: self.score, target }
        }
    }

    /// Move on to the next level with a freshly generated maze, returning the new level.
    pub fn advance_level(&mut self) -> u32 {
        self.level += 1;
        info!("moving on to level {}", self.level);
        self.generate();
        self.level
    }

    /// Collectibles placed in the current maze, all of which must be picked up to complete it.
    #[inline]
    pub fn score_target(&self) -> usize {
        self.score_target
    }

    pub fn player_start(&self) -> Option<Cartesian2DCoordinate> {
        self.markers
            .iter()
            .find(|marker| marker.kind == MarkerKind::PlayerStart)
            .map(|marker| marker.position)
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn score(&self) -> usize {
        self.score
    }

    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[inline]
    pub fn config(&self) -> &MazeConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::analysis;

    fn config(width: usize, height: usize, algorithm: MazeAlgorithm, collectibles: usize) -> MazeConfig {
        let mut config = MazeConfig {
            width,
            height,
            algorithm,
            seed: Some(42),
            ..MazeConfig::default()
        };
        config.marker_counts.insert(MarkerKind::Collectible, collectibles);
        config
    }

    fn collectibles(session: &MazeSession) -> Vec<Cartesian2DCoordinate> {
        session.markers()
            .iter()
            .filter(|marker| marker.kind == MarkerKind::Collectible)
            .map(|marker| marker.position)
            .collect()
    }

    #[test]
    fn default_config_matches_the_game_settings() {
        let config = MazeConfig::default();
        assert_eq!((config.width, config.height), (20, 20));
        assert_eq!(config.algorithm, MazeAlgorithm::Prim);
        assert_eq!(config.marker_count(MarkerKind::PlayerStart), 1);
        assert_eq!(config.marker_count(MarkerKind::Collectible), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tiny_dimensions_are_rejected() {
        let config = MazeConfig { width: 2, ..MazeConfig::default() };
        assert_eq!(config.validate(), Err(GridError::InvalidDimension { width: 2, height: 20 }));
        assert!(MazeSession::new(config).is_err());
    }

    #[test]
    fn generate_places_one_start_and_every_collectible() {
        let mut session = MazeSession::new(config(21, 21, MazeAlgorithm::Prim, 10)).unwrap();
        assert!(session.markers().is_empty());
        assert_eq!(session.grid().passages_count(), 0);

        let markers = session.generate().to_vec();
        assert_eq!(markers.len(), 11);
        assert_eq!(markers.iter().filter(|m| m.kind == MarkerKind::PlayerStart).count(), 1);
        assert_eq!(markers.iter().map(|m| m.position).unique().count(), 11);
        for marker in &markers {
            assert!(session.grid().is_passage(marker.position));
        }
        assert_eq!(session.player_start(), Some(markers[0].position));
        assert!(analysis::is_perfect_maze(session.grid()));
    }

    #[test]
    fn markers_that_do_not_fit_are_skipped() {
        // A 3x3 grid has a single passage: room for the start but not for a collectible.
        let mut session = MazeSession::new(config(3, 3, MazeAlgorithm::Dfs, 1)).unwrap();
        let markers = session.generate().to_vec();
        assert_eq!(markers, vec![Marker {
                                     kind: MarkerKind::PlayerStart,
                                     position: Cartesian2DCoordinate::new(1, 1),
                                 }]);
    }

    #[test]
    fn a_maze_without_collectibles_has_nothing_to_collect() {
        // 5x5 mazes have at most 7 passages, far fewer than 10 collectibles.
        let mut session = MazeSession::new(config(5, 5, MazeAlgorithm::Dfs, 10)).unwrap();
        session.generate();
        assert_eq!(session.score_target(), 0);
        assert!(session.player_start().is_some());

        let passages = session.grid().passages().collect::<Vec<_>>();
        for coord in passages {
            assert_eq!(session.collect(coord), CollectOutcome::NothingCollected);
        }
        assert_eq!(session.level(), 1);

        assert_eq!(session.advance_level(), 2);
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn score_target_follows_the_placed_collectibles() {
        let mut session = MazeSession::new(config(15, 15, MazeAlgorithm::Prim, 4)).unwrap();
        assert_eq!(session.score_target(), 0);
        session.generate();
        assert_eq!(session.score_target(), 4);
        assert!(format!("{:?}", session).contains("score: 0/4"));
    }

    #[test]
    fn same_seed_same_levels() {
        let mut a = MazeSession::new(config(25, 15, MazeAlgorithm::Dfs, 5)).unwrap();
        let mut b = MazeSession::new(config(25, 15, MazeAlgorithm::Dfs, 5)).unwrap();
        for _ in 0..3 {
            assert_eq!(a.generate(), b.generate());
            assert_eq!(a.grid(), b.grid());
        }
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn collecting_everything_moves_to_the_next_level() {
        let mut session = MazeSession::new(config(15, 15, MazeAlgorithm::Prim, 3)).unwrap();
        session.generate();
        let start = session.player_start().unwrap();
        let first_maze = session.grid().clone();

        assert_eq!(session.collect(start), CollectOutcome::NothingCollected);

        let targets = collectibles(&session);
        assert_eq!(session.collect(targets[0]), CollectOutcome::Scored { score: 1, target: 3 });
        assert_eq!(session.collect(targets[0]), CollectOutcome::NothingCollected);
        assert_eq!(session.collect(targets[1]), CollectOutcome::Scored { score: 2, target: 3 });
        assert_eq!(session.level(), 1);

        assert_eq!(session.collect(targets[2]), CollectOutcome::LevelComplete { level: 2 });
        assert_eq!(session.level(), 2);
        assert_eq!(session.score(), 0);
        assert_eq!(collectibles(&session).len(), 3);
        assert_ne!(session.grid(), &first_maze);
        assert!(analysis::is_perfect_maze(session.grid()));
    }

    #[test]
    fn switching_algorithm_applies_to_the_next_maze() {
        let mut session = MazeSession::new(config(11, 11, MazeAlgorithm::Dfs, 2)).unwrap();
        session.generate();
        let dfs_maze = session.grid().clone();

        session.set_algorithm(MazeAlgorithm::Prim);
        assert_eq!(session.grid(), &dfs_maze);
        assert_eq!(session.config().algorithm, MazeAlgorithm::Prim);

        session.generate();
        assert!(analysis::is_perfect_maze(session.grid()));
        assert_eq!(session.markers().len(), 3);
    }
}
