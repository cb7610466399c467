use std::fmt;

use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::units::{ColumnIndex, RowIndex};

/// A tile position on the grid. `x` runs west to east, `y` north to south.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

pub type CoordinateSmallVec = SmallVec<[Cartesian2DCoordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

pub const COMPASS_DIRECTIONS: [CompassPrimary; 4] = [CompassPrimary::North,
                                                     CompassPrimary::South,
                                                     CompassPrimary::East,
                                                     CompassPrimary::West];

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    /// Creates a new coordinate `distance` tiles away in the given direction.
    /// Returns None if the coordinate is not representable, i.e. it would go
    /// north of row 0 or west of column 0 (or overflow east/south).
    /// Whether it is inside a particular grid is for the grid to decide.
    pub fn offset(self, direction: CompassPrimary, distance: u32) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (self.x, self.y);
        match direction {
            CompassPrimary::North => y.checked_sub(distance).map(|y| Cartesian2DCoordinate { x, y }),
            CompassPrimary::South => y.checked_add(distance).map(|y| Cartesian2DCoordinate { x, y }),
            CompassPrimary::East => x.checked_add(distance).map(|x| Cartesian2DCoordinate { x, y }),
            CompassPrimary::West => x.checked_sub(distance).map(|x| Cartesian2DCoordinate { x, y }),
        }
    }

    /// The tile halfway between two coordinates, rounding towards the origin.
    /// For two lattice cells 2 apart this is the wall tile separating them.
    #[inline]
    pub fn midpoint(self, other: Cartesian2DCoordinate) -> Cartesian2DCoordinate {
        let mid = |a: u32, b: u32| ((a as u64 + b as u64) / 2) as u32;
        Cartesian2DCoordinate::new(mid(self.x, other.x), mid(self.y, other.y))
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub enum TileState {
    Wall,
    Passage,
}

impl Default for TileState {
    fn default() -> TileState {
        TileState::Wall
    }
}

/// One cell of the maze.
///
/// A tile only ever changes through `change_state` and the (Prim only) border flag.
/// The position is fixed when the grid is built.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Tile {
    state: TileState,
    is_border_tile: bool,
    position: Cartesian2DCoordinate,
}

impl Tile {
    pub fn new(position: Cartesian2DCoordinate) -> Tile {
        Tile {
            state: TileState::Wall,
            is_border_tile: false,
            position,
        }
    }

    #[inline]
    pub fn state(&self) -> TileState {
        self.state
    }

    #[inline]
    pub fn position(&self) -> Cartesian2DCoordinate {
        self.position
    }

    /// Set by the Prim carver on frontier tiles that lie outside the carvable interior.
    #[inline]
    pub fn is_border_tile(&self) -> bool {
        self.is_border_tile
    }

    #[inline]
    pub fn is_wall(&self) -> bool {
        self.state == TileState::Wall
    }

    #[inline]
    pub fn is_passage(&self) -> bool {
        self.state == TileState::Passage
    }

    #[inline]
    pub fn change_state(&mut self, new_state: TileState) {
        self.state = new_state;
    }

    #[inline]
    pub(crate) fn mark_border_tile(&mut self) {
        self.is_border_tile = true;
    }

    pub(crate) fn reset(&mut self) {
        self.state = TileState::Wall;
        self.is_border_tile = false;
    }
}
