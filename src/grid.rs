use std::fmt;
use std::slice;

use rand::Rng;
use rand_xorshift::XorShiftRng;
use thiserror::Error;

use crate::cells::{Cartesian2DCoordinate, CoordinateSmallVec, TileState, Tile, COMPASS_DIRECTIONS};
use crate::units::{ColumnIndex, Height, RowIndex, Width};

/// The rectangular tile grid that the carvers work on.
///
/// Tiles are stored densely in row-major order and every coordinate
/// `0 <= x < width, 0 <= y < height` has exactly one tile.
/// The outermost ring of tiles is never part of a finished maze.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    width: Width,
    height: Height,
    tiles: Vec<Tile>,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Error)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}: both sides must be at least 3 tiles and fit a u32 coordinate")]
    InvalidDimension { width: usize, height: usize },
    #[error("coordinate {0} is outside the grid")]
    OutOfBounds(Cartesian2DCoordinate),
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, passages: {:?}",
               self.width, self.height, self.passages_count())
    }
}

impl Grid {
    /// A maze needs at least one interior tile framed by walls.
    pub const MIN_DIMENSION: usize = 3;

    /// Check that a `width` * `height` grid can be built, returning its tile count.
    pub fn check_dimensions(width: Width, height: Height) -> Result<usize, GridError> {
        let (Width(w), Height(h)) = (width, height);
        let invalid = GridError::InvalidDimension { width: w, height: h };

        if w < Grid::MIN_DIMENSION || h < Grid::MIN_DIMENSION ||
           w > u32::MAX as usize || h > u32::MAX as usize {
            return Err(invalid);
        }
        w.checked_mul(h).ok_or(invalid)
    }

    /// Build a `width` * `height` grid of wall tiles.
    pub fn new(width: Width, height: Height) -> Result<Grid, GridError> {
        let tiles_count = Grid::check_dimensions(width, height)?;
        let w = width.0;

        let tiles = (0..tiles_count)
            .map(|index| Tile::new(Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(index % w),
                                                                                  RowIndex(index / w))))
            .collect();

        Ok(Grid { width, height, tiles })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Convert a grid coordinate to a one dimensional row-major index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width.0 + coord.x as usize)
        } else {
            None
        }
    }

    pub fn tile_at(&self, coord: Cartesian2DCoordinate) -> Result<&Tile, GridError> {
        self.coordinate_to_index(coord)
            .map(|index| &self.tiles[index])
            .ok_or(GridError::OutOfBounds(coord))
    }

    pub fn set_tile_state(&mut self,
                          coord: Cartesian2DCoordinate,
                          state: TileState)
                          -> Result<(), GridError> {
        let index = self.coordinate_to_index(coord).ok_or(GridError::OutOfBounds(coord))?;
        self.tiles[index].change_state(state);
        Ok(())
    }

    /// The region that may ever become a passage: everything inside the outer ring.
    #[inline]
    pub fn is_interior(&self, coord: Cartesian2DCoordinate) -> bool {
        let (x, y) = (coord.x as usize, coord.y as usize);
        x > 0 && x < self.width.0 - 1 && y > 0 && y < self.height.0 - 1
    }

    /// Note that coordinates outside the grid are not on the ring.
    #[inline]
    pub fn is_on_boundary_ring(&self, coord: Cartesian2DCoordinate) -> bool {
        self.is_valid_coordinate(coord) && !self.is_interior(coord)
    }

    /// Out of bounds coordinates are not walls, there is nothing there to carve.
    #[inline]
    pub fn is_wall(&self, coord: Cartesian2DCoordinate) -> bool {
        self.tile_at(coord).map_or(false, Tile::is_wall)
    }

    #[inline]
    pub fn is_passage(&self, coord: Cartesian2DCoordinate) -> bool {
        self.tile_at(coord).map_or(false, Tile::is_passage)
    }

    #[inline]
    pub fn is_border_tile(&self, coord: Cartesian2DCoordinate) -> bool {
        self.tile_at(coord).map_or(false, Tile::is_border_tile)
    }

    /// Turn every tile back into a wall and forget the border flags, ready for the next maze.
    pub fn reset_to_all_walls(&mut self) {
        for tile in &mut self.tiles {
            tile.reset();
        }
    }

    /// Wall off the outer ring.
    /// Run after every carve so no algorithm can leave an opening on the edge of the maze.
    pub fn force_boundary_to_walls(&mut self) {
        let (w, h) = (self.width.0, self.height.0);
        for x in 0..w {
            self.tiles[x].change_state(TileState::Wall);
            self.tiles[(h - 1) * w + x].change_state(TileState::Wall);
        }
        for y in 0..h {
            self.tiles[y * w].change_state(TileState::Wall);
            self.tiles[y * w + w - 1].change_state(TileState::Wall);
        }
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<Tile> {
        self.tiles.iter()
    }

    /// Rows of tiles from north to south.
    #[inline]
    pub fn iter_row(&self) -> slice::Chunks<Tile> {
        self.tiles.chunks(self.width.0)
    }

    /// Coordinates of all passage tiles in row-major order.
    pub fn passages<'a>(&'a self) -> impl Iterator<Item = Cartesian2DCoordinate> + 'a {
        self.tiles.iter().filter(|tile| tile.is_passage()).map(Tile::position)
    }

    pub fn passages_count(&self) -> usize {
        self.tiles.iter().filter(|tile| tile.is_passage()).count()
    }

    /// A uniformly random coordinate strictly inside the outer ring.
    pub fn random_interior_cell(&self, rng: &mut XorShiftRng) -> Cartesian2DCoordinate {
        let x = rng.gen_range(1..self.width.0 - 1);
        let y = rng.gen_range(1..self.height.0 - 1);
        Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(x), RowIndex(y))
    }

    /// Tiles to the North, South, East or West of a coordinate that lie on the grid.
    pub fn neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        self.neighbours_at_distance(coord, 1)
    }

    /// Tiles two steps away in each compass direction that lie on the grid (interior or ring).
    /// These are the carving lattice neighbours; the tile in between is the wall separating them.
    pub fn lattice_neighbours(&self, coord: Cartesian2DCoordinate) -> CoordinateSmallVec {
        self.neighbours_at_distance(coord, 2)
    }

    fn neighbours_at_distance(&self, coord: Cartesian2DCoordinate, distance: u32) -> CoordinateSmallVec {
        COMPASS_DIRECTIONS.iter()
            .filter_map(|&dir| coord.offset(dir, distance))
            .filter(|&neighbour| self.is_valid_coordinate(neighbour))
            .collect()
    }

    #[inline]
    pub(crate) fn carve_passage(&mut self, coord: Cartesian2DCoordinate) {
        if let Some(index) = self.coordinate_to_index(coord) {
            self.tiles[index].change_state(TileState::Passage);
        }
    }

    #[inline]
    pub(crate) fn mark_border_tile(&mut self, coord: Cartesian2DCoordinate) {
        if let Some(index) = self.coordinate_to_index(coord) {
            self.tiles[index].mark_border_tile();
        }
    }
}
