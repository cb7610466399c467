use std::fmt;

use itertools::Itertools;

use crate::cells::{Cartesian2DCoordinate, Tile};
use crate::grid::Grid;
use crate::placement::{Marker, MarkerKind};
use crate::utils::{self, FnvHashMap};

const WALL: &str = "██";
const PASSAGE: &str = "  ";

/// Overrides how individual tiles are drawn as text.
pub trait GridDisplay {
    /// Render the contents of a tile as text.
    /// The String should be 2 glyphs wide, padded if required.
    /// `None` keeps the plain wall or passage rendering.
    fn render_tile_body(&self, _: Cartesian2DCoordinate) -> Option<String> {
        None
    }
}

/// Shows where the player starts (`S`) and where the collectibles (`o`) are.
#[derive(Debug)]
pub struct MarkersDisplay {
    marker_kinds: FnvHashMap<Cartesian2DCoordinate, MarkerKind>,
}

impl MarkersDisplay {
    pub fn new(markers: &[Marker]) -> MarkersDisplay {
        let mut marker_kinds = utils::fnv_hashmap(markers.len());
        for marker in markers {
            marker_kinds.insert(marker.position, marker.kind);
        }
        MarkersDisplay { marker_kinds }
    }
}

impl GridDisplay for MarkersDisplay {
    fn render_tile_body(&self, coord: Cartesian2DCoordinate) -> Option<String> {
        self.marker_kinds.get(&coord).map(|kind| match *kind {
            MarkerKind::PlayerStart => String::from("S "),
            MarkerKind::Collectible => String::from("o "),
        })
    }
}

/// One line of text per grid row, walls drawn solid.
pub fn render_text(grid: &Grid, display: Option<&dyn GridDisplay>) -> String {
    let render_tile = |tile: &Tile| {
        display
            .and_then(|d| d.render_tile_body(tile.position()))
            .unwrap_or_else(|| String::from(if tile.is_passage() { PASSAGE } else { WALL }))
    };

    grid.iter_row()
        .map(|row| format!("{}\n", row.iter().map(|tile| render_tile(tile)).join("")))
        .collect()
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render_text(self, None))
    }
}
