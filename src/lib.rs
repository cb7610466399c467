//! **tile-mazes** generates perfect mazes on a rectangular grid of wall and passage tiles and
//! places game markers (a player start, collectibles) on the carved passages.

pub mod analysis;
pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod placement;
pub mod renderers;
pub mod session;
pub mod units;
mod utils;
