//! Checks over a carved grid: is every passage reachable, is the maze free of loops.

use bit_set::BitSet;
use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::utils;

/// Flood fill from `start` across passage tiles joined North, South, East or West.
///
/// The returned set holds the row-major index (`Grid::coordinate_to_index`) of every reached tile.
/// It is empty when `start` is not a passage.
pub fn reachable_passages(grid: &Grid, start: Cartesian2DCoordinate) -> BitSet {
    let mut visited = BitSet::with_capacity(grid.size());

    let start_index = match grid.coordinate_to_index(start) {
        Some(index) if grid.is_passage(start) => index,
        _ => return visited,
    };
    visited.insert(start_index);

    let mut frontier = vec![start];
    while let Some(coord) = frontier.pop() {
        for neighbour in grid.neighbours(coord) {
            if let Some(index) = grid.coordinate_to_index(neighbour) {
                if grid.is_passage(neighbour) && visited.insert(index) {
                    frontier.push(neighbour);
                }
            }
        }
    }

    visited
}

/// Can every passage be reached from every other one?
/// A grid without passages is trivially connected.
pub fn is_fully_connected(grid: &Grid) -> bool {
    match grid.passages().next() {
        Some(first) => reachable_passages(grid, first).len() == grid.passages_count(),
        None => true,
    }
}

/// The passages as an undirected graph, one node per passage tile and one edge per pair of
/// adjacent passage tiles.
pub fn passage_graph(grid: &Grid) -> UnGraph<Cartesian2DCoordinate, ()> {
    let passages_count = grid.passages_count();
    let mut graph = UnGraph::with_capacity(passages_count, passages_count);
    let mut nodes = utils::fnv_hashmap::<Cartesian2DCoordinate, NodeIndex>(passages_count);

    for coord in grid.passages() {
        nodes.insert(coord, graph.add_node(coord));
    }

    // Looking only east and south adds each adjacency once.
    for (&coord, &node) in &nodes {
        for &dir in &[CompassPrimary::East, CompassPrimary::South] {
            if let Some(&other) = coord.offset(dir, 1).and_then(|neighbour| nodes.get(&neighbour)) {
                graph.add_edge(node, other, ());
            }
        }
    }

    graph
}

/// A perfect maze has passages, a single route between any two of them and so no loops:
/// its passage graph is one tree.
pub fn is_perfect_maze(grid: &Grid) -> bool {
    let graph = passage_graph(grid);
    graph.node_count() > 0 && connected_components(&graph) == 1 && !is_cyclic_undirected(&graph)
}
