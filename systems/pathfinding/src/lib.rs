#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stepped best-first path search over a constructed dungeon.
//!
//! The search expands one node per call to [`Pathfinder::step`] so a host can
//! animate the frontier. Discovered tiles are reclassified `Explored` on the
//! grid as they are found, and [`Pathfinder::clear`] reverts every marker the
//! search and its host left behind.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use probable_journey_core::{Event, TileCoord, TileKind};
use probable_journey_world::{Grid, Tile};

/// Search node wrapping a discovered tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathNode {
    tile: TileCoord,
    cost_from_start: u32,
    total_cost: f64,
    parent: Option<usize>,
}

impl PathNode {
    /// Tile the node stands on.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Number of steps from the start along the recorded parent chain.
    #[must_use]
    pub const fn cost_from_start(&self) -> u32 {
        self.cost_from_start
    }

    /// Parent's cost plus this node's heuristic, fixed when the node was discovered.
    #[must_use]
    pub const fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Incremental best-first search between two tiles.
///
/// Selection minimizes steps taken plus the straight-line distance to the
/// goal, so with unit step costs this behaves like A*. Nodes already on the
/// open list keep the parent they were discovered with even when a cheaper
/// route reaches them later, so the traced path is not guaranteed to be
/// shortest.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    nodes: Vec<PathNode>,
    open: Vec<usize>,
    discovered: BTreeMap<TileCoord, usize>,
    closed: BTreeSet<TileCoord>,
    start: Option<TileCoord>,
    goal: Option<TileCoord>,
    final_node: Option<usize>,
    working: bool,
    expanded: usize,
}

impl Pathfinder {
    /// Creates an idle pathfinder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a search is in progress.
    #[must_use]
    pub const fn working(&self) -> bool {
        self.working
    }

    /// Number of nodes expanded by the current or most recent search.
    #[must_use]
    pub const fn expanded(&self) -> usize {
        self.expanded
    }

    /// Tile the current or most recent search started from.
    #[must_use]
    pub const fn start(&self) -> Option<TileCoord> {
        self.start
    }

    /// Tile the current or most recent search is heading to.
    #[must_use]
    pub const fn goal(&self) -> Option<TileCoord> {
        self.goal
    }

    /// Nodes still waiting to be expanded, in insertion order.
    pub fn open_nodes(&self) -> impl Iterator<Item = &PathNode> {
        self.open.iter().filter_map(|&index| self.nodes.get(index))
    }

    /// Seeds a new search from `start` toward `goal`, discarding any previous session.
    ///
    /// Endpoints are not validated; hosts are expected to offer only walkable
    /// tiles.
    pub fn begin_scan(&mut self, start: TileCoord, goal: TileCoord, out: &mut Vec<Event>) {
        self.reset();
        self.start = Some(start);
        self.goal = Some(goal);
        self.nodes.push(PathNode {
            tile: start,
            cost_from_start: 0,
            total_cost: 0.0,
            parent: None,
        });
        self.open.push(0);
        let _ = self.discovered.insert(start, 0);
        self.working = true;

        debug!("path scan from {start:?} to {goal:?}");
        out.push(Event::ScanStarted { start, goal });
    }

    /// Expands the most promising open node.
    ///
    /// Returns `true` only on the call that selects the goal. An empty open
    /// list ends the search as unreachable; in both cases [`Self::working`]
    /// becomes `false`. Calls made while idle do nothing and return `false`.
    pub fn step(&mut self, grid: &mut Grid, out: &mut Vec<Event>) -> bool {
        if !self.working {
            return false;
        }
        let Some(goal) = self.goal else {
            self.working = false;
            return false;
        };

        let Some(position) = self.best_option(goal) else {
            self.working = false;
            debug!("path scan exhausted after {} expansions", self.expanded);
            out.push(Event::PathUnreachable {
                expanded: self.expanded,
            });
            return false;
        };
        let current = self.open[position];
        let node = self.nodes[current];

        if node.tile == goal {
            self.final_node = Some(current);
            self.working = false;
            debug!("path to {goal:?} found after {} expansions", self.expanded);
            out.push(Event::PathFound {
                goal,
                expanded: self.expanded,
            });
            return true;
        }

        let _ = self.open.remove(position);
        let _ = self.closed.insert(node.tile);
        self.expanded += 1;

        let frontier: Vec<TileCoord> = grid
            .neighbors(node.tile)
            .filter(|tile| tile.kind().is_traversable())
            .map(Tile::coord)
            .collect();
        for neighbor in frontier {
            if self.closed.contains(&neighbor) || self.discovered.contains_key(&neighbor) {
                continue;
            }

            if neighbor != goal {
                let _ = grid.set_kind(neighbor, TileKind::Explored);
            }

            let index = self.nodes.len();
            self.nodes.push(PathNode {
                tile: neighbor,
                cost_from_start: node.cost_from_start + 1,
                total_cost: f64::from(node.cost_from_start) + heuristic(neighbor, goal),
                parent: Some(current),
            });
            self.open.push(index);
            let _ = self.discovered.insert(neighbor, index);
        }

        false
    }

    /// Tiles between start and goal in goal-to-start order, both endpoints excluded.
    ///
    /// Returns `None` unless the most recent search reached its goal.
    #[must_use]
    pub fn trace_path(&self) -> Option<Vec<TileCoord>> {
        let goal = self.final_node?;
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(goal)?.parent;
        while let Some(index) = cursor {
            let node = self.nodes.get(index)?;
            if node.parent.is_none() {
                break;
            }
            path.push(node.tile);
            cursor = node.parent;
        }
        Some(path)
    }

    /// Steps the current search to completion and marks the traced path on the grid.
    ///
    /// Returns the path in start-to-goal order, or `None` when the goal is
    /// unreachable or no search is active.
    pub fn run_to_completion(
        &mut self,
        grid: &mut Grid,
        out: &mut Vec<Event>,
    ) -> Option<Vec<TileCoord>> {
        while self.working {
            if self.step(grid, out) {
                let mut path = self.trace_path()?;
                path.reverse();
                for &coord in &path {
                    let _ = grid.set_kind(coord, TileKind::Path);
                }
                return Some(path);
            }
        }
        None
    }

    /// Ends any session and reverts search markers on the grid.
    ///
    /// `Explored`, `StartPoint`, `EndPoint` and `Path` tiles return to `Hall`
    /// when a hall claimed them and to `Floor` otherwise. Reverting everything
    /// to `Floor` would turn searched halls into floor, so hall membership
    /// decides instead.
    pub fn clear(&mut self, grid: &mut Grid) {
        self.reset();

        let markers: Vec<(TileCoord, bool)> = grid
            .iter()
            .filter(|tile| tile.kind().is_search_marker())
            .map(|tile| (tile.coord(), tile.in_hall()))
            .collect();
        for (coord, in_hall) in markers {
            let kind = if in_hall {
                TileKind::Hall
            } else {
                TileKind::Floor
            };
            let _ = grid.set_kind(coord, kind);
        }
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.open.clear();
        self.discovered.clear();
        self.closed.clear();
        self.start = None;
        self.goal = None;
        self.final_node = None;
        self.working = false;
        self.expanded = 0;
    }

    /// Position within the open list of the node with the lowest estimate.
    ///
    /// Ties keep the earliest inserted node.
    fn best_option(&self, goal: TileCoord) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (position, &index) in self.open.iter().enumerate() {
            let node = &self.nodes[index];
            let estimate = f64::from(node.cost_from_start) + heuristic(node.tile, goal);
            if best.map_or(true, |(_, lowest)| estimate < lowest) {
                best = Some((position, estimate));
            }
        }
        best.map(|(position, _)| position)
    }
}

fn heuristic(tile: TileCoord, goal: TileCoord) -> f64 {
    tile.euclidean_distance(goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor(length: u32) -> Grid {
        let mut grid = Grid::with_dimensions(length, 3);
        for column in 0..length {
            assert!(grid.set_kind(TileCoord::new(column, 1), TileKind::Floor));
        }
        grid
    }

    #[test]
    fn idle_pathfinder_does_nothing() {
        let mut grid = corridor(4);
        let mut pathfinder = Pathfinder::new();
        let mut events = Vec::new();

        assert!(!pathfinder.working());
        assert!(!pathfinder.step(&mut grid, &mut events));
        assert!(pathfinder.trace_path().is_none());
        assert!(events.is_empty());
    }

    #[test]
    fn straight_corridor_is_walked_in_order() {
        let mut grid = corridor(5);
        let start = TileCoord::new(0, 1);
        let goal = TileCoord::new(4, 1);
        assert!(grid.mark_endpoint(start, probable_journey_world::Endpoint::Start));
        assert!(grid.mark_endpoint(goal, probable_journey_world::Endpoint::End));

        let mut pathfinder = Pathfinder::new();
        let mut events = Vec::new();
        pathfinder.begin_scan(start, goal, &mut events);
        assert!(pathfinder.working());

        let mut steps = 0;
        while !pathfinder.step(&mut grid, &mut events) {
            steps += 1;
            assert!(pathfinder.working(), "corridor is connected");
        }
        assert_eq!(steps, 4, "one expansion per tile before the goal");
        assert!(!pathfinder.working());

        let path = pathfinder.trace_path().expect("goal reached");
        assert_eq!(
            path,
            vec![TileCoord::new(3, 1), TileCoord::new(2, 1), TileCoord::new(1, 1)]
        );
        assert_eq!(grid.kind(goal), Some(TileKind::EndPoint), "goal never explored");
        assert_eq!(grid.kind(TileCoord::new(2, 1)), Some(TileKind::Explored));
        assert_eq!(
            events.last(),
            Some(&Event::PathFound { goal, expanded: 4 })
        );
    }

    #[test]
    fn discovered_nodes_record_parent_cost_and_heuristic() {
        let mut grid = corridor(3);
        let mut pathfinder = Pathfinder::new();
        let mut events = Vec::new();
        pathfinder.begin_scan(TileCoord::new(0, 1), TileCoord::new(2, 1), &mut events);

        assert!(!pathfinder.step(&mut grid, &mut events));
        let open: Vec<PathNode> = pathfinder.open_nodes().copied().collect();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].tile(), TileCoord::new(1, 1));
        assert_eq!(open[0].cost_from_start(), 1);
        assert!((open[0].total_cost() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn open_nodes_keep_their_first_parent() {
        // S . . . .
        // . # # . .
        // . . . . G
        let mut grid = Grid::with_dimensions(5, 3);
        for coord in grid.iter().map(Tile::coord).collect::<Vec<_>>() {
            assert!(grid.set_kind(coord, TileKind::Floor));
        }
        for wall in [TileCoord::new(1, 1), TileCoord::new(2, 1)] {
            assert!(grid.set_kind(wall, TileKind::Wall));
        }
        let start = TileCoord::new(0, 0);
        let goal = TileCoord::new(4, 2);

        let mut pathfinder = Pathfinder::new();
        let mut events = Vec::new();
        pathfinder.begin_scan(start, goal, &mut events);
        while !pathfinder.step(&mut grid, &mut events) {
            assert!(pathfinder.working(), "goal is reachable");
        }
        assert_eq!(pathfinder.expanded(), 11);

        // (2, 2) was first reached over the top row through (3, 2) at cost 6.
        // (1, 2) was expanded afterwards at cost 3 and offered a cost of 4,
        // which the open node ignores.
        let revisited = pathfinder
            .open_nodes()
            .find(|node| node.tile() == TileCoord::new(2, 2))
            .copied()
            .expect("(2, 2) is still open");
        assert_eq!(revisited.cost_from_start(), 6);
        assert!((revisited.total_cost() - 7.0).abs() < f64::EPSILON);

        assert_eq!(
            pathfinder.trace_path(),
            Some(vec![
                TileCoord::new(3, 2),
                TileCoord::new(3, 1),
                TileCoord::new(3, 0),
                TileCoord::new(2, 0),
                TileCoord::new(1, 0),
            ])
        );
    }

    #[test]
    fn heuristic_is_straight_line_distance() {
        let estimate = heuristic(TileCoord::new(0, 0), TileCoord::new(3, 4));
        assert!((estimate - 5.0).abs() < f64::EPSILON);
    }
}
