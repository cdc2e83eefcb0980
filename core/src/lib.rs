#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Probable Journey dungeon engine.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the pure systems that mutate it, and the adapters that present it. The world
//! owns tiles addressed by [`TileCoord`] and classified by [`TileKind`]; the
//! construction and pathfinding systems mutate that world one unit of work per
//! call and report what they did as [`Event`] values so hosts can animate the
//! progress deterministically.

mod config;

pub use glam::IVec2;
use serde::{Deserialize, Serialize};

pub use config::{ConfigError, DungeonConfig, GridMetrics, SizeRange};

/// Events broadcast by systems after mutating the world.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a hall was carved into the grid.
    HallBuilt {
        /// Identifier assigned to the new hall.
        hall: HallId,
        /// First tile of the hall, lying on the map edge or on a room wall.
        start: TileCoord,
        /// Last tile of the hall, doubling as the doorway into its room.
        end: TileCoord,
        /// Direction the hall was walked in from its start tile.
        direction: Direction,
    },
    /// Confirms that a room was placed at the end of a hall.
    RoomBuilt {
        /// Identifier assigned to the new room.
        room: RoomId,
        /// Tile the room's bounding box is centred on.
        center: TileCoord,
        /// Horizontal half-extent of the room, excluding the center column.
        width: u32,
        /// Vertical half-extent of the room, excluding the center row.
        height: u32,
    },
    /// Reports that a room ran out of perimeter and stopped spawning halls.
    RoomRetired {
        /// Identifier of the room removed from the branchable pool.
        room: RoomId,
    },
    /// Reports that construction reached its terminal state.
    ConstructionFinished {
        /// Number of rooms actually placed.
        rooms_built: u32,
        /// Number of rooms the configuration asked for.
        target_rooms: u32,
    },
    /// Announces that a path search was seeded.
    ScanStarted {
        /// Tile the search expands from.
        start: TileCoord,
        /// Tile the search attempts to reach.
        goal: TileCoord,
    },
    /// Reports that a path search reached its goal.
    PathFound {
        /// Tile that terminated the search.
        goal: TileCoord,
        /// Number of nodes expanded before the goal was selected.
        expanded: usize,
    },
    /// Reports that a path search exhausted its frontier without reaching the goal.
    PathUnreachable {
        /// Number of nodes expanded before the frontier emptied.
        expanded: usize,
    },
}

/// Cardinal directions on the tile grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Order in which orthogonal neighbours are visited and stored.
    pub const SCAN_ORDER: [Direction; 4] = [
        Direction::South,
        Direction::East,
        Direction::North,
        Direction::West,
    ];

    /// Unit offset of the direction expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn offset(self) -> IVec2 {
        match self {
            Self::North => IVec2::new(0, -1),
            Self::East => IVec2::new(1, 0),
            Self::South => IVec2::new(0, 1),
            Self::West => IVec2::new(-1, 0),
        }
    }
}

/// Classification that determines a tile's role in the dungeon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Unclaimed space.
    #[default]
    Empty,
    /// Walkable interior of a room.
    Floor,
    /// Boundary of a room or hall.
    Wall,
    /// Corner of a room's boundary.
    Corner,
    /// Walkable corridor tile.
    Hall,
    /// Buffer space that keeps structures from touching.
    Padding,
    /// Water feature. Never produced by construction.
    Water,
    /// Origin of the current path query.
    StartPoint,
    /// Destination of the current path query.
    EndPoint,
    /// Tile discovered by the current path search.
    Explored,
    /// Tile on the traced path.
    Path,
}

impl TileKind {
    /// Reports whether a path query may start or end on this tile.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Floor | Self::Hall)
    }

    /// Reports whether a path search may expand into this tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Floor | Self::Hall | Self::EndPoint)
    }

    /// Reports whether new halls may be carved through this tile.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Empty | Self::Padding)
    }

    /// Reports whether the tile carries state left behind by a path query.
    #[must_use]
    pub const fn is_search_marker(self) -> bool {
        matches!(
            self,
            Self::Explored | Self::StartPoint | Self::EndPoint | Self::Path
        )
    }
}

/// Unique identifier assigned to a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a hall.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HallId(u32);

impl HallId {
    /// Creates a new hall identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile (its `x`).
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile (its `y`).
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Translates the coordinate, returning `None` when either axis would go negative.
    #[must_use]
    pub fn offset(self, delta: IVec2) -> Option<TileCoord> {
        let column = i64::from(self.column) + i64::from(delta.x);
        let row = i64::from(self.row) + i64::from(delta.y);
        Some(Self::new(
            u32::try_from(column).ok()?,
            u32::try_from(row).ok()?,
        ))
    }

    /// Computes the Manhattan distance between two tile coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: TileCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Computes the straight-line distance between two tile coordinates.
    #[must_use]
    pub fn euclidean_distance(self, other: TileCoord) -> f64 {
        let dx = f64::from(self.column.abs_diff(other.column));
        let dy = f64::from(self.row.abs_diff(other.row));
        (dx * dx + dy * dy).sqrt()
    }
}
