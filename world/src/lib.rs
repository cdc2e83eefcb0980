#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative dungeon state for Probable Journey.
//!
//! The world owns a dense [`Grid`] of tiles together with the rooms and halls
//! that have claimed them. Rooms and halls refer to tiles by coordinate only;
//! the grid is the single owner of tile state.

mod grid;
mod hall;
mod room;

use std::collections::BTreeMap;

use probable_journey_core::{DungeonConfig, HallId, RoomId};

pub use grid::{Endpoint, Grid, Tile};
pub use hall::Hall;
pub use room::{Room, RoomLayout};

/// Grid plus every room and hall placed on it.
#[derive(Clone, Debug)]
pub struct Dungeon {
    grid: Grid,
    rooms: BTreeMap<RoomId, Room>,
    halls: BTreeMap<HallId, Hall>,
}

impl Dungeon {
    /// Wraps an existing grid with no rooms or halls.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            rooms: BTreeMap::new(),
            halls: BTreeMap::new(),
        }
    }

    /// Creates an empty dungeon sized from the configured pixel extent.
    #[must_use]
    pub fn from_config(config: &DungeonConfig) -> Self {
        Self::new(Grid::new(
            config.pixel_width,
            config.pixel_height,
            config.metrics,
        ))
    }

    /// Mutable access to the tile grid.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Mutable access to a placed room.
    pub fn room_mut(&mut self, room: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&room)
    }

    /// Registers a room, replacing any room previously stored under the same id.
    pub fn insert_room(&mut self, room: Room) {
        let _ = self.rooms.insert(room.id(), room);
    }

    /// Registers a hall unless one with the same id already exists.
    pub fn insert_hall(&mut self, hall: Hall) {
        let _ = self.halls.entry(hall.id()).or_insert(hall);
    }
}

/// Query functions that provide read-only access to the dungeon.
pub mod query {
    use probable_journey_core::{HallId, RoomId, TileCoord, TileKind};

    use super::{Dungeon, Grid, Hall, Room};

    /// Provides read-only access to the tile grid.
    #[must_use]
    pub fn grid(dungeon: &Dungeon) -> &Grid {
        &dungeon.grid
    }

    /// Looks up a placed room.
    #[must_use]
    pub fn room(dungeon: &Dungeon, room: RoomId) -> Option<&Room> {
        dungeon.rooms.get(&room)
    }

    /// Looks up a placed hall.
    #[must_use]
    pub fn hall(dungeon: &Dungeon, hall: HallId) -> Option<&Hall> {
        dungeon.halls.get(&hall)
    }

    /// Iterates over placed rooms in id order.
    pub fn rooms(dungeon: &Dungeon) -> impl Iterator<Item = &Room> {
        dungeon.rooms.values()
    }

    /// Iterates over placed halls in id order.
    pub fn halls(dungeon: &Dungeon) -> impl Iterator<Item = &Hall> {
        dungeon.halls.values()
    }

    /// Number of rooms placed so far.
    #[must_use]
    pub fn room_count(dungeon: &Dungeon) -> usize {
        dungeon.rooms.len()
    }

    /// Number of halls placed so far.
    #[must_use]
    pub fn hall_count(dungeon: &Dungeon) -> usize {
        dungeon.halls.len()
    }

    /// Coordinates of every tile a host may pick as a path endpoint.
    #[must_use]
    pub fn walkable_tiles(dungeon: &Dungeon) -> Vec<TileCoord> {
        dungeon
            .grid
            .iter()
            .filter(|tile| tile.kind().is_walkable())
            .map(|tile| tile.coord())
            .collect()
    }

    /// Number of tiles currently holding the provided classification.
    #[must_use]
    pub fn count_of_kind(dungeon: &Dungeon, kind: TileKind) -> usize {
        dungeon
            .grid
            .iter()
            .filter(|tile| tile.kind() == kind)
            .count()
    }
}
