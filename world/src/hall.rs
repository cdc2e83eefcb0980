//! Straight corridors carved between rooms.

use std::collections::BTreeSet;

use probable_journey_core::{HallId, RoomId, TileCoord, TileKind};

use crate::Grid;

/// Classifications a hall converts into its own walls.
const CARVABLE: [TileKind; 3] = [TileKind::Empty, TileKind::Padding, TileKind::Corner];

/// A corridor placed on the grid.
#[derive(Clone, Debug)]
pub struct Hall {
    id: HallId,
    tiles: Vec<TileCoord>,
    connecting_rooms: BTreeSet<RoomId>,
}

impl Hall {
    /// Carves the provided tiles into the grid as a new hall.
    ///
    /// Every hall tile becomes `Hall`; every orthogonal neighbour that is still
    /// `Empty`, `Padding` or `Corner` becomes `Wall`. Both record the hall's id.
    /// Returns `None` without touching the grid when `tiles` is empty.
    pub fn carve(grid: &mut Grid, id: HallId, tiles: Vec<TileCoord>) -> Option<Self> {
        if tiles.is_empty() {
            return None;
        }

        for &coord in &tiles {
            grid.claim_for_hall(coord, id, TileKind::Hall);

            let walls: Vec<TileCoord> = grid
                .neighbors_of_kind(coord, &CARVABLE)
                .map(|tile| tile.coord())
                .collect();
            for wall in walls {
                grid.claim_for_hall(wall, id, TileKind::Wall);
            }
        }

        Some(Self {
            id,
            tiles,
            connecting_rooms: BTreeSet::new(),
        })
    }

    /// Identifier of the hall.
    #[must_use]
    pub const fn id(&self) -> HallId {
        self.id
    }

    /// Hall tiles in walking order.
    #[must_use]
    pub fn tiles(&self) -> &[TileCoord] {
        &self.tiles
    }

    /// First tile of the hall.
    #[must_use]
    pub fn start(&self) -> TileCoord {
        self.tiles[0]
    }

    /// Last tile of the hall.
    #[must_use]
    pub fn end(&self) -> TileCoord {
        self.tiles[self.tiles.len() - 1]
    }

    /// Rooms this hall connects.
    #[must_use]
    pub fn connecting_rooms(&self) -> &BTreeSet<RoomId> {
        &self.connecting_rooms
    }

    pub(crate) fn connect_room(&mut self, room: RoomId) {
        let _ = self.connecting_rooms.insert(room);
    }
}
