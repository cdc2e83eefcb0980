//! Rectangular rooms claimed out of empty grid space.

use std::collections::BTreeSet;

use probable_journey_core::{HallId, RoomId, TileCoord, TileKind};

use crate::{Grid, Hall};

/// Tile sets describing where a room would sit, gathered before any id is assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoomLayout {
    /// Tile the bounding box is centred on.
    pub center: TileCoord,
    /// Horizontal half-extent of the bounding box.
    pub width: u32,
    /// Vertical half-extent of the bounding box.
    pub height: u32,
    /// Interior tiles that become floor.
    pub inner: Vec<TileCoord>,
    /// Edge tiles, excluding corners, that become wall.
    pub perimeter: Vec<TileCoord>,
    /// The four corner tiles.
    pub corners: Vec<TileCoord>,
}

/// A room placed on the grid.
#[derive(Clone, Debug)]
pub struct Room {
    id: RoomId,
    center: TileCoord,
    width: u32,
    height: u32,
    inner: Vec<TileCoord>,
    perimeter: Vec<TileCoord>,
    corners: Vec<TileCoord>,
    perimeter_with_corners: Vec<TileCoord>,
    available_perimeter: Vec<TileCoord>,
    halls: BTreeSet<HallId>,
    hall_starts: Vec<TileCoord>,
}

impl Room {
    /// Claims the layout's tiles for a new room with the provided identifier.
    ///
    /// Inner tiles become `Floor`, perimeter tiles `Wall` and corner tiles
    /// `Corner`; all of them record the room's id.
    pub fn claim(grid: &mut Grid, id: RoomId, layout: RoomLayout) -> Self {
        for &coord in &layout.inner {
            grid.claim_for_room(coord, id, TileKind::Floor);
        }
        for &coord in &layout.perimeter {
            grid.claim_for_room(coord, id, TileKind::Wall);
        }
        for &coord in &layout.corners {
            grid.claim_for_room(coord, id, TileKind::Corner);
        }

        let perimeter_with_corners = layout
            .perimeter
            .iter()
            .chain(layout.corners.iter())
            .copied()
            .collect();

        Self {
            id,
            center: layout.center,
            width: layout.width,
            height: layout.height,
            available_perimeter: layout.perimeter.clone(),
            inner: layout.inner,
            perimeter: layout.perimeter,
            corners: layout.corners,
            perimeter_with_corners,
            halls: BTreeSet::new(),
            hall_starts: Vec::new(),
        }
    }

    /// Identifier of the room.
    #[must_use]
    pub const fn id(&self) -> RoomId {
        self.id
    }

    /// Tile the room is centred on.
    #[must_use]
    pub const fn center(&self) -> TileCoord {
        self.center
    }

    /// Horizontal half-extent.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Vertical half-extent.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Full bounding box measured in tiles, walls included.
    #[must_use]
    pub const fn footprint(&self) -> (u32, u32) {
        (2 * self.width + 1, 2 * self.height + 1)
    }

    /// Floor tiles.
    #[must_use]
    pub fn inner_tiles(&self) -> &[TileCoord] {
        &self.inner
    }

    /// Wall tiles, corners excluded.
    #[must_use]
    pub fn perimeter_tiles(&self) -> &[TileCoord] {
        &self.perimeter
    }

    /// Corner tiles.
    #[must_use]
    pub fn corner_tiles(&self) -> &[TileCoord] {
        &self.corners
    }

    /// Wall and corner tiles together, fixed at creation.
    #[must_use]
    pub fn perimeter_with_corners(&self) -> &[TileCoord] {
        &self.perimeter_with_corners
    }

    /// Wall tiles that have not yet been tried as hall starts.
    #[must_use]
    pub fn available_perimeter(&self) -> &[TileCoord] {
        &self.available_perimeter
    }

    /// Halls connected to this room.
    #[must_use]
    pub fn halls(&self) -> &BTreeSet<HallId> {
        &self.halls
    }

    /// Removes and returns the available perimeter tile at `index`.
    ///
    /// The last tile is moved into the vacated slot.
    pub fn take_available(&mut self, index: usize) -> Option<TileCoord> {
        if index < self.available_perimeter.len() {
            Some(self.available_perimeter.swap_remove(index))
        } else {
            None
        }
    }

    /// Restores the available perimeter from the wall tiles, minus every connected hall's start.
    pub fn reset_available_perimeter(&mut self) {
        self.available_perimeter = self
            .perimeter
            .iter()
            .copied()
            .filter(|coord| !self.hall_starts.contains(coord))
            .collect();
    }

    /// Connects a hall to this room, recording the room on the hall as well.
    pub fn attach_hall(&mut self, hall: &mut Hall) {
        if self.halls.insert(hall.id()) {
            self.hall_starts.push(hall.start());
        }
        hall.connect_room(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_layout(center: TileCoord) -> RoomLayout {
        let mut layout = RoomLayout {
            center,
            width: 1,
            height: 1,
            ..RoomLayout::default()
        };
        for dx in -1i32..=1 {
            for dy in -1i32..=1 {
                let Some(coord) = center.offset(probable_journey_core::IVec2::new(dx, dy)) else {
                    continue;
                };
                match (dx.abs() == 1, dy.abs() == 1) {
                    (true, true) => layout.corners.push(coord),
                    (false, false) => layout.inner.push(coord),
                    _ => layout.perimeter.push(coord),
                }
            }
        }
        layout
    }

    #[test]
    fn claim_classifies_tiles_and_records_membership() {
        let mut grid = Grid::with_dimensions(5, 5);
        let room = Room::claim(&mut grid, RoomId::new(3), square_layout(TileCoord::new(2, 2)));

        assert_eq!(room.footprint(), (3, 3));
        for &coord in room.inner_tiles() {
            assert_eq!(grid.kind(coord), Some(TileKind::Floor));
        }
        for &coord in room.perimeter_tiles() {
            assert_eq!(grid.kind(coord), Some(TileKind::Wall));
        }
        for &coord in room.corner_tiles() {
            assert_eq!(grid.kind(coord), Some(TileKind::Corner));
        }
        for &coord in room.perimeter_with_corners() {
            assert_eq!(
                grid.tile(coord).and_then(|tile| tile.room()),
                Some(RoomId::new(3))
            );
        }
        assert_eq!(room.perimeter_with_corners().len(), 8);
        assert_eq!(room.available_perimeter(), room.perimeter_tiles());
    }

    #[test]
    fn reset_excludes_hall_start_tiles() {
        let mut grid = Grid::with_dimensions(6, 6);
        let mut room = Room::claim(&mut grid, RoomId::new(1), square_layout(TileCoord::new(2, 2)));
        let door = TileCoord::new(2, 3);
        let outside = TileCoord::new(2, 4);
        let mut hall = Hall::carve(&mut grid, HallId::new(1), vec![door, outside])
            .expect("hall has tiles");

        room.attach_hall(&mut hall);
        while room.take_available(0).is_some() {}
        assert!(room.available_perimeter().is_empty());

        room.reset_available_perimeter();
        assert_eq!(room.available_perimeter().len(), 3);
        assert!(!room.available_perimeter().contains(&door));
        assert!(hall.connecting_rooms().contains(&RoomId::new(1)));
        assert!(room.halls().contains(&HallId::new(1)));
    }
}
