#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized incremental dungeon construction.
//!
//! Construction starts by walking a hall inward from the middle of one of the
//! map edges and capping it with a room. Every later step picks a room that
//! can still branch, tries a hall outward from one of its unused wall tiles
//! and, when the hall leads into enough empty space, caps it with another
//! room. Each call to [`DungeonBuilder::step`] performs one such attempt so a
//! host can render construction progressively.

use log::{debug, info, trace, warn};
use probable_journey_core::{
    ConfigError, Direction, DungeonConfig, Event, HallId, IVec2, RoomId, SizeRange, TileCoord,
    TileKind,
};
use probable_journey_world::{query, Dungeon, Grid, Hall, Room, RoomLayout, Tile};
use rand::{seq::SliceRandom, Rng};

/// Drives construction of a [`Dungeon`] one attempt at a time.
#[derive(Debug)]
pub struct DungeonBuilder<R> {
    config: DungeonConfig,
    rng: R,
    room_counter: u32,
    hall_counter: u32,
    branchable: Vec<RoomId>,
    progress: f32,
    seeded: bool,
    finished: bool,
}

impl<R: Rng> DungeonBuilder<R> {
    /// Validates the configuration and prepares a builder drawing from `rng`.
    pub fn new(config: DungeonConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            room_counter: 1,
            hall_counter: 1,
            branchable: Vec::new(),
            progress: 0.0,
            seeded: false,
            finished: false,
        })
    }

    /// Configuration the builder was created with.
    #[must_use]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// Fraction of the target room count placed so far, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Number of rooms placed so far.
    #[must_use]
    pub fn rooms_built(&self) -> u32 {
        self.room_counter - 1
    }

    /// Rooms still eligible to spawn halls, in insertion order.
    #[must_use]
    pub fn branchable_rooms(&self) -> &[RoomId] {
        &self.branchable
    }

    /// Reports whether construction reached its terminal state.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Places the first hall and room from the middle of the map edges.
    ///
    /// Candidate edge tiles are drawn at random without replacement until one
    /// yields a hall capped by a room. Returns whether a room was placed; once
    /// the builder has been seeded further calls do nothing and return `false`.
    /// The dungeon must be sized from the builder's configuration, as
    /// [`Dungeon::from_config`] does.
    pub fn seed(&mut self, dungeon: &mut Dungeon, out: &mut Vec<Event>) -> bool {
        if self.seeded {
            return false;
        }
        let grid = query::grid(dungeon);
        debug_assert_eq!(
            (grid.columns(), grid.rows()),
            (self.config.columns(), self.config.rows()),
            "dungeon grid does not match the builder configuration"
        );
        self.seeded = true;

        let mut candidates = dungeon.grid_mut().find_central_perimeter_tiles();
        while !candidates.is_empty() {
            let index = self.rng.gen_range(0..candidates.len());
            let start = candidates.swap_remove(index);

            let Some((tiles, direction)) = self.try_hall(query::grid(dungeon), start) else {
                continue;
            };
            if self
                .end_hall_with_room(dungeon, tiles, direction, out)
                .is_some()
            {
                return true;
            }
        }

        warn!("no edge tile could seed a hall; the dungeon will have no rooms");
        false
    }

    /// Performs one unit of construction work.
    ///
    /// Returns `true` while work remains. Once the target room count is reached
    /// or no room can branch any further the builder finishes, reports
    /// [`Event::ConstructionFinished`] and returns `false` on this and every
    /// later call without touching the dungeon again. Finishing below the
    /// target is a normal outcome.
    pub fn step(&mut self, dungeon: &mut Dungeon, out: &mut Vec<Event>) -> bool {
        if self.finished {
            return false;
        }

        if !self.seeded {
            let _ = self.seed(dungeon, out);
            return true;
        }

        if self.rooms_built() >= self.config.target_rooms || self.branchable.is_empty() {
            self.finish(out);
            return false;
        }

        let pick = self.rng.gen_range(0..self.branchable.len());
        let room_id = self.branchable[pick];
        let Some(room) = dungeon.room_mut(room_id) else {
            let _ = self.branchable.remove(pick);
            return true;
        };

        if room.available_perimeter().is_empty() {
            let _ = self.branchable.remove(pick);
            room.reset_available_perimeter();
            debug!("room {} exhausted its perimeter", room_id.get());
            out.push(Event::RoomRetired { room: room_id });
            return true;
        }

        let index = self.rng.gen_range(0..room.available_perimeter().len());
        let Some(start) = room.take_available(index) else {
            return true;
        };

        if let Some((tiles, direction)) = self.try_hall(query::grid(dungeon), start) {
            if self
                .end_hall_with_room(dungeon, tiles, direction, out)
                .is_none()
            {
                trace!("no room fits beyond hall from {start:?} heading {direction:?}");
            }
        }

        true
    }

    fn finish(&mut self, out: &mut Vec<Event>) {
        self.finished = true;
        self.progress = 1.0;

        let rooms_built = self.rooms_built();
        let target_rooms = self.config.target_rooms;
        if rooms_built < target_rooms {
            info!("construction stalled with {rooms_built} of {target_rooms} rooms");
        } else {
            info!("construction finished with {rooms_built} rooms");
        }
        out.push(Event::ConstructionFinished {
            rooms_built,
            target_rooms,
        });
    }

    /// Walks a straight hall out of `start` into open space.
    ///
    /// The first shuffled direction whose neighbour is `Empty` or `Padding`
    /// is used. The returned tiles begin with `start` followed by one tile per
    /// step of the sampled length; every stepped-to tile must be open.
    fn try_hall(&mut self, grid: &Grid, start: TileCoord) -> Option<(Vec<TileCoord>, Direction)> {
        let mut directions = Direction::SCAN_ORDER;
        directions.shuffle(&mut self.rng);
        let direction = directions.into_iter().find(|direction| {
            start
                .offset(direction.offset())
                .and_then(|coord| grid.kind(coord))
                .is_some_and(TileKind::is_open)
        })?;

        let length = sample(&mut self.rng, self.config.hall_length);
        let mut tiles = Vec::with_capacity(usize::try_from(length).unwrap_or(0) + 1);
        tiles.push(start);

        let mut current = start;
        for _ in 0..length {
            current = current.offset(direction.offset())?;
            if !grid.kind(current).is_some_and(TileKind::is_open) {
                return None;
            }
            tiles.push(current);
        }

        Some((tiles, direction))
    }

    /// Caps a viable hall with a room, committing both on success.
    ///
    /// The hall joins the new room and, when its start tile sits on an existing
    /// room's wall, that room as well.
    fn end_hall_with_room(
        &mut self,
        dungeon: &mut Dungeon,
        tiles: Vec<TileCoord>,
        direction: Direction,
        out: &mut Vec<Event>,
    ) -> Option<RoomId> {
        let start = *tiles.first()?;
        let end = *tiles.last()?;
        let origin_room = query::grid(dungeon).tile(start).and_then(Tile::room);

        let room_id = self.build_room(dungeon, end, direction, out)?;

        let hall_id = HallId::new(self.hall_counter);
        let mut hall = Hall::carve(dungeon.grid_mut(), hall_id, tiles)?;
        self.hall_counter += 1;

        if let Some(room) = dungeon.room_mut(room_id) {
            room.attach_hall(&mut hall);
        }
        if let Some(origin) = origin_room.filter(|origin| *origin != room_id) {
            if let Some(room) = dungeon.room_mut(origin) {
                room.attach_hall(&mut hall);
            }
        }

        debug!(
            "hall {} connects {:?} to room {}",
            hall_id.get(),
            hall.connecting_rooms(),
            room_id.get()
        );
        out.push(Event::HallBuilt {
            hall: hall_id,
            start,
            end,
            direction,
        });
        dungeon.insert_hall(hall);
        self.branchable.push(room_id);

        self.room_counter += 1;
        self.progress =
            (self.rooms_built() as f32 / self.config.target_rooms as f32).clamp(0.0, 1.0);

        Some(room_id)
    }

    /// Samples room dimensions and places a room beyond the hall's end tile.
    fn build_room(
        &mut self,
        dungeon: &mut Dungeon,
        hall_end: TileCoord,
        direction: Direction,
        out: &mut Vec<Event>,
    ) -> Option<RoomId> {
        let width = sample(&mut self.rng, self.config.room_width);
        let height = sample(&mut self.rng, self.config.room_height);
        let extent = IVec2::new(i32::try_from(width).ok()?, i32::try_from(height).ok()?);

        let center = hall_end.offset(direction.offset() * extent)?;
        let grid = query::grid(dungeon);
        let _ = grid.tile(center)?;
        let Some(layout) = try_quad_room(grid, center, width, height) else {
            trace!("room of {width}x{height} around {center:?} overlaps existing terrain");
            return None;
        };

        let room_id = RoomId::new(self.room_counter);
        let room = Room::claim(dungeon.grid_mut(), room_id, layout);
        pad_room(dungeon.grid_mut(), &room);

        debug!(
            "room {} placed around {:?} with half-extent {}x{}",
            room_id.get(),
            center,
            width,
            height
        );
        out.push(Event::RoomBuilt {
            room: room_id,
            center,
            width,
            height,
        });
        dungeon.insert_room(room);
        Some(room_id)
    }
}

/// Builds a dungeon from scratch, stepping the builder until it finishes.
pub fn generate<R: Rng>(
    config: &DungeonConfig,
    rng: R,
) -> Result<(Dungeon, Vec<Event>), ConfigError> {
    let mut builder = DungeonBuilder::new(config.clone(), rng)?;
    let mut dungeon = Dungeon::from_config(config);
    let mut events = Vec::new();
    while builder.step(&mut dungeon, &mut events) {}
    Ok((dungeon, events))
}

fn sample<R: Rng>(rng: &mut R, range: SizeRange) -> u32 {
    rng.gen_range(range.min..=range.max)
}

/// Surveys the `(2·width+1)×(2·height+1)` box around `center`.
///
/// Every tile in the box must exist and be `Empty`. Tiles on both outer
/// columns and rows are corners, tiles on exactly one are perimeter, and the
/// rest are floor.
fn try_quad_room(grid: &Grid, center: TileCoord, width: u32, height: u32) -> Option<RoomLayout> {
    let half_width = i32::try_from(width).ok()?;
    let half_height = i32::try_from(height).ok()?;

    let mut layout = RoomLayout {
        center,
        width,
        height,
        ..RoomLayout::default()
    };

    for dx in -half_width..=half_width {
        for dy in -half_height..=half_height {
            let coord = center.offset(IVec2::new(dx, dy))?;
            if grid.kind(coord)? != TileKind::Empty {
                return None;
            }

            match (dx.abs() == half_width, dy.abs() == half_height) {
                (true, true) => layout.corners.push(coord),
                (false, false) => layout.inner.push(coord),
                _ => layout.perimeter.push(coord),
            }
        }
    }

    Some(layout)
}

/// Surrounds a room with two tiles of padding so later structures keep their distance.
fn pad_room(grid: &mut Grid, room: &Room) {
    const EMPTY: [TileKind; 1] = [TileKind::Empty];

    for &coord in room.perimeter_with_corners() {
        let near: Vec<TileCoord> = grid
            .neighbors_of_kind(coord, &EMPTY)
            .map(Tile::coord)
            .collect();
        for neighbor in near {
            let _ = grid.set_kind(neighbor, TileKind::Padding);

            let far: Vec<TileCoord> = grid
                .neighbors_of_kind(neighbor, &EMPTY)
                .map(Tile::coord)
                .collect();
            for outer in far {
                let _ = grid.set_kind(outer, TileKind::Padding);
            }
        }
    }
}
