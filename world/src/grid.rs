//! Dense tile arena with cached orthogonal adjacency.

use probable_journey_core::{Direction, GridMetrics, HallId, RoomId, TileCoord, TileKind};

/// A single cell of the dungeon grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    coord: TileCoord,
    kind: TileKind,
    room: Option<RoomId>,
    hall: Option<HallId>,
}

impl Tile {
    /// Creates an unclaimed, empty tile at the provided coordinate.
    #[must_use]
    pub const fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            kind: TileKind::Empty,
            room: None,
            hall: None,
        }
    }

    /// Position of the tile within its grid.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Current classification of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Room that claimed the tile, if any.
    #[must_use]
    pub const fn room(&self) -> Option<RoomId> {
        self.room
    }

    /// Hall that claimed the tile, if any.
    #[must_use]
    pub const fn hall(&self) -> Option<HallId> {
        self.hall
    }

    /// Reports whether a room claimed the tile.
    #[must_use]
    pub const fn in_room(&self) -> bool {
        self.room.is_some()
    }

    /// Reports whether a hall claimed the tile.
    #[must_use]
    pub const fn in_hall(&self) -> bool {
        self.hall.is_some()
    }
}

/// Role a host assigns to a clicked tile when setting up a path query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The tile the search starts from.
    Start,
    /// The tile the search attempts to reach.
    End,
}

/// Owns every tile of the dungeon in row-major order.
///
/// Neighbour sets are resolved once at construction through the bounds-checked
/// lookup and never change afterwards; only tile classification and
/// membership mutate.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    metrics: GridMetrics,
    tiles: Vec<Tile>,
    neighbors: Vec<Vec<usize>>,
}

impl Grid {
    /// Creates a grid covering the provided pixel extent.
    #[must_use]
    pub fn new(pixel_width: u32, pixel_height: u32, metrics: GridMetrics) -> Self {
        Self::build(
            metrics.tiles_in(pixel_width),
            metrics.tiles_in(pixel_height),
            metrics,
        )
    }

    /// Creates a grid with explicit tile dimensions and default pixel metrics.
    #[must_use]
    pub fn with_dimensions(columns: u32, rows: u32) -> Self {
        Self::build(columns, rows, GridMetrics::default())
    }

    fn build(columns: u32, rows: u32, metrics: GridMetrics) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);

        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                tiles.push(Tile::new(TileCoord::new(column, row)));
            }
        }

        let mut grid = Self {
            columns,
            rows,
            metrics,
            tiles,
            neighbors: Vec::new(),
        };
        let neighbors: Vec<Vec<usize>> = grid
            .tiles
            .iter()
            .map(|tile| {
                Direction::SCAN_ORDER
                    .iter()
                    .filter_map(|direction| tile.coord.offset(direction.offset()))
                    .filter_map(|coord| grid.index(coord))
                    .collect()
            })
            .collect();
        grid.neighbors = neighbors;
        grid
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Pixel metrics the grid was derived from.
    #[must_use]
    pub const fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    /// Total number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the grid holds no tiles at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterates over every tile in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Retrieves the tile at the provided coordinate, if it lies within the grid.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).and_then(|index| self.tiles.get(index))
    }

    /// Retrieves the tile at signed `(x, y)`, returning `None` for anything off-grid.
    #[must_use]
    pub fn tile_at(&self, x: i64, y: i64) -> Option<&Tile> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        self.tile(TileCoord::new(column, row))
    }

    /// Retrieves the tile drawn under the provided pixel position.
    #[must_use]
    pub fn tile_at_pixel(&self, x: f32, y: f32) -> Option<&Tile> {
        self.metrics
            .tile_at_pixel(x, y)
            .and_then(|coord| self.tile(coord))
    }

    /// Classification of the tile at the provided coordinate.
    #[must_use]
    pub fn kind(&self, coord: TileCoord) -> Option<TileKind> {
        self.tile(coord).map(Tile::kind)
    }

    /// Orthogonal neighbours of the provided tile in scan order.
    pub fn neighbors(&self, coord: TileCoord) -> impl Iterator<Item = &Tile> {
        let indices = match self.index(coord) {
            Some(index) => self.neighbors[index].as_slice(),
            None => &[],
        };
        indices.iter().map(move |&index| &self.tiles[index])
    }

    /// Orthogonal neighbours whose classification is one of `kinds`.
    pub fn neighbors_of_kind<'a>(
        &'a self,
        coord: TileCoord,
        kinds: &'a [TileKind],
    ) -> impl Iterator<Item = &'a Tile> {
        self.neighbors(coord)
            .filter(move |tile| kinds.contains(&tile.kind))
    }

    /// Reclassifies the tile at `coord`. Returns `false` when the coordinate is off-grid.
    pub fn set_kind(&mut self, coord: TileCoord, kind: TileKind) -> bool {
        match self.tile_mut(coord) {
            Some(tile) => {
                tile.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Marks a walkable tile as the start or end of a path query.
    ///
    /// Returns `false` without mutating anything when the tile is missing or is
    /// neither `Floor` nor `Hall`.
    pub fn mark_endpoint(&mut self, coord: TileCoord, endpoint: Endpoint) -> bool {
        let Some(tile) = self.tile_mut(coord) else {
            return false;
        };
        if !tile.kind.is_walkable() {
            return false;
        }

        tile.kind = match endpoint {
            Endpoint::Start => TileKind::StartPoint,
            Endpoint::End => TileKind::EndPoint,
        };
        true
    }

    /// Marks the whole outer ring as padding and returns the ring tiles near each side's midpoint.
    ///
    /// A ring tile qualifies when its column lies strictly within a third of the
    /// column count of the center column, or its row lies strictly within a
    /// third of the row count of the center row. The result is the candidate
    /// pool for the first hall.
    pub fn find_central_perimeter_tiles(&mut self) -> Vec<TileCoord> {
        let columns = i64::from(self.columns);
        let rows = i64::from(self.rows);
        let center_column = (columns - 1) / 2;
        let center_row = (rows - 1) / 2;
        let column_range = columns / 3;
        let row_range = rows / 3;

        let mut central = Vec::new();
        for tile in &mut self.tiles {
            let x = i64::from(tile.coord.column());
            let y = i64::from(tile.coord.row());
            if !(x == 0 || x == columns - 1 || y == 0 || y == rows - 1) {
                continue;
            }

            tile.kind = TileKind::Padding;

            let central_column = (x - center_column).abs() < column_range;
            let central_row = (y - center_row).abs() < row_range;
            if central_column || central_row {
                central.push(tile.coord);
            }
        }

        central
    }

    pub(crate) fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        let index = self.index(coord)?;
        self.tiles.get_mut(index)
    }

    pub(crate) fn claim_for_room(&mut self, coord: TileCoord, room: RoomId, kind: TileKind) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.room = Some(room);
            tile.kind = kind;
        }
    }

    pub(crate) fn claim_for_hall(&mut self, coord: TileCoord, hall: HallId, kind: TileKind) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.hall = Some(hall);
            tile.kind = kind;
        }
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if coord.column() < self.columns && coord.row() < self.rows {
            let row = usize::try_from(coord.row()).ok()?;
            let column = usize::try_from(coord.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
