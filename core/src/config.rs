//! Construction parameters accepted by the dungeon builder.

use serde::Deserialize;
use thiserror::Error;

use crate::TileCoord;

/// Pixel geometry used to map between screen space and tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GridMetrics {
    /// Side length of a drawn tile in pixels.
    pub tile_size: u32,
    /// Gap left between neighbouring tiles in pixels.
    pub margin: u32,
}

impl GridMetrics {
    /// Creates metrics from an explicit tile size and margin.
    #[must_use]
    pub const fn new(tile_size: u32, margin: u32) -> Self {
        Self { tile_size, margin }
    }

    /// Distance in pixels between the origins of neighbouring tiles.
    #[must_use]
    pub const fn pitch(&self) -> u32 {
        self.tile_size.saturating_add(self.margin)
    }

    /// Number of whole tiles that fit into the provided pixel extent.
    #[must_use]
    pub fn tiles_in(&self, pixels: u32) -> u32 {
        pixels.checked_div(self.pitch()).unwrap_or(0)
    }

    /// Upper-left pixel of the tile at the provided coordinate.
    #[must_use]
    pub fn pixel_origin(&self, coord: TileCoord) -> (u32, u32) {
        (
            coord.column().saturating_mul(self.pitch()),
            coord.row().saturating_mul(self.pitch()),
        )
    }

    /// Tile coordinate containing the provided pixel position, ignoring grid bounds.
    #[must_use]
    pub fn tile_at_pixel(&self, x: f32, y: f32) -> Option<TileCoord> {
        let pitch = self.pitch();
        if pitch == 0 || !(x >= 0.0 && y >= 0.0) {
            return None;
        }

        let column = (x / pitch as f32) as u32;
        let row = (y / pitch as f32) as u32;
        Some(TileCoord::new(column, row))
    }
}

impl Default for GridMetrics {
    fn default() -> Self {
        Self::new(14, 2)
    }
}

/// Inclusive range of positive integers sampled uniformly by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct SizeRange {
    /// Smallest value that may be drawn.
    pub min: u32,
    /// Largest value that may be drawn.
    pub max: u32,
}

impl SizeRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Creates a range that only ever yields `value`.
    #[must_use]
    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min == 0 {
            return Err(ConfigError::NonPositive { field });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Complete configuration for a single dungeon construction run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Width of the drawable area in pixels.
    pub pixel_width: u32,
    /// Height of the drawable area in pixels.
    pub pixel_height: u32,
    /// Tile size and margin used to derive grid dimensions.
    pub metrics: GridMetrics,
    /// Number of rooms construction attempts to place.
    pub target_rooms: u32,
    /// Horizontal half-extent of generated rooms.
    pub room_width: SizeRange,
    /// Vertical half-extent of generated rooms.
    pub room_height: SizeRange,
    /// Number of steps a hall extends beyond its start tile.
    pub hall_length: SizeRange,
}

impl DungeonConfig {
    /// Number of tile columns the configured pixel width yields.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.metrics.tiles_in(self.pixel_width)
    }

    /// Number of tile rows the configured pixel height yields.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.metrics.tiles_in(self.pixel_height)
    }

    /// Checks every field, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.pitch() == 0 {
            return Err(ConfigError::ZeroPitch);
        }
        if self.pixel_width == 0 {
            return Err(ConfigError::NonPositive {
                field: "pixel_width",
            });
        }
        if self.pixel_height == 0 {
            return Err(ConfigError::NonPositive {
                field: "pixel_height",
            });
        }
        if self.target_rooms == 0 {
            return Err(ConfigError::NonPositive {
                field: "target_rooms",
            });
        }

        self.room_width.validate("room_width")?;
        self.room_height.validate("room_height")?;
        self.hall_length.validate("hall_length")?;

        let (columns, rows) = (self.columns(), self.rows());
        if columns < MIN_GRID_EXTENT || rows < MIN_GRID_EXTENT {
            return Err(ConfigError::EmptyGrid { columns, rows });
        }

        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            pixel_width: 1280,
            pixel_height: 720,
            metrics: GridMetrics::default(),
            target_rooms: 14,
            room_width: SizeRange::new(3, 5),
            room_height: SizeRange::new(3, 5),
            hall_length: SizeRange::new(2, 6),
        }
    }
}

const MIN_GRID_EXTENT: u32 = 3;

/// Reasons a [`DungeonConfig`] may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Tile size and margin are both zero, so no grid can be derived.
    #[error("tile size plus margin must be positive")]
    ZeroPitch,
    /// A count, extent, or range minimum was zero.
    #[error("`{field}` must be positive")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// A range's minimum exceeded its maximum.
    #[error("`{field}` range is inverted: min {min} > max {max}")]
    InvertedRange {
        /// Name of the offending field.
        field: &'static str,
        /// Configured minimum.
        min: u32,
        /// Configured maximum.
        max: u32,
    },
    /// The pixel extent yields a grid too small to hold a perimeter and interior.
    #[error("pixel extent yields a {columns}x{rows} grid; at least 3x3 is required")]
    EmptyGrid {
        /// Columns derived from the pixel width.
        columns: u32,
        /// Rows derived from the pixel height.
        rows: u32,
    },
}
