//! Run settings assembled from an optional TOML file and command-line overrides.

use std::{fs, path::Path};

use anyhow::Context as _;
use probable_journey_core::{DungeonConfig, SizeRange};
use serde::Deserialize;

/// Contents of a settings file. Every table and key is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SettingsFile {
    pub(crate) seed: Option<u64>,
    pub(crate) dungeon: DungeonConfig,
}

/// Per-field overrides taken from the command line.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) target_rooms: Option<u32>,
    pub(crate) room_size: Option<SizeRange>,
    pub(crate) hall_length: Option<SizeRange>,
}

/// Reads and parses the settings file at `path`, or returns defaults when none is given.
pub(crate) fn load(path: Option<&Path>) -> anyhow::Result<SettingsFile> {
    let Some(path) = path else {
        return Ok(SettingsFile::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid settings file {}", path.display()))
}

pub(crate) fn parse(contents: &str) -> anyhow::Result<SettingsFile> {
    Ok(toml::from_str(contents)?)
}

impl SettingsFile {
    /// Applies command-line overrides and validates the resulting configuration.
    pub(crate) fn resolve(
        mut self,
        overrides: Overrides,
    ) -> anyhow::Result<(DungeonConfig, Option<u64>)> {
        let config = &mut self.dungeon;
        if let Some(width) = overrides.width {
            config.pixel_width = width;
        }
        if let Some(height) = overrides.height {
            config.pixel_height = height;
        }
        if let Some(target_rooms) = overrides.target_rooms {
            config.target_rooms = target_rooms;
        }
        if let Some(room_size) = overrides.room_size {
            config.room_width = room_size;
            config.room_height = room_size;
        }
        if let Some(hall_length) = overrides.hall_length {
            config.hall_length = hall_length;
        }

        config.validate().context("dungeon configuration rejected")?;
        Ok((self.dungeon, overrides.seed.or(self.seed)))
    }
}
