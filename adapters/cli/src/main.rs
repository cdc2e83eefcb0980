#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that builds a dungeon and optionally routes a path across it.

mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::Parser;
use log::{info, LevelFilter};
use probable_journey_core::{SizeRange, TileCoord};
use probable_journey_system_construction::DungeonBuilder;
use probable_journey_system_pathfinding::Pathfinder;
use probable_journey_world::{query, Dungeon, Endpoint};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::settings::Overrides;

#[derive(Parser, Debug)]
#[command(name = "probable-journey")]
#[command(about = "Generate a room-and-hall dungeon and search a path across it")]
struct Args {
    /// TOML settings file with an optional `seed` and a `[dungeon]` table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Width of the drawable area in pixels
    #[arg(short = 'W', long)]
    width: Option<u32>,

    /// Height of the drawable area in pixels
    #[arg(short = 'H', long)]
    height: Option<u32>,

    /// Number of rooms to attempt to place
    #[arg(short = 'r', long)]
    rooms: Option<u32>,

    /// Room half-extent range applied to both axes, as `MIN..MAX` or a single value
    #[arg(long, value_parser = parse_range)]
    room_size: Option<SizeRange>,

    /// Hall length range, as `MIN..MAX` or a single value
    #[arg(long, value_parser = parse_range)]
    hall_length: Option<SizeRange>,

    /// Path start tile as `COLUMN,ROW` (first walkable tile if not specified)
    #[arg(long, value_parser = parse_coord)]
    from: Option<TileCoord>,

    /// Path goal tile as `COLUMN,ROW` (last walkable tile if not specified)
    #[arg(long, value_parser = parse_coord)]
    to: Option<TileCoord>,

    /// Only build the dungeon, skipping the path search
    #[arg(long)]
    no_path: bool,

    /// Additional logging to stderr; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Probable Journey command-line interface.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    install_logging(args.verbose)?;

    let (config, seed) = settings::load(args.config.as_deref())?.resolve(Overrides {
        seed: args.seed,
        width: args.width,
        height: args.height,
        target_rooms: args.rooms,
        room_size: args.room_size,
        hall_length: args.hall_length,
    })?;
    let seed = seed.unwrap_or_else(rand::random);
    info!("building dungeon with seed {seed}");

    let mut dungeon = Dungeon::from_config(&config);
    let mut builder = DungeonBuilder::new(config, ChaCha8Rng::seed_from_u64(seed))?;
    let mut events = Vec::new();
    while builder.step(&mut dungeon, &mut events) {}

    println!(
        "seed {seed}: {} of {} rooms, {} halls",
        builder.rooms_built(),
        builder.config().target_rooms,
        query::hall_count(&dungeon)
    );

    if !args.no_path {
        route(&mut dungeon, args.from, args.to)?;
    }

    print!("{}", render::render(query::grid(&dungeon)));
    println!("{}", render::legend());
    Ok(())
}

fn route(
    dungeon: &mut Dungeon,
    from: Option<TileCoord>,
    to: Option<TileCoord>,
) -> anyhow::Result<()> {
    let walkable = query::walkable_tiles(dungeon);
    let start = from
        .or_else(|| walkable.first().copied())
        .context("the dungeon has no walkable tiles to route between")?;
    let goal = to
        .or_else(|| walkable.last().copied())
        .context("the dungeon has no walkable tiles to route between")?;
    if start == goal {
        bail!("path start and goal are both {}", describe(start));
    }

    let grid = dungeon.grid_mut();
    if !grid.mark_endpoint(start, Endpoint::Start) {
        bail!("start tile {} is not floor or hall", describe(start));
    }
    if !grid.mark_endpoint(goal, Endpoint::End) {
        bail!("goal tile {} is not floor or hall", describe(goal));
    }

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(start, goal, &mut events);
    match pathfinder.run_to_completion(grid, &mut events) {
        Some(path) => println!(
            "path from {} to {}: {} tiles between, {} nodes expanded",
            describe(start),
            describe(goal),
            path.len(),
            pathfinder.expanded()
        ),
        None => println!(
            "no path from {} to {} after {} expansions",
            describe(start),
            describe(goal),
            pathfinder.expanded()
        ),
    }
    Ok(())
}

fn describe(coord: TileCoord) -> String {
    format!("{},{}", coord.column(), coord.row())
}

fn install_logging(verbose: u8) -> anyhow::Result<()> {
    use simplelog::LevelFilter::Off;

    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    simplelog::WriteLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .set_time_level(Off)
            .build(),
        std::io::stderr(),
    )
    .context("failed to install logger")
}

fn parse_coord(value: &str) -> Result<TileCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but got `{value}`"))?;
    let column = column
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid column `{column}`: {error}"))?;
    let row = row
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("invalid row `{row}`: {error}"))?;
    Ok(TileCoord::new(column, row))
}

fn parse_range(value: &str) -> Result<SizeRange, String> {
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid bound `{part}`: {error}"))
    };
    match value.split_once("..") {
        Some((min, max)) => Ok(SizeRange::new(parse(min)?, parse(max)?)),
        None => Ok(SizeRange::exactly(parse(value)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_from_column_and_row() {
        assert_eq!(parse_coord("3,14"), Ok(TileCoord::new(3, 14)));
        assert_eq!(parse_coord(" 0 , 2 "), Ok(TileCoord::new(0, 2)));
        assert!(parse_coord("3").is_err());
        assert!(parse_coord("-1,2").is_err());
    }

    #[test]
    fn ranges_accept_pairs_and_single_values() {
        assert_eq!(parse_range("2..6"), Ok(SizeRange::new(2, 6)));
        assert_eq!(parse_range("4"), Ok(SizeRange::exactly(4)));
        assert!(parse_range("a..3").is_err());
    }

    #[test]
    fn arguments_parse_into_overrides() {
        let args = Args::try_parse_from([
            "probable-journey",
            "--seed",
            "9",
            "--rooms",
            "4",
            "--room-size",
            "1..2",
            "--from",
            "1,2",
            "-vv",
        ])
        .expect("arguments parse");

        assert_eq!(args.seed, Some(9));
        assert_eq!(args.rooms, Some(4));
        assert_eq!(args.room_size, Some(SizeRange::new(1, 2)));
        assert_eq!(args.from, Some(TileCoord::new(1, 2)));
        assert_eq!(args.verbose, 2);
        assert!(!args.no_path);
    }

    #[test]
    fn routing_rejects_non_walkable_endpoints() {
        let mut dungeon = Dungeon::new(probable_journey_world::Grid::with_dimensions(4, 4));
        let result = route(
            &mut dungeon,
            Some(TileCoord::new(0, 0)),
            Some(TileCoord::new(3, 3)),
        );
        let message = format!("{}", result.expect_err("empty tiles are not walkable"));
        assert!(message.contains("0,0"), "{message}");
    }
}
