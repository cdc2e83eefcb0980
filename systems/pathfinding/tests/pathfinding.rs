use probable_journey_core::{DungeonConfig, Event, TileCoord, TileKind};
use probable_journey_system_construction::generate;
use probable_journey_system_pathfinding::Pathfinder;
use probable_journey_world::{query, Dungeon, Endpoint, Grid, Tile};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

fn generated(seed: u64) -> Dungeon {
    let (dungeon, _) =
        generate(&DungeonConfig::default(), ChaCha8Rng::seed_from_u64(seed)).expect("valid config");
    dungeon
}

fn kinds(grid: &Grid) -> Vec<TileKind> {
    grid.iter().map(Tile::kind).collect()
}

fn assert_adjacent_chain(start: TileCoord, path: &[TileCoord], goal: TileCoord) {
    let mut previous = start;
    for &coord in path.iter().chain(std::iter::once(&goal)) {
        assert_eq!(
            previous.manhattan_distance(coord),
            1,
            "{previous:?} and {coord:?} are not orthogonal neighbours"
        );
        previous = coord;
    }
}

#[test]
fn paths_connect_opposite_ends_of_a_generated_dungeon() {
    for seed in [2_u64, 17, 0xabcd] {
        let mut dungeon = generated(seed);
        let walkable = query::walkable_tiles(&dungeon);
        let (Some(&start), Some(&goal)) = (walkable.first(), walkable.last()) else {
            panic!("seed {seed} produced no walkable tiles");
        };
        if start == goal {
            continue;
        }

        let grid = dungeon.grid_mut();
        assert!(grid.mark_endpoint(start, Endpoint::Start));
        assert!(grid.mark_endpoint(goal, Endpoint::End));

        let mut pathfinder = Pathfinder::new();
        let mut events = Vec::new();
        pathfinder.begin_scan(start, goal, &mut events);
        let path = pathfinder
            .run_to_completion(grid, &mut events)
            .expect("generated dungeons are connected");

        assert_adjacent_chain(start, &path, goal);
        for &coord in &path {
            assert_eq!(grid.kind(coord), Some(TileKind::Path));
        }
        assert_eq!(grid.kind(start), Some(TileKind::StartPoint));
        assert_eq!(grid.kind(goal), Some(TileKind::EndPoint));
        assert!(matches!(
            events.last(),
            Some(Event::PathFound { goal: found, .. }) if *found == goal
        ));
    }
}

#[test]
fn clear_restores_the_constructed_layout() {
    let mut dungeon = generated(23);
    let walkable = query::walkable_tiles(&dungeon);
    let start = walkable[0];
    let goal = walkable[walkable.len() / 2];
    let before = kinds(query::grid(&dungeon));

    let grid = dungeon.grid_mut();
    assert!(grid.mark_endpoint(start, Endpoint::Start));
    assert!(grid.mark_endpoint(goal, Endpoint::End));

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(start, goal, &mut events);
    let _ = pathfinder.run_to_completion(grid, &mut events);
    assert!(grid.iter().any(|tile| tile.kind() == TileKind::Explored));

    pathfinder.clear(grid);
    assert!(!pathfinder.working());
    assert!(pathfinder.trace_path().is_none());
    assert_eq!(kinds(grid), before);
}

#[test]
fn clear_mid_search_abandons_the_session() {
    let mut dungeon = generated(31);
    let walkable = query::walkable_tiles(&dungeon);
    let before = kinds(query::grid(&dungeon));
    let grid = dungeon.grid_mut();

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(walkable[0], walkable[walkable.len() - 1], &mut events);
    for _ in 0..3 {
        let _ = pathfinder.step(grid, &mut events);
    }

    pathfinder.clear(grid);
    assert!(!pathfinder.working());
    assert!(!pathfinder.step(grid, &mut events));
    assert_eq!(kinds(grid), before);
}

#[test]
fn isolated_goal_is_reported_unreachable() {
    let mut grid = Grid::with_dimensions(7, 3);
    for column in [0, 1, 2, 4, 5, 6] {
        assert!(grid.set_kind(TileCoord::new(column, 1), TileKind::Floor));
    }
    assert!(grid.set_kind(TileCoord::new(3, 1), TileKind::Wall));
    let start = TileCoord::new(0, 1);
    let goal = TileCoord::new(6, 1);
    assert!(grid.mark_endpoint(start, Endpoint::Start));
    assert!(grid.mark_endpoint(goal, Endpoint::End));

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(start, goal, &mut events);

    let mut steps = 0;
    while pathfinder.working() {
        assert!(!pathfinder.step(&mut grid, &mut events));
        steps += 1;
        assert!(steps < 100, "search failed to terminate");
    }

    assert_eq!(events.last(), Some(&Event::PathUnreachable { expanded: 3 }));
    assert!(pathfinder.trace_path().is_none());
    assert!(grid.iter().all(|tile| tile.kind() != TileKind::Path));
    assert_eq!(grid.kind(TileCoord::new(5, 1)), Some(TileKind::Floor));

    pathfinder.begin_scan(start, goal, &mut events);
    assert!(pathfinder.run_to_completion(&mut grid, &mut events).is_none());
}

#[test]
fn neighbouring_endpoints_yield_an_empty_path() {
    let mut grid = Grid::with_dimensions(3, 1);
    for column in 0..3 {
        assert!(grid.set_kind(TileCoord::new(column, 0), TileKind::Hall));
    }
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(1, 0);

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(start, goal, &mut events);
    assert_eq!(
        pathfinder.run_to_completion(&mut grid, &mut events),
        Some(Vec::new())
    );
    assert_eq!(grid.kind(TileCoord::new(2, 0)), Some(TileKind::Hall));
}

#[test]
fn detour_around_a_wall_stays_connected() {
    let mut grid = Grid::with_dimensions(5, 5);
    for tile in grid.iter().map(Tile::coord).collect::<Vec<_>>() {
        assert!(grid.set_kind(tile, TileKind::Floor));
    }
    for row in 0..4 {
        assert!(grid.set_kind(TileCoord::new(2, row), TileKind::Wall));
    }
    let start = TileCoord::new(0, 0);
    let goal = TileCoord::new(4, 0);
    assert!(grid.mark_endpoint(start, Endpoint::Start));
    assert!(grid.mark_endpoint(goal, Endpoint::End));

    let mut pathfinder = Pathfinder::new();
    let mut events = Vec::new();
    pathfinder.begin_scan(start, goal, &mut events);
    let path = pathfinder
        .run_to_completion(&mut grid, &mut events)
        .expect("route under the wall");

    assert_adjacent_chain(start, &path, goal);
    assert!(path.contains(&TileCoord::new(2, 4)));
}
