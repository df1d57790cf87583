use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use terminal_maze::{
    MazeConfig, generate_maze,
    map::{
        TileKind,
        passages::{CarveResult, carve_room_passages},
        rooms::place_rooms,
    },
};

fn compact_config() -> MazeConfig {
    MazeConfig {
        max_x: 90,
        max_y: 45,
        min_rooms: 8,
        max_rooms: 16,
        min_room_size: 6,
        max_room_size: 18,
        ..MazeConfig::default()
    }
}

#[test]
fn generated_rooms_keep_a_one_cell_gap() {
    for seed in 0..25 {
        let maze = generate_maze(&MazeConfig::default(), seed).expect("default config is valid");
        assert!(maze.rooms.len() <= maze.report.requested_rooms as usize);
        for (i, a) in maze.rooms.iter().enumerate() {
            for b in maze.rooms.iter().skip(i + 1) {
                assert!(
                    a.right_x() + 1 < b.x
                        || b.right_x() + 1 < a.x
                        || a.bottom_y() + 1 < b.y
                        || b.bottom_y() + 1 < a.y,
                    "seed {seed}: {a:?} touches {b:?}"
                );
            }
        }
    }
}

#[test]
fn passages_are_all_or_nothing_and_bounded() {
    let config = compact_config();
    for seed in 0..25 {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let layout = place_rooms(&config, &mut rng);
        for origin in 0..layout.rooms.len() {
            for result in carve_room_passages(&layout.rooms, origin, &config, &mut rng) {
                match result {
                    CarveResult::Carved { direction, tiles } => {
                        assert!(tiles.len() as u32 <= config.max_passage_length + 1);
                        assert!(layout.rooms[origin].contains(tiles[0].point));
                        for pair in tiles.windows(2) {
                            assert_eq!(direction.step_from(pair[0].point), pair[1].point);
                        }
                        let end = tiles[tiles.len() - 1].point;
                        assert!(
                            layout
                                .rooms
                                .iter()
                                .enumerate()
                                .any(|(idx, room)| idx != origin && room.contains(end))
                        );
                    }
                    CarveResult::Discarded { steps, .. } => {
                        assert_eq!(steps, config.max_passage_length);
                    }
                }
            }
        }
    }
}

#[test]
fn report_matches_emitted_tiles() {
    let maze = generate_maze(&compact_config(), 17).expect("valid config");
    let count = |wanted: fn(&TileKind) -> bool| {
        maze.tiles.iter().filter(|tile| wanted(&tile.kind)).count()
    };
    assert_eq!(
        count(|kind| matches!(kind, TileKind::PassageFloor { .. })),
        maze.report.passage_tiles
    );
    assert_eq!(count(|kind| *kind == TileKind::Floor), maze.report.floor_tiles);
    assert_eq!(count(|kind| *kind == TileKind::Death), maze.report.death_tiles);
    assert_eq!(count(|kind| *kind == TileKind::Finish), maze.report.finish_tiles);
    assert_eq!(maze.enemies.len(), maze.report.enemies);
    assert!(maze.report.passages_carved <= maze.report.passages_attempted);
    assert_eq!(
        maze.report.finish_tiles,
        (maze.rooms.len() as f64 * compact_config().finish_tile_density).floor() as usize
    );
}

#[test]
fn single_room_without_passages_stays_inside_its_rectangle() {
    let config = MazeConfig {
        min_rooms: 1,
        max_rooms: 1,
        min_connections_per_room: 0,
        max_connections_per_room: 0,
        min_enemies_per_room: 2,
        max_enemies_per_room: 2,
        finish_tile_density: 1.0,
        ..MazeConfig::default()
    };
    for seed in 0..10 {
        let maze = generate_maze(&config, seed).expect("valid config");
        assert_eq!(maze.rooms.len(), 1);
        let room = maze.rooms[0];
        assert_eq!(maze.start, room.center());
        assert_eq!(maze.report.passages_attempted, 0);
        assert!(maze.tiles.iter().all(|tile| room.contains(tile.point)));
        assert!(
            !maze
                .tiles
                .iter()
                .any(|tile| matches!(tile.kind, TileKind::PassageFloor { .. }))
        );
        assert!(maze.enemies.iter().all(|spawn| room.contains(spawn.point)));
        assert_eq!(maze.report.finish_tiles, 1);
    }
}

#[test]
fn empty_layout_starts_at_origin() {
    let config = MazeConfig {
        min_rooms: 0,
        max_rooms: 0,
        ..MazeConfig::default()
    };
    let maze = generate_maze(&config, 5).expect("valid config");
    assert!(maze.rooms.is_empty());
    assert!(maze.tiles.is_empty());
    assert_eq!(maze.start, Point::new(0, 0));
}
