use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use crate::{
    config::MazeConfig,
    data::ENEMY_ROSTER,
    geometry::{COMPASS, Room},
    map::{EnemySpawn, Tile, TileKind},
};

#[derive(Clone, Debug)]
pub struct Population {
    pub tiles: Vec<Tile>,
    pub enemies: Vec<EnemySpawn>,
    pub start: Point,
    pub floor_tiles: usize,
    pub death_tiles: usize,
    pub finish_tiles: usize,
}

pub fn populate(
    rooms: &[Room],
    config: &MazeConfig,
    rng: &mut RandomNumberGenerator,
) -> Population {
    let mut population = Population {
        tiles: Vec::new(),
        enemies: Vec::new(),
        start: Point::new(0, 0),
        floor_tiles: 0,
        death_tiles: 0,
        finish_tiles: 0,
    };

    for room in rooms {
        fill_floor(room, &mut population);
        scatter_death_tiles(room, config.death_tile_density, rng, &mut population);
        spawn_enemies(room, config, rng, &mut population);
    }

    for room_idx in pick_finish_rooms(rooms.len(), config.finish_tile_density, rng) {
        let point = random_cell(&rooms[room_idx], rng);
        population.tiles.push(Tile::new(point, TileKind::Finish));
        population.finish_tiles += 1;
    }

    if !rooms.is_empty() {
        population.start = rooms[rng.range(0, rooms.len())].center();
    }

    population
}

/// Floor over the full rectangle, edges included.
fn fill_floor(room: &Room, population: &mut Population) {
    for dx in 0..=room.width {
        for dy in 0..=room.height {
            let point = Point::new(room.x + dx, room.y + dy);
            population.tiles.push(Tile::new(point, TileKind::Floor));
            population.floor_tiles += 1;
        }
    }
}

fn scatter_death_tiles(
    room: &Room,
    density: f64,
    rng: &mut RandomNumberGenerator,
    population: &mut Population,
) {
    let count = (room.area() as f64 * density).floor() as usize;
    for _ in 0..count {
        let point = random_cell(room, rng);
        population.tiles.push(Tile::new(point, TileKind::Death));
    }
    population.death_tiles += count;
}

fn spawn_enemies(
    room: &Room,
    config: &MazeConfig,
    rng: &mut RandomNumberGenerator,
    population: &mut Population,
) {
    let count = rng.range(config.min_enemies_per_room, config.max_enemies_per_room + 1);
    for _ in 0..count {
        let kind = ENEMY_ROSTER[rng.range(0, ENEMY_ROSTER.len())];
        let point = random_cell(room, rng);
        let facing = COMPASS[rng.range(0, COMPASS.len())];
        population.enemies.push(EnemySpawn {
            kind,
            point,
            facing,
        });
    }
}

/// Room indices chosen without replacement. The request is clamped to the
/// number of rooms so the finish count always matches the selection.
pub fn pick_finish_rooms(
    room_count: usize,
    density: f64,
    rng: &mut RandomNumberGenerator,
) -> Vec<usize> {
    let requested = (room_count as f64 * density).floor() as usize;
    let wanted = requested.min(room_count);
    if wanted < requested {
        debug!(requested, room_count, "finish room request clamped");
    }

    let mut pool: Vec<usize> = (0..room_count).collect();
    for slot in 0..wanted {
        let pick = rng.range(slot, room_count);
        pool.swap(slot, pick);
    }
    pool.truncate(wanted);
    pool
}

fn random_cell(room: &Room, rng: &mut RandomNumberGenerator) -> Point {
    Point::new(
        room.x + rng.range(0, room.width + 1),
        room.y + rng.range(0, room.height + 1),
    )
}
