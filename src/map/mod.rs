pub mod passages;
pub mod population;
pub mod rooms;

use std::collections::HashMap;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::info;

use crate::{
    config::MazeConfig,
    data::{EntityKind, Kind},
    error::ConfigError,
    geometry::{Direction, Room},
};

use self::{
    passages::{CarveResult, carve_room_passages},
    population::populate,
    rooms::place_rooms,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    PassageFloor { approach: Direction },
    Death,
    Finish,
}

impl TileKind {
    pub fn kind(self) -> Kind {
        match self {
            TileKind::Floor => Kind::Floor,
            TileKind::PassageFloor { .. } => Kind::PassageFloor,
            TileKind::Death => Kind::Death,
            TileKind::Finish => Kind::Finish,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub point: Point,
    pub kind: TileKind,
}

impl Tile {
    pub const fn new(point: Point, kind: TileKind) -> Self {
        Self { point, kind }
    }
}

/// Immutable terrain. Keeps placement order for rendering and a
/// position-keyed multimap for lookups; several tiles may share a cell.
#[derive(Clone, Debug, Default)]
pub struct TileLayer {
    tiles: Vec<Tile>,
    by_point: HashMap<Point, SmallVec<[TileKind; 2]>>,
}

impl TileLayer {
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        let mut by_point: HashMap<Point, SmallVec<[TileKind; 2]>> = HashMap::new();
        for tile in &tiles {
            by_point.entry(tile.point).or_default().push(tile.kind);
        }
        Self { tiles, by_point }
    }

    pub fn tiles_at(&self, point: Point) -> &[TileKind] {
        self.by_point
            .get(&point)
            .map(|kinds| kinds.as_slice())
            .unwrap_or(&[])
    }

    pub fn kinds_at(&self, point: Point) -> impl Iterator<Item = Kind> + '_ {
        self.tiles_at(point).iter().map(|tile| tile.kind())
    }

    pub fn has_kind(&self, point: Point, kind: Kind) -> bool {
        self.kinds_at(point).any(|k| k == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnemySpawn {
    pub kind: EntityKind,
    pub point: Point,
    /// Initial facing; only patrol enemies use it.
    pub facing: Direction,
}

/// Realized counts of one generation run. Rejection sampling means these
/// are usually below the requested figures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub requested_rooms: u32,
    pub placed_rooms: usize,
    pub passages_attempted: usize,
    pub passages_carved: usize,
    pub passage_tiles: usize,
    pub floor_tiles: usize,
    pub death_tiles: usize,
    pub enemies: usize,
    pub finish_tiles: usize,
}

#[derive(Clone, Debug)]
pub struct GeneratedMaze {
    pub rooms: Vec<Room>,
    pub tiles: Vec<Tile>,
    pub enemies: Vec<EnemySpawn>,
    pub start: Point,
    pub report: GenerationReport,
}

/// Rooms, then passages, then population, all drawn from one seeded stream.
pub fn generate_maze(config: &MazeConfig, seed: u64) -> Result<GeneratedMaze, ConfigError> {
    config.validate()?;
    let mut rng = RandomNumberGenerator::seeded(seed);

    let layout = place_rooms(config, &mut rng);
    let mut report = GenerationReport {
        requested_rooms: layout.requested,
        placed_rooms: layout.rooms.len(),
        ..GenerationReport::default()
    };

    let mut tiles = Vec::new();
    for (idx, _) in layout.rooms.iter().enumerate() {
        for result in carve_room_passages(&layout.rooms, idx, config, &mut rng) {
            report.passages_attempted += 1;
            if let CarveResult::Carved { tiles: corridor, .. } = result {
                report.passages_carved += 1;
                report.passage_tiles += corridor.len();
                tiles.extend(corridor);
            }
        }
    }

    let population = populate(&layout.rooms, config, &mut rng);
    report.floor_tiles = population.floor_tiles;
    report.death_tiles = population.death_tiles;
    report.finish_tiles = population.finish_tiles;
    report.enemies = population.enemies.len();
    tiles.extend(population.tiles);

    info!(
        seed,
        requested_rooms = report.requested_rooms,
        placed_rooms = report.placed_rooms,
        passages_attempted = report.passages_attempted,
        passages_carved = report.passages_carved,
        death_tiles = report.death_tiles,
        enemies = report.enemies,
        finish_tiles = report.finish_tiles,
        "maze generated"
    );

    Ok(GeneratedMaze {
        rooms: layout.rooms,
        tiles,
        enemies: population.enemies,
        start: population.start,
        report,
    })
}
