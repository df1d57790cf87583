use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use crate::{
    config::MazeConfig,
    geometry::{COMPASS, Direction, Room},
    map::{Tile, TileKind},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CarveResult {
    /// The whole walk, from the indented start cell to the cell where it
    /// had penetrated far enough into another room.
    Carved {
        direction: Direction,
        tiles: Vec<Tile>,
    },
    Discarded {
        direction: Direction,
        steps: u32,
    },
}

impl CarveResult {
    pub fn direction(&self) -> Direction {
        match self {
            CarveResult::Carved { direction, .. } | CarveResult::Discarded { direction, .. } => {
                *direction
            }
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        match self {
            CarveResult::Carved { tiles, .. } => tiles,
            CarveResult::Discarded { .. } => &[],
        }
    }
}

/// Rolls the passage count for `rooms[origin]` and carves one passage per
/// distinct compass direction. Directions are consumed, never reused.
pub fn carve_room_passages(
    rooms: &[Room],
    origin: usize,
    config: &MazeConfig,
    rng: &mut RandomNumberGenerator,
) -> Vec<CarveResult> {
    let Some(room) = rooms.get(origin) else {
        return Vec::new();
    };
    let wanted = rng.range(
        config.min_connections_per_room,
        config.max_connections_per_room + 1,
    );
    let mut unused: Vec<Direction> = COMPASS.to_vec();
    let mut results = Vec::with_capacity(wanted as usize);

    for _ in 0..wanted {
        if unused.is_empty() {
            break;
        }
        let direction = unused.remove(rng.range(0, unused.len()));
        let start = start_cell(room, direction, config.passage_indent as i32, rng);
        let result = carve_passage(
            rooms,
            origin,
            start,
            direction,
            config.max_passage_length,
            config.passage_indent,
        );
        if let CarveResult::Discarded { steps, .. } = &result {
            debug!(
                origin,
                direction = direction.as_str(),
                steps,
                "passage discarded"
            );
        }
        results.push(result);
    }
    results
}

/// A cell `indent` deep inside `room` on the side facing `direction`, at a
/// random offset along that side.
pub fn start_cell(
    room: &Room,
    direction: Direction,
    indent: i32,
    rng: &mut RandomNumberGenerator,
) -> Point {
    match direction {
        Direction::Up => Point::new(rng.range(room.x, room.right_x() + 1), room.y + indent),
        Direction::Down => Point::new(
            rng.range(room.x, room.right_x() + 1),
            room.bottom_y() - indent,
        ),
        Direction::Left => Point::new(room.x + indent, rng.range(room.y, room.bottom_y() + 1)),
        Direction::Right => Point::new(
            room.right_x() - indent,
            rng.range(room.y, room.bottom_y() + 1),
        ),
    }
}

/// Straight walk from `start`. Succeeds once more than `indent` consecutive
/// cells lie inside a room other than `origin`; gives up after `max_length`
/// steps. Nothing is kept from a failed walk.
pub fn carve_passage(
    rooms: &[Room],
    origin: usize,
    start: Point,
    direction: Direction,
    max_length: u32,
    indent: u32,
) -> CarveResult {
    let kind = TileKind::PassageFloor {
        approach: direction,
    };
    let mut tiles = vec![Tile::new(start, kind)];
    let mut cursor = start;
    let mut consecutive_room_hits = 0u32;
    let mut steps = 0u32;

    while steps < max_length {
        cursor = direction.step_from(cursor);
        steps += 1;
        tiles.push(Tile::new(cursor, kind));

        let inside_other = rooms
            .iter()
            .enumerate()
            .any(|(idx, room)| idx != origin && room.contains(cursor));
        if inside_other {
            consecutive_room_hits += 1;
        } else {
            consecutive_room_hits = 0;
        }

        if consecutive_room_hits > indent {
            return CarveResult::Carved { direction, tiles };
        }
    }

    CarveResult::Discarded { direction, steps }
}
