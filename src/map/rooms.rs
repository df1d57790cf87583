use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use crate::{config::MazeConfig, geometry::Room};

#[derive(Clone, Debug, Default)]
pub struct RoomLayout {
    /// Number of placement attempts rolled for this layout.
    pub requested: u32,
    pub rooms: Vec<Room>,
}

/// Rejection sampling with a single attempt per rolled room. A candidate
/// touching an accepted room is dropped, not retried, so the layout may hold
/// fewer rooms than `config.min_rooms`, or none at all.
pub fn place_rooms(config: &MazeConfig, rng: &mut RandomNumberGenerator) -> RoomLayout {
    let requested = rng.range(config.min_rooms, config.max_rooms + 1);
    let mut rooms: Vec<Room> = Vec::with_capacity(requested as usize);

    for _ in 0..requested {
        let candidate = sample_room(config, rng);
        if rooms.iter().any(|room| room.touches(&candidate)) {
            continue;
        }
        rooms.push(candidate);
    }

    debug!(requested, placed = rooms.len(), "room layout sampled");
    RoomLayout { requested, rooms }
}

fn sample_room(config: &MazeConfig, rng: &mut RandomNumberGenerator) -> Room {
    let width = rng.range(config.min_room_size, config.max_room_size + 1);
    let height = rng.range(config.min_room_size, config.max_room_size + 1) / 2;
    let x = rng.range(0, config.max_x + 1);
    let y = rng.range(0, config.max_y + 1);
    Room::new(x, y, width, height)
}
