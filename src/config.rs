use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MAX_X: i32 = 250;
pub const DEFAULT_MAX_Y: i32 = 100;
pub const DEFAULT_MIN_ROOMS: u32 = 40;
pub const DEFAULT_MAX_ROOMS: u32 = 80;
pub const DEFAULT_MIN_ROOM_SIZE: i32 = 6;
pub const DEFAULT_MAX_ROOM_SIZE: i32 = 40;
pub const DEFAULT_MIN_CONNECTIONS_PER_ROOM: u32 = 1;
pub const DEFAULT_MAX_CONNECTIONS_PER_ROOM: u32 = 4;
pub const DEFAULT_MAX_PASSAGE_LENGTH: u32 = 120;
pub const DEFAULT_PASSAGE_INDENT: u32 = 1;
pub const DEFAULT_DEATH_TILE_DENSITY: f64 = 1.0 / 30.0;
pub const DEFAULT_MIN_ENEMIES_PER_ROOM: u32 = 0;
pub const DEFAULT_MAX_ENEMIES_PER_ROOM: u32 = 2;
pub const DEFAULT_FINISH_TILE_DENSITY: f64 = 0.1;
pub const DEFAULT_PLAYER_DETECTION_DIST: i32 = 30;
pub const DEFAULT_MOVEMENT_CHANCE: f32 = 0.5;

/// Largest accepted coordinate bound, room size or passage length.
pub const MAX_EXTENT: i32 = 10_000;
/// Largest accepted room or per-room enemy count.
pub const MAX_COUNT: u32 = 10_000;
/// Largest detection radius whose square still fits in an `i32`.
pub const MAX_DETECTION_DIST: i32 = 46_340;

/// Every tunable number used by maze generation and enemy behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    pub max_x: i32,
    pub max_y: i32,
    pub min_rooms: u32,
    pub max_rooms: u32,
    /// Bounds for both sampled dimensions; the sampled height is halved so
    /// rooms come out about twice as wide as tall on a character grid.
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub min_connections_per_room: u32,
    pub max_connections_per_room: u32,
    pub max_passage_length: u32,
    pub passage_indent: u32,
    pub death_tile_density: f64,
    pub min_enemies_per_room: u32,
    pub max_enemies_per_room: u32,
    pub finish_tile_density: f64,
    pub player_detection_dist: i32,
    pub movement_chance: f32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            max_x: DEFAULT_MAX_X,
            max_y: DEFAULT_MAX_Y,
            min_rooms: DEFAULT_MIN_ROOMS,
            max_rooms: DEFAULT_MAX_ROOMS,
            min_room_size: DEFAULT_MIN_ROOM_SIZE,
            max_room_size: DEFAULT_MAX_ROOM_SIZE,
            min_connections_per_room: DEFAULT_MIN_CONNECTIONS_PER_ROOM,
            max_connections_per_room: DEFAULT_MAX_CONNECTIONS_PER_ROOM,
            max_passage_length: DEFAULT_MAX_PASSAGE_LENGTH,
            passage_indent: DEFAULT_PASSAGE_INDENT,
            death_tile_density: DEFAULT_DEATH_TILE_DENSITY,
            min_enemies_per_room: DEFAULT_MIN_ENEMIES_PER_ROOM,
            max_enemies_per_room: DEFAULT_MAX_ENEMIES_PER_ROOM,
            finish_tile_density: DEFAULT_FINISH_TILE_DENSITY,
            player_detection_dist: DEFAULT_PLAYER_DETECTION_DIST,
            movement_chance: DEFAULT_MOVEMENT_CHANCE,
        }
    }
}

impl MazeConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("max_x", self.max_x as f64)?;
        non_negative("max_y", self.max_y as f64)?;
        non_negative("min_room_size", self.min_room_size as f64)?;
        ordered("rooms", self.min_rooms as f64, self.max_rooms as f64)?;
        ordered(
            "room_size",
            self.min_room_size as f64,
            self.max_room_size as f64,
        )?;
        ordered(
            "connections_per_room",
            self.min_connections_per_room as f64,
            self.max_connections_per_room as f64,
        )?;
        if self.max_connections_per_room > 4 {
            return Err(ConfigError::OutOfRange {
                name: "max_connections_per_room",
                value: self.max_connections_per_room as f64,
            });
        }
        ordered(
            "enemies_per_room",
            self.min_enemies_per_room as f64,
            self.max_enemies_per_room as f64,
        )?;
        if self.max_passage_length == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_passage_length",
                value: 0.0,
            });
        }
        unit_interval("death_tile_density", self.death_tile_density)?;
        unit_interval("finish_tile_density", self.finish_tile_density)?;
        unit_interval("movement_chance", self.movement_chance as f64)?;
        non_negative("player_detection_dist", self.player_detection_dist as f64)?;
        at_most("max_x", self.max_x as f64, MAX_EXTENT as f64)?;
        at_most("max_y", self.max_y as f64, MAX_EXTENT as f64)?;
        at_most("max_room_size", self.max_room_size as f64, MAX_EXTENT as f64)?;
        at_most(
            "max_passage_length",
            self.max_passage_length as f64,
            MAX_EXTENT as f64,
        )?;
        at_most("max_rooms", self.max_rooms as f64, MAX_COUNT as f64)?;
        at_most(
            "max_enemies_per_room",
            self.max_enemies_per_room as f64,
            MAX_COUNT as f64,
        )?;
        at_most(
            "player_detection_dist",
            self.player_detection_dist as f64,
            MAX_DETECTION_DIST as f64,
        )?;
        Ok(())
    }
}

fn ordered(name: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min > max {
        Err(ConfigError::InvertedRange { name, min, max })
    } else {
        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value < 0.0 {
        Err(ConfigError::OutOfRange { name, value })
    } else {
        Ok(())
    }
}

fn at_most(name: &'static str, value: f64, limit: f64) -> Result<(), ConfigError> {
    if value > limit {
        Err(ConfigError::OutOfRange { name, value })
    } else {
        Ok(())
    }
}

fn unit_interval(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(MazeConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = MazeConfig::from_json_str(r#"{ "max_x": 60, "min_rooms": 2, "max_rooms": 5 }"#)
            .expect("config parses");
        assert_eq!(config.max_x, 60);
        assert_eq!(config.max_rooms, 5);
        assert_eq!(config.max_y, DEFAULT_MAX_Y);
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let config = MazeConfig {
            min_rooms: 9,
            max_rooms: 3,
            ..MazeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { name: "rooms", .. })
        ));
    }

    #[test]
    fn finish_density_above_one_is_rejected() {
        let config = MazeConfig {
            finish_tile_density: 1.5,
            ..MazeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "finish_tile_density",
                ..
            })
        ));
    }

    #[test]
    fn oversized_detection_radius_is_rejected() {
        let config = MazeConfig {
            player_detection_dist: 50_000,
            movement_chance: 1.0,
            ..MazeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutOfRange {
                name: "player_detection_dist",
                ..
            })
        ));
        let at_limit = MazeConfig {
            player_detection_dist: MAX_DETECTION_DIST,
            ..MazeConfig::default()
        };
        assert!(at_limit.validate().is_ok());
    }

    #[test]
    fn counts_and_extents_at_type_maximum_are_rejected() {
        let rooms = MazeConfig {
            max_rooms: u32::MAX,
            ..MazeConfig::default()
        };
        assert!(matches!(
            rooms.validate(),
            Err(ConfigError::OutOfRange { name: "max_rooms", .. })
        ));
        let width = MazeConfig {
            max_x: i32::MAX,
            ..MazeConfig::default()
        };
        assert!(matches!(
            width.validate(),
            Err(ConfigError::OutOfRange { name: "max_x", .. })
        ));
        let enemies = MazeConfig {
            max_enemies_per_room: u32::MAX,
            ..MazeConfig::default()
        };
        assert!(matches!(
            enemies.validate(),
            Err(ConfigError::OutOfRange {
                name: "max_enemies_per_room",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            MazeConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
