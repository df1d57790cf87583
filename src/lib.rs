//! Procedurally generated terminal maze: room and passage generation,
//! population with hazards and enemies, and a turn-stepped `specs`
//! simulation of the player and autonomous enemies.

pub mod ai;
pub mod config;
pub mod data;
pub mod ecs;
pub mod error;
pub mod geometry;
pub mod map;
pub mod render;
pub mod scripted_input;
pub mod simulation;

pub use config::MazeConfig;
pub use ecs::WorldGrid;
pub use error::ConfigError;
pub use map::{GeneratedMaze, GenerationReport, generate_maze};
pub use simulation::{Intent, IntentSource, Outcome, RenderSink, RenderSnapshot, Session};
