use bracket_geometry::prelude::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::MazeConfig,
    data::EntityKind,
    ecs::{
        WorldGrid,
        resources::{Alert, ChaseRules},
    },
    error::ConfigError,
    geometry::Direction,
    map::{GenerationReport, TileKind, generate_maze},
};

/// Salt separating the simulation stream from the generation stream.
const SIMULATION_SEED_SALT: u64 = 0x51ec_5ead;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    Quit,
    /// Let the world advance without moving.
    Wait,
}

impl Intent {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Intent::Up => Some(Direction::Up),
            Intent::Down => Some(Direction::Down),
            Intent::Left => Some(Direction::Left),
            Intent::Right => Some(Direction::Right),
            Intent::Quit | Intent::Wait => None,
        }
    }
}

/// Supplies one intent per tick. May block.
pub trait IntentSource {
    fn poll_intent(&mut self) -> Intent;
}

/// Receives one snapshot per tick; owns all drawing concerns.
pub trait RenderSink {
    fn present(&mut self, snapshot: &RenderSnapshot);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderKind {
    Tile(TileKind),
    Entity {
        kind: EntityKind,
        facing: Option<Direction>,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderCell {
    pub point: Point,
    pub kind: RenderKind,
}

/// Everything a render collaborator needs for one frame, in world
/// coordinates: tiles in placement order, then entities in creation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSnapshot {
    pub cells: Vec<RenderCell>,
    pub player: Point,
    pub alive: bool,
    pub finished: bool,
    pub tick: u64,
    pub alerts: Vec<Alert>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickStatus {
    Continue,
    PlayerDead,
    PlayerWon,
}

/// How a session ended. `Win` and `Lose` carry the number of ticks played,
/// including the tick that ended the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(u64),
    Lose(u64),
    Aborted,
}

impl Outcome {
    pub fn moves(&self) -> Option<u64> {
        match self {
            Outcome::Win(moves) | Outcome::Lose(moves) => Some(*moves),
            Outcome::Aborted => None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub moves: u64,
    pub outcome: Option<Outcome>,
    pub report: GenerationReport,
}

/// One generated maze and the tick loop that plays it out.
pub struct Session {
    grid: WorldGrid,
    seed: u64,
    report: GenerationReport,
    moves: u64,
    outcome: Option<Outcome>,
    pending_alerts: Vec<Alert>,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn generate(config: &MazeConfig, seed: u64) -> Result<Self, ConfigError> {
        let maze = generate_maze(config, seed)?;
        let grid = WorldGrid::from_maze(
            &maze,
            ChaseRules::from_config(config),
            seed ^ SIMULATION_SEED_SALT,
        );
        Ok(Self::from_grid(grid, seed, maze.report))
    }

    pub fn from_grid(grid: WorldGrid, seed: u64, report: GenerationReport) -> Self {
        Self {
            grid,
            seed,
            report,
            moves: 0,
            outcome: None,
            pending_alerts: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Advances one tick unless the session is already over. `Quit` ends
    /// the session without touching the world.
    pub fn step(&mut self, intent: Intent) -> Option<Outcome> {
        if self.outcome.is_some() {
            return self.outcome;
        }
        if intent == Intent::Quit {
            self.finish(Outcome::Aborted);
            return self.outcome;
        }

        self.grid.advance(intent.direction());
        self.moves += 1;
        self.pending_alerts.extend(self.grid.drain_alerts());

        match self.status() {
            TickStatus::Continue => None,
            TickStatus::PlayerDead => {
                self.finish(Outcome::Lose(self.moves));
                self.outcome
            }
            TickStatus::PlayerWon => {
                self.finish(Outcome::Win(self.moves));
                self.outcome
            }
        }
    }

    /// Drives the session to completion, presenting the initial state and
    /// every tick after it.
    pub fn run<I, R>(&mut self, input: &mut I, sink: &mut R) -> Outcome
    where
        I: IntentSource + ?Sized,
        R: RenderSink + ?Sized,
    {
        sink.present(&self.snapshot());
        loop {
            let outcome = self.step(input.poll_intent());
            sink.present(&self.snapshot());
            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }

    /// Death wins over finishing when both happen on the same tick.
    pub fn status(&self) -> TickStatus {
        let state = self.grid.player_state();
        if !state.alive {
            TickStatus::PlayerDead
        } else if state.finished {
            TickStatus::PlayerWon
        } else {
            TickStatus::Continue
        }
    }

    /// Builds the frame and hands over any alerts raised since the last
    /// snapshot.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let mut cells = Vec::with_capacity(self.grid.tile_count() + self.grid.entity_count());
        self.grid.each_tile(|tile| {
            cells.push(RenderCell {
                point: tile.point,
                kind: RenderKind::Tile(tile.kind),
            })
        });
        self.grid.each_entity(|_, point, kind, facing| {
            cells.push(RenderCell {
                point,
                kind: RenderKind::Entity { kind, facing },
            })
        });
        let state = self.grid.player_state();
        RenderSnapshot {
            cells,
            player: self.grid.player_point(),
            alive: state.alive,
            finished: state.finished,
            tick: self.moves,
            alerts: std::mem::take(&mut self.pending_alerts),
        }
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            started_at: self.started_at,
            finished_at: Utc::now(),
            moves: self.moves,
            outcome: self.outcome,
            report: self.report.clone(),
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        info!(?outcome, moves = self.moves, seed = self.seed, "session over");
        self.outcome = Some(outcome);
    }

    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Tile;

    fn room_with_finish() -> Session {
        let mut tiles = Vec::new();
        for x in 0..4 {
            tiles.push(Tile::new(Point::new(x, 0), TileKind::Floor));
        }
        tiles.push(Tile::new(Point::new(2, 0), TileKind::Finish));
        let grid = WorldGrid::new(tiles, Point::new(0, 0), ChaseRules::default(), 3);
        Session::from_grid(grid, 3, GenerationReport::default())
    }

    #[test]
    fn reaching_finish_wins_with_move_count() {
        let mut session = room_with_finish();
        assert_eq!(session.step(Intent::Right), None);
        assert_eq!(session.step(Intent::Right), Some(Outcome::Win(2)));
        assert!(session.grid().player_state().finished);
        // Further input is ignored once the session is over.
        assert_eq!(session.step(Intent::Left), Some(Outcome::Win(2)));
        assert_eq!(session.moves(), 2);
    }

    #[test]
    fn winning_tick_is_included_in_the_count() {
        let tiles = vec![
            Tile::new(Point::new(0, 0), TileKind::Floor),
            Tile::new(Point::new(1, 0), TileKind::Floor),
            Tile::new(Point::new(1, 0), TileKind::Finish),
        ];
        let grid = WorldGrid::new(tiles, Point::new(0, 0), ChaseRules::default(), 5);
        let mut session = Session::from_grid(grid, 5, GenerationReport::default());
        assert_eq!(session.step(Intent::Right), Some(Outcome::Win(1)));
        assert_eq!(Outcome::Win(1).moves(), Some(1));
    }

    #[test]
    fn quit_aborts_without_a_tick() {
        let mut session = room_with_finish();
        assert_eq!(session.step(Intent::Quit), Some(Outcome::Aborted));
        assert_eq!(session.moves(), 0);
        assert_eq!(session.summary().outcome, Some(Outcome::Aborted));
    }

    #[test]
    fn blocked_moves_surface_as_alerts_in_the_next_snapshot() {
        let mut session = room_with_finish();
        session.step(Intent::Left);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.alerts.len(), 1);
        assert_eq!(snapshot.tick, 1);
        assert!(session.snapshot().alerts.is_empty());
    }

    #[test]
    fn snapshot_lists_tiles_then_entities() {
        let mut session = room_with_finish();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.cells.len(), 6);
        assert_eq!(
            snapshot.cells.last().map(|cell| cell.kind),
            Some(RenderKind::Entity {
                kind: EntityKind::Player,
                facing: None
            })
        );
        assert!(snapshot.alive);
        assert!(!snapshot.finished);
    }

    #[test]
    fn summary_serializes_to_json() {
        let mut session = room_with_finish();
        session.step(Intent::Quit);
        let json = serde_json::to_string(&session.summary()).expect("summary serializes");
        assert!(json.contains("\"Aborted\""));
    }
}
