use bracket_geometry::prelude::Point;
use specs::prelude::{Component, VecStorage};

use crate::{data::EntityKind, geometry::Direction};

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

/// Which kind table drives this entity's collision and death rules.
#[derive(Clone, Debug)]
pub struct Actor {
    pub kind: EntityKind,
}

impl Component for Actor {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub alive: bool,
    pub finished: bool,
    pub health: i32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            alive: true,
            finished: false,
            health: 1,
        }
    }
}

impl PlayerState {
    /// One-way transition; nothing sets `alive` back.
    pub fn kill(&mut self) {
        self.alive = false;
        self.health = 0;
    }
}

impl Component for PlayerState {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Brain {
    Patrol { facing: Direction },
    Chaser,
}

impl Brain {
    pub fn for_kind(kind: EntityKind, facing: Direction) -> Option<Self> {
        match kind {
            EntityKind::PatrolEnemy => Some(Brain::Patrol { facing }),
            EntityKind::ChasingEnemy => Some(Brain::Chaser),
            EntityKind::Player => None,
        }
    }

    pub fn facing(&self) -> Option<Direction> {
        match self {
            Brain::Patrol { facing } => Some(*facing),
            Brain::Chaser => None,
        }
    }
}

impl Component for Brain {
    type Storage = VecStorage<Self>;
}

/// Movement requested for the player this tick; consumed by the movement
/// system.
#[derive(Clone, Debug)]
pub struct IntentStep {
    pub direction: Direction,
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}
