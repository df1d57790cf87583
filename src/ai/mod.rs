use bracket_geometry::prelude::Point;

use crate::{
    data::EntityKind,
    ecs::resources::{ChaseRules, Occupancy},
    geometry::{Direction, distance_squared},
    map::TileLayer,
};

/// Read-only view over terrain and occupants used for movement legality.
#[derive(Clone, Copy)]
pub struct CollisionView<'a> {
    pub tiles: &'a TileLayer,
    pub occupancy: &'a Occupancy,
}

impl<'a> CollisionView<'a> {
    pub const fn new(tiles: &'a TileLayer, occupancy: &'a Occupancy) -> Self {
        Self { tiles, occupancy }
    }

    /// Legal iff some tile at `to` is walkable for `kind` and nothing at
    /// `to`, tile or entity, is in its blocking set.
    pub fn can_enter(&self, kind: EntityKind, to: Point) -> bool {
        let rules = kind.rules();
        let is_floor = rules.walkable.contains_any(self.tiles.kinds_at(to));
        if !is_floor {
            return false;
        }
        let blocked = rules.blocking.contains_any(self.tiles.kinds_at(to))
            || rules.blocking.contains_any(self.occupancy.kinds_at(to));
        !blocked
    }

    pub fn is_lethal(&self, kind: EntityKind, at: Point) -> bool {
        let rules = kind.rules();
        if rules.lethal.is_empty() {
            return false;
        }
        rules.lethal.contains_any(self.tiles.kinds_at(at))
            || rules.lethal.contains_any(self.occupancy.kinds_at(at))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PatrolMove {
    Step(Point),
    /// Blocked: face the other way and stay put this tick.
    Turn(Direction),
}

pub fn patrol_step(view: &CollisionView, from: Point, facing: Direction) -> PatrolMove {
    let ahead = facing.step_from(from);
    if view.can_enter(EntityKind::PatrolEnemy, ahead) {
        PatrolMove::Step(ahead)
    } else {
        PatrolMove::Turn(facing.opposite())
    }
}

pub fn can_see(from: Point, player: Point, rules: &ChaseRules) -> bool {
    distance_squared(from, player) < rules.detection_dist_squared()
}

/// One step toward `player`, or `None` when out of sight or boxed in.
///
/// Keeps every enemy move to a single orthogonal step per tick. The combined
/// per-axis step is used only when one axis is already aligned; otherwise
/// the horizontal step is tried before the vertical one.
pub fn chase_step(
    view: &CollisionView,
    from: Point,
    player: Point,
    rules: &ChaseRules,
) -> Option<Point> {
    if !can_see(from, player, rules) {
        return None;
    }
    let dx = (player.x - from.x).signum();
    let dy = (player.y - from.y).signum();
    let candidates = [Point::new(dx, dy), Point::new(dx, 0), Point::new(0, dy)];

    candidates
        .into_iter()
        .filter(|delta| delta.x.abs() + delta.y.abs() == 1)
        .map(|delta| Point::new(from.x + delta.x, from.y + delta.y))
        .find(|target| view.can_enter(EntityKind::ChasingEnemy, *target))
}
