use std::collections::HashMap;

use bracket_geometry::prelude::Point;
use smallvec::SmallVec;
use specs::prelude::Entity;

use crate::{
    config::MazeConfig,
    data::{EntityKind, Kind},
};

/// Position-keyed multimap of live entities, updated on every move so
/// lookups never scan the whole entity set.
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    cells: HashMap<Point, SmallVec<[(Entity, EntityKind); 2]>>,
}

impl Occupancy {
    pub fn insert(&mut self, entity: Entity, kind: EntityKind, point: Point) {
        self.cells.entry(point).or_default().push((entity, kind));
    }

    pub fn relocate(&mut self, entity: Entity, from: Point, to: Point) {
        let mut moved = None;
        if let Some(occupants) = self.cells.get_mut(&from) {
            if let Some(idx) = occupants.iter().position(|(e, _)| *e == entity) {
                moved = Some(occupants.remove(idx));
            }
            if occupants.is_empty() {
                self.cells.remove(&from);
            }
        }
        if let Some(entry) = moved {
            self.cells.entry(to).or_default().push(entry);
        }
    }

    pub fn entities_at(&self, point: Point) -> &[(Entity, EntityKind)] {
        self.cells
            .get(&point)
            .map(|occupants| occupants.as_slice())
            .unwrap_or(&[])
    }

    pub fn kinds_at(&self, point: Point) -> impl Iterator<Item = Kind> + '_ {
        self.entities_at(point).iter().map(|(_, kind)| kind.kind())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ChaseRules {
    pub detection_dist: i32,
    pub movement_chance: f32,
}

impl ChaseRules {
    pub fn from_config(config: &MazeConfig) -> Self {
        Self {
            detection_dist: config.player_detection_dist,
            movement_chance: config.movement_chance,
        }
    }

    pub fn detection_dist_squared(&self) -> i64 {
        let dist = i64::from(self.detection_dist);
        dist * dist
    }
}

impl Default for ChaseRules {
    fn default() -> Self {
        Self::from_config(&MazeConfig::default())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Alert {
    /// The player tried to step onto `at` and could not.
    Blocked { at: Point },
}

#[derive(Default)]
pub struct AlertLog {
    pub entries: Vec<Alert>,
}

impl AlertLog {
    pub fn push(&mut self, alert: Alert) {
        self.entries.push(alert);
    }
}

#[cfg(test)]
mod tests {
    use specs::prelude::{Builder, World, WorldExt};

    use super::*;

    #[test]
    fn relocation_moves_only_the_named_entity() {
        let mut world = World::new();
        let a = world.create_entity().build();
        let b = world.create_entity().build();
        let shared = Point::new(1, 1);
        let mut occupancy = Occupancy::default();
        occupancy.insert(a, EntityKind::PatrolEnemy, shared);
        occupancy.insert(b, EntityKind::ChasingEnemy, shared);

        occupancy.relocate(a, shared, Point::new(2, 1));

        assert_eq!(occupancy.entities_at(shared), &[(b, EntityKind::ChasingEnemy)]);
        assert_eq!(
            occupancy.entities_at(Point::new(2, 1)),
            &[(a, EntityKind::PatrolEnemy)]
        );
    }

    #[test]
    fn emptied_cells_read_as_unoccupied() {
        let mut world = World::new();
        let a = world.create_entity().build();
        let mut occupancy = Occupancy::default();
        occupancy.insert(a, EntityKind::Player, Point::new(0, 0));
        occupancy.relocate(a, Point::new(0, 0), Point::new(0, 1));
        assert!(occupancy.entities_at(Point::new(0, 0)).is_empty());
        assert_eq!(occupancy.kinds_at(Point::new(0, 1)).count(), 1);
    }
}
