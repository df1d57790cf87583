pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use smallvec::SmallVec;
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::{
    data::EntityKind,
    geometry::Direction,
    map::{EnemySpawn, GeneratedMaze, Tile, TileKind, TileLayer},
};

use self::{
    components::{Actor, Brain, IntentStep, PlayerState, Position},
    resources::{Alert, AlertLog, ChaseRules, Occupancy},
    systems::{EnemySystem, LethalitySystem, PlayerMovementSystem},
};

/// All tiles and entities of one session in a single coordinate space.
///
/// Tiles sit in an immutable [`TileLayer`] resource; entities live in the
/// `specs` world and are mirrored into an [`Occupancy`] index as they move.
pub struct WorldGrid {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
}

impl WorldGrid {
    pub fn new(tiles: Vec<Tile>, start: Point, rules: ChaseRules, seed: u64) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(TileLayer::from_tiles(tiles));
        specs_world.insert(Occupancy::default());
        specs_world.insert(AlertLog::default());
        specs_world.insert(rules);
        specs_world.insert(RandomNumberGenerator::seeded(seed));
        let player = Self::spawn_player(&mut specs_world, start);
        // Chained dependencies pin the order: player, enemies, late deaths.
        let dispatcher = DispatcherBuilder::new()
            .with(PlayerMovementSystem, "player_movement", &[])
            .with(EnemySystem, "enemies", &["player_movement"])
            .with(LethalitySystem, "lethality", &["enemies"])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
        }
    }

    pub fn from_maze(maze: &GeneratedMaze, rules: ChaseRules, seed: u64) -> Self {
        let mut grid = Self::new(maze.tiles.clone(), maze.start, rules, seed);
        for spawn in &maze.enemies {
            grid.spawn_enemy(*spawn);
        }
        grid
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Actor>();
        world.register::<PlayerState>();
        world.register::<Brain>();
        world.register::<IntentStep>();
    }

    fn spawn_player(world: &mut SpecsWorld, spawn: Point) -> Entity {
        let player = world
            .create_entity()
            .with(Position { point: spawn })
            .with(Actor {
                kind: EntityKind::Player,
            })
            .with(PlayerState::default())
            .build();
        world
            .write_resource::<Occupancy>()
            .insert(player, EntityKind::Player, spawn);
        player
    }

    /// Adds an autonomous entity; it updates after every entity created
    /// before it.
    pub fn spawn_enemy(&mut self, spawn: EnemySpawn) -> Entity {
        let mut builder = self
            .specs_world
            .create_entity()
            .with(Position { point: spawn.point })
            .with(Actor { kind: spawn.kind });
        if let Some(brain) = Brain::for_kind(spawn.kind, spawn.facing) {
            builder = builder.with(brain);
        }
        let entity = builder.build();
        self.specs_world
            .write_resource::<Occupancy>()
            .insert(entity, spawn.kind, spawn.point);
        entity
    }

    /// Runs one tick: the queued player step, then every enemy in creation
    /// order.
    pub fn advance(&mut self, intent: Option<Direction>) {
        match intent {
            Some(direction) => self.queue_player_step(direction),
            None => self.clear_player_intent(),
        }
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
    }

    pub fn queue_player_step(&mut self, direction: Direction) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.insert(self.player, IntentStep { direction });
    }

    pub fn clear_player_intent(&mut self) {
        let mut intents = self.specs_world.write_component::<IntentStep>();
        let _ = intents.remove(self.player);
    }

    pub fn tiles_at(&self, point: Point) -> SmallVec<[TileKind; 2]> {
        let tiles = self.specs_world.read_resource::<TileLayer>();
        SmallVec::from_slice(tiles.tiles_at(point))
    }

    pub fn entities_at(&self, point: Point) -> SmallVec<[(Entity, EntityKind); 2]> {
        let occupancy = self.specs_world.read_resource::<Occupancy>();
        SmallVec::from_slice(occupancy.entities_at(point))
    }

    pub fn each_tile<F>(&self, mut f: F)
    where
        F: FnMut(&Tile),
    {
        let tiles = self.specs_world.read_resource::<TileLayer>();
        for tile in tiles.iter() {
            f(tile);
        }
    }

    /// Visits entities in creation order with their facing, if any.
    pub fn each_entity<F>(&self, mut f: F)
    where
        F: FnMut(Entity, Point, EntityKind, Option<Direction>),
    {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let actors = self.specs_world.read_component::<Actor>();
        let brains = self.specs_world.read_component::<Brain>();
        for (entity, pos, actor, brain) in
            (&entities, &positions, &actors, (&brains).maybe()).join()
        {
            f(entity, pos.point, actor.kind, brain.and_then(Brain::facing));
        }
    }

    pub fn tile_count(&self) -> usize {
        self.specs_world.read_resource::<TileLayer>().len()
    }

    pub fn entity_count(&self) -> usize {
        let entities = self.specs_world.entities();
        let actors = self.specs_world.read_component::<Actor>();
        (&entities, &actors).join().count()
    }

    pub fn position_of(&self, entity: Entity) -> Option<Point> {
        let positions = self.specs_world.read_component::<Position>();
        positions.get(entity).map(|pos| pos.point)
    }

    pub fn facing_of(&self, entity: Entity) -> Option<Direction> {
        let brains = self.specs_world.read_component::<Brain>();
        brains.get(entity).and_then(Brain::facing)
    }

    pub fn player_entity(&self) -> Entity {
        self.player
    }

    pub fn player_point(&self) -> Point {
        self.position_of(self.player).unwrap_or(Point::new(0, 0))
    }

    pub fn player_state(&self) -> PlayerState {
        let states = self.specs_world.read_component::<PlayerState>();
        states.get(self.player).cloned().unwrap_or_default()
    }

    pub fn drain_alerts(&mut self) -> Vec<Alert> {
        let mut log = self.specs_world.write_resource::<AlertLog>();
        std::mem::take(&mut log.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::step_length;

    fn corridor(length: i32) -> Vec<Tile> {
        (0..length)
            .map(|x| Tile::new(Point::new(x, 0), TileKind::Floor))
            .collect()
    }

    fn eager_rules() -> ChaseRules {
        ChaseRules {
            detection_dist: 30,
            movement_chance: 1.0,
        }
    }

    #[test]
    fn player_moves_onto_floor_and_is_blocked_off_it() {
        let mut grid = WorldGrid::new(corridor(3), Point::new(0, 0), eager_rules(), 1);
        grid.advance(Some(Direction::Right));
        assert_eq!(grid.player_point(), Point::new(1, 0));
        assert!(grid.drain_alerts().is_empty());

        grid.advance(Some(Direction::Up));
        assert_eq!(grid.player_point(), Point::new(1, 0));
        assert_eq!(
            grid.drain_alerts(),
            vec![Alert::Blocked {
                at: Point::new(1, -1)
            }]
        );
        assert!(grid.player_state().alive);
    }

    #[test]
    fn occupancy_follows_moves() {
        let mut grid = WorldGrid::new(corridor(3), Point::new(0, 0), eager_rules(), 1);
        grid.advance(Some(Direction::Right));
        let player = grid.player_entity();
        assert!(grid.entities_at(Point::new(0, 0)).is_empty());
        assert_eq!(
            grid.entities_at(Point::new(1, 0)).as_slice(),
            &[(player, EntityKind::Player)]
        );
    }

    #[test]
    fn walking_into_death_kills_without_moving() {
        let mut tiles = corridor(3);
        tiles.push(Tile::new(Point::new(1, 0), TileKind::Death));
        let mut grid = WorldGrid::new(tiles, Point::new(0, 0), eager_rules(), 1);
        grid.advance(Some(Direction::Right));
        let state = grid.player_state();
        assert!(!state.alive);
        assert_eq!(state.health, 0);
        assert_eq!(grid.player_point(), Point::new(0, 0));
    }

    #[test]
    fn enemy_stepping_onto_idle_player_kills_same_tick() {
        let mut grid = WorldGrid::new(corridor(4), Point::new(0, 0), eager_rules(), 1);
        grid.spawn_enemy(EnemySpawn {
            kind: EntityKind::PatrolEnemy,
            point: Point::new(1, 0),
            facing: Direction::Left,
        });
        grid.advance(None);
        assert_eq!(grid.player_point(), Point::new(0, 0));
        assert!(!grid.player_state().alive);
    }

    #[test]
    fn enemies_move_at_most_one_orthogonal_step() {
        let mut tiles = Vec::new();
        for x in 0..10 {
            for y in 0..10 {
                tiles.push(Tile::new(Point::new(x, y), TileKind::Floor));
            }
        }
        let mut grid = WorldGrid::new(tiles, Point::new(0, 0), eager_rules(), 42);
        let chaser = grid.spawn_enemy(EnemySpawn {
            kind: EntityKind::ChasingEnemy,
            point: Point::new(9, 9),
            facing: Direction::Up,
        });
        let patrol = grid.spawn_enemy(EnemySpawn {
            kind: EntityKind::PatrolEnemy,
            point: Point::new(5, 0),
            facing: Direction::Down,
        });
        for _ in 0..12 {
            let before = [grid.position_of(chaser), grid.position_of(patrol)];
            grid.advance(None);
            let after = [grid.position_of(chaser), grid.position_of(patrol)];
            for (b, a) in before.iter().zip(after.iter()) {
                let (Some(b), Some(a)) = (b, a) else {
                    panic!("enemy lost its position");
                };
                assert!(step_length(*b, *a) <= 1);
            }
        }
        assert_eq!(grid.entity_count(), 3);
    }
}
