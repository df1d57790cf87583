use bracket_random::prelude::RandomNumberGenerator;
use specs::prelude::*;
use tracing::debug;

use super::{
    components::{Actor, Brain, IntentStep, PlayerState, Position},
    resources::{Alert, AlertLog, ChaseRules, Occupancy},
};
use crate::{
    ai::{CollisionView, PatrolMove, chase_step, patrol_step},
    data::Kind,
    map::TileLayer,
};

/// Applies the queued player step, then settles death and finish flags.
#[derive(Default)]
pub struct PlayerMovementSystem;

impl<'a> System<'a> for PlayerMovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        ReadStorage<'a, Actor>,
        WriteStorage<'a, PlayerState>,
        WriteStorage<'a, IntentStep>,
        ReadExpect<'a, TileLayer>,
        WriteExpect<'a, Occupancy>,
        WriteExpect<'a, AlertLog>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut positions,
            actors,
            mut players,
            mut intents,
            tiles,
            mut occupancy,
            mut alerts,
        ): Self::SystemData,
    ) {
        for (entity, pos, actor, state) in (&entities, &mut positions, &actors, &mut players).join()
        {
            let intent = intents.remove(entity);
            if !state.alive {
                continue;
            }

            let mut candidate = None;
            if let Some(step) = intent {
                let target = step.direction.step_from(pos.point);
                let legal = CollisionView::new(&tiles, &occupancy).can_enter(actor.kind, target);
                if legal {
                    occupancy.relocate(entity, pos.point, target);
                    pos.point = target;
                } else {
                    debug!(x = target.x, y = target.y, "player move blocked");
                    alerts.push(Alert::Blocked { at: target });
                }
                candidate = Some(target);
            }

            let view = CollisionView::new(&tiles, &occupancy);
            let lethal_target = candidate.is_some_and(|target| view.is_lethal(actor.kind, target));
            if lethal_target || view.is_lethal(actor.kind, pos.point) {
                state.kill();
            }
            state.finished = tiles.has_kind(pos.point, Kind::Finish);
        }
    }
}

/// Moves every autonomous entity once, in creation order, against the
/// player's already-updated position.
#[derive(Default)]
pub struct EnemySystem;

impl<'a> System<'a> for EnemySystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, Brain>,
        ReadStorage<'a, PlayerState>,
        ReadExpect<'a, TileLayer>,
        WriteExpect<'a, Occupancy>,
        ReadExpect<'a, ChaseRules>,
        WriteExpect<'a, RandomNumberGenerator>,
    );

    fn run(
        &mut self,
        (
            entities,
            mut positions,
            mut brains,
            players,
            tiles,
            mut occupancy,
            rules,
            mut rng,
        ): Self::SystemData,
    ) {
        let player_point = {
            let positions_ref: &WriteStorage<Position> = &positions;
            (positions_ref, &players)
                .join()
                .next()
                .map(|(pos, _)| pos.point)
        };

        for (entity, pos, brain) in (&entities, &mut positions, &mut brains).join() {
            let destination = match brain {
                Brain::Patrol { facing } => {
                    let view = CollisionView::new(&tiles, &occupancy);
                    match patrol_step(&view, pos.point, *facing) {
                        PatrolMove::Step(to) => Some(to),
                        PatrolMove::Turn(reversed) => {
                            *facing = reversed;
                            None
                        }
                    }
                }
                Brain::Chaser => {
                    let roll = rng.range(0.0_f32, 1.0_f32);
                    if roll >= rules.movement_chance {
                        continue;
                    }
                    let view = CollisionView::new(&tiles, &occupancy);
                    player_point.and_then(|player| chase_step(&view, pos.point, player, &rules))
                }
            };

            if let Some(to) = destination {
                occupancy.relocate(entity, pos.point, to);
                pos.point = to;
            }
        }
    }
}

/// Catches hazards that walked onto a player who did not move.
#[derive(Default)]
pub struct LethalitySystem;

impl<'a> System<'a> for LethalitySystem {
    type SystemData = (
        ReadStorage<'a, Position>,
        ReadStorage<'a, Actor>,
        WriteStorage<'a, PlayerState>,
        ReadExpect<'a, TileLayer>,
        ReadExpect<'a, Occupancy>,
    );

    fn run(&mut self, (positions, actors, mut players, tiles, occupancy): Self::SystemData) {
        let view = CollisionView::new(&tiles, &occupancy);
        for (pos, actor, state) in (&positions, &actors, &mut players).join() {
            if state.alive && view.is_lethal(actor.kind, pos.point) {
                state.kill();
            }
        }
    }
}
