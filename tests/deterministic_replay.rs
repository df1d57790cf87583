use terminal_maze::{
    MazeConfig, Outcome, RenderSnapshot, Session, geometry::step_length,
    scripted_input::ScriptedInput, simulation::IntentSource,
};

const SCRIPT: &str = "\
# wander the start room, then probe the corridors
dddd ssss aaaa wwww
..........
llll jjjj hhhh kkkk
dddddddd ssssssss
";

fn replay_config() -> MazeConfig {
    MazeConfig {
        max_x: 80,
        max_y: 40,
        min_rooms: 6,
        max_rooms: 12,
        min_room_size: 6,
        max_room_size: 16,
        max_enemies_per_room: 3,
        ..MazeConfig::default()
    }
}

fn record(seed: u64) -> (Vec<RenderSnapshot>, Option<Outcome>) {
    let mut session = Session::generate(&replay_config(), seed).expect("valid config");
    let mut input = ScriptedInput::from_script(SCRIPT);
    let mut frames = vec![session.snapshot()];
    loop {
        let outcome = session.step(input.poll_intent());
        frames.push(session.snapshot());
        if outcome.is_some() {
            return (frames, outcome);
        }
    }
}

#[test]
fn identical_seed_and_script_replay_identically() {
    for seed in [1, 99, 0xfeed] {
        let (first_frames, first_outcome) = record(seed);
        let (second_frames, second_outcome) = record(seed);
        assert_eq!(first_outcome, second_outcome);
        assert_eq!(first_frames.len(), second_frames.len());
        for (a, b) in first_frames.iter().zip(second_frames.iter()) {
            assert_eq!(a, b, "seed {seed}: frames diverged at tick {}", a.tick);
        }
    }
}

#[test]
fn every_entity_moves_at_most_one_orthogonal_step_per_tick() {
    let (frames, _) = record(4242);
    for pair in frames.windows(2) {
        let before: Vec<_> = entity_points(&pair[0]);
        let after: Vec<_> = entity_points(&pair[1]);
        assert_eq!(before.len(), after.len(), "entities are never removed");
        for (b, a) in before.iter().zip(after.iter()) {
            assert!(step_length(*b, *a) <= 1, "moved from {b:?} to {a:?}");
        }
    }
}

#[test]
fn dead_players_stay_dead_across_frames() {
    for seed in 0..8 {
        let (frames, outcome) = record(seed);
        if let Some(first_dead) = frames.iter().position(|frame| !frame.alive) {
            assert!(frames[first_dead..].iter().all(|frame| !frame.alive));
            assert!(matches!(outcome, Some(Outcome::Lose(_))));
        }
    }
}

fn entity_points(frame: &RenderSnapshot) -> Vec<bracket_geometry::prelude::Point> {
    frame
        .cells
        .iter()
        .filter(|cell| {
            matches!(
                cell.kind,
                terminal_maze::simulation::RenderKind::Entity { .. }
            )
        })
        .map(|cell| cell.point)
        .collect()
}
