use std::{fs::File, path::PathBuf, sync::Mutex};

use anyhow::{Context, Result, anyhow, bail};
use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::*;
use chrono::Utc;
use terminal_maze::{
    MazeConfig, Outcome, RenderSink, RenderSnapshot, Session,
    ecs::resources::Alert,
    render::{Viewport, draw_hud, draw_outcome, draw_world, map_area},
    scripted_input::ScriptedInput,
    simulation::Intent,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "terminal-maze.log";
const LOG_MAX_ENTRIES: usize = 8;
const INTRO_SCATTER_X: i32 = 50;
const INTRO_SCATTER_Y: i32 = 25;

#[derive(Debug, Default)]
struct Args {
    seed: Option<u64>,
    config: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut raw = std::env::args().skip(1);
    while let Some(flag) = raw.next() {
        let mut value = || {
            raw.next()
                .with_context(|| format!("{flag} expects a value"))
        };
        match flag.as_str() {
            "--seed" => {
                let seed = value()?;
                args.seed = Some(seed.parse().with_context(|| format!("bad seed {seed}"))?);
            }
            "--config" => args.config = Some(PathBuf::from(value()?)),
            "--script" => args.script = Some(PathBuf::from(value()?)),
            other => bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Intro,
    Playing,
    Over(Outcome),
}

struct MazeState {
    session: Session,
    snapshot: RenderSnapshot,
    viewport: Viewport,
    phase: Phase,
    message_log: Vec<String>,
}

impl MazeState {
    fn new(mut session: Session, seed: u64) -> Self {
        let snapshot = session.snapshot();
        let mut rng = RandomNumberGenerator::seeded(seed);
        let viewport = Viewport {
            pan_x: snapshot.player.x + rng.range(-INTRO_SCATTER_X, INTRO_SCATTER_X + 1),
            pan_y: snapshot.player.y + rng.range(-INTRO_SCATTER_Y, INTRO_SCATTER_Y + 1),
        };
        Self {
            session,
            snapshot,
            viewport,
            phase: Phase::Intro,
            message_log: Vec::new(),
        }
    }
}

impl GameState for MazeState {
    fn tick(&mut self, ctx: &mut BTerm) {
        let (screen_w, screen_h) = map_area(ctx);
        match self.phase {
            Phase::Intro => {
                let target = Viewport::centered_on(self.snapshot.player, screen_w, screen_h);
                if self.viewport.approach(target) {
                    self.phase = Phase::Playing;
                }
            }
            Phase::Playing => self.handle_input(ctx, screen_w, screen_h),
            Phase::Over(_) => {
                if matches!(ctx.key, Some(VirtualKeyCode::Q | VirtualKeyCode::Escape)) {
                    ctx.quit();
                }
            }
        }

        ctx.cls();
        let light = match self.phase {
            Phase::Intro => self.viewport.center(screen_w, screen_h),
            _ => self.snapshot.player,
        };
        match self.phase {
            Phase::Over(outcome) => draw_outcome(ctx, outcome),
            _ => {
                draw_world(ctx, &self.snapshot, &self.viewport, light);
                draw_hud(ctx, self.snapshot.tick, &self.message_log);
            }
        }
    }
}

impl MazeState {
    fn handle_input(&mut self, ctx: &mut BTerm, screen_w: i32, screen_h: i32) {
        let Some(intent) = ctx.key.and_then(key_to_intent) else {
            return;
        };
        let outcome = self.session.step(intent);
        self.snapshot = self.session.snapshot();
        let bumps: Vec<String> = self
            .snapshot
            .alerts
            .iter()
            .map(|alert| match alert {
                Alert::Blocked { at } => format!("Bump! {},{} is not walkable", at.x, at.y),
            })
            .collect();
        for entry in bumps {
            self.push_log_entry(entry);
        }
        self.viewport.follow(self.snapshot.player, screen_w, screen_h);

        if let Some(outcome) = outcome {
            log_summary(&self.session);
            if outcome == Outcome::Aborted {
                ctx.quit();
            }
            self.phase = Phase::Over(outcome);
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(LOG_MAX_ENTRIES);
    }
}

fn key_to_intent(key: VirtualKeyCode) -> Option<Intent> {
    match key {
        VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::K => Some(Intent::Up),
        VirtualKeyCode::Down | VirtualKeyCode::S | VirtualKeyCode::J => Some(Intent::Down),
        VirtualKeyCode::Left | VirtualKeyCode::A | VirtualKeyCode::H => Some(Intent::Left),
        VirtualKeyCode::Right | VirtualKeyCode::D | VirtualKeyCode::L => Some(Intent::Right),
        VirtualKeyCode::Period | VirtualKeyCode::Space => Some(Intent::Wait),
        VirtualKeyCode::Q | VirtualKeyCode::Escape => Some(Intent::Quit),
        _ => None,
    }
}

/// Headless sink for scripted runs: one trace line per frame.
struct TraceSink;

impl RenderSink for TraceSink {
    fn present(&mut self, snapshot: &RenderSnapshot) {
        let Point { x, y } = snapshot.player;
        debug!(
            tick = snapshot.tick,
            x,
            y,
            alive = snapshot.alive,
            finished = snapshot.finished,
            alerts = snapshot.alerts.len(),
            "frame"
        );
    }
}

fn log_summary(session: &Session) {
    match serde_json::to_string(&session.summary()) {
        Ok(json) => info!(summary = %json, "session summary"),
        Err(err) => warn!(%err, "could not encode session summary"),
    }
}

fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    init_logging()?;
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => MazeConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MazeConfig::default(),
    };
    let seed = args
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis() as u64);
    let mut session = Session::generate(&config, seed).context("generating maze")?;
    info!(seed, "session ready");

    if let Some(path) = &args.script {
        let mut input = ScriptedInput::from_file(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let outcome = session.run(&mut input, &mut TraceSink);
        info!(?outcome, "scripted run finished");
        println!("{}", serde_json::to_string_pretty(&session.summary())?);
        return Ok(());
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Terminal Maze")
        .build()
        .map_err(|err| anyhow!("opening terminal: {err}"))?;
    let game_state = MazeState::new(session, seed);
    main_loop(context, game_state).map_err(|err| anyhow!("terminal loop: {err}"))
}
