use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_terminal::prelude::*;

use crate::{
    data::EntityKind,
    geometry::Direction,
    map::TileKind,
    simulation::{Outcome, RenderKind, RenderSnapshot},
};

// Pan when the player gets this close to a screen edge.
pub const PAN_TRIGGER_DIST_X: i32 = 20;
pub const PAN_TRIGGER_DIST_Y: i32 = 10;
pub const PAN_INCREMENT: i32 = 1;
pub const VIEW_DISTANCE: i32 = 20;
pub const HUD_ROWS: i32 = 3;

const WIN_MOVE_BUDGET: i64 = 500;
const WIN_SCORE_FACTOR: f64 = 3.4253;

/// Camera offset owned by the terminal front end. World point `p` draws at
/// `p - pan`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    pub pan_x: i32,
    pub pan_y: i32,
}

impl Viewport {
    pub fn centered_on(target: Point, screen_w: i32, screen_h: i32) -> Self {
        Self {
            pan_x: target.x - screen_w / 2,
            pan_y: target.y - screen_h / 2,
        }
    }

    pub fn to_screen(&self, point: Point, screen_w: i32, screen_h: i32) -> Option<Point> {
        let x = point.x - self.pan_x;
        let y = point.y - self.pan_y;
        if x < 0 || y < 0 || x >= screen_w || y >= screen_h {
            None
        } else {
            Some(Point::new(x, y))
        }
    }

    pub fn center(&self, screen_w: i32, screen_h: i32) -> Point {
        Point::new(self.pan_x + screen_w / 2, self.pan_y + screen_h / 2)
    }

    /// Nudges the camera once per tick while the player hugs an edge.
    pub fn follow(&mut self, player: Point, screen_w: i32, screen_h: i32) {
        let x = player.x - self.pan_x;
        let y = player.y - self.pan_y;
        if x < PAN_TRIGGER_DIST_X {
            self.pan_x -= PAN_INCREMENT;
        } else if x >= screen_w - PAN_TRIGGER_DIST_X {
            self.pan_x += PAN_INCREMENT;
        }
        if y < PAN_TRIGGER_DIST_Y {
            self.pan_y -= PAN_INCREMENT;
        } else if y >= screen_h - PAN_TRIGGER_DIST_Y {
            self.pan_y += PAN_INCREMENT;
        }
    }

    /// One cell per axis toward `target`; true once both axes are there.
    pub fn approach(&mut self, target: Viewport) -> bool {
        self.pan_x += (target.pan_x - self.pan_x).signum();
        self.pan_y += (target.pan_y - self.pan_y).signum();
        *self == target
    }
}

/// Light radius test; horizontal distance counts half because terminal
/// cells are about twice as tall as wide.
pub fn is_lit(point: Point, light: Point) -> bool {
    let stretched = Point::new(point.x - light.x, (point.y - light.y) * 2);
    let radius = (VIEW_DISTANCE * 2) as f32;
    DistanceAlg::PythagorasSquared.distance2d(Point::new(0, 0), stretched) < radius * radius
}

pub fn glyph_for(kind: &RenderKind) -> (FontCharType, RGB, RGB) {
    let on_white = RGB::named(WHITE);
    match kind {
        RenderKind::Tile(TileKind::Floor) => (to_cp437('█'), RGB::named(WHITE), RGB::named(BLACK)),
        RenderKind::Tile(TileKind::PassageFloor { .. }) => {
            (to_cp437('▓'), RGB::named(GRAY), RGB::named(BLACK))
        }
        RenderKind::Tile(TileKind::Death) => (to_cp437('X'), RGB::named(RED), on_white),
        RenderKind::Tile(TileKind::Finish) => (to_cp437('F'), RGB::named(GREEN), on_white),
        RenderKind::Entity {
            kind: EntityKind::Player,
            ..
        } => (to_cp437('@'), RGB::named(BLUE), on_white),
        RenderKind::Entity {
            kind: EntityKind::PatrolEnemy,
            facing,
        } => (patrol_glyph(*facing), RGB::named(RED), on_white),
        RenderKind::Entity {
            kind: EntityKind::ChasingEnemy,
            ..
        } => (to_cp437('!'), RGB::named(RED), on_white),
    }
}

fn patrol_glyph(facing: Option<Direction>) -> FontCharType {
    match facing {
        Some(Direction::Up) => to_cp437('^'),
        Some(Direction::Down) => to_cp437('v'),
        Some(Direction::Left) => to_cp437('<'),
        Some(Direction::Right) | None => to_cp437('>'),
    }
}

/// Draws every lit cell that lands on screen; everything else is skipped.
pub fn draw_world(ctx: &mut BTerm, snapshot: &RenderSnapshot, viewport: &Viewport, light: Point) {
    let (screen_w, screen_h) = map_area(ctx);
    for cell in &snapshot.cells {
        if !is_lit(cell.point, light) {
            continue;
        }
        let Some(screen) = viewport.to_screen(cell.point, screen_w, screen_h) else {
            continue;
        };
        let (glyph, fg, bg) = glyph_for(&cell.kind);
        ctx.set(screen.x, screen.y, fg, bg, glyph);
    }
}

pub fn draw_hud(ctx: &mut BTerm, moves: u64, log: &[String]) {
    let (width, height) = ctx.get_char_size();
    let width = width as i32;
    let height = height as i32;
    let message = format!(
        "Arrow keys to move. Q to quit. Your goal: get to the green F without dying. Move count: {moves}"
    );
    let mut lines = wrap(&message, width.max(1) as usize);
    if let Some(latest) = log.first() {
        lines.insert(0, latest.clone());
    }
    let top = height - lines.len() as i32;
    for (row, line) in lines.iter().enumerate() {
        ctx.print_color(
            0,
            top + row as i32,
            RGB::named(WHITE),
            RGB::named(BLACK),
            line,
        );
    }
}

pub fn draw_outcome(ctx: &mut BTerm, outcome: Outcome) {
    let (_, height) = ctx.get_char_size();
    let middle = height as i32 / 2;
    let headline = match outcome {
        Outcome::Win(moves) => format!("Yay you won. You scored {}", score(moves)),
        Outcome::Lose(_) => "Haha you died".to_string(),
        Outcome::Aborted => "Run abandoned".to_string(),
    };
    ctx.print_color_centered(middle, RGB::named(YELLOW), RGB::named(BLACK), &headline);
    ctx.print_color_centered(
        middle + 1,
        RGB::named(WHITE),
        RGB::named(BLACK),
        "Press q to exit",
    );
}

pub fn score(moves: u64) -> i64 {
    let remaining = (WIN_MOVE_BUDGET - moves as i64).max(0);
    (remaining as f64 * WIN_SCORE_FACTOR) as i64
}

pub fn map_area(ctx: &BTerm) -> (i32, i32) {
    let (width, height) = ctx.get_char_size();
    (width as i32, (height as i32 - HUD_ROWS).max(0))
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
