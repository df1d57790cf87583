use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

pub const COMPASS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step in screen coordinates (y grows downward).
    pub fn delta(self) -> Point {
        match self {
            Direction::Up => Point::new(0, -1),
            Direction::Down => Point::new(0, 1),
            Direction::Left => Point::new(-1, 0),
            Direction::Right => Point::new(1, 0),
        }
    }

    pub fn step_from(self, point: Point) -> Point {
        let delta = self.delta();
        Point::new(point.x + delta.x, point.y + delta.y)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Axis-aligned room rectangle. Edges are inclusive: a room covers
/// `x..=right_x` by `y..=bottom_y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right_x(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom_y(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> i32 {
        (self.x + self.right_x()) / 2
    }

    pub fn center_y(&self) -> i32 {
        (self.y + self.bottom_y()) / 2
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn area(&self) -> i32 {
        self.width * self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right_x()
            && point.y >= self.y
            && point.y <= self.bottom_y()
    }

    /// Overlap or shared/adjacent edge, tested by growing `self` one cell on
    /// every side before the inclusive intersection test.
    pub fn touches(&self, other: &Room) -> bool {
        let grown = Room::new(self.x - 1, self.y - 1, self.width + 2, self.height + 2);
        grown.intersects(other)
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.right_x() >= other.x
            && self.x <= other.right_x()
            && self.bottom_y() >= other.y
            && self.y <= other.bottom_y()
    }
}

/// Squared Euclidean distance, widened so far-apart points cannot overflow.
pub fn distance_squared(a: Point, b: Point) -> i64 {
    let dx = i64::from(a.x) - i64::from(b.x);
    let dy = i64::from(a.y) - i64::from(b.y);
    dx * dx + dy * dy
}

/// Manhattan length of a step; a single orthogonal move has length 1.
pub fn step_length(from: Point, to: Point) -> i32 {
    (from.x - to.x).abs() + (from.y - to.y).abs()
}
