// Core types shared across the engine.
//
// Defines the two player colors, cell occupancy, board coordinates, stone
// counts, and game outcomes. All types derive `Serialize`/`Deserialize` so
// that wire messages and session state share one vocabulary.
//
// `Color` serializes as lowercase (`"black"`/`"white"`) — that is what the
// peer protocol carries inside `Move` messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board edge length. The game is always played on an 8x8 grid.
pub const BOARD_SIZE: i32 = 8;

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other player's color.
    pub fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Occupancy of a single board cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The stone color occupying this cell, if any.
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Color::Black),
            Cell::White => Some(Color::White),
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Cell::Black,
            Color::White => Cell::White,
        }
    }
}

/// A board coordinate. `(0, 0)` is the top-left corner; `x` grows rightward
/// and `y` grows downward. Components are `i32` so that direction scans can
/// step off the edge and be caught by `in_bounds()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    pub x: i32,
    pub y: i32,
}

impl Square {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True if the coordinate lies on the board.
    pub fn in_bounds(self) -> bool {
        (0..BOARD_SIZE).contains(&self.x) && (0..BOARD_SIZE).contains(&self.y)
    }

    /// The square one step away in direction `(dx, dy)`. May be off-board.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Stone counts for both players.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub black: u32,
    pub white: u32,
}

impl Scores {
    pub fn total(self) -> u32 {
        self.black + self.white
    }

    pub fn of(self, color: Color) -> u32 {
        match color {
            Color::Black => self.black,
            Color::White => self.white,
        }
    }
}

/// The result of a finished game, computed from live stone counts at the
/// moment the terminal condition is detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Color),
    Tie,
}

impl Outcome {
    /// Derive the outcome from final stone counts: strictly more stones wins,
    /// equal counts tie.
    pub fn from_scores(scores: Scores) -> Self {
        if scores.black > scores.white {
            Outcome::Win(Color::Black)
        } else if scores.white > scores.black {
            Outcome::Win(Color::White)
        } else {
            Outcome::Tie
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(color) => write!(f, "{color} wins"),
            Outcome::Tie => write!(f, "tie"),
        }
    }
}
