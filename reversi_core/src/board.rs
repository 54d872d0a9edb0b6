// The 8x8 board grid.
//
// `Board` is plain cell storage: read, write, count, and the two canonical
// layouts (empty and the four-center opening). It performs no legality
// checks — all of those live in `rules.rs`. The grid is indexed `[y][x]`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{BOARD_SIZE, Cell, Color, Scores, Square};

/// Total number of cells; the board invariant is that black + white + empty
/// always sums to this.
pub const CELL_COUNT: u32 = (BOARD_SIZE * BOARD_SIZE) as u32;

/// The 8x8 grid of cell occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    /// A board with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE as usize]; BOARD_SIZE as usize],
        }
    }

    /// The standard Othello opening: white on (3,3) and (4,4), black on
    /// (3,4) and (4,3).
    pub fn starting_position() -> Self {
        let mut board = Self::empty();
        board.set(Square::new(3, 3), Cell::White);
        board.set(Square::new(3, 4), Cell::Black);
        board.set(Square::new(4, 3), Cell::Black);
        board.set(Square::new(4, 4), Cell::White);
        board
    }

    /// Occupancy at `square`. The square must be in bounds.
    pub fn get(&self, square: Square) -> Cell {
        self.cells[square.y as usize][square.x as usize]
    }

    /// Overwrite the cell at `square`. The square must be in bounds.
    pub fn set(&mut self, square: Square, cell: Cell) {
        self.cells[square.y as usize][square.x as usize] = cell;
    }

    /// Count the stones of both colors.
    pub fn count_stones(&self) -> Scores {
        let mut scores = Scores::default();
        for row in &self.cells {
            for cell in row {
                match cell.color() {
                    Some(Color::Black) => scores.black += 1,
                    Some(Color::White) => scores.white += 1,
                    None => {}
                }
            }
        }
        scores
    }

    /// True when no empty cell remains.
    pub fn is_full(&self) -> bool {
        self.count_stones().total() == CELL_COUNT
    }

    /// True if `color` has at least one stone on the board.
    pub fn has_stones(&self, color: Color) -> bool {
        self.count_stones().of(color) > 0
    }

    /// All in-bounds squares in row-major order.
    pub fn squares() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Square::new(x, y)))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let glyph = match cell {
                    Cell::Empty => '.',
                    Cell::Black => 'b',
                    Cell::White => 'w',
                };
                write!(f, "{glyph} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
