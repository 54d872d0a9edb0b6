// Move legality and capture computation.
//
// Every function here is a pure function over a `Board` — no timing, no
// session state, no I/O. The session layer (`session.rs`) and the remote
// peer driver both call into these; inbound network moves are re-validated
// through the exact same `apply_move` path as local input.
//
// A placement at `square` is legal for `color` iff the square is empty and
// at least one of the 8 directions is *capturing*: scanning strictly beyond
// the square along the direction vector, the run starts with one or more
// opponent stones and is terminated, before leaving the board, by a stone of
// `color`. Hitting the edge or an empty cell first makes the direction
// non-capturing, and a zero-length opponent run is never capturing.

use smallvec::SmallVec;
use std::fmt;

use crate::board::Board;
use crate::types::{Color, Square};

/// The 8 scan directions: every `(dx, dy)` in `{-1, 0, 1}²` except `(0, 0)`.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Squares captured by a single move. Inline capacity covers typical
/// captures; the theoretical maximum is 19, which spills to the heap.
pub type FlipSet = SmallVec<[Square; 8]>;

/// A rejected placement. The board is untouched when this is returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidMove {
    pub square: Square,
    pub color: Color,
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid move at {} for {}", self.square, self.color)
    }
}

impl std::error::Error for InvalidMove {}

/// In-bounds squares strictly beyond `square` along `(dx, dy)`, nearest
/// first. Finite and restartable — call it again for a fresh scan.
pub fn scan_from(square: Square, dx: i32, dy: i32) -> impl Iterator<Item = Square> {
    std::iter::successors(Some(square.offset(dx, dy)), move |s| {
        Some(s.offset(dx, dy))
    })
    .take_while(|s| s.in_bounds())
}

/// True if placing `color` at `square` captures at least one stone along
/// `(dx, dy)`.
pub fn is_capturing_direction(
    board: &Board,
    square: Square,
    dx: i32,
    dy: i32,
    color: Color,
) -> bool {
    let mut run_started = false;
    for scanned in scan_from(square, dx, dy) {
        match board.get(scanned).color() {
            // Opponent stones extend the run.
            Some(c) if c == color.opposite() => run_started = true,
            // Our own stone terminates it; capturing only if the run is
            // non-empty.
            Some(_) => return run_started,
            // An empty cell before a terminator breaks the run.
            None => return false,
        }
    }
    // Ran off the edge without finding a terminator.
    false
}

/// True iff `square` is an empty, on-board cell with at least one capturing
/// direction for `color`.
pub fn is_valid_move(board: &Board, square: Square, color: Color) -> bool {
    square.in_bounds()
        && board.get(square).is_empty()
        && DIRECTIONS
            .iter()
            .any(|&(dx, dy)| is_capturing_direction(board, square, dx, dy, color))
}

/// The union over all capturing directions of the opponent stones strictly
/// between `square` and each terminating stone. Empty if the move is not
/// valid.
pub fn compute_flips(board: &Board, square: Square, color: Color) -> FlipSet {
    let mut flips = FlipSet::new();
    if !square.in_bounds() || !board.get(square).is_empty() {
        return flips;
    }
    for &(dx, dy) in &DIRECTIONS {
        if !is_capturing_direction(board, square, dx, dy, color) {
            continue;
        }
        for scanned in scan_from(square, dx, dy) {
            if board.get(scanned).color() == Some(color) {
                break;
            }
            flips.push(scanned);
        }
    }
    flips
}

/// Validate and apply a move: set `square` to `color`, flip every captured
/// stone, and return the flipped set. The only board mutation entry point
/// besides reset. Fails without touching the board if the move is illegal.
pub fn apply_move(board: &mut Board, square: Square, color: Color) -> Result<FlipSet, InvalidMove> {
    if !is_valid_move(board, square, color) {
        return Err(InvalidMove { square, color });
    }
    let flips = compute_flips(board, square, color);
    board.set(square, color.into());
    for &flipped in &flips {
        board.set(flipped, color.into());
    }
    Ok(flips)
}

/// True if `color` has at least one legal placement anywhere on the board.
pub fn has_any_valid_move(board: &Board, color: Color) -> bool {
    Board::squares().any(|square| is_valid_move(board, square, color))
}

/// Every legal placement for `color`, in row-major order.
pub fn valid_moves(board: &Board, color: Color) -> Vec<Square> {
    Board::squares()
        .filter(|&square| is_valid_move(board, square, color))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CELL_COUNT;
    use crate::types::{Cell, Scores};

    /// Build a board from explicit stone lists.
    fn board_with(black: &[(i32, i32)], white: &[(i32, i32)]) -> Board {
        let mut board = Board::empty();
        for &(x, y) in black {
            board.set(Square::new(x, y), Cell::Black);
        }
        for &(x, y) in white {
            board.set(Square::new(x, y), Cell::White);
        }
        board
    }

    #[test]
    fn opening_black_move_captures_center_white() {
        // Scenario A: on the starting board, black at (2,3) captures the
        // white stone at (3,3) and nothing else.
        let board = Board::starting_position();
        let square = Square::new(2, 3);
        assert!(is_valid_move(&board, square, Color::Black));
        let flips = compute_flips(&board, square, Color::Black);
        assert_eq!(flips.as_slice(), &[Square::new(3, 3)]);
    }

    #[test]
    fn opening_counts_after_black_plays() {
        // Scenario B: after black plays (2,3), black has 4 stones and white 1.
        let mut board = Board::starting_position();
        let flips = apply_move(&mut board, Square::new(2, 3), Color::Black).unwrap();
        assert_eq!(flips.len(), 1);
        assert_eq!(board.count_stones(), Scores { black: 4, white: 1 });
    }

    #[test]
    fn opening_valid_moves_for_white() {
        let board = Board::starting_position();
        assert_eq!(
            valid_moves(&board, Color::White),
            vec![
                Square::new(4, 2),
                Square::new(5, 3),
                Square::new(2, 4),
                Square::new(3, 5),
            ]
        );
    }

    #[test]
    fn occupied_square_is_never_valid() {
        let board = Board::starting_position();
        assert!(!is_valid_move(&board, Square::new(3, 3), Color::Black));
        assert!(!is_valid_move(&board, Square::new(3, 4), Color::Black));
    }

    #[test]
    fn out_of_bounds_square_is_never_valid() {
        let board = Board::starting_position();
        assert!(!is_valid_move(&board, Square::new(-1, 3), Color::Black));
        assert!(!is_valid_move(&board, Square::new(3, 8), Color::White));
    }

    #[test]
    fn zero_length_run_is_not_capturing() {
        // A neighbor of our own color with no opponent stones in between
        // does not make the direction capturing.
        let board = board_with(&[(2, 2)], &[]);
        assert!(!is_capturing_direction(
            &board,
            Square::new(1, 2),
            1,
            0,
            Color::Black
        ));
        assert!(!is_valid_move(&board, Square::new(1, 2), Color::Black));
    }

    #[test]
    fn run_reaching_edge_is_not_capturing() {
        // Opponent stones all the way to the edge, no terminator.
        let board = board_with(&[], &[(5, 0), (6, 0), (7, 0)]);
        assert!(!is_capturing_direction(
            &board,
            Square::new(4, 0),
            1,
            0,
            Color::Black
        ));
    }

    #[test]
    fn run_broken_by_empty_cell_is_not_capturing() {
        // black would need (3,0)..(4,0) contiguous white ending in black;
        // the gap at (4,0) breaks the run before the terminator at (5,0).
        let board = board_with(&[(5, 0)], &[(3, 0)]);
        assert!(!is_capturing_direction(
            &board,
            Square::new(2, 0),
            1,
            0,
            Color::Black
        ));
    }

    #[test]
    fn flips_collected_from_multiple_directions() {
        // White at (3,3) captures in two directions at once.
        let board = board_with(
            &[(4, 3), (3, 4)],
            &[(5, 3), (3, 5)],
        );
        let flips = compute_flips(&board, Square::new(3, 3), Color::White);
        let mut got: Vec<Square> = flips.to_vec();
        got.sort();
        assert_eq!(got, vec![Square::new(3, 4), Square::new(4, 3)]);
    }

    #[test]
    fn apply_move_rejects_illegal_placement() {
        let mut board = Board::starting_position();
        let before = board.clone();
        let err = apply_move(&mut board, Square::new(0, 0), Color::Black).unwrap_err();
        assert_eq!(err.square, Square::new(0, 0));
        assert_eq!(err.color, Color::Black);
        // No mutation on failure.
        assert_eq!(board, before);
    }

    #[test]
    fn apply_move_touches_only_target_and_flips() {
        let mut board = Board::starting_position();
        let before = board.clone();
        let square = Square::new(2, 3);
        let flips = apply_move(&mut board, square, Color::Black).unwrap();

        for scanned in Board::squares() {
            if scanned == square || flips.contains(&scanned) {
                assert_eq!(board.get(scanned), Cell::Black);
            } else {
                assert_eq!(board.get(scanned), before.get(scanned));
            }
        }
    }

    #[test]
    fn cell_count_conserved_across_moves() {
        let mut board = Board::starting_position();
        apply_move(&mut board, Square::new(2, 3), Color::Black).unwrap();
        apply_move(&mut board, Square::new(2, 2), Color::White).unwrap();
        let scores = board.count_stones();
        let empties = Board::squares()
            .filter(|&s| board.get(s).is_empty())
            .count() as u32;
        assert_eq!(scores.total() + empties, CELL_COUNT);
    }

    #[test]
    fn validation_is_pure_and_repeatable() {
        let board = Board::starting_position();
        let square = Square::new(2, 3);
        let first = compute_flips(&board, square, Color::Black);
        let second = compute_flips(&board, square, Color::Black);
        assert_eq!(first, second);
        assert_eq!(
            is_valid_move(&board, square, Color::Black),
            is_valid_move(&board, square, Color::Black)
        );
    }

    #[test]
    fn scan_from_stays_on_board() {
        let scanned: Vec<Square> = scan_from(Square::new(6, 6), 1, 1).collect();
        assert_eq!(scanned, vec![Square::new(7, 7)]);
        assert_eq!(scan_from(Square::new(0, 0), -1, -1).count(), 0);
        assert_eq!(scan_from(Square::new(0, 3), 1, 0).count(), 7);
    }

    #[test]
    fn has_any_valid_move_matches_valid_moves() {
        let board = Board::starting_position();
        assert!(has_any_valid_move(&board, Color::Black));
        assert!(has_any_valid_move(&board, Color::White));

        let lone = board_with(&[(0, 0)], &[]);
        // No captures possible anywhere for either side.
        assert!(!has_any_valid_move(&lone, Color::Black));
        assert!(!has_any_valid_move(&lone, Color::White));
        assert!(valid_moves(&lone, Color::White).is_empty());
    }
}
