// Game session state and the turn/pass state machine.
//
// `GameSession` owns one `Board` plus the phase of play. It is the single
// mutation surface for a game: `try_move`, `complete_pass`, and `reset` are
// the only operations, each returning the ordered `GameEvent` notifications
// the change produced. The session is deterministic — identical inputs on
// identical sessions yield identical boards and events — which is what keeps
// two peers consistent without any shared memory.
//
// Phase transitions:
//
//   AwaitingMove(c) --try_move(c) ok--> evaluate c's opponent:
//       either color at zero stones, board full, or neither color can
//       move                        -> GameOver(outcome from live counts)
//       opponent has no move        -> Passing(opponent)
//       otherwise                   -> AwaitingMove(opponent)
//
//   Passing(c) --complete_pass--> same evaluation with c as the skipped
//       mover. Nothing else leaves Passing except reset.
//
//   any phase --reset--> AwaitingMove(White), starting board.
//
// Timing deliberately lives elsewhere: `Passing` carries no deadline. The
// driver (`reversi_peer`) arms the 1-second countdown and calls
// `complete_pass` on expiry, keeping this crate free of clocks and directly
// testable.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::events::GameEvent;
use crate::rules;
use crate::types::{Color, Outcome, Square};

/// Where the state machine currently stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for a placement by `Color`.
    AwaitingMove(Color),
    /// `Color` has no legal placement; a driver-owned countdown is running.
    Passing(Color),
    /// Terminal for the session (absent an explicit reset).
    GameOver(Outcome),
}

/// Why a move attempt was rejected. The session is untouched in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveError {
    /// The game already reached a terminal position.
    GameAlreadyOver,
    /// A pass countdown is pending; no move can be played until it clears.
    PassPending,
    /// It is the other color's turn.
    OutOfTurn { expected: Color },
    /// The placement violates the capture rules.
    Illegal { square: Square },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::GameAlreadyOver => write!(f, "the game is over"),
            MoveError::PassPending => write!(f, "a pass is pending"),
            MoveError::OutOfTurn { expected } => write!(f, "it is {expected}'s turn"),
            MoveError::Illegal { square } => write!(f, "illegal placement at {square}"),
        }
    }
}

impl std::error::Error for MoveError {}

/// One game of Reversi: the board, the phase, and the most recent placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    phase: Phase,
    last_move: Option<Square>,
}

impl GameSession {
    /// A fresh session: four-center starting layout, white to move.
    pub fn new() -> Self {
        Self {
            board: Board::starting_position(),
            phase: Phase::AwaitingMove(Color::White),
            last_move: None,
        }
    }

    /// Start from an arbitrary position. Useful for analysis tooling and for
    /// setting up endgame and pass scenarios in tests; the caller is
    /// responsible for the position being self-consistent.
    pub fn with_position(board: Board, phase: Phase) -> Self {
        Self {
            board,
            phase,
            last_move: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The color to move, when someone is to move.
    pub fn turn(&self) -> Option<Color> {
        match self.phase {
            Phase::AwaitingMove(color) => Some(color),
            _ => None,
        }
    }

    pub fn last_move(&self) -> Option<Square> {
        self.last_move
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver(_))
    }

    /// Attempt a placement by `color`. On success the stone is placed,
    /// captures flip, and the machine advances; the returned events describe
    /// the change in order. On failure nothing changes.
    pub fn try_move(&mut self, square: Square, color: Color) -> Result<Vec<GameEvent>, MoveError> {
        match self.phase {
            Phase::GameOver(_) => return Err(MoveError::GameAlreadyOver),
            Phase::Passing(_) => return Err(MoveError::PassPending),
            Phase::AwaitingMove(expected) if expected != color => {
                return Err(MoveError::OutOfTurn { expected });
            }
            Phase::AwaitingMove(_) => {}
        }

        let flips = rules::apply_move(&mut self.board, square, color)
            .map_err(|e| MoveError::Illegal { square: e.square })?;
        self.last_move = Some(square);

        let mut events = vec![
            GameEvent::CellChanged { square, color },
            GameEvent::Flipped {
                squares: flips.to_vec(),
                color,
            },
            GameEvent::ScoreChanged {
                scores: self.board.count_stones(),
            },
        ];
        events.extend(self.advance_after(color));
        Ok(events)
    }

    /// Complete a pending pass: the passing color is skipped and the machine
    /// re-evaluates from there. No-op outside `Passing` (a stale countdown
    /// after a reset must not advance anything).
    pub fn complete_pass(&mut self) -> Vec<GameEvent> {
        match self.phase {
            Phase::Passing(skipped) => self.advance_after(skipped),
            _ => Vec::new(),
        }
    }

    /// Reinitialize to the starting position, white to move. Valid from any
    /// phase; the caller is responsible for cancelling a pending countdown.
    pub fn reset(&mut self) -> Vec<GameEvent> {
        *self = Self::new();
        vec![
            GameEvent::BoardReset,
            GameEvent::ScoreChanged {
                scores: self.board.count_stones(),
            },
            GameEvent::TurnChanged {
                color: Color::White,
            },
            GameEvent::ValidMoves {
                squares: rules::valid_moves(&self.board, Color::White),
            },
        ]
    }

    /// Post-move evaluation, shared by move application and pass completion.
    /// `mover` is the color whose turn just finished (by moving or by being
    /// skipped); control is handed to the opponent, with pass and game-over
    /// detection.
    fn advance_after(&mut self, mover: Color) -> Vec<GameEvent> {
        let opponent = mover.opposite();
        let scores = self.board.count_stones();

        let annihilated = scores.black == 0 || scores.white == 0;
        let opponent_stuck = !rules::has_any_valid_move(&self.board, opponent);
        let mover_stuck = !rules::has_any_valid_move(&self.board, mover);

        if annihilated || self.board.is_full() || (opponent_stuck && mover_stuck) {
            // Outcome always comes from live counts at detection time.
            let outcome = Outcome::from_scores(scores);
            self.phase = Phase::GameOver(outcome);
            return vec![GameEvent::GameEnded { outcome }];
        }

        if opponent_stuck {
            self.phase = Phase::Passing(opponent);
            return vec![GameEvent::PassRequired { color: opponent }];
        }

        self.phase = Phase::AwaitingMove(opponent);
        vec![
            GameEvent::TurnChanged { color: opponent },
            GameEvent::ValidMoves {
                squares: rules::valid_moves(&self.board, opponent),
            },
        ]
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
