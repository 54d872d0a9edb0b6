// Engine-to-presentation notifications.
//
// Every mutating session operation returns an ordered `Vec<GameEvent>`
// describing what changed, so a rendering layer can drive stone placement,
// flip animation, turn indicators, and end-of-game display without ever
// reading engine internals. The engine holds canonical state as plain data;
// presentation derives its own visual flags from these events, never the
// reverse.
//
// `OpponentLeft` is emitted only by the remote peer driver — the core state
// machine itself never produces it.

use serde::{Deserialize, Serialize};

use crate::types::{Color, Outcome, Scores, Square};

/// A single notification from the engine to the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A stone was placed at `square`.
    CellChanged { square: Square, color: Color },
    /// The listed stones were captured and now belong to `color`.
    Flipped { squares: Vec<Square>, color: Color },
    /// Stone counts after the change.
    ScoreChanged { scores: Scores },
    /// Control passed to `color`.
    TurnChanged { color: Color },
    /// `color` has no legal placement and must pass; the driver owns the
    /// countdown that completes the pass.
    PassRequired { color: Color },
    /// The game reached a terminal position.
    GameEnded { outcome: Outcome },
    /// The legal placements for the player now to move, recomputed after
    /// every state settle.
    ValidMoves { squares: Vec<Square> },
    /// The session was reinitialized to the starting position.
    BoardReset,
    /// The remote peer disconnected; the session is torn down. Distinct
    /// from a normal win/tie and never overwrites one.
    OpponentLeft,
}
