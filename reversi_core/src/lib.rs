// reversi_core — pure rules engine and turn state machine.
//
// This crate contains all game logic for peer-to-peer Reversi: the board,
// move legality and capture computation, the turn/pass/game-over state
// machine, and the notification events a presentation layer consumes. It has
// zero I/O and zero timing dependencies and can be tested headless.
//
// Module overview:
// - `types.rs`:   Color, Cell, Square, Scores, Outcome.
// - `board.rs`:   The 8x8 grid — read/write/count only, no legality checks.
// - `rules.rs`:   Pure legality and capture functions; `apply_move` is the
//                 single board mutation entry point besides reset.
// - `session.rs`: GameSession — the per-game state machine (AwaitingMove /
//                 Passing / GameOver) with pass and termination detection.
// - `events.rs`:  GameEvent — ordered notifications for the rendering layer.
//
// The companion crates `reversi_protocol` (wire messages) and `reversi_peer`
// (TCP channel, event loop, timers) build on this one. That boundary is
// deliberate: this crate cannot reach the network or the clock, so the same
// session code validates local clicks and inbound remote moves identically.
//
// **Critical constraint: determinism.** A session is a pure function
// `(state, input) -> (state', events)`. Two peers applying the same ordered
// move/pass/reset sequence to fresh sessions end with identical boards —
// that is the whole consistency model; there is no shared state and no
// reconciliation.

pub mod board;
pub mod events;
pub mod rules;
pub mod session;
pub mod types;

pub use board::Board;
pub use events::GameEvent;
pub use session::{GameSession, MoveError, Phase};
pub use types::{Cell, Color, Outcome, Scores, Square};
