// Test-only peer harness for synchronization integration tests.
//
// Wraps a real `PeerSession` (from `reversi_peer`) and the receiving end of
// its event queue to provide a synchronous, test-friendly API for exercising
// the full peer-to-peer path: local input → channel → remote validation →
// identical engine state.
//
// The only test-specific code here is the blocking `pump_one` wrapper around
// the queue receiver and the explicit `Instant` plumbing; all networking and
// game logic uses the same code paths as the real game.
//
// See also: `tests/sync_flow.rs` for the scenarios.

use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use reversi_core::{Board, Cell, Color, GameEvent, GameSession, Phase, Square};
use reversi_peer::{PeerChannel, PeerEvent, PeerListener, PeerSession};

/// Default timeout for blocking receive operations.
const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// One side of a real TCP-connected game, with its inbound queue exposed.
pub struct TestPeer {
    pub session: PeerSession,
    rx: Receiver<PeerEvent>,
}

impl TestPeer {
    /// A connected (white, black) pair over a loopback socket, both starting
    /// a fresh game.
    pub fn pair() -> (TestPeer, TestPeer) {
        Self::pair_from(GameSession::new())
    }

    /// A connected pair where both sides start from the same given position.
    pub fn pair_from(game: GameSession) -> (TestPeer, TestPeer) {
        let listener = PeerListener::bind(0).expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");

        let (white_tx, white_rx) = mpsc::channel();
        let white_channel = PeerChannel::dial(addr, white_tx).expect("dial test listener");

        let (black_tx, black_rx) = mpsc::channel();
        let black_channel = listener.accept(black_tx).expect("accept test peer");

        (
            TestPeer {
                session: PeerSession::with_game(game.clone(), white_channel),
                rx: white_rx,
            },
            TestPeer {
                session: PeerSession::with_game(game, black_channel),
                rx: black_rx,
            },
        )
    }

    /// Feed a local placement into the session at the given instant.
    pub fn play(&mut self, x: i32, y: i32, now: Instant) -> Vec<GameEvent> {
        self.session.handle_event(
            PeerEvent::LocalPlay {
                square: Square::new(x, y),
            },
            now,
        )
    }

    /// Feed a local reset into the session at the given instant.
    pub fn reset(&mut self, now: Instant) -> Vec<GameEvent> {
        self.session.handle_event(PeerEvent::LocalReset, now)
    }

    /// Block until one event arrives from the channel, then process it.
    /// Panics on silence — every test knows exactly what should be in
    /// flight.
    pub fn pump_one(&mut self, now: Instant) -> Vec<GameEvent> {
        let event = self
            .rx
            .recv_timeout(RECV_TIMEOUT)
            .expect("timed out waiting for a peer event");
        self.session.handle_event(event, now)
    }

    /// Fire the session's timers as of the given instant.
    pub fn fire_timers(&mut self, now: Instant) -> Vec<GameEvent> {
        self.session.on_timer(now)
    }

    pub fn game(&self) -> &GameSession {
        self.session.game()
    }

    /// Full-state snapshot for cross-peer comparison.
    pub fn state_json(&self) -> String {
        serde_json::to_string(self.session.game()).expect("serialize game state")
    }
}

/// A position where black to move can play (4,2) and leave white with stones
/// but no legal reply, forcing a pass.
pub fn forced_pass_position() -> GameSession {
    let mut board = Board::empty();
    for i in 1..8 {
        board.set(Square::new(i, 0), Cell::Black);
        board.set(Square::new(0, i), Cell::Black);
        board.set(Square::new(i, i), Cell::Black);
    }
    for (x, y) in [(6, 2), (7, 2), (4, 5), (5, 3), (6, 5), (7, 5), (7, 1)] {
        board.set(Square::new(x, y), Cell::Black);
    }
    for (x, y) in [(0, 0), (5, 2), (3, 5)] {
        board.set(Square::new(x, y), Cell::White);
    }
    GameSession::with_position(board, Phase::AwaitingMove(Color::Black))
}
