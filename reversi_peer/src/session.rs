// Peer session: one engine instance wired to one channel.
//
// `PeerSession` is the event processor for a networked game. It owns the
// local `GameSession` and the `PeerChannel`, and consumes `PeerEvent`s from
// the single queue — local input, remote messages, disconnects — plus timer
// expiries delivered via `on_timer`. Both peers run the same deterministic
// engine, so consistency only needs each side to apply the same accepted
// moves in the same order; nothing reconciles state after the fact.
//
// Design decisions:
// - **Authority by re-validation.** Every inbound `Move` is replayed through
//   the local engine. A move the engine rejects, or one claiming the local
//   side's color, is a protocol violation: logged to stderr and dropped, and
//   play continues. There is no recovery message.
// - **Both engines derive the pass.** When a move leaves the opponent with
//   no reply, both sides independently land in `Passing` and arm the same
//   countdown. The side whose own color is skipped announces the pass on
//   expiry; an inbound `Pass` restarts the receiver's countdown as if it
//   had just derived the pass itself. Only timer expiry (or a reset) leaves
//   `Passing`, and completion is idempotent, so the orders converge.
// - **Explicit clocks.** `handle_event` and `on_timer` take `now` as a
//   parameter and `next_deadline` reports when the driver should wake. The
//   run loop turns that into an `mpsc::recv_timeout`; tests pass synthetic
//   instants and never sleep.
// - **The settle window gates local input only.** After any applied move
//   the local player cannot place again until the flip presentation has
//   settled. Remote moves are applied immediately regardless — delaying
//   them would let the two engines drift.

use std::time::{Duration, Instant};

use reversi_core::{Color, GameEvent, GameSession, Phase, Square};
use reversi_protocol::PeerMessage;

use crate::channel::{PeerChannel, PeerEvent};

/// How long a forced pass is shown before the turn actually skips.
pub const PASS_DELAY: Duration = Duration::from_secs(1);

/// How long local input stays blocked after a move, covering the flip
/// presentation.
pub const FLIP_SETTLE: Duration = Duration::from_millis(300);

/// One side of a networked game: engine, channel, and the two driver-owned
/// timers the engine deliberately does not carry.
pub struct PeerSession {
    game: GameSession,
    channel: PeerChannel,
    opponent_left: bool,
    pass_deadline: Option<Instant>,
    settle_until: Option<Instant>,
}

impl PeerSession {
    /// A fresh game over an established channel.
    pub fn new(channel: PeerChannel) -> Self {
        Self::with_game(GameSession::new(), channel)
    }

    /// Wrap an existing engine state. Used by tests to start from crafted
    /// positions; any countdown is armed by the next applied move, not here.
    pub fn with_game(game: GameSession, channel: PeerChannel) -> Self {
        Self {
            game,
            channel,
            opponent_left: false,
            pass_deadline: None,
            settle_until: None,
        }
    }

    pub fn game(&self) -> &GameSession {
        &self.game
    }

    pub fn local_color(&self) -> Color {
        self.channel.local_color()
    }

    pub fn opponent_left(&self) -> bool {
        self.opponent_left
    }

    /// The earliest instant at which `on_timer` has work to do, if any. The
    /// run loop sleeps on the event queue until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.pass_deadline, self.settle_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Process one queued event. Returns the engine notifications the event
    /// produced, empty when the event was ignored or dropped.
    pub fn handle_event(&mut self, event: PeerEvent, now: Instant) -> Vec<GameEvent> {
        if self.opponent_left {
            // Terminal: the session only reports the disconnect once.
            return Vec::new();
        }

        match event {
            PeerEvent::LocalPlay { square } => self.local_play(square, now),
            PeerEvent::LocalReset => {
                let mut events = Vec::new();
                self.send_or_mark(&PeerMessage::Reset, &mut events);
                events.extend(self.apply_reset());
                events
            }
            PeerEvent::Remote(msg) => self.remote_message(msg, now),
            PeerEvent::Disconnected => {
                self.opponent_left = true;
                self.pass_deadline = None;
                self.settle_until = None;
                vec![GameEvent::OpponentLeft]
            }
            // Quit belongs to the run loop; nothing to do at this layer.
            PeerEvent::Quit => Vec::new(),
        }
    }

    /// Fire any expired timer. Safe to call early or late; expiry checks are
    /// against the passed `now`.
    pub fn on_timer(&mut self, now: Instant) -> Vec<GameEvent> {
        if self.settle_until.is_some_and(|t| now >= t) {
            self.settle_until = None;
        }

        let Some(deadline) = self.pass_deadline else {
            return Vec::new();
        };
        if now < deadline {
            return Vec::new();
        }
        self.pass_deadline = None;

        let skipped = match self.game.phase() {
            Phase::Passing(color) => color,
            // A reset beat the countdown; nothing to complete.
            _ => return Vec::new(),
        };
        let mut events = self.game.complete_pass();
        if skipped == self.local_color() {
            // Our color was skipped; announce it. The remote side treats the
            // message as confirmation of the pass it already derived.
            self.send_or_mark(&PeerMessage::Pass, &mut events);
        }
        events
    }

    fn local_play(&mut self, square: Square, now: Instant) -> Vec<GameEvent> {
        if self.settle_until.is_some_and(|t| now < t) {
            // Input during the flip presentation is dropped, not queued.
            return Vec::new();
        }

        match self.game.try_move(square, self.local_color()) {
            Ok(mut events) => {
                self.after_apply(now);
                self.send_or_mark(
                    &PeerMessage::placement(square, self.local_color()),
                    &mut events,
                );
                events
            }
            Err(err) => {
                eprintln!("move at {square} rejected: {err}");
                Vec::new()
            }
        }
    }

    fn remote_message(&mut self, msg: PeerMessage, now: Instant) -> Vec<GameEvent> {
        match msg {
            PeerMessage::Move { x, y, color } => {
                let square = Square::new(x, y);
                if color == self.local_color() {
                    eprintln!("peer claimed our color on {square}, dropping");
                    return Vec::new();
                }
                match self.game.try_move(square, color) {
                    Ok(events) => {
                        self.after_apply(now);
                        events
                    }
                    Err(err) => {
                        eprintln!("dropping invalid peer move at {square}: {err}");
                        Vec::new()
                    }
                }
            }
            PeerMessage::Pass => {
                let remote = self.local_color().opposite();
                match self.game.phase() {
                    Phase::Passing(color) if color == remote => {
                        // The peer derived the same forced pass. Restart the
                        // countdown from the announcement; the timer is the
                        // only thing that completes a pass.
                        self.pass_deadline = Some(now + PASS_DELAY);
                        Vec::new()
                    }
                    Phase::Passing(_) => {
                        // The peer skipped our color on its own authority.
                        eprintln!("peer announced a pass for our color, dropping");
                        Vec::new()
                    }
                    // Stale: our fallback countdown already completed it, or
                    // a reset intervened.
                    _ => Vec::new(),
                }
            }
            PeerMessage::Reset => self.apply_reset(),
        }
    }

    /// Post-application bookkeeping shared by local and remote moves: start
    /// the settle window, and arm the pass countdown when the new phase
    /// requires one.
    fn after_apply(&mut self, now: Instant) {
        self.settle_until = Some(now + FLIP_SETTLE);
        self.pass_deadline = match self.game.phase() {
            Phase::Passing(_) => Some(now + PASS_DELAY),
            _ => None,
        };
    }

    fn apply_reset(&mut self) -> Vec<GameEvent> {
        self.pass_deadline = None;
        self.settle_until = None;
        self.game.reset()
    }

    /// Send a message, treating failure as a disconnect: the reader thread
    /// will usually notice first, but a send can fail before it does.
    fn send_or_mark(&mut self, msg: &PeerMessage, events: &mut Vec<GameEvent>) {
        if self.opponent_left {
            return;
        }
        if let Err(err) = self.channel.send(msg) {
            eprintln!("send to peer failed, treating them as gone: {err}");
            self.opponent_left = true;
            self.pass_deadline = None;
            self.settle_until = None;
            events.push(GameEvent::OpponentLeft);
        }
    }
}
