// End-to-end synchronization tests for peer-to-peer play.
//
// Each test connects two real `PeerSession`s over a loopback TCP socket (via
// `TestPeer`) and verifies the full path: local input → wire message →
// remote re-validation → identical engine state on both sides.
//
// Timing never relies on sleeping: sessions take explicit instants, so the
// pass countdown and the settle window are driven by constructed times.

use std::time::Instant;

use reversi_core::{Board, Color, GameEvent, GameSession, Phase, Square};
use reversi_peer::{FLIP_SETTLE, PASS_DELAY};
use reversi_protocol::PeerMessage;
use sync_tests::{TestPeer, forced_pass_position};

/// White opens, black replies; both boards and phases end up identical.
#[test]
fn opening_exchange_keeps_peers_identical() {
    let (mut white, mut black) = TestPeer::pair();
    let t0 = Instant::now();

    let events = white.play(4, 2, t0);
    assert!(!events.is_empty());
    black.pump_one(t0);

    // Black replies once its settle window has elapsed.
    let t1 = t0 + FLIP_SETTLE;
    let events = black.play(5, 2, t1);
    assert!(!events.is_empty());
    white.pump_one(t1);

    assert_eq!(white.game().phase(), Phase::AwaitingMove(Color::White));
    assert_eq!(white.state_json(), black.state_json());
}

/// Rejected local input produces no wire traffic: the first thing the
/// opponent ever sees is a legal move.
#[test]
fn illegal_local_input_never_reaches_the_wire() {
    let (mut white, mut black) = TestPeer::pair();
    let t0 = Instant::now();

    assert!(white.play(0, 0, t0).is_empty()); // no capture there
    assert!(black.play(5, 2, t0).is_empty()); // white opens, not black

    white.play(4, 2, t0);
    let events = black.pump_one(t0);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, GameEvent::CellChanged { .. }))
    );
    assert_eq!(white.state_json(), black.state_json());
}

/// Both engines derive the forced pass; the skipped side announces it on
/// expiry and the other side applies the announcement.
#[test]
fn forced_pass_synchronizes_across_the_wire() {
    let (mut white, mut black) = TestPeer::pair_from(forced_pass_position());
    let t0 = Instant::now();

    let events = black.play(4, 2, t0);
    assert!(events.contains(&GameEvent::PassRequired {
        color: Color::White
    }));
    let events = white.pump_one(t0);
    assert!(events.contains(&GameEvent::PassRequired {
        color: Color::White
    }));

    // White's own countdown expires: complete the pass and announce it.
    let t1 = t0 + PASS_DELAY;
    let events = white.fire_timers(t1);
    assert!(events.contains(&GameEvent::TurnChanged {
        color: Color::Black
    }));
    assert_eq!(white.game().phase(), Phase::AwaitingMove(Color::Black));

    // The announcement restarts black's countdown; black stays in the pass
    // until its own timer fires.
    let events = black.pump_one(t1);
    assert!(events.is_empty());
    assert_eq!(black.game().phase(), Phase::Passing(Color::White));

    let events = black.fire_timers(t1 + PASS_DELAY);
    assert!(events.contains(&GameEvent::TurnChanged {
        color: Color::Black
    }));
    assert_eq!(white.state_json(), black.state_json());

    // The turn really did come back to black: its reserved reply lands.
    let t2 = t1 + PASS_DELAY + FLIP_SETTLE;
    let events = black.play(2, 5, t2);
    assert!(!events.is_empty());
    white.pump_one(t2);
    assert_eq!(white.state_json(), black.state_json());
}

/// A reset mid-game propagates and restores both sides to the opening.
#[test]
fn reset_mid_game_restores_both_sides() {
    let (mut white, mut black) = TestPeer::pair();
    let t0 = Instant::now();

    white.play(4, 2, t0);
    black.pump_one(t0);

    let events = black.reset(t0 + FLIP_SETTLE);
    assert!(events.contains(&GameEvent::BoardReset));
    let events = white.pump_one(t0 + FLIP_SETTLE);
    assert!(events.contains(&GameEvent::BoardReset));

    assert_eq!(white.game().board(), &Board::starting_position());
    assert_eq!(white.game().phase(), Phase::AwaitingMove(Color::White));
    assert_eq!(white.state_json(), black.state_json());
}

/// A reset during a pending pass kills the countdown on both sides.
#[test]
fn reset_cancels_pass_countdown_on_both_sides() {
    let (mut white, mut black) = TestPeer::pair_from(forced_pass_position());
    let t0 = Instant::now();

    black.play(4, 2, t0);
    white.pump_one(t0); // the move
    black.reset(t0);
    white.pump_one(t0); // the reset

    assert!(white.session.next_deadline().is_none());
    assert!(black.session.next_deadline().is_none());
    assert!(white.fire_timers(t0 + PASS_DELAY).is_empty());
    assert_eq!(white.game().phase(), Phase::AwaitingMove(Color::White));
    assert_eq!(white.state_json(), black.state_json());
}

/// A vanished peer surfaces as exactly one `OpponentLeft`, after which all
/// input is ignored.
#[test]
fn disconnect_reports_opponent_left() {
    let (white, mut black) = TestPeer::pair();
    drop(white);

    let events = black.pump_one(Instant::now());
    assert_eq!(events, vec![GameEvent::OpponentLeft]);
    assert!(black.session.opponent_left());

    assert!(black.play(4, 2, Instant::now()).is_empty());
    assert!(black.reset(Instant::now()).is_empty());
}

/// Consistency rests on determinism: the same accepted message sequence
/// replayed on fresh engines yields byte-identical state.
#[test]
fn identical_message_sequences_replay_identically() {
    let script = [
        PeerMessage::Move {
            x: 4,
            y: 2,
            color: Color::White,
        },
        PeerMessage::Move {
            x: 5,
            y: 2,
            color: Color::Black,
        },
        PeerMessage::Move {
            x: 2,
            y: 4,
            color: Color::White,
        },
        PeerMessage::Reset,
        PeerMessage::Move {
            x: 4,
            y: 2,
            color: Color::White,
        },
    ];

    let run = || {
        let mut game = GameSession::new();
        for msg in &script {
            match msg {
                PeerMessage::Move { x, y, color } => {
                    game.try_move(Square::new(*x, *y), *color).unwrap();
                }
                PeerMessage::Pass => {
                    game.complete_pass();
                }
                PeerMessage::Reset => {
                    game.reset();
                }
            }
        }
        game
    };

    assert_eq!(run(), run());
    assert_eq!(
        serde_json::to_string(&run()).unwrap(),
        serde_json::to_string(&run()).unwrap()
    );
}
