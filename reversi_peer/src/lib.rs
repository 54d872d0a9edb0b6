// reversi_peer — networking and session driving for peer-to-peer Reversi.
//
// This crate connects the pure engine in `reversi_core` to a real opponent
// over TCP, using the wire protocol from `reversi_protocol`. One peer hosts,
// the other joins; the host plays black, the joiner white, and both run the
// same deterministic engine so exchanging accepted moves is enough to stay
// consistent.
//
// Module overview:
// - `channel.rs`: `PeerListener`/`PeerChannel` — connection establishment,
//                 the background reader thread, and the `PeerEvent` queue
//                 vocabulary.
// - `session.rs`: `PeerSession` — the single-threaded event processor that
//                 owns the engine, validates inbound messages, and drives
//                 the pass countdown and settle window.
// - `main.rs`:    The `reversi` binary — hot-seat, `--host`, and `--join`
//                 modes with a line-based terminal front end.
//
// Design decisions:
// - **One queue, one processor.** Stdin, the socket reader, and timers all
//   funnel into a single `mpsc` channel consumed by one thread. Timers are
//   queue timeouts (`recv_timeout` against `next_deadline`), so there is no
//   timer thread and no locking anywhere in the session.
// - **Threads, not async.** Two background reader threads (socket, stdin)
//   and blocking I/O cover everything a two-player game needs.

pub mod channel;
pub mod session;

pub use channel::{PeerChannel, PeerEvent, PeerListener};
pub use session::{FLIP_SETTLE, PASS_DELAY, PeerSession};
