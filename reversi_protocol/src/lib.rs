// reversi_protocol — wire protocol for peer-to-peer game synchronization.
//
// This crate defines the messages two Reversi instances exchange to stay
// consistent over a reliable, ordered, bidirectional byte stream, plus their
// length-prefixed wire encoding. It is shared by both sides of the
// connection and depends on `reversi_core` only for the `Color`/`Square`
// vocabulary — no networking, no session logic.
//
// Everything lives in `message.rs`: the `PeerMessage` enum
// (`Move`/`Pass`/`Reset`) and the `read_message`/`write_message` stream
// helpers.
//
// Design decisions:
// - **JSON serialization.** Matches the engine's serde_json usage; the
//   messages are tiny and infrequent, so wire compactness is irrelevant.
// - **Self-describing messages.** A `Move` carries its own color so the
//   receiver can re-validate it against its own engine instead of trusting
//   the sender's turn bookkeeping.
// - **No async runtime.** The helpers take any `std::io::Read`/`Write`, so
//   blocking TCP streams and in-memory cursors are handled identically.

pub mod message;

pub use message::{MAX_MESSAGE_BYTES, PeerMessage, read_message, write_message};
