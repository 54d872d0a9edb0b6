// Peer-to-peer game messages and their wire encoding.
//
// One enum defines the full protocol vocabulary: the three event kinds two
// game instances exchange to stay consistent. Every variant is fully
// self-describing — a `Move` names its own square and color rather than
// relying on the receiver's idea of whose turn it is, because the receiver
// re-validates every inbound move against its own engine before applying.
//
// Authority is structural, not negotiated: each peer only ever sends `Move`
// for its own assigned color (dialer = white, acceptor = black), `Pass` only
// when its own engine detected that it must pass, and `Reset` to request
// that both sides reinitialize.
//
// On the wire a message is a 4-byte big-endian byte count followed by the
// externally-tagged serde JSON of the enum. The count on the read side is
// bounded by `MAX_MESSAGE_BYTES` so a garbage prefix cannot drive a huge
// allocation; real messages are a few dozen bytes.

use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

use reversi_core::{Color, Square};

/// Upper bound on an inbound message's byte count. Far above anything this
/// protocol produces; anything larger is a corrupt or hostile stream.
pub const MAX_MESSAGE_BYTES: u32 = 64 * 1024;

/// A game event relayed between the two peers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerMessage {
    /// A placement made by the sender, as the sender's own color.
    Move { x: i32, y: i32, color: Color },
    /// The sender's engine detected that the sender must pass.
    Pass,
    /// Request to reinitialize both sides to the starting position.
    Reset,
}

impl PeerMessage {
    /// Build a `Move` message from a board square.
    pub fn placement(square: Square, color: Color) -> Self {
        PeerMessage::Move {
            x: square.x,
            y: square.y,
            color,
        }
    }
}

/// Serialize and write one message: byte count, JSON payload, flush.
pub fn write_message<W: Write>(writer: &mut W, msg: &PeerMessage) -> io::Result<()> {
    let json = serde_json::to_vec(msg).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    let count = u32::try_from(json.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "message too large"))?;
    writer.write_all(&count.to_be_bytes())?;
    writer.write_all(&json)?;
    writer.flush()
}

/// Read and deserialize one message.
///
/// Returns `UnexpectedEof` if the stream closes before or inside a message,
/// and `InvalidData` for an out-of-bounds byte count or a payload that is
/// not a `PeerMessage` — callers treat both as fatal to the session, the
/// same as a disconnect.
pub fn read_message<R: Read>(reader: &mut R) -> io::Result<PeerMessage> {
    let mut prefix = [0u8; 4];
    reader.read_exact(&mut prefix)?;
    let count = u32::from_be_bytes(prefix);
    if count > MAX_MESSAGE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message length {count} exceeds {MAX_MESSAGE_BYTES}"),
        ));
    }

    let mut payload = vec![0u8; count as usize];
    reader.read_exact(&mut payload)?;
    serde_json::from_slice(&payload).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
