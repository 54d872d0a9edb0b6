// TCP peer channel: one reliable, ordered, bidirectional message pipe.
//
// Architecture: one background reader thread per channel, feeding the
// session's single `mpsc` event queue.
//
// - `PeerListener::bind()` + `accept()` take the acceptor side of the
//   connection; `PeerChannel::dial()` takes the initiator side. Color
//   assignment is structural and fixed for the life of the channel: the
//   dialer plays white, the acceptor plays black.
// - The reader thread calls `read_message()` in a loop and pushes
//   `PeerEvent::Remote` into the queue. On EOF, a read error, or a malformed
//   frame it pushes `PeerEvent::Disconnected` and exits — disconnect is a
//   one-way terminal signal, never retried.
// - The event processor thread is the only writer to the stream (via
//   `send`); the reader thread only reads. This avoids concurrent
//   read/write on the same `TcpStream`.
//
// Local input and timer expiries share the same `PeerEvent` vocabulary, so
// the session processes everything through one serialized queue.

use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use reversi_core::{Color, Square};
use reversi_protocol::{PeerMessage, read_message, write_message};

/// Everything the session's event processor can be asked to handle, in one
/// queue: local input, channel-inbound messages, and lifecycle signals.
/// Timer expiries arrive as queue timeouts, not as variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PeerEvent {
    /// The local player clicked/typed a placement.
    LocalPlay { square: Square },
    /// The local player requested a reset.
    LocalReset,
    /// A message arrived from the remote peer.
    Remote(PeerMessage),
    /// The channel closed; terminal for the session.
    Disconnected,
    /// Driver shutdown request. Handled by the run loop, not the session.
    Quit,
}

/// Listening half of channel establishment. Accepts exactly one peer.
pub struct PeerListener {
    listener: TcpListener,
}

impl PeerListener {
    /// Bind the listening socket. Port 0 lets the OS pick a free port.
    pub fn bind(port: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port))?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Block until a peer connects, then wrap the stream. The acceptor is
    /// always black.
    pub fn accept(self, events: Sender<PeerEvent>) -> std::io::Result<PeerChannel> {
        let (stream, _addr) = self.listener.accept()?;
        PeerChannel::from_stream(stream, Color::Black, events)
    }
}

/// An open, ordered, bidirectional message channel to the remote peer.
pub struct PeerChannel {
    writer: BufWriter<TcpStream>,
    local_color: Color,
    _reader_thread: Option<JoinHandle<()>>,
}

impl PeerChannel {
    /// Connect to a hosting peer. The initiator is always white.
    pub fn dial<A: ToSocketAddrs>(addr: A, events: Sender<PeerEvent>) -> std::io::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Self::from_stream(stream, Color::White, events)
    }

    /// Wrap an already-open stream, spawning the reader thread. Exposed so
    /// any reliable, ordered transport that yields a `TcpStream`-shaped
    /// connection can carry the protocol.
    pub fn from_stream(
        stream: TcpStream,
        local_color: Color,
        events: Sender<PeerEvent>,
    ) -> std::io::Result<Self> {
        let reader_stream = stream.try_clone()?;
        stream.set_nodelay(true).ok();

        let reader_thread = thread::spawn(move || {
            reader_loop(BufReader::new(reader_stream), events);
        });

        Ok(Self {
            writer: BufWriter::new(stream),
            local_color,
            _reader_thread: Some(reader_thread),
        })
    }

    /// The color this peer plays for the lifetime of the channel.
    pub fn local_color(&self) -> Color {
        self.local_color
    }

    /// Send one message to the remote peer.
    pub fn send(&mut self, msg: &PeerMessage) -> std::io::Result<()> {
        write_message(&mut self.writer, msg)
    }
}

impl Drop for PeerChannel {
    fn drop(&mut self) {
        // Shut the socket down, not just this handle: the reader thread
        // holds a clone of the stream, so closing our fd alone would leave
        // the connection open and the remote peer unaware we left.
        let _ = std::io::Write::flush(&mut self.writer);
        let _ = self.writer.get_ref().shutdown(std::net::Shutdown::Both);
    }
}

/// Reader thread: framed read → deserialize → queue. Any failure (EOF,
/// transport error, malformed frame) becomes a single `Disconnected` event.
fn reader_loop(mut reader: BufReader<TcpStream>, events: Sender<PeerEvent>) {
    loop {
        match read_message(&mut reader) {
            Ok(msg) => {
                if events.send(PeerEvent::Remote(msg)).is_err() {
                    break; // Session dropped the receiver.
                }
            }
            Err(_) => {
                let _ = events.send(PeerEvent::Disconnected);
                break;
            }
        }
    }
}
