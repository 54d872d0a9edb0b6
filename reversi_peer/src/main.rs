// CLI entry point for peer-to-peer Reversi.
//
// Runs one side of a game in a terminal. With no arguments both colors are
// played at one keyboard; `--host`/`--join` connect two instances over TCP,
// where the host plays black and the joiner plays white (white opens).
//
// Usage:
//   reversi                  Hot-seat game, both colors at this keyboard
//   reversi --host <PORT>    Host a network game and wait for an opponent
//   reversi --join <ADDR>    Join a hosted game (e.g. 192.168.0.5:7878)
//
// In-game commands (one per line):
//   <x> <y>    Place a stone at column x, row y (0-7)
//   reset      Start a new game
//   quit       Leave
//
// The whole front end is line-based: a background thread reads stdin and
// feeds the same event queue the socket reader feeds, and the main thread
// sleeps on that queue with `recv_timeout` against the session's next
// deadline. No raw terminal mode, no curses.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use reversi_core::{Color, GameEvent, GameSession, Outcome, Phase, Square};
use reversi_peer::{PASS_DELAY, PeerChannel, PeerEvent, PeerListener, PeerSession};

enum Mode {
    HotSeat,
    Host { port: u16 },
    Join { addr: String },
}

fn main() {
    let result = match parse_args() {
        Mode::HotSeat => run_hotseat(),
        Mode::Host { port } => run_host(port),
        Mode::Join { addr } => run_join(&addr),
    };
    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> Mode {
    let args: Vec<String> = std::env::args().collect();
    let mut mode = Mode::HotSeat;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                let port = args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
                    eprintln!("--host requires a valid port number");
                    std::process::exit(1);
                });
                mode = Mode::Host { port };
            }
            "--join" => {
                i += 1;
                let addr = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--join requires an address (host:port)");
                    std::process::exit(1);
                });
                mode = Mode::Join { addr };
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    mode
}

fn print_usage() {
    println!("Usage: reversi [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host <PORT>    Host a network game on the given port");
    println!("  --join <ADDR>    Join a hosted game at host:port");
    println!("  --help, -h       Show this help");
    println!();
    println!("Without options, both colors are played at this keyboard.");
    println!("In-game commands: '<x> <y>' places a stone, 'reset', 'quit'.");
}

fn run_host(port: u16) -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel();
    let listener = PeerListener::bind(port)?;
    println!("Hosting on {}; waiting for an opponent...", listener.local_addr()?);
    let channel = listener.accept(tx.clone())?;
    run_networked(PeerSession::new(channel), tx, rx)
}

fn run_join(addr: &str) -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel();
    let channel = PeerChannel::dial(addr, tx.clone())?;
    run_networked(PeerSession::new(channel), tx, rx)
}

/// Main loop for a networked game: one queue, one processor, timer expiries
/// as queue timeouts.
fn run_networked(
    mut session: PeerSession,
    tx: Sender<PeerEvent>,
    rx: Receiver<PeerEvent>,
) -> std::io::Result<()> {
    let you = session.local_color();
    println!("Opponent connected. You play {you}.");
    spawn_stdin_reader(tx);

    print_board(session.game());
    match session.game().turn() {
        Some(color) if color == you => println!("your move ({you})."),
        Some(color) => println!("{color} to move."),
        None => {}
    }

    loop {
        let event = match session.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };

        let events = match event {
            Some(PeerEvent::Quit) => break,
            Some(event) => session.handle_event(event, Instant::now()),
            None => session.on_timer(Instant::now()),
        };
        render(session.game(), Some(you), &events);
        if session.opponent_left() {
            break;
        }
    }
    Ok(())
}

/// Hot-seat loop: same queue and timing discipline, but every placement is
/// made as whichever color is to move, and the pass countdown is driven
/// directly here.
fn run_hotseat() -> std::io::Result<()> {
    let (tx, rx) = mpsc::channel();
    spawn_stdin_reader(tx);

    let mut game = GameSession::new();
    let mut pass_deadline: Option<Instant> = None;

    println!("Hot-seat game. White opens.");
    print_board(&game);
    println!("white to move.");

    loop {
        let event = match pass_deadline {
            Some(deadline) => {
                let wait = deadline.saturating_duration_since(Instant::now());
                match rx.recv_timeout(wait) {
                    Ok(event) => Some(event),
                    Err(RecvTimeoutError::Timeout) => {
                        pass_deadline = None;
                        let events = game.complete_pass();
                        render(&game, None, &events);
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(event) => Some(event),
                Err(_) => break,
            },
        };

        let events = match event {
            Some(PeerEvent::LocalPlay { square }) => {
                let Some(color) = game.turn() else {
                    println!("no move expected right now.");
                    continue;
                };
                match game.try_move(square, color) {
                    Ok(events) => events,
                    Err(err) => {
                        println!("move at {square} rejected: {err}");
                        continue;
                    }
                }
            }
            Some(PeerEvent::LocalReset) => {
                pass_deadline = None;
                game.reset()
            }
            Some(PeerEvent::Quit) | None => break,
            // No socket in this mode.
            Some(PeerEvent::Remote(_)) | Some(PeerEvent::Disconnected) => continue,
        };

        if matches!(game.phase(), Phase::Passing(_)) {
            pass_deadline = Some(Instant::now() + PASS_DELAY);
        }
        render(&game, None, &events);
    }
    Ok(())
}

/// Background stdin reader: parses one command per line into the shared
/// event queue. EOF counts as quit.
fn spawn_stdin_reader(tx: Sender<PeerEvent>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(event) = parse_command(line) else {
                println!("commands: '<x> <y>' places a stone, 'reset', 'quit'");
                continue;
            };
            let quit = event == PeerEvent::Quit;
            if tx.send(event).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(PeerEvent::Quit);
    });
}

fn parse_command(line: &str) -> Option<PeerEvent> {
    match line {
        "quit" | "q" | "exit" => return Some(PeerEvent::Quit),
        "reset" => return Some(PeerEvent::LocalReset),
        _ => {}
    }
    let mut parts = line.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(PeerEvent::LocalPlay {
        square: Square::new(x, y),
    })
}

/// Print the board and narrate the notifications one input produced. `you`
/// is the local color in networked play, `None` in hot-seat.
fn render(game: &GameSession, you: Option<Color>, events: &[GameEvent]) {
    let board_changed = events.iter().any(|e| {
        matches!(
            e,
            GameEvent::CellChanged { .. } | GameEvent::BoardReset
        )
    });
    if board_changed {
        print_board(game);
    }

    for event in events {
        match event {
            GameEvent::ScoreChanged { scores } => {
                println!("score: black {}, white {}", scores.black, scores.white);
            }
            GameEvent::TurnChanged { color } => match you {
                Some(local) if *color == local => println!("your move ({color})."),
                _ => println!("{color} to move."),
            },
            GameEvent::PassRequired { color } => {
                println!("{color} has no legal move; the turn passes shortly.");
            }
            GameEvent::ValidMoves { squares } => {
                // Only worth showing to whoever is about to type.
                if you.is_none() || you == game.turn() {
                    let list: Vec<String> = squares.iter().map(ToString::to_string).collect();
                    println!("legal moves: {}", list.join(" "));
                }
            }
            GameEvent::GameEnded { outcome } => match outcome {
                Outcome::Win(color) => println!("game over: {color} wins."),
                Outcome::Tie => println!("game over: tie."),
            },
            GameEvent::BoardReset => println!("new game; white opens."),
            GameEvent::OpponentLeft => println!("opponent left the game."),
            GameEvent::CellChanged { .. } | GameEvent::Flipped { .. } => {}
        }
    }
}

fn print_board(game: &GameSession) {
    let board = game.board();
    println!();
    println!("    0 1 2 3 4 5 6 7");
    for y in 0..8 {
        let mut row = format!("  {y} ");
        for x in 0..8 {
            let ch = match board.get(Square::new(x, y)).color() {
                Some(Color::Black) => 'b',
                Some(Color::White) => 'w',
                None => '.',
            };
            row.push(ch);
            row.push(' ');
        }
        println!("{row}");
    }
    println!();
}
