//! Text codec for the stonewire line protocol.
//!
//! Wire format:
//! ```text
//! <keyword>:<whitespace><payload>\n
//! ```
//! The keyword may not contain `:`; the payload must be non-empty.  A trailing
//! `\r` is tolerated on inbound lines.  Outbound payloads never contain a line
//! break: any run of `\r`/`\n` is collapsed to a single space so the frame
//! boundary cannot be forged.

use thiserror::Error;

use crate::domain::board::{Point, Stone};
use crate::protocol::messages::{ClientMessage, Command, GameOutcome, Opponents, ServerMessage};

/// Errors that can occur while decoding a protocol line.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line does not match `keyword: payload`.
    #[error("received an invalid message from the server: {0:?}")]
    MalformedLine(String),

    /// The keyword is not part of the protocol.
    #[error("unrecognized command keyword: {0:?}")]
    UnknownCommand(String),

    /// The keyword exists but is never sent by a server.
    #[error("server sent client-only command `{0}`")]
    UnexpectedCommand(Command),

    /// A payload field failed to parse per its declared format.
    #[error("invalid `{command}` payload: {detail}")]
    InvalidField { command: Command, detail: String },

    /// The command is valid but not allowed in the current session state.
    #[error("command `{command}` is not allowed while {state}")]
    UnexpectedInState { command: Command, state: String },
}

fn invalid(command: Command, detail: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidField {
        command,
        detail: detail.into(),
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Splits a raw line into its command and payload without interpreting the payload.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedLine`] or [`ProtocolError::UnknownCommand`].
pub fn split_line(line: &str) -> Result<(Command, &str), ProtocolError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let malformed = || ProtocolError::MalformedLine(line.to_string());

    let (keyword, rest) = line.split_once(':').ok_or_else(malformed)?;
    if keyword.is_empty() || !rest.starts_with(char::is_whitespace) {
        return Err(malformed());
    }
    let payload = rest.trim_start();
    if payload.is_empty() {
        return Err(malformed());
    }

    let command =
        Command::from_keyword(keyword).ok_or_else(|| ProtocolError::UnknownCommand(keyword.to_string()))?;
    Ok((command, payload))
}

/// Decodes one inbound line into a [`ServerMessage`].
///
/// # Errors
///
/// Returns [`ProtocolError`] if the line is malformed, the keyword is unknown
/// or client-only, or the payload fails to parse.
///
/// # Examples
///
/// ```rust
/// use stonewire_core::protocol::{parse_line, ServerMessage};
/// use stonewire_core::Stone;
///
/// let msg = parse_line("board: white 10").unwrap();
/// assert_eq!(msg, ServerMessage::Board { color: Stone::White, size: 10 });
/// ```
pub fn parse_line(line: &str) -> Result<ServerMessage, ProtocolError> {
    let (command, payload) = split_line(line)?;
    match command {
        Command::Nonce => Ok(ServerMessage::Nonce(payload.to_string())),
        Command::NotAuthorized => Ok(ServerMessage::NotAuthorized(payload.to_string())),
        Command::Opponent => Ok(ServerMessage::Opponent(parse_opponents(payload))),
        Command::Board => parse_board(payload),
        Command::Score => {
            let (white, black) = parse_score(payload)?;
            Ok(ServerMessage::Score { white, black })
        }
        Command::Move => parse_move(payload).map(ServerMessage::Move),
        Command::Message => Ok(ServerMessage::Message(payload.to_string())),
        Command::Game => parse_game(payload).map(ServerMessage::Game),
        Command::Quit => Ok(ServerMessage::Quit(payload.to_string())),
        Command::Authenticate | Command::NonceReply => {
            Err(ProtocolError::UnexpectedCommand(command))
        }
    }
}

/// Encodes an outbound message as a complete, newline-terminated line.
///
/// # Examples
///
/// ```rust
/// use stonewire_core::protocol::{encode_line, ClientMessage};
/// use stonewire_core::Point;
///
/// assert_eq!(encode_line(&ClientMessage::Move(Point::new(3, 4))), "move: 3,4\n");
/// ```
pub fn encode_line(msg: &ClientMessage) -> String {
    let payload = match msg {
        ClientMessage::Authenticate(identity) => single_line(identity),
        ClientMessage::NonceReply(reply) => single_line(reply),
        ClientMessage::Move(p) => format!("{},{}", p.x, p.y),
        ClientMessage::Message(text) => single_line(text),
    };
    format!("{}: {}\n", msg.command().keyword(), payload)
}

// ── Payload decoding ──────────────────────────────────────────────────────────

fn parse_opponents(payload: &str) -> Opponents {
    match payload.split_once(',') {
        Some((white, black)) => Opponents::Pair {
            white: white.trim().to_string(),
            black: black.trim().to_string(),
        },
        None => Opponents::Single(payload.to_string()),
    }
}

fn parse_board(payload: &str) -> Result<ServerMessage, ProtocolError> {
    let mut parts = payload.split_whitespace();
    let (Some(color), Some(size), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid(Command::Board, format!("expected `<color> <size>`, got {payload:?}")));
    };
    let color = match color {
        "white" => Stone::White,
        "black" => Stone::Black,
        other => return Err(invalid(Command::Board, format!("unknown color {other:?}"))),
    };
    let size = parse_uint::<usize>(Command::Board, size)?;
    Ok(ServerMessage::Board { color, size })
}

fn parse_score(payload: &str) -> Result<(u32, u32), ProtocolError> {
    let (white, black) = payload
        .split_once(',')
        .ok_or_else(|| invalid(Command::Score, format!("expected `<white>,<black>`, got {payload:?}")))?;
    Ok((
        parse_uint(Command::Score, white)?,
        parse_uint(Command::Score, black)?,
    ))
}

fn parse_move(payload: &str) -> Result<Option<Point>, ProtocolError> {
    let (x, y) = payload
        .split_once(',')
        .ok_or_else(|| invalid(Command::Move, format!("expected `<x>,<y>`, got {payload:?}")))?;
    match (x, y) {
        ("none", "none") => Ok(None),
        _ => Ok(Some(Point::new(
            parse_uint(Command::Move, x)?,
            parse_uint(Command::Move, y)?,
        ))),
    }
}

fn parse_game(payload: &str) -> Result<GameOutcome, ProtocolError> {
    let fields: Vec<&str> = payload.splitn(3, ',').collect();
    let [winner, white, black] = fields[..] else {
        return Err(invalid(
            Command::Game,
            format!("expected `<winner>,<white-live>,<black-live>`, got {payload:?}"),
        ));
    };
    if black.contains(',') {
        return Err(invalid(Command::Game, "too many fields"));
    }
    Ok(GameOutcome {
        winner: winner.trim().to_string(),
        white_live: parse_live_list(white)?,
        black_live: parse_live_list(black)?,
    })
}

/// Parses `x y; x y; ...`.  A blank list is empty.
fn parse_live_list(list: &str) -> Result<Vec<Point>, ProtocolError> {
    list.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            let mut nums = item.split_whitespace();
            match (nums.next(), nums.next(), nums.next()) {
                (Some(x), Some(y), None) => Ok(Point::new(
                    parse_uint(Command::Game, x)?,
                    parse_uint(Command::Game, y)?,
                )),
                _ => Err(invalid(Command::Game, format!("bad live stone {item:?}"))),
            }
        })
        .collect()
}

/// Parses a plain decimal non-negative integer (no sign, no whitespace).
fn parse_uint<T: std::str::FromStr>(command: Command, s: &str) -> Result<T, ProtocolError> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(command, format!("{s:?} is not a non-negative integer")));
    }
    s.parse()
        .map_err(|_| invalid(command, format!("{s} is out of range")))
}

// ── Payload encoding ──────────────────────────────────────────────────────────

/// Replaces every run of line-break characters with a single space.
fn single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\n' || c == '\r' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
