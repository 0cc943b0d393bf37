//! Network infrastructure for the client application.
//!
//! Carries newline-delimited protocol lines between the server and the
//! [`SessionHandler`].
//!
//! Architecture:
//! - `connect_and_play` opens the TCP stream and splits it into halves.
//! - `run_session` is generic over any `AsyncRead`/`AsyncWrite` pair, so tests
//!   can drive it with an in-memory `tokio::io::duplex` pipe.
//! - Lines are handled strictly in arrival order; the next line is not read
//!   until the reply to the current one has been written.

use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    net::TcpStream,
};
use tracing::{debug, info};

use stonewire_core::{encode_line, ClientMessage};

use crate::application::session::{SessionError, SessionHandler, Step};

/// Errors that can occur in the client network layer.
#[derive(Debug, Error)]
pub enum ClientNetworkError {
    /// TCP connection to the server failed.
    #[error("failed to connect to server at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    /// The session ended with a fatal error.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// How a session ended when no error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server sent `quit:`.
    Quit,
    /// The server closed the connection.
    Disconnected,
}

/// Connects to `addr` (`host:port`) and plays one session on the connection.
///
/// # Errors
///
/// Returns [`ClientNetworkError::ConnectFailed`] if the TCP connection cannot
/// be established, or [`ClientNetworkError::Session`] for any fatal session error.
pub async fn connect_and_play(
    addr: &str,
    handler: &mut SessionHandler,
) -> Result<SessionEnd, ClientNetworkError> {
    let stream = TcpStream::connect(addr)
        .await
        .map_err(|source| ClientNetworkError::ConnectFailed {
            addr: addr.to_string(),
            source,
        })?;
    info!("connected to server at {addr}");

    let (read_half, write_half) = stream.into_split();
    Ok(run_session(read_half, write_half, handler).await?)
}

/// Drives `handler` over an established byte stream until quit, EOF or a fatal error.
///
/// # Errors
///
/// Returns the first [`SessionError`] raised by the handler or the transport.
pub async fn run_session<R, W>(
    reader: R,
    mut writer: W,
    handler: &mut SessionHandler,
) -> Result<SessionEnd, SessionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let hello = handler.start();
    send_line(&mut writer, &hello).await?;

    let mut lines = BufReader::new(reader).lines();
    while let Some(line) = lines.next_line().await? {
        match handler.handle_line(&line)? {
            Step::Idle => {}
            Step::Reply(msg) => send_line(&mut writer, &msg).await?,
            Step::Stop => {
                writer.shutdown().await?;
                return Ok(SessionEnd::Quit);
            }
        }
    }

    info!("disconnected from the server");
    Ok(SessionEnd::Disconnected)
}

/// Encodes and writes one line, flushing so the server sees it immediately.
async fn send_line<W>(writer: &mut W, msg: &ClientMessage) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = encode_line(msg);
    debug!("-> {}", line.trim_end());
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

// ── Tests ─────────────────────────────────────────────────────────────────────
