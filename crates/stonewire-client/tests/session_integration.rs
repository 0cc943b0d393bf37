//! End-to-end tests: a scripted game server on a loopback TCP socket drives
//! `connect_and_play` through a complete session.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use stonewire_client::application::credentials::nonce_reply;
use stonewire_client::application::observer::{GameObserver, NullObserver};
use stonewire_client::application::session::{SessionConfig, SessionError, SessionHandler, SessionState};
use stonewire_client::application::strategy::StrategyRegistry;
use stonewire_client::infrastructure::network::{connect_and_play, ClientNetworkError, SessionEnd};
use stonewire_client::infrastructure::scoreboard::Scoreboard;
use stonewire_core::{Point, Stone};

/// One step of the fake server.
enum Step {
    /// Read one line from the client and compare it.
    Expect(String),
    /// Write raw text to the client.
    Send(&'static str),
    /// Close the connection immediately.
    Hangup,
}

/// Accepts one connection and plays `script` against it.  Returns whatever
/// the client sent after the script ran out, up to EOF.
async fn serve(script: Vec<Step>) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();

    let task = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("accept");
        let (rd, mut wr) = stream.into_split();
        let mut lines = BufReader::new(rd).lines();

        for step in script {
            match step {
                Step::Expect(want) => {
                    let got = lines.next_line().await.expect("read").expect("client closed early");
                    assert_eq!(got, want);
                }
                Step::Send(text) => wr.write_all(text.as_bytes()).await.expect("write"),
                Step::Hangup => return String::new(),
            }
        }

        let mut rest = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            rest.push_str(&line);
            rest.push('\n');
        }
        rest
    });

    (addr, task)
}

fn handler_with(observer: Box<dyn GameObserver>) -> SessionHandler {
    let strategy = StrategyRegistry::with_builtins()
        .expect("builtins register")
        .create("first-open")
        .expect("builtin strategy");
    SessionHandler::new(
        SessionConfig {
            identity: "alice".into(),
            credential: "s3cret".into(),
        },
        strategy,
        observer,
    )
}

#[tokio::test]
async fn test_full_game_over_tcp() {
    // Arrange
    let (addr, server) = serve(vec![
        Step::Expect("authenticate: alice".into()),
        Step::Send("nonce: xyz\n"),
        Step::Expect(format!("nonce-reply: {}", nonce_reply("s3cret", "xyz"))),
        Step::Send("opponent: bob\nboard: white 3\nmove: 1,1\n"),
        Step::Expect("move: 1,2".into()),
        Step::Send("score: 0,1\nmove: 0,0\n"),
        Step::Expect("move: 0,1".into()),
        Step::Send("message: time is up\ngame: alice,1 2;0 1,1 1;0 0\nquit: game over\n"),
    ])
    .await;
    let mut handler = handler_with(Box::new(NullObserver));

    // Act
    let end = connect_and_play(&addr, &mut handler).await.expect("session");

    // Assert
    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(handler.state(), SessionState::Finished);
    let board = handler.board().expect("board");
    assert_eq!(board.get(1, 1).unwrap(), Stone::Black);
    assert_eq!(board.get(1, 2).unwrap(), Stone::White);
    assert_eq!(board.get(0, 1).unwrap(), Stone::White);
    assert_eq!(board.last_opponent_move(), Some(Point::new(0, 0)));
    assert_eq!(server.await.expect("server task"), "");
}

#[tokio::test]
async fn test_not_authorized_ends_with_error() {
    let (addr, server) = serve(vec![
        Step::Expect("authenticate: alice".into()),
        Step::Send("not-authorized: unknown player\n"),
    ])
    .await;
    let mut handler = handler_with(Box::new(NullObserver));

    let err = connect_and_play(&addr, &mut handler).await.unwrap_err();

    assert!(matches!(
        err,
        ClientNetworkError::Session(SessionError::NotAuthorized(ref reason)) if reason == "unknown player"
    ));
    assert_eq!(handler.state(), SessionState::Finished);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_illegal_server_move_is_fatal() {
    // The opponent's move lands outside a 3x3 board.
    let (addr, server) = serve(vec![
        Step::Expect("authenticate: alice".into()),
        Step::Send("nonce: n\n"),
        Step::Expect(format!("nonce-reply: {}", nonce_reply("s3cret", "n"))),
        Step::Send("board: black 3\nmove: 3,0\n"),
    ])
    .await;
    let mut handler = handler_with(Box::new(NullObserver));

    let err = connect_and_play(&addr, &mut handler).await.unwrap_err();

    assert!(matches!(err, ClientNetworkError::Session(SessionError::Board(_))));
    // The client never answered the bad move.
    assert_eq!(server.await.expect("server task"), "");
}

#[tokio::test]
async fn test_server_hangup_is_a_clean_disconnect() {
    let (addr, server) = serve(vec![
        Step::Expect("authenticate: alice".into()),
        Step::Send("nonce: n\n"),
        Step::Expect(format!("nonce-reply: {}", nonce_reply("s3cret", "n"))),
        Step::Hangup,
    ])
    .await;
    let mut handler = handler_with(Box::new(Scoreboard::new("alice")));

    let end = connect_and_play(&addr, &mut handler).await.expect("clean end");

    assert_eq!(end, SessionEnd::Disconnected);
    assert_eq!(handler.state(), SessionState::AwaitingOpponent);
    server.await.expect("server task");
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    // Bind then drop to get a port that nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let mut handler = handler_with(Box::new(NullObserver));
    let err = connect_and_play(&addr, &mut handler).await.unwrap_err();

    assert!(matches!(err, ClientNetworkError::ConnectFailed { .. }));
    assert_eq!(handler.state(), SessionState::Connecting);
}
