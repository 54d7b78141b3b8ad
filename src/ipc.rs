//! Line-oriented control socket.
//!
//! One request line in, one reply line out. Replies start with `ok:` or
//! `err:`. Commands are forwarded to the render loop over a channel and
//! applied there between frames, so the session never leaves that loop.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::radar::{Direction, SetId};
use crate::session::{self, RadarSession};

/// Upper bound on a whole client round trip.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(2);

/// Commands sent from IPC server to render loop
#[derive(Debug)]
pub enum IpcCommand {
    Rotate {
        degrees: f64,
        direction: Direction,
        reply: oneshot::Sender<String>,
    },
    Status { reply: oneshot::Sender<String> },
    Positions { set: SetId, reply: oneshot::Sender<String> },
    Ping { reply: oneshot::Sender<String> },
}

/// Get the socket path for IPC
pub fn socket_path() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_RUNTIME_DIR") {
        PathBuf::from(dir).join("cyradar.sock")
    } else {
        PathBuf::from("/tmp/cyradar.sock")
    }
}

/// Parse a protocol line into an IpcCommand.
///
/// The rotation amount is validated here, before anything reaches the
/// render loop.
fn parse_command(line: &str, reply: oneshot::Sender<String>) -> Result<IpcCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["rotate", amount] => Ok(IpcCommand::Rotate {
            degrees: session::parse_degrees(amount)?,
            direction: Direction::Left,
            reply,
        }),
        ["rotate", amount, direction] => Ok(IpcCommand::Rotate {
            degrees: session::parse_degrees(amount)?,
            direction: direction.parse()?,
            reply,
        }),
        ["status"] => Ok(IpcCommand::Status { reply }),
        ["positions", set] => Ok(IpcCommand::Positions {
            set: set.parse()?,
            reply,
        }),
        ["ping"] => Ok(IpcCommand::Ping { reply }),
        _ => Err(anyhow::anyhow!("Unknown command: {}", line)),
    }
}

/// Apply an IPC command to the session and answer it.
pub fn process_ipc_command(cmd: IpcCommand, session: &mut RadarSession, now: Instant) {
    match cmd {
        IpcCommand::Rotate {
            degrees,
            direction,
            reply,
        } => {
            let response = match session.rotate_by(degrees, direction, now) {
                Ok(outcome) => format!("ok: rotation={:.2}", outcome.cumulative_degrees),
                Err(e) => format!("err: {}", e),
            };
            let _ = reply.send(response);
        }
        IpcCommand::Status { reply } => {
            let status = session.status();
            let _ = reply.send(format!(
                "ok: rotation={:.2} blue={} red={} pending_frames={}",
                status.cumulative_degrees,
                status.blue.name(),
                status.red.name(),
                status.pending_frames,
            ));
        }
        IpcCommand::Positions { set, reply } => {
            let points: Vec<String> = session
                .displayed(set)
                .iter()
                .map(|p| format!("{:.2},{:.2}", p.x, p.y))
                .collect();
            let _ = reply.send(format!("ok: {}", points.join(" ")));
        }
        IpcCommand::Ping { reply } => {
            let _ = reply.send("ok: pong".to_string());
        }
    }
}

/// Parse one request line, hand it to the render loop and wait for the reply.
async fn dispatch(line: &str, cmd_tx: &mpsc::Sender<IpcCommand>) -> Result<String> {
    let (reply_tx, reply_rx) = oneshot::channel();
    let command = match parse_command(line, reply_tx) {
        Ok(cmd) => cmd,
        Err(e) => return Ok(format!("err: {}", e)),
    };

    cmd_tx
        .send(command)
        .await
        .map_err(|_| anyhow::anyhow!("Render loop has shut down"))?;

    Ok(reply_rx
        .await
        .unwrap_or_else(|_| "err: render loop dropped the request".to_string()))
}

/// Answer request lines until the client closes its end. Blank lines are
/// skipped.
async fn handle_client(stream: UnixStream, cmd_tx: mpsc::Sender<IpcCommand>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        debug!("IPC request: {}", line);
        let response = dispatch(line, &cmd_tx).await?;
        writer.write_all(response.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    Ok(())
}

/// Start the IPC server, listening for commands on a Unix socket
pub async fn start_server(cmd_tx: mpsc::Sender<IpcCommand>) -> Result<()> {
    serve(socket_path(), cmd_tx).await
}

async fn serve(path: PathBuf, cmd_tx: mpsc::Sender<IpcCommand>) -> Result<()> {
    // Remove stale socket from previous run
    let _ = std::fs::remove_file(&path);

    let listener = UnixListener::bind(&path)
        .with_context(|| format!("Failed to bind IPC socket at {}", path.display()))?;

    info!("IPC server listening on {}", path.display());

    loop {
        let (stream, _) = listener.accept().await?;
        let cmd_tx = cmd_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(stream, cmd_tx).await {
                debug!("IPC client error: {}", e);
            }
        });
    }
}

/// Send one request line to a running cyradar instance and return its reply.
pub async fn send_command(line: &str) -> Result<String> {
    send_to(&socket_path(), line).await
}

async fn send_to(path: &Path, line: &str) -> Result<String> {
    let exchange = async {
        let mut stream = UnixStream::connect(path)
            .await
            .with_context(|| format!("Could not connect to cyradar at {}. Is it running?", path.display()))?;
        stream.write_all(format!("{}\n", line.trim()).as_bytes()).await?;
        stream.shutdown().await?;

        let mut response = String::new();
        BufReader::new(stream)
            .read_line(&mut response)
            .await
            .context("Failed to read response")?;
        if response.is_empty() {
            anyhow::bail!("cyradar closed the connection without replying");
        }
        Ok::<_, anyhow::Error>(response.trim().to_string())
    };

    tokio::time::timeout(CLIENT_TIMEOUT, exchange)
        .await
        .context("Timed out waiting for cyradar")?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadarConfig;
    use crate::error::RadarError;
    use crate::radar::PointSetRegistry;

    fn parse(line: &str) -> Result<IpcCommand> {
        let (tx, _rx) = oneshot::channel();
        parse_command(line, tx)
    }

    fn session() -> RadarSession {
        let radar = RadarConfig::default();
        let registry = PointSetRegistry::new(radar.blue, radar.red).unwrap();
        RadarSession::new(registry, Duration::from_millis(1000))
    }

    #[test]
    fn parses_rotate_lines() {
        match parse("rotate 90 right").unwrap() {
            IpcCommand::Rotate {
                degrees, direction, ..
            } => {
                assert_eq!(degrees, 90.0);
                assert_eq!(direction, Direction::Right);
            }
            other => panic!("unexpected {:?}", other),
        }
        match parse("rotate -12.5").unwrap() {
            IpcCommand::Rotate {
                degrees, direction, ..
            } => {
                assert_eq!(degrees, -12.5);
                assert_eq!(direction, Direction::Left);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse("rotate abc left").is_err());
        assert!(parse("rotate 10 sideways").is_err());
        let err = parse("positions green").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RadarError>(),
            Some(RadarError::InvalidPointSetName { .. })
        ));
        assert!(matches!(
            parse("positions RED").unwrap(),
            IpcCommand::Positions { set: SetId::Red, .. }
        ));
        assert!(parse("scan 0 180").is_err());
    }

    #[test]
    fn rotate_command_updates_session() {
        let mut session = session();
        let (tx, mut rx) = oneshot::channel();
        let cmd = IpcCommand::Rotate {
            degrees: 30.0,
            direction: Direction::Right,
            reply: tx,
        };
        process_ipc_command(cmd, &mut session, Instant::now());
        assert_eq!(rx.try_recv().unwrap(), "ok: rotation=-30.00");
        assert_eq!(session.registry().cumulative_degrees(), -30.0);
        assert!(session.is_animating());
    }

    #[test]
    fn status_reports_rotation_and_states() {
        let mut session = session();
        let (tx, mut rx) = oneshot::channel();
        process_ipc_command(IpcCommand::Status { reply: tx }, &mut session, Instant::now());
        assert_eq!(
            rx.try_recv().unwrap(),
            "ok: rotation=0.00 blue=idle red=idle pending_frames=0"
        );
    }

    #[tokio::test]
    async fn round_trip_over_socket() {
        let path = std::env::temp_dir().join(format!("cyradar-test-{}.sock", std::process::id()));
        let (cmd_tx, mut cmd_rx) = mpsc::channel(8);
        let server = tokio::spawn(serve(path.clone(), cmd_tx));

        // Stand-in render loop
        let render = tokio::spawn(async move {
            let mut session = session();
            while let Some(cmd) = cmd_rx.recv().await {
                process_ipc_command(cmd, &mut session, Instant::now());
            }
        });

        let mut reply = Err(anyhow::anyhow!("server never came up"));
        for _ in 0..50 {
            reply = send_to(&path, "ping").await;
            if reply.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(reply.unwrap(), "ok: pong");

        let bad = send_to(&path, "rotate abc").await.unwrap();
        assert!(bad.starts_with("err: invalid rotation amount"));

        // Several requests on one connection, blank lines skipped
        let mut stream = UnixStream::connect(&path).await.unwrap();
        stream
            .write_all(b"rotate 90 right\n\nstatus\n")
            .await
            .unwrap();
        stream.shutdown().await.unwrap();
        let mut lines = BufReader::new(stream).lines();
        assert_eq!(
            lines.next_line().await.unwrap().as_deref(),
            Some("ok: rotation=-90.00")
        );
        let status = lines.next_line().await.unwrap().unwrap();
        assert!(status.starts_with("ok: rotation=-90.00 blue=running red=running"));
        assert_eq!(lines.next_line().await.unwrap(), None);

        server.abort();
        render.abort();
        let _ = std::fs::remove_file(&path);
    }
}
