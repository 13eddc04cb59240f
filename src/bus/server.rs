//! TCP listener speaking newline-delimited JSON envelopes.
//!
//! Each connection is served by its own task. A connection may carry any
//! number of envelopes; each one is answered with exactly one ack line,
//! in order.

use super::envelope::Ack;
use super::router::Router;
use crate::error::{BusError, BusResult};
use anyhow::{Context, Result};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How long `run` waits for open connections after shutdown by default.
const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// A bound bus listener.
pub struct BusServer {
    listener: TcpListener,
    router: Arc<Router>,
    max_message_bytes: usize,
    drain_timeout: Duration,
}

impl BusServer {
    /// Bind the listener. Use port 0 to pick a free port.
    pub async fn bind(addr: &str, router: Router, max_message_bytes: usize) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind bus listener on {}", addr))?;

        Ok(Self {
            listener,
            router: Arc::new(router),
            max_message_bytes,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        })
    }

    /// Bound the time `run` waits for open connections after shutdown.
    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to read listener address")
    }

    /// Accept connections until `shutdown` resolves, then drain.
    ///
    /// After shutdown no new connections are accepted. Open connections
    /// finish the frame they are reading, write its ack and close once idle.
    /// Returns when every connection task is done, or aborts the stragglers
    /// after the drain timeout.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Listening on {} for subjects: {}",
            self.local_addr()?,
            self.router.subjects().join(", ")
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Bus listener shutting down");
                    break;
                }
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        error!("Connection task failed: {}", e);
                    }
                }
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!("Failed to accept connection: {}", e);
                            continue;
                        }
                    };

                    debug!("Connection from {}", peer);
                    let router = Arc::clone(&self.router);
                    let limit = self.max_message_bytes;
                    let stop = stop_rx.clone();

                    connections.spawn(async move {
                        match serve_connection(stream, &router, limit, stop).await {
                            Ok(handled) => debug!("Connection {} closed after {} messages", peer, handled),
                            Err(e) => error!("Connection {} failed: {}", peer, e),
                        }
                    });
                }
            }
        }

        drop(self.listener);
        let _ = stop_tx.send(true);

        if connections.is_empty() {
            return Ok(());
        }

        info!("Waiting for {} open connections", connections.len());
        let drained = tokio::time::timeout(self.drain_timeout, async {
            while let Some(joined) = connections.join_next().await {
                if let Err(e) = joined {
                    error!("Connection task failed: {}", e);
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                "Aborting {} connections still open after {:?}",
                connections.len(),
                self.drain_timeout
            );
            connections.shutdown().await;
        }

        Ok(())
    }
}

/// Serve one connection until the peer closes it or `stop` flips to true.
/// Returns the number of frames answered.
///
/// `stop` is only checked between frames: once bytes of a frame have
/// arrived, the frame is read to its end and answered first.
pub async fn serve_connection<S>(
    stream: S,
    router: &Router,
    max_message_bytes: usize,
    mut stop: watch::Receiver<bool>,
) -> BusResult<usize>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut frame = Vec::new();
    let mut handled = 0;

    loop {
        if *stop.borrow() {
            break;
        }

        let eof = tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() || *stop.borrow() {
                    break;
                }
                continue;
            }
            ready = reader.fill_buf() => ready?.is_empty(),
        };
        if eof {
            break;
        }

        frame.clear();
        let limit = max_message_bytes as u64 + 1;
        (&mut reader).take(limit).read_until(b'\n', &mut frame).await?;

        let complete = frame.last() == Some(&b'\n');
        let ack = if !complete && frame.len() > max_message_bytes {
            let rest = discard_line(&mut reader).await?;
            let err = BusError::MessageTooLarge {
                size: frame.len() + rest,
                limit: max_message_bytes,
            };
            warn!("{}", err);
            Ack::rejected(String::new(), None, err)
        } else {
            let body = trim_line(&frame);
            if body.is_empty() {
                continue;
            }
            router.dispatch_frame(body)
        };

        write_ack(&mut writer, &ack).await?;
        handled += 1;
    }

    writer.shutdown().await?;
    Ok(handled)
}

async fn write_ack<W>(writer: &mut W, ack: &Ack) -> BusResult<()>
where
    W: AsyncWrite + Unpin,
{
    let line = encode_ack(ack)?;
    writer.write_all(&line).await?;
    writer.flush().await?;
    Ok(())
}

fn encode_ack(ack: &Ack) -> BusResult<Vec<u8>> {
    let mut line = serde_json::to_vec(ack).map_err(BusError::Encode)?;
    line.push(b'\n');
    Ok(line)
}

/// Skip the rest of an oversized line without buffering it.
///
/// Returns the number of skipped bytes, not counting the newline.
async fn discard_line<R>(reader: &mut R) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut skipped = 0;

    loop {
        let buf = reader.fill_buf().await?;
        if buf.is_empty() {
            return Ok(skipped);
        }

        match buf.iter().position(|b| *b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(skipped + pos);
            }
            None => {
                let len = buf.len();
                reader.consume(len);
                skipped += len;
            }
        }
    }
}

fn trim_line(frame: &[u8]) -> &[u8] {
    let mut end = frame.len();
    while end > 0 && matches!(frame[end - 1], b'\n' | b'\r' | b' ' | b'\t') {
        end -= 1;
    }
    &frame[..end]
}
