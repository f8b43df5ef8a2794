//! C6: per-connection session engine. One [`Session`] owns one accepted TCP
//! connection and runs its whole lifetime on a single task: a single
//! outstanding read, replies written as they're produced, and at most one
//! active FTP data transfer farmed out to its own task.
//!
//! Grounded in `examples/developerfred-libunftp/src/server/ftpserver.rs`'s
//! control loop and `examples/other_examples/.../session.rs`'s per-transfer
//! spawned-task pattern, generalized to this system's HTTP/FTP dual
//! protocol and concrete `ObjectStore`/`UserDatabase` types.

mod data;
mod ftp;
mod http;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::codec::ftp_command::FtpCommand;
use crate::detector::{detect_protocol, Protocol};
use crate::error::SessionError;
use crate::metrics::Metrics;
use crate::object_store::ObjectStore;
use crate::user_db::UserDatabase;

/// Inclusive port range the FTP control-port greeting applies to, and the
/// range passive-mode data listeners are bound from.
///
/// Non-goal note: the reference implementation binds passive listeners to
/// ephemeral ports (port `0`) rather than enforcing the configured range,
/// since spec.md leaves the exact allocation strategy within the range
/// unspecified; `min`/`max` are kept for the FTP-port-triggered greeting.
#[derive(Debug, Clone, Copy)]
pub struct PortRange {
    pub min: u16,
    pub max: u16,
}

impl PortRange {
    pub fn contains(&self, port: u16) -> bool {
        (self.min..=self.max).contains(&port)
    }
}

pub struct Session {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    reply_rx: mpsc::UnboundedReceiver<Bytes>,
    reply_tx: mpsc::UnboundedSender<Bytes>,

    store: Arc<ObjectStore>,
    users: Arc<UserDatabase>,
    metrics: Arc<Metrics>,
    authenticate: bool,
    ftp_ports: PortRange,

    local_addr: SocketAddr,
    peer_addr: SocketAddr,
    protocol: Option<Protocol>,

    // FTP sub-state. Touched only from this task — the data-transfer tasks
    // spawned in `session::data` never see `Session`, only the store, the
    // reply channel, and the already-accepted listener/path they need.
    logged_in_user: Option<String>,
    last_username: Option<String>,
    last_ftp_command: Option<FtpCommand>,
    cwd: String,
    data_listener: Option<TcpListener>,
}

impl Session {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reader: OwnedReadHalf,
        writer: OwnedWriteHalf,
        local_addr: SocketAddr,
        peer_addr: SocketAddr,
        store: Arc<ObjectStore>,
        users: Arc<UserDatabase>,
        metrics: Arc<Metrics>,
        authenticate: bool,
        ftp_ports: PortRange,
    ) -> Self {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        Self {
            reader: BufReader::new(reader),
            writer,
            reply_rx,
            reply_tx,
            store,
            users,
            metrics,
            authenticate,
            ftp_ports,
            local_addr,
            peer_addr,
            protocol: None,
            logged_in_user: None,
            last_username: None,
            last_ftp_command: None,
            cwd: "/".to_string(),
            data_listener: None,
        }
    }

    /// Drives the session to completion: reads the control channel until
    /// EOF or error, dispatching each line through the detected protocol's
    /// handler, while also draining replies posted asynchronously by data
    /// transfer tasks.
    pub async fn run(mut self) {
        self.metrics.inc_session();

        if self.ftp_ports.contains(self.peer_addr.port())
            && self.write_raw(crate::codec::ftp_reply::serialize(220, "Welcome")).await.is_err()
        {
            self.metrics.dec_session();
            return;
        }

        loop {
            tokio::select! {
                line = read_line(&mut self.reader) => {
                    match line {
                        Ok(Some(line)) => {
                            if self.protocol.is_none() {
                                self.protocol = Some(detect_protocol(&line));
                                debug!(peer = %self.peer_addr, protocol = ?self.protocol, "protocol detected");
                            }
                            let result = match self.protocol {
                                Some(Protocol::Http) => self.handle_http(line).await,
                                Some(Protocol::Ftp) => self.handle_ftp(&line).await,
                                None => unreachable!("protocol is set before dispatch"),
                            };
                            if let Err(e) = result {
                                match e {
                                    SessionError::PeerClosed => {
                                        info!(peer = %self.peer_addr, "peer reset control channel");
                                    }
                                    e => {
                                        warn!(peer = %self.peer_addr, error = %e, "control channel write error");
                                    }
                                }
                                break;
                            }
                        }
                        Ok(None) => {
                            info!(peer = %self.peer_addr, "peer closed control channel");
                            break;
                        }
                        Err(SessionError::PeerClosed) => {
                            info!(peer = %self.peer_addr, "peer reset control channel");
                            break;
                        }
                        Err(e) => {
                            warn!(peer = %self.peer_addr, error = %e, "control channel read error");
                            break;
                        }
                    }
                }
                Some(msg) = self.reply_rx.recv() => {
                    if self.write_raw(msg).await.is_err() {
                        break;
                    }
                }
            }
        }

        self.metrics.dec_session();
    }

    async fn write_raw(&mut self, bytes: Bytes) -> Result<(), SessionError> {
        self.writer.write_all(&bytes).await.map_err(|e| {
            let error = SessionError::from_io(e);
            warn!(peer = %self.peer_addr, %error, "control channel write error");
            error
        })
    }

    /// Binds a passive-mode data listener on an ephemeral port of the same
    /// address the control channel is on.
    async fn bind_data_listener(&self) -> std::io::Result<TcpListener> {
        let ip = match self.local_addr.ip() {
            std::net::IpAddr::V4(v4) => v4,
            std::net::IpAddr::V6(_) => Ipv4Addr::LOCALHOST,
        };
        TcpListener::bind((ip, 0)).await
    }
}

/// Reads one line (up to and including `\n`), `Ok(None)` on clean EOF.
async fn read_line<R: tokio::io::AsyncBufRead + Unpin>(
    reader: &mut R,
) -> Result<Option<String>, SessionError> {
    let mut buf = Vec::new();
    let n = reader
        .read_until(b'\n', &mut buf)
        .await
        .map_err(SessionError::from_io)?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}
