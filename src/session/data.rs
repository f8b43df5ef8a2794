//! FTP passive-mode data channel. Each transfer is a standalone task that
//! owns the accepted data socket outright; the control session never holds
//! more than the listener it handed off, so there is no shared ownership to
//! coordinate once a transfer starts. Grounded in
//! `examples/other_examples/.../session.rs`'s `process_data` per-transfer
//! spawned-task pattern and
//! `examples/original_source/server/object_storage/src/ftp_command_handlers.cpp`'s
//! 150-then-data-then-226/450/426 ordering.

use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::warn;

use crate::codec::ftp_reply;
use crate::object_store::{ObjectStore, StoreStatus};

/// Accepts the passive data connection and streams `payload` to it, then
/// posts the final control-channel reply.
pub async fn send_data(listener: TcpListener, payload: Bytes, reply_tx: mpsc::UnboundedSender<Bytes>) {
    let reply = match listener.accept().await {
        Ok((mut socket, _)) => match socket.write_all(&payload).await {
            Ok(()) => {
                let _ = socket.shutdown().await;
                ftp_reply::serialize(226, "Done")
            }
            Err(e) => {
                warn!(error = %e, "data channel write failed");
                ftp_reply::serialize(426, &format!("Transfer aborted: {}", e))
            }
        },
        Err(e) => {
            warn!(error = %e, "data channel accept failed");
            ftp_reply::serialize(426, &format!("Transfer aborted: {}", e))
        }
    };
    let _ = reply_tx.send(reply);
}

/// Accepts the passive data connection, reads it to completion, and stores
/// the result. Posts `226 File saved` on success, `450` if the path already
/// existed, `426` on a connection failure.
pub async fn receive_data(
    listener: TcpListener,
    store: Arc<ObjectStore>,
    path: String,
    reply_tx: mpsc::UnboundedSender<Bytes>,
) {
    let reply = match listener.accept().await {
        Ok((mut socket, _)) => {
            let mut buf = Vec::new();
            match socket.read_to_end(&mut buf).await {
                Ok(_) => match store.add(path, Bytes::from(buf)).await {
                    StoreStatus::Success => ftp_reply::serialize(226, "File saved"),
                    _ => ftp_reply::serialize(450, "File not saved"),
                },
                Err(e) => {
                    warn!(error = %e, "data channel read failed");
                    ftp_reply::serialize(426, &format!("Transfer aborted: {}", e))
                }
            }
        }
        Err(e) => {
            warn!(error = %e, "data channel accept failed");
            ftp_reply::serialize(426, &format!("Transfer aborted: {}", e))
        }
    };
    let _ = reply_tx.send(reply);
}
