//! C7: server facade. Grounded in
//! `examples/developerfred-libunftp/src/server/ftpserver.rs`'s builder-style
//! `Server<S, U>` and `listen_normal_mode` accept loop, generalized here to
//! this system's concrete `ObjectStore`/`UserDatabase` pair instead of the
//! teacher's pluggable `StorageBackend<U>`/`Authenticator<U>` trait objects
//! (see DESIGN.md's Open Question notes).

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::ServerError;
use crate::metrics::Metrics;
use crate::object_store::ObjectStore;
use crate::session::{PortRange, Session};
use crate::user_db::UserDatabase;

/// Builds and runs the dual-protocol server.
pub struct Server {
    address: String,
    port: u16,
    authenticate: bool,
    ftp_ports: PortRange,
    store: Arc<ObjectStore>,
    users: Arc<UserDatabase>,
    metrics: Arc<Metrics>,
}

impl Server {
    pub fn new(address: impl Into<String>, port: u16, authenticate: bool, ftp_ports: PortRange) -> Self {
        Self {
            address: address.into(),
            port,
            authenticate,
            ftp_ports,
            store: Arc::new(ObjectStore::new()),
            users: Arc::new(UserDatabase::new()),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Registers a user ahead of time, e.g. the operator account the CLI
    /// seeds at startup. Returns `false` if the username is reserved or
    /// already registered.
    pub async fn add_user(&self, username: impl Into<String>, password: impl Into<String>) -> bool {
        self.users.add(username, password).await
    }

    /// Binds the configured address and port.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        let addr = format!("{}:{}", self.address, self.port)
            .parse()
            .map_err(ServerError::InvalidAddress)?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        info!(%addr, "listening");
        Ok(listener)
    }

    /// Binds and accepts connections until the process receives Ctrl-C,
    /// spawning one [`Session`] task per connection.
    pub async fn run(self) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }

    /// Accepts connections on an already-bound listener until Ctrl-C,
    /// spawning one [`Session`] task per connection. Split out from [`run`]
    /// so tests can bind an ephemeral port and read back its address before
    /// serving.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServerError> {
        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, peer_addr)) => {
                            let local_addr = match stream.local_addr() {
                                Ok(a) => a,
                                Err(e) => {
                                    error!(error = %e, "failed to read local address for accepted connection");
                                    continue;
                                }
                            };
                            if let Err(e) = stream.set_nodelay(true) {
                                error!(error = %e, "failed to set TCP_NODELAY");
                            }
                            let (read_half, write_half) = stream.into_split();
                            let session = Session::new(
                                read_half,
                                write_half,
                                local_addr,
                                peer_addr,
                                self.store.clone(),
                                self.users.clone(),
                                self.metrics.clone(),
                                self.authenticate,
                                self.ftp_ports,
                            );
                            info!(peer = %peer_addr, "accepted connection");
                            tokio::spawn(session.run());
                        }
                        Err(e) => {
                            error!(error = %e, "accept failed");
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!(
                        active_sessions = self.metrics.active_sessions(),
                        http_requests = self.metrics.http_requests(),
                        ftp_commands = self.metrics.ftp_commands(),
                        "shutting down"
                    );
                    return Ok(());
                }
            }
        }
    }
}
