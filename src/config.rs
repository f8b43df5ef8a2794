//! CLI configuration. Grounded in `examples/original_source/example_app.cpp`'s
//! `<address> <port> <threads> <auth|no_auth> <ftp_port_min>-<ftp_port_max>`
//! positional contract, promoted to a `clap` derive parser.

use clap::Parser;

use crate::error::ServerError;
use crate::session::PortRange;

#[derive(Debug, Parser)]
#[command(name = "objectstored", about = "Dual-protocol (HTTP/FTP) in-memory object storage server")]
pub struct Config {
    /// Address to listen on.
    pub address: String,

    /// Port to listen on.
    pub port: u16,

    /// Number of worker threads in the runtime's thread pool.
    pub threads: usize,

    /// Either "auth" or "no_auth" — whether HTTP Basic auth is required.
    pub auth_mode: String,

    /// FTP passive port range, formatted `min-max`.
    pub ftp_port_range: String,
}

impl Config {
    pub fn authenticate(&self) -> bool {
        self.auth_mode == "auth"
    }

    pub fn parsed_ftp_port_range(&self) -> Result<PortRange, ServerError> {
        let (min, max) = self
            .ftp_port_range
            .split_once('-')
            .ok_or_else(|| ServerError::InvalidPortRange(self.ftp_port_range.clone()))?;
        let min: u16 = min
            .parse()
            .map_err(|_| ServerError::InvalidPortRange(self.ftp_port_range.clone()))?;
        let max: u16 = max
            .parse()
            .map_err(|_| ServerError::InvalidPortRange(self.ftp_port_range.clone()))?;
        Ok(PortRange { min, max })
    }
}
