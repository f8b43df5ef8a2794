//! Minimal in-process metrics.
//!
//! No exporter surface (no prometheus scrape endpoint) — Non-goals exclude
//! durability/observability beyond structured logs, so these counters only
//! ever get read back out to emit a `tracing` event on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    active_sessions: AtomicU64,
    http_requests: AtomicU64,
    ftp_commands: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_session(&self) {
        self.active_sessions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dec_session(&self) {
        self.active_sessions.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn add_http_request(&self) {
        self.http_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_ftp_command(&self) {
        self.ftp_commands.fetch_add(1, Ordering::Relaxed);
    }

    pub fn active_sessions(&self) -> u64 {
        self.active_sessions.load(Ordering::Relaxed)
    }

    pub fn http_requests(&self) -> u64 {
        self.http_requests.load(Ordering::Relaxed)
    }

    pub fn ftp_commands(&self) -> u64 {
        self.ftp_commands.load(Ordering::Relaxed)
    }
}
