//! Shared types for the FTP crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Well-known FTP control port.
pub const DEFAULT_CONTROL_PORT: u16 = 21;
/// Deadline applied to every socket action, in seconds.
pub const DEFAULT_TIMEOUT_SEC: u64 = 5;
/// Size of one bounded control read / data drain read.
pub const DEFAULT_RECEIVE_CHUNK_BYTES: usize = 4096;

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for a single FTP client instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FtpClientConfig {
    /// Log every command and reply at `Debug` instead of `Trace`.
    #[serde(default)]
    pub debug: bool,
    /// Control port the client connects to.
    #[serde(default = "default_control_port")]
    pub control_port: u16,
    /// Per-socket-action deadline in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_sec: u64,
    /// Bytes requested by each socket read.
    #[serde(default = "default_chunk")]
    pub receive_chunk_bytes: usize,
}

fn default_control_port() -> u16 {
    DEFAULT_CONTROL_PORT
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SEC
}
fn default_chunk() -> usize {
    DEFAULT_RECEIVE_CHUNK_BYTES
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        Self {
            debug: false,
            control_port: default_control_port(),
            timeout_sec: default_timeout(),
            receive_chunk_bytes: default_chunk(),
        }
    }
}

impl FtpClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_sec)
    }

    /// Level used for wire tracing.
    pub fn wire_log_level(&self) -> log::Level {
        if self.debug {
            log::Level::Debug
        } else {
            log::Level::Trace
        }
    }
}

// ─── Session ─────────────────────────────────────────────────────────

/// Where the client sits in the connect/login state machine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    Disconnected,
    Connected,
    Authenticated,
}

/// Snapshot of a client's session, for display by a front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FtpSessionInfo {
    pub id: String,
    pub host: Option<String>,
    pub user: Option<String>,
    pub status: SessionStatus,
    pub control_port: u16,
    pub data_channel_open: bool,
    pub connected_at: Option<DateTime<Utc>>,
    pub last_activity: Option<DateTime<Utc>>,
}
