//! FTP-specific error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorised FTP error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FtpError {
    pub kind: FtpErrorKind,
    pub message: String,
}

/// The closed set of failures an operation can report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FtpErrorKind {
    /// Host name could not be resolved.
    UnknownHost,
    /// Peer refused (or could not be reached for) a TCP connect.
    ConnectionRefused,
    /// Operation requires an open control connection.
    NotConnected,
    /// Operation requires a logged-in user.
    NotAuthenticated,
    /// A socket action exceeded the configured deadline.
    SocketTimeout,
    /// Reading or writing a local file failed.
    LocalIoError,
    /// The data channel was not open, broke, or could not be negotiated.
    ClosedDataConnection,
}

pub type FtpResult<T> = Result<T, FtpError>;

// ── Construction helpers ─────────────────────────────────────────────

impl FtpError {
    pub fn new(kind: FtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
        }
    }

    /// Exact-kind check for callers routing on the error.
    pub fn is(&self, kind: FtpErrorKind) -> bool {
        self.kind == kind
    }

    // ── Convenience constructors ─────────────────────────────────

    pub fn unknown_host(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::UnknownHost, msg)
    }

    pub fn connection_refused(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::ConnectionRefused, msg)
    }

    pub fn not_connected() -> Self {
        Self::new(FtpErrorKind::NotConnected, "Not connected")
    }

    pub fn connection_lost(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::NotConnected, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(FtpErrorKind::NotAuthenticated, "Not authenticated")
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::SocketTimeout, msg)
    }

    pub fn local_io(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::LocalIoError, msg)
    }

    pub fn closed_data_connection(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::ClosedDataConnection, msg)
    }

    /// Classify a failure on the established control socket.
    pub fn from_control_io(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Self::timeout(format!("Control socket timed out: {}", e))
            }
            _ => Self::connection_lost(format!("Control connection lost: {}", e)),
        }
    }

    /// Classify a failure on an established data socket.
    pub fn from_data_io(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => {
                Self::timeout(format!("Data socket timed out: {}", e))
            }
            _ => Self::closed_data_connection(format!("Data connection failed: {}", e)),
        }
    }
}

impl fmt::Display for FtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[FTP {:?}] {}", self.kind, self.message)
    }
}

impl std::error::Error for FtpError {}

impl From<FtpError> for String {
    fn from(e: FtpError) -> String {
        e.message
    }
}
