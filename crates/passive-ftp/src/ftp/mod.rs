//! # FTP client engine
//!
//! Plain FTP (RFC 959) over a persistent control channel, with one
//! extended-passive (RFC 2428 EPSV) data channel per transfer.
//!
//! Architecture:
//! - `types`: configuration, session snapshot, session status
//! - `error`: FTP-specific error type
//! - `protocol`: command keywords, status codes, reply decoding
//! - `connection`: TCP connect + control connection
//! - `transfer`: EPSV data channel (drain / write)
//! - `session`: host/user gating
//! - `client`: stateful client (connect, login, logout, disconnect, LIST, PWD)
//! - `directory`: CWD, CDUP, MKD, RMD, rename
//! - `file_ops`: retrieve, store, delete

pub mod types;
pub mod error;
pub mod protocol;
pub mod connection;
pub mod transfer;
pub mod session;
pub mod client;
pub mod directory;
pub mod file_ops;

// Re-exports for lib.rs consumers
pub use types::*;
pub use error::{FtpError, FtpErrorKind, FtpResult};
pub use protocol::{Command, FtpReply, ReplyCode};
pub use client::FtpClient;
