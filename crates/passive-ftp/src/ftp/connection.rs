//! TCP transport: establishes sockets and owns the FTP control connection.
//!
//! Handles name resolution, connect, and the per-action deadline policy
//! from `FtpClientConfig`. The control channel sends one command line at a
//! time and answers each `receive` with a single bounded read.

use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::{describe_command, encode_command, Command, FtpReply};
use crate::ftp::types::FtpClientConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

/// Resolve `host` and connect to `host:port`.
///
/// Resolution failure (including a resolver that does not answer within
/// the deadline) is `UnknownHost`; a peer that cannot be reached is
/// `ConnectionRefused`; a connect that stalls is `SocketTimeout`.
pub async fn connect_stream(host: &str, port: u16, dur: Duration) -> FtpResult<TcpStream> {
    let addrs: Vec<SocketAddr> = match timeout(dur, lookup_host((host, port))).await {
        Ok(Ok(addrs)) => addrs.collect(),
        Ok(Err(e)) => {
            return Err(FtpError::unknown_host(format!(
                "Host not found: {}: {}",
                host, e
            )))
        }
        Err(_) => {
            return Err(FtpError::unknown_host(format!(
                "Host not found: resolving {} timed out",
                host
            )))
        }
    };

    if addrs.is_empty() {
        return Err(FtpError::unknown_host(format!(
            "Host not found: {} has no addresses",
            host
        )));
    }

    let mut last_err = None;
    for addr in addrs {
        match timeout(dur, TcpStream::connect(addr)).await {
            Ok(Ok(tcp)) => {
                tcp.set_nodelay(true).ok();
                return Ok(tcp);
            }
            Ok(Err(e)) => last_err = Some(e),
            Err(_) => {
                return Err(FtpError::timeout(format!(
                    "TCP connect to {} timed out",
                    addr
                )))
            }
        }
    }

    let reason = last_err
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no address accepted the connection".into());
    Err(FtpError::connection_refused(format!(
        "Connection refused: {}:{}: {}",
        host, port, reason
    )))
}

/// The long-lived command socket.
pub struct ControlConnection {
    stream: Option<TcpStream>,
    port: u16,
    deadline: Duration,
    chunk: usize,
    wire_level: log::Level,
    tag: String,
}

impl ControlConnection {
    pub fn new(config: &FtpClientConfig, tag: impl Into<String>) -> Self {
        Self {
            stream: None,
            port: config.control_port,
            deadline: config.timeout(),
            chunk: config.receive_chunk_bytes.max(1),
            wire_level: config.wire_log_level(),
            tag: tag.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Connect to `host` on the control port. Does not read the greeting.
    pub async fn open(&mut self, host: &str) -> FtpResult<()> {
        let tcp = connect_stream(host, self.port, self.deadline).await?;
        log::info!("[ftp:{}] control connection opened to {}:{}", self.tag, host, self.port);
        self.stream = Some(tcp);
        Ok(())
    }

    /// Write one command line.
    pub async fn send(&mut self, command: Command, args: &[&str]) -> FtpResult<()> {
        let stream = self.stream.as_mut().ok_or_else(FtpError::not_connected)?;
        let line = encode_command(command, args);
        log::log!(
            self.wire_level,
            "[ftp:{}] >>> {}",
            self.tag,
            describe_command(command, args)
        );

        let result = match timeout(self.deadline, stream.write_all(&line)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(FtpError::from_control_io(e)),
            Err(_) => Err(FtpError::timeout(format!(
                "Sending {} timed out after {}s",
                command,
                self.deadline.as_secs()
            ))),
        };
        self.drop_if_lost(result)
    }

    /// One bounded read, returned verbatim.
    ///
    /// A reply longer than the chunk size, or split across TCP segments,
    /// is returned truncated; the remainder is seen by the next read.
    pub async fn receive(&mut self) -> FtpResult<FtpReply> {
        let stream = self.stream.as_mut().ok_or_else(FtpError::not_connected)?;
        let mut buf = vec![0u8; self.chunk];

        let result = match timeout(self.deadline, stream.read(&mut buf)).await {
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(FtpReply::new(buf))
            }
            Ok(Err(e)) => Err(FtpError::from_control_io(e)),
            Err(_) => Err(FtpError::timeout(format!(
                "No reply within {}s",
                self.deadline.as_secs()
            ))),
        };

        if let Ok(reply) = &result {
            log::log!(
                self.wire_level,
                "[ftp:{}] <<< {}",
                self.tag,
                reply.text().trim_end()
            );
        }
        self.drop_if_lost(result)
    }

    /// Send a command and return the reply.
    pub async fn execute(&mut self, command: Command, args: &[&str]) -> FtpResult<FtpReply> {
        self.send(command, args).await?;
        self.receive().await
    }

    /// Close the socket, if any. The next `open` starts fresh.
    pub fn reset(&mut self) {
        if self.stream.take().is_some() {
            log::debug!("[ftp:{}] control connection closed", self.tag);
        }
    }

    fn drop_if_lost<T>(&mut self, result: FtpResult<T>) -> FtpResult<T> {
        if let Err(e) = &result {
            if e.is(crate::ftp::error::FtpErrorKind::NotConnected) {
                log::warn!("[ftp:{}] {}", self.tag, e.message);
                self.stream = None;
            }
        }
        result
    }
}
