//! Data-channel management for FTP transfers.
//!
//! Only extended passive mode (RFC 2428 EPSV) is used: the server
//! advertises a port, the client connects to the control host on it.
//! A channel serves exactly one drain or one write and is then closed.

use crate::ftp::connection::{connect_stream, ControlConnection};
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::Command;
use crate::ftp::session::SessionState;
use crate::ftp::types::FtpClientConfig;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// The per-operation passive data socket.
pub struct DataConnection {
    stream: Option<TcpStream>,
    port: Option<u16>,
    is_open: bool,
    deadline: Duration,
    chunk: usize,
    wire_level: log::Level,
    tag: String,
}

impl DataConnection {
    pub fn new(config: &FtpClientConfig, tag: impl Into<String>) -> Self {
        Self {
            stream: None,
            port: None,
            is_open: false,
            deadline: config.timeout(),
            chunk: config.receive_chunk_bytes.max(1),
            wire_level: config.wire_log_level(),
            tag: tag.into(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Port negotiated for the current channel.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Negotiate EPSV on `control` and connect to the advertised port.
    ///
    /// A no-op when the channel is already open.
    pub async fn open(
        &mut self,
        control: &mut ControlConnection,
        session: &SessionState,
    ) -> FtpResult<()> {
        let host = session.require_connected()?.to_string();
        session.require_authenticated()?;

        if self.is_open {
            return Ok(());
        }

        let reply = control.execute(Command::Epsv, &[]).await?;
        let port = reply.passive_port().ok_or_else(|| {
            FtpError::closed_data_connection(format!(
                "Cannot parse EPSV reply: {}",
                reply.text().trim_end()
            ))
        })?;

        let tcp = connect_stream(&host, port, self.deadline).await?;
        log::log!(
            self.wire_level,
            "[ftp:{}] passive connection opened at {}:{}",
            self.tag,
            host,
            port
        );

        self.stream = Some(tcp);
        self.port = Some(port);
        self.is_open = true;
        Ok(())
    }

    /// Drop the socket and mark the channel closed.
    pub fn close(&mut self) {
        if self.is_open || self.stream.is_some() {
            log::log!(self.wire_level, "[ftp:{}] passive connection closed", self.tag);
        }
        self.stream = None;
        self.port = None;
        self.is_open = false;
    }

    /// Read until the peer closes the channel and return everything read.
    pub async fn drain(&mut self) -> FtpResult<Vec<u8>> {
        let stream = match (self.is_open, self.stream.as_mut()) {
            (true, Some(s)) => s,
            _ => return Err(FtpError::closed_data_connection("Data connection closed")),
        };

        let mut total = Vec::new();
        let mut buf = vec![0u8; self.chunk];
        loop {
            let n = match timeout(self.deadline, stream.read(&mut buf)).await {
                Ok(Ok(n)) => n,
                Ok(Err(e)) => return Err(FtpError::from_data_io(e)),
                Err(_) => {
                    return Err(FtpError::timeout(format!(
                        "Data read timed out after {}s",
                        self.deadline.as_secs()
                    )))
                }
            };
            if n == 0 {
                break;
            }
            total.extend_from_slice(&buf[..n]);
        }

        log::log!(
            self.wire_level,
            "[ftp:{}] received {} data bytes",
            self.tag,
            total.len()
        );
        Ok(total)
    }

    /// Write `data` in full, then close the socket to signal end-of-data.
    pub async fn write_all(&mut self, data: &[u8]) -> FtpResult<()> {
        if !self.is_open {
            return Err(FtpError::closed_data_connection("Data connection closed"));
        }
        let mut stream = self
            .stream
            .take()
            .ok_or_else(|| FtpError::closed_data_connection("Data connection closed"))?;

        log::log!(
            self.wire_level,
            "[ftp:{}] sending {} data bytes",
            self.tag,
            data.len()
        );
        let sent = async {
            stream.write_all(data).await?;
            stream.shutdown().await
        };
        match timeout(self.deadline, sent).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(FtpError::from_data_io(e)),
            Err(_) => Err(FtpError::timeout(format!(
                "Data write timed out after {}s",
                self.deadline.as_secs()
            ))),
        }
    }
}
