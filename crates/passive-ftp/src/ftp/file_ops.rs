//! File-level operations: retrieve (RETR), store (STOR), delete (DELE).
//!
//! Transfers are buffered whole in memory: RETR drains the data channel
//! before writing the local file, STOR reads the local file before the
//! data channel is negotiated.

use crate::ftp::client::FtpClient;
use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::protocol::{Command, FtpReply, ReplyCode};
use std::path::Path;
use tokio::fs;

impl FtpClient {
    // ─── DOWNLOAD (RETR) ─────────────────────────────────────────

    /// Download `remote` into `local` (or into a local file named `remote`).
    ///
    /// Returns the RETR reply followed by the completion reply. On `550`
    /// nothing is drained and no local file is written.
    pub async fn retrieve(&mut self, remote: &str, local: Option<&Path>) -> FtpResult<FtpReply> {
        self.session.require_ready()?;
        let local = local.unwrap_or_else(|| Path::new(remote)).to_path_buf();

        self.open_data_connection().await?;
        let result = self.retrieve_transaction(remote, &local).await;
        self.close_data_connection();
        result
    }

    async fn retrieve_transaction(&mut self, remote: &str, local: &Path) -> FtpResult<FtpReply> {
        let mut reply = self.execute(Command::Retr, &[remote]).await?;
        if reply.is(ReplyCode::FileNotFound) {
            return Ok(reply);
        }

        let contents = self.data.drain().await?;
        let done = self.receive().await?;
        reply.append(done);

        fs::write(local, &contents).await.map_err(|e| {
            FtpError::local_io(format!("Cannot write {}: {}", local.display(), e))
        })?;
        log::debug!(
            "[ftp:{}] retrieved {} ({} bytes) into {}",
            self.id(),
            remote,
            contents.len(),
            local.display()
        );
        Ok(reply)
    }

    // ─── UPLOAD (STOR) ───────────────────────────────────────────

    /// Upload `local` as `remote` (or under the local path as given).
    ///
    /// Returns the STOR reply followed by the completion reply.
    pub async fn store(&mut self, local: &Path, remote: Option<&str>) -> FtpResult<FtpReply> {
        self.session.require_ready()?;

        let remote = match remote {
            Some(r) => r.to_string(),
            None => default_remote_name(local),
        };
        let contents = fs::read(local).await.map_err(|e| {
            FtpError::local_io(format!("Cannot read {}: {}", local.display(), e))
        })?;

        self.open_data_connection().await?;
        let result = self.store_transaction(&remote, &contents).await;
        self.close_data_connection();

        let mut reply = result?;
        let done = self.receive().await?;
        reply.append(done);
        Ok(reply)
    }

    async fn store_transaction(&mut self, remote: &str, contents: &[u8]) -> FtpResult<FtpReply> {
        let reply = self.execute(Command::Stor, &[remote]).await?;
        self.data.write_all(contents).await?;
        Ok(reply)
    }

    // ─── DELE ────────────────────────────────────────────────────

    /// Delete a remote file.
    pub async fn dele(&mut self, filename: &str) -> FtpResult<FtpReply> {
        self.simple_command(Command::Dele, &[filename]).await
    }

    /// Alias for [`FtpClient::dele`].
    pub async fn rm(&mut self, filename: &str) -> FtpResult<FtpReply> {
        self.dele(filename).await
    }
}

/// Remote name used when none is given: the local path, unchanged.
fn default_remote_name(local: &Path) -> String {
    local.to_string_lossy().into_owned()
}
