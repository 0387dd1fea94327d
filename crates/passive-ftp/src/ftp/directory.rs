//! Directory operations: cwd, cdup, mkd, rmd, rename.
//!
//! Each is a single command/reply exchange on the control channel; the
//! reply is returned as-is for the caller to inspect.

use crate::ftp::client::FtpClient;
use crate::ftp::error::FtpResult;
use crate::ftp::protocol::{Command, FtpReply, ReplyCode};

impl FtpClient {
    // ─── CWD / CDUP ──────────────────────────────────────────────

    /// Change the remote working directory.
    pub async fn cwd(&mut self, directory: &str) -> FtpResult<FtpReply> {
        self.simple_command(Command::Cwd, &[directory]).await
    }

    /// Move to the parent directory.
    pub async fn cdup(&mut self) -> FtpResult<FtpReply> {
        self.simple_command(Command::Cdup, &[]).await
    }

    // ─── MKD / RMD ───────────────────────────────────────────────

    /// Create a directory on the remote server.
    pub async fn mkd(&mut self, directory: &str) -> FtpResult<FtpReply> {
        self.simple_command(Command::Mkd, &[directory]).await
    }

    /// Remove an (empty) remote directory.
    pub async fn rmd(&mut self, directory: &str) -> FtpResult<FtpReply> {
        self.simple_command(Command::Rmd, &[directory]).await
    }

    /// Alias for [`FtpClient::rmd`].
    pub async fn rmdir(&mut self, directory: &str) -> FtpResult<FtpReply> {
        self.rmd(directory).await
    }

    // ─── RNFR / RNTO ────────────────────────────────────────────

    /// Rename (or move) a file or directory.
    ///
    /// A `550` answer to RNFR means the source is missing; RNTO is then
    /// never sent and the `550` reply is returned.
    pub async fn rename(&mut self, old_name: &str, new_name: &str) -> FtpResult<FtpReply> {
        self.session.require_ready()?;

        let rnfr = self.execute(Command::Rnfr, &[old_name]).await?;
        if rnfr.is(ReplyCode::FileNotFound) {
            return Ok(rnfr);
        }
        self.execute(Command::Rnto, &[new_name]).await
    }

    /// Gate on the session, then send one command and read its reply.
    pub(crate) async fn simple_command(
        &mut self,
        command: Command,
        args: &[&str],
    ) -> FtpResult<FtpReply> {
        self.session.require_ready()?;
        self.execute(command, args).await
    }
}
