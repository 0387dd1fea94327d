//! Stateful FTP client. Owns the control connection, the data channel,
//! and the session, and composes them into protocol transactions.
//!
//! Lifecycle: `connect()` → `login()` → operations → `logout()` /
//! `disconnect()`. Directory and file operations live in `directory.rs`
//! and `file_ops.rs` and use the helpers defined here.

use crate::ftp::connection::ControlConnection;
use crate::ftp::error::{FtpErrorKind, FtpResult};
use crate::ftp::protocol::{Command, FtpReply, ReplyCode};
use crate::ftp::session::SessionState;
use crate::ftp::transfer::DataConnection;
use crate::ftp::types::*;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One FTP client. Operations take `&mut self`, so a client runs at most
/// one transaction at a time; use several clients for parallel transfers.
pub struct FtpClient {
    id: String,
    config: FtpClientConfig,
    pub(crate) control: ControlConnection,
    pub(crate) data: DataConnection,
    pub(crate) session: SessionState,
    connected_at: Option<DateTime<Utc>>,
    last_activity: Option<DateTime<Utc>>,
}

impl Default for FtpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FtpClient {
    pub fn new() -> Self {
        Self::with_config(FtpClientConfig::default())
    }

    pub fn with_config(config: FtpClientConfig) -> Self {
        let id = Uuid::new_v4().to_string();
        Self {
            control: ControlConnection::new(&config, id.clone()),
            data: DataConnection::new(&config, id.clone()),
            session: SessionState::new(),
            id,
            config,
            connected_at: None,
            last_activity: None,
        }
    }

    // ─── Connection lifecycle ────────────────────────────────────

    /// Open the control connection to `host` and return the greeting.
    ///
    /// An existing connection is torn down first. A name-resolution
    /// failure resets everything; a refused connection leaves the
    /// client disconnected and ready for another attempt.
    pub async fn connect(&mut self, host: &str) -> FtpResult<FtpReply> {
        if self.session.host().is_some() {
            self.reset();
        }

        if let Err(e) = self.control.open(host).await {
            if e.is(FtpErrorKind::UnknownHost) {
                log::warn!("[ftp:{}] {}; resetting connection state", self.id, e.message);
                self.reset();
            }
            return Err(e);
        }

        self.session.set_host(host);
        self.connected_at = Some(Utc::now());
        log::info!("[ftp:{}] connected to {}", self.id, host);
        self.receive().await
    }

    /// Authenticate with USER/PASS.
    ///
    /// The user is recorded on a `230` reply and cleared on `530`; the
    /// PASS reply is returned either way.
    pub async fn login(&mut self, user: &str, password: &str) -> FtpResult<FtpReply> {
        self.session.require_connected()?;

        self.execute(Command::User, &[user]).await?;
        let reply = self.execute(Command::Pass, &[password]).await?;

        if reply.is(ReplyCode::LoginSuccess) {
            self.session.set_user(user);
            log::info!("[ftp:{}] logged in as {}", self.id, user);
        } else if reply.is(ReplyCode::LoginFail) {
            self.session.clear_user();
            log::info!("[ftp:{}] login rejected for {}", self.id, user);
        }
        Ok(reply)
    }

    /// Forget the logged-in user. Nothing is sent to the server.
    pub fn logout(&mut self) -> FtpResult<()> {
        self.session.require_ready()?;
        log::info!(
            "[ftp:{}] logging out {}",
            self.id,
            self.session.user().unwrap_or_default()
        );
        self.session.clear_user();
        Ok(())
    }

    /// Log out if needed, send QUIT, and reset every socket.
    pub async fn disconnect(&mut self) -> FtpResult<FtpReply> {
        self.session.require_connected()?;
        if self.session.require_authenticated().is_ok() {
            self.logout()?;
        }

        let result = self.execute(Command::Quit, &[]).await;
        log::info!(
            "[ftp:{}] disconnected from {}",
            self.id,
            self.session.host().unwrap_or_default()
        );
        self.reset();
        result
    }

    // ─── Listing / PWD ───────────────────────────────────────────

    /// LIST the current directory or `path`.
    ///
    /// Returns the LIST reply, followed (unless it was `550`) by the
    /// listing bytes and the transfer-completion reply.
    pub async fn list(&mut self, path: Option<&str>) -> FtpResult<FtpReply> {
        self.session.require_ready()?;
        self.open_data_connection().await?;
        let result = self.list_transaction(path).await;
        self.close_data_connection();
        result
    }

    /// Alias for [`FtpClient::list`].
    pub async fn ls(&mut self, path: Option<&str>) -> FtpResult<FtpReply> {
        self.list(path).await
    }

    async fn list_transaction(&mut self, path: Option<&str>) -> FtpResult<FtpReply> {
        let args: Vec<&str> = path.into_iter().collect();
        let mut reply = self.execute(Command::List, &args).await?;
        if reply.is(ReplyCode::FileNotFound) {
            return Ok(reply);
        }

        let listing = self.data.drain().await?;
        reply.append(&listing);
        let done = self.receive().await?;
        reply.append(done);
        Ok(reply)
    }

    /// Current remote directory, taken from the quoted part of the PWD
    /// reply (or the trimmed reply text if it has no quoted part).
    pub async fn pwd(&mut self) -> FtpResult<String> {
        self.session.require_ready()?;
        self.open_data_connection().await?;
        let result = self.execute(Command::Pwd, &[]).await;
        self.close_data_connection();

        let reply = result?;
        Ok(reply
            .quoted_path()
            .unwrap_or_else(|| reply.text().trim_end().to_string()))
    }

    // ─── Introspection ───────────────────────────────────────────

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &FtpClientConfig {
        &self.config
    }

    pub fn host(&self) -> Option<&str> {
        self.session.host()
    }

    pub fn user(&self) -> Option<&str> {
        self.session.user()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status()
    }

    pub fn is_data_channel_open(&self) -> bool {
        self.data.is_open()
    }

    /// Snapshot for display.
    pub fn session_info(&self) -> FtpSessionInfo {
        FtpSessionInfo {
            id: self.id.clone(),
            host: self.session.host().map(str::to_string),
            user: self.session.user().map(str::to_string),
            status: self.session.status(),
            control_port: self.control.port(),
            data_channel_open: self.data.is_open(),
            connected_at: self.connected_at,
            last_activity: self.last_activity,
        }
    }

    // ─── Transaction helpers ─────────────────────────────────────

    /// Send a command on the control channel and read its reply.
    pub(crate) async fn execute(&mut self, command: Command, args: &[&str]) -> FtpResult<FtpReply> {
        let sent = self.control.send(command, args).await;
        self.guard_control(sent)?;
        self.receive().await
    }

    /// Read one reply from the control channel.
    pub(crate) async fn receive(&mut self) -> FtpResult<FtpReply> {
        let reply = self.control.receive().await;
        let reply = self.guard_control(reply)?;
        self.touch();
        Ok(reply)
    }

    /// Open the data channel; an unresolvable host resets the client.
    pub(crate) async fn open_data_connection(&mut self) -> FtpResult<()> {
        let opened = self.data.open(&mut self.control, &self.session).await;
        if let Err(e) = &opened {
            if e.is(FtpErrorKind::UnknownHost) {
                log::warn!("[ftp:{}] {}; resetting connection state", self.id, e.message);
                self.reset();
            }
        }
        self.guard_control(opened)
    }

    pub(crate) fn close_data_connection(&mut self) {
        self.data.close();
    }

    /// A lost control connection returns the client to Disconnected.
    fn guard_control<T>(&mut self, result: FtpResult<T>) -> FtpResult<T> {
        if let Err(e) = &result {
            if e.is(FtpErrorKind::NotConnected) && self.session.host().is_some() {
                self.reset();
            }
        }
        result
    }

    /// Close both sockets and clear the session.
    fn reset(&mut self) {
        self.control.reset();
        self.data.close();
        self.session.clear();
        self.connected_at = None;
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Some(Utc::now());
    }
}

impl std::fmt::Debug for FtpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FtpClient")
            .field("id", &self.id)
            .field("host", &self.session.host())
            .field("user", &self.session.user())
            .field("data_channel_open", &self.data.is_open())
            .finish()
    }
}
