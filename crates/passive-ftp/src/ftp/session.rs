//! Session state: which host the control channel is bound to and which
//! user is logged in. Every operation gates on it before touching a socket.

use crate::ftp::error::{FtpError, FtpResult};
use crate::ftp::types::SessionStatus;

/// `{host, user}` pair. `user` is only ever set while `host` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    host: Option<String>,
    user: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn status(&self) -> SessionStatus {
        match (&self.host, &self.user) {
            (None, _) => SessionStatus::Disconnected,
            (Some(_), None) => SessionStatus::Connected,
            (Some(_), Some(_)) => SessionStatus::Authenticated,
        }
    }

    pub fn require_connected(&self) -> FtpResult<&str> {
        self.host.as_deref().ok_or_else(FtpError::not_connected)
    }

    pub fn require_authenticated(&self) -> FtpResult<&str> {
        self.user.as_deref().ok_or_else(FtpError::not_authenticated)
    }

    /// Both gates, connectivity first.
    pub fn require_ready(&self) -> FtpResult<()> {
        self.require_connected()?;
        self.require_authenticated()?;
        Ok(())
    }

    pub(crate) fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    pub(crate) fn set_user(&mut self, user: impl Into<String>) {
        if self.host.is_some() {
            self.user = Some(user.into());
        }
    }

    pub(crate) fn clear_user(&mut self) {
        self.user = None;
    }

    pub(crate) fn clear(&mut self) {
        self.host = None;
        self.user = None;
    }
}
