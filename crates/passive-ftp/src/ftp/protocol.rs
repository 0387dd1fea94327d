//! Wire vocabulary and reply decoding (RFC 959 §4).
//!
//! Handles:
//! - The command keywords the client issues
//! - The status codes the client branches on
//! - Encoding a command line terminated with `\r\n`
//! - Decoding a raw reply buffer (status prefix, quoted path, EPSV port)

use std::borrow::Cow;
use std::fmt;

/// Line terminator for every command sent on the control channel.
pub const LINE_TERMINATOR: &str = "\r\n";

// ─── Commands ────────────────────────────────────────────────────────

/// FTP commands issued by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    User,
    Pass,
    Epsv,
    Quit,
    Retr,
    Stor,
    Pwd,
    Cwd,
    Cdup,
    Mkd,
    Dele,
    Rmd,
    Rnfr,
    Rnto,
}

impl Command {
    pub fn keyword(self) -> &'static str {
        match self {
            Command::List => "LIST",
            Command::User => "USER",
            Command::Pass => "PASS",
            Command::Epsv => "EPSV",
            Command::Quit => "QUIT",
            Command::Retr => "RETR",
            Command::Stor => "STOR",
            Command::Pwd => "PWD",
            Command::Cwd => "CWD",
            Command::Cdup => "CDUP",
            Command::Mkd => "MKD",
            Command::Dele => "DELE",
            Command::Rmd => "RMD",
            Command::Rnfr => "RNFR",
            Command::Rnto => "RNTO",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Join keyword and arguments with single spaces and append CRLF.
pub fn encode_command(command: Command, args: &[&str]) -> Vec<u8> {
    let mut line = String::from(command.keyword());
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line.push_str(LINE_TERMINATOR);
    line.into_bytes()
}

/// Printable form of a command for logs; the password is masked.
pub fn describe_command(command: Command, args: &[&str]) -> String {
    if command == Command::Pass {
        return format!("{} ****", command);
    }
    let mut line = String::from(command.keyword());
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

// ─── Status codes ────────────────────────────────────────────────────

/// Reply codes the client distinguishes. Anything else is opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyCode {
    LoginSuccess,
    LoginFail,
    FileNotFound,
}

impl ReplyCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ReplyCode::LoginSuccess => "230",
            ReplyCode::LoginFail => "530",
            ReplyCode::FileNotFound => "550",
        }
    }
}

// ─── Reply ───────────────────────────────────────────────────────────

/// Raw bytes of one (or, after concatenation, several) server replies.
///
/// Decoding never fails: a malformed buffer simply matches no status code
/// and yields `None` from the field extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FtpReply {
    bytes: Vec<u8>,
}

impl FtpReply {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Leading three-digit code, if the buffer starts with one.
    pub fn status_code(&self) -> Option<&str> {
        let head = self.bytes.get(..3)?;
        if head.iter().all(u8::is_ascii_digit) {
            std::str::from_utf8(head).ok()
        } else {
            None
        }
    }

    /// Exact prefix comparison against a status code.
    pub fn has_status(&self, code: &str) -> bool {
        self.bytes.starts_with(code.as_bytes())
    }

    pub fn is(&self, code: ReplyCode) -> bool {
        self.has_status(code.as_str())
    }

    /// Lossy UTF-8 view of the whole buffer.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Segment between the first pair of double quotes (`257 "/pub" ...`).
    pub fn quoted_path(&self) -> Option<String> {
        let text = self.text();
        let mut parts = text.split('"');
        parts.next()?;
        let path = parts.next()?;
        // An unterminated quote has no closing segment.
        parts.next()?;
        Some(path.to_string())
    }

    /// Port from an EPSV reply: `229 Entering Extended Passive Mode (|||port|)`.
    ///
    /// The reply is split on `|` and the fourth field is the decimal port.
    pub fn passive_port(&self) -> Option<u16> {
        self.text().split('|').nth(3)?.trim().parse::<u16>().ok()
    }

    pub fn append(&mut self, more: impl AsRef<[u8]>) {
        self.bytes.extend_from_slice(more.as_ref());
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for FtpReply {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for FtpReply {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl AsRef<[u8]> for FtpReply {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for FtpReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
