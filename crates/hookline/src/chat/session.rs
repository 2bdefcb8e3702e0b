//! Session identity and per-session chat state
//!
//! Session IDs let the upstream workflow correlate the turns of one
//! conversation. They must be alphanumeric with underscores and hyphens,
//! max 128 chars.

use chrono::Utc;
use thiserror::Error;

use super::message::{Message, MessageLog, Sender};

/// Maximum length for session IDs
const MAX_SESSION_ID_LEN: usize = 128;

/// Errors that can occur during session ID validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionIdError {
    /// Session ID is empty
    #[error("Session ID cannot be empty")]
    Empty,

    /// Session ID contains invalid characters
    #[error("Session ID contains invalid characters: allowed are a-z, A-Z, 0-9, _, -")]
    InvalidChars,

    /// Session ID exceeds maximum length
    #[error("Session ID exceeds maximum length of {MAX_SESSION_ID_LEN} characters")]
    TooLong,
}

/// A validated session ID
///
/// Session IDs must:
/// - Be non-empty
/// - Contain only alphanumeric characters, underscores, and hyphens
/// - Be at most 128 characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh id of the form `<prefix>-<unix millis>`
    pub fn generate(prefix: &str) -> Result<Self, SessionIdError> {
        Self::try_from(format!("{}-{}", prefix, Utc::now().timestamp_millis()))
    }

    /// Get the session ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate a string as a session ID
    fn validate(s: &str) -> Result<(), SessionIdError> {
        if s.is_empty() {
            return Err(SessionIdError::Empty);
        }

        if s.len() > MAX_SESSION_ID_LEN {
            return Err(SessionIdError::TooLong);
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SessionIdError::InvalidChars);
        }

        Ok(())
    }
}

impl TryFrom<&str> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::validate(value)?;
        Ok(SessionId(value.to_string()))
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(SessionId(value))
    }
}

impl From<SessionId> for String {
    fn from(session_id: SessionId) -> Self {
        session_id.0
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of one chat conversation, owned by whoever drives the chat
#[derive(Debug, Clone)]
pub struct ChatSession {
    id: SessionId,
    log: MessageLog,
    connected: bool,
}

impl ChatSession {
    /// Start a session. It begins in the connected state.
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            log: MessageLog::new(),
            connected: true,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn messages(&self) -> &MessageLog {
        &self.log
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a message in the log
    pub fn record(&mut self, text: impl Into<String>, sender: Sender) -> &Message {
        self.log.append(Message::new(text, sender))
    }

    /// Update the connection flag; returns true when it actually changed
    pub fn set_connected(&mut self, connected: bool) -> bool {
        let changed = self.connected != connected;
        self.connected = connected;
        changed
    }
}
