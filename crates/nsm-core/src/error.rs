//! Protocol error codes.

use serde::{Deserialize, Serialize};

/// Error code carried by a wire error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum Code {
    /// Unspecified failure.
    General = -1,
    /// Announced API version is not supported.
    IncompatibleApi = -2,
    /// Client is not allowed in this session.
    Blacklisted = -3,
    /// Client executable could not be started.
    LaunchFailed = -4,
    /// Named project or session does not exist.
    NoSuchFile = -5,
    /// Operation needs an open session.
    NoSessionOpen = -6,
    /// Refused because there are unsaved changes.
    UnsavedChanges = -7,
    /// Temporarily unable, e.g. another operation is running.
    NotNow = -8,
    /// Project data is corrupt or unreadable.
    BadProject = -9,
    /// New project could not be created.
    CreateFailed = -10,
}

impl Code {
    /// Wire value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Code for a wire value, if known.
    #[must_use]
    pub const fn from_i32(v: i32) -> Option<Self> {
        Some(match v {
            -1 => Self::General,
            -2 => Self::IncompatibleApi,
            -3 => Self::Blacklisted,
            -4 => Self::LaunchFailed,
            -5 => Self::NoSuchFile,
            -6 => Self::NoSessionOpen,
            -7 => Self::UnsavedChanges,
            -8 => Self::NotNow,
            -9 => Self::BadProject,
            -10 => Self::CreateFailed,
            _ => return None,
        })
    }
}

impl From<Code> for i32 {
    fn from(code: Code) -> Self {
        code.as_i32()
    }
}

/// Unknown error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code {0}")]
pub struct UnknownCode(pub i32);

impl TryFrom<i32> for Code {
    type Error = UnknownCode;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        Self::from_i32(v).ok_or(UnknownCode(v))
    }
}

/// Application-level error with a protocol code.
///
/// Returned by session adapters and carried by `/error` replies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProtocolError {
    /// Code sent as the second `/error` argument.
    pub code: Code,
    /// Human-readable text sent as the third `/error` argument.
    pub message: String,
}

impl ProtocolError {
    /// Create an error.
    #[must_use]
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// A [`Code::General`] error.
    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(Code::General, message)
    }
}
