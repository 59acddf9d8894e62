use crate::structs::ChannelKind;

use std::{
    error::Error as StdError,
    fmt::{self, Display},
    result,
};

pub type Result<T> = result::Result<T, Error>;

/// Codes the platform attaches to a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ArchivedThread,
    UnknownChannel,
    UnknownMessage,
    MissingAccess,
    EmptyMessage,
    MissingPermissions,
    SystemMessage,
    ThreadLocked,
    Other(u32),
}

impl ErrorCode {
    pub const fn from_code(code: u32) -> ErrorCode {
        match code {
            50083 => ErrorCode::ArchivedThread,
            10003 => ErrorCode::UnknownChannel,
            10008 => ErrorCode::UnknownMessage,
            50001 => ErrorCode::MissingAccess,
            50006 => ErrorCode::EmptyMessage,
            50013 => ErrorCode::MissingPermissions,
            50021 => ErrorCode::SystemMessage,
            160005 => ErrorCode::ThreadLocked,
            other => ErrorCode::Other(other),
        }
    }

    pub const fn code(&self) -> u32 {
        match self {
            ErrorCode::ArchivedThread => 50083,
            ErrorCode::UnknownChannel => 10003,
            ErrorCode::UnknownMessage => 10008,
            ErrorCode::MissingAccess => 50001,
            ErrorCode::EmptyMessage => 50006,
            ErrorCode::MissingPermissions => 50013,
            ErrorCode::SystemMessage => 50021,
            ErrorCode::ThreadLocked => 160005,
            ErrorCode::Other(code) => *code,
        }
    }

    /// Human readable reason, phrased to follow "because".
    pub fn reason(&self) -> String {
        match self {
            ErrorCode::ArchivedThread => "this thread is archived".to_string(),
            ErrorCode::UnknownChannel => "the channel is unknown".to_string(),
            ErrorCode::UnknownMessage => "the message is unknown".to_string(),
            ErrorCode::MissingAccess => "the bot has no access".to_string(),
            ErrorCode::EmptyMessage => "an empty message cannot be sent".to_string(),
            ErrorCode::MissingPermissions => {
                "the bot lacks the write permission to this channel".to_string()
            }
            ErrorCode::SystemMessage => "it cannot be executed on a system message".to_string(),
            ErrorCode::ThreadLocked => "this thread is locked".to_string(),
            ErrorCode::Other(code) => format!("of unknown error {code}"),
        }
    }
}

/// An error reported by the remote platform for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    pub code: Option<u32>,
    pub message: String,
}

impl PlatformError {
    pub fn new(code: Option<u32>, message: impl Into<String>) -> PlatformError {
        PlatformError {
            code,
            message: message.into(),
        }
    }

    #[inline]
    pub fn error_code(&self) -> Option<ErrorCode> {
        self.code.map(ErrorCode::from_code)
    }
}

impl Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "platform error {code}: {}", self.message),
            None => write!(f, "platform error: {}", self.message),
        }
    }
}

#[derive(Debug)]
pub enum Error {
    Platform(PlatformError),
    Denied(ErrorCode),
    UnsupportedDestination(ChannelKind),
    Internal(String),
    ConstStr(&'static str),
}

impl Error {
    /// The remote code behind this error, if there is one.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Error::Platform(inner) => inner.error_code(),
            Error::Denied(code) => Some(*code),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Platform(inner) => fmt::Display::fmt(&inner, f),
            Error::Denied(code) => write!(f, "denied ({}): {}", code.code(), code.reason()),
            Error::UnsupportedDestination(kind) => {
                write!(f, "cannot migrate into a {kind:?} channel")
            }
            Error::Internal(inner) => f.write_str(inner),
            Error::ConstStr(inner) => f.write_str(inner),
        }
    }
}

impl StdError for Error {}

impl From<PlatformError> for Error {
    fn from(e: PlatformError) -> Error {
        Error::Platform(e)
    }
}
