//! Error types for the hook bridge.

use crate::platform::HookKind;
use std::fmt;
use thiserror::Error;

/// Result type alias for keybridge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Raw failure reported by the operating system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsError {
    /// The platform error code: the Win32 error code on Windows, or the
    /// `HRESULT` for failures that do not wrap one.
    pub code: i32,
    /// Human readable description, possibly empty.
    pub message: String,
}

impl OsError {
    /// Create a new OS error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for OsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "os error {:#010x}", self.code)
        } else {
            write!(f, "{} (os error {:#010x})", self.message, self.code)
        }
    }
}

impl std::error::Error for OsError {}

/// Errors that can occur while installing or removing hooks.
#[derive(Debug, Error)]
pub enum Error {
    /// The OS refused to install a hook.
    #[error("failed to install {kind} hook: {source}")]
    HookStartFailed {
        kind: HookKind,
        #[source]
        source: OsError,
    },

    /// Only one of the two hooks could be installed. The other one has
    /// already been removed again.
    #[error("only one hook could be installed, {failed} hook failed: {source}")]
    PartialActivation {
        failed: HookKind,
        #[source]
        source: OsError,
    },

    /// The OS refused to remove a hook. The hook may stay registered
    /// system-wide until the process exits.
    #[error("failed to remove {kind} hook: {source}")]
    HookStopFailed {
        kind: HookKind,
        #[source]
        source: OsError,
    },
}

impl Error {
    /// The OS error behind this failure.
    pub fn os_error(&self) -> &OsError {
        match self {
            Error::HookStartFailed { source, .. }
            | Error::PartialActivation { source, .. }
            | Error::HookStopFailed { source, .. } => source,
        }
    }

    /// The hook class the failure concerns.
    pub fn kind(&self) -> HookKind {
        match self {
            Error::HookStartFailed { kind, .. } | Error::HookStopFailed { kind, .. } => *kind,
            Error::PartialActivation { failed, .. } => *failed,
        }
    }
}
