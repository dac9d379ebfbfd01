//! Error types for MDS cluster lifecycle management.
//!
//! This module provides a unified error type [`MdsError`] for all operations,
//! along with a convenient [`Result`] type alias.
//!
//! # Error Categories
//!
//! - **Lookup**: a named cluster entity (filesystem, rank, daemon, pool) is absent
//! - **Input**: caller-supplied arguments violate a precondition
//! - **Decoding**: a command response does not have the expected shape
//! - **Command**: the admin tool exited non-zero
//! - **Waiting**: a convergence poll ran out of time or was cancelled
//!
//! Operations attach context (what they were doing and to which target) with
//! [`MdsError::context`]. The wrapped error stays reachable through
//! [`MdsError::root`], so callers can still match on the original variant or
//! read the command exit code:
//!
//! ```rust
//! use mdsctl::error::MdsError;
//!
//! let err = MdsError::CommandFailed {
//!     command: "fs add_data_pool myfs p1".into(),
//!     code: libc::EINVAL,
//!     stderr: String::new(),
//! }
//! .context("failed to add pool \"p1\" to filesystem \"myfs\"");
//!
//! assert_eq!(err.exit_code(), Some(libc::EINVAL));
//! assert!(matches!(err.root(), MdsError::CommandFailed { .. }));
//! ```

use std::io;
use thiserror::Error;

/// Main error type for MDS lifecycle operations.
#[derive(Error, Debug)]
pub enum MdsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Command `{command}` failed with exit code {code}: {stderr}")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("Timed out waiting for {0}")]
    Timeout(String),

    #[error("Cancelled while waiting for {0}")]
    Cancelled(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MdsError>,
    },
}

impl MdsError {
    /// Wrap this error with a description of the operation that failed.
    pub fn context(self, context: impl Into<String>) -> Self {
        MdsError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with all context layers removed.
    pub fn root(&self) -> &MdsError {
        match self {
            MdsError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// OS exit code of the underlying command failure, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self.root() {
            MdsError::CommandFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the underlying error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), MdsError::NotFound(_))
    }

    /// Whether the failure is likely transient (busy, timed out, try again).
    ///
    /// Nothing retries automatically; polling uses this to pick a log level.
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            MdsError::Timeout(_) => true,
            MdsError::CommandFailed { code, .. } => {
                matches!(*code, libc::EAGAIN | libc::EBUSY | libc::ETIMEDOUT)
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for MdsError {
    fn from(e: serde_json::Error) -> Self {
        MdsError::Parse(e.to_string())
    }
}

/// Extension for attaching context to fallible results.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a lazily built context message.
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

/// Result type alias for MDS lifecycle operations.
pub type Result<T> = std::result::Result<T, MdsError>;
