//! Error types for path resolution and search-path lookups.

use std::path::PathBuf;

/// Error type for path handling, disk access and command execution.
///
/// All error variants include relevant context (path, operation) where applicable.
/// Uses `#[non_exhaustive]` for forward compatibility.
///
/// # Examples
///
/// ```rust
/// use syspath::FsError;
///
/// let err = FsError::NotInSearchPath { path: "/tmp/file.txt".into() };
/// assert_eq!(err.to_string(), "/tmp/file.txt is not in the search path");
/// ```
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    // Path Errors
    /// A path string could not be accepted.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why the path was rejected.
        reason: &'static str,
    },

    /// A reverse lookup found no covering root.
    #[error("{path} is not in the search path")]
    NotInSearchPath {
        /// The path that was looked up.
        path: String,
    },

    /// The search path has no directory to take a file system from.
    #[error("no directories configured in the search path")]
    EmptySearchPath,

    /// The operating system family has no path platform.
    #[error("unsupported platform: {os}")]
    UnsupportedPlatform {
        /// Name of the operating system family.
        os: String,
    },

    // Disk Errors
    /// Path does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Path already exists when it shouldn't.
    #[error("{operation}: already exists: {path}")]
    AlreadyExists {
        /// The path that already exists.
        path: PathBuf,
        /// The operation that failed.
        operation: &'static str,
    },

    /// Expected a file but found something else.
    #[error("not a file: {path}")]
    NotAFile {
        /// The path that is not a file.
        path: PathBuf,
    },

    /// Expected a directory but found something else.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The path that is not a directory.
        path: PathBuf,
    },

    /// Permission denied for operation.
    #[error("{operation}: permission denied: {path}")]
    PermissionDenied {
        /// The path where permission was denied.
        path: PathBuf,
        /// The operation that was denied.
        operation: &'static str,
    },

    /// Operation is not supported by the backend.
    #[error("{operation}: not supported: {path}")]
    NotSupported {
        /// The path involved in the operation.
        path: PathBuf,
        /// The unsupported operation.
        operation: &'static str,
    },

    /// I/O error with context.
    #[error("{operation} failed for {path}: {source}")]
    Io {
        /// The operation that failed.
        operation: &'static str,
        /// The path involved in the operation.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    // Command Errors
    /// The command string was empty.
    #[error("could not execute command: command is empty")]
    InvalidCommand,

    /// The shell reported the command as unknown (exit code 127).
    #[error("could not execute {command}: command not found")]
    CommandNotFound {
        /// The command that was executed.
        command: String,
    },

    // Data Errors
    /// Deserialization error.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl FsError {
    /// Attach an operation and path to an I/O error.
    ///
    /// Common kinds map onto their dedicated variants so callers can match
    /// on [`FsError::NotFound`] regardless of the backend.
    pub fn from_io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path, operation },
            std::io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path, operation },
            _ => FsError::Io {
                operation,
                path,
                source,
            },
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: &'static str) -> Self {
        FsError::InvalidPath {
            path: path.into(),
            reason,
        }
    }
}

impl From<std::io::Error> for FsError {
    fn from(error: std::io::Error) -> Self {
        FsError::from_io("io", PathBuf::new(), error)
    }
}
