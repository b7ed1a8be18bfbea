//! Write operations.

use std::path::Path;

use crate::FsError;

/// Write operations of a filesystem backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsWrite`.
pub trait FsWrite: Send + Sync {
    /// Write data to a file (creates if not exists, truncates if exists).
    ///
    /// Parent directories must exist. Use [`FsDir::create_dir_all`](super::FsDir::create_dir_all)
    /// to ensure parent directories exist.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if parent directory does not exist
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::PermissionDenied`] if write access is denied
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), FsError>;

    /// Append data to a file (creates if not exists).
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if parent directory does not exist
    /// - [`FsError::NotAFile`] if the path is a directory
    fn append(&self, path: &Path, data: &[u8]) -> Result<(), FsError>;

    /// Remove a file.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    /// - [`FsError::NotAFile`] if the path is a directory (use [`FsDir::remove_dir_all`](super::FsDir::remove_dir_all))
    fn remove_file(&self, path: &Path) -> Result<(), FsError>;

    /// Copy a file, overwriting the destination.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the source file does not exist
    /// - [`FsError::NotAFile`] if the source is a directory
    fn copy(&self, from: &Path, to: &Path) -> Result<(), FsError>;
}
