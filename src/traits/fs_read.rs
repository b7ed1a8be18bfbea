//! Read operations.

use std::path::Path;

use crate::{FsError, Metadata};

/// Read operations of a filesystem backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsRead`.
pub trait FsRead: Send + Sync {
    /// Check if a path exists.
    ///
    /// Returns `Ok(true)` if the path exists, `Ok(false)` if it does not.
    /// Only returns an error for unexpected failures (e.g., I/O errors).
    fn exists(&self, path: &Path) -> Result<bool, FsError>;

    /// Read entire file contents as bytes.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::PermissionDenied`] if read access is denied
    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Get size, type, modification time and permissions of a path.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    fn metadata(&self, path: &Path) -> Result<Metadata, FsError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_read_is_object_safe() {
        fn _check(_: &dyn FsRead) {}
    }
}
