//! Directory operations.

use std::path::Path;

use crate::{DirEntry, FsError};

/// Directory operations of a filesystem backend.
///
/// # Object Safety
///
/// This trait is object-safe and can be used as `dyn FsDir`.
pub trait FsDir: Send + Sync {
    /// List directory contents.
    ///
    /// Returns an iterator over directory entries, without `.` and `..`. The
    /// outer `Result` indicates whether the directory could be opened; each
    /// item's `Result` indicates whether that specific entry could be read.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is not a directory
    fn read_dir(&self, path: &Path) -> Result<ReadDirIter, FsError>;

    /// Create a directory and all parent directories.
    ///
    /// This is idempotent - succeeds if the directory already exists.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotADirectory`] if a component of the path exists but is not a directory
    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;

    /// Remove a directory and all its contents recursively.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the path does not exist
    /// - [`FsError::NotADirectory`] if the path is not a directory
    fn remove_dir_all(&self, path: &Path) -> Result<(), FsError>;
}

/// Iterator over directory entries.
///
/// - Outer `Result` (from [`FsDir::read_dir`]) = "can I open this directory?"
/// - Inner `Result` (per item) = "can I read this entry?"
pub struct ReadDirIter(Box<dyn Iterator<Item = Result<DirEntry, FsError>> + Send + 'static>);

impl ReadDirIter {
    /// Create from any compatible iterator.
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<DirEntry, FsError>> + Send + 'static,
    {
        Self(Box::new(iter))
    }

    /// Create from a pre-collected vector.
    pub fn from_vec(entries: Vec<Result<DirEntry, FsError>>) -> Self {
        Self(Box::new(entries.into_iter()))
    }

    /// Collect all entries, short-circuiting on first error.
    pub fn collect_all(self) -> Result<Vec<DirEntry>, FsError> {
        self.collect()
    }
}

impl Iterator for ReadDirIter {
    type Item = Result<DirEntry, FsError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FileType;
    use std::path::PathBuf;

    fn entry(name: &str, file_type: FileType) -> Result<DirEntry, FsError> {
        Ok(DirEntry {
            name: name.into(),
            file_type,
        })
    }

    #[test]
    fn read_dir_iter_from_vec() {
        let iter = ReadDirIter::from_vec(vec![
            entry("a", FileType::File),
            entry("b", FileType::Directory),
        ]);
        let names: Vec<_> = iter.map(|e| e.unwrap().name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn read_dir_iter_collect_all_error() {
        let iter = ReadDirIter::from_vec(vec![
            entry("a", FileType::File),
            Err(FsError::PermissionDenied {
                path: PathBuf::from("/b"),
                operation: "read_dir",
            }),
        ]);
        assert!(iter.collect_all().is_err());
    }

    #[test]
    fn read_dir_iter_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ReadDirIter>();
    }
}
