//! # FilePath
//!
//! Immutable, slash-normalized path bound to a [`FileSystem`].
//!
//! ## Normalization
//!
//! | Input | Stored as |
//! |-------|-----------|
//! | `test\dir\` | `test/dir` |
//! | `/` | `/` (root keeps its separator) |
//! | `test.phar/file.txt` | `phar://test.phar/file.txt` |
//! | `phar://test.phar` | `phar://test.phar` (explicit prefix kept) |
//! | `test.phar` | `test.phar` (an archive alone is not prefixed) |
//!
//! Equality, ordering and hashing use the normalized string only.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::SystemTime;

use crate::platform::{strip_archive_protocol, ARCHIVE_EXTENSION, ARCHIVE_PROTOCOL, SEPARATOR};
use crate::{FileSystem, FsError, Permissions};

/// The archive file a path descends into.
///
/// Recorded at construction for paths like `lib/tools.phar/bin/run`, where
/// the archive is `lib/tools.phar`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArchiveRef {
    path: String,
}

impl ArchiveRef {
    /// Path of the archive file, without the archive protocol.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Part of `inner` below the archive, without a leading separator.
    pub(crate) fn remainder<'a>(&self, inner: &'a str) -> &'a str {
        let (stripped, _) = strip_archive_protocol(inner);
        stripped
            .get(self.path.len()..)
            .unwrap_or("")
            .trim_start_matches(SEPARATOR)
    }

    fn detect(path: &str) -> Option<Self> {
        let boundary = format!(".{ARCHIVE_EXTENSION}{SEPARATOR}");
        let position = path.find(&boundary)?;
        let (archive, _) = strip_archive_protocol(&path[..position + boundary.len() - 1]);
        if archive.is_empty() {
            return None;
        }
        Some(Self {
            path: archive.to_string(),
        })
    }
}

/// A normalized path string bound to the [`FileSystem`] that resolves it.
///
/// Created through [`FileSystem::file`]. Disk-touching methods delegate to
/// the file system's backend; pure methods only look at the string.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use syspath::{FileSystem, NativeFs, Platform};
///
/// let fs = Arc::new(
///     FileSystem::new(Platform::Posix, Arc::new(NativeFs::new())).with_working_directory("/srv"),
/// );
///
/// let file = fs.file("app\\config//")?;
/// assert_eq!(file.as_str(), "app/config");
/// assert_eq!(file.child("modules.xml")?.absolute_path()?, "/srv/app/config/modules.xml");
/// # Ok::<(), syspath::FsError>(())
/// ```
#[derive(Clone)]
pub struct FilePath {
    fs: Arc<FileSystem>,
    path: String,
    is_root: bool,
    archive: Option<ArchiveRef>,
}

impl FilePath {
    pub(crate) fn new(fs: Arc<FileSystem>, input: &str) -> Result<Self, FsError> {
        let mut path = input.replace('\\', "/");

        let is_root = fs.platform().is_root_path(&path);
        if !is_root {
            let trimmed = path.trim_end_matches(SEPARATOR).len();
            path.truncate(trimmed);
        }

        if path.is_empty() {
            return Err(FsError::invalid_path(input, "path is empty"));
        }

        let archive = ArchiveRef::detect(&path);
        if archive.is_some() && !path.starts_with(ARCHIVE_PROTOCOL) {
            path.insert_str(0, ARCHIVE_PROTOCOL);
        }

        Ok(Self {
            fs,
            path,
            is_root,
            archive,
        })
    }

    /// The file system this path is resolved against.
    pub fn file_system(&self) -> &Arc<FileSystem> {
        &self.fs
    }

    /// The normalized path string.
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Check whether this path is a root (`/`, `C:/`).
    pub fn is_root_path(&self) -> bool {
        self.is_root
    }

    /// The archive this path descends into, if any.
    pub fn archive(&self) -> Option<&ArchiveRef> {
        self.archive.as_ref()
    }

    /// Check whether the path carries the `phar://` prefix.
    pub fn has_archive_protocol(&self) -> bool {
        self.path.starts_with(ARCHIVE_PROTOCOL)
    }

    /// Check whether this path names an archive file (`.phar` extension).
    pub fn is_archive(&self) -> bool {
        self.extension() == ARCHIVE_EXTENSION
    }

    /// Last segment of the path.
    ///
    /// For `/var/www/site` the name is `site`.
    pub fn name(&self) -> &str {
        match self.path.rfind(SEPARATOR) {
            Some(position) => &self.path[position + 1..],
            None => &self.path,
        }
    }

    /// Last segment of the path without its extension.
    pub fn name_without_extension(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(position) => &name[..position],
            None => name,
        }
    }

    /// Lower-cased extension of the name, empty when there is none.
    pub fn extension(&self) -> String {
        let name = self.name();
        match name.rfind('.') {
            Some(position) => name[position + 1..].to_lowercase(),
            None => String::new(),
        }
    }

    /// Check whether the extension is one of `extensions`.
    pub fn has_extension(&self, extensions: &[&str]) -> bool {
        let extension = self.extension();
        extensions.iter().any(|candidate| *candidate == extension)
    }

    /// Check whether the name starts with a dot.
    pub fn is_hidden(&self) -> bool {
        self.name().starts_with('.')
    }

    /// Check whether this path is absolute on its platform.
    pub fn is_absolute(&self) -> bool {
        self.fs.platform().is_absolute(&self.path)
    }

    /// Get a path below this one.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `name` is empty or absolute
    pub fn child(&self, name: impl AsRef<str>) -> Result<FilePath, FsError> {
        let child = self.fs.file(name)?;
        if child.is_absolute() {
            return Err(FsError::invalid_path(child.path, "child path cannot be absolute"));
        }

        let (child_path, _) = strip_archive_protocol(&child.path);
        let joined = if self.is_root {
            format!("{}{}", self.path, child_path)
        } else {
            format!("{}{}{}", self.path, SEPARATOR, child_path)
        };

        self.fs.file(joined)
    }

    /// Get the parent directory.
    ///
    /// A single relative segment has the working directory as parent; a root
    /// is its own parent.
    pub fn parent(&self) -> Result<FilePath, FsError> {
        self.fs.parent(self)
    }

    /// Resolve to an absolute, dot-segment-free path string.
    pub fn absolute_path(&self) -> Result<String, FsError> {
        self.fs.absolute_path(self)
    }

    /// Resolve to an absolute path.
    pub fn absolute(&self) -> Result<FilePath, FsError> {
        self.fs.file(self.absolute_path()?)
    }

    /// Get a sibling name that does not exist yet.
    ///
    /// Returns this path when it does not exist. Otherwise `doc.txt` becomes
    /// `doc-1.txt`, `doc-2.txt`, ... whichever is free first.
    pub fn copy_file(&self) -> Result<FilePath, FsError> {
        if !self.exists()? {
            return Ok(self.clone());
        }

        let parent = if self.path.contains(SEPARATOR) {
            Some(self.parent()?)
        } else {
            None
        };
        let name = self.name();
        let (base, extension) = match name.rfind('.') {
            Some(position) => name.split_at(position),
            None => (name, ""),
        };

        let mut index: u64 = 0;
        loop {
            index += 1;
            let sibling = format!("{base}-{index}{extension}");
            let candidate = match &parent {
                Some(parent) => parent.child(sibling)?,
                None => self.fs.file(sibling)?,
            };
            if !candidate.exists()? {
                return Ok(candidate);
            }
        }
    }

    /// Check whether the path exists.
    pub fn exists(&self) -> Result<bool, FsError> {
        self.fs.exists(self)
    }

    /// Check whether the path is an existing directory.
    pub fn is_directory(&self) -> Result<bool, FsError> {
        self.fs.is_directory(self)
    }

    /// Check whether the path exists and can be read.
    pub fn is_readable(&self) -> Result<bool, FsError> {
        self.fs.is_readable(self)
    }

    /// Check whether the path, or its nearest existing ancestor, is writable.
    pub fn is_writable(&self) -> Result<bool, FsError> {
        self.fs.is_writable(self)
    }

    /// Time of the last modification.
    pub fn modification_time(&self) -> Result<SystemTime, FsError> {
        self.fs.modification_time(self)
    }

    /// Size of the file in bytes.
    pub fn size(&self) -> Result<u64, FsError> {
        self.fs.size(self)
    }

    /// The `rwxrwxrwx` permission bits.
    pub fn permissions(&self) -> Result<Permissions, FsError> {
        self.fs.permissions(self)
    }

    /// Change the permission bits.
    pub fn set_permissions(&self, permissions: Permissions) -> Result<(), FsError> {
        self.fs.set_permissions(self, permissions)
    }

    /// Read the file contents.
    pub fn read(&self) -> Result<Vec<u8>, FsError> {
        self.fs.read(self)
    }

    /// List the children of this directory.
    pub fn read_directory(&self, recursive: bool) -> Result<Vec<FilePath>, FsError> {
        self.fs.read_directory(self, recursive)
    }

    /// Write or append `data`, creating parent directories.
    pub fn write(&self, data: &[u8], append: bool) -> Result<(), FsError> {
        self.fs.write(self, data, append)
    }

    /// Create this directory and its parents.
    pub fn create(&self) -> Result<(), FsError> {
        self.fs.create(self)
    }

    /// Delete this file, or this directory with its contents.
    pub fn delete(&self) -> Result<(), FsError> {
        self.fs.delete(self)
    }

    /// Copy this file or directory to `destination`.
    pub fn copy_to(&self, destination: &FilePath) -> Result<(), FsError> {
        self.fs.copy(self, destination)
    }

    /// Move this file or directory to `destination`.
    pub fn move_to(&self, destination: &FilePath) -> Result<(), FsError> {
        self.fs.move_to(self, destination)
    }
}

impl fmt::Debug for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilePath").field(&self.path).finish()
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

impl PartialEq for FilePath {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for FilePath {}

impl PartialEq<str> for FilePath {
    fn eq(&self, other: &str) -> bool {
        self.path == other
    }
}

impl PartialEq<&str> for FilePath {
    fn eq(&self, other: &&str) -> bool {
        self.path == *other
    }
}

impl Hash for FilePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}

impl PartialOrd for FilePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FilePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{posix_fs, windows_fs, MemoryFs};

    fn fs() -> Arc<FileSystem> {
        posix_fs(MemoryFs::new())
    }

    #[test]
    fn construct_normalizes() {
        let fs = fs();
        assert_eq!(fs.file("test/test.txt").unwrap(), "test/test.txt");
        assert_eq!(fs.file("test/").unwrap(), "test");
        assert_eq!(fs.file("test\\sub\\file.txt").unwrap(), "test/sub/file.txt");
        assert_eq!(fs.file("/").unwrap(), "/");
        assert_eq!(fs.file("test.phar").unwrap(), "test.phar");
    }

    #[test]
    fn construct_from_file_path() {
        let fs = fs();
        let original = fs.file("test/test.txt").unwrap();
        let copy = fs.file(&original).unwrap();
        assert_eq!(copy, original);
    }

    #[test]
    fn construct_rejects_empty() {
        let fs = fs();
        assert!(matches!(fs.file(""), Err(FsError::InvalidPath { .. })));
        assert!(matches!(fs.file("//"), Err(FsError::InvalidPath { .. })));
    }

    #[test]
    fn construct_is_idempotent() {
        let fs = fs();
        for input in ["a/b/", "\\x\\y", "/", "test.phar/file.txt", "phar://m/test.phar", "./a/../b"] {
            let once = fs.file(input).unwrap();
            let twice = fs.file(once.as_str()).unwrap();
            assert_eq!(once, twice, "{input}");
        }
    }

    #[test]
    fn construct_prefixes_archive_crossing() {
        let fs = fs();
        let file = fs.file("test.phar/file.txt").unwrap();
        assert_eq!(file, "phar://test.phar/file.txt");
        assert_eq!(file.archive().unwrap().path(), "test.phar");

        let explicit = fs.file("phar://test.phar").unwrap();
        assert_eq!(explicit, "phar://test.phar");
        assert!(explicit.archive().is_none());
        assert!(explicit.has_archive_protocol());

        assert!(fs.file("file.phar").unwrap().archive().is_none());
        assert!(fs.file("file.txt").unwrap().archive().is_none());
    }

    #[test]
    fn root_path_detection() {
        let fs = fs();
        assert!(fs.file("/").unwrap().is_root_path());
        assert!(!fs.file("/test").unwrap().is_root_path());
    }

    #[test]
    fn child_joins_with_single_separator() {
        let fs = fs();
        let dir = fs.file("test/").unwrap();
        assert_eq!(dir.child("test.txt").unwrap(), "test/test.txt");

        let dir = fs.file("test/tester").unwrap();
        let name = fs.file("test.txt").unwrap();
        assert_eq!(dir.child(&name).unwrap(), "test/tester/test.txt");

        let root = fs.file("/").unwrap();
        assert_eq!(root.child("etc").unwrap(), "/etc");
    }

    #[test]
    fn child_handles_archives() {
        let fs = fs();
        assert_eq!(
            fs.file("test/test.phar").unwrap().child("test/test.txt").unwrap(),
            "phar://test/test.phar/test/test.txt"
        );
        assert_eq!(
            fs.file("phar://test/test.phar").unwrap().child("test/test.txt").unwrap(),
            "phar://test/test.phar/test/test.txt"
        );
        assert_eq!(
            fs.file("folder").unwrap().child("phar://test.phar/file.txt").unwrap(),
            "phar://folder/test.phar/file.txt"
        );
    }

    #[test]
    fn child_rejects_absolute_name() {
        let fs = fs();
        let dir = fs.file("test/test").unwrap();
        let result = dir.child("/tmp/test.txt");
        assert!(matches!(result, Err(FsError::InvalidPath { .. })));
    }

    #[test]
    fn name_and_extension() {
        let fs = fs();
        assert_eq!(fs.file("test.txt").unwrap().name(), "test.txt");
        assert_eq!(fs.file("test/test.txt").unwrap().name(), "test.txt");
        assert_eq!(fs.file("test/test.txt").unwrap().name_without_extension(), "test");
        assert_eq!(fs.file("test/README").unwrap().name_without_extension(), "README");

        let extension = |path: &str| fs.file(path).unwrap().extension();
        assert_eq!(extension("test.txt"), "txt");
        assert_eq!(extension("test"), "");
        assert_eq!(extension(".htaccess"), "htaccess");
        assert_eq!(extension(".test.ZIP"), "zip");
        assert_eq!(extension("/test/config/modules.xml"), "xml");
        assert_eq!(extension("./test/config"), "");
        assert_eq!(extension("./test.folder/config"), "");
    }

    #[test]
    fn has_extension_checks_list() {
        let file = fs().file("test.txt").unwrap();
        assert!(file.has_extension(&["txt"]));
        assert!(!file.has_extension(&["test"]));
        assert!(!file.has_extension(&["png", "jpg"]));
        assert!(file.has_extension(&["png", "jpg", "txt"]));
    }

    #[test]
    fn hidden_and_archive_flags() {
        let fs = fs();
        assert!(fs.file("/home/user/.profile").unwrap().is_hidden());
        assert!(!fs.file("/home/user/profile").unwrap().is_hidden());
        assert!(fs.file("lib/tools.PHAR").unwrap().is_archive());
        assert!(!fs.file("lib/tools.zip").unwrap().is_archive());
    }

    #[test]
    fn windows_construct_keeps_drive_root() {
        let fs = windows_fs(MemoryFs::new());
        assert_eq!(fs.file("C:\\").unwrap(), "C:/");
        assert_eq!(fs.file("C:\\tmp\\").unwrap(), "C:/tmp");
        assert!(fs.file("C:/").unwrap().is_root_path());
    }

    #[test]
    fn copy_file_returns_self_when_free() {
        let fs = fs();
        let file = fs.file("test/unexistant.txt").unwrap();
        assert_eq!(file.copy_file().unwrap(), "test/unexistant.txt");
    }

    #[test]
    fn copy_file_skips_taken_names() {
        let fs = posix_fs(
            MemoryFs::new()
                .with_file("/docs/doc.txt", b"a")
                .with_file("/docs/doc-1.txt", b"b"),
        );
        let file = fs.file("/docs/doc.txt").unwrap();
        assert_eq!(file.copy_file().unwrap(), "/docs/doc-2.txt");
    }

    #[test]
    fn copy_file_keeps_single_segment_relative() {
        let fs = posix_fs(
            MemoryFs::new()
                .with_file("/work/doc.txt", b"a")
                .with_file("/work/doc-1.txt", b"b"),
        );
        let free = fs.file("doc.txt").unwrap().copy_file().unwrap();
        assert_eq!(free, "doc-2.txt");
        assert!(!free.is_absolute());
        assert_eq!(free.absolute_path().unwrap(), "/work/doc-2.txt");
    }

    #[test]
    fn copy_file_without_extension() {
        let fs = posix_fs(MemoryFs::new().with_file("/etc/passwd", b"root"));
        let file = fs.file("/etc/passwd").unwrap();
        assert_eq!(file.copy_file().unwrap(), "/etc/passwd-1");
    }

    #[test]
    fn display_and_debug() {
        let file = fs().file("a/b").unwrap();
        assert_eq!(file.to_string(), "a/b");
        assert_eq!(format!("{file:?}"), "FilePath(\"a/b\")");
    }
}
