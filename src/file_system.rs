//! # FileSystem
//!
//! Resolution context shared by every [`FilePath`].
//!
//! ## Responsibility
//! - Bind one [`Platform`], one working directory and one backend
//! - Compute absolute paths and parents
//! - Translate path operations into backend calls
//!
//! ## Dependencies
//! - [`Fs`] capability surface for disk access
//! - [`FsError`] for error handling
//!
//! ## Absolute paths
//!
//! ```text
//! test.phar/file.txt ──▶ phar://test.phar/file.txt      (construction)
//!                    ──▶ /work/test.phar + file.txt      (archive resolved first)
//!                    ──▶ phar:///work/test.phar/file.txt (dot segments folded)
//! ```

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;

use crate::platform::{strip_archive_protocol, ARCHIVE_PROTOCOL, SEPARATOR};
use crate::{
    FilePath, Fs, FsDir, FsError, FsExt, FsPermissions, FsRead, FsWrite, Permissions, Platform,
};

/// Permissions given to the destination of a file copy.
const COPY_PERMISSIONS: Permissions = Permissions::from_mode(0o644);

/// Platform rules, working directory and backend for a set of paths.
///
/// Shared through `Arc`; every [`FilePath`] keeps a handle to the file
/// system that created it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use syspath::{FileSystem, NativeFs, Platform};
///
/// let fs = Arc::new(
///     FileSystem::new(Platform::Posix, Arc::new(NativeFs::new())).with_working_directory("/x"),
/// );
///
/// let file = fs.file("a/../a/.//./b.txt")?;
/// assert_eq!(fs.absolute_path(&file)?, "/x/a/b.txt");
/// # Ok::<(), syspath::FsError>(())
/// ```
pub struct FileSystem {
    platform: Platform,
    backend: Arc<dyn Fs>,
    working_directory: Option<String>,
}

impl FileSystem {
    /// Create a file system resolving relative paths against the process
    /// working directory.
    pub fn new(platform: Platform, backend: Arc<dyn Fs>) -> Self {
        Self {
            platform,
            backend,
            working_directory: None,
        }
    }

    /// Resolve relative paths against `directory` instead of the process
    /// working directory.
    pub fn with_working_directory(mut self, directory: impl Into<String>) -> Self {
        self.working_directory = Some(directory.into());
        self
    }

    /// The platform path rules.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The capability backend.
    pub fn backend(&self) -> &Arc<dyn Fs> {
        &self.backend
    }

    /// The working directory, `/`-separated.
    ///
    /// # Errors
    ///
    /// - [`FsError::Io`] if the process working directory cannot be read
    pub fn working_directory(&self) -> Result<String, FsError> {
        let directory = match &self.working_directory {
            Some(directory) => directory.clone(),
            None => std::env::current_dir()
                .map_err(|e| FsError::from_io("current_dir", ".", e))?
                .to_string_lossy()
                .into_owned(),
        };
        Ok(directory.replace('\\', "/"))
    }

    /// Create a path bound to this file system.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if the path is empty after normalization
    pub fn file(self: &Arc<Self>, path: impl AsRef<str>) -> Result<FilePath, FsError> {
        FilePath::new(Arc::clone(self), path.as_ref())
    }

    /// Check whether `path` is exactly a root of this platform.
    pub fn is_root_path(&self, path: &str) -> bool {
        self.platform.is_root_path(path)
    }

    /// Check whether `file` is absolute on this platform.
    pub fn is_absolute(&self, file: &FilePath) -> bool {
        self.platform.is_absolute(file.as_str())
    }

    /// Resolve `file` to an absolute, dot-segment-free path string.
    ///
    /// Paths inside an archive resolve the archive first and keep the
    /// `phar://` prefix; an explicitly prefixed archive file keeps it too.
    pub fn absolute_path(self: &Arc<Self>, file: &FilePath) -> Result<String, FsError> {
        let mut path = file.as_str().to_string();

        if let Some(archive) = file.archive() {
            let archive_file = self.file(archive.path())?;
            path = format!(
                "{}{}{}",
                self.absolute_path(&archive_file)?,
                SEPARATOR,
                archive.remainder(file.as_str())
            );
        }

        let (stripped, has_protocol) = strip_archive_protocol(&path);
        let mut path = stripped.to_string();

        if !self.platform.is_absolute(&path) {
            path = format!("{}{}{}", self.working_directory()?, SEPARATOR, path);
        }

        let absolute = self.platform.resolve_segments(&path);
        log::trace!("resolved {} to {}", file, absolute);

        if file.archive().is_none() && !has_protocol {
            return Ok(absolute);
        }

        let resolved = self.file(&absolute)?;
        if has_protocol && !resolved.has_archive_protocol() && resolved.is_archive() {
            return Ok(format!("{ARCHIVE_PROTOCOL}{resolved}"));
        }

        Ok(resolved.as_str().to_string())
    }

    /// Get the parent directory of `file`.
    ///
    /// A root is its own parent.
    pub fn parent(self: &Arc<Self>, file: &FilePath) -> Result<FilePath, FsError> {
        if file.is_root_path() {
            return Ok(file.clone());
        }

        let path = file.as_str();

        if !path.contains(SEPARATOR) {
            let current = self.file(".")?;
            return self.file(self.absolute_path(&current)?);
        }

        let parent = &path[..path.len() - file.name().len() - 1];
        if parent.is_empty() {
            return self.file("/");
        }

        if self.platform == Platform::Windows {
            let drive_parent = format!("{parent}{SEPARATOR}");
            if self.platform.drive_prefix(&drive_parent) == Some(drive_parent.as_str()) {
                return self.file(drive_parent);
            }
        }

        self.file(parent)
    }

    /// Create an empty file with a unique name in the host temporary
    /// directory.
    ///
    /// The file lives on the host disk, whatever the backend, and stays
    /// there until deleted.
    pub fn temporary_file(self: &Arc<Self>, prefix: &str) -> Result<FilePath, FsError> {
        let directory = std::env::temp_dir();
        let (_, path) = tempfile::Builder::new()
            .prefix(prefix)
            .tempfile_in(&directory)
            .map_err(|e| FsError::from_io("temporary_file", &directory, e))?
            .keep()
            .map_err(|e| FsError::from_io("temporary_file", &directory, e.error))?;

        let path = path.to_string_lossy().replace('\\', "/");
        log::debug!("created temporary file {path}");
        self.file(path)
    }

    /// Check whether `file` exists.
    pub fn exists(self: &Arc<Self>, file: &FilePath) -> Result<bool, FsError> {
        let path = self.absolute_path(file)?;
        self.backend.exists(Path::new(&path))
    }

    /// Check whether `file` is an existing directory.
    pub fn is_directory(self: &Arc<Self>, file: &FilePath) -> Result<bool, FsError> {
        let path = self.absolute_path(file)?;
        self.backend.is_dir(Path::new(&path))
    }

    /// Check whether `file` exists and has a read bit set.
    pub fn is_readable(self: &Arc<Self>, file: &FilePath) -> Result<bool, FsError> {
        let path = self.absolute_path(file)?;
        let path = Path::new(&path);
        if !self.backend.exists(path)? {
            return Ok(false);
        }
        Ok(self.backend.metadata(path)?.permissions.readable())
    }

    /// Check whether `file` is writable.
    ///
    /// A missing file is writable when its nearest existing ancestor is.
    pub fn is_writable(self: &Arc<Self>, file: &FilePath) -> Result<bool, FsError> {
        let path = self.absolute_path(file)?;
        let path = Path::new(&path);
        if self.backend.exists(path)? {
            return Ok(!self.backend.metadata(path)?.permissions.readonly());
        }
        if file.is_root_path() {
            return Ok(false);
        }

        let parent = self.parent(file)?;
        if &parent == file {
            return Ok(false);
        }
        self.is_writable(&parent)
    }

    /// Time of the last modification of `file`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    pub fn modification_time(self: &Arc<Self>, file: &FilePath) -> Result<SystemTime, FsError> {
        let path = self.existing_path(file)?;
        Ok(self.backend.metadata(Path::new(&path))?.modified)
    }

    /// Size of `file` in bytes.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotAFile`] if the path is a directory
    /// - [`FsError::NotFound`] if the file does not exist
    pub fn size(self: &Arc<Self>, file: &FilePath) -> Result<u64, FsError> {
        let path = self.absolute_path(file)?;
        let path = Path::new(&path);
        if self.backend.is_dir(path)? {
            return Err(FsError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        self.backend.file_size(path)
    }

    /// Permission bits of `file`, without setuid, setgid and sticky bits.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    pub fn permissions(self: &Arc<Self>, file: &FilePath) -> Result<Permissions, FsError> {
        let path = self.existing_path(file)?;
        Ok(self.backend.metadata(Path::new(&path))?.permissions.access_bits())
    }

    /// Change the permission bits of `file`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the file does not exist
    pub fn set_permissions(
        self: &Arc<Self>,
        file: &FilePath,
        permissions: Permissions,
    ) -> Result<(), FsError> {
        let path = self.existing_path(file)?;
        self.backend.set_permissions(Path::new(&path), permissions)
    }

    /// Read the contents of `file`.
    pub fn read(self: &Arc<Self>, file: &FilePath) -> Result<Vec<u8>, FsError> {
        let path = self.absolute_path(file)?;
        self.backend.read(Path::new(&path))
    }

    /// List the children of `dir` in backend order.
    ///
    /// With `recursive`, each subdirectory's contents follow the
    /// subdirectory itself.
    pub fn read_directory(
        self: &Arc<Self>,
        dir: &FilePath,
        recursive: bool,
    ) -> Result<Vec<FilePath>, FsError> {
        let mut path = self.absolute_path(dir)?;
        if dir.is_archive() && !path.starts_with(ARCHIVE_PROTOCOL) {
            path.insert_str(0, ARCHIVE_PROTOCOL);
        }

        let mut files = Vec::new();
        for entry in self.backend.read_dir(Path::new(&path))? {
            let entry = entry?;
            let file = dir.child(&entry.name)?;
            let descend = recursive && self.is_directory(&file)?;
            files.push(file.clone());
            if descend {
                files.extend(self.read_directory(&file, true)?);
            }
        }

        Ok(files)
    }

    /// Write `data` to `file`, creating the parent directory first.
    pub fn write(self: &Arc<Self>, file: &FilePath, data: &[u8], append: bool) -> Result<(), FsError> {
        let path = self.absolute_path(file)?;
        self.create(&self.parent(file)?)?;

        if append {
            self.backend.append(Path::new(&path), data)
        } else {
            self.backend.write(Path::new(&path), data)
        }
    }

    /// Create `dir` and its parents; does nothing when it exists.
    pub fn create(self: &Arc<Self>, dir: &FilePath) -> Result<(), FsError> {
        let path = self.absolute_path(dir)?;
        let path = Path::new(&path);
        if self.backend.exists(path)? {
            return Ok(());
        }
        self.backend.create_dir_all(path)
    }

    /// Delete `file`, or `file` and its contents when it is a directory.
    pub fn delete(self: &Arc<Self>, file: &FilePath) -> Result<(), FsError> {
        let path = self.absolute_path(file)?;
        let path = Path::new(&path);
        if self.backend.is_dir(path)? {
            self.backend.remove_dir_all(path)
        } else {
            self.backend.remove_file(path)
        }
    }

    /// Copy a file or a directory tree.
    ///
    /// Copied files get `rw-r--r--` permissions. Copying a file onto itself
    /// does nothing.
    pub fn copy(self: &Arc<Self>, source: &FilePath, destination: &FilePath) -> Result<(), FsError> {
        if self.is_directory(source)? {
            self.copy_directory(source, destination)
        } else {
            self.copy_regular_file(source, destination)
        }
    }

    /// Copy `source` to `destination`, then delete `source`.
    pub fn move_to(self: &Arc<Self>, source: &FilePath, destination: &FilePath) -> Result<(), FsError> {
        self.copy(source, destination)?;
        self.delete(source)
    }

    fn copy_regular_file(self: &Arc<Self>, source: &FilePath, destination: &FilePath) -> Result<(), FsError> {
        self.create(&self.parent(destination)?)?;

        let source_path = self.absolute_path(source)?;
        let destination_path = self.absolute_path(destination)?;
        if source_path == destination_path {
            return Ok(());
        }

        self.backend
            .copy(Path::new(&source_path), Path::new(&destination_path))?;
        self.backend
            .set_permissions(Path::new(&destination_path), COPY_PERMISSIONS)
    }

    fn copy_directory(
        self: &Arc<Self>,
        source: &FilePath,
        destination: &FilePath,
    ) -> Result<(), FsError> {
        let source_path = self.absolute_path(source)?;
        let entries = self.backend.read_dir(Path::new(&source_path))?.collect_all()?;

        if entries.is_empty() {
            return self.create(destination);
        }

        for entry in entries {
            self.copy(&source.child(&entry.name)?, &destination.child(&entry.name)?)?;
        }
        Ok(())
    }

    fn existing_path(self: &Arc<Self>, file: &FilePath) -> Result<String, FsError> {
        let path = self.absolute_path(file)?;
        if !self.backend.exists(Path::new(&path))? {
            return Err(FsError::NotFound { path: path.into() });
        }
        Ok(path)
    }
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystem")
            .field("platform", &self.platform)
            .field("working_directory", &self.working_directory)
            .finish_non_exhaustive()
    }
}
