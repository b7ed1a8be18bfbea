//! # NativeFs
//!
//! Capability backend over `std::fs`.
//!
//! Archive paths (`phar://...`) never exist for this backend; every other
//! operation on them fails with [`FsError::NotSupported`]. Archives are a
//! path convention only.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::platform::ARCHIVE_PROTOCOL;
use crate::{
    DirEntry, FileType, FsDir, FsError, FsPermissions, FsRead, FsWrite, Metadata, Permissions,
    ReadDirIter,
};

/// Backend reading and writing the host file system.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use syspath::{FileSystem, NativeFs, Platform};
///
/// let fs = Arc::new(FileSystem::new(Platform::Posix, Arc::new(NativeFs::new())));
/// let missing = fs.file("/this/path/does/not/exist")?;
/// assert!(!missing.exists()?);
/// # Ok::<(), syspath::FsError>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFs;

impl NativeFs {
    /// Create a native backend.
    pub fn new() -> Self {
        Self
    }
}

fn is_archive_path(path: &Path) -> bool {
    path.to_string_lossy().starts_with(ARCHIVE_PROTOCOL)
}

fn check_native(path: &Path, operation: &'static str) -> Result<(), FsError> {
    if is_archive_path(path) {
        return Err(FsError::NotSupported {
            path: path.to_path_buf(),
            operation,
        });
    }
    Ok(())
}

#[cfg(unix)]
fn permissions_of(metadata: &fs::Metadata) -> Permissions {
    use std::os::unix::fs::PermissionsExt;
    Permissions::from_mode(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn permissions_of(metadata: &fs::Metadata) -> Permissions {
    let mode = match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, false) => 0o755,
        (true, true) => 0o555,
        (false, false) => 0o644,
        (false, true) => 0o444,
    };
    Permissions::from_mode(mode)
}

impl FsRead for NativeFs {
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        if is_archive_path(path) {
            return Ok(false);
        }
        path.try_exists()
            .map_err(|e| FsError::from_io("exists", path, e))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        check_native(path, "read")?;
        if path.is_dir() {
            return Err(FsError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        fs::read(path).map_err(|e| FsError::from_io("read", path, e))
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        check_native(path, "metadata")?;
        let metadata = fs::metadata(path).map_err(|e| FsError::from_io("metadata", path, e))?;
        let modified = metadata
            .modified()
            .map_err(|e| FsError::from_io("metadata", path, e))?;

        Ok(Metadata {
            file_type: if metadata.is_dir() {
                FileType::Directory
            } else {
                FileType::File
            },
            size: metadata.len(),
            permissions: permissions_of(&metadata),
            modified,
        })
    }
}

impl FsWrite for NativeFs {
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        check_native(path, "write")?;
        fs::write(path, data).map_err(|e| FsError::from_io("write", path, e))
    }

    fn append(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        check_native(path, "append")?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FsError::from_io("append", path, e))?;
        file.write_all(data)
            .map_err(|e| FsError::from_io("append", path, e))
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        check_native(path, "remove_file")?;
        fs::remove_file(path).map_err(|e| FsError::from_io("remove_file", path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        check_native(from, "copy")?;
        check_native(to, "copy")?;
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| FsError::from_io("copy", from, e))
    }
}

impl FsDir for NativeFs {
    fn read_dir(&self, path: &Path) -> Result<ReadDirIter, FsError> {
        check_native(path, "read_dir")?;
        if path.exists() && !path.is_dir() {
            return Err(FsError::NotADirectory {
                path: path.to_path_buf(),
            });
        }

        let dir = path.to_path_buf();
        let entries = fs::read_dir(path).map_err(|e| FsError::from_io("read_dir", path, e))?;
        Ok(ReadDirIter::new(entries.map(move |entry| {
            let entry = entry.map_err(|e| FsError::from_io("read_dir", &dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| FsError::from_io("read_dir", entry.path(), e))?;
            Ok(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                file_type: if file_type.is_dir() {
                    FileType::Directory
                } else {
                    FileType::File
                },
            })
        })))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        check_native(path, "create_dir_all")?;
        fs::create_dir_all(path).map_err(|e| FsError::from_io("create_dir_all", path, e))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), FsError> {
        check_native(path, "remove_dir_all")?;
        fs::remove_dir_all(path).map_err(|e| FsError::from_io("remove_dir_all", path, e))
    }
}

impl FsPermissions for NativeFs {
    #[cfg(unix)]
    fn set_permissions(&self, path: &Path, perm: Permissions) -> Result<(), FsError> {
        use std::os::unix::fs::PermissionsExt;

        check_native(path, "set_permissions")?;
        fs::set_permissions(path, fs::Permissions::from_mode(perm.mode()))
            .map_err(|e| FsError::from_io("set_permissions", path, e))
    }

    #[cfg(not(unix))]
    fn set_permissions(&self, path: &Path, perm: Permissions) -> Result<(), FsError> {
        check_native(path, "set_permissions")?;
        let mut permissions = fs::metadata(path)
            .map_err(|e| FsError::from_io("set_permissions", path, e))?
            .permissions();
        permissions.set_readonly(perm.readonly());
        fs::set_permissions(path, permissions)
            .map_err(|e| FsError::from_io("set_permissions", path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileBrowser, FileSystem, FsExt, Platform};
    use std::sync::Arc;

    fn native_fs(dir: &tempfile::TempDir) -> Arc<FileSystem> {
        let platform = if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        };
        Arc::new(
            FileSystem::new(platform, Arc::new(NativeFs::new()))
                .with_working_directory(dir.path().to_string_lossy()),
        )
    }

    #[test]
    fn read_write_append() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.txt");
        let backend = NativeFs::new();

        backend.write(&path, b"hello").unwrap();
        backend.append(&path, b" world").unwrap();
        assert_eq!(backend.read(&path).unwrap(), b"hello world");
        assert!(!backend.is_dir(&path).unwrap());
        assert_eq!(backend.file_size(&path).unwrap(), 11);
    }

    #[test]
    fn missing_paths_map_to_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        let backend = NativeFs::new();

        assert!(!backend.exists(&missing).unwrap());
        assert!(matches!(backend.read(&missing), Err(FsError::NotFound { .. })));
        assert!(matches!(backend.metadata(&missing), Err(FsError::NotFound { .. })));
        assert!(matches!(backend.remove_file(&missing), Err(FsError::NotFound { .. })));
    }

    #[test]
    fn reading_a_directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let backend = NativeFs::new();
        assert!(matches!(backend.read(dir.path()), Err(FsError::NotAFile { .. })));
    }

    #[test]
    fn read_dir_lists_entries() {
        let dir = tempfile::tempdir().unwrap();
        let backend = NativeFs::new();
        backend.write(&dir.path().join("a.txt"), b"a").unwrap();
        backend.create_dir_all(&dir.path().join("sub/deeper")).unwrap();

        let mut entries = backend.read_dir(dir.path()).unwrap().collect_all().unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[0].file_type, FileType::File);
        assert_eq!(entries[1].name, "sub");
        assert_eq!(entries[1].file_type, FileType::Directory);

        let file = dir.path().join("a.txt");
        assert!(matches!(backend.read_dir(&file), Err(FsError::NotADirectory { .. })));
    }

    #[test]
    fn archive_paths_are_not_supported() {
        let backend = NativeFs::new();
        let path = Path::new("phar:///srv/lib/tools.phar/bin/run");
        assert!(matches!(
            backend.read(path),
            Err(FsError::NotSupported { operation: "read", .. })
        ));
        assert!(matches!(
            backend.metadata(path),
            Err(FsError::NotSupported { operation: "metadata", .. })
        ));
        assert!(!backend.exists(path).unwrap());
    }

    #[test]
    fn lookup_across_archive_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = native_fs(&dir);
        fs.file("lib/x.phar").unwrap().write(b"archive", false).unwrap();

        let mut browser = FileBrowser::new();
        browser.add_include_directory(fs.file(".").unwrap()).unwrap();
        assert!(browser.get_file("lib/x.phar/a").unwrap().is_none());
        assert!(browser.get_files("lib/x.phar/a").unwrap().is_empty());
        assert!(browser.get_file("lib/x.phar").unwrap().is_some());
    }

    #[test]
    fn temporary_file_is_created_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let fs = native_fs(&dir);

        let file = fs.temporary_file("upload").unwrap();
        assert!(file.is_absolute());
        assert!(file.name().starts_with("upload"));
        assert!(file.exists().unwrap());
        assert_eq!(file.size().unwrap(), 0);

        file.write(b"data", false).unwrap();
        assert_eq!(file.read().unwrap(), b"data");
        file.delete().unwrap();
        assert!(!file.exists().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.sh");
        let backend = NativeFs::new();
        backend.write(&path, b"#!/bin/sh").unwrap();

        backend
            .set_permissions(&path, Permissions::from_mode(0o750))
            .unwrap();
        let permissions = backend.metadata(&path).unwrap().permissions;
        assert_eq!(permissions.access_bits(), Permissions::from_mode(0o750));
    }

    #[test]
    fn file_system_operations_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let fs = native_fs(&dir);

        let file = fs.file("nested/dir/notes.txt").unwrap();
        file.write(b"first", false).unwrap();
        assert!(file.exists().unwrap());
        assert!(fs.file("nested/dir").unwrap().is_directory().unwrap());
        assert_eq!(file.size().unwrap(), 5);

        let copy = fs.file("copy/notes.txt").unwrap();
        file.copy_to(&copy).unwrap();
        assert_eq!(copy.read().unwrap(), b"first");

        let listed = fs.file("nested").unwrap().read_directory(true).unwrap();
        assert_eq!(listed, ["nested/dir", "nested/dir/notes.txt"]);

        fs.file("nested").unwrap().delete().unwrap();
        assert!(!file.exists().unwrap());
    }

    #[test]
    fn copy_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let fs = native_fs(&dir);
        fs.file("doc.txt").unwrap().write(b"a", false).unwrap();
        fs.file("doc-1.txt").unwrap().write(b"b", false).unwrap();

        let free = fs.file("doc.txt").unwrap().copy_file().unwrap();
        assert_eq!(free, "doc-2.txt");
    }
}
