//! # Capability Traits
//!
//! The minimal disk surface that path operations call into.
//!
//! ## Trait Layout
//!
//! ```text
//! FsRead + FsWrite + FsDir + FsPermissions = Fs
//! ```
//!
//! | Trait | Methods |
//! |-------|---------|
//! | [`FsRead`] | `exists`, `read`, `metadata` |
//! | [`FsWrite`] | `write`, `append`, `remove_file`, `copy` |
//! | [`FsDir`] | `read_dir`, `create_dir_all`, `remove_dir_all` |
//! | [`FsPermissions`] | `set_permissions` |
//!
//! Paths handed to a backend are always absolute and `/`-separated. Paths
//! inside an archive keep their `phar://` prefix; backends without archive
//! support report [`FsError::NotSupported`](crate::FsError::NotSupported).
//!
//! ## Blanket Implementation
//!
//! Implement the component traits and you get [`Fs`] for free:
//!
//! ```rust
//! use syspath::{Fs, FsDir, FsPermissions, FsRead, FsWrite, ReadDirIter};
//!
//! struct MyBackend;
//!
//! # impl FsRead for MyBackend {
//! #     fn exists(&self, _: &std::path::Path) -> Result<bool, syspath::FsError> { Ok(false) }
//! #     fn read(&self, _: &std::path::Path) -> Result<Vec<u8>, syspath::FsError> { Ok(vec![]) }
//! #     fn metadata(&self, _: &std::path::Path) -> Result<syspath::Metadata, syspath::FsError> { Ok(Default::default()) }
//! # }
//! # impl FsWrite for MyBackend {
//! #     fn write(&self, _: &std::path::Path, _: &[u8]) -> Result<(), syspath::FsError> { Ok(()) }
//! #     fn append(&self, _: &std::path::Path, _: &[u8]) -> Result<(), syspath::FsError> { Ok(()) }
//! #     fn remove_file(&self, _: &std::path::Path) -> Result<(), syspath::FsError> { Ok(()) }
//! #     fn copy(&self, _: &std::path::Path, _: &std::path::Path) -> Result<(), syspath::FsError> { Ok(()) }
//! # }
//! # impl FsDir for MyBackend {
//! #     fn read_dir(&self, _: &std::path::Path) -> Result<ReadDirIter, syspath::FsError> { Ok(ReadDirIter::from_vec(vec![])) }
//! #     fn create_dir_all(&self, _: &std::path::Path) -> Result<(), syspath::FsError> { Ok(()) }
//! #     fn remove_dir_all(&self, _: &std::path::Path) -> Result<(), syspath::FsError> { Ok(()) }
//! # }
//! # impl FsPermissions for MyBackend {
//! #     fn set_permissions(&self, _: &std::path::Path, _: syspath::Permissions) -> Result<(), syspath::FsError> { Ok(()) }
//! # }
//!
//! fn use_fs<B: Fs>(_backend: &B) {}
//! use_fs(&MyBackend);
//! ```
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`. Methods take `&self`; backends use
//! interior mutability for their own state.

mod fs_dir;
mod fs_permissions;
mod fs_read;
mod fs_write;

pub use fs_dir::{FsDir, ReadDirIter};
pub use fs_permissions::FsPermissions;
pub use fs_read::FsRead;
pub use fs_write::FsWrite;

/// Complete capability surface used by [`FileSystem`](crate::FileSystem).
///
/// Automatically implemented for any type that implements the four
/// component traits.
///
/// # Example
///
/// ```rust
/// use syspath::{Fs, FsError};
/// use std::path::Path;
///
/// fn backup_file<B: Fs + ?Sized>(fs: &B, src: &Path, dst: &Path) -> Result<(), FsError> {
///     let data = fs.read(src)?;
///     if let Some(parent) = dst.parent() {
///         fs.create_dir_all(parent)?;
///     }
///     fs.write(dst, &data)
/// }
/// ```
pub trait Fs: FsRead + FsWrite + FsDir + FsPermissions {}

impl<T: FsRead + FsWrite + FsDir + FsPermissions> Fs for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_is_object_safe() {
        fn _check(_: &dyn Fs) {}
    }

    #[test]
    fn fs_requires_send_sync() {
        fn _assert_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_send_sync::<dyn Fs>();
    }
}
