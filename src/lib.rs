//! # syspath
//!
//! Cross-platform path normalization with layered search-path file lookup.
//!
//! Paths are slash-normalized strings bound to a [`FileSystem`], which knows
//! the [`Platform`] rules (POSIX or Windows), the working directory and the
//! disk backend. A [`FileBrowser`] stacks root directories and resolves
//! relative names against them, include-path style.
//!
//! ---
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use syspath::{FileSystem, NativeFs, Platform};
//!
//! let fs = Arc::new(
//!     FileSystem::new(Platform::Windows, Arc::new(NativeFs::new()))
//!         .with_working_directory("C:\\projects\\site"),
//! );
//!
//! let file = fs.file("modules\\..\\lib\\tools.phar\\bin\\run")?;
//! assert_eq!(file.as_str(), "phar://modules/../lib/tools.phar/bin/run");
//! assert_eq!(file.absolute_path()?, "phar://C:/projects/site/lib/tools.phar/bin/run");
//! assert_eq!(fs.file("C:/")?.parent()?.as_str(), "C:/");
//! # Ok::<(), syspath::FsError>(())
//! ```
//!
//! ---
//!
//! ## Core Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`FilePath`] | Immutable normalized path bound to its file system |
//! | [`Platform`] | POSIX and Windows root, drive and dot-segment rules |
//! | [`FileSystem`] | Working directory, platform and backend for a set of paths |
//! | [`FileBrowser`] | Ordered search path with application and public roots |
//! | [`System`] | OS detection, native file system and command execution |
//! | [`Fs`] | Capability surface the disk operations call into |
//! | [`FsError`] | Error type with path and operation context |
//!
//! ---
//!
//! ## Archive Paths
//!
//! A path crossing a `.phar/` boundary descends into an archive and carries
//! the `phar://` prefix: `lib/tools.phar/bin/run` is stored as
//! `phar://lib/tools.phar/bin/run`. A path naming the archive itself is left
//! alone unless the caller wrote the prefix. Archives are a naming convention
//! only; [`NativeFs`] reports them as missing and refuses to open them.
//!
//! ---
//!
//! ## Search Path
//!
//! ```rust
//! use std::sync::Arc;
//! use syspath::{FileBrowser, FileSystem, NativeFs, Platform};
//!
//! let fs = Arc::new(FileSystem::new(Platform::Posix, Arc::new(NativeFs::new())));
//!
//! let mut browser = FileBrowser::new();
//! browser.add_include_directory(fs.file("/srv/modules/core")?)?;
//! browser.add_include_directory(fs.file("/srv/modules/cms")?)?;
//! browser.set_application_directory(fs.file("/srv/app")?)?;
//!
//! let roots: Vec<_> = browser.include_directories().map(|root| root.as_str()).collect();
//! assert_eq!(roots, ["/srv/app", "/srv/modules/core", "/srv/modules/cms"]);
//! # Ok::<(), syspath::FsError>(())
//! ```
//!
//! ---
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: search-path changes and failed
//! reverse lookups at `debug`, lookup hits and path resolution at `trace`.
//! Install any `log` implementation to see them.
//!
//! ---
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Serialization for [`BrowserConfig`], [`Metadata`], [`Permissions`], etc., plus `FileBrowser::load` and `FileBrowser::save` as JSON |

mod browser;
mod error;
mod ext;
mod file_path;
mod file_system;
mod native;
mod platform;
mod system;
mod traits;
mod types;

#[cfg(test)]
mod testing;

// Public re-exports - error types
pub use error::FsError;

// Public re-exports - core types
pub use types::{DirEntry, FileType, Metadata, Permissions};

// Public re-exports - capability traits
pub use traits::{Fs, FsDir, FsPermissions, FsRead, FsWrite, ReadDirIter};

// Public re-exports - paths
pub use file_path::{ArchiveRef, FilePath};
pub use file_system::FileSystem;
pub use platform::{Platform, ARCHIVE_EXTENSION, ARCHIVE_PROTOCOL, SEPARATOR};

// Public re-exports - search path
pub use browser::{BrowserConfig, FileBrowser};

// Public re-exports - host system
pub use native::NativeFs;
pub use system::{CommandOutput, CommandRunner, OsFamily, ShellRunner, System};

// Public re-exports - infrastructure
pub use ext::FsExt;

// Conditional re-exports
#[cfg(feature = "serde")]
pub use ext::FsExtJson;
