//! # Extension Traits
//!
//! Convenience methods for filesystem backends.
//!
//! ## Overview
//!
//! [`FsExt`] provides queries built from [`FsRead::metadata`](crate::FsRead::metadata)
//! that backends get for free through a blanket implementation.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`is_dir`](FsExt::is_dir) | Check if path is a directory |
//! | [`file_size`](FsExt::file_size) | Size of a file in bytes |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, `read_json` and `write_json` are
//! available through `FsExtJson`. [`FileBrowser`](crate::FileBrowser) uses
//! them to load and save its search-path configuration.

use crate::{Fs, FsError};
use std::path::Path;

/// Extension methods for any filesystem backend.
///
/// # Example
///
/// ```rust
/// use syspath::{Fs, FsExt, FsError};
/// use std::path::Path;
///
/// fn ensure_dir<B: Fs>(backend: &B, path: &Path) -> Result<(), FsError> {
///     if !backend.is_dir(path)? {
///         backend.create_dir_all(path)?;
///     }
///     Ok(())
/// }
/// ```
pub trait FsExt: Fs {
    /// Check if the path points to a directory.
    ///
    /// Returns `Ok(false)` if the path doesn't exist (not an error).
    fn is_dir(&self, path: &Path) -> Result<bool, FsError> {
        match self.metadata(path) {
            Ok(m) => Ok(m.is_dir()),
            Err(FsError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get the size of a file in bytes.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` if the path doesn't exist.
    fn file_size(&self, path: &Path) -> Result<u64, FsError> {
        Ok(self.metadata(path)?.size)
    }
}

impl<B: Fs + ?Sized> FsExt for B {}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{Serialize, de::DeserializeOwned};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait FsExtJson: Fs {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::NotFound` if the file doesn't exist
        /// - `FsError::Deserialization` if the file isn't valid JSON for `T`
        ///
        /// # Example
        ///
        /// ```rust
        /// use syspath::{Fs, FsError};
        /// #[cfg(feature = "serde")]
        /// use syspath::FsExtJson;
        /// use std::path::Path;
        ///
        /// #[cfg(feature = "serde")]
        /// fn load_config<B: Fs>(backend: &B) -> Result<serde_json::Value, FsError> {
        ///     backend.read_json(Path::new("/config.json"))
        /// }
        /// ```
        fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, FsError> {
            let data = self.read(path)?;
            serde_json::from_slice(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::Serialization` if `value` cannot be represented as JSON
        /// - Other `FsError` variants from the underlying `write()` call
        fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), FsError> {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            self.write(path, json.as_bytes())
        }
    }

    impl<B: Fs + ?Sized> FsExtJson for B {}
}

#[cfg(feature = "serde")]
pub use json::FsExtJson;
