//! # FileBrowser
//!
//! Layered lookup of relative names across an ordered set of root
//! directories.
//!
//! ## Lookup order
//!
//! ```text
//! application directory ─┐
//! include directory 1    ├─▶ first existing child wins (get_file)
//! include directory 2    │   every existing child, in order (get_files)
//! ...                   ─┘
//! public directory ──────▶ get_public_file, then public path via get_file
//! ```
//!
//! Include directories are keyed by absolute path. Adding a directory that is
//! already present replaces it in place; the application directory is always
//! moved to the front.

use std::sync::Arc;

use crate::platform::{strip_archive_protocol, SEPARATOR};
use crate::{FilePath, FileSystem, FsError};

/// Search-path settings for building a [`FileBrowser`].
///
/// Paths are resolved against the file system passed to
/// [`FileBrowser::from_config`]. With the `serde` feature the configuration
/// can be read from JSON:
///
/// ```json
/// {
///   "application_directory": "app",
///   "include_directories": ["modules/core", "modules/cms"],
///   "public_directory": "public",
///   "public_path": "web"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BrowserConfig {
    /// Root searched before every include directory.
    pub application_directory: Option<String>,
    /// Include directories in priority order.
    pub include_directories: Vec<String>,
    /// Directory serving public files directly.
    pub public_directory: Option<String>,
    /// Relative path looked up in the include directories for public files.
    pub public_path: Option<String>,
}

/// Ordered search path over [`FilePath`] roots.
///
/// Configure with `&mut self`, then share for lookups.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use syspath::{FileBrowser, FileSystem, NativeFs, Platform};
///
/// let fs = Arc::new(FileSystem::new(Platform::Posix, Arc::new(NativeFs::new())));
///
/// let mut browser = FileBrowser::new();
/// browser.add_include_directory(fs.file("/srv/modules/core")?)?;
/// browser.set_application_directory(fs.file("/srv/app")?)?;
///
/// let relative = browser.get_relative_file("/srv/modules/core/config/routes.json", false)?;
/// assert_eq!(relative.as_str(), "config/routes.json");
/// # Ok::<(), syspath::FsError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileBrowser {
    application_directory: Option<FilePath>,
    include_directories: Vec<(String, FilePath)>,
    public_directory: Option<FilePath>,
    public_path: Option<String>,
}

impl FileBrowser {
    /// Create a browser without any directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a browser from `config`, resolving its paths through `fs`.
    pub fn from_config(fs: &Arc<FileSystem>, config: &BrowserConfig) -> Result<Self, FsError> {
        let mut browser = Self::new();

        for directory in &config.include_directories {
            browser.add_include_directory(fs.file(directory)?)?;
        }
        if let Some(directory) = &config.application_directory {
            browser.set_application_directory(fs.file(directory)?)?;
        }
        if let Some(directory) = &config.public_directory {
            browser.set_public_directory(fs.file(directory)?);
        }
        if let Some(path) = &config.public_path {
            browser.set_public_path(path.clone());
        }

        Ok(browser)
    }

    /// Build a browser from a JSON [`BrowserConfig`] stored at `config`.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotFound`] if the configuration file does not exist
    /// - [`FsError::Deserialization`] if it is not a valid configuration
    #[cfg(feature = "serde")]
    pub fn load(config: &FilePath) -> Result<Self, FsError> {
        use crate::FsExtJson;

        let fs = config.file_system();
        let path = config.absolute_path()?;
        log::debug!("loading search path configuration from {path}");

        let settings: BrowserConfig = fs.backend().read_json(std::path::Path::new(&path))?;
        Self::from_config(fs, &settings)
    }

    /// Write the current [`config`](Self::config) as JSON to `destination`,
    /// creating its parent directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::Serialization`] if the configuration cannot be encoded
    /// - Other `FsError` variants from writing the file
    #[cfg(feature = "serde")]
    pub fn save(&self, destination: &FilePath) -> Result<(), FsError> {
        use crate::FsExtJson;

        let fs = destination.file_system();
        let path = destination.absolute_path()?;
        log::debug!("saving search path configuration to {path}");

        fs.create(&destination.parent()?)?;
        fs.backend()
            .write_json(std::path::Path::new(&path), &self.config())
    }

    /// The settings that rebuild this browser through
    /// [`from_config`](Self::from_config).
    pub fn config(&self) -> BrowserConfig {
        let application = self.application_directory.as_ref();
        BrowserConfig {
            application_directory: application.map(|directory| directory.as_str().to_string()),
            include_directories: self
                .include_directories()
                .filter(|directory| Some(*directory) != application)
                .map(|directory| directory.as_str().to_string())
                .collect(),
            public_directory: self
                .public_directory
                .as_ref()
                .map(|directory| directory.as_str().to_string()),
            public_path: self.public_path.clone(),
        }
    }

    /// The file system of the configured directories.
    ///
    /// Taken from the application directory, else the public directory,
    /// else the first include directory.
    ///
    /// # Errors
    ///
    /// - [`FsError::EmptySearchPath`] if no directory is configured
    pub fn file_system(&self) -> Result<&Arc<FileSystem>, FsError> {
        self.application_directory
            .as_ref()
            .or(self.public_directory.as_ref())
            .or(self.include_directories.first().map(|(_, directory)| directory))
            .map(FilePath::file_system)
            .ok_or(FsError::EmptySearchPath)
    }

    /// Append an include directory, or replace the entry with the same
    /// absolute path in place.
    pub fn add_include_directory(&mut self, directory: FilePath) -> Result<(), FsError> {
        let key = directory.absolute_path()?;
        log::debug!("adding include directory {key}");

        match self.position(&key) {
            Some(index) => self.include_directories[index].1 = directory,
            None => self.include_directories.push((key, directory)),
        }
        Ok(())
    }

    /// Remove the include directory with the same absolute path as `directory`.
    pub fn remove_include_directory(&mut self, directory: &FilePath) -> Result<(), FsError> {
        let key = directory.absolute_path()?;
        self.remove_include_path(&key);
        Ok(())
    }

    /// Remove the include directory keyed by `path`; does nothing when absent.
    pub fn remove_include_path(&mut self, path: &str) {
        if let Some(index) = self.position(path) {
            log::debug!("removing include directory {path}");
            self.include_directories.remove(index);
        }
    }

    /// Include directories in lookup order.
    pub fn include_directories(&self) -> impl ExactSizeIterator<Item = &FilePath> {
        self.include_directories.iter().map(|(_, directory)| directory)
    }

    /// Set the application directory and make it the first include directory.
    pub fn set_application_directory(&mut self, directory: FilePath) -> Result<(), FsError> {
        let key = directory.absolute_path()?;
        log::debug!("setting application directory {key}");

        self.remove_include_path(&key);
        self.include_directories.insert(0, (key, directory.clone()));
        self.application_directory = Some(directory);
        Ok(())
    }

    /// The application directory, if set.
    pub fn application_directory(&self) -> Option<&FilePath> {
        self.application_directory.as_ref()
    }

    /// Set the directory serving public files.
    pub fn set_public_directory(&mut self, directory: FilePath) {
        log::debug!("setting public directory {directory}");
        self.public_directory = Some(directory);
    }

    /// The public directory, if set.
    pub fn public_directory(&self) -> Option<&FilePath> {
        self.public_directory.as_ref()
    }

    /// Set the relative path searched in the include directories for public
    /// files missing from the public directory.
    pub fn set_public_path(&mut self, path: impl Into<String>) {
        let path = path.into();
        log::debug!("setting public path {path}");
        self.public_path = Some(path);
    }

    /// The public path, if set.
    pub fn public_path(&self) -> Option<&str> {
        self.public_path.as_deref()
    }

    /// Find a public file.
    ///
    /// Leading separators of `name` are ignored. The public directory is
    /// tried first, then `<public path>/<name>` through [`get_file`](Self::get_file).
    pub fn get_public_file(&self, name: &str) -> Result<Option<FilePath>, FsError> {
        let name = name.trim_start_matches(SEPARATOR);

        if let Some(directory) = &self.public_directory {
            let file = directory.child(name)?;
            if file.exists()? {
                log::trace!("found public file {file}");
                return Ok(Some(file));
            }
        }

        match &self.public_path {
            Some(public_path) => self.get_file(format!("{public_path}{SEPARATOR}{name}")),
            None => Ok(None),
        }
    }

    /// Find the first include directory containing `name`.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `name` is empty or absolute
    pub fn get_file(&self, name: impl AsRef<str>) -> Result<Option<FilePath>, FsError> {
        let name = lookup_name(name.as_ref())?;

        for (_, directory) in &self.include_directories {
            let file = directory.child(name)?;
            if file.exists()? {
                log::trace!("found {name} at {file}");
                return Ok(Some(file));
            }
        }

        Ok(None)
    }

    /// Find `name` in every include directory, in lookup order.
    ///
    /// # Errors
    ///
    /// - [`FsError::InvalidPath`] if `name` is empty or absolute
    pub fn get_files(&self, name: impl AsRef<str>) -> Result<Vec<FilePath>, FsError> {
        let name = lookup_name(name.as_ref())?;

        let mut files = Vec::new();
        for (_, directory) in &self.include_directories {
            let file = directory.child(name)?;
            if file.exists()? {
                log::trace!("found {name} at {file}");
                files.push(file);
            }
        }

        Ok(files)
    }

    /// Map an absolute path back to its name relative to the covering
    /// include directory.
    ///
    /// `path` is resolved through the first include directory's file system,
    /// or the public directory's when no include directory is set. With
    /// `check_public`, the public directory is tried after the include
    /// directories.
    ///
    /// # Errors
    ///
    /// - [`FsError::NotInSearchPath`] if no directory covers the path
    pub fn get_relative_file(
        &self,
        path: impl AsRef<str>,
        check_public: bool,
    ) -> Result<FilePath, FsError> {
        let path = path.as_ref();
        let fs = match (self.include_directories.first(), &self.public_directory) {
            (Some((_, directory)), _) | (None, Some(directory)) => directory.file_system(),
            (None, None) => {
                log::debug!("{path} is not in the search path: no directories configured");
                return Err(FsError::NotInSearchPath { path: path.into() });
            }
        };

        let absolute = fs.file(path)?.absolute_path()?;
        let (absolute, _) = strip_archive_protocol(&absolute);

        for (root, _) in &self.include_directories {
            if let Some(relative) = relative_to(root, absolute) {
                log::trace!("{absolute} is {relative} in {root}");
                return fs.file(relative);
            }
        }

        if check_public {
            if let Some(directory) = &self.public_directory {
                let root = directory.absolute_path()?;
                if let Some(relative) = relative_to(&root, absolute) {
                    log::trace!("{absolute} is {relative} in public directory {root}");
                    return fs.file(relative);
                }
            }
        }

        log::debug!("{absolute} is not in the search path");
        Err(FsError::NotInSearchPath { path: path.into() })
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.include_directories
            .iter()
            .position(|(candidate, _)| candidate == key)
    }
}

fn lookup_name(name: &str) -> Result<&str, FsError> {
    if name.is_empty() {
        return Err(FsError::invalid_path(name, "file name is empty"));
    }
    Ok(name)
}

/// Part of `absolute` below `root`, when `root` covers it.
fn relative_to<'a>(root: &str, absolute: &'a str) -> Option<&'a str> {
    let (root, _) = strip_archive_protocol(root);
    let rest = absolute.strip_prefix(root)?;
    let relative = if root.ends_with(SEPARATOR) {
        rest
    } else {
        rest.strip_prefix(SEPARATOR)?
    };
    (!relative.is_empty()).then_some(relative)
}
