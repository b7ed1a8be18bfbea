//! # Platform Path Rules
//!
//! Path syntax rules for the two supported operating system families.
//!
//! ## Responsibility
//! - Detect root paths, absolute paths and Windows drive prefixes
//! - Fold `.` and `..` segments of an absolute path
//!
//! Paths reaching this module are already `/`-separated; backslashes are
//! rewritten when a [`FilePath`](crate::FilePath) is constructed.
//!
//! ## Drive prefixes (Windows)
//!
//! | Path | Prefix |
//! |------|--------|
//! | `/` | `/` |
//! | `C:/tmp` | `C:/` |
//! | `/C/tmp` | `/C/` |
//! | `//server/share` | `/` |
//! | `c:/tmp` | none (lower case is not a drive letter) |

/// Directory separator of every normalized path.
pub const SEPARATOR: char = '/';

/// Marker prefixed to paths that descend into an archive.
pub const ARCHIVE_PROTOCOL: &str = "phar://";

/// Extension identifying an archive file.
pub const ARCHIVE_EXTENSION: &str = "phar";

/// Path syntax of an operating system family.
///
/// Stateless and `Copy`; selected once by [`System`](crate::System) and
/// injected into a [`FileSystem`](crate::FileSystem).
///
/// # Example
///
/// ```rust
/// use syspath::Platform;
///
/// assert!(Platform::Windows.is_absolute("C:/tmp/x"));
/// assert!(!Platform::Windows.is_absolute("c/tmp/x"));
/// assert!(Platform::Posix.is_root_path("/"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    /// Unix-like systems: a single `/` root.
    Posix,
    /// Microsoft Windows: drive letters and UNC roots.
    Windows,
}

impl Platform {
    /// Short lower-case name of the platform.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Posix => "posix",
            Platform::Windows => "windows",
        }
    }

    /// Check whether `path` is exactly a root (`/`, `C:/`, `/C/`).
    pub fn is_root_path(&self, path: &str) -> bool {
        match self {
            Platform::Posix => path == "/",
            Platform::Windows => self.drive_prefix(path) == Some(path),
        }
    }

    /// Check whether `path` is absolute, ignoring an archive protocol prefix.
    pub fn is_absolute(&self, path: &str) -> bool {
        let (path, _) = strip_archive_protocol(path);
        match self {
            Platform::Posix => path.starts_with(SEPARATOR),
            Platform::Windows => path.starts_with(SEPARATOR) || self.drive_prefix(path).is_some(),
        }
    }

    /// Get the root prefix of an absolute path.
    ///
    /// On POSIX this is `/` for any absolute path. On Windows it is the bare
    /// separator, `X:/`, or `/X/`, where `X` is an upper-case ASCII letter.
    /// Returns `None` for relative paths.
    pub fn drive_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        let bytes = path.as_bytes();
        match self {
            Platform::Posix => path.starts_with(SEPARATOR).then(|| &path[..1]),
            Platform::Windows => {
                if bytes.is_empty() {
                    return None;
                }
                if bytes[0] == b'/' {
                    if bytes.len() >= 3 && is_drive(bytes[1]) && bytes[2] == b'/' {
                        return Some(&path[..3]);
                    }
                    return Some(&path[..1]);
                }
                if bytes.len() >= 3 && is_drive(bytes[0]) && bytes[1] == b':' && bytes[2] == b'/' {
                    return Some(&path[..3]);
                }
                None
            }
        }
    }

    /// Fold the segments of an absolute path.
    ///
    /// Empty segments and `.` are skipped, `..` drops the previously accepted
    /// segment. Excess `..` segments are absorbed at the root.
    ///
    /// ```rust
    /// use syspath::Platform;
    ///
    /// assert_eq!(Platform::Posix.resolve_segments("/x/a/../a/.//./b.txt"), "/x/a/b.txt");
    /// assert_eq!(Platform::Posix.resolve_segments("/../../etc"), "/etc");
    /// assert_eq!(Platform::Windows.resolve_segments("C:/dir/../file.txt"), "C:/file.txt");
    /// ```
    pub fn resolve_segments(&self, path: &str) -> String {
        let (prefix, rest) = match self {
            Platform::Posix => ("/", path),
            Platform::Windows => {
                let prefix = self.drive_prefix(path).unwrap_or("");
                (prefix, &path[prefix.len()..])
            }
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in rest.split(SEPARATOR) {
            match segment {
                "" | "." => continue,
                ".." => {
                    segments.pop();
                }
                _ => segments.push(segment),
            }
        }

        let mut resolved = String::with_capacity(path.len());
        resolved.push_str(prefix);
        resolved.push_str(&segments.join("/"));
        resolved
    }
}

/// Remove a leading archive protocol, reporting whether it was present.
pub(crate) fn strip_archive_protocol(path: &str) -> (&str, bool) {
    match path.strip_prefix(ARCHIVE_PROTOCOL) {
        Some(stripped) => (stripped, true),
        None => (path, false),
    }
}

fn is_drive(character: u8) -> bool {
    character.is_ascii_uppercase()
}
