//! In-memory backend shared by the unit tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use crate::{
    DirEntry, FileSystem, FileType, FsDir, FsError, FsPermissions, FsRead, FsWrite, Metadata,
    Permissions, Platform, ReadDirIter,
};

pub(crate) const WORKING_DIRECTORY: &str = "/work";

#[derive(Clone)]
enum Node {
    File {
        data: Vec<u8>,
        permissions: Permissions,
    },
    Directory {
        permissions: Permissions,
    },
}

/// Map of absolute path to node; parent directories are created implicitly.
pub(crate) struct MemoryFs {
    nodes: RwLock<BTreeMap<PathBuf, Node>>,
}

impl MemoryFs {
    pub(crate) fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            PathBuf::from("/"),
            Node::Directory {
                permissions: Permissions::default_dir(),
            },
        );
        Self {
            nodes: RwLock::new(nodes),
        }
    }

    pub(crate) fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.create_parents(Path::new(path));
        self.nodes.write().unwrap().insert(
            PathBuf::from(path),
            Node::File {
                data: data.to_vec(),
                permissions: Permissions::default_file(),
            },
        );
        self
    }

    pub(crate) fn with_dir(self, path: &str) -> Self {
        self.create_dir_all(Path::new(path)).unwrap();
        self
    }

    fn create_parents(&self, path: &Path) {
        let mut nodes = self.nodes.write().unwrap();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Directory {
                permissions: Permissions::default_dir(),
            });
        }
    }

    fn children(&self, path: &Path) -> Vec<(PathBuf, Node)> {
        self.nodes
            .read()
            .unwrap()
            .iter()
            .filter(|(candidate, _)| candidate.parent() == Some(path) && candidate.as_path() != path)
            .map(|(candidate, node)| (candidate.clone(), node.clone()))
            .collect()
    }
}

impl FsRead for MemoryFs {
    fn exists(&self, path: &Path) -> Result<bool, FsError> {
        Ok(self.nodes.read().unwrap().contains_key(path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        match self.nodes.read().unwrap().get(path) {
            Some(Node::File { data, .. }) => Ok(data.clone()),
            Some(Node::Directory { .. }) => Err(FsError::NotAFile {
                path: path.to_path_buf(),
            }),
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }

    fn metadata(&self, path: &Path) -> Result<Metadata, FsError> {
        let modified = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        match self.nodes.read().unwrap().get(path) {
            Some(Node::File { data, permissions }) => Ok(Metadata {
                file_type: FileType::File,
                size: data.len() as u64,
                permissions: *permissions,
                modified,
            }),
            Some(Node::Directory { permissions }) => Ok(Metadata {
                file_type: FileType::Directory,
                size: 0,
                permissions: *permissions,
                modified,
            }),
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

impl FsWrite for MemoryFs {
    fn write(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        let mut nodes = self.nodes.write().unwrap();
        let parent_exists = path.parent().is_none_or(|parent| nodes.contains_key(parent));
        if !parent_exists {
            return Err(FsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        nodes.insert(
            path.to_path_buf(),
            Node::File {
                data: data.to_vec(),
                permissions: Permissions::default_file(),
            },
        );
        Ok(())
    }

    fn append(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        let mut existing = match self.read(path) {
            Ok(existing) => existing,
            Err(FsError::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e),
        };
        existing.extend_from_slice(data);
        self.write(path, &existing)
    }

    fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        self.nodes
            .write()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FsError::NotFound {
                path: path.to_path_buf(),
            })
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<(), FsError> {
        let data = self.read(from)?;
        self.write(to, &data)
    }
}

impl FsDir for MemoryFs {
    fn read_dir(&self, path: &Path) -> Result<ReadDirIter, FsError> {
        let entries = self
            .children(path)
            .into_iter()
            .map(|(child, node)| {
                Ok(DirEntry {
                    name: child
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    file_type: match node {
                        Node::File { .. } => FileType::File,
                        Node::Directory { .. } => FileType::Directory,
                    },
                })
            })
            .collect();
        Ok(ReadDirIter::from_vec(entries))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        self.create_parents(path);
        self.nodes
            .write()
            .unwrap()
            .entry(path.to_path_buf())
            .or_insert(Node::Directory {
                permissions: Permissions::default_dir(),
            });
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<(), FsError> {
        let mut nodes = self.nodes.write().unwrap();
        if nodes.remove(path).is_none() {
            return Err(FsError::NotFound {
                path: path.to_path_buf(),
            });
        }
        nodes.retain(|candidate, _| !candidate.starts_with(path));
        Ok(())
    }
}

impl FsPermissions for MemoryFs {
    fn set_permissions(&self, path: &Path, perm: Permissions) -> Result<(), FsError> {
        match self.nodes.write().unwrap().get_mut(path) {
            Some(Node::File { permissions, .. }) | Some(Node::Directory { permissions }) => {
                *permissions = perm;
                Ok(())
            }
            None => Err(FsError::NotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

pub(crate) fn posix_fs(backend: MemoryFs) -> Arc<FileSystem> {
    Arc::new(FileSystem::new(Platform::Posix, Arc::new(backend)).with_working_directory(WORKING_DIRECTORY))
}

pub(crate) fn windows_fs(backend: MemoryFs) -> Arc<FileSystem> {
    Arc::new(FileSystem::new(Platform::Windows, Arc::new(backend)).with_working_directory("C:\\work"))
}
