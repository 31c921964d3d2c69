//! Filesystem capabilities injected into the resolver.
//!
//! The core never touches I/O directly. Every probe goes through the two
//! predicates of [`FileSystem`], so the resolver runs unchanged over the
//! real disk, an in-memory overlay, or any virtualized host.

use rustc_hash::FxHashMap;
use std::io;
use std::path::Path;

use crate::paths;

/// Existence oracle and manifest reader, supplied per resolver.
///
/// Paths are posix strings (see [`crate::paths`]).
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing regular file.
    fn is_file(&self, path: &str) -> bool;

    /// Read the contents of `path`. Fails when the file is absent or
    /// unreadable.
    fn read_file(&self, path: &str) -> io::Result<String>;
}

/// Real-filesystem implementation backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn is_file(&self, path: &str) -> bool {
        Path::new(path).is_file()
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// In-memory filesystem keyed by normalized posix paths.
///
/// Used by the test fixtures and by hosts that overlay a virtual module
/// tree (sandboxes, bundler dev servers).
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: FxHashMap<String, String>,
}

impl MemoryFileSystem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file. The path is normalized on the way in.
    pub fn add_file(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.insert(paths::normalize(&path.into()), contents.into());
    }

    /// Number of files in the overlay.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<P: Into<String>, C: Into<String>> FromIterator<(P, C)> for MemoryFileSystem {
    fn from_iter<T: IntoIterator<Item = (P, C)>>(iter: T) -> Self {
        let mut fs = Self::new();
        for (path, contents) in iter {
            fs.add_file(path, contents);
        }
        fs
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn read_file(&self, path: &str) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_memory_fs_is_file() {
        let mut mem = MemoryFileSystem::new();
        mem.add_file("/a/b.js", "export {}");

        assert!(mem.is_file("/a/b.js"));
        assert!(!mem.is_file("/a/b.ts"));
        assert!(!mem.is_file("/a"));
    }

    #[test]
    fn test_memory_fs_normalizes_keys() {
        let mut mem = MemoryFileSystem::new();
        mem.add_file("/a//b.js", "x");

        assert!(mem.is_file("/a/b.js"));
    }

    #[test]
    fn test_memory_fs_read_file() {
        let mem: MemoryFileSystem = [("/pkg/package.json", r#"{"main":"main.js"}"#)]
            .into_iter()
            .collect();

        assert_eq!(mem.read_file("/pkg/package.json").unwrap(), r#"{"main":"main.js"}"#);
        assert!(mem.read_file("/pkg/missing.json").is_err());
    }

    #[test]
    fn test_os_fs_round_trip() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("mod.js");
        fs::write(&file, "module.exports = {}").unwrap();

        let osfs = OsFileSystem;
        let path = file.to_string_lossy();
        assert!(osfs.is_file(&path));
        assert_eq!(osfs.read_file(&path).unwrap(), "module.exports = {}");
        assert!(!osfs.is_file(&dir.path().to_string_lossy()));
    }
}
