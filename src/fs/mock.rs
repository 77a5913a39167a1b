// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashMap;
use std::io::{self, BufRead, Cursor, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

#[derive(Debug, Clone)]
struct MockFile {
    contents: Vec<u8>,
    modified: SystemTime,
}

/// In-memory filesystem with explicit modification times.
///
/// Clones share the same underlying files, so a test can keep one handle
/// while the code under test owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockFile>>>,
    /// Paths whose metadata lookups fail with a non-"not found" error.
    broken: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace a file with the given contents and modification time.
    pub fn set_file(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>, modified: SystemTime) {
        let mut files = self.files.lock().unwrap();
        files.insert(
            path.as_ref().to_path_buf(),
            MockFile {
                contents: contents.into(),
                modified,
            },
        );
    }

    /// Convenience: set a file whose mtime is `secs` seconds after the epoch.
    pub fn set_file_at(&self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>, secs: u64) {
        self.set_file(
            path,
            contents,
            SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        );
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    /// Make metadata lookups for `path` fail with a permission error.
    pub fn break_metadata(&self, path: impl AsRef<Path>) {
        self.broken.lock().unwrap().push(path.as_ref().to_path_buf());
    }

    /// Current contents of `path` as UTF-8, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.lock().unwrap();
        files
            .get(path.as_ref())
            .map(|f| String::from_utf8_lossy(&f.contents).into_owned())
    }
}

impl FileSystem for MockFileSystem {
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        if self.broken.lock().unwrap().iter().any(|p| p == path) {
            return Err(io::Error::new(
                ErrorKind::PermissionDenied,
                format!("metadata unavailable for {:?}", path),
            ));
        }
        let files = self.files.lock().unwrap();
        Ok(files.get(path).map(|f| f.modified))
    }

    fn open_lines(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(file) => Ok(Box::new(Cursor::new(file.contents.clone()))),
            None => Err(io::Error::new(
                ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )),
        }
    }

    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut files = self.files.lock().unwrap();
        let file = files.entry(path.to_path_buf()).or_insert_with(|| MockFile {
            contents: Vec::new(),
            modified: SystemTime::UNIX_EPOCH,
        });
        file.contents.extend_from_slice(contents);
        file.modified = SystemTime::now();
        Ok(())
    }
}
