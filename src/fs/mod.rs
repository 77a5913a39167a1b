// src/fs/mod.rs

//! Filesystem seam used by the poll loop, the batch loader and the session log.
//!
//! Production code uses [`RealFileSystem`]; tests can swap in
//! [`mock::MockFileSystem`] to control modification times and inspect
//! appended records without touching disk.

use std::fmt::Debug;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::Path;
use std::time::SystemTime;

pub mod mock;

/// Abstract filesystem interface.
pub trait FileSystem: Send + Sync + Debug {
    /// Modification time of `path`, or `Ok(None)` if it does not exist.
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>>;

    /// Open `path` for buffered, line-oriented reading.
    fn open_lines(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>>;

    /// Append `contents` to `path`, creating it if needed.
    ///
    /// The handle is scoped to this call: it is closed before returning,
    /// whether or not the write succeeded.
    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        match fs::metadata(path) {
            Ok(meta) => meta.modified().map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn open_lines(&self, path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn append(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // One write per record so concurrent appenders never split a line.
        file.write_all(contents)
    }
}
