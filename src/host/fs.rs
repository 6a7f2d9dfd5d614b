//! Filesystem access used by the lifecycle commands

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

/// Filesystem operations the commands rely on
pub trait FileSystem: Send + Sync {
    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// True when the directory has no entries at all
    fn is_empty_dir(&self, path: &Path) -> io::Result<bool>;

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Append `line` plus a newline, creating the file if needed
    fn append_line(&self, path: &Path, line: &str) -> io::Result<()>;
}

/// The local disk
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileSystem for LocalFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn is_empty_dir(&self, path: &Path) -> io::Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn append_line(&self, path: &Path, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", line)
    }
}
