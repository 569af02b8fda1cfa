//! Scoped copies of locked browser databases.
//!
//! Browsers keep their history database open (and locked) while running, so
//! queries go against a copy placed in a scratch directory. The copy is
//! removed when the [`Snapshot`] is dropped, on every exit path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

pub struct Snapshot {
    path: PathBuf,
}

impl Snapshot {
    /// Copy `source` to `<scratch_dir>/<name>`.
    ///
    /// A copy that fails half way is removed before the error is returned.
    pub fn take(source: &Path, scratch_dir: &Path, name: &str) -> io::Result<Self> {
        fs::create_dir_all(scratch_dir)?;
        let path = scratch_dir.join(name);
        let snapshot = Self { path };
        fs::copy(source, &snapshot.path)?;
        debug!(
            "snapshot {} -> {}",
            source.display(),
            snapshot.path.display()
        );
        Ok(snapshot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> rusqlite::Result<Connection> {
        Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }
}

impl Drop for Snapshot {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to remove snapshot {}: {err}", self.path.display()),
        }
    }
}
