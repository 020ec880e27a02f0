use std::fs;
use std::io;
use std::path::PathBuf;

use snafu::{ResultExt, Snafu};
use tracing::{info, warn};

#[derive(Debug, Snafu)]
pub enum CheckpointError {
    #[snafu(display("Failed to write checkpoint file {}: {source}", path.display()))]
    Write { path: PathBuf, source: io::Error },
}

pub type CheckpointResult<T> = std::result::Result<T, CheckpointError>;

/// Durable cursor: the highest post id already processed, stored as a
/// newline-terminated decimal string.
pub struct CheckpointFile {
    path: PathBuf,
}

impl CheckpointFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored id. A missing or unreadable file means a first
    /// run, not an error.
    pub fn load(&self) -> Option<u64> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No checkpoint file, treating as first run");
                return None;
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Unreadable checkpoint, treating as first run");
                return None;
            }
        };

        match contents.trim().parse() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!(path = %self.path.display(), "Unparsable checkpoint, treating as first run");
                None
            }
        }
    }

    pub fn store(&self, id: u64) -> CheckpointResult<()> {
        fs::write(&self.path, format!("{id}\n")).context(WriteSnafu {
            path: self.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_an_id() {
        let dir = tempfile::tempdir().expect("tempdir");
        let checkpoint = CheckpointFile::new(dir.path().join("last_message_id.txt"));

        checkpoint.store(574398200).expect("store");
        assert_eq!(checkpoint.load(), Some(574398200));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let checkpoint = CheckpointFile::new(dir.path().join("nope.txt"));

        assert_eq!(checkpoint.load(), None);
    }

    #[test]
    fn garbage_contents_load_as_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("last_message_id.txt");
        std::fs::write(&path, "not a number\n").expect("write");

        assert_eq!(CheckpointFile::new(path).load(), None);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("last_message_id.txt");
        std::fs::write(&path, "  574398129\n").expect("write");

        assert_eq!(CheckpointFile::new(path).load(), Some(574398129));
    }
}
