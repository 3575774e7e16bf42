//! Append-only trade log
//!
//! One timestamped line per entry, exit and summary line, synced after every
//! write. Errors here are fatal to the run.

use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Durable human-readable trade log
pub struct TradeJournal {
    path: PathBuf,
    file: File,
}

impl TradeJournal {
    /// Open (creating parent directories) for appending
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `[YYYY-MM-DD HH:MM:SS] message`
    pub fn append(&mut self, at: NaiveDateTime, message: &str) -> std::io::Result<()> {
        writeln!(self.file, "[{}] {}", at.format("%Y-%m-%d %H:%M:%S"), message)?;
        self.file.flush()?;
        self.file.sync_data()
    }
}
