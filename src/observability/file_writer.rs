//! Rotating log file with size-based rotation and backup retention.
//!
//! [`RotatingFile`] implements [`MakeWriter`] so it can be handed straight to a
//! `tracing-subscriber` fmt layer. Each formatted event is appended as one write;
//! once the file grows past its size limit it is renamed to
//! `<name>.<timestamp>` and a fresh file is started.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe, size-rotated log file.
///
/// The file is opened lazily on the first write, so construction never fails.
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    file: Mutex<Option<File>>,
}

impl RotatingFile {
    /// Creates a writer for `path` with the default limits.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limits(path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer for `path` rotating past `max_bytes` and keeping
    /// `max_backups` old files.
    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            max_backups,
            file: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `record`, rotating first if the file is over its limit.
    ///
    /// # Errors
    ///
    /// Returns an error if rotating, opening, or writing the file fails, or if
    /// the lock was poisoned.
    pub fn append(&self, record: &[u8]) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut file)?;

        if file.is_none() {
            *file = Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.path)?,
            );
        }
        let handle = file
            .as_mut()
            .ok_or_else(|| io::Error::other("No file available"))?;

        handle.write_all(record)?;
        handle.flush()
    }

    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.path) {
            if metadata.len() > self.max_bytes {
                *file = None;
                self.rotate()?;
            }
        }
        Ok(())
    }

    /// Renames the current file to a timestamped backup and prunes old backups.
    fn rotate(&self) -> io::Result<()> {
        let mut stamp = chrono::Utc::now().timestamp_micros();
        let mut backup = self.backup_path(stamp);
        while backup.exists() {
            stamp += 1;
            backup = self.backup_path(stamp);
        }

        if self.path.exists() {
            fs::rename(&self.path, &backup)?;
        }

        self.cleanup_old_backups()
    }

    fn backup_path(&self, stamp: i64) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(format!(".{stamp}"));
        self.path.with_file_name(name)
    }

    /// Backups of this file, newest first.
    fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = format!(
            "{}.",
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| io::Error::other("Invalid file name"))?
        );

        let mut backups: Vec<(i64, PathBuf)> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter_map(|path| {
                let stamp = path
                    .file_name()?
                    .to_str()?
                    .strip_prefix(&prefix)?
                    .parse::<i64>()
                    .ok()?;
                Some((stamp, path))
            })
            .collect();

        backups.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(backups.into_iter().map(|(_, path)| path).collect())
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        for old in self.backups()?.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}

/// Per-event writer handed out by [`RotatingFile`].
#[derive(Debug)]
pub struct RotatingWriter<'a> {
    target: &'a RotatingFile,
}

impl Write for RotatingWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.target.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for RotatingFile {
    type Writer = RotatingWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriter { target: self }
    }
}
