//! Client-side delivery of generated PDFs.
//!
//! A browser saves a download by materialising a temporary object, handing it
//! to the save flow, and releasing it straight after. [`DownloadsFolder`]
//! mirrors that: bytes go to a uniquely named hidden temporary file next to
//! the target, which is linked into place without clobbering (or removed on
//! failure) before `deliver` returns. Existing files are never overwritten;
//! a numbered name such as `cover_letter (1).pdf` is chosen instead.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, PersistError};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on numbered name attempts before giving up.
const MAX_NAME_ATTEMPTS: usize = 1000;

/// Failure while saving a generated file.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid file name '{0}'")]
    InvalidFileName(String),
    #[error("no free file name for '{0}' in {1}")]
    NoFreeName(String, String),
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Destination for generated files.
pub trait DownloadSink: Send + Sync {
    /// Saves `bytes` under (a variant of) `file_name` and returns the final path.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError>;
}

/// Saves downloads into a directory on disk.
#[derive(Debug, Clone)]
pub struct DownloadsFolder {
    dir: PathBuf,
}

impl DownloadsFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DownloadsFolder {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, DeliveryError> {
        if file_name.is_empty() || Path::new(file_name).file_name().is_none_or(|name| name != file_name) {
            return Err(DeliveryError::InvalidFileName(file_name.to_string()));
        }
        fs::create_dir_all(&self.dir)?;

        // Dropping the handle on any early return removes the temporary file.
        let mut temp = Builder::new()
            .prefix(&format!(".{file_name}."))
            .suffix(".part")
            .tempfile_in(&self.dir)?;
        temp.write_all(bytes)?;
        temp.as_file().sync_all()?;

        let target = persist_under_free_name(temp, &self.dir, file_name)?;
        info!(path = %target.display(), len = bytes.len(), "saved download");
        Ok(target)
    }
}

/// Links `temp` to `dir/file_name` or the first free `stem (n).ext` variant.
///
/// Each candidate is claimed with a no-clobber persist, so a file created by
/// another process between attempts is skipped rather than replaced.
fn persist_under_free_name(mut temp: NamedTempFile, dir: &Path, file_name: &str) -> Result<PathBuf, DeliveryError> {
    for attempt in 0..=MAX_NAME_ATTEMPTS {
        let name = numbered_name(file_name, attempt);
        let target = dir.join(&name);
        match temp.persist_noclobber(&target) {
            Ok(_) => {
                if attempt > 0 {
                    debug!(name = %name, "download name taken; using numbered variant");
                }
                return Ok(target);
            }
            Err(PersistError { error, file }) if error.kind() == ErrorKind::AlreadyExists => temp = file,
            Err(PersistError { error, .. }) => {
                warn!(path = %target.display(), error = %error, "failed to move download into place");
                return Err(error.into());
            }
        }
    }

    Err(DeliveryError::NoFreeName(file_name.to_string(), dir.display().to_string()))
}

/// `file_name` for attempt 0, `stem (n).ext` afterwards.
fn numbered_name(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => format!("{stem} ({attempt}).{extension}"),
        _ => format!("{file_name} ({attempt})"),
    }
}
