// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name given to a downloaded ledger export.
pub const LEDGER_EXPORT_FILENAME: &str = "ledger-export.csv";

/// Returns the file name given to the receipt for `ledger_entry_id`.
#[must_use]
pub fn receipt_filename(ledger_entry_id: i64) -> String {
    format!("receipt-{ledger_entry_id}.pdf")
}

/// A binary response ready to hand to the user as a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Delivers downloaded files to the user.
pub trait DownloadSink: Send + Sync {
    /// Delivers `download`, returning where it ended up.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    fn deliver(&self, download: &Download) -> io::Result<PathBuf>;
}

/// Writes downloads into a directory, overwriting files of the same name.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `directory`.
    #[must_use]
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Returns the target directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&self, download: &Download) -> io::Result<PathBuf> {
        let name: &str = Path::new(&download.filename)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid download file name: {}", download.filename),
                )
            })?;
        fs::create_dir_all(&self.directory)?;
        let path: PathBuf = self.directory.join(name);
        fs::write(&path, &download.bytes)?;
        info!(path = %path.display(), bytes = download.bytes.len(), "Saved download");
        Ok(path)
    }
}
