// src/download.rs

use crate::error::SubmissionError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Save rendered PDF bytes as `dir/filename`.
///
/// The bytes go to a temporary file in `dir` first and are only renamed into
/// place once fully written. If anything fails the temporary file is removed
/// when the handle drops, so no partial `invoice.pdf` is ever left behind.
pub fn save_pdf(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, SubmissionError> {
    let target = dir.join(filename);
    let save_err = |source: std::io::Error| SubmissionError::Save {
        path: target.display().to_string(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(save_err)?;
    debug!(tmp = %tmp.path().display(), "Temporary download handle acquired");

    tmp.write_all(bytes).map_err(save_err)?;
    tmp.as_file().sync_all().map_err(save_err)?;
    tmp.persist(&target).map_err(|e| save_err(e.error))?;

    info!(path = %target.display(), bytes = bytes.len(), "PDF saved");
    Ok(target)
}
