//! PDF and byte writing.
//!
//! Outputs are written to a temporary sibling and renamed into place, so a
//! reader never observes a half-written merged PDF or replaced upload.

use lopdf::Document;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, ShelfError};

/// Buffer size used when serializing documents.
const WRITE_BUFFER_SIZE: usize = 8 * 1024;

/// Writes compressed PDFs and raw bytes through a temp file and rename.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new PDF writer.
    pub fn new() -> Self {
        Self
    }

    /// Compress and save a PDF document to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ShelfError::FailedToWrite`] if the file cannot be created,
    /// serialized, flushed or renamed into place.
    pub fn save(&self, doc: &mut Document, path: &Path) -> Result<u64> {
        doc.compress();

        write_atomic(path, |file| {
            let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
            doc.save_to(&mut writer).map_err(std::io::Error::other)?;
            writer.flush()
        })
    }

    /// Write raw bytes to `path` with the same temp-and-rename discipline.
    pub fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<u64> {
        write_atomic(path, |mut file| {
            file.write_all(bytes)?;
            file.flush()
        })
    }
}

fn write_atomic<F>(path: &Path, write: F) -> Result<u64>
where
    F: FnOnce(File) -> std::io::Result<()>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let failed = |source| ShelfError::FailedToWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(&temp_path).map_err(failed)?;
    if let Err(e) = write(file) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(failed(e));
    }

    std::fs::rename(&temp_path, path).map_err(failed)?;
    Ok(std::fs::metadata(path).map(|m| m.len()).unwrap_or(0))
}

/// Temp sibling for `path`: `dir/.name.tmp`.
///
/// The leading dot and `.tmp` suffix keep it out of `.pdf` listings.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
