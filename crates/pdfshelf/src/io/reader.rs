//! PDF loading.
//!
//! Thin wrapper over `lopdf::Document::load` that turns a missing path into
//! [`ShelfError::NotFound`] and a parse failure into
//! [`ShelfError::FailedToLoadPdf`] carrying the library message verbatim.

use lopdf::Document;
use std::path::Path;

use crate::error::{Result, ShelfError};

/// A loaded PDF document with the data callers usually need next to it.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Number of pages in the document.
    pub page_count: usize,
}

/// PDF reader.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is a directory
    /// - The file is not a PDF `lopdf` can parse
    pub fn load(&self, path: &Path) -> Result<LoadedPdf> {
        Self::check_path_exists(path)?;

        let document = Document::load(path)
            .map_err(|e| ShelfError::failed_to_load_pdf(path.to_path_buf(), e.to_string()))?;
        let page_count = document.get_pages().len();

        Ok(LoadedPdf {
            document,
            page_count,
        })
    }

    /// Fail with NotFound unless `path` is an existing regular file.
    pub fn check_path_exists(path: &Path) -> Result<()> {
        if !path.try_exists()? || !path.is_file() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            return Err(ShelfError::not_found(format!("File missing: {name}")));
        }
        Ok(())
    }
}
