//! Core PDF merging implementation.
//!
//! Documents are appended in the given order: each incoming document is
//! renumbered past the merged document's highest object id, its objects are
//! moved over, and its pages are attached to the root `Pages` node.

use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, ShelfError};
use crate::io::{PdfReader, PdfWriter};

/// Statistics about a merge operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeStatistics {
    /// Number of PDFs merged.
    pub files_merged: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Size of the written output in bytes (0 when nothing was written).
    pub output_size: u64,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    reader: PdfReader,
    writer: PdfWriter,
}

impl Merger {
    /// Create a new merger with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the PDFs at `paths`, in order, into one in-memory document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `paths` is empty
    /// - Any input is missing ([`ShelfError::NotFound`])
    /// - Any input cannot be parsed, or the page tree cannot be patched
    pub fn merge(&self, paths: &[PathBuf]) -> Result<(Document, MergeStatistics)> {
        if paths.is_empty() {
            return Err(ShelfError::validation("No files selected"));
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let loaded = self.reader.load(path)?;
            debug!(path = %path.display(), pages = loaded.page_count, "loaded merge input");
            documents.push(loaded.document);
        }

        let mut documents = documents.into_iter();
        let Some(mut merged) = documents.next() else {
            return Err(ShelfError::validation("No files selected"));
        };

        let mut max_id = merged.max_id;

        for mut doc in documents {
            // Avoid object id collisions by renumbering the incoming document
            doc.renumber_objects_with(max_id + 1);
            max_id = doc.max_id;

            let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

            merged.objects.extend(doc.objects);
            merged.max_id = max_id;

            Self::append_pages_to_page_tree(&mut merged, page_ids)?;
        }

        merged.renumber_objects();

        let stats = MergeStatistics {
            files_merged: paths.len(),
            total_pages: merged.get_pages().len(),
            output_size: 0,
        };

        Ok((merged, stats))
    }

    /// Merge `paths` and write the result to `output`.
    pub fn merge_to(&self, paths: &[PathBuf], output: &Path) -> Result<MergeStatistics> {
        let (mut document, mut stats) = self.merge(paths)?;
        stats.output_size = self.writer.save(&mut document, output)?;

        debug!(
            output = %output.display(),
            files = stats.files_merged,
            pages = stats.total_pages,
            "wrote merged PDF"
        );

        Ok(stats)
    }

    /// Append page references to the merged document's root Pages dictionary.
    fn append_pages_to_page_tree(merged: &mut Document, page_ids: Vec<ObjectId>) -> Result<()> {
        let pages_id = merged.catalog()?.get(b"Pages")?.as_reference()?;
        let pages_dict = merged.get_object_mut(pages_id)?.as_dict_mut()?;

        let added = page_ids.len() as i64;
        let kids = pages_dict.get_mut(b"Kids")?.as_array_mut()?;
        kids.extend(page_ids.into_iter().map(Object::Reference));

        let current_count = pages_dict.get(b"Count")?.as_i64()?;
        pages_dict.set("Count", Object::Integer(current_count + added));

        Ok(())
    }
}
