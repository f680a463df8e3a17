//! Organizing stored PDFs into category folders.
//!
//! Two modes are supported:
//!
//! - **Keyword**: every `keyword -> folder` pair copies matching PDFs into
//!   `organized_root/folder` and regenerates `folder_Merged.pdf` from the
//!   folder's current contents.
//! - **Year**: every stored PDF is copied into `organized_root/YYYY` using
//!   its creation year (or last-modified year).
//!
//! Copies are only made when the destination is absent, so both modes can be
//! re-run without duplicating anything.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, ShelfError};
use crate::merge::Merger;
use crate::metadata::MetadataReader;
use crate::store::FileStore;
use crate::utils::{has_allowed_extension, sanitize_filename};

/// Suffix of the merged output inside a keyword category folder.
pub const MERGED_SUFFIX: &str = "_Merged.pdf";

/// Outcome of one keyword category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    /// Folder name under the organized root.
    pub category: String,
    /// File name of the merged output inside the folder.
    pub merged: String,
}

/// Where year mode placed a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearPlacement {
    /// Stored file name.
    pub name: String,
    /// Four-digit year folder it was placed in.
    pub year: String,
}

/// Copies stored PDFs into category folders under the organized root.
pub struct Organizer {
    store: Arc<dyn FileStore>,
    organized_root: PathBuf,
    allowed_extensions: Vec<String>,
    metadata: MetadataReader,
    merger: Merger,
}

impl Organizer {
    /// Create an organizer reading from `store` and writing below `organized_root`.
    pub fn new(
        store: Arc<dyn FileStore>,
        organized_root: impl Into<PathBuf>,
        allowed_extensions: Vec<String>,
    ) -> Self {
        Self {
            store,
            organized_root: organized_root.into(),
            allowed_extensions,
            metadata: MetadataReader::new(),
            merger: Merger::new(),
        }
    }

    /// Organize by keyword.
    ///
    /// Pairs are processed in keyword order. A stored PDF matches when the
    /// keyword occurs, case-insensitively, in its name or its extracted text.
    /// Only keywords with at least one match appear in the result.
    ///
    /// # Errors
    ///
    /// Returns a validation error, before anything is copied, when any folder
    /// name is empty after sanitizing, and an internal error if a merge fails.
    pub fn organize_keywords(&self, mapping: &BTreeMap<String, String>) -> Result<Vec<CategoryResult>> {
        let pairs = mapping
            .iter()
            .map(|(keyword, folder_name)| {
                let category = sanitize_filename(folder_name);
                if category.is_empty() {
                    return Err(ShelfError::validation(format!(
                        "Invalid folder name for keyword '{keyword}'"
                    )));
                }
                Ok((keyword, keyword.to_lowercase(), category))
            })
            .collect::<Result<Vec<_>>>()?;

        let names = self.store.names()?;
        let mut texts: HashMap<String, String> = HashMap::new();
        let mut results = Vec::new();

        for (keyword, needle, category) in pairs {
            let folder = self.organized_root.join(&category);
            std::fs::create_dir_all(&folder)?;

            let mut matched = 0usize;
            for name in &names {
                if !self.matches(name, &needle, &mut texts)? {
                    continue;
                }
                let source = self.store.locate(name)?;
                copy_if_absent(&source, &folder.join(name))?;
                matched += 1;
            }

            if matched == 0 {
                debug!(keyword = %keyword, "keyword matched nothing");
                continue;
            }

            let merged = format!("{category}{MERGED_SUFFIX}");
            let members = self.folder_members(&folder, &merged)?;
            let stats = self.merger.merge_to(&members, &folder.join(&merged))?;

            info!(
                keyword = %keyword,
                category = %category,
                matched,
                members = stats.files_merged,
                pages = stats.total_pages,
                "organized keyword category"
            );
            results.push(CategoryResult { category, merged });
        }

        Ok(results)
    }

    /// Organize by creation year.
    pub fn organize_by_year(&self) -> Result<Vec<YearPlacement>> {
        let mut placed = Vec::new();

        for name in self.store.names()? {
            let source = self.store.locate(&name)?;
            let year = self.metadata.read_creation_year(&source).into_inner();

            let folder = self.organized_root.join(&year);
            std::fs::create_dir_all(&folder)?;
            copy_if_absent(&source, &folder.join(&name))?;

            placed.push(YearPlacement { name, year });
        }

        info!(files = placed.len(), "organized by year");
        Ok(placed)
    }

    fn matches(&self, name: &str, needle: &str, texts: &mut HashMap<String, String>) -> Result<bool> {
        if name.to_lowercase().contains(needle) {
            return Ok(true);
        }

        if !texts.contains_key(name) {
            let path = self.store.locate(name)?;
            let text = self.metadata.read_text(&path).into_inner().to_lowercase();
            texts.insert(name.to_string(), text);
        }
        Ok(texts.get(name).is_some_and(|text| text.contains(needle)))
    }

    /// PDFs currently in `folder`, sorted by name, without the merged output.
    fn folder_members(&self, folder: &Path, merged: &str) -> Result<Vec<PathBuf>> {
        let mut members = Vec::new();
        for entry in std::fs::read_dir(folder)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == merged
                || !entry.file_type()?.is_file()
                || !has_allowed_extension(&name, &self.allowed_extensions)
            {
                continue;
            }
            members.push(entry.path());
        }
        members.sort();
        Ok(members)
    }
}

fn copy_if_absent(source: &Path, dest: &Path) -> Result<bool> {
    if dest.try_exists()? {
        return Ok(false);
    }
    std::fs::copy(source, dest)?;
    debug!(from = %source.display(), to = %dest.display(), "copied into category");
    Ok(true)
}
