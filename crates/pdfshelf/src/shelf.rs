//! The [`Shelf`] facade: every user-facing operation in one place.
//!
//! The web layer talks only to this type. It wires the store, metadata
//! reader, merger and organizer together over one [`Config`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Result, ShelfError};
use crate::merge::Merger;
use crate::metadata::MetadataReader;
use crate::organize::{CategoryResult, Organizer, YearPlacement};
use crate::store::{DirStore, FileStore};
use crate::utils::{local_iso, sanitize_filename, unix_seconds};

/// Output name used when a merge request does not name one.
pub const DEFAULT_MERGE_OUTPUT: &str = "merged.pdf";

/// One row of the file listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileEntry {
    /// Stored file name.
    pub name: String,
    /// Declared title, or the file name.
    pub title: String,
    /// Size in bytes.
    pub size: u64,
    /// Seconds since the Unix epoch.
    pub mtime: f64,
    /// Local-time ISO-8601 form of `mtime`.
    pub mtime_iso: String,
    /// SHA-256 of the content.
    pub hash: String,
}

/// Entry point for uploading, listing, merging and organizing PDFs.
pub struct Shelf {
    config: Config,
    store: Arc<dyn FileStore>,
    metadata: MetadataReader,
    merger: Merger,
    organizer: Organizer,
}

impl Shelf {
    /// Build a shelf over the directories named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the storage roots
    /// cannot be created.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        config.ensure_dirs()?;
        let store: Arc<dyn FileStore> = Arc::new(DirStore::from_config(&config));
        Ok(Self::with_store(config, store))
    }

    /// Build a shelf over a custom store.
    pub fn with_store(config: Config, store: Arc<dyn FileStore>) -> Self {
        let organizer = Organizer::new(
            Arc::clone(&store),
            &config.organized_root,
            config.allowed_extensions.clone(),
        );
        Self {
            config,
            store,
            metadata: MetadataReader::new(),
            merger: Merger::new(),
            organizer,
        }
    }

    /// The configuration this shelf was opened with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// All stored PDFs with their derived title.
    pub fn list(&self) -> Result<Vec<FileEntry>> {
        let files = self.store.list()?;
        let entries = files
            .into_iter()
            .map(|file| {
                let title = match self.store.locate(&file.name) {
                    Ok(path) => self.metadata.read_title(&path).into_inner(),
                    Err(_) => file.name.clone(),
                };
                FileEntry {
                    title,
                    size: file.size_bytes,
                    mtime: unix_seconds(file.modified),
                    mtime_iso: local_iso(file.modified),
                    hash: file.content_hash,
                    name: file.name,
                }
            })
            .collect();
        Ok(entries)
    }

    /// Path of a stored PDF, for download.
    pub fn locate(&self, name: &str) -> Result<PathBuf> {
        self.store.locate(name)
    }

    /// Store each `(client_name, bytes)` upload; returns the stored names.
    ///
    /// Uploads that are not PDFs, or whose name is unusable after
    /// sanitizing, are skipped.
    pub fn upload(&self, files: Vec<(String, Vec<u8>)>) -> Result<Vec<String>> {
        let mut saved = Vec::with_capacity(files.len());
        for (client_name, bytes) in files {
            match self.store.save(&client_name, &bytes) {
                Ok(name) => saved.push(name),
                Err(ShelfError::Validation { message }) => {
                    debug!(name = %client_name, reason = %message, "skipping upload");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(saved)
    }

    /// Replace the content of `existing_name`.
    pub fn replace(&self, existing_name: &str, incoming_name: &str, bytes: &[u8]) -> Result<()> {
        self.store.replace(existing_name, incoming_name, bytes)
    }

    /// Rename a stored PDF; returns the sanitized new name.
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<String> {
        self.store.rename(old_name, new_name)
    }

    /// Delete a stored PDF.
    pub fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(name)
    }

    /// Merge stored PDFs, in order, into a new stored PDF; returns its name.
    ///
    /// The output name defaults to [`DEFAULT_MERGE_OUTPUT`], is sanitized and
    /// gets a `.pdf` suffix when missing. An existing file of that name is
    /// overwritten.
    ///
    /// # Errors
    ///
    /// - Validation when `files` is empty
    /// - NotFound (`File missing: <name>`) when any input does not exist
    /// - An internal error carrying the PDF library message when merging fails
    pub fn merge(&self, files: &[String], output_name: Option<&str>) -> Result<String> {
        if files.is_empty() {
            return Err(ShelfError::validation("No files selected"));
        }

        let output = merge_output_name(output_name);
        let output_path = self.store.output_path(&output)?;

        let inputs = files
            .iter()
            .map(|name| {
                self.store
                    .locate(name)
                    .map_err(|_| ShelfError::not_found(format!("File missing: {name}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let stats = self.merger.merge_to(&inputs, &output_path)?;
        info!(
            output = %output,
            files = stats.files_merged,
            pages = stats.total_pages,
            bytes = stats.output_size,
            "merged stored files"
        );
        Ok(output)
    }

    /// Organize by keyword; see [`Organizer::organize_keywords`].
    pub fn organize_keywords(&self, mapping: &BTreeMap<String, String>) -> Result<Vec<CategoryResult>> {
        if mapping.is_empty() {
            return Err(ShelfError::validation("map required for keyword mode"));
        }
        self.organizer.organize_keywords(mapping)
    }

    /// Organize by creation year; see [`Organizer::organize_by_year`].
    pub fn organize_by_year(&self) -> Result<Vec<YearPlacement>> {
        self.organizer.organize_by_year()
    }
}

fn merge_output_name(requested: Option<&str>) -> String {
    let safe = sanitize_filename(requested.unwrap_or(DEFAULT_MERGE_OUTPUT));
    if safe.is_empty() {
        return DEFAULT_MERGE_OUTPUT.to_string();
    }
    if safe.to_ascii_lowercase().ends_with(".pdf") {
        safe
    } else {
        format!("{safe}.pdf")
    }
}
