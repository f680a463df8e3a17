//! Directory-backed registry of uploaded PDFs.
//!
//! The upload root is the source of truth: a stored file exists exactly when
//! a file of that name with an allowed extension sits in the directory.
//! Callers go through the [`FileStore`] trait so the directory could be
//! swapped for a database without touching them.
//!
//! No locking is done across requests. Two concurrent writers of the same
//! name race and the last one wins.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, ShelfError};
use crate::io::PdfWriter;
use crate::utils::{has_allowed_extension, is_plain_name, sanitize_filename, sha256_file, split_extension};

/// A PDF held in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    /// Unique name within the upload root.
    pub name: String,

    /// Content size in bytes.
    pub size_bytes: u64,

    /// Last-modified time.
    pub modified: SystemTime,

    /// SHA-256 of the content, lower-case hex.
    pub content_hash: String,
}

/// Storage operations over uploaded PDFs.
pub trait FileStore: Send + Sync {
    /// All stored PDFs sorted by name, with size, mtime and content hash.
    fn list(&self) -> Result<Vec<StoredFile>>;

    /// Names of all stored PDFs, sorted. Cheaper than [`FileStore::list`].
    fn names(&self) -> Result<Vec<String>>;

    /// Path of an existing stored file.
    ///
    /// Fails with NotFound for unknown names, names with a disallowed
    /// extension, and names that are not a single path component.
    fn locate(&self, name: &str) -> Result<PathBuf>;

    /// Store new content under a sanitized, collision-free name.
    ///
    /// Returns the final name. Never overwrites an existing file.
    fn save(&self, incoming_name: &str, bytes: &[u8]) -> Result<String>;

    /// Overwrite the content of `existing_name` in place.
    ///
    /// `incoming_name` is the client-side name of the new content and must
    /// carry an allowed extension too.
    fn replace(&self, existing_name: &str, incoming_name: &str, bytes: &[u8]) -> Result<()>;

    /// Rename a stored file; returns the sanitized new name.
    fn rename(&self, old_name: &str, new_name: &str) -> Result<String>;

    /// Remove a stored file.
    fn delete(&self, name: &str) -> Result<()>;

    /// Where a new file called `name` (already sanitized) would be written.
    fn output_path(&self, name: &str) -> Result<PathBuf>;
}

/// [`FileStore`] over a flat directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
    allowed_extensions: Vec<String>,
    writer: PdfWriter,
}

impl DirStore {
    /// Create a store rooted at `root` accepting `allowed_extensions`.
    pub fn new(root: impl Into<PathBuf>, allowed_extensions: Vec<String>) -> Self {
        Self {
            root: root.into(),
            allowed_extensions,
            writer: PdfWriter::new(),
        }
    }

    /// Create a store over the configured upload root.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.upload_root, config.allowed_extensions.clone())
    }

    /// The upload root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_allowed(&self, name: &str) -> bool {
        has_allowed_extension(name, &self.allowed_extensions)
    }

    fn require_allowed(&self, name: &str, message: &str) -> Result<()> {
        if self.is_allowed(name) {
            Ok(())
        } else {
            Err(ShelfError::validation(message))
        }
    }

    /// First free name for `safe_name`: itself, then `stem_1.ext`, `stem_2.ext`, ...
    fn free_name(&self, safe_name: &str) -> Result<String> {
        if !self.root.join(safe_name).try_exists()? {
            return Ok(safe_name.to_string());
        }

        let (stem, ext) = split_extension(safe_name);
        let mut counter = 1u32;
        loop {
            let candidate = format!("{stem}_{counter}{ext}");
            if !self.root.join(&candidate).try_exists()? {
                return Ok(candidate);
            }
            counter += 1;
        }
    }

    fn stat(&self, name: String) -> Result<StoredFile> {
        let path = self.root.join(&name);
        let meta = std::fs::metadata(&path)?;
        Ok(StoredFile {
            size_bytes: meta.len(),
            modified: meta.modified()?,
            content_hash: sha256_file(&path)?,
            name,
        })
    }
}

impl FileStore for DirStore {
    fn list(&self) -> Result<Vec<StoredFile>> {
        let mut files = Vec::new();
        for name in self.names()? {
            match self.stat(name.clone()) {
                Ok(file) => files.push(file),
                // Removed between read_dir and stat.
                Err(e) => warn!(name = %name, error = %e, "skipping unreadable stored file"),
            }
        }
        Ok(files)
    }

    fn names(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_allowed(&name) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn locate(&self, name: &str) -> Result<PathBuf> {
        if !is_plain_name(name) || !self.is_allowed(name) {
            return Err(ShelfError::not_found("File not found"));
        }

        let path = self.root.join(name);
        if !path.is_file() {
            return Err(ShelfError::not_found("File not found"));
        }
        Ok(path)
    }

    fn save(&self, incoming_name: &str, bytes: &[u8]) -> Result<String> {
        self.require_allowed(incoming_name, "Only .pdf files are accepted")?;

        let safe = sanitize_filename(incoming_name);
        self.require_allowed(&safe, "File name is not usable after sanitizing")?;

        let name = self.free_name(&safe)?;
        let path = self.root.join(&name);

        // create_new keeps a concurrent save from being overwritten.
        let mut file = std::fs::File::options()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| ShelfError::FailedToWrite {
                path: path.clone(),
                source,
            })?;
        std::io::Write::write_all(&mut file, bytes).map_err(|source| ShelfError::FailedToWrite {
            path: path.clone(),
            source,
        })?;

        info!(name = %name, size = bytes.len(), "stored upload");
        Ok(name)
    }

    fn replace(&self, existing_name: &str, incoming_name: &str, bytes: &[u8]) -> Result<()> {
        self.require_allowed(existing_name, "Invalid file")?;
        self.require_allowed(incoming_name, "Uploaded file not a PDF")?;

        let path = self
            .locate(existing_name)
            .map_err(|_| ShelfError::not_found("Existing file not found"))?;

        self.writer.write_bytes(&path, bytes)?;
        info!(name = %existing_name, size = bytes.len(), "replaced content");
        Ok(())
    }

    fn rename(&self, old_name: &str, new_name: &str) -> Result<String> {
        if !self.is_allowed(old_name) || !self.is_allowed(new_name) {
            return Err(ShelfError::validation("Wrong extension; must be .pdf"));
        }

        let new_safe = sanitize_filename(new_name);
        self.require_allowed(&new_safe, "Wrong extension; must be .pdf")?;

        let old_path = self.locate(old_name)?;
        let new_path = self.root.join(&new_safe);
        if new_path.try_exists()? {
            return Err(ShelfError::conflict("Target filename exists"));
        }

        std::fs::rename(&old_path, &new_path)?;
        info!(from = %old_name, to = %new_safe, "renamed stored file");
        Ok(new_safe)
    }

    fn delete(&self, name: &str) -> Result<()> {
        if !is_plain_name(name) {
            return Err(ShelfError::not_found("File not found"));
        }

        let path = self.root.join(name);
        if !path.is_file() {
            return Err(ShelfError::not_found("File not found"));
        }

        std::fs::remove_file(&path)?;
        info!(name = %name, "deleted stored file");
        Ok(())
    }

    fn output_path(&self, name: &str) -> Result<PathBuf> {
        if !is_plain_name(name) || !self.is_allowed(name) {
            return Err(ShelfError::validation(format!("Invalid output name: {name}")));
        }
        Ok(self.root.join(name))
    }
}
