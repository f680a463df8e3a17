//! Configuration for pdfshelf.
//!
//! A [`Config`] is built once at startup (by the server's CLI layer) and
//! handed to every component. It holds:
//! - The upload root (flat directory of stored originals)
//! - The organized root (one subfolder per category)
//! - The request size limit
//! - The accepted file extensions

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Result, ShelfError};
use crate::utils::has_allowed_extension;

/// Default request size limit: 200 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Default bind address for the web server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Runtime configuration shared by the store, organizer and server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding every uploaded PDF.
    pub upload_root: PathBuf,

    /// Directory holding one subfolder per category.
    pub organized_root: PathBuf,

    /// Maximum size of a single request body, in bytes.
    pub max_upload_bytes: usize,

    /// Accepted extensions, lower-case and including the leading dot.
    pub allowed_extensions: Vec<String>,

    /// Address the web server listens on.
    pub bind_addr: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_storage_root("storage")
    }
}

impl Config {
    /// Create a configuration whose two roots live under `root`
    /// (`root/uploads` and `root/organized`).
    pub fn with_storage_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            upload_root: root.join("uploads"),
            organized_root: root.join("organized"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_extensions: vec![".pdf".to_string()],
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5000))),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The upload and organized roots are the same directory
    /// - The size limit is zero
    /// - No extension is allowed, or an extension lacks its leading dot
    pub fn validate(&self) -> Result<()> {
        if self.upload_root == self.organized_root {
            return Err(ShelfError::invalid_config(format!(
                "Upload and organized roots must differ: {}",
                self.upload_root.display()
            )));
        }

        if self.max_upload_bytes == 0 {
            return Err(ShelfError::invalid_config(
                "Maximum upload size must be at least 1 byte",
            ));
        }

        if self.allowed_extensions.is_empty() {
            return Err(ShelfError::invalid_config(
                "At least one allowed extension is required",
            ));
        }

        if let Some(ext) = self
            .allowed_extensions
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ShelfError::invalid_config(format!(
                "Invalid extension '{ext}'. Expected a form like '.pdf'"
            )));
        }

        Ok(())
    }

    /// Create both storage roots if they do not exist yet.
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.upload_root)?;
        std::fs::create_dir_all(&self.organized_root)?;
        Ok(())
    }

    /// Whether `name` carries one of the allowed extensions (case-insensitive).
    pub fn is_allowed(&self, name: &str) -> bool {
        has_allowed_extension(name, &self.allowed_extensions)
    }
}
