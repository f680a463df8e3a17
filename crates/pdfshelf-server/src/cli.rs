//! CLI argument parsing for pdfshelf-server.
//!
//! Every flag can also be set through a `PDFSHELF_*` environment variable.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//! use pdfshelf_server::cli::Cli;
//!
//! let cli = Cli::parse();
//! let config = cli.to_config().unwrap();
//! println!("serving {} on {}", config.upload_root.display(), config.bind_addr);
//! ```

use clap::Parser;
use pdfshelf::config::{Config, DEFAULT_BIND_ADDR};
use pdfshelf::error::{Result, ShelfError};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default request size limit in MiB.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// Upload, organize and merge PDF files from the browser.
#[derive(Parser, Debug)]
#[command(name = "pdfshelf-server")]
#[command(version)]
#[command(about = "Web service for organizing and merging PDF files", long_about = None)]
#[command(author)]
pub struct Cli {
    /// Directory holding `uploads/` and `organized/`
    ///
    /// Used for whichever of --upload-dir and --organized-dir is not given.
    #[arg(long, value_name = "DIR", env = "PDFSHELF_STORAGE_DIR", default_value = "storage")]
    pub storage_dir: PathBuf,

    /// Directory for uploaded PDFs
    #[arg(long, value_name = "DIR", env = "PDFSHELF_UPLOAD_DIR")]
    pub upload_dir: Option<PathBuf>,

    /// Directory for category folders
    #[arg(long, value_name = "DIR", env = "PDFSHELF_ORGANIZED_DIR")]
    pub organized_dir: Option<PathBuf>,

    /// Maximum request body size in MiB
    ///
    /// Larger requests are rejected with 413 before any handler runs.
    #[arg(long, value_name = "MB", env = "PDFSHELF_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    pub max_upload_mb: usize,

    /// Address to listen on
    #[arg(short, long, value_name = "ADDR", env = "PDFSHELF_BIND", default_value = DEFAULT_BIND_ADDR)]
    pub bind: SocketAddr,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments to a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if the size limit overflows or the resulting
    /// configuration is invalid.
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::with_storage_root(&self.storage_dir);

        if let Some(dir) = &self.upload_dir {
            config.upload_root = dir.clone();
        }
        if let Some(dir) = &self.organized_dir {
            config.organized_root = dir.clone();
        }

        config.max_upload_bytes = self.max_upload_mb.checked_mul(1024 * 1024).ok_or_else(|| {
            ShelfError::invalid_config(format!("--max-upload-mb {} is too large", self.max_upload_mb))
        })?;
        config.bind_addr = self.bind;

        config.validate()?;
        Ok(config)
    }
}
