//! pdfshelf - Upload, organize and merge PDF files.
//!
//! The library keeps uploaded PDFs in a flat directory (the upload root) and
//! organizes copies of them into category folders (the organized root):
//!
//! - Storing uploads with collision-free sanitized names
//! - Listing with size, modification time, content hash and title
//! - Merging stored PDFs into a new stored PDF
//! - Organizing by keyword (with a merged PDF per category) or by year
//!
//! # Examples
//!
//! ```no_run
//! use pdfshelf::{Config, Shelf};
//! use std::collections::BTreeMap;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let shelf = Shelf::open(Config::with_storage_root("storage"))?;
//!
//! let pdf = std::fs::read("invoice.pdf")?;
//! let saved = shelf.upload(vec![("invoice.pdf".to_string(), pdf)])?;
//! println!("stored as {saved:?}");
//!
//! let mut map = BTreeMap::new();
//! map.insert("invoice".to_string(), "Bills".to_string());
//! for category in shelf.organize_keywords(&map)? {
//!     println!("{} -> {}", category.category, category.merged);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod merge;
pub mod metadata;
pub mod organize;
pub mod shelf;
pub mod store;
pub mod utils;

#[cfg(test)]
#[path = "../tests/integration/common/mod.rs"]
pub(crate) mod test_pdf;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ShelfError};
pub use shelf::{FileEntry, Shelf};
pub use store::{DirStore, FileStore, StoredFile};
