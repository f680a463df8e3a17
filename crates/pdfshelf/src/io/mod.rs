//! I/O operations for pdfshelf.
//!
//! - Loading PDF documents from disk
//! - Writing merged PDFs and replaced uploads atomically

pub mod reader;
pub mod writer;

pub use reader::{LoadedPdf, PdfReader};
pub use writer::PdfWriter;
