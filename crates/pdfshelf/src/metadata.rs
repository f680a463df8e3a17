//! Best-effort PDF metadata and text extraction.
//!
//! Nothing in this module fails the caller. Every read returns an
//! [`Extracted`] value that records whether it came from the document or
//! from the fallback:
//!
//! | Read           | Fallback                              |
//! |----------------|---------------------------------------|
//! | title          | the bare file name                    |
//! | creation year  | the file's last-modified year (local) |
//! | text           | empty string                          |
//!
//! so one corrupt document never blocks listing or organizing the rest.

use lopdf::{Dictionary, Document, Object};
use std::path::Path;
use std::time::SystemTime;
use tracing::debug;

use crate::utils::local_year;

/// Where an extracted value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Read from the PDF itself.
    Document,
    /// The document had no usable value; a fallback was substituted.
    Fallback,
}

/// A value read from a PDF, or its fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    /// The value (extracted or fallback).
    pub value: T,
    /// Where the value came from.
    pub origin: Origin,
}

impl<T> Extracted<T> {
    /// A value read from the document.
    pub fn document(value: T) -> Self {
        Self {
            value,
            origin: Origin::Document,
        }
    }

    /// A fallback value.
    pub fn fallback(value: T) -> Self {
        Self {
            value,
            origin: Origin::Fallback,
        }
    }

    /// Whether the fallback was used.
    pub fn is_fallback(&self) -> bool {
        self.origin == Origin::Fallback
    }

    /// Discard the origin.
    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Derived, non-persisted metadata of a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Declared title, or the file name.
    pub title: Extracted<String>,
    /// Four-digit creation year, or the last-modified year.
    pub creation_year: Extracted<String>,
}

/// Reads titles, creation years and text from PDFs without ever failing.
#[derive(Debug, Clone, Default)]
pub struct MetadataReader;

impl MetadataReader {
    /// Create a new metadata reader.
    pub fn new() -> Self {
        Self
    }

    /// Read title and creation year with a single document load.
    pub fn read_metadata(&self, path: &Path) -> DocumentMetadata {
        match self.load(path) {
            Some(doc) => DocumentMetadata {
                title: title_of(&doc, path),
                creation_year: creation_year_of(&doc, path),
            },
            None => DocumentMetadata {
                title: Extracted::fallback(file_name(path)),
                creation_year: Extracted::fallback(mtime_year(path)),
            },
        }
    }

    /// The declared title, or the file name.
    pub fn read_title(&self, path: &Path) -> Extracted<String> {
        match self.load(path) {
            Some(doc) => title_of(&doc, path),
            None => Extracted::fallback(file_name(path)),
        }
    }

    /// The four-digit creation year, or the last-modified year.
    pub fn read_creation_year(&self, path: &Path) -> Extracted<String> {
        match self.load(path) {
            Some(doc) => creation_year_of(&doc, path),
            None => Extracted::fallback(mtime_year(path)),
        }
    }

    /// All text content of the document, or an empty string.
    pub fn read_text(&self, path: &Path) -> Extracted<String> {
        let Some(doc) = self.load(path) else {
            return Extracted::fallback(String::new());
        };

        let pages: Vec<u32> = doc.get_pages().into_keys().collect();
        if pages.is_empty() {
            return Extracted::document(String::new());
        }

        match doc.extract_text(&pages) {
            Ok(text) => Extracted::document(text),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "text extraction failed");
                Extracted::fallback(String::new())
            }
        }
    }

    fn load(&self, path: &Path) -> Option<Document> {
        match Document::load(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "metadata read failed, using fallback");
                None
            }
        }
    }
}

/// Extract a year from a PDF date string such as `D:20190304120000+01'00'`.
///
/// The optional `D:` prefix is skipped, then the leading run of digits is
/// taken; when it has at least four digits the first four are the year.
pub fn year_from_pdf_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("D:").unwrap_or(trimmed);
    let digits: String = body.chars().take_while(char::is_ascii_digit).collect();

    (digits.len() >= 4).then(|| digits[..4].to_string())
}

/// Decode a PDF text string: UTF-16BE when it carries a BOM, otherwise
/// byte-per-char (PDFDocEncoding is Latin-1 for printable text).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }

    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }

    bytes.iter().map(|&b| b as char).collect()
}

fn info_dict(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn info_string(doc: &Document, key: &[u8]) -> Option<String> {
    let value = match info_dict(doc)?.get(key).ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };
    let bytes = value.as_str().ok()?;
    Some(decode_pdf_string(bytes))
}

fn title_of(doc: &Document, path: &Path) -> Extracted<String> {
    match info_string(doc, b"Title") {
        Some(title) if !title.trim().is_empty() => Extracted::document(title),
        _ => Extracted::fallback(file_name(path)),
    }
}

fn creation_year_of(doc: &Document, path: &Path) -> Extracted<String> {
    match info_string(doc, b"CreationDate").and_then(|raw| year_from_pdf_date(&raw)) {
        Some(year) => Extracted::document(year),
        None => Extracted::fallback(mtime_year(path)),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Last-modified year; the current year when even the mtime is unreadable.
fn mtime_year(path: &Path) -> String {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| SystemTime::now());
    local_year(modified)
}
