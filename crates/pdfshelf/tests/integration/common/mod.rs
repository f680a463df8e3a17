//! Shared PDF fixtures for the pdfshelf test suites.
//!
//! Fixtures are generated with `lopdf` at test time instead of being checked
//! in, so each test controls page count, text and Info dictionary entries.
//! This file is also mounted by the library's unit tests and by the server's
//! HTTP tests, so it must only depend on `lopdf` and `std`.

#![allow(dead_code)]

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::SystemTime;

/// Builder for a small but structurally valid PDF.
#[derive(Debug, Clone, Default)]
pub struct TestPdf {
    pages: u32,
    text: Option<String>,
    title: Option<String>,
    creation_date: Option<String>,
}

impl TestPdf {
    /// A document with `pages` empty pages.
    pub fn pages(pages: u32) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Draw `text` on every page.
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the Info dictionary `Title`.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Set the Info dictionary `CreationDate` (raw PDF date string).
    pub fn creation_date(mut self, date: &str) -> Self {
        self.creation_date = Some(date.to_string());
        self
    }

    /// Build the document in memory.
    pub fn build(&self) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids = Vec::new();
        for _ in 0..self.pages {
            let operations = match &self.text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(text.as_str())]),
                    Operation::new("ET", vec![]),
                ],
                None => vec![],
            };
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content stream"),
            ));

            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => resources_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.pages as i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        if self.title.is_some() || self.creation_date.is_some() {
            let mut info = lopdf::Dictionary::new();
            if let Some(title) = &self.title {
                info.set("Title", Object::string_literal(title.as_str()));
            }
            if let Some(date) = &self.creation_date {
                info.set("CreationDate", Object::string_literal(date.as_str()));
            }
            let info_id = doc.add_object(info);
            doc.trailer.set("Info", info_id);
        }

        doc
    }

    /// Serialize the document to `path`.
    pub fn write(&self, path: &Path) {
        let mut doc = self.build();
        let mut file = File::create(path).expect("create fixture file");
        doc.save_to(&mut file).expect("save fixture PDF");
        file.flush().expect("flush fixture PDF");
    }

    /// Serialize the document to bytes.
    pub fn bytes(&self) -> Vec<u8> {
        let mut doc = self.build();
        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save fixture PDF");
        out
    }
}

/// Write bytes that are named like a PDF but cannot be parsed as one.
pub fn write_corrupt_pdf(path: &Path) {
    std::fs::write(path, b"this is not a pdf at all").expect("write corrupt fixture");
}

/// Number of pages in the PDF at `path`.
pub fn page_count(path: &Path) -> usize {
    Document::load(path).expect("load PDF").get_pages().len()
}

/// Text drawn on page `page` (1-based) of the PDF at `path`.
pub fn page_text(path: &Path, page: u32) -> String {
    Document::load(path)
        .expect("load PDF")
        .extract_text(&[page])
        .expect("extract page text")
}

/// Set a file's last-modified time.
pub fn set_mtime(path: &Path, time: SystemTime) {
    let file = File::options()
        .write(true)
        .open(path)
        .expect("open file for mtime update");
    file.set_modified(time).expect("set modified time");
}
