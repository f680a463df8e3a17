//! Keyword organizing: copies, merged output and re-runs.

use pdfshelf::{Config, Shelf};
use std::collections::BTreeMap;
use std::path::Path;
use tempfile::tempdir;

use crate::common::{TestPdf, page_count, page_text};

fn folder_entries(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_keyword_organize_copies_and_merges() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    shelf
        .upload(vec![
            ("contract-acme.pdf".to_string(), TestPdf::pages(2).bytes()),
            ("letter.pdf".to_string(), TestPdf::pages(1).text("Signed CONTRACT").bytes()),
            ("menu.pdf".to_string(), TestPdf::pages(1).text("soup of the day").bytes()),
        ])
        .unwrap();

    let map = BTreeMap::from([("Contract".to_string(), "Legal".to_string())]);
    let result = shelf.organize_keywords(&map).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].category, "Legal");
    assert_eq!(result[0].merged, "Legal_Merged.pdf");

    let folder = dir.path().join("organized").join("Legal");
    assert_eq!(
        folder_entries(&folder),
        vec!["Legal_Merged.pdf", "contract-acme.pdf", "letter.pdf"]
    );
    assert_eq!(page_count(&folder.join("Legal_Merged.pdf")), 3);
}

#[test]
fn test_keyword_organize_rerun_is_idempotent() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    shelf
        .upload(vec![("receipt-1.pdf".to_string(), TestPdf::pages(1).bytes())])
        .unwrap();
    let map = BTreeMap::from([("receipt".to_string(), "Receipts".to_string())]);

    shelf.organize_keywords(&map).unwrap();
    let folder = dir.path().join("organized").join("Receipts");
    let first = folder_entries(&folder);
    shelf.organize_keywords(&map).unwrap();

    assert_eq!(folder_entries(&folder), first);
    assert_eq!(page_count(&folder.join("Receipts_Merged.pdf")), 1);
}

#[test]
fn test_keywords_sharing_a_folder_accumulate() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    shelf
        .upload(vec![
            ("gas-bill.pdf".to_string(), TestPdf::pages(1).bytes()),
            ("water-bill.pdf".to_string(), TestPdf::pages(2).bytes()),
        ])
        .unwrap();

    let map = BTreeMap::from([
        ("gas".to_string(), "Utilities".to_string()),
        ("water".to_string(), "Utilities".to_string()),
    ]);
    let result = shelf.organize_keywords(&map).unwrap();

    assert_eq!(result.len(), 2);
    let folder = dir.path().join("organized").join("Utilities");
    assert_eq!(page_count(&folder.join("Utilities_Merged.pdf")), 3);
}

#[test]
fn test_keyword_copies_are_byte_identical() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    shelf
        .upload(vec![
            ("policy-home.pdf".to_string(), TestPdf::pages(2).title("Home").bytes()),
            ("notes.pdf".to_string(), TestPdf::pages(1).text("see POLICY 12").bytes()),
        ])
        .unwrap();

    let map = BTreeMap::from([("policy".to_string(), "Insurance".to_string())]);
    shelf.organize_keywords(&map).unwrap();

    let uploads = dir.path().join("uploads");
    let folder = dir.path().join("organized").join("Insurance");
    for name in ["policy-home.pdf", "notes.pdf"] {
        assert_eq!(
            std::fs::read(folder.join(name)).unwrap(),
            std::fs::read(uploads.join(name)).unwrap(),
            "copy of {name} differs"
        );
    }
}

#[test]
fn test_merged_pages_follow_folder_order() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    let folder = dir.path().join("organized").join("Letters");
    std::fs::create_dir_all(&folder).unwrap();
    TestPdf::pages(1).text("ZERO").write(&folder.join("0-earlier.pdf"));
    shelf
        .upload(vec![
            ("c-letter.pdf".to_string(), TestPdf::pages(1).text("THIRD").bytes()),
            ("a-letter.pdf".to_string(), TestPdf::pages(1).text("FIRST").bytes()),
            ("b-note.pdf".to_string(), TestPdf::pages(1).text("letter SECOND").bytes()),
        ])
        .unwrap();

    let map = BTreeMap::from([("letter".to_string(), "Letters".to_string())]);
    shelf.organize_keywords(&map).unwrap();

    let merged = folder.join("Letters_Merged.pdf");
    assert_eq!(page_count(&merged), 4);
    for (page, marker) in [(1, "ZERO"), (2, "FIRST"), (3, "SECOND"), (4, "THIRD")] {
        let text = page_text(&merged, page);
        assert!(text.contains(marker), "page {page} was {text:?}, expected {marker}");
    }
}
