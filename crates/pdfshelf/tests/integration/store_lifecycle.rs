//! Upload, list, update, rename and delete through the public API.

use pdfshelf::{Config, Shelf, ShelfError};
use tempfile::{TempDir, tempdir};

use crate::common::{TestPdf, write_corrupt_pdf};

fn open_shelf() -> (TempDir, Shelf) {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    (dir, shelf)
}

fn upload(shelf: &Shelf, name: &str, pdf: TestPdf) -> String {
    let mut saved = shelf.upload(vec![(name.to_string(), pdf.bytes())]).unwrap();
    assert_eq!(saved.len(), 1, "upload of {name} was skipped");
    saved.remove(0)
}

#[test]
fn test_upload_collisions_get_numeric_suffixes() {
    let (_dir, shelf) = open_shelf();

    let names: Vec<String> = (0..3)
        .map(|_| upload(&shelf, "a.pdf", TestPdf::pages(1)))
        .collect();

    assert_eq!(names, vec!["a.pdf", "a_1.pdf", "a_2.pdf"]);
    let listed: Vec<String> = shelf.list().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(listed, names);
}

#[test]
fn test_non_pdf_uploads_are_skipped() {
    let (_dir, shelf) = open_shelf();

    let saved = shelf
        .upload(vec![
            ("readme.txt".to_string(), b"hello".to_vec()),
            ("photo.PNG".to_string(), vec![0x89, 0x50]),
        ])
        .unwrap();

    assert!(saved.is_empty());
    assert!(shelf.list().unwrap().is_empty());
}

#[test]
fn test_hash_is_stable_until_update() {
    let (_dir, shelf) = open_shelf();
    upload(&shelf, "doc.pdf", TestPdf::pages(1));

    let first = shelf.list().unwrap()[0].hash.clone();
    let second = shelf.list().unwrap()[0].hash.clone();
    assert_eq!(first, second);

    shelf
        .replace("doc.pdf", "new-version.pdf", &TestPdf::pages(3).bytes())
        .unwrap();

    let files = shelf.list().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "doc.pdf");
    assert_ne!(files[0].hash, first);
}

#[test]
fn test_update_missing_file_is_not_found() {
    let (_dir, shelf) = open_shelf();
    let err = shelf
        .replace("ghost.pdf", "new.pdf", &TestPdf::pages(1).bytes())
        .unwrap_err();

    assert!(matches!(err, ShelfError::NotFound { .. }));
    assert_eq!(err.to_string(), "Existing file not found");
}

#[test]
fn test_rename_onto_existing_leaves_both_files() {
    let (dir, shelf) = open_shelf();
    upload(&shelf, "a.pdf", TestPdf::pages(1));
    upload(&shelf, "b.pdf", TestPdf::pages(2));
    let uploads = dir.path().join("uploads");
    let a_before = std::fs::read(uploads.join("a.pdf")).unwrap();
    let b_before = std::fs::read(uploads.join("b.pdf")).unwrap();

    let err = shelf.rename("a.pdf", "b.pdf").unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert_eq!(err.to_string(), "Target filename exists");
    assert_eq!(std::fs::read(uploads.join("a.pdf")).unwrap(), a_before);
    assert_eq!(std::fs::read(uploads.join("b.pdf")).unwrap(), b_before);
}

#[test]
fn test_rename_keeps_content() {
    let (_dir, shelf) = open_shelf();
    upload(&shelf, "a.pdf", TestPdf::pages(1));
    let hash = shelf.list().unwrap()[0].hash.clone();

    let to = shelf.rename("a.pdf", "renamed file.pdf").unwrap();

    assert_eq!(to, "renamed_file.pdf");
    let files = shelf.list().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "renamed_file.pdf");
    assert_eq!(files[0].hash, hash);
}

#[test]
fn test_delete_missing_leaves_store_unchanged() {
    let (_dir, shelf) = open_shelf();
    upload(&shelf, "keep.pdf", TestPdf::pages(1));
    let before = shelf.list().unwrap();

    let err = shelf.delete("ghost.pdf").unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(shelf.list().unwrap(), before);
}

#[test]
fn test_corrupt_pdf_is_listed_with_file_name_title() {
    let (dir, shelf) = open_shelf();
    write_corrupt_pdf(&dir.path().join("uploads").join("broken.pdf"));
    upload(&shelf, "titled.pdf", TestPdf::pages(1).title("Declared Title"));

    let files = shelf.list().unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].name, "broken.pdf");
    assert_eq!(files[0].title, "broken.pdf");
    assert_eq!(files[1].title, "Declared Title");
}
