//! Merging stored PDFs into a new stored PDF.

use pdfshelf::{Config, Shelf, ShelfError};
use rstest::rstest;
use tempfile::tempdir;

use crate::common::{TestPdf, page_count, write_corrupt_pdf};

#[rstest]
#[case(&[1, 1])]
#[case(&[3, 2, 5])]
fn test_merge_page_count_is_sum(#[case] pages: &[u32]) {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();

    let uploads: Vec<(String, Vec<u8>)> = pages
        .iter()
        .enumerate()
        .map(|(i, n)| (format!("part{i}.pdf"), TestPdf::pages(*n).bytes()))
        .collect();
    let names = shelf.upload(uploads).unwrap();

    let merged = shelf.merge(&names, Some("all.pdf")).unwrap();

    let expected: u32 = pages.iter().sum();
    let output = dir.path().join("uploads").join(&merged);
    assert_eq!(page_count(&output), expected as usize);
}

#[test]
fn test_merge_overwrites_previous_output() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    let names = shelf
        .upload(vec![
            ("a.pdf".to_string(), TestPdf::pages(1).bytes()),
            ("b.pdf".to_string(), TestPdf::pages(2).bytes()),
        ])
        .unwrap();

    shelf.merge(&names[..1], None).unwrap();
    let merged = shelf.merge(&names, None).unwrap();

    assert_eq!(merged, "merged.pdf");
    assert_eq!(page_count(&dir.path().join("uploads").join("merged.pdf")), 3);
}

#[test]
fn test_merge_of_corrupt_input_reports_library_error() {
    let dir = tempdir().unwrap();
    let shelf = Shelf::open(Config::with_storage_root(dir.path())).unwrap();
    shelf
        .upload(vec![("good.pdf".to_string(), TestPdf::pages(1).bytes())])
        .unwrap();
    write_corrupt_pdf(&dir.path().join("uploads").join("bad.pdf"));

    let err = shelf
        .merge(&["good.pdf".to_string(), "bad.pdf".to_string()], None)
        .unwrap_err();

    assert!(matches!(err, ShelfError::FailedToLoadPdf { .. }));
    assert_eq!(err.status_code(), 500);
    assert!(!dir.path().join("uploads").join("merged.pdf").exists());
}
