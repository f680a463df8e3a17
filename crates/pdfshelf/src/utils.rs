//! Utilities for file naming, hashing and timestamps.

use chrono::{DateTime, Local};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use unicode_normalization::UnicodeNormalization;

/// Chunk size used when hashing stored files.
pub const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// Reduce a client-supplied file name to a safe, flat name.
///
/// The name is NFKD-normalized and what is still non-ASCII is dropped (so
/// accents fall off their letters), path separators become whitespace,
/// whitespace runs become a single `_`, anything outside `[A-Za-z0-9_.-]` is
/// removed and leading/trailing `.`/`_` are trimmed. The result may be empty.
///
/// ```
/// use pdfshelf::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
/// assert_eq!(sanitize_filename("My Report (v2).pdf"), "My_Report_v2.pdf");
/// assert_eq!(sanitize_filename("résumé.pdf"), "resume.pdf");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let flattened: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// A leading dot does not start an extension, so `".pdf"` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Whether `name` ends in one of `extensions` (each with its leading dot),
/// compared case-insensitively.
pub fn has_allowed_extension(name: &str, extensions: &[String]) -> bool {
    let (_, ext) = split_extension(name);
    !ext.is_empty() && extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

/// Whether `name` is a single plain path component (no separators, not `.`
/// or `..`), i.e. safe to join onto a storage root.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// SHA-256 of a file's content as lower-case hex, read in 8 KiB chunks.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_seconds(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Local-time ISO-8601 timestamp without offset, e.g. `2024-05-01T09:30:00.000000`.
pub fn local_iso(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Four-digit local-time year of a timestamp.
pub fn local_year(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y").to_string()
}
