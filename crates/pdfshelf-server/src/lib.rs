//! pdfshelf-server - web front end for pdfshelf.
//!
//! Exposes the library's operations as a small JSON API plus a single-page
//! UI. See [`api::app`] for the routes.

pub mod api;
pub mod cli;
pub mod telemetry;

pub use api::{AppState, app};
