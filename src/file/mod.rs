//! File I/O operations for Markdown documents.
//!
//! This module loads documents from disk or stdin and saves edited text back
//! with atomic writes and optional backups.

pub mod loader;
pub mod saver;

pub use loader::{load_document, load_document_from_stdin};
pub use saver::save_document;
