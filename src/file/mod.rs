//! File I/O operations for spec, input and output documents.
//!
//! This module provides functionality to load JSON or YAML documents from disk
//! or stdin, and save transformed documents back to files with atomic write
//! operations and optional backups.

pub mod loader;
pub mod saver;

pub use loader::{load_document, load_document_from_stdin};
pub use saver::{save_document, serialize_document};
