//! Document saving functionality.
//!
//! This module serializes transformed documents and writes them to files with
//! atomic write operations and optional backup creation.

use super::loader::{determine_format, Format};
use crate::config::Config;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Serializes a document as JSON text, pretty or compact per `config`.
///
/// Pretty output is indented with `config.indent_size` spaces. The result
/// always ends with a newline.
pub fn serialize_document(value: &Value, config: &Config) -> Result<String> {
    let mut json = if config.pretty {
        let indent = " ".repeat(config.indent_size);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        value
            .serialize(&mut serializer)
            .context("Failed to serialize document")?;
        String::from_utf8(buffer).context("Serialized document is not UTF-8")?
    } else {
        serde_json::to_string(value).context("Failed to serialize document")?
    };
    json.push('\n');
    Ok(json)
}

/// Saves a document to a file with optional backup creation.
///
/// Files ending in `.yaml` or `.yml` are written as YAML, everything else as
/// JSON. A `.gz` suffix compresses the output.
///
/// # Examples
///
/// ```no_run
/// use serde_json::json;
/// use shiftquill::config::Config;
/// use shiftquill::file::saver::save_document;
///
/// save_document("output.json", &json!({"a": 1}), &Config::default()).unwrap();
/// ```
///
/// # Atomic Write
///
/// The document is written to a temporary file which is then renamed over
/// the target, so the target is never left partially written.
pub fn save_document<P: AsRef<Path>>(path: P, value: &Value, config: &Config) -> Result<()> {
    let path = path.as_ref();

    // Determine if we should compress based on target filename
    let should_compress = path.to_string_lossy().ends_with(".gz");

    let text = match determine_format(path) {
        Format::Json => serialize_document(value, config)?,
        Format::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML")?,
    };

    // Create backup if requested and file exists
    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    write_file_atomic(path, text.as_bytes(), should_compress)?;
    log::debug!("wrote {} bytes to {}", text.len(), path.display());

    Ok(())
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}
