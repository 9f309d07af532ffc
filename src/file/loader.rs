//! Document loading functionality.
//!
//! This module provides functions to load spec and input documents from files
//! or stdin. JSON and YAML sources are both accepted and parsed into
//! `serde_json::Value` trees; either may be gzip-compressed.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Source syntax of a document, decided from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

/// Loads and parses a document from the filesystem.
///
/// Files ending in `.yaml` or `.yml` (optionally followed by `.gz`) are parsed
/// as YAML, everything else as JSON. A `.gz` suffix means the file is
/// decompressed first.
///
/// # Examples
///
/// ```no_run
/// use shiftquill::file::loader::load_document;
///
/// let spec = load_document("spec.json").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist or cannot be read
/// - The file is gzipped but corrupted
/// - The file contents are not valid JSON or YAML
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path_ref = path.as_ref();

    // Check if file is gzipped
    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    // Read content (decompress if needed)
    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read {}", path_ref.display()))?
    };

    parse_content(&content, determine_format(path_ref))
        .with_context(|| format!("Failed to parse {}", path_ref.display()))
}

/// Loads and parses a document from standard input.
///
/// Gzip input is detected by its magic bytes. The content is tried as JSON
/// first and as YAML if that fails.
///
/// # Examples
///
/// ```no_run
/// use shiftquill::file::loader::load_document_from_stdin;
///
/// // Usage: cat input.json | shiftquill spec.json
/// let input = load_document_from_stdin().unwrap();
/// ```
pub fn load_document_from_stdin() -> Result<Value> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = bytes_to_content(buffer)?;

    // Try to parse as JSON first
    if let Ok(value) = parse_content(&content, Format::Json) {
        return Ok(value);
    }

    parse_content(&content, Format::Yaml)
        .context("Failed to parse stdin: input is neither valid JSON nor valid YAML")
}

/// Parses `content` in the given format.
pub fn parse_content(content: &str, format: Format) -> Result<Value> {
    match format {
        Format::Json => serde_json::from_str(content).context("Invalid JSON"),
        Format::Yaml => serde_yaml::from_str(content).context("Invalid YAML"),
    }
}

/// Determines the source format from a file name, looking past a `.gz` suffix.
///
/// Examples:
/// - `spec.yaml` → Yaml
/// - `input.yml.gz` → Yaml
/// - `input.json.gz` → Json
pub fn determine_format<P: AsRef<Path>>(path: P) -> Format {
    let path_str = path.as_ref().to_string_lossy();

    // Remove .gz suffix if present
    let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

    if base.ends_with(".yaml") || base.ends_with(".yml") {
        Format::Yaml
    } else {
        Format::Json
    }
}

/// Decodes raw bytes, decompressing them first if they carry the gzip
/// magic bytes (0x1f 0x8b).
fn bytes_to_content(buffer: Vec<u8>) -> Result<String> {
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")
    }
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}
