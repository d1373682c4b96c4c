//! Markdown document loading.
//!
//! Documents are read as UTF-8 text. Files ending in `.gz` are decompressed
//! transparently, and stdin input starting with the gzip magic bytes is
//! decompressed as well.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads a Markdown document from the filesystem.
///
/// # Examples
///
/// ```no_run
/// use footquill::file::loader::load_document;
///
/// let text = load_document("notes/paper.md").unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file path does not exist
/// - The file cannot be read (permissions, etc.)
/// - A `.gz` file is not valid gzip
/// - The contents are not valid UTF-8
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<String> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    if is_gzipped {
        read_gzipped_file(path_ref)
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read {}", path_ref.display()))
    }
}

/// Loads a Markdown document from standard input.
///
/// # Errors
///
/// Returns an error if reading fails, the input looks gzipped but is
/// corrupted, or the text is not valid UTF-8.
pub fn load_document_from_stdin() -> Result<String> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    // Check for gzip magic bytes (0x1f 0x8b)
    if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")
    }
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = flate2::read::GzDecoder::new(file);
    read_all(&mut decoder).context("Failed to decompress gzipped file - file may be corrupted")
}

/// Decompresses gzip-encoded bytes to a UTF-8 string.
fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    let mut decoder = flate2::read::GzDecoder::new(bytes);
    read_all(&mut decoder).context("Failed to decompress gzipped stdin")
}

fn read_all<R: std::io::Read>(reader: &mut R) -> std::io::Result<String> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_decompress_gzip_bytes() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all("A[^1]\n\n[^1]: one".as_bytes()).unwrap();
        let bytes = encoder.finish().unwrap();

        assert_eq!(decompress_gzip_bytes(&bytes).unwrap(), "A[^1]\n\n[^1]: one");
    }
}
