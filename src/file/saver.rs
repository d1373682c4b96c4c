//! Markdown document saving.
//!
//! Writes are atomic (temp file, then rename) so the target is never left
//! half written. Targets ending in `.gz` are gzip-compressed.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Saves `text` to `path`, optionally copying the previous file to
/// `<name>.bak` first.
///
/// # Examples
///
/// ```no_run
/// use footquill::file::saver::save_document;
///
/// save_document("notes/paper.md", "Body[^1]\n\n[^1]: note", false).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Backup creation fails (if requested)
/// - Writing to the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_document<P: AsRef<Path>>(path: P, text: &str, backup: bool) -> Result<()> {
    let path = path.as_ref();

    if backup && path.exists() {
        create_backup(path)?;
    }

    let should_compress = path.to_string_lossy().ends_with(".gz");
    write_file_atomic(path, text.as_bytes(), should_compress)
}

/// Returns `path` with `suffix` appended to its full file name.
fn sibling_with_suffix(path: &Path, suffix: &str) -> Result<PathBuf> {
    let original_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    Ok(path.with_file_name(format!("{}.{}", original_name, suffix)))
}

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let backup_path = sibling_with_suffix(path, "bak")?;
    fs::copy(path, backup_path).context("Failed to create backup")?;
    Ok(())
}

/// Writes data to `<name>.tmp` next to `path` and renames it over `path`.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = sibling_with_suffix(path, "tmp")?;

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_keeps_every_extension() {
        let path = Path::new("notes/a.md.gz");
        assert_eq!(
            sibling_with_suffix(path, "tmp").unwrap(),
            Path::new("notes/a.md.gz.tmp")
        );
        assert_eq!(
            sibling_with_suffix(Path::new("paper.md"), "bak").unwrap(),
            Path::new("paper.md.bak")
        );
    }
}
