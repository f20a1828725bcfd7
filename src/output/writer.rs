//! File writing primitives for the export tree
//!
//! Finalized page bodies and downloaded assets land here. Paths handed in
//! are relative to the output directory; parent directories are created on
//! demand so the nested tree mirrors the URL hierarchy.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Creates a directory and all of its parents if missing
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.as_os_str().is_empty() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Writes bytes to `output_dir/rel_path`, creating parent directories
pub fn write_file(output_dir: &Path, rel_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let full_path = output_dir.join(rel_path);
    if let Some(parent) = full_path.parent() {
        ensure_dir(parent)?;
    }

    let mut file = File::create(&full_path)?;
    file.write_all(bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_nested_dirs() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), Path::new("a/b/c.md"), b"# Hello").unwrap();
        let written = fs::read_to_string(dir.path().join("a/b/c.md")).unwrap();
        assert_eq!(written, "# Hello");
    }

    #[test]
    fn test_write_top_level_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), Path::new("index.md"), b"root").unwrap();
        assert!(dir.path().join("index.md").exists());
    }

    #[test]
    fn test_overwrite_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), Path::new("page.md"), b"draft").unwrap();
        write_file(dir.path(), Path::new("page.md"), b"final").unwrap();
        let written = fs::read_to_string(dir.path().join("page.md")).unwrap();
        assert_eq!(written, "final");
    }
}
