//! Filesystem predicates and whole-file edits

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// Returns true if `path` exists and is a directory.
///
/// Stat failures, including a missing path, are logged and reported as `false`.
pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(metadata) => metadata.is_dir(),
        Err(err) => {
            warn!("Cannot stat directory {}: {}", path.display(), err);
            false
        }
    }
}

/// Returns true if `path` exists and is a regular file
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::metadata(path).is_ok_and(|metadata| metadata.is_file())
}

/// Prepends `content` to the file at `path`.
///
/// Returns `Ok(false)` without touching anything when `path` is not an
/// existing file.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn prepend_text_to_file(path: impl AsRef<Path>, content: &str) -> Result<bool> {
    let path = path.as_ref();
    if !file_exists(path) {
        debug!("Skipping prepend, no such file");
        return Ok(false);
    }

    splice(path, content.as_bytes(), &[])?;
    Ok(true)
}

/// Wraps the file at `path` with optional leading and trailing text.
///
/// Returns `Ok(false)` when the file does not exist or when both parts are
/// absent or empty.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn insert_text_to_file(
    path: impl AsRef<Path>,
    prepend: Option<&str>,
    append: Option<&str>,
) -> Result<bool> {
    let path = path.as_ref();
    let prepend = prepend.unwrap_or_default();
    let append = append.unwrap_or_default();
    if prepend.is_empty() && append.is_empty() {
        debug!("Nothing to insert");
        return Ok(false);
    }
    if !file_exists(path) {
        debug!("Skipping insert, no such file");
        return Ok(false);
    }

    splice(path, prepend.as_bytes(), append.as_bytes())?;
    Ok(true)
}

/// Rewrites `path` as `head + original + tail`.
///
/// Each part is written at its own offset into the truncated file. Nothing
/// guards against a crash between writes or a concurrent writer.
fn splice(path: &Path, head: &[u8], tail: &[u8]) -> Result<()> {
    let existing = fs::read(path).map_err(|e| Error::io(&e, path))?;
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .open(path)
        .map_err(|e| Error::io(&e, path))?;

    let mut offset = 0u64;
    for part in [head, existing.as_slice(), tail] {
        if part.is_empty() {
            continue;
        }
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(part))
            .map_err(|e| Error::io(&e, path))?;
        offset += u64::try_from(part.len()).unwrap_or(u64::MAX);
    }

    file.flush().map_err(|e| Error::io(&e, path))?;
    debug!(
        "Rewrote file with {} leading and {} trailing bytes",
        head.len(),
        tail.len()
    );
    Ok(())
}

/// Writes `content` to `path` as UTF-8, creating missing parent directories
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        debug!("Creating dir if not exists: {}", parent.display());
        fs::create_dir_all(parent).map_err(|e| Error::io(&e, parent))?;
    }
    fs::write(path, content).map_err(|e| Error::io(&e, path))?;
    debug!("Wrote {} bytes", content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorClass;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_predicates_on_missing_path() -> TestResult {
        let dir = tempfile::tempdir()?;
        let missing = dir.path().join("missing");
        assert!(!directory_exists(&missing));
        assert!(!file_exists(&missing));
        Ok(())
    }

    #[test]
    fn test_predicates_distinguish_kinds() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("a.txt");
        fs::write(&file, "x")?;

        assert!(directory_exists(dir.path()));
        assert!(!file_exists(dir.path()));
        assert!(file_exists(&file));
        assert!(!directory_exists(&file));
        Ok(())
    }

    #[test]
    fn test_prepend() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("greeting.txt");
        fs::write(&file, "world")?;

        assert!(prepend_text_to_file(&file, "hello ")?);
        assert_eq!(fs::read_to_string(&file)?, "hello world");
        Ok(())
    }

    #[test]
    fn test_prepend_missing_file_is_noop() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("nope.txt");

        assert!(!prepend_text_to_file(&file, "hello")?);
        assert!(!file.exists());
        Ok(())
    }

    #[test]
    fn test_prepend_keeps_binary_content() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("blob.bin");
        fs::write(&file, [0u8, 159, 146, 150])?;

        assert!(prepend_text_to_file(&file, "é")?);
        assert_eq!(fs::read(&file)?, vec![0xC3, 0xA9, 0, 159, 146, 150]);
        Ok(())
    }

    #[test]
    fn test_insert_both_sides() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("b.txt");
        fs::write(&file, "B")?;

        assert!(insert_text_to_file(&file, Some("A"), Some("C"))?);
        assert_eq!(fs::read_to_string(&file)?, "ABC");
        Ok(())
    }

    #[test]
    fn test_insert_one_side() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("b.txt");
        fs::write(&file, "ß")?;

        assert!(insert_text_to_file(&file, None, Some("!"))?);
        assert_eq!(fs::read_to_string(&file)?, "ß!");
        assert!(insert_text_to_file(&file, Some("«"), None)?);
        assert_eq!(fs::read_to_string(&file)?, "«ß!");
        Ok(())
    }

    #[test]
    fn test_insert_noops() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("b.txt");
        fs::write(&file, "B")?;

        assert!(!insert_text_to_file(&file, None, None)?);
        assert!(!insert_text_to_file(&file, Some(""), Some(""))?);
        assert!(!insert_text_to_file(dir.path().join("x"), Some("A"), None)?);
        assert_eq!(fs::read_to_string(&file)?, "B");
        Ok(())
    }

    #[test]
    fn test_write_file_creates_parents() -> TestResult {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("a").join("b").join("out.txt");

        write_file(&file, "first")?;
        write_file(&file, "second")?;
        assert_eq!(fs::read_to_string(&file)?, "second");
        Ok(())
    }

    #[test]
    fn test_write_file_under_a_file_fails() -> TestResult {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "")?;

        let err = write_file(blocker.join("out.txt"), "x").err();
        assert_eq!(err.map(|e| e.class()), Some(ErrorClass::Io));
        Ok(())
    }
}
