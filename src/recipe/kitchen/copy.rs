// src/recipe/kitchen/copy.rs

//! Pattern-based file copies from build/source trees into a package

use crate::error::{Error, Result};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Copy every file under `src` whose relative path matches `pattern`
///
/// The relative directory structure is preserved under `dst`. `*` also
/// matches path separators, so `*.h` picks up headers in subdirectories.
/// A missing `src` directory copies nothing. Returns the destination paths.
pub fn copy(pattern: &str, src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let matcher = Pattern::new(pattern)
        .map_err(|e| Error::ParseError(format!("Invalid copy pattern {}: {}", pattern, e)))?;

    if !src.is_dir() {
        debug!("Copy source does not exist: {}", src.display());
        return Ok(Vec::new());
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry
            .map_err(|e| Error::IoError(format!("Failed to walk {}: {}", src.display(), e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::IoError(e.to_string()))?;
        let relative_str = relative.to_string_lossy().replace('\\', "/");
        if !matcher.matches(&relative_str) {
            continue;
        }

        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &target).map_err(|e| {
            Error::IoError(format!(
                "Failed to copy {} to {}: {}",
                entry.path().display(),
                target.display(),
                e
            ))
        })?;
        copied.push(target);
    }

    debug!(
        "Copied {} file(s) matching {} from {}",
        copied.len(),
        pattern,
        src.display()
    );
    Ok(copied)
}

/// Like [`copy`], but matching nothing is a packaging error
pub fn copy_required(pattern: &str, src: &Path, dst: &Path) -> Result<Vec<PathBuf>> {
    let copied = copy(pattern, src, dst)?;
    if copied.is_empty() {
        return Err(Error::PackagingFailed(format!(
            "No files matching {} in {}",
            pattern,
            src.display()
        )));
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_copy_pattern_recursive() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        touch(&src.path().join("a.h"));
        touch(&src.path().join("legacy/b.h"));
        touch(&src.path().join("fortran/c.f90"));

        let copied = copy("*.h", src.path(), dst.path()).unwrap();
        assert_eq!(copied.len(), 2);
        assert!(dst.path().join("a.h").is_file());
        assert!(dst.path().join("legacy/b.h").is_file());
        assert!(!dst.path().join("fortran/c.f90").exists());
    }

    #[test]
    fn test_copy_exact_name() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        touch(&src.path().join("BSD-3-Clause.txt"));
        touch(&src.path().join("GPL-2.0-only.txt"));

        let copied = copy("BSD-3-Clause.txt", src.path(), dst.path()).unwrap();
        assert_eq!(copied, vec![dst.path().join("BSD-3-Clause.txt")]);
    }

    #[test]
    fn test_copy_missing_source_dir() {
        let dst = tempfile::tempdir().unwrap();
        let copied = copy("*", Path::new("/nonexistent/dir"), dst.path()).unwrap();
        assert!(copied.is_empty());
    }

    #[test]
    fn test_copy_required_fails_on_no_match() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let err = copy_required("libittnotify.a", src.path(), dst.path()).unwrap_err();
        assert!(matches!(err, Error::PackagingFailed(_)));
    }
}
