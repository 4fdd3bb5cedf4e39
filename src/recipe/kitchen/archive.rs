// src/recipe/kitchen/archive.rs

//! Archive and source file utilities for the Kitchen

use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tar::{Archive, EntryType};
use tracing::debug;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Local file path behind a source URL, if it is not an HTTP(S) URL
pub fn local_path(url: &str) -> Option<&Path> {
    if let Some(path) = url.strip_prefix("file://") {
        Some(Path::new(path))
    } else if url.contains("://") {
        None
    } else {
        Some(Path::new(url))
    }
}

/// Download a file from a URL (or copy it from a local path)
pub fn download_file(url: &str, dest: &Path, timeout: Duration) -> Result<()> {
    if let Some(path) = local_path(url) {
        debug!("Copying local source: {}", path.display());
        fs::copy(path, dest).map_err(|e| {
            Error::DownloadError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        return Ok(());
    }

    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::DownloadError(format!("Failed to create HTTP client: {}", e)))?;

    let mut response = client
        .get(url)
        .send()
        .map_err(|e| Error::DownloadError(format!("Failed to download {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(Error::DownloadError(format!(
            "Failed to download {}: HTTP {}",
            url,
            response.status()
        )));
    }

    let mut file = File::create(dest)?;
    let bytes = io::copy(&mut response, &mut file)
        .map_err(|e| Error::DownloadError(format!("Failed to read response from {}: {}", url, e)))?;
    debug!("Downloaded {} bytes from {}", bytes, url);

    Ok(())
}

/// Open a tar archive, transparently decompressing gzip
fn open_archive(archive: &Path) -> Result<Archive<Box<dyn Read>>> {
    let file = File::open(archive)
        .map_err(|e| Error::IoError(format!("Failed to open {}: {}", archive.display(), e)))?;
    let mut reader = BufReader::new(file);
    let is_gzip = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let reader: Box<dyn Read> = if is_gzip {
        Box::new(GzDecoder::new(reader))
    } else {
        Box::new(reader)
    };
    Ok(Archive::new(reader))
}

/// Extract a `.tar.gz` or `.tar` archive into `dest`
///
/// With `strip_root`, the archive must hold a single top-level directory
/// whose contents are placed directly in `dest`. Entries that would land
/// outside `dest` are rejected, including symlinks pointing out of it and
/// entries written through such symlinks.
pub fn extract_archive(archive: &Path, dest: &Path, strip_root: bool) -> Result<()> {
    fs::create_dir_all(dest)?;
    let mut tar = open_archive(archive)?;

    if !strip_root {
        return tar
            .unpack(dest)
            .map_err(|e| Error::IoError(format!("Failed to extract archive: {}", e)));
    }

    // Unpack under a staging dir inside dest so tar's own guards apply and
    // hard link sources resolve against the unpacked tree
    let staging = tempfile::Builder::new()
        .prefix(".extract-")
        .tempdir_in(dest)
        .map_err(|e| Error::IoError(format!("Failed to create extraction directory: {}", e)))?;

    let mut root: Option<OsString> = None;
    let entries = tar
        .entries()
        .map_err(|e| Error::IoError(format!("Failed to read archive: {}", e)))?;

    for entry in entries {
        let mut entry =
            entry.map_err(|e| Error::IoError(format!("Failed to read archive entry: {}", e)))?;

        let entry_type = entry.header().entry_type();
        if matches!(entry_type, EntryType::XGlobalHeader | EntryType::XHeader) {
            continue;
        }

        let path = entry
            .path()
            .map_err(|e| Error::IoError(format!("Invalid entry path: {}", e)))?
            .into_owned();
        let (first, rest) = split_root(&path)?;

        match &root {
            None => root = Some(first),
            Some(existing) if *existing != first => {
                return Err(Error::IoError(format!(
                    "Cannot strip root: archive has more than one top-level entry ({} and {})",
                    existing.to_string_lossy(),
                    first.to_string_lossy()
                )));
            }
            Some(_) => {}
        }

        if rest.as_os_str().is_empty() && !entry_type.is_dir() {
            return Err(Error::IoError(format!(
                "Cannot strip root: top-level entry {} is not a directory",
                path.display()
            )));
        }

        if entry_type.is_symlink() {
            let link = entry
                .link_name()
                .map_err(|e| Error::IoError(format!("Invalid link target: {}", e)))?
                .ok_or_else(|| {
                    Error::IoError(format!("Symlink {} has no target", path.display()))
                })?;
            check_symlink_target(&rest, &link)?;
        }

        let unpacked = entry
            .unpack_in(staging.path())
            .map_err(|e| Error::IoError(format!("Failed to extract {}: {}", rest.display(), e)))?;
        if !unpacked {
            return Err(Error::IoError(format!(
                "Unsafe path in archive: {}",
                path.display()
            )));
        }
    }

    let Some(root) = root else {
        return Err(Error::IoError(format!(
            "Archive is empty: {}",
            archive.display()
        )));
    };

    let root_dir = staging.path().join(&root);
    for child in fs::read_dir(&root_dir)? {
        let child = child?;
        fs::rename(child.path(), dest.join(child.file_name()))?;
    }

    Ok(())
}

/// Reject a symlink at `entry` (relative to the stripped root) whose target
/// leaves the root
fn check_symlink_target(entry: &Path, target: &Path) -> Result<()> {
    let escapes = || {
        Error::IoError(format!(
            "Symlink {} points outside the archive root: {}",
            entry.display(),
            target.display()
        ))
    };

    let mut depth: usize = entry.components().count().saturating_sub(1);
    for component in target.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::ParentDir => depth = depth.checked_sub(1).ok_or_else(escapes)?,
            Component::RootDir | Component::Prefix(_) => return Err(escapes()),
        }
    }
    Ok(())
}

/// Split an entry path into its top-level component and the remainder
fn split_root(path: &Path) -> Result<(OsString, PathBuf)> {
    let unsafe_path = || Error::IoError(format!("Unsafe path in archive: {}", path.display()));

    let mut components = path.components().filter(|c| !matches!(c, Component::CurDir));
    let first = match components.next() {
        Some(Component::Normal(name)) => name.to_os_string(),
        _ => return Err(unsafe_path()),
    };
    let rest = components
        .map(|c| match c {
            Component::Normal(part) => Ok(part),
            _ => Err(unsafe_path()),
        })
        .collect::<Result<PathBuf>>()?;

    Ok((first, rest))
}
