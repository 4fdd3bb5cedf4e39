// src/hash.rs

//! SHA-256 hashing for source archive verification and package IDs
//!
//! Source archives are pinned by the SHA-256 digest recorded next to their
//! URL in the sources data. Package IDs are SHA-256 digests of the
//! normalized settings and options.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;

/// Length of a SHA-256 digest as a hex string
pub const SHA256_HEX_LEN: usize = 64;

/// Compute the SHA-256 hex digest of a byte slice
pub fn sha256(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Compute the SHA-256 hex digest of everything a reader yields
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

/// Compute the SHA-256 hex digest of a file, streaming its content
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    sha256_reader(&mut file)
}

/// Check that a string looks like a SHA-256 hex digest
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == SHA256_HEX_LEN && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// Verification result error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyError {
    pub expected: String,
    pub actual: String,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sha256 mismatch: expected {}, got {}",
            self.expected, self.actual
        )
    }
}

impl std::error::Error for VerifyError {}

/// Verify a file matches an expected SHA-256 digest
///
/// Comparison is case-insensitive. Read failures surface as an `io::Error`,
/// a digest mismatch as `Ok(Err(VerifyError))`.
pub fn verify_file_sha256(path: &Path, expected: &str) -> io::Result<Result<(), VerifyError>> {
    let actual = sha256_file(path)?;
    if actual == expected.to_lowercase() {
        Ok(Ok(()))
    } else {
        Ok(Err(VerifyError {
            expected: expected.to_string(),
            actual,
        }))
    }
}
