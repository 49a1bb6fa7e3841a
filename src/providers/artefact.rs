//! File-based model artefacts with optional integrity verification.

use std::{
    fs,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors produced while reading or verifying an artefact.
#[derive(Debug, Error)]
pub enum ArtefactError {
    #[error("failed to read artefact at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("artefact at {path} expected SHA-256 {expected} but found {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
}

/// On-disk artefact that may carry a recorded checksum.
///
/// The digest is optional: deployments that record one get it verified on
/// every load, and the original configuration format without digests keeps
/// working unchanged.
#[derive(Debug, Clone)]
pub struct Artefact {
    /// Location of the artefact on disk.
    pub path: PathBuf,
    /// Expected SHA-256 checksum expressed as lowercase hexadecimal.
    pub sha256: Option<String>,
}

impl Artefact {
    /// Artefact without a recorded checksum.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sha256: None,
        }
    }

    /// Attach an expected SHA-256 digest.
    #[must_use]
    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.sha256 = Some(digest.into());
        self
    }

    /// Read the artefact bytes, verifying the checksum when one is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::Io`] when the file cannot be read and
    /// [`ArtefactError::ChecksumMismatch`] when the computed digest differs
    /// from the recorded one.
    pub fn read_verified(&self) -> Result<Vec<u8>, ArtefactError> {
        let bytes = fs::read(&self.path).map_err(|source| ArtefactError::Io {
            path: self.path.clone(),
            source,
        })?;
        if let Some(expected) = &self.sha256 {
            let actual = sha256_hex(&bytes);
            if actual != normalise_hex(expected) {
                return Err(ArtefactError::ChecksumMismatch {
                    path: self.path.clone(),
                    expected: normalise_hex(expected),
                    actual,
                });
            }
        }
        Ok(bytes)
    }
}

/// SHA-256 digest of `bytes` as lowercase hexadecimal.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Computes the SHA-256 digest of the file at `path`.
///
/// # Errors
///
/// Returns I/O errors from reading the file.
pub fn compute_sha256(path: &Path) -> Result<String, ArtefactError> {
    let bytes = fs::read(path).map_err(|source| ArtefactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sha256_hex(&bytes))
}

fn normalise_hex(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn reads_without_checksum() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"payload").expect("write payload");
        let artefact = Artefact::new(file.path());
        assert_eq!(artefact.read_verified().expect("read artefact"), b"payload");
    }

    #[test]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn verifies_matching_checksum_case_insensitively() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"payload").expect("write payload");
        let digest = sha256_hex(b"payload").to_ascii_uppercase();
        let artefact = Artefact::new(file.path()).with_sha256(digest);
        assert!(artefact.read_verified().is_ok());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fn rejects_mismatched_checksum() {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(b"payload").expect("write payload");
        let artefact = Artefact::new(file.path()).with_sha256("00".repeat(32));
        let err = artefact.read_verified().expect_err("checksum must fail");
        assert!(matches!(err, ArtefactError::ChecksumMismatch { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let artefact = Artefact::new("/nonexistent/topcat-artefact.json");
        assert!(matches!(
            artefact.read_verified(),
            Err(ArtefactError::Io { .. })
        ));
    }
}
