//! SHA-256 fingerprints of inputs and rendered artifacts.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{IngestError, Result};

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(sha256_hex(&bytes))
}
