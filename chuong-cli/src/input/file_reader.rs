//! File reading utilities

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::CliError;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        if !path.exists() {
            return Err(CliError::InputNotFound(path.display().to_string()).into());
        }

        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        String::from_utf8(bytes).map_err(|e| {
            CliError::Extraction(format!("{} is not valid UTF-8: {e}", path.display())).into()
        })
    }

    /// Get file size in bytes
    pub fn file_size(path: &Path) -> Result<u64> {
        let metadata = fs::metadata(path)
            .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

        Ok(metadata.len())
    }

    /// Lowercase hex SHA-256 of the file contents
    pub fn sha256_hex(path: &Path) -> Result<String> {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
        let mut reader = BufReader::new(file);
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; 8192];

        loop {
            let read = reader
                .read(&mut buffer)
                .with_context(|| format!("Failed to read: {}", path.display()))?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        Ok(hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect())
    }
}
