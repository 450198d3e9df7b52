use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

use crate::document::LineDocument;

/// Content of a source file read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path the file was read from
    pub path: String,
    /// The file as a line document
    pub document: LineDocument,
    /// Byte length of the content
    pub len: usize,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// Read a source file from disk with UTF-8 validation
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(FileContent)` - The file as a document, with its checksum
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(FileError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;
    let content = String::from_utf8(bytes)
        .map_err(|_| FileError::InvalidUtf8(path_ref.display().to_string()))?;

    let path_string = path_ref.display().to_string();
    let checksum = blake3::hash(content.as_bytes()).to_hex().to_string();

    Ok(FileContent {
        document: LineDocument::from_text(path_string.clone(), &content),
        path: path_string,
        len: content.len(),
        checksum,
    })
}

/// Write a document back to disk
///
/// # Returns
/// * `Ok(String)` - Checksum of the written content
pub fn write_file<P: AsRef<Path>>(path: P, document: &LineDocument) -> Result<String, FileError> {
    let text = document.text();
    fs::write(path, text.as_bytes())?;
    Ok(blake3::hash(text.as_bytes()).to_hex().to_string())
}
