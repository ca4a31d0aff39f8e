use std::fs;
use std::path::Path;

use thiserror::Error;

/// Raw input text read into memory
#[derive(Debug, Clone)]
pub struct FileContent {
    /// Path the text was read from
    pub path: String,
    /// File content as valid UTF-8 string
    pub content: String,
    /// BLAKE3 hash of the content (hex-encoded)
    pub checksum: String,
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// Read a file from disk with UTF-8 validation
///
/// # Arguments
/// * `path` - Path to the file to read
///
/// # Returns
/// * `Ok(FileContent)` - File content with its checksum
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<FileContent, FileError> {
    let path_ref = path.as_ref();

    if !path_ref.exists() {
        return Err(FileError::NotFound(path_ref.display().to_string()));
    }

    let bytes = fs::read(path_ref)?;
    let content = String::from_utf8(bytes)
        .map_err(|_| FileError::InvalidUtf8(path_ref.display().to_string()))?;

    let checksum = blake3::hash(content.as_bytes()).to_hex().to_string();

    Ok(FileContent {
        path: path_ref.display().to_string(),
        content,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_read_file_valid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("valid.txt");
        let content = "  Ciao   mondo\n";
        fs::write(&file_path, content).unwrap();

        let file_content = read_file(&file_path).unwrap();

        assert_eq!(file_content.content, content);
        assert_eq!(file_content.path, file_path.display().to_string());
        assert_eq!(
            file_content.checksum,
            blake3::hash(content.as_bytes()).to_hex().to_string()
        );
    }

    #[test]
    fn test_read_file_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("invalid.txt");
        fs::write(&file_path, [0xFFu8, 0xFE, 0xFD]).unwrap();

        match read_file(&file_path) {
            Err(FileError::InvalidUtf8(p)) => assert_eq!(p, file_path.display().to_string()),
            other => panic!("Expected FileError::InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn test_read_file_not_found() {
        let file_path = PathBuf::from("/nonexistent/path/that/does/not/exist.txt");

        match read_file(&file_path) {
            Err(FileError::NotFound(p)) => assert!(p.contains("nonexistent")),
            other => panic!("Expected FileError::NotFound, got {other:?}"),
        }
    }
}
