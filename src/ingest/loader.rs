use std::path::Path;

use thiserror::Error;

/// Extensions we can turn into text. PDF and Word sources are converted to
/// text upstream before they reach the corpus directory.
const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "md"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),
    #[error("failed to read {0}: {1}")]
    ReadError(String, #[source] std::io::Error),
}

pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Loads a file's full text. UTF-8 only; a decode failure is a read error and
/// the caller skips the file.
pub fn load_file(path: &Path) -> Result<String, LoadError> {
    if !is_supported(path) {
        return Err(LoadError::UnsupportedFileType(path.display().to_string()));
    }

    std::fs::read_to_string(path)
        .map_err(|e| LoadError::ReadError(path.display().to_string(), e))
}
