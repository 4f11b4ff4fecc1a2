use std::fmt;
use std::io;
use std::path::PathBuf;

/// File-level failures. Every variant carries the path so the CLI can name
/// the offending input without threading context through the call sites.
#[derive(Debug)]
pub enum IoError {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
    Csv { path: PathBuf, message: String },
    Las { path: PathBuf, message: String },
    Image { path: PathBuf, message: String },
    MissingColumn { path: PathBuf, column: &'static str },
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoError::Read { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            IoError::Write { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            IoError::Csv { path, message } => {
                write!(f, "invalid CSV in {}: {}", path.display(), message)
            }
            IoError::Las { path, message } => {
                write!(f, "invalid LAS file {}: {}", path.display(), message)
            }
            IoError::Image { path, message } => {
                write!(f, "failed to decode image {}: {}", path.display(), message)
            }
            IoError::MissingColumn { path, column } => {
                write!(f, "cannot write {}: result has no '{}' column", path.display(), column)
            }
        }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Read { source, .. } | IoError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}
