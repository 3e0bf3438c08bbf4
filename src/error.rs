//! Error types for trackmap

use std::fmt;
use std::io;

/// Result type for trackmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while plotting a track
#[derive(Debug)]
pub enum Error {
    /// I/O error
    Io(io::Error),

    /// CSV framing error (bad quoting, unequal row lengths, ...)
    Csv(csv::Error),

    /// Required column missing from the CSV header
    MissingColumn(&'static str),

    /// Field that could not be parsed as a number
    Parse { line: u64, message: String },

    /// Projection error
    Projection(String),

    /// Basemap tile could not be downloaded
    TileFetch(String),

    /// Basemap tile could not be decoded
    TileDecode(String),

    /// Figure drawing or encoding failed
    Render(String),

    /// Invalid configuration
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Csv(e) => write!(f, "CSV error: {}", e),
            Error::MissingColumn(name) => write!(f, "Missing column: {}", name),
            Error::Parse { line, message } => write!(f, "Parse error at line {}: {}", line, message),
            Error::Projection(msg) => write!(f, "Projection error: {}", msg),
            Error::TileFetch(msg) => write!(f, "Tile fetch failed: {}", msg),
            Error::TileDecode(msg) => write!(f, "Tile decode failed: {}", msg),
            Error::Render(msg) => write!(f, "Render error: {}", msg),
            Error::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Error::Csv(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Error::TileFetch(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config("test".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: test");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_parse_error_line() {
        let err = Error::Parse { line: 42, message: "invalid float literal".to_string() };
        assert!(err.to_string().contains("line 42"));
    }

    #[test]
    fn test_missing_column() {
        let err = Error::MissingColumn("Latitude");
        assert_eq!(err.to_string(), "Missing column: Latitude");
    }
}
