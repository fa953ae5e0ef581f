// ==========================================
// PTM upload validator - ingestion error type
// ==========================================
// Every variant is terminal for the current upload attempt:
// no partial rows or header map are produced
// Tool: thiserror derive
// ==========================================

use thiserror::Error;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Ingestion error type
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== File selection =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file type: {0} (only .csv and .xlsx are allowed)")]
    UnsupportedFormat(String),

    #[error(
        "File too large: {} MB (maximum allowed size is {} MB)",
        .size_bytes.div_ceil(BYTES_PER_MB),
        .limit_bytes / BYTES_PER_MB
    )]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    // ===== Parsing =====
    #[error("Unreadable file: {0}")]
    Unreadable(String),

    #[error("File read failed: {0}")]
    FileReadError(String),

    #[error("Background parse worker failed: {0}")]
    WorkerError(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Unreadable(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::Unreadable(err.to_string())
    }
}

/// Result alias
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_too_large_message_in_mb() {
        let err = ImportError::FileTooLarge {
            size_bytes: 60 * BYTES_PER_MB,
            limit_bytes: 50 * BYTES_PER_MB,
        };
        assert_eq!(
            err.to_string(),
            "File too large: 60 MB (maximum allowed size is 50 MB)"
        );
    }

    #[test]
    fn test_io_error_maps_to_read_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(ImportError::from(io), ImportError::FileReadError(_)));
    }
}
