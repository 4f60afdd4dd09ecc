//! Error type for the experiment harness

use avlmat_core::MatrixError;

/// Errors raised while generating data, running experiments or writing reports
#[derive(Debug)]
pub enum HarnessError {
    /// A matrix operation reported a non-ok status
    Matrix(MatrixError),
    /// Writing a report failed
    Io(std::io::Error),
    /// Serializing a JSON report failed
    Json(serde_json::Error),
    /// An experiment case could not be parsed
    Parse(String),
}

impl std::fmt::Display for HarnessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarnessError::Matrix(err) => write!(f, "Matrix operation failed: {err}"),
            HarnessError::Io(err) => write!(f, "I/O error: {err}"),
            HarnessError::Json(err) => write!(f, "JSON error: {err}"),
            HarnessError::Parse(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarnessError::Matrix(err) => Some(err),
            HarnessError::Io(err) => Some(err),
            HarnessError::Json(err) => Some(err),
            HarnessError::Parse(_) => None,
        }
    }
}

impl From<MatrixError> for HarnessError {
    fn from(err: MatrixError) -> Self {
        HarnessError::Matrix(err)
    }
}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Io(err)
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Json(err)
    }
}

/// Result type for harness operations
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;
