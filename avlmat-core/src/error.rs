//! Error and status types for sparse matrix operations

/// Errors that can occur during matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixError {
    /// Requested element is not stored
    NotFound,
    /// Matrix handle does not refer to a live matrix
    NullMatrix,
    /// Index outside the declared dimensions
    OutOfBounds,
    /// Operand dimensions are incompatible
    DimensionMismatch,
    /// Invalid parameter, or an internal invariant was found broken
    InvalidArgument,
    /// Requested operation variant is not supported
    NotImplemented,
}

impl MatrixError {
    /// Get the status code carried by this error
    pub const fn status(self) -> Status {
        match self {
            MatrixError::NotFound => Status::NotFound,
            MatrixError::NullMatrix => Status::NullMatrix,
            MatrixError::OutOfBounds => Status::OutOfBounds,
            MatrixError::DimensionMismatch => Status::DimensionMismatch,
            MatrixError::InvalidArgument => Status::InvalidArgument,
            MatrixError::NotImplemented => Status::NotImplemented,
        }
    }
}

impl core::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.status().as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MatrixError {}

/// Result type for matrix operations
pub type Result<T> = core::result::Result<T, MatrixError>;

/// Status code returned by every mutating or validating call
///
/// The integer codes are stable: `Ok` and `NotFound` are non-negative,
/// every hard error is negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i8)]
pub enum Status {
    Ok = 0,
    NotFound = 1,
    NullMatrix = -1,
    OutOfBounds = -2,
    DimensionMismatch = -3,
    InvalidArgument = -4,
    NotImplemented = -5,
}

impl Status {
    /// Human-readable description of the status code
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "Operation completed successfully",
            Status::NotFound => "Element not found",
            Status::NullMatrix => "Matrix does not exist",
            Status::OutOfBounds => "Index out of bounds",
            Status::DimensionMismatch => "Matrix dimensions do not match",
            Status::InvalidArgument => "Invalid argument",
            Status::NotImplemented => "Operation not implemented",
        }
    }

    /// Stable integer code
    pub const fn code(self) -> i8 {
        self as i8
    }

    /// Look up a status by its integer code
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            0 => Some(Status::Ok),
            1 => Some(Status::NotFound),
            -1 => Some(Status::NullMatrix),
            -2 => Some(Status::OutOfBounds),
            -3 => Some(Status::DimensionMismatch),
            -4 => Some(Status::InvalidArgument),
            -5 => Some(Status::NotImplemented),
            _ => None,
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl core::fmt::Display for Status {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Ok,
            Err(err) => err.status(),
        }
    }
}

impl From<MatrixError> for Status {
    fn from(err: MatrixError) -> Self {
        err.status()
    }
}
