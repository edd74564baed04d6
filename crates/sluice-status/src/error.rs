//! Error type shared by every sluice operation.

use std::io;

use crate::StatusCode;
use crate::system;

/// Result alias used throughout the sluice crates.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A failed sluice operation.
///
/// Exactly one variant is reported per failure; errors are never combined.
/// Use [`Error::code`] for the stable numeric form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// Error of unspecified type.
    #[error("unknown status code")]
    Unknown,

    /// Opaque OS-level failure that maps to no domain error.
    #[error("{}", describe_errno(.errno))]
    System { errno: i32 },

    /// Operation not supported by this stream or platform.
    #[error("operation not supported")]
    NotSupported,

    /// Invalid argument provided.
    #[error("invalid argument provided")]
    InvalidArgument,

    /// Position or size arithmetic exceeded the representable range.
    #[error("value exceeds the representable range of its type")]
    TypeOverflow,

    /// General I/O error.
    #[error("i/o error")]
    Io,

    /// The source is exhausted.
    #[error("end of stream reached")]
    EndOfFile,

    /// The target region is already saturated.
    #[error("buffer is full")]
    BufferFull,
}

impl Error {
    /// Returns the numeric status code for this error.
    pub fn code(&self) -> StatusCode {
        match self {
            Self::Unknown => StatusCode::UNKNOWN,
            Self::System { .. } => StatusCode::SYSTEM,
            Self::NotSupported => StatusCode::NOT_SUPPORTED,
            Self::InvalidArgument => StatusCode::INVALID_ARGUMENT,
            Self::TypeOverflow => StatusCode::TYPE_OVERFLOW,
            Self::Io => StatusCode::IO,
            Self::EndOfFile => StatusCode::END_OF_FILE,
            Self::BufferFull => StatusCode::BUFFER_FULL,
        }
    }

    /// Maps a raw OS error number to an error, recording it in the calling
    /// thread's system error slot.
    pub fn from_errno(errno: i32) -> Self {
        system::record(errno)
    }

    /// Converts a standard library I/O error.
    ///
    /// Errors carrying a raw OS code go through the same capture path as
    /// [`capture_system_error`](crate::capture_system_error). Errors
    /// synthesized by the standard library itself have no OS code and are
    /// classified by kind.
    pub fn from_io(error: &io::Error) -> Self {
        if let Some(errno) = error.raw_os_error() {
            return Self::from_errno(errno);
        }

        match error.kind() {
            io::ErrorKind::InvalidInput => Self::InvalidArgument,
            io::ErrorKind::Unsupported => Self::NotSupported,
            io::ErrorKind::UnexpectedEof => Self::EndOfFile,
            _ => Self::Io,
        }
    }
}

impl From<io::Error> for Error {
    fn from(error: io::Error) -> Self {
        Self::from_io(&error)
    }
}

fn describe_errno(errno: &i32) -> String {
    io::Error::from_raw_os_error(*errno).to_string()
}
