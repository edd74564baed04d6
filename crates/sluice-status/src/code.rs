//! Numeric status codes and their text.

use std::borrow::Cow;
use std::fmt;
use std::io;

use crate::system::last_system_error;

/// Text rendered for any code without a known meaning.
pub const UNKNOWN_STATUS_STRING: &str = "unknown status code";

/// Stable numeric form of an operation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StatusCode(u32);

impl StatusCode {
    /// General success.
    pub const SUCCESS: Self = Self(0x0);
    /// Error of unspecified type.
    pub const UNKNOWN: Self = Self(0x1);
    /// Opaque system error.
    pub const SYSTEM: Self = Self(0x2);

    /// Operation not supported.
    pub const NOT_SUPPORTED: Self = Self(0x11);
    /// Invalid argument provided.
    pub const INVALID_ARGUMENT: Self = Self(0x12);

    /// Arithmetic exceeded the range of its type.
    pub const TYPE_OVERFLOW: Self = Self(0x21);

    /// General I/O error.
    pub const IO: Self = Self(0x30);
    /// End of stream reached.
    pub const END_OF_FILE: Self = Self(0x31);
    /// Buffer already full.
    pub const BUFFER_FULL: Self = Self(0x32);

    /// Wraps a raw value. Any value is accepted; unknown ones still classify
    /// by [`namespace`](Self::namespace).
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true for [`StatusCode::SUCCESS`].
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Classifies the code by numeric range.
    pub const fn namespace(self) -> Namespace {
        match self.0 {
            0x00..=0x0F => Namespace::Reserved,
            0x10..=0x1F => Namespace::UserCall,
            0x20..=0x2F => Namespace::Type,
            0x30..=0x3F => Namespace::Io,
            _ => Namespace::Unassigned,
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}

impl From<u32> for StatusCode {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl<T> From<&crate::Result<T>> for StatusCode {
    fn from(result: &crate::Result<T>) -> Self {
        match result {
            Ok(_) => Self::SUCCESS,
            Err(error) => error.code(),
        }
    }
}

/// Family a status code belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Meta codes: success, unknown, system.
    Reserved,
    /// Errors caused by how an operation was called.
    UserCall,
    /// Errors from value representation limits.
    Type,
    /// Errors from the data transfer itself.
    Io,
    /// Outside every known range.
    Unassigned,
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reserved => "reserved",
            Self::UserCall => "user call",
            Self::Type => "type",
            Self::Io => "i/o",
            Self::Unassigned => "unassigned",
        };
        f.write_str(name)
    }
}

/// Returns the text for a status code.
///
/// Never fails. [`StatusCode::SYSTEM`] renders the OS description of the
/// error last captured on the calling thread.
pub fn status_string(code: StatusCode) -> Cow<'static, str> {
    let text = match code {
        StatusCode::SUCCESS => "success",
        StatusCode::SYSTEM => return system_string(),
        StatusCode::NOT_SUPPORTED => "operation not supported",
        StatusCode::INVALID_ARGUMENT => "invalid argument provided",
        StatusCode::TYPE_OVERFLOW => "value exceeds the representable range of its type",
        StatusCode::IO => "i/o error",
        StatusCode::END_OF_FILE => "end of stream reached",
        StatusCode::BUFFER_FULL => "buffer is full",
        _ => UNKNOWN_STATUS_STRING,
    };
    Cow::Borrowed(text)
}

fn system_string() -> Cow<'static, str> {
    match last_system_error() {
        Some(errno) => Cow::Owned(io::Error::from_raw_os_error(errno).to_string()),
        None => Cow::Borrowed(UNKNOWN_STATUS_STRING),
    }
}
