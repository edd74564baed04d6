//! Opening files as streams.

use std::fmt;
use std::fs::OpenOptions;
use std::ops::BitOr;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

use sluice_status::{Error, Result};

use crate::FdStream;

/// Permission bits for files created by [`open_file`].
pub const CREATE_MODE: u32 = 0o600;

/// File access mode flags.
///
/// Combine exactly one access submode with optional [`APPEND`](Self::APPEND)
/// and [`CREATE`](Self::CREATE):
///
/// ```
/// use sluice_io::FileMode;
///
/// let mode = FileMode::WRITE_ONLY | FileMode::APPEND | FileMode::CREATE;
/// assert!(mode.is_writable());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Read-only access.
    pub const READ_ONLY: Self = Self(0b01);
    /// Write-only access.
    pub const WRITE_ONLY: Self = Self(0b10);
    /// Read-write access.
    pub const READ_WRITE: Self = Self(0b11);
    /// Every write goes to the end of the file.
    pub const APPEND: Self = Self(1 << 2);
    /// Create the file if it does not exist.
    pub const CREATE: Self = Self(1 << 8);

    const ACCESS_MASK: u32 = 0b11;
    const DEFINED: u32 = Self::ACCESS_MASK | Self::APPEND.0 | Self::CREATE.0;

    /// Builds a mode from raw bits.
    ///
    /// Fails with [`Error::InvalidArgument`] if any undefined bit is set.
    pub const fn from_bits(bits: u32) -> Result<Self> {
        if bits & !Self::DEFINED != 0 {
            return Err(Error::InvalidArgument);
        }
        Ok(Self(bits))
    }

    /// Raw bit value.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns true if the access submode includes reading.
    pub const fn is_readable(self) -> bool {
        self.0 & Self::READ_ONLY.0 != 0
    }

    /// Returns true if the access submode includes writing.
    pub const fn is_writable(self) -> bool {
        self.0 & Self::WRITE_ONLY.0 != 0
    }

    fn access(self) -> u32 {
        self.0 & Self::ACCESS_MASK
    }

    /// Translates the mode into open options.
    fn to_open_options(self) -> Result<OpenOptions> {
        let mut options = OpenOptions::new();
        match self.access() {
            0b01 => options.read(true),
            0b10 => options.write(true),
            0b11 => options.read(true).write(true),
            _ => return Err(Error::InvalidArgument),
        };

        if self.contains(Self::APPEND) {
            if !self.is_writable() {
                return Err(Error::InvalidArgument);
            }
            options.append(true);
        }

        if self.contains(Self::CREATE) {
            options.create(true).mode(CREATE_MODE);
        }

        Ok(options)
    }
}

impl BitOr for FileMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access = match self.access() {
            0b01 => "READ_ONLY",
            0b10 => "WRITE_ONLY",
            0b11 => "READ_WRITE",
            _ => "NO_ACCESS",
        };
        write!(f, "FileMode({access}")?;
        if self.contains(Self::APPEND) {
            f.write_str(" | APPEND")?;
        }
        if self.contains(Self::CREATE) {
            f.write_str(" | CREATE")?;
        }
        f.write_str(")")
    }
}

/// Opens the file at `path` as a stream.
///
/// The access submode must be present, and [`FileMode::APPEND`] requires a
/// writable submode; otherwise [`Error::InvalidArgument`] is returned before
/// touching the filesystem. Files created here get [`CREATE_MODE`]
/// permissions.
pub fn open_file(path: impl AsRef<Path>, mode: FileMode) -> Result<FdStream> {
    let path = path.as_ref();
    let options = mode.to_open_options()?;

    let file = options.open(path).map_err(|e| Error::from_io(&e))?;
    tracing::debug!(path = %path.display(), ?mode, "opened file stream");
    Ok(FdStream::from_owned(file.into()))
}
