//! Stream backed by a POSIX file descriptor.
//!
//! Every hook is exactly one system call: `read`, `write`, `lseek` or
//! `close`. Transfers request at most [`MAX_TRANSFER`] bytes, the largest
//! count a single call can report.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, IntoRawFd, OwnedFd, RawFd};

use sluice_status::{Error, Result, capture_system_error};

use crate::Buffer;
use crate::stream::{Direction, Position, Stream};

/// Largest byte count requested from a single `read` or `write` (`SSIZE_MAX`).
pub const MAX_TRANSFER: usize = isize::MAX as usize;

/// A [`Stream`] over an owned file descriptor.
///
/// The stream owns its descriptor exclusively. Dropping it closes the
/// descriptor and discards any close error; use [`Stream::close`] to observe
/// one.
#[derive(Debug)]
pub struct FdStream {
    file: File,
}

impl FdStream {
    /// Wraps a duplicate of `fd`.
    ///
    /// The caller's descriptor stays open and independent of the stream.
    pub fn from_fd(fd: impl AsFd) -> Result<Self> {
        let fd = fd.as_fd();
        let owned = fd.try_clone_to_owned().map_err(|e| Error::from_io(&e))?;
        tracing::debug!(
            source = fd.as_raw_fd(),
            fd = owned.as_raw_fd(),
            "duplicated descriptor"
        );
        Ok(Self::from_owned(owned))
    }

    /// Takes ownership of `fd` without duplicating it.
    pub fn from_owned(fd: OwnedFd) -> Self {
        Self {
            file: File::from(fd),
        }
    }

    /// Releases the descriptor without closing it.
    pub fn into_owned_fd(self) -> OwnedFd {
        OwnedFd::from(self.file)
    }

    /// Raw descriptor number.
    pub fn raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

impl AsFd for FdStream {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl Stream for FdStream {
    fn read_buf(&mut self, buffer: &mut Buffer<&mut [u8]>) -> Result<()> {
        let pending = buffer.unfilled_mut();
        if pending.is_empty() {
            return Err(Error::BufferFull);
        }
        let length = pending.len().min(MAX_TRANSFER);

        match self.file.read(&mut pending[..length]) {
            Err(e) => Err(Error::from_io(&e)),
            Ok(0) => Err(Error::EndOfFile),
            Ok(count) => {
                buffer.advance(count);
                Ok(())
            }
        }
    }

    fn write_buf(&mut self, buffer: &mut Buffer<&[u8]>) -> Result<()> {
        let pending = buffer.pending();
        if pending.is_empty() {
            return Err(Error::BufferFull);
        }
        let length = pending.len().min(MAX_TRANSFER);

        let count = self
            .file
            .write(&pending[..length])
            .map_err(|e| Error::from_io(&e))?;
        buffer.advance(count);
        Ok(())
    }

    fn close(self) -> Result<()> {
        let fd = self.file.into_raw_fd();
        tracing::debug!(fd, "closing descriptor");

        // SAFETY: `fd` was released from the `File` above; no other owner
        // will close it.
        #[allow(unsafe_code)]
        let rc = unsafe { libc::close(fd) };
        if rc != 0 {
            return Err(capture_system_error());
        }
        Ok(())
    }

    // The kernel never reports a negative offset on success, so the
    // unsigned result from `lseek` is already a valid position.
    fn get_pos(&mut self) -> Result<Position> {
        self.file
            .seek(SeekFrom::Current(0))
            .map_err(|e| Error::from_io(&e))
    }

    fn set_pos(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        let origin = direction.to_seek_from(distance)?;
        self.file.seek(origin).map_err(|e| Error::from_io(&e))
    }
}
