//! Stream capability set and the generic algorithms layered on it.
//!
//! A backend implements the raw hooks of [`Stream`]. Callers use
//! [`StreamExt`], which checks the buffer contract around every hook call
//! and adds the full-transfer loops:
//!
//! ```text
//! caller ─▶ StreamExt (validate, loop) ─▶ Stream hook ─▶ backend ─▶ OS
//! ```
//!
//! Each single-shot call maps to at most one underlying transfer; there is
//! no read-ahead or write coalescing at this layer.

use std::fmt;
use std::io::SeekFrom;

use sluice_status::{Error, Result};

use crate::Buffer;

/// Absolute byte position within a stream.
pub type Position = u64;

/// Direction for [`StreamExt::seek`], made of two independent bits.
///
/// Bit 0 selects rewind (backward) over skip (forward). Bit 1 anchors the
/// move to the start of the stream when skipping and to its end when
/// rewinding; without it the move is relative to the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Direction(u8);

impl Direction {
    /// Skip forward from the current position.
    pub const SKIP: Self = Self(0b00);
    /// Rewind backward from the current position.
    pub const REWIND: Self = Self(0b01);
    /// Skip forward from the start of the stream.
    pub const START: Self = Self(0b10);
    /// Rewind backward from the end of the stream.
    pub const END: Self = Self(0b11);

    const REWIND_BIT: u8 = 0b01;
    const ANCHOR_BIT: u8 = 0b10;

    /// Builds a direction from its raw bits, rejecting undefined ones.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !(Self::REWIND_BIT | Self::ANCHOR_BIT) == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Raw bit value.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true when moving backward.
    pub const fn is_rewind(self) -> bool {
        self.0 & Self::REWIND_BIT != 0
    }

    /// Returns true when anchored to the start or end of the stream.
    pub const fn is_anchored(self) -> bool {
        self.0 & Self::ANCHOR_BIT != 0
    }

    /// Translates a distance in this direction into a seek origin and signed
    /// offset.
    ///
    /// Fails with [`Error::TypeOverflow`] when the distance does not fit the
    /// signed offset type.
    pub fn to_seek_from(self, distance: Position) -> Result<SeekFrom> {
        let offset = if self.is_rewind() {
            0i64.checked_sub_unsigned(distance)
        } else {
            i64::try_from(distance).ok()
        }
        .ok_or(Error::TypeOverflow)?;

        Ok(match (self.is_anchored(), self.is_rewind()) {
            (true, false) => SeekFrom::Start(offset.unsigned_abs()),
            (true, true) => SeekFrom::End(offset),
            (false, _) => SeekFrom::Current(offset),
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::SKIP => "skip",
            Self::REWIND => "rewind",
            Self::START => "start",
            _ => "end",
        };
        f.write_str(name)
    }
}

/// Raw hooks a stream backend provides.
///
/// Hooks may only move a buffer's `position` forward (and, for reads, write
/// into its pending region). The generic layer in [`StreamExt`] asserts this
/// after every call.
///
/// A single stream is not safe for concurrent use; hooks take `&mut self`.
pub trait Stream {
    /// Reads into `buffer`'s pending region, advancing its position by the
    /// number of bytes read.
    fn read_buf(&mut self, buffer: &mut Buffer<&mut [u8]>) -> Result<()>;

    /// Writes from `buffer`'s pending region, advancing its position by the
    /// number of bytes written.
    fn write_buf(&mut self, buffer: &mut Buffer<&[u8]>) -> Result<()>;

    /// Closes the stream, releasing its backing resource.
    fn close(self) -> Result<()>
    where
        Self: Sized;

    /// Reports the absolute position.
    fn get_pos(&mut self) -> Result<Position> {
        Err(Error::NotSupported)
    }

    /// Moves by `distance` in `direction`, returning the resulting absolute
    /// position as [`get_pos`](Self::get_pos) would report it.
    fn set_pos(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        let _ = (distance, direction);
        Err(Error::NotSupported)
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    fn read_buf(&mut self, buffer: &mut Buffer<&mut [u8]>) -> Result<()> {
        (**self).read_buf(buffer)
    }

    fn write_buf(&mut self, buffer: &mut Buffer<&[u8]>) -> Result<()> {
        (**self).write_buf(buffer)
    }

    /// Closing through a borrow leaves the stream to its owner.
    fn close(self) -> Result<()> {
        Err(Error::NotSupported)
    }

    fn get_pos(&mut self) -> Result<Position> {
        (**self).get_pos()
    }

    fn set_pos(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        (**self).set_pos(distance, direction)
    }
}

/// Closes a stream. Consuming it rules out a second close.
pub fn close<S: Stream>(stream: S) -> Result<()> {
    stream.close()
}

/// Generic algorithms over any [`Stream`].
pub trait StreamExt: Stream {
    /// Single-shot read into `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if the hook touched anything but the buffer position.
    fn read_buffer<M>(&mut self, buffer: &mut Buffer<M>) -> Result<()>
    where
        M: AsRef<[u8]> + AsMut<[u8]>,
    {
        let before = buffer.window();
        let mut target = buffer.as_target();
        let result = self.read_buf(&mut target);
        target.assert_window(before, "read_buf");

        let position = target.position();
        buffer.sync_position(position);
        tracing::trace!(position, length = buffer.length(), ok = result.is_ok(), "read_buf");
        result
    }

    /// Single-shot read into `memory`, returning the number of bytes read.
    fn read(&mut self, memory: &mut [u8]) -> Result<usize> {
        let mut buffer = Buffer::new(memory);
        self.read_buffer(&mut buffer)?;
        Ok(buffer.position())
    }

    /// Reads until `buffer`'s pending region is filled.
    ///
    /// Fails with [`Error::BufferFull`] without touching the stream when
    /// there is nothing left to fill. Otherwise the first error from any
    /// iteration is returned as-is, with `position` showing how far the
    /// transfer got.
    fn read_buffer_full<M>(&mut self, buffer: &mut Buffer<M>) -> Result<()>
    where
        M: AsRef<[u8]> + AsMut<[u8]>,
    {
        if buffer.is_exhausted() {
            return Err(Error::BufferFull);
        }

        while !buffer.is_exhausted() {
            let position = buffer.position();
            self.read_buffer(buffer)?;
            assert_progress(position, buffer.position(), "read_buf");
        }
        Ok(())
    }

    /// Fills all of `memory`, returning its length.
    ///
    /// Use [`read_buffer_full`](Self::read_buffer_full) to observe partial
    /// progress on failure.
    fn read_full(&mut self, memory: &mut [u8]) -> Result<usize> {
        let mut buffer = Buffer::new(memory);
        self.read_buffer_full(&mut buffer)?;
        Ok(buffer.position())
    }

    /// Single-shot write from `buffer`.
    ///
    /// # Panics
    ///
    /// Panics if the hook touched anything but the buffer position.
    fn write_buffer<M>(&mut self, buffer: &mut Buffer<M>) -> Result<()>
    where
        M: AsRef<[u8]>,
    {
        let before = buffer.window();
        let mut source = buffer.as_source();
        let result = self.write_buf(&mut source);
        source.assert_window(before, "write_buf");

        let position = source.position();
        buffer.sync_position(position);
        tracing::trace!(position, length = buffer.length(), ok = result.is_ok(), "write_buf");
        result
    }

    /// Single-shot write of `memory`, returning the number of bytes written.
    fn write(&mut self, memory: &[u8]) -> Result<usize> {
        let mut buffer = Buffer::new(memory);
        self.write_buffer(&mut buffer)?;
        Ok(buffer.position())
    }

    /// Writes until `buffer`'s pending region is drained.
    ///
    /// Same policy as [`read_buffer_full`](Self::read_buffer_full): an empty
    /// pending region is [`Error::BufferFull`], and the first error stops the
    /// loop.
    fn write_buffer_full<M>(&mut self, buffer: &mut Buffer<M>) -> Result<()>
    where
        M: AsRef<[u8]>,
    {
        if buffer.is_exhausted() {
            return Err(Error::BufferFull);
        }

        while !buffer.is_exhausted() {
            let position = buffer.position();
            self.write_buffer(buffer)?;
            assert_progress(position, buffer.position(), "write_buf");
        }
        Ok(())
    }

    /// Writes all of `memory`, returning its length.
    fn write_full(&mut self, memory: &[u8]) -> Result<usize> {
        let mut buffer = Buffer::new(memory);
        self.write_buffer_full(&mut buffer)?;
        Ok(buffer.position())
    }

    /// Returns the absolute position.
    fn tell(&mut self) -> Result<Position> {
        self.get_pos()
    }

    /// Moves by `distance` in `direction` and returns the new absolute
    /// position.
    fn seek(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        let position = self.set_pos(distance, direction)?;
        tracing::debug!(distance, %direction, position, "seek");
        Ok(position)
    }

    /// Writes formatted text, returning the number of bytes written.
    ///
    /// See [`write_formatted`](crate::write_formatted).
    fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<usize> {
        crate::write_formatted(self, args)
    }
}

impl<S: Stream + ?Sized> StreamExt for S {}

fn assert_progress(before: usize, after: usize, hook: &str) {
    assert!(
        after > before,
        "{hook} reported success without transferring any bytes"
    );
}
