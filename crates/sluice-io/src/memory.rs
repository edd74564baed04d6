//! In-memory stream backend.
//!
//! [`MemoryStream`] behaves like a regular file held in memory: reads stop
//! at the end with [`Error::EndOfFile`], seeking past the end is allowed and
//! a later write fills the gap with zeros. An optional byte limit turns it
//! into a fixed-size sink that reports [`Error::BufferFull`] once saturated.
//!
//! Growth is fallible: a write that would need more memory than can be
//! allocated fails with the captured `ENOMEM` system error.

use bytes::{Bytes, BytesMut};

use sluice_status::{Error, Result};

use crate::Buffer;
use crate::stream::{Direction, Position, Stream};

/// A seekable [`Stream`] over a growable byte buffer.
#[derive(Debug, Default)]
pub struct MemoryStream {
    data: BytesMut,
    cursor: usize,
    limit: Option<usize>,
}

impl MemoryStream {
    /// Creates an empty, unbounded stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty stream that never grows past `limit` bytes.
    ///
    /// Memory is taken as writes arrive, not up front.
    pub fn bounded(limit: usize) -> Self {
        Self {
            data: BytesMut::new(),
            cursor: 0,
            limit: Some(limit),
        }
    }

    /// Creates an unbounded stream holding `contents`, positioned at the start.
    pub fn with_contents(contents: &[u8]) -> Self {
        Self {
            data: BytesMut::from(contents),
            cursor: 0,
            limit: None,
        }
    }

    /// Current contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Length of the contents in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the stream holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the stream, returning its contents.
    pub fn into_bytes(self) -> Bytes {
        self.data.freeze()
    }

    /// Extends the contents with zeros up to `end` bytes.
    fn grow(&mut self, end: usize) -> Result<()> {
        if end <= self.data.capacity() {
            self.data.resize(end, 0);
            return Ok(());
        }

        let mut grown = Vec::from(std::mem::take(&mut self.data));
        let reserved = grown.try_reserve(end - grown.len());
        if reserved.is_ok() {
            grown.resize(end, 0);
        }
        self.data = BytesMut::from(Bytes::from(grown));
        reserved.map_err(|_| Error::from_errno(libc::ENOMEM))
    }

    fn room(&self) -> usize {
        match self.limit {
            Some(limit) => limit.saturating_sub(self.cursor),
            None => usize::MAX - self.cursor,
        }
    }
}

impl Stream for MemoryStream {
    fn read_buf(&mut self, buffer: &mut Buffer<&mut [u8]>) -> Result<()> {
        let pending = buffer.unfilled_mut();
        if pending.is_empty() {
            return Err(Error::BufferFull);
        }

        let available = self.data.get(self.cursor..).unwrap_or_default();
        if available.is_empty() {
            return Err(Error::EndOfFile);
        }

        let count = pending.len().min(available.len());
        pending[..count].copy_from_slice(&available[..count]);
        self.cursor += count;
        buffer.advance(count);
        Ok(())
    }

    fn write_buf(&mut self, buffer: &mut Buffer<&[u8]>) -> Result<()> {
        let pending = buffer.pending();
        if pending.is_empty() {
            return Err(Error::BufferFull);
        }

        let count = pending.len().min(self.room());
        if count == 0 {
            return Err(Error::BufferFull);
        }

        let end = self.cursor + count;
        if end > self.data.len() {
            self.grow(end)?;
        }
        self.data[self.cursor..end].copy_from_slice(&pending[..count]);
        self.cursor = end;
        buffer.advance(count);
        Ok(())
    }

    fn close(self) -> Result<()> {
        Ok(())
    }

    fn get_pos(&mut self) -> Result<Position> {
        Position::try_from(self.cursor).map_err(|_| Error::TypeOverflow)
    }

    fn set_pos(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        let target = match direction.to_seek_from(distance)? {
            std::io::SeekFrom::Start(offset) => {
                usize::try_from(offset).map_err(|_| Error::TypeOverflow)?
            }
            std::io::SeekFrom::Current(delta) => offset_from(self.cursor, delta)?,
            std::io::SeekFrom::End(delta) => offset_from(self.data.len(), delta)?,
        };

        self.cursor = target;
        self.get_pos()
    }
}

/// Applies a signed delta to `base`.
///
/// Landing before zero is [`Error::InvalidArgument`], as with `lseek`;
/// landing beyond the addressable range is [`Error::TypeOverflow`].
fn offset_from(base: usize, delta: i64) -> Result<usize> {
    let magnitude = usize::try_from(delta.unsigned_abs()).ok();
    if delta < 0 {
        magnitude
            .and_then(|m| base.checked_sub(m))
            .ok_or(Error::InvalidArgument)
    } else {
        magnitude
            .and_then(|m| base.checked_add(m))
            .ok_or(Error::TypeOverflow)
    }
}
