//! Tagged union over the built-in backends.

use sluice_status::Result;

use crate::stream::{Direction, Position, Stream};
use crate::{Buffer, FdStream, MemoryStream};

/// Any built-in stream, dispatched statically by variant.
///
/// Unlike `dyn Stream`, an `AnyStream` can still be closed, since it is
/// owned and sized.
#[derive(Debug)]
pub enum AnyStream {
    /// File-descriptor backend.
    Fd(FdStream),
    /// In-memory backend.
    Memory(MemoryStream),
}

impl From<FdStream> for AnyStream {
    fn from(stream: FdStream) -> Self {
        Self::Fd(stream)
    }
}

impl From<MemoryStream> for AnyStream {
    fn from(stream: MemoryStream) -> Self {
        Self::Memory(stream)
    }
}

impl Stream for AnyStream {
    fn read_buf(&mut self, buffer: &mut Buffer<&mut [u8]>) -> Result<()> {
        match self {
            Self::Fd(stream) => stream.read_buf(buffer),
            Self::Memory(stream) => stream.read_buf(buffer),
        }
    }

    fn write_buf(&mut self, buffer: &mut Buffer<&[u8]>) -> Result<()> {
        match self {
            Self::Fd(stream) => stream.write_buf(buffer),
            Self::Memory(stream) => stream.write_buf(buffer),
        }
    }

    fn close(self) -> Result<()> {
        match self {
            Self::Fd(stream) => stream.close(),
            Self::Memory(stream) => stream.close(),
        }
    }

    fn get_pos(&mut self) -> Result<Position> {
        match self {
            Self::Fd(stream) => stream.get_pos(),
            Self::Memory(stream) => stream.get_pos(),
        }
    }

    fn set_pos(&mut self, distance: Position, direction: Direction) -> Result<Position> {
        match self {
            Self::Fd(stream) => stream.set_pos(distance, direction),
            Self::Memory(stream) => stream.set_pos(distance, direction),
        }
    }
}
