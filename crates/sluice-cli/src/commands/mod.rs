//! CLI command implementations.

pub mod cat;
pub mod echo;
pub mod peek;
pub mod status;
pub mod write;

use sluice_io::{Buffer, Error, Result, Stream, StreamExt};

/// Copies `source` to `sink` through `buffer` until the source reports end
/// of stream, returning the number of bytes copied.
///
/// Each round is one single-shot read followed by a full-transfer write of
/// whatever it produced.
pub fn copy<R, W>(source: &mut R, sink: &mut W, buffer: &mut Buffer<Box<[u8]>>) -> Result<u64>
where
    R: Stream + ?Sized,
    W: Stream + ?Sized,
{
    let capacity = buffer.capacity();
    let mut copied = 0u64;

    loop {
        buffer.set_window(0, capacity)?;
        match source.read_buffer(buffer) {
            Ok(()) => {}
            Err(Error::EndOfFile) => break,
            Err(e) => return Err(e),
        }

        let filled = buffer.position();
        buffer.set_window(0, filled)?;
        sink.write_buffer_full(buffer)?;
        copied += filled as u64;
    }

    tracing::debug!(copied, "copy finished");
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_io::{MemoryStream, StandardAllocator};

    #[test]
    fn copies_everything_in_chunks() {
        let data: Vec<u8> = (0..100).collect();
        let mut source = MemoryStream::with_contents(&data);
        let mut sink = MemoryStream::new();
        let mut buffer = Buffer::allocate(&StandardAllocator, 7).unwrap();

        assert_eq!(copy(&mut source, &mut sink, &mut buffer).unwrap(), 100);
        assert_eq!(sink.as_slice(), &data[..]);
    }

    #[test]
    fn empty_source_copies_nothing() {
        let mut source = MemoryStream::new();
        let mut sink = MemoryStream::new();
        let mut buffer = Buffer::allocate(&StandardAllocator, 8).unwrap();

        assert_eq!(copy(&mut source, &mut sink, &mut buffer).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn sink_errors_stop_the_copy() {
        let mut source = MemoryStream::with_contents(b"0123456789");
        let mut sink = MemoryStream::bounded(4);
        let mut buffer = Buffer::allocate(&StandardAllocator, 3).unwrap();

        assert_eq!(
            copy(&mut source, &mut sink, &mut buffer),
            Err(Error::BufferFull)
        );
        assert_eq!(sink.as_slice(), b"0123");
    }
}
