//! Peek command: print bytes from a position in a file.

use std::path::Path;

use anyhow::{Context, Result};
use sluice_io::{
    Buffer, Direction, Error, FileMode, StandardAllocator, StreamExt, open_file, standard,
};

use crate::config::TransferConfig;

pub fn run(
    path: &Path,
    offset: u64,
    from_end: bool,
    length: Option<u64>,
    transfer: &TransferConfig,
) -> Result<()> {
    let length = match length {
        Some(length) => usize::try_from(length).map_err(|_| Error::TypeOverflow)?,
        None => transfer.chunk_size,
    };
    let direction = if from_end {
        Direction::END
    } else {
        Direction::START
    };

    let mut source =
        open_file(path, FileMode::READ_ONLY).with_context(|| path.display().to_string())?;
    let position = source
        .seek(offset, direction)
        .with_context(|| path.display().to_string())?;
    tracing::debug!(path = %path.display(), position, length, "peeking");

    let mut buffer = Buffer::allocate(&StandardAllocator, length)?;
    buffer.set_window(0, length)?;
    match source.read_buffer_full(&mut buffer) {
        Ok(()) | Err(Error::EndOfFile) => {}
        Err(e) => return Err(e).with_context(|| path.display().to_string()),
    }

    // Nothing past the seek position: print nothing.
    if buffer.position() > 0 {
        let read = buffer.position();
        buffer.set_window(0, read)?;
        standard::with(|streams| streams.stdout.write_buffer_full(&mut buffer))??;
    }

    buffer.free(&StandardAllocator)?;
    sluice_io::close(source)?;
    Ok(())
}
