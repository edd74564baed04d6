//! Write command: copy stdin into a file.

use std::path::Path;

use anyhow::{Context, Result};
use sluice_io::{Buffer, FileMode, StandardAllocator, open_file, standard};

use super::copy;
use crate::config::TransferConfig;

pub fn run(path: &Path, append: bool, create: bool, transfer: &TransferConfig) -> Result<()> {
    let mode = open_mode(append, create);
    let mut sink = open_file(path, mode).with_context(|| path.display().to_string())?;
    let mut buffer = Buffer::allocate(&StandardAllocator, transfer.chunk_size)?;

    let copied = standard::with(|streams| copy(&mut streams.stdin, &mut sink, &mut buffer))?
        .with_context(|| path.display().to_string())?;
    tracing::debug!(path = %path.display(), copied, ?mode, "stdin written");

    buffer.free(&StandardAllocator)?;
    sluice_io::close(sink).with_context(|| path.display().to_string())?;
    Ok(())
}

fn open_mode(append: bool, create: bool) -> FileMode {
    let mut mode = FileMode::WRITE_ONLY;
    if append {
        mode = mode | FileMode::APPEND;
    }
    if create {
        mode = mode | FileMode::CREATE;
    }
    mode
}
