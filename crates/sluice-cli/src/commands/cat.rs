//! Cat command: copy sources to stdout in order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sluice_io::{Buffer, FileMode, StandardAllocator, open_file, standard};

use super::copy;
use crate::config::TransferConfig;

/// Path naming standard input.
const STDIN_PATH: &str = "-";

pub fn run(paths: &[PathBuf], transfer: &TransferConfig) -> Result<()> {
    let mut buffer = Buffer::allocate(&StandardAllocator, transfer.chunk_size)?;

    if paths.is_empty() {
        copy_stdin(&mut buffer)?;
    }
    for path in paths {
        if path == Path::new(STDIN_PATH) {
            copy_stdin(&mut buffer)?;
            continue;
        }

        let mut source = open_file(path, FileMode::READ_ONLY)
            .with_context(|| path.display().to_string())?;
        let copied = standard::with(|streams| copy(&mut source, &mut streams.stdout, &mut buffer))?
            .with_context(|| path.display().to_string())?;
        tracing::debug!(path = %path.display(), copied, "source copied");
        sluice_io::close(source)?;
    }

    buffer.free(&StandardAllocator)?;
    Ok(())
}

fn copy_stdin(buffer: &mut Buffer<Box<[u8]>>) -> Result<()> {
    let copied = standard::with(|streams| copy(&mut streams.stdin, &mut streams.stdout, buffer))??;
    tracing::debug!(copied, "stdin copied");
    Ok(())
}
