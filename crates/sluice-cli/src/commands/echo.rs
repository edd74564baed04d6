//! Echo command: one read from stdin, written back to stdout.

use anyhow::Result;
use sluice_io::{Buffer, StandardAllocator, StreamExt, standard};

use crate::config::TransferConfig;

pub fn run(transfer: &TransferConfig) -> Result<()> {
    let mut buffer = Buffer::allocate(&StandardAllocator, transfer.chunk_size)?;
    buffer.set_window(0, buffer.capacity())?;

    standard::with(|streams| -> sluice_io::Result<()> {
        streams.stdin.read_buffer(&mut buffer)?;
        let read = buffer.position();
        buffer.set_window(0, read)?;
        streams.stdout.write_buffer_full(&mut buffer)
    })??;

    buffer.free(&StandardAllocator)?;
    Ok(())
}
