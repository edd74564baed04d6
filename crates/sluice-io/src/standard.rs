//! Standard input, output and error as streams.
//!
//! [`StandardStreams`] can be opened and passed around like any other
//! dependency. For code that needs process-wide access there is a single
//! shared slot with an explicit lifecycle:
//!
//! 1. [`init`] once at startup,
//! 2. [`with`] from anywhere in between,
//! 3. [`shutdown`] once before exit.
//!
//! Using the slot before [`init`] or after [`shutdown`] fails with
//! [`Error::NotSupported`].

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use sluice_status::{Error, Result};

use crate::{FdStream, Stream};

/// Streams over duplicates of descriptors 0, 1 and 2.
#[derive(Debug)]
pub struct StandardStreams {
    /// Standard input.
    pub stdin: FdStream,
    /// Standard output.
    pub stdout: FdStream,
    /// Standard error.
    pub stderr: FdStream,
}

impl StandardStreams {
    /// Duplicates the three standard descriptors.
    ///
    /// Closing these streams leaves the process's own descriptors open.
    pub fn open() -> Result<Self> {
        Ok(Self {
            stdin: FdStream::from_fd(io::stdin())?,
            stdout: FdStream::from_fd(io::stdout())?,
            stderr: FdStream::from_fd(io::stderr())?,
        })
    }

    /// Closes all three streams, reporting the first failure.
    pub fn close(self) -> Result<()> {
        let results = [self.stdin.close(), self.stdout.close(), self.stderr.close()];
        results.into_iter().collect()
    }
}

static STANDARD: Mutex<Option<StandardStreams>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<StandardStreams>> {
    STANDARD.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Opens the process-wide standard streams.
///
/// Fails with [`Error::InvalidArgument`] if they are already open.
pub fn init() -> Result<()> {
    let mut slot = slot();
    if slot.is_some() {
        return Err(Error::InvalidArgument);
    }

    *slot = Some(StandardStreams::open()?);
    tracing::debug!("standard streams initialized");
    Ok(())
}

/// Runs `f` with exclusive access to the process-wide standard streams.
pub fn with<R>(f: impl FnOnce(&mut StandardStreams) -> R) -> Result<R> {
    let mut slot = slot();
    let streams = slot.as_mut().ok_or(Error::NotSupported)?;
    Ok(f(streams))
}

/// Closes the process-wide standard streams.
pub fn shutdown() -> Result<()> {
    let streams = slot().take().ok_or(Error::NotSupported)?;
    tracing::debug!("standard streams shutting down");
    streams.close()
}
