//! Thread-local capture of the last OS error.

use std::cell::Cell;
use std::io;

use crate::Error;

thread_local! {
    /// Last raw OS error captured on this thread (0 when none).
    static LAST_SYSTEM_ERROR: Cell<i32> = const { Cell::new(0) };
}

/// Captures the calling thread's last OS error and maps it to an [`Error`].
///
/// The raw value is stored for the calling thread only, overwriting any
/// earlier capture. Recognized values map to domain errors; anything else
/// becomes [`Error::System`].
pub fn capture_system_error() -> Error {
    let errno = io::Error::last_os_error().raw_os_error().unwrap_or(0);
    record(errno)
}

/// Returns the raw OS error last captured on this thread, if any.
pub fn last_system_error() -> Option<i32> {
    match LAST_SYSTEM_ERROR.with(Cell::get) {
        0 => None,
        errno => Some(errno),
    }
}

pub(crate) fn record(errno: i32) -> Error {
    LAST_SYSTEM_ERROR.with(|slot| slot.set(errno));

    let error = classify(errno);
    tracing::debug!(errno, status = %error.code(), "captured system error");
    error
}

fn classify(errno: i32) -> Error {
    match errno {
        libc::EINVAL => Error::InvalidArgument,
        libc::ENOTSUP => Error::NotSupported,
        libc::EIO => Error::Io,
        libc::ENOBUFS => Error::BufferFull,
        _ => Error::System { errno },
    }
}
