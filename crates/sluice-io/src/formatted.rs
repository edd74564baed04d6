//! Formatted text output.

use std::fmt::{self, Write as _};

use sluice_status::{Error, Result};

use crate::{Stream, StreamExt};

/// Largest rendered size accepted, the limit of a single allocation.
const MAX_FORMATTED: usize = isize::MAX as usize;

/// Renders `args` and writes the result to `stream` with a full-transfer
/// write, returning the number of bytes written.
///
/// A first pass measures the output; sizes at the representable limit fail
/// with [`Error::TypeOverflow`]. Output that renders to nothing is an empty
/// full transfer and fails with [`Error::BufferFull`].
///
/// # Panics
///
/// Panics if the two formatting passes disagree on the size.
pub fn write_formatted<S: Stream + ?Sized>(
    stream: &mut S,
    args: fmt::Arguments<'_>,
) -> Result<usize> {
    write_formatted_within(stream, args, MAX_FORMATTED)
}

fn write_formatted_within<S: Stream + ?Sized>(
    stream: &mut S,
    args: fmt::Arguments<'_>,
    limit: usize,
) -> Result<usize> {
    let size = measure(args, limit)?;

    let mut rendered = String::with_capacity(size);
    rendered.write_fmt(args).map_err(|_| Error::Unknown)?;
    assert_eq!(
        rendered.len(),
        size,
        "formatting produced a different size on the second pass"
    );

    stream.write_full(rendered.as_bytes())
}

fn measure(args: fmt::Arguments<'_>, limit: usize) -> Result<usize> {
    let mut counter = Counter::new(limit);
    match counter.write_fmt(args) {
        Ok(()) => Ok(counter.size),
        Err(_) if counter.overflowed => Err(Error::TypeOverflow),
        Err(_) => Err(Error::Unknown),
    }
}

/// Counts rendered bytes without storing them, up to a limit.
struct Counter {
    size: usize,
    limit: usize,
    overflowed: bool,
}

impl Counter {
    fn new(limit: usize) -> Self {
        Self {
            size: 0,
            limit,
            overflowed: false,
        }
    }
}

impl fmt::Write for Counter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.size.checked_add(s.len()) {
            Some(size) if size < self.limit => {
                self.size = size;
                Ok(())
            }
            _ => {
                self.overflowed = true;
                Err(fmt::Error)
            }
        }
    }
}

/// Writes formatted text to a stream.
///
/// Expands to [`StreamExt::print_fmt`](crate::StreamExt::print_fmt) and
/// evaluates to `Result<usize>`.
///
/// ```
/// use sluice_io::{MemoryStream, stream_print};
///
/// let mut stream = MemoryStream::new();
/// let written = stream_print!(stream, "{}-{}", 4, "two").unwrap();
/// assert_eq!(written, 5);
/// ```
#[macro_export]
macro_rules! stream_print {
    ($stream:expr, $($arg:tt)*) => {
        $crate::StreamExt::print_fmt(&mut $stream, ::std::format_args!($($arg)*))
    };
}

/// Like [`stream_print!`], followed by a newline.
#[macro_export]
macro_rules! stream_println {
    ($stream:expr) => {
        $crate::stream_print!($stream, "\n")
    };
    ($stream:expr, $($arg:tt)*) => {
        $crate::StreamExt::print_fmt(
            &mut $stream,
            ::std::format_args!("{}\n", ::std::format_args!($($arg)*)),
        )
    };
}
