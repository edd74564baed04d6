//! # sluice-io: Buffer and Stream Abstraction
//!
//! A uniform byte-stream interface over file descriptors and memory, built
//! on a position-tracking [`Buffer`] and the status model of
//! [`sluice_status`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │  StreamExt: read/write, *_full loops, │
//! │  tell/seek, formatted write           │
//! └──────────────────┬───────────────────┘
//!                    │ Stream hooks
//! ┌──────────────────┴───────────────────┐
//! │  ┌──────────┐ ┌──────────────┐       │
//! │  │ FdStream │ │ MemoryStream │  ...  │
//! │  └──────────┘ └──────────────┘       │
//! └──────────────────────────────────────┘
//! ```
//!
//! Every single-shot call maps to at most one underlying transfer. The
//! full-transfer forms loop until the buffer window is done and stop at the
//! first error.
//!
//! ```no_run
//! use sluice_io::{FileMode, StreamExt, open_file};
//!
//! # fn main() -> sluice_io::Result<()> {
//! let mut stream = open_file("greeting.txt", FileMode::WRITE_ONLY | FileMode::CREATE)?;
//! stream.write_full(b"hello")?;
//! sluice_io::close(stream)?;
//! # Ok(())
//! # }
//! ```

mod alloc;
mod any;
mod buffer;
mod fd;
mod file;
mod formatted;
mod memory;
pub mod standard;
mod stream;

pub use alloc::{Allocator, StandardAllocator};
pub use any::AnyStream;
pub use buffer::Buffer;
pub use fd::{FdStream, MAX_TRANSFER};
pub use file::{CREATE_MODE, FileMode, open_file};
pub use formatted::write_formatted;
pub use memory::MemoryStream;
pub use sluice_status::{Error, Result, StatusCode};
pub use standard::StandardStreams;
pub use stream::{Direction, Position, Stream, StreamExt, close};

#[cfg(test)]
mod tests;
