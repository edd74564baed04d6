//! # sluice-status: Status Model for sluice Streams
//!
//! Every sluice operation reports exactly one outcome: `Ok` or one [`Error`].
//! Each error has a stable numeric [`StatusCode`] so that top-level tools can
//! turn failures into exit codes and messages without matching on variants.
//!
//! # Code Space
//!
//! ```text
//! 0x00 ─ 0x0F   reserved    success, unknown, system
//! 0x10 ─ 0x1F   user call   not supported, invalid argument
//! 0x20 ─ 0x2F   type        type overflow
//! 0x30 ─ 0x3F   i/o         general, end of file, buffer full
//! ```
//!
//! Codes are classified by range ([`Namespace`]), so a handler can still tell
//! which family an unrecognized code belongs to.
//!
//! # System Errors
//!
//! [`capture_system_error`] records the calling thread's last OS error and
//! maps the recognizable ones onto domain errors. The slot is thread-local:
//! capture right after the failing call, before any other system call on the
//! same thread.

mod code;
mod error;
mod system;

pub use code::{Namespace, StatusCode, UNKNOWN_STATUS_STRING, status_string};
pub use error::{Error, Result};
pub use system::{capture_system_error, last_system_error};
