//! Position-tracking buffer window.
//!
//! A [`Buffer`] pairs a block of memory with two cursors:
//!
//! ```text
//! 0          position          length          capacity
//! ├──────────────┼─────────────────┼────────────────┤
//! │  done        │  pending        │  unused        │
//! ```
//!
//! For a read target, `[0, position)` has been filled and
//! `[position, length)` is still to be filled. For a write source,
//! `[0, length)` is the data and `position` marks how much of it the sink
//! has consumed. Transfers only ever move `position` forward;
//! `position <= length <= capacity` holds at every observable point.

use std::fmt;

use sluice_status::{Error, Result};

use crate::Allocator;

/// A memory window with a consumed/produced cursor and a high-water mark.
///
/// `M` is whatever holds the memory: `&mut [u8]` for read targets, `&[u8]`
/// for write sources, or `Box<[u8]>` for buffers obtained from an
/// [`Allocator`].
pub struct Buffer<M> {
    memory: M,
    position: usize,
    length: usize,
}

/// Identity of a buffer window, used to check that stream hooks leave it
/// alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    memory: *const u8,
    capacity: usize,
    length: usize,
}

impl<M: AsRef<[u8]>> Buffer<M> {
    /// Creates a buffer whose pending region is the whole memory block.
    pub fn new(memory: M) -> Self {
        let length = memory.as_ref().len();
        Self {
            memory,
            position: 0,
            length,
        }
    }

    /// Creates a buffer with both cursors at zero.
    pub fn empty(memory: M) -> Self {
        Self {
            memory,
            position: 0,
            length: 0,
        }
    }

    /// Creates a buffer with an explicit window.
    ///
    /// Fails with [`Error::InvalidArgument`] unless
    /// `position <= length <= capacity`.
    pub fn with_window(memory: M, position: usize, length: usize) -> Result<Self> {
        let mut buffer = Self::empty(memory);
        buffer.set_window(position, length)?;
        Ok(buffer)
    }

    /// Total addressable size of the memory block.
    pub fn capacity(&self) -> usize {
        self.memory.as_ref().len()
    }

    /// Index of the next byte to transfer.
    pub fn position(&self) -> usize {
        self.position
    }

    /// High-water mark of the window.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bytes left between `position` and `length`.
    pub fn remaining(&self) -> usize {
        self.length - self.position
    }

    /// Returns true once `position` has reached `length`.
    pub fn is_exhausted(&self) -> bool {
        self.position == self.length
    }

    /// Bytes before `position`: filled for reads, consumed for writes.
    pub fn filled(&self) -> &[u8] {
        &self.memory.as_ref()[..self.position]
    }

    /// Bytes between `position` and `length`.
    pub fn pending(&self) -> &[u8] {
        &self.memory.as_ref()[self.position..self.length]
    }

    /// Replaces both cursors.
    pub fn set_window(&mut self, position: usize, length: usize) -> Result<()> {
        if position > length || length > self.capacity() {
            return Err(Error::InvalidArgument);
        }

        self.position = position;
        self.length = length;
        Ok(())
    }

    /// Moves `position` back to the start, keeping `length`.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Moves `position` forward by `count` transferred bytes.
    ///
    /// # Panics
    ///
    /// Panics if the cursor would pass `length`; a stream that reports more
    /// bytes than it was offered is broken.
    pub fn advance(&mut self, count: usize) {
        assert!(
            count <= self.remaining(),
            "buffer advanced by {count} bytes with only {} pending",
            self.remaining()
        );
        self.position += count;
    }

    /// The whole memory block.
    pub fn memory(&self) -> &[u8] {
        self.memory.as_ref()
    }

    /// Consumes the buffer, returning its memory.
    pub fn into_inner(self) -> M {
        self.memory
    }

    /// Borrows the same window as a write source.
    pub fn as_source(&self) -> Buffer<&[u8]> {
        Buffer {
            memory: self.memory.as_ref(),
            position: self.position,
            length: self.length,
        }
    }

    pub(crate) fn window(&self) -> Window {
        let memory = self.memory.as_ref();
        Window {
            memory: memory.as_ptr(),
            capacity: memory.len(),
            length: self.length,
        }
    }

    /// Asserts that a stream hook left everything but `position` untouched.
    pub(crate) fn assert_window(&self, before: Window, hook: &str) {
        let after = self.window();
        assert!(
            after.memory == before.memory,
            "{hook} replaced the buffer memory"
        );
        assert!(
            after.capacity == before.capacity,
            "{hook} changed the buffer capacity"
        );
        assert!(
            after.length == before.length,
            "{hook} changed the buffer length"
        );
    }

    pub(crate) fn sync_position(&mut self, position: usize) {
        assert!(
            position >= self.position && position <= self.length,
            "stream hook moved the buffer position outside [{}, {}]",
            self.position,
            self.length
        );
        self.position = position;
    }
}

impl<M: AsRef<[u8]> + AsMut<[u8]>> Buffer<M> {
    /// Mutable view of the region still to be filled.
    pub fn unfilled_mut(&mut self) -> &mut [u8] {
        let (position, length) = (self.position, self.length);
        &mut self.memory.as_mut()[position..length]
    }

    /// Mutable access to the whole memory block.
    ///
    /// The cursors are unaffected; callers preparing a write source fill the
    /// memory here and then call [`set_window`](Self::set_window).
    pub fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.as_mut()
    }

    /// Borrows the same window as a read target.
    pub fn as_target(&mut self) -> Buffer<&mut [u8]> {
        Buffer {
            position: self.position,
            length: self.length,
            memory: self.memory.as_mut(),
        }
    }
}

impl Buffer<Box<[u8]>> {
    /// Allocates a buffer of `capacity` bytes with both cursors at zero.
    ///
    /// On failure the allocator's error is returned and nothing is built.
    pub fn allocate<A: Allocator + ?Sized>(allocator: &A, capacity: usize) -> Result<Self> {
        let memory = allocator.alloc(capacity)?;
        debug_assert_eq!(memory.len(), capacity);
        Ok(Self::empty(memory))
    }

    /// Returns the memory to the allocator it came from.
    ///
    /// Consuming the buffer makes a second free of the same allocation
    /// impossible.
    pub fn free<A: Allocator + ?Sized>(self, allocator: &A) -> Result<()> {
        allocator.free(self.memory)
    }
}

impl<M: AsRef<[u8]>> fmt::Debug for Buffer<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("capacity", &self.capacity())
            .field("position", &self.position)
            .field("length", &self.length)
            .finish()
    }
}
