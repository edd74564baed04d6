//! Memory allocator used by [`Buffer::allocate`](crate::Buffer::allocate).

use sluice_status::{Error, Result};

/// Source of buffer memory.
pub trait Allocator {
    /// Allocates a zeroed block of exactly `size` bytes.
    fn alloc(&self, size: usize) -> Result<Box<[u8]>>;

    /// Releases a block.
    ///
    /// Implementations must accept blocks they did not hand out and succeed
    /// silently for them.
    fn free(&self, memory: Box<[u8]>) -> Result<()>;
}

/// Allocator backed by the global heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAllocator;

impl Allocator for StandardAllocator {
    fn alloc(&self, size: usize) -> Result<Box<[u8]>> {
        let mut memory = Vec::new();
        if memory.try_reserve_exact(size).is_err() {
            return Err(Error::from_errno(libc::ENOMEM));
        }
        memory.resize(size, 0);
        Ok(memory.into_boxed_slice())
    }

    fn free(&self, memory: Box<[u8]>) -> Result<()> {
        drop(memory);
        Ok(())
    }
}
