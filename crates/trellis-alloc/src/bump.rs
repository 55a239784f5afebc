//! Fixed-region bump arena.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc};

use crate::allocator::Allocator;

/// A fixed-capacity bump arena.
///
/// One contiguous region is reserved from the global allocator at
/// construction. Allocation advances a cursor, [`release`](Allocator::release)
/// is a no-op, and the whole region is returned when the arena drops. Suits
/// hosts that build many short-lived containers with a known aggregate
/// bound: each allocation costs a pointer bump and teardown is wholesale.
///
/// Reallocation takes a fresh block and copies; the vacated block is not
/// reclaimed until the arena drops or is [`reset`](BumpAlloc::reset). Hosts
/// that need per-block reclamation want [`SystemAlloc`](crate::SystemAlloc)
/// instead.
///
/// The cursor lives in a [`Cell`], so the arena hands out storage through
/// `&self` but is not `Sync`. It is `Send`: a thread that owns an arena
/// outright may move it.
#[derive(Debug)]
pub struct BumpAlloc {
    /// Start of the reserved region.
    region: NonNull<u8>,
    /// Region size in bytes, fixed at construction.
    capacity: usize,
    /// Offset of the first unclaimed byte.
    cursor: Cell<usize>,
}

impl BumpAlloc {
    /// Region size used by [`BumpAlloc::new`]: 1 MiB.
    pub const DEFAULT_CAPACITY: usize = 1 << 20;

    /// Alignment of the region start. Requests with stricter alignment are
    /// still honoured; the cursor aligns the absolute address per request.
    const REGION_ALIGN: usize = 16;

    /// Reserve an arena of [`DEFAULT_CAPACITY`](Self::DEFAULT_CAPACITY) bytes.
    ///
    /// Returns `None` when the region itself cannot be allocated.
    pub fn new() -> Option<Self> {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Reserve an arena of `capacity` bytes.
    ///
    /// Returns `None` when `capacity` is zero or the region itself cannot
    /// be allocated.
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        if capacity == 0 {
            return None;
        }
        let layout = Layout::from_size_align(capacity, Self::REGION_ALIGN).ok()?;
        // SAFETY: layout has nonzero size.
        let ptr = unsafe { alloc(layout) };
        Some(Self {
            region: NonNull::new(ptr)?,
            capacity,
            cursor: Cell::new(0),
        })
    }

    /// Total region size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes claimed so far, alignment padding included.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor.get()
    }

    /// Rewind the cursor to the start of the region, reclaiming everything
    /// at once.
    ///
    /// Requires `&mut self`: containers that borrow this arena keep it
    /// immutably borrowed, so the borrow checker proves none of them is
    /// still alive when the region is recycled.
    pub fn reset(&mut self) {
        self.cursor.set(0);
    }
}

unsafe impl Allocator for BumpAlloc {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let base = self.region.as_ptr() as usize;
        let start = base.checked_add(self.cursor.get())?;
        let aligned = start.checked_add(layout.align() - 1)? & !(layout.align() - 1);
        let end = aligned.checked_add(layout.size())?;
        if end > base + self.capacity {
            return None;
        }
        self.cursor.set(end - base);
        // SAFETY: aligned lies inside the live region, so it is nonnull.
        Some(unsafe { NonNull::new_unchecked(aligned as *mut u8) })
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>> {
        let new_ptr = self.allocate(new_layout)?;
        let preserved = old_layout.size().min(new_layout.size());
        // SAFETY: ptr is live for old_layout per the caller contract; new_ptr
        // is a fresh block of at least `preserved` bytes; the two blocks are
        // disjoint because the cursor only advances.
        unsafe { core::ptr::copy_nonoverlapping(ptr.as_ptr(), new_ptr.as_ptr(), preserved) };
        Some(new_ptr)
    }

    unsafe fn release(&self, _ptr: NonNull<u8>, _layout: Layout) {
        // Bump arenas reclaim wholesale, on drop or reset.
    }
}

// SAFETY: the arena owns its region exclusively; moving the arena moves
// nothing but the pointer and cursor. The Cell keeps it !Sync.
unsafe impl Send for BumpAlloc {}

impl Drop for BumpAlloc {
    fn drop(&mut self) {
        // SAFETY: region and capacity describe the allocation made in
        // with_capacity, with the same layout.
        unsafe {
            let layout = Layout::from_size_align_unchecked(self.capacity, Self::REGION_ALIGN);
            dealloc(self.region.as_ptr(), layout);
        }
    }
}
