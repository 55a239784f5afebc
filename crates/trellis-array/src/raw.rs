//! Raw buffer ownership: allocation, regrowth, release.
//!
//! [`RawBuf`] owns the (possibly absent) allocation behind an array and
//! nothing else: no element count, no initialization tracking. Those belong
//! to `DynArray`, which is the only user of this module.
//!
//! Invariants:
//!
//! - `data` is dangling exactly when `capacity == 0`; no allocation exists
//!   in that state.
//! - when `capacity > 0`, `data` was obtained from `alloc` for
//!   `Layout::array::<T>(capacity)` and is valid for `capacity` elements.
//! - buffers are replaced acquire-before-release: the new block is obtained
//!   (with the old bytes moved into it) before the old block is given up,
//!   so a declined request leaves the old buffer fully intact.

use core::alloc::Layout;
use core::mem;
use core::ptr::NonNull;

use trellis_alloc::Allocator;

use crate::error::ArrayError;
use crate::growth;

pub(crate) struct RawBuf<T, A: Allocator> {
    data: NonNull<T>,
    capacity: usize,
    alloc: A,
}

impl<T, A: Allocator> RawBuf<T, A> {
    /// An empty buffer over `alloc`. Allocates nothing.
    pub(crate) fn new_in(alloc: A) -> Self {
        Self {
            data: NonNull::dangling(),
            capacity: 0,
            alloc,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn ptr(&self) -> NonNull<T> {
        self.data
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Layout for `capacity` elements, with the element-type guards applied.
    fn layout_for(capacity: usize) -> Result<Layout, ArrayError> {
        if mem::size_of::<T>() == 0 {
            return Err(ArrayError::ZeroSizedElement);
        }
        let max = growth::max_elements::<T>();
        if capacity > max {
            return Err(ArrayError::LengthExceeded {
                requested: capacity,
                max,
            });
        }
        Layout::array::<T>(capacity).map_err(|_| ArrayError::LengthExceeded {
            requested: capacity,
            max,
        })
    }

    /// Replace the allocation so it holds exactly `new_capacity` slots,
    /// carrying the existing bytes across. `new_capacity == 0` releases the
    /// buffer outright. On error the buffer is untouched.
    ///
    /// Elements are moved bitwise by the backend; callers only need the
    /// first `len` slots preserved and that is what `min(old, new)` bytes
    /// covers, since callers never shrink below their live length.
    pub(crate) fn regrow(&mut self, new_capacity: usize) -> Result<(), ArrayError> {
        if new_capacity == self.capacity {
            return Ok(());
        }
        if new_capacity == 0 {
            self.release();
            return Ok(());
        }
        let new_layout = Self::layout_for(new_capacity)?;
        let bytes = new_layout.size();
        let ptr = if self.capacity == 0 {
            self.alloc.allocate(new_layout)
        } else {
            let old_layout = Self::layout_for(self.capacity)
                .expect("existing capacity was validated when it was allocated");
            // SAFETY: data is the live block for old_layout (struct
            // invariant), and per-element layouts share one alignment.
            unsafe {
                self.alloc
                    .reallocate(self.data.cast::<u8>(), old_layout, new_layout)
            }
        };
        let ptr = match ptr {
            Some(ptr) => ptr.cast::<T>(),
            None => {
                return Err(ArrayError::AllocFailed {
                    elements: new_capacity,
                    bytes,
                })
            }
        };
        self.data = ptr;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Release the allocation, if any, and return to the empty state.
    pub(crate) fn release(&mut self) {
        if self.capacity == 0 {
            return;
        }
        let layout = Self::layout_for(self.capacity)
            .expect("existing capacity was validated when it was allocated");
        // SAFETY: data is the live block for this layout (struct invariant);
        // the fields are reset below, so the block is released exactly once.
        unsafe { self.alloc.release(self.data.cast::<u8>(), layout) };
        self.data = NonNull::dangling();
        self.capacity = 0;
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}
