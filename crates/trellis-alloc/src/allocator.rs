//! The allocate / reallocate / release triple every backend implements.

use core::alloc::Layout;
use core::ptr::NonNull;

/// A source of raw storage for container buffers.
///
/// Containers obtain, resize, and return their buffers exclusively through
/// this trait, which keeps the choice of backend with the host. Exhaustion
/// is reported as `None` and surfaces to container callers as a recoverable
/// error; backends do not panic for an unsatisfiable request.
///
/// Buffers are grown by [`reallocate`](Allocator::reallocate), which either
/// moves the block or fails leaving the original intact. Containers rely on
/// that all-or-nothing behaviour for their own rollback guarantees.
///
/// # Safety
///
/// Implementors must uphold the allocator contract: a `Some` pointer
/// returned from [`allocate`](Allocator::allocate) or
/// [`reallocate`](Allocator::reallocate) denotes a block valid for reads and
/// writes of `layout.size()` bytes at `layout.align()` alignment, owned
/// exclusively by the caller until passed back to
/// [`release`](Allocator::release) or `reallocate`. Blocks must stay valid
/// when the allocator value itself is moved.
pub unsafe trait Allocator {
    /// Allocate a block for `layout`.
    ///
    /// Returns `None` when the backend cannot satisfy the request.
    /// `layout.size()` is never zero: containers represent an empty buffer
    /// with no allocation at all.
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Move a live block from `old_layout` to `new_layout`, preserving the
    /// first `min(old, new)` bytes.
    ///
    /// Returns `None` when the backend cannot satisfy the request, in which
    /// case the original block is untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block previously returned by this allocator
    /// for `old_layout`, and `new_layout.align()` must equal
    /// `old_layout.align()`. On success the old pointer is invalid.
    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>>;

    /// Return a block to the backend.
    ///
    /// # Safety
    ///
    /// `ptr` must denote a live block previously returned by this allocator
    /// for `layout`. The block must not be accessed afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout);
}

// Lets containers borrow a long-lived backend (an arena owned by the host,
// say) instead of owning one.
unsafe impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>> {
        // SAFETY: caller obligations are forwarded unchanged to the
        // referenced backend.
        unsafe { (**self).reallocate(ptr, old_layout, new_layout) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller obligations are forwarded unchanged to the
        // referenced backend.
        unsafe { (**self).release(ptr, layout) }
    }
}
