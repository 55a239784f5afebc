//! The process global allocator as a backend.

use core::alloc::Layout;
use core::ptr::NonNull;
use std::alloc::{alloc, dealloc, realloc};

use crate::allocator::Allocator;

/// The process global allocator.
///
/// Zero-sized and `Copy`, so containers that default to it pay nothing to
/// carry it. Thread-safe: the global allocator synchronises internally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAlloc;

unsafe impl Allocator for SystemAlloc {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0, "zero-size requests never reach a backend");
        // SAFETY: layout has nonzero size, per the trait contract.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>> {
        debug_assert_eq!(old_layout.align(), new_layout.align());
        debug_assert!(new_layout.size() > 0, "zero-size requests never reach a backend");
        // SAFETY: ptr is live for old_layout per the caller contract, and
        // realloc preserves the alignment both layouts share.
        let ptr = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
        NonNull::new(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: ptr is live for layout per the caller contract.
        unsafe { dealloc(ptr.as_ptr(), layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: usize) -> Layout {
        Layout::from_size_align(size, 8).unwrap()
    }

    #[test]
    fn allocate_then_release_roundtrips() {
        let ptr = SystemAlloc.allocate(layout(64)).unwrap();
        unsafe {
            ptr.as_ptr().write_bytes(0xAB, 64);
            assert_eq!(*ptr.as_ptr(), 0xAB);
            SystemAlloc.release(ptr, layout(64));
        }
    }

    #[test]
    fn reallocate_preserves_prefix() {
        let ptr = SystemAlloc.allocate(layout(16)).unwrap();
        unsafe {
            for i in 0..16 {
                ptr.as_ptr().add(i).write(i as u8);
            }
            let grown = SystemAlloc
                .reallocate(ptr, layout(16), layout(256))
                .unwrap();
            for i in 0..16 {
                assert_eq!(*grown.as_ptr().add(i), i as u8);
            }
            SystemAlloc.release(grown, layout(256));
        }
    }

    #[test]
    fn reallocate_shrinks() {
        let ptr = SystemAlloc.allocate(layout(256)).unwrap();
        unsafe {
            ptr.as_ptr().write_bytes(0x5C, 256);
            let shrunk = SystemAlloc
                .reallocate(ptr, layout(256), layout(32))
                .unwrap();
            for i in 0..32 {
                assert_eq!(*shrunk.as_ptr().add(i), 0x5C);
            }
            SystemAlloc.release(shrunk, layout(32));
        }
    }

    #[test]
    fn borrowed_backend_forwards() {
        let backend = SystemAlloc;
        let by_ref: &SystemAlloc = &backend;
        let ptr = by_ref.allocate(layout(8)).unwrap();
        unsafe { by_ref.release(ptr, layout(8)) };
    }
}
