//! Traffic-counting and failure-injecting wrappers.
//!
//! Both wrappers implement [`Allocator`] by delegating to an inner backend,
//! so they compose with anything: `FailingAlloc<CountingAlloc<SystemAlloc>>`
//! counts exactly the traffic that was allowed through.

use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::NonNull;

use crate::allocator::Allocator;

/// Snapshot of a [`CountingAlloc`]'s counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocCounters {
    /// Successful `allocate` calls.
    pub allocations: usize,
    /// Successful `reallocate` calls.
    pub reallocations: usize,
    /// `release` calls.
    pub releases: usize,
    /// Bytes currently outstanding.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: usize,
}

/// Wraps a backend and counts its traffic.
///
/// Counters live in [`Cell`]s so the wrapper serves `&self` callers like any
/// other backend; like the bump arena it is not `Sync`. Tests and host
/// telemetry read totals through [`counters`](CountingAlloc::counters).
#[derive(Debug)]
pub struct CountingAlloc<A> {
    inner: A,
    allocations: Cell<usize>,
    reallocations: Cell<usize>,
    releases: Cell<usize>,
    live_bytes: Cell<usize>,
    peak_bytes: Cell<usize>,
}

impl<A> CountingAlloc<A> {
    /// Wrap `inner` with all counters at zero.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            allocations: Cell::new(0),
            reallocations: Cell::new(0),
            releases: Cell::new(0),
            live_bytes: Cell::new(0),
            peak_bytes: Cell::new(0),
        }
    }

    /// Current counter values.
    pub fn counters(&self) -> AllocCounters {
        AllocCounters {
            allocations: self.allocations.get(),
            reallocations: self.reallocations.get(),
            releases: self.releases.get(),
            live_bytes: self.live_bytes.get(),
            peak_bytes: self.peak_bytes.get(),
        }
    }

    /// Unwrap, discarding the counters.
    pub fn into_inner(self) -> A {
        self.inner
    }

    fn record_claim(&self, bytes: usize) {
        let live = self.live_bytes.get().saturating_add(bytes);
        self.live_bytes.set(live);
        self.peak_bytes.set(self.peak_bytes.get().max(live));
    }

    fn record_return(&self, bytes: usize) {
        self.live_bytes.set(self.live_bytes.get().saturating_sub(bytes));
    }
}

unsafe impl<A: Allocator> Allocator for CountingAlloc<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        let ptr = self.inner.allocate(layout)?;
        self.allocations.set(self.allocations.get() + 1);
        self.record_claim(layout.size());
        Some(ptr)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>> {
        // SAFETY: caller obligations are forwarded unchanged.
        let ptr = unsafe { self.inner.reallocate(ptr, old_layout, new_layout)? };
        self.reallocations.set(self.reallocations.get() + 1);
        self.record_return(old_layout.size());
        self.record_claim(new_layout.size());
        Some(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller obligations are forwarded unchanged.
        unsafe { self.inner.release(ptr, layout) };
        self.releases.set(self.releases.get() + 1);
        self.record_return(layout.size());
    }
}

/// Wraps a backend and fails every allocation once a budget is spent.
///
/// The first `budget` calls to `allocate` or `reallocate` pass through;
/// every later call returns `None` without consulting the backend. Releases
/// always pass through so teardown stays sound. Gives tests a deterministic
/// out-of-memory at any chosen point.
#[derive(Debug)]
pub struct FailingAlloc<A> {
    inner: A,
    remaining: Cell<usize>,
}

impl<A> FailingAlloc<A> {
    /// Wrap `inner`, permitting `budget` successful allocations.
    pub fn new(inner: A, budget: usize) -> Self {
        Self {
            inner,
            remaining: Cell::new(budget),
        }
    }

    /// Successful allocations still permitted.
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }

    fn spend(&self) -> bool {
        let remaining = self.remaining.get();
        if remaining == 0 {
            return false;
        }
        self.remaining.set(remaining - 1);
        true
    }
}

unsafe impl<A: Allocator> Allocator for FailingAlloc<A> {
    fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.spend() {
            return None;
        }
        self.inner.allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: NonNull<u8>,
        old_layout: Layout,
        new_layout: Layout,
    ) -> Option<NonNull<u8>> {
        if !self.spend() {
            return None;
        }
        // SAFETY: caller obligations are forwarded unchanged.
        unsafe { self.inner.reallocate(ptr, old_layout, new_layout) }
    }

    unsafe fn release(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: caller obligations are forwarded unchanged.
        unsafe { self.inner.release(ptr, layout) }
    }
}
