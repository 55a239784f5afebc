//! Pluggable allocation backends for the Trellis container engine.
//!
//! Every byte of container storage in the workspace is obtained through the
//! [`Allocator`] trait, an allocate / reallocate / release triple over
//! [`core::alloc::Layout`]. Containers never call the global allocator
//! directly, so a host can route storage through an arena or an instrumented
//! wrapper without touching container code.
//!
//! Backends shipped here:
//!
//! - [`SystemAlloc`]: the process global allocator. Zero-sized, `Copy`, and
//!   the default for containers that do not name a backend.
//! - [`BumpAlloc`]: a fixed-region bump arena. Allocation is a cursor
//!   advance, release is a no-op, and the whole region is returned when the
//!   arena drops.
//! - [`CountingAlloc`]: wraps any backend and counts its traffic.
//! - [`FailingAlloc`]: wraps any backend and fails deterministically after a
//!   budget of successful allocations, for driving out-of-memory paths in
//!   tests.
//!
//! This crate is one of two in the workspace permitted to contain `unsafe`
//! code (the other is `trellis-array`). Every unsafe block carries a
//! `SAFETY:` comment naming the invariant it relies on.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod allocator;
mod bump;
mod instrument;
mod system;

pub use allocator::Allocator;
pub use bump::BumpAlloc;
pub use instrument::{AllocCounters, CountingAlloc, FailingAlloc};
pub use system::SystemAlloc;
