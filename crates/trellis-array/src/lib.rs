//! Bounds-checked growable arrays with explicit error propagation.
//!
//! [`DynArray`] is the workspace's per-element-type dynamic array: one
//! contiguous buffer, amortized-doubling growth, and a `Result` on every
//! operation that can fail. Nothing here trusts the caller: an index is
//! checked before use, a full buffer grows or reports why it could not, and
//! a declined allocation leaves the array exactly as it was.
//!
//! Storage comes through the [`Allocator`](trellis_alloc::Allocator) trait
//! from `trellis-alloc`, so the same array type runs over the process
//! allocator, a bump arena, or an instrumented test backend.
//!
//! The error taxonomy lives in [`ArrayError`]; the growth policy and
//! addressing limits are in [`growth`].
//!
//! This crate is one of two in the workspace permitted to contain `unsafe`
//! code (the other is `trellis-alloc`). The unsafe surface is confined to
//! the buffer arithmetic in `raw.rs` and the element moves in `array.rs`,
//! and every block carries a `SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod array;
mod error;
pub mod growth;
mod raw;

pub use array::DynArray;
pub use error::ArrayError;
