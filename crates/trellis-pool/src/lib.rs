//! Pooled array instances behind generational handles.
//!
//! Hosts that cannot tie an array's lifetime to a single owner (script
//! bindings, entity systems, anything that stores "a reference to an array"
//! in long-lived state) register instances in an [`ArrayPool`] and keep
//! [`Handle`]s instead. A handle is a `Copy` token validated on every use:
//! after [`destroy`](ArrayPool::destroy), every surviving copy reports
//! [`StaleHandle`](PoolError::StaleHandle) rather than reaching freed
//! storage. Slots are recycled under a fresh generation, so reuse cannot
//! resurrect an old handle.
//!
//! The arrays themselves are [`DynArray`](trellis_array::DynArray)s from
//! `trellis-array`; [`get`](ArrayPool::get) and
//! [`get_mut`](ArrayPool::get_mut) bridge from a handle to the full array
//! API.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod error;
mod handle;
mod pool;

pub use error::PoolError;
pub use handle::Handle;
pub use pool::ArrayPool;
