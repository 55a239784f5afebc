//! Trellis: a growable-array container engine with pluggable allocation.
//!
//! Trellis gives a host per-element-type dynamic arrays with the checks
//! built in: every index is validated, every growth path reports failure
//! as a `Result`, and a declined allocation leaves the container exactly
//! as it was. Storage flows through a host-swappable
//! [`Allocator`](alloc::Allocator), so the same containers run over the
//! process allocator, a bump arena, or an instrumented test backend.
//!
//! Two ownership styles are supported:
//!
//! - **Direct**: an [`array::DynArray`] is an ordinary Rust value; the
//!   borrow checker ties its lifetime to its owner.
//! - **Pooled**: a [`pool::ArrayPool`] owns instances and hands out
//!   generational [`pool::Handle`]s, `Copy` tokens that are validated on
//!   every use and go detectably stale when the instance is destroyed.
//!
//! # Quick start
//!
//! ```
//! use trellis::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Direct ownership: the array is just a value.
//! let mut samples: DynArray<i32> = DynArray::new();
//! samples.push(10)?;
//! samples.push(20)?;
//! samples.push(30)?;
//! assert_eq!(samples.get(1)?, &20);
//! samples.remove(1)?;
//! assert_eq!(samples.as_slice(), &[10, 30]);
//!
//! // Pooled ownership: destroy is explicit, stale use is detected.
//! let mut pool: ArrayPool<i32> = ArrayPool::new();
//! let handle = pool.create_with_fill(3, 7)?;
//! assert_eq!(pool.get(handle)?.len(), 3);
//! pool.destroy(handle);
//! assert!(matches!(pool.get(handle), Err(PoolError::StaleHandle { .. })));
//! # Ok(())
//! # }
//! ```
//!
//! # Crates behind the facade
//!
//! | module | crate | holds |
//! |---|---|---|
//! | [`alloc`] | `trellis-alloc` | the [`Allocator`](alloc::Allocator) trait and backends |
//! | [`array`] | `trellis-array` | [`DynArray`](array::DynArray) and [`ArrayError`](array::ArrayError) |
//! | [`pool`] | `trellis-pool` | [`ArrayPool`](pool::ArrayPool), [`Handle`](pool::Handle), [`PoolError`](pool::PoolError) |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Allocation backends: the `Allocator` trait, `SystemAlloc`, `BumpAlloc`,
/// and the instrumented test wrappers.
pub use trellis_alloc as alloc;

/// The growable array and its error taxonomy.
pub use trellis_array as array;

/// Pooled instances behind generational handles.
pub use trellis_pool as pool;

pub mod prelude {
    //! The names most hosts want in scope.
    //!
    //! ```
    //! use trellis::prelude::*;
    //! ```

    pub use trellis_alloc::{Allocator, BumpAlloc, CountingAlloc, FailingAlloc, SystemAlloc};
    pub use trellis_array::{ArrayError, DynArray};
    pub use trellis_pool::{ArrayPool, Handle, PoolError};
}
