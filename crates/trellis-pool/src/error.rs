//! Pool-level error taxonomy.

use std::error::Error;
use std::fmt;

use trellis_array::ArrayError;

use crate::handle::Handle;

/// Errors a pool operation can report.
///
/// Handle problems are recoverable by design: presenting a stale or foreign
/// handle yields an `Err`, never undefined behaviour, so a host can treat
/// "instance already destroyed" as an ordinary condition. Array-level
/// failures inside a pool call pass through as
/// [`Array`](PoolError::Array).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The handle's instance was destroyed after the handle was issued.
    StaleHandle {
        /// The handle presented by the caller.
        handle: Handle,
        /// Generation currently live in that slot.
        live_generation: u32,
    },
    /// The handle does not name a slot of this pool.
    UnknownHandle {
        /// The handle presented by the caller.
        handle: Handle,
    },
    /// The pool cannot mint another slot index.
    SlotsExhausted {
        /// Slots currently tracked by the pool.
        slots: usize,
    },
    /// An array operation inside the pool call failed.
    Array(ArrayError),
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle {
                handle,
                live_generation,
            } => {
                write!(
                    f,
                    "stale handle ({handle}): slot generation is now {live_generation}"
                )
            }
            Self::UnknownHandle { handle } => {
                write!(f, "unknown handle ({handle}): no such slot in this pool")
            }
            Self::SlotsExhausted { slots } => {
                write!(f, "slot index space exhausted at {slots} slots")
            }
            Self::Array(err) => write!(f, "array operation failed: {err}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Array(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArrayError> for PoolError {
    fn from(err: ArrayError) -> Self {
        Self::Array(err)
    }
}
