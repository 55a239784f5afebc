//! Recoverable error taxonomy for array operations.

use std::error::Error;
use std::fmt;

/// Errors an array operation can report and a caller can recover from.
///
/// Every fallible operation returns `Result<_, ArrayError>`, and an `Err`
/// leaves the array exactly as it was before the call. Conditions that would
/// mean the array's own bookkeeping is corrupt are not represented here;
/// those panic, because metadata that contradicts itself cannot be trusted
/// to report anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An index fell outside the live range.
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// Live element count at the time of the call.
        len: usize,
    },
    /// The backend declined a buffer request.
    AllocFailed {
        /// Element capacity that was being requested.
        elements: usize,
        /// Byte size of the declined request.
        bytes: usize,
    },
    /// A requested length or capacity exceeds what the element type can
    /// address.
    LengthExceeded {
        /// The requested element count.
        requested: usize,
        /// Largest representable count for this element type.
        max: usize,
    },
    /// The element type is zero-sized. Such types occupy no storage and are
    /// not supported; a plain counter does the same job.
    ZeroSizedElement,
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::AllocFailed { elements, bytes } => {
                write!(
                    f,
                    "allocation failed: {elements} elements ({bytes} bytes) declined by the backend"
                )
            }
            Self::LengthExceeded { requested, max } => {
                write!(
                    f,
                    "length {requested} exceeds the maximum {max} for this element type"
                )
            }
            Self::ZeroSizedElement => {
                write!(f, "zero-sized element types are not supported")
            }
        }
    }
}

impl Error for ArrayError {}
