//! Capacity policy: amortized doubling and addressing limits.
//!
//! Implicit growth (an append finding the buffer full) doubles capacity, so
//! a run of appends costs amortized constant time per element. Explicit
//! sizing (`reserve`, `resize`, `shrink_to_fit`) allocates exactly what
//! was asked, so callers who know their working set pay for one allocation
//! and no slack.

use core::mem;

/// Capacity after one implicit growth step from `current`.
///
/// Doubles with a floor of one slot: 0, 1, 2, 4, 8, ... Callers clamp the
/// result to [`max_elements`] for the element type.
pub fn amortized_next(current: usize) -> usize {
    current.saturating_mul(2).max(1)
}

/// Largest element count a buffer of `T` may hold.
///
/// Rust caps any single allocation at `isize::MAX` bytes, so this is
/// `isize::MAX / size_of::<T>()`. Nominally `usize::MAX` for a zero-sized
/// `T`; allocation rejects such element types outright, so the value is
/// never acted on.
pub fn max_elements<T>() -> usize {
    match mem::size_of::<T>() {
        0 => usize::MAX,
        size => isize::MAX as usize / size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubling_starts_at_one() {
        assert_eq!(amortized_next(0), 1);
        assert_eq!(amortized_next(1), 2);
        assert_eq!(amortized_next(2), 4);
        assert_eq!(amortized_next(7), 14);
        assert_eq!(amortized_next(1024), 2048);
    }

    #[test]
    fn doubling_saturates_instead_of_wrapping() {
        assert_eq!(amortized_next(usize::MAX), usize::MAX);
        assert_eq!(amortized_next(usize::MAX / 2 + 1), usize::MAX);
    }

    #[test]
    fn max_elements_scales_with_element_size() {
        assert_eq!(max_elements::<u8>(), isize::MAX as usize);
        assert_eq!(max_elements::<u32>(), isize::MAX as usize / 4);
        assert_eq!(max_elements::<u64>(), isize::MAX as usize / 8);
        assert_eq!(max_elements::<[u8; 3]>(), isize::MAX as usize / 3);
    }

    #[test]
    fn max_elements_for_zero_sized_types_is_nominal() {
        assert_eq!(max_elements::<()>(), usize::MAX);
    }
}
