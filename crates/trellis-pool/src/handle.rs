//! Generation-scoped handles.

use std::fmt;

/// Names one array instance inside an [`ArrayPool`](crate::ArrayPool).
///
/// A handle pairs a slot index with the slot's generation at issue time.
/// Destroying the instance bumps the slot's generation, so every surviving
/// copy of the handle becomes detectably stale in O(1): the safe
/// replacement for a raw pointer that might dangle.
///
/// Handles are plain `Copy` data. Holding one confers no access and keeps
/// nothing alive; only the owning pool can resolve it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Handle {
    pub(crate) slot: u32,
    pub(crate) generation: u32,
}

impl Handle {
    pub(crate) fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index within the issuing pool.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    /// Slot generation this handle was issued against.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {} gen {}", self.slot, self.generation)
    }
}
