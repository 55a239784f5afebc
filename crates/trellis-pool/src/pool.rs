//! Handle-addressed array lifecycle: create, access, swap, destroy.

use std::fmt;
use std::mem;

use trellis_alloc::{Allocator, SystemAlloc};
use trellis_array::DynArray;

use crate::error::PoolError;
use crate::handle::Handle;

/// One pool slot: a generation counter plus the instance, when live.
struct Slot<T, A: Allocator> {
    /// Bumped every time the slot is vacated. An occupied slot always sits
    /// below `u32::MAX`; a slot that reaches `u32::MAX` is retired for good
    /// (see [`ArrayPool::destroy`]).
    generation: u32,
    /// `None` while the slot is vacant.
    entry: Option<DynArray<T, A>>,
}

/// A registry of array instances addressed by generational [`Handle`]s.
///
/// The pool owns every instance created through it. Hosts hold plain
/// `Copy` [`Handle`]s and resolve them per call, so a destroyed instance
/// is never touched through an old reference: a surviving handle simply
/// stops resolving, reported as [`StaleHandle`](PoolError::StaleHandle).
///
/// Destroyed slots are recycled through a free list. Reuse bumps the slot
/// generation, so handles from the slot's previous life remain stale; a
/// slot whose generation counter is spent is retired rather than reused.
///
/// Each created instance is served by a clone of the pool's backend, so a
/// pool over a bump arena puts every instance in that arena.
pub struct ArrayPool<T, A: Allocator = SystemAlloc> {
    slots: Vec<Slot<T, A>>,
    /// Vacant slot indices eligible for reuse.
    free: Vec<u32>,
    /// Live instance count; kept alongside the slots to make
    /// [`live_count`](ArrayPool::live_count) O(1).
    live: usize,
    /// Backend cloned into each created instance.
    alloc: A,
}

impl<T> ArrayPool<T, SystemAlloc> {
    /// An empty pool over the process allocator.
    pub fn new() -> Self {
        Self::new_in(SystemAlloc)
    }
}

impl<T, A: Allocator> ArrayPool<T, A> {
    /// An empty pool whose instances will be served by clones of `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            alloc,
        }
    }

    /// Move an existing array into the pool, returning its handle.
    pub fn adopt(&mut self, array: DynArray<T, A>) -> Result<Handle, PoolError> {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            debug_assert!(slot.entry.is_none(), "free list pointed at a live slot");
            let handle = Handle::new(index, slot.generation);
            slot.entry = Some(array);
            self.live += 1;
            return Ok(handle);
        }
        if self.slots.len() >= u32::MAX as usize {
            return Err(PoolError::SlotsExhausted {
                slots: self.slots.len(),
            });
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(array),
        });
        self.live += 1;
        Ok(Handle::new(index, 0))
    }

    /// Remove the instance named by `handle` from the pool and hand it back
    /// to the caller. The handle (and every copy of it) goes stale.
    pub fn take(&mut self, handle: Handle) -> Result<DynArray<T, A>, PoolError> {
        let index = self.resolve(handle)?;
        Ok(self.evict(index))
    }

    /// Shared access to the instance named by `handle`.
    pub fn get(&self, handle: Handle) -> Result<&DynArray<T, A>, PoolError> {
        let index = self.resolve(handle)?;
        Ok(self.slots[index as usize]
            .entry
            .as_ref()
            .expect("resolve checked the slot was live"))
    }

    /// Exclusive access to the instance named by `handle`.
    pub fn get_mut(&mut self, handle: Handle) -> Result<&mut DynArray<T, A>, PoolError> {
        let index = self.resolve(handle)?;
        Ok(self.slots[index as usize]
            .entry
            .as_mut()
            .expect("resolve checked the slot was live"))
    }

    /// Destroy the instance named by `handle`, dropping its elements and
    /// returning its buffer to the backend.
    ///
    /// Returns `true` when an instance was destroyed and `false` when the
    /// handle was already stale or unknown; destroying twice is an ordinary
    /// no-op, not an error. All surviving copies of the handle go stale
    /// with it.
    pub fn destroy(&mut self, handle: Handle) -> bool {
        match self.resolve(handle) {
            Ok(index) => {
                drop(self.evict(index));
                true
            }
            Err(_) => false,
        }
    }

    /// Exchange the contents of two instances in constant time.
    ///
    /// Both handles are validated before anything moves, and both stay
    /// valid afterwards; only the instances' buffers change places.
    /// Swapping a handle with itself is a no-op.
    pub fn swap(&mut self, a: Handle, b: Handle) -> Result<(), PoolError> {
        let index_a = self.resolve(a)?;
        let index_b = self.resolve(b)?;
        if index_a == index_b {
            return Ok(());
        }
        let (low, high) = if index_a < index_b {
            (index_a as usize, index_b as usize)
        } else {
            (index_b as usize, index_a as usize)
        };
        let (head, tail) = self.slots.split_at_mut(high);
        mem::swap(&mut head[low].entry, &mut tail[0].entry);
        Ok(())
    }

    /// Whether `handle` currently names a live instance.
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Number of live instances.
    pub fn live_count(&self) -> usize {
        self.live
    }

    /// Whether the pool holds no live instances.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Total slots ever minted: live, vacant, and retired.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Vacant slots eligible for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Bytes of buffer storage held across all live instances.
    pub fn memory_bytes(&self) -> usize {
        self.slots
            .iter()
            .filter_map(|slot| slot.entry.as_ref())
            .map(DynArray::memory_bytes)
            .sum()
    }

    /// Iterate over live instances in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &DynArray<T, A>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|entry| (Handle::new(index as u32, slot.generation), entry))
        })
    }

    /// Destroy every live instance, invalidating all outstanding handles.
    /// Slots are kept and recycled for future creates.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entry.take().is_some() {
                // Occupied slots sit below u32::MAX, so this cannot wrap.
                slot.generation += 1;
            }
            if slot.generation < u32::MAX {
                self.free.push(index as u32);
            }
        }
        self.live = 0;
    }

    /// Map `handle` to its slot index, or report why it does not resolve.
    fn resolve(&self, handle: Handle) -> Result<u32, PoolError> {
        let slot = self
            .slots
            .get(handle.slot as usize)
            .ok_or(PoolError::UnknownHandle { handle })?;
        if slot.generation != handle.generation || slot.entry.is_none() {
            return Err(PoolError::StaleHandle {
                handle,
                live_generation: slot.generation,
            });
        }
        Ok(handle.slot)
    }

    /// Vacate a resolved slot: pull the instance out, bump the generation,
    /// and recycle or retire the slot.
    fn evict(&mut self, index: u32) -> DynArray<T, A> {
        let slot = &mut self.slots[index as usize];
        let entry = slot
            .entry
            .take()
            .expect("resolve checked the slot was live");
        debug_assert!(slot.generation < u32::MAX);
        slot.generation += 1;
        if slot.generation < u32::MAX {
            self.free.push(index);
        }
        self.live -= 1;
        entry
    }
}

impl<T, A: Allocator + Clone> ArrayPool<T, A> {
    /// Create an empty instance and return its handle.
    pub fn create(&mut self) -> Result<Handle, PoolError> {
        let array = DynArray::new_in(self.alloc.clone());
        self.adopt(array)
    }

    /// Create an instance of `len` default-constructed elements.
    pub fn create_with_len(&mut self, len: usize) -> Result<Handle, PoolError>
    where
        T: Default,
    {
        let array = DynArray::with_len_in(len, self.alloc.clone())?;
        self.adopt(array)
    }

    /// Create an instance of `len` clones of `value`.
    pub fn create_with_fill(&mut self, len: usize, value: T) -> Result<Handle, PoolError>
    where
        T: Clone,
    {
        let array = DynArray::with_fill_in(len, value, self.alloc.clone())?;
        self.adopt(array)
    }
}

impl<T, A: Allocator + Default> Default for ArrayPool<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T, A: Allocator> fmt::Debug for ArrayPool<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayPool")
            .field("live", &self.live)
            .field("slots", &self.slots.len())
            .field("free", &self.free.len())
            .finish_non_exhaustive()
    }
}
