//! The growable array: lifecycle, access, and mutation.

use core::fmt;
use core::mem;
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr;
use core::slice;

use trellis_alloc::{Allocator, SystemAlloc};

use crate::error::ArrayError;
use crate::growth;
use crate::raw::RawBuf;

/// A growable array of `T` served by a host-swappable backend.
///
/// The array owns one contiguous buffer. Elements occupy the first
/// [`len`](DynArray::len) slots; the remainder of the buffer, up to
/// [`capacity`](DynArray::capacity), is spare space that appends claim
/// without reallocating.
///
/// # Error model
///
/// Every operation that can fail returns `Result<_, ArrayError>` instead of
/// trusting the caller: an out-of-range index reports
/// [`OutOfBounds`](ArrayError::OutOfBounds), a declined buffer request
/// reports [`AllocFailed`](ArrayError::AllocFailed), and a request past the
/// element type's addressing limit reports
/// [`LengthExceeded`](ArrayError::LengthExceeded). An `Err` never changes
/// the array: elements, length, and capacity are exactly as they were
/// before the call. The indexing sugar `array[i]` panics like a slice; it
/// is shorthand over [`get`](DynArray::get), not a second error channel.
///
/// # Growth
///
/// An append that finds the buffer full doubles capacity (from a floor of
/// one slot), so `n` appends cost `O(n)` element moves in total. Explicit
/// sizing through [`reserve`](DynArray::reserve),
/// [`resize`](DynArray::resize), and
/// [`shrink_to_fit`](DynArray::shrink_to_fit) allocates exactly what was
/// asked.
///
/// # Example
///
/// ```
/// use trellis_array::{ArrayError, DynArray};
///
/// let mut tones: DynArray<i16> = DynArray::new();
/// tones.push(440)?;
/// tones.push(880)?;
/// assert_eq!(tones.get(0)?, &440);
/// assert_eq!(tones.pop()?, 880);
/// assert!(matches!(tones.get(5), Err(ArrayError::OutOfBounds { .. })));
/// # Ok::<(), ArrayError>(())
/// ```
pub struct DynArray<T, A: Allocator = SystemAlloc> {
    buf: RawBuf<T, A>,
    /// Number of initialized elements. Always `<= buf.capacity()`.
    len: usize,
}

impl<T> DynArray<T, SystemAlloc> {
    /// An empty array over the process allocator. Allocates nothing.
    pub fn new() -> Self {
        Self::new_in(SystemAlloc)
    }

    /// An empty array with room for `capacity` elements preallocated.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArrayError> {
        Self::with_capacity_in(capacity, SystemAlloc)
    }

    /// An array of `len` default-constructed elements.
    pub fn with_len(len: usize) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        Self::with_len_in(len, SystemAlloc)
    }

    /// An array of `len` clones of `value`.
    pub fn with_fill(len: usize, value: T) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::with_fill_in(len, value, SystemAlloc)
    }

    /// An array holding a clone of each element of `values`.
    pub fn from_slice(values: &[T]) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        Self::from_slice_in(values, SystemAlloc)
    }
}

impl<T, A: Allocator> DynArray<T, A> {
    /// An empty array over `alloc`. Allocates nothing.
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuf::new_in(alloc),
            len: 0,
        }
    }

    /// An empty array over `alloc` with room for `capacity` elements.
    ///
    /// The buffer is sized to exactly `capacity`; appends up to that point
    /// will not touch the backend again.
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self, ArrayError> {
        let mut array = Self::new_in(alloc);
        array.reserve(capacity)?;
        Ok(array)
    }

    /// An array of `len` default-constructed elements over `alloc`.
    ///
    /// Length and capacity both come out at exactly `len`.
    pub fn with_len_in(len: usize, alloc: A) -> Result<Self, ArrayError>
    where
        T: Default,
    {
        let mut array = Self::new_in(alloc);
        array.resize(len)?;
        Ok(array)
    }

    /// An array of `len` clones of `value` over `alloc`.
    pub fn with_fill_in(len: usize, value: T, alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::new_in(alloc);
        array.resize_with(len, || value.clone())?;
        Ok(array)
    }

    /// An array over `alloc` holding a clone of each element of `values`.
    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self, ArrayError>
    where
        T: Clone,
    {
        let mut array = Self::with_capacity_in(values.len(), alloc)?;
        array.extend_from_slice(values)?;
        Ok(array)
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold before the next reallocation.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The backend serving this array.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Bytes of buffer storage currently held.
    pub fn memory_bytes(&self) -> usize {
        self.buf.capacity() * mem::size_of::<T>()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are initialized and len <= capacity, so
        // the range lies inside the live buffer (or is empty over the
        // dangling pointer, which from_raw_parts permits).
        unsafe { slice::from_raw_parts(self.buf.ptr().as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for as_slice; &mut self gives exclusive access.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().as_ptr(), self.len) }
    }

    /// Shared access to the element at `index`.
    pub fn get(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::OutOfBounds { index, len })
    }

    /// Exclusive access to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::OutOfBounds { index, len })
    }

    /// Shared access to the first element.
    pub fn front(&self) -> Result<&T, ArrayError> {
        self.get(0)
    }

    /// Exclusive access to the first element.
    pub fn front_mut(&mut self) -> Result<&mut T, ArrayError> {
        self.get_mut(0)
    }

    /// Shared access to the last element.
    pub fn back(&self) -> Result<&T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::OutOfBounds { index: 0, len: 0 });
        }
        self.get(self.len - 1)
    }

    /// Exclusive access to the last element.
    pub fn back_mut(&mut self) -> Result<&mut T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::OutOfBounds { index: 0, len: 0 });
        }
        self.get_mut(self.len - 1)
    }

    /// Replace the element at `index`, dropping the old value.
    pub fn set(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        let len = self.len;
        match self.as_mut_slice().get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(ArrayError::OutOfBounds { index, len }),
        }
    }

    /// Append `value`, growing the buffer if it is full.
    pub fn push(&mut self, value: T) -> Result<(), ArrayError> {
        if self.len == self.buf.capacity() {
            self.grow_amortized()?;
        }
        // SAFETY: len < capacity after the growth check; slot len is spare
        // space inside the live buffer.
        unsafe { self.buf.ptr().as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<T, ArrayError> {
        if self.len == 0 {
            return Err(ArrayError::OutOfBounds { index: 0, len: 0 });
        }
        self.len -= 1;
        // SAFETY: the old last slot is initialized; shrinking len first
        // turns it into spare space, so this read takes sole ownership.
        Ok(unsafe { self.buf.ptr().as_ptr().add(self.len).read() })
    }

    /// Insert `value` at `index`, shifting everything from `index` on one
    /// slot to the right. `index == len()` appends.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), ArrayError> {
        if index > self.len {
            return Err(ArrayError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        if self.len == self.buf.capacity() {
            self.grow_amortized()?;
        }
        // SAFETY: index <= len < capacity. The copy shifts [index, len) one
        // slot right inside the buffer; the write fills the vacated slot,
        // leaving [0, len + 1) initialized.
        unsafe {
            let base = self.buf.ptr().as_ptr();
            ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            base.add(index).write(value);
        }
        self.len += 1;
        Ok(())
    }

    /// Remove and return the element at `index`, shifting everything after
    /// it one slot to the left.
    pub fn remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        // SAFETY: index < len, so the slot is initialized. The copy shifts
        // [index + 1, len) left over it; decrementing len retires the now
        // doubly-owned last slot to spare space.
        let removed = unsafe {
            let base = self.buf.ptr().as_ptr();
            let removed = base.add(index).read();
            ptr::copy(base.add(index + 1), base.add(index), self.len - index - 1);
            removed
        };
        self.len -= 1;
        Ok(removed)
    }

    /// Remove and return the element at `index`, filling the hole with the
    /// last element instead of shifting. Constant time; does not preserve
    /// order.
    pub fn swap_remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        // SAFETY: index < len. The slot's value is read out, then the
        // (initialized) last element is moved into it, leaving [0, len - 1)
        // initialized.
        unsafe {
            let base = self.buf.ptr().as_ptr();
            let removed = base.add(index).read();
            self.len -= 1;
            if index != self.len {
                base.add(index).write(base.add(self.len).read());
            }
            Ok(removed)
        }
    }

    /// Grow or shrink to exactly `new_len` elements, filling new slots with
    /// `T::default()`.
    ///
    /// Growing past the current capacity reallocates to exactly `new_len`;
    /// shrinking drops the tail and keeps the buffer.
    pub fn resize(&mut self, new_len: usize) -> Result<(), ArrayError>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Grow or shrink to exactly `new_len` elements, filling new slots with
    /// values from `fill`.
    pub fn resize_with<F>(&mut self, new_len: usize, mut fill: F) -> Result<(), ArrayError>
    where
        F: FnMut() -> T,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len > self.buf.capacity() {
            self.buf.regrow(new_len)?;
        }
        // Commit one slot per constructed value, so a panicking fill
        // leaves a consistent prefix.
        while self.len < new_len {
            // SAFETY: len < new_len <= capacity; slot len is spare space.
            unsafe { self.buf.ptr().as_ptr().add(self.len).write(fill()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Append a clone of each element of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), ArrayError>
    where
        T: Clone,
    {
        let max = growth::max_elements::<T>();
        let needed = match self.len.checked_add(values.len()) {
            Some(needed) if needed <= max => needed,
            _ => {
                return Err(ArrayError::LengthExceeded {
                    requested: self.len.saturating_add(values.len()),
                    max,
                })
            }
        };
        if needed > self.buf.capacity() {
            let target = growth::amortized_next(self.buf.capacity()).max(needed).min(max);
            self.buf.regrow(target)?;
        }
        for value in values {
            // SAFETY: len < needed <= capacity after the reservation above.
            unsafe { self.buf.ptr().as_ptr().add(self.len).write(value.clone()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Drop every element from `new_len` on. Does nothing when `new_len`
    /// is already `>= len()`. Capacity is untouched.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let old_len = self.len;
        // Commit the shorter length before dropping, so a panicking Drop
        // cannot leave dropped elements reachable.
        self.len = new_len;
        // SAFETY: [new_len, old_len) was initialized and is no longer
        // reachable through the array.
        unsafe {
            let tail = ptr::slice_from_raw_parts_mut(
                self.buf.ptr().as_ptr().add(new_len),
                old_len - new_len,
            );
            ptr::drop_in_place(tail);
        }
    }

    /// Drop every element. Capacity is kept for reuse; pair with
    /// [`shrink_to_fit`](DynArray::shrink_to_fit) to release the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Ensure the buffer holds at least `capacity` slots in total.
    ///
    /// `capacity` is an absolute element count, not a headroom increment.
    /// Growing allocates exactly `capacity`; a request at or below the
    /// current capacity does nothing. Never shrinks.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), ArrayError> {
        if capacity <= self.buf.capacity() {
            return Ok(());
        }
        self.buf.regrow(capacity)
    }

    /// Shrink the buffer to exactly `len()` slots, releasing it entirely
    /// when the array is empty. On error the buffer is untouched.
    pub fn shrink_to_fit(&mut self) -> Result<(), ArrayError> {
        if self.buf.capacity() == self.len {
            return Ok(());
        }
        self.buf.regrow(self.len)
    }

    /// Exchange the entire contents of two arrays in constant time.
    ///
    /// Buffers, lengths, capacities, and backend handles all swap; no
    /// element is moved individually.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Double the capacity (floor one slot) for an append about to land.
    fn grow_amortized(&mut self) -> Result<(), ArrayError> {
        let max = growth::max_elements::<T>();
        let needed = self.len + 1;
        if needed > max {
            return Err(ArrayError::LengthExceeded {
                requested: needed,
                max,
            });
        }
        let target = growth::amortized_next(self.buf.capacity()).min(max);
        self.buf.regrow(target)
    }
}

impl<T, A: Allocator> Drop for DynArray<T, A> {
    fn drop(&mut self) {
        self.clear();
        // RawBuf's own drop returns the buffer to the backend.
    }
}

impl<T, A: Allocator> Deref for DynArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for DynArray<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> Index<usize> for DynArray<T, A> {
    type Output = T;

    /// Panicking shorthand for [`get`](DynArray::get).
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, A: Allocator> IndexMut<usize> for DynArray<T, A> {
    /// Panicking shorthand for [`get_mut`](DynArray::get_mut).
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.get_mut(index) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DynArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, A: Allocator + Default> Default for DynArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for DynArray<T, A> {
    /// Clone the elements into a fresh buffer over a clone of the backend.
    ///
    /// Panics if the backend declines the new buffer; cloning has no error
    /// channel. Use [`DynArray::from_slice_in`] to copy fallibly.
    fn clone(&self) -> Self {
        Self::from_slice_in(self.as_slice(), self.buf.allocator().clone())
            .expect("backend declined the buffer for a clone")
    }
}

impl<T: PartialEq, A1: Allocator, A2: Allocator> PartialEq<DynArray<T, A2>> for DynArray<T, A1> {
    fn eq(&self, other: &DynArray<T, A2>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq, A: Allocator> PartialEq<[T]> for DynArray<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, A: Allocator> PartialEq<&[T]> for DynArray<T, A> {
    fn eq(&self, other: &&[T]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: PartialEq, A: Allocator, const N: usize> PartialEq<[T; N]> for DynArray<T, A> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for DynArray<T, A> {}

impl<'a, T, A: Allocator> IntoIterator for &'a DynArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DynArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

// SAFETY: the array owns its elements and its buffer exclusively; sending
// it sends the Ts and the backend handle, nothing shared stays behind.
unsafe impl<T: Send, A: Allocator + Send> Send for DynArray<T, A> {}

// SAFETY: a shared array hands out only &T and backend reads; the type has
// no interior mutability of its own.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for DynArray<T, A> {}
