//! End-to-end host scenarios across the facade.

use trellis::prelude::*;

#[test]
fn end_to_end_lifecycle_matches_expectations() {
    let mut pool: ArrayPool<i64> = ArrayPool::new();
    let handle = pool.create_with_len(4).unwrap();

    {
        let array = pool.get_mut(handle).unwrap();
        array.set(0, -5).unwrap();
        array.set(3, 9).unwrap();
        array.push(11).unwrap();
        assert_eq!(array.as_slice(), &[-5, 0, 0, 9, 11]);
        assert_eq!(array.remove(1).unwrap(), 0);
        array.insert(1, 2).unwrap();
        assert_eq!(array.as_slice(), &[-5, 2, 0, 9, 11]);
    }

    let snapshot: Vec<i64> = pool.get(handle).unwrap().iter().copied().collect();
    assert_eq!(snapshot, vec![-5, 2, 0, 9, 11]);

    assert!(pool.destroy(handle));
    assert!(matches!(pool.get(handle), Err(PoolError::StaleHandle { .. })));
}

#[test]
fn hosts_recover_from_exhaustion_and_continue() {
    let backend = FailingAlloc::new(SystemAlloc, 3);
    let mut array: DynArray<u8, _> = DynArray::new_in(&backend);
    let mut accepted = 0usize;
    for byte in 0..64u8 {
        match array.push(byte) {
            Ok(()) => accepted += 1,
            Err(ArrayError::AllocFailed { .. }) => break,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    // Budget 3 permits capacities 1, 2, 4: four elements land.
    assert_eq!(accepted, 4);
    assert_eq!(array.as_slice(), &[0, 1, 2, 3]);
    // The failure was reported, not fatal: the array still works.
    assert_eq!(array.pop().unwrap(), 3);
    assert_eq!(array.get(0).unwrap(), &0);
}

#[test]
fn arena_phases_reset_wholesale() {
    let mut arena = BumpAlloc::with_capacity(64 * 1024).unwrap();
    for phase in 0..3u32 {
        {
            let mut scores: DynArray<u32, _> = DynArray::new_in(&arena);
            let mut names: DynArray<&str, _> = DynArray::new_in(&arena);
            for i in 0..100u32 {
                scores.push(phase * 1_000 + i).unwrap();
            }
            names.push("alpha").unwrap();
            names.push("beta").unwrap();
            assert_eq!(scores.len(), 100);
            assert_eq!(scores.back().unwrap(), &(phase * 1_000 + 99));
            assert_eq!(names.back().unwrap(), &"beta");
        }
        // Every container from the phase is gone; one reset reclaims the
        // whole region.
        arena.reset();
        assert_eq!(arena.used(), 0);
    }
}

#[test]
fn pooled_double_buffering_swaps_in_constant_time() {
    let mut pool: ArrayPool<f32> = ArrayPool::new();
    let front = pool.create_with_fill(512, 0.0).unwrap();
    let back = pool.create_with_fill(512, 0.0).unwrap();
    for step in 1..=4 {
        {
            let scratch = pool.get_mut(back).unwrap();
            for slot in scratch.iter_mut() {
                *slot = step as f32;
            }
        }
        pool.swap(front, back).unwrap();
        assert!(pool.get(front).unwrap().iter().all(|&v| v == step as f32));
    }
    // Both handles survived every swap.
    assert!(pool.contains(front));
    assert!(pool.contains(back));
}

#[test]
fn mixed_workload_returns_every_byte() {
    let backend = CountingAlloc::new(SystemAlloc);
    {
        let mut pool: ArrayPool<u64, _> = ArrayPool::new_in(&backend);
        let mut handles = Vec::new();
        for i in 0..16 {
            handles.push(pool.create_with_len(i * 3).unwrap());
        }
        for (i, &handle) in handles.iter().enumerate() {
            if i % 2 == 0 {
                assert!(pool.destroy(handle));
            } else {
                pool.get_mut(handle).unwrap().push(7).unwrap();
            }
        }
        assert!(pool.memory_bytes() > 0);
        assert_eq!(pool.live_count(), 8);
    }
    // Pool dropped: every block the backend served came back.
    assert_eq!(backend.counters().live_bytes, 0);
}

#[test]
fn explicit_sizing_is_exact_and_implicit_growth_doubles() {
    let mut array: DynArray<u16> = DynArray::new();
    array.reserve(100).unwrap();
    assert_eq!(array.capacity(), 100);
    for i in 0..100 {
        array.push(i).unwrap();
    }
    assert_eq!(array.capacity(), 100);
    array.push(100).unwrap();
    assert_eq!(array.capacity(), 200);
    array.shrink_to_fit().unwrap();
    assert_eq!(array.capacity(), 101);
    array.resize(40).unwrap();
    assert_eq!(array.len(), 40);
    assert_eq!(array.capacity(), 101);
}

#[test]
fn fill_resize_resize_keeps_the_larger_buffer() {
    let mut array = DynArray::with_fill(3, 7u32).unwrap();
    assert!(array.iter().all(|&v| v == 7));

    // Growing fills the new tail with the element type's zero value.
    array.resize(5).unwrap();
    assert_eq!(array.as_slice(), &[7, 7, 7, 0, 0]);
    assert_eq!(array.capacity(), 5);

    // Shrinking the length never shrinks the buffer.
    array.resize(2).unwrap();
    assert_eq!(array.as_slice(), &[7, 7]);
    assert_eq!(array.capacity(), 5);
}

#[test]
fn error_values_carry_enough_to_diagnose() {
    let mut array: DynArray<u32> = DynArray::new();
    array.extend_from_slice(&[1, 2, 3]).unwrap();
    let err = array.get(10).unwrap_err();
    assert_eq!(err.to_string(), "index 10 out of bounds for length 3");

    let backend = FailingAlloc::new(SystemAlloc, 0);
    let mut starved: DynArray<u32, _> = DynArray::new_in(&backend);
    let err = starved.reserve(8).unwrap_err();
    assert_eq!(
        err.to_string(),
        "allocation failed: 8 elements (32 bytes) declined by the backend"
    );

    // Pool wrapping keeps the source chain intact.
    let mut pool: ArrayPool<u32, _> = ArrayPool::new_in(&backend);
    let err = pool.create_with_len(8).unwrap_err();
    let source = std::error::Error::source(&err).expect("pool error wraps the array error");
    assert_eq!(
        source.to_string(),
        "allocation failed: 8 elements (32 bytes) declined by the backend"
    );
}

#[test]
fn arrays_move_between_threads() {
    let mut array: DynArray<u64> = DynArray::new();
    for i in 0..1_000 {
        array.push(i).unwrap();
    }
    let worker = std::thread::spawn(move || {
        let sum: u64 = array.iter().sum();
        (array, sum)
    });
    let (array, sum) = worker.join().unwrap();
    assert_eq!(sum, 499_500);
    assert_eq!(array.len(), 1_000);
}
