//! Property tests over random allocate/free sequences.

use proptest::prelude::*;
use rspool::size_class::{GRANULARITY, round_up};
use rspool::{Allocator, DEFAULT_ALIGNMENT, PoolAllocator, PoolConfig};

#[derive(Debug, Clone)]
enum Op {
    Alloc(usize),
    /// Free the live block at this index (modulo the live count).
    Free(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..=600).prop_map(Op::Alloc),
        1 => any::<usize>().prop_map(Op::Free),
    ]
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    a.0 < b.0 + b.1 && b.0 < a.0 + a.1
}

proptest! {
    #[test]
    fn rounding_is_idempotent(size in any::<usize>()) {
        let r = round_up(size);
        prop_assert_eq!(round_up(r), r);
        prop_assert_eq!(r % GRANULARITY, 0);
        if size <= usize::MAX - GRANULARITY {
            prop_assert!(r >= size);
        }
    }

    #[test]
    fn random_ops_keep_invariants(ops in prop::collection::vec(op(), 1..200)) {
        // Small pools so sequences cross pool boundaries and the oversized path.
        let config = PoolConfig::builder().pool_capacity(512).build();
        let alloc = PoolAllocator::with_config(config);
        let mut live: Vec<(usize, usize)> = Vec::new();
        let mut heads: Vec<usize> = Vec::new();

        for op in ops {
            match op {
                Op::Alloc(size) => {
                    let p = alloc.allocate(size, DEFAULT_ALIGNMENT) as usize;
                    if size == 0 {
                        prop_assert_eq!(p, 0);
                        continue;
                    }
                    prop_assert_eq!(p % GRANULARITY, 0);
                    let block = (p, round_up(size));
                    for &other in &live {
                        prop_assert!(!overlaps(block, other), "{:?} overlaps {:?}", block, other);
                    }
                    unsafe { (p as *mut u8).write_bytes(0xA5, size) };
                    live.push((p, size));
                }
                Op::Free(index) => {
                    if live.is_empty() {
                        continue;
                    }
                    let (p, size) = live.swap_remove(index % live.len());
                    unsafe { alloc.free(p as *mut u8, size) };
                }
            }

            let snap = alloc.snapshot();
            prop_assert!(snap.pool_count() >= heads.len());
            for (i, &head) in snap.pool_heads.iter().enumerate() {
                prop_assert!(head <= snap.pool_capacity);
                if let Some(&before) = heads.get(i) {
                    prop_assert!(head >= before, "pool {} cursor went back", i);
                }
            }
            prop_assert!(snap.free_blocks.keys().all(|&size| size <= snap.pool_capacity));
            heads = snap.pool_heads;
        }

        for (p, size) in live {
            unsafe { alloc.free(p as *mut u8, size) };
        }
    }

    #[test]
    fn oversized_round_trip_leaves_state(size in 513usize..20_000) {
        let config = PoolConfig::builder().pool_capacity(512).build();
        let alloc = PoolAllocator::with_config(config);
        let warm = alloc.allocate(40, DEFAULT_ALIGNMENT);
        unsafe { alloc.free(warm, 40) };
        let before = alloc.snapshot();

        let p = alloc.allocate(size, DEFAULT_ALIGNMENT);
        prop_assert_eq!(&alloc.snapshot(), &before);
        unsafe { alloc.free(p, size) };
        prop_assert_eq!(&alloc.snapshot(), &before);
    }
}
