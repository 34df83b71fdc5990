/*!
 * Allocation Test
 * Allocate path: placement, splitting, exhaustion, handle validity
 */

use region_pool::{PoolAllocator, PoolError, PoolManager, Policy};

#[test]
fn test_allocate_then_free_restores_pool() {
    let mut pool = PoolManager::open(1000, Policy::BestFit).expect("Failed to open pool");

    let a = pool.allocate(100).expect("Failed to allocate A");
    let b = pool.allocate(200).expect("Failed to allocate B");
    assert_eq!(a.offset(), 0);
    assert_eq!(b.offset(), 100);

    pool.free(&a).expect("Failed to free A");
    pool.free(&b).expect("Failed to free B");

    let stats = pool.stats();
    assert_eq!(stats.num_allocs, 0);
    assert_eq!(stats.num_gaps, 1);
    assert_eq!(stats.alloc_size, 0);

    let segments = pool.inspect();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].size, 1000);
    assert!(!segments[0].allocated);
}

#[test]
fn test_whole_pool_allocation() {
    let mut pool = PoolManager::open(1000, Policy::BestFit).expect("Failed to open pool");

    let all = pool.allocate(1000).expect("Failed to allocate whole pool");
    assert_eq!(all.offset(), 0);
    assert_eq!(all.size(), 1000);
    assert_eq!(pool.num_gaps(), 0);

    // Any further request must fail with no gap available
    assert_eq!(
        pool.allocate(1),
        Err(PoolError::NoGap {
            requested: 1,
            largest: 0
        })
    );

    pool.free(&all).expect("Failed to free whole pool");
    assert!(pool.is_pristine());
}

#[test]
fn test_exact_fit_leaves_no_zero_gap() {
    let mut pool = PoolManager::open(100, Policy::BestFit).expect("Failed to open pool");

    let a = pool.allocate(50).expect("Failed to allocate first half");
    assert!(pool.allocate(60).is_err(), "60 bytes can't fit in 50");

    let b = pool.allocate(50).expect("Failed to allocate second half");
    assert_eq!(b.offset(), 50);
    assert_eq!(pool.num_gaps(), 0);
    assert_eq!(pool.used_nodes(), 2);

    assert!(pool.allocate(1).is_err());

    pool.free(&a).expect("Failed to free A");
    pool.free(&b).expect("Failed to free B");
    assert!(pool.is_pristine());
}

#[test]
fn test_zero_size_request_refused() {
    let mut pool = PoolManager::open(100, Policy::FirstFit).expect("Failed to open pool");
    assert!(matches!(
        pool.allocate(0),
        Err(PoolError::NoGap { requested: 0, .. })
    ));
}

#[test]
fn test_failed_allocate_leaves_pool_unchanged() {
    let mut pool = PoolManager::open(300, Policy::BestFit).expect("Failed to open pool");
    let _a = pool.allocate(100).expect("Failed to allocate");

    let before_stats = pool.stats();
    let before_segments = pool.inspect();

    assert_eq!(
        pool.allocate(500),
        Err(PoolError::NoGap {
            requested: 500,
            largest: 200
        })
    );

    assert_eq!(pool.stats(), before_stats);
    assert_eq!(pool.inspect(), before_segments);
}

#[test]
fn test_double_free_refused() {
    let mut pool = PoolManager::open(1000, Policy::FirstFit).expect("Failed to open pool");
    let a = pool.allocate(100).expect("Failed to allocate");

    pool.free(&a).expect("Failed to free");
    let before = pool.inspect();

    // The handle is stale now; a second free must refuse and change nothing
    assert!(matches!(pool.free(&a), Err(PoolError::NotFreed(_))));
    assert_eq!(pool.inspect(), before);
}

#[test]
fn test_handle_validity_tracking() {
    let mut pool = PoolManager::open(1000, Policy::BestFit).expect("Failed to open pool");
    let a = pool.allocate(128).expect("Failed to allocate");

    assert!(pool.is_valid(a.offset()));
    assert_eq!(pool.allocation_size(a.offset()), Some(128));
    assert!(!pool.is_valid(64), "interior offset is not an allocation base");

    pool.free(&a).expect("Failed to free");
    assert!(!pool.is_valid(a.offset()));
    assert_eq!(pool.allocation_size(a.offset()), None);
}

#[test]
fn test_node_store_grows_under_many_allocations() {
    let mut pool = PoolManager::open(1000, Policy::FirstFit).expect("Failed to open pool");

    // 100 single-byte allocations force the node store past its initial
    // capacity; stable indices must keep every link valid across growth
    let allocs: Vec<_> = (0..100)
        .map(|i| {
            pool.allocate(1)
                .unwrap_or_else(|_| panic!("Failed allocation {}", i))
        })
        .collect();

    assert_eq!(pool.num_allocs(), 100);
    assert_eq!(pool.used_nodes(), 101);
    assert_eq!(pool.alloc_size(), 100);

    for (i, alloc) in allocs.iter().enumerate() {
        pool.free(alloc)
            .unwrap_or_else(|_| panic!("Failed to free allocation {}", i));
    }

    assert!(pool.is_pristine());
    assert_eq!(pool.inspect().len(), 1);
}

#[test]
fn test_allocator_trait_surface() {
    // Drive the pool through the trait seam alone
    fn exhaust<A: PoolAllocator>(pool: &mut A, chunk: usize) -> usize {
        let mut count = 0;
        while pool.allocate(chunk).is_ok() {
            count += 1;
        }
        count
    }

    let mut pool = PoolManager::open(256, Policy::FirstFit).expect("Failed to open pool");
    assert_eq!(exhaust(&mut pool, 64), 4);
    assert_eq!(pool.num_gaps(), 0);
}

#[test]
fn test_allocate_reuses_freed_space() {
    let mut pool = PoolManager::open(1000, Policy::BestFit).expect("Failed to open pool");

    let a = pool.allocate(100).expect("Failed to allocate A");
    let _b = pool.allocate(200).expect("Failed to allocate B");

    pool.free(&a).expect("Failed to free A");

    // Best-fit prefers the 100-byte gap at offset 0 over the 700-byte tail
    let c = pool.allocate(100).expect("Failed to allocate C");
    assert_eq!(c.offset(), 0);
}
