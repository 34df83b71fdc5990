/*!
 * Pool Manager
 *
 * Binds a backing buffer, the region list, the gap index, and summary
 * counters into one allocation engine.
 *
 * ## Layout discipline
 *
 * Region nodes live in a growable slot store and reference each other by
 * stable index, never by pointer, so store growth can't invalidate a link.
 * Public handles carry byte offsets and are re-validated on every call.
 */

mod allocator;
mod data;
mod gap_index;
mod inspect;
mod region_list;

use super::traits::{PoolAllocator, PoolInfo};
use super::types::{Allocation, PoolError, PoolResult, PoolStats, Policy, RegionSegment};
use crate::core::types::{Offset, Size};
use gap_index::GapIndex;
use log::info;
use region_list::RegionList;

/// A fixed-size pool and the metadata partitioning it into regions
pub struct PoolManager {
    buffer: Box<[u8]>,
    regions: RegionList,
    gaps: GapIndex,
    policy: Policy,
    alloc_size: Size,
    num_allocs: usize,
}

impl PoolManager {
    /// Open a pool of exactly `size` bytes under the given placement policy
    ///
    /// The backing buffer is zero-filled. The region list starts as a single
    /// free node covering the whole buffer, with one matching gap entry.
    pub fn open(size: Size, policy: Policy) -> PoolResult<Self> {
        let buffer = try_zeroed_buffer(size)?;
        let regions = RegionList::new(size);
        let mut gaps = GapIndex::new();
        gaps.insert(&regions, regions.head());

        info!("Opened {} byte pool with {} placement", size, policy);

        Ok(Self {
            buffer,
            regions,
            gaps,
            policy,
            alloc_size: 0,
            num_allocs: 0,
        })
    }

    /// Total pool size in bytes
    pub fn pool_size(&self) -> Size {
        self.buffer.len()
    }

    /// Placement policy fixed at open
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Bytes currently allocated
    pub fn alloc_size(&self) -> Size {
        self.alloc_size
    }

    /// Number of live allocations
    pub fn num_allocs(&self) -> usize {
        self.num_allocs
    }

    /// Number of free regions
    pub fn num_gaps(&self) -> usize {
        self.gaps.len()
    }

    /// Number of live region nodes
    pub fn used_nodes(&self) -> usize {
        self.regions.used_nodes()
    }

    /// Whether the pool is back in its initial state: one gap, no allocations
    ///
    /// Closing a pool requires this; the registry refuses otherwise.
    pub fn is_pristine(&self) -> bool {
        self.num_allocs == 0 && self.gaps.len() == 1
    }

    /// Summary counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_size: self.pool_size(),
            alloc_size: self.alloc_size,
            available: self.pool_size() - self.alloc_size,
            num_allocs: self.num_allocs,
            num_gaps: self.gaps.len(),
            used_nodes: self.regions.used_nodes(),
            policy: self.policy,
        }
    }

    /// Check if an offset is the base of a live allocation
    pub fn is_valid(&self, offset: Offset) -> bool {
        self.regions.find_allocated(offset).is_some()
    }

    /// Get the size of the live allocation based at `offset`
    pub fn allocation_size(&self, offset: Offset) -> Option<Size> {
        self.regions
            .find_allocated(offset)
            .map(|idx| self.regions.node(idx).size)
    }

    /// Full-traversal consistency check, cross-checking every counter and the
    /// gap index against the region list
    ///
    /// Wrapped in `debug_assert!` by the mutating paths; an inconsistency here
    /// is a programming defect, not an operational error.
    pub(crate) fn is_consistent(&self) -> bool {
        let mut walked_bytes = 0;
        let mut allocs = 0;
        let mut alloc_bytes = 0;
        let mut free_nodes = 0;
        let mut live_nodes = 0;
        let mut prev_free = false;
        let mut prev_idx = None;

        for (idx, node) in self.regions.iter() {
            if !node.live || node.base != walked_bytes || node.prev != prev_idx {
                return false;
            }
            // Coalescing invariant: no two adjacent free nodes
            if !node.allocated && prev_free {
                return false;
            }
            walked_bytes += node.size;
            live_nodes += 1;
            if node.allocated {
                allocs += 1;
                alloc_bytes += node.size;
            } else {
                free_nodes += 1;
                if self.gaps.entries().iter().filter(|e| e.node == idx).count() != 1 {
                    return false;
                }
            }
            prev_free = !node.allocated;
            prev_idx = Some(idx);
        }

        // Exact coverage and counter agreement
        if walked_bytes != self.pool_size()
            || allocs != self.num_allocs
            || alloc_bytes != self.alloc_size
            || free_nodes != self.gaps.len()
            || live_nodes != self.regions.used_nodes()
        {
            return false;
        }

        // Gap index ordering (size ascending, base ascending on tie) and
        // agreement between carried and actual sizes
        self.gaps.entries().windows(2).all(|pair| {
            let a = (pair[0].size, self.regions.node(pair[0].node).base);
            let b = (pair[1].size, self.regions.node(pair[1].node).base);
            a < b
        }) && self
            .gaps
            .entries()
            .iter()
            .all(|e| e.size == self.regions.node(e.node).size)
    }
}

impl PoolAllocator for PoolManager {
    fn allocate(&mut self, size: Size) -> PoolResult<Allocation> {
        PoolManager::allocate(self, size)
    }

    fn free(&mut self, alloc: &Allocation) -> PoolResult<()> {
        PoolManager::free(self, alloc)
    }

    fn is_valid(&self, offset: Offset) -> bool {
        PoolManager::is_valid(self, offset)
    }

    fn allocation_size(&self, offset: Offset) -> Option<Size> {
        PoolManager::allocation_size(self, offset)
    }
}

impl PoolInfo for PoolManager {
    fn stats(&self) -> PoolStats {
        PoolManager::stats(self)
    }

    fn inspect(&self) -> Vec<RegionSegment> {
        PoolManager::inspect(self)
    }
}

/// Acquire the zero-filled backing buffer, failing instead of aborting
fn try_zeroed_buffer(size: Size) -> PoolResult<Box<[u8]>> {
    let mut buffer = Vec::new();
    if buffer.try_reserve_exact(size).is_err() {
        return Err(PoolError::OutOfMemory {
            requested: size,
            resource: "backing buffer",
        });
    }
    buffer.resize(size, 0);
    Ok(buffer.into_boxed_slice())
}
