/*!
 * Pool Traits
 * Allocation abstractions
 */

use super::types::*;
use crate::core::types::{Offset, Size};

/// Byte-range allocator interface
pub trait PoolAllocator {
    /// Allocate a byte range from the pool
    fn allocate(&mut self, size: Size) -> PoolResult<Allocation>;

    /// Return an allocation to the pool, coalescing with free neighbors
    fn free(&mut self, alloc: &Allocation) -> PoolResult<()>;

    /// Check if an offset is the base of a live allocation
    fn is_valid(&self, offset: Offset) -> bool;

    /// Get the size of the live allocation based at an offset
    fn allocation_size(&self, offset: Offset) -> Option<Size>;
}

/// Pool metadata provider
pub trait PoolInfo {
    /// Get summary counters
    fn stats(&self) -> PoolStats;

    /// Snapshot the region list in address order
    fn inspect(&self) -> Vec<RegionSegment>;
}
