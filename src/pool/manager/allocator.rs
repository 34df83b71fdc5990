/*!
 * Allocation Paths
 * Allocate (policy select, split) and free (coalesce) logic
 */

use super::PoolManager;
use crate::core::types::Size;
use crate::pool::types::{Allocation, PoolError, PoolResult, Policy};
use log::{info, warn};

impl PoolManager {
    /// Allocate `size` bytes from the pool
    ///
    /// Selects a gap under the pool's placement policy, splits off any
    /// remainder as a new gap, and returns a handle carrying the base offset
    /// and size. A failing allocate leaves the pool exactly as it was.
    pub fn allocate(&mut self, size: Size) -> PoolResult<Allocation> {
        if self.gaps.is_empty() || size == 0 {
            return Err(PoolError::NoGap {
                requested: size,
                largest: self.gaps.largest(),
            });
        }

        // First-fit walks the region list in address order; best-fit walks
        // the gap index from its smallest-size end
        let chosen = match self.policy {
            Policy::FirstFit => self.regions.first_fit(size),
            Policy::BestFit => self.gaps.best_fit(size),
        };
        let chosen = match chosen {
            Some(idx) => idx,
            None => {
                warn!(
                    "No gap fits: requested {} bytes, largest gap {} bytes ({} gaps)",
                    size,
                    self.gaps.largest(),
                    self.gaps.len()
                );
                return Err(PoolError::NoGap {
                    requested: size,
                    largest: self.gaps.largest(),
                });
            }
        };

        let remainder = self.regions.node(chosen).size - size;
        self.gaps.remove(chosen);

        let node = self.regions.node_mut(chosen);
        node.allocated = true;
        node.size = size;
        let offset = node.base;

        // An exact fit must not leave a zero-sized gap node behind
        if remainder > 0 {
            let gap = self.regions.split_after(chosen, offset + size, remainder);
            self.gaps.insert(&self.regions, gap);
            info!(
                "Allocated {} bytes at offset {} ({}), split {} byte gap at offset {}",
                size,
                offset,
                self.policy,
                remainder,
                offset + size
            );
        } else {
            info!(
                "Allocated {} bytes at offset {} ({}), exact fit",
                size, offset, self.policy
            );
        }

        self.num_allocs += 1;
        self.alloc_size += size;

        debug_assert!(self.is_consistent());
        Ok(Allocation { offset, size })
    }

    /// Return an allocation to the pool, merging with adjacent free regions
    ///
    /// The target is located by its base offset; an unknown handle fails with
    /// `NotFreed` and leaves the pool exactly as it was. Merging the successor
    /// first, then the predecessor, keeps the analysis local and adds at most
    /// one new gap entry.
    pub fn free(&mut self, alloc: &Allocation) -> PoolResult<()> {
        let target = match self.regions.find_allocated(alloc.offset()) {
            Some(idx) => idx,
            None => {
                warn!(
                    "Attempted to free unknown allocation at offset {}",
                    alloc.offset()
                );
                return Err(PoolError::NotFreed("no live allocation at that offset"));
            }
        };

        let freed_size = self.regions.node(target).size;
        self.num_allocs -= 1;
        self.alloc_size -= freed_size;
        self.regions.node_mut(target).allocated = false;

        let mut merged = 0;

        // Merge with the successor if it is free
        if let Some(next) = self.regions.node(target).next {
            if !self.regions.node(next).allocated {
                self.gaps.remove(next);
                let next_size = self.regions.node(next).size;
                self.regions.node_mut(target).size += next_size;
                self.regions.unlink(next);
                merged += 1;
            }
        }

        // Merge with the predecessor if it is free; it becomes the survivor
        let mut survivor = target;
        if let Some(prev) = self.regions.node(target).prev {
            if !self.regions.node(prev).allocated {
                self.gaps.remove(prev);
                let target_size = self.regions.node(target).size;
                self.regions.node_mut(prev).size += target_size;
                self.regions.unlink(target);
                survivor = prev;
                merged += 1;
            }
        }

        self.gaps.insert(&self.regions, survivor);

        info!(
            "Freed {} bytes at offset {}, coalesced {} neighbor(s) into a {} byte gap",
            freed_size,
            alloc.offset(),
            merged,
            self.regions.node(survivor).size
        );

        debug_assert!(self.is_consistent());
        Ok(())
    }
}
