/*!
 * Pool Inspection
 * Owned snapshots of the region list
 */

use super::PoolManager;
use crate::pool::types::RegionSegment;

impl PoolManager {
    /// Snapshot the region list in address order
    ///
    /// The returned sequence is owned by the caller and does not alias
    /// internal state; calling twice with no intervening mutation yields
    /// identical snapshots.
    pub fn inspect(&self) -> Vec<RegionSegment> {
        self.regions
            .iter()
            .map(|(_, node)| RegionSegment {
                size: node.size,
                allocated: node.allocated,
            })
            .collect()
    }
}
