/*!
 * Pool Data Access
 * Read/write operations against the backing buffer
 */

use super::PoolManager;
use crate::core::types::{Offset, Size};
use crate::pool::types::{PoolError, PoolResult};
use log::info;

impl PoolManager {
    /// Write bytes into a live allocation
    ///
    /// The whole range `offset..offset + data.len()` must fall inside one
    /// live allocation; a stale handle or out-of-range write is refused.
    pub fn write(&mut self, offset: Offset, data: &[u8]) -> PoolResult<()> {
        let owner = self
            .regions
            .find_containing(offset, data.len())
            .ok_or(PoolError::InvalidAccess {
                offset,
                len: data.len(),
            })?;

        self.buffer[offset..offset + data.len()].copy_from_slice(data);

        info!(
            "Wrote {} bytes at offset {} (allocation at offset {})",
            data.len(),
            offset,
            self.regions.node(owner).base
        );
        Ok(())
    }

    /// Read bytes from a live allocation
    pub fn read(&self, offset: Offset, size: Size) -> PoolResult<Vec<u8>> {
        self.regions
            .find_containing(offset, size)
            .ok_or(PoolError::InvalidAccess { offset, len: size })?;

        Ok(self.buffer[offset..offset + size].to_vec())
    }
}
