/*!
 * Pool Registry
 *
 * Process-wide table of open pools with an explicit initialize/shutdown
 * lifecycle. `PoolStore` is the table itself and is directly constructible;
 * the module-level functions operate on one process-wide store behind a
 * mutex-guarded static. The lock makes the static sound to touch from any
 * thread; serializing the lifecycle calls remains the caller's contract.
 */

use crate::core::limits::{EXPAND_FACTOR, FILL_FACTOR, POOL_STORE_INIT_CAPACITY};
use crate::core::types::{Offset, PoolId, Size};
use crate::pool::types::{
    Allocation, PoolError, PoolResult, PoolStats, Policy, RegionSegment,
};
use crate::pool::PoolManager;
use log::{info, warn};
use parking_lot::Mutex;

/// The process-wide pool store; `None` while uninitialized
static POOL_STORE: Mutex<Option<PoolStore>> = Mutex::new(None);

/// A growable table of open pool managers
///
/// Closed pools leave a tombstone slot; new pools always append at the tail,
/// so a `PoolId` stays valid for exactly the lifetime of its pool.
pub struct PoolStore {
    slots: Vec<Option<PoolManager>>,
    capacity: usize,
}

impl PoolStore {
    /// Create an empty store with the initial slot capacity
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(POOL_STORE_INIT_CAPACITY),
            capacity: POOL_STORE_INIT_CAPACITY,
        }
    }

    /// Open a pool of `size` bytes and register it
    ///
    /// On failure every partially acquired resource is released before the
    /// error is returned; nothing is registered.
    pub fn open(&mut self, size: Size, policy: Policy) -> PoolResult<PoolId> {
        self.ensure_capacity();
        let manager = PoolManager::open(size, policy)?;
        let id = self.slots.len() as PoolId;
        self.slots.push(Some(manager));
        info!("Registered pool {} ({} bytes, {})", id, size, policy);
        Ok(id)
    }

    /// Close a pool, requiring it to be back in its initial state
    pub fn close(&mut self, id: PoolId) -> PoolResult<()> {
        let slot = self
            .slots
            .get_mut(id as usize)
            .ok_or(PoolError::InvalidHandle(id))?;
        match slot {
            Some(manager) if !manager.is_pristine() => {
                warn!(
                    "Refused to close pool {}: {} live allocation(s), {} gap(s)",
                    id,
                    manager.num_allocs(),
                    manager.num_gaps()
                );
                Err(PoolError::NotFreed("pool still has live allocations"))
            }
            // The slot is never compacted away: a tombstone keeps later ids valid
            Some(_) => {
                *slot = None;
                info!("Closed pool {}", id);
                Ok(())
            }
            None => Err(PoolError::InvalidHandle(id)),
        }
    }

    /// Borrow an open pool
    pub fn get(&self, id: PoolId) -> PoolResult<&PoolManager> {
        self.slots
            .get(id as usize)
            .and_then(Option::as_ref)
            .ok_or(PoolError::InvalidHandle(id))
    }

    /// Mutably borrow an open pool
    pub fn get_mut(&mut self, id: PoolId) -> PoolResult<&mut PoolManager> {
        self.slots
            .get_mut(id as usize)
            .and_then(Option::as_mut)
            .ok_or(PoolError::InvalidHandle(id))
    }

    /// Number of pools currently open
    pub fn open_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Current slot capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Grow the slot table when the load factor is exceeded
    ///
    /// Tombstones count toward load: the tail only ever advances.
    fn ensure_capacity(&mut self) {
        if self.slots.len() as f64 / self.capacity as f64 > FILL_FACTOR {
            self.capacity *= EXPAND_FACTOR;
            self.slots.reserve_exact(self.capacity - self.slots.len());
        }
    }
}

impl Default for PoolStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize the process-wide registry
pub fn init() -> PoolResult<()> {
    let mut store = POOL_STORE.lock();
    if store.is_some() {
        return Err(PoolError::CalledAgain("registry already initialized"));
    }
    *store = Some(PoolStore::new());
    info!("Pool registry initialized");
    Ok(())
}

/// Shut the process-wide registry down, releasing its storage
///
/// Closing every pool first is the caller's responsibility; pools still open
/// at shutdown are released with the store.
pub fn shutdown() -> PoolResult<()> {
    let mut store = POOL_STORE.lock();
    match store.take() {
        Some(s) => {
            let open = s.open_count();
            if open > 0 {
                warn!("Registry shut down with {} pool(s) still open", open);
            }
            info!("Pool registry shut down");
            Ok(())
        }
        None => Err(PoolError::CalledAgain("registry not initialized")),
    }
}

/// Open a pool in the process-wide registry
pub fn open(size: Size, policy: Policy) -> PoolResult<PoolId> {
    with_store(|s| s.open(size, policy))
}

/// Close a pool in the process-wide registry
pub fn close(id: PoolId) -> PoolResult<()> {
    with_store(|s| s.close(id))
}

/// Allocate from an open pool
pub fn allocate(id: PoolId, size: Size) -> PoolResult<Allocation> {
    with_store(|s| s.get_mut(id)?.allocate(size))
}

/// Free an allocation back to its pool
pub fn free(id: PoolId, alloc: &Allocation) -> PoolResult<()> {
    with_store(|s| s.get_mut(id)?.free(alloc))
}

/// Snapshot an open pool's region list
pub fn inspect(id: PoolId) -> PoolResult<Vec<RegionSegment>> {
    with_store(|s| Ok(s.get(id)?.inspect()))
}

/// Summary counters of an open pool
pub fn stats(id: PoolId) -> PoolResult<PoolStats> {
    with_store(|s| Ok(s.get(id)?.stats()))
}

/// Write bytes into a live allocation of an open pool
pub fn write(id: PoolId, offset: Offset, data: &[u8]) -> PoolResult<()> {
    with_store(|s| s.get_mut(id)?.write(offset, data))
}

/// Read bytes from a live allocation of an open pool
pub fn read(id: PoolId, offset: Offset, size: Size) -> PoolResult<Vec<u8>> {
    with_store(|s| s.get(id)?.read(offset, size))
}

fn with_store<T>(f: impl FnOnce(&mut PoolStore) -> PoolResult<T>) -> PoolResult<T> {
    let mut guard = POOL_STORE.lock();
    match guard.as_mut() {
        Some(store) => f(store),
        None => Err(PoolError::CalledAgain("registry not initialized")),
    }
}
