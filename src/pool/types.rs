/*!
 * Pool Types
 * Common types for pool allocation
 */

use crate::core::types::{Offset, PoolId, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pool operation result
pub type PoolResult<T> = Result<T, PoolError>;

/// Pool errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("lifecycle call out of order: {0}")]
    CalledAgain(&'static str),

    #[error("pool not freed: {0}")]
    NotFreed(&'static str),

    #[error("no gap fits: requested {requested} bytes, largest gap {largest} bytes")]
    NoGap { requested: Size, largest: Size },

    #[error("out of memory: could not acquire {requested} bytes for {resource}")]
    OutOfMemory {
        requested: Size,
        resource: &'static str,
    },

    #[error("unknown pool handle: {0}")]
    InvalidHandle(PoolId),

    #[error("invalid pool offset: {offset} (+{len} bytes)")]
    InvalidAccess { offset: Offset, len: Size },
}

/// Placement policy, fixed at pool open
///
/// First-fit favors locality and selection speed; best-fit favors low
/// external fragmentation at the cost of scanning the size-ordered gap index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    FirstFit,
    BestFit,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Policy::FirstFit => write!(f, "first-fit"),
            Policy::BestFit => write!(f, "best-fit"),
        }
    }
}

/// Handle to a live allocation
///
/// Carries the base offset and size only; validity lasts until the
/// corresponding free or pool close, and every use is re-validated against
/// the pool's region list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub(crate) offset: Offset,
    pub(crate) size: Size,
}

impl Allocation {
    /// Base offset of the allocation within its pool
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Size of the allocation in bytes
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Pool summary metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub total_size: Size,
    pub alloc_size: Size,
    pub available: Size,
    pub num_allocs: usize,
    pub num_gaps: usize,
    pub used_nodes: usize,
    pub policy: Policy,
}

/// One entry of an inspection snapshot: a region's size and whether it is
/// currently allocated, in address order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSegment {
    pub size: Size,
    pub allocated: bool,
}
