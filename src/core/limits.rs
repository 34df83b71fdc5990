/*!
 * Limits and Constants
 *
 * Centralized location for capacities, thresholds, and growth factors.
 * Values include rationale comments explaining WHY they exist.
 */

// =============================================================================
// GROWTH POLICY
// =============================================================================

/// Load factor at which a slot container grows
/// Applies uniformly to the pool store, the node store, and the gap index
pub const FILL_FACTOR: f64 = 0.75;

/// Capacity multiplier applied when a container grows
pub const EXPAND_FACTOR: usize = 2;

// =============================================================================
// INITIAL CAPACITIES
// =============================================================================

/// Initial slot count of the process-wide pool store
/// Few programs open more than a handful of pools
pub const POOL_STORE_INIT_CAPACITY: usize = 20;

/// Initial slot count of a pool's region-node store
/// Covers ~20 live allocations before the first growth
pub const NODE_STORE_INIT_CAPACITY: usize = 40;

/// Initial capacity of a pool's gap index
/// Gap count is bounded by the live-node count, so it matches the node store
pub const GAP_INDEX_INIT_CAPACITY: usize = 40;
