/*!
 * Pool Module
 * The per-pool allocation engine
 */

pub mod manager;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::PoolManager;
pub use traits::*;
pub use types::*;
