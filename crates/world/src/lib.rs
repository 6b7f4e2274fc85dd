//! Bulk edits over host worlds.
//!
//! [`BulkMutator`] fills regions of a world's sampling-cell entry grid (validated against a
//! registry through [`KeyLookup`](mantle_registry::KeyLookup)) and of its block grid. Worlds
//! are reached through [`WorldHost`]; [`MemoryWorld`] is an in-process implementation that
//! journals every side effect.

mod block;
mod error;
pub mod fill;
pub mod flags;
pub mod host;
pub mod memory;
pub mod region;

pub use block::BlockState;
pub use error::FillError;
pub use fill::{BulkMutator, FILL_FLAGS};
pub use flags::SetFlags;
pub use host::{StorageUnit, WorldHost};
pub use memory::{MemoryUnit, MemoryWorld, WorldOp};
pub use region::{Region, UnitCursor};
