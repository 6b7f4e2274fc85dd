//! Value types shared by the host interop crates.

/// Packed 24-bit RGB colors.
pub mod color;
/// Block, sampling-cell, and storage-unit coordinate mapping.
pub mod coords;
/// Namespaced `namespace:path` keys.
pub mod key;
/// World identity and world-relative locations.
pub mod location;

pub use color::{ColorError, Rgb};
pub use coords::{BlockBox, BlockPos, QuartPos, UnitPos, quantize};
pub use key::{KeyError, ResourceKey};
pub use location::{Location, WorldId};
