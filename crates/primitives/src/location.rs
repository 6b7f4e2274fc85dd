//! World identity and world-relative locations.

use std::fmt;

use crate::coords::BlockPos;

/// Opaque identity of a host world/level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorldId(pub u64);

impl fmt::Display for WorldId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "world#{}", self.0)
	}
}

/// A point in a specific world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
	pub world: WorldId,
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl Location {
	pub const fn new(world: WorldId, x: f64, y: f64, z: f64) -> Self {
		Self { world, x, y, z }
	}

	/// Block containing this point (each axis floored).
	pub fn block_pos(&self) -> BlockPos {
		BlockPos::new(floor_to_i32(self.x), floor_to_i32(self.y), floor_to_i32(self.z))
	}
}

fn floor_to_i32(v: f64) -> i32 {
	// `as` saturates out-of-range floats and maps NaN to 0.
	v.floor() as i32
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn block_pos_floors_negative_fractions() {
		let loc = Location::new(WorldId(1), -0.5, 64.9, 15.999);
		assert_eq!(loc.block_pos(), BlockPos::new(-1, 64, 15));
	}
}
