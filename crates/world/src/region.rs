//! Regions spanned by two world locations.

use mantle_primitives::{BlockBox, Location, UnitPos, WorldId};

use crate::error::FillError;
use crate::host::WorldHost;

/// Axis-aligned block box in one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
	world: WorldId,
	blocks: BlockBox,
}

impl Region {
	/// The box between `a` and `b`, which must be in the same world.
	pub fn new(a: &Location, b: &Location) -> Result<Self, FillError> {
		if a.world != b.world {
			return Err(FillError::DifferentWorlds {
				first: a.world,
				second: b.world,
			});
		}
		Ok(Self {
			world: a.world,
			blocks: BlockBox::from_corners(a.block_pos(), b.block_pos()),
		})
	}

	pub fn world(&self) -> WorldId {
		self.world
	}

	pub fn blocks(&self) -> BlockBox {
		self.blocks
	}

	/// The box on the sampling grid: both corners floored to cell boundaries.
	pub fn cell_box(&self) -> BlockBox {
		self.blocks.quantized()
	}

	/// Storage units the sampling-grid box intersects, with their loaded state in `world`.
	pub fn sweep<'w, W: WorldHost>(
		&self,
		world: &'w W,
	) -> impl Iterator<Item = UnitCursor> + use<'w, W> {
		self.cell_box().units().map(move |pos| UnitCursor {
			pos,
			loaded: world.loaded_unit(pos).is_some(),
		})
	}
}

/// One storage unit visited by a region sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitCursor {
	pub pos: UnitPos,
	pub loaded: bool,
}
