//! Block, sampling-cell, and storage-unit coordinates.
//!
//! # Purpose
//!
//! Hosts address the same world at three resolutions:
//!
//! | Grid | Type | Size in blocks |
//! |------|------|----------------|
//! | block | [`BlockPos`] | 1 |
//! | sampling cell | [`QuartPos`] | [`CELL_SIZE`] on every axis |
//! | storage unit | [`UnitPos`] | [`UNIT_SIZE`] on x and z, full height on y |
//!
//! Everything here is pure. Conversions use arithmetic shifts so negative coordinates floor
//! toward negative infinity instead of truncating toward zero.
//!
//! # Invariants
//!
//! - `quantize(quantize(v)) == quantize(v)` and `quantize(v) <= v`.
//!   - Tested by: `tests::quantize_is_idempotent_floor`
//! - A [`BlockBox`] always satisfies `min <= max` per axis regardless of corner order.
//!   - Enforced in: [`BlockBox::from_corners`]

use std::ops::RangeInclusive;

/// log2 of the sampling-cell edge.
pub const CELL_SHIFT: u32 = 2;
/// Sampling-cell edge length in blocks.
pub const CELL_SIZE: i32 = 1 << CELL_SHIFT;
/// log2 of the storage-unit edge.
pub const UNIT_SHIFT: u32 = 4;
/// Storage-unit edge length in blocks (x and z).
pub const UNIT_SIZE: i32 = 1 << UNIT_SHIFT;
/// Sampling cells along one horizontal edge of a storage unit.
pub const CELLS_PER_UNIT_EDGE: i32 = UNIT_SIZE / CELL_SIZE;

/// Block coordinate to sampling-cell coordinate.
#[inline]
pub const fn block_to_cell(v: i32) -> i32 {
	v >> CELL_SHIFT
}

/// Sampling-cell coordinate to the block coordinate of its minimum corner.
#[inline]
pub const fn cell_to_block(v: i32) -> i32 {
	v << CELL_SHIFT
}

/// Floors a block coordinate to the nearest sampling-cell boundary.
#[inline]
pub const fn quantize(v: i32) -> i32 {
	cell_to_block(block_to_cell(v))
}

/// Block coordinate to storage-unit coordinate.
#[inline]
pub const fn block_to_unit(v: i32) -> i32 {
	v >> UNIT_SHIFT
}

/// Storage-unit coordinate to the block coordinate of its minimum corner.
#[inline]
pub const fn unit_to_block(v: i32) -> i32 {
	v << UNIT_SHIFT
}

/// Integer block position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BlockPos {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl BlockPos {
	pub const fn new(x: i32, y: i32, z: i32) -> Self {
		Self { x, y, z }
	}

	/// Floors every axis to a sampling-cell boundary.
	pub const fn quantize(self) -> Self {
		Self::new(quantize(self.x), quantize(self.y), quantize(self.z))
	}

	/// The sampling cell containing this block.
	pub const fn cell(self) -> QuartPos {
		QuartPos::new(block_to_cell(self.x), block_to_cell(self.y), block_to_cell(self.z))
	}

	/// The storage unit containing this block.
	pub const fn unit(self) -> UnitPos {
		UnitPos::new(block_to_unit(self.x), block_to_unit(self.z))
	}
}

/// Sampling-cell position (a 4×4×4 block cube).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct QuartPos {
	pub x: i32,
	pub y: i32,
	pub z: i32,
}

impl QuartPos {
	pub const fn new(x: i32, y: i32, z: i32) -> Self {
		Self { x, y, z }
	}

	/// Minimum-corner block of this cell.
	pub const fn to_block(self) -> BlockPos {
		BlockPos::new(cell_to_block(self.x), cell_to_block(self.y), cell_to_block(self.z))
	}

	/// The storage unit containing this cell.
	pub const fn unit(self) -> UnitPos {
		self.to_block().unit()
	}
}

/// Storage-unit (column) position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitPos {
	pub x: i32,
	pub z: i32,
}

impl UnitPos {
	pub const fn new(x: i32, z: i32) -> Self {
		Self { x, z }
	}

	pub const fn min_block_x(self) -> i32 {
		unit_to_block(self.x)
	}

	pub const fn min_block_z(self) -> i32 {
		unit_to_block(self.z)
	}

	/// Every sampling cell of this unit within the inclusive block height range.
	///
	/// Order is y outermost, then z, then x.
	pub fn cells(self, heights: RangeInclusive<i32>) -> impl Iterator<Item = QuartPos> {
		let cx = block_to_cell(self.min_block_x());
		let cz = block_to_cell(self.min_block_z());
		let ys = block_to_cell(*heights.start())..=block_to_cell(*heights.end());
		ys.flat_map(move |y| {
			(cz..cz + CELLS_PER_UNIT_EDGE)
				.flat_map(move |z| (cx..cx + CELLS_PER_UNIT_EDGE).map(move |x| QuartPos::new(x, y, z)))
		})
	}
}

/// Inclusive axis-aligned block box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockBox {
	min: BlockPos,
	max: BlockPos,
}

impl BlockBox {
	/// Builds the box spanned by two arbitrary corners.
	pub fn from_corners(a: BlockPos, b: BlockPos) -> Self {
		Self {
			min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
			max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
		}
	}

	pub const fn min(&self) -> BlockPos {
		self.min
	}

	pub const fn max(&self) -> BlockPos {
		self.max
	}

	/// Box spanned by the quantized corners.
	pub fn quantized(&self) -> Self {
		Self::from_corners(self.min.quantize(), self.max.quantize())
	}

	pub fn contains(&self, pos: BlockPos) -> bool {
		(self.min.x..=self.max.x).contains(&pos.x)
			&& (self.min.y..=self.max.y).contains(&pos.y)
			&& (self.min.z..=self.max.z).contains(&pos.z)
	}

	/// Whether the minimum corner of `cell` lies in the box.
	pub fn contains_cell(&self, cell: QuartPos) -> bool {
		self.contains(cell.to_block())
	}

	/// Number of blocks in the box.
	pub fn volume(&self) -> u64 {
		let span = |lo: i32, hi: i32| (i64::from(hi) - i64::from(lo) + 1) as u64;
		span(self.min.x, self.max.x) * span(self.min.y, self.max.y) * span(self.min.z, self.max.z)
	}

	/// Storage units intersecting the box, z outermost, then x.
	pub fn units(&self) -> impl Iterator<Item = UnitPos> + use<> {
		let xs = block_to_unit(self.min.x)..=block_to_unit(self.max.x);
		let zs = block_to_unit(self.min.z)..=block_to_unit(self.max.z);
		zs.flat_map(move |z| xs.clone().map(move |x| UnitPos::new(x, z)))
	}

	/// Sampling cells whose minimum corner lies in the box.
	pub fn cells(&self) -> impl Iterator<Item = QuartPos> + use<> {
		let lo = |v: i32| block_to_cell(v.saturating_add(CELL_SIZE - 1));
		let (min, max) = (self.min, self.max);
		let xs = lo(min.x)..=block_to_cell(max.x);
		let ys = lo(min.y)..=block_to_cell(max.y);
		let zs = lo(min.z)..=block_to_cell(max.z);
		zs.flat_map(move |z| {
			let xs = xs.clone();
			ys.clone()
				.flat_map(move |y| xs.clone().map(move |x| QuartPos::new(x, y, z)))
		})
	}

	/// Every block position in the box, x fastest, then y, then z.
	pub fn positions(&self) -> impl Iterator<Item = BlockPos> + use<> {
		let (min, max) = (self.min, self.max);
		(min.z..=max.z).flat_map(move |z| {
			(min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| BlockPos::new(x, y, z)))
		})
	}
}
