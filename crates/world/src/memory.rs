//! In-process [`WorldHost`] with a call journal.
//!
//! Units are loaded explicitly; anything not loaded stays absent, like a host that is never
//! asked to generate terrain. Every side-effecting call is appended to a journal so tests can
//! assert ordering.

use std::ops::RangeInclusive;

use mantle_primitives::{BlockPos, QuartPos, ResourceKey, UnitPos, WorldId, coords};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::block::BlockState;
use crate::flags::SetFlags;
use crate::host::{StorageUnit, WorldHost};

/// A side effect observed by a [`MemoryWorld`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldOp {
	ClearData(BlockPos),
	SetBlock(BlockPos, SetFlags),
	BlockUpdated(BlockPos),
	Resend(UnitPos),
}

pub struct MemoryUnit {
	pos: UnitPos,
	/// Inclusive range of cell layers.
	layers: RangeInclusive<i32>,
	/// Indexed y, then z, then x.
	entries: Vec<ResourceKey>,
	unsaved: bool,
}

impl MemoryUnit {
	fn new(pos: UnitPos, heights: RangeInclusive<i32>, fill: ResourceKey) -> Self {
		let layers = coords::block_to_cell(*heights.start())..=coords::block_to_cell(*heights.end());
		let edge = coords::CELLS_PER_UNIT_EDGE as usize;
		let count = layers.clone().count() * edge * edge;
		Self {
			pos,
			layers,
			entries: vec![fill; count],
			unsaved: false,
		}
	}

	fn index(&self, cell: QuartPos) -> usize {
		let edge = coords::CELLS_PER_UNIT_EDGE;
		let y = cell.y.clamp(*self.layers.start(), *self.layers.end()) - self.layers.start();
		let z = (cell.z - coords::block_to_cell(self.pos.min_block_z())).clamp(0, edge - 1);
		let x = (cell.x - coords::block_to_cell(self.pos.min_block_x())).clamp(0, edge - 1);
		((y * edge + z) * edge + x) as usize
	}

	pub fn is_unsaved(&self) -> bool {
		self.unsaved
	}

	/// Every cell of the unit, in storage order.
	pub fn cells(&self) -> impl Iterator<Item = QuartPos> + use<> {
		let heights = coords::cell_to_block(*self.layers.start())..=coords::cell_to_block(*self.layers.end());
		self.pos.cells(heights)
	}
}

impl StorageUnit for MemoryUnit {
	fn pos(&self) -> UnitPos {
		self.pos
	}

	fn entry(&self, cell: QuartPos) -> &ResourceKey {
		&self.entries[self.index(cell)]
	}

	fn set_entry(&mut self, cell: QuartPos, entry: ResourceKey) {
		let i = self.index(cell);
		self.entries[i] = entry;
	}

	fn rewrite_entries(
		&mut self,
		resolve: &mut dyn FnMut(QuartPos, &ResourceKey) -> Option<ResourceKey>,
	) {
		for (cell, slot) in self.cells().zip(self.entries.iter_mut()) {
			if let Some(next) = resolve(cell, slot) {
				*slot = next;
			}
		}
	}

	fn mark_unsaved(&mut self) {
		self.unsaved = true;
	}
}

pub struct MemoryWorld {
	id: WorldId,
	heights: RangeInclusive<i32>,
	units: FxHashMap<UnitPos, MemoryUnit>,
	blocks: FxHashMap<BlockPos, BlockState>,
	block_data: FxHashSet<BlockPos>,
	air: BlockState,
	journal: Vec<WorldOp>,
}

impl MemoryWorld {
	/// An empty world spanning the inclusive block height range `heights`.
	pub fn new(id: WorldId, heights: RangeInclusive<i32>, air: BlockState) -> Self {
		Self {
			id,
			heights,
			units: FxHashMap::default(),
			blocks: FxHashMap::default(),
			block_data: FxHashSet::default(),
			air,
			journal: Vec::new(),
		}
	}

	/// Loads a unit whose every cell holds `fill`.
	pub fn load_unit(&mut self, pos: UnitPos, fill: ResourceKey) {
		self.units
			.insert(pos, MemoryUnit::new(pos, self.heights.clone(), fill));
	}

	pub fn unload_unit(&mut self, pos: UnitPos) -> Option<MemoryUnit> {
		self.units.remove(&pos)
	}

	/// Places a block without journaling, as world generation would.
	pub fn place(&mut self, pos: BlockPos, state: BlockState) {
		self.blocks.insert(pos, state);
	}

	/// Attaches auxiliary data at `pos`.
	pub fn attach_data(&mut self, pos: BlockPos) {
		self.block_data.insert(pos);
	}

	pub fn has_data(&self, pos: BlockPos) -> bool {
		self.block_data.contains(&pos)
	}

	pub fn unit(&self, pos: UnitPos) -> Option<&MemoryUnit> {
		self.units.get(&pos)
	}

	pub fn journal(&self) -> &[WorldOp] {
		&self.journal
	}

	/// Units resent to observers, in call order.
	pub fn resent_units(&self) -> Vec<UnitPos> {
		self.journal
			.iter()
			.filter_map(|op| match op {
				WorldOp::Resend(pos) => Some(*pos),
				_ => None,
			})
			.collect()
	}

	fn in_height(&self, pos: BlockPos) -> bool {
		self.heights.contains(&pos.y)
	}
}

impl WorldHost for MemoryWorld {
	type Unit = MemoryUnit;

	fn world_id(&self) -> WorldId {
		self.id
	}

	fn loaded_unit(&self, pos: UnitPos) -> Option<&MemoryUnit> {
		self.units.get(&pos)
	}

	fn loaded_unit_mut(&mut self, pos: UnitPos) -> Option<&mut MemoryUnit> {
		self.units.get_mut(&pos)
	}

	fn resend_entries(&mut self, units: &[UnitPos]) {
		self.journal.extend(units.iter().map(|pos| WorldOp::Resend(*pos)));
	}

	fn block(&self, pos: BlockPos) -> BlockState {
		self.blocks.get(&pos).unwrap_or(&self.air).clone()
	}

	fn clear_block_data(&mut self, pos: BlockPos) {
		self.journal.push(WorldOp::ClearData(pos));
		self.block_data.remove(&pos);
	}

	fn set_block(&mut self, pos: BlockPos, state: BlockState, flags: SetFlags) -> bool {
		self.journal.push(WorldOp::SetBlock(pos, flags));
		if !self.in_height(pos) || self.block(pos) == state {
			return false;
		}
		self.blocks.insert(pos, state);
		true
	}

	fn block_updated(&mut self, pos: BlockPos, _kind: &ResourceKey) {
		self.journal.push(WorldOp::BlockUpdated(pos));
	}
}
