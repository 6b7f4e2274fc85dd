//! The world surface bulk edits run against.

use mantle_primitives::{BlockPos, QuartPos, ResourceKey, UnitPos, WorldId};

use crate::block::BlockState;
use crate::flags::SetFlags;

/// One loaded storage unit (a full-height 16×16 block column).
pub trait StorageUnit {
	fn pos(&self) -> UnitPos;

	/// Entry of the sampling cell `cell`. Heights outside the unit clamp to its nearest layer.
	fn entry(&self, cell: QuartPos) -> &ResourceKey;

	/// Overwrites one sampling cell, clamping height like [`entry`](Self::entry).
	fn set_entry(&mut self, cell: QuartPos, entry: ResourceKey);

	/// Offers every sampling cell to `resolve` with its current entry. `Some` replaces it.
	fn rewrite_entries(&mut self, resolve: &mut dyn FnMut(QuartPos, &ResourceKey) -> Option<ResourceKey>);

	/// Flags the unit's persistent state as modified.
	fn mark_unsaved(&mut self);
}

/// A host world.
pub trait WorldHost {
	type Unit: StorageUnit;

	fn world_id(&self) -> WorldId;

	/// The unit at `pos` if it is loaded. Never loads or generates one.
	fn loaded_unit(&self, pos: UnitPos) -> Option<&Self::Unit>;

	fn loaded_unit_mut(&mut self, pos: UnitPos) -> Option<&mut Self::Unit>;

	/// Sends the current entries of each unit to the observers tracking it.
	fn resend_entries(&mut self, units: &[UnitPos]);

	fn block(&self, pos: BlockPos) -> BlockState;

	/// Clears auxiliary data (inventories and similar) attached at `pos`.
	fn clear_block_data(&mut self, pos: BlockPos);

	/// Writes a block value. Returns `false` if nothing changed.
	fn set_block(&mut self, pos: BlockPos, state: BlockState, flags: SetFlags) -> bool;

	/// Tells the world the block at `pos` changed to a `kind` block.
	fn block_updated(&mut self, pos: BlockPos, kind: &ResourceKey);
}
