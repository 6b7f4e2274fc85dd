//! Region-scoped edits of a world's entry grid and block grid.
//!
//! # Purpose
//!
//! Rewrite every sampling cell (or every block) in a box with one sweep, then tell observers
//! once per storage unit instead of once per cell.
//!
//! # Mental Model
//!
//! Entry fills work on the sampling grid. Both corners are floored to cell boundaries, each
//! intersecting storage unit is fetched only if already loaded, and a per-cell resolver decides
//! what to replace. Observers are notified after the sweep, one notification per unit that
//! changed.
//!
//! Block fills work at block resolution: auxiliary data at a position is cleared before the
//! new value is written there, and neighbor updates are flushed after every position has been
//! written.
//!
//! # Invariants
//!
//! - Argument errors are raised before any unit is fetched.
//!   - Enforced in: [`BulkMutator::fill_by_entry`], [`BulkMutator::set_entry_at`]
//!   - Tested by: `fill::tests::unknown_entry_fails_before_fetching`
//! - Units that are not loaded are skipped, never generated.
//!   - Enforced in: [`BulkMutator::fill_by_entry`]
//!   - Tested by: `fill::tests::unloaded_units_are_skipped`
//! - Only units with at least one changed cell are marked unsaved and resent.
//!   - Enforced in: [`BulkMutator::fill_by_entry`]
//!   - Tested by: `fill::tests::filter_matching_nothing_changes_nothing`

use mantle_primitives::{Location, ResourceKey, WorldId};
use mantle_registry::KeyLookup;

use crate::block::BlockState;
use crate::error::FillError;
use crate::flags::SetFlags;
use crate::host::{StorageUnit, WorldHost};
use crate::region::{Region, UnitCursor};

/// Flags used for every block written by [`BulkMutator::fill_by_value`].
pub const FILL_FLAGS: SetFlags = SetFlags::UPDATE_CLIENTS;

#[derive(Debug, Default)]
struct FillSummary {
	units_visited: usize,
	units_skipped: usize,
	units_touched: usize,
	cells_changed: usize,
}

/// Bulk editor bound to one world and the registry its entries come from.
pub struct BulkMutator<'a, W, K: ?Sized> {
	world: &'a mut W,
	entries: &'a K,
}

impl<'a, W: WorldHost, K: KeyLookup + ?Sized> BulkMutator<'a, W, K> {
	pub fn new(world: &'a mut W, entries: &'a K) -> Self {
		Self { world, entries }
	}

	pub fn world_id(&self) -> WorldId {
		self.world.world_id()
	}

	fn region(&self, from: &Location, to: &Location) -> Result<Region, FillError> {
		let region = Region::new(from, to)?;
		self.check_world(region.world())?;
		Ok(region)
	}

	fn check_world(&self, actual: WorldId) -> Result<(), FillError> {
		let expected = self.world.world_id();
		if actual != expected {
			return Err(FillError::WorldMismatch { expected, actual });
		}
		Ok(())
	}

	fn check_key(&self, key: &ResourceKey) -> Result<(), FillError> {
		if !self.entries.contains_key(key) {
			return Err(FillError::UnknownKey(key.clone()));
		}
		Ok(())
	}

	/// Storage units an entry fill between `from` and `to` would visit.
	pub fn plan(&self, from: &Location, to: &Location) -> Result<Vec<UnitCursor>, FillError> {
		let region = self.region(from, to)?;
		Ok(region.sweep(&*self.world).collect())
	}

	/// Sets every sampling cell in the box to `entry`.
	///
	/// With a `filter`, only cells currently holding that entry are replaced. Returns the
	/// number of cells replaced; zero is not an error.
	pub fn fill_by_entry(
		&mut self,
		from: &Location,
		to: &Location,
		entry: &ResourceKey,
		filter: Option<&ResourceKey>,
	) -> Result<usize, FillError> {
		let region = self.region(from, to)?;
		self.check_key(entry)?;
		if let Some(filter) = filter {
			self.check_key(filter)?;
		}

		let _span = tracing::debug_span!("fill_by_entry", world = %region.world(), entry = %entry)
			.entered();
		let cells = region.cell_box();
		let mut summary = FillSummary::default();
		let mut touched = Vec::new();

		for pos in cells.units() {
			let Some(unit) = self.world.loaded_unit_mut(pos) else {
				summary.units_skipped += 1;
				continue;
			};
			summary.units_visited += 1;

			let mut changed = 0;
			unit.rewrite_entries(&mut |cell, current| {
				let selected = cells.contains_cell(cell) && filter.is_none_or(|f| current == f);
				if !selected {
					return None;
				}
				changed += 1;
				Some(entry.clone())
			});

			if changed > 0 {
				unit.mark_unsaved();
				touched.push(pos);
				summary.cells_changed += changed;
			}
		}

		summary.units_touched = touched.len();
		if !touched.is_empty() {
			self.world.resend_entries(&touched);
		}
		tracing::debug!(
			units_visited = summary.units_visited,
			units_skipped = summary.units_skipped,
			units_touched = summary.units_touched,
			cells_changed = summary.cells_changed,
			"entry fill finished"
		);
		Ok(summary.cells_changed)
	}

	/// Writes `value` at every block in the box.
	///
	/// With a `filter`, only blocks of that kind are replaced, whatever their properties.
	/// Returns the number of positions that changed.
	pub fn fill_by_value(
		&mut self,
		from: &Location,
		to: &Location,
		value: &BlockState,
		filter: Option<&ResourceKey>,
	) -> Result<usize, FillError> {
		let region = self.region(from, to)?;
		let _span = tracing::debug_span!("fill_by_value", world = %region.world(), value = %value)
			.entered();

		let mut written = Vec::new();
		for pos in region.blocks().positions() {
			if let Some(kind) = filter
				&& !self.world.block(pos).is(kind)
			{
				continue;
			}
			self.world.clear_block_data(pos);
			if self.world.set_block(pos, value.clone(), FILL_FLAGS) {
				written.push(pos);
			}
		}

		for pos in &written {
			self.world.block_updated(*pos, value.kind());
		}
		tracing::debug!(
			volume = region.blocks().volume(),
			written = written.len(),
			"block fill finished"
		);
		Ok(written.len())
	}

	/// Entry of the sampling cell containing `at`, or `None` if its unit is not loaded.
	pub fn entry_at(&self, at: &Location) -> Result<Option<ResourceKey>, FillError> {
		self.check_world(at.world)?;
		let cell = at.block_pos().cell();
		Ok(self
			.world
			.loaded_unit(cell.unit())
			.map(|unit| unit.entry(cell).clone()))
	}

	/// Sets the sampling cell containing `at` to `entry`.
	///
	/// The unit is marked unsaved but observers are not notified.
	pub fn set_entry_at(&mut self, at: &Location, entry: &ResourceKey) -> Result<(), FillError> {
		self.check_world(at.world)?;
		self.check_key(entry)?;
		let cell = at.block_pos().cell();
		let unit = self
			.world
			.loaded_unit_mut(cell.unit())
			.ok_or(FillError::UnitNotLoaded(cell.unit()))?;
		unit.set_entry(cell, entry.clone());
		unit.mark_unsaved();
		tracing::trace!(unit = ?unit.pos(), cell = ?cell, entry = %entry, "entry set");
		Ok(())
	}
}

#[cfg(test)]
mod tests;
