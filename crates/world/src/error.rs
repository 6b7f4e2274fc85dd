use mantle_primitives::{ResourceKey, UnitPos, WorldId};

/// Argument errors from region edits. Raised before any unit is fetched or written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
	#[error("region corners are in different worlds ({first} and {second})")]
	DifferentWorlds { first: WorldId, second: WorldId },

	#[error("location is in {actual}, but this editor operates on {expected}")]
	WorldMismatch { expected: WorldId, actual: WorldId },

	#[error("no registered entry {0}")]
	UnknownKey(ResourceKey),

	#[error("storage unit ({}, {}) is not loaded", .0.x, .0.z)]
	UnitNotLoaded(UnitPos),
}
