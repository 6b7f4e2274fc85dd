use mantle_accessor::{AccessorTable, StaticSource, resolve};
use mantle_primitives::{BlockBox, BlockPos, Location, ResourceKey, UnitPos, WorldId};
use mantle_registry::{MemoryRegistry, RegistrationStrategy, RegistryBridge};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::{BulkMutator, FILL_FLAGS};
use crate::block::BlockState;
use crate::error::FillError;
use crate::memory::{MemoryWorld, WorldOp};
use crate::region::UnitCursor;

const WORLD: WorldId = WorldId(1);

fn key(s: &str) -> ResourceKey {
	ResourceKey::parse(s).unwrap()
}

fn at(x: f64, y: f64, z: f64) -> Location {
	Location::new(WORLD, x, y, z)
}

fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn biomes() -> RegistryBridge<MemoryRegistry<()>> {
	let accessors = resolve(&AccessorTable::new(), &StaticSource::new("1.20.4")).unwrap();
	let host = MemoryRegistry::new(key("worldgen/biome"))
		.bootstrap([(key("plains"), ()), (key("desert"), ()), (key("forest"), ())])
		.unwrap();
	RegistryBridge::new(host, &accessors).with_strategy(RegistrationStrategy::Overlay)
}

/// Blocks 0..=15 tall, with units (0,0), (1,0), (0,1), (1,1) and (-1,-1) loaded as plains.
fn world() -> MemoryWorld {
	let mut world = MemoryWorld::new(WORLD, 0..=15, BlockState::new(key("air")));
	for (x, z) in [(0, 0), (1, 0), (0, 1), (1, 1), (-1, -1)] {
		world.load_unit(UnitPos::new(x, z), key("plains"));
	}
	world
}

fn unsaved(world: &MemoryWorld, x: i32, z: i32) -> bool {
	world.unit(UnitPos::new(x, z)).is_some_and(|u| u.is_unsaved())
}

#[test]
fn eight_block_cube_touches_eight_cells() {
	init_tracing();
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);

	let changed = editor
		.fill_by_entry(&at(0.0, 0.0, 0.0), &at(7.0, 7.0, 7.0), &key("desert"), None)
		.unwrap();

	assert_eq!(changed, 8);
	assert_eq!(editor.entry_at(&at(5.0, 5.0, 5.0)).unwrap(), Some(key("desert")));
	assert_eq!(editor.entry_at(&at(8.0, 0.0, 0.0)).unwrap(), Some(key("plains")));
	assert_eq!(world.resent_units(), vec![UnitPos::new(0, 0)]);
}

#[test]
fn full_unit_fill_notifies_once() {
	let mut world = world();
	let biomes = biomes();
	let changed = BulkMutator::new(&mut world, &biomes)
		.fill_by_entry(&at(0.0, 0.0, 0.0), &at(15.0, 15.0, 15.0), &key("forest"), None)
		.unwrap();

	assert_eq!(changed, 64);
	assert_eq!(world.resent_units(), vec![UnitPos::new(0, 0)]);
	assert!(unsaved(&world, 0, 0));
	assert!(!unsaved(&world, 1, 0));
}

#[test]
fn filter_matching_nothing_changes_nothing() {
	let mut world = world();
	let biomes = biomes();
	let changed = BulkMutator::new(&mut world, &biomes)
		.fill_by_entry(
			&at(0.0, 0.0, 0.0),
			&at(31.0, 15.0, 31.0),
			&key("desert"),
			Some(&key("forest")),
		)
		.unwrap();

	assert_eq!(changed, 0);
	assert!(world.resent_units().is_empty());
	assert!(!unsaved(&world, 0, 0));
}

#[test]
fn filter_replaces_only_matching_cells() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);
	editor.set_entry_at(&at(1.0, 1.0, 1.0), &key("desert")).unwrap();
	editor.set_entry_at(&at(6.0, 9.0, 13.0), &key("desert")).unwrap();

	let changed = editor
		.fill_by_entry(
			&at(0.0, 0.0, 0.0),
			&at(15.0, 15.0, 15.0),
			&key("forest"),
			Some(&key("desert")),
		)
		.unwrap();

	assert_eq!(changed, 2);
	assert_eq!(editor.entry_at(&at(6.0, 9.0, 13.0)).unwrap(), Some(key("forest")));
	assert_eq!(editor.entry_at(&at(4.0, 0.0, 0.0)).unwrap(), Some(key("plains")));
	assert_eq!(world.resent_units(), vec![UnitPos::new(0, 0)]);
}

#[test]
fn unloaded_units_are_skipped() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);
	let (from, to) = (at(0.0, 0.0, 0.0), at(40.0, 3.0, 3.0));

	assert_eq!(
		editor.plan(&from, &to).unwrap(),
		vec![
			UnitCursor {
				pos: UnitPos::new(0, 0),
				loaded: true,
			},
			UnitCursor {
				pos: UnitPos::new(1, 0),
				loaded: true,
			},
			UnitCursor {
				pos: UnitPos::new(2, 0),
				loaded: false,
			},
		]
	);

	let changed = editor.fill_by_entry(&from, &to, &key("desert"), None).unwrap();
	assert_eq!(changed, 8);
	assert_eq!(world.resent_units(), vec![UnitPos::new(0, 0), UnitPos::new(1, 0)]);
	assert!(world.unit(UnitPos::new(2, 0)).is_none());
}

#[test]
fn corners_in_different_worlds_are_rejected() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);
	let elsewhere = Location::new(WorldId(2), 7.0, 7.0, 7.0);

	assert_eq!(
		editor.fill_by_entry(&at(0.0, 0.0, 0.0), &elsewhere, &key("desert"), None),
		Err(FillError::DifferentWorlds {
			first: WORLD,
			second: WorldId(2),
		})
	);
	assert_eq!(
		editor.fill_by_entry(&elsewhere, &elsewhere, &key("desert"), None),
		Err(FillError::WorldMismatch {
			expected: WORLD,
			actual: WorldId(2),
		})
	);
	assert!(world.journal().is_empty());
	assert!(!unsaved(&world, 0, 0));
}

#[test]
fn unknown_entry_fails_before_fetching() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);
	let (from, to) = (at(0.0, 0.0, 0.0), at(15.0, 15.0, 15.0));

	assert_eq!(
		editor.fill_by_entry(&from, &to, &key("test:missing"), None),
		Err(FillError::UnknownKey(key("test:missing")))
	);
	assert_eq!(
		editor.fill_by_entry(&from, &to, &key("desert"), Some(&key("test:missing"))),
		Err(FillError::UnknownKey(key("test:missing")))
	);
	assert_eq!(editor.entry_at(&at(0.0, 0.0, 0.0)).unwrap(), Some(key("plains")));
	assert!(!unsaved(&world, 0, 0));
	assert!(world.resent_units().is_empty());
}

#[test]
fn negative_coordinates_floor_to_their_cell() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);

	let changed = editor
		.fill_by_entry(&at(-0.5, 0.0, -0.5), &at(-1.0, 3.0, -1.0), &key("desert"), None)
		.unwrap();

	assert_eq!(changed, 1);
	assert_eq!(editor.entry_at(&at(-4.0, 2.0, -1.0)).unwrap(), Some(key("desert")));
	assert_eq!(editor.entry_at(&at(-5.0, 2.0, -1.0)).unwrap(), Some(key("plains")));
	assert_eq!(world.resent_units(), vec![UnitPos::new(-1, -1)]);
}

#[test]
fn single_cell_access() {
	let mut world = world();
	let biomes = biomes();
	let mut editor = BulkMutator::new(&mut world, &biomes);
	let far = at(90.0, 0.0, 90.0);

	assert_eq!(editor.entry_at(&far).unwrap(), None);
	assert_eq!(
		editor.set_entry_at(&far, &key("desert")),
		Err(FillError::UnitNotLoaded(UnitPos::new(5, 5)))
	);
	assert_eq!(
		editor.set_entry_at(&at(0.0, 0.0, 0.0), &key("test:missing")),
		Err(FillError::UnknownKey(key("test:missing")))
	);

	editor.set_entry_at(&at(17.0, 4.0, 2.0), &key("forest")).unwrap();
	assert_eq!(editor.entry_at(&at(19.9, 7.9, 3.9)).unwrap(), Some(key("forest")));
	assert!(unsaved(&world, 1, 0));
	assert!(world.resent_units().is_empty());
}

#[test]
fn block_fill_clears_before_setting_and_flushes_after() {
	init_tracing();
	let mut world = world();
	world.attach_data(BlockPos::new(1, 0, 1));
	let biomes = biomes();
	let glass = BlockState::new(key("glass"));

	let written = BulkMutator::new(&mut world, &biomes)
		.fill_by_value(&at(0.0, 0.0, 0.0), &at(1.0, 1.0, 1.0), &glass, None)
		.unwrap();
	assert_eq!(written, 8);

	let positions: Vec<_> = BlockBox::from_corners(BlockPos::new(0, 0, 0), BlockPos::new(1, 1, 1))
		.positions()
		.collect();
	let mut expected = Vec::new();
	for pos in &positions {
		expected.push(WorldOp::ClearData(*pos));
		expected.push(WorldOp::SetBlock(*pos, FILL_FLAGS));
	}
	expected.extend(positions.iter().map(|pos| WorldOp::BlockUpdated(*pos)));

	assert_eq!(world.journal(), expected.as_slice());
	assert!(!world.has_data(BlockPos::new(1, 0, 1)));
}

#[test]
fn block_filter_matches_kind_only() {
	let mut world = world();
	world.place(BlockPos::new(0, 0, 0), BlockState::new(key("oak_log")).with("axis", "y"));
	world.place(BlockPos::new(1, 0, 0), BlockState::new(key("oak_log")).with("axis", "x"));
	world.place(BlockPos::new(0, 1, 0), BlockState::new(key("stone")));
	let biomes = biomes();
	let glass = BlockState::new(key("glass"));

	let written = BulkMutator::new(&mut world, &biomes)
		.fill_by_value(&at(0.0, 0.0, 0.0), &at(1.0, 1.0, 1.0), &glass, Some(&key("oak_log")))
		.unwrap();

	assert_eq!(written, 2);
	assert_eq!(
		world.journal(),
		&[
			WorldOp::ClearData(BlockPos::new(0, 0, 0)),
			WorldOp::SetBlock(BlockPos::new(0, 0, 0), FILL_FLAGS),
			WorldOp::ClearData(BlockPos::new(1, 0, 0)),
			WorldOp::SetBlock(BlockPos::new(1, 0, 0), FILL_FLAGS),
			WorldOp::BlockUpdated(BlockPos::new(0, 0, 0)),
			WorldOp::BlockUpdated(BlockPos::new(1, 0, 0)),
		]
	);
}

#[test]
fn unchanged_blocks_are_not_flushed() {
	let mut world = world();
	let biomes = biomes();
	let glass = BlockState::new(key("glass"));
	let mut editor = BulkMutator::new(&mut world, &biomes);
	let (from, to) = (at(0.0, 0.0, 0.0), at(3.0, 0.0, 0.0));

	assert_eq!(editor.fill_by_value(&from, &to, &glass, None).unwrap(), 4);
	assert_eq!(editor.fill_by_value(&from, &to, &glass, None).unwrap(), 0);
	let updates = world
		.journal()
		.iter()
		.filter(|op| matches!(op, WorldOp::BlockUpdated(_)))
		.count();
	assert_eq!(updates, 4);
}

proptest! {
	#[test]
	fn loaded_fill_changes_every_cell_in_box(
		a in (0..32i32, 0..16i32, 0..32i32),
		b in (0..32i32, 0..16i32, 0..32i32),
	) {
		let mut world = world();
		let biomes = biomes();
		let from = at(f64::from(a.0), f64::from(a.1), f64::from(a.2));
		let to = at(f64::from(b.0), f64::from(b.1), f64::from(b.2));
		let expected = BlockBox::from_corners(from.block_pos(), to.block_pos())
			.quantized()
			.cells()
			.count();

		let changed = BulkMutator::new(&mut world, &biomes)
			.fill_by_entry(&from, &to, &key("desert"), None)
			.unwrap();
		prop_assert_eq!(changed, expected);
	}
}
