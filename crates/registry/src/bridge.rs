//! Typed access to a host registry, with registration after freeze.
//!
//! # Purpose
//!
//! Host registries freeze at the end of bootstrap. [`RegistryBridge`] keeps lookups cheap and
//! typed, and adds entries afterwards by briefly reopening the registry through its internal
//! fields.
//!
//! # Mental Model
//!
//! Registration is a guarded critical section:
//!
//! 1. Reject duplicates before touching anything.
//! 2. Capture the frozen flag and the intrusive holder table.
//! 3. Clear the flag and install an empty holder table.
//! 4. Create an intrusive holder for the entry and bind it to the key.
//! 5. Freeze again. The host validates that no holder was left unbound.
//!
//! Any failure after step 2 restores the captured fields, so the registry never stays open.
//! If only the final freeze fails, the new binding stays in the host table, since the host
//! offers no way to withdraw it, but the registry is closed again all the same.
//!
//! # Invariants
//!
//! - Registrations on one bridge are serialized by its write lock.
//!   - Enforced in: [`RegistryBridge::register`]
//!   - Tested by: `bridge::tests::concurrent_registrations_all_land`
//! - A frozen registry is frozen again when `register` returns.
//!   - Enforced in: `insert_unfrozen`
//!   - Tested by: `bridge::tests::host_failure_restores_frozen_state`,
//!     `bridge::tests::failed_refreeze_still_closes_registry`
//! - Duplicate keys leave the registry untouched.
//!   - Enforced in: [`RegistryBridge::register`]
//!   - Tested by: `bridge::tests::duplicate_is_rejected_without_mutation`

use std::sync::Arc;

use arc_swap::ArcSwap;
use mantle_accessor::{AccessorTable, Accessors, TableError};
use mantle_primitives::ResourceKey;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::RegistryError;
use crate::host::{HolderId, HostError, HostRegistry, InternalValue};

/// Accessor naming the registry's frozen flag.
pub const FROZEN: &str = "registry.frozen";
/// Accessor naming the registry's unregistered intrusive holder table.
pub const INTRUSIVE_HOLDERS: &str = "registry.unregistered_intrusive_holders";

const INTERNALS_TABLE: &str = include_str!("internals.toml");

/// Accessor table for the internal fields [`RegistryBridge`] needs.
pub fn internal_accessors() -> Result<AccessorTable, TableError> {
	AccessorTable::from_toml_str(INTERNALS_TABLE)
}

/// How [`RegistryBridge::register`] makes a new entry visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationStrategy {
	/// Reopen the host registry and insert directly.
	#[default]
	InPlace,
	/// Keep runtime entries beside the host registry. Lookups consult them first; the host is
	/// never reopened.
	Overlay,
}

/// Read-only key membership, for validating keys owned by a registry.
pub trait KeyLookup {
	fn contains_key(&self, key: &ResourceKey) -> bool;
}

#[derive(Debug, Clone)]
struct InternalSymbols {
	frozen: String,
	holders: String,
}

type Overlay<T> = FxHashMap<ResourceKey, Arc<T>>;

pub struct RegistryBridge<H: HostRegistry> {
	host: RwLock<H>,
	registry: ResourceKey,
	internals: Result<InternalSymbols, RegistryError>,
	strategy: RegistrationStrategy,
	overlay: ArcSwap<Overlay<H::Entry>>,
}

impl<H: HostRegistry> RegistryBridge<H> {
	/// Wraps `host`, taking internal field symbols from `accessors`.
	///
	/// Missing internal accessors are not an error here; they surface from
	/// [`register`](Self::register) under [`RegistrationStrategy::InPlace`].
	pub fn new(host: H, accessors: &Accessors) -> Self {
		let registry = host.registry_key().clone();
		let internals = internal_symbols(&registry, accessors);
		if let Err(err) = &internals {
			tracing::warn!(registry = %registry, error = %err, "in-place registration unavailable");
		}
		Self {
			host: RwLock::new(host),
			registry,
			internals,
			strategy: RegistrationStrategy::default(),
			overlay: ArcSwap::from_pointee(FxHashMap::default()),
		}
	}

	pub fn with_strategy(mut self, strategy: RegistrationStrategy) -> Self {
		self.strategy = strategy;
		self
	}

	pub fn registry_key(&self) -> &ResourceKey {
		&self.registry
	}

	pub fn strategy(&self) -> RegistrationStrategy {
		self.strategy
	}

	pub fn lookup(&self, key: &ResourceKey) -> Option<Arc<H::Entry>> {
		if let Some(entry) = self.overlay.load().get(key) {
			return Some(Arc::clone(entry));
		}
		self.host.read().get(key)
	}

	pub fn contains(&self, key: &ResourceKey) -> bool {
		self.overlay.load().contains_key(key) || self.host.read().get(key).is_some()
	}

	/// Every key, sorted by rendered text.
	pub fn list_keys(&self) -> Vec<ResourceKey> {
		let mut keys = self.host.read().keys();
		keys.extend(self.overlay.load().keys().cloned());
		keys.sort();
		keys.dedup();
		keys
	}

	pub fn len(&self) -> usize {
		self.host.read().len() + self.overlay.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_frozen(&self) -> bool {
		self.host.read().is_frozen()
	}

	/// Runs `f` against the wrapped host under the read lock.
	pub fn inspect<R>(&self, f: impl FnOnce(&H) -> R) -> R {
		f(&self.host.read())
	}

	/// Adds `entry` under `key`.
	pub fn register(&self, key: ResourceKey, entry: H::Entry) -> Result<(), RegistryError> {
		let mut host = self.host.write();
		if host.get(&key).is_some() || self.overlay.load().contains_key(&key) {
			tracing::warn!(registry = %self.registry, key = %key, "duplicate registration rejected");
			return Err(RegistryError::Duplicate {
				registry: self.registry.clone(),
				key,
			});
		}

		let entry = Arc::new(entry);
		match self.strategy {
			RegistrationStrategy::InPlace => {
				let symbols = self.internals.as_ref().map_err(Clone::clone)?;
				insert_unfrozen(&mut *host, symbols, key.clone(), entry)?;
			}
			RegistrationStrategy::Overlay => {
				// Writers hold the host lock.
				let mut next: Overlay<H::Entry> = (**self.overlay.load()).clone();
				next.insert(key.clone(), entry);
				self.overlay.store(Arc::new(next));
			}
		}

		tracing::info!(
			registry = %self.registry,
			key = %key,
			strategy = ?self.strategy,
			"entry registered"
		);
		Ok(())
	}
}

impl<H: HostRegistry> KeyLookup for RegistryBridge<H> {
	fn contains_key(&self, key: &ResourceKey) -> bool {
		self.contains(key)
	}
}

impl<H: HostRegistry> std::fmt::Debug for RegistryBridge<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RegistryBridge")
			.field("registry", &self.registry)
			.field("strategy", &self.strategy)
			.field("internals", &self.internals.as_ref().map(|_| "resolved"))
			.finish_non_exhaustive()
	}
}

fn internal_symbols(
	registry: &ResourceKey,
	accessors: &Accessors,
) -> Result<InternalSymbols, RegistryError> {
	let symbol = |accessor: &'static str| {
		accessors
			.field(accessor)
			.map(|field| field.symbol().to_string())
			.map_err(|err| RegistryError::Configuration {
				registry: registry.clone(),
				accessor,
				reason: err.to_string(),
			})
	};
	Ok(InternalSymbols {
		frozen: symbol(FROZEN)?,
		holders: symbol(INTRUSIVE_HOLDERS)?,
	})
}

/// Internal field values captured before reopening.
struct Captured {
	frozen: bool,
	holders: Option<FxHashSet<HolderId>>,
}

impl Captured {
	fn read<H: HostRegistry>(host: &H, symbols: &InternalSymbols) -> Result<Self, RegistryError> {
		let registry = host.registry_key();
		let unavailable = |accessor: &'static str, symbol: &str, found: Option<InternalValue>| {
			RegistryError::Configuration {
				registry: registry.clone(),
				accessor,
				reason: match found {
					None => format!("host has no field {symbol:?}"),
					Some(value) => format!("field {symbol:?} holds a {}", value.kind()),
				},
			}
		};

		let frozen = match host.read_internal(&symbols.frozen) {
			Some(InternalValue::Flag(frozen)) => frozen,
			other => return Err(unavailable(FROZEN, &symbols.frozen, other)),
		};
		let holders = match host.read_internal(&symbols.holders) {
			Some(InternalValue::Holders(holders)) => holders,
			other => return Err(unavailable(INTRUSIVE_HOLDERS, &symbols.holders, other)),
		};
		Ok(Self { frozen, holders })
	}

	fn restore<H: HostRegistry>(self, host: &mut H, symbols: &InternalSymbols) -> Result<(), HostError> {
		host.write_internal(&symbols.holders, InternalValue::Holders(self.holders))?;
		host.write_internal(&symbols.frozen, InternalValue::Flag(self.frozen))
	}
}

fn insert_unfrozen<H: HostRegistry>(
	host: &mut H,
	symbols: &InternalSymbols,
	key: ResourceKey,
	entry: Arc<H::Entry>,
) -> Result<(), RegistryError> {
	let captured = Captured::read(host, symbols)?;
	let was_frozen = captured.frozen;

	let outcome = host
		.write_internal(&symbols.frozen, InternalValue::Flag(false))
		.and_then(|()| {
			host.write_internal(&symbols.holders, InternalValue::Holders(Some(FxHashSet::default())))
		})
		.and_then(|()| host.create_intrusive_holder(entry))
		.and_then(|holder| host.register(key.clone(), holder));

	match outcome {
		Ok(()) if was_frozen => host.freeze().map_err(|err| {
			// The binding is already in the host table and cannot be withdrawn.
			tracing::error!(
				registry = %host.registry_key(),
				key = %key,
				error = %err,
				"refreeze failed, restoring captured registry state"
			);
			rollback(host, captured, symbols);
			RegistryError::from(err)
		}),
		Ok(()) => captured.restore(host, symbols).map_err(RegistryError::from),
		Err(err) => {
			tracing::warn!(
				registry = %host.registry_key(),
				key = %key,
				error = %err,
				"registration failed, restoring registry state"
			);
			rollback(host, captured, symbols);
			Err(err.into())
		}
	}
}

fn rollback<H: HostRegistry>(host: &mut H, captured: Captured, symbols: &InternalSymbols) {
	if let Err(err) = captured.restore(host, symbols) {
		tracing::error!(
			registry = %host.registry_key(),
			error = %err,
			"registry state could not be restored"
		);
	}
}
