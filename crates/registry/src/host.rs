//! The host registry surface the bridge drives.
//!
//! A host registry is a keyed table that becomes immutable ("frozen") once the host finishes
//! bootstrapping. Its public operations refuse writes while frozen; the only way back in is
//! through two internal fields reached by accessor symbol: the frozen flag and the table of
//! unregistered intrusive holders. Hosts expose those fields through
//! [`HostRegistry::read_internal`] and [`HostRegistry::write_internal`].

use std::fmt;
use std::sync::{Arc, OnceLock};

use mantle_primitives::ResourceKey;
use rustc_hash::FxHashSet;

/// Identity of an intrusive holder within one registry.
pub type HolderId = u64;

/// Forward reference to a registry entry.
///
/// Created for a value before the value has a key; registration binds the key. Clones share
/// the same binding.
pub struct Holder<T> {
	inner: Arc<HolderInner<T>>,
}

struct HolderInner<T> {
	id: HolderId,
	key: OnceLock<ResourceKey>,
	value: Arc<T>,
}

impl<T> Holder<T> {
	pub fn new(id: HolderId, value: Arc<T>) -> Self {
		Self {
			inner: Arc::new(HolderInner {
				id,
				key: OnceLock::new(),
				value,
			}),
		}
	}

	pub fn id(&self) -> HolderId {
		self.inner.id
	}

	/// The bound key, once registered.
	pub fn key(&self) -> Option<&ResourceKey> {
		self.inner.key.get()
	}

	/// Binds `key`. Returns `false` if the holder was already bound to a different key.
	pub fn bind(&self, key: ResourceKey) -> bool {
		let bound = self.inner.key.get_or_init(|| key.clone());
		*bound == key
	}

	pub fn value(&self) -> &Arc<T> {
		&self.inner.value
	}
}

impl<T> Clone for Holder<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T> fmt::Debug for Holder<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Holder")
			.field("id", &self.inner.id)
			.field("key", &self.inner.key.get())
			.finish_non_exhaustive()
	}
}

/// Value of an internal registry field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalValue {
	Flag(bool),
	/// Unregistered intrusive holders. `None` once the registry has been frozen.
	Holders(Option<FxHashSet<HolderId>>),
}

impl InternalValue {
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Flag(_) => "flag",
			Self::Holders(_) => "holder table",
		}
	}
}

/// Errors reported by a host registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
	#[error("registry {registry} is frozen")]
	Frozen { registry: ResourceKey },

	#[error("registry {registry} already contains {key}")]
	DuplicateKey {
		registry: ResourceKey,
		key: ResourceKey,
	},

	#[error("registry {registry} does not accept intrusive holders")]
	HoldersClosed { registry: ResourceKey },

	#[error("registry {registry} has {count} unbound intrusive holders")]
	UnboundHolders { registry: ResourceKey, count: usize },

	#[error("holder {id} is already bound to another key")]
	HolderRebound { id: HolderId },

	#[error("no internal field {symbol:?}")]
	UnknownField { symbol: String },

	#[error("internal field {symbol:?} holds a {expected}, got a {actual}")]
	FieldType {
		symbol: String,
		expected: &'static str,
		actual: &'static str,
	},
}

/// A host-owned keyed registry.
pub trait HostRegistry: Send + Sync {
	type Entry: Send + Sync + 'static;

	/// Key naming this registry, e.g. `minecraft:worldgen/biome`.
	fn registry_key(&self) -> &ResourceKey;

	fn get(&self, key: &ResourceKey) -> Option<Arc<Self::Entry>>;

	/// Every registered key, in no particular order.
	fn keys(&self) -> Vec<ResourceKey>;

	fn len(&self) -> usize;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn is_frozen(&self) -> bool;

	/// Reads the internal field named by `symbol`. `None` if the host has no such field.
	fn read_internal(&self, symbol: &str) -> Option<InternalValue>;

	/// Overwrites the internal field named by `symbol`.
	fn write_internal(&mut self, symbol: &str, value: InternalValue) -> Result<(), HostError>;

	/// Creates a forward reference for `entry`, tracked as unregistered until
	/// [`register`](Self::register) binds it.
	fn create_intrusive_holder(&mut self, entry: Arc<Self::Entry>) -> Result<Holder<Self::Entry>, HostError>;

	/// Binds `holder` to `key`. Fails while frozen.
	fn register(&mut self, key: ResourceKey, holder: Holder<Self::Entry>) -> Result<(), HostError>;

	/// Freezes the registry, validating that every intrusive holder was bound.
	fn freeze(&mut self) -> Result<(), HostError>;
}
