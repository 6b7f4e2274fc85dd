//! In-process [`HostRegistry`].
//!
//! Mirrors host behavior closely enough to exercise the unfreeze protocol: writes fail while
//! frozen, intrusive holders are only accepted while the holder table exists, and freezing
//! rejects holders that were never bound. Internal fields answer to configurable symbols so
//! a table resolved for a given host version can be pointed at it.

use std::sync::Arc;

use mantle_primitives::ResourceKey;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::host::{HolderId, Holder, HostError, HostRegistry, InternalValue};

/// Default symbol of the frozen flag.
pub const FROZEN_FIELD: &str = "frozen";
/// Default symbol of the unregistered intrusive holder table.
pub const HOLDERS_FIELD: &str = "unregisteredIntrusiveHolders";

/// A call observed by a [`MemoryRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOp {
	WriteInternal(String),
	CreateHolder(HolderId),
	Register(ResourceKey),
	Freeze,
}

pub struct MemoryRegistry<T> {
	key: ResourceKey,
	entries: FxHashMap<ResourceKey, Holder<T>>,
	frozen: bool,
	intrusive: Option<FxHashSet<HolderId>>,
	next_holder: HolderId,
	frozen_symbol: String,
	holders_symbol: String,
	journal: Vec<HostOp>,
}

impl<T: Send + Sync + 'static> MemoryRegistry<T> {
	/// An open, empty registry.
	pub fn new(key: ResourceKey) -> Self {
		Self {
			key,
			entries: FxHashMap::default(),
			frozen: false,
			intrusive: Some(FxHashSet::default()),
			next_holder: 0,
			frozen_symbol: FROZEN_FIELD.to_string(),
			holders_symbol: HOLDERS_FIELD.to_string(),
			journal: Vec::new(),
		}
	}

	/// Renames the internal fields, as a differently obfuscated host build would.
	pub fn with_field_symbols(mut self, frozen: &str, holders: &str) -> Self {
		self.frozen_symbol = frozen.to_string();
		self.holders_symbol = holders.to_string();
		self
	}

	/// Registers `value` under `key` through the normal bootstrap path.
	pub fn seed(&mut self, key: ResourceKey, value: T) -> Result<(), HostError> {
		let holder = self.create_intrusive_holder(Arc::new(value))?;
		self.register(key, holder)
	}

	/// Seeds every pair, then freezes.
	pub fn bootstrap(
		mut self,
		entries: impl IntoIterator<Item = (ResourceKey, T)>,
	) -> Result<Self, HostError> {
		for (key, value) in entries {
			self.seed(key, value)?;
		}
		self.freeze()?;
		self.journal.clear();
		Ok(self)
	}

	/// Calls observed since bootstrap.
	pub fn journal(&self) -> &[HostOp] {
		&self.journal
	}

	pub fn clear_journal(&mut self) {
		self.journal.clear();
	}

	/// Holders created but not yet bound.
	pub fn pending_holders(&self) -> Option<usize> {
		self.intrusive.as_ref().map(FxHashSet::len)
	}
}

impl<T: Send + Sync + 'static> HostRegistry for MemoryRegistry<T> {
	type Entry = T;

	fn registry_key(&self) -> &ResourceKey {
		&self.key
	}

	fn get(&self, key: &ResourceKey) -> Option<Arc<T>> {
		self.entries.get(key).map(|h| Arc::clone(h.value()))
	}

	fn keys(&self) -> Vec<ResourceKey> {
		self.entries.keys().cloned().collect()
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn is_frozen(&self) -> bool {
		self.frozen
	}

	fn read_internal(&self, symbol: &str) -> Option<InternalValue> {
		if symbol == self.frozen_symbol {
			Some(InternalValue::Flag(self.frozen))
		} else if symbol == self.holders_symbol {
			Some(InternalValue::Holders(self.intrusive.clone()))
		} else {
			None
		}
	}

	fn write_internal(&mut self, symbol: &str, value: InternalValue) -> Result<(), HostError> {
		self.journal.push(HostOp::WriteInternal(symbol.to_string()));
		let field_type = |expected: &'static str, value: &InternalValue| HostError::FieldType {
			symbol: symbol.to_string(),
			expected,
			actual: value.kind(),
		};

		if symbol == self.frozen_symbol {
			let InternalValue::Flag(frozen) = value else {
				return Err(field_type("flag", &value));
			};
			self.frozen = frozen;
			Ok(())
		} else if symbol == self.holders_symbol {
			let InternalValue::Holders(holders) = value else {
				return Err(field_type("holder table", &value));
			};
			self.intrusive = holders;
			Ok(())
		} else {
			Err(HostError::UnknownField {
				symbol: symbol.to_string(),
			})
		}
	}

	fn create_intrusive_holder(&mut self, entry: Arc<T>) -> Result<Holder<T>, HostError> {
		let Some(pending) = self.intrusive.as_mut() else {
			return Err(HostError::HoldersClosed {
				registry: self.key.clone(),
			});
		};
		let id = self.next_holder;
		self.next_holder += 1;
		pending.insert(id);
		self.journal.push(HostOp::CreateHolder(id));
		Ok(Holder::new(id, entry))
	}

	fn register(&mut self, key: ResourceKey, holder: Holder<T>) -> Result<(), HostError> {
		self.journal.push(HostOp::Register(key.clone()));
		if self.frozen {
			return Err(HostError::Frozen {
				registry: self.key.clone(),
			});
		}
		if self.entries.contains_key(&key) {
			return Err(HostError::DuplicateKey {
				registry: self.key.clone(),
				key,
			});
		}
		if !holder.bind(key.clone()) {
			return Err(HostError::HolderRebound { id: holder.id() });
		}
		if let Some(pending) = self.intrusive.as_mut() {
			pending.remove(&holder.id());
		}
		self.entries.insert(key, holder);
		Ok(())
	}

	fn freeze(&mut self) -> Result<(), HostError> {
		self.journal.push(HostOp::Freeze);
		if let Some(pending) = &self.intrusive
			&& !pending.is_empty()
		{
			return Err(HostError::UnboundHolders {
				registry: self.key.clone(),
				count: pending.len(),
			});
		}
		self.frozen = true;
		self.intrusive = None;
		Ok(())
	}
}
