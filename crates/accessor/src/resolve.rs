//! One-shot resolution of an [`AccessorTable`] against a running host.
//!
//! # Selection Rule
//!
//! For each accessor, every candidate whose predicate matches the detected host version is
//! eligible; the one with the greatest lower bound wins. Tables reject candidates that share
//! a lower bound, so the winner is always unique.
//!
//! # Failure Policy
//!
//! - Required accessor, no matching predicate: [`ResolveError::UnsupportedVersion`].
//! - Required accessor, symbol absent: [`ResolveError::MissingSymbol`].
//! - Optional accessor, either case: an [`AccessorHandle`] with
//!   [`ResolutionStatus::Absent`]; consumers report the problem when they need the handle.
//!
//! Resolution never retries. A missing symbol means the host build is incompatible.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::handle::{
	AbsentReason, AccessorHandle, FieldAccessor, MethodAccessor, ResolutionStatus, SymbolAddr,
	TypeDescriptor,
};
use crate::table::{AccessorSpec, AccessorTable, Candidate, SymbolKind};
use crate::version::{HostVersion, VersionError};

/// The host's symbol lookup surface.
pub trait SymbolSource {
	/// Version string reported by the host, e.g. `1.20.2-R0.1-SNAPSHOT`.
	fn host_version(&self) -> &str;

	/// Looks up `symbol` declared by `owner`.
	fn locate(&self, owner: &str, kind: SymbolKind, symbol: &str) -> Option<SymbolAddr>;
}

/// A [`SymbolSource`] over a fixed symbol list.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
	version: String,
	symbols: FxHashMap<(String, SymbolKind, String), SymbolAddr>,
}

impl StaticSource {
	pub fn new(version: impl Into<String>) -> Self {
		Self {
			version: version.into(),
			symbols: FxHashMap::default(),
		}
	}

	pub fn with_field(self, owner: &str, symbol: &str) -> Self {
		self.with_symbol(owner, SymbolKind::Field, symbol)
	}

	pub fn with_method(self, owner: &str, symbol: &str) -> Self {
		self.with_symbol(owner, SymbolKind::Method, symbol)
	}

	fn with_symbol(mut self, owner: &str, kind: SymbolKind, symbol: &str) -> Self {
		let addr = SymbolAddr(self.symbols.len() + 1);
		self.symbols
			.entry((owner.to_string(), kind, symbol.to_string()))
			.or_insert(addr);
		self
	}
}

impl SymbolSource for StaticSource {
	fn host_version(&self) -> &str {
		&self.version
	}

	fn locate(&self, owner: &str, kind: SymbolKind, symbol: &str) -> Option<SymbolAddr> {
		self.symbols
			.get(&(owner.to_string(), kind, symbol.to_string()))
			.copied()
	}
}

/// Fatal initialization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	#[error("cannot detect host version: {0}")]
	HostVersion(#[from] VersionError),

	#[error("accessor {name:?}: no candidate supports host version {host_version}")]
	UnsupportedVersion { name: String, host_version: HostVersion },

	#[error("accessor {name:?}: symbol {symbol:?} not found in host version {host_version}")]
	MissingSymbol {
		name: String,
		symbol: String,
		host_version: HostVersion,
	},
}

/// Errors looking up a handle after resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
	#[error("no accessor named {0:?}")]
	Unknown(String),

	#[error("accessor {name:?} is not available in host version {host_version}")]
	Absent { name: String, host_version: HostVersion },

	#[error("accessor {name:?} targets a {actual}, not a {expected}")]
	KindMismatch {
		name: String,
		expected: SymbolKind,
		actual: SymbolKind,
	},
}

/// Every handle produced by one resolution pass.
#[derive(Debug, Clone)]
pub struct Accessors {
	host_version: HostVersion,
	handles: FxHashMap<String, AccessorHandle>,
}

impl Accessors {
	pub fn host_version(&self) -> &HostVersion {
		&self.host_version
	}

	pub fn get(&self, name: &str) -> Option<&AccessorHandle> {
		self.handles.get(name)
	}

	/// A resolved field handle.
	pub fn field(&self, name: &str) -> Result<FieldAccessor<'_>, AccessError> {
		let handle = self.typed(name, SymbolKind::Field)?;
		FieldAccessor::new(handle).ok_or_else(|| self.absent(name))
	}

	/// A resolved method handle.
	pub fn method(&self, name: &str) -> Result<MethodAccessor<'_>, AccessError> {
		let handle = self.typed(name, SymbolKind::Method)?;
		MethodAccessor::new(handle).ok_or_else(|| self.absent(name))
	}

	fn typed(&self, name: &str, expected: SymbolKind) -> Result<&AccessorHandle, AccessError> {
		let handle = self
			.handles
			.get(name)
			.ok_or_else(|| AccessError::Unknown(name.to_string()))?;
		if handle.target.kind != expected {
			return Err(AccessError::KindMismatch {
				name: name.to_string(),
				expected,
				actual: handle.target.kind,
			});
		}
		Ok(handle)
	}

	fn absent(&self, name: &str) -> AccessError {
		AccessError::Absent {
			name: name.to_string(),
			host_version: self.host_version.clone(),
		}
	}

	/// Handles sorted by logical name.
	pub fn handles(&self) -> Vec<&AccessorHandle> {
		let mut handles: Vec<_> = self.handles.values().collect();
		handles.sort_by(|a, b| a.name.cmp(&b.name));
		handles
	}

	pub fn len(&self) -> usize {
		self.handles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}
}

/// Resolves every accessor in `table` against `source`.
pub fn resolve(table: &AccessorTable, source: &dyn SymbolSource) -> Result<Accessors, ResolveError> {
	let host_version = HostVersion::parse(source.host_version())?;
	let mut handles = FxHashMap::default();
	let mut absent = FxHashSet::default();

	for spec in table.specs() {
		let handle = resolve_one(spec, &host_version, source)?;
		tracing::debug!(
			accessor = %handle.name,
			target = %handle.target,
			symbol = handle.symbol().unwrap_or("<absent>"),
			"accessor resolved"
		);
		if !handle.is_resolved() {
			absent.insert(handle.name.clone());
		}
		handles.insert(handle.name.clone(), handle);
	}

	tracing::info!(
		host_version = %host_version,
		resolved = handles.len() - absent.len(),
		absent = absent.len(),
		"accessor table resolved"
	);
	if !absent.is_empty() {
		let mut names: Vec<_> = absent.into_iter().collect();
		names.sort();
		tracing::warn!(?names, "optional accessors unavailable in this host version");
	}

	Ok(Accessors {
		host_version,
		handles,
	})
}

fn select<'a>(spec: &'a AccessorSpec, version: &HostVersion) -> Option<&'a Candidate> {
	spec.candidates
		.iter()
		.filter(|c| c.since.matches(version))
		.max_by(|a, b| a.since.lower().cmp(b.since.lower()))
}

fn resolve_one(
	spec: &AccessorSpec,
	version: &HostVersion,
	source: &dyn SymbolSource,
) -> Result<AccessorHandle, ResolveError> {
	let target = TypeDescriptor {
		owner: spec.owner.clone(),
		kind: spec.kind,
	};
	let absent = |range, reason| AccessorHandle {
		name: spec.name.clone(),
		target: target.clone(),
		status: ResolutionStatus::Absent(reason),
		range,
		resolved_under: version.clone(),
	};

	let Some(candidate) = select(spec, version) else {
		if spec.required {
			return Err(ResolveError::UnsupportedVersion {
				name: spec.name.clone(),
				host_version: version.clone(),
			});
		}
		return Ok(absent(None, AbsentReason::NoMatchingPredicate));
	};

	match source.locate(&spec.owner, spec.kind, &candidate.symbol) {
		Some(addr) => Ok(AccessorHandle {
			name: spec.name.clone(),
			target: target.clone(),
			status: ResolutionStatus::Resolved {
				symbol: candidate.symbol.clone(),
				addr,
			},
			range: Some(candidate.since.clone()),
			resolved_under: version.clone(),
		}),
		None if spec.required => Err(ResolveError::MissingSymbol {
			name: spec.name.clone(),
			symbol: candidate.symbol.clone(),
			host_version: version.clone(),
		}),
		None => Ok(absent(
			Some(candidate.since.clone()),
			AbsentReason::SymbolNotFound {
				symbol: candidate.symbol.clone(),
			},
		)),
	}
}
