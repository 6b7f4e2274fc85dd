//! Resolved accessor handles.

use std::fmt;

use crate::table::SymbolKind;
use crate::version::{HostVersion, VersionPredicate};

/// Opaque location of a host symbol, as reported by a [`crate::SymbolSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddr(pub usize);

/// The host type and symbol kind an accessor targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDescriptor {
	pub owner: String,
	pub kind: SymbolKind,
}

impl fmt::Display for TypeDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} of {}", self.kind, self.owner)
	}
}

/// Why an optional accessor did not resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbsentReason {
	/// No candidate predicate matched the host version.
	NoMatchingPredicate,
	/// The selected candidate's symbol does not exist in the host.
	SymbolNotFound { symbol: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionStatus {
	Resolved { symbol: String, addr: SymbolAddr },
	Absent(AbsentReason),
}

/// A host entry point located at startup.
///
/// Handles are immutable once built and live for the rest of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorHandle {
	pub(crate) name: String,
	pub(crate) target: TypeDescriptor,
	pub(crate) status: ResolutionStatus,
	/// Range of the candidate that was selected, if any matched.
	pub(crate) range: Option<VersionPredicate>,
	pub(crate) resolved_under: HostVersion,
}

impl AccessorHandle {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn target(&self) -> &TypeDescriptor {
		&self.target
	}

	pub fn status(&self) -> &ResolutionStatus {
		&self.status
	}

	pub fn range(&self) -> Option<&VersionPredicate> {
		self.range.as_ref()
	}

	pub fn resolved_under(&self) -> &HostVersion {
		&self.resolved_under
	}

	pub fn is_resolved(&self) -> bool {
		matches!(self.status, ResolutionStatus::Resolved { .. })
	}

	/// Concrete host symbol, when resolved.
	pub fn symbol(&self) -> Option<&str> {
		match &self.status {
			ResolutionStatus::Resolved { symbol, .. } => Some(symbol),
			ResolutionStatus::Absent(_) => None,
		}
	}

	pub fn addr(&self) -> Option<SymbolAddr> {
		match &self.status {
			ResolutionStatus::Resolved { addr, .. } => Some(*addr),
			ResolutionStatus::Absent(_) => None,
		}
	}
}

/// A resolved handle known to target a field.
#[derive(Debug, Clone, Copy)]
pub struct FieldAccessor<'a> {
	handle: &'a AccessorHandle,
	symbol: &'a str,
	addr: SymbolAddr,
}

/// A resolved handle known to target a method.
#[derive(Debug, Clone, Copy)]
pub struct MethodAccessor<'a> {
	handle: &'a AccessorHandle,
	symbol: &'a str,
	addr: SymbolAddr,
}

macro_rules! typed_accessor {
	($ty:ident) => {
		impl<'a> $ty<'a> {
			/// `None` unless `handle` is resolved.
			pub(crate) fn new(handle: &'a AccessorHandle) -> Option<Self> {
				match &handle.status {
					ResolutionStatus::Resolved { symbol, addr } => Some(Self {
						handle,
						symbol,
						addr: *addr,
					}),
					ResolutionStatus::Absent(_) => None,
				}
			}

			pub fn handle(&self) -> &'a AccessorHandle {
				self.handle
			}

			/// Concrete host symbol.
			pub fn symbol(&self) -> &'a str {
				self.symbol
			}

			pub fn addr(&self) -> SymbolAddr {
				self.addr
			}
		}
	};
}

typed_accessor!(FieldAccessor);
typed_accessor!(MethodAccessor);
