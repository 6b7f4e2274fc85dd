//! Process-wide accessor set.
//!
//! Resolution happens once on the host's initialization thread. The result is published
//! here and read from anywhere afterwards; it is never replaced.

use std::sync::OnceLock;

use crate::resolve::{Accessors, ResolveError, SymbolSource, resolve};
use crate::table::AccessorTable;

static ACCESSORS: OnceLock<Accessors> = OnceLock::new();

/// Errors from [`install`] and [`init`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
	#[error(transparent)]
	Resolve(#[from] ResolveError),

	#[error("accessors were already installed for host version {0}")]
	AlreadyInstalled(String),
}

/// Publishes a resolved accessor set for the rest of the process.
pub fn install(accessors: Accessors) -> Result<&'static Accessors, InitError> {
	let mut fresh = false;
	let current = ACCESSORS.get_or_init(|| {
		fresh = true;
		accessors
	});
	if !fresh {
		return Err(InitError::AlreadyInstalled(current.host_version().to_string()));
	}
	Ok(current)
}

/// Resolves `table` against `source` and installs the result.
pub fn init(table: &AccessorTable, source: &dyn SymbolSource) -> Result<&'static Accessors, InitError> {
	if let Some(existing) = installed() {
		return Err(InitError::AlreadyInstalled(existing.host_version().to_string()));
	}
	install(resolve(table, source)?)
}

/// The installed accessor set, if initialization has run.
pub fn installed() -> Option<&'static Accessors> {
	ACCESSORS.get()
}
