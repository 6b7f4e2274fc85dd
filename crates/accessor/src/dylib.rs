//! [`SymbolSource`] backed by a loaded shared object.
//!
//! Owner and symbol are joined as `{owner}_{symbol}` to form the exported name, which is how
//! hosts built as `cdylib`s expose per-type entry points with unmangled names.

use std::ffi::c_void;
use std::path::Path;

use libloading::Library;

use crate::handle::SymbolAddr;
use crate::resolve::SymbolSource;
use crate::table::SymbolKind;

/// Errors opening a host library.
#[derive(Debug, thiserror::Error)]
#[error("failed to load host library {path}: {source}")]
pub struct LoadError {
	path: String,
	#[source]
	source: libloading::Error,
}

pub struct DylibSource {
	version: String,
	library: Library,
}

impl DylibSource {
	/// Opens the host library at `path`.
	///
	/// # Safety
	///
	/// Loading a library runs its initializers. The caller must trust the library at `path`.
	pub unsafe fn open(path: &Path, version: impl Into<String>) -> Result<Self, LoadError> {
		// SAFETY: upheld by the caller per this function's contract.
		let library = unsafe { Library::new(path) }.map_err(|source| LoadError {
			path: path.display().to_string(),
			source,
		})?;
		Ok(Self {
			version: version.into(),
			library,
		})
	}
}

impl SymbolSource for DylibSource {
	fn host_version(&self) -> &str {
		&self.version
	}

	fn locate(&self, owner: &str, _kind: SymbolKind, symbol: &str) -> Option<SymbolAddr> {
		let exported = format!("{owner}_{symbol}");
		// SAFETY: the symbol is only read as an address, never called or dereferenced here.
		let sym = unsafe { self.library.get::<*mut c_void>(exported.as_bytes()) }.ok()?;
		let addr = *sym as usize;
		(addr != 0).then_some(SymbolAddr(addr))
	}
}
