//! Version-adaptive host entry points.
//!
//! # Purpose
//!
//! Host applications rename and reshuffle their internals between releases. This crate keeps
//! every per-version difference in one declarative [`AccessorTable`] and turns it into a set
//! of [`AccessorHandle`]s exactly once, at startup.
//!
//! # Mental Model
//!
//! 1. **Declare:** an [`AccessorTable`] lists each logical accessor with its candidate
//!    symbols, keyed by [`VersionPredicate`].
//! 2. **Resolve:** [`resolve`] reads the host version from a [`SymbolSource`], picks the
//!    candidate with the greatest satisfied lower bound, and locates its symbol.
//! 3. **Publish:** [`install`] (or [`init`]) stores the [`Accessors`] for the lifetime of
//!    the process. There is no re-resolution.
//! 4. **Use:** consumers ask for typed views ([`Accessors::field`], [`Accessors::method`])
//!    and get a scoped [`AccessError`] when an optional accessor is absent.
//!
//! # Concurrency
//!
//! Resolution runs on the host's initialization thread before anything else can observe the
//! result. Reads after [`install`] go through a `OnceLock` and need no locking.

#[cfg(feature = "dylib")]
pub mod dylib;
pub mod global;
pub mod handle;
pub mod resolve;
pub mod table;
pub mod version;

pub use global::{InitError, init, install, installed};
pub use handle::{
	AbsentReason, AccessorHandle, FieldAccessor, MethodAccessor, ResolutionStatus, SymbolAddr,
	TypeDescriptor,
};
pub use resolve::{AccessError, Accessors, ResolveError, StaticSource, SymbolSource, resolve};
pub use table::{AccessorSpec, AccessorTable, Candidate, SymbolKind, TableError};
pub use version::{HostVersion, VersionError, VersionPredicate};
