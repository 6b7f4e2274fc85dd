//! Declarative accessor tables.
//!
//! A table maps each logical accessor name to the concrete host symbol that implements it
//! under a range of host versions. Tables are written once, either in code or as TOML:
//!
//! ```toml
//! [[accessor]]
//! name = "registry.frozen"
//! owner = "MappedRegistry"
//! kind = "field"
//! required = false
//! candidates = [
//! 	{ since = ">=1.19.4", symbol = "ca" },
//! 	{ since = ">=1.20", symbol = "l" },
//! ]
//! ```

use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::version::VersionPredicate;

/// What kind of host symbol an accessor points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
	#[default]
	Field,
	Method,
}

impl std::fmt::Display for SymbolKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SymbolKind::Field => "field",
			SymbolKind::Method => "method",
		})
	}
}

/// One concrete symbol and the versions it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
	pub since: VersionPredicate,
	pub symbol: String,
}

/// A single logical accessor and its per-version candidates.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessorSpec {
	pub name: String,
	/// Host type declaring the symbol.
	pub owner: String,
	#[serde(default)]
	pub kind: SymbolKind,
	/// Required accessors abort initialization when they cannot be resolved.
	#[serde(default = "required_by_default")]
	pub required: bool,
	pub candidates: Vec<Candidate>,
}

fn required_by_default() -> bool {
	true
}

impl AccessorSpec {
	pub fn field(name: impl Into<String>, owner: impl Into<String>) -> Self {
		Self::new(name, owner, SymbolKind::Field)
	}

	pub fn method(name: impl Into<String>, owner: impl Into<String>) -> Self {
		Self::new(name, owner, SymbolKind::Method)
	}

	fn new(name: impl Into<String>, owner: impl Into<String>, kind: SymbolKind) -> Self {
		Self {
			name: name.into(),
			owner: owner.into(),
			kind,
			required: true,
			candidates: Vec::new(),
		}
	}

	/// Adds a candidate symbol for the versions matched by `since`.
	pub fn candidate(mut self, since: VersionPredicate, symbol: impl Into<String>) -> Self {
		self.candidates.push(Candidate {
			since,
			symbol: symbol.into(),
		});
		self
	}

	/// Marks the accessor optional: failing to resolve it yields an absent handle.
	pub fn optional(mut self) -> Self {
		self.required = false;
		self
	}
}

/// Errors produced while building or loading an [`AccessorTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
	#[error("accessor {0:?} is declared more than once")]
	DuplicateName(String),

	#[error("accessor {0:?} has no candidates")]
	NoCandidates(String),

	#[error("accessor {name:?} has two candidates with lower bound {lower}")]
	AmbiguousCandidates { name: String, lower: String },

	#[error("accessor table parse error: {0}")]
	Parse(String),
}

/// The full strategy table resolved at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessorTable {
	specs: Vec<AccessorSpec>,
}

#[derive(Deserialize)]
struct TableDoc {
	#[serde(default)]
	accessor: Vec<AccessorSpec>,
}

impl AccessorTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a table from its TOML form and validates every entry.
	pub fn from_toml_str(input: &str) -> Result<Self, TableError> {
		let doc: TableDoc = toml::from_str(input).map_err(|e| TableError::Parse(e.to_string()))?;
		let mut table = Self::new();
		for spec in doc.accessor {
			table.push(spec)?;
		}
		Ok(table)
	}

	/// Appends a spec after validating it against the rest of the table.
	pub fn push(&mut self, spec: AccessorSpec) -> Result<(), TableError> {
		if self.specs.iter().any(|s| s.name == spec.name) {
			return Err(TableError::DuplicateName(spec.name));
		}
		if spec.candidates.is_empty() {
			return Err(TableError::NoCandidates(spec.name));
		}

		let duplicate_lower = {
			let mut lowers = FxHashSet::default();
			spec.candidates
				.iter()
				.map(|c| c.since.lower())
				.find(|lower| !lowers.insert(*lower))
				.map(ToString::to_string)
		};
		if let Some(lower) = duplicate_lower {
			return Err(TableError::AmbiguousCandidates {
				name: spec.name,
				lower,
			});
		}

		self.specs.push(spec);
		Ok(())
	}

	/// Builder-style [`AccessorTable::push`].
	pub fn with(mut self, spec: AccessorSpec) -> Result<Self, TableError> {
		self.push(spec)?;
		Ok(self)
	}

	pub fn specs(&self) -> &[AccessorSpec] {
		&self.specs
	}

	pub fn len(&self) -> usize {
		self.specs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}
}

#[cfg(test)]
mod tests;
