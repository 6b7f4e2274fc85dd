use std::fmt;

use mantle_primitives::ResourceKey;

/// A block value: its kind plus property assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockState {
	kind: ResourceKey,
	properties: Vec<(String, String)>,
}

impl BlockState {
	pub fn new(kind: ResourceKey) -> Self {
		Self {
			kind,
			properties: Vec::new(),
		}
	}

	/// Sets `name` to `value`, keeping properties sorted by name.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		let name = name.into();
		let value = value.into();
		match self.properties.binary_search_by(|(n, _)| n.as_str().cmp(&name)) {
			Ok(i) => self.properties[i].1 = value,
			Err(i) => self.properties.insert(i, (name, value)),
		}
		self
	}

	pub fn kind(&self) -> &ResourceKey {
		&self.kind
	}

	pub fn property(&self, name: &str) -> Option<&str> {
		self.properties
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	/// Whether this is a `kind` block, whatever its properties.
	pub fn is(&self, kind: &ResourceKey) -> bool {
		self.kind == *kind
	}
}

impl fmt::Display for BlockState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.kind)?;
		if self.properties.is_empty() {
			return Ok(());
		}
		f.write_str("[")?;
		for (i, (name, value)) in self.properties.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, "{name}={value}")?;
		}
		f.write_str("]")
	}
}
