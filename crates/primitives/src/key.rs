//! Namespaced registry keys.
//!
//! A [`ResourceKey`] is the `namespace:path` identifier under which host registries store
//! their entries. Keys order and compare by their textual form, which is what registry
//! listings sort by.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace assumed when a key is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Errors produced while parsing a [`ResourceKey`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
	#[error("empty namespace in key {0:?}")]
	EmptyNamespace(String),

	#[error("empty path in key {0:?}")]
	EmptyPath(String),

	#[error("invalid character {ch:?} in namespace of key {key:?}")]
	InvalidNamespaceChar { key: String, ch: char },

	#[error("invalid character {ch:?} in path of key {key:?}")]
	InvalidPathChar { key: String, ch: char },
}

/// A `namespace:path` identifier.
///
/// Ordering follows the rendered `namespace:path` text, not the (namespace, path) tuple:
/// `.`, `-` and digits sort below `:`, so the two orders disagree for keys such as
/// `a.b:x` and `a:x`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
	namespace: String,
	path: String,
}

impl ResourceKey {
	/// Builds a key from already separated parts, validating both.
	pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, KeyError> {
		let namespace = namespace.into();
		let path = path.into();
		let display = format!("{namespace}:{path}");

		if namespace.is_empty() {
			return Err(KeyError::EmptyNamespace(display));
		}
		if path.is_empty() {
			return Err(KeyError::EmptyPath(display));
		}
		if let Some(ch) = namespace.chars().find(|&c| !is_namespace_char(c)) {
			return Err(KeyError::InvalidNamespaceChar { key: display, ch });
		}
		if let Some(ch) = path.chars().find(|&c| !is_path_char(c)) {
			return Err(KeyError::InvalidPathChar { key: display, ch });
		}

		Ok(Self { namespace, path })
	}

	/// Parses `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
	pub fn parse(s: &str) -> Result<Self, KeyError> {
		match s.split_once(':') {
			Some((namespace, path)) => Self::new(namespace, path),
			None => Self::new(DEFAULT_NAMESPACE, s),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	fn text_bytes(&self) -> impl Iterator<Item = u8> + '_ {
		self.namespace
			.bytes()
			.chain(std::iter::once(b':'))
			.chain(self.path.bytes())
	}
}

impl Ord for ResourceKey {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.text_bytes().cmp(other.text_bytes())
	}
}

impl PartialOrd for ResourceKey {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

fn is_namespace_char(c: char) -> bool {
	matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
	is_namespace_char(c) || c == '/'
}

impl fmt::Display for ResourceKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.namespace, self.path)
	}
}

impl FromStr for ResourceKey {
	type Err = KeyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for ResourceKey {
	type Error = KeyError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		Self::parse(s)
	}
}

impl Serialize for ResourceKey {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for ResourceKey {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests;
