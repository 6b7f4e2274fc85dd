//! Host versions and the predicates accessor candidates are keyed by.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// Errors produced while parsing versions or predicates.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
	#[error("invalid host version {0:?} (expected major.minor[.patch])")]
	InvalidVersion(String),

	#[error("invalid version predicate {input:?}: {reason}")]
	InvalidPredicate { input: String, reason: &'static str },
}

/// A detected host release, compared as major.minor.patch.
///
/// Parsing accepts `1.20` (patch defaults to 0) and ignores any `-suffix`, so host version
/// strings such as `1.20.2-R0.1-SNAPSHOT` compare by their numeric triple only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostVersion(semver::Version);

impl HostVersion {
	pub fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self(semver::Version::new(major, minor, patch))
	}

	pub fn parse(input: &str) -> Result<Self, VersionError> {
		let invalid = || VersionError::InvalidVersion(input.to_string());
		let numeric = input.trim().split('-').next().unwrap_or_default();
		let mut parts = numeric.split('.');

		let mut next = |required: bool| -> Result<u64, VersionError> {
			match parts.next() {
				Some(part) => part.parse::<u64>().map_err(|_| invalid()),
				None if required => Err(invalid()),
				None => Ok(0),
			}
		};

		let major = next(true)?;
		let minor = next(true)?;
		let patch = next(false)?;
		if parts.next().is_some() {
			return Err(invalid());
		}
		Ok(Self::new(major, minor, patch))
	}

	pub fn major(&self) -> u64 {
		self.0.major
	}

	pub fn minor(&self) -> u64 {
		self.0.minor
	}

	pub fn patch(&self) -> u64 {
		self.0.patch
	}

	/// True when this version is at or above `major.minor.patch`.
	pub fn is_at_least(&self, major: u64, minor: u64, patch: u64) -> bool {
		*self >= Self::new(major, minor, patch)
	}
}

impl Ord for HostVersion {
	fn cmp(&self, other: &Self) -> Ordering {
		self.0.cmp_precedence(&other.0)
	}
}

impl PartialOrd for HostVersion {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl fmt::Display for HostVersion {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for HostVersion {
	type Err = VersionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Half-open version range `[lower, upper)`.
///
/// Written as comma-separated clauses: `>=1.19.4`, `>=1.19.4, <1.20`, or a bare `1.20`
/// (shorthand for `>=1.20`). Exactly one lower bound is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionPredicate {
	lower: HostVersion,
	upper: Option<HostVersion>,
}

impl VersionPredicate {
	pub fn at_least(lower: HostVersion) -> Self {
		Self { lower, upper: None }
	}

	pub fn between(lower: HostVersion, upper: HostVersion) -> Self {
		Self {
			lower,
			upper: Some(upper),
		}
	}

	pub fn parse(input: &str) -> Result<Self, VersionError> {
		let fail = |reason| VersionError::InvalidPredicate {
			input: input.to_string(),
			reason,
		};

		let mut lower = None;
		let mut upper = None;
		for clause in input.split(',').map(str::trim) {
			let (slot, raw) = if let Some(rest) = clause.strip_prefix(">=") {
				(&mut lower, rest)
			} else if let Some(rest) = clause.strip_prefix('<') {
				(&mut upper, rest)
			} else {
				(&mut lower, clause)
			};
			if slot.is_some() {
				return Err(fail("bound given twice"));
			}
			*slot = Some(HostVersion::parse(raw.trim()).map_err(|_| fail("unparseable version"))?);
		}

		let lower = lower.ok_or_else(|| fail("missing lower bound"))?;
		if upper.as_ref().is_some_and(|u| *u <= lower) {
			return Err(fail("empty range"));
		}
		Ok(Self { lower, upper })
	}

	pub fn lower(&self) -> &HostVersion {
		&self.lower
	}

	pub fn upper(&self) -> Option<&HostVersion> {
		self.upper.as_ref()
	}

	pub fn matches(&self, version: &HostVersion) -> bool {
		*version >= self.lower && self.upper.as_ref().is_none_or(|u| version < u)
	}
}

impl fmt::Display for VersionPredicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, ">={}", self.lower)?;
		if let Some(upper) = &self.upper {
			write!(f, ", <{upper}")?;
		}
		Ok(())
	}
}

impl FromStr for VersionPredicate {
	type Err = VersionError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl<'de> Deserialize<'de> for VersionPredicate {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests;
