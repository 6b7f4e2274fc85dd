//! Packed 24-bit RGB colors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors produced while building an [`Rgb`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
	#[error("color {0:#x} does not fit in 24 bits")]
	OutOfRange(u32),

	#[error("invalid color format: {0:?} (expected #rrggbb)")]
	InvalidFormat(String),
}

/// A color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(u32);

impl Rgb {
	pub const MAX: u32 = 0xFF_FF_FF;

	/// Wraps a packed value, rejecting anything with bits above the low 24.
	pub const fn from_packed(packed: u32) -> Result<Self, ColorError> {
		if packed > Self::MAX {
			return Err(ColorError::OutOfRange(packed));
		}
		Ok(Self(packed))
	}

	pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
		Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
	}

	pub const fn packed(self) -> u32 {
		self.0
	}

	pub const fn red(self) -> u8 {
		(self.0 >> 16) as u8
	}

	pub const fn green(self) -> u8 {
		(self.0 >> 8) as u8
	}

	pub const fn blue(self) -> u8 {
		self.0 as u8
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:06x}", self.0)
	}
}

impl FromStr for Rgb {
	type Err = ColorError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let hex = s
			.strip_prefix('#')
			.filter(|h| h.len() == 6)
			.ok_or_else(|| ColorError::InvalidFormat(s.to_string()))?;
		let packed =
			u32::from_str_radix(hex, 16).map_err(|_| ColorError::InvalidFormat(s.to_string()))?;
		Self::from_packed(packed)
	}
}

impl Serialize for Rgb {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_u32(self.0)
	}
}

/// Accepts either a packed integer or `#rrggbb` text.
impl<'de> Deserialize<'de> for Rgb {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Packed(u32),
			Text(String),
		}

		let parsed = match Raw::deserialize(deserializer)? {
			Raw::Packed(packed) => Self::from_packed(packed),
			Raw::Text(text) => text.parse(),
		};
		parsed.map_err(serde::de::Error::custom)
	}
}
