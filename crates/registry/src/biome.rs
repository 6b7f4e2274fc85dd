//! Biome definitions registered at runtime.
//!
//! A [`BiomeDefinition`] collects climate and color attributes, then [`commit`] assembles a
//! [`Biome`] and hands it to a [`RegistryBridge`]. Drafts can be built fluently or read from
//! TOML:
//!
//! ```toml
//! temperature = 0.8
//! downfall = 0.4
//! has_precipitation = true
//! sky_color = "#78a7ff"
//! grass_color_modifier = "dark_forest"
//! ```
//!
//! [`commit`]: BiomeDefinition::commit

use std::fmt;
use std::str::FromStr;

use mantle_primitives::{KeyError, ResourceKey, Rgb};
use serde::Deserialize;

use crate::bridge::RegistryBridge;
use crate::error::RegistryError;
use crate::host::HostRegistry;

pub const DEFAULT_FOG_COLOR: Rgb = Rgb::from_rgb(0xc0, 0xd8, 0xff);
pub const DEFAULT_SKY_COLOR: Rgb = Rgb::from_rgb(0x78, 0xa7, 0xff);
pub const DEFAULT_WATER_COLOR: Rgb = Rgb::from_rgb(0x3f, 0x76, 0xe4);
pub const DEFAULT_WATER_FOG_COLOR: Rgb = Rgb::from_rgb(0x05, 0x05, 0x33);

/// Key of the host's biome registry.
pub fn biome_registry_key() -> Result<ResourceKey, KeyError> {
	ResourceKey::parse("minecraft:worldgen/biome")
}

/// How grass color is tinted on top of the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrassColorModifier {
	#[default]
	None,
	#[serde(alias = "dark-forest")]
	DarkForest,
	Swamp,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grass color modifier {0:?}")]
pub struct ParseModifierError(String);

impl FromStr for GrassColorModifier {
	type Err = ParseModifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" => Ok(Self::None),
			"dark_forest" | "dark-forest" => Ok(Self::DarkForest),
			"swamp" => Ok(Self::Swamp),
			_ => Err(ParseModifierError(s.to_string())),
		}
	}
}

impl fmt::Display for GrassColorModifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::None => "none",
			Self::DarkForest => "dark_forest",
			Self::Swamp => "swamp",
		})
	}
}

/// Client-side colors of a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialEffects {
	pub fog_color: Rgb,
	pub sky_color: Rgb,
	pub water_color: Rgb,
	pub water_fog_color: Rgb,
	pub foliage_color_override: Option<Rgb>,
	pub grass_color_override: Option<Rgb>,
	pub grass_color_modifier: GrassColorModifier,
}

impl Default for SpecialEffects {
	fn default() -> Self {
		Self {
			fog_color: DEFAULT_FOG_COLOR,
			sky_color: DEFAULT_SKY_COLOR,
			water_color: DEFAULT_WATER_COLOR,
			water_fog_color: DEFAULT_WATER_FOG_COLOR,
			foliage_color_override: None,
			grass_color_override: None,
			grass_color_modifier: GrassColorModifier::None,
		}
	}
}

/// World generation features placed in a biome. Runtime biomes start with none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSettings {
	pub features: Vec<ResourceKey>,
	pub carvers: Vec<ResourceKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MobSpawnSettings {
	pub creature_probability: f32,
	pub spawners: Vec<ResourceKey>,
}

impl Default for MobSpawnSettings {
	fn default() -> Self {
		Self {
			creature_probability: 0.1,
			spawners: Vec::new(),
		}
	}
}

/// A complete biome as stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
	pub has_precipitation: bool,
	pub temperature: f32,
	pub downfall: f32,
	pub effects: SpecialEffects,
	pub generation: GenerationSettings,
	pub spawns: MobSpawnSettings,
}

/// An in-progress biome.
///
/// Any color or effect attribute starts an effects block; base colors left unset in it fall
/// back to the default for their slot.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BiomeDefinition {
	has_precipitation: Option<bool>,
	temperature: Option<f32>,
	downfall: Option<f32>,
	fog_color: Option<Rgb>,
	sky_color: Option<Rgb>,
	water_color: Option<Rgb>,
	water_fog_color: Option<Rgb>,
	foliage_color_override: Option<Rgb>,
	grass_color_override: Option<Rgb>,
	grass_color_modifier: Option<GrassColorModifier>,
}

impl BiomeDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn has_precipitation(mut self, has_precipitation: bool) -> Self {
		self.has_precipitation = Some(has_precipitation);
		self
	}

	pub fn temperature(mut self, temperature: f32) -> Self {
		self.temperature = Some(temperature);
		self
	}

	pub fn downfall(mut self, downfall: f32) -> Self {
		self.downfall = Some(downfall);
		self
	}

	pub fn fog_color(mut self, color: Rgb) -> Self {
		self.fog_color = Some(color);
		self
	}

	pub fn sky_color(mut self, color: Rgb) -> Self {
		self.sky_color = Some(color);
		self
	}

	pub fn water_color(mut self, color: Rgb) -> Self {
		self.water_color = Some(color);
		self
	}

	pub fn water_fog_color(mut self, color: Rgb) -> Self {
		self.water_fog_color = Some(color);
		self
	}

	pub fn foliage_color_override(mut self, color: Rgb) -> Self {
		self.foliage_color_override = Some(color);
		self
	}

	pub fn grass_color_override(mut self, color: Rgb) -> Self {
		self.grass_color_override = Some(color);
		self
	}

	pub fn grass_color_modifier(mut self, modifier: GrassColorModifier) -> Self {
		self.grass_color_modifier = Some(modifier);
		self
	}

	/// Whether any color or effect attribute was supplied.
	pub fn has_effects(&self) -> bool {
		self.fog_color.is_some()
			|| self.sky_color.is_some()
			|| self.water_color.is_some()
			|| self.water_fog_color.is_some()
			|| self.foliage_color_override.is_some()
			|| self.grass_color_override.is_some()
			|| self.grass_color_modifier.is_some()
	}

	fn effects(&self) -> SpecialEffects {
		let base = SpecialEffects::default();
		SpecialEffects {
			fog_color: self.fog_color.unwrap_or(base.fog_color),
			sky_color: self.sky_color.unwrap_or(base.sky_color),
			water_color: self.water_color.unwrap_or(base.water_color),
			water_fog_color: self.water_fog_color.unwrap_or(base.water_fog_color),
			foliage_color_override: self.foliage_color_override,
			grass_color_override: self.grass_color_override,
			grass_color_modifier: self.grass_color_modifier.unwrap_or_default(),
		}
	}

	/// Assembles the biome `key` would be registered with.
	pub fn build(&self, key: &ResourceKey) -> Result<Biome, RegistryError> {
		let missing = |attribute| RegistryError::Incomplete {
			key: key.clone(),
			attribute,
		};
		Ok(Biome {
			has_precipitation: self.has_precipitation.ok_or_else(|| missing("has_precipitation"))?,
			temperature: self.temperature.ok_or_else(|| missing("temperature"))?,
			downfall: self.downfall.ok_or_else(|| missing("downfall"))?,
			effects: self.effects(),
			generation: GenerationSettings::default(),
			spawns: MobSpawnSettings::default(),
		})
	}

	/// Builds the biome and registers it under `key`.
	///
	/// Registration errors are returned as the bridge reported them.
	pub fn commit<H>(self, key: ResourceKey, bridge: &RegistryBridge<H>) -> Result<Biome, RegistryError>
	where
		H: HostRegistry<Entry = Biome>,
	{
		let biome = self.build(&key)?;
		tracing::debug!(
			key = %key,
			temperature = biome.temperature,
			downfall = biome.downfall,
			default_effects = !self.has_effects(),
			"committing biome"
		);
		bridge.register(key, biome.clone())?;
		Ok(biome)
	}
}
