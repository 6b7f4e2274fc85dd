//! Typed access to frozen host registries, plus runtime registration.
//!
//! # Purpose
//!
//! - Wrap a host-owned registry in a [`RegistryBridge`] offering typed lookup and listing.
//! - Add entries after the host has frozen its registries, restoring the frozen state before
//!   returning.
//! - Build registrable entries, currently biomes via [`BiomeDefinition`].
//!
//! # Key Types
//!
//! | Type | Role |
//! |---|---|
//! | [`HostRegistry`] | Host surface: public table operations plus internal field access |
//! | [`MemoryRegistry`] | In-process host with the same freeze rules |
//! | [`RegistryBridge`] | Lookup, listing, and serialized registration |
//! | [`BiomeDefinition`] | Fluent or TOML biome draft, committed through a bridge |
//!
//! Internal fields are named by accessors resolved in `mantle-accessor`; see
//! [`internal_accessors`].

pub mod biome;
pub mod bridge;
mod error;
pub mod host;
pub mod memory;

pub use biome::{
	Biome, BiomeDefinition, GenerationSettings, GrassColorModifier, MobSpawnSettings,
	ParseModifierError, SpecialEffects, biome_registry_key,
};
pub use bridge::{
	FROZEN, INTRUSIVE_HOLDERS, KeyLookup, RegistrationStrategy, RegistryBridge, internal_accessors,
};
pub use error::RegistryError;
pub use host::{HolderId, Holder, HostError, HostRegistry, InternalValue};
pub use memory::{HostOp, MemoryRegistry};
