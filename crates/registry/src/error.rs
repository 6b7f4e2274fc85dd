use mantle_primitives::ResourceKey;

use crate::host::HostError;

/// Errors from [`RegistryBridge`](crate::RegistryBridge) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// The key is already registered. Nothing was mutated.
	#[error("{key} is already registered in {registry}")]
	Duplicate {
		registry: ResourceKey,
		key: ResourceKey,
	},

	/// An internal field needed to reopen the registry is unavailable on this host.
	#[error("registry {registry}: internal field {accessor:?} unavailable: {reason}")]
	Configuration {
		registry: ResourceKey,
		accessor: &'static str,
		reason: String,
	},

	/// A definition is missing an attribute the host requires.
	#[error("definition {key} is missing {attribute}")]
	Incomplete {
		key: ResourceKey,
		attribute: &'static str,
	},

	/// The host refused a step of registration. The registry was restored.
	#[error(transparent)]
	Host(#[from] HostError),
}
