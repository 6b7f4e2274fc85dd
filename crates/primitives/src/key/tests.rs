use pretty_assertions::assert_eq;

use super::{KeyError, ResourceKey};

#[test]
fn parses_namespaced_key() {
	let key = ResourceKey::parse("terralith:moonlit_valley").unwrap();
	assert_eq!(key.namespace(), "terralith");
	assert_eq!(key.path(), "moonlit_valley");
	assert_eq!(key.to_string(), "terralith:moonlit_valley");
}

#[test]
fn bare_path_defaults_namespace() {
	let key: ResourceKey = "plains".parse().unwrap();
	assert_eq!(key.to_string(), "minecraft:plains");
}

#[test]
fn path_may_contain_slashes_but_namespace_may_not() {
	assert!(ResourceKey::parse("minecraft:worldgen/biome").is_ok());
	assert_eq!(
		ResourceKey::parse("mine/craft:biome"),
		Err(KeyError::InvalidNamespaceChar {
			key: "mine/craft:biome".to_string(),
			ch: '/',
		})
	);
}

#[test]
fn rejects_empty_and_uppercase_parts() {
	assert!(matches!(ResourceKey::parse(":plains"), Err(KeyError::EmptyNamespace(_))));
	assert!(matches!(ResourceKey::parse("test:"), Err(KeyError::EmptyPath(_))));
	assert!(matches!(
		ResourceKey::parse("test:Plains"),
		Err(KeyError::InvalidPathChar { ch: 'P', .. })
	));
}

#[test]
fn ordering_matches_rendered_text() {
	let mut keys: Vec<ResourceKey> = ["a:x", "a.b:x", "a:w", "a-1:z", "b:a"]
		.into_iter()
		.map(|s| ResourceKey::parse(s).unwrap())
		.collect();
	keys.sort();

	let mut texts: Vec<String> = keys.iter().map(ToString::to_string).collect();
	let rendered = texts.clone();
	texts.sort();
	assert_eq!(rendered, texts);
}

#[test]
fn deserializes_from_string() {
	#[derive(serde::Deserialize)]
	struct Doc {
		key: ResourceKey,
	}

	let doc: Doc = toml::from_str(r#"key = "test:test""#).unwrap();
	assert_eq!(doc.key, ResourceKey::new("test", "test").unwrap());

	let bad = toml::from_str::<Doc>(r#"key = "Test:test""#);
	assert!(bad.is_err());
}
