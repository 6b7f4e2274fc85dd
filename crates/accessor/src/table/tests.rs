use pretty_assertions::assert_eq;

use super::{AccessorSpec, AccessorTable, SymbolKind, TableError};
use crate::version::VersionPredicate;

const TABLE: &str = r#"
[[accessor]]
name = "registry.frozen"
owner = "MappedRegistry"
required = false
candidates = [
	{ since = ">=1.19.4", symbol = "ca" },
	{ since = ">=1.20", symbol = "l" },
]

[[accessor]]
name = "chunk.is_ticking"
owner = "LevelChunk"
kind = "method"
candidates = [{ since = "1.19.4", symbol = "k" }]
"#;

fn pred(s: &str) -> VersionPredicate {
	VersionPredicate::parse(s).unwrap()
}

#[test]
fn loads_toml_table() {
	let table = AccessorTable::from_toml_str(TABLE).unwrap();
	assert_eq!(table.len(), 2);

	let frozen = &table.specs()[0];
	assert_eq!(frozen.kind, SymbolKind::Field);
	assert!(!frozen.required);
	assert_eq!(frozen.candidates.len(), 2);
	assert_eq!(frozen.candidates[1].symbol, "l");

	let ticking = &table.specs()[1];
	assert_eq!(ticking.kind, SymbolKind::Method);
	assert!(ticking.required);
}

#[test]
fn toml_and_builder_agree() {
	let built = AccessorTable::new()
		.with(
			AccessorSpec::field("registry.frozen", "MappedRegistry")
				.candidate(pred(">=1.19.4"), "ca")
				.candidate(pred(">=1.20"), "l")
				.optional(),
		)
		.and_then(|t| {
			t.with(AccessorSpec::method("chunk.is_ticking", "LevelChunk").candidate(pred("1.19.4"), "k"))
		})
		.unwrap();

	assert_eq!(built, AccessorTable::from_toml_str(TABLE).unwrap());
}

#[test]
fn rejects_duplicate_names() {
	let spec = AccessorSpec::field("a", "Owner").candidate(pred("1.0"), "x");
	let err = AccessorTable::new()
		.with(spec.clone())
		.and_then(|t| t.with(spec))
		.unwrap_err();
	assert_eq!(err, TableError::DuplicateName("a".to_string()));
}

#[test]
fn rejects_empty_and_ambiguous_candidates() {
	let mut table = AccessorTable::new();
	assert_eq!(
		table.push(AccessorSpec::field("a", "Owner")),
		Err(TableError::NoCandidates("a".to_string()))
	);

	let ambiguous = AccessorSpec::field("b", "Owner")
		.candidate(pred(">=1.20, <1.21"), "x")
		.candidate(pred("1.20.0"), "y");
	assert!(matches!(
		table.push(ambiguous),
		Err(TableError::AmbiguousCandidates { .. })
	));
	assert!(table.is_empty());
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = AccessorTable::from_toml_str(
		r#"
[[accessor]]
name = "x"
owner = "Owner"
candidates = [{ since = "not a version", symbol = "s" }]
"#,
	)
	.unwrap_err();
	assert!(matches!(err, TableError::Parse(_)));
}
