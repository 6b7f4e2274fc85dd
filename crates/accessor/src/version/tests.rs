use super::{HostVersion, VersionError, VersionPredicate};

#[test]
fn missing_patch_defaults_to_zero() {
	assert_eq!(HostVersion::parse("1.20").unwrap(), HostVersion::new(1, 20, 0));
	assert_eq!(HostVersion::parse("1.20.2").unwrap(), HostVersion::new(1, 20, 2));
}

#[test]
fn build_suffix_is_ignored() {
	let v = HostVersion::parse("1.20.2-R0.1-SNAPSHOT").unwrap();
	assert_eq!(v, HostVersion::new(1, 20, 2));
	assert_eq!(v.to_string(), "1.20.2");
}

#[test]
fn rejects_malformed_versions() {
	for bad in ["", "1", "1.x", "1.2.3.4", "one.two"] {
		assert!(
			matches!(HostVersion::parse(bad), Err(VersionError::InvalidVersion(_))),
			"{bad:?} should not parse"
		);
	}
}

#[test]
fn compares_numerically() {
	assert!(HostVersion::new(1, 20, 0) > HostVersion::new(1, 19, 4));
	assert!(HostVersion::new(1, 9, 0) < HostVersion::new(1, 10, 0));
	assert!(HostVersion::new(1, 20, 2).is_at_least(1, 19, 4));
	assert!(!HostVersion::new(1, 19, 3).is_at_least(1, 19, 4));
}

#[test]
fn bare_predicate_is_lower_bound() {
	let p = VersionPredicate::parse("1.20").unwrap();
	assert_eq!(p.lower(), &HostVersion::new(1, 20, 0));
	assert_eq!(p.upper(), None);
	assert!(p.matches(&HostVersion::new(1, 20, 2)));
	assert!(!p.matches(&HostVersion::new(1, 19, 4)));
}

#[test]
fn upper_bound_is_exclusive() {
	let p = VersionPredicate::parse(">=1.19.4, <1.20").unwrap();
	assert!(p.matches(&HostVersion::new(1, 19, 4)));
	assert!(p.matches(&HostVersion::new(1, 19, 99)));
	assert!(!p.matches(&HostVersion::new(1, 20, 0)));
	assert_eq!(p.to_string(), ">=1.19.4, <1.20.0");
}

#[test]
fn rejects_bad_predicates() {
	for bad in ["<1.20", ">=1.20, >=1.21", ">=1.20, <1.19", ">=abc"] {
		assert!(
			matches!(VersionPredicate::parse(bad), Err(VersionError::InvalidPredicate { .. })),
			"{bad:?} should not parse"
		);
	}
}
