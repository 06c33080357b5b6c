//! Property-based tests for version parsing and ordering.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::cmp::Ordering;

use proptest::prelude::*;

use verstamp::core::semver::SemVer;
use verstamp::core::types::CommitHash;

/// Strategy for pre-release and build identifiers.
fn identifier() -> impl Strategy<Value = String> {
    "[0-9A-Za-z]{1,8}(\\.[0-9A-Za-z]{1,8}){0,2}"
}

/// Strategy for canonical version strings with 1 to 3 core components.
fn canonical_version() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(0u64..10_000, 1..=3),
        prop::option::of(identifier()),
        prop::option::of(identifier()),
    )
        .prop_map(|(core, pre, build)| {
            let mut s = core
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(".");
            if let Some(pre) = pre {
                s.push('-');
                s.push_str(&pre);
            }
            if let Some(build) = build {
                s.push('+');
                s.push_str(&build);
            }
            s
        })
}

proptest! {
    /// Canonical strings display exactly as written.
    #[test]
    fn display_round_trips(s in canonical_version()) {
        let v = SemVer::parse(&s).unwrap();
        prop_assert_eq!(v.to_string(), s.clone());

        let prefixed = SemVer::parse(&format!("v{s}")).unwrap();
        prop_assert_eq!(prefixed.to_string(), s);
    }

    /// Release versions order like their numeric triples.
    #[test]
    fn release_order_matches_tuples(
        a in (0u64..100, 0u64..100, 0u64..100),
        b in (0u64..100, 0u64..100, 0u64..100),
    ) {
        let va = SemVer::parse(&format!("{}.{}.{}", a.0, a.1, a.2)).unwrap();
        let vb = SemVer::parse(&format!("{}.{}.{}", b.0, b.1, b.2)).unwrap();
        prop_assert_eq!(va.compare(&vb), a.cmp(&b));
    }

    /// Comparison is antisymmetric and agrees with the derived predicates.
    #[test]
    fn compare_is_antisymmetric(a in canonical_version(), b in canonical_version()) {
        let va = SemVer::parse(&a).unwrap();
        let vb = SemVer::parse(&b).unwrap();
        prop_assert_eq!(va.compare(&vb), vb.compare(&va).reverse());
        prop_assert_eq!(va.less_than(&vb), va.compare(&vb) == Ordering::Less);
        prop_assert_eq!(va.greater_or_equal(&vb), !va.less_than(&vb));
    }

    /// A release is newer than any of its pre-releases.
    #[test]
    fn release_beats_prerelease(
        core in (0u64..1000, 0u64..1000, 0u64..1000),
        pre in identifier(),
    ) {
        let release = SemVer::parse(&format!("{}.{}.{}", core.0, core.1, core.2)).unwrap();
        let candidate = SemVer::parse(&format!("{}.{}.{}-{}", core.0, core.1, core.2, pre)).unwrap();
        prop_assert!(candidate.less_than(&release));
    }

    /// Build metadata never affects precedence.
    #[test]
    fn build_metadata_is_ignored(s in canonical_version(), extra in identifier()) {
        let base = SemVer::parse(&s).unwrap();
        let stripped = s.split('+').next().unwrap().to_string();
        let rebuilt = SemVer::parse(&format!("{stripped}+{extra}")).unwrap();
        prop_assert!(base.equal(&rebuilt));
    }

    /// Hex strings of acceptable length are valid commit hashes.
    #[test]
    fn hex_commit_hashes_accepted(hash in "[0-9a-fA-F]{7,40}") {
        prop_assert!(CommitHash::new(hash).is_ok());
    }

    /// Anything containing a non-hex character is rejected.
    #[test]
    fn non_hex_commit_hashes_rejected(
        prefix in "[0-9a-f]{3,10}",
        bad in "[g-zG-Z \\n./-]",
        suffix in "[0-9a-f]{3,10}",
    ) {
        let candidate = format!("{}{}{}", prefix, bad, suffix);
        prop_assert!(CommitHash::new(candidate).is_err());
    }

    /// Parsing never panics on arbitrary input.
    #[test]
    fn parse_never_panics(s in "\\PC{0,40}") {
        let _ = SemVer::parse(&s);
    }
}
