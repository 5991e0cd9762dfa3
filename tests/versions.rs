// tests/versions.rs

//! Version ordering and dependency-string parsing against real Debian
//! version strings.

use debsolve::dependency::{self, ConstraintOp};
use debsolve::version::{self, DebVersion};
use std::cmp::Ordering;

/// Real versions from Debian archives, in ascending order
const ASCENDING: &[&str] = &[
    "",
    "0~~",
    "0~",
    "0",
    "0.9",
    "1.0~beta1",
    "1.0~rc1",
    "1.0",
    "1.0-1",
    "1.0-1+b1",
    "1.0-1.1",
    "1.0a",
    "1.0+dfsg-1",
    "1.2.13.dfsg-1",
    "2.0",
    "3.0.11-1~deb12u2",
    "3.0.11-1",
    "7.88.1-10+deb12u5",
    "8.5.0-2~bpo12+1",
    "1:0.1",
    "1:1.2.13.dfsg-1",
    "2:9.0.1378-2",
];

#[test]
fn test_known_comparisons() {
    assert_eq!(version::compare("1.0", "1.0"), Ordering::Equal);
    assert_eq!(version::compare("2.0", "1.0"), Ordering::Greater);
    assert_eq!(version::compare("1.0~beta1", "1.0"), Ordering::Less);
    assert_eq!(version::compare("1:1.0", "2.0"), Ordering::Greater);
    assert_eq!(version::compare("1.01", "1.1"), Ordering::Equal);
}

#[test]
fn test_ascending_list_is_strictly_ordered() {
    for (i, a) in ASCENDING.iter().enumerate() {
        for (j, b) in ASCENDING.iter().enumerate() {
            assert_eq!(
                version::compare(a, b),
                i.cmp(&j),
                "compare({:?}, {:?})",
                a,
                b
            );
        }
    }
}

#[test]
fn test_antisymmetry_and_transitivity() {
    let samples = [
        "1.0", "1.0-1", "1.0~rc1", "1:0.5", "0:1.0", "1.0a", "1.0+", "10", "9", "1.0-0",
    ];
    for a in samples {
        for b in samples {
            assert_eq!(version::compare(a, b), version::compare(b, a).reverse());
            for c in samples {
                if version::compare(a, b) == Ordering::Less && version::compare(b, c) == Ordering::Less {
                    assert_eq!(version::compare(a, c), Ordering::Less, "{} < {} < {}", a, b, c);
                }
            }
        }
    }
}

#[test]
fn test_strict_parse() {
    let v = DebVersion::parse("2:9.0.1378-2").unwrap();
    assert_eq!(v.epoch, 2);
    assert_eq!(v.upstream, "9.0.1378");
    assert_eq!(v.revision, "2");
    assert!(DebVersion::parse("").is_err());
    assert!(DebVersion::parse("x:1.0").is_err());
}

#[test]
fn test_clean_name() {
    assert_eq!(dependency::clean_name("libc6 (>= 2.34)"), "libc6");
    assert_eq!(dependency::clean_name("python3 | python3-dev"), "python3");
    assert_eq!(dependency::clean_name("gcc:amd64"), "gcc");
}

#[test]
fn test_constraints_from_real_depends_line() {
    let raw = [
        "libc6 (>= 2.34)",
        "libcurl4 (= 7.88.1-10+deb12u5)",
        "default-mta | mail-transport-agent",
        "libssl3 (>= 3.0.0)",
    ];

    let (constraints, found) = dependency::extract_constraints(&raw, "libcurl4");
    assert!(found);
    assert_eq!(constraints.len(), 1);
    assert!(constraints[0].is_direct());
    assert!(constraints[0].satisfied_by("7.88.1-10+deb12u5"));
    assert!(!constraints[0].satisfied_by("8.5.0-2~bpo12+1"));

    let (constraints, found) = dependency::extract_constraints(&raw, "mail-transport-agent");
    assert!(found);
    assert_eq!(constraints.len(), 1);
    assert!(!constraints[0].has_relation());
    assert_eq!(constraints[0].alternative_names, vec!["default-mta"]);

    let (_, found) = dependency::extract_constraints(&raw, "zlib1g");
    assert!(!found);

    assert_eq!(ConstraintOp::split_prefix(">= 1.0").map(|(op, _)| op), Some(ConstraintOp::GreaterOrEqual));
}
