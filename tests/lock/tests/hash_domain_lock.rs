//! Hash domain governance lock tests.
//!
//! Proves:
//! 1. The domain set has the expected count (catches forgotten additions to `ALL`)
//! 2. All domain byte strings are unique
//! 3. All domains are null-terminated and follow `FIFTEEN::*::V1\0`
//! 4. No raw `FIFTEEN::` domain literals in production source outside `hash.rs`
//! 5. The empty-input digest of each domain is pinned

use std::collections::BTreeSet;

use fifteen_kernel::proof::hash::{canonical_hash, HashDomain};

/// ACCEPTANCE: HASH-001-LOCK
#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        3,
        "expected 3 domain variants; if you added a new domain, update this count"
    );
}

/// ACCEPTANCE: HASH-001-LOCK
#[test]
fn hash_domain_all_unique_bytes() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(
            seen.insert(domain.prefix()),
            "duplicate domain bytes: {domain:?}"
        );
    }
}

/// ACCEPTANCE: HASH-001-LOCK
#[test]
fn hash_domain_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.prefix();
        assert!(bytes.starts_with(b"FIFTEEN::"), "{domain:?} lacks FIFTEEN::");
        assert!(bytes.ends_with(b"::V1\0"), "{domain:?} does not end with ::V1\\0");
        assert_eq!(
            bytes.iter().filter(|&&b| b == 0).count(),
            1,
            "{domain:?} has an interior null"
        );
    }
}

/// Domains must separate identical payloads.
///
/// ACCEPTANCE: HASH-001-LOCK
#[test]
fn same_bytes_different_domains_differ() {
    let digests: BTreeSet<String> = HashDomain::ALL
        .iter()
        .map(|&d| canonical_hash(d, b"{}").as_str().to_string())
        .collect();
    assert_eq!(digests.len(), HashDomain::ALL.len());
}

/// Scan kernel/, search/, harness/ source for `b"FIFTEEN::` literals.
/// The only file allowed to contain them is `hash.rs`.
///
/// ACCEPTANCE: HASH-001-LOCK
#[test]
fn no_raw_domain_literals_outside_authority() {
    let production_dirs = [
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../kernel/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../search/src"),
        concat!(env!("CARGO_MANIFEST_DIR"), "/../../harness/src"),
    ];
    let pattern = "b\"FIFTEEN::";
    let authority_file = "hash.rs";
    let mut violations = Vec::new();

    for dir in &production_dirs {
        let dir = std::path::Path::new(dir);
        assert!(dir.exists(), "missing source dir {}", dir.display());
        for path in walkdir(dir) {
            if path.extension().and_then(|e| e.to_str()) != Some("rs")
                || path.file_name().and_then(|n| n.to_str()) == Some(authority_file)
            {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            for (i, line) in content.lines().enumerate() {
                let trimmed = line.trim();
                if !trimmed.starts_with("//") && trimmed.contains(pattern) {
                    violations.push(format!("  {}:{}: {}", path.display(), i + 1, trimmed));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "raw FIFTEEN:: domain literals found outside {authority_file}:\n{}",
        violations.join("\n")
    );
}

/// Simple recursive directory walker (avoids adding walkdir dependency).
fn walkdir(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
    let mut results = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                results.extend(walkdir(&path));
            } else {
                results.push(path);
            }
        }
    }
    results
}

/// Golden digests of the empty payload. A change here means every stored
/// report and trace digest changes too.
///
/// ACCEPTANCE: HASH-002-GOLDEN
#[test]
fn empty_payload_digests_are_pinned() {
    let expected = [
        (
            HashDomain::SearchTrace,
            "sha256:1e6732d7258e8baa358625562e01ae616ed1b5b11da1f6d1ef4d033683b2a8ea",
        ),
        (
            HashDomain::RunArtifact,
            "sha256:36cbabe6819aebe900b5a1ae823fd60cda2576789ab77f5ed8869ca85d6729e6",
        ),
        (
            HashDomain::RunReport,
            "sha256:afaca6b480ef7f97bd760e6709638e6db11788ea13750d7acbaf7c60a1c6eefa",
        ),
    ];
    for (domain, digest) in expected {
        assert_eq!(canonical_hash(domain, b"").as_str(), digest, "{domain:?}");
    }
}
