//! Property-based tests for the simdex indexes.
//!
//! These tests verify invariants that should hold regardless of input:
//! - Permutations are bijective and popcount-preserving
//! - Every neighbor within distance 3 shares a permuted prefix (coverage)
//! - Queries recall all neighbors within distance 3 and nothing farther
//! - Both index variants agree on every query
//! - Finish is idempotent

use proptest::prelude::*;
use simdex::distance::hamming;
use simdex::{permute, BucketedIndex, HashIndex, MAX_DISTANCE};
use std::collections::HashSet;

/// Flip the given (distinct) bit positions of `sig`.
fn flip_bits(sig: u64, bits: &HashSet<u32>) -> u64 {
    bits.iter().fold(sig, |s, &b| s ^ (1u64 << b))
}

/// Up to `max` distinct bit positions in 0..64.
fn arb_flips(max: usize) -> impl Strategy<Value = HashSet<u32>> {
    prop::collection::hash_set(0u32..64, 0..=max)
}

mod permutation_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn roundtrip_every_table(sig in any::<u64>()) {
            let permuted = permute::permutations(sig);
            for (t, &p) in permuted.iter().enumerate() {
                prop_assert_eq!(
                    permute::unpermute(p, t),
                    sig,
                    "table {} did not invert {:#018x}",
                    t, sig
                );
            }
        }

        #[test]
        fn popcount_preserved(sig in any::<u64>()) {
            for p in permute::permutations(sig) {
                prop_assert_eq!(p.count_ones(), sig.count_ones());
            }
        }

        #[test]
        fn near_pair_shares_a_prefix(sig in any::<u64>(), flips in arb_flips(3)) {
            // Coverage: some permutation must put an identical 28-bit
            // prefix on top for any pair within distance 3.
            let other = flip_bits(sig, &flips);
            let a = permute::permutations(sig);
            let b = permute::permutations(other);
            let covered = a
                .iter()
                .zip(b.iter())
                .any(|(x, y)| x & permute::PREFIX_MASK == y & permute::PREFIX_MASK);
            prop_assert!(
                covered,
                "no shared prefix between {:#018x} and {:#018x} (distance {})",
                sig, other, hamming(sig, other)
            );
        }
    }
}

mod recall_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn hash_index_recalls_near_neighbor(
            target in any::<u64>(),
            flips in arb_flips(3),
            noise in prop::collection::vec(any::<u64>(), 0..50),
        ) {
            let mut index = HashIndex::with_capacity(noise.len() + 1);
            index.add(target, target).unwrap();
            for &n in &noise {
                index.add(n, n).unwrap();
            }
            index.finish();

            let query = flip_bits(target, &flips);
            let found = index.find(query).unwrap();
            prop_assert!(
                found.contains(&target),
                "query {:#018x} missed {:#018x} at distance {}",
                query, target, hamming(query, target)
            );
        }

        #[test]
        fn bucketed_index_recalls_near_neighbor(
            target in any::<u64>(),
            flips in arb_flips(3),
            noise in prop::collection::vec(any::<u64>(), 0..50),
        ) {
            let mut index = BucketedIndex::new();
            index.add(target, target).unwrap();
            for &n in &noise {
                index.add(n, n).unwrap();
            }
            index.finish();

            let query = flip_bits(target, &flips);
            let found = index.find(query).unwrap();
            prop_assert!(found.contains(&target));
        }
    }
}

mod precision_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        // Documents are their own fingerprints here, so every returned
        // document can be distance-checked against the query.
        #[test]
        fn hash_index_returns_only_near_neighbors(
            sigs in prop::collection::vec(any::<u64>(), 1..100),
            query in any::<u64>(),
        ) {
            let mut index = HashIndex::with_capacity(sigs.len());
            for &s in &sigs {
                index.add(s, s).unwrap();
            }
            index.finish();

            for doc in index.find(query).unwrap() {
                prop_assert!(
                    hamming(doc, query) <= MAX_DISTANCE,
                    "false positive {:#018x} at distance {}",
                    doc, hamming(doc, query)
                );
            }
        }

        #[test]
        fn bucketed_index_returns_only_near_neighbors(
            sigs in prop::collection::vec(any::<u64>(), 1..100),
            query in any::<u64>(),
        ) {
            let mut index = BucketedIndex::new();
            for &s in &sigs {
                index.add(s, s).unwrap();
            }
            index.finish();

            for doc in index.find(query).unwrap() {
                prop_assert!(hamming(doc, query) <= MAX_DISTANCE);
            }
        }

        #[test]
        fn index_variants_agree(
            sigs in prop::collection::vec(any::<u64>(), 0..80),
            query in any::<u64>(),
        ) {
            let mut hash_index = HashIndex::with_capacity(sigs.len());
            let mut bucketed = BucketedIndex::new();
            for &s in &sigs {
                hash_index.add(s, s).unwrap();
                bucketed.add(s, s).unwrap();
            }
            hash_index.finish();
            bucketed.finish();

            let a: HashSet<u64> = hash_index.find(query).unwrap().into_iter().collect();
            let b: HashSet<u64> = bucketed.find(query).unwrap().into_iter().collect();
            prop_assert_eq!(a, b);
        }
    }
}

mod lifecycle_props {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn finish_is_idempotent(
            sigs in prop::collection::vec(any::<u64>(), 1..50),
            query in any::<u64>(),
        ) {
            let mut index = HashIndex::with_capacity(sigs.len());
            for &s in &sigs {
                index.add(s, s).unwrap();
            }
            index.finish();
            let before: HashSet<u64> = index.find(query).unwrap().into_iter().collect();

            index.finish();
            let after: HashSet<u64> = index.find(query).unwrap().into_iter().collect();
            prop_assert_eq!(before, after);
        }

        #[test]
        fn duplicate_documents_collapse(
            sig in any::<u64>(),
            docs in prop::collection::vec(0u64..4, 1..12),
        ) {
            // Insert the same fingerprint under repeating documents; the
            // result is the document *set*.
            let mut index = HashIndex::new();
            for &d in &docs {
                index.add(sig, d).unwrap();
            }
            index.finish();

            let expected: HashSet<u64> = docs.iter().copied().collect();
            let found: HashSet<u64> = index.find(sig).unwrap().into_iter().collect();
            prop_assert_eq!(found, expected);
        }
    }
}
