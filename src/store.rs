//! Pluggable storage for permuted fingerprint tables.
//!
//! [`HashIndex`](crate::HashIndex) keeps one table per permutation and only
//! needs three operations from it: append, sort, and masked-prefix probe.
//! [`SignatureStore`] captures that capability so the flat in-memory default
//! ([`SortedSignatures`]) can later be swapped for a compressed or mmap-backed
//! representation without touching the index logic.

use smallvec::SmallVec;

use crate::distance::hamming;

/// Hits returned by a single permuted-table probe.
///
/// A probe rarely yields more than a handful of fingerprints, so the common
/// case stays on the stack.
pub type Hits = SmallVec<[u64; 8]>;

/// Storage capability for one permuted fingerprint table.
///
/// Implementations must uphold the probe contract: [`find`](Self::find)
/// returns every stored fingerprint whose bits selected by `mask` equal
/// `sig & mask` and whose full-word Hamming distance to `sig` is at most
/// `max_distance`. [`add`](Self::add) is never called after
/// [`finish`](Self::finish).
pub trait SignatureStore: Send {
    /// Append a permuted fingerprint.
    fn add(&mut self, sig: u64);

    /// Return all stored fingerprints matching `sig` under `mask` and within
    /// `max_distance` of it.
    fn find(&self, sig: u64, mask: u64, max_distance: u32) -> Hits;

    /// Prepare the table for probing. Called once, after all adds.
    fn finish(&mut self);
}

/// Default signature store: a flat `Vec<u64>` sorted by [`finish`].
///
/// [`find`] binary-searches to the first fingerprint with the queried prefix
/// and walks forward while the prefix holds.
///
/// [`finish`]: SignatureStore::finish
/// [`find`]: SignatureStore::find
#[derive(Debug, Clone, Default)]
pub struct SortedSignatures {
    sigs: Vec<u64>,
}

impl SortedSignatures {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with room for `hashes` fingerprints.
    #[must_use]
    pub fn with_capacity(hashes: usize) -> Self {
        Self {
            sigs: Vec::with_capacity(hashes),
        }
    }

    /// Number of stored fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sigs.len()
    }

    /// Whether the store holds no fingerprints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sigs.is_empty()
    }

    /// Approximate heap footprint in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.sigs.capacity() * std::mem::size_of::<u64>()
    }
}

impl SignatureStore for SortedSignatures {
    fn add(&mut self, sig: u64) {
        self.sigs.push(sig);
    }

    fn find(&self, sig: u64, mask: u64, max_distance: u32) -> Hits {
        let prefix = sig & mask;
        // TODO: interpolation search; prefixes are near-uniform, ~2x over
        // binary search here.
        let start = self.sigs.partition_point(|&h| h < prefix);

        let mut hits = Hits::new();
        for &h in &self.sigs[start..] {
            if h & mask != prefix {
                break;
            }
            if hamming(h, sig) <= max_distance {
                hits.push(h);
            }
        }
        hits
    }

    fn finish(&mut self) {
        self.sigs.sort_unstable();
    }
}

/// A stored (fingerprint, document) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry<D> {
    pub hash: u64,
    pub doc: D,
}
