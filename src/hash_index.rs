//! Primary near-duplicate index over 64-bit simhash fingerprints.
//!
//! [`HashIndex`] answers "which stored documents have a fingerprint within
//! Hamming distance 3 of this query?" by keeping sixteen copies of every
//! fingerprint, one per permutation in [`permute`](crate::permute), each in
//! its own sorted table. A query probes each table for fingerprints sharing the permuted
//! 28-bit prefix, filters the survivors by popcount, and maps them back to
//! documents through a sorted (fingerprint, document) table.
//!
//! The index is batch-oriented: all [`add`](HashIndex::add) calls happen
//! first, one [`finish`](HashIndex::finish) sorts every table, and only then
//! may [`find`](HashIndex::find) run. A finished index is immutable, so
//! concurrent `find` calls from multiple threads need no locking.
//!
//! Memory cost is 16 permuted words plus one entry per fingerprint; see
//! [`BucketedIndex`](crate::BucketedIndex) for a smaller-footprint variant
//! of the same query.
//!
//! # Examples
//!
//! ```
//! use simdex::HashIndex;
//!
//! let mut index = HashIndex::with_capacity(2);
//! index.add(0xDEAD_BEEF_CAFE_BABE, "press release").unwrap();
//! index.add(0x1234_5678_9ABC_DEF0, "blog post").unwrap();
//! index.finish();
//!
//! // One flipped bit is still within distance 3.
//! let hits = index.find(0xDEAD_BEEF_CAFE_BABF).unwrap();
//! assert_eq!(hits, vec!["press release"]);
//! ```

use std::hash::Hash;

use rayon::prelude::*;

use crate::dedup::unique;
use crate::error::{IndexError, Result};
use crate::permute::{self, PREFIX_MASK, TABLES};
use crate::store::{Entry, SignatureStore, SortedSignatures};
use crate::MAX_DISTANCE;

/// Near-duplicate index for Hamming distance <= 3 queries.
///
/// `D` is the document payload, opaque except for the equality and hashing
/// used to deduplicate results. `S` is the per-permutation table
/// representation; the default [`SortedSignatures`] is a sorted flat vector.
#[derive(Debug)]
pub struct HashIndex<D, S = SortedSignatures> {
    /// (fingerprint, document) pairs, sorted by fingerprint after finish.
    entries: Vec<Entry<D>>,
    /// One table of permuted fingerprints per permutation.
    tables: [S; TABLES],
    finished: bool,
}

impl<D> HashIndex<D> {
    /// Create an empty index with the default store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty index sized for `hashes` fingerprints.
    ///
    /// The hint only pre-allocates; `0` is fine.
    #[must_use]
    pub fn with_capacity(hashes: usize) -> Self {
        Self::with_store(hashes, SortedSignatures::with_capacity)
    }

    /// Approximate heap footprint in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.entries.capacity() * std::mem::size_of::<Entry<D>>()
            + self.tables.iter().map(SortedSignatures::size_bytes).sum::<usize>()
    }
}

impl<D> Default for HashIndex<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, S: SignatureStore> HashIndex<D, S> {
    /// Create an empty index whose sixteen permuted tables are produced by
    /// `make_store`, called once per table with the capacity hint.
    pub fn with_store(hashes: usize, mut make_store: impl FnMut(usize) -> S) -> Self {
        Self {
            entries: Vec::with_capacity(hashes),
            tables: std::array::from_fn(|_| make_store(hashes)),
            finished: false,
        }
    }

    /// Insert a fingerprint and its document.
    ///
    /// Several documents may share one fingerprint. Returns
    /// [`IndexError::AddAfterFinish`] once [`finish`](Self::finish) has run.
    pub fn add(&mut self, sig: u64, doc: D) -> Result<()> {
        if self.finished {
            return Err(IndexError::AddAfterFinish);
        }
        self.entries.push(Entry { hash: sig, doc });
        for (table, p) in self.tables.iter_mut().zip(permute::permutations(sig)) {
            table.add(p);
        }
        Ok(())
    }

    /// Sort every internal table, transitioning the index to query mode.
    ///
    /// The sixteen permuted-table sorts are independent and run on the rayon
    /// pool, one task per table. Idempotent: repeated calls are no-ops.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.entries.sort_unstable_by_key(|e| e.hash);
        self.tables.par_iter_mut().for_each(|t| t.finish());
        self.finished = true;
    }

    /// Return the documents of every stored fingerprint within Hamming
    /// distance 3 of `sig`.
    ///
    /// Results are deduplicated; their order is unspecified. Returns
    /// [`IndexError::NotFinished`] until [`finish`](Self::finish) has run.
    pub fn find(&self, sig: u64) -> Result<Vec<D>>
    where
        D: Clone + Eq + Hash,
    {
        if !self.finished {
            return Err(IndexError::NotFinished);
        }

        let mut candidates = Vec::new();
        for (t, (table, p)) in self
            .tables
            .iter()
            .zip(permute::permutations(sig))
            .enumerate()
        {
            for hit in table.find(p, PREFIX_MASK, MAX_DISTANCE) {
                candidates.push(permute::unpermute(hit, t));
            }
        }

        let mut docs = Vec::new();
        for hash in unique(candidates) {
            let start = self.entries.partition_point(|e| e.hash < hash);
            docs.extend(
                self.entries[start..]
                    .iter()
                    .take_while(|e| e.hash == hash)
                    .map(|e| e.doc.clone()),
            );
        }
        Ok(unique(docs))
    }

    /// Number of stored (fingerprint, document) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether [`finish`](Self::finish) has run.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }
}
