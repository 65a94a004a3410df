//! Compact near-duplicate index: bucketed by 16-bit block.
//!
//! [`BucketedIndex`] answers the same Hamming distance <= 3 query as
//! [`HashIndex`](crate::HashIndex) with a quarter of the fingerprint copies:
//! any fingerprint within distance 3 of a query agrees with it on at least
//! one of its four 16-bit blocks, so storing each entry under the top block
//! of each of its four rotations and scanning the four matching buckets at
//! query time covers the whole radius-3 ball.
//!
//! The trade is scan width: a bucket keys on only 16 bits (versus the
//! 28-bit prefix of the permuted tables), so each probe touches roughly
//! `n / 65536` entries and filters them by popcount. Prefer this variant
//! when memory matters more than query latency.
//!
//! # Examples
//!
//! ```
//! use simdex::BucketedIndex;
//!
//! let mut index = BucketedIndex::new();
//! index.add(0xDEAD_BEEF_CAFE_BABE, "press release").unwrap();
//! index.finish();
//!
//! let hits = index.find(0xDEAD_BEEF_CAFE_BABF).unwrap();
//! assert_eq!(hits, vec!["press release"]);
//! ```

use std::hash::Hash;

use rayon::prelude::*;

use crate::dedup::unique;
use crate::distance::hamming;
use crate::error::{IndexError, Result};
use crate::store::Entry;
use crate::MAX_DISTANCE;

/// Block rotations per fingerprint: one per 16-bit block.
const ROTATIONS: usize = 4;

/// Buckets per rotation: one per 16-bit prefix value.
const BUCKETS_PER_ROTATION: usize = 1 << 16;

/// Memory-lean near-duplicate index for Hamming distance <= 3 queries.
///
/// Entries are stored once per rotation, keyed by the rotated word's top 16
/// bits; each bucket holds the rotated fingerprint so probes compare
/// like-rotated words (rotation preserves Hamming distance).
#[derive(Debug)]
pub struct BucketedIndex<D> {
    /// `ROTATIONS * BUCKETS_PER_ROTATION` buckets, row-major by rotation.
    buckets: Vec<Vec<Entry<D>>>,
    len: usize,
    finished: bool,
}

impl<D> BucketedIndex<D> {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: std::iter::repeat_with(Vec::new)
                .take(ROTATIONS * BUCKETS_PER_ROTATION)
                .collect(),
            len: 0,
            finished: false,
        }
    }

    /// Create an empty index.
    ///
    /// The capacity hint is accepted for constructor parity with
    /// [`HashIndex`](crate::HashIndex) but unused: entries scatter across
    /// 2^18 buckets, so no single bucket benefits from a global reservation.
    #[must_use]
    pub fn with_capacity(_hashes: usize) -> Self {
        Self::new()
    }

    #[inline]
    fn bucket_of(rotation: usize, sig: u64) -> usize {
        (rotation << 16) | (sig >> 48) as usize
    }

    /// Insert a fingerprint and its document.
    ///
    /// Returns [`IndexError::AddAfterFinish`] once [`finish`](Self::finish)
    /// has run.
    pub fn add(&mut self, sig: u64, doc: D) -> Result<()>
    where
        D: Clone,
    {
        if self.finished {
            return Err(IndexError::AddAfterFinish);
        }
        let mut s = sig;
        for rotation in 0..ROTATIONS {
            self.buckets[Self::bucket_of(rotation, s)].push(Entry {
                hash: s,
                doc: doc.clone(),
            });
            s = s.rotate_left(16);
        }
        self.len += 1;
        Ok(())
    }

    /// Sort every non-empty bucket, transitioning the index to query mode.
    ///
    /// Query correctness does not depend on the sort; it keeps buckets
    /// prefix-searchable for downstream consumers. Idempotent.
    pub fn finish(&mut self)
    where
        D: Send,
    {
        if self.finished {
            return;
        }
        self.buckets.par_iter_mut().for_each(|bucket| {
            if bucket.len() > 1 {
                bucket.sort_unstable_by_key(|e| e.hash);
            }
        });
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

        let mut docs = Vec::new();
        let mut s = sig;
        for rotation in 0..ROTATIONS {
            for entry in &self.buckets[Self::bucket_of(rotation, s)] {
                if hamming(entry.hash, s) <= MAX_DISTANCE {
                    docs.push(entry.doc.clone());
                }
            }
            s = s.rotate_left(16);
        }
        Ok(unique(docs))
    }

    /// Number of stored (fingerprint, document) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether [`finish`](Self::finish) has run.
    #[must_use]
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Approximate heap footprint in bytes.
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        self.buckets.capacity() * std::mem::size_of::<Vec<Entry<D>>>()
            + self
                .buckets
                .iter()
                .map(|b| b.capacity() * std::mem::size_of::<Entry<D>>())
                .sum::<usize>()
    }
}

impl<D> Default for BucketedIndex<D> {
    fn default() -> Self {
        Self::new()
    }
}
