//! simdex: near-duplicate search over 64-bit simhash fingerprints.
//!
//! An in-memory index answering Hamming-ball queries: given a query
//! fingerprint, return every stored document whose fingerprint differs from
//! it in at most 3 bit positions. This is the permuted-table scheme of
//! Manku, Jain & Sarma, hard-coded for distance 3, as used for web-crawl
//! deduplication.
//!
//! Two index variants implement the same query:
//!
//! | Index | Tables | Probe cost | Memory per entry |
//! |-------|--------|------------|------------------|
//! | [`HashIndex`] | 16 sorted permuted tables + entry table | 16 binary searches over 28-bit prefixes | 16 words + entry |
//! | [`BucketedIndex`] | 4 x 65536 buckets | 4 bucket scans (~n/65536 entries each) | 4 entries |
//!
//! ## Recommendation Logic
//!
//! 1. **Start with [`HashIndex`]**. Probes touch almost nothing beyond true
//!    neighbors, and the per-permutation tables are pluggable via
//!    [`SignatureStore`].
//!
//! 2. **Use [`BucketedIndex`]** when the 16-fold fingerprint blow-up is too
//!    expensive. Queries degrade to short linear scans but stay cheap until
//!    the index holds many millions of entries.
//!
//! Both are strictly batch: insert everything with `add`, call `finish`
//! once, then query with `find`. A finished index is immutable and safe to
//! share across threads.
//!
//! # Examples
//!
//! ```
//! use simdex::HashIndex;
//!
//! let mut index = HashIndex::with_capacity(3);
//! index.add(0xDEAD_BEEF_CAFE_BABE, "a").unwrap();
//! index.add(0xDEAD_BEEF_CAFE_BABE, "b").unwrap(); // fingerprints may collide
//! index.add(0x0123_4567_89AB_CDEF, "c").unwrap();
//! index.finish();
//!
//! let mut near = index.find(0xDEAD_BEEF_CAFE_BABF).unwrap();
//! near.sort_unstable();
//! assert_eq!(near, vec!["a", "b"]);
//! ```
//!
//! ## References
//!
//! - Manku, Jain & Sarma (2007): "Detecting Near-Duplicates for Web
//!   Crawling", §3
//! - Charikar (2002): "Similarity estimation techniques from rounding
//!   algorithms" (simhash itself; computing fingerprints is out of scope
//!   here)

pub mod bucketed;
pub mod dedup;
pub mod distance;
pub mod error;
pub mod hash_index;
pub mod permute;
pub mod store;

pub use bucketed::BucketedIndex;
pub use error::{IndexError, Result};
pub use hash_index::HashIndex;
pub use store::{SignatureStore, SortedSignatures};

/// Maximum Hamming distance answered by the indexes.
pub const MAX_DISTANCE: u32 = 3;
