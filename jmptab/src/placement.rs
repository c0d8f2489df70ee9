//! Bucket/shift construction.
//!
//! Given a collision-free imperfect hash, the keys are refined into a jump table like this:
//!
//! 1. The table has `m` slots, the smallest power of two greater than the number of keys `n`.
//! 2. Keys are split into `k` buckets, the smallest power of two greater than `n / 3`, by
//!    `bucket = sum & (k - 1)`.
//! 3. Each bucket gets a shift value so that all keys in that bucket get a unique jump table index
//!    that doesn't collide with any other key: `index = ((sum >> shift) ^ sum) & (m - 1)`.
//!
//! Buckets are processed largest first and greedily: a bucket picks the first shift in `0..32` that
//! works given the slots committed so far, and there is no backtracking across buckets. This is a
//! heuristic; placing the buckets with the most constraints while the table is still empty is what
//! makes it succeed in practice, but it can fail where a backtracking search would not.
//!
//! References:
//!
//! - F. C. Botelho, D. Belazzougui and M. Dietzfelbinger. Compress, hash and displace. In
//!   Proceedings of the 17th European Symposium on Algorithms (ESA 2009). Springer LNCS, 2009.
//! - Bob Jenkins. Minimal Perfect Hashing. <http://www.burtleburtle.net/bob/hash/perfect.html>

use super::{
    bitmap::BitMap,
    hash::Fnv1a,
    keys::KeySet,
    mphf::jump_index,
    OwnedJumpTable, OwnedMphf,
};
use alloc::{vec, vec::Vec};

/// The number of shift values tried per bucket.
pub const SHIFT_RANGE: u8 = 32;

/// No shift places a bucket without collisions.
///
/// Fails a single construction attempt. Retrying with another seed may succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no shift in 0..32 places bucket {bucket} ({size} keys)")]
#[non_exhaustive]
pub struct PlacementFailed {
    /// Index of the bucket that could not be placed.
    pub bucket: usize,
    /// Number of keys in that bucket.
    pub size: usize,
}

/// Size of the jump table for `n` keys: the smallest power of two strictly greater than `n`.
#[inline]
#[must_use]
pub const fn jump_table_len(n: usize) -> usize {
    (n + 1).next_power_of_two()
}

/// Number of buckets for `n` keys: the smallest power of two strictly greater than `n / 3`.
#[inline]
#[must_use]
pub const fn bucket_count(n: usize) -> usize {
    (n / 3 + 1).next_power_of_two()
}

/// Refine collision-free hash sums into a perfect hash function.
///
/// `sums` are the imperfect hashes of all keys under `hasher`. Duplicate sums always fail.
///
/// # Errors
///
/// Returns [`PlacementFailed`] if some bucket has no valid shift. No partial result is produced.
///
/// # Panics
///
/// Panics if there are `2^32` sums or more.
#[inline]
pub fn place(sums: &[u32], hasher: Fnv1a) -> Result<OwnedMphf, PlacementFailed> {
    let table_len = jump_table_len(sums.len());
    let jump_mask = u32::try_from(table_len - 1).expect("too many keys for a 32-bit hash");
    #[allow(clippy::cast_possible_truncation, reason = "bucket_count <= table_len")]
    let bucket_mask = (bucket_count(sums.len()) - 1) as u32;

    let buckets = Buckets::new(sums, bucket_mask);
    let mut committed = BitMap::new_zeros(table_len);
    let mut shifts = vec![0; bucket_mask as usize + 1];
    let mut indices = Vec::new();

    for (bucket, bucket_sums) in buckets.iter() {
        let shift = find_shift(bucket_sums, jump_mask, &committed, &mut indices).ok_or(
            PlacementFailed {
                bucket,
                size: bucket_sums.len(),
            },
        )?;
        shifts[bucket] = shift;
        for &index in &indices {
            committed.set(index);
        }
    }

    debug_assert_eq!(committed.count_ones(), sums.len(), "lost a key");
    Ok(OwnedMphf::from_raw_parts(
        hasher, bucket_mask, shifts, jump_mask,
    ))
}

/// Build a perfect hash function for `keys` and fill a jump table with them.
///
/// # Errors
///
/// Returns [`PlacementFailed`] if some bucket has no valid shift.
#[inline]
pub fn build_table<K: AsRef<[u8]> + Clone>(
    keys: &KeySet<K>,
    hasher: Fnv1a,
) -> Result<OwnedJumpTable<K, ()>, PlacementFailed> {
    let sums: Vec<u32> = keys.iter().map(|key| hasher.hash(key)).collect();
    let mphf = place(&sums, hasher)?;
    Ok(OwnedJumpTable::from_mphf(
        mphf,
        keys.as_slice().iter().map(|key| (key.clone(), ())),
    ))
}

/// Find the first shift that places every sum of a bucket on a free, distinct slot.
///
/// On success, `indices` contains the slots taken by the bucket.
fn find_shift(
    sums: &[u32],
    jump_mask: u32,
    committed: &BitMap,
    indices: &mut Vec<usize>,
) -> Option<u8> {
    'shift: for shift in 0..SHIFT_RANGE {
        indices.clear();
        for &sum in sums {
            let index = jump_index(sum, shift, jump_mask);
            if committed.get(index) || indices.contains(&index) {
                continue 'shift;
            }
            indices.push(index);
        }
        return Some(shift);
    }
    None
}

/// Hash sums, split into buckets.
struct Buckets {
    /// Sums ordered such that all buckets are consecutive
    sums: Vec<u32>,

    /// Buckets, grouped by size. `by_size[size]` lists `(bucket, start)` tuples.
    by_size: Vec<Vec<(usize, usize)>>,
}

impl Buckets {
    /// Split sums into buckets by `sum & bucket_mask`.
    fn new(sums: &[u32], bucket_mask: u32) -> Self {
        let mut sums = sums.to_vec();
        // Stable, so the order within a bucket is the key order
        radsort::sort_by_key(&mut sums, |sum| sum & bucket_mask);

        let mut by_size: Vec<Vec<(usize, usize)>> = Vec::new();
        for (start, group) in chunk_starts(&sums, bucket_mask) {
            let size = group.len();
            while by_size.len() <= size {
                by_size.push(Vec::new());
            }
            by_size[size].push(((group[0] & bucket_mask) as usize, start));
        }

        Self { sums, by_size }
    }

    /// Iterate over buckets in decreasing size order.
    ///
    /// Yields `(bucket, sums)`. Empty buckets are skipped.
    fn iter(&self) -> impl Iterator<Item = (usize, &[u32])> {
        self.by_size
            .iter()
            .enumerate()
            .rev()
            .flat_map(move |(size, buckets)| {
                buckets
                    .iter()
                    .map(move |&(bucket, start)| (bucket, &self.sums[start..start + size]))
            })
    }
}

/// Split sorted sums into runs of equal buckets, yielding `(start, run)`.
fn chunk_starts(sums: &[u32], bucket_mask: u32) -> impl Iterator<Item = (usize, &[u32])> {
    let mut start = 0;
    sums.chunk_by(move |a, b| a & bucket_mask == b & bucket_mask)
        .map(move |group| {
            let group_start = start;
            start += group.len();
            (group_start, group)
        })
}
