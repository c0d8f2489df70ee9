//! Key-set preparation.
//!
//! Keys are arbitrary byte strings. Before searching for a hash function, they are sorted and
//! deduplicated once, and the length of the prefix the hash has to look at is computed.

use alloc::vec::Vec;

/// A sorted set of distinct byte-string keys.
///
/// Established once at the start of construction and never mutated afterwards.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct KeySet<K> {
    /// Keys, sorted by bytes, without duplicates
    keys: Vec<K>,
}

impl<K: AsRef<[u8]>> KeySet<K> {
    /// Collect keys into a set.
    ///
    /// Duplicates are allowed in the input; only one copy of each key is retained.
    #[inline]
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            keys: deduplicate(keys.into_iter().collect()),
        }
    }

    /// Get the number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if there are no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get the keys in sorted order.
    #[inline]
    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// Iterate through the keys in sorted order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[u8]> + Clone {
        self.keys.iter().map(AsRef::as_ref)
    }

    /// Compute [`distinguishing_prefix_len`] for this set.
    #[inline]
    pub fn distinguishing_prefix_len(&self) -> usize {
        distinguishing_prefix_len(&self.keys)
    }

    /// Unwrap the sorted keys.
    #[inline]
    pub fn into_vec(self) -> Vec<K> {
        self.keys
    }
}

impl<K: AsRef<[u8]>> FromIterator<K> for KeySet<K> {
    #[inline]
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Sort keys by bytes and drop duplicates.
///
/// The result is sorted and contains no two equal keys.
#[inline]
pub fn deduplicate<K: AsRef<[u8]>>(mut keys: Vec<K>) -> Vec<K> {
    keys.sort_unstable_by(|a, b| a.as_ref().cmp(b.as_ref()));
    keys.dedup_by(|a, b| a.as_ref() == b.as_ref());
    keys
}

/// Compute how many leading bytes the hash needs to see to tell the keys apart.
///
/// Returns 0 if `len % 256` is different for every key: the length byte alone is enough then.
/// Otherwise, returns one more than the longest common prefix of two lexicographically adjacent
/// keys.
///
/// Adjacent pairs are used as a proxy for the most similar pair. This bound is heuristic: it is not
/// proven sufficient for every pair of keys, in particular in combination with length truncation.
/// A colliding hash is caught by the seed search regardless.
#[inline]
pub fn distinguishing_prefix_len<K: AsRef<[u8]>>(keys: &[K]) -> usize {
    if has_distinct_lengths(keys) {
        return 0;
    }

    let mut sorted: Vec<&[u8]> = keys.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    sorted
        .windows(2)
        .map(|pair| common_prefix_len(pair[0], pair[1]) + 1)
        .max()
        .unwrap_or(0)
}

/// Check if `len % 256` is pairwise distinct.
fn has_distinct_lengths<K: AsRef<[u8]>>(keys: &[K]) -> bool {
    let mut seen = [false; 256];
    for key in keys {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "the hash only sees the low byte of the length"
        )]
        let len = key.as_ref().len() as u8;
        if core::mem::replace(&mut seen[usize::from(len)], true) {
            return false;
        }
    }
    true
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
