//! Collision-free seed search.
//!
//! Before the table can be laid out, the full 32-bit hashes of the keys must be pairwise distinct:
//! two keys with equal sums land in the same bucket and on the same slot for every shift. Seeds are
//! drawn at random until such a hash is found.

use super::{hash::Fnv1a, BuildError};
use alloc::vec::Vec;
use log::debug;
use rand::RngCore;

/// Draw seeds until the unreduced hashes of `keys` are collision-free.
///
/// Keys must be distinct; duplicates collide under every seed. `prefix_len` is passed to
/// [`Fnv1a::new`], normally computed with
/// [`distinguishing_prefix_len`](crate::keys::distinguishing_prefix_len).
///
/// This does not guarantee that the bucket/shift construction will succeed, only that it can.
///
/// # Errors
///
/// Returns [`BuildError::SeedExhausted`] if none of `attempts` seeds work.
#[inline]
pub fn find_perfect_hash<K: AsRef<[u8]>>(
    keys: &[K],
    prefix_len: usize,
    attempts: usize,
    rng: &mut impl RngCore,
) -> Result<Fnv1a, BuildError> {
    let mut sums = Vec::with_capacity(keys.len());
    for _ in 0..attempts {
        let seed = rng.next_u32();
        let hasher = Fnv1a::new(seed, prefix_len);
        sums.clear();
        sums.extend(keys.iter().map(|key| hasher.hash(key.as_ref())));
        if !has_collisions(&mut sums) {
            return Ok(hasher);
        }
        debug!("Seed {seed:#010x} has colliding hashes, trying again with a different seed...");
    }
    Err(BuildError::SeedExhausted { attempts })
}

/// Check if any two sums are equal. Reorders `sums`.
fn has_collisions(sums: &mut [u32]) -> bool {
    radsort::sort(sums);
    sums.windows(2).any(|window| window[0] == window[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn finds_hash() {
        let keys = ["386", "amd64", "arm", "arm64", "mips", "ppc64", "riscv64", "s390x", "wasm"];
        let mut rng = SmallRng::seed_from_u64(1);
        let hasher = find_perfect_hash(&keys, 2, 10, &mut rng).expect("no seed found");
        assert_eq!(hasher.prefix_len(), 2);

        let mut sums: Vec<u32> = keys.iter().map(|key| hasher.hash(key.as_bytes())).collect();
        assert!(!has_collisions(&mut sums));
    }

    #[test]
    fn length_only_hash_exhausts_on_equal_lengths() {
        let keys = ["abc", "abd", "xyz"];
        let mut rng = SmallRng::seed_from_u64(1);
        let error = find_perfect_hash(&keys, 0, 25, &mut rng).unwrap_err();
        assert_eq!(error, BuildError::SeedExhausted { attempts: 25 });
    }

    #[test]
    fn duplicates_exhaust() {
        let keys = ["dup", "dup"];
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(find_perfect_hash(&keys, usize::MAX, 5, &mut rng).is_err());
    }

    #[test]
    fn same_rng_same_seed() {
        let keys = ["get", "put", "post", "head", "delete"];
        let a = find_perfect_hash(&keys, 3, 10, &mut SmallRng::seed_from_u64(77));
        let b = find_perfect_hash(&keys, 3, 10, &mut SmallRng::seed_from_u64(77));
        assert_eq!(a.expect("no seed found"), b.expect("no seed found"));
    }

    #[test]
    fn collision_check() {
        assert!(!has_collisions(&mut []));
        assert!(!has_collisions(&mut [3, 1, 2]));
        assert!(has_collisions(&mut vec![3, 1, 3]));
    }
}
