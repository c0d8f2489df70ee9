//! Construction driver.

use super::{
    keys::KeySet,
    placement::place,
    search::find_perfect_hash,
    OwnedJumpTable, OwnedMphf,
};
use alloc::vec::Vec;
use log::{debug, info, warn};
use rand::{rngs::SmallRng, RngCore, SeedableRng};

#[cfg(feature = "std")]
use std::time::{Duration, Instant};

/// Construction ran out of attempts.
///
/// Both variants are expected outcomes of a bounded randomized search rather than bugs: retry with a
/// larger budget or a different random source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    /// No seed produced collision-free hashes.
    #[error("no collision-free seed found in {attempts} attempts")]
    SeedExhausted {
        /// The attempt budget that was spent.
        attempts: usize,
    },

    /// Collision-free hashes were found, but no bucket/shift assignment succeeded.
    #[error("no valid bucket shifts found in {attempts} attempts")]
    PlacementExhausted {
        /// The attempt budget that was spent.
        attempts: usize,
    },

    /// The deadline passed before construction succeeded.
    #[error("deadline exceeded after {attempts} attempts")]
    DeadlineExceeded {
        /// The number of attempts completed before the deadline.
        attempts: usize,
    },
}

/// A builder for [`Mphf`](crate::Mphf) and [`JumpTable`](crate::JumpTable).
///
/// Construction alternates two randomized steps: a seed search for a collision-free imperfect hash,
/// and the bucket/shift placement refining it into a perfect hash. Both may fail; the builder
/// retries up to [`attempts`](Builder::attempts) times with fresh seeds. The seed search is bounded
/// by the same budget, so at most `attempts²` seeds are drawn.
///
/// Seeds come from an explicit random source. [`Builder::new`] uses a fixed-seed [`SmallRng`], so
/// building the same key set twice yields identical tables; use [`Builder::with_rng`] to supply your
/// own. Independent builders share no state and can run on different threads.
///
/// # Example
///
/// ```rust
/// let mut builder = jmptab::Builder::new();
/// let table = builder
///     .build_table(vec![("linux", 1), ("darwin", 2), ("windows", 3)])
///     .expect("construction failed");
/// assert_eq!(table.get("darwin"), Some(&2));
/// assert_eq!(table.get("plan9"), None);
/// ```
#[derive(Clone, Debug)]
pub struct Builder<R = SmallRng> {
    /// Source of seeds
    rng: R,

    /// Outer and inner attempt budget
    attempts: usize,

    /// Wall-clock bound on a single construction
    #[cfg(feature = "std")]
    deadline: Option<Duration>,
}

impl Builder {
    /// Seed of the default random source. Hexadecimal digits of pi - 3.
    const DEFAULT_SEED: u64 = 0x243f_6a88_85a3_08d3;

    /// Create a builder with the default budget and a deterministic random source.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::seed_from_u64(Self::DEFAULT_SEED))
    }
}

impl Default for Builder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Builder<R> {
    /// The default attempt budget.
    pub const DEFAULT_ATTEMPTS: usize = 100;

    /// Create a builder drawing seeds from `rng`.
    #[inline]
    pub const fn with_rng(rng: R) -> Self {
        Self {
            rng,
            attempts: Self::DEFAULT_ATTEMPTS,
            #[cfg(feature = "std")]
            deadline: None,
        }
    }

    /// Set the attempt budget. The default is 100.
    ///
    /// # Panics
    ///
    /// Panics if `attempts` is zero.
    #[inline]
    #[must_use]
    pub fn attempts(mut self, attempts: usize) -> Self {
        assert!(attempts > 0, "the attempt budget must be positive");
        self.attempts = attempts;
        self
    }

    /// Give up on a construction once it takes longer than `deadline`.
    ///
    /// The deadline is checked before each attempt, so it may be overrun by the duration of one
    /// attempt.
    #[cfg(feature = "std")]
    #[inline]
    #[must_use]
    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Recover the random source.
    #[inline]
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Try to generate a perfect hash function.
    ///
    /// Duplicates in `keys` are allowed and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the budget is exhausted or the deadline passes.
    ///
    /// # Panics
    ///
    /// Panics if `keys` is empty or contains `2^32` distinct keys or more.
    #[inline]
    pub fn build<K: AsRef<[u8]>>(
        &mut self,
        keys: impl IntoIterator<Item = K>,
    ) -> Result<OwnedMphf, BuildError> {
        self.build_from_key_set(&KeySet::new(keys))
    }

    /// Try to generate a perfect hash function for a prepared key set.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the budget is exhausted or the deadline passes.
    ///
    /// # Panics
    ///
    /// Panics if `keys` is empty or contains `2^32` keys or more.
    #[allow(
        clippy::missing_inline_in_public_items,
        reason = "heavy, we'd rather not copy it to every crate"
    )]
    pub fn build_from_key_set<K: AsRef<[u8]>>(
        &mut self,
        keys: &KeySet<K>,
    ) -> Result<OwnedMphf, BuildError> {
        assert!(!keys.is_empty(), "cannot build a jump table without keys");
        assert!(
            u32::try_from(keys.len()).is_ok(),
            "too many keys for a 32-bit hash"
        );

        let prefix_len = keys.distinguishing_prefix_len();
        debug!(
            "Building jump table for {} keys, hashing prefixes of {prefix_len} bytes",
            keys.len()
        );

        #[cfg(feature = "std")]
        let start = Instant::now();

        let mut found_seed = false;
        let mut sums = Vec::with_capacity(keys.len());

        for attempt in 1..=self.attempts {
            #[cfg(feature = "std")]
            if self.deadline.is_some_and(|deadline| start.elapsed() >= deadline) {
                let error = BuildError::DeadlineExceeded {
                    attempts: attempt - 1,
                };
                warn!("{error}");
                return Err(error);
            }

            let hasher =
                match find_perfect_hash(keys.as_slice(), prefix_len, self.attempts, &mut self.rng) {
                    Ok(hasher) => hasher,
                    Err(error) => {
                        debug!("Attempt {attempt}: {error}");
                        continue;
                    }
                };
            found_seed = true;

            sums.clear();
            sums.extend(keys.iter().map(|key| hasher.hash(key)));
            match place(&sums, hasher) {
                Ok(mphf) => {
                    info!(
                        "Built jump table for {} keys in {attempt} attempts: {} slots, {} buckets, \
                         {prefix_len}-byte prefixes",
                        keys.len(),
                        mphf.capacity(),
                        mphf.bucket_count(),
                    );
                    return Ok(mphf);
                }
                Err(error) => debug!("Attempt {attempt}: {error}, trying again with a different seed..."),
            }
        }

        let error = if found_seed {
            BuildError::PlacementExhausted {
                attempts: self.attempts,
            }
        } else {
            BuildError::SeedExhausted {
                attempts: self.attempts,
            }
        };
        warn!("Giving up on {} keys: {error}", keys.len());
        Err(error)
    }

    /// Try to generate a jump table mapping keys to payloads.
    ///
    /// If a key occurs more than once, the first entry wins.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the budget is exhausted or the deadline passes.
    ///
    /// # Panics
    ///
    /// Panics if `entries` is empty or contains `2^32` distinct keys or more.
    #[inline] // heavy, but monomorphized anyway
    pub fn build_table<K: AsRef<[u8]>, V>(
        &mut self,
        entries: Vec<(K, V)>,
    ) -> Result<OwnedJumpTable<K, V>, BuildError> {
        let mphf = self.build(entries.iter().map(|(key, _)| key.as_ref()))?;
        Ok(OwnedJumpTable::from_mphf(mphf, entries))
    }
}
