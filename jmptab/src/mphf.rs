use super::hash::Fnv1a;
use core::ops::Deref;

/// A near-minimal perfect hash function.
///
/// A mapping from byte strings to numbers from `0` to `capacity() - 1`, injective over the training
/// key set. `capacity()` is the smallest power of two strictly greater than the number of keys.
///
/// The index is computed as follows:
///
/// ```text
/// sum = hash(key)
/// shift = shifts[sum & bucket_mask]
/// index = ((sum >> shift) ^ sum) & jump_mask
/// ```
///
/// `S` is the storage of the per-bucket shifts: [`Vec<u8>`](alloc::vec::Vec) for functions built
/// in runtime, `&'static [u8]` for generated code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Mphf<S> {
    /// Imperfect hash of the keys
    hasher: Fnv1a,

    /// `bucket_count() - 1`
    bucket_mask: u32,

    /// Shift of each bucket
    shifts: S,

    /// `capacity() - 1`
    jump_mask: u32,
}

impl<S: Deref<Target = [u8]>> Mphf<S> {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(hasher: Fnv1a, bucket_mask: u32, shifts: S, jump_mask: u32) -> Self {
        Self {
            hasher,
            bucket_mask,
            shifts,
            jump_mask,
        }
    }

    /// Hash a key.
    ///
    /// The whole point. Guaranteed to return different indices for different keys from the training
    /// dataset.
    ///
    /// May return arbitrary indices for keys outside the dataset, so callers must compare the key
    /// stored at the index with `key` before trusting it. [`JumpTable`](crate::JumpTable) does this
    /// for you.
    #[inline]
    #[must_use]
    pub fn index_of(&self, key: &[u8]) -> usize {
        self.index_of_sum(self.hasher.hash(key))
    }

    /// Map an imperfect hash sum to its jump table index.
    #[inline]
    pub(crate) fn index_of_sum(&self, sum: u32) -> usize {
        let shift = self.shifts[(sum & self.bucket_mask) as usize];
        jump_index(sum, shift, self.jump_mask)
    }

    /// Get the boundary on indices.
    ///
    /// The index returned by `index_of` is guaranteed to *always* be less than `capacity()`, even for
    /// keys outside the training dataset.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.jump_mask as usize + 1
    }

    /// Get the number of buckets. Always a power of two.
    #[inline]
    #[must_use]
    pub const fn bucket_count(&self) -> usize {
        self.bucket_mask as usize + 1
    }

    /// The imperfect hash this function refines.
    #[inline]
    #[must_use]
    pub const fn hasher(&self) -> &Fnv1a {
        &self.hasher
    }

    /// Per-bucket shift values.
    #[inline]
    #[must_use]
    pub fn shifts(&self) -> &[u8] {
        &self.shifts
    }

    /// `bucket_count() - 1`.
    #[inline]
    #[must_use]
    pub const fn bucket_mask(&self) -> u32 {
        self.bucket_mask
    }

    /// `capacity() - 1`.
    #[inline]
    #[must_use]
    pub const fn jump_mask(&self) -> u32 {
        self.jump_mask
    }
}

/// Compute a jump table index from an imperfect hash sum and its bucket's shift.
#[inline]
pub(crate) const fn jump_index(sum: u32, shift: u8, jump_mask: u32) -> usize {
    (((sum >> shift) ^ sum) & jump_mask) as usize
}

#[cfg(feature = "codegen")]
impl<S: Deref<Target = [u8]>> super::codegen::Codegen for Mphf<S> {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let static_mphf = gen.path("jmptab::StaticMphf");
        let hasher = gen.piece(&self.hasher);
        let bucket_mask = gen.piece(&self.bucket_mask);
        let shifts = gen.piece(&&*self.shifts);
        let jump_mask = gen.piece(&self.jump_mask);
        quote::quote!(#static_mphf::from_raw_parts(#hasher, #bucket_mask, #shifts, #jump_mask))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shift_collapses() {
        // (sum >> 0) ^ sum == 0, so shift 0 only ever reaches slot 0
        assert_eq!(jump_index(0xdead_beef, 0, 7), 0);
        assert_eq!(jump_index(0b1011, 1, 7), (0b101 ^ 0b1011) & 7);
        assert_eq!(jump_index(u32::MAX, 31, 15), 14);
    }

    #[test]
    fn lookup_by_raw_parts() {
        static SHIFTS: [u8; 2] = [1, 3];
        let mphf = Mphf::from_raw_parts(Fnv1a::new(9, 4), 1, &SHIFTS[..], 7);
        assert_eq!(mphf.capacity(), 8);
        assert_eq!(mphf.bucket_count(), 2);
        for key in [&b"x"[..], b"yy", b"zzzzzz"] {
            let sum = mphf.hasher().hash(key);
            let shift = SHIFTS[(sum & 1) as usize];
            assert_eq!(mphf.index_of(key), (((sum >> shift) ^ sum) & 7) as usize);
            assert!(mphf.index_of(key) < mphf.capacity());
        }
    }
}
