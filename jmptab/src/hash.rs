//! The seeded string hash.
//!
//! Every hash function in this crate is a member of one family: 32-bit FNV-1a with the seed folded
//! into the offset basis. Only the key length (truncated to one byte) and at most `prefix_len`
//! leading bytes of the key are hashed. Hashing less of the key is faster, and
//! [`distinguishing_prefix_len`](crate::keys::distinguishing_prefix_len) picks the shortest prefix
//! that still tells the keys of a set apart.

/// FNV-1a 32-bit offset basis.
pub const OFFSET_BASIS: u32 = 2_166_136_261;

/// FNV-1a 32-bit prime.
pub const PRIME: u32 = 16_777_619;

/// A seeded, prefix-truncated FNV-1a hash.
///
/// This is the "imperfect" hash the perfect hash is refined from. It's a pure function of its state
/// and the key, so it can be rebuilt from raw parts in generated code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct Fnv1a {
    /// Offset basis with the seed folded in
    offset: u32,

    /// Maximum number of key bytes to hash, after the length byte
    prefix_len: usize,
}

impl Fnv1a {
    /// Create a hash from a seed.
    ///
    /// The four bytes of `seed` are folded into the offset basis, least significant byte first.
    ///
    /// With `prefix_len == 0`, only the length of the key modulo 256 is hashed. This is only useful if
    /// the truncated lengths of all keys are pairwise distinct.
    #[inline]
    #[must_use]
    pub const fn new(seed: u32, prefix_len: usize) -> Self {
        let seed = seed.to_le_bytes();
        let mut offset = OFFSET_BASIS;
        // No for loops in const fn
        let mut i = 0;
        while i < seed.len() {
            offset = fold(offset, seed[i]);
            i += 1;
        }
        Self { offset, prefix_len }
    }

    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(offset: u32, prefix_len: usize) -> Self {
        Self { offset, prefix_len }
    }

    /// Hash a key.
    ///
    /// Folds in `key.len() % 256`, then the first `prefix_len` bytes of the key, or the whole key if
    /// it's shorter than that.
    #[inline]
    #[must_use]
    pub fn hash(&self, key: &[u8]) -> u32 {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "only the low byte of the length is hashed"
        )]
        let mut sum = fold(self.offset, key.len() as u8);
        for &byte in key.iter().take(self.prefix_len) {
            sum = fold(sum, byte);
        }
        sum
    }

    /// The seeded offset basis.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// The maximum number of key bytes that influence the hash.
    #[inline]
    #[must_use]
    pub const fn prefix_len(&self) -> usize {
        self.prefix_len
    }
}

/// One FNV-1a round.
const fn fold(sum: u32, byte: u8) -> u32 {
    (sum ^ byte as u32).wrapping_mul(PRIME)
}

#[cfg(feature = "codegen")]
impl super::codegen::Codegen for Fnv1a {
    #[inline]
    fn generate_piece(&self, gen: &mut super::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let fnv1a = gen.path("jmptab::hash::Fnv1a");
        let offset = gen.piece(&self.offset);
        let prefix_len = gen.piece(&self.prefix_len);
        quote::quote!(#fnv1a::from_raw_parts(#offset, #prefix_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_folded_little_endian() {
        assert_eq!(Fnv1a::new(0, 0).offset(), 0x4b95_f515);
        assert_eq!(Fnv1a::new(0x0102_0304, 16).offset(), 0x9b35_d555);
    }

    #[test]
    fn known_values() {
        let hash = Fnv1a::new(0x0102_0304, 16);
        assert_eq!(hash.hash(b"amd64"), 0x4d9b_04c0);
        assert_eq!(hash.hash(b""), 0xaabe_d4cf);
    }

    #[test]
    fn only_length_byte_without_prefix() {
        let hash = Fnv1a::new(0xdead_beef, 0);
        assert_eq!(hash.hash(b"abc"), hash.hash(b"xyz"));
        assert_ne!(hash.hash(b"abc"), hash.hash(b"ab"));

        // 257 % 256 == 1
        let long = [b'a'; 257];
        assert_eq!(hash.hash(&long), hash.hash(b"q"));
    }

    #[test]
    fn prefix_truncation() {
        let hash = Fnv1a::new(42, 2);
        assert_eq!(hash.hash(b"abX"), hash.hash(b"abY"));
        assert_ne!(hash.hash(b"aXc"), hash.hash(b"aYc"));

        let full = Fnv1a::new(42, usize::MAX);
        assert_ne!(full.hash(b"abX"), full.hash(b"abY"));
    }

    #[test]
    fn seeds_select_different_functions() {
        assert_ne!(Fnv1a::new(1, 8).hash(b"linux"), Fnv1a::new(2, 8).hash(b"linux"));
        let hash = Fnv1a::new(7, 8);
        assert_eq!(
            Fnv1a::from_raw_parts(hash.offset(), hash.prefix_len()),
            hash
        );
    }
}
