use super::Mphf;
use core::marker::PhantomData;
use core::ops::Deref;

/// A jump table: a perfect hash map from byte-string keys to payloads.
///
/// Each key of the training set occupies its own slot, at the index given by the underlying
/// [`Mphf`]. All lookups compare the stored key with the probed one, so keys outside the training
/// set are reported as missing rather than aliased to another key's payload.
///
/// `C` and `S` are the storages of slots and shifts respectively. Use [`OwnedJumpTable`] for tables
/// built in runtime and [`StaticJumpTable`] for generated code.
///
/// [`OwnedJumpTable`]: crate::OwnedJumpTable
/// [`StaticJumpTable`]: crate::StaticJumpTable
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct JumpTable<K, V, C, S> {
    /// Maps keys to slot indices
    mphf: Mphf<S>,

    /// `capacity()` slots, `None` where no key landed
    slots: C,

    /// Number of occupied slots
    len: usize,

    /// Keys and payloads only live in `slots`
    marker: PhantomData<(K, V)>,
}

impl<K, V, C, S> JumpTable<K, V, C, S>
where
    K: AsRef<[u8]>,
    C: Deref<Target = [Option<(K, V)>]>,
    S: Deref<Target = [u8]>,
{
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(mphf: Mphf<S>, slots: C, len: usize) -> Self {
        Self {
            mphf,
            slots,
            len,
            marker: PhantomData,
        }
    }

    /// Get a key-payload pair by key.
    #[inline]
    pub fn get_key_value<Q: ?Sized + AsRef<[u8]>>(&self, key: &Q) -> Option<(&K, &V)> {
        let key = key.as_ref();
        self.slots
            .get(self.mphf.index_of(key))?
            .as_ref()
            .filter(|(k, _)| k.as_ref() == key)
            .map(|(k, v)| (k, v))
    }

    /// Get a payload by key.
    #[inline]
    pub fn get<Q: ?Sized + AsRef<[u8]>>(&self, key: &Q) -> Option<&V> {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Check if the table contains a key.
    #[inline]
    pub fn contains_key<Q: ?Sized + AsRef<[u8]>>(&self, key: &Q) -> bool {
        self.get_key_value(key).is_some()
    }

    /// Get the slot index of a key, if it is present.
    #[inline]
    pub fn position<Q: ?Sized + AsRef<[u8]>>(&self, key: &Q) -> Option<usize> {
        let key = key.as_ref();
        let index = self.mphf.index_of(key);
        self.slots
            .get(index)?
            .as_ref()
            .filter(|(k, _)| k.as_ref() == key)
            .map(|_| index)
    }

    /// Get number of entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the table is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the number of slots, occupied or not.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.mphf.capacity()
    }

    /// The perfect hash function indexing this table.
    #[inline]
    pub const fn mphf(&self) -> &Mphf<S> {
        &self.mphf
    }

    /// All slots in index order, including empty ones.
    #[inline]
    pub fn slots(&self) -> &[Option<(K, V)>] {
        &self.slots
    }

    /// Iterate through entries.
    ///
    /// The iteration order is unspecified, but is constant for a given table.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .filter_map(|pair| pair.as_ref().map(|(k, v)| (k, v)))
    }

    /// Iterate through keys.
    ///
    /// The iteration order is unspecified, but is constant for a given table.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    /// Iterate through payloads.
    ///
    /// The iteration order is unspecified, but is constant for a given table.
    #[inline]
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

#[cfg(feature = "build")]
impl<K: AsRef<[u8]>, V> JumpTable<K, V, alloc::vec::Vec<Option<(K, V)>>, alloc::vec::Vec<u8>> {
    /// Fill a table for `mphf` with entries.
    ///
    /// `mphf` must be perfect over the keys of `entries`. If a key occurs more than once, the first
    /// entry wins.
    pub(crate) fn from_mphf(
        mphf: Mphf<alloc::vec::Vec<u8>>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        let mut slots: alloc::vec::Vec<Option<(K, V)>> =
            (0..mphf.capacity()).map(|_| None).collect();
        let len = super::scatter::scatter(
            entries,
            |(key, _)| mphf.index_of(key.as_ref()),
            &mut slots,
        );
        Self::from_raw_parts(mphf, slots, len)
    }
}

#[cfg(feature = "codegen")]
impl<K, V, C, S> crate::codegen::Codegen for JumpTable<K, V, C, S>
where
    K: AsRef<[u8]> + crate::codegen::Codegen,
    V: crate::codegen::Codegen,
    C: Deref<Target = [Option<(K, V)>]>,
    S: Deref<Target = [u8]>,
{
    #[inline]
    fn generate_piece(&self, gen: &mut crate::codegen::CodeGenerator) -> proc_macro2::TokenStream {
        let static_table = gen.path("jmptab::StaticJumpTable");
        let mphf = gen.piece(&self.mphf);
        let slots = gen.piece(&&*self.slots);
        let len = gen.piece(&self.len);
        quote::quote!(#static_table::from_raw_parts(#mphf, #slots, #len))
    }
}
