//! Runtime-constructed tables.

use super::{JumpTable, Mphf};
use alloc::vec::Vec;

/// A perfect hash function built in runtime.
pub type OwnedMphf = Mphf<Vec<u8>>;

/// A jump table built in runtime.
pub type OwnedJumpTable<K, V> = JumpTable<K, V, Vec<Option<(K, V)>>, Vec<u8>>;
