//! Compile-time constructed tables.

use super::{JumpTable, Mphf};

/// A perfect hash function with static shifts, as emitted by [`codegen`](crate::codegen).
pub type StaticMphf = Mphf<&'static [u8]>;

/// A jump table with static storage, as emitted by [`codegen`](crate::codegen).
pub type StaticJumpTable<K, V> = JumpTable<K, V, &'static [Option<(K, V)>], &'static [u8]>;
