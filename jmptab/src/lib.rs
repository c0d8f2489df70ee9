//! Near-minimal perfect hash jump tables for fixed sets of string keys.
//!
//! Given a key set known ahead of time, this crate searches for a hash function that maps every key
//! to its own slot of a table only slightly larger than the key set. The result is meant for O(1)
//! multi-way dispatch, e.g. replacing a large `match` on strings with a single table lookup.
//!
//! The construction follows the "compress, hash, displace" family of algorithms:
//!
//! 1. The keys are hashed with a seeded 32-bit [FNV-1a](hash::Fnv1a), only looking at as many
//!    leading bytes as necessary to tell the keys apart.
//! 2. Seeds are drawn until the full 32-bit hashes are collision-free.
//! 3. Hashes are split into buckets by their low bits. Buckets are placed into the table largest
//!    first, each one picking a shift such that `((hash >> shift) ^ hash) & mask` lands every key
//!    of the bucket on a free slot.
//!
//! Construction is randomized and allowed to fail. [`Builder`] retries within a bounded budget and
//! reports [`BuildError`] when it runs out.
//!
//!
//! # Usage
//!
//! Tables can be built at runtime with [`Builder`], or in `build.rs` and then translated to code
//! with [`codegen`] and `include!`d, in which case the lookup side does not need the `build`
//! feature at all.
//!
//! Lookups on a [`JumpTable`] always compare the stored key with the probed one, so keys outside
//! the training set are reported as missing. [`Mphf::index_of`] does no such check and may return
//! any index for foreign keys.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "build")]
pub(crate) mod bitmap;
#[cfg(feature = "build")]
mod builder;
#[cfg(feature = "codegen")]
pub mod codegen;
mod constant;
pub mod hash;
#[cfg(feature = "build")]
pub mod keys;
mod mphf;
#[cfg(feature = "build")]
pub mod placement;
#[cfg(feature = "alloc")]
mod runtime;
#[cfg(feature = "build")]
pub(crate) mod scatter;
#[cfg(feature = "build")]
pub mod search;
mod table;

#[cfg(feature = "build")]
pub use builder::{BuildError, Builder};
pub use constant::{StaticJumpTable, StaticMphf};
pub use mphf::Mphf;
#[cfg(feature = "alloc")]
pub use runtime::{OwnedJumpTable, OwnedMphf};
pub use table::JumpTable;

#[cfg(all(test, feature = "build"))]
mod tests;
