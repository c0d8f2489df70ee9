//! Jump tables generated at build time.

use jmptab::StaticJumpTable;

include!("../fixtures.rs");

/// Index of each operating system in [`GOOS`].
pub static GOOS_TABLE: StaticJumpTable<&str, usize> =
    include!(concat!(env!("OUT_DIR"), "/goos.rs"));

/// Index of each architecture in [`GOARCH`].
pub static GOARCH_TABLE: StaticJumpTable<&str, usize> =
    include!(concat!(env!("OUT_DIR"), "/goarch.rs"));

/// Index of each method in [`HTTP_METHODS`].
pub static HTTP_METHODS_TABLE: StaticJumpTable<&str, usize> =
    include!(concat!(env!("OUT_DIR"), "/http_methods.rs"));

/// Maps `ident_{i}` to `i`.
pub static IDENTIFIERS_TABLE: StaticJumpTable<&str, usize> =
    include!(concat!(env!("OUT_DIR"), "/identifiers.rs"));
