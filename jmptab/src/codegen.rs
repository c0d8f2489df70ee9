//! Code generation.
//!
//! This module is useful for building jump tables in `build.rs` and embedding them into the final
//! binary, so that no construction happens in runtime.
//!
//! Scalars, tuples, strings, byte strings, and the types of this crate can be codegen-ed. For your
//! own payloads, you'll need to implement the [`Codegen`] trait manually.
//!
//! The generated expression has type [`StaticJumpTable`](crate::StaticJumpTable) (or
//! [`StaticMphf`](crate::StaticMphf)) and can initialize a `static`.
//!
//! # Example
//!
//! ```rust
//! # fn main() -> std::io::Result<()> {
//! // Create a jump table
//! let table = jmptab::Builder::new()
//!     .build_table(vec![("GET", 1u8), ("PUT", 2u8)])
//!     .expect("construction failed");
//!
//! // Convert to code
//! let code = jmptab::codegen::CodeGenerator::new().generate(&table);
//!
//! // `code` can now be saved to an `.rs` file and then loaded with
//! // `static TABLE: jmptab::StaticJumpTable<&str, u8> = include!(...);`
//! # Ok(())
//! # }
//! ```

use proc_macro2::{Ident, Literal, TokenStream, TokenTree};
use quote::{format_ident, quote};
use std::borrow::ToOwned;
use std::collections::{HashMap, HashSet};
use std::format;
use std::string::String;
use std::vec::Vec;

/// Code generator.
pub struct CodeGenerator {
    crate_paths: HashMap<String, TokenStream>,
    path_to_alias: HashMap<String, Ident>,
    aliases: HashSet<String>,
}

impl CodeGenerator {
    /// Create a code generator with default settings.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            crate_paths: HashMap::from([("jmptab".into(), quote!(::jmptab))]),
            path_to_alias: HashMap::new(),
            aliases: HashSet::new(),
        }
    }

    /// Configure name-to-path mapping for crates.
    ///
    /// By default, `jmptab` is mapped to `::jmptab`. Reconfiguring this might be necessary if the
    /// crate is renamed or reexported by the consumer.
    #[inline]
    pub fn with_crate(&mut self, name: &str, path: TokenStream) {
        self.crate_paths.insert(name.into(), path);
    }

    /// Turn a value into code.
    #[inline]
    #[allow(clippy::missing_panics_doc, reason = "false positive")]
    pub fn generate<T: ?Sized + Codegen>(mut self, value: &T) -> TokenStream {
        let value = self.piece(value);

        let mut uses = Vec::new();
        // Sorted so that the output is reproducible
        let mut aliases: Vec<(String, Ident)> =
            core::mem::take(&mut self.path_to_alias).into_iter().collect();
        aliases.sort_by(|a, b| a.0.cmp(&b.0));
        for (path, alias) in aliases {
            let mut components = path.split("::");

            let crate_name = components.next().unwrap();
            let crate_path = if let Some(crate_path) = self.crate_paths.get(crate_name) {
                crate_path.clone()
            } else {
                let ident = format_ident!("{crate_name}");
                quote!(:: #ident)
            };
            let components = components.map(|component| format_ident!("{component}"));

            uses.push(quote!(use #crate_path #(:: #components)* as #alias;));
        }

        quote!(
            {
                #(#uses)*
                #value
            }
        )
    }

    /// Turn a value into a recursively useable piece of code.
    #[inline]
    pub fn piece<T: ?Sized + Codegen>(&mut self, piece: &T) -> TokenStream {
        piece.generate_piece(self)
    }

    /// Resolve a path.
    ///
    /// The input string must look like `crate::path::inside::it`, or just `crate`. Semantically,
    /// this path must be `use`able. This is different from using the path directly for two reasons:
    ///
    /// - This method resolves crates according to the paths configured by
    ///   [`CodeGenerator::with_crate`].
    /// - This method replaces long paths with short aliases imported just once with `use`, reducing
    ///   code size.
    #[inline]
    #[allow(
        clippy::maybe_infinite_iter,
        clippy::missing_panics_doc,
        reason = "false positive"
    )]
    pub fn path(&mut self, path: &str) -> TokenStream {
        if let Some(alias) = self.path_to_alias.get(path) {
            return quote!(#alias);
        }

        let mut alias = format!("__{}", path.rsplit_once("::").unwrap_or(("", path)).1);
        if self.aliases.contains(&alias) {
            alias = (2usize..)
                .map(|n| format!("{alias}{n}"))
                .find(|attempt| !self.aliases.contains(attempt))
                .unwrap();
        }
        self.aliases.insert(alias.clone());

        let alias = format_ident!("{alias}");
        self.path_to_alias.insert(path.to_owned(), alias.clone());
        quote!(#alias)
    }
}

impl Default for CodeGenerator {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// Values that can be turned into code.
pub trait Codegen {
    /// Emit a piece of code corresponding to this value.
    ///
    /// This method is only supposed to be called recursively from [`Codegen`] implementations. Call
    /// [`CodeGenerator::generate`] to produce the complete code output for a single value.
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream;
}

macro_rules! literal {
    ($($ty:ty => $method:ident,)*) => {
        $(
            impl Codegen for $ty {
                #[inline]
                fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
                    TokenTree::Literal(Literal::$method(*self)).into()
                }
            }
        )*
    };
}

literal! {
    u8 => u8_suffixed,
    u16 => u16_suffixed,
    u32 => u32_suffixed,
    u64 => u64_suffixed,
    usize => usize_suffixed,
    i8 => i8_suffixed,
    i16 => i16_suffixed,
    i32 => i32_suffixed,
    i64 => i64_suffixed,
    isize => isize_suffixed,
    char => character,
}

impl Codegen for bool {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        TokenTree::Ident(format_ident!("{self}")).into()
    }
}

/// Emitted as a place expression, so that `&` in [`&T`](Codegen#impl-Codegen-for-%26T) yields
/// `&str`.
impl Codegen for str {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        let literal = Literal::string(self);
        quote!(*#literal)
    }
}

impl<T: Codegen> Codegen for [T] {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let elements = self.iter().map(|element| gen.piece(element));
        quote!([#(#elements),*])
    }
}

impl<T: ?Sized + Codegen> Codegen for &T {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        if let Some(bytes) = as_byte_slice(*self) {
            let bytes = Literal::byte_string(bytes);
            quote!(#bytes as &[u8])
        } else {
            let target = gen.piece(*self);
            quote!(&#target)
        }
    }
}

fn as_byte_slice<T: ?Sized>(object: &T) -> Option<&[u8]> {
    if typeid::of::<T>() == typeid::of::<[u8]>() {
        // SAFETY: `T` is `[u8]`, so this is an identity transmute of a fat pointer.
        Some(unsafe { core::mem::transmute_copy::<&T, &[u8]>(&object) })
    } else {
        None
    }
}

impl<T: Codegen> Codegen for Option<T> {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        match &self {
            None => gen.path("core::option::Option::None"),
            Some(value) => {
                let some = gen.path("core::option::Option::Some");
                let value = gen.piece(value);
                quote!(#some(#value))
            }
        }
    }
}

impl Codegen for () {
    #[inline]
    fn generate_piece(&self, _gen: &mut CodeGenerator) -> TokenStream {
        quote!(())
    }
}

impl<T: Codegen, U: ?Sized + Codegen> Codegen for (T, U) {
    #[inline]
    fn generate_piece(&self, gen: &mut CodeGenerator) -> TokenStream {
        let a = gen.piece(&self.0);
        let b = gen.piece(&self.1);
        quote!((#a, #b))
    }
}
