// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(dead_code)]

//! # sigscope
//!
//! A cross-platform framework for parsing JVM generic signatures and reifying them into a
//! navigable, canonical type graph. Built in pure Rust, `sigscope` covers the whole path from the
//! `Signature` attribute text of a class file to reflective queries over generic types, without
//! requiring a JVM.
//!
//! ## Features
//!
//! - **Complete signature grammar** - Class, method and field signatures, nested parameterized
//!   types, wildcards and multi-bound type parameters
//! - **Pluggable reification** - Drive any [`metadata::reifier::MetadataFactory`] from a parsed
//!   signature tree
//! - **Canonical types** - Structurally equal types are interned to one instance
//! - **Cycle tolerant** - Self-referential and mutually recursive bounds resolve lazily, in
//!   bounded stack
//! - **Reflection** - Generic supertypes, erasure, substitution, method lookup through
//!   parameterized receivers
//! - **Thread safe** - The registry can be shared and queried from any number of threads
//!
//! ## Quick Start
//!
//! Add `sigscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sigscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! ```rust
//! use sigscope::prelude::*;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let map = TypeBuilder::new(registry.clone(), "java.util.Map")
//!     .interface()
//!     .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
//!     .build()?;
//!
//! let string = registry.get_or_declare("java.lang.String")?;
//! let date = registry.get_or_declare("java.util.Date")?;
//! let instance = registry.make_generic_type(&map, &[string, date])?;
//!
//! assert_eq!(
//!     registry.signature(&instance)?,
//!     "Ljava/util/Map<Ljava/lang/String;Ljava/util/Date;>;"
//! );
//! assert_eq!(registry.erased_signature(&instance)?, "Ljava/util/Map;");
//! # Ok::<(), sigscope::Error>(())
//! ```
//!
//! ### Parsing only
//!
//! ```rust
//! use sigscope::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! let signature = parse_method_signature("<T:Ljava/lang/Object;>([TT;)[TT;")?;
//! assert_eq!(signature.formal_type_parameters[0].name, "T");
//! assert!(matches!(signature.return_type, TypeSignature::Array(_)));
//! # Ok::<(), sigscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Signature grammar, reification and the reflective type system
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Logging
//!
//! `sigscope` reports through the [`log`](https://docs.rs/log) facade: recovered failures (a
//! type argument replaced by `java.lang.Object`, a signature replaced by erased metadata) are
//! logged at `warn`, declarations and resolutions at `debug`, interning at `trace`. No logger is
//! installed by the library.

#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use sigscope::prelude::*;
///
/// let signature = parse_class_signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")?;
/// assert_eq!(signature.formal_type_parameters.len(), 1);
/// # Ok::<(), sigscope::Error>(())
/// ```
pub mod prelude;

/// JVM generic signatures: grammar, reification and reflection
///
/// # Key Components
///
/// ## Signatures
/// - [`metadata::signatures`] - Parser, signature tree and encoder
/// - [`metadata::reifier`] - The `MetadataFactory` trait and the `Reifier` that drives it
///
/// ## Type System
/// - [`metadata::typesystem`] - Registry, resolver, builders and reflective queries
/// - [`metadata::method`] - Method declarations, views and erased definitions
/// - [`metadata::token`] - Registry identity tokens
/// - [`metadata::config`] - Reification settings
pub mod metadata;

/// `sigscope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`crate::Error`].
///
/// # Examples
///
/// ```rust
/// use sigscope::{Result, metadata::signatures::{parse_type_signature, TypeSignature}};
///
/// fn parse_field(text: &str) -> Result<TypeSignature> {
///     parse_type_signature(text)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `sigscope` Error type
///
/// The main error type for all operations in this crate. See [`Error`] for the individual
/// variants.
pub use error::Error;
