//! JVM generic signatures and the types they describe.
//!
//! This module contains the signature grammar, the reification machinery that turns parsed
//! signatures into types, and the reflective type system that owns those types.
//!
//! # Key Components
//!
//! - [`signatures`] - Parser, signature tree and encoder for class, method and field signatures
//! - [`reifier`] - The [`reifier::MetadataFactory`] trait and the [`reifier::Reifier`] driving it
//! - [`typesystem`] - The [`typesystem::TypeRegistry`] and its reflective queries
//! - [`method`] - Method declarations, views through receivers and erased definitions
//! - [`token`] - Identity tokens of registry entries
//! - [`config`] - Strict and lenient reification settings
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use sigscope::metadata::typesystem::{TypeBuilder, TypeRegistry};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! TypeBuilder::new(registry.clone(), "p.A")
//!     .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
//!     .build()?;
//! let b = TypeBuilder::new(registry.clone(), "p.B")
//!     .extends("p.A")
//!     .signature("Lp/A<Lp/C;>;")
//!     .build()?;
//! let c = TypeBuilder::new(registry.clone(), "p.C")
//!     .extends("p.B")
//!     .build()?;
//!
//! let base = registry.resolve_generic_supertype(&b)?.unwrap();
//! assert_eq!(registry.describe(&base)?, "p.A<p.C>");
//! assert_eq!(registry.resolve_generic_supertype(&c)?.unwrap().token, b.token);
//! # Ok::<(), sigscope::Error>(())
//! ```

/// Reification settings
pub mod config;
/// Method declarations, views and erased definitions
pub mod method;
/// The metadata factory trait and the reifier
pub mod reifier;
/// Implementation of class, method and field signatures
pub mod signatures;
/// Registry identity tokens
pub mod token;
/// Implementation of the reflective JVM type system
pub mod typesystem;
