//! # sigscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the sigscope library. Import this module to get quick access to the essential
//! types for signature parsing and generic type reflection.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all sigscope operations
pub use crate::Error;

/// The result type used throughout sigscope
pub use crate::Result;

/// Reification settings
pub use crate::metadata::config::{ArgumentPolicy, ReificationConfig};

/// Registry identity tokens
pub use crate::metadata::token::Token;

// ================================================================================================
// Signatures
// ================================================================================================

/// Parsing entry points
pub use crate::metadata::signatures::{
    parse_class_signature, parse_field_signature, parse_method_signature, parse_type_signature,
};

/// Encoding entry points
pub use crate::metadata::signatures::{
    encode_class_signature, encode_method_signature, encode_type_signature,
};

/// The signature tree
pub use crate::metadata::signatures::{
    BaseType, ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodTypeSignature,
    SignatureParser, SimpleClassTypeSignature, TypeArgument, TypeSignature,
};

// ================================================================================================
// Reification
// ================================================================================================

/// Factory trait and the reifier driving it
pub use crate::metadata::reifier::{MetadataFactory, Reifier};

// ================================================================================================
// Type System
// ================================================================================================

/// Core type representations
pub use crate::metadata::typesystem::{
    ClassAccessFlags, JvmFlavor, JvmType, JvmTypeRc, JvmTypeRef, TypeBindings, TypeScope,
};

/// Registry, resolution and declarations
pub use crate::metadata::typesystem::{MethodBuilder, TypeBuilder, TypeRegistry, TypeResolver};

/// Methods
pub use crate::metadata::method::{MethodAccessFlags, MethodInfo, MethodKind, MethodRc};
