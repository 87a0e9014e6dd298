//! Generic signature parsing for JVM class-file metadata.
//!
//! This module parses the signature mini-language carried by the `Signature` attribute of
//! classes, methods and fields (JVMS §4.7.9.1) into an immutable tree of signature nodes, and
//! encodes such trees back into their canonical text.
//!
//! # Signature Types
//!
//! - **Class Signatures** - Formal type parameters, superclass and superinterfaces
//! - **Method Signatures** - Formal type parameters, parameter types, return type, thrown types
//! - **Field Signatures** - A class type, type variable or array type
//! - **Type Signatures** - Any single type including base types and `V`
//!
//! Plain descriptors (`(I)V`, `[Ljava/lang/String;`) are generic-free signatures and parse with
//! the same entry points, which is how erased metadata is read.
//!
//! # Grammar
//!
//! ```text
//! ClassSignature      := FormalTypeParameters? ClassTypeSignature ClassTypeSignature*
//! MethodTypeSignature := FormalTypeParameters? '(' TypeSignature* ')' ReturnType ('^' Thrown)*
//! FormalTypeParameter := Identifier ':' FieldTypeSignature? (':' FieldTypeSignature)*
//! ClassTypeSignature  := 'L' (Identifier '/')* Simple ('.' Simple)* ';'
//! Simple              := Identifier TypeArguments?
//! TypeArgument        := ('+' | '-')? FieldTypeSignature | '*'
//! ```
//!
//! # Examples
//!
//! ```rust
//! use sigscope::metadata::signatures::{parse_method_signature, TypeSignature};
//!
//! let method_sig = parse_method_signature("<T:Ljava/lang/Object;>([TT;)[TT;")?;
//! assert_eq!(method_sig.formal_type_parameters[0].name, "T");
//! assert!(matches!(method_sig.return_type, TypeSignature::Array(_)));
//! # Ok::<(), sigscope::Error>(())
//! ```
//!
//! ```rust
//! use sigscope::metadata::signatures::parse_field_signature;
//!
//! let field_sig = parse_field_signature("Ljava/util/Map<Ljava/lang/String;Ljava/util/Date;>;")?;
//! assert_eq!(field_sig.to_string(), "Ljava/util/Map<Ljava/lang/String;Ljava/util/Date;>;");
//! # Ok::<(), sigscope::Error>(())
//! ```

mod encoders;
mod parser;
mod types;

pub use encoders::*;
pub use parser::*;
pub use types::*;

use crate::Result;

/// Parse a `ClassSignature` from its text
///
/// ## Arguments
/// * 'signature' - The input text to parse
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_class_signature(signature: &str) -> Result<ClassSignature> {
    let mut parser = SignatureParser::new(signature);
    parser.parse_class_signature()
}

/// Parse a `MethodTypeSignature` (or a plain method descriptor) from its text
///
/// ## Arguments
/// * 'signature' - The input text to parse
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_method_signature(signature: &str) -> Result<MethodTypeSignature> {
    let mut parser = SignatureParser::new(signature);
    parser.parse_method_signature()
}

/// Parse any single type, including base types and `V`
///
/// ## Arguments
/// * 'signature' - The input text to parse
///
/// # Errors
/// Returns an error if the signature is malformed
pub fn parse_type_signature(signature: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::new(signature);
    parser.parse_type_signature()
}

/// Parse a `FieldTypeSignature` (class type, type variable or array)
///
/// ## Arguments
/// * 'signature' - The input text to parse
///
/// # Errors
/// Returns an error if the signature is malformed or names a base type
pub fn parse_field_signature(signature: &str) -> Result<TypeSignature> {
    let mut parser = SignatureParser::new(signature);
    parser.parse_field_signature()
}
