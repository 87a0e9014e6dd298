//! Signature encoders producing the canonical JVM signature text.
//!
//! Each encoder is the inverse of the matching parser entry point: for every input the parser
//! accepts, encoding the resulting tree reproduces the input exactly.
//!
//! # Available Encoders
//!
//! - [`encode_class_signature`] - Class declaration signatures
//! - [`encode_method_signature`] - Method and constructor signatures
//! - [`encode_type_signature`] - Field types, single types and return types

use crate::metadata::signatures::{
    ClassSignature, ClassTypeSignature, FormalTypeParameter, MethodTypeSignature, TypeArgument,
    TypeSignature,
};

/// Encodes a single type into `buffer`
fn write_type(signature: &TypeSignature, buffer: &mut String) {
    match signature {
        TypeSignature::Base(base) => buffer.push(base.tag()),
        TypeSignature::Class(class) => write_class_type(class, buffer),
        TypeSignature::TypeVariable(variable) => {
            buffer.push('T');
            buffer.push_str(&variable.name);
            buffer.push(';');
        }
        TypeSignature::Array(array) => {
            buffer.push('[');
            write_type(&array.component, buffer);
        }
    }
}

/// Encodes `Lpkg/Outer<..>.Inner<..>;`
fn write_class_type(signature: &ClassTypeSignature, buffer: &mut String) {
    buffer.push('L');
    for (index, segment) in signature.path().iter().enumerate() {
        if index > 0 {
            buffer.push(if segment.use_dollar { '.' } else { '/' });
        }
        buffer.push_str(&segment.name);

        if !segment.type_arguments.is_empty() {
            buffer.push('<');
            for argument in &segment.type_arguments {
                write_type_argument(argument, buffer);
            }
            buffer.push('>');
        }
    }
    buffer.push(';');
}

fn write_type_argument(argument: &TypeArgument, buffer: &mut String) {
    match argument {
        TypeArgument::Exact(signature) => write_type(signature, buffer),
        TypeArgument::Extends(signature) => {
            buffer.push('+');
            write_type(signature, buffer);
        }
        TypeArgument::Super(signature) => {
            buffer.push('-');
            write_type(signature, buffer);
        }
        TypeArgument::Unbounded => buffer.push('*'),
    }
}

fn write_formal_type_parameters(parameters: &[FormalTypeParameter], buffer: &mut String) {
    if parameters.is_empty() {
        return;
    }

    buffer.push('<');
    for parameter in parameters {
        buffer.push_str(&parameter.name);
        buffer.push(':');
        if let Some(class_bound) = &parameter.class_bound {
            write_type(class_bound, buffer);
        }
        for interface_bound in &parameter.interface_bounds {
            buffer.push(':');
            write_type(interface_bound, buffer);
        }
    }
    buffer.push('>');
}

/// Encodes a class declaration signature
///
/// # Arguments
///
/// * `signature` - The class signature to encode
///
/// # Examples
///
/// ```rust
/// use sigscope::metadata::signatures::{encode_class_signature, parse_class_signature};
///
/// let text = "<T:Ljava/lang/Object;>Ljava/lang/Object;Ljava/lang/Comparable<TT;>;";
/// let signature = parse_class_signature(text)?;
/// assert_eq!(encode_class_signature(&signature), text);
/// # Ok::<(), sigscope::Error>(())
/// ```
#[must_use]
pub fn encode_class_signature(signature: &ClassSignature) -> String {
    let mut buffer = String::new();

    write_formal_type_parameters(&signature.formal_type_parameters, &mut buffer);
    write_class_type(&signature.superclass, &mut buffer);
    for interface in &signature.superinterfaces {
        write_class_type(interface, &mut buffer);
    }

    buffer
}

/// Encodes a method signature, including `^`-prefixed thrown types
///
/// # Arguments
///
/// * `signature` - The method signature to encode
#[must_use]
pub fn encode_method_signature(signature: &MethodTypeSignature) -> String {
    let mut buffer = String::new();

    write_formal_type_parameters(&signature.formal_type_parameters, &mut buffer);
    buffer.push('(');
    for parameter in &signature.parameter_types {
        write_type(parameter, &mut buffer);
    }
    buffer.push(')');
    write_type(&signature.return_type, &mut buffer);
    for thrown in &signature.thrown_types {
        buffer.push('^');
        write_type(thrown, &mut buffer);
    }

    buffer
}

/// Encodes a single type signature
///
/// # Arguments
///
/// * `signature` - The type to encode
#[must_use]
pub fn encode_type_signature(signature: &TypeSignature) -> String {
    let mut buffer = String::new();
    write_type(signature, &mut buffer);
    buffer
}
