//! Method declarations and their reified signatures.
//!
//! A [`MethodInfo`] is owned by the [`TypeRegistry`] and listed in the `methods` of its declaring
//! class. Its generic signature is reified on first access, in the scope of the method itself:
//! the method's own type parameters first, then those of the declaring class (and, for inner
//! classes, of the enclosing classes).
//!
//! Besides declarations the registry hands out two derived forms:
//!
//! - **Views**, returned by [`TypeRegistry::get_method`] when a method is looked up through a
//!   receiver other than its declaring class. A view reports the receiver's parameterization:
//!   `List<String>.get(int)` returns `String`.
//! - **Erased definitions**, returned by [`TypeRegistry::erased_method_definition`], with every
//!   type erased and no type parameters.
//! - **Generic method instances**, returned by [`TypeRegistry::make_generic_method`], with the
//!   method's own type parameters bound: `<T> T[] toArray(T[])` bound to `String` takes and
//!   returns `String[]`.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use sigscope::metadata::typesystem::{MethodBuilder, TypeBuilder, TypeRegistry};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let list = TypeBuilder::new(registry.clone(), "java.util.List")
//!     .interface()
//!     .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
//!     .method(MethodBuilder::new("get", "(I)Ljava/lang/Object;").signature("(I)TE;"))
//!     .build()?;
//!
//! let string = registry.get_or_declare("java.lang.String")?;
//! let strings = registry.make_generic_type(&list, &[string])?;
//!
//! let int = registry.primitive(sigscope::metadata::signatures::BaseType::Int);
//! let get = registry.get_method(&strings, "get", &[int])?;
//! assert_eq!(registry.method_signature(&get)?, "(I)Ljava/lang/String;");
//! assert_eq!(get.declaring_type()?.token, strings.token);
//! # Ok::<(), sigscope::Error>(())
//! ```

mod generic;
mod lookup;
mod types;

pub use types::*;

use std::sync::{Arc, OnceLock};

use log::warn;

use crate::{
    metadata::{
        reifier::Reifier,
        signatures::{MethodTypeSignature, SignatureParser, TypeSignature},
        token::Token,
        typesystem::{
            JvmTypeRc, JvmTypeRef, MethodBuilder, TypeRegistry, TypeResolver, TypeScope,
        },
    },
    Error::TypeError,
    Result,
};

/// A reference to a `MethodInfo`
pub type MethodRc = Arc<MethodInfo>;
/// A vector that holds a list of `MethodInfo`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;

/// The reified types of a method
#[derive(Debug, Clone)]
pub(crate) struct MethodResolution {
    pub generic_parameters: Vec<JvmTypeRef>,
    /// Bound to `generic_parameters` by position; empty unless the method is a generic instance
    pub type_arguments: Vec<JvmTypeRef>,
    pub parameter_types: Vec<JvmTypeRef>,
    pub return_type: JvmTypeRef,
    pub thrown_types: Vec<JvmTypeRef>,
}

/// Represents a method of a JVM class or interface
pub struct MethodInfo {
    /// Registry token of this method
    pub token: Token,
    /// The method name
    pub name: String,
    /// Access and property flags
    pub flags: MethodAccessFlags,
    /// The erased descriptor, e.g. `([Ljava/lang/Object;)[Ljava/lang/Object;`
    pub descriptor: String,
    /// The generic method signature, if the method has one
    pub signature: Option<String>,
    /// Binary names of the erased thrown types
    pub erased_thrown: Vec<String>,
    /// Declaration, view, erased definition or generic method instance
    pub kind: MethodKind,
    declaring_type: JvmTypeRef,
    reflected_type: JvmTypeRef,
    pub(crate) resolution: OnceLock<MethodResolution>,
    pub(crate) erased_definition: OnceLock<Token>,
}

impl MethodInfo {
    /// The class that declares this method; for views, the receiver it was found through
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if the registry owning the type was dropped
    pub fn declaring_type(&self) -> Result<JvmTypeRc> {
        upgrade!(self.declaring_type)
    }

    /// The type the method was requested from
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if the registry owning the type was dropped
    pub fn reflected_type(&self) -> Result<JvmTypeRc> {
        upgrade!(self.reflected_type)
    }

    /// Returns `true` for static methods
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodAccessFlags::STATIC)
    }

    /// Returns `true` for abstract methods
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodAccessFlags::ABSTRACT)
    }

    /// Returns `true` for variable arity methods
    #[must_use]
    pub fn is_varargs(&self) -> bool {
        self.flags.contains(MethodAccessFlags::VARARGS)
    }

    /// Returns `true` for constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    /// Returns `true` for erased definitions
    #[must_use]
    pub fn is_erased(&self) -> bool {
        matches!(self.kind, MethodKind::ErasedDefinition { .. })
    }

    /// The token of the declaration behind this method (its own token for declarations)
    #[must_use]
    pub fn definition_token(&self) -> Token {
        self.kind.definition().unwrap_or(self.token)
    }
}

impl std::fmt::Debug for MethodInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodInfo")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

fn is_erased_type(signature: &TypeSignature) -> bool {
    match signature {
        TypeSignature::Base(_) => true,
        TypeSignature::Class(class) => !class.is_parameterized(),
        TypeSignature::TypeVariable(_) => false,
        TypeSignature::Array(array) => is_erased_type(&array.component),
    }
}

/// Parse a method descriptor, which is a method signature without any generic part
///
/// ## Arguments
/// * 'descriptor' - The descriptor text, e.g. `(I)Ljava/lang/Object;`
/// * 'max_depth'  - Nesting limit for array dimensions
///
/// # Errors
/// Returns [`crate::Error::Malformed`] for invalid descriptors, including ones that use
/// generic syntax
pub fn parse_descriptor(descriptor: &str, max_depth: usize) -> Result<MethodTypeSignature> {
    let parsed = SignatureParser::with_max_depth(descriptor, max_depth).parse_method_signature()?;

    let erased = parsed.formal_type_parameters.is_empty()
        && parsed.thrown_types.is_empty()
        && parsed.parameter_types.iter().all(is_erased_type)
        && is_erased_type(&parsed.return_type);
    if !erased {
        return Err(malformed_error!(
            "Descriptor uses generic syntax - '{}'",
            descriptor
        ));
    }

    Ok(parsed)
}

fn to_refs(types: &[JvmTypeRc]) -> Vec<JvmTypeRef> {
    types.iter().map(JvmTypeRef::new).collect()
}

fn upgrade_all(refs: &[JvmTypeRef]) -> Result<Vec<JvmTypeRc>> {
    refs.iter().map(|r| upgrade!(r)).collect()
}

impl TypeRegistry {
    /// Register a method declared by `ty`; the caller lists it in `ty.methods`
    pub(crate) fn declare_method(
        &self,
        ty: &JvmTypeRc,
        method: MethodBuilder,
    ) -> Result<MethodRc> {
        self.insert_method(|token| MethodInfo {
            token,
            name: method.name,
            flags: method.flags,
            descriptor: method.descriptor,
            signature: method.signature,
            erased_thrown: method.thrown,
            kind: MethodKind::Definition,
            declaring_type: JvmTypeRef::new(ty),
            reflected_type: JvmTypeRef::new(ty),
            resolution: OnceLock::new(),
            erased_definition: OnceLock::new(),
        })
    }

    /// Register a derived method (view, erased definition or generic method instance) with its
    /// types already resolved
    pub(crate) fn insert_derived_method(
        &self,
        definition: &MethodInfo,
        kind: MethodKind,
        declaring_type: &JvmTypeRc,
        reflected_type: &JvmTypeRc,
        resolution: MethodResolution,
    ) -> Result<MethodRc> {
        self.insert_method(|token| {
            let derived = MethodInfo {
                token,
                name: definition.name.clone(),
                flags: definition.flags,
                descriptor: definition.descriptor.clone(),
                signature: definition.signature.clone(),
                erased_thrown: definition.erased_thrown.clone(),
                kind,
                declaring_type: JvmTypeRef::new(declaring_type),
                reflected_type: JvmTypeRef::new(reflected_type),
                resolution: OnceLock::new(),
                erased_definition: OnceLock::new(),
            };
            let _ = derived.resolution.set(resolution);
            derived
        })
    }

    /// The reified types of a method, resolving its signature on first access
    pub(crate) fn method_resolution<'m>(
        &self,
        method: &'m MethodInfo,
    ) -> Result<&'m MethodResolution> {
        if let Some(resolution) = method.resolution.get() {
            return Ok(resolution);
        }

        let resolution = self.resolve_method(method)?;
        let _ = method.resolution.set(resolution);

        method
            .resolution
            .get()
            .ok_or_else(|| TypeError(format!("Failed to resolve method {}", method.name)))
    }

    fn resolve_method(&self, method: &MethodInfo) -> Result<MethodResolution> {
        let depth = self.config.max_recursion_depth;

        let generic = match &method.signature {
            Some(signature) => {
                match self.reify_method_declaration(method, signature, depth) {
                    Ok(resolution) => Some(resolution),
                    Err(error) => {
                        warn!(
                            "Using descriptor of method {} - unusable signature '{}': {}",
                            method.name, signature, error
                        );
                        None
                    }
                }
            }
            None => None,
        };

        let mut resolution = match generic {
            Some(resolution) => resolution,
            None => {
                let parsed = parse_descriptor(&method.descriptor, depth)?;
                let mut resolver = TypeResolver::new(self);
                let reified =
                    Reifier::with_config(&mut resolver, self.config).reify_method_signature(&parsed)?;

                MethodResolution {
                    generic_parameters: Vec::new(),
                    type_arguments: Vec::new(),
                    parameter_types: to_refs(&reified.parameter_types),
                    return_type: JvmTypeRef::new(&reified.return_type),
                    thrown_types: Vec::new(),
                }
            }
        };

        if resolution.thrown_types.is_empty() {
            for name in &method.erased_thrown {
                resolution
                    .thrown_types
                    .push(JvmTypeRef::new(&self.get_or_declare(name)?));
            }
        }

        Ok(resolution)
    }

    fn reify_method_declaration(
        &self,
        method: &MethodInfo,
        signature: &str,
        depth: usize,
    ) -> Result<MethodResolution> {
        let parsed = SignatureParser::with_max_depth(signature, depth).parse_method_signature()?;

        let mut resolver = TypeResolver::for_declaration(self, TypeScope::Method(method.token));
        let reified =
            Reifier::with_config(&mut resolver, self.config).reify_method_signature(&parsed)?;

        Ok(MethodResolution {
            generic_parameters: to_refs(&reified.generic_parameters),
            type_arguments: Vec::new(),
            parameter_types: to_refs(&reified.parameter_types),
            return_type: JvmTypeRef::new(&reified.return_type),
            thrown_types: to_refs(&reified.thrown_types),
        })
    }

    /// The formal type parameters of a method
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_generic_parameters(&self, method: &MethodInfo) -> Result<Vec<JvmTypeRc>> {
        upgrade_all(&self.method_resolution(method)?.generic_parameters)
    }

    /// The parameter types of a method, in declaration order
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_parameter_types(&self, method: &MethodInfo) -> Result<Vec<JvmTypeRc>> {
        upgrade_all(&self.method_resolution(method)?.parameter_types)
    }

    /// The return type of a method, `void` included
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_return_type(&self, method: &MethodInfo) -> Result<JvmTypeRc> {
        upgrade!(self.method_resolution(method)?.return_type)
    }

    /// The thrown types of a method
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_thrown_types(&self, method: &MethodInfo) -> Result<Vec<JvmTypeRc>> {
        upgrade_all(&self.method_resolution(method)?.thrown_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{config::ReificationConfig, signatures::BaseType, typesystem::TypeBuilder},
        Error,
    };

    #[test]
    fn descriptor_rejects_generic_syntax() {
        assert!(parse_descriptor("([Ljava/lang/Object;)V", 50).is_ok());
        assert!(parse_descriptor("()I", 50).is_ok());

        for generic in [
            "<T:Ljava/lang/Object;>()V",
            "(TT;)V",
            "()Ljava/util/List<*>;",
            "()V^Ljava/io/IOException;",
        ] {
            assert!(
                matches!(parse_descriptor(generic, 50), Err(Error::Malformed { .. })),
                "{generic}"
            );
        }
    }

    #[test]
    fn method_scope_sees_class_parameters() {
        let registry = Arc::new(TypeRegistry::new());
        let map = TypeBuilder::new(registry.clone(), "java.util.Map")
            .interface()
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(
                MethodBuilder::new("put", "(Ljava/lang/Object;Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("(TK;TV;)TV;"),
            )
            .method(
                MethodBuilder::new("apply", "(Ljava/lang/Object;)Ljava/lang/Object;")
                    .signature("<R:Ljava/lang/Object;>(TK;)TR;")
                    .throws("java.io.IOException"),
            )
            .build()
            .unwrap();

        let methods: Vec<MethodRc> = map.methods.iter().map(|(_, m)| m.clone()).collect();
        let put = &methods[0];
        assert_eq!(registry.method_signature(put).unwrap(), "(TK;TV;)TV;");
        assert!(registry.method_generic_parameters(put).unwrap().is_empty());

        let class_parameters = registry.generic_parameters(&map).unwrap();
        let put_parameters = registry.method_parameter_types(put).unwrap();
        assert!(Arc::ptr_eq(&put_parameters[0], &class_parameters[0]));

        let apply = &methods[1];
        assert_eq!(
            registry.method_signature(apply).unwrap(),
            "<R:Ljava/lang/Object;>(TK;)TR;^Ljava/io/IOException;"
        );
        assert_eq!(
            registry.method_erased_signature(apply).unwrap(),
            "(Ljava/lang/Object;)Ljava/lang/Object;"
        );
        assert_eq!(
            registry.method_thrown_types(apply).unwrap()[0].fullname(),
            "java.io.IOException"
        );
        assert_eq!(apply.declaring_type().unwrap().token, map.token);
    }

    #[test]
    fn unusable_signature_falls_back_to_descriptor() {
        let registry = Arc::new(TypeRegistry::new());
        let holder = TypeBuilder::new(registry.clone(), "p.Holder")
            .method(MethodBuilder::new("size", "()I").signature("(TMissing;"))
            .build()
            .unwrap();

        let size = holder.methods.iter().next().map(|(_, m)| m.clone()).unwrap();
        assert_eq!(registry.method_signature(&size).unwrap(), "()I");
        assert_eq!(
            registry.method_return_type(&size).unwrap().token,
            registry.primitive(BaseType::Int).token
        );
    }

    #[test]
    fn strict_unresolved_variable_falls_back_to_descriptor() {
        let registry = Arc::new(TypeRegistry::with_config(ReificationConfig::strict()));
        let holder = TypeBuilder::new(registry.clone(), "p.Holder")
            .method(MethodBuilder::new("first", "()Ljava/lang/Object;").signature("()TMissing;"))
            .build()
            .unwrap();

        let first = holder.methods.iter().next().map(|(_, m)| m.clone()).unwrap();
        assert_eq!(
            registry.method_signature(&first).unwrap(),
            "()Ljava/lang/Object;"
        );
        assert!(!first.is_static());
        assert_eq!(first.definition_token(), first.token);
    }
}
