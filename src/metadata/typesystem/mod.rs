//! Reflective JVM type system built from generic signatures.
//!
//! This module provides the consumer side of signature reification: a registry of canonical
//! types, the scope-bound [`MetadataFactory`](crate::metadata::reifier::MetadataFactory) that
//! feeds it, and the reflective queries (supertypes, subtyping, erasure, substitution,
//! formatting) built on top of it.
//!
//! # Key Components
//!
//! - [`JvmType`]: Core type representation for classes, instances, arrays, variables and wildcards
//! - [`TypeRegistry`]: Central registry owning and interning all types and methods
//! - [`TypeResolver`]: Registry-backed metadata factory bound to one declaration scope
//! - [`TypeBuilder`]: Builder for declaring classes and their methods
//!
//! # Lazy Resolution
//!
//! Declaring a class never parses its signature. Named types are registered under their binary
//! name first, so signatures that mention a class before (or while) it is resolved always find
//! the same instance. A class's generic parameters, superclass and interfaces are reified on
//! first access; type variables are created as placeholders whose bounds are reified on first
//! access. This keeps cyclic declarations such as
//!
//! ```text
//! class A<T>
//! class B extends A<C>
//! class C extends B
//! ```
//!
//! resolvable in bounded stack.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use sigscope::metadata::typesystem::{TypeBuilder, TypeRegistry};
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
//!     .signature("<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;")
//!     .build()?;
//!
//! let base = registry.resolve_generic_supertype(&list)?.unwrap();
//! assert_eq!(registry.signature(&base)?, "Ljava/util/AbstractList<TE;>;");
//! assert_eq!(registry.describe(&base)?, "java.util.AbstractList<E>");
//! # Ok::<(), sigscope::Error>(())
//! ```

mod assignability;
mod base;
mod builder;
mod erasure;
mod formatting;
mod hierarchy;
mod registry;
mod resolver;

use std::sync::{Arc, OnceLock};

pub use base::{
    ClassAccessFlags, ClassDeclaration, JvmFlavor, JvmTypeRef, JvmTypeRefList, TypeScope,
};
pub use builder::{MethodBuilder, TypeBuilder};
pub use erasure::TypeBindings;
pub use registry::TypeRegistry;
pub use resolver::{ReifiedClassSignature, ReifiedMethodSignature, TypeResolver};

pub(crate) use base::{ClassResolution, TypeKey, TypeVariableBounds};
pub(crate) use registry::{GenericMethodKey, MethodViewKey};

use crate::metadata::{
    method::MethodList,
    signatures::{BaseType, FormalTypeParameter},
    token::Token,
};

/// Reference to a `JvmType`
pub type JvmTypeRc = Arc<JvmType>;

/// Represents a type known to the `TypeRegistry`
///
/// Classes carry their declaration (once built) and their lazily resolved generic view. Every
/// other flavor is an interned, immutable combination of other types.
pub struct JvmType {
    /// Token
    pub token: Token,
    /// The `JvmFlavor`
    pub flavor: JvmFlavor,
    /// Dotted package name, empty for primitives and the default package
    pub package: String,
    /// Name without package; nested classes keep their `$`-joined binary name (`Map$Entry`)
    pub name: String,
    /// All methods this type declares
    pub methods: MethodList,
    /// All types that are lexically nested in this type
    pub nested_types: JvmTypeRefList,
    pub(crate) declaration: OnceLock<ClassDeclaration>,
    pub(crate) resolution: OnceLock<ClassResolution>,
    pub(crate) bounds: OnceLock<TypeVariableBounds>,
    pub(crate) erasure: OnceLock<JvmTypeRef>,
}

impl JvmType {
    fn with_flavor(token: Token, flavor: JvmFlavor, package: String, name: String) -> Self {
        JvmType {
            token,
            flavor,
            package,
            name,
            methods: Arc::new(boxcar::Vec::new()),
            nested_types: Arc::new(boxcar::Vec::new()),
            declaration: OnceLock::new(),
            resolution: OnceLock::new(),
            bounds: OnceLock::new(),
            erasure: OnceLock::new(),
        }
    }

    /// Create a new named class type
    ///
    /// ## Arguments
    /// * 'token'       - The registry token
    /// * 'binary_name' - Dotted binary name, split at the last `.` into package and name
    #[must_use]
    pub fn new_class(token: Token, binary_name: &str) -> Self {
        let (package, name) = match binary_name.rfind('.') {
            Some(split) => (&binary_name[..split], &binary_name[split + 1..]),
            None => ("", binary_name),
        };

        Self::with_flavor(token, JvmFlavor::Class, package.to_string(), name.to_string())
    }

    /// Create a new primitive type
    #[must_use]
    pub fn new_primitive(token: Token, kind: BaseType) -> Self {
        Self::with_flavor(
            token,
            JvmFlavor::Primitive(kind),
            String::new(),
            kind.keyword().to_string(),
        )
    }

    /// Create a new type that shares its name with `definition` (instances and raw views)
    pub(crate) fn new_derived(token: Token, flavor: JvmFlavor, definition: &JvmType) -> Self {
        Self::with_flavor(
            token,
            flavor,
            definition.package.clone(),
            definition.name.clone(),
        )
    }

    /// Create a new structural type (array, wildcard, type variable) with a display name
    pub(crate) fn new_structural(token: Token, flavor: JvmFlavor, name: String) -> Self {
        Self::with_flavor(token, flavor, String::new(), name)
    }

    /// Create a new type variable placeholder
    pub(crate) fn new_type_variable(
        token: Token,
        scope: TypeScope,
        position: usize,
        declaration: FormalTypeParameter,
    ) -> Self {
        let name = declaration.name.clone();
        Self::new_structural(
            token,
            JvmFlavor::TypeVariable {
                scope,
                position,
                declaration,
            },
            name,
        )
    }

    /// Returns the binary name (`package.Name`) of the entity
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.package, self.name)
        }
    }

    /// Returns the internal name (`package/Name`) used in descriptors and signatures
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.fullname().replace('.', "/")
    }

    /// The class-file declaration, `None` for non-classes and for classes only referenced so far
    #[must_use]
    pub fn declaration(&self) -> Option<&ClassDeclaration> {
        self.declaration.get()
    }

    /// Returns `true` if this is a declared interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.declaration().is_some_and(ClassDeclaration::is_interface)
    }

    /// Returns `true` for named classes and interfaces
    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Class)
    }

    /// Returns `true` for primitives and `void`
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Primitive(_))
    }

    /// Returns `true` for `void`
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Primitive(BaseType::Void))
    }

    /// Returns `true` for arrays
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Array { .. })
    }

    /// Returns `true` for parameterized instances
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        matches!(self.flavor, JvmFlavor::GenericInstance { .. })
    }

    /// Returns `true` for raw views of generic declarations
    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Raw { .. })
    }

    /// Returns `true` for type variables
    #[must_use]
    pub fn is_type_variable(&self) -> bool {
        matches!(self.flavor, JvmFlavor::TypeVariable { .. })
    }

    /// Returns `true` for wildcards
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.flavor, JvmFlavor::Wildcard { .. })
    }
}

impl std::fmt::Debug for JvmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JvmType")
            .field("token", &self.token)
            .field("flavor", &self.flavor)
            .field("name", &self.fullname())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::token::TOKEN_KIND;

    #[test]
    fn test_new_class_names() {
        let ty = JvmType::new_class(
            Token::from_parts(TOKEN_KIND::CLASS, 1),
            "java.util.Map$Entry",
        );
        assert_eq!(ty.package, "java.util");
        assert_eq!(ty.name, "Map$Entry");
        assert_eq!(ty.fullname(), "java.util.Map$Entry");
        assert_eq!(ty.internal_name(), "java/util/Map$Entry");
        assert!(ty.is_class());
        assert!(!ty.is_interface());

        let default_package = JvmType::new_class(Token::from_parts(TOKEN_KIND::CLASS, 2), "Foo");
        assert_eq!(default_package.package, "");
        assert_eq!(default_package.fullname(), "Foo");
    }

    #[test]
    fn test_new_primitive() {
        let ty = JvmType::new_primitive(Token::from_parts(TOKEN_KIND::PRIMITIVE, 1), BaseType::Void);
        assert!(ty.is_primitive());
        assert!(ty.is_void());
        assert_eq!(ty.fullname(), "void");
    }
}
