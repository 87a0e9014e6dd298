//! Builders for class and method declarations.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for declaring
//! classes and interfaces together with their methods, and registers them in the
//! [`TypeRegistry`]. A declaration carries the same facts a class file does: access flags, the
//! erased superclass and interfaces, the enclosing class of a nested class, and the optional
//! generic signatures. Signatures are only parsed when the declaration is first resolved.
//!
//! # Example
//!
//! ```rust
//! use sigscope::metadata::typesystem::{MethodBuilder, TypeBuilder, TypeRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let list = TypeBuilder::new(registry.clone(), "java.util.List")
//!     .interface()
//!     .implements("java.util.Collection")
//!     .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
//!     .method(
//!         MethodBuilder::new("get", "(I)Ljava/lang/Object;").signature("(I)TE;"),
//!     )
//!     .build()?;
//!
//! assert!(list.is_interface());
//! assert_eq!(list.methods.count(), 1);
//! # Ok::<(), sigscope::Error>(())
//! ```

use std::sync::Arc;

use log::debug;

use crate::{
    metadata::{
        method::{parse_descriptor, MethodAccessFlags},
        signatures::OBJECT_BINARY_NAME,
        typesystem::{ClassAccessFlags, ClassDeclaration, JvmTypeRc, JvmTypeRef, TypeRegistry},
    },
    Error::TypeError,
    Result,
};

/// Declares one method of a class built with [`TypeBuilder`]
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    pub(crate) name: String,
    pub(crate) descriptor: String,
    pub(crate) flags: MethodAccessFlags,
    pub(crate) signature: Option<String>,
    pub(crate) thrown: Vec<String>,
}

impl MethodBuilder {
    /// Start a method declaration
    ///
    /// ## Arguments
    /// * 'name'       - The method name
    /// * 'descriptor' - The erased method descriptor, e.g. `(I)Ljava/lang/Object;`
    pub fn new(name: &str, descriptor: &str) -> Self {
        MethodBuilder {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags: MethodAccessFlags::PUBLIC,
            signature: None,
            thrown: Vec::new(),
        }
    }

    /// Set the access flags (default `PUBLIC`)
    #[must_use]
    pub fn flags(mut self, flags: MethodAccessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the generic method signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Add an erased thrown type, by binary name
    #[must_use]
    pub fn throws(mut self, binary_name: &str) -> Self {
        self.thrown.push(binary_name.to_string());
        self
    }
}

/// Provides a fluent API for declaring classes and interfaces
pub struct TypeBuilder {
    /// Type registry for storing the types
    registry: Arc<TypeRegistry>,
    binary_name: String,
    flags: ClassAccessFlags,
    enclosing: Option<String>,
    superclass: Option<String>,
    interfaces: Vec<String>,
    signature: Option<String>,
    methods: Vec<MethodBuilder>,
}

impl TypeBuilder {
    /// Start declaring the class `binary_name`
    ///
    /// ## Arguments
    /// * 'registry'    - The type registry to declare the class in
    /// * 'binary_name' - Dotted binary name, nested classes joined with `$`
    pub fn new(registry: Arc<TypeRegistry>, binary_name: &str) -> Self {
        TypeBuilder {
            registry,
            binary_name: binary_name.to_string(),
            flags: ClassAccessFlags::PUBLIC | ClassAccessFlags::SUPER,
            enclosing: None,
            superclass: None,
            interfaces: Vec::new(),
            signature: None,
            methods: Vec::new(),
        }
    }

    /// Declare an interface instead of a class
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flags.remove(ClassAccessFlags::SUPER);
        self.flags |= ClassAccessFlags::INTERFACE | ClassAccessFlags::ABSTRACT;
        self
    }

    /// Replace the access flags
    ///
    /// ## Arguments
    /// * 'flags' - The new flags; `INTERFACE` selects an interface
    #[must_use]
    pub fn flags(mut self, flags: ClassAccessFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Declare the class as nested in `enclosing`
    ///
    /// ## Arguments
    /// * 'enclosing' - Binary name of the enclosing class
    /// * 'is_static' - `false` for inner classes, which see the enclosing type parameters
    #[must_use]
    pub fn enclosing(mut self, enclosing: &str, is_static: bool) -> Self {
        if is_static {
            self.flags |= ClassAccessFlags::STATIC;
        } else {
            self.flags.remove(ClassAccessFlags::STATIC);
        }
        self.enclosing = Some(enclosing.to_string());
        self
    }

    /// Set the erased superclass (default `java.lang.Object`)
    #[must_use]
    pub fn extends(mut self, binary_name: &str) -> Self {
        self.superclass = Some(binary_name.to_string());
        self
    }

    /// Add an erased superinterface
    #[must_use]
    pub fn implements(mut self, binary_name: &str) -> Self {
        self.interfaces.push(binary_name.to_string());
        self
    }

    /// Set the generic class signature
    #[must_use]
    pub fn signature(mut self, signature: &str) -> Self {
        self.signature = Some(signature.to_string());
        self
    }

    /// Add a method declaration
    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Register the declaration
    ///
    /// A named type that was referenced before (by a signature or by name) becomes this
    /// declaration. No signature is parsed; method descriptors are checked before anything is
    /// registered.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if the class is already declared, and an error for
    /// malformed method descriptors
    pub fn build(self) -> Result<JvmTypeRc> {
        for method in &self.methods {
            parse_descriptor(&method.descriptor, self.registry.config().max_recursion_depth)?;
        }

        let ty = self.registry.get_or_declare(&self.binary_name)?;

        let enclosing = match &self.enclosing {
            Some(name) => Some(self.registry.get_or_declare(name)?),
            None => None,
        };

        let erased_superclass = match self.superclass {
            Some(name) => Some(name),
            None if self.binary_name == OBJECT_BINARY_NAME => None,
            None => Some(OBJECT_BINARY_NAME.to_string()),
        };

        let declaration = ClassDeclaration {
            flags: self.flags,
            enclosing: enclosing.as_ref().map(JvmTypeRef::new),
            erased_superclass,
            erased_interfaces: self.interfaces,
            signature: self.signature,
        };

        if ty.declaration.set(declaration).is_err() {
            return Err(TypeError(format!(
                "{} is already declared",
                self.binary_name
            )));
        }

        if let Some(enclosing) = &enclosing {
            enclosing.nested_types.push(JvmTypeRef::new(&ty));
        }

        for method in self.methods {
            let declared = self.registry.declare_method(&ty, method)?;
            ty.methods.push(declared);
        }

        debug!(
            "Declared {} {} with {} methods",
            if ty.is_interface() { "interface" } else { "class" },
            ty.fullname(),
            ty.methods.count()
        );

        Ok(ty)
    }
}
