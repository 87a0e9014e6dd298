use std::sync::{Arc, Weak};

use bitflags::bitflags;

use crate::metadata::{
    signatures::{BaseType, FormalTypeParameter},
    token::Token,
    typesystem::{JvmType, JvmTypeRc},
};

/// A vector that holds `JvmTypeRef` instances (weak references)
pub type JvmTypeRefList = Arc<boxcar::Vec<JvmTypeRef>>;

/// A smart reference to a `JvmType` that automatically handles weak references
/// to prevent circular reference memory leaks while providing a clean API
///
/// The `TypeRegistry` owns every type strongly; everything else points at types through this.
#[derive(Clone, Debug)]
pub struct JvmTypeRef {
    weak_ref: Weak<JvmType>,
}

impl JvmTypeRef {
    /// Create a new `JvmTypeRef` from a strong reference
    pub fn new(strong_ref: &JvmTypeRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<JvmTypeRc> {
        self.weak_ref.upgrade()
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the token of the referenced type (if still alive)
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.upgrade().map(|t| t.token)
    }

    /// Get the binary name of the referenced type (if still alive)
    #[must_use]
    pub fn fullname(&self) -> Option<String> {
        self.upgrade().map(|t| t.fullname())
    }
}

impl From<JvmTypeRc> for JvmTypeRef {
    fn from(strong_ref: JvmTypeRc) -> Self {
        Self::new(&strong_ref)
    }
}

/// The declaration whose formal type parameters a type variable belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeScope {
    /// A class or interface, by its registry token
    Class(Token),
    /// A method, by its registry token
    Method(Token),
}

impl TypeScope {
    /// The token of the declaring class or method
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            TypeScope::Class(token) | TypeScope::Method(token) => *token,
        }
    }
}

/// What kind of type a `JvmType` is, with the references specific to that kind
#[derive(Debug, Clone)]
pub enum JvmFlavor {
    /// A primitive or `void`
    Primitive(BaseType),
    /// A named class or interface; generic declarations are classes too
    Class,
    /// The erased view of a generic declaration
    Raw {
        /// The generic declaration
        definition: JvmTypeRef,
    },
    /// A generic declaration applied to type arguments
    GenericInstance {
        /// The generic declaration
        definition: JvmTypeRef,
        /// The parameterized enclosing type of a nested generic (`Outer<X>` in `Outer<X>.Inner<Y>`)
        owner: Option<JvmTypeRef>,
        /// The type arguments, empty only when `owner` carries all parameterization
        arguments: Vec<JvmTypeRef>,
    },
    /// An array
    Array {
        /// The element type
        component: JvmTypeRef,
    },
    /// A formal type parameter; bounds are attached lazily
    TypeVariable {
        /// The declaring class or method
        scope: TypeScope,
        /// Position in the declaration's formal parameter list
        position: usize,
        /// The parameter as it was parsed, bounds still unreified
        declaration: FormalTypeParameter,
    },
    /// A wildcard type argument
    Wildcard {
        /// Lower bound, `None` for Bottom
        super_bound: Option<JvmTypeRef>,
        /// Upper bound, `java.lang.Object` when not declared
        extends_bound: JvmTypeRef,
    },
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Class access and property flags (JVMS §4.1, plus `STATIC` etc. from `InnerClasses`)
    pub struct ClassAccessFlags: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private (nested classes only)
        const PRIVATE = 0x0002;
        /// Declared protected (nested classes only)
        const PROTECTED = 0x0004;
        /// Declared static (nested classes only); a static nested class has no enclosing instance
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Treat superclass methods specially for `invokespecial`
        const SUPER = 0x0020;
        /// Is an interface
        const INTERFACE = 0x0200;
        /// Declared abstract
        const ABSTRACT = 0x0400;
        /// Not present in source
        const SYNTHETIC = 0x1000;
        /// Declared as an annotation interface
        const ANNOTATION = 0x2000;
        /// Declared as an enum class
        const ENUM = 0x4000;
    }
}

/// The class-file level facts about a declared class, as supplied by the `TypeBuilder`
#[derive(Debug, Clone)]
pub struct ClassDeclaration {
    /// Access and property flags
    pub flags: ClassAccessFlags,
    /// The lexically enclosing class of a nested class
    pub enclosing: Option<JvmTypeRef>,
    /// Binary name of the erased superclass, `None` only for `java.lang.Object`
    pub erased_superclass: Option<String>,
    /// Binary names of the erased direct superinterfaces
    pub erased_interfaces: Vec<String>,
    /// The generic class signature, if the class has one
    pub signature: Option<String>,
}

impl ClassDeclaration {
    /// Returns `true` if the class is an interface
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassAccessFlags::INTERFACE)
    }

    /// Returns `true` for nested classes that capture an enclosing instance, and therefore see the
    /// enclosing class's type parameters
    #[must_use]
    pub fn is_inner(&self) -> bool {
        self.enclosing.is_some() && !self.flags.contains(ClassAccessFlags::STATIC)
    }
}

/// The resolved generic view of a class declaration
#[derive(Debug, Clone)]
pub(crate) struct ClassResolution {
    pub generic_parameters: Vec<JvmTypeRef>,
    pub base: Option<JvmTypeRef>,
    pub interfaces: Vec<JvmTypeRef>,
}

/// The reified bounds of a type variable
#[derive(Debug, Clone)]
pub(crate) struct TypeVariableBounds {
    pub class_bound: Option<JvmTypeRef>,
    pub interface_bounds: Vec<JvmTypeRef>,
}

/// Structural identity of interned types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum TypeKey {
    Instance {
        definition: Token,
        owner: Option<Token>,
        arguments: Vec<Token>,
    },
    Array(Token),
    Wildcard {
        super_bound: Option<Token>,
        extends_bound: Token,
    },
    Variable {
        scope: TypeScope,
        position: usize,
    },
    Raw(Token),
}
