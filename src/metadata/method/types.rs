//! Method access flags and supporting types for JVM methods.
//!
//! # Key Types
//! - [`MethodAccessFlags`]: Access and property flags of a method declaration
//! - [`MethodKind`]: Whether a [`crate::metadata::method::MethodInfo`] is a declaration, a view
//!   or an instantiated generic method

use bitflags::bitflags;

use crate::metadata::token::Token;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method access and property flags (JVMS §4.6)
    pub struct MethodAccessFlags: u16 {
        /// Declared public
        const PUBLIC = 0x0001;
        /// Declared private
        const PRIVATE = 0x0002;
        /// Declared protected
        const PROTECTED = 0x0004;
        /// Declared static
        const STATIC = 0x0008;
        /// Declared final
        const FINAL = 0x0010;
        /// Declared synchronized
        const SYNCHRONIZED = 0x0020;
        /// A bridge method, generated by the compiler
        const BRIDGE = 0x0040;
        /// Declared with a variable number of arguments
        const VARARGS = 0x0080;
        /// Declared native
        const NATIVE = 0x0100;
        /// Declared abstract
        const ABSTRACT = 0x0400;
        /// Declared strictfp
        const STRICT = 0x0800;
        /// Not present in source
        const SYNTHETIC = 0x1000;
    }
}

impl MethodAccessFlags {
    /// Mask of the visibility flags
    pub const ACCESS_MASK: MethodAccessFlags = MethodAccessFlags::PUBLIC
        .union(MethodAccessFlags::PRIVATE)
        .union(MethodAccessFlags::PROTECTED);

    /// Returns `true` for package-private methods
    #[must_use]
    pub fn is_package_private(&self) -> bool {
        !self.intersects(Self::ACCESS_MASK)
    }
}

/// What a `MethodInfo` represents
///
/// Views and erased definitions refer back to their declaration by token, so the declaration
/// never holds a strong reference to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// A method as declared by its class
    Definition,
    /// A declared method seen through a parameterized, raw or derived receiver
    View {
        /// The declared method
        definition: Token,
    },
    /// The erased form of a declared method or view
    ErasedDefinition {
        /// The method that was erased
        definition: Token,
    },
    /// A generic method with its own type parameters bound to type arguments
    GenericMethodInstance {
        /// The generic method definition
        definition: Token,
    },
}

impl MethodKind {
    /// The token of the underlying method, `None` for definitions themselves
    #[must_use]
    pub fn definition(&self) -> Option<Token> {
        match self {
            MethodKind::Definition => None,
            MethodKind::View { definition }
            | MethodKind::ErasedDefinition { definition }
            | MethodKind::GenericMethodInstance { definition } => Some(*definition),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_flags() {
        let flags = MethodAccessFlags::from_bits_truncate(0x0409);
        assert!(flags.contains(MethodAccessFlags::PUBLIC));
        assert!(flags.contains(MethodAccessFlags::STATIC));
        assert!(flags.contains(MethodAccessFlags::ABSTRACT));
        assert!(!flags.is_package_private());

        assert!(MethodAccessFlags::FINAL.is_package_private());
        assert!(MethodAccessFlags::empty().is_package_private());
    }

    #[test]
    fn test_method_kind_definition() {
        assert_eq!(MethodKind::Definition.definition(), None);
        assert_eq!(
            MethodKind::View {
                definition: Token(0x0800_0002)
            }
            .definition(),
            Some(Token(0x0800_0002))
        );
        assert_eq!(
            MethodKind::GenericMethodInstance {
                definition: Token(0x0800_0005)
            }
            .definition(),
            Some(Token(0x0800_0005))
        );
    }
}
