//! Reification of parsed signatures into concrete types.
//!
//! The [`Reifier`] walks a signature tree produced by [`crate::metadata::signatures`] and drives a
//! [`MetadataFactory`] to build the concrete types the tree describes. It owns no caches and no
//! types; everything it returns comes from the factory.
//!
//! # Nested class types
//!
//! A class type such as `Lp/Outer<TX;>.Inner<TY;>;` is reified left to right. Segments without
//! type arguments only extend the binary name. The first segment with arguments (or the last
//! segment) produces the first parameterized type, and every later segment becomes a
//! parameterized type owned by the previous result:
//!
//! ```text
//! p.Outer<X>                  make_parameterized_type(p.Outer, None, [X])
//! p.Outer<X>.Inner<Y>         make_parameterized_type(p.Outer$Inner, Some(p.Outer<X>), [Y])
//! ```
//!
//! A path without any type arguments reifies to the plain named type.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use sigscope::metadata::{
//!     reifier::Reifier,
//!     signatures::parse_field_signature,
//!     typesystem::{TypeRegistry, TypeResolver},
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let mut resolver = TypeResolver::new(&registry);
//!
//! let signature = parse_field_signature("Ljava/util/Map<Ljava/lang/String;Ljava/util/Date;>;")?;
//! let map = Reifier::new(&mut resolver).reify_type(&signature)?;
//! assert_eq!(registry.signature(&map)?, "Ljava/util/Map<Ljava/lang/String;Ljava/util/Date;>;");
//! # Ok::<(), sigscope::Error>(())
//! ```

mod factory;

pub use factory::MetadataFactory;

use log::warn;

use crate::{
    metadata::{
        config::ReificationConfig,
        signatures::{
            BaseType, ClassSignature, ClassTypeSignature, MethodTypeSignature, TypeArgument,
            TypeSignature,
        },
    },
    Result,
};

/// Walks signature trees and builds types through a [`MetadataFactory`]
///
/// A `Reifier` borrows its factory mutably for its whole lifetime; create one per signature.
pub struct Reifier<'f, F: MetadataFactory> {
    factory: &'f mut F,
    config: ReificationConfig,
}

impl<'f, F: MetadataFactory> Reifier<'f, F> {
    /// Create a new `Reifier` with the default (lenient) configuration
    ///
    /// ## Arguments
    /// * 'factory' - The factory that builds and interns the reified types
    pub fn new(factory: &'f mut F) -> Self {
        Self::with_config(factory, ReificationConfig::default())
    }

    /// Create a new `Reifier` with an explicit configuration
    ///
    /// ## Arguments
    /// * 'factory' - The factory that builds and interns the reified types
    /// * 'config'  - Controls how failing type arguments are handled
    pub fn with_config(factory: &'f mut F, config: ReificationConfig) -> Self {
        Reifier { factory, config }
    }

    /// Reify a single type signature
    ///
    /// # Errors
    /// Returns the first error reported by the factory, except for type argument failures that the
    /// lenient policy recovers from
    pub fn reify_type(&mut self, signature: &TypeSignature) -> Result<F::Type> {
        match signature {
            TypeSignature::Base(base) => Ok(self.reify_base_type(*base)),
            TypeSignature::Class(class) => self.reify_class_type(class),
            TypeSignature::TypeVariable(variable) => self.factory.find_type_variable(&variable.name),
            TypeSignature::Array(array) => {
                let component = self.reify_type(&array.component)?;
                self.factory.make_array_type(component)
            }
        }
    }

    /// Reify an optional bound, `None` (Bottom) stays `None` and means "use the default"
    ///
    /// # Errors
    /// Returns an error if the bound cannot be reified
    pub fn reify_bound(&mut self, bound: Option<&TypeSignature>) -> Result<Option<F::Type>> {
        bound.map(|signature| self.reify_type(signature)).transpose()
    }

    fn reify_base_type(&mut self, base: BaseType) -> F::Type {
        match base {
            BaseType::Byte => self.factory.make_byte(),
            BaseType::Char => self.factory.make_char(),
            BaseType::Double => self.factory.make_double(),
            BaseType::Float => self.factory.make_float(),
            BaseType::Int => self.factory.make_int(),
            BaseType::Long => self.factory.make_long(),
            BaseType::Short => self.factory.make_short(),
            BaseType::Boolean => self.factory.make_boolean(),
            BaseType::Void => self.factory.make_void(),
        }
    }

    /// Reify a (possibly nested, possibly parameterized) class type
    ///
    /// # Errors
    /// Returns an error if a named type or a parameterization cannot be built
    pub fn reify_class_type(&mut self, signature: &ClassTypeSignature) -> Result<F::Type> {
        let path = signature.path();

        let mut name = String::new();
        let mut segments = path.iter().enumerate();

        let mut current = loop {
            let Some((index, segment)) = segments.next() else {
                return Err(malformed_error!("Class type without segments"));
            };

            if index > 0 {
                name.push(if segment.use_dollar { '$' } else { '.' });
            }
            name.push_str(&segment.name);

            let last = index + 1 == path.len();
            if segment.type_arguments.is_empty() && !last {
                continue;
            }

            let raw = self.factory.make_named_type(&name)?;
            if segment.type_arguments.is_empty() {
                break raw;
            }

            let arguments = self.reify_type_arguments(&segment.type_arguments)?;
            break self
                .factory
                .make_parameterized_type(raw, None, arguments)?;
        };

        for (_, segment) in segments {
            name.push(if segment.use_dollar { '$' } else { '.' });
            name.push_str(&segment.name);

            let raw = self.factory.make_named_type(&name)?;
            let arguments = self.reify_type_arguments(&segment.type_arguments)?;
            current = self
                .factory
                .make_parameterized_type(raw, Some(current), arguments)?;
        }

        Ok(current)
    }

    fn reify_type_arguments(&mut self, arguments: &[TypeArgument]) -> Result<Vec<F::Type>> {
        let mut reified = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match self.reify_type_argument(argument) {
                Ok(ty) => reified.push(ty),
                Err(error) if !self.config.is_strict() => {
                    warn!("Substituting java.lang.Object for type argument {argument:?}: {error}");
                    reified.push(self.factory.object_type()?);
                }
                Err(error) => return Err(error),
            }
        }
        Ok(reified)
    }

    /// Reify one type argument; wildcards hand their bound signatures to the factory untouched
    ///
    /// # Errors
    /// Returns an error if the argument cannot be reified
    pub fn reify_type_argument(&mut self, argument: &TypeArgument) -> Result<F::Type> {
        match argument {
            TypeArgument::Exact(signature) => self.reify_type(signature),
            wildcard => self
                .factory
                .make_wildcard(wildcard.super_bound(), wildcard.extends_bound().as_ref()),
        }
    }

    /// Reify a class declaration signature
    ///
    /// Formal type parameters are declared first, so the superclass and interfaces can refer to
    /// them.
    ///
    /// # Errors
    /// Returns an error if any part of the signature cannot be reified
    pub fn reify_class_signature(&mut self, signature: &ClassSignature) -> Result<F::ClassSignature> {
        let mut generic_parameters = Vec::with_capacity(signature.formal_type_parameters.len());
        for parameter in &signature.formal_type_parameters {
            generic_parameters.push(self.factory.make_type_variable(parameter)?);
        }

        let base_type = self.reify_class_type(&signature.superclass)?;

        let mut interfaces = Vec::with_capacity(signature.superinterfaces.len());
        for interface in &signature.superinterfaces {
            interfaces.push(self.reify_class_type(interface)?);
        }

        self.factory
            .make_class_signature(base_type, interfaces, generic_parameters)
    }

    /// Reify a method signature
    ///
    /// # Errors
    /// Returns an error if any part of the signature cannot be reified
    pub fn reify_method_signature(
        &mut self,
        signature: &MethodTypeSignature,
    ) -> Result<F::MethodSignature> {
        let mut generic_parameters = Vec::with_capacity(signature.formal_type_parameters.len());
        for parameter in &signature.formal_type_parameters {
            generic_parameters.push(self.factory.make_type_variable(parameter)?);
        }

        let mut parameter_types = Vec::with_capacity(signature.parameter_types.len());
        for parameter in &signature.parameter_types {
            parameter_types.push(self.reify_type(parameter)?);
        }

        let return_type = self.reify_type(&signature.return_type)?;

        let mut thrown_types = Vec::with_capacity(signature.thrown_types.len());
        for thrown in &signature.thrown_types {
            thrown_types.push(self.reify_type(thrown)?);
        }

        self.factory.make_method_signature(
            return_type,
            parameter_types,
            generic_parameters,
            thrown_types,
        )
    }
}
