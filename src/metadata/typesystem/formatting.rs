//! Textual forms of registry types: JVM signatures and Java source style descriptions.

use crate::{
    metadata::{
        method::MethodInfo,
        signatures::OBJECT_BINARY_NAME,
        typesystem::{JvmFlavor, JvmType, JvmTypeRc, TypeRegistry},
    },
    Error::{TypeError, TypeNotFound},
    Result,
};

/// The part of a nested class's name below its owner (`Inner` for `Outer$Inner`)
fn simple_name<'n>(name: &'n str, owner: &JvmType) -> &'n str {
    name.strip_prefix(owner.name.as_str())
        .and_then(|rest| rest.strip_prefix('$'))
        .or_else(|| name.rsplit('$').next())
        .unwrap_or(name)
}

impl TypeRegistry {
    /// The JVM signature of `ty`, e.g. `Ljava/util/Map<TK;TV;>;`
    ///
    /// The output parses back (with [`crate::metadata::signatures::parse_type_signature`]) and
    /// reifies to the same type. `? extends Object` prints as `*`.
    ///
    /// # Errors
    /// Returns an error if a referenced type is no longer alive
    pub fn signature(&self, ty: &JvmTypeRc) -> Result<String> {
        let mut buffer = String::new();
        self.write_signature(ty, &mut buffer)?;
        Ok(buffer)
    }

    fn write_signature(&self, ty: &JvmTypeRc, buffer: &mut String) -> Result<()> {
        match &ty.flavor {
            JvmFlavor::Primitive(kind) => buffer.push(kind.tag()),
            JvmFlavor::Class | JvmFlavor::Raw { .. } => {
                buffer.push('L');
                buffer.push_str(&ty.internal_name());
                buffer.push(';');
            }
            JvmFlavor::GenericInstance {
                owner, arguments, ..
            } => {
                match owner {
                    Some(owner) => {
                        let owner = upgrade!(owner)?;
                        self.write_signature(&owner, buffer)?;
                        // Reopen the owner's class type for the nested segment
                        buffer.pop();
                        buffer.push('.');
                        buffer.push_str(simple_name(&ty.name, &owner));
                    }
                    None => {
                        buffer.push('L');
                        buffer.push_str(&ty.internal_name());
                    }
                }

                if !arguments.is_empty() {
                    buffer.push('<');
                    for argument in arguments {
                        self.write_signature(&upgrade!(argument)?, buffer)?;
                    }
                    buffer.push('>');
                }
                buffer.push(';');
            }
            JvmFlavor::Array { component } => {
                buffer.push('[');
                self.write_signature(&upgrade!(component)?, buffer)?;
            }
            JvmFlavor::TypeVariable { .. } => {
                buffer.push('T');
                buffer.push_str(&ty.name);
                buffer.push(';');
            }
            JvmFlavor::Wildcard {
                super_bound,
                extends_bound,
            } => match super_bound {
                Some(bound) => {
                    buffer.push('-');
                    self.write_signature(&upgrade!(bound)?, buffer)?;
                }
                None => {
                    let extends_bound = upgrade!(extends_bound)?;
                    if extends_bound.token == self.object().token {
                        buffer.push('*');
                    } else {
                        buffer.push('+');
                        self.write_signature(&extends_bound, buffer)?;
                    }
                }
            },
        }
        Ok(())
    }

    /// The signature of the erasure of `ty`, which is also its field descriptor
    ///
    /// # Errors
    /// Returns an error if `ty` cannot be erased
    pub fn erased_signature(&self, ty: &JvmTypeRc) -> Result<String> {
        self.signature(&self.erase(ty)?)
    }

    /// The class signature of a declaration, as it appears in the class file
    ///
    /// `java.util.ArrayList` prints as
    /// `<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;`.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `ty` is not a class or interface
    pub fn generic_signature(&self, ty: &JvmTypeRc) -> Result<String> {
        if !ty.is_class() {
            return Err(TypeError(format!(
                "{} has no class signature",
                self.describe(ty)?
            )));
        }

        let mut buffer = String::new();
        self.write_formal_parameters(&self.generic_parameters(ty)?, &mut buffer)?;
        if let Some(base) = self.resolve_generic_supertype(ty)? {
            self.write_signature(&base, &mut buffer)?;
        }
        for interface in self.interfaces(ty)? {
            self.write_signature(&interface, &mut buffer)?;
        }
        Ok(buffer)
    }

    fn write_formal_parameters(&self, parameters: &[JvmTypeRc], buffer: &mut String) -> Result<()> {
        if parameters.is_empty() {
            return Ok(());
        }

        buffer.push('<');
        for parameter in parameters {
            buffer.push_str(&parameter.name);

            let bounds = self.type_variable_bounds(parameter)?;
            buffer.push(':');
            if let Some(class_bound) = &bounds.class_bound {
                self.write_signature(&upgrade!(class_bound)?, buffer)?;
            } else if bounds.interface_bounds.is_empty() {
                buffer.push('L');
                buffer.push_str(&OBJECT_BINARY_NAME.replace('.', "/"));
                buffer.push(';');
            }
            for interface_bound in &bounds.interface_bounds {
                buffer.push(':');
                self.write_signature(&upgrade!(interface_bound)?, buffer)?;
            }
        }
        buffer.push('>');
        Ok(())
    }

    /// The generic signature of a method, e.g. `<T:Ljava/lang/Object;>([TT;)[TT;`
    ///
    /// A generic method instance has no formal type parameters of its own.
    ///
    /// # Errors
    /// Returns an error if the method's signature cannot be resolved
    pub fn method_signature(&self, method: &MethodInfo) -> Result<String> {
        let mut buffer = String::new();
        // Bound type parameters are not formal anymore
        if Self::generic_definition_token(method).is_none() {
            self.write_formal_parameters(&self.method_generic_parameters(method)?, &mut buffer)?;
        }

        buffer.push('(');
        for parameter in self.method_parameter_types(method)? {
            self.write_signature(&parameter, &mut buffer)?;
        }
        buffer.push(')');
        self.write_signature(&self.method_return_type(method)?, &mut buffer)?;

        for thrown in self.method_thrown_types(method)? {
            buffer.push('^');
            self.write_signature(&thrown, &mut buffer)?;
        }
        Ok(buffer)
    }

    /// The erased signature of a method, which is its descriptor, e.g. `([Ljava/lang/Object;)V`
    ///
    /// A generic method instance has the erased signature of its generic method definition.
    ///
    /// # Errors
    /// Returns an error if the method's signature cannot be resolved or erased
    pub fn method_erased_signature(&self, method: &MethodInfo) -> Result<String> {
        if let Some(definition) = Self::generic_definition_token(method) {
            let definition = self
                .method(&definition)
                .ok_or_else(|| TypeNotFound(definition.to_string()))?;
            return self.method_erased_signature(&definition);
        }

        let mut buffer = String::from("(");
        for parameter in self.method_parameter_types(method)? {
            self.write_signature(&self.erase(&parameter)?, &mut buffer)?;
        }
        buffer.push(')');
        self.write_signature(&self.erase(&self.method_return_type(method)?)?, &mut buffer)?;
        Ok(buffer)
    }

    /// `ty` as it would be written in Java source, e.g. `java.util.Map<K, V>` or `? super T`
    ///
    /// # Errors
    /// Returns an error if a referenced type is no longer alive
    pub fn describe(&self, ty: &JvmTypeRc) -> Result<String> {
        let mut buffer = String::new();
        self.write_description(ty, &mut buffer)?;
        Ok(buffer)
    }

    fn write_description(&self, ty: &JvmTypeRc, buffer: &mut String) -> Result<()> {
        match &ty.flavor {
            JvmFlavor::Primitive(_) | JvmFlavor::TypeVariable { .. } => buffer.push_str(&ty.name),
            JvmFlavor::Class | JvmFlavor::Raw { .. } => {
                buffer.push_str(&ty.fullname().replace('$', "."));
            }
            JvmFlavor::GenericInstance {
                owner, arguments, ..
            } => {
                match owner {
                    Some(owner) => {
                        let owner = upgrade!(owner)?;
                        self.write_description(&owner, buffer)?;
                        buffer.push('.');
                        buffer.push_str(simple_name(&ty.name, &owner));
                    }
                    None => buffer.push_str(&ty.fullname().replace('$', ".")),
                }

                if !arguments.is_empty() {
                    buffer.push('<');
                    for (index, argument) in arguments.iter().enumerate() {
                        if index > 0 {
                            buffer.push_str(", ");
                        }
                        self.write_description(&upgrade!(argument)?, buffer)?;
                    }
                    buffer.push('>');
                }
            }
            JvmFlavor::Array { component } => {
                self.write_description(&upgrade!(component)?, buffer)?;
                buffer.push_str("[]");
            }
            JvmFlavor::Wildcard {
                super_bound,
                extends_bound,
            } => {
                buffer.push('?');
                if let Some(bound) = super_bound {
                    buffer.push_str(" super ");
                    self.write_description(&upgrade!(bound)?, buffer)?;
                } else {
                    let extends_bound = upgrade!(extends_bound)?;
                    if extends_bound.token != self.object().token {
                        buffer.push_str(" extends ");
                        self.write_description(&extends_bound, buffer)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        reifier::Reifier,
        signatures::{parse_field_signature, BaseType},
        typesystem::{TypeBuilder, TypeResolver, TypeScope},
    };

    #[test]
    fn signature_of_structural_types() {
        let registry = TypeRegistry::new();
        let object = registry.object();
        let number = registry.get_or_declare("java.lang.Number").unwrap();

        let unbounded = registry.make_wildcard(None, &object).unwrap();
        let extends = registry.make_wildcard(None, &number).unwrap();
        let super_ = registry.make_wildcard(Some(&number), &object).unwrap();
        assert_eq!(registry.signature(&unbounded).unwrap(), "*");
        assert_eq!(registry.signature(&extends).unwrap(), "+Ljava/lang/Number;");
        assert_eq!(registry.signature(&super_).unwrap(), "-Ljava/lang/Number;");
        assert_eq!(registry.describe(&unbounded).unwrap(), "?");
        assert_eq!(registry.describe(&extends).unwrap(), "? extends java.lang.Number");
        assert_eq!(registry.describe(&super_).unwrap(), "? super java.lang.Number");

        let int = registry.primitive(BaseType::Int);
        let matrix = registry
            .make_array_type(&registry.make_array_type(&int).unwrap())
            .unwrap();
        assert_eq!(registry.signature(&matrix).unwrap(), "[[I");
        assert_eq!(registry.describe(&matrix).unwrap(), "int[][]");
    }

    #[test]
    fn signature_of_nested_instance() {
        let registry = Arc::new(TypeRegistry::new());
        let outer = TypeBuilder::new(registry.clone(), "p.Outer")
            .signature("<X:Ljava/lang/Object;>Ljava/lang/Object;")
            .build()
            .unwrap();
        TypeBuilder::new(registry.clone(), "p.Outer$Inner")
            .enclosing("p.Outer", false)
            .signature("<Y:Ljava/lang/Object;>Ljava/lang/Object;")
            .build()
            .unwrap();

        let mut resolver = TypeResolver::with_scope(&registry, TypeScope::Class(outer.token));
        let field = parse_field_signature("Lp/Outer<TX;>.Inner<Ljava/lang/String;>;").unwrap();
        let reified = Reifier::new(&mut resolver).reify_type(&field).unwrap();

        assert_eq!(
            registry.signature(&reified).unwrap(),
            "Lp/Outer<TX;>.Inner<Ljava/lang/String;>;"
        );
        assert_eq!(
            registry.describe(&reified).unwrap(),
            "p.Outer<X>.Inner<java.lang.String>"
        );
        assert_eq!(registry.erased_signature(&reified).unwrap(), "Lp/Outer$Inner;");
    }

    #[test]
    fn generic_signature_of_declaration() {
        let registry = Arc::new(TypeRegistry::new());
        let text = "<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;";
        let list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
            .signature(text)
            .build()
            .unwrap();
        assert_eq!(registry.generic_signature(&list).unwrap(), text);

        let sorted = TypeBuilder::new(registry.clone(), "p.Sorted")
            .signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;")
            .build()
            .unwrap();
        assert_eq!(
            registry.generic_signature(&sorted).unwrap(),
            "<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;"
        );

        let int = registry.primitive(BaseType::Int);
        assert!(matches!(registry.generic_signature(&int), Err(TypeError(_))));
    }
}
