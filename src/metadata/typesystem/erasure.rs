//! Type erasure and type variable substitution.

use std::collections::HashMap;

use crate::{
    metadata::{
        token::Token,
        typesystem::{JvmFlavor, JvmTypeRc, JvmTypeRef, TypeRegistry},
    },
    Error::RecursionLimit,
    Result,
};

/// Type variable bindings, keyed by the token of the type variable
pub type TypeBindings = HashMap<Token, JvmTypeRc>;

impl TypeRegistry {
    /// The erasure of `ty`
    ///
    /// | type                       | erasure                              |
    /// |----------------------------|--------------------------------------|
    /// | primitive, raw             | itself                               |
    /// | non-generic class          | itself                               |
    /// | generic class              | its raw view                         |
    /// | parameterized `D<..>`      | erasure of `D`                       |
    /// | array `X[]`                | erasure of `X`, as an array          |
    /// | type variable              | erasure of its first bound           |
    /// | wildcard                   | erasure of its upper bound           |
    ///
    /// Erasure is idempotent. It is cached per type once it no longer depends on a class that is
    /// referenced but not built yet.
    ///
    /// # Errors
    /// Returns an error if a declaration or bound cannot be resolved, or bounds recurse without end
    pub fn erase(&self, ty: &JvmTypeRc) -> Result<JvmTypeRc> {
        self.erase_with_depth(ty, 0).map(|(erased, _)| erased)
    }

    /// The erasure of `ty`, and whether it is settled
    ///
    /// An unsettled erasure passed through an undeclared class and may change once that class
    /// is built.
    pub(crate) fn erase_settled(&self, ty: &JvmTypeRc) -> Result<(JvmTypeRc, bool)> {
        self.erase_with_depth(ty, 0)
    }

    fn erase_with_depth(&self, ty: &JvmTypeRc, depth: usize) -> Result<(JvmTypeRc, bool)> {
        if depth > self.config.max_recursion_depth {
            return Err(RecursionLimit(self.config.max_recursion_depth));
        }

        if let Some(erased) = ty.erasure.get().and_then(JvmTypeRef::upgrade) {
            return Ok((erased, true));
        }

        let (erased, settled) = match &ty.flavor {
            JvmFlavor::Primitive(_) | JvmFlavor::Raw { .. } => (ty.clone(), true),
            JvmFlavor::Class => {
                let settled = self.is_settled(ty);
                if self.class_resolution(ty)?.generic_parameters.is_empty() {
                    (ty.clone(), settled)
                } else {
                    (self.raw_type(ty)?, settled)
                }
            }
            JvmFlavor::GenericInstance { definition, .. } => {
                self.erase_with_depth(&upgrade!(definition)?, depth + 1)?
            }
            JvmFlavor::Array { component } => {
                let component = upgrade!(component)?;
                let (erased_component, settled) = self.erase_with_depth(&component, depth + 1)?;
                if erased_component.token == component.token {
                    (ty.clone(), settled)
                } else {
                    (self.make_array_type(&erased_component)?, settled)
                }
            }
            JvmFlavor::TypeVariable { .. } => {
                let first = self.bounds(ty)?.into_iter().next().unwrap_or_else(|| self.object());
                self.erase_with_depth(&first, depth + 1)?
            }
            JvmFlavor::Wildcard { extends_bound, .. } => {
                self.erase_with_depth(&upgrade!(extends_bound)?, depth + 1)?
            }
        };

        if settled {
            let _ = ty.erasure.set(JvmTypeRef::new(&erased));
        }
        Ok((erased, settled))
    }

    /// The bindings a parameterized type applies to its declaration's type variables
    ///
    /// Bindings of a parameterized owner (`Outer<X>` in `Outer<X>.Inner<Y>`) are included. Any
    /// other type binds nothing.
    ///
    /// # Errors
    /// Returns an error if a declaration cannot be resolved
    pub fn type_bindings(&self, ty: &JvmTypeRc) -> Result<TypeBindings> {
        let mut bindings = TypeBindings::new();
        let mut current = Some(ty.clone());
        let mut depth = 0;

        while let Some(instance) = current.take() {
            depth += 1;
            if depth > self.config.max_recursion_depth {
                return Err(RecursionLimit(self.config.max_recursion_depth));
            }

            let JvmFlavor::GenericInstance {
                definition,
                owner,
                arguments,
            } = &instance.flavor
            else {
                break;
            };

            let definition = upgrade!(definition)?;
            let resolution = self.class_resolution(&definition)?;
            for (parameter, argument) in resolution.generic_parameters.iter().zip(arguments) {
                let parameter = upgrade!(parameter)?;
                bindings
                    .entry(parameter.token)
                    .or_insert(upgrade!(argument)?);
            }

            current = owner.as_ref().map(|o| upgrade!(o)).transpose()?;
        }

        Ok(bindings)
    }

    /// Replace the type variables in `ty` according to `bindings`
    ///
    /// Types without any bound variable are returned unchanged (same instance).
    ///
    /// # Errors
    /// Returns an error if a substituted type cannot be constructed or nesting is too deep
    pub fn substitute(&self, ty: &JvmTypeRc, bindings: &TypeBindings) -> Result<JvmTypeRc> {
        if bindings.is_empty() {
            return Ok(ty.clone());
        }
        self.substitute_with_depth(ty, bindings, 0)
    }

    fn substitute_with_depth(
        &self,
        ty: &JvmTypeRc,
        bindings: &TypeBindings,
        depth: usize,
    ) -> Result<JvmTypeRc> {
        if depth > self.config.max_recursion_depth {
            return Err(RecursionLimit(self.config.max_recursion_depth));
        }

        match &ty.flavor {
            JvmFlavor::TypeVariable { .. } => {
                Ok(bindings.get(&ty.token).cloned().unwrap_or_else(|| ty.clone()))
            }
            JvmFlavor::GenericInstance {
                definition,
                owner,
                arguments,
            } => {
                let owner = owner.as_ref().map(|o| upgrade!(o)).transpose()?;
                let new_owner = owner
                    .as_ref()
                    .map(|o| self.substitute_with_depth(o, bindings, depth + 1))
                    .transpose()?;

                let mut changed = match (&owner, &new_owner) {
                    (Some(old), Some(new)) => old.token != new.token,
                    _ => false,
                };

                let mut new_arguments = Vec::with_capacity(arguments.len());
                for argument in arguments {
                    let argument = upgrade!(argument)?;
                    let substituted = self.substitute_with_depth(&argument, bindings, depth + 1)?;
                    changed |= substituted.token != argument.token;
                    new_arguments.push(substituted);
                }

                if changed {
                    self.make_nested_generic_type(
                        &upgrade!(definition)?,
                        new_owner.as_ref(),
                        &new_arguments,
                    )
                } else {
                    Ok(ty.clone())
                }
            }
            JvmFlavor::Array { component } => {
                let component = upgrade!(component)?;
                let substituted = self.substitute_with_depth(&component, bindings, depth + 1)?;
                if substituted.token == component.token {
                    Ok(ty.clone())
                } else {
                    self.make_array_type(&substituted)
                }
            }
            JvmFlavor::Wildcard {
                super_bound,
                extends_bound,
            } => {
                let super_bound = super_bound.as_ref().map(|b| upgrade!(b)).transpose()?;
                let extends_bound = upgrade!(extends_bound)?;

                let new_super = super_bound
                    .as_ref()
                    .map(|b| self.substitute_with_depth(b, bindings, depth + 1))
                    .transpose()?;
                let new_extends = self.substitute_with_depth(&extends_bound, bindings, depth + 1)?;

                let changed = new_extends.token != extends_bound.token
                    || new_super.as_ref().map(|b| b.token) != super_bound.as_ref().map(|b| b.token);
                if !changed {
                    return Ok(ty.clone());
                }

                // `? extends T` with T bound to a wildcard collapses to that wildcard
                if new_extends.is_wildcard() && new_super.is_none() {
                    return Ok(new_extends);
                }
                let new_extends = if new_extends.is_wildcard() {
                    self.object()
                } else {
                    new_extends
                };
                match new_super {
                    Some(bound) if bound.is_wildcard() => self.make_wildcard(None, &new_extends),
                    other => self.make_wildcard(other.as_ref(), &new_extends),
                }
            }
            JvmFlavor::Primitive(_) | JvmFlavor::Class | JvmFlavor::Raw { .. } => Ok(ty.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{signatures::BaseType, typesystem::TypeBuilder};

    fn registry_with_map() -> (Arc<TypeRegistry>, JvmTypeRc) {
        let registry = Arc::new(TypeRegistry::new());
        let map = TypeBuilder::new(registry.clone(), "java.util.Map")
            .interface()
            .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
            .build()
            .unwrap();
        (registry, map)
    }

    #[test]
    fn erase_is_idempotent() {
        let (registry, map) = registry_with_map();
        let string = registry.get_or_declare("java.lang.String").unwrap();
        let instance = registry
            .make_generic_type(&map, &[string.clone(), string.clone()])
            .unwrap();
        let array = registry.make_array_type(&instance).unwrap();
        let int_array = registry
            .make_array_type(&registry.primitive(BaseType::Int))
            .unwrap();

        for ty in [&map, &instance, &array, &int_array, &string] {
            let once = registry.erase(ty).unwrap();
            let twice = registry.erase(&once).unwrap();
            assert_eq!(once.token, twice.token);
        }

        let raw = registry.erase(&map).unwrap();
        assert!(raw.is_raw());
        assert_eq!(registry.erase(&instance).unwrap().token, raw.token);
        assert_eq!(registry.erase(&string).unwrap().token, string.token);
        assert_eq!(registry.erase(&int_array).unwrap().token, int_array.token);

        let erased_array = registry.erase(&array).unwrap();
        assert_eq!(registry.signature(&erased_array).unwrap(), "[Ljava/util/Map;");
    }

    #[test]
    fn erase_type_variable_uses_first_bound() {
        let (registry, map) = registry_with_map();
        let parameters = registry.generic_parameters(&map).unwrap();
        let erased = registry.erase(&parameters[0]).unwrap();
        assert_eq!(erased.token, registry.object().token);

        let sorted = TypeBuilder::new(registry.clone(), "p.Sorted")
            .signature("<T::Ljava/lang/Comparable<-TT;>;:Ljava/io/Serializable;>Ljava/lang/Object;")
            .build()
            .unwrap();
        let t = &registry.generic_parameters(&sorted).unwrap()[0];
        assert_eq!(registry.erased_signature(t).unwrap(), "Ljava/lang/Comparable;");
    }

    #[test]
    fn substitute_instance_arguments() {
        let (registry, map) = registry_with_map();
        let parameters = registry.generic_parameters(&map).unwrap();
        let generic_self = registry.make_generic_type(&map, &parameters).unwrap();

        let string = registry.get_or_declare("java.lang.String").unwrap();
        let date = registry.get_or_declare("java.util.Date").unwrap();
        let concrete = registry
            .make_generic_type(&map, &[string.clone(), date.clone()])
            .unwrap();

        let bindings = registry.type_bindings(&concrete).unwrap();
        assert_eq!(bindings.len(), 2);

        let substituted = registry.substitute(&generic_self, &bindings).unwrap();
        assert_eq!(substituted.token, concrete.token);

        let unrelated = registry.substitute(&string, &bindings).unwrap();
        assert!(Arc::ptr_eq(&unrelated, &string));
        assert!(registry.type_bindings(&map).unwrap().is_empty());
    }
}
