//! Supertype and parameterization queries.
//!
//! Every query accepts any flavor of type. Parameterized types answer with the declaration's
//! view substituted by their arguments, raw types with the declaration's view erased.

use crate::{
    metadata::typesystem::{JvmFlavor, JvmTypeRc, JvmTypeRef, TypeRegistry},
    Result,
};

impl TypeRegistry {
    /// The generic superclass of `ty`
    ///
    /// | type                  | superclass                                       |
    /// |-----------------------|--------------------------------------------------|
    /// | class or interface    | as declared, `None` for `java.lang.Object`       |
    /// | parameterized `D<..>` | superclass of `D`, with `D`'s variables bound    |
    /// | raw `D`               | erasure of the superclass of `D`                 |
    /// | type variable         | its first bound                                  |
    /// | wildcard              | its upper bound                                  |
    /// | array                 | `java.lang.Object`                               |
    /// | primitive             | `None`                                           |
    ///
    /// # Errors
    /// Returns an error if a declaration or bound cannot be resolved
    pub fn resolve_generic_supertype(&self, ty: &JvmTypeRc) -> Result<Option<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::Primitive(_) => Ok(None),
            JvmFlavor::Class => self
                .class_resolution(ty)?
                .base
                .as_ref()
                .map(|base| upgrade!(base))
                .transpose(),
            JvmFlavor::GenericInstance { definition, .. } => {
                let Some(base) = self.resolve_generic_supertype(&upgrade!(definition)?)? else {
                    return Ok(None);
                };
                let bindings = self.type_bindings(ty)?;
                self.substitute(&base, &bindings).map(Some)
            }
            JvmFlavor::Raw { definition } => {
                match self.resolve_generic_supertype(&upgrade!(definition)?)? {
                    Some(base) => self.erase(&base).map(Some),
                    None => Ok(None),
                }
            }
            JvmFlavor::TypeVariable { .. } => Ok(self.bounds(ty)?.into_iter().next()),
            JvmFlavor::Wildcard { extends_bound, .. } => Ok(Some(upgrade!(extends_bound)?)),
            JvmFlavor::Array { .. } => Ok(Some(self.object())),
        }
    }

    /// Alias of [`TypeRegistry::resolve_generic_supertype`]
    ///
    /// # Errors
    /// Returns an error if a declaration or bound cannot be resolved
    pub fn base_type(&self, ty: &JvmTypeRc) -> Result<Option<JvmTypeRc>> {
        self.resolve_generic_supertype(ty)
    }

    /// The direct generic superinterfaces of `ty`
    ///
    /// Arrays implement `java.lang.Cloneable` and `java.io.Serializable`.
    ///
    /// # Errors
    /// Returns an error if a declaration cannot be resolved
    pub fn interfaces(&self, ty: &JvmTypeRc) -> Result<Vec<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::Class => {
                let resolution = self.class_resolution(ty)?;
                resolution
                    .interfaces
                    .iter()
                    .map(|interface| upgrade!(interface))
                    .collect()
            }
            JvmFlavor::GenericInstance { definition, .. } => {
                let bindings = self.type_bindings(ty)?;
                self.interfaces(&upgrade!(definition)?)?
                    .iter()
                    .map(|interface| self.substitute(interface, &bindings))
                    .collect()
            }
            JvmFlavor::Raw { definition } => self
                .interfaces(&upgrade!(definition)?)?
                .iter()
                .map(|interface| self.erase(interface))
                .collect(),
            JvmFlavor::Array { .. } => Ok(vec![
                self.get_or_declare("java.lang.Cloneable")?,
                self.get_or_declare("java.io.Serializable")?,
            ]),
            JvmFlavor::Primitive(_) | JvmFlavor::TypeVariable { .. } | JvmFlavor::Wildcard { .. } => {
                Ok(Vec::new())
            }
        }
    }

    /// The formal type parameters of a generic declaration
    ///
    /// A parameterized type reports the parameters of its declaration; every other type has none.
    ///
    /// # Errors
    /// Returns an error if the declaration cannot be resolved
    pub fn generic_parameters(&self, ty: &JvmTypeRc) -> Result<Vec<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::Class => self
                .class_resolution(ty)?
                .generic_parameters
                .iter()
                .map(|parameter| upgrade!(parameter))
                .collect(),
            JvmFlavor::GenericInstance { definition, .. } => {
                self.generic_parameters(&upgrade!(definition)?)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// The type arguments of a parameterized type, empty for anything else
    ///
    /// # Errors
    /// Returns an error if an argument is no longer alive
    pub fn type_arguments(&self, ty: &JvmTypeRc) -> Result<Vec<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::GenericInstance { arguments, .. } => {
                arguments.iter().map(|argument| upgrade!(argument)).collect()
            }
            _ => Ok(Vec::new()),
        }
    }

    /// The parameterized owner of a nested parameterized type (`Outer<X>` in `Outer<X>.Inner<Y>`)
    ///
    /// # Errors
    /// Returns an error if the owner is no longer alive
    pub fn owner_type(&self, ty: &JvmTypeRc) -> Result<Option<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::GenericInstance {
                owner: Some(owner), ..
            } => Ok(Some(upgrade!(owner)?)),
            _ => Ok(None),
        }
    }

    /// The declared class behind a class, parameterized or raw type
    ///
    /// # Errors
    /// Returns an error if the declaration is no longer alive
    pub fn definition_of(&self, ty: &JvmTypeRc) -> Result<Option<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::Class => Ok(Some(ty.clone())),
            JvmFlavor::GenericInstance { definition, .. } | JvmFlavor::Raw { definition } => {
                Ok(Some(upgrade!(definition)?))
            }
            _ => Ok(None),
        }
    }

    /// Returns `true` if `ty` is a generic declaration (has formal type parameters)
    ///
    /// # Errors
    /// Returns an error if the declaration cannot be resolved
    pub fn is_generic_definition(&self, ty: &JvmTypeRc) -> Result<bool> {
        Ok(ty.is_class() && !self.class_resolution(ty)?.generic_parameters.is_empty())
    }

    /// The lexically enclosing class of a nested declaration
    #[must_use]
    pub fn enclosing_type(&self, ty: &JvmTypeRc) -> Option<JvmTypeRc> {
        ty.declaration()
            .and_then(|declaration| declaration.enclosing.as_ref())
            .and_then(JvmTypeRef::upgrade)
    }
}
