//! Generic method definitions and their instantiations.

use dashmap::mapref::entry::Entry;
use log::trace;

use crate::{
    metadata::{
        method::{to_refs, upgrade_all, MethodKind, MethodInfo, MethodRc},
        token::Token,
        typesystem::{GenericMethodKey, JvmTypeRc, TypeBindings, TypeRegistry},
    },
    Error::{TypeError, TypeNotFound},
    Result,
};

impl TypeRegistry {
    /// Returns `true` if `method` declares type parameters, or binds those of a generic method
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn is_generic_method(&self, method: &MethodInfo) -> Result<bool> {
        Ok(!self.method_resolution(method)?.generic_parameters.is_empty())
    }

    /// Returns `true` if `method` declares type parameters that are not bound yet
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn is_generic_method_definition(&self, method: &MethodInfo) -> Result<bool> {
        Ok(!matches!(method.kind, MethodKind::GenericMethodInstance { .. })
            && self.is_generic_method(method)?)
    }

    /// Bind the type parameters of a generic method definition
    ///
    /// The instance keeps the declaring and reflected type of `method`. Its parameter, return and
    /// thrown types have every type parameter replaced by the matching argument, and its formal
    /// type parameters stay those of the definition. Instances are interned per method and
    /// arguments.
    ///
    /// ## Arguments
    /// * 'method'    - A generic method definition, or a view of one
    /// * 'arguments' - One reference type per type parameter of `method`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `method` is not a generic method definition, the
    /// argument count does not match, an argument is primitive, or every argument is the
    /// parameter it would bind
    pub fn make_generic_method(
        &self,
        method: &MethodRc,
        arguments: &[JvmTypeRc],
    ) -> Result<MethodRc> {
        if !self.is_generic_method_definition(method)? {
            return Err(TypeError(format!(
                "{} is not a generic method definition",
                method.name
            )));
        }

        let parameters = self.method_generic_parameters(method)?;
        if parameters.len() != arguments.len() {
            return Err(TypeError(format!(
                "{} takes {} type arguments, got {}",
                method.name,
                parameters.len(),
                arguments.len()
            )));
        }

        if let Some(primitive) = arguments.iter().find(|argument| argument.is_primitive()) {
            return Err(TypeError(format!(
                "Primitive type argument {} for {}",
                primitive.name, method.name
            )));
        }

        if parameters
            .iter()
            .zip(arguments)
            .all(|(parameter, argument)| parameter.token == argument.token)
        {
            return Err(TypeError(format!(
                "At least one generic parameter of {} must be bound",
                method.name
            )));
        }

        let key = GenericMethodKey {
            definition: method.token,
            arguments: arguments.iter().map(|argument| argument.token).collect(),
        };

        let existing = self.generic_methods.get(&key).map(|entry| *entry.value());
        if let Some(found) = existing.and_then(|token| self.method(&token)) {
            return Ok(found);
        }

        let bindings: TypeBindings = parameters
            .iter()
            .zip(arguments)
            .map(|(parameter, argument)| (parameter.token, argument.clone()))
            .collect();

        let mut resolution = self.substituted_resolution(
            &parameters,
            &self.method_parameter_types(method)?,
            &self.method_return_type(method)?,
            &self.method_thrown_types(method)?,
            &bindings,
        )?;
        resolution.type_arguments = to_refs(arguments);

        match self.generic_methods.entry(key) {
            Entry::Occupied(entry) => {
                let token = *entry.get();
                self.method(&token)
                    .ok_or_else(|| TypeNotFound(token.to_string()))
            }
            Entry::Vacant(entry) => {
                let instance = self.insert_derived_method(
                    method,
                    MethodKind::GenericMethodInstance {
                        definition: method.token,
                    },
                    &method.declaring_type()?,
                    &method.reflected_type()?,
                    resolution,
                )?;
                entry.insert(instance.token);

                trace!(
                    "Created generic method instance {} of {} with {} arguments",
                    instance.token,
                    method.name,
                    arguments.len()
                );
                Ok(instance)
            }
        }
    }

    /// The generic method definition `method` was instantiated from
    ///
    /// A generic method definition is its own definition.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `method` is not a generic method
    pub fn generic_method_definition(&self, method: &MethodRc) -> Result<MethodRc> {
        match method.kind {
            MethodKind::GenericMethodInstance { definition } => self
                .method(&definition)
                .ok_or_else(|| TypeNotFound(definition.to_string())),
            _ if self.is_generic_method(method)? => Ok(method.clone()),
            _ => Err(TypeError(format!(
                "{} is not a generic method",
                method.name
            ))),
        }
    }

    /// The type arguments of a generic method instance, empty for any other method
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_type_arguments(&self, method: &MethodInfo) -> Result<Vec<JvmTypeRc>> {
        upgrade_all(&self.method_resolution(method)?.type_arguments)
    }

    /// The bindings a generic method instance applies to its definition's type parameters
    ///
    /// Any other method binds nothing.
    ///
    /// # Errors
    /// Returns an error if the method cannot be resolved
    pub fn method_type_bindings(&self, method: &MethodInfo) -> Result<TypeBindings> {
        let resolution = self.method_resolution(method)?;

        let mut bindings = TypeBindings::new();
        for (parameter, argument) in resolution
            .generic_parameters
            .iter()
            .zip(&resolution.type_arguments)
        {
            bindings.insert(upgrade!(parameter)?.token, upgrade!(argument)?);
        }
        Ok(bindings)
    }

    /// Returns `true` if the return type or a parameter type of `method` mentions a type variable
    ///
    /// # Errors
    /// Returns an error if the method or one of its types cannot be resolved
    pub fn method_contains_generic_parameters(&self, method: &MethodInfo) -> Result<bool> {
        if self.contains_generic_parameters(&self.method_return_type(method)?)? {
            return Ok(true);
        }

        for parameter in self.method_parameter_types(method)? {
            if self.contains_generic_parameters(&parameter)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The method behind a generic method instance, `None` for any other method
    pub(crate) fn generic_definition_token(method: &MethodInfo) -> Option<Token> {
        match method.kind {
            MethodKind::GenericMethodInstance { definition } => Some(definition),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        metadata::{
            method::MethodAccessFlags,
            signatures::BaseType,
            typesystem::{MethodBuilder, TypeBuilder},
        },
        Error,
    };

    fn collections() -> (Arc<TypeRegistry>, JvmTypeRc, JvmTypeRc) {
        let registry = Arc::new(TypeRegistry::new());
        let list = TypeBuilder::new(registry.clone(), "java.util.List")
            .interface()
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
            .method(
                MethodBuilder::new("toArray", "([Ljava/lang/Object;)[Ljava/lang/Object;")
                    .flags(MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT)
                    .signature("<T:Ljava/lang/Object;>([TT;)[TT;"),
            )
            .method(MethodBuilder::new("get", "(I)Ljava/lang/Object;").signature("(I)TE;"))
            .method(MethodBuilder::new("size", "()I"))
            .build()
            .unwrap();
        let string = TypeBuilder::new(registry.clone(), "java.lang.String")
            .build()
            .unwrap();
        (registry, list, string)
    }

    fn declared(ty: &JvmTypeRc, name: &str) -> MethodRc {
        ty.methods
            .iter()
            .map(|(_, method)| method.clone())
            .find(|method| method.name == name)
            .unwrap()
    }

    #[test]
    fn instantiate_to_array() {
        let (registry, list, string) = collections();
        let to_array = declared(&list, "toArray");
        assert!(registry.is_generic_method(&to_array).unwrap());
        assert!(registry.is_generic_method_definition(&to_array).unwrap());
        assert!(registry.method_contains_generic_parameters(&to_array).unwrap());
        assert!(registry.method_type_bindings(&to_array).unwrap().is_empty());

        let instance = registry.make_generic_method(&to_array, &[string.clone()]).unwrap();
        assert!(matches!(instance.kind, MethodKind::GenericMethodInstance { .. }));
        assert!(registry.is_generic_method(&instance).unwrap());
        assert!(!registry.is_generic_method_definition(&instance).unwrap());
        assert!(!registry.method_contains_generic_parameters(&instance).unwrap());
        assert_eq!(
            registry.method_signature(&instance).unwrap(),
            "([Ljava/lang/String;)[Ljava/lang/String;"
        );
        assert_eq!(
            registry.method_erased_signature(&instance).unwrap(),
            "([Ljava/lang/Object;)[Ljava/lang/Object;"
        );
        assert_eq!(instance.declaring_type().unwrap().token, list.token);
        assert_eq!(instance.definition_token(), to_array.token);
        assert!(instance.is_abstract());

        let arguments = registry.method_type_arguments(&instance).unwrap();
        assert_eq!(arguments.len(), 1);
        assert_eq!(arguments[0].token, string.token);

        let bindings = registry.method_type_bindings(&instance).unwrap();
        let parameter = &registry.method_generic_parameters(&to_array).unwrap()[0];
        assert_eq!(bindings[&parameter.token].token, string.token);

        let definition = registry.generic_method_definition(&instance).unwrap();
        assert!(Arc::ptr_eq(&definition, &to_array));
        let own = registry.generic_method_definition(&to_array).unwrap();
        assert!(Arc::ptr_eq(&own, &to_array));

        let again = registry.make_generic_method(&to_array, &[string.clone()]).unwrap();
        assert!(Arc::ptr_eq(&instance, &again));

        let erased = registry.erased_method_definition(&instance).unwrap();
        let erased_definition = registry.erased_method_definition(&to_array).unwrap();
        assert!(Arc::ptr_eq(&erased, &erased_definition));
    }

    #[test]
    fn instantiate_rejects_bad_arguments() {
        let (registry, list, string) = collections();
        let to_array = declared(&list, "toArray");
        let parameter = registry.method_generic_parameters(&to_array).unwrap()[0].clone();

        assert!(matches!(
            registry.make_generic_method(&to_array, &[]),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            registry.make_generic_method(&to_array, &[string.clone(), string.clone()]),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            registry.make_generic_method(&to_array, &[registry.primitive(BaseType::Int)]),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            registry.make_generic_method(&to_array, &[parameter]),
            Err(Error::TypeError(_))
        ));

        let instance = registry.make_generic_method(&to_array, &[string.clone()]).unwrap();
        assert!(matches!(
            registry.make_generic_method(&instance, &[string.clone()]),
            Err(Error::TypeError(_))
        ));
    }

    #[test]
    fn non_generic_methods() {
        let (registry, list, string) = collections();
        let get = declared(&list, "get");
        let size = declared(&list, "size");

        assert!(!registry.is_generic_method(&get).unwrap());
        assert!(!registry.is_generic_method_definition(&get).unwrap());
        assert!(matches!(
            registry.generic_method_definition(&get),
            Err(Error::TypeError(_))
        ));
        assert!(matches!(
            registry.make_generic_method(&get, &[string.clone()]),
            Err(Error::TypeError(_))
        ));

        // `get` returns the class parameter E, `size` mentions no variable at all
        assert!(registry.method_contains_generic_parameters(&get).unwrap());
        assert!(!registry.method_contains_generic_parameters(&size).unwrap());
        assert!(registry.method_type_arguments(&size).unwrap().is_empty());
        assert_eq!(TypeRegistry::generic_definition_token(&size), None);
    }

    #[test]
    fn instantiate_view_of_generic_method() {
        let (registry, list, string) = collections();
        let strings = registry.make_generic_type(&list, &[string.clone()]).unwrap();
        let objects = registry.make_array_type(&registry.object()).unwrap();
        let to_array = registry.get_method(&strings, "toArray", &[objects]).unwrap();
        assert!(registry.is_generic_method_definition(&to_array).unwrap());

        let integer = registry.get_or_declare("java.lang.Integer").unwrap();
        let instance = registry.make_generic_method(&to_array, &[integer]).unwrap();
        assert_eq!(
            registry.method_signature(&instance).unwrap(),
            "([Ljava/lang/Integer;)[Ljava/lang/Integer;"
        );
        assert_eq!(instance.declaring_type().unwrap().token, strings.token);
        assert_eq!(
            TypeRegistry::generic_definition_token(&instance),
            Some(to_array.token)
        );
    }
}
