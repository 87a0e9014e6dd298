//! Method lookup through receivers, and erased method definitions.

use std::collections::{HashSet, VecDeque};

use dashmap::mapref::entry::Entry;
use log::trace;

use crate::{
    metadata::{
        method::{to_refs, MethodInfo, MethodKind, MethodRc, MethodResolution},
        token::Token,
        typesystem::{
            JvmFlavor, JvmTypeRc, JvmTypeRef, MethodViewKey, TypeBindings, TypeRegistry,
        },
    },
    Error::{MethodNotFound, RecursionLimit, TypeError, TypeNotFound},
    Result,
};

impl TypeRegistry {
    /// Find the method `name` taking `parameter_types`, as seen through `ty`
    ///
    /// Parameters are compared by erasure, so `List<String>`, raw `List` and the declaration
    /// `List` all select the same overload. The superclass chain is searched before any
    /// superinterface.
    ///
    /// A method found in the declaration of `ty` itself is returned as declared. Otherwise the
    /// result is a view whose declaring type is the receiver it was found in and whose reflected
    /// type is `ty`; its types are substituted with the receiver's type arguments, or erased if
    /// the receiver is raw. Views are interned.
    ///
    /// ## Arguments
    /// * 'ty'              - The receiver
    /// * 'name'            - The method name
    /// * 'parameter_types' - The parameter types to match, in order
    ///
    /// # Errors
    /// Returns [`crate::Error::MethodNotFound`] if no method matches
    pub fn get_method(
        &self,
        ty: &JvmTypeRc,
        name: &str,
        parameter_types: &[JvmTypeRc],
    ) -> Result<MethodRc> {
        let wanted = parameter_types
            .iter()
            .map(|parameter| self.erase(parameter).map(|erased| erased.token))
            .collect::<Result<Vec<Token>>>()?;

        let mut superclasses = Vec::new();
        let mut current = Some(ty.clone());
        while let Some(receiver) = current {
            if superclasses.len() > self.config.max_recursion_depth {
                return Err(RecursionLimit(self.config.max_recursion_depth));
            }
            if let Some(method) = self.find_declared(&receiver, name, &wanted)? {
                return self.method_view(&method, &receiver, ty);
            }
            current = self.resolve_generic_supertype(&receiver)?;
            superclasses.push(receiver);
        }

        let mut visited = HashSet::new();
        let mut pending = VecDeque::new();
        for receiver in &superclasses {
            pending.extend(self.interfaces(receiver)?);
        }
        while let Some(receiver) = pending.pop_front() {
            if !visited.insert(receiver.token) {
                continue;
            }
            if let Some(method) = self.find_declared(&receiver, name, &wanted)? {
                return self.method_view(&method, &receiver, ty);
            }
            pending.extend(self.interfaces(&receiver)?);
        }

        Err(MethodNotFound(format!(
            "{}.{}({} parameters)",
            self.describe(ty)?,
            name,
            parameter_types.len()
        )))
    }

    /// A method declared by the class behind `receiver` with matching name and erased parameters
    fn find_declared(
        &self,
        receiver: &JvmTypeRc,
        name: &str,
        wanted: &[Token],
    ) -> Result<Option<MethodRc>> {
        let Some(definition) = self.definition_of(receiver)? else {
            return Ok(None);
        };

        for (_, method) in definition.methods.iter() {
            if method.name != name {
                continue;
            }

            let parameters = self.method_parameter_types(method)?;
            if parameters.len() != wanted.len() {
                continue;
            }

            let mut matches = true;
            for (parameter, wanted) in parameters.iter().zip(wanted) {
                if self.erase(parameter)?.token != *wanted {
                    matches = false;
                    break;
                }
            }
            if matches {
                return Ok(Some(method.clone()));
            }
        }

        Ok(None)
    }

    /// `method`, declared by the class behind `receiver`, as seen from `reflected`
    fn method_view(
        &self,
        method: &MethodRc,
        receiver: &JvmTypeRc,
        reflected: &JvmTypeRc,
    ) -> Result<MethodRc> {
        if receiver.is_class() && receiver.token == reflected.token {
            return Ok(method.clone());
        }

        let key = MethodViewKey {
            definition: method.token,
            declaring_type: receiver.token,
            reflected_type: reflected.token,
        };

        let existing = self.method_views.get(&key).map(|entry| *entry.value());
        if let Some(found) = existing.and_then(|token| self.method(&token)) {
            return Ok(found);
        }

        let (resolution, settled) = self.view_resolution(method, receiver)?;
        let kind = MethodKind::View {
            definition: method.token,
        };

        // A view erased through an undeclared class is handed out but not interned
        if !settled {
            return self.insert_derived_method(method, kind, receiver, reflected, resolution);
        }

        match self.method_views.entry(key) {
            Entry::Occupied(entry) => {
                let token = *entry.get();
                self.method(&token)
                    .ok_or_else(|| TypeNotFound(token.to_string()))
            }
            Entry::Vacant(entry) => {
                let view =
                    self.insert_derived_method(method, kind, receiver, reflected, resolution)?;
                entry.insert(view.token);

                trace!(
                    "Created view {} of method {} through {}",
                    view.token,
                    method.name,
                    receiver.token
                );
                Ok(view)
            }
        }
    }

    /// The types of `method` as seen through `receiver`, and whether they are settled
    fn view_resolution(
        &self,
        method: &MethodInfo,
        receiver: &JvmTypeRc,
    ) -> Result<(MethodResolution, bool)> {
        let generic_parameters = self.method_generic_parameters(method)?;
        let parameter_types = self.method_parameter_types(method)?;
        let return_type = self.method_return_type(method)?;
        let thrown_types = self.method_thrown_types(method)?;

        match &receiver.flavor {
            JvmFlavor::GenericInstance { .. } => {
                let bindings = self.type_bindings(receiver)?;
                let resolution = self.substituted_resolution(
                    &generic_parameters,
                    &parameter_types,
                    &return_type,
                    &thrown_types,
                    &bindings,
                )?;
                Ok((resolution, true))
            }
            JvmFlavor::Raw { .. } => {
                self.erased_resolution(&parameter_types, &return_type, &thrown_types)
            }
            _ => Ok((
                MethodResolution {
                    generic_parameters: to_refs(&generic_parameters),
                    type_arguments: Vec::new(),
                    parameter_types: to_refs(&parameter_types),
                    return_type: JvmTypeRef::new(&return_type),
                    thrown_types: to_refs(&thrown_types),
                },
                true,
            )),
        }
    }

    /// The method types with `bindings` applied; generic parameters are kept as they are
    pub(crate) fn substituted_resolution(
        &self,
        generic_parameters: &[JvmTypeRc],
        parameter_types: &[JvmTypeRc],
        return_type: &JvmTypeRc,
        thrown_types: &[JvmTypeRc],
        bindings: &TypeBindings,
    ) -> Result<MethodResolution> {
        let substitute_all = |types: &[JvmTypeRc]| -> Result<Vec<JvmTypeRef>> {
            let mut substituted = Vec::with_capacity(types.len());
            for ty in types {
                substituted.push(JvmTypeRef::new(&self.substitute(ty, bindings)?));
            }
            Ok(substituted)
        };

        Ok(MethodResolution {
            generic_parameters: to_refs(generic_parameters),
            type_arguments: Vec::new(),
            parameter_types: substitute_all(parameter_types)?,
            return_type: JvmTypeRef::new(&self.substitute(return_type, bindings)?),
            thrown_types: substitute_all(thrown_types)?,
        })
    }

    /// The erased method types, and whether every erasure is settled
    fn erased_resolution(
        &self,
        parameter_types: &[JvmTypeRc],
        return_type: &JvmTypeRc,
        thrown_types: &[JvmTypeRc],
    ) -> Result<(MethodResolution, bool)> {
        let mut settled = true;
        let mut erase_all = |types: &[JvmTypeRc]| -> Result<Vec<JvmTypeRef>> {
            let mut erased = Vec::with_capacity(types.len());
            for ty in types {
                let (erasure, is_settled) = self.erase_settled(ty)?;
                settled &= is_settled;
                erased.push(JvmTypeRef::new(&erasure));
            }
            Ok(erased)
        };

        let parameter_types = erase_all(parameter_types)?;
        let thrown_types = erase_all(thrown_types)?;
        let return_type = erase_all(std::slice::from_ref(return_type))?;
        let return_type = return_type
            .into_iter()
            .next()
            .ok_or_else(|| TypeError("Method without return type".to_string()))?;

        Ok((
            MethodResolution {
                generic_parameters: Vec::new(),
                type_arguments: Vec::new(),
                parameter_types,
                return_type,
                thrown_types,
            },
            settled,
        ))
    }

    /// The erased form of `method`
    ///
    /// Its declaring type is the erasure of the method's declaring type, its reflected type is
    /// unchanged, all of its types are erased and it has no type parameters. Erasing an erased
    /// definition returns it unchanged. An instantiated generic method erases to the erased form
    /// of its generic method definition.
    ///
    /// # Errors
    /// Returns an error if the method's types cannot be resolved or erased
    pub fn erased_method_definition(&self, method: &MethodRc) -> Result<MethodRc> {
        if method.is_erased() {
            return Ok(method.clone());
        }

        if let MethodKind::GenericMethodInstance { .. } = method.kind {
            return self.erased_method_definition(&self.generic_method_definition(method)?);
        }

        if let Some(erased) = method
            .erased_definition
            .get()
            .and_then(|token| self.method(token))
        {
            return Ok(erased);
        }

        let declaring_type = self.erase(&method.declaring_type()?)?;
        let reflected_type = method.reflected_type()?;
        let (resolution, settled) = self.erased_resolution(
            &self.method_parameter_types(method)?,
            &self.method_return_type(method)?,
            &self.method_thrown_types(method)?,
        )?;

        let erased = self.insert_derived_method(
            method,
            MethodKind::ErasedDefinition {
                definition: method.token,
            },
            &declaring_type,
            &reflected_type,
            resolution,
        )?;

        if !settled {
            return Ok(erased);
        }

        // A concurrent caller may have published first; its definition is the canonical one
        if method.erased_definition.set(erased.token).is_err() {
            if let Some(published) = method
                .erased_definition
                .get()
                .and_then(|token| self.method(token))
            {
                return Ok(published);
            }
        }
        Ok(erased)
    }

    /// The declared methods of a class, parameterized or raw type
    ///
    /// # Errors
    /// Returns an error if the declaration is no longer alive
    pub fn declared_methods(&self, ty: &JvmTypeRc) -> Result<Vec<MethodRc>> {
        let Some(definition) = self.definition_of(ty)? else {
            return Ok(Vec::new());
        };

        let mut methods = Vec::with_capacity(definition.methods.count());
        for (_, method) in definition.methods.iter() {
            methods.push(self.method_view(method, ty, ty)?);
        }
        Ok(methods)
    }
}
