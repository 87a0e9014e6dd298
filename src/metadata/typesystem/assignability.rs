//! Subtyping, assignability and open-type queries.
//!
//! Subtyping follows JLS §4.10 without capture conversion: a parameterized type is a subtype of
//! another when its supertype of the same declaration has arguments contained by the other's
//! (`ArrayList<String>` is a `List<? extends Object>` but not a `List<Object>`). Assignability
//! adds primitive widening, boxing, unboxing and unchecked conversion from raw types.

use std::collections::{HashSet, VecDeque};

use crate::{
    metadata::{
        signatures::BaseType,
        token::Token,
        typesystem::{JvmFlavor, JvmTypeRc, TypeRegistry},
    },
    Error::RecursionLimit,
    Result,
};

/// Primitive types and the classes they box to
const BOXES: [(BaseType, &str); 9] = [
    (BaseType::Byte, "java.lang.Byte"),
    (BaseType::Char, "java.lang.Character"),
    (BaseType::Double, "java.lang.Double"),
    (BaseType::Float, "java.lang.Float"),
    (BaseType::Int, "java.lang.Integer"),
    (BaseType::Long, "java.lang.Long"),
    (BaseType::Short, "java.lang.Short"),
    (BaseType::Boolean, "java.lang.Boolean"),
    (BaseType::Void, "java.lang.Void"),
];

/// Widening primitive conversion (JLS §5.1.2), identity included
fn widens(from: BaseType, to: BaseType) -> bool {
    use BaseType::{Byte, Char, Double, Float, Int, Long, Short};

    if from == to {
        return true;
    }
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short | Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => to == Double,
        _ => false,
    }
}

impl TypeRegistry {
    /// Returns `true` if `ty` is a subtype of `supertype`
    ///
    /// Every reference type is a subtype of `java.lang.Object` and every type of itself.
    /// Primitives are only subtypes of themselves. Type variables are subtypes of their bounds.
    /// A parameterized supertype requires its type arguments to contain the corresponding
    /// arguments of `ty`'s supertype; raw supertypes and declarations only require the
    /// declaration to be a supertype.
    ///
    /// ## Arguments
    /// * 'ty'        - The candidate subtype
    /// * 'supertype' - The candidate supertype
    ///
    /// # Errors
    /// Returns an error if a declaration or bound cannot be resolved, or the hierarchy recurses
    /// without end
    pub fn is_subtype_of(&self, ty: &JvmTypeRc, supertype: &JvmTypeRc) -> Result<bool> {
        self.subtype_with_depth(ty, supertype, 0)
    }

    /// Returns `true` if a value of type `source` can be assigned to `target`
    ///
    /// On top of subtyping this allows widening primitive conversions (`int` to `long`), boxing
    /// (`int` to `Integer` or `Object`), unboxing followed by widening (`Integer` to `long`) and
    /// unchecked conversion from a raw type (`ArrayList` to `List<String>`). A type variable or
    /// wildcard target accepts what its upper bound accepts.
    ///
    /// ## Arguments
    /// * 'target' - The type assigned to
    /// * 'source' - The type of the assigned value
    ///
    /// # Errors
    /// Returns an error if a declaration or bound cannot be resolved, or the hierarchy recurses
    /// without end
    pub fn is_assignable_from(&self, target: &JvmTypeRc, source: &JvmTypeRc) -> Result<bool> {
        if target.token == source.token {
            return Ok(true);
        }
        if source.is_void() || target.is_void() {
            return Ok(false);
        }

        let target = match &target.flavor {
            JvmFlavor::TypeVariable { .. } | JvmFlavor::Wildcard { .. } => {
                self.bounds(target)?.into_iter().next().unwrap_or_else(|| self.object())
            }
            _ => target.clone(),
        };

        if target.token == self.object().token {
            return Ok(true);
        }

        match (&target.flavor, &source.flavor) {
            (JvmFlavor::Primitive(to), JvmFlavor::Primitive(from)) => Ok(widens(*from, *to)),
            (JvmFlavor::Primitive(to), _) => Ok(self
                .unboxed(source)
                .is_some_and(|from| widens(from, *to))),
            (_, JvmFlavor::Primitive(from)) => {
                let boxed = self.boxed(*from)?;
                self.unchecked_subtype(&boxed, &target, 0)
            }
            _ => self.unchecked_subtype(source, &target, 0),
        }
    }

    /// Returns `true` if `ty`, one of its superclasses, or one of their superinterfaces
    /// (transitively) is `interface`
    ///
    /// A generic declaration or raw type as `interface` matches any parameterization of it.
    ///
    /// # Errors
    /// Returns an error if a declaration cannot be resolved, or the hierarchy recurses without
    /// end
    pub fn implements_interface(&self, ty: &JvmTypeRc, interface: &JvmTypeRc) -> Result<bool> {
        let mut visited = HashSet::new();
        let mut current = Some(ty.clone());
        let mut depth = 0;

        while let Some(class) = current {
            depth += 1;
            if depth > self.config.max_recursion_depth {
                return Err(RecursionLimit(self.config.max_recursion_depth));
            }

            let mut pending: VecDeque<JvmTypeRc> = self.interfaces(&class)?.into();
            while let Some(candidate) = pending.pop_front() {
                if !visited.insert(candidate.token) {
                    continue;
                }
                if self.is_equivalent_interface(&candidate, interface)? {
                    return Ok(true);
                }
                pending.extend(self.interfaces(&candidate)?);
            }

            current = self.resolve_generic_supertype(&class)?;
        }

        Ok(false)
    }

    fn is_equivalent_interface(
        &self,
        candidate: &JvmTypeRc,
        interface: &JvmTypeRc,
    ) -> Result<bool> {
        if candidate.token == interface.token {
            return Ok(true);
        }
        if !matches!(interface.flavor, JvmFlavor::Class | JvmFlavor::Raw { .. }) {
            return Ok(false);
        }

        match (self.definition_of(candidate)?, self.definition_of(interface)?) {
            (Some(candidate), Some(interface)) => Ok(candidate.token == interface.token),
            _ => Ok(false),
        }
    }

    /// Returns `true` if `ty` mentions a type variable anywhere, or is a generic declaration
    ///
    /// `List<E>`, `E[]`, `? extends E` and the declaration `List` are open. `List<String>`, the
    /// raw `List` and primitives are not.
    ///
    /// # Errors
    /// Returns an error if a declaration cannot be resolved, or nesting is too deep
    pub fn contains_generic_parameters(&self, ty: &JvmTypeRc) -> Result<bool> {
        self.contains_generic_parameters_with_depth(ty, 0)
    }

    fn contains_generic_parameters_with_depth(
        &self,
        ty: &JvmTypeRc,
        depth: usize,
    ) -> Result<bool> {
        if depth > self.config.max_recursion_depth {
            return Err(RecursionLimit(self.config.max_recursion_depth));
        }

        match &ty.flavor {
            JvmFlavor::Primitive(_) | JvmFlavor::Raw { .. } => Ok(false),
            JvmFlavor::TypeVariable { .. } => Ok(true),
            JvmFlavor::Class => self.is_generic_definition(ty),
            JvmFlavor::Array { component } => {
                self.contains_generic_parameters_with_depth(&upgrade!(component)?, depth + 1)
            }
            JvmFlavor::GenericInstance {
                owner, arguments, ..
            } => {
                for argument in arguments {
                    let argument = upgrade!(argument)?;
                    if self.contains_generic_parameters_with_depth(&argument, depth + 1)? {
                        return Ok(true);
                    }
                }
                match owner {
                    Some(owner) => {
                        self.contains_generic_parameters_with_depth(&upgrade!(owner)?, depth + 1)
                    }
                    None => Ok(false),
                }
            }
            JvmFlavor::Wildcard {
                super_bound,
                extends_bound,
            } => {
                if let Some(lower) = super_bound {
                    if self.contains_generic_parameters_with_depth(&upgrade!(lower)?, depth + 1)? {
                        return Ok(true);
                    }
                }
                self.contains_generic_parameters_with_depth(&upgrade!(extends_bound)?, depth + 1)
            }
        }
    }

    fn subtype_with_depth(
        &self,
        ty: &JvmTypeRc,
        supertype: &JvmTypeRc,
        depth: usize,
    ) -> Result<bool> {
        if depth > self.config.max_recursion_depth {
            return Err(RecursionLimit(self.config.max_recursion_depth));
        }

        if ty.token == supertype.token {
            return Ok(true);
        }

        if let JvmFlavor::Wildcard { super_bound, .. } = &supertype.flavor {
            return match super_bound {
                Some(lower) => self.subtype_with_depth(ty, &upgrade!(lower)?, depth + 1),
                None => Ok(false),
            };
        }

        if supertype.token == self.object().token {
            return Ok(!ty.is_primitive());
        }

        match &ty.flavor {
            JvmFlavor::Primitive(_) => return Ok(false),
            JvmFlavor::TypeVariable { .. } => {
                for bound in self.bounds(ty)? {
                    if self.subtype_with_depth(&bound, supertype, depth + 1)? {
                        return Ok(true);
                    }
                }
                return Ok(false);
            }
            JvmFlavor::Wildcard { extends_bound, .. } => {
                return self.subtype_with_depth(&upgrade!(extends_bound)?, supertype, depth + 1);
            }
            JvmFlavor::Array { component } => {
                if let JvmFlavor::Array {
                    component: super_component,
                } = &supertype.flavor
                {
                    let component = upgrade!(component)?;
                    let super_component = upgrade!(super_component)?;
                    if component.is_primitive() || super_component.is_primitive() {
                        return Ok(component.token == super_component.token);
                    }
                    return self.subtype_with_depth(&component, &super_component, depth + 1);
                }
            }
            _ => {}
        }

        match &supertype.flavor {
            JvmFlavor::Class | JvmFlavor::Raw { .. } => {
                let Some(definition) = self.definition_of(supertype)? else {
                    return Ok(false);
                };
                Ok(self.as_super(ty, definition.token)?.is_some())
            }
            JvmFlavor::GenericInstance { definition, .. } => {
                let definition = upgrade!(definition)?;
                match self.as_super(ty, definition.token)? {
                    Some(found) if found.is_generic_instance() => {
                        self.instance_contains(supertype, &found, depth + 1)
                    }
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    /// Returns `true` if every type argument of `container` contains the one of `instance`
    fn instance_contains(
        &self,
        container: &JvmTypeRc,
        instance: &JvmTypeRc,
        depth: usize,
    ) -> Result<bool> {
        let container_arguments = self.type_arguments(container)?;
        let instance_arguments = self.type_arguments(instance)?;
        if container_arguments.len() != instance_arguments.len() {
            return Ok(false);
        }

        for (outer, inner) in container_arguments.iter().zip(&instance_arguments) {
            if !self.contains_argument(outer, inner, depth)? {
                return Ok(false);
            }
        }

        match (self.owner_type(container)?, self.owner_type(instance)?) {
            (Some(container_owner), Some(instance_owner)) => {
                self.subtype_with_depth(&instance_owner, &container_owner, depth + 1)
            }
            _ => Ok(true),
        }
    }

    /// Type argument containment (JLS §4.5.1)
    fn contains_argument(
        &self,
        outer: &JvmTypeRc,
        inner: &JvmTypeRc,
        depth: usize,
    ) -> Result<bool> {
        let JvmFlavor::Wildcard {
            super_bound,
            extends_bound,
        } = &outer.flavor
        else {
            return Ok(outer.token == inner.token);
        };

        let (inner_lower, inner_upper) = match &inner.flavor {
            JvmFlavor::Wildcard {
                super_bound,
                extends_bound,
            } => (
                super_bound.as_ref().map(|lower| upgrade!(lower)).transpose()?,
                upgrade!(extends_bound)?,
            ),
            _ => (Some(inner.clone()), inner.clone()),
        };

        if !self.subtype_with_depth(&inner_upper, &upgrade!(extends_bound)?, depth + 1)? {
            return Ok(false);
        }

        match (super_bound, inner_lower) {
            (None, _) => Ok(true),
            (Some(_), None) => Ok(false),
            (Some(outer_lower), Some(inner_lower)) => {
                self.subtype_with_depth(&upgrade!(outer_lower)?, &inner_lower, depth + 1)
            }
        }
    }

    /// Subtyping that also accepts raw types where a parameterization is expected
    fn unchecked_subtype(
        &self,
        ty: &JvmTypeRc,
        supertype: &JvmTypeRc,
        depth: usize,
    ) -> Result<bool> {
        if depth > self.config.max_recursion_depth {
            return Err(RecursionLimit(self.config.max_recursion_depth));
        }

        if let (JvmFlavor::Array { component }, JvmFlavor::Array { component: super_component }) =
            (&ty.flavor, &supertype.flavor)
        {
            let component = upgrade!(component)?;
            let super_component = upgrade!(super_component)?;
            if component.is_primitive() || super_component.is_primitive() {
                return Ok(component.token == super_component.token);
            }
            return self.unchecked_subtype(&component, &super_component, depth + 1);
        }

        if self.subtype_with_depth(ty, supertype, depth)? {
            return Ok(true);
        }

        if ty.is_type_variable() {
            for bound in self.bounds(ty)? {
                if self.unchecked_subtype(&bound, supertype, depth + 1)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }

        if let JvmFlavor::GenericInstance { definition, .. } = &supertype.flavor {
            let definition = upgrade!(definition)?;
            if let Some(found) = self.as_super(ty, definition.token)? {
                return Ok(found.is_raw() || found.is_class());
            }
        }

        Ok(false)
    }

    /// The supertype of `ty` (itself included) whose declaration is `definition`
    ///
    /// Superclasses and superinterfaces are searched breadth first; type variables contribute all
    /// of their bounds.
    fn as_super(&self, ty: &JvmTypeRc, definition: Token) -> Result<Option<JvmTypeRc>> {
        let mut visited = HashSet::new();
        let mut pending = VecDeque::from([(ty.clone(), 0usize)]);

        while let Some((candidate, depth)) = pending.pop_front() {
            if depth > self.config.max_recursion_depth {
                return Err(RecursionLimit(self.config.max_recursion_depth));
            }
            if !visited.insert(candidate.token) {
                continue;
            }

            if let Some(found) = self.definition_of(&candidate)? {
                if found.token == definition {
                    return Ok(Some(candidate));
                }
            }

            if candidate.is_type_variable() {
                for bound in self.bounds(&candidate)? {
                    pending.push_back((bound, depth + 1));
                }
                continue;
            }

            if let Some(base) = self.resolve_generic_supertype(&candidate)? {
                pending.push_back((base, depth + 1));
            }
            for interface in self.interfaces(&candidate)? {
                pending.push_back((interface, depth + 1));
            }
        }

        Ok(None)
    }

    /// The class `kind` boxes to
    fn boxed(&self, kind: BaseType) -> Result<JvmTypeRc> {
        let name = BOXES
            .iter()
            .find(|(primitive, _)| *primitive == kind)
            .map_or("java.lang.Object", |(_, name)| *name);
        self.get_or_declare(name)
    }

    /// The primitive type `ty` unboxes to, if it is a box class
    fn unboxed(&self, ty: &JvmTypeRc) -> Option<BaseType> {
        if !ty.is_class() {
            return None;
        }
        let name = ty.fullname();
        BOXES
            .iter()
            .find(|(_, boxed)| *boxed == name)
            .map(|(primitive, _)| *primitive)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::typesystem::TypeBuilder;

    struct Fixture {
        registry: Arc<TypeRegistry>,
        list: JvmTypeRc,
        array_list: JvmTypeRc,
        string: JvmTypeRc,
    }

    fn fixture() -> Fixture {
        let registry = Arc::new(TypeRegistry::new());
        TypeBuilder::new(registry.clone(), "java.util.Collection")
            .interface()
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
            .build()
            .unwrap();
        let list = TypeBuilder::new(registry.clone(), "java.util.List")
            .interface()
            .implements("java.util.Collection")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
            .build()
            .unwrap();
        let array_list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
            .implements("java.util.List")
            .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
            .build()
            .unwrap();
        let string = TypeBuilder::new(registry.clone(), "java.lang.String")
            .implements("java.lang.CharSequence")
            .build()
            .unwrap();
        TypeBuilder::new(registry.clone(), "java.lang.Number").build().unwrap();
        TypeBuilder::new(registry.clone(), "java.lang.Integer")
            .extends("java.lang.Number")
            .build()
            .unwrap();

        Fixture {
            registry,
            list,
            array_list,
            string,
        }
    }

    #[test]
    fn widening_table() {
        assert!(widens(BaseType::Byte, BaseType::Double));
        assert!(widens(BaseType::Char, BaseType::Int));
        assert!(widens(BaseType::Int, BaseType::Int));
        assert!(!widens(BaseType::Char, BaseType::Short));
        assert!(!widens(BaseType::Long, BaseType::Int));
        assert!(!widens(BaseType::Boolean, BaseType::Int));
    }

    #[test]
    fn subtype_of_parameterized_types() {
        let Fixture {
            registry,
            list,
            array_list,
            string,
        } = fixture();
        let object = registry.object();

        let strings = registry.make_generic_type(&array_list, &[string.clone()]).unwrap();
        let string_list = registry.make_generic_type(&list, &[string.clone()]).unwrap();
        let object_list = registry.make_generic_type(&list, &[object.clone()]).unwrap();
        assert!(registry.is_subtype_of(&strings, &string_list).unwrap());
        assert!(!registry.is_subtype_of(&strings, &object_list).unwrap());
        assert!(!registry.is_subtype_of(&string_list, &strings).unwrap());

        let any = registry.make_wildcard(None, &object).unwrap();
        let any_list = registry.make_generic_type(&list, &[any]).unwrap();
        assert!(registry.is_subtype_of(&strings, &any_list).unwrap());

        let lower = registry.make_wildcard(Some(&string), &object).unwrap();
        let consumer = registry.make_generic_type(&list, &[lower]).unwrap();
        let objects = registry.make_generic_type(&array_list, &[object.clone()]).unwrap();
        assert!(registry.is_subtype_of(&objects, &consumer).unwrap());
        assert!(registry.is_subtype_of(&strings, &consumer).unwrap());

        let collection = registry.get_by_name("java.util.Collection").unwrap();
        let string_collection = registry.make_generic_type(&collection, &[string.clone()]).unwrap();
        assert!(registry.is_subtype_of(&strings, &string_collection).unwrap());
        assert!(registry.is_subtype_of(&strings, &list).unwrap());
        assert!(registry.is_subtype_of(&strings, &object).unwrap());

        let raw = registry.erase(&array_list).unwrap();
        let raw_list = registry.erase(&list).unwrap();
        assert!(registry.is_subtype_of(&raw, &raw_list).unwrap());
        assert!(!registry.is_subtype_of(&raw, &string_list).unwrap());
    }

    #[test]
    fn subtype_of_structural_types() {
        let Fixture {
            registry,
            list,
            string,
            ..
        } = fixture();
        let object = registry.object();
        let int = registry.primitive(BaseType::Int);
        let long = registry.primitive(BaseType::Long);

        assert!(registry.is_subtype_of(&int, &int).unwrap());
        assert!(!registry.is_subtype_of(&int, &long).unwrap());
        assert!(!registry.is_subtype_of(&int, &object).unwrap());

        let strings = registry.make_array_type(&string).unwrap();
        let objects = registry.make_array_type(&object).unwrap();
        let ints = registry.make_array_type(&int).unwrap();
        let longs = registry.make_array_type(&long).unwrap();
        assert!(registry.is_subtype_of(&strings, &objects).unwrap());
        assert!(!registry.is_subtype_of(&objects, &strings).unwrap());
        assert!(!registry.is_subtype_of(&ints, &longs).unwrap());
        assert!(!registry.is_subtype_of(&ints, &objects).unwrap());
        assert!(registry.is_subtype_of(&ints, &object).unwrap());

        let serializable = registry.get_or_declare("java.io.Serializable").unwrap();
        assert!(registry.is_subtype_of(&strings, &serializable).unwrap());

        let element = &registry.generic_parameters(&list).unwrap()[0];
        assert!(registry.is_subtype_of(element, &object).unwrap());
        assert!(!registry.is_subtype_of(element, &string).unwrap());
    }

    #[test]
    fn assignability_conversions() {
        let Fixture {
            registry,
            list,
            array_list,
            string,
        } = fixture();
        let object = registry.object();
        let int = registry.primitive(BaseType::Int);
        let long = registry.primitive(BaseType::Long);
        let boolean = registry.primitive(BaseType::Boolean);
        let void = registry.primitive(BaseType::Void);
        let integer = registry.get_by_name("java.lang.Integer").unwrap();
        let number = registry.get_by_name("java.lang.Number").unwrap();

        assert!(registry.is_assignable_from(&long, &int).unwrap());
        assert!(!registry.is_assignable_from(&int, &long).unwrap());
        assert!(!registry.is_assignable_from(&int, &boolean).unwrap());
        assert!(registry.is_assignable_from(&integer, &int).unwrap());
        assert!(registry.is_assignable_from(&number, &int).unwrap());
        assert!(registry.is_assignable_from(&int, &integer).unwrap());
        assert!(registry.is_assignable_from(&long, &integer).unwrap());
        assert!(!registry.is_assignable_from(&int, &string).unwrap());
        assert!(registry.is_assignable_from(&object, &int).unwrap());
        assert!(!registry.is_assignable_from(&object, &void).unwrap());

        let string_list = registry.make_generic_type(&list, &[string.clone()]).unwrap();
        let objects = registry.make_generic_type(&array_list, &[object.clone()]).unwrap();
        let raw = registry.erase(&array_list).unwrap();
        assert!(registry.is_assignable_from(&string_list, &raw).unwrap());
        assert!(!registry.is_assignable_from(&string_list, &objects).unwrap());
        assert!(!registry.is_assignable_from(&string, &object).unwrap());

        let element = registry.generic_parameters(&list).unwrap()[0].clone();
        assert!(registry.is_assignable_from(&object, &element).unwrap());
        assert!(registry.is_assignable_from(&element, &string).unwrap());
    }

    #[test]
    fn implements_interface_walks_hierarchy() {
        let Fixture {
            registry,
            list,
            array_list,
            string,
        } = fixture();
        let collection = registry.get_by_name("java.util.Collection").unwrap();
        let strings = registry.make_generic_type(&array_list, &[string.clone()]).unwrap();

        assert!(registry.implements_interface(&array_list, &list).unwrap());
        assert!(registry.implements_interface(&array_list, &collection).unwrap());
        assert!(registry.implements_interface(&strings, &collection).unwrap());
        assert!(registry
            .implements_interface(&strings, &registry.erase(&list).unwrap())
            .unwrap());
        assert!(!registry.implements_interface(&string, &list).unwrap());
        assert!(!registry.implements_interface(&list, &list).unwrap());

        let string_collection = registry.make_generic_type(&collection, &[string.clone()]).unwrap();
        let object_collection = registry
            .make_generic_type(&collection, &[registry.object()])
            .unwrap();
        assert!(registry.implements_interface(&strings, &string_collection).unwrap());
        assert!(!registry.implements_interface(&strings, &object_collection).unwrap());
    }

    #[test]
    fn open_types() {
        let Fixture {
            registry,
            list,
            string,
            ..
        } = fixture();
        let element = registry.generic_parameters(&list).unwrap()[0].clone();

        assert!(registry.contains_generic_parameters(&list).unwrap());
        assert!(registry.contains_generic_parameters(&element).unwrap());
        assert!(!registry.contains_generic_parameters(&string).unwrap());
        assert!(!registry.contains_generic_parameters(&registry.erase(&list).unwrap()).unwrap());
        assert!(!registry
            .contains_generic_parameters(&registry.primitive(BaseType::Int))
            .unwrap());

        let string_list = registry.make_generic_type(&list, &[string.clone()]).unwrap();
        let element_list = registry.make_generic_type(&list, &[element.clone()]).unwrap();
        let bounded = registry.make_wildcard(None, &element).unwrap();
        let bounded_list = registry.make_generic_type(&list, &[bounded.clone()]).unwrap();
        let elements = registry.make_array_type(&element).unwrap();
        assert!(!registry.contains_generic_parameters(&string_list).unwrap());
        assert!(registry.contains_generic_parameters(&element_list).unwrap());
        assert!(registry.contains_generic_parameters(&bounded).unwrap());
        assert!(registry.contains_generic_parameters(&bounded_list).unwrap());
        assert!(registry.contains_generic_parameters(&elements).unwrap());
    }
}
