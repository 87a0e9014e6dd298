//! Registry-backed signature resolution.
//!
//! [`TypeResolver`] implements [`MetadataFactory`] on top of a [`TypeRegistry`]: named types come
//! from the binary name index, everything else is interned in the registry. A resolver is bound
//! to a [`TypeScope`], the class or method whose type variables its signatures may mention.
//!
//! The registry uses resolvers internally to resolve class declarations, method declarations
//! and type variable bounds on first access. Callers can use them directly to reify free-standing
//! signatures in the context of a declaration:
//!
//! ```rust
//! use std::sync::Arc;
//! use sigscope::metadata::{
//!     reifier::Reifier,
//!     signatures::parse_field_signature,
//!     typesystem::{TypeBuilder, TypeRegistry, TypeResolver, TypeScope},
//! };
//!
//! let registry = Arc::new(TypeRegistry::new());
//! let map = TypeBuilder::new(registry.clone(), "java.util.Map")
//!     .interface()
//!     .signature("<K:Ljava/lang/Object;V:Ljava/lang/Object;>Ljava/lang/Object;")
//!     .build()?;
//!
//! let mut resolver = TypeResolver::with_scope(&registry, TypeScope::Class(map.token));
//! let field = parse_field_signature("Ljava/util/Map<TK;TV;>;")?;
//! let reified = Reifier::new(&mut resolver).reify_type(&field)?;
//! assert_eq!(registry.signature(&reified)?, "Ljava/util/Map<TK;TV;>;");
//! # Ok::<(), sigscope::Error>(())
//! ```

use std::borrow::Cow;

use log::{debug, trace, warn};

use crate::{
    metadata::{
        reifier::{MetadataFactory, Reifier},
        signatures::{BaseType, FormalTypeParameter, SignatureParser, TypeSignature},
        typesystem::{
            ClassDeclaration, ClassResolution, JvmFlavor, JvmType, JvmTypeRc, JvmTypeRef, TypeRegistry, TypeScope,
            TypeVariableBounds,
        },
    },
    Error::{RecursionLimit, TypeError, TypeNotFound, TypeVariableNotFound},
    Result,
};

/// A class signature reified against the registry
#[derive(Debug, Clone)]
pub struct ReifiedClassSignature {
    /// The declared formal type parameters
    pub generic_parameters: Vec<JvmTypeRc>,
    /// The (possibly parameterized) superclass
    pub base_type: JvmTypeRc,
    /// The (possibly parameterized) superinterfaces
    pub interfaces: Vec<JvmTypeRc>,
}

/// A method signature reified against the registry
#[derive(Debug, Clone)]
pub struct ReifiedMethodSignature {
    /// The declared formal type parameters
    pub generic_parameters: Vec<JvmTypeRc>,
    /// Parameter types in declaration order
    pub parameter_types: Vec<JvmTypeRc>,
    /// The return type, `void` included
    pub return_type: JvmTypeRc,
    /// Thrown types
    pub thrown_types: Vec<JvmTypeRc>,
}

/// The [`MetadataFactory`] of a [`TypeRegistry`], bound to one resolution scope
pub struct TypeResolver<'a> {
    registry: &'a TypeRegistry,
    scope: Option<TypeScope>,
    /// Set while reifying the scope's own signature; its formal parameters then come only from
    /// `declared`, never from the (unpublished) resolution of the scope itself
    declaring: bool,
    declared: Vec<JvmTypeRc>,
}

impl<'a> TypeResolver<'a> {
    /// Create a resolver without a scope; type variables cannot be resolved or declared
    ///
    /// ## Arguments
    /// * 'registry' - The registry that owns the resolved types
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeResolver {
            registry,
            scope: None,
            declaring: false,
            declared: Vec::new(),
        }
    }

    /// Create a resolver that resolves type variables in `scope` and its enclosing scopes
    ///
    /// ## Arguments
    /// * 'registry' - The registry that owns the resolved types
    /// * 'scope'    - The class or method whose type variables are visible
    #[must_use]
    pub fn with_scope(registry: &'a TypeRegistry, scope: TypeScope) -> Self {
        TypeResolver {
            registry,
            scope: Some(scope),
            declaring: false,
            declared: Vec::new(),
        }
    }

    /// Create the resolver that reifies the signature of `scope` itself
    pub(crate) fn for_declaration(registry: &'a TypeRegistry, scope: TypeScope) -> Self {
        TypeResolver {
            registry,
            scope: Some(scope),
            declaring: true,
            declared: Vec::new(),
        }
    }

    /// The scope this resolver is bound to
    #[must_use]
    pub fn scope(&self) -> Option<TypeScope> {
        self.scope
    }
}

impl MetadataFactory for TypeResolver<'_> {
    type Type = JvmTypeRc;
    type ClassSignature = ReifiedClassSignature;
    type MethodSignature = ReifiedMethodSignature;

    fn make_named_type(&mut self, binary_name: &str) -> Result<JvmTypeRc> {
        self.registry.get_or_declare(binary_name)
    }

    fn make_parameterized_type(
        &mut self,
        declaration: JvmTypeRc,
        owner: Option<JvmTypeRc>,
        type_arguments: Vec<JvmTypeRc>,
    ) -> Result<JvmTypeRc> {
        self.registry
            .make_nested_generic_type(&declaration, owner.as_ref(), &type_arguments)
    }

    fn find_type_variable(&mut self, name: &str) -> Result<JvmTypeRc> {
        if let Some(declared) = self.declared.iter().rev().find(|tv| tv.name == name) {
            return Ok(declared.clone());
        }

        match self.scope {
            Some(scope) => self
                .registry
                .lookup_type_variable(scope, name, !self.declaring),
            None => Err(TypeVariableNotFound(name.to_string())),
        }
    }

    fn make_type_variable(&mut self, parameter: &FormalTypeParameter) -> Result<JvmTypeRc> {
        let scope = self.scope.ok_or_else(|| {
            TypeError(format!(
                "Formal type parameter {} outside of a declaration",
                parameter.name
            ))
        })?;

        let variable = self
            .registry
            .make_type_variable(scope, self.declared.len(), parameter)?;
        self.declared.push(variable.clone());
        Ok(variable)
    }

    fn make_wildcard(
        &mut self,
        super_bound: Option<&TypeSignature>,
        extends_bound: &TypeSignature,
    ) -> Result<JvmTypeRc> {
        let config = self.registry.config;
        let mut reifier = Reifier::with_config(&mut *self, config);
        let super_bound = reifier.reify_bound(super_bound)?;
        let extends_bound = reifier.reify_type(extends_bound)?;

        self.registry
            .make_wildcard(super_bound.as_ref(), &extends_bound)
    }

    fn make_array_type(&mut self, component: JvmTypeRc) -> Result<JvmTypeRc> {
        self.registry.make_array_type(&component)
    }

    fn make_primitive(&mut self, kind: BaseType) -> JvmTypeRc {
        self.registry.primitive(kind)
    }

    fn make_method_signature(
        &mut self,
        return_type: JvmTypeRc,
        parameter_types: Vec<JvmTypeRc>,
        generic_parameters: Vec<JvmTypeRc>,
        thrown_types: Vec<JvmTypeRc>,
    ) -> Result<ReifiedMethodSignature> {
        Ok(ReifiedMethodSignature {
            generic_parameters,
            parameter_types,
            return_type,
            thrown_types,
        })
    }

    fn make_class_signature(
        &mut self,
        base_type: JvmTypeRc,
        interfaces: Vec<JvmTypeRc>,
        generic_parameters: Vec<JvmTypeRc>,
    ) -> Result<ReifiedClassSignature> {
        Ok(ReifiedClassSignature {
            generic_parameters,
            base_type,
            interfaces,
        })
    }

    fn object_type(&mut self) -> Result<JvmTypeRc> {
        Ok(self.registry.object())
    }
}

fn to_refs(types: &[JvmTypeRc]) -> Vec<JvmTypeRef> {
    types.iter().map(JvmTypeRef::new).collect()
}

impl TypeRegistry {
    /// The resolved generic view of a class, resolving it on first access
    ///
    /// A class that is only referenced so far is viewed as a plain class extending
    /// `java.lang.Object`. That view is not published, so a later [`super::TypeBuilder::build`]
    /// still takes effect.
    pub(crate) fn class_resolution<'t>(
        &self,
        ty: &'t JvmType,
    ) -> Result<Cow<'t, ClassResolution>> {
        if let Some(resolution) = ty.resolution.get() {
            return Ok(Cow::Borrowed(resolution));
        }

        if !ty.is_class() {
            return Err(TypeError(format!(
                "Cannot resolve declaration of non-class type {}",
                ty.fullname()
            )));
        }

        // Declarations are never removed, so a class seen declared here stays declared
        let Some(declaration) = ty.declaration() else {
            return Ok(Cow::Owned(self.undeclared_resolution(ty)));
        };

        let resolution = self.resolve_class(ty, declaration)?;
        // A concurrent resolution may have published first; its value is the canonical one
        let _ = ty.resolution.set(resolution);

        ty.resolution
            .get()
            .map(Cow::Borrowed)
            .ok_or_else(|| TypeError(format!("Failed to resolve {}", ty.fullname())))
    }

    /// Returns `true` once nothing about `ty` can change by a later declaration
    ///
    /// Only classes that are referenced but not built yet are unsettled. `java.lang.Object` is
    /// settled either way, it never has type parameters or supertypes.
    pub(crate) fn is_settled(&self, ty: &JvmType) -> bool {
        !ty.is_class() || ty.declaration().is_some() || ty.token == self.object().token
    }

    fn undeclared_resolution(&self, ty: &JvmType) -> ClassResolution {
        trace!("Viewing undeclared type {} as a plain class", ty.fullname());
        let object = self.object();
        let base = (ty.token != object.token).then(|| JvmTypeRef::new(&object));
        ClassResolution {
            generic_parameters: Vec::new(),
            base,
            interfaces: Vec::new(),
        }
    }

    fn resolve_class(
        &self,
        ty: &JvmType,
        declaration: &ClassDeclaration,
    ) -> Result<ClassResolution> {
        if let Some(signature) = &declaration.signature {
            match self.reify_class_declaration(ty, signature) {
                Ok(resolution) => return Ok(resolution),
                Err(error) => warn!(
                    "Using erased supertypes of {} - unusable signature '{}': {}",
                    ty.fullname(),
                    signature,
                    error
                ),
            }
        }

        let base = match &declaration.erased_superclass {
            Some(name) => Some(JvmTypeRef::new(&self.get_or_declare(name)?)),
            None if ty.token == self.object().token => None,
            None => Some(JvmTypeRef::new(&self.object())),
        };

        let mut interfaces = Vec::with_capacity(declaration.erased_interfaces.len());
        for name in &declaration.erased_interfaces {
            interfaces.push(JvmTypeRef::new(&self.get_or_declare(name)?));
        }

        Ok(ClassResolution {
            generic_parameters: Vec::new(),
            base,
            interfaces,
        })
    }

    fn reify_class_declaration(&self, ty: &JvmType, signature: &str) -> Result<ClassResolution> {
        let parsed = SignatureParser::with_max_depth(signature, self.config.max_recursion_depth)
            .parse_class_signature()?;

        let mut resolver = TypeResolver::for_declaration(self, TypeScope::Class(ty.token));
        let reified = Reifier::with_config(&mut resolver, self.config)
            .reify_class_signature(&parsed)?;

        debug!(
            "Resolved {} with {} generic parameters",
            ty.fullname(),
            reified.generic_parameters.len()
        );

        Ok(ClassResolution {
            generic_parameters: to_refs(&reified.generic_parameters),
            base: Some(JvmTypeRef::new(&reified.base_type)),
            interfaces: to_refs(&reified.interfaces),
        })
    }

    /// The reified bounds of a type variable, reifying them on first access
    pub(crate) fn type_variable_bounds<'t>(
        &self,
        ty: &'t JvmType,
    ) -> Result<&'t TypeVariableBounds> {
        if let Some(bounds) = ty.bounds.get() {
            return Ok(bounds);
        }

        let JvmFlavor::TypeVariable {
            scope, declaration, ..
        } = &ty.flavor
        else {
            return Err(TypeError(format!("{} is not a type variable", ty.name)));
        };

        let bounds = match self.reify_bounds(*scope, declaration) {
            Ok(bounds) => bounds,
            Err(error) if !self.config.is_strict() => {
                warn!(
                    "Using java.lang.Object as bound of type variable {}: {}",
                    ty.name, error
                );
                TypeVariableBounds {
                    class_bound: None,
                    interface_bounds: Vec::new(),
                }
            }
            Err(error) => return Err(error),
        };
        let _ = ty.bounds.set(bounds);

        ty.bounds
            .get()
            .ok_or_else(|| TypeError(format!("Failed to resolve bounds of {}", ty.name)))
    }

    fn reify_bounds(
        &self,
        scope: TypeScope,
        declaration: &FormalTypeParameter,
    ) -> Result<TypeVariableBounds> {
        let mut resolver = TypeResolver::with_scope(self, scope);
        let mut reifier = Reifier::with_config(&mut resolver, self.config);

        let class_bound = reifier.reify_bound(declaration.class_bound.as_ref())?;
        let mut interface_bounds = Vec::with_capacity(declaration.interface_bounds.len());
        for bound in &declaration.interface_bounds {
            interface_bounds.push(JvmTypeRef::new(&reifier.reify_type(bound)?));
        }

        Ok(TypeVariableBounds {
            class_bound: class_bound.as_ref().map(JvmTypeRef::new),
            interface_bounds,
        })
    }

    /// All bounds of a type variable in declaration order, `[java.lang.Object]` when it has none
    ///
    /// For a wildcard this is its upper bound.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for types without bounds, or an error from reifying them
    pub fn bounds(&self, ty: &JvmTypeRc) -> Result<Vec<JvmTypeRc>> {
        match &ty.flavor {
            JvmFlavor::TypeVariable { .. } => {
                let bounds = self.type_variable_bounds(ty)?;

                let mut resolved = Vec::with_capacity(bounds.interface_bounds.len() + 1);
                for bound in bounds.class_bound.iter().chain(&bounds.interface_bounds) {
                    resolved.push(upgrade!(bound)?);
                }
                if resolved.is_empty() {
                    resolved.push(self.object());
                }
                Ok(resolved)
            }
            JvmFlavor::Wildcard { extends_bound, .. } => Ok(vec![upgrade!(extends_bound)?]),
            _ => Err(TypeError(format!("{} has no bounds", ty.fullname()))),
        }
    }

    /// Resolve a type variable name, starting at `scope` and walking outwards
    ///
    /// Methods see their own type parameters, then the declaring class's. Inner (non-static
    /// nested) classes also see those of their enclosing classes.
    ///
    /// ## Arguments
    /// * 'scope'       - Where the lookup starts
    /// * 'name'        - The type variable name
    /// * 'include_own' - Whether the formal parameters of `scope` itself are searched
    pub(crate) fn lookup_type_variable(
        &self,
        scope: TypeScope,
        name: &str,
        include_own: bool,
    ) -> Result<JvmTypeRc> {
        let mut next = Some((scope, include_own));
        let mut depth = 0;

        while let Some((current, include)) = next {
            depth += 1;
            if depth > self.config.max_recursion_depth {
                return Err(RecursionLimit(self.config.max_recursion_depth));
            }

            next = match current {
                TypeScope::Method(token) => {
                    let method = self
                        .method(&token)
                        .ok_or_else(|| TypeNotFound(token.to_string()))?;
                    if include {
                        let resolution = self.method_resolution(&method)?;
                        if let Some(found) = find_by_name(&resolution.generic_parameters, name)? {
                            return Ok(found);
                        }
                    }
                    Some((TypeScope::Class(method.declaring_type()?.token), true))
                }
                TypeScope::Class(token) => {
                    let ty = self
                        .get(&token)
                        .ok_or_else(|| TypeNotFound(token.to_string()))?;
                    if include {
                        let resolution = self.class_resolution(&ty)?;
                        if let Some(found) = find_by_name(&resolution.generic_parameters, name)? {
                            return Ok(found);
                        }
                    }
                    match ty.declaration() {
                        Some(declaration) if declaration.is_inner() => declaration
                            .enclosing
                            .as_ref()
                            .and_then(JvmTypeRef::token)
                            .map(|enclosing| (TypeScope::Class(enclosing), true)),
                        _ => None,
                    }
                }
            };
        }

        Err(TypeVariableNotFound(name.to_string()))
    }
}

fn find_by_name(parameters: &[JvmTypeRef], name: &str) -> Result<Option<JvmTypeRc>> {
    for parameter in parameters {
        let parameter = upgrade!(parameter)?;
        if parameter.name == name {
            return Ok(Some(parameter));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::{
        config::ReificationConfig,
        signatures::{parse_class_signature, parse_field_signature},
        typesystem::TypeBuilder,
    };

    #[test]
    fn unscoped_resolver_rejects_variables() {
        let registry = TypeRegistry::new();
        let mut resolver = TypeResolver::new(&registry);

        assert!(matches!(
            resolver.find_type_variable("T"),
            Err(TypeVariableNotFound(_))
        ));

        let signature = parse_class_signature("<T:Ljava/lang/Object;>Ljava/lang/Object;").unwrap();
        let result = Reifier::new(&mut resolver).reify_class_signature(&signature);
        assert!(matches!(result, Err(TypeError(_))));
    }

    #[test]
    fn inner_class_sees_enclosing_parameters() {
        let registry = Arc::new(TypeRegistry::new());
        TypeBuilder::new(registry.clone(), "p.Outer")
            .signature("<X:Ljava/lang/Object;>Ljava/lang/Object;")
            .build()
            .unwrap();
        let inner = TypeBuilder::new(registry.clone(), "p.Outer$Inner")
            .enclosing("p.Outer", false)
            .signature("Ljava/util/ArrayList<TX;>;")
            .build()
            .unwrap();
        let nested = TypeBuilder::new(registry.clone(), "p.Outer$Nested")
            .enclosing("p.Outer", true)
            .signature("Ljava/util/ArrayList<TX;>;")
            .build()
            .unwrap();

        let base = registry.resolve_generic_supertype(&inner).unwrap().unwrap();
        assert_eq!(registry.signature(&base).unwrap(), "Ljava/util/ArrayList<TX;>;");

        // Static nested classes don't capture X; the lenient policy substitutes Object
        let base = registry.resolve_generic_supertype(&nested).unwrap().unwrap();
        assert_eq!(
            registry.signature(&base).unwrap(),
            "Ljava/util/ArrayList<Ljava/lang/Object;>;"
        );
    }

    #[test]
    fn lazy_bounds_break_self_reference() {
        let registry = Arc::new(TypeRegistry::new());
        let enum_type = TypeBuilder::new(registry.clone(), "java.lang.Enum")
            .signature("<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;")
            .build()
            .unwrap();

        let parameters = registry.generic_parameters(&enum_type).unwrap();
        assert_eq!(parameters.len(), 1);

        let bounds = registry.bounds(&parameters[0]).unwrap();
        assert_eq!(bounds.len(), 1);
        assert_eq!(registry.signature(&bounds[0]).unwrap(), "Ljava/lang/Enum<TE;>;");

        let argument = &registry.type_arguments(&bounds[0]).unwrap()[0];
        assert!(Arc::ptr_eq(argument, &parameters[0]));
    }

    #[test]
    fn resolver_scope_reifies_fields() {
        let registry = Arc::new(TypeRegistry::new());
        let holder = TypeBuilder::new(registry.clone(), "p.Holder")
            .signature("<T::Ljava/lang/Comparable<TT;>;>Ljava/lang/Object;")
            .build()
            .unwrap();

        let mut resolver = TypeResolver::with_scope(&registry, TypeScope::Class(holder.token));
        assert_eq!(resolver.scope(), Some(TypeScope::Class(holder.token)));

        let field = parse_field_signature("[TT;").unwrap();
        let reified = Reifier::new(&mut resolver).reify_type(&field).unwrap();
        assert_eq!(registry.signature(&reified).unwrap(), "[TT;");
        assert_eq!(registry.erased_signature(&reified).unwrap(), "[Ljava/lang/Comparable;");
    }

    #[test]
    fn strict_bounds_propagate() {
        let registry = Arc::new(TypeRegistry::with_config(ReificationConfig::strict()));
        let holder = TypeBuilder::new(registry.clone(), "p.Holder")
            .signature("<T:TMissing;>Ljava/lang/Object;")
            .build()
            .unwrap();

        let parameter = &registry.generic_parameters(&holder).unwrap()[0];
        assert!(matches!(
            registry.bounds(parameter),
            Err(TypeVariableNotFound(name)) if name == "Missing"
        ));
    }
}
