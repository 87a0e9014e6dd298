//! Central type registry for JVM generic type analysis.
//!
//! This module provides the `TypeRegistry`, a thread-safe registry that owns every type and
//! method reified from class declarations. It is the single canonical store: structurally equal
//! types are interned to one instance, so identity comparisons by token are meaningful.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary storage for types and methods keyed by artificial tokens
//! - **Name-based lookup**: Binary name index for named classes and interfaces
//! - **Structural interning**: Generic instances, arrays, wildcards, type variables and raw views
//!   are keyed by the tokens of their parts
//!
//! # Thread Safety
//!
//! - Lock-free data structures for primary storage (`SkipMap`)
//! - Concurrent hash maps for indices (`DashMap`)
//! - Atomic operations for token generation
//!
//! Interning reads optimistically first, then re-checks under the index entry lock before
//! publishing. The first published instance is the canonical one.
//!
//! # Examples
//!
//! ```rust
//! use sigscope::metadata::{signatures::BaseType, typesystem::TypeRegistry};
//!
//! let registry = TypeRegistry::new();
//! let string = registry.get_or_declare("java.lang.String")?;
//! let strings = registry.make_array_type(&string)?;
//! assert_eq!(registry.signature(&strings)?, "[Ljava/lang/String;");
//!
//! let int = registry.primitive(BaseType::Int);
//! assert_eq!(registry.signature(&int)?, "I");
//! # Ok::<(), sigscope::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use log::{debug, trace};
use rayon::prelude::*;
use strum::IntoEnumIterator;

use crate::{
    metadata::{
        config::ReificationConfig,
        method::{MethodInfo, MethodRc},
        signatures::{BaseType, FormalTypeParameter, OBJECT_BINARY_NAME},
        token::{Token, TOKEN_KIND},
        typesystem::{JvmFlavor, JvmType, JvmTypeRc, JvmTypeRef, TypeKey, TypeScope},
    },
    Error::{TypeError, TypeNotFound},
    Result,
};

/// Largest token index; the upper byte of a token holds its kind
const MAX_TOKEN_INDEX: u32 = 0x00FF_FFFF;

/// Key of a method view: the declared method seen through a receiver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct MethodViewKey {
    pub definition: Token,
    pub declaring_type: Token,
    pub reflected_type: Token,
}

/// Key of an instantiated generic method: the method and its type arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct GenericMethodKey {
    pub definition: Token,
    pub arguments: Vec<Token>,
}

/// Central registry owning all types and methods
///
/// # Thread Safety
///
/// All operations take `&self` and are safe to call concurrently. Lazily resolved data (class
/// signatures, type variable bounds, erasures, method signatures) is computed outside of any
/// lock and published once; every reader sees the first published value.
pub struct TypeRegistry {
    /// Primary type storage indexed by tokens
    types: SkipMap<Token, JvmTypeRc>,
    /// Primary method storage indexed by tokens
    methods: SkipMap<Token, MethodRc>,
    /// Atomic counter for generating unique artificial tokens
    next_index: AtomicU32,
    /// Secondary index: named classes by binary name
    types_by_name: DashMap<String, Token>,
    /// Secondary index: structurally interned types
    interned: DashMap<TypeKey, Token>,
    /// Secondary index: method views by definition and receiver
    pub(crate) method_views: DashMap<MethodViewKey, Token>,
    /// Secondary index: instantiated generic methods by definition and type arguments
    pub(crate) generic_methods: DashMap<GenericMethodKey, Token>,
    /// The primitive types, in `BaseType` order
    primitives: Vec<JvmTypeRc>,
    /// `java.lang.Object`
    object: JvmTypeRc,
    /// Reification settings for all lazily resolved signatures
    pub(crate) config: ReificationConfig,
}

impl TypeRegistry {
    /// Create a new type registry with the default (lenient) configuration
    ///
    /// The primitive types and `java.lang.Object` are registered immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ReificationConfig::default())
    }

    /// Create a new type registry with an explicit configuration
    ///
    /// ## Arguments
    /// * 'config' - Reification settings applied to every signature this registry resolves
    #[must_use]
    pub fn with_config(config: ReificationConfig) -> Self {
        let types = SkipMap::new();

        let primitives: Vec<JvmTypeRc> = BaseType::iter()
            .enumerate()
            .map(|(index, kind)| {
                #[allow(clippy::cast_possible_truncation)]
                let token = Token::from_parts(TOKEN_KIND::PRIMITIVE, index as u32 + 1);
                let primitive = Arc::new(JvmType::new_primitive(token, kind));
                types.insert(token, primitive.clone());
                primitive
            })
            .collect();

        let object_token = Token::from_parts(TOKEN_KIND::CLASS, 1);
        let object = Arc::new(JvmType::new_class(object_token, OBJECT_BINARY_NAME));
        types.insert(object_token, object.clone());

        let types_by_name = DashMap::new();
        types_by_name.insert(OBJECT_BINARY_NAME.to_string(), object_token);

        TypeRegistry {
            types,
            methods: SkipMap::new(),
            next_index: AtomicU32::new(2),
            types_by_name,
            interned: DashMap::new(),
            method_views: DashMap::new(),
            generic_methods: DashMap::new(),
            primitives,
            object,
            config,
        }
    }

    /// The configuration this registry resolves signatures with
    #[must_use]
    pub fn config(&self) -> &ReificationConfig {
        &self.config
    }

    /// Get the next available token of `kind` and increment the counter
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] once all 24-bit token indices are used up
    pub(crate) fn next_token(&self, kind: u8) -> Result<Token> {
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        if index > MAX_TOKEN_INDEX {
            // The counter must never wrap back into the valid range
            self.next_index.store(MAX_TOKEN_INDEX + 1, Ordering::Relaxed);
            return Err(TypeError(format!(
                "Registry is full - no token index left for kind 0x{kind:02X}"
            )));
        }

        Ok(Token::from_parts(kind, index))
    }

    /// Get a type by its token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<JvmTypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Get a method (definition, view or erased definition) by its token
    #[must_use]
    pub fn method(&self, token: &Token) -> Option<MethodRc> {
        self.methods.get(token).map(|entry| entry.value().clone())
    }

    /// Get a named class or interface by its binary name, without declaring it
    ///
    /// ## Arguments
    /// * 'binary_name' - Dotted binary name, nested classes joined with `$`
    #[must_use]
    pub fn get_by_name(&self, binary_name: &str) -> Option<JvmTypeRc> {
        let token = self.types_by_name.get(binary_name).map(|entry| *entry.value())?;
        self.get(&token)
    }

    /// Get the named class or interface `binary_name`, registering it if it is not known yet
    ///
    /// This never parses any signature, so it is safe to call while the named class itself is
    /// being resolved.
    ///
    /// ## Arguments
    /// * 'binary_name' - Dotted binary name, nested classes joined with `$`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for an empty name
    pub fn get_or_declare(&self, binary_name: &str) -> Result<JvmTypeRc> {
        if binary_name.is_empty() || binary_name.ends_with('.') {
            return Err(TypeError(format!("Invalid binary name - '{binary_name}'")));
        }

        if let Some(existing) = self.get_by_name(binary_name) {
            return Ok(existing);
        }

        match self.types_by_name.entry(binary_name.to_string()) {
            Entry::Occupied(entry) => {
                let token = *entry.get();
                self.get(&token)
                    .ok_or_else(|| TypeNotFound(format!("{binary_name} ({token})")))
            }
            Entry::Vacant(entry) => {
                let token = self.next_token(TOKEN_KIND::CLASS)?;
                let new_type = Arc::new(JvmType::new_class(token, binary_name));
                self.types.insert(token, new_type.clone());
                entry.insert(token);

                trace!("Registered named type {binary_name} as {token}");
                Ok(new_type)
            }
        }
    }

    /// Return the canonical instance for `key`, building and publishing it if it is new
    fn intern(
        &self,
        key: TypeKey,
        kind: u8,
        build: impl FnOnce(Token) -> JvmType,
    ) -> Result<JvmTypeRc> {
        let existing = self.interned.get(&key).map(|entry| *entry.value());
        if let Some(found) = existing.and_then(|token| self.get(&token)) {
            return Ok(found);
        }

        match self.interned.entry(key) {
            Entry::Occupied(entry) => {
                let token = *entry.get();
                self.get(&token).ok_or_else(|| TypeNotFound(token.to_string()))
            }
            Entry::Vacant(entry) => {
                let token = self.next_token(kind)?;
                let new_type = Arc::new(build(token));
                self.types.insert(token, new_type.clone());
                entry.insert(token);

                trace!("Interned {:?} as {token}", new_type.flavor);
                Ok(new_type)
            }
        }
    }

    /// The primitive (or `void`) type for `kind`
    #[must_use]
    pub fn primitive(&self, kind: BaseType) -> JvmTypeRc {
        self.primitives[kind as usize].clone()
    }

    /// `java.lang.Object`
    #[must_use]
    pub fn object(&self) -> JvmTypeRc {
        self.object.clone()
    }

    /// Parameterize a generic declaration
    ///
    /// ## Arguments
    /// * 'definition' - A generic class or interface
    /// * 'arguments'  - One type argument per formal type parameter
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `definition` is not a class, an argument is
    /// primitive, or the argument count does not match a resolved declaration
    pub fn make_generic_type(
        &self,
        definition: &JvmTypeRc,
        arguments: &[JvmTypeRc],
    ) -> Result<JvmTypeRc> {
        self.make_nested_generic_type(definition, None, arguments)
    }

    /// Parameterize a (possibly nested) generic declaration
    ///
    /// With no owner and no arguments this is the declaration itself.
    ///
    /// ## Arguments
    /// * 'definition' - A class or interface
    /// * 'owner'      - The parameterized enclosing type, for `Outer<X>.Inner<Y>`
    /// * 'arguments'  - The type arguments of `definition`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if `definition` is not a class, an argument is
    /// primitive, or the argument count does not match a resolved declaration
    pub fn make_nested_generic_type(
        &self,
        definition: &JvmTypeRc,
        owner: Option<&JvmTypeRc>,
        arguments: &[JvmTypeRc],
    ) -> Result<JvmTypeRc> {
        if !definition.is_class() {
            return Err(TypeError(format!(
                "Cannot parameterize non-class type {}",
                definition.fullname()
            )));
        }

        if let Some(primitive) = arguments.iter().find(|argument| argument.is_primitive()) {
            return Err(TypeError(format!(
                "Primitive type argument {} for {}",
                primitive.name,
                definition.fullname()
            )));
        }

        // Arity is only known once the declaration is resolved; resolving it here could re-enter
        // a resolution that is still in progress
        if let Some(resolution) = definition.resolution.get() {
            if !arguments.is_empty() && resolution.generic_parameters.len() != arguments.len() {
                return Err(TypeError(format!(
                    "{} expects {} type arguments, got {}",
                    definition.fullname(),
                    resolution.generic_parameters.len(),
                    arguments.len()
                )));
            }
        }

        if owner.is_none() && arguments.is_empty() {
            return Ok(definition.clone());
        }

        let key = TypeKey::Instance {
            definition: definition.token,
            owner: owner.map(|o| o.token),
            arguments: arguments.iter().map(|a| a.token).collect(),
        };

        self.intern(key, TOKEN_KIND::GENERIC_INSTANCE, |token| {
            JvmType::new_derived(
                token,
                JvmFlavor::GenericInstance {
                    definition: JvmTypeRef::new(definition),
                    owner: owner.map(JvmTypeRef::new),
                    arguments: arguments.iter().map(JvmTypeRef::new).collect(),
                },
                definition,
            )
        })
    }

    /// An array of `component`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] for arrays of `void` or of wildcards
    pub fn make_array_type(&self, component: &JvmTypeRc) -> Result<JvmTypeRc> {
        if component.is_void() || component.is_wildcard() {
            return Err(TypeError(format!(
                "Invalid array component {}",
                component.name
            )));
        }

        self.intern(
            TypeKey::Array(component.token),
            TOKEN_KIND::ARRAY,
            |token| {
                JvmType::new_structural(
                    token,
                    JvmFlavor::Array {
                        component: JvmTypeRef::new(component),
                    },
                    format!("{}[]", component.name),
                )
            },
        )
    }

    /// A wildcard with the given bounds
    ///
    /// ## Arguments
    /// * 'super_bound'   - Lower bound, `None` for Bottom
    /// * 'extends_bound' - Upper bound, `java.lang.Object` for `?` and `? super X`
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if a bound is primitive or a wildcard itself
    pub fn make_wildcard(
        &self,
        super_bound: Option<&JvmTypeRc>,
        extends_bound: &JvmTypeRc,
    ) -> Result<JvmTypeRc> {
        for bound in super_bound.into_iter().chain(std::iter::once(extends_bound)) {
            if bound.is_primitive() || bound.is_wildcard() {
                return Err(TypeError(format!("Invalid wildcard bound {}", bound.name)));
            }
        }

        let key = TypeKey::Wildcard {
            super_bound: super_bound.map(|b| b.token),
            extends_bound: extends_bound.token,
        };

        self.intern(key, TOKEN_KIND::WILDCARD, |token| {
            JvmType::new_structural(
                token,
                JvmFlavor::Wildcard {
                    super_bound: super_bound.map(JvmTypeRef::new),
                    extends_bound: JvmTypeRef::new(extends_bound),
                },
                "?".to_string(),
            )
        })
    }

    /// The placeholder for formal type parameter `position` of `scope`
    pub(crate) fn make_type_variable(
        &self,
        scope: TypeScope,
        position: usize,
        declaration: &FormalTypeParameter,
    ) -> Result<JvmTypeRc> {
        self.intern(
            TypeKey::Variable { scope, position },
            TOKEN_KIND::TYPE_VARIABLE,
            |token| JvmType::new_type_variable(token, scope, position, declaration.clone()),
        )
    }

    /// The raw view of a generic declaration
    pub(crate) fn raw_type(&self, definition: &JvmTypeRc) -> Result<JvmTypeRc> {
        self.intern(TypeKey::Raw(definition.token), TOKEN_KIND::RAW, |token| {
            JvmType::new_derived(
                token,
                JvmFlavor::Raw {
                    definition: JvmTypeRef::new(definition),
                },
                definition,
            )
        })
    }

    /// Take ownership of a new method and assign it a token
    pub(crate) fn insert_method(
        &self,
        build: impl FnOnce(Token) -> MethodInfo,
    ) -> Result<MethodRc> {
        let token = self.next_token(TOKEN_KIND::METHOD)?;
        let method = Arc::new(build(token));
        self.methods.insert(token, method.clone());
        Ok(method)
    }

    /// Returns the number of types in the registry
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if there are no types in the registry
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all types in the registry
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, JvmTypeRc> {
        self.types.iter()
    }

    /// Returns all types in the registry
    #[must_use]
    pub fn all_types(&self) -> Vec<JvmTypeRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Eagerly resolve every declared class and method, in parallel
    ///
    /// Resolution is otherwise lazy; this surfaces every failure at once and warms all caches.
    ///
    /// # Errors
    /// Returns the first resolution error encountered
    pub fn resolve_all(&self) -> Result<()> {
        let declared: Vec<JvmTypeRc> = self
            .types
            .iter()
            .filter(|entry| entry.value().declaration().is_some())
            .map(|entry| entry.value().clone())
            .collect();

        debug!("Resolving {} declared types", declared.len());

        declared.par_iter().try_for_each(|ty| {
            self.class_resolution(ty)?;
            for (_, method) in ty.methods.iter() {
                self.method_resolution(method)?;
            }
            Ok(())
        })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a TypeRegistry {
    type Item = crossbeam_skiplist::map::Entry<'a, Token, JvmTypeRc>;
    type IntoIter = crossbeam_skiplist::map::Iter<'a, Token, JvmTypeRc>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_registry_primitives() {
        let registry = TypeRegistry::new();

        for kind in BaseType::iter() {
            let primitive = registry.primitive(kind);
            assert!(primitive.is_primitive());
            assert_eq!(primitive.token.kind(), TOKEN_KIND::PRIMITIVE);
            assert_eq!(primitive.name, kind.keyword());
            assert!(registry.get(&primitive.token).is_some());
        }

        assert_eq!(registry.object().fullname(), "java.lang.Object");
        assert_eq!(
            registry.get_by_name("java.lang.Object").unwrap().token,
            registry.object().token
        );
        assert_eq!(registry.len(), BaseType::iter().count() + 1);
    }

    #[test]
    fn test_get_or_declare_is_stable() {
        let registry = TypeRegistry::new();

        let first = registry.get_or_declare("java.util.Map$Entry").unwrap();
        let second = registry.get_or_declare("java.util.Map$Entry").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.package, "java.util");
        assert_eq!(first.name, "Map$Entry");

        assert!(registry.get_by_name("java.util.Map").is_none());
        assert!(registry.get_or_declare("").is_err());
    }

    #[test]
    fn test_interning() {
        let registry = TypeRegistry::new();
        let map = registry.get_or_declare("java.util.Map").unwrap();
        let string = registry.get_or_declare("java.lang.String").unwrap();

        let a = registry
            .make_generic_type(&map, &[string.clone(), string.clone()])
            .unwrap();
        let b = registry
            .make_generic_type(&map, &[string.clone(), string.clone()])
            .unwrap();
        assert_eq!(a.token, b.token);
        assert_eq!(a.token.kind(), TOKEN_KIND::GENERIC_INSTANCE);

        let array_a = registry.make_array_type(&a).unwrap();
        let array_b = registry.make_array_type(&b).unwrap();
        assert!(Arc::ptr_eq(&array_a, &array_b));

        let object = registry.object();
        let w1 = registry.make_wildcard(None, &object).unwrap();
        let w2 = registry.make_wildcard(None, &object).unwrap();
        let w3 = registry.make_wildcard(Some(&string), &object).unwrap();
        assert_eq!(w1.token, w2.token);
        assert_ne!(w1.token, w3.token);
    }

    #[test]
    fn test_invalid_constructions() {
        let registry = TypeRegistry::new();
        let int = registry.primitive(BaseType::Int);
        let void = registry.primitive(BaseType::Void);
        let list = registry.get_or_declare("java.util.List").unwrap();

        assert!(matches!(
            registry.make_generic_type(&list, &[int.clone()]),
            Err(TypeError(_))
        ));
        assert!(matches!(
            registry.make_generic_type(&int, &[list.clone()]),
            Err(TypeError(_))
        ));
        assert!(registry.make_array_type(&void).is_err());
        assert!(registry.make_array_type(&int).is_ok());
        assert!(registry.make_wildcard(None, &int).is_err());

        let same = registry.make_generic_type(&list, &[]).unwrap();
        assert!(Arc::ptr_eq(&same, &list));
    }

    #[test]
    fn test_concurrent_interning() {
        let registry = Arc::new(TypeRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let map = registry.get_or_declare("java.util.Map").unwrap();
                    let string = registry.get_or_declare("java.lang.String").unwrap();
                    let date = registry.get_or_declare("java.util.Date").unwrap();
                    registry.make_generic_type(&map, &[string, date]).unwrap().token
                })
            })
            .collect();

        let tokens: Vec<Token> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(tokens.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_token_exhaustion() {
        let registry = TypeRegistry::new();
        registry
            .next_index
            .store(MAX_TOKEN_INDEX, Ordering::Relaxed);

        let last = registry.get_or_declare("p.Last").unwrap();
        assert_eq!(last.token.index(), MAX_TOKEN_INDEX);

        assert!(matches!(
            registry.get_or_declare("p.Overflow"),
            Err(TypeError(_))
        ));
        assert!(registry.get_by_name("p.Overflow").is_none());
        assert!(matches!(
            registry.make_array_type(&last),
            Err(TypeError(_))
        ));

        // Earlier entries stay intact
        assert!(Arc::ptr_eq(&registry.get(&last.token).unwrap(), &last));
        assert_eq!(registry.get(&registry.object().token).unwrap().fullname(), "java.lang.Object");
    }
}
