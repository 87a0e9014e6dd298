//! Integration tests for the reflective type system.
//!
//! These tests declare small class hierarchies the way a class-file reader would and check the
//! reflective view of them: cyclic declarations, erasure, method lookup and concurrent use.

use sigscope::{prelude::*, Result};
use std::{sync::Arc, thread};

/// Declare `java.util.List` with a generic `toArray` and `get`
fn declare_list(registry: &Arc<TypeRegistry>) -> Result<JvmTypeRc> {
    TypeBuilder::new(registry.clone(), "java.util.List")
        .interface()
        .implements("java.util.Collection")
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/Collection<TE;>;")
        .method(
            MethodBuilder::new("toArray", "([Ljava/lang/Object;)[Ljava/lang/Object;")
                .flags(MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT)
                .signature("<T:Ljava/lang/Object;>([TT;)[TT;"),
        )
        .method(
            MethodBuilder::new("get", "(I)Ljava/lang/Object;")
                .flags(MethodAccessFlags::PUBLIC | MethodAccessFlags::ABSTRACT)
                .signature("(I)TE;"),
        )
        .build()
}

/// Test that `A<T>`, `B extends A<C>`, `C extends B` resolves without running away.
#[test]
fn test_three_class_cycle() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());

    // Declared in reverse order, so every signature mentions classes that are not declared yet
    let c = TypeBuilder::new(registry.clone(), "p.C").extends("p.B").build()?;
    let b = TypeBuilder::new(registry.clone(), "p.B")
        .extends("p.A")
        .signature("Lp/A<Lp/C;>;")
        .build()?;
    let a = TypeBuilder::new(registry.clone(), "p.A")
        .signature("<T:Ljava/lang/Object;>Ljava/lang/Object;")
        .build()?;

    let b_base = registry.resolve_generic_supertype(&b)?.unwrap();
    assert!(b_base.is_generic_instance());
    assert_eq!(registry.definition_of(&b_base)?.unwrap().token, a.token);
    assert_eq!(registry.type_arguments(&b_base)?[0].token, c.token);
    assert_eq!(registry.signature(&b_base)?, "Lp/A<Lp/C;>;");

    let c_base = registry.resolve_generic_supertype(&c)?.unwrap();
    assert!(Arc::ptr_eq(&c_base, &b));

    let a_base = registry.resolve_generic_supertype(&a)?.unwrap();
    assert_eq!(a_base.token, registry.object().token);

    registry.resolve_all()?;
    Ok(())
}

/// Test that erasure is idempotent across every flavor of type.
#[test]
fn test_erasure_idempotent() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    let list = declare_list(&registry)?;
    let string = registry.get_or_declare("java.lang.String")?;

    let element = registry.generic_parameters(&list)?[0].clone();
    let strings = registry.make_generic_type(&list, &[string.clone()])?;
    let wildcard = registry.make_wildcard(None, &string)?;
    let wild_list = registry.make_generic_type(&list, &[wildcard.clone()])?;
    let array = registry.make_array_type(&wild_list)?;
    let int = registry.primitive(BaseType::Int);

    for ty in [&list, &string, &element, &strings, &wildcard, &wild_list, &array, &int] {
        let once = registry.erase(ty)?;
        let twice = registry.erase(&once)?;
        assert!(Arc::ptr_eq(&once, &twice), "erasure of {}", registry.describe(ty)?);
    }

    assert_eq!(registry.erased_signature(&array)?, "[Ljava/util/List;");
    assert_eq!(registry.erased_signature(&wildcard)?, "Ljava/lang/String;");
    assert_eq!(registry.erased_signature(&element)?, "Ljava/lang/Object;");
    Ok(())
}

/// Test the `toArray` scenario: generic and erased texts of `List.toArray(T[])`.
#[test]
fn test_to_array_signatures() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    let list = declare_list(&registry)?;

    let objects = registry.make_array_type(&registry.object())?;
    let to_array = registry.get_method(&list, "toArray", &[objects])?;

    assert_eq!(
        registry.method_signature(&to_array)?,
        "<T:Ljava/lang/Object;>([TT;)[TT;"
    );
    assert_eq!(
        registry.method_erased_signature(&to_array)?,
        "([Ljava/lang/Object;)[Ljava/lang/Object;"
    );
    assert!(to_array.is_abstract());

    let erased = registry.erased_method_definition(&to_array)?;
    assert_eq!(
        registry.method_signature(&erased)?,
        "([Ljava/lang/Object;)[Ljava/lang/Object;"
    );
    Ok(())
}

/// Test that an erased method definition reports the erased declaring type and the original
/// reflected type.
#[test]
fn test_erased_method_definition_types() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    let list = declare_list(&registry)?;
    TypeBuilder::new(registry.clone(), "java.util.AbstractList")
        .flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::ABSTRACT)
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
        .build()?;
    let array_list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
        .extends("java.util.AbstractList")
        .implements("java.util.List")
        .signature("<E:Ljava/lang/Object;>Ljava/util/AbstractList<TE;>;Ljava/util/List<TE;>;")
        .build()?;

    let string = registry.get_or_declare("java.lang.String")?;
    let strings = registry.make_generic_type(&array_list, &[string])?;
    let int = registry.primitive(BaseType::Int);

    let get = registry.get_method(&strings, "get", &[int])?;
    assert_eq!(registry.method_signature(&get)?, "(I)Ljava/lang/String;");
    assert_eq!(registry.describe(&get.declaring_type()?)?, "java.util.List<java.lang.String>");
    assert!(Arc::ptr_eq(&get.reflected_type()?, &strings));

    let erased = registry.erased_method_definition(&get)?;
    let declaring = get.declaring_type()?;
    assert!(Arc::ptr_eq(&erased.declaring_type()?, &registry.erase(&declaring)?));
    assert!(Arc::ptr_eq(&erased.reflected_type()?, &get.reflected_type()?));
    assert_eq!(registry.signature(&erased.declaring_type()?)?, "Ljava/util/List;");
    assert_eq!(registry.definition_of(&erased.declaring_type()?)?.unwrap().token, list.token);

    let again = registry.erased_method_definition(&erased)?;
    assert!(Arc::ptr_eq(&again, &erased));
    Ok(())
}

/// Test that a signature mentioning an unresolvable variable falls back per policy.
#[test]
fn test_argument_policy() -> Result<()> {
    let lenient = Arc::new(TypeRegistry::new());
    let holder = TypeBuilder::new(lenient.clone(), "p.Holder")
        .extends("java.util.ArrayList")
        .signature("Ljava/util/ArrayList<TMissing;>;")
        .build()?;
    let base = lenient.resolve_generic_supertype(&holder)?.unwrap();
    assert_eq!(lenient.signature(&base)?, "Ljava/util/ArrayList<Ljava/lang/Object;>;");

    // Strict reification fails the signature, so the erased superclass is used instead
    let strict = Arc::new(TypeRegistry::with_config(ReificationConfig::strict()));
    let holder = TypeBuilder::new(strict.clone(), "p.Holder")
        .extends("java.util.ArrayList")
        .signature("Ljava/util/ArrayList<TMissing;>;")
        .build()?;
    let base = strict.resolve_generic_supertype(&holder)?.unwrap();
    assert_eq!(strict.signature(&base)?, "Ljava/util/ArrayList;");
    Ok(())
}

/// Test that concurrent interning from many threads converges on one instance.
#[test]
fn test_concurrent_interning() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    declare_list(&registry)?;

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || -> Result<Vec<Token>> {
                let list = registry.get_by_name("java.util.List").unwrap();
                let string = registry.get_or_declare("java.lang.String")?;
                let strings = registry.make_generic_type(&list, &[string.clone()])?;
                let array = registry.make_array_type(&strings)?;
                let wildcard = registry.make_wildcard(Some(&string), &registry.object())?;
                let element = registry.generic_parameters(&list)?[0].clone();
                Ok(vec![strings.token, array.token, wildcard.token, element.token])
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.join().unwrap()?);
    }
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    Ok(())
}

/// Test that eager resolution of a registry covers every declared class and method.
#[test]
fn test_resolve_all() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    declare_list(&registry)?;
    TypeBuilder::new(registry.clone(), "java.lang.Enum")
        .flags(ClassAccessFlags::PUBLIC | ClassAccessFlags::ABSTRACT)
        .implements("java.lang.Comparable")
        .signature("<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;")
        .method(
            MethodBuilder::new("compareTo", "(Ljava/lang/Enum;)I").signature("(TE;)I"),
        )
        .build()?;

    registry.resolve_all()?;

    let enum_type = registry.get_by_name("java.lang.Enum").unwrap();
    assert_eq!(
        registry.generic_signature(&enum_type)?,
        "<E:Ljava/lang/Enum<TE;>;>Ljava/lang/Object;Ljava/lang/Comparable<TE;>;"
    );

    let compare_to = registry.get_method(&enum_type, "compareTo", &[enum_type.clone()])?;
    assert_eq!(registry.method_erased_signature(&compare_to)?, "(Ljava/lang/Enum;)I");
    Ok(())
}

/// Test that querying a class before it is built does not freeze it as a plain class.
#[test]
fn test_forward_reference_queried_before_build() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    let array_list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
        .implements("java.util.List")
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
        .build()?;

    let element_list = registry.interfaces(&array_list)?[0].clone();
    let list = registry.definition_of(&element_list)?.unwrap();
    assert!(registry.generic_parameters(&list)?.is_empty());
    assert!(Arc::ptr_eq(&registry.erase(&element_list)?, &list));
    assert!(!registry.is_generic_definition(&list)?);

    let built = TypeBuilder::new(registry.clone(), "java.util.List")
        .interface()
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;")
        .build()?;
    assert!(Arc::ptr_eq(&built, &list));

    assert_eq!(registry.generic_parameters(&list)?.len(), 1);
    assert_eq!(
        registry.generic_signature(&list)?,
        "<E:Ljava/lang/Object;>Ljava/lang/Object;"
    );
    let string = registry.get_or_declare("java.lang.String")?;
    let strings = registry.make_generic_type(&list, &[string])?;
    assert_eq!(registry.describe(&strings)?, "java.util.List<java.lang.String>");

    let raw = registry.erase(&list)?;
    assert!(raw.is_raw());
    assert!(Arc::ptr_eq(&registry.erase(&element_list)?, &raw));
    assert_eq!(registry.erased_signature(&element_list)?, "Ljava/util/List;");
    assert!(registry.is_subtype_of(&array_list, &list)?);
    Ok(())
}

/// Test assignability and generic method instantiation across a small collection hierarchy.
#[test]
fn test_assignability_and_generic_methods() -> Result<()> {
    let registry = Arc::new(TypeRegistry::new());
    let list = declare_list(&registry)?;
    let array_list = TypeBuilder::new(registry.clone(), "java.util.ArrayList")
        .implements("java.util.List")
        .signature("<E:Ljava/lang/Object;>Ljava/lang/Object;Ljava/util/List<TE;>;")
        .build()?;
    let string = registry.get_or_declare("java.lang.String")?;

    let strings = registry.make_generic_type(&array_list, &[string.clone()])?;
    let string_list = registry.make_generic_type(&list, &[string.clone()])?;
    let collection = registry.get_or_declare("java.util.Collection")?;
    assert!(registry.is_assignable_from(&string_list, &strings)?);
    assert!(!registry.is_assignable_from(&strings, &string_list)?);
    assert!(registry.implements_interface(&strings, &collection)?);
    assert!(!registry.contains_generic_parameters(&strings)?);
    assert!(registry.contains_generic_parameters(&array_list)?);

    let objects = registry.make_array_type(&registry.object())?;
    let to_array = registry.get_method(&strings, "toArray", &[objects])?;
    let instance = registry.make_generic_method(&to_array, &[string.clone()])?;
    assert_eq!(
        registry.method_signature(&instance)?,
        "([Ljava/lang/String;)[Ljava/lang/String;"
    );
    assert!(Arc::ptr_eq(&registry.generic_method_definition(&instance)?, &to_array));
    assert_eq!(registry.method_type_bindings(&instance)?.len(), 1);
    Ok(())
}
