use std::{borrow::Cow, fmt};

use strum::{EnumCount, EnumIter};

use crate::metadata::signatures::encoders::{
    encode_class_signature, encode_method_signature, encode_type_signature,
};

/// Binary name of the implicit upper bound of every type variable and wildcard
pub const OBJECT_BINARY_NAME: &str = "java.lang.Object";

/// The nine base types of the JVM signature grammar (`B C D F I J S Z V`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
pub enum BaseType {
    /// `B` - signed byte
    Byte,
    /// `C` - UTF-16 code unit
    Char,
    /// `D` - double-precision float
    Double,
    /// `F` - single-precision float
    Float,
    /// `I` - 32bit integer
    Int,
    /// `J` - 64bit integer
    Long,
    /// `S` - 16bit integer
    Short,
    /// `Z` - true or false
    Boolean,
    /// `V` - only valid as a method return type
    Void,
}

impl BaseType {
    /// Map a signature tag character to its base type
    #[must_use]
    pub fn from_tag(tag: u8) -> Option<BaseType> {
        match tag {
            b'B' => Some(BaseType::Byte),
            b'C' => Some(BaseType::Char),
            b'D' => Some(BaseType::Double),
            b'F' => Some(BaseType::Float),
            b'I' => Some(BaseType::Int),
            b'J' => Some(BaseType::Long),
            b'S' => Some(BaseType::Short),
            b'Z' => Some(BaseType::Boolean),
            b'V' => Some(BaseType::Void),
            _ => None,
        }
    }

    /// The signature tag character of this base type
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            BaseType::Byte => 'B',
            BaseType::Char => 'C',
            BaseType::Double => 'D',
            BaseType::Float => 'F',
            BaseType::Int => 'I',
            BaseType::Long => 'J',
            BaseType::Short => 'S',
            BaseType::Boolean => 'Z',
            BaseType::Void => 'V',
        }
    }

    /// The Java keyword for this base type
    #[must_use]
    pub fn keyword(self) -> &'static str {
        match self {
            BaseType::Byte => "byte",
            BaseType::Char => "char",
            BaseType::Double => "double",
            BaseType::Float => "float",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Short => "short",
            BaseType::Boolean => "boolean",
            BaseType::Void => "void",
        }
    }
}

/// Represents a parsed type in a generic signature
///
/// `Class`, `TypeVariable` and `Array` form the `FieldTypeSignature` subset of the grammar; the
/// parser guarantees that bounds and thrown types only ever hold one of those three.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// A primitive or `void`
    Base(BaseType),
    /// `L...;` - a (possibly nested, possibly parameterized) class or interface
    Class(ClassTypeSignature),
    /// `T...;` - a reference to a formal type parameter of an enclosing declaration
    TypeVariable(TypeVariableSignature),
    /// `[` - an array of the component signature
    Array(ArrayTypeSignature),
}

impl TypeSignature {
    /// Signature of `java.lang.Object`, the implicit bound
    #[must_use]
    pub fn object() -> TypeSignature {
        TypeSignature::Class(ClassTypeSignature::from_binary_name(OBJECT_BINARY_NAME))
    }

    /// Returns `true` if this is a `FieldTypeSignature` (class, type variable or array)
    #[must_use]
    pub fn is_field_type(&self) -> bool {
        !matches!(self, TypeSignature::Base(_))
    }

    /// Returns `true` for `V`
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, TypeSignature::Base(BaseType::Void))
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_type_signature(self))
    }
}

/// One segment of a class type path
///
/// A path such as `java/util/Map.Entry<TK;TV;>` is stored as the segments `java`, `util`, `Map`
/// and `Entry`. Package segments are introduced by `/`; `use_dollar` marks segments introduced by
/// `.`, i.e. nested classes whose binary name joins onto the previous segment with `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimpleClassTypeSignature {
    /// The identifier of this segment
    pub name: String,
    /// Join this segment with `$` rather than `.` when building a binary name
    pub use_dollar: bool,
    /// The type arguments applied to this segment
    pub type_arguments: Vec<TypeArgument>,
}

impl SimpleClassTypeSignature {
    /// Create a segment without type arguments
    #[must_use]
    pub fn new(name: &str, use_dollar: bool) -> Self {
        SimpleClassTypeSignature {
            name: name.to_string(),
            use_dollar,
            type_arguments: Vec::new(),
        }
    }
}

/// A class type reference: a non-empty path of [`SimpleClassTypeSignature`] segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassTypeSignature {
    path: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Create a class type signature from its segments, `None` if `path` is empty
    #[must_use]
    pub fn new(path: Vec<SimpleClassTypeSignature>) -> Option<Self> {
        if path.is_empty() {
            None
        } else {
            Some(ClassTypeSignature { path })
        }
    }

    /// Build the signature of a non-generic class from its binary name
    ///
    /// `foo.Outer$Inner` yields the segments `foo`, `Outer` and `Inner` (the latter flagged
    /// `use_dollar`), which encodes back to `Lfoo/Outer.Inner;`.
    ///
    /// ## Arguments
    /// * 'binary_name' - Dotted binary name, nested classes separated by `$`
    #[must_use]
    pub fn from_binary_name(binary_name: &str) -> Self {
        let mut path = Vec::new();
        for package_part in binary_name.split('.') {
            for (index, nested_part) in package_part.split('$').enumerate() {
                path.push(SimpleClassTypeSignature::new(nested_part, index > 0));
            }
        }

        ClassTypeSignature { path }
    }

    /// The segments of this path, never empty
    #[must_use]
    pub fn path(&self) -> &[SimpleClassTypeSignature] {
        &self.path
    }

    /// The last segment, naming the class itself
    #[must_use]
    pub fn last(&self) -> &SimpleClassTypeSignature {
        // `new` and the parser never build an empty path
        &self.path[self.path.len() - 1]
    }

    /// Returns `true` if any segment carries type arguments
    #[must_use]
    pub fn is_parameterized(&self) -> bool {
        self.path.iter().any(|s| !s.type_arguments.is_empty())
    }

    /// The binary name of the referenced class (`foo.Outer$Inner`), ignoring type arguments
    #[must_use]
    pub fn binary_name(&self) -> String {
        let mut name = String::new();
        for (index, segment) in self.path.iter().enumerate() {
            if index > 0 {
                name.push(if segment.use_dollar { '$' } else { '.' });
            }
            name.push_str(&segment.name);
        }
        name
    }
}

/// A reference to a formal type parameter by name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVariableSignature {
    /// The name, resolved against the enclosing declaration
    pub name: String,
}

/// An array type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayTypeSignature {
    /// The element type, any signature except `void`
    pub component: Box<TypeSignature>,
}

/// A type argument of a parameterized class type
///
/// The four variants are the only legal combinations of a `(super, extends)` bound pair:
///
/// | variant     | super bound | extends bound      |
/// |-------------|-------------|--------------------|
/// | `Exact(X)`  | -           | -                  |
/// | `Extends(X)`| Bottom      | `X`                |
/// | `Super(X)`  | `X`         | `java.lang.Object` |
/// | `Unbounded` | Bottom      | `java.lang.Object` |
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArgument {
    /// A plain argument, no wildcard
    Exact(TypeSignature),
    /// `+X` - `? extends X`
    Extends(TypeSignature),
    /// `-X` - `? super X`
    Super(TypeSignature),
    /// `*` - `?`
    Unbounded,
}

impl TypeArgument {
    /// Returns `true` for the three wildcard forms
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        !matches!(self, TypeArgument::Exact(_))
    }

    /// The lower bound of a wildcard, `None` standing for Bottom (no lower bound)
    #[must_use]
    pub fn super_bound(&self) -> Option<&TypeSignature> {
        match self {
            TypeArgument::Super(bound) => Some(bound),
            _ => None,
        }
    }

    /// The upper bound of a wildcard; implicit `java.lang.Object` unless `? extends X`
    ///
    /// For a plain argument this is the argument itself.
    #[must_use]
    pub fn extends_bound(&self) -> Cow<'_, TypeSignature> {
        match self {
            TypeArgument::Exact(bound) | TypeArgument::Extends(bound) => Cow::Borrowed(bound),
            TypeArgument::Super(_) | TypeArgument::Unbounded => Cow::Owned(TypeSignature::object()),
        }
    }
}

/// A formal type parameter with its bounds
///
/// A missing class bound is the Bottom marker: it reifies to an implicit `java.lang.Object` when
/// there are no interface bounds either.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FormalTypeParameter {
    /// The declared name
    pub name: String,
    /// The optional class bound (first position)
    pub class_bound: Option<TypeSignature>,
    /// Any interface bounds
    pub interface_bounds: Vec<TypeSignature>,
}

impl FormalTypeParameter {
    /// All explicit bounds in declaration order
    pub fn bounds(&self) -> impl Iterator<Item = &TypeSignature> {
        self.class_bound.iter().chain(self.interface_bounds.iter())
    }
}

/// Generic signature of a class or interface declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassSignature {
    /// Formal type parameters of the declaration
    pub formal_type_parameters: Vec<FormalTypeParameter>,
    /// The superclass, `java.lang.Object` for interfaces
    pub superclass: ClassTypeSignature,
    /// Directly implemented or extended interfaces
    pub superinterfaces: Vec<ClassTypeSignature>,
}

impl fmt::Display for ClassSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_class_signature(self))
    }
}

/// Generic signature of a method or constructor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodTypeSignature {
    /// Formal type parameters of the method
    pub formal_type_parameters: Vec<FormalTypeParameter>,
    /// Parameter types in declaration order
    pub parameter_types: Vec<TypeSignature>,
    /// Return type, [`BaseType::Void`] for `V`
    pub return_type: TypeSignature,
    /// `^`-prefixed thrown types
    pub thrown_types: Vec<TypeSignature>,
}

impl fmt::Display for MethodTypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_method_signature(self))
    }
}
