use crate::{
    metadata::signatures::{BaseType, FormalTypeParameter, TypeSignature},
    Result,
};

/// The boundary between the [`crate::metadata::reifier::Reifier`] and whatever owns concrete types
///
/// A factory is bound to one resolution scope (the declaration whose signature is being reified)
/// and is only ever called by the reifier. Implementations are expected to intern what they
/// create: the reifier performs no caching and may ask for structurally identical types any number
/// of times.
pub trait MetadataFactory {
    /// A reified type
    type Type: Clone;
    /// A reified class signature
    type ClassSignature;
    /// A reified method signature
    type MethodSignature;

    /// Resolve or register a named, unparameterized type by its binary name
    ///
    /// Must not require the named type's own generic signature to be parsed, this is what makes
    /// forward and cyclic references safe.
    ///
    /// ## Arguments
    /// * 'binary_name' - Dotted binary name, nested classes joined with `$`
    ///
    /// # Errors
    /// Returns an error if the name cannot be resolved
    fn make_named_type(&mut self, binary_name: &str) -> Result<Self::Type>;

    /// Construct a parameterized type
    ///
    /// ## Arguments
    /// * 'declaration'    - The named type being parameterized
    /// * 'owner'          - The enclosing parameterized type for nested generics
    /// * 'type_arguments' - The reified type arguments, possibly empty when `owner` is present
    ///
    /// # Errors
    /// Returns an error if the declaration cannot be parameterized with these arguments
    fn make_parameterized_type(
        &mut self,
        declaration: Self::Type,
        owner: Option<Self::Type>,
        type_arguments: Vec<Self::Type>,
    ) -> Result<Self::Type>;

    /// Resolve a type variable name against the current scope
    ///
    /// The returned handle must be stable even before the variable's bounds are known.
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeVariableNotFound`] if no enclosing scope declares `name`
    fn find_type_variable(&mut self, name: &str) -> Result<Self::Type>;

    /// Register a formal type parameter of the current scope
    ///
    /// Bounds are handed over as signatures and attached to the variable, not reified here.
    ///
    /// # Errors
    /// Returns an error if the factory has no scope to declare the parameter in
    fn make_type_variable(&mut self, parameter: &FormalTypeParameter) -> Result<Self::Type>;

    /// Construct a wildcard from its bound signatures
    ///
    /// ## Arguments
    /// * 'super_bound'   - The lower bound, `None` for Bottom
    /// * 'extends_bound' - The upper bound, `java.lang.Object` when not declared
    ///
    /// # Errors
    /// Returns an error if a bound cannot be resolved
    fn make_wildcard(
        &mut self,
        super_bound: Option<&TypeSignature>,
        extends_bound: &TypeSignature,
    ) -> Result<Self::Type>;

    /// Construct an array of `component`
    ///
    /// # Errors
    /// Returns an error if `component` cannot be an array element
    fn make_array_type(&mut self, component: Self::Type) -> Result<Self::Type>;

    /// The primitive (or `void`) type for `kind`
    fn make_primitive(&mut self, kind: BaseType) -> Self::Type;

    /// `byte`
    fn make_byte(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Byte)
    }

    /// `char`
    fn make_char(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Char)
    }

    /// `double`
    fn make_double(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Double)
    }

    /// `float`
    fn make_float(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Float)
    }

    /// `int`
    fn make_int(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Int)
    }

    /// `long`
    fn make_long(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Long)
    }

    /// `short`
    fn make_short(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Short)
    }

    /// `boolean`
    fn make_boolean(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Boolean)
    }

    /// `void`, only produced for method return types
    fn make_void(&mut self) -> Self::Type {
        self.make_primitive(BaseType::Void)
    }

    /// Assemble a reified method signature
    ///
    /// # Errors
    /// Returns an error if the parts cannot be combined
    fn make_method_signature(
        &mut self,
        return_type: Self::Type,
        parameter_types: Vec<Self::Type>,
        generic_parameters: Vec<Self::Type>,
        thrown_types: Vec<Self::Type>,
    ) -> Result<Self::MethodSignature>;

    /// Assemble a reified class signature
    ///
    /// # Errors
    /// Returns an error if the parts cannot be combined
    fn make_class_signature(
        &mut self,
        base_type: Self::Type,
        interfaces: Vec<Self::Type>,
        generic_parameters: Vec<Self::Type>,
    ) -> Result<Self::ClassSignature>;

    /// The `java.lang.Object` type, substituted for arguments that fail to reify
    ///
    /// # Errors
    /// Returns an error if the factory has no object type
    fn object_type(&mut self) -> Result<Self::Type>;
}
