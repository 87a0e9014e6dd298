use crate::{
    metadata::signatures::{
        ArrayTypeSignature, BaseType, ClassSignature, ClassTypeSignature, FormalTypeParameter,
        MethodTypeSignature, SimpleClassTypeSignature, TypeArgument, TypeSignature,
        TypeVariableSignature,
    },
    Error::RecursionLimit,
    Result,
};

/// Maximum recursion depth for signature parsing
pub const MAX_RECURSION_DEPTH: usize = 50;

/// Returned by [`SignatureParser::current`] once the cursor is past the end of the input
///
/// `:` can never start a type or end an identifier-terminated production, so every grammar rule
/// that reads past the end fails on it without a separate bounds check.
const EOI: u8 = b':';

/// Signature parser for the JVM generic signature grammar (JVMS §4.7.9.1)
///
/// # Example
///
/// ```rust
/// use sigscope::metadata::signatures::SignatureParser;
///
/// let mut parser = SignatureParser::new("<T:Ljava/lang/Object;>([TT;)[TT;");
/// let sig = parser.parse_method_signature().unwrap();
/// assert_eq!(sig.formal_type_parameters.len(), 1);
/// assert_eq!(sig.parameter_types.len(), 1);
/// ```
///
/// ## Notes:
/// - Every entry point requires the complete input to be consumed, trailing characters are an error
/// - Don't re-use a parser instance for multiple signatures, the cursor is never rewound
pub struct SignatureParser<'a> {
    data: &'a [u8],
    position: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> SignatureParser<'a> {
    /// Create a new `SignatureParser` over a signature string
    ///
    /// ## Arguments
    /// * 'signature' - The signature text to read from
    #[must_use]
    pub fn new(signature: &'a str) -> Self {
        Self::with_max_depth(signature, MAX_RECURSION_DEPTH)
    }

    /// Create a new `SignatureParser` with a custom nesting limit
    ///
    /// ## Arguments
    /// * 'signature' - The signature text to read from
    /// * 'max_depth' - Maximum nesting of type arguments and array components
    #[must_use]
    pub fn with_max_depth(signature: &'a str, max_depth: usize) -> Self {
        SignatureParser {
            data: signature.as_bytes(),
            position: 0,
            depth: 0,
            max_depth,
        }
    }

    /// The character under the cursor, or `:` once the input is exhausted
    #[must_use]
    pub fn current(&self) -> u8 {
        self.data.get(self.position).copied().unwrap_or(EOI)
    }

    /// Move the cursor forward by one character
    pub fn advance(&mut self) {
        if self.position < self.data.len() {
            self.position += 1;
        }
    }

    /// Current cursor offset
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    fn at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    fn expect(&mut self, expected: u8) -> Result<()> {
        if self.at_end() || self.current() != expected {
            return Err(malformed_error!(
                "Expected '{}' at offset {} - found {}",
                expected as char,
                self.position,
                self.describe_current()
            ));
        }

        self.advance();
        Ok(())
    }

    fn expect_end(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(malformed_error!(
                "Unexpected trailing input at offset {} - {}",
                self.position,
                self.describe_current()
            ))
        }
    }

    fn describe_current(&self) -> String {
        if self.at_end() {
            "end of input".to_string()
        } else {
            format!("'{}'", self.current() as char)
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Read an identifier up to (not including) the first of `. ; [ / < > :`
    fn parse_identifier(&mut self) -> Result<String> {
        let start = self.position;
        while !self.at_end() {
            match self.current() {
                b'.' | b';' | b'[' | b'/' | b'<' | b'>' | b':' => break,
                _ => self.advance(),
            }
        }

        if start == self.position {
            return Err(malformed_error!(
                "Expected identifier at offset {} - found {}",
                start,
                self.describe_current()
            ));
        }

        // The terminators are ASCII, so the slice boundaries are always char boundaries
        String::from_utf8(self.data[start..self.position].to_vec())
            .map_err(|_| malformed_error!("Identifier at offset {} is not valid UTF-8", start))
    }

    /// `FormalTypeParameters := '<' FormalTypeParameter+ '>'`, empty when absent
    fn parse_formal_type_parameters(&mut self) -> Result<Vec<FormalTypeParameter>> {
        if self.current() != b'<' || self.at_end() {
            return Ok(Vec::new());
        }

        self.advance();
        let mut parameters = vec![self.parse_formal_type_parameter()?];
        while self.current() != b'>' {
            if self.at_end() {
                return Err(malformed_error!("Unterminated formal type parameter list"));
            }
            parameters.push(self.parse_formal_type_parameter()?);
        }
        self.advance();

        Ok(parameters)
    }

    /// `FormalTypeParameter := Identifier ':' FieldTypeSignature? (':' FieldTypeSignature)*`
    fn parse_formal_type_parameter(&mut self) -> Result<FormalTypeParameter> {
        let name = self.parse_identifier()?;
        self.expect(b':')?;

        let class_bound = match self.current() {
            b'L' | b'T' | b'[' if !self.at_end() => Some(self.parse_field_type()?),
            _ => None,
        };

        let mut interface_bounds = Vec::new();
        while self.current() == b':' && !self.at_end() {
            self.advance();
            interface_bounds.push(self.parse_field_type()?);
        }

        Ok(FormalTypeParameter {
            name,
            class_bound,
            interface_bounds,
        })
    }

    /// `FieldTypeSignature := ClassTypeSignature | TypeVariableSignature | ArrayTypeSignature`
    fn parse_field_type(&mut self) -> Result<TypeSignature> {
        match self.current() {
            b'L' | b'T' | b'[' if !self.at_end() => self.parse_type(),
            _ => Err(malformed_error!(
                "Expected class, type variable or array at offset {} - found {}",
                self.position,
                self.describe_current()
            )),
        }
    }

    /// Parse any type; `V` is accepted here and rejected by callers that forbid it
    fn parse_type(&mut self) -> Result<TypeSignature> {
        self.enter()?;

        let result = if self.at_end() {
            Err(malformed_error!("Expected type - found end of input"))
        } else {
            match self.current() {
                b'L' => self.parse_class_type().map(TypeSignature::Class),
                b'T' => {
                    self.advance();
                    let name = self.parse_identifier()?;
                    self.expect(b';')?;
                    Ok(TypeSignature::TypeVariable(TypeVariableSignature { name }))
                }
                b'[' => {
                    self.advance();
                    let component = self.parse_type()?;
                    if component.is_void() {
                        return Err(malformed_error!("Array of void at offset {}", self.position));
                    }
                    Ok(TypeSignature::Array(ArrayTypeSignature {
                        component: Box::new(component),
                    }))
                }
                tag => match BaseType::from_tag(tag) {
                    Some(base) => {
                        self.advance();
                        Ok(TypeSignature::Base(base))
                    }
                    None => Err(malformed_error!(
                        "Invalid type tag '{}' at offset {}",
                        tag as char,
                        self.position
                    )),
                },
            }
        };

        self.leave();
        result
    }

    /// `ClassTypeSignature := 'L' (Identifier '/')* SimpleClassTypeSignature ('.' SimpleClassTypeSignature)* ';'`
    fn parse_class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect(b'L')?;

        let mut path = Vec::new();
        let mut use_dollar = false;
        loop {
            let name = self.parse_identifier()?;
            let type_arguments = self.parse_type_arguments()?;
            path.push(SimpleClassTypeSignature {
                name,
                use_dollar,
                type_arguments,
            });

            match self.current() {
                b'/' if !self.at_end() => {
                    if !path[path.len() - 1].type_arguments.is_empty() {
                        return Err(malformed_error!(
                            "Package segment with type arguments at offset {}",
                            self.position
                        ));
                    }
                    use_dollar = false;
                }
                b'.' if !self.at_end() => use_dollar = true,
                b';' if !self.at_end() => {
                    self.advance();
                    break;
                }
                _ => {
                    return Err(malformed_error!(
                        "Unterminated class type at offset {} - found {}",
                        self.position,
                        self.describe_current()
                    ))
                }
            }
            self.advance();
        }

        ClassTypeSignature::new(path).ok_or_else(|| malformed_error!("Empty class type"))
    }

    /// `TypeArguments := '<' TypeArgument+ '>'`, empty when absent
    fn parse_type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        if self.current() != b'<' || self.at_end() {
            return Ok(Vec::new());
        }

        self.advance();
        let mut arguments = Vec::new();
        loop {
            if self.at_end() {
                return Err(malformed_error!("Unterminated type argument list"));
            }

            let argument = match self.current() {
                b'>' => break,
                b'*' => {
                    self.advance();
                    TypeArgument::Unbounded
                }
                b'+' => {
                    self.advance();
                    TypeArgument::Extends(self.parse_field_type()?)
                }
                b'-' => {
                    self.advance();
                    TypeArgument::Super(self.parse_field_type()?)
                }
                _ => TypeArgument::Exact(self.parse_field_type()?),
            };
            arguments.push(argument);
        }
        self.advance();

        if arguments.is_empty() {
            return Err(malformed_error!("Empty type argument list at offset {}", self.position));
        }

        Ok(arguments)
    }

    /// Parse a `ClassSignature := FormalTypeParameters? SuperclassSignature SuperinterfaceSignature*`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on any grammar violation
    pub fn parse_class_signature(&mut self) -> Result<ClassSignature> {
        let formal_type_parameters = self.parse_formal_type_parameters()?;
        let superclass = self.parse_class_type()?;

        let mut superinterfaces = Vec::new();
        while !self.at_end() {
            superinterfaces.push(self.parse_class_type()?);
        }

        Ok(ClassSignature {
            formal_type_parameters,
            superclass,
            superinterfaces,
        })
    }

    /// Parse a `MethodTypeSignature := FormalTypeParameters? '(' TypeSignature* ')' ReturnType ThrowsSignature*`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on any grammar violation
    pub fn parse_method_signature(&mut self) -> Result<MethodTypeSignature> {
        let formal_type_parameters = self.parse_formal_type_parameters()?;

        self.expect(b'(')?;
        let mut parameter_types = Vec::new();
        while self.current() != b')' {
            let parameter = self.parse_type()?;
            if parameter.is_void() {
                return Err(malformed_error!("Void parameter at offset {}", self.position));
            }
            parameter_types.push(parameter);
        }
        self.advance();

        let return_type = self.parse_type()?;

        let mut thrown_types = Vec::new();
        while !self.at_end() {
            self.expect(b'^')?;
            match self.current() {
                b'L' | b'T' if !self.at_end() => thrown_types.push(self.parse_type()?),
                _ => {
                    return Err(malformed_error!(
                        "Expected thrown class or type variable at offset {}",
                        self.position
                    ))
                }
            }
        }

        Ok(MethodTypeSignature {
            formal_type_parameters,
            parameter_types,
            return_type,
            thrown_types,
        })
    }

    /// Parse a single `TypeSignature` or `V`, consuming the whole input
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on any grammar violation
    pub fn parse_type_signature(&mut self) -> Result<TypeSignature> {
        let signature = self.parse_type()?;
        self.expect_end()?;
        Ok(signature)
    }

    /// Parse a `FieldTypeSignature`, consuming the whole input
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] on any grammar violation
    pub fn parse_field_signature(&mut self) -> Result<TypeSignature> {
        let signature = self.parse_field_type()?;
        self.expect_end()?;
        Ok(signature)
    }
}
