use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The variants fall into two groups with different handling. Grammar violations
/// ([`Error::Malformed`], [`Error::RecursionLimit`]) are fatal for the one parse call that hit
/// them: the signature is unusable and callers fall back to erased metadata. Resolution gaps
/// ([`Error::TypeNotFound`], [`Error::TypeVariableNotFound`]) describe incomplete context rather
/// than corrupt input, and the reifier may recover from them locally depending on the configured
/// [`crate::metadata::config::ArgumentPolicy`].
///
/// # Error Categories
///
/// ## Signature Parsing Errors
/// - [`Error::Malformed`] - The signature text violates the JVM signature grammar
/// - [`Error::RecursionLimit`] - Nesting exceeded the configured maximum depth
///
/// ## Type System Errors
/// - [`Error::TypeNotFound`] - Requested type not found in the registry
/// - [`Error::TypeVariableNotFound`] - A type variable name is not declared in scope
/// - [`Error::TypeError`] - General type system operation error
/// - [`Error::MethodNotFound`] - No method matched a lookup
///
/// # Examples
///
/// ```rust
/// use sigscope::{Error, metadata::signatures::parse_class_signature};
///
/// match parse_class_signature("<T:") {
///     Ok(_) => unreachable!(),
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed signature: {} ({}:{})", message, file, line);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The signature is damaged and could not be parsed.
    ///
    /// This error indicates that the input does not conform to the JVM generic signature grammar.
    /// The error includes the source location where the malformation was detected for debugging
    /// purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Recursion limit reached.
    ///
    /// Signature nesting (type arguments inside type arguments, arrays of arrays) and type
    /// substitution are bounded to keep hostile input from exhausting the stack.
    ///
    /// The associated value shows the recursion limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// Failed to find a type in the `TypeRegistry`.
    ///
    /// The associated value is the binary name or token that was looked up.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(String),

    /// A type variable name is not declared by the current scope or any enclosing scope.
    #[error("Type variable is not declared in scope - {0}")]
    TypeVariableNotFound(String),

    /// General error during `TypeRegistry` usage.
    ///
    /// Covers invalid type operations, such as parameterizing a primitive or
    /// erasing a type that lost its declaration.
    #[error("{0}")]
    TypeError(String),

    /// No method matched the requested name and parameter types.
    #[error("Failed to find method - {0}")]
    MethodNotFound(String),
}
