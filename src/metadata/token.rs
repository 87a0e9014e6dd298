use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind tags stored in the high byte of a [`Token`]
#[allow(non_snake_case)]
pub mod TOKEN_KIND {
    /// A primitive type or `void`
    pub const PRIMITIVE: u8 = 0x01;
    /// A class or interface declaration (generic or not)
    pub const CLASS: u8 = 0x02;
    /// A parameterized instance of a generic declaration
    pub const GENERIC_INSTANCE: u8 = 0x03;
    /// An array type
    pub const ARRAY: u8 = 0x04;
    /// A formal type parameter of a class or method
    pub const TYPE_VARIABLE: u8 = 0x05;
    /// A wildcard type argument
    pub const WILDCARD: u8 = 0x06;
    /// The raw (erased) view of a generic declaration
    pub const RAW: u8 = 0x07;
    /// A method declaration or method view
    pub const METHOD: u8 = 0x08;
}

/// An identity token for an entry owned by the `TypeRegistry`.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the entry kind, see [`TOKEN_KIND`]
/// - The low 24 bits (bits 0-23) are a per-kind sequence number, starting at 1
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a kind tag and a sequence number
    ///
    /// ## Arguments
    /// * 'kind' - One of the [`TOKEN_KIND`] tags
    /// * 'index' - The sequence number, truncated to 24 bits
    #[must_use]
    pub fn from_parts(kind: u8, index: u32) -> Self {
        Token((u32::from(kind) << 24) | (index & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the entry kind from the token (high byte)
    #[must_use]
    pub fn kind(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the sequence number from the token (low 24 bits)
    #[must_use]
    pub fn index(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, kind: 0x{:02x}, index: {})",
            self.0,
            self.kind(),
            self.index()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
