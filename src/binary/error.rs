use nom::error::{ErrorKind, ParseError};

/// Everything that can go wrong while decoding the import section. Any one
/// of these aborts the whole decode; there is no partial result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    UnexpectedEndOfInput,
    InvalidMagicNumber,
    InvalidVersion,
    InvalidFunctionTypeForm(u8),
    UnknownValueType(u8),
    UnknownElementType(u8),
    UnknownImportKind(u8),
    /// A function import referenced a type index past the end of the type
    /// list decoded so far (or no type section preceded the imports).
    InvalidTypeIndex(u32),
    /// A LEB128 encoding held a value wider than the field allows.
    IntegerOverflow,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            DecodeError::InvalidMagicNumber => write!(f, "invalid magic number"),
            DecodeError::InvalidVersion => write!(f, "unsupported module version"),
            DecodeError::InvalidFunctionTypeForm(byte) => {
                write!(f, "invalid function type form: {byte:#04x}")
            }
            DecodeError::UnknownValueType(byte) => write!(f, "unknown value type: {byte:#04x}"),
            DecodeError::UnknownElementType(byte) => {
                write!(f, "unknown table element type: {byte:#04x}")
            }
            DecodeError::UnknownImportKind(byte) => write!(f, "unknown import kind: {byte:#04x}"),
            DecodeError::InvalidTypeIndex(index) => write!(f, "type index out of range: {index}"),
            DecodeError::IntegerOverflow => write!(f, "leb128 value exceeds the field width"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl<'a> ParseError<&'a [u8]> for DecodeError {
    fn from_error_kind(_input: &'a [u8], kind: ErrorKind) -> Self {
        match kind {
            // nom-leb128 reports an over-wide encoding as TooLarge; every
            // other combinator failure in this grammar is input exhaustion.
            ErrorKind::TooLarge => DecodeError::IntegerOverflow,
            _ => DecodeError::UnexpectedEndOfInput,
        }
    }

    fn append(_input: &'a [u8], _kind: ErrorKind, other: Self) -> Self {
        other
    }
}
