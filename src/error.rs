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

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! invalid_text_error {
    ($input:expr, $expected:expr) => {
        crate::Error::InvalidText {
            input: $input.to_string(),
            expected: $expected.to_string(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The codecs in this crate are pure functions; every error describes a problem with the input
/// handed to them, never a problem with shared state or I/O.
///
/// # Error Categories
///
/// ## Binary Decoding Errors
/// - [`Error::Malformed`] - The byte stream does not follow the wire layout
/// - [`Error::OutOfBounds`] - A read would run past the end of the buffer
/// - [`Error::UnknownTag`] - A case tag byte is not one this crate knows
/// - [`Error::RecursionLimit`] - Nested types or values exceed the configured depth
/// - [`Error::Utf16`] - A UTF-16 payload contains unpaired surrogates
///
/// ## Text Errors
/// - [`Error::InvalidTypeDescriptor`] - A type descriptor did not parse
/// - [`Error::InvalidText`] - Editor text was rejected for the requested type
///
/// ## Shape Errors
/// - [`Error::ShapeMismatch`] - A value was paired with a type of a different case
///
/// # Examples
///
/// ```rust
/// use qrue::{values::from_text, types::TypeInfo, types::PrimitiveKind, Error};
///
/// let byte = TypeInfo::primitive(PrimitiveKind::Byte);
/// match from_text("300", &byte) {
///     Err(Error::InvalidText { input, .. }) => assert_eq!(input, "300"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The data is damaged and could not be decoded.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding.
    #[error("Out of Bound read would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A case tag byte in a binary stream is not recognized.
    #[error("Unknown tag byte - 0x{0:02X}")]
    UnknownTag(u8),

    /// Recursion limit reached.
    ///
    /// Type trees and value trees are recursive; decoding or parsing stops once the
    /// configured depth is exceeded. The associated value is the limit that was reached.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),

    /// A UTF-16 payload could not be turned into a string.
    #[error("Invalid UTF-16 payload - {0}")]
    Utf16(String),

    /// A textual type descriptor could not be parsed.
    #[error("Invalid type input: {0}")]
    InvalidTypeDescriptor(String),

    /// Editor text is not acceptable for the requested type.
    ///
    /// Editors are expected to gate input through the validator first; this error is what the
    /// unchecked conversion reports when that did not happen.
    #[error("Invalid input {input:?} for {expected}")]
    InvalidText {
        /// The rejected text
        input: String,
        /// Description of the type the text was converted for
        expected: String,
    },

    /// A value was paired with a type of a different case.
    #[error("Value shape {found} does not match type {expected}")]
    ShapeMismatch {
        /// The case the type requires
        expected: &'static str,
        /// The case the value has
        found: &'static str,
    },
}
