//! Binary codec of primitive payloads.
//!
//! | Kind | Bytes | Layout |
//! |------|-------|--------|
//! | `bool` | 1 | 0 or 1 |
//! | `char` | 2 | one UTF-16 code unit |
//! | `byte` | 1 | signed 8-bit |
//! | `short` | 2 | signed 16-bit |
//! | `int` | 4 | signed 32-bit |
//! | `long`, `pointer` | 8 | signed 64-bit |
//! | `float` | 4 | IEEE-754 binary32 |
//! | `double` | 8 | IEEE-754 binary64 |
//! | `string` | variable | UTF-16 code units followed by a NUL unit |
//! | `type` | variable | an encoded [`crate::types::TypeInfo`] |
//! | `void`, `unknown` | 0 | empty |
//!
//! Every multi-byte number is little-endian.
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::PrimitiveKind;
//! use qrue::values::{decode_primitive, encode_primitive, PrimitiveValue};
//!
//! let bytes = encode_primitive(&PrimitiveValue::Int(1234))?;
//! assert_eq!(bytes, [0xD2, 0x04, 0x00, 0x00]);
//! assert_eq!(decode_primitive(PrimitiveKind::Int, &bytes)?, PrimitiveValue::Int(1234));
//! # Ok::<(), qrue::Error>(())
//! ```

use std::fmt;

use tracing::debug;
use widestring::{U16Str, U16String};

use crate::{
    config::CodecConfig,
    types::{
        decode_type_info_with, encode_type_info, type_to_text, DescriptorStyle, PrimitiveKind,
        TypeInfo,
    },
    wire::{io::append_le, parser::Parser},
    Error::Utf16,
    Result,
};

/// The decoded value of a primitive payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// `bool`
    Bool(bool),
    /// `char`, one UTF-16 code unit
    Char(u16),
    /// `byte`
    Byte(i8),
    /// `short`
    Short(i16),
    /// `int`
    Int(i32),
    /// `long`
    Long(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `string`
    String(String),
    /// `type`
    Type(TypeInfo),
    /// `pointer`
    Pointer(i64),
    /// `void`
    Void,
    /// `unknown`
    Unknown,
}

impl PrimitiveValue {
    /// The kind this value belongs to.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Bool(_) => PrimitiveKind::Bool,
            PrimitiveValue::Char(_) => PrimitiveKind::Char,
            PrimitiveValue::Byte(_) => PrimitiveKind::Byte,
            PrimitiveValue::Short(_) => PrimitiveKind::Short,
            PrimitiveValue::Int(_) => PrimitiveKind::Int,
            PrimitiveValue::Long(_) => PrimitiveKind::Long,
            PrimitiveValue::Float(_) => PrimitiveKind::Float,
            PrimitiveValue::Double(_) => PrimitiveKind::Double,
            PrimitiveValue::String(_) => PrimitiveKind::String,
            PrimitiveValue::Type(_) => PrimitiveKind::Type,
            PrimitiveValue::Pointer(_) => PrimitiveKind::Pointer,
            PrimitiveValue::Void => PrimitiveKind::Void,
            PrimitiveValue::Unknown => PrimitiveKind::Unknown,
        }
    }

    /// The value as a signed integer, for the integral kinds.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PrimitiveValue::Byte(v) => Some(i64::from(*v)),
            PrimitiveValue::Short(v) => Some(i64::from(*v)),
            PrimitiveValue::Int(v) => Some(i64::from(*v)),
            PrimitiveValue::Long(v) | PrimitiveValue::Pointer(v) => Some(*v),
            _ => None,
        }
    }
}

/// Renders `value` as `0x` followed by lowercase hex digits, with a leading `-` if negative.
#[must_use]
pub fn format_hex(value: i64) -> String {
    if value < 0 {
        format!("-{:#x}", value.unsigned_abs())
    } else {
        format!("{value:#x}")
    }
}

impl fmt::Display for PrimitiveValue {
    /// Canonical text of the value: `True`/`False`, hexadecimal for `long` and `pointer`,
    /// the descriptor for `type`, and the plain text of everything else.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveValue::Bool(true) => f.write_str("True"),
            PrimitiveValue::Bool(false) => f.write_str("False"),
            PrimitiveValue::Char(unit) => {
                f.write_str(&U16Str::from_slice(&[*unit]).to_string_lossy())
            }
            PrimitiveValue::Byte(v) => write!(f, "{v}"),
            PrimitiveValue::Short(v) => write!(f, "{v}"),
            PrimitiveValue::Int(v) => write!(f, "{v}"),
            PrimitiveValue::Long(v) | PrimitiveValue::Pointer(v) => f.write_str(&format_hex(*v)),
            PrimitiveValue::Float(v) if v.is_finite() => write!(f, "{v}"),
            PrimitiveValue::Double(v) if v.is_finite() => write!(f, "{v}"),
            PrimitiveValue::Float(v) => write_non_finite(f, v.is_nan(), v.is_sign_negative()),
            PrimitiveValue::Double(v) => write_non_finite(f, v.is_nan(), v.is_sign_negative()),
            PrimitiveValue::String(s) => f.write_str(s),
            PrimitiveValue::Type(t) => f.write_str(&type_to_text(t, DescriptorStyle::Full)),
            PrimitiveValue::Void => Ok(()),
            PrimitiveValue::Unknown => f.write_str("unknown"),
        }
    }
}

/// Non-finite values use the `NaN` / `Infinity` / `-Infinity` spelling the text codec parses.
fn write_non_finite(f: &mut fmt::Formatter<'_>, nan: bool, negative: bool) -> fmt::Result {
    match (nan, negative) {
        (true, _) => f.write_str("NaN"),
        (false, false) => f.write_str("Infinity"),
        (false, true) => f.write_str("-Infinity"),
    }
}

/// Encodes a primitive value into its payload bytes.
///
/// # Errors
/// Only `type` values can fail, see [`crate::types::encode_type_info`].
pub fn encode_primitive(value: &PrimitiveValue) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match value {
        PrimitiveValue::Bool(v) => buffer.push(u8::from(*v)),
        PrimitiveValue::Char(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Byte(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Short(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Int(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Long(v) | PrimitiveValue::Pointer(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Float(v) => append_le(&mut buffer, *v),
        PrimitiveValue::Double(v) => append_le(&mut buffer, *v),
        PrimitiveValue::String(s) => {
            let units = U16String::from_str(s);
            buffer.reserve((units.len() + 1) * 2);
            for unit in units.as_slice() {
                append_le(&mut buffer, *unit);
            }
            append_le(&mut buffer, 0_u16);
        }
        PrimitiveValue::Type(t) => buffer = encode_type_info(t)?,
        PrimitiveValue::Void | PrimitiveValue::Unknown => {}
    }
    Ok(buffer)
}

/// Decodes a primitive payload with the default configuration.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the payload is shorter than the kind requires,
/// [`crate::Error::Utf16`] / [`crate::Error::Malformed`] for damaged strings, and the
/// [`crate::types::decode_type_info`] errors for `type` payloads.
pub fn decode_primitive(kind: PrimitiveKind, data: &[u8]) -> Result<PrimitiveValue> {
    decode_primitive_with(kind, data, &CodecConfig::default())
}

/// Decodes a primitive payload, using `config` for embedded types.
///
/// Bytes beyond the fixed width of numeric kinds are ignored.
///
/// # Errors
/// See [`decode_primitive`].
pub fn decode_primitive_with(
    kind: PrimitiveKind,
    data: &[u8],
    config: &CodecConfig,
) -> Result<PrimitiveValue> {
    let mut parser = Parser::new(data);
    let value = match kind {
        PrimitiveKind::Bool => PrimitiveValue::Bool(parser.read_le::<u8>()? != 0),
        PrimitiveKind::Char => PrimitiveValue::Char(parser.read_le::<u16>()?),
        PrimitiveKind::Byte => PrimitiveValue::Byte(parser.read_le::<i8>()?),
        PrimitiveKind::Short => PrimitiveValue::Short(parser.read_le::<i16>()?),
        PrimitiveKind::Int => PrimitiveValue::Int(parser.read_le::<i32>()?),
        PrimitiveKind::Long => PrimitiveValue::Long(parser.read_le::<i64>()?),
        PrimitiveKind::Float => PrimitiveValue::Float(parser.read_le::<f32>()?),
        PrimitiveKind::Double => PrimitiveValue::Double(parser.read_le::<f64>()?),
        PrimitiveKind::Pointer => PrimitiveValue::Pointer(parser.read_le::<i64>()?),
        PrimitiveKind::String => PrimitiveValue::String(decode_utf16(data)?),
        PrimitiveKind::Type => PrimitiveValue::Type(decode_type_info_with(data, config)?),
        PrimitiveKind::Void => PrimitiveValue::Void,
        PrimitiveKind::Unknown => PrimitiveValue::Unknown,
    };
    Ok(value)
}

/// Decodes a whole payload as UTF-16, dropping one trailing NUL unit.
fn decode_utf16(data: &[u8]) -> Result<String> {
    if data.len() % 2 != 0 {
        return Err(malformed_error!(
            "UTF-16 payload has odd length - {}",
            data.len()
        ));
    }

    let mut units: Vec<u16> = data
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    if units.last() == Some(&0) {
        units.pop();
    }

    U16Str::from_slice(&units).to_string().map_err(|error| {
        debug!(%error, "string payload is not valid UTF-16");
        Utf16(error.to_string())
    })
}
