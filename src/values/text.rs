//! Conversion between values and editable text.
//!
//! [`TextCodec`] renders a [`DataSegment`] as the text an editor shows for its
//! [`TypeInfo`], converts user text back into a value, and validates text without converting
//! it. A validated text always converts; anything the validator rejects fails to convert with
//! [`crate::Error::InvalidText`].
//!
//! # Text forms
//!
//! | Type | Text |
//! |------|------|
//! | `bool` | `True` / `False`, parsed case-insensitively |
//! | `byte`, `short`, `int` | decimal; `0x` hex is accepted |
//! | `long`, `pointer` | `0x` hex by default, see [`crate::config::IntegerFormat`] |
//! | `float`, `double` | `[-]digits[.digits]` without exponent, or `NaN` / `Infinity` / `-Infinity` |
//! | `char` | exactly one UTF-16 code unit |
//! | `string`, `unknown` | any text |
//! | `void` | the empty text |
//! | `type`, generic parameter | a type descriptor |
//! | enum | a value name, or a literal of the underlying kind |
//! | class | the instance handle as `0x` hex |
//! | struct | a JSON object keyed by field name |
//! | array | a JSON array |
//!
//! Inside struct and array text, members that are strings, characters, types, enum names,
//! class handles or 64-bit integers are JSON string literals; other numbers and booleans are
//! bare JSON tokens.
//!
//! # Examples
//!
//! ```rust
//! use std::{collections::BTreeMap, str::FromStr};
//! use qrue::types::{ClassInfo, PrimitiveKind, StructField, TypeInfo};
//! use qrue::values::{from_text, is_valid_text, to_text, values_equal};
//!
//! let field = |name: &str| StructField {
//!     name: name.to_string(),
//!     type_info: TypeInfo::primitive(PrimitiveKind::Int),
//! };
//! let point = TypeInfo::structure(
//!     ClassInfo::new("Game", "Point"),
//!     BTreeMap::from([(0, field("x")), (4, field("y"))]),
//! );
//!
//! assert!(is_valid_text(r#"{"x": 1, "y": 2}"#, &point));
//! let value = from_text(r#"{"x": 1, "y": 2}"#, &point)?;
//! let text = to_text(&point, Some(&value));
//! assert_eq!(text, r#"{"x":1,"y":2}"#);
//! assert!(values_equal(Some(&from_text(&text, &point)?), Some(&value)));
//! # Ok::<(), qrue::Error>(())
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::debug;

use crate::{
    config::{CodecConfig, IntegerFormat},
    types::{parse_type_descriptor_with, EnumInfo, PrimitiveKind, TypeInfo, TypeKind},
    values::{
        primitive::{decode_primitive_with, encode_primitive, format_hex, PrimitiveValue},
        shallow::{parse_array, parse_object, quote, render_array, render_object},
        DataSegment,
    },
    Error::RecursionLimit,
    Result,
};

/// Renders, parses and validates value text under a [`CodecConfig`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCodec {
    config: CodecConfig,
}

impl TextCodec {
    /// Create a codec using `config`.
    #[must_use]
    pub fn new(config: CodecConfig) -> Self {
        TextCodec { config }
    }

    /// The configuration of this codec.
    #[must_use]
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Renders `value` as text for `type_info`.
    ///
    /// Absent values, undecodable payloads and values whose shape does not match the type all
    /// render as the empty text.
    #[must_use]
    pub fn to_text(&self, type_info: &TypeInfo, value: Option<&DataSegment>) -> String {
        value
            .and_then(|value| self.render(type_info, value))
            .unwrap_or_default()
    }

    /// Converts text into a value of `type_info`.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidText`] for any text [`TextCodec::is_valid_text`]
    /// rejects, or [`crate::Error::RecursionLimit`] for values nested beyond the configured
    /// depth.
    pub fn from_text(&self, input: &str, type_info: &TypeInfo) -> Result<DataSegment> {
        self.convert(input, type_info, 0).inspect_err(|error| {
            debug!(input, type_info = %type_info, %error, "text rejected");
        })
    }

    /// Returns `true` if `input` converts into a value of `type_info`.
    #[must_use]
    pub fn is_valid_text(&self, input: &str, type_info: &TypeInfo) -> bool {
        self.convert(input, type_info, 0).is_ok()
    }

    fn render(&self, type_info: &TypeInfo, value: &DataSegment) -> Option<String> {
        match (type_info.kind(), value) {
            (TypeKind::Primitive(kind), DataSegment::Primitive(bytes)) => {
                Some(self.primitive_text(&self.decode(*kind, bytes)?))
            }
            (TypeKind::Enum(info), DataSegment::Primitive(bytes)) => {
                let value = self.decode(info.value_type, bytes)?;
                match enum_name(info, &value) {
                    Some(name) => Some(name.to_string()),
                    None => Some(self.primitive_text(&value)),
                }
            }
            (TypeKind::Generic(_), DataSegment::Primitive(bytes)) => {
                Some(self.decode(PrimitiveKind::Type, bytes)?.to_string())
            }
            (TypeKind::Class(_), DataSegment::Class(handle)) => Some(format!("{handle:#x}")),
            (TypeKind::Struct(_), DataSegment::Struct(_))
            | (TypeKind::Array(_), DataSegment::Array(_)) => self.render_member(type_info, value),
            _ => None,
        }
    }

    /// Renders a value as a JSON token, for nesting inside struct or array text.
    fn render_member(&self, type_info: &TypeInfo, value: &DataSegment) -> Option<String> {
        match (type_info.kind(), value) {
            (TypeKind::Struct(info), DataSegment::Struct(fields)) => {
                let members = info
                    .fields
                    .iter()
                    .map(|(offset, field)| {
                        let value = fields.get(offset)?;
                        Some((field.name.as_str(), self.render_member(&field.type_info, value)?))
                    })
                    .collect::<Option<Vec<_>>>()?;
                Some(render_object(members))
            }
            (TypeKind::Array(element), DataSegment::Array(items)) => items
                .iter()
                .map(|item| self.render_member(element, item))
                .collect::<Option<Vec<_>>>()
                .map(render_array),
            (TypeKind::Class(_), DataSegment::Class(handle)) => Some(quote(&format!("{handle:#x}"))),
            (TypeKind::Enum(info), DataSegment::Primitive(bytes)) => {
                let value = self.decode(info.value_type, bytes)?;
                match enum_name(info, &value) {
                    Some(name) => Some(quote(name)),
                    None => Some(json_token(&value)),
                }
            }
            (TypeKind::Primitive(kind), DataSegment::Primitive(bytes)) => {
                Some(json_token(&self.decode(*kind, bytes)?))
            }
            (TypeKind::Generic(_), DataSegment::Primitive(bytes)) => {
                Some(json_token(&self.decode(PrimitiveKind::Type, bytes)?))
            }
            _ => None,
        }
    }

    fn decode(&self, kind: PrimitiveKind, bytes: &[u8]) -> Option<PrimitiveValue> {
        decode_primitive_with(kind, bytes, &self.config)
            .inspect_err(|error| debug!(%kind, %error, "payload not renderable"))
            .ok()
    }

    fn primitive_text(&self, value: &PrimitiveValue) -> String {
        match value {
            PrimitiveValue::Long(v) => format_integer(*v, self.config.long_format),
            PrimitiveValue::Pointer(v) => format_integer(*v, self.config.pointer_format),
            other => other.to_string(),
        }
    }

    fn convert(&self, input: &str, type_info: &TypeInfo, depth: usize) -> Result<DataSegment> {
        if depth >= self.config.max_depth {
            return Err(RecursionLimit(self.config.max_depth));
        }

        match type_info.kind() {
            TypeKind::Primitive(kind) => self.convert_primitive(input, *kind, type_info),
            TypeKind::Generic(_) => self.convert_primitive(input, PrimitiveKind::Type, type_info),
            TypeKind::Enum(info) => match info.value_of(input) {
                Some(value) => {
                    let value = integer_value(info.value_type, i128::from(value))
                        .ok_or_else(|| invalid_text_error!(input, type_info))?;
                    Ok(DataSegment::Primitive(encode_primitive(&value)?))
                }
                None => self.convert_primitive(input, info.value_type, type_info),
            },
            TypeKind::Class(_) => parse_handle(input)
                .map(DataSegment::Class)
                .ok_or_else(|| invalid_text_error!(input, type_info)),
            TypeKind::Struct(info) => {
                let members =
                    parse_object(input).map_err(|_| invalid_text_error!(input, type_info))?;
                let mut fields = BTreeMap::new();
                for (offset, field) in &info.fields {
                    let member = members
                        .get(&field.name)
                        .ok_or_else(|| invalid_text_error!(input, type_info))?;
                    fields.insert(*offset, self.convert(member, &field.type_info, depth + 1)?);
                }
                Ok(DataSegment::Struct(fields))
            }
            TypeKind::Array(element) => {
                let items = parse_array(input).map_err(|_| invalid_text_error!(input, type_info))?;
                items
                    .iter()
                    .map(|item| self.convert(item, element, depth + 1))
                    .collect::<Result<Vec<_>>>()
                    .map(DataSegment::Array)
            }
        }
    }

    fn convert_primitive(
        &self,
        input: &str,
        kind: PrimitiveKind,
        type_info: &TypeInfo,
    ) -> Result<DataSegment> {
        let value = self
            .parse_primitive(input, kind)
            .ok_or_else(|| invalid_text_error!(input, type_info))?;
        Ok(DataSegment::Primitive(encode_primitive(&value)?))
    }

    fn parse_primitive(&self, input: &str, kind: PrimitiveKind) -> Option<PrimitiveValue> {
        match kind {
            PrimitiveKind::Bool => {
                if input.eq_ignore_ascii_case("true") {
                    Some(PrimitiveValue::Bool(true))
                } else if input.eq_ignore_ascii_case("false") {
                    Some(PrimitiveValue::Bool(false))
                } else {
                    None
                }
            }
            PrimitiveKind::Char => {
                let mut units = input.encode_utf16();
                match (units.next(), units.next()) {
                    (Some(unit), None) => Some(PrimitiveValue::Char(unit)),
                    _ => None,
                }
            }
            PrimitiveKind::Byte
            | PrimitiveKind::Short
            | PrimitiveKind::Int
            | PrimitiveKind::Long
            | PrimitiveKind::Pointer => integer_value(kind, parse_integer(input)?),
            PrimitiveKind::Float => parse_float(input).map(PrimitiveValue::Float),
            PrimitiveKind::Double => parse_float(input).map(PrimitiveValue::Double),
            PrimitiveKind::String => Some(PrimitiveValue::String(input.to_string())),
            PrimitiveKind::Type => parse_type_descriptor_with(input, &self.config)
                .ok()
                .map(PrimitiveValue::Type),
            PrimitiveKind::Void => input.is_empty().then_some(PrimitiveValue::Void),
            PrimitiveKind::Unknown => Some(PrimitiveValue::Unknown),
        }
    }
}

/// Renders a value as text with the default configuration.
#[must_use]
pub fn to_text(type_info: &TypeInfo, value: Option<&DataSegment>) -> String {
    TextCodec::default().to_text(type_info, value)
}

/// Converts text into a value with the default configuration.
///
/// # Errors
/// See [`TextCodec::from_text`].
pub fn from_text(input: &str, type_info: &TypeInfo) -> Result<DataSegment> {
    TextCodec::default().from_text(input, type_info)
}

/// Validates text with the default configuration.
#[must_use]
pub fn is_valid_text(input: &str, type_info: &TypeInfo) -> bool {
    TextCodec::default().is_valid_text(input, type_info)
}

fn enum_name<'a>(info: &'a EnumInfo, value: &PrimitiveValue) -> Option<&'a str> {
    info.name_of(value.as_i64()?)
}

fn format_integer(value: i64, format: IntegerFormat) -> String {
    match format {
        IntegerFormat::Hex => format_hex(value),
        IntegerFormat::Decimal => value.to_string(),
    }
}

fn json_token(value: &PrimitiveValue) -> String {
    match value {
        PrimitiveValue::Bool(v) => v.to_string(),
        PrimitiveValue::Byte(_) | PrimitiveValue::Short(_) | PrimitiveValue::Int(_) => {
            value.to_string()
        }
        PrimitiveValue::Float(v) if v.is_finite() => value.to_string(),
        PrimitiveValue::Double(v) if v.is_finite() => value.to_string(),
        PrimitiveValue::Long(v) | PrimitiveValue::Pointer(v) => quote(&v.to_string()),
        other => quote(&other.to_string()),
    }
}

/// Narrows an integer to `kind`, failing outside the kind's signed range.
fn integer_value(kind: PrimitiveKind, value: i128) -> Option<PrimitiveValue> {
    match kind {
        PrimitiveKind::Byte => i8::try_from(value).ok().map(PrimitiveValue::Byte),
        PrimitiveKind::Short => i16::try_from(value).ok().map(PrimitiveValue::Short),
        PrimitiveKind::Int => i32::try_from(value).ok().map(PrimitiveValue::Int),
        PrimitiveKind::Long => i64::try_from(value).ok().map(PrimitiveValue::Long),
        PrimitiveKind::Pointer => i64::try_from(value).ok().map(PrimitiveValue::Pointer),
        _ => None,
    }
}

/// `[-]digits` or `[-]0x hexdigits`.
fn parse_integer(input: &str) -> Option<i128> {
    let (negative, digits) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    let magnitude = parse_unsigned(digits)?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_unsigned(digits: &str) -> Option<i128> {
    match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) if !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
            i128::from_str_radix(hex, 16).ok()
        }
        Some(_) => None,
        None if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            digits.parse().ok()
        }
        None => None,
    }
}

fn parse_handle(input: &str) -> Option<u64> {
    u64::try_from(parse_unsigned(input)?).ok()
}

/// A float literal, or one of the `NaN` / `Infinity` / `-Infinity` spellings.
fn parse_float<F: FromStr>(input: &str) -> Option<F> {
    match input {
        "NaN" | "Infinity" | "-Infinity" => input.parse().ok(),
        _ if is_float_literal(input) => input.parse().ok(),
        _ => None,
    }
}

/// `[-][digits].digits` or `[-]digits`.
fn is_float_literal(input: &str) -> bool {
    let digits = input.strip_prefix('-').unwrap_or(input);
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    match digits.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && !fraction.is_empty() && all_digits(fraction),
        None => !digits.is_empty() && all_digits(digits),
    }
}
