//! Binary encoding of [`crate::types::TypeInfo`].
//!
//! This is the encoding embedded in `type`-kind primitive payloads and in the head of every
//! [`crate::values::DataPayload`]. Each type starts with two bytes, the case tag from
//! [`TYPE_TAG`] and the by-ref qualifier, followed by the case payload:
//!
//! | Case | Payload |
//! |------|---------|
//! | `PRIMITIVE` | kind byte |
//! | `ENUM` | class, underlying kind byte, count, count x (name, `i64`) |
//! | `CLASS` | class |
//! | `STRUCT` | class, count, count x (offset, name, type) |
//! | `ARRAY` | element type |
//! | `GENERIC` | `u64` handle, name |
//!
//! A class is its namespace, its name, a count and that many generic argument types. Strings
//! are a compressed length followed by UTF-8, counts and offsets are ECMA-335 compressed
//! unsigned integers, and 64-bit values are little-endian. The size of a type is never
//! transmitted; it is recomputed when the decoded type is constructed.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    config::CodecConfig,
    types::{
        ByRef, ClassInfo, EnumInfo, GenericInfo, PrimitiveKind, StructField, StructInfo,
        TypeInfo, TypeKind,
    },
    wire::{
        io::{append_le, write_compressed_len, write_compressed_uint},
        parser::Parser,
    },
    Error::{RecursionLimit, UnknownTag},
    Result,
};

#[allow(non_snake_case, missing_docs)]
/// Case tags of an encoded type
pub mod TYPE_TAG {
    pub const PRIMITIVE: u8 = 0x01;
    pub const ENUM: u8 = 0x02;
    pub const CLASS: u8 = 0x03;
    pub const STRUCT: u8 = 0x04;
    pub const ARRAY: u8 = 0x05;
    pub const GENERIC: u8 = 0x06;
}

/// Encodes a type into a fresh buffer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a count or struct offset does not fit a compressed
/// unsigned integer.
pub fn encode_type_info(type_info: &TypeInfo) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_type_info(type_info, &mut buffer)?;
    Ok(buffer)
}

/// Appends the encoding of a type to `buffer`.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a count or struct offset does not fit a compressed
/// unsigned integer.
pub fn write_type_info(type_info: &TypeInfo, buffer: &mut Vec<u8>) -> Result<()> {
    let tag = match type_info.kind() {
        TypeKind::Primitive(_) => TYPE_TAG::PRIMITIVE,
        TypeKind::Enum(_) => TYPE_TAG::ENUM,
        TypeKind::Class(_) => TYPE_TAG::CLASS,
        TypeKind::Struct(_) => TYPE_TAG::STRUCT,
        TypeKind::Array(_) => TYPE_TAG::ARRAY,
        TypeKind::Generic(_) => TYPE_TAG::GENERIC,
    };
    buffer.push(tag);
    buffer.push(type_info.byref().tag());

    match type_info.kind() {
        TypeKind::Primitive(kind) => buffer.push(kind.tag()),
        TypeKind::Enum(info) => {
            write_class(&info.clazz, buffer)?;
            buffer.push(info.value_type.tag());
            write_compressed_len(info.values.len(), buffer)?;
            for (name, value) in &info.values {
                write_string(name, buffer)?;
                append_le(buffer, *value);
            }
        }
        TypeKind::Class(clazz) => write_class(clazz, buffer)?,
        TypeKind::Struct(info) => {
            write_class(&info.clazz, buffer)?;
            write_compressed_len(info.fields.len(), buffer)?;
            for (offset, field) in &info.fields {
                write_compressed_uint(*offset, buffer)?;
                write_string(&field.name, buffer)?;
                write_type_info(&field.type_info, buffer)?;
            }
        }
        TypeKind::Array(element) => write_type_info(element, buffer)?,
        TypeKind::Generic(info) => {
            append_le(buffer, info.handle);
            write_string(&info.name, buffer)?;
        }
    }
    Ok(())
}

fn write_class(clazz: &ClassInfo, buffer: &mut Vec<u8>) -> Result<()> {
    write_string(&clazz.namespace, buffer)?;
    write_string(&clazz.name, buffer)?;
    write_compressed_len(clazz.generics.len(), buffer)?;
    for generic in &clazz.generics {
        write_type_info(generic, buffer)?;
    }
    Ok(())
}

pub(crate) fn write_string(value: &str, buffer: &mut Vec<u8>) -> Result<()> {
    write_compressed_len(value.len(), buffer)?;
    buffer.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Decodes a type that occupies all of `data`, with the default recursion limit.
///
/// # Errors
/// Returns [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`] or
/// [`crate::Error::UnknownTag`] for damaged data, and [`crate::Error::RecursionLimit`] for
/// types nested deeper than the limit.
pub fn decode_type_info(data: &[u8]) -> Result<TypeInfo> {
    decode_type_info_with(data, &CodecConfig::default())
}

/// Decodes a type that occupies all of `data`, with the recursion limit of `config`.
///
/// # Errors
/// See [`decode_type_info`].
pub fn decode_type_info_with(data: &[u8], config: &CodecConfig) -> Result<TypeInfo> {
    let mut parser = Parser::new(data);
    let type_info = TypeInfoDecoder::new(&mut parser, config.max_depth)
        .decode()
        .inspect_err(|error| debug!(%error, len = data.len(), "type decoding failed"))?;

    if parser.has_more_data() {
        return Err(malformed_error!(
            "{} trailing bytes after type at offset {}",
            parser.remaining(),
            parser.pos()
        ));
    }
    Ok(type_info)
}

/// Recursive type decoder over a shared [`Parser`].
pub(crate) struct TypeInfoDecoder<'p, 'a> {
    parser: &'p mut Parser<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'p, 'a> TypeInfoDecoder<'p, 'a> {
    pub(crate) fn new(parser: &'p mut Parser<'a>, max_depth: usize) -> Self {
        TypeInfoDecoder {
            parser,
            depth: 0,
            max_depth,
        }
    }

    pub(crate) fn decode(&mut self) -> Result<TypeInfo> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        let result = self.decode_type();
        self.depth -= 1;
        result
    }

    fn decode_type(&mut self) -> Result<TypeInfo> {
        let tag = self.parser.read_le::<u8>()?;
        let byref = ByRef::from_tag(self.parser.read_le::<u8>()?)?;

        let kind = match tag {
            TYPE_TAG::PRIMITIVE => {
                TypeKind::Primitive(PrimitiveKind::from_tag(self.parser.read_le::<u8>()?)?)
            }
            TYPE_TAG::ENUM => {
                let clazz = self.decode_class()?;
                let value_type = PrimitiveKind::from_tag(self.parser.read_le::<u8>()?)?;
                let count = self.parser.read_count(9)?;
                let mut values = BTreeMap::new();
                for _ in 0..count {
                    let name = self.parser.read_compressed_string_utf8()?;
                    let value = self.parser.read_le::<i64>()?;
                    values.insert(name, value);
                }
                TypeKind::Enum(EnumInfo {
                    clazz,
                    value_type,
                    values,
                })
            }
            TYPE_TAG::CLASS => TypeKind::Class(self.decode_class()?),
            TYPE_TAG::STRUCT => {
                let clazz = self.decode_class()?;
                let count = self.parser.read_count(4)?;
                let mut fields = BTreeMap::new();
                for _ in 0..count {
                    let offset = self.parser.read_compressed_uint()?;
                    let name = self.parser.read_compressed_string_utf8()?;
                    let type_info = self.decode()?;
                    if fields
                        .insert(offset, StructField { name, type_info })
                        .is_some()
                    {
                        return Err(malformed_error!("Duplicate struct field offset {}", offset));
                    }
                }
                TypeKind::Struct(StructInfo { clazz, fields })
            }
            TYPE_TAG::ARRAY => TypeKind::Array(Box::new(self.decode()?)),
            TYPE_TAG::GENERIC => {
                let handle = self.parser.read_le::<u64>()?;
                let name = self.parser.read_compressed_string_utf8()?;
                TypeKind::Generic(GenericInfo { handle, name })
            }
            _ => return Err(UnknownTag(tag)),
        };

        Ok(TypeInfo::new(kind, byref))
    }

    fn decode_class(&mut self) -> Result<ClassInfo> {
        let namespace = self.parser.read_compressed_string_utf8()?;
        let name = self.parser.read_compressed_string_utf8()?;
        let count = self.parser.read_count(2)?;
        let mut generics = Vec::with_capacity(count);
        for _ in 0..count {
            generics.push(self.decode()?);
        }
        Ok(ClassInfo {
            namespace,
            name,
            generics,
        })
    }
}
