//! Binary encoding of [`DataPayload`]s.
//!
//! A payload is its encoded [`crate::types::TypeInfo`] followed by one presence byte and, if
//! present, the value. Values are laid out by the same scheme as types: a case tag from
//! [`SEGMENT_TAG`] and then the case payload.
//!
//! | Case | Payload |
//! |------|---------|
//! | `PRIMITIVE` | compressed length, bytes |
//! | `CLASS` | `u64` handle |
//! | `STRUCT` | count, count x (offset, value) |
//! | `ARRAY` | count, count x value |
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::{PrimitiveKind, TypeInfo};
//! use qrue::values::{decode_payload, encode_payload, DataPayload, DataSegment};
//!
//! let payload = DataPayload::new(
//!     TypeInfo::primitive(PrimitiveKind::Short),
//!     DataSegment::Primitive(vec![0x34, 0x12]),
//! );
//! let bytes = encode_payload(&payload)?;
//! assert_eq!(decode_payload(&bytes)?, payload);
//! # Ok::<(), qrue::Error>(())
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    config::CodecConfig,
    types::{encoding::write_type_info, encoding::TypeInfoDecoder},
    values::{DataPayload, DataSegment},
    wire::{
        io::{append_le, write_compressed_len, write_compressed_uint},
        parser::Parser,
    },
    Error::{RecursionLimit, UnknownTag},
    Result,
};

#[allow(non_snake_case, missing_docs)]
/// Case tags of an encoded value
pub mod SEGMENT_TAG {
    pub const PRIMITIVE: u8 = 0x01;
    pub const CLASS: u8 = 0x02;
    pub const STRUCT: u8 = 0x03;
    pub const ARRAY: u8 = 0x04;
}

/// Encodes a payload into a fresh buffer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if a length, count or offset does not fit a compressed
/// unsigned integer.
pub fn encode_payload(payload: &DataPayload) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_type_info(&payload.type_info, &mut buffer)?;
    match &payload.data {
        Some(segment) => {
            buffer.push(1);
            write_segment(segment, &mut buffer)?;
        }
        None => buffer.push(0),
    }
    Ok(buffer)
}

/// Encodes a value alone, without its type.
///
/// # Errors
/// See [`encode_payload`].
pub fn encode_segment(segment: &DataSegment) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_segment(segment, &mut buffer)?;
    Ok(buffer)
}

fn write_segment(segment: &DataSegment, buffer: &mut Vec<u8>) -> Result<()> {
    match segment {
        DataSegment::Primitive(bytes) => {
            buffer.push(SEGMENT_TAG::PRIMITIVE);
            write_compressed_len(bytes.len(), buffer)?;
            buffer.extend_from_slice(bytes);
        }
        DataSegment::Class(handle) => {
            buffer.push(SEGMENT_TAG::CLASS);
            append_le(buffer, *handle);
        }
        DataSegment::Struct(fields) => {
            buffer.push(SEGMENT_TAG::STRUCT);
            write_compressed_len(fields.len(), buffer)?;
            for (offset, field) in fields {
                write_compressed_uint(*offset, buffer)?;
                write_segment(field, buffer)?;
            }
        }
        DataSegment::Array(items) => {
            buffer.push(SEGMENT_TAG::ARRAY);
            write_compressed_len(items.len(), buffer)?;
            for item in items {
                write_segment(item, buffer)?;
            }
        }
    }
    Ok(())
}

/// Decodes a payload that occupies all of `data`, with the default configuration.
///
/// The value's shape is checked against the decoded type.
///
/// # Errors
/// Returns the binary decoding errors of [`crate::Error`] for damaged data,
/// [`crate::Error::RecursionLimit`] for nesting beyond the limit, and
/// [`crate::Error::ShapeMismatch`] if the value does not fit its type.
pub fn decode_payload(data: &[u8]) -> Result<DataPayload> {
    decode_payload_with(data, &CodecConfig::default())
}

/// Decodes a payload that occupies all of `data`, with the recursion limit of `config`.
///
/// # Errors
/// See [`decode_payload`].
pub fn decode_payload_with(data: &[u8], config: &CodecConfig) -> Result<DataPayload> {
    let mut parser = Parser::new(data);
    let payload = read_payload(&mut parser, config)
        .inspect_err(|error| debug!(%error, len = data.len(), "payload decoding failed"))?;

    if parser.has_more_data() {
        return Err(malformed_error!(
            "{} trailing bytes after payload at offset {}",
            parser.remaining(),
            parser.pos()
        ));
    }
    Ok(payload)
}

fn read_payload(parser: &mut Parser<'_>, config: &CodecConfig) -> Result<DataPayload> {
    let type_info = TypeInfoDecoder::new(parser, config.max_depth).decode()?;
    let data = match parser.read_le::<u8>()? {
        0 => None,
        1 => {
            let segment = SegmentDecoder::new(parser, config.max_depth).decode()?;
            segment.check_shape(&type_info)?;
            Some(segment)
        }
        other => return Err(malformed_error!("Invalid presence byte - {}", other)),
    };
    Ok(DataPayload { type_info, data })
}

struct SegmentDecoder<'p, 'a> {
    parser: &'p mut Parser<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'p, 'a> SegmentDecoder<'p, 'a> {
    fn new(parser: &'p mut Parser<'a>, max_depth: usize) -> Self {
        SegmentDecoder {
            parser,
            depth: 0,
            max_depth,
        }
    }

    fn decode(&mut self) -> Result<DataSegment> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        let result = self.decode_segment();
        self.depth -= 1;
        result
    }

    fn decode_segment(&mut self) -> Result<DataSegment> {
        let tag = self.parser.read_le::<u8>()?;
        match tag {
            SEGMENT_TAG::PRIMITIVE => {
                let length = self.parser.read_compressed_uint()? as usize;
                Ok(DataSegment::Primitive(self.parser.read_bytes(length)?.to_vec()))
            }
            SEGMENT_TAG::CLASS => Ok(DataSegment::Class(self.parser.read_le::<u64>()?)),
            SEGMENT_TAG::STRUCT => {
                let count = self.parser.read_count(2)?;
                let mut fields = BTreeMap::new();
                for _ in 0..count {
                    let offset = self.parser.read_compressed_uint()?;
                    let field = self.decode()?;
                    if fields.insert(offset, field).is_some() {
                        return Err(malformed_error!("Duplicate struct value offset {}", offset));
                    }
                }
                Ok(DataSegment::Struct(fields))
            }
            SEGMENT_TAG::ARRAY => {
                let count = self.parser.read_count(1)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.decode()?);
                }
                Ok(DataSegment::Array(items))
            }
            _ => Err(UnknownTag(tag)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{
            factories::{generic_list, vector2},
            init_test_logging,
        },
        types::{PrimitiveKind, TypeInfo, TYPE_TAG},
        values::{default_segment, from_text},
        Error,
    };

    #[test]
    fn segment_layouts() {
        assert_eq!(
            encode_segment(&DataSegment::Primitive(vec![0xAA, 0xBB])).unwrap(),
            [SEGMENT_TAG::PRIMITIVE, 0x02, 0xAA, 0xBB]
        );
        assert_eq!(
            encode_segment(&DataSegment::Class(0x0102)).unwrap(),
            [SEGMENT_TAG::CLASS, 0x02, 0x01, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode_segment(&DataSegment::Array(vec![DataSegment::Class(0)])).unwrap(),
            [SEGMENT_TAG::ARRAY, 0x01, SEGMENT_TAG::CLASS, 0, 0, 0, 0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn payload_without_value() {
        let payload = DataPayload {
            type_info: TypeInfo::primitive(PrimitiveKind::Bool),
            data: None,
        };
        let bytes = encode_payload(&payload).unwrap();
        assert_eq!(bytes, [TYPE_TAG::PRIMITIVE, 0x00, 0x00, 0x00]);
        assert_eq!(decode_payload(&bytes).unwrap(), payload);
    }

    #[test]
    fn struct_and_array_payloads() {
        let vector = vector2();
        let value = from_text(r#"{"x": 1.5, "y": -2}"#, &vector).unwrap();
        let payload = DataPayload::new(vector.clone(), value);
        assert_eq!(decode_payload(&encode_payload(&payload).unwrap()).unwrap(), payload);

        let array = TypeInfo::array(vector);
        let payload = DataPayload::with_default(array);
        assert_eq!(decode_payload(&encode_payload(&payload).unwrap()).unwrap(), payload);

        let list = DataPayload::new(generic_list(), DataSegment::Class(0xDEAD));
        assert_eq!(decode_payload(&encode_payload(&list).unwrap()).unwrap(), list);
    }

    #[test]
    fn shape_is_checked() {
        let vector = vector2();
        let mut bytes = Vec::new();
        write_type_info(&vector, &mut bytes).unwrap();
        bytes.push(1);
        bytes.extend(encode_segment(&DataSegment::Class(1)).unwrap());
        assert!(matches!(decode_payload(&bytes), Err(Error::ShapeMismatch { .. })));

        let mut bytes = encode_payload(&DataPayload::new(
            vector.clone(),
            default_segment(&vector),
        ))
        .unwrap();
        bytes.push(0);
        assert!(matches!(decode_payload(&bytes), Err(Error::Malformed { .. })));
    }

    #[test]
    fn damaged_payloads() {
        init_test_logging();
        let bool_type = [TYPE_TAG::PRIMITIVE, 0x00, 0x00];

        let mut bytes = bool_type.to_vec();
        bytes.push(2);
        assert!(matches!(decode_payload(&bytes), Err(Error::Malformed { .. })));

        let mut bytes = bool_type.to_vec();
        bytes.extend([1, 0x09]);
        assert!(matches!(decode_payload(&bytes), Err(Error::UnknownTag(9))));

        let mut bytes = bool_type.to_vec();
        bytes.extend([1, SEGMENT_TAG::PRIMITIVE, 0x05, 0x01]);
        assert!(matches!(decode_payload(&bytes), Err(Error::OutOfBounds { .. })));

        // A well-formed segment whose width does not fit a bool.
        let mut bytes = bool_type.to_vec();
        bytes.extend([1, SEGMENT_TAG::PRIMITIVE, 0x02, 0x01, 0x00]);
        assert!(matches!(decode_payload(&bytes), Err(Error::Malformed { .. })));
    }

    #[test]
    fn recursion_limit() {
        let mut element = TypeInfo::primitive(PrimitiveKind::Int);
        let mut value = DataSegment::Primitive(vec![0; 4]);
        for _ in 0..20 {
            element = TypeInfo::array(element);
            value = DataSegment::Array(vec![value]);
        }
        let bytes = encode_payload(&DataPayload::new(element, value)).unwrap();

        assert!(decode_payload(&bytes).is_ok());
        let config = CodecConfig::default().with_max_depth(10);
        assert!(matches!(
            decode_payload_with(&bytes, &config),
            Err(Error::RecursionLimit(10))
        ));
    }
}
