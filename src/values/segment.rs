//! The value model.
//!
//! A [`DataSegment`] is a concrete value whose shape mirrors a [`TypeInfo`]. It carries no type
//! information of its own and is only meaningful next to the type it was produced for, which is
//! why the transport moves values as a [`DataPayload`].

use std::collections::BTreeMap;

use crate::{
    types::{primitive_size, PrimitiveKind, TypeInfo, TypeKind},
    values::primitive::{encode_primitive, PrimitiveValue},
    Error::ShapeMismatch,
    Result,
};

/// A value of the remote runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSegment {
    /// Little-endian payload of a primitive, enum or type value
    Primitive(Vec<u8>),
    /// Instance handle; 0 is "no instance"
    Class(u64),
    /// Field values keyed by the byte offsets of the struct type
    Struct(BTreeMap<u32, DataSegment>),
    /// Element values in order
    Array(Vec<DataSegment>),
}

impl DataSegment {
    /// The null instance handle.
    pub const NULL: DataSegment = DataSegment::Class(0);

    /// Name of the active case, for diagnostics.
    #[must_use]
    pub fn case_name(&self) -> &'static str {
        match self {
            DataSegment::Primitive(_) => "primitive",
            DataSegment::Class(_) => "class",
            DataSegment::Struct(_) => "struct",
            DataSegment::Array(_) => "array",
        }
    }

    /// Checks that the value's case is the one `type_info` requires, recursively for struct
    /// fields and array elements. Fixed-width primitive and enum payloads must also have
    /// exactly the width of their kind.
    ///
    /// # Errors
    /// Returns [`crate::Error::ShapeMismatch`] naming the first mismatching pair, or
    /// [`crate::Error::Malformed`] for a fixed-width payload of the wrong length.
    pub fn check_shape(&self, type_info: &TypeInfo) -> Result<()> {
        let expected = segment_case_for(type_info);
        if expected != self.case_name() {
            return Err(ShapeMismatch {
                expected,
                found: self.case_name(),
            });
        }

        match (type_info.kind(), self) {
            (TypeKind::Struct(info), DataSegment::Struct(fields)) => {
                for (offset, field) in &info.fields {
                    match fields.get(offset) {
                        Some(value) => value.check_shape(&field.type_info)?,
                        None => {
                            return Err(ShapeMismatch {
                                expected: segment_case_for(&field.type_info),
                                found: "missing field",
                            })
                        }
                    }
                }
                Ok(())
            }
            (TypeKind::Array(element), DataSegment::Array(items)) => {
                items.iter().try_for_each(|item| item.check_shape(element))
            }
            (TypeKind::Primitive(kind), DataSegment::Primitive(bytes)) => check_width(*kind, bytes),
            (TypeKind::Enum(info), DataSegment::Primitive(bytes)) => check_width(info.value_type, bytes),
            _ => Ok(()),
        }
    }
}

/// `string` and `type` payloads are variable-length; every other kind has a fixed width.
fn check_width(kind: PrimitiveKind, bytes: &[u8]) -> Result<()> {
    if matches!(kind, PrimitiveKind::String | PrimitiveKind::Type) {
        return Ok(());
    }

    let width = primitive_size(kind) as usize;
    if bytes.len() != width {
        return Err(malformed_error!(
            "{} payload has {} bytes, expected {}",
            kind,
            bytes.len(),
            width
        ));
    }
    Ok(())
}

/// The segment case a value of `type_info` has.
pub(crate) fn segment_case_for(type_info: &TypeInfo) -> &'static str {
    match type_info.kind() {
        TypeKind::Primitive(_) | TypeKind::Enum(_) | TypeKind::Generic(_) => "primitive",
        TypeKind::Class(_) => "class",
        TypeKind::Struct(_) => "struct",
        TypeKind::Array(_) => "array",
    }
}

/// A type together with an optional value of it, the unit handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPayload {
    /// Type of the value
    pub type_info: TypeInfo,
    /// The value, `None` when not yet provided
    pub data: Option<DataSegment>,
}

impl DataPayload {
    /// A payload carrying a value.
    #[must_use]
    pub fn new(type_info: TypeInfo, data: DataSegment) -> Self {
        DataPayload {
            type_info,
            data: Some(data),
        }
    }

    /// A payload for `type_info` carrying its default value.
    #[must_use]
    pub fn with_default(type_info: TypeInfo) -> Self {
        let data = default_segment(&type_info);
        DataPayload::new(type_info, data)
    }
}

/// The default value of a type.
///
/// Class handles default to null, struct fields to their own defaults, arrays to empty,
/// numbers to zero, `bool` to false, `char` to NUL, strings to empty, and types (including
/// generic parameter values) to `System::Object`.
#[must_use]
pub fn default_segment(type_info: &TypeInfo) -> DataSegment {
    match type_info.kind() {
        TypeKind::Class(_) => DataSegment::NULL,
        TypeKind::Struct(info) => DataSegment::Struct(
            info.fields
                .iter()
                .map(|(offset, field)| (*offset, default_segment(&field.type_info)))
                .collect(),
        ),
        TypeKind::Array(_) => DataSegment::Array(Vec::new()),
        TypeKind::Primitive(kind) => default_primitive(*kind),
        TypeKind::Enum(info) => default_primitive(info.value_type),
        TypeKind::Generic(_) => default_primitive(PrimitiveKind::Type),
    }
}

fn default_primitive(kind: PrimitiveKind) -> DataSegment {
    let value = match kind {
        PrimitiveKind::Bool => PrimitiveValue::Bool(false),
        PrimitiveKind::Char => PrimitiveValue::Char(0),
        PrimitiveKind::Byte => PrimitiveValue::Byte(0),
        PrimitiveKind::Short => PrimitiveValue::Short(0),
        PrimitiveKind::Int => PrimitiveValue::Int(0),
        PrimitiveKind::Long => PrimitiveValue::Long(0),
        PrimitiveKind::Float => PrimitiveValue::Float(0.0),
        PrimitiveKind::Double => PrimitiveValue::Double(0.0),
        PrimitiveKind::String => PrimitiveValue::String(String::new()),
        PrimitiveKind::Pointer => PrimitiveValue::Pointer(0),
        PrimitiveKind::Void => PrimitiveValue::Void,
        PrimitiveKind::Unknown => PrimitiveValue::Unknown,
        PrimitiveKind::Type => PrimitiveValue::Type(TypeInfo::class("System", "Object", Vec::new())),
    };
    // Only oversized type descriptions can fail to encode.
    DataSegment::Primitive(encode_primitive(&value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::factories::{list_of, vector2},
        types::{decode_type_info, ClassInfo, StructField},
        Error,
    };

    #[test]
    fn default_values() {
        assert_eq!(
            default_segment(&TypeInfo::primitive(PrimitiveKind::Int)),
            DataSegment::Primitive(vec![0; 4])
        );
        assert_eq!(
            default_segment(&TypeInfo::primitive(PrimitiveKind::Char)),
            DataSegment::Primitive(vec![0, 0])
        );
        assert_eq!(
            default_segment(&TypeInfo::primitive(PrimitiveKind::String)),
            DataSegment::Primitive(vec![0, 0])
        );
        assert_eq!(
            default_segment(&TypeInfo::primitive(PrimitiveKind::Void)),
            DataSegment::Primitive(vec![])
        );
        assert_eq!(default_segment(&list_of(TypeInfo::primitive(PrimitiveKind::Int))), DataSegment::NULL);
        assert_eq!(
            default_segment(&TypeInfo::array(TypeInfo::primitive(PrimitiveKind::Int))),
            DataSegment::Array(vec![])
        );

        let DataSegment::Primitive(bytes) = default_segment(&TypeInfo::primitive(PrimitiveKind::Type)) else {
            panic!("expected primitive");
        };
        assert_eq!(decode_type_info(&bytes).unwrap().to_string(), "System::Object");
    }

    #[test]
    fn default_struct_fills_every_field() {
        let DataSegment::Struct(fields) = default_segment(&vector2()) else {
            panic!("expected struct");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[&4], DataSegment::Primitive(vec![0; 4]));
    }

    #[test]
    fn shape_checks() {
        let vector = vector2();
        assert!(default_segment(&vector).check_shape(&vector).is_ok());
        assert_eq!(
            DataSegment::Class(3).check_shape(&vector),
            Err(Error::ShapeMismatch {
                expected: "struct",
                found: "class"
            })
        );

        let partial = DataSegment::Struct(BTreeMap::from([(0, DataSegment::Primitive(vec![0; 4]))]));
        assert!(partial.check_shape(&vector).is_err());

        let holder = TypeInfo::structure(
            ClassInfo::new("NS", "Holder"),
            BTreeMap::from([(
                0,
                StructField {
                    name: "items".to_string(),
                    type_info: TypeInfo::array(TypeInfo::primitive(PrimitiveKind::Byte)),
                },
            )]),
        );
        let wrong_item = DataSegment::Struct(BTreeMap::from([(
            0,
            DataSegment::Array(vec![DataSegment::Class(1)]),
        )]));
        assert!(wrong_item.check_shape(&holder).is_err());
    }

    #[test]
    fn fixed_width_payloads() {
        let int = TypeInfo::primitive(PrimitiveKind::Int);
        assert!(DataSegment::Primitive(vec![0; 4]).check_shape(&int).is_ok());
        assert!(matches!(
            DataSegment::Primitive(vec![1]).check_shape(&int),
            Err(Error::Malformed { .. })
        ));
        assert!(DataSegment::Primitive(vec![0; 8]).check_shape(&int).is_err());
        assert!(DataSegment::Primitive(vec![1])
            .check_shape(&TypeInfo::primitive(PrimitiveKind::Void))
            .is_err());

        let level = TypeInfo::enumeration(
            ClassInfo::new("Game", "Level"),
            PrimitiveKind::Short,
            BTreeMap::from([("Low".to_string(), 1)]),
        );
        assert!(DataSegment::Primitive(vec![1, 0]).check_shape(&level).is_ok());
        assert!(DataSegment::Primitive(vec![1, 0, 0, 0]).check_shape(&level).is_err());

        let text = TypeInfo::primitive(PrimitiveKind::String);
        assert!(DataSegment::Primitive(vec![0x41, 0, 0x42, 0, 0, 0]).check_shape(&text).is_ok());

        let inner = DataSegment::Struct(BTreeMap::from([
            (0, DataSegment::Primitive(vec![0; 4])),
            (4, DataSegment::Primitive(vec![0; 2])),
        ]));
        assert!(matches!(inner.check_shape(&vector2()), Err(Error::Malformed { .. })));
    }

    #[test]
    fn payload_helpers() {
        let payload = DataPayload::with_default(TypeInfo::primitive(PrimitiveKind::Bool));
        assert_eq!(payload.data, Some(DataSegment::Primitive(vec![0])));
    }
}
