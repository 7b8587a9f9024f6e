//! Wire size of types.
//!
//! Every [`crate::types::TypeInfo`] carries the number of bytes a value of it occupies on the
//! wire. Sizes are derived purely from the type description:
//!
//! | Case | Size |
//! |------|------|
//! | `bool`, `byte` | 1 |
//! | `char`, `short` | 2 |
//! | `int`, `float` | 4 |
//! | `long`, `double`, `type`, `pointer` | 8 |
//! | `string`, `void`, `unknown` | 0 (variable-length payload for `string`) |
//! | enum | size of the underlying primitive |
//! | class, array, generic parameter | 8 (passed as a handle) |
//! | struct | highest field offset + size of that field |
//!
//! Struct offsets are taken as supplied by the remote runtime; no alignment or padding rules
//! are applied locally.

use crate::types::{PrimitiveKind, TypeInfo, TypeKind};

/// Size of a handle-passed value (class instance, array, generic parameter).
pub const HANDLE_SIZE: u32 = 8;

/// Wire size of a primitive kind.
#[must_use]
pub fn primitive_size(kind: PrimitiveKind) -> u32 {
    match kind {
        PrimitiveKind::Bool | PrimitiveKind::Byte => 1,
        PrimitiveKind::Char | PrimitiveKind::Short => 2,
        PrimitiveKind::Int | PrimitiveKind::Float => 4,
        PrimitiveKind::Long | PrimitiveKind::Double | PrimitiveKind::Type | PrimitiveKind::Pointer => 8,
        PrimitiveKind::String | PrimitiveKind::Void | PrimitiveKind::Unknown => 0,
    }
}

/// Wire size of a type payload.
///
/// An empty struct has size 0.
#[must_use]
pub fn type_size(kind: &TypeKind) -> u32 {
    match kind {
        TypeKind::Primitive(primitive) => primitive_size(*primitive),
        TypeKind::Enum(info) => primitive_size(info.value_type),
        TypeKind::Class(_) | TypeKind::Array(_) | TypeKind::Generic(_) => HANDLE_SIZE,
        TypeKind::Struct(info) => info
            .fields
            .iter()
            .next_back()
            .map_or(0, |(offset, field)| {
                offset.saturating_add(type_size(field.type_info.kind()))
            }),
    }
}

/// Recomputes the wire size of `type_info` from its payload.
///
/// This always agrees with [`TypeInfo::size`].
#[must_use]
pub fn size_of(type_info: &TypeInfo) -> u32 {
    type_size(type_info.kind())
}
