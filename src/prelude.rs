//! # qrue Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and functions
//! of the library. Import it to get quick access to the type model, the value model and their
//! codecs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all qrue operations
pub use crate::Error;

/// The result type used throughout qrue
pub use crate::Result;

/// Codec configuration
pub use crate::{CodecConfig, IntegerFormat};

// ================================================================================================
// Type Model
// ================================================================================================

/// Types and their case payloads
pub use crate::types::{
    ByRef, ClassInfo, EnumInfo, GenericInfo, PrimitiveKind, StructField, StructInfo, TypeInfo,
    TypeKind,
};

/// Class member shapes
pub use crate::types::{ArgumentInfo, ClassDetails, FieldInfo, MethodInfo, PropertyInfo};

/// Type descriptors
pub use crate::types::{parse_type_descriptor, type_to_text, DescriptorStyle};

/// Type equality and convertibility
pub use crate::types::{class_convertible, same_type, types_equal};

/// Generic resolution
pub use crate::types::{
    build_generics_map, instantiate, reinstantiate_if_changed, GenericsMap, Reinstantiation,
};

/// Binary encoding of types
pub use crate::types::{decode_type_info, encode_type_info};

// ================================================================================================
// Value Model
// ================================================================================================

/// Values and payloads
pub use crate::values::{default_segment, DataPayload, DataSegment};

/// Primitive payloads
pub use crate::values::{decode_primitive, encode_primitive, PrimitiveValue};

/// Text conversion
pub use crate::values::{from_text, is_valid_text, to_text, TextCodec};

/// Value equality
pub use crate::values::{find_named_value, same_value, values_equal};

/// Binary encoding of payloads
pub use crate::values::{decode_payload, encode_payload};

/// Editor synchronisation
pub use crate::values::{EditOutcome, TextEditor};
