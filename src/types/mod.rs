//! The type model of the remote runtime.
//!
//! A [`TypeInfo`] describes a type of the inspected process: a primitive, an enum, a class, a
//! struct with its field layout, an array, or an unbound generic parameter, each with a by-ref
//! qualifier and a wire size. Types are immutable values; every transformation in this module
//! produces a new type.
//!
//! # Key Components
//!
//! - [`typeinfo`] - [`TypeInfo`] and its case payloads
//! - [`size`] - wire size of types
//! - [`descriptor`] - the textual type descriptor grammar
//! - [`encoding`] - binary encoding of types
//! - [`members`] - class member shapes supplied by the metadata collaborator
//! - [`matching`] - structural type equality and class convertibility
//! - [`generics`] - generic parameter collection and instantiation
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::{parse_type_descriptor, same_type, TypeInfo};
//!
//! let parsed = parse_type_descriptor("UnityEngine::GameObject[]")?;
//! let built = TypeInfo::array(TypeInfo::class("UnityEngine", "GameObject", vec![]));
//! assert!(same_type(&parsed, &built));
//! assert_eq!(built.to_string(), "UnityEngine::GameObject[]");
//! # Ok::<(), qrue::Error>(())
//! ```

pub mod descriptor;
pub mod encoding;
pub mod generics;
pub mod matching;
pub mod members;
pub mod size;
pub mod typeinfo;

pub use descriptor::{
    class_to_text, is_type_descriptor, parse_type_descriptor, parse_type_descriptor_with,
    type_to_text, DescriptorStyle,
};
pub use encoding::{decode_type_info, decode_type_info_with, encode_type_info, TYPE_TAG};
pub use generics::{
    build_generics_map, collect_generic_parameters, instantiate, reinstantiate_if_changed,
    GenericBinding, GenericsMap, Reinstantiation,
};
pub use matching::{class_convertible, classes_equal, same_type, types_equal};
pub use members::{ArgumentInfo, ClassDetails, FieldInfo, MethodInfo, PropertyInfo};
pub use size::{primitive_size, size_of};
pub use typeinfo::{
    ByRef, ClassInfo, EnumInfo, GenericInfo, PrimitiveKind, StructField, StructInfo, TypeInfo,
    TypeKind,
};
