//! The type model: primitive kinds, by-ref qualifiers and the [`TypeInfo`] tree.
//!
//! A [`TypeInfo`] is immutable once built; its wire size is computed by the constructor.

use std::{collections::BTreeMap, fmt};

use strum::{EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    types::{
        descriptor::{type_to_text, DescriptorStyle},
        size::type_size,
    },
    Error::UnknownTag,
    Result,
};

/// The primitive kinds of the remote runtime.
///
/// The discriminant is the byte used for the kind on the wire. The lowercase variant name is
/// the keyword used in type descriptors (`bool`, `int`, `pointer`, ...), parsed
/// case-insensitively.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    EnumIter,
    EnumCount,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[repr(u8)]
pub enum PrimitiveKind {
    /// System.Boolean
    Bool = 0,
    /// System.Char - one UTF-16 code unit
    Char = 1,
    /// System.SByte / System.Byte
    Byte = 2,
    /// System.Int16 / System.UInt16
    Short = 3,
    /// System.Int32 / System.UInt32
    Int = 4,
    /// System.Int64 / System.UInt64 / native integers
    Long = 5,
    /// System.Single
    Float = 6,
    /// System.Double
    Double = 7,
    /// System.String
    String = 8,
    /// System.Type, carried as an embedded type description
    Type = 9,
    /// Unmanaged pointer
    Pointer = 10,
    /// System.Void
    Void = 11,
    /// Anything the runtime could not classify
    Unknown = 12,
}

impl PrimitiveKind {
    /// The descriptor keyword for this kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The single-letter name used by the compact descriptor style.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "b",
            PrimitiveKind::Char => "c",
            PrimitiveKind::Byte => "y",
            PrimitiveKind::Short => "s",
            PrimitiveKind::Int => "i",
            PrimitiveKind::Long => "l",
            PrimitiveKind::Float => "f",
            PrimitiveKind::Double => "d",
            PrimitiveKind::String => "w",
            PrimitiveKind::Type => "t",
            PrimitiveKind::Pointer => "p",
            PrimitiveKind::Void => "v",
            PrimitiveKind::Unknown => "u",
        }
    }

    /// Looks up a kind by its descriptor keyword, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Looks up a kind by its single-letter name.
    #[must_use]
    pub fn from_short_name(name: &str) -> Option<Self> {
        PrimitiveKind::iter().find(|kind| kind.short_name() == name)
    }

    /// Wire byte of this kind.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decodes a kind from its wire byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownTag`] for bytes outside the known range.
    pub fn from_tag(tag: u8) -> Result<Self> {
        PrimitiveKind::iter()
            .find(|kind| kind.tag() == tag)
            .ok_or(UnknownTag(tag))
    }

    /// Returns `true` for the kinds whose text is a whole number.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte
                | PrimitiveKind::Short
                | PrimitiveKind::Int
                | PrimitiveKind::Long
                | PrimitiveKind::Pointer
        )
    }

    /// Truncates `value` to this kind's width and sign-extends it back, the two's complement
    /// view the runtime stores. Kinds that are not integers return `value` unchanged.
    ///
    /// ```rust
    /// use qrue::types::PrimitiveKind;
    ///
    /// assert_eq!(PrimitiveKind::Byte.wrap_integer(255), -1);
    /// assert_eq!(PrimitiveKind::Int.wrap_integer(0x8000_0000), i64::from(i32::MIN));
    /// assert_eq!(PrimitiveKind::Long.wrap_integer(-5), -5);
    /// ```
    #[must_use]
    pub fn wrap_integer(self, value: i64) -> i64 {
        match self {
            PrimitiveKind::Byte => i64::from(value as i8),
            PrimitiveKind::Short => i64::from(value as i16),
            PrimitiveKind::Int => i64::from(value as i32),
            _ => value,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Calling-convention qualifier of a parameter type.
///
/// Two types differing only in this qualifier are the same type for matching purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, EnumCount)]
#[repr(u8)]
pub enum ByRef {
    /// Passed by value
    #[default]
    None = 0,
    /// `in` parameter
    In = 1,
    /// `out` parameter
    Out = 2,
    /// `ref` parameter
    Ref = 3,
}

impl ByRef {
    /// The descriptor keyword, `None` for by-value types.
    #[must_use]
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            ByRef::None => None,
            ByRef::In => Some("in"),
            ByRef::Out => Some("out"),
            ByRef::Ref => Some("ref"),
        }
    }

    /// Wire byte of this qualifier.
    #[must_use]
    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Decodes a qualifier from its wire byte.
    ///
    /// # Errors
    /// Returns [`crate::Error::UnknownTag`] for bytes outside the known range.
    pub fn from_tag(tag: u8) -> Result<Self> {
        ByRef::iter()
            .find(|byref| byref.tag() == tag)
            .ok_or(UnknownTag(tag))
    }
}

/// A class of the remote runtime, possibly instantiated with generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassInfo {
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Class name; nested classes are joined with `/`
    pub name: String,
    /// Generic arguments in declaration order, empty if the class is not generic
    pub generics: Vec<TypeInfo>,
}

impl ClassInfo {
    /// Create a class without generic arguments
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ClassInfo {
            namespace: namespace.into(),
            name: name.into(),
            generics: Vec::new(),
        }
    }

    /// Create a class instantiated with `generics`
    #[must_use]
    pub fn with_generics(
        namespace: impl Into<String>,
        name: impl Into<String>,
        generics: Vec<TypeInfo>,
    ) -> Self {
        ClassInfo {
            namespace: namespace.into(),
            name: name.into(),
            generics,
        }
    }
}

/// An enum type: its class, the primitive it is stored as, and its named values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumInfo {
    /// The enum's class
    pub clazz: ClassInfo,
    /// Underlying storage kind
    pub value_type: PrimitiveKind,
    /// Symbolic name to value
    pub values: BTreeMap<String, i64>,
}

impl EnumInfo {
    /// Reverse lookup of a value's symbolic name.
    ///
    /// Values compare modulo the width of [`EnumInfo::value_type`], so a `byte` enum's `255`
    /// matches a stored `-1`. If several names share the value, the alphabetically first one is
    /// returned.
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&str> {
        let value = self.value_type.wrap_integer(value);
        self.values
            .iter()
            .find(|(_, v)| self.value_type.wrap_integer(**v) == value)
            .map(|(name, _)| name.as_str())
    }

    /// The stored value of `name`, wrapped to the width of [`EnumInfo::value_type`].
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.values
            .get(name)
            .map(|value| self.value_type.wrap_integer(*value))
    }
}

/// A field of a struct layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    /// Field name
    pub name: String,
    /// Field type
    pub type_info: TypeInfo,
}

/// A value type with its instance field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructInfo {
    /// The struct's class
    pub clazz: ClassInfo,
    /// Byte offset within the instance to the field stored there
    pub fields: BTreeMap<u32, StructField>,
}

/// An unbound generic parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericInfo {
    /// Runtime identifier of the generic slot
    pub handle: u64,
    /// Declared parameter name (`T`, `TKey`, ...)
    pub name: String,
}

/// The case-specific payload of a [`TypeInfo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A primitive
    Primitive(PrimitiveKind),
    /// An enum
    Enum(EnumInfo),
    /// A reference type
    Class(ClassInfo),
    /// A value type with fields
    Struct(StructInfo),
    /// A single-dimension array of the element type
    Array(Box<TypeInfo>),
    /// An unbound generic parameter
    Generic(GenericInfo),
}

impl TypeKind {
    /// Name of the active case, for diagnostics.
    #[must_use]
    pub fn case_name(&self) -> &'static str {
        match self {
            TypeKind::Primitive(_) => "primitive",
            TypeKind::Enum(_) => "enum",
            TypeKind::Class(_) => "class",
            TypeKind::Struct(_) => "struct",
            TypeKind::Array(_) => "array",
            TypeKind::Generic(_) => "generic",
        }
    }
}

/// Description of a type of the remote runtime.
///
/// A `TypeInfo` is immutable: the wire size is computed once when it is constructed and every
/// "update" builds a new value.
///
/// # Examples
///
/// ```rust
/// use qrue::types::{ByRef, PrimitiveKind, TypeInfo};
///
/// let list = TypeInfo::class("System.Collections.Generic", "List`1",
///     vec![TypeInfo::primitive(PrimitiveKind::Int)]);
/// assert_eq!(list.size(), 8);
///
/// let by_ref = TypeInfo::array(list).with_byref(ByRef::Ref);
/// assert_eq!(by_ref.to_string(), "ref System.Collections.Generic::List`1<int>[]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    kind: TypeKind,
    byref: ByRef,
    size: u32,
}

impl TypeInfo {
    /// Create a type, computing its wire size.
    #[must_use]
    pub fn new(kind: TypeKind, byref: ByRef) -> Self {
        let size = type_size(&kind);
        TypeInfo { kind, byref, size }
    }

    /// A by-value primitive.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeInfo::new(TypeKind::Primitive(kind), ByRef::None)
    }

    /// A by-value class reference.
    #[must_use]
    pub fn class(
        namespace: impl Into<String>,
        name: impl Into<String>,
        generics: Vec<TypeInfo>,
    ) -> Self {
        TypeInfo::new(
            TypeKind::Class(ClassInfo::with_generics(namespace, name, generics)),
            ByRef::None,
        )
    }

    /// A by-value array of `element`.
    #[must_use]
    pub fn array(element: TypeInfo) -> Self {
        TypeInfo::new(TypeKind::Array(Box::new(element)), ByRef::None)
    }

    /// A by-value struct with the given layout.
    #[must_use]
    pub fn structure(clazz: ClassInfo, fields: BTreeMap<u32, StructField>) -> Self {
        TypeInfo::new(TypeKind::Struct(StructInfo { clazz, fields }), ByRef::None)
    }

    /// A by-value enum.
    #[must_use]
    pub fn enumeration(
        clazz: ClassInfo,
        value_type: PrimitiveKind,
        values: BTreeMap<String, i64>,
    ) -> Self {
        TypeInfo::new(
            TypeKind::Enum(EnumInfo {
                clazz,
                value_type,
                values,
            }),
            ByRef::None,
        )
    }

    /// A by-value unbound generic parameter.
    #[must_use]
    pub fn generic(handle: u64, name: impl Into<String>) -> Self {
        TypeInfo::new(
            TypeKind::Generic(GenericInfo {
                handle,
                name: name.into(),
            }),
            ByRef::None,
        )
    }

    /// The same type with a different by-ref qualifier.
    #[must_use]
    pub fn with_byref(self, byref: ByRef) -> Self {
        TypeInfo { byref, ..self }
    }

    /// The case-specific payload.
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Consume the type, returning its payload.
    #[must_use]
    pub fn into_kind(self) -> TypeKind {
        self.kind
    }

    /// The by-ref qualifier.
    #[must_use]
    pub fn byref(&self) -> ByRef {
        self.byref
    }

    /// Size in bytes of a value of this type on the wire.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// The owning class of class, struct and enum types.
    #[must_use]
    pub fn class_info(&self) -> Option<&ClassInfo> {
        match &self.kind {
            TypeKind::Class(clazz) => Some(clazz),
            TypeKind::Struct(info) => Some(&info.clazz),
            TypeKind::Enum(info) => Some(&info.clazz),
            _ => None,
        }
    }

    /// The primitive kind, if this is a primitive type.
    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self.kind {
            TypeKind::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// Returns `true` if no generic parameter occurs anywhere in the type.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        crate::types::generics::collect_generic_parameters(Some(self)).is_empty()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_to_text(self, DescriptorStyle::Full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_names() {
        assert_eq!(PrimitiveKind::Pointer.name(), "pointer");
        assert_eq!(PrimitiveKind::from_name("BOOL"), Some(PrimitiveKind::Bool));
        assert_eq!(PrimitiveKind::from_name("Int"), Some(PrimitiveKind::Int));
        assert_eq!(PrimitiveKind::from_name("integer"), None);
        assert_eq!(PrimitiveKind::from_short_name("w"), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::from_short_name("W"), None);
    }

    #[test]
    fn primitive_tags() {
        for kind in PrimitiveKind::iter() {
            assert_eq!(PrimitiveKind::from_tag(kind.tag()).unwrap(), kind);
        }
        assert_eq!(PrimitiveKind::COUNT, 13);
        assert!(matches!(PrimitiveKind::from_tag(13), Err(UnknownTag(13))));
    }

    #[test]
    fn byref_tags() {
        for byref in ByRef::iter() {
            assert_eq!(ByRef::from_tag(byref.tag()).unwrap(), byref);
        }
        assert!(ByRef::from_tag(4).is_err());
        assert_eq!(ByRef::Out.keyword(), Some("out"));
        assert_eq!(ByRef::None.keyword(), None);
    }

    #[test]
    fn size_is_computed_on_construction() {
        assert_eq!(TypeInfo::primitive(PrimitiveKind::Short).size(), 2);
        assert_eq!(TypeInfo::generic(7, "T").size(), 8);

        let by_ref = TypeInfo::primitive(PrimitiveKind::Byte).with_byref(ByRef::Out);
        assert_eq!(by_ref.byref(), ByRef::Out);
        assert_eq!(by_ref.size(), 1);
    }

    #[test]
    fn enum_reverse_lookup() {
        let values = BTreeMap::from([("A".to_string(), 1), ("B".to_string(), 2)]);
        let info = EnumInfo {
            clazz: ClassInfo::new("NS", "E"),
            value_type: PrimitiveKind::Int,
            values,
        };
        assert_eq!(info.name_of(2), Some("B"));
        assert_eq!(info.name_of(3), None);
    }

    #[test]
    fn enum_values_wrap_to_storage_width() {
        let bytes = EnumInfo {
            clazz: ClassInfo::new("NS", "Level"),
            value_type: PrimitiveKind::Byte,
            values: BTreeMap::from([("Low".to_string(), 1), ("Max".to_string(), 255)]),
        };
        assert_eq!(bytes.value_of("Max"), Some(-1));
        assert_eq!(bytes.name_of(-1), Some("Max"));
        assert_eq!(bytes.name_of(255), Some("Max"));
        assert_eq!(bytes.value_of("Missing"), None);

        let flags = EnumInfo {
            clazz: ClassInfo::new("NS", "Flags"),
            value_type: PrimitiveKind::Int,
            values: BTreeMap::from([("High".to_string(), 0x8000_0000)]),
        };
        assert_eq!(flags.name_of(i64::from(i32::MIN)), Some("High"));
        assert_eq!(flags.value_of("High"), Some(i64::from(i32::MIN)));
    }

    #[test]
    fn owning_class() {
        let class = TypeInfo::class("UnityEngine", "GameObject", vec![]);
        assert_eq!(class.class_info().unwrap().name, "GameObject");
        assert!(TypeInfo::array(class).class_info().is_none());
    }
}
