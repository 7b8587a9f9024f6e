//! Structural equality and convertibility of types.
//!
//! Type identity here ignores the by-ref qualifier and the computed size: `ref int` and `int`
//! are the same type. Enums, structs and classes are identified by namespace, name and their
//! generic arguments; the enum values and struct layouts are not compared.

use crate::types::{ClassDetails, ClassInfo, TypeInfo, TypeKind};

/// Compares two optional types; an absent operand never matches.
///
/// # Examples
///
/// ```rust
/// use qrue::types::{types_equal, ByRef, PrimitiveKind, TypeInfo};
///
/// let int = TypeInfo::primitive(PrimitiveKind::Int);
/// let ref_int = int.clone().with_byref(ByRef::Ref);
/// assert!(types_equal(Some(&int), Some(&ref_int)));
/// assert!(!types_equal(Some(&int), None));
/// ```
#[must_use]
pub fn types_equal(a: Option<&TypeInfo>, b: Option<&TypeInfo>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_type(a, b),
        _ => false,
    }
}

/// Compares two types structurally, ignoring by-ref qualifiers.
#[must_use]
pub fn same_type(a: &TypeInfo, b: &TypeInfo) -> bool {
    match (a.kind(), b.kind()) {
        (TypeKind::Primitive(a), TypeKind::Primitive(b)) => a == b,
        (TypeKind::Enum(a), TypeKind::Enum(b)) => classes_equal(&a.clazz, &b.clazz),
        (TypeKind::Struct(a), TypeKind::Struct(b)) => classes_equal(&a.clazz, &b.clazz),
        (TypeKind::Class(a), TypeKind::Class(b)) => classes_equal(a, b),
        (TypeKind::Array(a), TypeKind::Array(b)) => same_type(a, b),
        (TypeKind::Generic(a), TypeKind::Generic(b)) => a.handle == b.handle,
        _ => false,
    }
}

/// Compares namespace, name and generic arguments (pairwise, order-sensitive).
#[must_use]
pub fn classes_equal(a: &ClassInfo, b: &ClassInfo) -> bool {
    a.namespace == b.namespace
        && a.name == b.name
        && a.generics.len() == b.generics.len()
        && a
            .generics
            .iter()
            .zip(&b.generics)
            .all(|(a, b)| same_type(a, b))
}

/// Returns `true` if an instance of `instance` may be passed where `target` is expected.
///
/// That is the case when the class itself, one of the interfaces it declares, or any ancestor
/// (with its interfaces) is `target`.
#[must_use]
pub fn class_convertible(instance: &ClassDetails, target: &ClassInfo) -> bool {
    instance.hierarchy().any(|details| {
        classes_equal(&details.clazz, target)
            || details
                .interfaces
                .iter()
                .any(|interface| classes_equal(interface, target))
    })
}
