//! Resolution of generic parameters.
//!
//! A method signature may mention unbound generic parameters anywhere in its argument and
//! return types. The resolver collects them into a [`GenericsMap`], which the caller fills in
//! as concrete types are chosen, and then [`instantiate`]s types by substituting the bound
//! parameters.
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::{instantiate, GenericsMap, PrimitiveKind, TypeInfo};
//!
//! let list_of_t = TypeInfo::class("System", "List`1", vec![TypeInfo::generic(7, "T")]);
//! let mut generics = GenericsMap::build([&list_of_t], &TypeInfo::primitive(PrimitiveKind::Void));
//! assert!(!generics.is_fully_bound());
//!
//! generics.bind(7, TypeInfo::primitive(PrimitiveKind::Int));
//! let concrete = instantiate(&list_of_t, &generics);
//! assert_eq!(concrete.to_string(), "System::List`1<int>");
//! ```

use std::{borrow::Cow, collections::BTreeMap};

use tracing::trace;

use crate::{
    types::{same_type, ByRef, ClassInfo, MethodInfo, StructInfo, TypeInfo, TypeKind},
    values::DataPayload,
};

/// Collects every generic parameter occurring in a type, in tree order.
///
/// Parameters are found in class generic arguments, array elements and the generic arguments
/// of a struct's owning class. The collected copies are by-value; duplicates are kept.
#[must_use]
pub fn collect_generic_parameters(type_info: Option<&TypeInfo>) -> Vec<TypeInfo> {
    let mut parameters = Vec::new();
    if let Some(type_info) = type_info {
        collect_into(type_info, &mut parameters);
    }
    parameters
}

fn collect_into(type_info: &TypeInfo, parameters: &mut Vec<TypeInfo>) {
    match type_info.kind() {
        TypeKind::Class(clazz) | TypeKind::Struct(StructInfo { clazz, .. }) => {
            for generic in &clazz.generics {
                collect_into(generic, parameters);
            }
        }
        TypeKind::Array(element) => collect_into(element, parameters),
        TypeKind::Generic(_) => parameters.push(type_info.clone().with_byref(ByRef::None)),
        TypeKind::Primitive(_) | TypeKind::Enum(_) => {}
    }
}

/// A generic parameter and the concrete type chosen for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericBinding {
    /// The parameter, by-value
    pub parameter: TypeInfo,
    /// The bound type, `None` while unbound
    pub value: Option<TypeInfo>,
}

/// Generic parameters of one call site, keyed by handle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenericsMap {
    bindings: BTreeMap<u64, GenericBinding>,
}

impl GenericsMap {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the parameters of all argument types and the return type, all unbound.
    #[must_use]
    pub fn build<'a>(
        arg_types: impl IntoIterator<Item = &'a TypeInfo>,
        return_type: &'a TypeInfo,
    ) -> Self {
        let mut map = GenericsMap::new();
        for type_info in arg_types.into_iter().chain(std::iter::once(return_type)) {
            for parameter in collect_generic_parameters(Some(type_info)) {
                map.insert_parameter(parameter);
            }
        }
        map
    }

    /// Collects the parameters of a method signature.
    #[must_use]
    pub fn for_method(method: &MethodInfo) -> Self {
        GenericsMap::build(method.arg_types(), &method.return_type)
    }

    /// Registers a parameter, unbound. Types that are not generic parameters are ignored, and
    /// an already registered handle keeps its binding.
    pub fn insert_parameter(&mut self, parameter: TypeInfo) {
        if let TypeKind::Generic(info) = parameter.kind() {
            self.bindings
                .entry(info.handle)
                .or_insert_with(|| GenericBinding {
                    parameter: parameter.with_byref(ByRef::None),
                    value: None,
                });
        }
    }

    /// Binds `handle` to a concrete type, returning the previous binding.
    ///
    /// Returns `None` without binding anything if the handle is not part of the map.
    pub fn bind(&mut self, handle: u64, value: TypeInfo) -> Option<Option<TypeInfo>> {
        let binding = self.bindings.get_mut(&handle)?;
        trace!(handle, value = %value, "generic bound");
        Some(binding.value.replace(value))
    }

    /// Clears the binding of `handle`, returning the type it was bound to.
    pub fn unbind(&mut self, handle: u64) -> Option<TypeInfo> {
        self.bindings.get_mut(&handle)?.value.take()
    }

    /// The binding of `handle`.
    #[must_use]
    pub fn get(&self, handle: u64) -> Option<&GenericBinding> {
        self.bindings.get(&handle)
    }

    /// The type `handle` is bound to.
    #[must_use]
    pub fn bound_value(&self, handle: u64) -> Option<&TypeInfo> {
        self.bindings.get(&handle)?.value.as_ref()
    }

    /// Returns `true` if every parameter has a concrete type.
    ///
    /// Invoking anything whose signature depends on the map requires this.
    #[must_use]
    pub fn is_fully_bound(&self) -> bool {
        self.bindings.values().all(|binding| binding.value.is_some())
    }

    /// The parameters still lacking a concrete type.
    pub fn unbound(&self) -> impl Iterator<Item = &TypeInfo> {
        self.bindings
            .values()
            .filter(|binding| binding.value.is_none())
            .map(|binding| &binding.parameter)
    }

    /// All bindings ordered by handle.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &GenericBinding)> {
        self.bindings.iter().map(|(handle, binding)| (*handle, binding))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the map has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Collects the parameters of argument types and a return type into an unbound map.
#[must_use]
pub fn build_generics_map(arg_types: &[TypeInfo], return_type: &TypeInfo) -> GenericsMap {
    GenericsMap::build(arg_types, return_type)
}

/// Substitutes every bound generic parameter of `type_info`.
///
/// Substitution reaches parameters at any depth of class generic arguments, array elements and
/// a struct's owning class. A substituted occurrence keeps its own by-ref qualifier. Unbound
/// parameters are left in place.
///
/// If the result is the same type as the input, the input itself is returned borrowed, so
/// callers can use the [`Cow`] variant as a cheap "nothing changed" signal.
#[must_use]
pub fn instantiate<'a>(type_info: &'a TypeInfo, generics: &GenericsMap) -> Cow<'a, TypeInfo> {
    match substitute(type_info, generics) {
        Some(rewritten) if !same_type(type_info, &rewritten) => Cow::Owned(rewritten),
        _ => Cow::Borrowed(type_info),
    }
}

/// Rebuilds the nodes on the path to a bound parameter. `None` means nothing was substituted.
fn substitute(type_info: &TypeInfo, generics: &GenericsMap) -> Option<TypeInfo> {
    let kind = match type_info.kind() {
        TypeKind::Generic(info) => {
            let value = generics.bound_value(info.handle)?;
            trace!(handle = info.handle, name = %info.name, value = %value, "substituting generic");
            return Some(value.clone().with_byref(type_info.byref()));
        }
        TypeKind::Array(element) => TypeKind::Array(Box::new(substitute(element, generics)?)),
        TypeKind::Class(clazz) => TypeKind::Class(substitute_class(clazz, generics)?),
        TypeKind::Struct(info) => TypeKind::Struct(StructInfo {
            clazz: substitute_class(&info.clazz, generics)?,
            fields: info.fields.clone(),
        }),
        TypeKind::Primitive(_) | TypeKind::Enum(_) => return None,
    };
    Some(TypeInfo::new(kind, type_info.byref()))
}

fn substitute_class(clazz: &ClassInfo, generics: &GenericsMap) -> Option<ClassInfo> {
    let rewritten: Vec<Option<TypeInfo>> = clazz
        .generics
        .iter()
        .map(|generic| substitute(generic, generics))
        .collect();
    if rewritten.iter().all(Option::is_none) {
        return None;
    }

    let generics = clazz
        .generics
        .iter()
        .zip(rewritten)
        .map(|(original, rewritten)| rewritten.unwrap_or_else(|| original.clone()))
        .collect();
    Some(ClassInfo {
        namespace: clazz.namespace.clone(),
        name: clazz.name.clone(),
        generics,
    })
}

/// Outcome of [`reinstantiate_if_changed`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reinstantiation<'a> {
    /// The instantiated type is the type of the current payload, which stays valid
    Unchanged(Option<&'a DataPayload>),
    /// The instantiated type changed; the previous value must be discarded
    Changed(DataPayload),
}

impl Reinstantiation<'_> {
    /// Returns `true` if the previous value was invalidated.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        matches!(self, Reinstantiation::Changed(_))
    }
}

/// Re-derives the concrete type of an argument or return editor after the map changed.
///
/// If `base` instantiates to a type other than the type of `current`, a fresh payload without
/// a value is returned and the caller drops whatever was entered before. Otherwise `current` is
/// handed back untouched.
#[must_use]
pub fn reinstantiate_if_changed<'a>(
    current: Option<&'a DataPayload>,
    base: &TypeInfo,
    generics: &GenericsMap,
) -> Reinstantiation<'a> {
    let instantiated = instantiate(base, generics);
    match current {
        Some(payload) if same_type(&payload.type_info, &instantiated) => {
            Reinstantiation::Unchanged(current)
        }
        _ => Reinstantiation::Changed(DataPayload {
            type_info: instantiated.into_owned(),
            data: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        types::{ArgumentInfo, PrimitiveKind, StructField},
        values::DataSegment,
    };

    fn t() -> TypeInfo {
        TypeInfo::generic(1, "T")
    }

    fn u() -> TypeInfo {
        TypeInfo::generic(2, "U")
    }

    fn int() -> TypeInfo {
        TypeInfo::primitive(PrimitiveKind::Int)
    }

    #[test]
    fn collects_in_tree_order() {
        let nested = TypeInfo::class(
            "S",
            "Dict`2",
            vec![t().with_byref(ByRef::Ref), TypeInfo::array(TypeInfo::array(u()))],
        );
        let found = collect_generic_parameters(Some(&nested));
        assert_eq!(found, [t(), u()]);
        assert!(found.iter().all(|p| p.byref() == ByRef::None));

        let structure = TypeInfo::structure(
            ClassInfo::with_generics("S", "Box`1", vec![t()]),
            BTreeMap::from([(
                0,
                StructField {
                    name: "inner".to_string(),
                    type_info: u(),
                },
            )]),
        );
        assert_eq!(collect_generic_parameters(Some(&structure)), [t()]);
        assert!(collect_generic_parameters(None).is_empty());
        assert!(collect_generic_parameters(Some(&int())).is_empty());
    }

    #[test]
    fn map_from_method() {
        let method = MethodInfo {
            id: 10,
            name: "Convert".to_string(),
            args: vec![
                ArgumentInfo {
                    name: "input".to_string(),
                    type_info: t(),
                },
                ArgumentInfo {
                    name: "more".to_string(),
                    type_info: TypeInfo::array(t()),
                },
            ],
            return_type: u().with_byref(ByRef::Out),
        };
        let mut map = GenericsMap::for_method(&method);
        assert_eq!(map.len(), 2);
        assert_eq!(map.unbound().count(), 2);
        assert!(!map.is_fully_bound());

        assert_eq!(map.bind(1, int()), Some(None));
        assert_eq!(map.bind(99, int()), None);
        assert_eq!(map.unbound().collect::<Vec<_>>(), [&u()]);

        map.bind(2, TypeInfo::primitive(PrimitiveKind::String));
        assert!(map.is_fully_bound());
        assert_eq!(map.unbind(2), Some(TypeInfo::primitive(PrimitiveKind::String)));
        assert!(!map.is_fully_bound());
        assert_eq!(map.get(1).unwrap().parameter, t());
    }

    #[test]
    fn instantiate_without_generics_borrows() {
        let map = build_generics_map(&[t()], &int());
        let plain = TypeInfo::class("S", "Plain", vec![]);
        assert!(matches!(instantiate(&plain, &map), Cow::Borrowed(p) if std::ptr::eq(p, &plain)));

        // Unbound parameters are left alone.
        let array = TypeInfo::array(t());
        assert!(matches!(instantiate(&array, &map), Cow::Borrowed(_)));
    }

    #[test]
    fn instantiate_substitutes_at_depth() {
        let mut map = build_generics_map(&[t(), u()], &int());
        map.bind(1, TypeInfo::class("NS", "Foo", vec![]).with_byref(ByRef::Ref));

        let deep = TypeInfo::class(
            "S",
            "Outer`2",
            vec![
                TypeInfo::class("S", "Inner`1", vec![t().with_byref(ByRef::In)]),
                u(),
            ],
        )
        .with_byref(ByRef::Out);

        let result = instantiate(&deep, &map);
        assert!(matches!(result, Cow::Owned(_)));
        assert_eq!(result.byref(), ByRef::Out);
        assert_eq!(result.to_string(), "out S::Outer`2<S::Inner`1<in NS::Foo>, U>");
    }

    #[test]
    fn instantiate_struct_owner_only() {
        let mut map = build_generics_map(&[t()], &int());
        map.bind(1, int());

        let structure = TypeInfo::structure(
            ClassInfo::with_generics("S", "Box`1", vec![t()]),
            BTreeMap::from([(
                0,
                StructField {
                    name: "value".to_string(),
                    type_info: t(),
                },
            )]),
        );
        let result = instantiate(&structure, &map);
        let TypeKind::Struct(info) = result.kind() else {
            panic!("expected struct");
        };
        assert_eq!(info.clazz.generics, [int()]);
        assert_eq!(info.fields[&0].type_info, t());
    }

    #[test]
    fn instantiate_is_idempotent() {
        let mut map = GenericsMap::new();
        map.insert_parameter(t());
        map.bind(1, TypeInfo::class("NS", "Foo", vec![]));

        let array = TypeInfo::array(t());
        let first = instantiate(&array, &map);
        let second = instantiate(&array, &map);
        assert!(same_type(&first, &second));
        assert!(matches!(instantiate(&first, &map), Cow::Borrowed(_)));
    }

    #[test]
    fn reinstantiation_policy() {
        let mut map = build_generics_map(&[t()], &int());
        let base = TypeInfo::array(t());

        let current = DataPayload {
            type_info: base.clone(),
            data: Some(DataSegment::Array(vec![])),
        };
        let outcome = reinstantiate_if_changed(Some(&current), &base, &map);
        assert_eq!(outcome, Reinstantiation::Unchanged(Some(&current)));

        map.bind(1, int());
        let outcome = reinstantiate_if_changed(Some(&current), &base, &map);
        assert!(outcome.is_changed());
        let Reinstantiation::Changed(payload) = outcome else {
            unreachable!();
        };
        assert_eq!(payload.type_info, TypeInfo::array(int()));
        assert!(payload.data.is_none());

        assert!(reinstantiate_if_changed(None, &base, &map).is_changed());
    }
}
