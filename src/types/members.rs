//! Shapes of class members as delivered by the class-metadata collaborator.
//!
//! These are plain data; this crate never fetches them. They are consumed by the convertibility
//! check in [`crate::types::class_convertible`] and by
//! [`crate::types::GenericsMap::for_method`].

use crate::types::{ClassInfo, TypeInfo};

/// A method argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentInfo {
    /// Parameter name
    pub name: String,
    /// Parameter type, including its by-ref qualifier
    pub type_info: TypeInfo,
}

/// A field of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Runtime identifier of the field
    pub id: u64,
    /// Field name
    pub name: String,
    /// Field type
    pub type_info: TypeInfo,
    /// `const` field; the value is baked into the metadata
    pub literal: bool,
    /// `readonly` field
    pub readonly: bool,
}

/// A property of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyInfo {
    /// Property name
    pub name: String,
    /// Property type
    pub type_info: TypeInfo,
    /// Method id of the getter, if any
    pub getter_id: Option<u64>,
    /// Method id of the setter, if any
    pub setter_id: Option<u64>,
}

/// A method of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// Runtime identifier of the method
    pub id: u64,
    /// Method name
    pub name: String,
    /// Arguments in declaration order
    pub args: Vec<ArgumentInfo>,
    /// Return type
    pub return_type: TypeInfo,
}

impl MethodInfo {
    /// Argument types in declaration order.
    pub fn arg_types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.args.iter().map(|arg| &arg.type_info)
    }
}

/// Full description of a class with its inheritance chain.
///
/// Instance and static members are kept apart, as the runtime reports them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassDetails {
    /// The class itself
    pub clazz: ClassInfo,
    /// Details of the base class, `None` at the root of the hierarchy
    pub parent: Option<Box<ClassDetails>>,
    /// Interfaces declared directly on this class
    pub interfaces: Vec<ClassInfo>,
    /// Instance fields
    pub fields: Vec<FieldInfo>,
    /// Instance properties
    pub properties: Vec<PropertyInfo>,
    /// Instance methods
    pub methods: Vec<MethodInfo>,
    /// Static fields
    pub static_fields: Vec<FieldInfo>,
    /// Static properties
    pub static_properties: Vec<PropertyInfo>,
    /// Static methods
    pub static_methods: Vec<MethodInfo>,
}

impl ClassDetails {
    /// Iterates this class and then its ancestors, nearest first.
    pub fn hierarchy(&self) -> impl Iterator<Item = &ClassDetails> {
        std::iter::successors(Some(self), |details| details.parent.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveKind;

    #[test]
    fn hierarchy_walks_parents() {
        let root = ClassDetails {
            clazz: ClassInfo::new("System", "Object"),
            ..ClassDetails::default()
        };
        let middle = ClassDetails {
            clazz: ClassInfo::new("UnityEngine", "Component"),
            parent: Some(Box::new(root)),
            ..ClassDetails::default()
        };
        let leaf = ClassDetails {
            clazz: ClassInfo::new("UnityEngine", "Transform"),
            parent: Some(Box::new(middle)),
            ..ClassDetails::default()
        };

        let names: Vec<&str> = leaf.hierarchy().map(|d| d.clazz.name.as_str()).collect();
        assert_eq!(names, ["Transform", "Component", "Object"]);
    }

    #[test]
    fn method_argument_types() {
        let method = MethodInfo {
            id: 1,
            name: "Add".to_string(),
            args: vec![
                ArgumentInfo {
                    name: "a".to_string(),
                    type_info: TypeInfo::primitive(PrimitiveKind::Int),
                },
                ArgumentInfo {
                    name: "b".to_string(),
                    type_info: TypeInfo::primitive(PrimitiveKind::Long),
                },
            ],
            return_type: TypeInfo::primitive(PrimitiveKind::Void),
        };
        let kinds: Vec<_> = method.arg_types().filter_map(TypeInfo::as_primitive).collect();
        assert_eq!(kinds, [PrimitiveKind::Int, PrimitiveKind::Long]);
    }
}
