//! Textual type descriptors.
//!
//! A type descriptor is the compact text form of a [`crate::types::TypeInfo`] used wherever the
//! user types or reads a type, including the value of `type`-kind primitives.
//!
//! # Grammar
//!
//! ```text
//! descriptor := [byref] body
//! byref      := ("ref" | "in" | "out") " "          ; case-insensitive
//! body       := primitive
//!             | body "[]"                           ; array, trailing brackets peeled first
//!             | namespace "::" name [generics]
//! generics   := "<" descriptor ("," descriptor)* ">"
//! primitive  := bool | char | byte | short | int | long | float | double
//!             | string | type | pointer | void | unknown   ; case-insensitive
//! ```
//!
//! Enums and structs render through their owning class and parse back as classes; generic
//! parameters render as their declared name.
//!
//! # Examples
//!
//! ```rust
//! use qrue::types::{parse_type_descriptor, type_to_text, DescriptorStyle, TypeInfo};
//!
//! let parsed = parse_type_descriptor("out System::Collections::Dictionary`2<string, int[]>")?;
//! assert_eq!(
//!     type_to_text(&parsed, DescriptorStyle::Full),
//!     "out System::Collections::Dictionary`2<string, int[]>"
//! );
//! assert_eq!(
//!     type_to_text(&parsed, DescriptorStyle::Short),
//!     "out System::Collections::Dictionary`2<w, i[]>"
//! );
//! # Ok::<(), qrue::Error>(())
//! ```

use tracing::debug;

use crate::{
    config::CodecConfig,
    types::{ByRef, ClassInfo, PrimitiveKind, TypeInfo, TypeKind},
    Error::{InvalidTypeDescriptor, RecursionLimit},
    Result,
};

/// How primitive kinds are spelled when rendering a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorStyle {
    /// Keywords such as `int` and `string`
    #[default]
    Full,
    /// Single letters such as `i` and `w`
    Short,
}

/// Renders a type as a descriptor.
#[must_use]
pub fn type_to_text(type_info: &TypeInfo, style: DescriptorStyle) -> String {
    let body = match type_info.kind() {
        TypeKind::Primitive(kind) => match style {
            DescriptorStyle::Full => kind.name().to_string(),
            DescriptorStyle::Short => kind.short_name().to_string(),
        },
        TypeKind::Enum(info) => class_to_text(&info.clazz, style),
        TypeKind::Class(clazz) => class_to_text(clazz, style),
        TypeKind::Struct(info) => class_to_text(&info.clazz, style),
        TypeKind::Array(element) => format!("{}[]", type_to_text(element, style)),
        TypeKind::Generic(info) => info.name.clone(),
    };

    match type_info.byref().keyword() {
        Some(keyword) => format!("{keyword} {body}"),
        None => body,
    }
}

/// Renders a class as `Namespace::Name<G1, G2>`.
#[must_use]
pub fn class_to_text(clazz: &ClassInfo, style: DescriptorStyle) -> String {
    let mut text = format!("{}::{}", clazz.namespace, clazz.name);
    if !clazz.generics.is_empty() {
        let generics: Vec<String> = clazz
            .generics
            .iter()
            .map(|generic| type_to_text(generic, style))
            .collect();
        text.push('<');
        text.push_str(&generics.join(", "));
        text.push('>');
    }
    text
}

/// Parses a descriptor with the default recursion limit.
///
/// # Errors
/// Returns [`crate::Error::InvalidTypeDescriptor`] if the text does not follow the grammar, or
/// [`crate::Error::RecursionLimit`] if it nests too deeply.
pub fn parse_type_descriptor(input: &str) -> Result<TypeInfo> {
    parse_type_descriptor_with(input, &CodecConfig::default())
}

/// Parses a descriptor with the recursion limit of `config`.
///
/// # Errors
/// Returns [`crate::Error::InvalidTypeDescriptor`] if the text does not follow the grammar, or
/// [`crate::Error::RecursionLimit`] if it nests too deeply.
pub fn parse_type_descriptor_with(input: &str, config: &CodecConfig) -> Result<TypeInfo> {
    let mut parser = DescriptorParser {
        max_depth: config.max_depth,
        depth: 0,
    };
    parser.parse(input).map_err(|error| {
        debug!(input, %error, "type descriptor rejected");
        match error {
            RecursionLimit(limit) => RecursionLimit(limit),
            _ => InvalidTypeDescriptor(input.to_string()),
        }
    })
}

/// Returns `true` if `input` parses as a descriptor.
#[must_use]
pub fn is_type_descriptor(input: &str) -> bool {
    parse_type_descriptor(input).is_ok()
}

struct DescriptorParser {
    max_depth: usize,
    depth: usize,
}

impl DescriptorParser {
    fn parse(&mut self, input: &str) -> Result<TypeInfo> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(RecursionLimit(self.max_depth));
        }
        let result = self.parse_body(input);
        self.depth -= 1;
        result
    }

    fn parse_body(&mut self, input: &str) -> Result<TypeInfo> {
        let (byref, body) = split_byref(input.trim());

        if let Some(kind) = PrimitiveKind::from_name(body) {
            return Ok(TypeInfo::primitive(kind).with_byref(byref));
        }

        if let Some(element) = body.strip_suffix("[]") {
            let element = self.parse(element)?;
            return Ok(TypeInfo::array(element).with_byref(byref));
        }

        let Some((namespace, class)) = body.split_once("::") else {
            return Err(InvalidTypeDescriptor(input.to_string()));
        };

        let (name, generics) = match class.split_once('<') {
            Some((name, rest)) if rest.ends_with('>') => {
                let arguments = &rest[..rest.len() - 1];
                let generics = split_generic_arguments(arguments)
                    .into_iter()
                    .map(|argument| self.parse(argument))
                    .collect::<Result<Vec<_>>>()?;
                (name, generics)
            }
            _ => (class, Vec::new()),
        };

        if name.is_empty() {
            return Err(InvalidTypeDescriptor(input.to_string()));
        }

        Ok(TypeInfo::class(namespace, name, generics).with_byref(byref))
    }
}

fn split_byref(input: &str) -> (ByRef, &str) {
    for (keyword, byref) in [("ref ", ByRef::Ref), ("in ", ByRef::In), ("out ", ByRef::Out)] {
        if input.len() >= keyword.len()
            && input.is_char_boundary(keyword.len())
            && input[..keyword.len()].eq_ignore_ascii_case(keyword)
        {
            return (byref, input[keyword.len()..].trim_start());
        }
    }
    (ByRef::None, input)
}

/// Splits at the commas that are not nested inside another argument list.
fn split_generic_arguments(arguments: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut nesting = 0_usize;
    let mut start = 0;
    for (index, c) in arguments.char_indices() {
        match c {
            '<' => nesting += 1,
            '>' => nesting = nesting.saturating_sub(1),
            ',' if nesting == 0 => {
                parts.push(&arguments[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&arguments[start..]);
    parts
}
