//! One-level parser for struct and array text.
//!
//! Struct values are written as a JSON object keyed by field name and array values as a JSON
//! array. Only the top level is parsed here; each member is handed back as text so it can be
//! converted with its own type:
//!
//! - a member written as a JSON string literal yields its unescaped contents
//! - any other member yields its raw JSON text, trimmed
//!
//! Every member must itself be valid JSON. Duplicate object keys resolve to the last
//! occurrence.
//!
//! # Examples
//!
//! ```rust
//! use qrue::values::shallow::{parse_array, parse_object};
//!
//! let fields = parse_object(r#"{"name": "a\"b", "pos": {"x": 1}}"#)?;
//! assert_eq!(fields["name"], "a\"b");
//! assert_eq!(fields["pos"], r#"{"x": 1}"#);
//!
//! assert_eq!(parse_array("[1, [2, 3], \"4\"]")?, ["1", "[2, 3]", "4"]);
//! # Ok::<(), qrue::Error>(())
//! ```

use std::collections::BTreeMap;

use crate::Result;

/// Parses a JSON object one level deep, returning member text by key.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the text is not a JSON object.
pub fn parse_object(input: &str) -> Result<BTreeMap<String, String>> {
    let inner = enclosed(input, '{', '}')?;
    let mut fields = BTreeMap::new();
    for member in split_top_level(inner, ',')? {
        let parts = split_top_level(member, ':')?;
        let [key, value] = parts.as_slice() else {
            return Err(malformed_error!("Expected one `:` in object member - {}", member));
        };
        let key: String = serde_json::from_str(key)
            .map_err(|e| malformed_error!("Object key is not a string - {}", e))?;
        fields.insert(key, member_text(value)?);
    }
    Ok(fields)
}

/// Parses a JSON array one level deep, returning element text in order.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the text is not a JSON array.
pub fn parse_array(input: &str) -> Result<Vec<String>> {
    let inner = enclosed(input, '[', ']')?;
    split_top_level(inner, ',')?
        .into_iter()
        .map(member_text)
        .collect()
}

/// Renders already-rendered member texts as a JSON object.
///
/// Each member text must be a JSON token; keys are escaped.
#[must_use]
pub fn render_object<'a>(members: impl IntoIterator<Item = (&'a str, String)>) -> String {
    let members: Vec<String> = members
        .into_iter()
        .map(|(key, value)| format!("{}:{}", quote(key), value))
        .collect();
    format!("{{{}}}", members.join(","))
}

/// Renders already-rendered element texts as a JSON array.
#[must_use]
pub fn render_array(elements: impl IntoIterator<Item = String>) -> String {
    let elements: Vec<String> = elements.into_iter().collect();
    format!("[{}]", elements.join(","))
}

/// Quotes `text` as a JSON string literal.
#[must_use]
pub fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

/// Strips the enclosing brackets, which must wrap the whole trimmed input.
fn enclosed(input: &str, open: char, close: char) -> Result<&str> {
    let trimmed = input.trim();
    trimmed
        .strip_prefix(open)
        .and_then(|rest| rest.strip_suffix(close))
        .ok_or_else(|| malformed_error!("Expected `{}` ... `{}` - {}", open, close, input))
}

/// Splits at `separator` where it is neither nested nor inside a string. Empty content yields
/// no parts; an empty part elsewhere is an error.
fn split_top_level(content: &str, separator: char) -> Result<Vec<&str>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut nesting = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (index, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => nesting.push('}'),
            '[' => nesting.push(']'),
            '}' | ']' => {
                if nesting.pop() != Some(c) {
                    return Err(malformed_error!("Unbalanced `{}` at {}", c, index));
                }
            }
            _ if c == separator && nesting.is_empty() => {
                parts.push(non_empty(&content[start..index])?);
                start = index + c.len_utf8();
            }
            _ => {}
        }
    }

    if in_string || !nesting.is_empty() {
        return Err(malformed_error!("Unterminated member - {}", &content[start..]));
    }
    parts.push(non_empty(&content[start..])?);
    Ok(parts)
}

fn non_empty(part: &str) -> Result<&str> {
    let part = part.trim();
    if part.is_empty() {
        return Err(malformed_error!("Empty member"));
    }
    Ok(part)
}

fn member_text(raw: &str) -> Result<String> {
    if raw.starts_with('"') {
        return serde_json::from_str::<String>(raw)
            .map_err(|e| malformed_error!("Invalid string member - {}", e));
    }
    serde_json::from_str::<serde_json::Value>(raw)
        .map_err(|e| malformed_error!("Invalid member {} - {}", raw, e))?;
    Ok(raw.to_string())
}
