//! Structural equality of values.

use crate::values::{DataPayload, DataSegment};

/// Compares two optional values; an absent operand never matches.
#[must_use]
pub fn values_equal(a: Option<&DataSegment>, b: Option<&DataSegment>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_value(a, b),
        _ => false,
    }
}

/// Compares two values of the same case structurally.
///
/// Primitives compare byte for byte and arrays element-wise. Struct comparison checks that
/// every field of `a` is present and equal in `b`; both sides are expected to mirror the same
/// struct type.
#[must_use]
pub fn same_value(a: &DataSegment, b: &DataSegment) -> bool {
    match (a, b) {
        (DataSegment::Primitive(a), DataSegment::Primitive(b)) => a == b,
        (DataSegment::Class(a), DataSegment::Class(b)) => a == b,
        (DataSegment::Array(a), DataSegment::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same_value(a, b))
        }
        (DataSegment::Struct(a), DataSegment::Struct(b)) => a
            .iter()
            .all(|(offset, a)| b.get(offset).is_some_and(|b| same_value(a, b))),
        _ => false,
    }
}

/// Finds the name of the first candidate holding `value`.
///
/// Used to show a bound variable's name instead of a raw handle.
pub fn find_named_value<'a>(
    candidates: impl IntoIterator<Item = (&'a str, &'a DataPayload)>,
    value: &DataSegment,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .find(|(_, payload)| values_equal(payload.data.as_ref(), Some(value)))
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::test::factories::game_object;

    fn bytes(data: &[u8]) -> DataSegment {
        DataSegment::Primitive(data.to_vec())
    }

    #[test]
    fn primitives() {
        assert!(same_value(&bytes(&[1, 2]), &bytes(&[1, 2])));
        assert!(!same_value(&bytes(&[1, 2]), &bytes(&[1, 2, 0])));
        assert!(!same_value(&bytes(&[1]), &DataSegment::Class(1)));
        assert!(!values_equal(None, Some(&bytes(&[]))));
        assert!(!values_equal(None, None));
    }

    #[test]
    fn arrays_are_ordered() {
        let a = DataSegment::Array(vec![bytes(&[1]), bytes(&[2])]);
        let b = DataSegment::Array(vec![bytes(&[2]), bytes(&[1])]);
        assert!(same_value(&a, &a.clone()));
        assert!(!same_value(&a, &b));
        assert!(!same_value(&a, &DataSegment::Array(vec![bytes(&[1])])));
    }

    #[test]
    fn structs_check_left_keys() {
        let full = DataSegment::Struct(BTreeMap::from([(0, bytes(&[1])), (4, bytes(&[2]))]));
        let partial = DataSegment::Struct(BTreeMap::from([(0, bytes(&[1]))]));
        assert!(same_value(&partial, &full));
        assert!(!same_value(&full, &partial));

        let different = DataSegment::Struct(BTreeMap::from([(0, bytes(&[9])), (4, bytes(&[2]))]));
        assert!(!same_value(&full, &different));
    }

    #[test]
    fn named_values() {
        let player = DataPayload::new(game_object(), DataSegment::Class(0x10));
        let camera = DataPayload::new(game_object(), DataSegment::Class(0x20));
        let unset = DataPayload {
            type_info: game_object(),
            data: None,
        };
        let variables = [("player", &player), ("unset", &unset), ("camera", &camera)];

        assert_eq!(find_named_value(variables, &DataSegment::Class(0x20)), Some("camera"));
        assert_eq!(find_named_value(variables, &DataSegment::Class(0x30)), None);
    }
}
