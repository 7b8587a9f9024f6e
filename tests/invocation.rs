//! A generic method call prepared the way an inspector does it: build the generics map from
//! the signature, bind parameters, re-derive argument editors, type the arguments and frame
//! them for the wire.

use qrue::prelude::*;

fn list_of(element: TypeInfo) -> TypeInfo {
    TypeInfo::class("System.Collections.Generic", "List`1", vec![element])
}

/// `TValue Lookup<TKey, TValue>(Dictionary<TKey, TValue> map, ref TKey key)`
fn lookup_method() -> MethodInfo {
    let key = TypeInfo::generic(0x10, "TKey");
    let value = TypeInfo::generic(0x20, "TValue");
    let map = TypeInfo::class(
        "System.Collections.Generic",
        "Dictionary`2",
        vec![key.clone(), value.clone()],
    );
    MethodInfo {
        id: 0x0600_0001,
        name: "Lookup".to_string(),
        args: vec![
            ArgumentInfo {
                name: "map".to_string(),
                type_info: map,
            },
            ArgumentInfo {
                name: "key".to_string(),
                type_info: key.with_byref(ByRef::Ref),
            },
        ],
        return_type: value,
    }
}

#[test]
fn generic_call_preparation() {
    let method = lookup_method();
    let mut generics = GenericsMap::for_method(&method);
    assert_eq!(generics.len(), 2);
    assert!(!generics.is_fully_bound());
    let unbound: Vec<String> = generics.unbound().map(ToString::to_string).collect();
    assert_eq!(unbound, ["TKey", "TValue"]);

    let mut editors: Vec<TextEditor> = method
        .args
        .iter()
        .map(|arg| {
            TextEditor::for_payload(DataPayload {
                type_info: instantiate(&arg.type_info, &generics).into_owned(),
                data: None,
            })
        })
        .collect();

    // An unbound parameter is edited as a type descriptor.
    assert_eq!(editors[1].set_input("int"), EditOutcome::Committed);

    assert!(generics
        .bind(0x10, TypeInfo::primitive(PrimitiveKind::String))
        .is_some());
    assert!(generics.bind(0x99, TypeInfo::primitive(PrimitiveKind::Int)).is_none());

    for (editor, arg) in editors.iter_mut().zip(&method.args) {
        let current = editor.payload();
        if let Reinstantiation::Changed(payload) =
            reinstantiate_if_changed(Some(&current), &arg.type_info, &generics)
        {
            editor.reset(payload);
        }
    }

    let key = editors[1].type_info();
    assert_eq!(key.as_primitive(), Some(PrimitiveKind::String));
    assert_eq!(key.byref(), ByRef::Ref);
    assert!(editors[1].value().is_none());

    generics.bind(0x20, TypeInfo::array(TypeInfo::primitive(PrimitiveKind::Float)));
    assert!(generics.is_fully_bound());
    let return_type = instantiate(&method.return_type, &generics);
    assert_eq!(type_to_text(&return_type, DescriptorStyle::Full), "float[]");
    assert_eq!(type_to_text(&return_type, DescriptorStyle::Short), "f[]");

    assert_eq!(editors[0].set_input("0x1f00"), EditOutcome::Committed);
    assert_eq!(editors[1].set_input("player_one"), EditOutcome::Committed);

    for editor in &editors {
        let payload = editor.payload();
        let bytes = encode_payload(&payload).unwrap();
        let decoded = decode_payload(&bytes).unwrap();
        assert!(types_equal(Some(&decoded.type_info), Some(&payload.type_info)));
        assert_eq!(decoded.type_info.byref(), payload.type_info.byref());
        assert!(values_equal(decoded.data.as_ref(), payload.data.as_ref()));
    }
}

#[test]
fn unchanged_bindings_keep_entered_values() {
    let base = list_of(TypeInfo::generic(1, "T"));
    let mut generics = build_generics_map(&[base.clone()], &TypeInfo::primitive(PrimitiveKind::Void));
    generics.bind(1, TypeInfo::primitive(PrimitiveKind::Int));

    let concrete = instantiate(&base, &generics).into_owned();
    let entered = DataPayload::new(concrete, DataSegment::Class(0xBEEF));

    let outcome = reinstantiate_if_changed(Some(&entered), &base, &generics);
    assert!(!outcome.is_changed());
    assert!(matches!(outcome, Reinstantiation::Unchanged(Some(p)) if std::ptr::eq(p, &entered)));

    generics.unbind(1);
    generics.bind(1, TypeInfo::primitive(PrimitiveKind::Long));
    let outcome = reinstantiate_if_changed(Some(&entered), &base, &generics);
    let Reinstantiation::Changed(fresh) = outcome else {
        panic!("rebinding must invalidate the value");
    };
    assert!(fresh.data.is_none());
    assert_eq!(fresh.type_info.to_string(), "System.Collections.Generic::List`1<long>");
}

#[test]
fn bound_variables_are_named() {
    let game_object = TypeInfo::class("UnityEngine", "GameObject", vec![]);
    let player = DataPayload::new(game_object.clone(), DataSegment::Class(0x1000));
    let camera = DataPayload::new(game_object.clone(), DataSegment::Class(0x2000));
    let variables = [("player", &player), ("camera", &camera)];

    let value = from_text("0x2000", &game_object).unwrap();
    assert_eq!(find_named_value(variables, &value), Some("camera"));
    assert_eq!(find_named_value(variables, &DataSegment::Class(0x3000)), None);
}
