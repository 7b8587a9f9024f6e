#![no_main]

use libfuzzer_sys::fuzz_target;
use qrue::{
    types::{parse_type_descriptor, ClassInfo, PrimitiveKind, StructField, TypeInfo},
    values::{from_text, is_valid_text},
};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_type_descriptor(input);

    let element = TypeInfo::structure(
        ClassInfo::new("Fuzz", "Pair"),
        [
            (0, StructField { name: "a".into(), type_info: TypeInfo::primitive(PrimitiveKind::Long) }),
            (8, StructField { name: "b".into(), type_info: TypeInfo::primitive(PrimitiveKind::String) }),
        ]
        .into_iter()
        .collect(),
    );
    for type_info in [
        TypeInfo::primitive(PrimitiveKind::Double),
        TypeInfo::primitive(PrimitiveKind::Type),
        TypeInfo::array(element),
    ] {
        // Validation and conversion must agree.
        assert_eq!(is_valid_text(input, &type_info), from_text(input, &type_info).is_ok());
    }
});
