//! Benchmarks for the text and binary codecs and for generic instantiation.
//!
//! Covers the paths an inspector hits on every keystroke or refresh:
//! - Validating and converting struct text
//! - Rendering values
//! - Encoding and decoding payloads
//! - Parsing type descriptors
//! - Instantiating generic types

extern crate qrue;

use std::{collections::BTreeMap, hint::black_box};

use criterion::{criterion_group, criterion_main, Criterion};
use qrue::prelude::*;

fn transform() -> TypeInfo {
    let float = TypeInfo::primitive(PrimitiveKind::Float);
    let vector = TypeInfo::structure(
        ClassInfo::new("UnityEngine", "Vector3"),
        BTreeMap::from([
            (0, StructField { name: "x".into(), type_info: float.clone() }),
            (4, StructField { name: "y".into(), type_info: float.clone() }),
            (8, StructField { name: "z".into(), type_info: float }),
        ]),
    );
    TypeInfo::structure(
        ClassInfo::new("Game", "Waypoint"),
        BTreeMap::from([
            (0, StructField { name: "position".into(), type_info: vector }),
            (
                12,
                StructField {
                    name: "label".into(),
                    type_info: TypeInfo::primitive(PrimitiveKind::String),
                },
            ),
            (
                20,
                StructField {
                    name: "owner".into(),
                    type_info: TypeInfo::class("UnityEngine", "GameObject", vec![]),
                },
            ),
        ]),
    )
}

const WAYPOINT: &str =
    r#"{"position":{"x":1.5,"y":-2,"z":0.25},"label":"spawn \"A\"","owner":"0x7f001000"}"#;

/// Benchmark validating struct text, as done on every keystroke.
fn bench_validate_struct_text(c: &mut Criterion) {
    let waypoint = transform();

    c.bench_function("text_validate_struct", |b| {
        b.iter(|| black_box(is_valid_text(black_box(WAYPOINT), &waypoint)));
    });
}

/// Benchmark rendering a struct value.
fn bench_render_struct_text(c: &mut Criterion) {
    let waypoint = transform();
    let value = from_text(WAYPOINT, &waypoint).unwrap();

    c.bench_function("text_render_struct", |b| {
        b.iter(|| black_box(to_text(&waypoint, Some(black_box(&value)))));
    });
}

/// Benchmark a payload of 256 structs through the binary codec.
fn bench_payload_codec(c: &mut Criterion) {
    let waypoint = transform();
    let value = from_text(WAYPOINT, &waypoint).unwrap();
    let payload = DataPayload::new(
        TypeInfo::array(waypoint),
        DataSegment::Array(vec![value; 256]),
    );
    let bytes = encode_payload(&payload).unwrap();

    c.bench_function("payload_encode_256", |b| {
        b.iter(|| black_box(encode_payload(black_box(&payload)).unwrap()));
    });
    c.bench_function("payload_decode_256", |b| {
        b.iter(|| black_box(decode_payload(black_box(&bytes)).unwrap()));
    });
}

/// Benchmark parsing a nested generic descriptor.
fn bench_parse_descriptor(c: &mut Criterion) {
    let descriptor =
        "ref System.Collections.Generic::Dictionary`2<string, System.Collections.Generic::List`1<UnityEngine::Vector3[]>>";

    c.bench_function("descriptor_parse_nested", |b| {
        b.iter(|| black_box(parse_type_descriptor(black_box(descriptor)).unwrap()));
    });
}

/// Benchmark instantiation, both substituting and the unchanged fast path.
fn bench_instantiate(c: &mut Criterion) {
    let t = TypeInfo::generic(1, "T");
    let base = TypeInfo::class(
        "System.Collections.Generic",
        "Dictionary`2",
        vec![
            TypeInfo::primitive(PrimitiveKind::String),
            TypeInfo::array(TypeInfo::class("System.Collections.Generic", "List`1", vec![t])),
        ],
    );
    let mut generics = GenericsMap::build([&base], &TypeInfo::primitive(PrimitiveKind::Void));
    let unbound = generics.clone();
    generics.bind(1, transform());

    c.bench_function("instantiate_bound", |b| {
        b.iter(|| black_box(instantiate(black_box(&base), &generics).into_owned()));
    });
    c.bench_function("instantiate_unchanged", |b| {
        b.iter(|| black_box(instantiate(black_box(&base), &unbound)));
    });
}

criterion_group!(
    benches,
    bench_validate_struct_text,
    bench_render_struct_text,
    bench_payload_codec,
    bench_parse_descriptor,
    bench_instantiate,
);
criterion_main!(benches);
