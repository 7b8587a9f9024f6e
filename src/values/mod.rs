//! The value model and its codecs.
//!
//! A [`DataSegment`] is a value of the remote runtime, always interpreted together with the
//! [`crate::types::TypeInfo`] it was produced for. This module converts values to and from
//! their binary wire form and their editable text form, and compares them.
//!
//! # Key Components
//!
//! - [`segment`] - [`DataSegment`], [`DataPayload`] and default values
//! - [`primitive`] - binary layout of primitive payloads
//! - [`text`] - value text rendering, parsing and validation
//! - [`shallow`] - the one-level struct/array text grammar
//! - [`matching`] - structural value equality
//! - [`encoding`] - binary encoding of whole payloads
//! - [`editor`] - keeping editor text and committed values in step

pub mod editor;
pub mod encoding;
pub mod matching;
pub mod primitive;
pub mod segment;
pub mod shallow;
pub mod text;

pub use editor::{EditOutcome, TextEditor};
pub use encoding::{
    decode_payload, decode_payload_with, encode_payload, encode_segment, SEGMENT_TAG,
};
pub use matching::{find_named_value, same_value, values_equal};
pub use primitive::{
    decode_primitive, decode_primitive_with, encode_primitive, format_hex, PrimitiveValue,
};
pub use segment::{default_segment, DataPayload, DataSegment};
pub use text::{from_text, is_valid_text, to_text, TextCodec};
