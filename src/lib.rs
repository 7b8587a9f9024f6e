// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # qrue
//!
//! The type and value core of a remote object inspector for managed runtimes.
//!
//! An inspector UI talks to an instrumented process over a socket and lets a user browse, read,
//! write and invoke members of the objects living in it. Everything the user sees or edits
//! crosses that boundary twice: as typed binary data on the wire, and as text in an editor.
//! `qrue` is the pure, synchronous part in between. It owns the description of foreign types,
//! the values of those types, and every conversion between wire bytes, structured values and
//! text.
//!
//! ## Features
//!
//! - **Type model** - primitives, enums, classes, structs with field layouts, arrays and
//!   generic parameters, each with a by-ref qualifier and a computed wire size
//! - **Value model** - primitive payloads, instance handles, struct fields and array elements
//! - **Binary codecs** - fixed-width little-endian primitives, UTF-16 strings, embedded types,
//!   and whole type/value payloads
//! - **Text codec** - rendering, parsing and validation of editor text, including the JSON-like
//!   struct/array forms and the type descriptor grammar
//! - **Equality** - structural comparison of types and values, and class convertibility
//! - **Generics** - collection, binding and instantiation of generic parameters
//!
//! ## Architecture
//!
//! - [`wire`] - byte-level reading and writing shared by the binary codecs
//! - [`types`] - the type model and everything that works on types alone
//! - [`values`] - the value model and its codecs
//! - [`config`] - codec options
//! - [`Error`] and [`Result`] - error handling
//!
//! Every operation is a pure function over immutable inputs. Nothing here performs I/O or
//! holds shared state, so all of it may be called from any thread at any time.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrue::prelude::*;
//!
//! // A type arrives from the metadata collaborator...
//! let positions = parse_type_descriptor("UnityEngine::Vector3[]")?;
//! assert_eq!(positions.size(), 8);
//!
//! // ...an editor validates what the user types...
//! let handle = TypeInfo::class("UnityEngine", "GameObject", vec![]);
//! assert!(is_valid_text("0x7f001000", &handle));
//! assert!(!is_valid_text("0x7f00100g", &handle));
//!
//! // ...and the committed value goes on the wire.
//! let value = from_text("0x7f001000", &handle)?;
//! let bytes = encode_payload(&DataPayload::new(handle.clone(), value))?;
//! let decoded = decode_payload(&bytes)?;
//! assert_eq!(to_text(&decoded.type_info, decoded.data.as_ref()), "0x7f001000");
//! # Ok::<(), qrue::Error>(())
//! ```
//!
//! ## Logging
//!
//! Diagnostics are emitted through [`tracing`]: decode and parse failures at `debug`, generic
//! substitutions and editor commits at `trace`. The library never installs a subscriber.

#[macro_use]
pub(crate) mod error;

#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and functions.
///
/// ```rust
/// use qrue::prelude::*;
///
/// let int = TypeInfo::primitive(PrimitiveKind::Int);
/// assert!(types_equal(Some(&int), Some(&int.clone().with_byref(ByRef::Ref))));
/// ```
pub mod prelude;

/// Codec options.
pub mod config;

/// The type model of the remote runtime.
pub mod types;

/// The value model and its codecs.
pub mod values;

/// Byte-level reading and writing.
pub mod wire;

/// `qrue` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
/// Used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `qrue` Error type
///
/// The main error type for all operations in this crate. See [`Error`] for the individual
/// variants.
pub use error::Error;

/// Codec configuration, see [`config::CodecConfig`].
pub use config::{CodecConfig, IntegerFormat};

/// Cursor over wire bytes, see [`wire::parser::Parser`].
pub use wire::parser::Parser;
