//! Endian-aware reading and writing of fixed-width values.
//!
//! Every multi-byte number that crosses the wire boundary is little-endian. This module provides
//! the [`crate::wire::io::WireIO`] trait that maps each numeric primitive to its byte array, and
//! bounds-checked helpers on top of it:
//!
//! - [`crate::wire::io::read_le`] / [`crate::wire::io::read_le_at`] - decode from a byte slice
//! - [`crate::wire::io::append_le`] - encode onto the end of a growing buffer
//! - [`crate::wire::io::write_compressed_uint`] - ECMA-335 compressed unsigned integers
//!
//! # Examples
//!
//! ```rust
//! use qrue::wire::io::{append_le, read_le};
//!
//! let mut buffer = Vec::new();
//! append_le(&mut buffer, 1234_i32);
//! assert_eq!(buffer, [0xD2, 0x04, 0x00, 0x00]);
//! assert_eq!(read_le::<i32>(&buffer)?, 1234);
//! # Ok::<(), qrue::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All functions in this module are pure and can be called concurrently from multiple threads.

use crate::Result;

/// Trait for implementing type-specific binary conversion of numeric primitives.
///
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `i32`).
pub trait WireIO: Sized + Copy {
    /// Byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_wire_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl WireIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_wire_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
}

/// Safely reads a value of type `T` in little-endian byte order from the start of a buffer.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: WireIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at `offset`, advancing it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: WireIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

/// Appends a value of type `T` in little-endian byte order to a growing buffer.
pub fn append_le<T: WireIO>(buffer: &mut Vec<u8>, value: T) {
    buffer.extend_from_slice(value.to_le_bytes().as_ref());
}

/// Encodes an unsigned integer with the ECMA-335 II.23.2 compressed layout.
///
/// Values up to `0x7F` take one byte, up to `0x3FFF` two bytes and up to `0x1FFF_FFFF` four
/// bytes (big-endian within the encoding, as the standard prescribes).
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the value exceeds `0x1FFF_FFFF`.
pub fn write_compressed_uint(value: u32, buffer: &mut Vec<u8>) -> Result<()> {
    if value <= 0x7F {
        buffer.push(value as u8);
    } else if value <= 0x3FFF {
        buffer.push(0x80 | (value >> 8) as u8);
        buffer.push((value & 0xFF) as u8);
    } else if value <= 0x1FFF_FFFF {
        buffer.push(0xC0 | (value >> 24) as u8);
        buffer.push(((value >> 16) & 0xFF) as u8);
        buffer.push(((value >> 8) & 0xFF) as u8);
        buffer.push((value & 0xFF) as u8);
    } else {
        return Err(malformed_error!(
            "Value too large for compressed uint - {}",
            value
        ));
    }
    Ok(())
}

/// Encodes a collection length as a compressed unsigned integer.
///
/// # Errors
/// Returns [`crate::Error::Malformed`] if the length does not fit the compressed layout.
pub fn write_compressed_len(len: usize, buffer: &mut Vec<u8>) -> Result<()> {
    let value =
        u32::try_from(len).map_err(|_| malformed_error!("Length too large - {}", len))?;
    write_compressed_uint(value, buffer)
}
