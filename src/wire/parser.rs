//! Cursor-based byte stream parser.
//!
//! [`crate::wire::parser::Parser`] keeps a position within a borrowed byte slice and offers
//! bounds-checked reads of the building blocks of the wire layout: little-endian numbers,
//! ECMA-335 compressed unsigned integers, raw byte runs and length-prefixed UTF-8 strings.
//!
//! # Examples
//!
//! ```rust
//! use qrue::Parser;
//!
//! let data = [0x05, b'h', b'e', b'l', b'l', b'o', 0x80, 0x80];
//! let mut parser = Parser::new(&data);
//!
//! assert_eq!(parser.read_compressed_string_utf8()?, "hello");
//! assert_eq!(parser.read_compressed_uint()?, 0x80);
//! assert!(!parser.has_more_data());
//! # Ok::<(), qrue::Error>(())
//! ```

use crate::{
    wire::io::{read_le_at, WireIO},
    Result,
};

/// Bounds-checked cursor over an encoded type or payload.
///
/// Every read either consumes exactly the bytes it decodes or fails without moving past the
/// end of the buffer, so damaged data surfaces as an error instead of a panic.
#[derive(Debug)]
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a cursor at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns `true` while unread bytes are left.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.remaining() > 0
    }

    /// Offset of the next unread byte.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Reads a little-endian value.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_le<T: WireIO>(&mut self) -> Result<T> {
        read_le_at(self.data, &mut self.position)
    }

    /// Reads `length` raw bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if not enough data is left.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let end = self
            .position
            .checked_add(length)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| out_of_bounds_error!())?;
        let bytes = &self.data[self.position..end];
        self.position = end;
        Ok(bytes)
    }

    /// Reads an ECMA-335 compressed unsigned integer (II.23.2).
    ///
    /// The top bits of the first byte select the width: `0` one byte, `10` two bytes and
    /// `110` four bytes, big-endian.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] for a truncated integer or
    /// [`crate::Error::Malformed`] for a first byte starting with `111`.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let lead = self.read_le::<u8>()?;
        let (width, high) = match lead {
            0x00..=0x7F => return Ok(u32::from(lead)),
            0x80..=0xBF => (1, lead & 0x3F),
            0xC0..=0xDF => (3, lead & 0x1F),
            _ => return Err(malformed_error!("Invalid compressed uint lead byte - {:#04x}", lead)),
        };

        let tail = self.read_bytes(width)?;
        Ok(tail
            .iter()
            .fold(u32::from(high), |value, byte| (value << 8) | u32::from(*byte)))
    }

    /// Reads a compressed count and checks that the unread data could hold that many items of
    /// at least `min_item_size` bytes each.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the count cannot be satisfied.
    pub fn read_count(&mut self, min_item_size: usize) -> Result<usize> {
        let count = self.read_compressed_uint()? as usize;
        if count.saturating_mul(min_item_size) > self.remaining() {
            return Err(malformed_error!(
                "Count {} exceeds remaining data {} at offset {}",
                count,
                self.remaining(),
                self.position
            ));
        }
        Ok(count)
    }

    /// Reads a UTF-8 string behind a compressed byte length.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the string runs past the data or
    /// [`crate::Error::Malformed`] for invalid UTF-8.
    pub fn read_compressed_string_utf8(&mut self) -> Result<String> {
        let offset = self.position;
        let length = self.read_compressed_uint()? as usize;
        let bytes = self.read_bytes(length)?;

        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|error| malformed_error!("Invalid UTF-8 string at offset {}: {}", offset, error))
    }
}
