//! Packed Simotion address decoding
//!
//! The Simotion toolchain exchanges field addresses as ten bytes of
//! hyphen-joined hex instead of a symbolic string. The bit-level layout
//! is fixed, starting at bit 0 of the concatenated buffer:
//!
//! | Bits | Content                                   |
//! |------|-------------------------------------------|
//! | 8    | reserved marker, must be `0x10`           |
//! | 8    | transport size wire code                  |
//! | 16   | number of elements (already corrected)    |
//! | 16   | data block number                         |
//! | 8    | memory area wire code                     |
//! | 5    | reserved, must be zero                    |
//! | 16   | byte address                              |
//! | 3    | bit address                               |
//!
//! The decoded field passes the same validation as the textual path and
//! compares equal to the field parsed from the equivalent symbolic
//! data-block address.

use log::trace;

use crate::error::{FieldError, FieldResult};
use crate::field::S7Field;
use crate::types::{MemoryArea, TransportSize};

/// Marker value of the leading reserved byte
const PACKED_ADDRESS_MARKER: u32 = 0x10;

/// Bit-level cursor over a fixed byte buffer
///
/// Reads up to 32 bits at a time as a big-endian unsigned integer and
/// advances. Reading past the end returns `None`, which the decoder
/// reports as a truncated buffer, distinct from semantic validation
/// failures.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    /// Number of unread bits left in the buffer
    pub(crate) fn remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_pos
    }

    /// Read `count` bits (at most 32) as an unsigned integer
    pub(crate) fn read_bits(&mut self, count: usize) -> Option<u32> {
        debug_assert!(count <= 32);
        if count > self.remaining() {
            return None;
        }
        let mut value = 0u32;
        for _ in 0..count {
            let byte = self.data[self.bit_pos / 8];
            let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
            value = (value << 1) | u32::from(bit);
            self.bit_pos += 1;
        }
        Some(value)
    }
}

/// Decode the hyphen-joined hex groups into the raw address bytes
fn decode_hex_groups(address: &str) -> FieldResult<[u8; crate::PACKED_ADDRESS_BYTES]> {
    let mut bytes = [0u8; crate::PACKED_ADDRESS_BYTES];
    let mut count = 0usize;
    for group in address.split('-') {
        if count == bytes.len() {
            return Err(FieldError::invalid_address(
                address,
                format!("packed address longer than {} bytes", bytes.len()),
            ));
        }
        if group.len() != 2 {
            return Err(FieldError::invalid_address(
                address,
                format!("malformed hex byte group '{}'", group),
            ));
        }
        bytes[count] = u8::from_str_radix(group, 16).map_err(|_| {
            FieldError::invalid_address(address, format!("malformed hex byte group '{}'", group))
        })?;
        count += 1;
    }
    if count != bytes.len() {
        return Err(FieldError::invalid_address(
            address,
            format!("packed address must be exactly {} bytes, got {}", bytes.len(), count),
        ));
    }
    Ok(bytes)
}

/// Decode a structurally matched packed address into a field
///
/// The element count is stored as an already wire-ready value by the
/// Simotion source and is taken as-is, without the STRING correction of
/// the symbolic path.
pub(crate) fn decode(address: &str) -> FieldResult<S7Field> {
    let bytes = decode_hex_groups(address)?;
    let mut reader = BitReader::new(&bytes);
    let truncated = || FieldError::invalid_address(address, "packed address buffer too short");

    let marker = reader.read_bits(8).ok_or_else(truncated)?;
    if marker != PACKED_ADDRESS_MARKER {
        return Err(FieldError::invalid_address(
            address,
            format!("unsupported field type marker 0x{:02X}", marker),
        ));
    }

    let type_code = reader.read_bits(8).ok_or_else(truncated)?;
    let data_type = TransportSize::from_wire_code(type_code as u8).ok_or_else(|| {
        FieldError::invalid_address(
            address,
            format!("unknown transport size wire code 0x{:02X}", type_code),
        )
    })?;

    let num_elements = reader.read_bits(16).ok_or_else(truncated)? as u16;
    let block_number = reader.read_bits(16).ok_or_else(truncated)? as u16;

    let area_code = reader.read_bits(8).ok_or_else(truncated)?;
    let memory_area = MemoryArea::from_wire_code(area_code as u8).ok_or_else(|| {
        FieldError::invalid_address(
            address,
            format!("unknown memory area wire code 0x{:02X}", area_code),
        )
    })?;

    let reserved = reader.read_bits(5).ok_or_else(truncated)?;
    if reserved != 0 {
        return Err(FieldError::invalid_address(
            address,
            format!("non-zero reserved bits 0b{:05b}", reserved),
        ));
    }

    let byte_offset = reader.read_bits(16).ok_or_else(truncated)?;
    let bit_offset = reader.read_bits(3).ok_or_else(truncated)? as u8;

    trace!(
        "packed address '{}' decoded to {} block {} byte {} bit {}",
        address,
        data_type.name(),
        block_number,
        byte_offset,
        bit_offset
    );

    S7Field::from_parts(
        address,
        data_type,
        memory_area,
        block_number,
        byte_offset,
        bit_offset,
        num_elements,
    )
}
