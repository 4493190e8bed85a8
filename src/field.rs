//! S7 field addressing
//!
//! This module contains the [`S7Field`] value type and the grammar
//! dispatcher that turns a raw address token into a validated field.
//!
//! Dispatch tries the grammars in a fixed precedence order: full
//! data-block form, generic symbolic form, short data-block form,
//! packed Simotion form. The first *structural* match wins; a semantic
//! failure after a structural match rejects the address immediately and
//! never falls through to a later grammar.

use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{FieldError, FieldResult};
use crate::grammar::{self, SymbolicCaptures};
use crate::simotion;
use crate::types::{MemoryArea, TransportSize, ValueCategory};

/// A fully validated reference to a remote controller memory location
///
/// An `S7Field` is constructed once, atomically, by a successful parse
/// or packed-address decode, and is never mutated afterwards. Two
/// fields compare equal iff all their attributes compare equal,
/// independent of which grammar produced them: the textual and packed
/// encodings of the same physical cell yield equal fields.
///
/// ```rust
/// use s7_field::S7Field;
///
/// let field = S7Field::parse("%DB1.DBX38.1:BOOL").unwrap();
/// assert_eq!(field.block_number(), 1);
/// assert_eq!(field.byte_offset(), 38);
/// assert_eq!(field.bit_offset(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct S7Field {
    data_type: TransportSize,
    memory_area: MemoryArea,
    block_number: u16,
    byte_offset: u32,
    bit_offset: u8,
    num_elements: u16,
}

impl S7Field {
    /// Check whether any grammar structurally matches the token
    ///
    /// This is a fast feasibility check only: a matching token can
    /// still fail semantic validation in [`S7Field::parse`] (for
    /// example `%IW64:REAL`, whose size code contradicts the type).
    pub fn matches(address: &str) -> bool {
        grammar::match_data_block(address).is_some()
            || grammar::match_generic(address).is_some()
            || grammar::match_data_block_short(address).is_some()
            || grammar::is_simotion(address)
    }

    /// Parse and validate an address token
    ///
    /// Tries the grammars in precedence order and runs full semantic
    /// validation on the first structural match. Rejections carry the
    /// original token in the error.
    pub fn parse(address: &str) -> FieldResult<Self> {
        if let Some(caps) = grammar::match_data_block(address) {
            trace!("address '{}' matched the full data-block grammar", address);
            return Self::from_symbolic(address, caps);
        }
        if let Some(caps) = grammar::match_generic(address) {
            trace!("address '{}' matched the generic grammar", address);
            return Self::from_symbolic(address, caps);
        }
        if let Some(caps) = grammar::match_data_block_short(address) {
            trace!("address '{}' matched the short data-block grammar", address);
            return Self::from_symbolic(address, caps);
        }
        if grammar::is_simotion(address) {
            trace!("address '{}' matched the packed grammar", address);
            return simotion::decode(address);
        }
        Err(FieldError::invalid_address(
            address,
            "does not match any supported address grammar",
        ))
    }

    /// Decode a packed 10-byte Simotion address
    ///
    /// Accepts only the hyphen-joined hex shape and produces a field
    /// that compares equal to the one parsed from the equivalent
    /// textual data-block address.
    pub fn decode_packed(address: &str) -> FieldResult<Self> {
        if !grammar::is_simotion(address) {
            return Err(FieldError::invalid_address(
                address,
                "not a packed address: expected ten hyphen-joined hex byte groups",
            ));
        }
        simotion::decode(address)
    }

    /// Get the wire data type of the addressed value
    pub fn data_type(&self) -> TransportSize {
        self.data_type
    }

    /// Get the memory area the field points into
    pub fn memory_area(&self) -> MemoryArea {
        self.memory_area
    }

    /// Get the data block number (0 outside of data-block areas)
    pub fn block_number(&self) -> u16 {
        self.block_number
    }

    /// Get the byte offset within the memory area
    pub fn byte_offset(&self) -> u32 {
        self.byte_offset
    }

    /// Get the bit offset within the addressed byte
    pub fn bit_offset(&self) -> u8 {
        self.bit_offset
    }

    /// Get the number of consecutive elements to transfer
    ///
    /// For `STRING` fields this holds the corrected storage footprint
    /// (declared capacity plus the two header bytes), not an element
    /// count.
    pub fn num_elements(&self) -> u16 {
        self.num_elements
    }

    /// Get the logical value category the deserializer should produce
    pub fn value_category(&self) -> FieldResult<ValueCategory> {
        self.data_type.value_category()
    }

    /// Construct a field, enforcing the cross-grammar invariants
    ///
    /// Both the symbolic and the packed path funnel through here, so
    /// the bounds rules hold for every field that can ever be observed.
    pub(crate) fn from_parts(
        address: &str,
        data_type: TransportSize,
        memory_area: MemoryArea,
        block_number: u16,
        byte_offset: u32,
        bit_offset: u8,
        num_elements: u16,
    ) -> FieldResult<Self> {
        if byte_offset > crate::MAX_BYTE_OFFSET {
            return Err(FieldError::invalid_address(
                address,
                format!(
                    "byte offset {} out of range (0..={})",
                    byte_offset,
                    crate::MAX_BYTE_OFFSET
                ),
            ));
        }
        if memory_area == MemoryArea::DataBlocks
            && !(crate::MIN_DATA_BLOCK_NUMBER..=crate::MAX_DATA_BLOCK_NUMBER)
                .contains(&block_number)
        {
            return Err(FieldError::invalid_address(
                address,
                format!(
                    "data block number {} out of range ({}..={})",
                    block_number,
                    crate::MIN_DATA_BLOCK_NUMBER,
                    crate::MAX_DATA_BLOCK_NUMBER
                ),
            ));
        }
        if bit_offset > 7 {
            return Err(FieldError::invalid_address(
                address,
                format!("bit offset {} out of range (0..=7)", bit_offset),
            ));
        }
        if num_elements == 0 {
            return Err(FieldError::invalid_address(
                address,
                "number of elements must be at least 1",
            ));
        }
        Ok(Self {
            data_type,
            memory_area,
            block_number,
            byte_offset,
            bit_offset,
            num_elements,
        })
    }

    /// Validate the captures of a symbolic grammar and build the field
    fn from_symbolic(address: &str, caps: SymbolicCaptures<'_>) -> FieldResult<Self> {
        let data_type = TransportSize::from_type_name(caps.data_type).ok_or_else(|| {
            FieldError::invalid_address(
                address,
                format!("unknown data type '{}'", caps.data_type),
            )
        })?;

        let memory_area = match caps.memory_area_code {
            Some(code) => MemoryArea::from_short_code(code).ok_or_else(|| {
                FieldError::invalid_address(address, format!("unknown memory area code '{}'", code))
            })?,
            None => MemoryArea::DataBlocks,
        };

        let block_number = match caps.block_number {
            Some(digits) => parse_number(address, digits, "data block number")?,
            None => 0,
        };

        let byte_offset = parse_number(address, caps.byte_offset, "byte offset")?;

        let bit_offset = match caps.bit_offset {
            Some(digit) => parse_number(address, digit, "bit offset")?,
            None if data_type == TransportSize::Bool => {
                return Err(FieldError::invalid_address(
                    address,
                    "expected bit offset for BOOL parameters",
                ));
            }
            None => 0,
        };

        let raw_elements: u64 = match caps.num_elements {
            Some(digits) => parse_number(address, digits, "number of elements")?,
            None => 1,
        };
        let num_elements = correct_num_elements(address, raw_elements, data_type)?;

        if let Some(size_code) = caps.size_code {
            let canonical = data_type.canonical_size_code()?;
            if size_code != canonical {
                return Err(FieldError::invalid_address(
                    address,
                    format!(
                        "transfer size code '{}' does not match data type {} (expected '{}')",
                        size_code,
                        data_type.name(),
                        canonical
                    ),
                ));
            }
        }

        Self::from_parts(
            address,
            data_type,
            memory_area,
            block_number,
            byte_offset,
            bit_offset,
            num_elements,
        )
    }
}

/// Parse a digit capture into an integer, naming the field on overflow
fn parse_number<T: FromStr>(address: &str, digits: &str, what: &str) -> FieldResult<T> {
    digits.parse::<T>().map_err(|_| {
        FieldError::invalid_address(address, format!("{} '{}' out of range", what, digits))
    })
}

/// Reconcile the element count with the storage footprint of the type
///
/// `STRING` elements carry a two-byte header in front of the declared
/// character capacity, and a bare `STRING` (count 1, no brackets) means
/// "maximum capacity". The correction runs on the raw count before any
/// narrowing, so an oversized `STRING` capacity falls back to the
/// maximum instead of being rejected. All other types transfer exactly
/// as counted and must fit the 16-bit element count.
fn correct_num_elements(
    address: &str,
    raw: u64,
    data_type: TransportSize,
) -> FieldResult<u16> {
    if data_type == TransportSize::String {
        if (2..=u64::from(crate::MAX_STRING_LENGTH)).contains(&raw) {
            Ok(raw as u16 + 2)
        } else {
            Ok(crate::DEFAULT_STRING_CAPACITY)
        }
    } else {
        u16::try_from(raw).map_err(|_| {
            FieldError::invalid_address(
                address,
                format!("number of elements {} out of range", raw),
            )
        })
    }
}

impl FromStr for S7Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for S7Field {
    /// Render the canonical textual form of the field
    ///
    /// The `[n]` slot of the grammar holds the declared value, not the
    /// stored footprint, so `STRING` fields render their declared
    /// capacity (footprint minus the two header bytes) and the
    /// maximum-capacity default renders without a bracket. A rendered
    /// field therefore reparses to an equal field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.memory_area {
            MemoryArea::DataBlocks => write!(
                f,
                "%DB{}:{}.{}:{}",
                self.block_number,
                self.byte_offset,
                self.bit_offset,
                self.data_type.name()
            )?,
            area => write!(
                f,
                "%{}{}.{}:{}",
                area.short_code(),
                self.byte_offset,
                self.bit_offset,
                self.data_type.name()
            )?,
        }
        if self.data_type == TransportSize::String {
            if self.num_elements != crate::DEFAULT_STRING_CAPACITY {
                write!(f, "[{}]", self.num_elements.saturating_sub(2))?;
            }
        } else if self.num_elements != 1 {
            write!(f, "[{}]", self.num_elements)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_precedence_equivalence() {
        let full = S7Field::parse("%DB1.DBX38.1:BOOL").unwrap();
        let short = S7Field::parse("%DB1:38.1:BOOL").unwrap();
        assert_eq!(full, short);
        assert_eq!(full.data_type(), TransportSize::Bool);
        assert_eq!(full.memory_area(), MemoryArea::DataBlocks);
        assert_eq!(full.block_number(), 1);
        assert_eq!(full.byte_offset(), 38);
        assert_eq!(full.bit_offset(), 1);
        assert_eq!(full.num_elements(), 1);
    }

    #[test]
    fn test_generic_addresses() {
        let field = S7Field::parse("%I0.1:BOOL").unwrap();
        assert_eq!(field.memory_area(), MemoryArea::Inputs);
        assert_eq!(field.block_number(), 0);
        assert_eq!(field.byte_offset(), 0);
        assert_eq!(field.bit_offset(), 1);

        let field = S7Field::parse("%ID64:REAL").unwrap();
        assert_eq!(field.data_type(), TransportSize::Real);
        assert_eq!(field.byte_offset(), 64);
        assert_eq!(field.bit_offset(), 0);

        let field = S7Field::parse("%Q0.4:BOOL").unwrap();
        assert_eq!(field.memory_area(), MemoryArea::Outputs);
        assert_eq!(field.bit_offset(), 4);

        let field = S7Field::parse("%M9.0:BOOL").unwrap();
        assert_eq!(field.memory_area(), MemoryArea::FlagsMarkers);
        assert_eq!(field.byte_offset(), 9);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let err = S7Field::parse("%Z0.1:BOOL").unwrap_err();
        assert!(err.is_address_error());
        assert!(format!("{}", err).contains("memory area"));

        let err = S7Field::parse("%I0:FLOAT").unwrap_err();
        assert!(err.is_address_error());
        assert!(format!("{}", err).contains("data type"));
    }

    #[test]
    fn test_bool_requires_bit_offset() {
        let err = S7Field::parse("%I0:BOOL").unwrap_err();
        assert!(err.is_address_error());
        assert!(format!("{}", err).contains("bit offset"));

        assert!(S7Field::parse("%DB1.DBX38:BOOL").is_err());
        assert!(S7Field::parse("%DB1:38:BOOL").is_err());
        // Non-BOOL types do not need one
        assert!(S7Field::parse("%IB1:BYTE").is_ok());
    }

    #[test]
    fn test_byte_offset_bounds() {
        assert!(S7Field::parse("%M2097151:BYTE").is_ok());
        let err = S7Field::parse("%M2097152:BYTE").unwrap_err();
        assert!(err.is_address_error());
        assert!(format!("{}", err).contains("byte offset"));
    }

    #[test]
    fn test_block_number_bounds() {
        assert!(S7Field::parse("%DB1:0.0:BOOL").is_ok());
        assert!(S7Field::parse("%DB64000:0.0:BOOL").is_ok());
        assert!(S7Field::parse("%DB0:0.0:BOOL").is_err());
        assert!(S7Field::parse("%DB64001:0.0:BOOL").is_err());
        assert!(S7Field::parse("%DB0.DBX0.0:BOOL").is_err());
    }

    #[test]
    fn test_size_code_cross_check() {
        let err = S7Field::parse("%IW64:REAL").unwrap_err();
        assert!(err.is_address_error());
        assert!(format!("{}", err).contains("transfer size code"));

        assert!(S7Field::parse("%ID64:REAL").is_ok());
        assert!(S7Field::parse("%DB56.DBB100:SINT[25]").is_ok());
        assert!(S7Field::parse("%DB56.DBW100:SINT").is_err());
    }

    #[test]
    fn test_size_code_for_uncoded_type_is_capability_gap() {
        let err = S7Field::parse("%MB10:STRING").unwrap_err();
        assert!(err.is_capability_gap());
    }

    #[test]
    fn test_num_elements() {
        let field = S7Field::parse("%DB56.DBB100:SINT[25]").unwrap();
        assert_eq!(field.num_elements(), 25);

        let field = S7Field::parse("%IB1:BYTE").unwrap();
        assert_eq!(field.num_elements(), 1);

        assert!(S7Field::parse("%IB1:BYTE[0]").is_err());
    }

    #[test]
    fn test_string_element_correction() {
        // Bare STRING defaults to maximum capacity
        let field = S7Field::parse("%DB10:4:STRING").unwrap();
        assert_eq!(field.num_elements(), 256);

        // Declared capacity gains the two header bytes
        let field = S7Field::parse("%DB10:4:STRING[25]").unwrap();
        assert_eq!(field.num_elements(), 27);
        let field = S7Field::parse("%DB10:4:STRING[2]").unwrap();
        assert_eq!(field.num_elements(), 4);
        let field = S7Field::parse("%DB10:4:STRING[254]").unwrap();
        assert_eq!(field.num_elements(), 256);

        // Out-of-range capacities fall back to the maximum
        let field = S7Field::parse("%DB10:4:STRING[300]").unwrap();
        assert_eq!(field.num_elements(), 256);
        let field = S7Field::parse("%DB10:4:STRING[1]").unwrap();
        assert_eq!(field.num_elements(), 256);

        // Even capacities beyond the 16-bit element count: the
        // correction runs before narrowing
        let field = S7Field::parse("%DB10:4:STRING[70000]").unwrap();
        assert_eq!(field.num_elements(), 256);

        // Non-STRING counts have no fallback and must fit
        assert!(S7Field::parse("%IB1:BYTE[70000]").is_err());
    }

    #[test]
    fn test_no_grammar_match() {
        for address in ["%DB1:100", "DB1:38.1:BOOL", "", "hello", "%%I0.1:BOOL"] {
            let err = S7Field::parse(address).unwrap_err();
            assert!(err.is_address_error(), "expected rejection for '{}'", address);
            assert!(format!("{}", err).contains(address));
        }
    }

    #[test]
    fn test_matches_is_structural_only() {
        assert!(S7Field::matches("%DB1.DBX38.1:BOOL"));
        assert!(S7Field::matches("%DB1:38.1:BOOL"));
        assert!(S7Field::matches("10-08-00-01-00-2D-84-00-00-80"));
        // Structurally valid but semantically rejected
        assert!(S7Field::matches("%IW64:REAL"));
        assert!(S7Field::matches("%I0:BOOL"));
        assert!(S7Field::matches("A0-01-00-01-00-2D-84-00-00-08"));
        // No structural match at all
        assert!(!S7Field::matches("%DB1:100"));
        assert!(!S7Field::matches("not an address"));
    }

    #[test]
    fn test_from_str() {
        let field: S7Field = "%DB45:16.0:REAL".parse().unwrap();
        assert_eq!(field.block_number(), 45);
        assert!("%DB1:100".parse::<S7Field>().is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for address in [
            "%DB45:16.0:REAL",
            "%I0.1:BOOL",
            "%DB56:100.0:SINT[25]",
            "%DB10:4:STRING[25]",
            "%DB10:4:STRING",
        ] {
            let field = S7Field::parse(address).unwrap();
            let rendered = format!("{}", field);
            assert_eq!(S7Field::parse(&rendered).unwrap(), field, "{}", address);
        }
    }

    #[test]
    fn test_display_renders_declared_string_capacity() {
        // The stored footprint is 27, the grammar slot holds the
        // declared capacity
        let field = S7Field::parse("%DB10:4:STRING[25]").unwrap();
        assert_eq!(field.num_elements(), 27);
        assert_eq!(format!("{}", field), "%DB10:4.0:STRING[25]");

        // The maximum-capacity default renders without a bracket
        let field = S7Field::parse("%DB10:4:STRING").unwrap();
        assert_eq!(format!("{}", field), "%DB10:4.0:STRING");
    }

    #[test]
    fn test_value_category_of_field() {
        let field = S7Field::parse("%DB1.DBX38.1:BOOL").unwrap();
        assert_eq!(field.value_category().unwrap(), ValueCategory::Bool);

        let field = S7Field::parse("%MW10:WORD").unwrap();
        assert!(field.value_category().unwrap_err().is_capability_gap());
    }
}
