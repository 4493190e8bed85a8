//! S7 memory area and transport size tables
//!
//! This module contains the controller-specific type system the address
//! parser validates against: the memory area table, the transport size
//! table, and the mapping from transport sizes to the logical value
//! categories the value deserializer materializes.
//!
//! All lookups are pure functions over static tables. The tables are
//! shared, read-only state and safe to use from any number of threads.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FieldError, FieldResult};

/// S7 controller memory areas
///
/// Each area carries a short textual code used by the symbolic address
/// grammars (for example `I` in `%I0.1:BOOL`) and a numeric wire code
/// used by read/write request items and by the packed address form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryArea {
    /// Counter memory (C)
    Counters,
    /// Timer memory (T)
    Timers,
    /// Direct peripheral access (D)
    DirectPeripheralAccess,
    /// Process image of inputs (I)
    Inputs,
    /// Process image of outputs (Q)
    Outputs,
    /// Flag/marker memory (M)
    FlagsMarkers,
    /// User data blocks (DB)
    DataBlocks,
    /// Instance data blocks (DBI)
    InstanceDataBlocks,
    /// Local data (LD)
    LocalData,
}

impl MemoryArea {
    /// Get the canonical short code of this memory area
    ///
    /// The generic symbolic grammar only ever captures a single
    /// character, so the multi-letter codes (`DB`, `DBI`, `LD`) are not
    /// reachable through it; data blocks have their own grammars.
    pub fn short_code(self) -> &'static str {
        match self {
            MemoryArea::Counters => "C",
            MemoryArea::Timers => "T",
            MemoryArea::DirectPeripheralAccess => "D",
            MemoryArea::Inputs => "I",
            MemoryArea::Outputs => "Q",
            MemoryArea::FlagsMarkers => "M",
            MemoryArea::DataBlocks => "DB",
            MemoryArea::InstanceDataBlocks => "DBI",
            MemoryArea::LocalData => "LD",
        }
    }

    /// Look up a memory area by its short code
    pub fn from_short_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(MemoryArea::Counters),
            "T" => Some(MemoryArea::Timers),
            "D" => Some(MemoryArea::DirectPeripheralAccess),
            "I" => Some(MemoryArea::Inputs),
            "Q" => Some(MemoryArea::Outputs),
            "M" => Some(MemoryArea::FlagsMarkers),
            "DB" => Some(MemoryArea::DataBlocks),
            "DBI" => Some(MemoryArea::InstanceDataBlocks),
            "LD" => Some(MemoryArea::LocalData),
            _ => None,
        }
    }

    /// Get the numeric wire code of this memory area
    pub fn wire_code(self) -> u8 {
        match self {
            MemoryArea::Counters => 0x1C,
            MemoryArea::Timers => 0x1D,
            MemoryArea::DirectPeripheralAccess => 0x80,
            MemoryArea::Inputs => 0x81,
            MemoryArea::Outputs => 0x82,
            MemoryArea::FlagsMarkers => 0x83,
            MemoryArea::DataBlocks => 0x84,
            MemoryArea::InstanceDataBlocks => 0x85,
            MemoryArea::LocalData => 0x86,
        }
    }

    /// Look up a memory area by its numeric wire code
    pub fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            0x1C => Some(MemoryArea::Counters),
            0x1D => Some(MemoryArea::Timers),
            0x80 => Some(MemoryArea::DirectPeripheralAccess),
            0x81 => Some(MemoryArea::Inputs),
            0x82 => Some(MemoryArea::Outputs),
            0x83 => Some(MemoryArea::FlagsMarkers),
            0x84 => Some(MemoryArea::DataBlocks),
            0x85 => Some(MemoryArea::InstanceDataBlocks),
            0x86 => Some(MemoryArea::LocalData),
            _ => None,
        }
    }

    /// Get the full table name of this memory area
    pub fn name(self) -> &'static str {
        match self {
            MemoryArea::Counters => "COUNTERS",
            MemoryArea::Timers => "TIMERS",
            MemoryArea::DirectPeripheralAccess => "DIRECT_PERIPHERAL_ACCESS",
            MemoryArea::Inputs => "INPUTS",
            MemoryArea::Outputs => "OUTPUTS",
            MemoryArea::FlagsMarkers => "FLAGS_MARKERS",
            MemoryArea::DataBlocks => "DATA_BLOCKS",
            MemoryArea::InstanceDataBlocks => "INSTANCE_DATA_BLOCKS",
            MemoryArea::LocalData => "LOCAL_DATA",
        }
    }
}

impl fmt::Display for MemoryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.short_code())
    }
}

/// S7 wire-level data types (transport sizes)
///
/// Each transport size carries the canonical transfer size code used by
/// the symbolic grammars (`X`, `B`, `W`, `D`, or none), a numeric wire
/// code used by the packed address form, and, where one is defined, a
/// fixed per-element width in bytes and a [`ValueCategory`] mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportSize {
    Bool,
    Byte,
    Char,
    Word,
    Int,
    Dword,
    Udint,
    Real,
    Date,
    TimeOfDay,
    Time,
    DateAndTime,
    Sint,
    Usint,
    Uint,
    Dint,
    Lint,
    Ulint,
    Lword,
    Lreal,
    Wchar,
    String,
    Wstring,
}

impl TransportSize {
    /// Get the address-grammar type name of this transport size
    pub fn name(self) -> &'static str {
        match self {
            TransportSize::Bool => "BOOL",
            TransportSize::Byte => "BYTE",
            TransportSize::Char => "CHAR",
            TransportSize::Word => "WORD",
            TransportSize::Int => "INT",
            TransportSize::Dword => "DWORD",
            TransportSize::Udint => "UDINT",
            TransportSize::Real => "REAL",
            TransportSize::Date => "DATE",
            TransportSize::TimeOfDay => "TIME_OF_DAY",
            TransportSize::Time => "TIME",
            TransportSize::DateAndTime => "DATE_AND_TIME",
            TransportSize::Sint => "SINT",
            TransportSize::Usint => "USINT",
            TransportSize::Uint => "UINT",
            TransportSize::Dint => "DINT",
            TransportSize::Lint => "LINT",
            TransportSize::Ulint => "ULINT",
            TransportSize::Lword => "LWORD",
            TransportSize::Lreal => "LREAL",
            TransportSize::Wchar => "WCHAR",
            TransportSize::String => "STRING",
            TransportSize::Wstring => "WSTRING",
        }
    }

    /// Look up a transport size by the type name used in addresses
    ///
    /// Names are the upper-case table names, exactly as they appear
    /// after the colon in a symbolic address (`%DB1:38.1:BOOL`).
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "BOOL" => Some(TransportSize::Bool),
            "BYTE" => Some(TransportSize::Byte),
            "CHAR" => Some(TransportSize::Char),
            "WORD" => Some(TransportSize::Word),
            "INT" => Some(TransportSize::Int),
            "DWORD" => Some(TransportSize::Dword),
            "UDINT" => Some(TransportSize::Udint),
            "REAL" => Some(TransportSize::Real),
            "DATE" => Some(TransportSize::Date),
            "TIME_OF_DAY" => Some(TransportSize::TimeOfDay),
            "TIME" => Some(TransportSize::Time),
            "DATE_AND_TIME" => Some(TransportSize::DateAndTime),
            "SINT" => Some(TransportSize::Sint),
            "USINT" => Some(TransportSize::Usint),
            "UINT" => Some(TransportSize::Uint),
            "DINT" => Some(TransportSize::Dint),
            "LINT" => Some(TransportSize::Lint),
            "ULINT" => Some(TransportSize::Ulint),
            "LWORD" => Some(TransportSize::Lword),
            "LREAL" => Some(TransportSize::Lreal),
            "WCHAR" => Some(TransportSize::Wchar),
            "STRING" => Some(TransportSize::String),
            "WSTRING" => Some(TransportSize::Wstring),
            _ => None,
        }
    }

    /// Get the canonical transfer size code, if one is defined
    ///
    /// Returns `None` for types addressed without a size code (for
    /// example `STRING` or `DATE_AND_TIME`).
    pub fn size_code(self) -> Option<char> {
        match self {
            TransportSize::Bool => Some('X'),
            TransportSize::Byte
            | TransportSize::Char
            | TransportSize::Sint
            | TransportSize::Usint => Some('B'),
            TransportSize::Word
            | TransportSize::Int
            | TransportSize::Uint
            | TransportSize::Date
            | TransportSize::Wchar => Some('W'),
            TransportSize::Dword
            | TransportSize::Dint
            | TransportSize::Udint
            | TransportSize::Real
            | TransportSize::Time
            | TransportSize::TimeOfDay => Some('D'),
            TransportSize::DateAndTime
            | TransportSize::Lint
            | TransportSize::Ulint
            | TransportSize::Lword
            | TransportSize::Lreal
            | TransportSize::String
            | TransportSize::Wstring => None,
        }
    }

    /// Get the canonical transfer size code or a capability-gap error
    ///
    /// Used by the size-code cross-check: supplying an explicit size
    /// code for a type that defines none cannot be validated and is
    /// reported as missing driver functionality.
    pub fn canonical_size_code(self) -> FieldResult<char> {
        self.size_code().ok_or_else(|| {
            FieldError::unsupported(self.name(), "no transfer size code defined for this data type")
        })
    }

    /// Get the numeric wire code of this transport size
    pub fn wire_code(self) -> u8 {
        match self {
            TransportSize::Bool => 0x01,
            TransportSize::Byte => 0x02,
            TransportSize::Char => 0x03,
            TransportSize::Word => 0x04,
            TransportSize::Int => 0x05,
            TransportSize::Dword => 0x06,
            TransportSize::Udint => 0x07,
            TransportSize::Real => 0x08,
            TransportSize::Date => 0x09,
            TransportSize::TimeOfDay => 0x0A,
            TransportSize::Time => 0x0B,
            TransportSize::DateAndTime => 0x0F,
            TransportSize::Sint => 0x11,
            TransportSize::Usint => 0x12,
            TransportSize::Uint => 0x13,
            TransportSize::Dint => 0x14,
            TransportSize::Lint => 0x15,
            TransportSize::Ulint => 0x16,
            TransportSize::Lword => 0x17,
            TransportSize::Lreal => 0x18,
            TransportSize::Wchar => 0x19,
            TransportSize::String => 0x1A,
            TransportSize::Wstring => 0x1B,
        }
    }

    /// Look up a transport size by its numeric wire code
    pub fn from_wire_code(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(TransportSize::Bool),
            0x02 => Some(TransportSize::Byte),
            0x03 => Some(TransportSize::Char),
            0x04 => Some(TransportSize::Word),
            0x05 => Some(TransportSize::Int),
            0x06 => Some(TransportSize::Dword),
            0x07 => Some(TransportSize::Udint),
            0x08 => Some(TransportSize::Real),
            0x09 => Some(TransportSize::Date),
            0x0A => Some(TransportSize::TimeOfDay),
            0x0B => Some(TransportSize::Time),
            0x0F => Some(TransportSize::DateAndTime),
            0x11 => Some(TransportSize::Sint),
            0x12 => Some(TransportSize::Usint),
            0x13 => Some(TransportSize::Uint),
            0x14 => Some(TransportSize::Dint),
            0x15 => Some(TransportSize::Lint),
            0x16 => Some(TransportSize::Ulint),
            0x17 => Some(TransportSize::Lword),
            0x18 => Some(TransportSize::Lreal),
            0x19 => Some(TransportSize::Wchar),
            0x1A => Some(TransportSize::String),
            0x1B => Some(TransportSize::Wstring),
            _ => None,
        }
    }

    /// Get the fixed per-element width in bytes, if one is defined
    ///
    /// `BOOL` is bit-addressed and the string types are variable-width,
    /// so they have no fixed width.
    pub fn size_in_bytes(self) -> Option<u8> {
        match self {
            TransportSize::Bool | TransportSize::String | TransportSize::Wstring => None,
            TransportSize::Byte
            | TransportSize::Char
            | TransportSize::Sint
            | TransportSize::Usint => Some(1),
            TransportSize::Word
            | TransportSize::Int
            | TransportSize::Uint
            | TransportSize::Date
            | TransportSize::Wchar => Some(2),
            TransportSize::Dword
            | TransportSize::Dint
            | TransportSize::Udint
            | TransportSize::Real
            | TransportSize::Time
            | TransportSize::TimeOfDay => Some(4),
            TransportSize::DateAndTime
            | TransportSize::Lint
            | TransportSize::Ulint
            | TransportSize::Lword
            | TransportSize::Lreal => Some(8),
        }
    }

    /// Get the logical value category the deserializer should produce
    ///
    /// This mapping is total over the currently supported subset of the
    /// type table. Types without a mapping fail fast with a
    /// capability-gap error instead of silently defaulting, so a read
    /// of such a type is visible as missing driver functionality.
    pub fn value_category(self) -> FieldResult<ValueCategory> {
        match self {
            TransportSize::Bool => Ok(ValueCategory::Bool),
            TransportSize::Sint
            | TransportSize::Usint
            | TransportSize::Int
            | TransportSize::Uint
            | TransportSize::Dint => Ok(ValueCategory::Int32),
            TransportSize::Udint | TransportSize::Lint | TransportSize::Ulint => {
                Ok(ValueCategory::Int64)
            }
            TransportSize::Real | TransportSize::Lreal => Ok(ValueCategory::Float64),
            TransportSize::String => Ok(ValueCategory::Text),
            TransportSize::Date => Ok(ValueCategory::Date),
            TransportSize::DateAndTime => Ok(ValueCategory::DateTime),
            TransportSize::TimeOfDay => Ok(ValueCategory::TimeOfDay),
            other => Err(FieldError::unsupported(
                other.name(),
                "no value category mapping is implemented for this data type",
            )),
        }
    }
}

impl fmt::Display for TransportSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.name(), self.wire_code())
    }
}

/// Logical value categories produced by the value deserializer
///
/// A resolved field maps to exactly one category; the deserializer uses
/// it to decide which Rust value to materialize from the raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueCategory {
    /// Single bit
    Bool,
    /// 32-bit signed integer
    Int32,
    /// 64-bit signed integer
    Int64,
    /// Double-precision float
    Float64,
    /// Character string
    Text,
    /// Calendar date
    Date,
    /// Date with time of day
    DateTime,
    /// Time of day
    TimeOfDay,
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueCategory::Bool => "Bool",
            ValueCategory::Int32 => "Int32",
            ValueCategory::Int64 => "Int64",
            ValueCategory::Float64 => "Float64",
            ValueCategory::Text => "Text",
            ValueCategory::Date => "Date",
            ValueCategory::DateTime => "DateTime",
            ValueCategory::TimeOfDay => "TimeOfDay",
        };
        write!(f, "{}", name)
    }
}
