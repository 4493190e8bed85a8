//! # S7 Field - Siemens S7 Field Addressing Library
//!
//! A complete, validated implementation of S7 field addressing in pure
//! Rust: the address grammar and validation core that turns a raw
//! address token into a strongly-typed memory reference for read/write
//! request encoders.
//!
//! ## Features
//!
//! - **🧭 Four Address Grammars**: full data-block, generic symbolic,
//!   short data-block, and packed Simotion addresses
//! - **🛡️ Strict Validation**: bounds checks, type tables, and size-code
//!   cross-checks; addresses are accepted or rejected, never repaired
//! - **🔁 Cross-Format Equivalence**: packed and textual encodings of
//!   the same memory cell decode to equal fields
//! - **⚡ Pure Computation**: no I/O, no shared mutable state, safe to
//!   call from any number of threads without coordination
//! - **📋 Clear Error Taxonomy**: caller-side address errors are
//!   distinguished from driver capability gaps
//!
//! ## Supported Grammars
//!
//! | Grammar | Example | Notes |
//! |---------|---------|-------|
//! | Full data-block | `%DB1.DBX38.1:BOOL` | most specific, tried first |
//! | Generic symbolic | `%I0.1:BOOL`, `%ID64:REAL` | one-letter area codes |
//! | Short data-block | `%DB1:38.1:BOOL` | no size code |
//! | Packed Simotion | `10-08-00-01-00-2D-84-00-00-80` | ten hex byte groups |
//!
//! ## Quick Start
//!
//! ```rust
//! use s7_field::{S7Field, MemoryArea, TransportSize, ValueCategory};
//!
//! // Parse a symbolic data-block address
//! let field = S7Field::parse("%DB45:16.0:REAL").unwrap();
//! assert_eq!(field.data_type(), TransportSize::Real);
//! assert_eq!(field.memory_area(), MemoryArea::DataBlocks);
//! assert_eq!(field.block_number(), 45);
//!
//! // The packed form of the same cell decodes to an equal field
//! let packed = S7Field::decode_packed("10-08-00-01-00-2D-84-00-00-80").unwrap();
//! assert_eq!(packed, field);
//!
//! // The deserializer asks the field which value to materialize
//! assert_eq!(field.value_category().unwrap(), ValueCategory::Float64);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        Address Token         │
//! └──────────────────────────────┘
//!                │
//! ┌──────────────────────────────┐
//! │   Grammar Dispatcher         │
//! │   (ordered recognizers)      │
//! └──────────────────────────────┘
//!        │               │
//! ┌─────────────┐ ┌─────────────┐
//! │  Symbolic   │ │   Packed    │
//! │  Captures   │ │  BitReader  │
//! └─────────────┘ └─────────────┘
//!        │               │
//! ┌──────────────────────────────┐
//! │  Type Tables + Validation    │
//! │  (MemoryArea/TransportSize)  │
//! └──────────────────────────────┘
//!                │
//! ┌──────────────────────────────┐
//! │       S7Field (immutable)    │
//! └──────────────────────────────┘
//! ```

/// Core error types and result handling
pub mod error;

/// Memory area and transport size tables
pub mod types;

/// S7 field value type and grammar dispatcher
pub mod field;

/// Structural recognizers for the address grammars
mod grammar;

/// Packed Simotion address decoding
mod simotion;

// Re-export main types for convenience
pub use error::{FieldError, FieldResult};
pub use field::S7Field;
pub use types::{MemoryArea, TransportSize, ValueCategory};

/// Maximum byte offset within a memory area (fits 21 bits)
pub const MAX_BYTE_OFFSET: u32 = 2_097_151;

/// Smallest addressable data block number
pub const MIN_DATA_BLOCK_NUMBER: u16 = 1;

/// Largest addressable data block number
pub const MAX_DATA_BLOCK_NUMBER: u16 = 64_000;

/// Largest declarable STRING character capacity
pub const MAX_STRING_LENGTH: u16 = 254;

/// Storage footprint used for a STRING with no declared capacity
pub const DEFAULT_STRING_CAPACITY: u16 = 256;

/// Length of a packed Simotion address in bytes
pub const PACKED_ADDRESS_BYTES: usize = 10;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn info() -> String {
    format!("S7 Field v{} - Siemens S7 field addressing library", VERSION)
}
