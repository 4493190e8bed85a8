//! # S7 Field Error Handling
//!
//! This module provides the error handling for the S7 field addressing
//! library. Address parsing is deterministic, so the error surface is
//! deliberately small and split into two clearly distinct categories.
//!
//! ## Error Categories
//!
//! ### Address Errors
//! - **Invalid Address**: the token matches no grammar, or a
//!   structurally-matched token fails a validation rule (bounds
//!   violation, unknown type or area name, missing bit offset for BOOL,
//!   transfer size code mismatch, malformed packed buffer). These are
//!   caller errors: the address itself is wrong and will never parse,
//!   no matter how often it is retried.
//!
//! ### Capability Gaps
//! - **Unsupported**: the data type is a valid member of the type table
//!   but the library has no value category mapping or no transfer size
//!   code defined for it. This is not a user-input problem, it signals
//!   missing driver functionality and should be reported differently in
//!   logs and error messages.
//!
//! ## Usage Example
//!
//! ```rust
//! use s7_field::{S7Field, FieldError};
//!
//! match S7Field::parse("%IW64:REAL") {
//!     Ok(field) => println!("Parsed: {}", field),
//!     Err(error) => {
//!         if error.is_address_error() {
//!             println!("Bad address, fix the tag configuration: {}", error);
//!         } else {
//!             println!("Driver capability gap: {}", error);
//!         }
//!     }
//! }
//! ```

use thiserror::Error;

/// Result type alias for field addressing operations
///
/// This is a convenience type alias that uses `FieldError` as the error
/// type for all parsing and decoding operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors produced by address parsing and packed-address decoding
///
/// Every failure aborts the single parse or decode operation and is
/// returned to the immediate caller. Nothing is caught-and-continued
/// inside the library, and no partial field is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Malformed or invalid field address
    ///
    /// Raised when a token matches none of the supported grammars, or
    /// when a structurally valid token fails semantic validation. The
    /// original address token is always carried for diagnostics.
    ///
    /// # Examples
    /// - `%I0:BOOL` (bit offset missing for BOOL)
    /// - `%IW64:REAL` (transfer size code mismatch)
    /// - `%DB0:8.0:REAL` (data block number out of range)
    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Known data type without the requested mapping
    ///
    /// Raised when a data type exists in the transport size table but
    /// the library defines no value category or no transfer size code
    /// for it. Indicates missing driver functionality rather than bad
    /// caller input.
    ///
    /// # Examples
    /// - Requesting the value category of `LWORD`
    /// - Cross-checking a size code against `DATE_AND_TIME`
    #[error("Unsupported data type {data_type}: {message}")]
    Unsupported { data_type: String, message: String },
}

impl FieldError {
    /// Create an invalid address error
    ///
    /// # Arguments
    ///
    /// * `address` - The offending address token, verbatim
    /// * `reason` - Description of the validation failure
    pub fn invalid_address<A: Into<String>, R: Into<String>>(address: A, reason: R) -> Self {
        Self::InvalidAddress {
            address: address.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported data type error
    ///
    /// # Arguments
    ///
    /// * `data_type` - Name of the data type lacking the mapping
    /// * `message` - Description of the missing capability
    pub fn unsupported<T: Into<String>, M: Into<String>>(data_type: T, message: M) -> Self {
        Self::Unsupported {
            data_type: data_type.into(),
            message: message.into(),
        }
    }

    /// Check if the error is a caller-side address error
    ///
    /// Address errors are permanent: the same token will fail the same
    /// way on every attempt, so retrying is pointless.
    pub fn is_address_error(&self) -> bool {
        matches!(self, Self::InvalidAddress { .. })
    }

    /// Check if the error is a library capability gap
    ///
    /// Capability gaps are resolved by extending the driver, not by
    /// fixing the address.
    pub fn is_capability_gap(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let err = FieldError::invalid_address("%I0:BOOL", "expected bit offset for BOOL");
        assert!(err.is_address_error());
        assert!(!err.is_capability_gap());

        let err = FieldError::unsupported("LWORD", "no value category mapping");
        assert!(err.is_capability_gap());
        assert!(!err.is_address_error());
    }

    #[test]
    fn test_error_display() {
        let err = FieldError::invalid_address("%DB0:8.0:REAL", "data block number out of range");
        let msg = format!("{}", err);
        assert!(msg.contains("%DB0:8.0:REAL"));
        assert!(msg.contains("data block number out of range"));

        let err = FieldError::unsupported("WSTRING", "no value category mapping");
        let msg = format!("{}", err);
        assert!(msg.contains("WSTRING"));
    }
}
