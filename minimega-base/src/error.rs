//! Error types for account decoding and instruction encoding

use thiserror::Error;

/// Failure to decode a byte buffer into a typed record
///
/// Variants fall into two families: truncation (a read ran past the end of
/// the buffer) and validation (the bytes were readable but violate the
/// record's constraints). The scanner treats both as "not this kind".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A read would run past the end of the buffer
    #[error("buffer truncated at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A length prefix exceeds the field's maximum
    #[error("{field} length {len} exceeds maximum {max}")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A required string is empty
    #[error("{field} must not be empty")]
    EmptyString { field: &'static str },

    /// A string contains bytes outside printable ASCII
    #[error("{field} contains non-printable characters")]
    NonPrintable { field: &'static str },

    /// A string is not valid UTF-8
    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: &'static str },

    /// A bool byte other than 0 or 1
    #[error("invalid bool byte {value} at offset {offset}")]
    InvalidBool { offset: usize, value: u8 },

    /// An option presence byte other than 0 or 1
    #[error("invalid option tag {value} at offset {offset}")]
    InvalidOptionTag { offset: usize, value: u8 },

    /// The leading tag does not belong to the requested kind
    #[error("discriminator {found} does not match {kind}")]
    DiscriminatorMismatch { kind: &'static str, found: String },

    /// A numeric field holds an implausible value
    #[error("{field} out of range: {value}")]
    FieldOutOfRange { field: &'static str, value: u64 },

    /// Bytes left over after a fixed-layout record
    #[error("{count} unexpected trailing bytes")]
    TrailingBytes { count: usize },
}

impl DecodeError {
    /// True when the buffer was too short for the layout
    pub fn is_truncation(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    /// True when the bytes were readable but failed a record constraint
    pub fn is_validation(&self) -> bool {
        !self.is_truncation()
    }
}

/// Failure to build an instruction payload or derived address
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{field} length {len} exceeds maximum {max}")]
    StringTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },

    #[error("{field} must not be empty")]
    EmptyString { field: &'static str },

    #[error("{field} contains non-printable characters")]
    NonPrintable { field: &'static str },

    /// A human-facing amount that has no on-chain representation
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Basis points above 10000
    #[error("{field} {value} exceeds 10000 basis points")]
    FeeOutOfRange { field: &'static str, value: u16 },

    #[error("seed of {len} bytes exceeds the 32 byte limit")]
    SeedTooLong { len: usize },

    #[error("{count} seeds exceed the limit of {max}")]
    TooManySeeds { count: usize, max: usize },

    /// Every bump produced an on-curve point
    #[error("unable to find a viable program address bump seed")]
    NoViableBump,
}

/// Result type for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

/// Result type for encode operations
pub type EncodeResult<T> = std::result::Result<T, EncodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DecodeError::Truncated {
            offset: 40,
            needed: 8,
            remaining: 3,
        };
        assert_eq!(
            error.to_string(),
            "buffer truncated at offset 40: needed 8 bytes, 3 remaining"
        );

        let error = EncodeError::StringTooLong {
            field: "symbol",
            len: 21,
            max: 20,
        };
        assert_eq!(error.to_string(), "symbol length 21 exceeds maximum 20");
    }

    #[test]
    fn test_error_classification() {
        let truncated = DecodeError::Truncated {
            offset: 0,
            needed: 1,
            remaining: 0,
        };
        assert!(truncated.is_truncation());
        assert!(!truncated.is_validation());

        let empty = DecodeError::EmptyString { field: "name" };
        assert!(empty.is_validation());
    }
}
