//! Error types for the entropy coding core.

use std::fmt;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error type covering every failure mode described by the component design.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    /// An integer magnitude exceeds the category table's range (`|v| >= 32768`).
    OutOfRange {
        /// The offending value.
        value: i32,
    },
    /// A DC difference or AC amplitude exceeds the field width reserved for it.
    Overflow {
        /// The offending value.
        value: i32,
        /// The inclusive magnitude limit it exceeded.
        limit: i32,
    },
    /// A zig-zag traversal was given a non-square matrix.
    NonSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns of the offending row.
        cols: usize,
    },
    /// DC/AC block counts disagree, or a chrominance layer has an odd count.
    ShapeMismatch {
        /// What was being compared.
        reason: &'static str,
    },
    /// No codeword in the table matches any prefix of the remaining bits.
    NoPrefix {
        /// Number of bits left in the stream at the point of failure.
        remaining_bits: usize,
    },
    /// The amplitude suffix following a codeword was shorter than its declared size.
    TruncatedBits {
        /// Declared amplitude width in bits.
        expected: usize,
        /// Bits actually available.
        available: usize,
    },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::OutOfRange { value } => {
                write!(f, "value {value} is out of the category table's range")
            }
            CoreError::Overflow { value, limit } => {
                write!(f, "value {value} exceeds the allowed magnitude {limit}")
            }
            CoreError::NonSquare { rows, cols } => {
                write!(f, "matrix is not square: {rows} rows, {cols} columns in offending row")
            }
            CoreError::ShapeMismatch { reason } => {
                write!(f, "shape mismatch: {reason}")
            }
            CoreError::NoPrefix { remaining_bits } => {
                write!(f, "no codeword matches a prefix of the remaining {remaining_bits} bits")
            }
            CoreError::TruncatedBits { expected, available } => {
                write!(
                    f,
                    "amplitude suffix truncated: expected {expected} bits, only {available} available"
                )
            }
        }
    }
}

impl std::error::Error for CoreError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_messages_mention_the_offending_values() {
        assert!(CoreError::OutOfRange { value: 40000 }.to_string().contains("40000"));
        assert!(CoreError::Overflow { value: 2048, limit: 2047 }
            .to_string()
            .contains("2048"));
        assert!(CoreError::NonSquare { rows: 3, cols: 2 }.to_string().contains('3'));
        assert!(CoreError::ShapeMismatch { reason: "DC/AC count" }
            .to_string()
            .contains("DC/AC count"));
        assert!(CoreError::NoPrefix { remaining_bits: 5 }.to_string().contains('5'));
        assert!(CoreError::TruncatedBits { expected: 4, available: 2 }
            .to_string()
            .contains("2 available"));
    }

    #[test]
    fn is_a_std_error() {
        let err: &dyn std::error::Error = &CoreError::OutOfRange { value: 0 };
        let _ = err.to_string();
    }
}
