//! Validated numeric primitives for user-facing settings.
//!
//! Geometry code works in raw `f64`, but anything that arrives from a caller
//! (spacing, density, padding) passes through these checks first so NaN and
//! infinities never reach the placement math.

use std::fmt;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinite values.
#[inline]
pub fn finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Division that yields zero instead of infinity or NaN when the divisor is zero.
///
/// Every normalized quantity in the placement math goes through this.
#[inline]
pub fn div_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validators() {
        assert_eq!(finite(f64::NAN), Err(NumericError::NaN));
        assert_eq!(finite(f64::NEG_INFINITY), Err(NumericError::Infinite));
        assert_eq!(finite(-0.5), Ok(-0.5));
    }

    #[test]
    fn zero_divisor() {
        assert_eq!(div_or_zero(5.0, 0.0), 0.0);
        assert_eq!(div_or_zero(5.0, 2.0), 2.5);
    }
}
