// ============================================================================
// Numeric Module
// Arbitrary-precision decimal values and their digit storage
// ============================================================================
//
// This module provides:
// - Decimal: signed value that is finite, infinite or NaN
// - DecimalError: the three error conditions of decimal operations
// - Stored digits of pi and ln(10)
//
// Design principles:
// - Values are immutable and carry no configuration
// - Digits live in base 1e7 words aligned to the decimal point
// - Numeric edge cases produce special values, never errors

pub(crate) mod constants;
mod decimal;
pub(crate) mod digits;
mod errors;

pub use constants::{LN10_PRECISION, PI_PRECISION};
pub use decimal::{Decimal, Finite};
pub use errors::{DecimalError, DecimalResult};
