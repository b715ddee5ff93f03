// ============================================================================
// Decimal Configuration
// Precision, rounding policy and exponent bounds for a decimal context
// ============================================================================

use crate::numeric::{DecimalError, DecimalResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest precision, number of decimal places or significant digits accepted.
pub const MAX_DIGITS: u32 = 1_000_000_000;

/// Largest magnitude accepted for exponent bounds and display thresholds.
pub const EXP_LIMIT: i64 = 9_000_000_000_000_000;

// ============================================================================
// Rounding Mode
// ============================================================================

/// Policy applied when a value is shortened to fewer digits.
///
/// The discriminants are the integer codes accepted by [`Rounding::try_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Rounding {
    /// Away from zero
    Up = 0,
    /// Towards zero (truncation)
    Down = 1,
    /// Towards +Infinity
    Ceil = 2,
    /// Towards -Infinity
    Floor = 3,
    /// To nearest, ties away from zero
    HalfUp = 4,
    /// To nearest, ties towards zero
    HalfDown = 5,
    /// To nearest, ties to the even neighbour
    HalfEven = 6,
    /// To nearest, ties towards +Infinity
    HalfCeil = 7,
    /// To nearest, ties towards -Infinity
    HalfFloor = 8,
}

impl Rounding {
    /// All modes in code order.
    pub const ALL: [Rounding; 9] = [
        Rounding::Up,
        Rounding::Down,
        Rounding::Ceil,
        Rounding::Floor,
        Rounding::HalfUp,
        Rounding::HalfDown,
        Rounding::HalfEven,
        Rounding::HalfCeil,
        Rounding::HalfFloor,
    ];

    /// Integer code of the mode (0..=8).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// True for the four modes that ignore the value of the discarded digits.
    #[inline]
    pub const fn is_directed(self) -> bool {
        (self as u8) < 4
    }
}

impl Default for Rounding {
    #[inline]
    fn default() -> Self {
        Rounding::HalfUp
    }
}

impl TryFrom<u8> for Rounding {
    type Error = DecimalError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Rounding::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| DecimalError::invalid(code))
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rounding::Up => "ROUND_UP",
            Rounding::Down => "ROUND_DOWN",
            Rounding::Ceil => "ROUND_CEIL",
            Rounding::Floor => "ROUND_FLOOR",
            Rounding::HalfUp => "ROUND_HALF_UP",
            Rounding::HalfDown => "ROUND_HALF_DOWN",
            Rounding::HalfEven => "ROUND_HALF_EVEN",
            Rounding::HalfCeil => "ROUND_HALF_CEIL",
            Rounding::HalfFloor => "ROUND_HALF_FLOOR",
        };
        f.write_str(name)
    }
}

// ============================================================================
// Modulo Mode
// ============================================================================

/// Sign convention of the remainder computed by `modulo`.
///
/// Modes 0..=8 round the quotient with the matching [`Rounding`] mode;
/// `Euclid` always yields a non-negative remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ModuloMode {
    /// Quotient rounded away from zero
    Up = 0,
    /// Truncated division: remainder takes the sign of the dividend
    Down = 1,
    /// Quotient rounded towards +Infinity
    Ceil = 2,
    /// Floored division: remainder takes the sign of the divisor
    Floor = 3,
    /// Quotient rounded half up
    HalfUp = 4,
    /// Quotient rounded half down
    HalfDown = 5,
    /// IEEE 754 remainder
    HalfEven = 6,
    /// Quotient rounded half towards +Infinity
    HalfCeil = 7,
    /// Quotient rounded half towards -Infinity
    HalfFloor = 8,
    /// Euclidean division: remainder is never negative
    Euclid = 9,
}

impl ModuloMode {
    /// Integer code of the mode (0..=9).
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Rounding applied to the quotient, `None` for `Euclid`.
    pub fn quotient_rounding(self) -> Option<Rounding> {
        Rounding::try_from(self as u8).ok()
    }
}

impl Default for ModuloMode {
    #[inline]
    fn default() -> Self {
        ModuloMode::Down
    }
}

impl From<Rounding> for ModuloMode {
    fn from(rounding: Rounding) -> Self {
        match rounding {
            Rounding::Up => ModuloMode::Up,
            Rounding::Down => ModuloMode::Down,
            Rounding::Ceil => ModuloMode::Ceil,
            Rounding::Floor => ModuloMode::Floor,
            Rounding::HalfUp => ModuloMode::HalfUp,
            Rounding::HalfDown => ModuloMode::HalfDown,
            Rounding::HalfEven => ModuloMode::HalfEven,
            Rounding::HalfCeil => ModuloMode::HalfCeil,
            Rounding::HalfFloor => ModuloMode::HalfFloor,
        }
    }
}

impl TryFrom<u8> for ModuloMode {
    type Error = DecimalError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            9 => Ok(ModuloMode::Euclid),
            _ => Rounding::try_from(code).map(ModuloMode::from),
        }
    }
}

// ============================================================================
// Complete Decimal Configuration
// ============================================================================

/// Settings of one decimal context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Config {
    /// Significant digits of rounded results (1..=1e9)
    pub precision: u32,

    /// Default rounding mode
    pub rounding: Rounding,

    /// Remainder sign convention used by `modulo`
    pub modulo: ModuloMode,

    /// Exponent at or below which `to_string` switches to exponential notation (-9e15..=0)
    pub to_exp_neg: i64,

    /// Exponent at or above which `to_string` switches to exponential notation (0..=9e15)
    pub to_exp_pos: i64,

    /// Smallest exponent before a value underflows to zero (-9e15..=0)
    pub min_e: i64,

    /// Largest exponent before a value overflows to Infinity (0..=9e15)
    pub max_e: i64,

    /// Draw random digits from the operating system's secure source
    pub crypto: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: 20,
            rounding: Rounding::HalfUp,
            modulo: ModuloMode::Down,
            to_exp_neg: -7,
            to_exp_pos: 21,
            min_e: -EXP_LIMIT,
            max_e: EXP_LIMIT,
            crypto: false,
        }
    }
}

impl Config {
    /// Create a configuration with library defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: Set precision
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    /// Builder method: Set rounding mode
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Builder method: Set modulo mode
    pub fn with_modulo(mut self, modulo: ModuloMode) -> Self {
        self.modulo = modulo;
        self
    }

    /// Builder method: Set both exponential-notation thresholds
    pub fn with_exponent_thresholds(mut self, to_exp_neg: i64, to_exp_pos: i64) -> Self {
        self.to_exp_neg = to_exp_neg;
        self.to_exp_pos = to_exp_pos;
        self
    }

    /// Builder method: Set underflow and overflow bounds
    pub fn with_exponent_bounds(mut self, min_e: i64, max_e: i64) -> Self {
        self.min_e = min_e;
        self.max_e = max_e;
        self
    }

    /// Builder method: Use the secure random source
    pub fn with_crypto(mut self, crypto: bool) -> Self {
        self.crypto = crypto;
        self
    }

    /// Validate every numeric field against its legal range.
    ///
    /// Availability of the secure random source is checked by the context,
    /// not here.
    pub fn validate(&self) -> DecimalResult<()> {
        if self.precision < 1 || self.precision > MAX_DIGITS {
            return Err(DecimalError::invalid(self.precision));
        }

        check_range(self.to_exp_neg, -EXP_LIMIT, 0)?;
        check_range(self.to_exp_pos, 0, EXP_LIMIT)?;
        check_range(self.min_e, -EXP_LIMIT, 0)?;
        check_range(self.max_e, 0, EXP_LIMIT)?;

        Ok(())
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> DecimalResult<Self> {
        let config: Config = serde_json::from_str(json).map_err(DecimalError::invalid)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_range(value: i64, min: i64, max: i64) -> DecimalResult<()> {
    if value < min || value > max {
        Err(DecimalError::invalid(value))
    } else {
        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl Config {
    /// IEEE 754 decimal128 style: 34 digits, ties to even
    pub fn decimal128() -> Self {
        Self::new()
            .with_precision(34)
            .with_rounding(Rounding::HalfEven)
            .with_exponent_bounds(-6143, 6144)
    }

    /// Banker's arithmetic: default precision, ties to even, IEEE remainder
    pub fn bankers() -> Self {
        Self::new()
            .with_rounding(Rounding::HalfEven)
            .with_modulo(ModuloMode::HalfEven)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.precision, 20);
        assert_eq!(config.rounding, Rounding::HalfUp);
        assert_eq!(config.modulo, ModuloMode::Down);
        assert_eq!(config.to_exp_neg, -7);
        assert_eq!(config.to_exp_pos, 21);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::new()
            .with_precision(50)
            .with_rounding(Rounding::Floor)
            .with_exponent_bounds(-100, 100);

        assert_eq!(config.precision, 50);
        assert_eq!(config.rounding, Rounding::Floor);
        assert_eq!(config.min_e, -100);
        assert_eq!(config.max_e, 100);
    }

    #[test]
    fn test_validation() {
        assert!(Config::new().with_precision(0).validate().is_err());
        assert!(Config::new()
            .with_precision(MAX_DIGITS + 1)
            .validate()
            .is_err());
        assert!(Config::new().with_precision(MAX_DIGITS).validate().is_ok());
        assert!(Config::new()
            .with_exponent_thresholds(1, 21)
            .validate()
            .is_err());
        assert!(Config::new()
            .with_exponent_bounds(-EXP_LIMIT - 1, 0)
            .validate()
            .is_err());
        assert!(Config::new()
            .with_exponent_bounds(0, EXP_LIMIT + 1)
            .validate()
            .is_err());
    }

    #[test]
    fn test_rounding_codes() {
        for (code, mode) in Rounding::ALL.iter().enumerate() {
            assert_eq!(Rounding::try_from(code as u8).unwrap(), *mode);
            assert_eq!(mode.code() as usize, code);
        }
        assert!(Rounding::try_from(9).is_err());
        assert!(Rounding::Floor.is_directed());
        assert!(!Rounding::HalfUp.is_directed());
    }

    #[test]
    fn test_modulo_codes() {
        assert_eq!(ModuloMode::try_from(9).unwrap(), ModuloMode::Euclid);
        assert_eq!(ModuloMode::try_from(3).unwrap(), ModuloMode::Floor);
        assert!(ModuloMode::try_from(10).is_err());
        assert_eq!(ModuloMode::Euclid.quotient_rounding(), None);
        assert_eq!(
            ModuloMode::HalfEven.quotient_rounding(),
            Some(Rounding::HalfEven)
        );
    }

    #[test]
    fn test_preset_configs() {
        let d128 = Config::decimal128();
        assert_eq!(d128.precision, 34);
        assert!(d128.validate().is_ok());

        let bankers = Config::bankers();
        assert_eq!(bankers.modulo, ModuloMode::HalfEven);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json() {
        let config = Config::from_json(r#"{"precision": 40, "rounding": "HalfEven"}"#).unwrap();
        assert_eq!(config.precision, 40);
        assert_eq!(config.rounding, Rounding::HalfEven);
        assert_eq!(config.max_e, EXP_LIMIT);

        assert!(Config::from_json(r#"{"precision": 0}"#).is_err());
    }
}
