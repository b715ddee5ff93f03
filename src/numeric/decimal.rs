// ============================================================================
// Arbitrary-Precision Decimal
// Immutable base-10 values with signed zero, infinities and NaN
// ============================================================================

use super::digits::{
    base10_exponent, digits_to_string, significant_digits, strip_leading, strip_trailing, Words,
    BASE, LOG_BASE,
};
use super::errors::DecimalError;
use crate::domain::Config;
use crate::engine::Context;
use smallvec::{smallvec, SmallVec};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// An arbitrary-precision decimal value.
///
/// Values never reference a configuration: precision and rounding are
/// applied by the [`Context`] that produces them. Zero is signed, so `-0`
/// and `0` are distinct values that compare equal.
///
/// # Example
/// ```
/// use decimal_engine::prelude::*;
///
/// let ctx = Context::default();
/// let a = ctx.parse("0.1").unwrap();
/// let b = ctx.parse("0.2").unwrap();
/// assert_eq!(ctx.add(&a, &b).to_string(), "0.3");
/// ```
#[derive(Clone)]
pub enum Decimal {
    /// A finite value, including both zeros
    Finite(Finite),
    /// Positive or negative infinity
    Infinite { negative: bool },
    /// Not a number
    NaN,
}

/// Sign, digit words and exponent of a finite value.
///
/// `digits` holds base 1e7 words, most significant first. `exponent` is the
/// base-10 exponent of the leading decimal digit. The first word holds
/// `exponent.rem_euclid(7) + 1` digits so every word sits on a fixed
/// power of 1e7. Zero is the single word `[0]` with exponent 0.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finite {
    pub(crate) negative: bool,
    pub(crate) digits: Words,
    pub(crate) exponent: i64,
}

// ============================================================================
// Finite Construction and Normalization
// ============================================================================

impl Finite {
    /// Signed zero.
    #[inline]
    pub(crate) fn zero(negative: bool) -> Self {
        Finite {
            negative,
            digits: smallvec![0],
            exponent: 0,
        }
    }

    /// Build from words whose first word sits at `1e7^word_exponent`.
    ///
    /// Leading and trailing zero words are removed.
    pub(crate) fn from_words(negative: bool, mut digits: Words, word_exponent: i64) -> Self {
        if digits.is_empty() {
            return Finite::zero(negative);
        }
        let shifted = strip_leading(&mut digits) as i64;
        strip_trailing(&mut digits);
        if digits[0] == 0 {
            return Finite::zero(negative);
        }
        let exponent = base10_exponent(&digits, word_exponent - shifted);
        Finite {
            negative,
            digits,
            exponent,
        }
    }

    /// Build from ASCII decimal digits where the first digit has base-10
    /// exponent `exponent`.
    pub(crate) fn from_coefficient(negative: bool, coefficient: &[u8], exponent: i64) -> Self {
        let leading = coefficient.iter().take_while(|&&b| b == b'0').count();
        let trailing = coefficient[leading..]
            .iter()
            .rev()
            .take_while(|&&b| b == b'0')
            .count();
        let coefficient = &coefficient[leading..coefficient.len() - trailing];
        if coefficient.is_empty() {
            return Finite::zero(negative);
        }

        let exponent = exponent.saturating_sub(leading as i64);
        let first_len = (exponent.rem_euclid(LOG_BASE) + 1) as usize;

        let mut digits: Words = SmallVec::with_capacity(coefficient.len() / 7 + 2);
        let mut start = 0;
        let mut width = first_len;
        while start < coefficient.len() {
            let end = (start + width).min(coefficient.len());
            let mut word = coefficient[start..end]
                .iter()
                .fold(0u32, |acc, &b| acc * 10 + (b - b'0') as u32);
            for _ in end - start..width {
                word *= 10;
            }
            digits.push(word);
            start = end;
            width = LOG_BASE as usize;
        }

        Finite {
            negative,
            digits,
            exponent,
        }
    }

    /// Exact value of an unsigned integer.
    pub(crate) fn from_u128(negative: bool, mut n: u128) -> Self {
        if n == 0 {
            return Finite::zero(negative);
        }
        let mut words: Words = SmallVec::new();
        while n > 0 {
            words.push((n % BASE as u128) as u32);
            n /= BASE as u128;
        }
        let word_exponent = words.len() as i64 - 1;
        words.reverse();
        Finite::from_words(negative, words, word_exponent)
    }

    /// Power of 1e7 at which the first word sits.
    #[inline]
    pub(crate) fn word_exponent(&self) -> i64 {
        self.exponent.div_euclid(LOG_BASE)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.digits[0] == 0
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Base-10 exponent of the leading digit.
    #[inline]
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Number of significant digits.
    #[inline]
    pub(crate) fn sd(&self) -> i64 {
        significant_digits(&self.digits)
    }

    /// Significand digits with trailing zeros removed.
    #[inline]
    pub(crate) fn coefficient(&self) -> String {
        digits_to_string(&self.digits)
    }

    pub(crate) fn is_integer(&self) -> bool {
        self.word_exponent() > self.digits.len() as i64 - 2
    }

    pub(crate) fn abs(&self) -> Finite {
        Finite {
            negative: false,
            ..self.clone()
        }
    }

    /// Compare by numeric value; the two zeros are equal.
    pub(crate) fn cmp_value(&self, other: &Finite) -> Ordering {
        match (self.is_zero(), other.is_zero()) {
            (true, true) => return Ordering::Equal,
            (true, false) => {
                return if other.negative {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            },
            (false, true) => {
                return if self.negative {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            },
            (false, false) => {},
        }

        if self.negative != other.negative {
            return if self.negative {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }

        let magnitude = self.cmp_magnitude(other);
        if self.negative {
            magnitude.reverse()
        } else {
            magnitude
        }
    }

    /// Compare absolute values of two non-zero values.
    pub(crate) fn cmp_magnitude(&self, other: &Finite) -> Ordering {
        self.exponent
            .cmp(&other.exponent)
            .then_with(|| self.digits[..].cmp(&other.digits[..]))
    }

    /// Render the unsigned magnitude in plain or exponential notation,
    /// zero-padded to `sd` significant digits when given.
    pub(crate) fn to_notation(&self, exponential: bool, sd: Option<i64>) -> String {
        let e = self.exponent;
        let mut s = self.coefficient();
        let len = s.len() as i64;
        let pad = |k: i64| "0".repeat(k.max(0) as usize);

        if exponential {
            match sd.map(|sd| sd - len) {
                Some(k) if k > 0 => {
                    s.insert(1, '.');
                    s.push_str(&pad(k));
                },
                _ if len > 1 => s.insert(1, '.'),
                _ => {},
            }
            if e < 0 {
                s.push_str(&format!("e{}", e));
            } else {
                s.push_str(&format!("e+{}", e));
            }
        } else if e < 0 {
            let mut out = String::with_capacity(s.len() + (-e) as usize + 2);
            out.push_str("0.");
            out.push_str(&pad(-e - 1));
            out.push_str(&s);
            if let Some(k) = sd.map(|sd| sd - len) {
                out.push_str(&pad(k));
            }
            s = out;
        } else if e >= len {
            s.push_str(&pad(e + 1 - len));
            if let Some(k) = sd.map(|sd| sd - e - 1).filter(|&k| k > 0) {
                s.push('.');
                s.push_str(&pad(k));
            }
        } else {
            if e + 1 < len {
                s.insert((e + 1) as usize, '.');
            }
            if let Some(k) = sd.map(|sd| sd - len).filter(|&k| k > 0) {
                if e + 1 == len {
                    s.push('.');
                }
                s.push_str(&pad(k));
            }
        }
        s
    }
}

// ============================================================================
// Decimal Construction
// ============================================================================

impl Decimal {
    /// Positive zero
    #[inline]
    pub fn zero() -> Self {
        Decimal::Finite(Finite::zero(false))
    }

    /// Zero with the given sign
    #[inline]
    pub fn signed_zero(negative: bool) -> Self {
        Decimal::Finite(Finite::zero(negative))
    }

    /// One
    #[inline]
    pub fn one() -> Self {
        Decimal::Finite(Finite::from_u128(false, 1))
    }

    /// Infinity with the given sign
    #[inline]
    pub fn infinity(negative: bool) -> Self {
        Decimal::Infinite { negative }
    }

    /// `mantissa × 10^exponent`, exact.
    pub fn from_scaled(negative: bool, mantissa: u128, exponent: i64) -> Self {
        let text = mantissa.to_string();
        let lead = exponent.saturating_add(text.len() as i64 - 1);
        Decimal::Finite(Finite::from_coefficient(negative, text.as_bytes(), lead))
    }

    #[inline]
    pub(crate) fn finite(&self) -> Option<&Finite> {
        match self {
            Decimal::Finite(x) => Some(x),
            _ => None,
        }
    }

    // ========================================================================
    // Predicates
    // ========================================================================

    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self, Decimal::Finite(_))
    }

    #[inline]
    pub fn is_nan(&self) -> bool {
        matches!(self, Decimal::NaN)
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        matches!(self, Decimal::Infinite { .. })
    }

    /// True for both zeros.
    #[inline]
    pub fn is_zero(&self) -> bool {
        matches!(self, Decimal::Finite(x) if x.is_zero())
    }

    /// True when the sign is negative, including `-0` and `-Infinity`.
    #[inline]
    pub fn is_negative(&self) -> bool {
        match self {
            Decimal::Finite(x) => x.negative,
            Decimal::Infinite { negative } => *negative,
            Decimal::NaN => false,
        }
    }

    /// True when the sign is positive, including `0` and `Infinity`.
    #[inline]
    pub fn is_positive(&self) -> bool {
        !self.is_nan() && !self.is_negative()
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self, Decimal::Finite(x) if x.is_integer())
    }

    /// True for an integer whose units digit is odd.
    pub(crate) fn is_odd_integer(&self) -> bool {
        let x = match self {
            Decimal::Finite(x) if x.is_integer() => x,
            _ => return false,
        };
        match x.digits.get(x.word_exponent() as usize) {
            Some(w) => w & 1 == 1,
            None => false,
        }
    }

    /// Base-10 exponent of the leading digit, `None` when not finite.
    #[inline]
    pub fn exponent(&self) -> Option<i64> {
        self.finite().map(|x| x.exponent)
    }

    /// Number of digits after the decimal point, `None` when not finite.
    pub fn decimal_places(&self) -> Option<u64> {
        let x = self.finite()?;
        let last = x.digits.len() - 1;
        let mut n = (last as i64 - x.word_exponent()) * LOG_BASE;
        let mut w = x.digits[last];
        if w != 0 {
            while w % 10 == 0 {
                w /= 10;
                n -= 1;
            }
        }
        Some(n.max(0) as u64)
    }

    /// Number of significant digits; with `include_zeros` the integer
    /// part's trailing zeros count as significant.
    pub fn precision(&self, include_zeros: bool) -> Option<u64> {
        let x = self.finite()?;
        let mut n = x.sd();
        if include_zeros && x.exponent + 1 > n {
            n = x.exponent + 1;
        }
        Some(n as u64)
    }

    /// `1`, `-1`, `0`, `-0` or NaN according to the sign.
    pub fn signum(&self) -> Decimal {
        match self {
            Decimal::NaN => Decimal::NaN,
            Decimal::Finite(x) if x.is_zero() => Decimal::signed_zero(x.negative),
            _ => Decimal::Finite(Finite::from_u128(self.is_negative(), 1)),
        }
    }

    /// Copy with the sign flipped. NaN stays NaN.
    pub fn negated(&self) -> Decimal {
        match self {
            Decimal::Finite(x) => Decimal::Finite(Finite {
                negative: !x.negative,
                ..x.clone()
            }),
            Decimal::Infinite { negative } => Decimal::Infinite {
                negative: !negative,
            },
            Decimal::NaN => Decimal::NaN,
        }
    }

    /// Copy with a positive sign. NaN stays NaN.
    pub fn abs(&self) -> Decimal {
        match self {
            Decimal::Finite(x) => Decimal::Finite(x.abs()),
            Decimal::Infinite { .. } => Decimal::Infinite { negative: false },
            Decimal::NaN => Decimal::NaN,
        }
    }

    pub(crate) fn with_sign(mut self, negative: bool) -> Decimal {
        match &mut self {
            Decimal::Finite(x) => x.negative = negative,
            Decimal::Infinite { negative: n } => *n = negative,
            Decimal::NaN => {},
        }
        self
    }

    // ========================================================================
    // Comparison
    // ========================================================================

    /// Numeric comparison; `None` when either value is NaN.
    pub fn cmp(&self, other: &Decimal) -> Option<Ordering> {
        use Decimal::*;
        match (self, other) {
            (NaN, _) | (_, NaN) => None,
            (Infinite { negative: a }, Infinite { negative: b }) => Some(b.cmp(a)),
            (Infinite { negative }, _) => Some(if *negative {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            (_, Infinite { negative }) => Some(if *negative {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            (Finite(x), Finite(y)) => Some(x.cmp_value(y)),
        }
    }

    /// Nearest `f64`, overflowing to infinity and underflowing to zero.
    pub fn to_f64(&self) -> f64 {
        match self {
            Decimal::NaN => f64::NAN,
            Decimal::Infinite { negative: true } => f64::NEG_INFINITY,
            Decimal::Infinite { negative: false } => f64::INFINITY,
            Decimal::Finite(x) => {
                let text = format!(
                    "{}{}",
                    if x.negative { "-" } else { "" },
                    x.to_notation(true, None)
                );
                text.parse().unwrap_or(f64::NAN)
            },
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl Default for Decimal {
    #[inline]
    fn default() -> Self {
        Decimal::zero()
    }
}

impl PartialEq for Decimal {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Decimal {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.cmp(other)
    }
}

impl Neg for Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negated()
    }
}

impl Neg for &Decimal {
    type Output = Decimal;

    #[inline]
    fn neg(self) -> Self::Output {
        self.negated()
    }
}

// ============================================================================
// Display and Debug
// ============================================================================

impl fmt::Display for Decimal {
    /// Plain notation unless the exponent reaches the default thresholds
    /// (`<= -7` or `>= 21`). The sign of `-0` is kept.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decimal::NaN => f.write_str("NaN"),
            Decimal::Infinite { negative: true } => f.write_str("-Infinity"),
            Decimal::Infinite { negative: false } => f.write_str("Infinity"),
            Decimal::Finite(x) => {
                let defaults = Config::default();
                let exponential = x.exponent <= defaults.to_exp_neg || x.exponent >= defaults.to_exp_pos;
                if x.negative {
                    f.write_str("-")?;
                }
                f.write_str(&x.to_notation(exponential, None))
            },
        }
    }
}

impl fmt::Debug for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decimal({})", self)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl FromStr for Decimal {
    type Err = DecimalError;

    /// Parse with the default context.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Context::default().parse(s)
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                #[inline]
                fn from(value: $t) -> Self {
                    Decimal::Finite(Finite::from_u128(false, value as u128))
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Decimal {
                #[inline]
                fn from(value: $t) -> Self {
                    let wide = value as i128;
                    Decimal::Finite(Finite::from_u128(wide < 0, wide.unsigned_abs()))
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128, isize);

impl From<f64> for Decimal {
    /// Exact value of the shortest decimal that round-trips to `value`.
    fn from(value: f64) -> Self {
        if value.is_nan() {
            return Decimal::NaN;
        }
        if value.is_infinite() {
            return Decimal::infinity(value < 0.0);
        }
        crate::engine::parse_plain(&format!("{:e}", value)).unwrap_or(Decimal::NaN)
    }
}

impl From<rust_decimal::Decimal> for Decimal {
    fn from(value: rust_decimal::Decimal) -> Self {
        Decimal::from_scaled(
            value.is_sign_negative(),
            value.mantissa().unsigned_abs(),
            -(value.scale() as i64),
        )
    }
}

impl TryFrom<&Decimal> for rust_decimal::Decimal {
    type Error = DecimalError;

    /// Exact conversion; fails when the value is not finite or does not fit
    /// in 96 bits with at most 28 decimal places.
    fn try_from(value: &Decimal) -> Result<Self, Self::Error> {
        let x = value.finite().ok_or_else(|| DecimalError::invalid(value))?;
        if x.exponent > 28 || x.exponent < -29 {
            return Err(DecimalError::invalid(value));
        }

        let text = format!(
            "{}{}",
            if x.negative { "-" } else { "" },
            x.to_notation(false, None)
        );
        let converted =
            rust_decimal::Decimal::from_str(&text).map_err(|_| DecimalError::invalid(value))?;

        // Reconstruct and compare
        if Decimal::from(converted) != *value {
            return Err(DecimalError::invalid(value));
        }
        Ok(converted)
    }
}

impl TryFrom<Decimal> for rust_decimal::Decimal {
    type Error = DecimalError;

    #[inline]
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        rust_decimal::Decimal::try_from(&value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Decimal {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Decimal {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Tests
// ============================================================================
