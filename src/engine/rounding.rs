// ============================================================================
// Rounding
// Digit-level rounding under the nine modes and the public rounding methods
// ============================================================================

use super::context::Context;
use crate::domain::{Rounding, MAX_DIGITS};
use crate::numeric::digits::{digit_at, nonzero_from, strip_trailing, word_digits, BASE, LOG_BASE, POWS_TEN};
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};

/// Whether dropping the digits from the rounding digit `rd` onwards rounds
/// the kept digits up. `half` is half the radix, `sticky` marks a non-zero
/// digit after `rd` and `odd` the parity of the last kept digit.
pub(crate) fn rounds_up(rm: Rounding, negative: bool, rd: u32, half: u32, sticky: bool, odd: bool) -> bool {
    if rm.is_directed() {
        (rd != 0 || sticky)
            && (rm == Rounding::Up || rm == if negative { Rounding::Floor } else { Rounding::Ceil })
    } else {
        rd > half
            || rd == half
                && (rm == Rounding::HalfUp
                    || sticky
                    || rm == Rounding::HalfEven && odd
                    || rm == if negative { Rounding::HalfFloor } else { Rounding::HalfCeil })
    }
}

impl Finite {
    /// Round to `sd` significant digits in place.
    ///
    /// `truncated` marks digits already discarded beyond the stored ones, so
    /// an apparently exact tie or zero tail is treated as sticky.
    /// With `sd < 1` the result is zero or a single unit at `10^(e + 1 - sd)`.
    pub(crate) fn round(&mut self, sd: i64, rm: Rounding, truncated: bool) {
        let rd = digit_at(&self.digits, sd);
        let sticky = truncated || nonzero_from(&self.digits, sd + 1);

        let odd = digit_at(&self.digits, sd - 1) & 1 == 1;
        let round_up = rounds_up(rm, self.negative, rd, 5, sticky, odd);

        if sd < 1 || self.is_zero() {
            *self = if round_up {
                let unit = self.exponent.saturating_add(1).saturating_sub(sd);
                Finite::from_coefficient(self.negative, b"1", unit)
            } else {
                Finite::zero(self.negative)
            };
            return;
        }

        // Word and in-word position of the last kept digit
        let kept = sd - 1;
        let first_len = word_digits(self.digits[0]);
        let (word, pos) = if kept < first_len {
            (0usize, first_len - 1 - kept)
        } else {
            let rest = kept - first_len;
            ((rest / LOG_BASE) as usize + 1, LOG_BASE - 1 - rest % LOG_BASE)
        };

        if word >= self.digits.len() {
            if !round_up {
                return;
            }
            self.digits.resize(word + 1, 0);
        }

        let mut word_exponent = self.word_exponent();
        let unit = POWS_TEN[pos as usize];
        self.digits.truncate(word + 1);
        self.digits[word] = self.digits[word] / unit * unit;

        if round_up {
            self.digits[word] += unit;
            let mut i = word;
            while self.digits[i] >= BASE {
                self.digits[i] -= BASE;
                if i == 0 {
                    self.digits.insert(0, 1);
                    word_exponent += 1;
                    break;
                }
                i -= 1;
                self.digits[i] += 1;
            }
        }

        strip_trailing(&mut self.digits);
        let first = word_digits(self.digits[0]);
        self.exponent = word_exponent * LOG_BASE + first - 1;
    }
}

/// True when the digits from index `sd` onwards sit so close to a rounding
/// boundary that a result computed with a few guard digits may round the
/// wrong way and must be recomputed at higher precision.
///
/// Without `repeating` five digits are inspected. With it four digits are
/// inspected and a `true` flag marks a second attempt.
pub(crate) fn check_rounding_digits(
    x: &Decimal,
    sd: i64,
    rm: Rounding,
    repeating: Option<bool>,
) -> bool {
    let digits = match x.finite() {
        Some(x) => &x.digits,
        None => return false,
    };
    let read = |n: i64| (0..n).fold(0u32, |acc, i| acc * 10 + digit_at(digits, sd + i));

    match repeating {
        None => {
            let r = read(5);
            (rm.is_directed() && r == 99_999)
                || (!rm.is_directed() && r == 49_999)
                || r == 50_000
                || r == 0
        },
        Some(rep) => {
            let r = read(4);
            ((rep || rm.is_directed()) && r == 9_999) || (!rep && !rm.is_directed() && r == 4_999)
        },
    }
}

/// True when the leading `n` significand digits of both values agree.
pub(crate) fn leading_digits_equal(a: &Decimal, b: &Decimal, n: i64) -> bool {
    match (a.finite(), b.finite()) {
        (Some(a), Some(b)) => {
            let (a, b) = (a.coefficient(), b.coefficient());
            let n = n.max(0) as usize;
            a[..a.len().min(n)] == b[..b.len().min(n)]
        },
        _ => false,
    }
}

/// True when the 14 digits starting at index `from` are all nines.
pub(crate) fn fourteen_nines(x: &Decimal, from: i64) -> bool {
    match x.finite() {
        Some(x) => (0..14).all(|i| digit_at(&x.digits, from + i) == 9),
        None => false,
    }
}

// ============================================================================
// Rounding Operations
// ============================================================================

impl Context {
    /// Round to an integer using the context rounding mode.
    pub fn round(&self, x: &Decimal) -> Decimal {
        self.to_integer(x, self.rm)
    }

    /// Round towards +Infinity to an integer.
    pub fn ceil(&self, x: &Decimal) -> Decimal {
        self.to_integer(x, Rounding::Ceil)
    }

    /// Round towards -Infinity to an integer.
    pub fn floor(&self, x: &Decimal) -> Decimal {
        self.to_integer(x, Rounding::Floor)
    }

    /// Truncate to an integer.
    pub fn trunc(&self, x: &Decimal) -> Decimal {
        self.to_integer(x, Rounding::Down)
    }

    fn to_integer(&self, x: &Decimal, rm: Rounding) -> Decimal {
        match x.finite() {
            Some(f) => {
                let sd = f.exponent + 1;
                self.finalise(x.clone(), Some(sd), rm, false)
            },
            None => x.clone(),
        }
    }

    /// Round to `dp` decimal places.
    ///
    /// # Errors
    /// `InvalidArgument` if `dp` exceeds 1e9.
    pub fn to_decimal_places(
        &self,
        x: &Decimal,
        dp: u32,
        rm: Option<Rounding>,
    ) -> DecimalResult<Decimal> {
        if dp > MAX_DIGITS {
            return Err(DecimalError::invalid(dp));
        }
        let rm = rm.unwrap_or(self.rm);
        Ok(match x.finite() {
            Some(f) => {
                let sd = dp as i64 + f.exponent + 1;
                self.finalise(x.clone(), Some(sd), rm, false)
            },
            None => x.clone(),
        })
    }

    /// Round to `sd` significant digits.
    ///
    /// # Errors
    /// `InvalidArgument` unless `1 <= sd <= 1e9`.
    pub fn to_significant_digits(
        &self,
        x: &Decimal,
        sd: u32,
        rm: Option<Rounding>,
    ) -> DecimalResult<Decimal> {
        if sd < 1 || sd > MAX_DIGITS {
            return Err(DecimalError::invalid(sd));
        }
        let rm = rm.unwrap_or(self.rm);
        Ok(self.finalise(x.clone(), Some(sd as i64), rm, false))
    }

    /// Nearest multiple of `step` in the direction given by `rm`.
    ///
    /// A zero step gives zero with the sign of `x`; an infinite step gives
    /// Infinity with the sign of `x`.
    pub fn to_nearest(&self, x: &Decimal, step: &Decimal, rm: Option<Rounding>) -> Decimal {
        let rm = rm.unwrap_or(self.rm);
        if !x.is_finite() {
            return if step.is_nan() { Decimal::NaN } else { x.clone() };
        }
        match step {
            Decimal::NaN => Decimal::NaN,
            Decimal::Infinite { .. } => Decimal::infinity(x.is_negative()),
            Decimal::Finite(s) if s.is_zero() => Decimal::signed_zero(x.is_negative()),
            Decimal::Finite(_) => {
                let inner = self.internal();
                let q = inner.divide(x, step, 0, rm, true);
                self.finalise(inner.mul(&q, step), None, rm, false)
            },
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn rounded(s: &str, sd: i64, rm: Rounding) -> String {
        let mut x = d(s).finite().unwrap().clone();
        x.round(sd, rm, false);
        Decimal::Finite(x).to_string()
    }

    #[test]
    fn test_round_mode_table() {
        use Rounding::*;
        let cases = [
            ("5.5", ["6", "5", "6", "5", "6", "5", "6", "6", "5"]),
            ("2.5", ["3", "2", "3", "2", "3", "2", "2", "3", "2"]),
            ("1.6", ["2", "1", "2", "1", "2", "2", "2", "2", "2"]),
            ("1.1", ["2", "1", "2", "1", "1", "1", "1", "1", "1"]),
            ("-1.1", ["-2", "-1", "-1", "-2", "-1", "-1", "-1", "-1", "-1"]),
            ("-2.5", ["-3", "-2", "-2", "-3", "-3", "-2", "-2", "-2", "-3"]),
        ];
        for (input, expected) in cases {
            for (rm, want) in [Up, Down, Ceil, Floor, HalfUp, HalfDown, HalfEven, HalfCeil, HalfFloor]
                .into_iter()
                .zip(expected)
            {
                assert_eq!(rounded(input, 1, rm), want, "{} under {}", input, rm);
            }
        }
    }

    #[test]
    fn test_round_carry_across_words() {
        assert_eq!(rounded("9999999.9", 7, Rounding::HalfUp), "10000000");
        assert_eq!(rounded("99999999999999.5", 14, Rounding::HalfUp), "100000000000000");
        assert_eq!(rounded("0.000123456789", 3, Rounding::Down), "0.000123");
        assert_eq!(rounded("123456789", 2, Rounding::HalfEven), "120000000");
    }

    #[test]
    fn test_round_below_one_digit() {
        assert_eq!(rounded("0.5", 0, Rounding::HalfUp), "1");
        assert_eq!(rounded("0.4", 0, Rounding::HalfUp), "0");
        assert_eq!(rounded("0.004", -1, Rounding::Up), "0.1");

        let mut x = d("-0.3").finite().unwrap().clone();
        x.round(0, Rounding::Down, false);
        assert!(x.is_zero() && x.negative);
    }

    #[test]
    fn test_round_truncated_is_sticky() {
        let mut x = d("2.5").finite().unwrap().clone();
        x.round(1, Rounding::HalfEven, true);
        assert_eq!(Decimal::Finite(x).to_string(), "3");

        let mut y = d("2").finite().unwrap().clone();
        y.round(1, Rounding::Up, true);
        assert_eq!(Decimal::Finite(y).to_string(), "3");
    }

    #[test]
    fn test_check_rounding_digits() {
        let x = d("1.2349999");
        assert!(check_rounding_digits(&x, 3, Rounding::HalfUp, None));
        assert!(!check_rounding_digits(&x, 3, Rounding::Down, None));
        assert!(check_rounding_digits(&d("1.23"), 3, Rounding::Down, None));
        assert!(check_rounding_digits(&d("1.2399999"), 3, Rounding::Up, Some(false)));
        assert!(!check_rounding_digits(&d("1.234999"), 3, Rounding::HalfUp, Some(true)));
    }

    #[test]
    fn test_integer_rounding() {
        let ctx = Context::default();
        assert_eq!(ctx.round(&d("2.5")).to_string(), "3");
        assert_eq!(ctx.ceil(&d("-1.5")).to_string(), "-1");
        assert_eq!(ctx.floor(&d("-1.5")).to_string(), "-2");
        assert_eq!(ctx.trunc(&d("-1.9")).to_string(), "-1");
        assert!(ctx.round(&Decimal::NaN).is_nan());

        let z = ctx.ceil(&d("-0.5"));
        assert!(z.is_zero() && z.is_negative());
    }

    #[test]
    fn test_decimal_places_and_significant_digits() {
        let ctx = Context::default();
        let x = d("12.3456");
        assert_eq!(ctx.to_decimal_places(&x, 2, None).unwrap().to_string(), "12.35");
        assert_eq!(
            ctx.to_decimal_places(&x, 2, Some(Rounding::Down)).unwrap().to_string(),
            "12.34"
        );
        assert_eq!(ctx.to_significant_digits(&x, 3, None).unwrap().to_string(), "12.3");
        assert!(ctx.to_significant_digits(&x, 0, None).is_err());
        assert!(ctx.to_decimal_places(&x, 1_000_000_001, None).is_err());
    }

    #[test]
    fn test_to_nearest() {
        let ctx = Context::default();
        assert_eq!(ctx.to_nearest(&d("37.2"), &d("5"), None).to_string(), "35");
        assert_eq!(
            ctx.to_nearest(&d("1.39"), &d("0.25"), Some(Rounding::Up)).to_string(),
            "1.5"
        );
        assert_eq!(ctx.to_nearest(&d("-7"), &d("0"), None).to_string(), "-0");
        assert_eq!(
            ctx.to_nearest(&d("3"), &Decimal::infinity(false), None),
            Decimal::infinity(false)
        );
        assert!(ctx.to_nearest(&d("3"), &Decimal::NaN, None).is_nan());
    }
}
