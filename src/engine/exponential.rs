// ============================================================================
// Exponentials and Logarithms
// exp, ln, log and pow with guard digits and boundary re-evaluation
// ============================================================================
//
// Series are summed in internal mode with a few guard digits. When the
// digits just past the requested precision sit on a rounding boundary the
// evaluation is repeated at higher precision so the final rounding is
// correct in every mode.

use super::context::Context;
use super::rounding::{check_rounding_digits, fourteen_nines, leading_digits_equal};
use crate::domain::Rounding;
use crate::numeric::constants;
use crate::numeric::digits::LOG_BASE;
use crate::numeric::{Decimal, DecimalResult, Finite};
use std::f64::consts::{LN_10, LN_2};

/// Largest integer exponent evaluated by repeated squaring.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Magnitude of the exponent beyond which ln splits off `e × ln(10)`.
const LN_SPLIT_EXPONENT: i64 = 1_500_000_000_000_000;

/// `x^y` in binary floating point with the conventions used for special
/// values: a NaN exponent is NaN, a zero exponent is 1, and `(±1)^±∞` is NaN.
fn float_pow(x: f64, y: f64) -> f64 {
    if y.is_nan() {
        return f64::NAN;
    }
    if y == 0.0 {
        return 1.0;
    }
    if x.is_nan() || (x.abs() == 1.0 && y.is_infinite()) {
        return f64::NAN;
    }
    x.powf(y)
}

/// Keep at most `k` words, reporting whether anything was dropped.
pub(crate) fn truncate_words(x: &mut Decimal, k: usize) -> bool {
    match x {
        Decimal::Finite(f) if f.digits.len() > k => {
            f.digits.truncate(k);
            crate::numeric::digits::strip_trailing(&mut f.digits);
            true
        },
        _ => false,
    }
}

impl Context {
    // ========================================================================
    // Natural Exponential
    // ========================================================================

    /// `e^x`.
    pub fn exp(&self, x: &Decimal) -> Decimal {
        self.natural_exponential(x, None)
    }

    /// `e^x` by Taylor series after halving the argument `k` times and
    /// squaring the sum back. With `sd` the unrounded sum at `sd` digits
    /// plus guard digits is returned.
    pub(crate) fn natural_exponential(&self, x: &Decimal, sd: Option<i64>) -> Decimal {
        let xf = match x {
            Decimal::NaN => return Decimal::NaN,
            Decimal::Infinite { negative: true } => return Decimal::zero(),
            Decimal::Infinite { negative: false } => return x.clone(),
            Decimal::Finite(f) if f.is_zero() => return Decimal::one(),
            Decimal::Finite(f) if f.exponent > 17 => {
                return if f.negative { Decimal::zero() } else { Decimal::infinity(false) };
            },
            Decimal::Finite(f) => f,
        };

        let (pr, rm) = (self.pr, self.rm);
        let inner = self.internal();
        let one = Decimal::one();
        let halving = Decimal::from_scaled(false, 3125, -5);

        let mut x = Decimal::Finite(xf.clone());
        let mut k = 0i64;
        while x.exponent().map_or(false, |e| e > -2) {
            x = inner.mul(&x, &halving);
            k += 5;
        }

        let guard = ((k as f64) * LN_2 / LN_10 * 2.0 + 5.0) as i64;
        let mut wpr = sd.unwrap_or(pr) + guard;
        let mut rep = 0;
        let mut pow = one.clone();
        let mut denominator = one.clone();
        let mut sum = one.clone();
        let mut i = 0i64;

        loop {
            pow = inner.finalise(inner.mul(&pow, &x), Some(wpr), Rounding::Down, false);
            i += 1;
            denominator = inner.mul(&denominator, &Decimal::from(i));
            let t = inner.add(&sum, &inner.divide(&pow, &denominator, wpr, Rounding::Down, false));

            if leading_digits_equal(&t, &sum, wpr) {
                for _ in 0..k {
                    sum = inner.finalise(inner.mul(&sum, &sum), Some(wpr), Rounding::Down, false);
                }

                if sd.is_some() {
                    return sum;
                }
                if rep < 3 && check_rounding_digits(&sum, wpr - guard, rm, Some(rep > 0)) {
                    tracing::trace!(wpr, rep, "exp result near rounding boundary, retrying");
                    wpr += 10;
                    pow = one.clone();
                    denominator = one.clone();
                    sum = one.clone();
                    i = 0;
                    rep += 1;
                    continue;
                }
                return self.finalise(sum, Some(pr), rm, true);
            }
            sum = t;
        }
    }

    // ========================================================================
    // Natural Logarithm
    // ========================================================================

    /// `ln(x)`. NaN for negative arguments, `-Infinity` for either zero.
    ///
    /// # Errors
    /// `PrecisionLimitExceeded` when the argument's exponent needs more
    /// digits of ln(10) than are stored.
    pub fn ln(&self, x: &Decimal) -> DecimalResult<Decimal> {
        self.natural_logarithm(x, None)
    }

    /// `ln(y)` by the atanh series on a reduced argument in `[0.7, 1.4)`.
    /// With `sd` the unrounded result with guard digits is returned.
    pub(crate) fn natural_logarithm(&self, y: &Decimal, sd: Option<i64>) -> DecimalResult<Decimal> {
        let yf = match y {
            Decimal::NaN | Decimal::Infinite { negative: true } => return Ok(Decimal::NaN),
            Decimal::Infinite { negative: false } => return Ok(y.clone()),
            Decimal::Finite(f) if f.is_zero() => return Ok(Decimal::infinity(true)),
            Decimal::Finite(f) if f.negative => return Ok(Decimal::NaN),
            Decimal::Finite(f) if f.exponent == 0 && f.digits.as_slice() == [1] => {
                return Ok(Decimal::zero())
            },
            Decimal::Finite(f) => f,
        };

        let (pr, rm) = (self.pr, self.rm);
        let guard = 10;
        let inner = self.internal();
        let one = Decimal::one();
        let two = Decimal::from(2);
        let mut wpr = sd.unwrap_or(pr) + guard;

        if yf.exponent.abs() >= LN_SPLIT_EXPONENT {
            // ln(m × 10^e) = ln(m) + e × ln(10)
            let coefficient = yf.coefficient();
            let m = Decimal::Finite(Finite::from_coefficient(false, coefficient.as_bytes(), 0));
            let t = inner.mul(&constants::ln10(wpr + 2)?, &Decimal::from(yf.exponent));
            let x = inner.add(&inner.natural_logarithm(&m, Some(wpr - guard))?, &t);
            return Ok(match sd {
                Some(_) => x,
                None => self.finalise(x, Some(pr), rm, true),
            });
        }

        // Raise y to the power n until its leading digits fall in 7..13
        let leading = |x: &Finite| {
            let c = x.coefficient();
            let mut digits = c.bytes().map(|b| (b - b'0') as u32);
            let c0 = digits.next().unwrap_or(0);
            let c1 = digits.next().unwrap_or(0);
            (c, c0, c1)
        };
        let mut x = yf.clone();
        let mut n = 1i64;
        let (mut c, mut c0, mut c1) = leading(&x);
        while (c0 < 7 && c0 != 1) || (c0 == 1 && c1 > 3) {
            x = match inner.mul(&Decimal::Finite(x), y) {
                Decimal::Finite(f) => f,
                _ => return Ok(Decimal::NaN),
            };
            (c, c0, c1) = leading(&x);
            n += 1;
        }

        let mut e = x.exponent;
        let x1 = if c0 > 1 {
            e += 1;
            Finite::from_coefficient(false, c.as_bytes(), -1)
        } else {
            Finite::from_coefficient(false, c.as_bytes(), 0)
        };
        let x1 = Decimal::Finite(x1);

        let ratio = |wpr: i64| {
            inner.divide(&inner.sub(&x1, &one), &inner.add(&x1, &one), wpr, Rounding::Down, false)
        };
        let mut x = ratio(wpr);
        let mut sum = x.clone();
        let mut numerator = x.clone();
        let mut x2 = inner.finalise(inner.mul(&x, &x), Some(wpr), Rounding::Down, false);
        let mut denominator = 3i64;
        let mut rep = false;

        loop {
            numerator = inner.finalise(inner.mul(&numerator, &x2), Some(wpr), Rounding::Down, false);
            let t = inner.add(
                &sum,
                &inner.divide(&numerator, &Decimal::from(denominator), wpr, Rounding::Down, false),
            );

            if leading_digits_equal(&t, &sum, wpr) {
                sum = inner.mul(&sum, &two);
                if e != 0 {
                    let shift = inner.mul(&constants::ln10(wpr + 2)?, &Decimal::from(e));
                    sum = inner.add(&sum, &shift);
                }
                sum = inner.divide(&sum, &Decimal::from(n), wpr, Rounding::Down, false);

                if sd.is_some() {
                    return Ok(sum);
                }
                if check_rounding_digits(&sum, wpr - guard, rm, rep.then_some(true)) {
                    tracing::trace!(wpr, "ln result near rounding boundary, retrying");
                    wpr += guard;
                    x = ratio(wpr);
                    numerator = x.clone();
                    x2 = inner.finalise(inner.mul(&x, &x), Some(wpr), Rounding::Down, false);
                    sum = x.clone();
                    denominator = 3;
                    rep = true;
                    continue;
                }
                return Ok(self.finalise(sum, Some(pr), rm, true));
            }

            sum = t;
            denominator += 2;
        }
    }

    // ========================================================================
    // Logarithms
    // ========================================================================

    /// Logarithm of `x` to `base`.
    ///
    /// NaN for a negative, zero, one or non-finite base and for negative `x`.
    /// Either zero gives `-Infinity`.
    ///
    /// # Errors
    /// `PrecisionLimitExceeded` if base 10 needs more digits of ln(10)
    /// than are stored.
    pub fn log(&self, x: &Decimal, base: &Decimal) -> DecimalResult<Decimal> {
        self.logarithm(x, Some(base))
    }

    /// Base-2 logarithm.
    pub fn log2(&self, x: &Decimal) -> DecimalResult<Decimal> {
        self.logarithm(x, Some(&Decimal::from(2)))
    }

    /// Base-10 logarithm. Exact for powers of ten.
    pub fn log10(&self, x: &Decimal) -> DecimalResult<Decimal> {
        self.logarithm(x, None)
    }

    fn logarithm(&self, arg: &Decimal, base: Option<&Decimal>) -> DecimalResult<Decimal> {
        let (pr, rm) = (self.pr, self.rm);
        let guard = 5;
        let one = Decimal::one();
        let ten = Decimal::from(10);

        let (base, is_base10) = match base {
            None => (ten, true),
            Some(b) => {
                if !b.is_finite() || b.is_negative() || b.is_zero() || *b == one {
                    return Ok(Decimal::NaN);
                }
                let is_base10 = *b == ten;
                (b.clone(), is_base10)
            },
        };

        let af = match arg {
            Decimal::NaN | Decimal::Infinite { negative: true } => return Ok(Decimal::NaN),
            Decimal::Infinite { negative: false } => return Ok(arg.clone()),
            Decimal::Finite(f) if f.is_zero() => return Ok(Decimal::infinity(true)),
            Decimal::Finite(f) if f.negative => return Ok(Decimal::NaN),
            Decimal::Finite(_) if *arg == one => return Ok(Decimal::zero()),
            Decimal::Finite(f) => f,
        };

        // A base-10 result is either exact or irrational: powers of ten
        // never sit on a rounding boundary.
        let inexact = if is_base10 {
            af.digits.len() > 1 || {
                let mut w = af.digits[0];
                while w % 10 == 0 {
                    w /= 10;
                }
                w != 1
            }
        } else {
            false
        };

        let inner = self.internal();
        let ratio = |sd: i64| -> DecimalResult<Decimal> {
            let num = inner.natural_logarithm(arg, Some(sd))?;
            let den = if is_base10 {
                constants::ln10(sd + 10)?
            } else {
                inner.natural_logarithm(&base, Some(sd))?
            };
            Ok(inner.divide(&num, &den, sd, Rounding::Down, false))
        };

        let mut sd = pr + guard;
        let mut r = ratio(sd)?;
        let mut k = pr;

        if check_rounding_digits(&r, k, rm, None) {
            loop {
                sd += 10;
                r = ratio(sd)?;
                if !inexact {
                    if fourteen_nines(&r, k + 1) {
                        r = inner.finalise(r, Some(pr + 1), Rounding::Up, false);
                    }
                    break;
                }
                k += 10;
                if !check_rounding_digits(&r, k, rm, None) {
                    break;
                }
            }
        }

        Ok(self.finalise(r, Some(pr), rm, false))
    }

    // ========================================================================
    // Power
    // ========================================================================

    /// `x^y`.
    ///
    /// Integer exponents use exponentiation by squaring; other exponents
    /// evaluate `exp(y × ln(x))`. Special values follow IEEE 754 `pow`.
    ///
    /// # Errors
    /// `PrecisionLimitExceeded` if the logarithm needs more digits of
    /// ln(10) than are stored.
    pub fn pow(&self, x: &Decimal, y: &Decimal) -> DecimalResult<Decimal> {
        let yn = y.to_f64();
        let (xf, yf) = match (x, y) {
            (Decimal::Finite(a), Decimal::Finite(b)) if !a.is_zero() && !b.is_zero() => (a, b),
            _ => return Ok(Decimal::from(float_pow(x.to_f64(), yn))),
        };

        let one = Decimal::one();
        if *x == one {
            return Ok(x.clone());
        }
        let (pr, rm) = (self.pr, self.rm);
        if *y == one {
            return Ok(self.finalise(x.clone(), Some(pr), rm, false));
        }

        let e = yf.word_exponent();
        let k = yn.abs();
        if yf.is_integer() && k <= MAX_SAFE_INTEGER {
            let r = self.int_pow(x, k as u64, pr);
            return Ok(if yf.negative {
                self.div(&one, &r)
            } else {
                self.finalise(r, Some(pr), rm, false)
            });
        }

        let mut negative = xf.negative;
        if negative {
            if !yf.is_integer() {
                return Ok(Decimal::NaN);
            }
            if yf.digits.get(e as usize).map_or(true, |w| w & 1 == 0) {
                negative = false;
            }
            if xf.exponent == 0 && xf.digits.as_slice() == [1] {
                return Ok(Decimal::one().with_sign(negative));
            }
        }

        // Estimate the result exponent to catch overflow and underflow early
        let estimate = float_pow(x.to_f64(), yn);
        let e = if estimate == 0.0 || !estimate.is_finite() {
            let m: f64 = format!("0.{}", xf.coefficient()).parse().unwrap_or(1.0);
            (yn * (m.ln() / LN_10 + xf.exponent as f64 + 1.0)).floor() as i64
        } else {
            Decimal::from(estimate).exponent().unwrap_or(0)
        };

        let config = self.config();
        if e > config.max_e + 1 || e < config.min_e - 1 {
            return Ok(if e > 0 {
                Decimal::infinity(negative)
            } else {
                Decimal::signed_zero(negative)
            });
        }

        let inner = self.internal().working(pr, Rounding::Down);
        let xa = Decimal::Finite(xf.abs());
        let k = (e.to_string().len() as i64).min(12);
        let evaluate = |sd: i64| -> DecimalResult<Decimal> {
            let ln = inner.natural_logarithm(&xa, Some(sd + k))?;
            Ok(inner.natural_exponential(&inner.mul(y, &ln), Some(sd)))
        };

        let mut r = evaluate(pr)?;
        if r.is_finite() {
            r = inner.finalise(r, Some(pr + 5), Rounding::Down, false);
            if check_rounding_digits(&r, pr, rm, None) {
                let sd = pr + 10;
                r = inner.finalise(evaluate(sd)?, Some(sd + 5), Rounding::Down, false);
                if fourteen_nines(&r, pr + 1) {
                    r = inner.finalise(r, Some(pr + 1), Rounding::Up, false);
                }
            }
        }

        Ok(self.finalise(r.with_sign(negative), Some(pr), rm, false))
    }

    /// `x^n` by repeated squaring, keeping enough words for `pr` digits.
    /// A truncated result gets a non-zero final word so that later
    /// rounding sees the discarded digits.
    pub(crate) fn int_pow(&self, x: &Decimal, n: u64, pr: i64) -> Decimal {
        let inner = self.internal();
        let k = (pr as f64 / LOG_BASE as f64 + 4.0).ceil() as usize;
        let mut r = Decimal::one();
        let mut x = x.clone();
        let mut n = n;
        let mut truncated = false;

        loop {
            if n % 2 == 1 {
                r = inner.mul(&r, &x);
                truncated |= truncate_words(&mut r, k);
            }
            n /= 2;
            if n == 0 {
                break;
            }
            x = inner.mul(&x, &x);
            truncate_words(&mut x, k);
        }

        if truncated {
            if let Decimal::Finite(f) = &mut r {
                if f.digits.len() < k {
                    f.digits.resize(k, 0);
                    f.digits[k - 1] = 1;
                }
            }
        }
        r
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Config;
    use crate::numeric::DecimalError;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn ctx_with(precision: u32) -> Context {
        let mut ctx = Context::default();
        ctx.set_precision(precision).unwrap();
        ctx
    }

    #[test]
    fn test_exp() {
        let ctx = Context::default();
        assert_eq!(ctx.exp(&d("1")).to_string(), "2.7182818284590452354");
        assert_eq!(ctx.exp(&d("-1")).to_string(), "0.3678794411714423216");
        assert_eq!(ctx.exp(&d("0")).to_string(), "1");
        assert_eq!(ctx_with(10).exp(&d("10")).to_string(), "22026.46579");
        assert_eq!(ctx.exp(&d("1e18")), Decimal::infinity(false));
        assert!(ctx.exp(&d("-1e18")).is_zero());
        assert!(ctx.exp(&Decimal::infinity(true)).is_zero());
    }

    #[test]
    fn test_ln() {
        let ctx = Context::default();
        assert_eq!(ctx.ln(&d("2")).unwrap().to_string(), "0.69314718055994530942");
        assert_eq!(ctx.ln(&d("10")).unwrap().to_string(), "2.302585092994045684");
        assert_eq!(ctx_with(10).ln(&d("0.5")).unwrap().to_string(), "-0.6931471806");
        assert_eq!(ctx.ln(&d("1")).unwrap().to_string(), "0");
        assert_eq!(ctx.ln(&d("-0")).unwrap(), Decimal::infinity(true));
        assert!(ctx.ln(&d("-1")).unwrap().is_nan());
    }

    #[test]
    fn test_ln_huge_exponent() {
        let ctx = ctx_with(10);
        assert_eq!(ctx.ln(&d("1e2000000000000000")).unwrap().to_string(), "4.605170186e+15");
    }

    #[test]
    fn test_log() {
        let ctx = Context::default();
        assert_eq!(ctx.log10(&d("1000")).unwrap().to_string(), "3");
        assert_eq!(ctx.log10(&d("0.001")).unwrap().to_string(), "-3");
        assert_eq!(ctx.log2(&d("8")).unwrap().to_string(), "3");
        assert_eq!(ctx.log2(&d("1024")).unwrap().to_string(), "10");
        assert_eq!(ctx.log(&d("8"), &d("4")).unwrap().to_string(), "1.5");
        assert_eq!(ctx_with(10).log10(&d("2")).unwrap().to_string(), "0.3010299957");
    }

    #[test]
    fn test_log_special_values() {
        let ctx = Context::default();
        assert!(ctx.log(&d("8"), &d("1")).unwrap().is_nan());
        assert!(ctx.log(&d("8"), &d("-2")).unwrap().is_nan());
        assert!(ctx.log(&d("8"), &Decimal::infinity(false)).unwrap().is_nan());
        assert_eq!(ctx.log10(&d("0")).unwrap(), Decimal::infinity(true));
        assert_eq!(ctx.log10(&Decimal::infinity(false)).unwrap(), Decimal::infinity(false));
        assert!(ctx.log10(&d("-5")).unwrap().is_nan());
    }

    #[test]
    fn test_pow_integer_exponent() {
        let ctx = Context::default();
        assert_eq!(ctx.pow(&d("2"), &d("10")).unwrap().to_string(), "1024");
        assert_eq!(ctx.pow(&d("-2"), &d("3")).unwrap().to_string(), "-8");
        assert_eq!(ctx.pow(&d("2"), &d("-2")).unwrap().to_string(), "0.25");
        assert_eq!(ctx.pow(&d("1.1"), &d("2")).unwrap().to_string(), "1.21");
        assert_eq!(
            ctx.pow(&d("3"), &d("100")).unwrap().to_string(),
            "5.1537752073201133104e+47"
        );
    }

    #[test]
    fn test_pow_fractional_exponent() {
        let ctx = ctx_with(10);
        assert_eq!(ctx.pow(&d("2"), &d("0.5")).unwrap().to_string(), "1.414213562");
        assert_eq!(ctx.pow(&d("27"), &d("0.3333333333")).unwrap().to_string(), "3");
        assert!(ctx.pow(&d("-8"), &d("0.5")).unwrap().is_nan());
        assert_eq!(ctx.pow(&d("4"), &d("1.5")).unwrap().to_string(), "8");
    }

    #[test]
    fn test_pow_special_values() {
        let ctx = Context::default();
        let inf = Decimal::infinity(false);
        let ninf = Decimal::infinity(true);
        assert_eq!(ctx.pow(&d("0"), &d("0")).unwrap().to_string(), "1");
        assert_eq!(ctx.pow(&Decimal::NaN, &d("0")).unwrap().to_string(), "1");
        assert!(ctx.pow(&d("1"), &Decimal::NaN).unwrap().is_nan());
        assert_eq!(ctx.pow(&ninf, &d("3")).unwrap(), ninf);
        assert_eq!(ctx.pow(&ninf, &d("2")).unwrap(), inf);
        assert_eq!(ctx.pow(&d("0"), &d("-1")).unwrap(), inf);
        assert_eq!(ctx.pow(&d("-0"), &d("-3")).unwrap(), ninf);
        assert!(ctx.pow(&d("-1"), &inf).unwrap().is_nan());
        assert!(ctx.pow(&d("0.5"), &inf).unwrap().is_zero());
    }

    #[test]
    fn test_pow_overflow_underflow() {
        let ctx = Context::new(Config::new().with_exponent_bounds(-100, 100)).unwrap();
        assert_eq!(ctx.pow(&d("10"), &d("200.5")).unwrap(), Decimal::infinity(false));
        assert!(ctx.pow(&d("10"), &d("-200.5")).unwrap().is_zero());
        assert_eq!(ctx.pow(&d("10"), &d("200")).unwrap(), Decimal::infinity(false));
    }

    #[test]
    fn test_int_pow_sticky_word() {
        let ctx = Context::default();
        let r = ctx.int_pow(&d("3"), 100, 5);
        let f = r.finite().unwrap();
        assert!(f.digits.len() <= 5);
        assert_eq!(ctx_with(5).round_working(r).to_string(), "5.1538e+47");
    }

    #[test]
    fn test_precision_limit_propagates() {
        let ctx = ctx_with(1100);
        assert_eq!(ctx.ln(&d("2")), Err(DecimalError::PrecisionLimitExceeded));
    }
}
