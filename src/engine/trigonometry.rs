// ============================================================================
// Trigonometry
// sin, cos, tan and their inverses by argument reduction and Taylor series
// ============================================================================

use super::context::Context;
use super::exponential::truncate_words;
use crate::domain::Rounding;
use crate::numeric::constants::{self, PI_PRECISION};
use crate::numeric::digits::LOG_BASE;
use crate::numeric::{Decimal, DecimalResult};
use std::cmp::Ordering;

/// Whether the first `k + 1` words of `a` and `b` match, with `a` holding
/// at least that many words.
pub(crate) fn leading_words_equal(a: &Decimal, b: &Decimal, k: usize) -> bool {
    match (a.finite(), b.finite()) {
        (Some(a), Some(b)) => {
            a.digits.len() > k && b.digits.len() > k && a.digits[..=k] == b.digits[..=k]
        },
        _ => false,
    }
}

fn at_most(a: &Decimal, b: &Decimal) -> bool {
    matches!(a.cmp(b), Some(Ordering::Less | Ordering::Equal))
}

fn half() -> Decimal {
    Decimal::from_scaled(false, 5, -1)
}

impl Context {
    // ========================================================================
    // Series Kernels
    // ========================================================================

    /// Alternating (or, for the hyperbolic functions, all-positive) series
    /// `y ± y·x²/(n(n+1)) + ...` summed at the working precision.
    ///
    /// Terms are truncated to `pr` digits; the sum stops once its leading
    /// `ceil(pr / 7) + 1` words are stable and is cut to that length.
    pub(crate) fn taylor_series(&self, mut n: u64, x: &Decimal, y: Decimal, hyperbolic: bool) -> Decimal {
        let pr = self.pr;
        let k = ((pr + LOG_BASE - 1) / LOG_BASE) as usize;
        let inner = self.internal();
        let x2 = inner.mul(x, x);

        let mut term = y.clone();
        let mut sum = y;
        loop {
            let t = inner.divide(&inner.mul(&term, &x2), &Decimal::from(n * (n + 1)), pr, Rounding::Down, false);
            n += 2;
            let partial = if hyperbolic { inner.add(&sum, &t) } else { inner.sub(&sum, &t) };
            term = inner.divide(&inner.mul(&t, &x2), &Decimal::from(n * (n + 1)), pr, Rounding::Down, false);
            n += 2;

            let mut next = inner.add(&partial, &term);
            if leading_words_equal(&next, &partial, k) {
                truncate_words(&mut next, k + 1);
                return next;
            }
            sum = next;
        }
    }

    /// `sin(x)` (or `sinh(x)`) after `k` uses of the quintuple-angle
    /// identity `sin(5x) = 16sin⁵x − 20sin³x + 5sin x`.
    pub(crate) fn sine(&self, x: &Decimal, hyperbolic: bool) -> Decimal {
        let len = match x.finite() {
            Some(f) if !f.is_zero() => f.digits.len(),
            _ => return x.clone(),
        };
        if len < 3 {
            return self.taylor_series(2, x, x.clone(), hyperbolic);
        }

        let k = ((1.4 * (len as f64).sqrt()) as u32).min(16);
        let x = self.mul(x, &Decimal::from_scaled(false, 2u128.pow(k), -(k as i64)));
        let mut s = self.taylor_series(2, &x, x.clone(), hyperbolic);

        let (five, sixteen, twenty) = (Decimal::from(5), Decimal::from(16), Decimal::from(20));
        for _ in 0..k {
            let s2 = self.mul(&s, &s);
            let sixteen_s2 = self.mul(&sixteen, &s2);
            let inner = if hyperbolic { self.add(&sixteen_s2, &twenty) } else { self.sub(&sixteen_s2, &twenty) };
            s = self.mul(&s, &self.add(&five, &self.mul(&s2, &inner)));
        }
        s
    }

    /// `cos(x)` after `k` uses of `cos(4x) = 8(cos⁴x − cos²x) + 1`.
    fn cosine(&self, x: &Decimal) -> Decimal {
        let len = match x.finite() {
            Some(f) if !f.is_zero() => f.digits.len(),
            _ => return Decimal::one(),
        };

        let k = if len < 32 { (len + 2) / 3 } else { 16 };
        let quarter_power = Decimal::from_scaled(false, 5u128.pow(2 * k as u32), -2 * k as i64);
        let ctx = self.working(self.pr + k as i64, self.rm);

        let mut c = ctx.taylor_series(1, &ctx.mul(x, &quarter_power), Decimal::one(), false);
        let (one, eight) = (Decimal::one(), Decimal::from(8));
        for _ in 0..k {
            let c2 = ctx.mul(&c, &c);
            c = ctx.add(&ctx.mul(&ctx.sub(&ctx.mul(&c2, &c2), &c2), &eight), &one);
        }
        c
    }

    /// Reduce `|x|` into `[0, π/2]`, returning the reduced value and the
    /// quadrant (1 to 4) of `x`.
    pub(crate) fn to_less_than_half_pi(&self, x: &Decimal) -> DecimalResult<(Decimal, u8)> {
        let negative = x.is_negative();
        let pi = constants::pi(self.pr, Rounding::Down)?;
        let half_pi = self.mul(&pi, &half());
        let x = x.abs();

        if at_most(&x, &half_pi) {
            return Ok((x, if negative { 4 } else { 1 }));
        }

        let t = self.div_to_int(&x, &pi);
        let (x, quadrant) = if t.is_zero() {
            (x, if negative { 3 } else { 2 })
        } else {
            let r = self.sub(&x, &self.mul(&t, &pi));
            let odd = t.is_odd_integer();
            if at_most(&r, &half_pi) {
                let quadrant = match (odd, negative) {
                    (true, true) => 2,
                    (true, false) => 3,
                    (false, true) => 4,
                    (false, false) => 1,
                };
                return Ok((r, quadrant));
            }
            let quadrant = match (odd, negative) {
                (true, true) => 1,
                (true, false) => 4,
                (false, true) => 3,
                (false, false) => 2,
            };
            (r, quadrant)
        };
        Ok((self.sub(&x, &pi).abs(), quadrant))
    }

    // ========================================================================
    // Forward Functions
    // ========================================================================

    fn working_for_reduction(&self, x: &Decimal) -> Context {
        let extra = x.finite().map_or(0, |f| f.exponent.max(f.sd()));
        self.working(self.pr + extra + LOG_BASE, Rounding::Down)
    }

    fn sine_with_quadrant(&self, x: &Decimal) -> DecimalResult<(Decimal, u8)> {
        match x {
            Decimal::Finite(f) if f.is_zero() => return Ok((x.clone(), 1)),
            Decimal::Finite(_) => {},
            _ => return Ok((Decimal::NaN, 1)),
        }
        let ctx = self.working_for_reduction(x);
        let (r, quadrant) = ctx.to_less_than_half_pi(x)?;
        let s = ctx.sine(&r, false);
        let s = if quadrant > 2 { s.negated() } else { s };
        Ok((self.finalise(s, Some(self.pr), self.rm, true), quadrant))
    }

    /// Sine of `x` radians.
    ///
    /// # Errors
    /// `PrecisionLimitExceeded` when the reduction needs more digits of π
    /// than are stored.
    pub fn sin(&self, x: &Decimal) -> DecimalResult<Decimal> {
        Ok(self.sine_with_quadrant(x)?.0)
    }

    /// Cosine of `x` radians.
    pub fn cos(&self, x: &Decimal) -> DecimalResult<Decimal> {
        match x {
            Decimal::Finite(f) if f.is_zero() => return Ok(Decimal::one()),
            Decimal::Finite(_) => {},
            _ => return Ok(Decimal::NaN),
        }
        let ctx = self.working_for_reduction(x);
        let (r, quadrant) = ctx.to_less_than_half_pi(x)?;
        let c = ctx.cosine(&r);
        let c = if quadrant == 2 || quadrant == 3 { c.negated() } else { c };
        Ok(self.finalise(c, Some(self.pr), self.rm, true))
    }

    /// Tangent of `x` radians, as `|sin x| / sqrt(1 - sin²x)` signed by
    /// quadrant.
    pub fn tan(&self, x: &Decimal) -> DecimalResult<Decimal> {
        match x {
            Decimal::Finite(f) if f.is_zero() => return Ok(x.clone()),
            Decimal::Finite(_) => {},
            _ => return Ok(Decimal::NaN),
        }
        let wpr = self.pr + 10;
        let ctx = self.working(wpr, Rounding::Down);
        let (s, quadrant) = ctx.sine_with_quadrant(x)?;
        let s = s.abs();

        let c = ctx.sqrt(&ctx.sub(&Decimal::one(), &ctx.mul(&s, &s)));
        let t = ctx.divide(&s, &c, wpr, Rounding::Up, false);
        let t = if quadrant == 2 || quadrant == 4 { t.negated() } else { t };
        Ok(self.finalise(t, Some(self.pr), self.rm, true))
    }

    // ========================================================================
    // Inverse Functions
    // ========================================================================

    /// Arcsine in `[-π/2, π/2]`; NaN outside `[-1, 1]`.
    pub fn asin(&self, x: &Decimal) -> DecimalResult<Decimal> {
        if x.is_zero() {
            return Ok(x.clone());
        }
        let one = Decimal::one();
        match x.abs().cmp(&one) {
            Some(Ordering::Less) => {},
            Some(Ordering::Equal) => {
                let half_pi = self.mul(&constants::pi(self.pr + 4, self.rm)?, &half());
                return Ok(half_pi.with_sign(x.is_negative()));
            },
            _ => return Ok(Decimal::NaN),
        }

        // asin(x) = 2·atan(x / (1 + sqrt(1 - x²)))
        let ctx = self.working(self.pr + 6, Rounding::Down);
        let denominator = ctx.add(&ctx.sqrt(&ctx.sub(&one, &ctx.mul(x, x))), &one);
        let r = ctx.atan(&ctx.div(x, &denominator))?;
        Ok(self.mul(&r, &Decimal::from(2)))
    }

    /// Arccosine in `[0, π]`; NaN outside `[-1, 1]`.
    pub fn acos(&self, x: &Decimal) -> DecimalResult<Decimal> {
        let (pr, rm) = (self.pr, self.rm);
        match x.abs().cmp(&Decimal::one()) {
            Some(Ordering::Less) => {},
            Some(Ordering::Equal) => {
                return if x.is_negative() { constants::pi(pr, rm) } else { Ok(Decimal::zero()) };
            },
            _ => return Ok(Decimal::NaN),
        }
        if x.is_zero() {
            return Ok(self.mul(&constants::pi(pr + 4, rm)?, &half()));
        }

        let ctx = self.working(pr + 6, Rounding::Down);
        let r = ctx.asin(x)?;
        let half_pi = ctx.mul(&constants::pi(pr + 4, rm)?, &half());
        Ok(self.sub(&half_pi, &r))
    }

    /// Arctangent in `[-π/2, π/2]`.
    ///
    /// The argument is halved `k` times with
    /// `atan(x) = 2·atan(x / (1 + sqrt(1 + x²)))` before the series.
    pub fn atan(&self, x: &Decimal) -> DecimalResult<Decimal> {
        let (pr, rm) = (self.pr, self.rm);
        let one = Decimal::one();
        match x {
            Decimal::NaN => return Ok(Decimal::NaN),
            Decimal::Infinite { negative } => {
                let r = self.mul(&constants::pi(pr + 4, rm)?, &half());
                return Ok(r.with_sign(*negative));
            },
            Decimal::Finite(f) if f.is_zero() => return Ok(x.clone()),
            Decimal::Finite(_) if pr + 4 <= PI_PRECISION && x.abs() == one => {
                let quarter = Decimal::from_scaled(false, 25, -2);
                let r = self.mul(&constants::pi(pr + 4, rm)?, &quarter);
                return Ok(r.with_sign(x.is_negative()));
            },
            Decimal::Finite(_) => {},
        }

        let wpr = pr + 10;
        let ctx = self.working(wpr, Rounding::Down);
        let k = (wpr / LOG_BASE + 2).min(28);

        let mut x = x.clone();
        for _ in 0..k {
            let root = ctx.sqrt(&ctx.add(&ctx.mul(&x, &x), &one));
            x = ctx.div(&x, &ctx.add(&root, &one));
        }

        // atan(x) = x - x³/3 + x⁵/5 - ...
        let inner = ctx.internal();
        let j = ((wpr + LOG_BASE - 1) / LOG_BASE) as usize;
        let x2 = inner.mul(&x, &x);
        let mut r = x.clone();
        let mut px = x;
        let mut n = 1u64;
        loop {
            px = inner.mul(&px, &x2);
            n += 2;
            let t = inner.sub(&r, &inner.div(&px, &Decimal::from(n)));
            px = inner.mul(&px, &x2);
            n += 2;
            r = inner.add(&t, &inner.div(&px, &Decimal::from(n)));
            if leading_words_equal(&r, &t, j) {
                break;
            }
        }

        if k > 0 {
            r = inner.mul(&r, &Decimal::from(1u64 << k));
        }
        Ok(self.finalise(r, Some(pr), rm, true))
    }

    /// Angle of the point `(x, y)` from the positive x-axis, in `[-π, π]`.
    pub fn atan2(&self, y: &Decimal, x: &Decimal) -> DecimalResult<Decimal> {
        let (pr, rm) = (self.pr, self.rm);
        let wpr = pr + 4;
        let y_negative = y.is_negative();

        if y.is_nan() || x.is_nan() {
            return Ok(Decimal::NaN);
        }

        let r = if y.is_infinite() && x.is_infinite() {
            let fraction = if x.is_negative() {
                Decimal::from_scaled(false, 75, -2)
            } else {
                Decimal::from_scaled(false, 25, -2)
            };
            self.mul(&constants::pi(wpr, Rounding::Down)?, &fraction).with_sign(y_negative)
        } else if x.is_infinite() || y.is_zero() {
            let r = if x.is_negative() { constants::pi(pr, rm)? } else { Decimal::zero() };
            r.with_sign(y_negative)
        } else if y.is_infinite() || x.is_zero() {
            self.mul(&constants::pi(wpr, Rounding::Down)?, &half()).with_sign(y_negative)
        } else if x.is_negative() {
            let ctx = self.working(wpr, Rounding::Down);
            let r = ctx.atan(&ctx.divide(y, x, wpr, Rounding::Down, false))?;
            let pi = constants::pi(wpr, Rounding::Down)?;
            if y_negative {
                self.sub(&r, &pi)
            } else {
                self.add(&r, &pi)
            }
        } else {
            self.atan(&self.divide(y, x, wpr, Rounding::Down, false))?
        };
        Ok(r)
    }
}

// ============================================================================
// Tests
// ============================================================================
