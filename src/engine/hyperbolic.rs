// ============================================================================
// Hyperbolic Functions
// sinh, cosh, tanh and their inverses
// ============================================================================

use super::context::Context;
use crate::domain::Rounding;
use crate::numeric::{Decimal, DecimalResult};
use std::cmp::Ordering;

impl Context {
    /// Working context with `extra` guard digits beyond the significant
    /// digits or the exponent of `x`, whichever is larger.
    fn widened(&self, x: &Decimal, weight: i64, extra: i64) -> Context {
        let size = x.finite().map_or(0, |f| f.exponent.abs().max(f.sd()));
        self.working(self.pr + weight * size + extra, Rounding::Down)
    }

    /// Hyperbolic sine.
    pub fn sinh(&self, x: &Decimal) -> Decimal {
        if !x.is_finite() || x.is_zero() {
            return x.clone();
        }
        let size = x.finite().map_or(0, |f| f.exponent.max(f.sd()));
        let ctx = self.working(self.pr + size + 4, Rounding::Down);
        let s = ctx.sine(x, true);
        self.finalise(s, Some(self.pr), self.rm, true)
    }

    /// Hyperbolic cosine, using `cosh(4x) = 1 - 8cosh²x + 8cosh⁴x` to shrink
    /// the argument before the series.
    pub fn cosh(&self, x: &Decimal) -> Decimal {
        let xf = match x {
            Decimal::NaN => return Decimal::NaN,
            Decimal::Infinite { .. } => return Decimal::infinity(false),
            Decimal::Finite(f) if f.is_zero() => return Decimal::one(),
            Decimal::Finite(f) => f,
        };
        let ctx = self.working(self.pr + xf.exponent.max(xf.sd()) + 4, Rounding::Down);

        let len = xf.digits.len();
        let k = if len < 32 { (len + 2) / 3 } else { 16 };
        let quarter_power = Decimal::from_scaled(false, 5u128.pow(2 * k as u32), -2 * k as i64);
        let one = Decimal::one();
        let eight = Decimal::from(8);

        let mut c = ctx.taylor_series(1, &ctx.mul(x, &quarter_power), one.clone(), true);
        for _ in 0..k {
            let c2 = ctx.mul(&c, &c);
            c = ctx.sub(&one, &ctx.mul(&c2, &ctx.sub(&eight, &ctx.mul(&c2, &eight))));
        }
        self.finalise(c, Some(self.pr), self.rm, true)
    }

    /// Hyperbolic tangent; `±1` at `±Infinity`.
    pub fn tanh(&self, x: &Decimal) -> Decimal {
        match x {
            Decimal::NaN => return Decimal::NaN,
            Decimal::Infinite { negative } => return Decimal::one().with_sign(*negative),
            Decimal::Finite(f) if f.is_zero() => return x.clone(),
            Decimal::Finite(_) => {},
        }
        let ctx = self.working(self.pr + 7, Rounding::Down);
        self.divide(&ctx.sinh(x), &ctx.cosh(x), self.pr, self.rm, false)
    }

    /// Inverse hyperbolic sine, `ln(x + sqrt(x² + 1))`.
    pub fn asinh(&self, x: &Decimal) -> DecimalResult<Decimal> {
        if !x.is_finite() || x.is_zero() {
            return Ok(x.clone());
        }
        let ctx = self.widened(x, 2, 6);
        let inner = ctx.internal();
        let root = ctx.sqrt(&inner.add(&inner.mul(x, x), &Decimal::one()));
        self.ln(&inner.add(&root, x))
    }

    /// Inverse hyperbolic cosine, `ln(x + sqrt(x² - 1))`; NaN below 1.
    pub fn acosh(&self, x: &Decimal) -> DecimalResult<Decimal> {
        let one = Decimal::one();
        match x.cmp(&one) {
            Some(Ordering::Equal) => return Ok(Decimal::zero()),
            Some(Ordering::Less) => return Ok(Decimal::NaN),
            _ => {},
        }
        if !x.is_finite() {
            return Ok(x.clone());
        }
        let ctx = self.widened(x, 1, 4);
        let inner = ctx.internal();
        let root = ctx.sqrt(&inner.sub(&inner.mul(x, x), &one));
        self.ln(&inner.add(&root, x))
    }

    /// Inverse hyperbolic tangent, `ln((1 + x) / (1 - x)) / 2`.
    ///
    /// `±1` gives `±Infinity`; NaN outside `[-1, 1]`.
    pub fn atanh(&self, x: &Decimal) -> DecimalResult<Decimal> {
        let xf = match x {
            Decimal::Finite(f) => f,
            _ => return Ok(Decimal::NaN),
        };
        let one = Decimal::one();
        if xf.is_zero() {
            return Ok(x.clone());
        }
        if xf.exponent >= 0 {
            return Ok(if x.abs() == one { Decimal::infinity(xf.negative) } else { Decimal::NaN });
        }

        let (pr, rm) = (self.pr, self.rm);
        let xsd = xf.sd();

        // Below this size atanh(x) and x agree to every requested digit
        if xsd.max(pr) < -2 * xf.exponent - 1 {
            return Ok(self.finalise(x.clone(), Some(pr), rm, true));
        }

        // 1 + x and 1 - x are exact at this precision
        let wpr = xsd - xf.exponent;
        let exact = self.working(wpr, rm);
        let ratio = exact.divide(&exact.add(x, &one), &exact.sub(&one, x), wpr + pr, Rounding::Down, false);

        let ln = self.working(pr + 4, Rounding::Down).ln(&ratio)?;
        Ok(self.mul(&ln, &Decimal::from_scaled(false, 5, -1)))
    }
}

// ============================================================================
// Tests
// ============================================================================
