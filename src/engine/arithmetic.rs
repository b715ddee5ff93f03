// ============================================================================
// Arithmetic
// Addition, subtraction, multiplication and the aggregate operations
// ============================================================================

use super::context::Context;
use crate::domain::Rounding;
use crate::numeric::digits::{Words, BASE, LOG_BASE};
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};
use std::cmp::Ordering;

/// Words of the shorter-exponent operand are shifted right by prepending
/// zeros; beyond `cap` words only the leading word is kept since the rest
/// cannot affect the rounded result.
fn align(digits: &mut Words, shift: i64, cap: i64) {
    let mut shift = shift;
    if shift > cap {
        shift = cap;
        digits.truncate(1);
    }
    digits.insert_many(0, std::iter::repeat(0).take(shift as usize));
}

fn words_for(pr: i64) -> i64 {
    (pr + LOG_BASE - 1) / LOG_BASE
}

/// Sum of magnitudes; the result carries the sign of `a`.
fn add_magnitudes(a: &Finite, b: &Finite, pr: i64) -> Finite {
    let (ka, kb) = (a.word_exponent(), b.word_exponent());
    let mut xd = a.digits.clone();
    let mut yd = b.digits.clone();
    let mut e = kb;

    let shift = ka - kb;
    if shift != 0 {
        let k = words_for(pr);
        let (d, len, shift) = if shift < 0 {
            (&mut xd, yd.len() as i64, -shift)
        } else {
            e = ka;
            (&mut yd, xd.len() as i64, shift)
        };
        let cap = if k > len { k + 1 } else { len + 1 };
        align(d, shift, cap);
    }

    if xd.len() < yd.len() {
        std::mem::swap(&mut xd, &mut yd);
    }

    let mut carry = 0u32;
    for i in (0..yd.len()).rev() {
        let t = xd[i] + yd[i] + carry;
        carry = t / BASE;
        xd[i] = t % BASE;
    }
    if carry > 0 {
        xd.insert(0, carry);
        e += 1;
    }
    Finite::from_words(a.negative, xd, e)
}

/// Difference of magnitudes of two same-signed values. `None` when they
/// cancel exactly.
fn subtract_magnitudes(a: &Finite, b: &Finite, pr: i64) -> Option<Finite> {
    let (ka, kb) = (a.word_exponent(), b.word_exponent());
    let mut xd = a.digits.clone();
    let mut yd = b.digits.clone();
    let mut e = kb;

    let shift = ka - kb;
    let x_less = if shift != 0 {
        let (d, len, amount) = if shift < 0 {
            (&mut xd, yd.len() as i64, -shift)
        } else {
            e = ka;
            (&mut yd, xd.len() as i64, shift)
        };
        let cap = words_for(pr).max(len) + 2;
        align(d, amount, cap);
        shift < 0
    } else {
        match xd[..].cmp(&yd[..]) {
            Ordering::Equal => return None,
            ordering => ordering == Ordering::Less,
        }
    };

    let mut negative = a.negative;
    if x_less {
        std::mem::swap(&mut xd, &mut yd);
        negative = !negative;
    }

    if xd.len() < yd.len() {
        xd.resize(yd.len(), 0);
    }
    let mut borrow = 0u32;
    for i in (0..xd.len()).rev() {
        let s = yd.get(i).copied().unwrap_or(0) + borrow;
        if xd[i] >= s {
            xd[i] -= s;
            borrow = 0;
        } else {
            xd[i] = xd[i] + BASE - s;
            borrow = 1;
        }
    }

    let r = Finite::from_words(negative, xd, e);
    if r.is_zero() {
        None
    } else {
        Some(r)
    }
}

/// Exact product of two non-zero magnitudes.
fn multiply(a: &Finite, b: &Finite, negative: bool) -> Finite {
    let base = BASE as u64;
    let mut r = vec![0u64; a.digits.len() + b.digits.len()];
    for i in (0..a.digits.len()).rev() {
        let mut carry = 0u64;
        let ai = a.digits[i] as u64;
        for j in (0..b.digits.len()).rev() {
            let k = i + j + 1;
            let t = r[k] + ai * b.digits[j] as u64 + carry;
            r[k] = t % base;
            carry = t / base;
        }
        r[i] += carry;
    }
    let words: Words = r.into_iter().map(|w| w as u32).collect();
    Finite::from_words(negative, words, a.word_exponent() + b.word_exponent() + 1)
}

impl Context {
    /// `x + y`.
    pub fn add(&self, x: &Decimal, y: &Decimal) -> Decimal {
        let (a, b) = match (x, y) {
            (Decimal::Finite(a), Decimal::Finite(b)) => (a, b),
            (Decimal::NaN, _) | (_, Decimal::NaN) => return Decimal::NaN,
            (Decimal::Infinite { negative: p }, Decimal::Infinite { negative: q }) => {
                return if p == q { x.clone() } else { Decimal::NaN };
            },
            (Decimal::Infinite { .. }, _) => return x.clone(),
            _ => return y.clone(),
        };

        if a.negative != b.negative {
            return self.sub(x, &y.negated());
        }
        if b.is_zero() {
            return self.settle(x.clone());
        }
        if a.is_zero() {
            return self.settle(y.clone());
        }
        self.settle(Decimal::Finite(add_magnitudes(a, b, self.pr)))
    }

    /// `x - y`. An exact zero result is `-0` only under `Floor`.
    pub fn sub(&self, x: &Decimal, y: &Decimal) -> Decimal {
        let (a, b) = match (x, y) {
            (Decimal::Finite(a), Decimal::Finite(b)) => (a, b),
            (Decimal::NaN, _) | (_, Decimal::NaN) => return Decimal::NaN,
            (Decimal::Infinite { negative: p }, Decimal::Infinite { negative: q }) => {
                return if p != q { x.clone() } else { Decimal::NaN };
            },
            (Decimal::Infinite { .. }, _) => return x.clone(),
            _ => return y.negated(),
        };

        if a.negative != b.negative {
            return self.add(x, &y.negated());
        }
        if !b.is_zero() && a.is_zero() {
            return self.settle(y.negated());
        }
        if b.is_zero() && !a.is_zero() {
            return self.settle(x.clone());
        }
        let floor_zero = || Decimal::signed_zero(self.rm == Rounding::Floor);
        if a.is_zero() {
            return floor_zero();
        }
        match subtract_magnitudes(a, b, self.pr) {
            Some(r) => self.settle(Decimal::Finite(r)),
            None => floor_zero(),
        }
    }

    /// `x × y`.
    pub fn mul(&self, x: &Decimal, y: &Decimal) -> Decimal {
        let negative = x.is_negative() != y.is_negative();
        match (x, y) {
            (Decimal::NaN, _) | (_, Decimal::NaN) => Decimal::NaN,
            (Decimal::Finite(a), Decimal::Finite(b)) if !a.is_zero() && !b.is_zero() => {
                self.settle(Decimal::Finite(multiply(a, b, negative)))
            },
            _ if (x.is_zero() && y.is_infinite()) || (x.is_infinite() && y.is_zero()) => Decimal::NaN,
            _ if x.is_infinite() || y.is_infinite() => Decimal::infinity(negative),
            _ => Decimal::signed_zero(negative),
        }
    }

    /// `-x`, subject to the exponent bounds.
    pub fn neg(&self, x: &Decimal) -> Decimal {
        self.finalise(x.negated(), None, self.rm, false)
    }

    /// `|x|`, subject to the exponent bounds.
    pub fn abs(&self, x: &Decimal) -> Decimal {
        self.finalise(x.abs(), None, self.rm, false)
    }

    /// Sum of `values` with a single final rounding. Empty input gives 0.
    pub fn sum(&self, values: &[Decimal]) -> Decimal {
        let inner = self.internal();
        let mut iter = values.iter();
        let mut acc = match iter.next() {
            Some(v) => v.clone(),
            None => return Decimal::zero(),
        };
        for v in iter {
            if acc.is_nan() {
                break;
            }
            acc = inner.add(&acc, v);
        }
        self.round_working(acc)
    }

    /// Largest of `values`; NaN if any is NaN or the list is empty.
    /// `0` is preferred over `-0`.
    pub fn max(&self, values: &[Decimal]) -> Decimal {
        extreme(values, Ordering::Less)
    }

    /// Smallest of `values`; NaN if any is NaN or the list is empty.
    /// `-0` is preferred over `0`.
    pub fn min(&self, values: &[Decimal]) -> Decimal {
        extreme(values, Ordering::Greater)
    }

    /// Square root of the sum of squares. Any infinite argument gives
    /// Infinity, even alongside NaN.
    pub fn hypot(&self, values: &[Decimal]) -> Decimal {
        let inner = self.internal();
        let mut t = Decimal::zero();
        for n in values {
            match n {
                Decimal::Infinite { .. } => return Decimal::infinity(false),
                Decimal::NaN => t = Decimal::NaN,
                Decimal::Finite(_) if t.is_finite() => t = inner.add(&t, &inner.mul(n, n)),
                Decimal::Finite(_) => {},
            }
        }
        self.sqrt(&t)
    }

    /// `x` limited to `[min, max]`.
    ///
    /// # Errors
    /// `InvalidArgument` carrying `max` when `min > max`.
    pub fn clamp(&self, x: &Decimal, min: &Decimal, max: &Decimal) -> DecimalResult<Decimal> {
        if min.is_nan() || max.is_nan() {
            return Ok(Decimal::NaN);
        }
        if min > max {
            return Err(DecimalError::invalid(max));
        }
        Ok(if x < min {
            min.clone()
        } else if x > max {
            max.clone()
        } else {
            x.clone()
        })
    }

    /// Simplest fraction `(numerator, denominator)` closest to `x` whose
    /// denominator does not exceed `max_denominator` (unbounded when `None`).
    ///
    /// Infinities give `(±Infinity, 1)` and NaN gives `(NaN, NaN)`. Check
    /// `is_finite` on the numerator before treating the pair as a ratio.
    ///
    /// # Errors
    /// `InvalidArgument` if `max_denominator` is not an integer of at least 1.
    pub fn to_fraction(
        &self,
        x: &Decimal,
        max_denominator: Option<&Decimal>,
    ) -> DecimalResult<(Decimal, Decimal)> {
        let xf = match x {
            Decimal::Finite(f) => f,
            Decimal::Infinite { .. } => return Ok((x.clone(), Decimal::one())),
            Decimal::NaN => return Ok((Decimal::NaN, Decimal::NaN)),
        };
        let one = Decimal::one();

        let e = xf.sd() - xf.exponent - 1;
        let scale = Decimal::from_scaled(false, 1, e);
        let floor = if e > 0 { scale.clone() } else { one.clone() };
        let max_d = match max_denominator {
            None => floor,
            Some(m) => {
                if !m.is_integer() || *m < one {
                    return Err(DecimalError::invalid(m));
                }
                if *m > scale {
                    floor
                } else {
                    m.clone()
                }
            },
        };

        let inner = self.working(xf.digits.len() as i64 * LOG_BASE * 2, self.rm).internal();
        let coefficient = xf.coefficient();
        let mut n = Decimal::Finite(Finite::from_coefficient(
            false,
            coefficient.as_bytes(),
            coefficient.len() as i64 - 1,
        ));
        let mut d = scale;
        let (mut n0, mut n1) = (Decimal::zero(), one.clone());
        let (mut d0, mut d1) = (one.clone(), Decimal::zero());

        loop {
            let q = inner.divide(&n, &d, 0, Rounding::Down, true);
            let d2 = inner.add(&d0, &inner.mul(&q, &d1));
            if d2 > max_d {
                break;
            }
            d0 = std::mem::replace(&mut d1, d2);
            let next_n = inner.add(&n0, &inner.mul(&q, &n1));
            n0 = std::mem::replace(&mut n1, next_n);
            let next_d = inner.sub(&n, &inner.mul(&q, &d));
            n = std::mem::replace(&mut d, next_d);
        }

        let k = inner.divide(&inner.sub(&max_d, &d0), &d1, 0, Rounding::Down, true);
        let n0 = inner.add(&n0, &inner.mul(&k, &n1)).with_sign(xf.negative);
        let d0 = inner.add(&d0, &inner.mul(&k, &d1));
        let n1 = n1.with_sign(xf.negative);

        let pr = inner.pr;
        let error = |n: &Decimal, d: &Decimal| {
            inner.sub(&inner.divide(n, d, pr, Rounding::Down, false), x).abs()
        };
        let closer = error(&n1, &d1).cmp(&error(&n0, &d0)) != Some(Ordering::Greater);

        Ok(if closer { (n1, d1) } else { (n0, d0) })
    }
}

/// Running extreme where `replace_when` is the ordering of the current best
/// against a candidate that makes the candidate win.
fn extreme(values: &[Decimal], replace_when: Ordering) -> Decimal {
    let mut iter = values.iter();
    let mut best = match iter.next() {
        Some(v) => v.clone(),
        None => return Decimal::NaN,
    };
    let prefer_positive_zero = replace_when == Ordering::Less;
    for y in iter {
        if y.is_nan() {
            return Decimal::NaN;
        }
        match best.cmp(y) {
            Some(o) if o == replace_when => best = y.clone(),
            Some(Ordering::Equal) if best.is_negative() == prefer_positive_zero => best = y.clone(),
            _ => {},
        }
    }
    best
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

    fn ctx_with(precision: u32) -> Context {
        let mut ctx = Context::default();
        ctx.set_precision(precision).unwrap();
        ctx
    }

    #[test]
    fn test_add() {
        let ctx = Context::default();
        assert_eq!(ctx.add(&d("0.1"), &d("0.2")).to_string(), "0.3");
        assert_eq!(ctx.add(&d("9999999"), &d("1")).to_string(), "10000000");
        assert_eq!(ctx.add(&d("-1.5"), &d("0.25")).to_string(), "-1.25");
        assert_eq!(ctx.add(&d("1e-30"), &d("1")).to_string(), "1");
        assert_eq!(
            ctx.add(&d("12345678901234567890"), &d("0.6")).to_string(),
            "12345678901234567891"
        );
    }

    #[test]
    fn test_add_rounds_far_operand() {
        let ctx = ctx_with(5);
        assert_eq!(ctx.add(&d("1"), &d("0.000050000001")).to_string(), "1.0001");
        assert_eq!(ctx.add(&d("1e20"), &d("1e-20")).to_string(), "100000000000000000000");
        let up = ctx_with(30).internal().add(&d("1"), &d("1e-20"));
        assert_eq!(up.to_string(), "1.00000000000000000001");
    }

    #[test]
    fn test_sub() {
        let ctx = Context::default();
        assert_eq!(ctx.sub(&d("0.3"), &d("0.1")).to_string(), "0.2");
        assert_eq!(ctx.sub(&d("1"), &d("1.0000001")).to_string(), "-1e-7");
        assert_eq!(ctx.sub(&d("10000000"), &d("1")).to_string(), "9999999");
        assert_eq!(ctx.sub(&d("-5"), &d("3")).to_string(), "-8");
        assert_eq!(ctx.sub(&d("0"), &d("3")).to_string(), "-3");
    }

    #[test]
    fn test_sub_zero_sign() {
        let mut ctx = Context::default();
        let z = ctx.sub(&d("1.5"), &d("1.5"));
        assert!(z.is_zero() && !z.is_negative());
        assert!(!ctx.sub(&d("0"), &d("0")).is_negative());

        ctx.set_rounding(Rounding::Floor);
        assert!(ctx.sub(&d("1.5"), &d("1.5")).is_negative());
        assert!(ctx.sub(&d("0"), &d("0")).is_negative());
        assert!(ctx.add(&d("-0"), &d("-0")).is_negative());
    }

    #[test]
    fn test_add_sub_special_values() {
        let ctx = Context::default();
        let inf = Decimal::infinity(false);
        let ninf = Decimal::infinity(true);
        assert!(ctx.add(&inf, &ninf).is_nan());
        assert_eq!(ctx.add(&inf, &d("1")), inf);
        assert_eq!(ctx.sub(&d("1"), &inf), ninf);
        assert_eq!(ctx.sub(&inf, &ninf), inf);
        assert!(ctx.sub(&inf, &inf).is_nan());
        assert!(ctx.add(&Decimal::NaN, &d("1")).is_nan());
    }

    #[test]
    fn test_mul() {
        let ctx = Context::default();
        assert_eq!(ctx.mul(&d("1.5"), &d("-2")).to_string(), "-3");
        assert_eq!(ctx.mul(&d("9999999"), &d("9999999")).to_string(), "99999980000001");
        assert_eq!(
            ctx.mul(&d("123456789.123"), &d("987654321.987")).to_string(),
            "121932631355968601.35"
        );
        assert_eq!(ctx.mul(&d("-0"), &d("5")).to_string(), "-0");
        assert!(ctx.mul(&d("0"), &Decimal::infinity(true)).is_nan());
        assert_eq!(ctx.mul(&d("-2"), &Decimal::infinity(true)), Decimal::infinity(false));
    }

    #[test]
    fn test_neg_abs() {
        let ctx = Context::default();
        assert_eq!(ctx.neg(&d("0")).to_string(), "-0");
        assert_eq!(ctx.abs(&d("-7.5")).to_string(), "7.5");
        assert!(ctx.neg(&Decimal::NaN).is_nan());
    }

    #[test]
    fn test_sum() {
        let ctx = ctx_with(5);
        let values = [d("1e10"), d("1"), d("-1e10")];
        assert_eq!(ctx.sum(&values).to_string(), "1");
        assert_eq!(ctx.sum(&[]).to_string(), "0");
        assert!(ctx.sum(&[d("1"), Decimal::NaN]).is_nan());
        assert_eq!(ctx.sum(&[d("1.23456")]).to_string(), "1.2346");
    }

    #[test]
    fn test_max_min() {
        let ctx = Context::default();
        let values = [d("3"), d("-7"), d("10.5")];
        assert_eq!(ctx.max(&values).to_string(), "10.5");
        assert_eq!(ctx.min(&values).to_string(), "-7");
        assert!(ctx.max(&[d("1"), Decimal::NaN]).is_nan());
        assert!(ctx.min(&[]).is_nan());

        assert!(!ctx.max(&[d("-0"), d("0")]).is_negative());
        assert!(ctx.min(&[d("0"), d("-0")]).is_negative());
    }

    #[test]
    fn test_hypot() {
        let ctx = Context::default();
        assert_eq!(ctx.hypot(&[d("3"), d("4")]).to_string(), "5");
        assert_eq!(ctx.hypot(&[]).to_string(), "0");
        assert_eq!(
            ctx.hypot(&[Decimal::NaN, Decimal::infinity(true)]),
            Decimal::infinity(false)
        );
        assert!(ctx.hypot(&[d("1"), Decimal::NaN]).is_nan());
    }

    #[test]
    fn test_clamp() {
        let ctx = Context::default();
        assert_eq!(ctx.clamp(&d("5"), &d("1"), &d("3")).unwrap().to_string(), "3");
        assert_eq!(ctx.clamp(&d("-5"), &d("1"), &d("3")).unwrap().to_string(), "1");
        assert_eq!(ctx.clamp(&d("2"), &d("1"), &d("3")).unwrap().to_string(), "2");
        assert!(ctx.clamp(&d("2"), &Decimal::NaN, &d("3")).unwrap().is_nan());
        assert_eq!(
            ctx.clamp(&d("2"), &d("3"), &d("1")),
            Err(DecimalError::InvalidArgument("1".to_string()))
        );
    }

    #[test]
    fn test_to_fraction() {
        let ctx = Context::default();
        let show = |(n, d): (Decimal, Decimal)| format!("{}/{}", n, d);

        assert_eq!(show(ctx.to_fraction(&d("0.75"), None).unwrap()), "3/4");
        assert_eq!(show(ctx.to_fraction(&d("-1.5"), None).unwrap()), "-3/2");
        assert_eq!(show(ctx.to_fraction(&d("5"), None).unwrap()), "5/1");
        assert_eq!(
            show(ctx.to_fraction(&d("3.14159265358979"), Some(&d("1000"))).unwrap()),
            "355/113"
        );
        assert_eq!(show(ctx.to_fraction(&d("0.333"), Some(&d("10"))).unwrap()), "1/3");
        assert!(ctx.to_fraction(&d("0.5"), Some(&d("0.5"))).is_err());
        assert_eq!(show(ctx.to_fraction(&Decimal::infinity(true), None).unwrap()), "-Infinity/1");
        let (n, q) = ctx.to_fraction(&Decimal::infinity(false), None).unwrap();
        assert!(!n.is_finite());
        assert_eq!(q, Decimal::one());
    }
}
