// ============================================================================
// Roots
// Square root by Newton iteration and cube root by Halley iteration
// ============================================================================

use super::context::Context;
use super::parse::parse_plain;
use super::rounding::leading_digits_equal;
use crate::domain::Rounding;
use crate::numeric::Decimal;

/// Characters `[from, to)` of `s`, clipped to its length.
fn slice(s: &str, from: i64, to: i64) -> &str {
    let len = s.len() as i64;
    let (from, to) = (from.clamp(0, len) as usize, to.clamp(0, len) as usize);
    if from >= to {
        ""
    } else {
        &s[from..to]
    }
}

fn all_zeros(s: &str) -> bool {
    s.bytes().all(|b| b == b'0')
}

/// Seed from a float root of the leading digits, placed at exponent `e`.
fn seed(root: f64, e: i64) -> Decimal {
    let mantissa = if root.is_finite() {
        let text = format!("{:e}", root);
        text.split('e').next().unwrap_or("5").to_string()
    } else {
        "5".to_string()
    };
    parse_plain(&format!("{}e{}", mantissa, e)).unwrap_or_else(Decimal::one)
}

impl Context {
    /// Square root, rounded to the context precision.
    ///
    /// `sqrt(-0)` is `-0`; negative arguments give NaN.
    pub fn sqrt(&self, x: &Decimal) -> Decimal {
        let xf = match x {
            Decimal::NaN => return Decimal::NaN,
            Decimal::Infinite { negative } => {
                return if *negative { Decimal::NaN } else { x.clone() };
            },
            Decimal::Finite(f) if f.is_zero() => return x.clone(),
            Decimal::Finite(f) if f.negative => return Decimal::NaN,
            Decimal::Finite(f) => f,
        };

        let inner = self.internal();
        let half = Decimal::from_scaled(false, 5, -1);
        let s = x.to_f64().sqrt();

        // Outside the float range, seed from the digits alone
        let start = if s == 0.0 || s.is_infinite() {
            let mut n = xf.coefficient();
            let e = xf.exponent;
            if (n.len() as i64 + e) % 2 == 0 {
                n.push('0');
            }
            let root = n.parse::<f64>().unwrap_or(f64::INFINITY).sqrt();
            let e = (e + 1).div_euclid(2) - i64::from(e < 0 || e % 2 != 0);
            seed(root, e)
        } else {
            Decimal::from(s)
        };

        let next = |t: &Decimal, sd: i64| {
            let quotient = inner.divide(x, t, sd + 2, Rounding::Down, false);
            inner.mul(&inner.add(t, &quotient), &half)
        };
        self.converge(x, start, next, |r| inner.mul(r, r))
    }

    /// Cube root, rounded to the context precision.
    pub fn cbrt(&self, x: &Decimal) -> Decimal {
        let xf = match x {
            Decimal::NaN => return Decimal::NaN,
            Decimal::Infinite { .. } => return x.clone(),
            Decimal::Finite(f) if f.is_zero() => return x.clone(),
            Decimal::Finite(f) => f,
        };

        let inner = self.internal();
        let v = x.to_f64();
        let s = v.signum() * v.abs().cbrt();

        let start = if s == 0.0 || s.is_infinite() {
            let mut n = xf.coefficient();
            let e = xf.exponent;
            match (e - n.len() as i64 + 1).rem_euclid(3) {
                1 => n.push('0'),
                2 => n.push_str("00"),
                _ => {},
            }
            let root = n.parse::<f64>().unwrap_or(f64::INFINITY).cbrt();
            let e = (e + 1).div_euclid(3) - i64::from(e.rem_euclid(3) == 2);
            seed(root, e).with_sign(xf.negative)
        } else {
            Decimal::from(s)
        };

        let cube = |r: &Decimal| inner.mul(&inner.mul(r, r), r);
        let next = |t: &Decimal, sd: i64| {
            let t3 = cube(t);
            let t3_plus_x = inner.add(&t3, x);
            inner.divide(
                &inner.mul(&inner.add(&t3_plus_x, x), t),
                &inner.add(&t3_plus_x, &t3),
                sd + 2,
                Rounding::Down,
                false,
            )
        };
        self.converge(x, start, next, &cube)
    }

    /// Iterate `next` from `r` until the leading `sd` digits settle, then
    /// inspect the digits `[sd - 3, sd + 1)` of the estimate.
    ///
    /// A tail of `4999` or `9999` is ambiguous: the estimate rounded up at
    /// the last place is tried once as an exact root, after which four more
    /// digits are computed. A zero or `5000` tail is checked for exactness.
    fn converge(
        &self,
        x: &Decimal,
        mut r: Decimal,
        next: impl Fn(&Decimal, i64) -> Decimal,
        power: impl Fn(&Decimal) -> Decimal,
    ) -> Decimal {
        let inner = self.internal();
        let e = self.pr;
        let mut sd = e + 3;
        let mut rep = false;

        let (result, inexact) = loop {
            let t = r;
            r = next(&t, sd);
            if !leading_digits_equal(&t, &r, sd) {
                continue;
            }

            if !r.is_finite() {
                break (r, false);
            }
            let n = r.finite().map(|f| f.coefficient()).unwrap_or_default();
            let tail = slice(&n, sd - 3, sd + 1);

            if tail == "9999" || (!rep && tail == "4999") {
                if !rep {
                    let up = inner.finalise(t, Some(e + 1), Rounding::Up, false);
                    if power(&up) == *x {
                        break (up, false);
                    }
                }
                sd += 4;
                rep = true;
                continue;
            }

            if all_zeros(tail) || (tail.starts_with('5') && all_zeros(&tail[1..])) {
                let rounded = inner.finalise(r, Some(e + 1), Rounding::Down, false);
                let inexact = power(&rounded) != *x;
                break (rounded, inexact);
            }
            break (r, false);
        };

        self.finalise(result, Some(e), self.rm, inexact)
    }
}

// ============================================================================
// Tests
// ============================================================================
