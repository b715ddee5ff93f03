// ============================================================================
// Division
// Word-level long division, radix conversion and the division operations
// ============================================================================

use super::context::Context;
use crate::domain::Rounding;
use crate::numeric::digits::{Words, BASE};
use crate::numeric::{Decimal, Finite};
use std::cmp::Ordering;

/// Multiply `words` by a small factor, returning one extra leading word for
/// the carry.
fn scale(words: &[u32], k: u64, base: u64) -> Vec<u64> {
    let mut out = vec![0u64; words.len() + 1];
    let mut carry = 0u64;
    for (i, &w) in words.iter().enumerate().rev() {
        let t = w as u64 * k + carry;
        out[i + 1] = t % base;
        carry = t / base;
    }
    out[0] = carry;
    out
}

/// `divisor × q` as `divisor.len() + 1` words.
fn multiply_word(divisor: &[u64], q: u64, base: u64) -> Vec<u64> {
    let mut out = vec![0u64; divisor.len() + 1];
    let mut carry = 0u64;
    for i in (0..divisor.len()).rev() {
        let t = divisor[i] * q + carry;
        out[i + 1] = t % base;
        carry = t / base;
    }
    out[0] = carry;
    out
}

/// `a -= b` for equal-length word arrays with `a >= b`.
fn subtract_in_place(a: &mut [u64], b: &[u64], base: u64) {
    let mut borrow = 0u64;
    for i in (0..a.len()).rev() {
        let s = b[i] + borrow;
        if a[i] >= s {
            a[i] -= s;
            borrow = 0;
        } else {
            a[i] = a[i] + base - s;
            borrow = 1;
        }
    }
}

/// Long division of two digit arrays aligned at their leading digit.
///
/// Both arrays are most significant first with non-zero leading digits.
/// The first quotient digit is the units digit of `x / y` taken as
/// `x[0].x[1]... / y[0].y[1]...`, so it may be zero. At most `max_words`
/// quotient digits are produced; the flag reports a non-zero remainder.
pub(crate) fn long_divide(x: &[u32], y: &[u32], base: u32, max_words: usize) -> (Vec<u32>, bool) {
    let b = base as u64;

    // Normalise so the divisor's leading digit is at least base / 2
    let k = b / (y[0] as u64 + 1);
    let divisor: Vec<u64> = scale(y, k, b)[1..].to_vec();
    let dividend = scale(x, k, b);

    let n = divisor.len();
    let mut padded = Vec::with_capacity(n + 1);
    padded.push(0);
    padded.extend_from_slice(&divisor);

    let mut rem: Vec<u64> = (0..=n).map(|i| dividend.get(i).copied().unwrap_or(0)).collect();
    let mut next = n + 1;
    let mut q = Vec::with_capacity(max_words.max(1));

    loop {
        let top = rem[0] * b + rem[1];
        let mut qhat = (top / divisor[0]).min(b - 1);
        let mut prod = multiply_word(&divisor, qhat, b);
        while prod.cmp(&rem) == Ordering::Greater {
            qhat -= 1;
            subtract_in_place(&mut prod, &padded, b);
        }
        subtract_in_place(&mut rem, &prod, b);
        q.push(qhat as u32);

        let exhausted = next >= dividend.len();
        if q.len() >= max_words.max(1) || (exhausted && rem.iter().all(|&w| w == 0)) {
            break;
        }
        rem.remove(0);
        rem.push(dividend.get(next).copied().unwrap_or(0));
        next += 1;
    }

    let inexact = rem.iter().any(|&w| w != 0) || dividend.iter().skip(next).any(|&w| w != 0);
    (q, inexact)
}

/// Convert most-significant-first digits between two radixes.
pub(crate) fn convert_base(digits: &[u32], base_in: u32, base_out: u32) -> Vec<u32> {
    let (bin, bout) = (base_in as u64, base_out as u64);
    // Least significant first while accumulating
    let mut acc: Vec<u64> = vec![0];
    for &d in digits {
        for a in acc.iter_mut() {
            *a *= bin;
        }
        acc[0] += d as u64;
        let mut j = 0;
        while j < acc.len() {
            if acc[j] >= bout {
                let carry = acc[j] / bout;
                acc[j] %= bout;
                if j + 1 == acc.len() {
                    acc.push(0);
                }
                acc[j + 1] += carry;
            }
            j += 1;
        }
    }
    acc.iter().rev().map(|&w| w as u32).collect()
}

impl Context {
    /// Quotient rounded to `pr` significant digits, or to `pr` decimal
    /// places when `dp` is set.
    pub(crate) fn divide(&self, x: &Decimal, y: &Decimal, pr: i64, rm: Rounding, dp: bool) -> Decimal {
        let negative = x.is_negative() != y.is_negative();
        let (a, b) = match (x, y) {
            (Decimal::NaN, _) | (_, Decimal::NaN) => return Decimal::NaN,
            (Decimal::Infinite { .. }, Decimal::Infinite { .. }) => return Decimal::NaN,
            (Decimal::Finite(a), Decimal::Finite(b)) if a.is_zero() && b.is_zero() => {
                return Decimal::NaN
            },
            (Decimal::Finite(a), _) if a.is_zero() => return Decimal::signed_zero(negative),
            (_, Decimal::Infinite { .. }) => return Decimal::signed_zero(negative),
            (Decimal::Infinite { .. }, _) => return Decimal::infinity(negative),
            (_, Decimal::Finite(b)) if b.is_zero() => return Decimal::infinity(negative),
            (Decimal::Finite(a), Decimal::Finite(b)) => (a, b),
        };

        let sd = if dp { pr + (a.exponent - b.exponent) + 1 } else { pr };
        let max_words = (sd.max(1) / 7 + 3) as usize;
        let (q, inexact) = long_divide(&a.digits, &b.digits, BASE, max_words);
        let words: Words = q.into_iter().collect();
        let q = Finite::from_words(negative, words, a.word_exponent() - b.word_exponent());

        let sd = if dp { pr + q.exponent + 1 } else { pr };
        self.finalise(Decimal::Finite(q), Some(sd), rm, inexact)
    }

    /// `x / y` to the context precision.
    pub fn div(&self, x: &Decimal, y: &Decimal) -> Decimal {
        self.divide(x, y, self.pr, self.rm, false)
    }

    /// Integer part of `x / y`, truncated towards zero.
    pub fn div_to_int(&self, x: &Decimal, y: &Decimal) -> Decimal {
        let q = self.divide(x, y, 0, Rounding::Down, true);
        self.round_working(q)
    }

    /// Remainder of `x / y` under the context modulo mode.
    ///
    /// `Euclid` keeps the result non-negative; the other modes give the
    /// quotient the matching rounding and return `x - q × y`.
    pub fn modulo(&self, x: &Decimal, y: &Decimal) -> Decimal {
        if !x.is_finite() || y.is_nan() || y.is_zero() {
            return Decimal::NaN;
        }
        if y.is_infinite() || x.is_zero() {
            return self.round_working(x.clone());
        }

        let inner = self.internal();
        let q = match self.modulo_mode().quotient_rounding() {
            Some(rm) => inner.divide(x, y, 0, rm, true),
            None => {
                let q = inner.divide(x, &y.abs(), 0, Rounding::Floor, true);
                let negative = q.is_negative() != y.is_negative();
                q.with_sign(negative)
            },
        };
        let product = inner.mul(&q, y);
        self.sub(x, &product)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Config, ModuloMode};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_long_divide_exact() {
        let (q, inexact) = long_divide(&[6], &[3], 10, 5);
        assert_eq!(q, vec![2]);
        assert!(!inexact);

        let (q, inexact) = long_divide(&[1], &[4], 10, 5);
        assert_eq!(q, vec![0, 2, 5]);
        assert!(!inexact);
    }

    #[test]
    fn test_long_divide_truncates() {
        let (q, inexact) = long_divide(&[1], &[3], 10, 4);
        assert_eq!(q, vec![0, 3, 3, 3]);
        assert!(inexact);

        let (q, _) = long_divide(&[9, 9, 9], &[9, 9, 8], 10, 3);
        assert_eq!(q, vec![1, 0, 0]);
    }

    #[test]
    fn test_convert_base() {
        assert_eq!(convert_base(&[2, 5, 5], 10, 16), vec![15, 15]);
        assert_eq!(convert_base(&[1, 0, 1], 2, 10), vec![5]);
        assert_eq!(convert_base(&[0], 10, 2), vec![0]);
        assert_eq!(convert_base(&[1, 0, 0, 0, 0, 0, 0, 0], 10, BASE), vec![1, 0]);
    }

    #[test]
    fn test_div() {
        let mut ctx = Context::default();
        assert_eq!(ctx.div(&d("1"), &d("3")).to_string(), "0.33333333333333333333");
        assert_eq!(ctx.div(&d("-10"), &d("4")).to_string(), "-2.5");
        assert_eq!(ctx.div(&d("123456789"), &d("0.001")).to_string(), "123456789000");

        ctx.set_precision(5).unwrap();
        assert_eq!(ctx.div(&d("2"), &d("3")).to_string(), "0.66667");
        ctx.set_rounding(Rounding::Down);
        assert_eq!(ctx.div(&d("2"), &d("3")).to_string(), "0.66666");
    }

    #[test]
    fn test_div_special_values() {
        let ctx = Context::default();
        assert_eq!(ctx.div(&d("1"), &d("0")), Decimal::infinity(false));
        assert_eq!(ctx.div(&d("-1"), &d("0")), Decimal::infinity(true));
        assert!(ctx.div(&d("0"), &d("0")).is_nan());
        assert!(ctx.div(&Decimal::infinity(false), &Decimal::infinity(true)).is_nan());

        let z = ctx.div(&d("1"), &Decimal::infinity(true));
        assert!(z.is_zero() && z.is_negative());
    }

    #[test]
    fn test_div_to_int() {
        let ctx = Context::default();
        assert_eq!(ctx.div_to_int(&d("14"), &d("3")).to_string(), "4");
        assert_eq!(ctx.div_to_int(&d("-14"), &d("3")).to_string(), "-4");
        assert_eq!(ctx.div_to_int(&d("5.9"), &d("0.7")).to_string(), "8");
        assert!(ctx.div_to_int(&d("1"), &d("0")).is_infinite());
    }

    #[test]
    fn test_modulo_modes() {
        let mut ctx = Context::default();
        assert_eq!(ctx.modulo(&d("-7"), &d("3")).to_string(), "-1");
        assert_eq!(ctx.modulo(&d("7"), &d("-3")).to_string(), "1");

        ctx.set_modulo(ModuloMode::Floor);
        assert_eq!(ctx.modulo(&d("-7"), &d("3")).to_string(), "2");
        assert_eq!(ctx.modulo(&d("7"), &d("-3")).to_string(), "-2");

        ctx.set_modulo(ModuloMode::Euclid);
        assert_eq!(ctx.modulo(&d("-7"), &d("3")).to_string(), "2");
        assert_eq!(ctx.modulo(&d("-7"), &d("-3")).to_string(), "2");

        ctx.set_modulo(ModuloMode::HalfEven);
        assert_eq!(ctx.modulo(&d("7"), &d("2")).to_string(), "-1");
    }

    #[test]
    fn test_modulo_special_values() {
        let ctx = Context::new(Config::new()).unwrap();
        assert!(ctx.modulo(&d("1"), &d("0")).is_nan());
        assert!(ctx.modulo(&Decimal::infinity(false), &d("2")).is_nan());
        assert_eq!(ctx.modulo(&d("5.5"), &Decimal::infinity(false)).to_string(), "5.5");
        assert_eq!(ctx.modulo(&d("-0"), &d("3")).to_string(), "-0");
        assert_eq!(ctx.modulo(&d("5.5"), &d("2")).to_string(), "1.5");
    }
}
