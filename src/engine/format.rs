// ============================================================================
// Formatting
// Decimal notations and binary, octal and hexadecimal output
// ============================================================================

use super::context::Context;
use super::division::{convert_base, long_divide};
use super::rounding::rounds_up;
use crate::domain::{Rounding, MAX_DIGITS};
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};

/// Output radix for [`Context::to_radix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Radix {
    Binary = 2,
    Octal = 8,
    Hexadecimal = 16,
}

impl Radix {
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            Radix::Binary => "0b",
            Radix::Octal => "0o",
            Radix::Hexadecimal => "0x",
        }
    }

    /// Bits per digit.
    #[inline]
    const fn bits(self) -> i64 {
        match self {
            Radix::Binary => 1,
            Radix::Octal => 3,
            Radix::Hexadecimal => 4,
        }
    }
}

fn check_dp(dp: u32) -> DecimalResult<()> {
    if dp > MAX_DIGITS {
        return Err(DecimalError::invalid(dp));
    }
    Ok(())
}

fn check_sd(sd: u32) -> DecimalResult<()> {
    if sd < 1 || sd > MAX_DIGITS {
        return Err(DecimalError::invalid(sd));
    }
    Ok(())
}

/// `text` behind a minus sign for negative non-zero values.
fn signed(x: &Decimal, text: String) -> String {
    if x.is_negative() && !x.is_zero() {
        format!("-{}", text)
    } else {
        text
    }
}

fn unsigned(x: &Decimal, exponential: bool, sd: Option<i64>) -> String {
    match x {
        Decimal::Finite(f) => f.to_notation(exponential, sd),
        Decimal::Infinite { .. } => "Infinity".to_string(),
        Decimal::NaN => "NaN".to_string(),
    }
}

fn decimal_digits(text: &str) -> Vec<u32> {
    text.bytes().map(|b| u32::from(b - b'0')).collect()
}

fn numerals(digits: &[u32], base: u32) -> String {
    digits.iter().filter_map(|&d| char::from_digit(d, base)).collect()
}

fn trim_zeros(digits: &mut Vec<u32>) {
    while digits.len() > 1 && digits.last() == Some(&0) {
        digits.pop();
    }
}

impl Context {
    // ========================================================================
    // Decimal Notation
    // ========================================================================

    /// Plain or exponential notation by the configured thresholds. `-0`
    /// prints as `0`.
    pub fn to_string(&self, x: &Decimal) -> String {
        signed(x, self.threshold_notation(x))
    }

    /// As [`Context::to_string`], keeping the sign of `-0`.
    pub fn value_of(&self, x: &Decimal) -> String {
        let text = self.threshold_notation(x);
        if x.is_negative() {
            format!("-{}", text)
        } else {
            text
        }
    }

    fn threshold_notation(&self, x: &Decimal) -> String {
        let config = self.config();
        let exponential = x
            .exponent()
            .map_or(false, |e| e <= config.to_exp_neg || e >= config.to_exp_pos);
        unsigned(x, exponential, None)
    }

    /// Plain notation whatever the exponent.
    pub fn to_fixed(&self, x: &Decimal) -> String {
        signed(x, unsigned(x, false, None))
    }

    /// Plain notation with exactly `dp` decimal places.
    ///
    /// The sign is taken from `x` before rounding, so a small negative
    /// value prints as `-0.00`.
    pub fn to_fixed_dp(&self, x: &Decimal, dp: u32, rm: Option<Rounding>) -> DecimalResult<String> {
        check_dp(dp)?;
        let rm = rm.unwrap_or(self.rm);
        let dp = dp as i64;
        let text = match x.finite() {
            Some(f) => {
                let y = self.finalise(x.clone(), Some(dp + f.exponent + 1), rm, false);
                let sd = y.exponent().map(|e| dp + e + 1);
                unsigned(&y, false, sd)
            },
            None => unsigned(x, false, None),
        };
        Ok(signed(x, text))
    }

    /// Exponential notation with as many digits as needed.
    pub fn to_exponential(&self, x: &Decimal) -> String {
        signed(x, unsigned(x, true, None))
    }

    /// Exponential notation with `dp` digits after the point.
    pub fn to_exponential_dp(&self, x: &Decimal, dp: u32, rm: Option<Rounding>) -> DecimalResult<String> {
        check_dp(dp)?;
        let rm = rm.unwrap_or(self.rm);
        let sd = dp as i64 + 1;
        let y = self.finalise(x.clone(), Some(sd), rm, false);
        Ok(signed(&y, unsigned(&y, true, Some(sd))))
    }

    /// Same as [`Context::to_string`] for a value that is not rounded.
    pub fn to_precision(&self, x: &Decimal) -> String {
        self.to_string(x)
    }

    /// `sd` significant digits, switching to exponential notation when the
    /// integer part has more digits than `sd` or the exponent reaches the
    /// negative threshold.
    pub fn to_precision_sd(&self, x: &Decimal, sd: u32, rm: Option<Rounding>) -> DecimalResult<String> {
        check_sd(sd)?;
        let rm = rm.unwrap_or(self.rm);
        let sd = sd as i64;
        let y = self.finalise(x.clone(), Some(sd), rm, false);
        let exponential = y
            .exponent()
            .map_or(false, |e| sd <= e || e <= self.config().to_exp_neg);
        Ok(signed(&y, unsigned(&y, exponential, Some(sd))))
    }

    // ========================================================================
    // Radix Notation
    // ========================================================================

    /// `0b`-prefixed binary, rounded to the precision in binary digits.
    pub fn to_binary(&self, x: &Decimal) -> String {
        self.radix_string(x, Radix::Binary, None, self.rm)
    }

    /// `0o`-prefixed octal, rounded to the precision in octal digits.
    pub fn to_octal(&self, x: &Decimal) -> String {
        self.radix_string(x, Radix::Octal, None, self.rm)
    }

    /// `0x`-prefixed hexadecimal, rounded to the precision in hex digits.
    pub fn to_hexadecimal(&self, x: &Decimal) -> String {
        self.radix_string(x, Radix::Hexadecimal, None, self.rm)
    }

    /// Radix notation. With `sd` the value is rounded to `sd` significant
    /// digits of the radix and written as `1.fff` times a power of two,
    /// e.g. `0x1.8p+1`.
    ///
    /// # Errors
    /// `InvalidArgument` unless `1 <= sd <= 1e9`.
    pub fn to_radix(
        &self,
        x: &Decimal,
        radix: Radix,
        sd: Option<u32>,
        rm: Option<Rounding>,
    ) -> DecimalResult<String> {
        if let Some(sd) = sd {
            check_sd(sd)?;
        }
        let rm = rm.unwrap_or(self.rm);
        Ok(self.radix_string(x, radix, sd.map(i64::from), rm))
    }

    fn radix_string(&self, x: &Decimal, radix: Radix, sd: Option<i64>, rm: Rounding) -> String {
        let xf = match x {
            Decimal::Finite(f) => f,
            special => return special.to_string(),
        };

        let base_out = radix as u32;
        let exponential = sd.is_some();
        // Exponent notation works on binary digits: one leading bit plus
        // whole groups for the remaining digits
        let (base, sd) = match sd {
            Some(sd) => (2, radix.bits() * (sd - 1) + 1),
            None => (base_out, self.pr),
        };

        let body = if xf.is_zero() {
            if exponential { "0p+0".to_string() } else { "0".to_string() }
        } else {
            let (digits, e) = radix_digits(xf, base, sd.max(1) as usize, rm);
            let text = numerals(&digits, base);
            let len = digits.len() as i64;

            if exponential {
                let mantissa = if len == 1 {
                    text
                } else if radix == Radix::Binary {
                    format!("{}.{}", &text[..1], &text[1..])
                } else {
                    let group = radix.bits() as usize;
                    let mut bits = digits;
                    while (bits.len() - 1) % group != 0 {
                        bits.push(0);
                    }
                    let mut out = convert_base(&bits, 2, base_out);
                    trim_zeros(&mut out);
                    format!("1.{}", numerals(&out[1..], base_out))
                };
                if e < 0 {
                    format!("{}p{}", mantissa, e)
                } else {
                    format!("{}p+{}", mantissa, e)
                }
            } else if e < 0 {
                format!("0.{}{}", "0".repeat((-e - 1) as usize), text)
            } else if e + 1 > len {
                format!("{}{}", text, "0".repeat((e + 1 - len) as usize))
            } else if e + 1 < len {
                format!("{}.{}", &text[..(e + 1) as usize], &text[(e + 1) as usize..])
            } else {
                text
            }
        };

        let sign = if xf.negative { "-" } else { "" };
        format!("{}{}{}", sign, radix.prefix(), body)
    }
}

/// Digits of `|x|` in `base`, rounded to `sd` digits with trailing zeros
/// removed, and the exponent of the leading digit.
fn radix_digits(x: &Finite, base: u32, sd: usize, rm: Rounding) -> (Vec<u32>, i64) {
    let coefficient = decimal_digits(&x.coefficient());
    let scale = x.exponent - coefficient.len() as i64 + 1;

    let (mut digits, mut e, inexact) = if scale >= 0 {
        let mut integer = coefficient;
        integer.resize(integer.len() + scale as usize, 0);
        let digits = convert_base(&integer, 10, base);
        let e = digits.len() as i64 - 1;
        (digits, e, false)
    } else {
        // Convert the digits as an integer, then divide by 10^fraction_len
        let numerator = convert_base(&coefficient, 10, base);
        let mut power = vec![0u32; (-scale) as usize + 1];
        power[0] = 1;
        let denominator = convert_base(&power, 10, base);

        let (mut q, inexact) = long_divide(&numerator, &denominator, base, sd + 3);
        let mut e = numerator.len() as i64 - denominator.len() as i64;
        if q.len() > 1 && q[0] == 0 {
            q.remove(0);
            e -= 1;
        }
        (q, e, inexact)
    };

    let rd = digits.get(sd).copied().unwrap_or(0);
    let sticky = inexact || digits.iter().skip(sd + 1).any(|&d| d != 0);
    let odd = sd > 0 && digits.get(sd - 1).map_or(false, |d| d & 1 == 1);

    if rounds_up(rm, x.negative, rd, base / 2, sticky, odd) {
        digits.truncate(sd);
        let mut i = sd;
        loop {
            i -= 1;
            digits[i] += 1;
            if digits[i] < base {
                break;
            }
            digits[i] = 0;
            if i == 0 {
                digits.insert(0, 1);
                e += 1;
                break;
            }
        }
    } else {
        digits.truncate(sd);
    }

    trim_zeros(&mut digits);
    (digits, e)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Config;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_to_string_thresholds() {
        let ctx = Context::new(Config::new().with_exponent_thresholds(-3, 5)).unwrap();
        assert_eq!(ctx.to_string(&d("123456")), "1.23456e+5");
        assert_eq!(ctx.to_string(&d("12345")), "12345");
        assert_eq!(ctx.to_string(&d("0.001")), "1e-3");
        assert_eq!(ctx.to_string(&d("0.01")), "0.01");
        assert_eq!(ctx.to_string(&d("-0")), "0");
        assert_eq!(ctx.value_of(&d("-0")), "-0");
        assert_eq!(ctx.to_string(&Decimal::infinity(true)), "-Infinity");
    }

    #[test]
    fn test_to_fixed() {
        let ctx = Context::default();
        assert_eq!(ctx.to_fixed(&d("1e21")), "1000000000000000000000");
        assert_eq!(ctx.to_fixed(&d("1e-7")), "0.0000001");
        assert_eq!(ctx.to_fixed_dp(&d("3.14159"), 2, None).unwrap(), "3.14");
        assert_eq!(ctx.to_fixed_dp(&d("2.5"), 3, None).unwrap(), "2.500");
        assert_eq!(ctx.to_fixed_dp(&d("0"), 2, None).unwrap(), "0.00");
        assert_eq!(ctx.to_fixed_dp(&d("0.5"), 0, Some(Rounding::HalfEven)).unwrap(), "0");
        assert_eq!(ctx.to_fixed_dp(&d("999.99"), 1, None).unwrap(), "1000.0");
    }

    #[test]
    fn test_to_fixed_keeps_sign_of_unrounded_value() {
        let ctx = Context::default();
        assert_eq!(ctx.to_fixed_dp(&d("-0.0001"), 2, None).unwrap(), "-0.00");
        assert_eq!(ctx.to_fixed_dp(&d("-0"), 1, None).unwrap(), "0.0");
    }

    #[test]
    fn test_to_exponential() {
        let ctx = Context::default();
        assert_eq!(ctx.to_exponential(&d("45.6")), "4.56e+1");
        assert_eq!(ctx.to_exponential(&d("-0.00012")), "-1.2e-4");
        assert_eq!(ctx.to_exponential_dp(&d("45.6"), 0, None).unwrap(), "5e+1");
        assert_eq!(ctx.to_exponential_dp(&d("45.6"), 3, None).unwrap(), "4.560e+1");
        assert_eq!(ctx.to_exponential_dp(&d("0"), 2, None).unwrap(), "0.00e+0");
    }

    #[test]
    fn test_to_precision() {
        let ctx = Context::default();
        assert_eq!(ctx.to_precision_sd(&d("45.6"), 5, None).unwrap(), "45.600");
        assert_eq!(ctx.to_precision_sd(&d("123456"), 2, None).unwrap(), "1.2e+5");
        assert_eq!(ctx.to_precision_sd(&d("0.000123"), 2, None).unwrap(), "0.00012");
        assert_eq!(ctx.to_precision_sd(&d("99.5"), 2, Some(Rounding::Down)).unwrap(), "99");
        assert_eq!(ctx.to_precision(&d("1.50")), "1.5");
    }

    #[test]
    fn test_argument_validation() {
        let ctx = Context::default();
        let x = d("1");
        assert!(ctx.to_fixed_dp(&x, MAX_DIGITS + 1, None).is_err());
        assert!(ctx.to_precision_sd(&x, 0, None).is_err());
        assert_eq!(
            ctx.to_radix(&x, Radix::Binary, Some(0), None),
            Err(DecimalError::InvalidArgument("0".to_string()))
        );
    }

    #[test]
    fn test_radix_integers() {
        let ctx = Context::default();
        assert_eq!(ctx.to_hexadecimal(&d("255")), "0xff");
        assert_eq!(ctx.to_binary(&d("10")), "0b1010");
        assert_eq!(ctx.to_octal(&d("-511")), "-0o777");
        assert_eq!(ctx.to_hexadecimal(&d("4096")), "0x1000");
        assert_eq!(ctx.to_binary(&d("0")), "0b0");
    }

    #[test]
    fn test_radix_fractions() {
        let ctx = Context::default();
        assert_eq!(ctx.to_binary(&d("0.5")), "0b0.1");
        assert_eq!(ctx.to_hexadecimal(&d("2.75")), "0x2.c");
        assert_eq!(ctx.to_binary(&d("0.125")), "0b0.001");
        assert_eq!(ctx.to_hexadecimal(&d("-0.1")), "-0x0.1999999999999999999a");
    }

    #[test]
    fn test_radix_exponent_notation() {
        let ctx = Context::default();
        let hex = |s: &str, sd| ctx.to_radix(&d(s), Radix::Hexadecimal, Some(sd), None).unwrap();
        assert_eq!(hex("256", 1), "0x1p+8");
        assert_eq!(hex("3", 2), "0x1.8p+1");
        assert_eq!(hex("255", 2), "0x1p+8");
        assert_eq!(hex("0", 3), "0x0p+0");
        assert_eq!(
            ctx.to_radix(&d("0.1"), Radix::Binary, Some(5), None).unwrap(),
            "0b1.101p-4"
        );
        assert_eq!(
            ctx.to_radix(&d("-0"), Radix::Octal, Some(1), None).unwrap(),
            "-0o0p+0"
        );
    }

    #[test]
    fn test_radix_special_values() {
        let ctx = Context::default();
        assert_eq!(ctx.to_binary(&Decimal::NaN), "NaN");
        assert_eq!(ctx.to_hexadecimal(&Decimal::infinity(true)), "-Infinity");
    }

    #[test]
    fn test_radix_round_trip_through_parse() {
        let ctx = Context::default();
        for text in ["0x1.8p+1", "0b1.101p-4", "0x1p+8"] {
            let x = ctx.parse(text).unwrap();
            let sd = if text.starts_with("0b") { 4 } else { 2 };
            let radix = if text.starts_with("0b") { Radix::Binary } else { Radix::Hexadecimal };
            assert_eq!(ctx.to_radix(&x, radix, Some(sd), None).unwrap(), text);
        }
    }
}
