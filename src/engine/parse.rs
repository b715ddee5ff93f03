// ============================================================================
// Parsing
// Decimal, binary, octal and hexadecimal literals
// ============================================================================

use super::context::Context;
use super::division::convert_base;
use crate::numeric::digits::BASE;
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};

/// Exponents beyond this are clamped; any configured bound is far smaller.
const EXPONENT_CLAMP: i64 = 100_000_000_000_000_000;

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Remove `_` separators that sit between two digits.
fn strip_separators(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            !(c == '_'
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).map_or(false, |n| n.is_ascii_digit()))
        })
        .map(|(_, &c)| c)
        .collect()
}

/// Split `int[.frac]` where every digit satisfies `is_digit`. Either part may
/// be empty but not both, and a bare `.` is rejected.
fn split_mantissa(text: &str, is_digit: impl Fn(char) -> bool) -> Option<(&str, &str)> {
    let (int, frac) = match text.find('.') {
        Some(i) => (&text[..i], &text[i + 1..]),
        None => (text, ""),
    };
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    if !int.chars().all(&is_digit) || !frac.chars().all(&is_digit) {
        return None;
    }
    Some((int, frac))
}

/// Signed decimal integer, saturating.
fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = split_sign(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let magnitude = digits
        .bytes()
        .fold(0i64, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as i64));
    Some(if negative { -magnitude } else { magnitude })
}

/// `digits[.digits][e[+-]digits]`, case-insensitive.
fn parse_decimal(negative: bool, text: &str) -> Option<Finite> {
    let (mantissa, exponent) = match text.find(['e', 'E']) {
        Some(i) => (&text[..i], parse_exponent(&text[i + 1..])?),
        None => (text, 0),
    };
    let (int, frac) = split_mantissa(mantissa, |c| c.is_ascii_digit())?;

    let mut coefficient = Vec::with_capacity(int.len() + frac.len());
    coefficient.extend_from_slice(int.as_bytes());
    coefficient.extend_from_slice(frac.as_bytes());

    let lead = (int.len() as i64 - 1)
        .saturating_add(exponent)
        .clamp(-EXPONENT_CLAMP, EXPONENT_CLAMP);
    Some(Finite::from_coefficient(negative, &coefficient, lead))
}

fn parse_special(negative: bool, text: &str) -> Option<Decimal> {
    match text {
        "Infinity" => Some(Decimal::infinity(negative)),
        "NaN" => Some(Decimal::NaN),
        _ => None,
    }
}

/// Parse decimal notation and the special literals without applying any
/// configuration.
pub(crate) fn parse_plain(text: &str) -> Option<Decimal> {
    let (negative, body) = split_sign(text);
    if let Some(special) = parse_special(negative, body) {
        return Some(special);
    }
    parse_decimal(negative, &strip_separators(body)).map(Decimal::Finite)
}

impl Context {
    /// Parse a literal.
    ///
    /// Accepted forms, each with an optional leading `+` or `-`:
    /// - decimal: `123`, `1.5`, `.5`, `5.`, `1e-7`, `1_000.5`
    /// - `Infinity` and `NaN`
    /// - binary, octal and hexadecimal with a `0b`, `0o` or `0x` prefix, an
    ///   optional fraction and an optional power-of-two exponent: `0x1.8p+1`
    ///
    /// Values beyond the exponent bounds become ±Infinity or ±0.
    ///
    /// # Errors
    /// `InvalidArgument` carrying the input when it matches no form.
    pub fn parse(&self, text: &str) -> DecimalResult<Decimal> {
        let (negative, body) = split_sign(text);
        if let Some(special) = parse_special(negative, body) {
            return Ok(special);
        }

        let body = strip_separators(body);
        if let Some(x) = parse_decimal(negative, &body) {
            return Ok(self.finalise(Decimal::Finite(x), None, self.rm, false));
        }
        self.parse_radix(negative, &body)
            .ok_or_else(|| DecimalError::invalid(text))?
    }

    /// `None` when `text` is not a radix literal; otherwise the parsed value.
    fn parse_radix(&self, negative: bool, text: &str) -> Option<DecimalResult<Decimal>> {
        let base: u32 = match text.get(..2)? {
            "0x" | "0X" => 16,
            "0b" | "0B" => 2,
            "0o" | "0O" => 8,
            _ => return None,
        };
        let rest = &text[2..];

        let (mantissa, binary_exponent) = match rest.find(['p', 'P']) {
            Some(i) => (&rest[..i], Some(parse_exponent(&rest[i + 1..])?)),
            None => (rest, None),
        };
        let (int, frac) = split_mantissa(mantissa, |c| c.to_digit(base).is_some())?;

        let values: Vec<u32> = int
            .chars()
            .chain(frac.chars())
            .filter_map(|c| c.to_digit(base))
            .collect();
        let words = convert_base(&values, base, BASE);
        let word_exponent = words.len() as i64 - 1;
        let x = Finite::from_words(negative, words.into_iter().collect(), word_exponent);
        if x.is_zero() {
            return Some(Ok(Decimal::signed_zero(negative)));
        }

        let inner = self.internal();
        let mut x = Decimal::Finite(x);

        if !frac.is_empty() {
            let n = frac.len() as u64;
            let divisor = inner.int_pow(&Decimal::from(base), n, 2 * n as i64);
            x = inner.divide(&x, &divisor, 4 * values.len() as i64, self.rm, false);
        }

        if let Some(p) = binary_exponent {
            let factor = if p.abs() < 54 {
                if p >= 0 {
                    Decimal::from(1u64 << p)
                } else {
                    Decimal::from_scaled(false, 5u128.pow((-p) as u32), p)
                }
            } else {
                match inner.pow(&Decimal::from(2), &Decimal::from(p)) {
                    Ok(factor) => factor,
                    Err(e) => return Some(Err(e)),
                }
            };
            x = inner.mul(&x, &factor);
        }

        tracing::trace!(base, "parsed radix literal");
        Some(Ok(self.finalise(x, None, self.rm, false)))
    }
}

// ============================================================================
// Tests
// ============================================================================
