// ============================================================================
// Digit Words
// Base 1e7 word arrays backing arbitrary-precision decimals
// ============================================================================

use smallvec::SmallVec;

/// Radix of one storage word.
pub(crate) const BASE: u32 = 10_000_000;

/// Decimal digits held by one storage word.
pub(crate) const LOG_BASE: i64 = 7;

/// Most-significant-first digit words; up to six words live inline.
pub(crate) type Words = SmallVec<[u32; 6]>;

/// Powers of ten up to `BASE / 10`.
pub(crate) const POWS_TEN: [u32; 8] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000, 10_000_000];

/// Number of decimal digits in a word (zero counts as one digit).
#[inline]
pub(crate) fn word_digits(mut w: u32) -> i64 {
    let mut n = 1;
    while w >= 10 {
        w /= 10;
        n += 1;
    }
    n
}

/// Base-10 exponent of the leading digit given the exponent of the leading word.
#[inline]
pub(crate) fn base10_exponent(digits: &[u32], word_exponent: i64) -> i64 {
    let first = digits.first().copied().unwrap_or(0);
    word_exponent * LOG_BASE + word_digits(first) - 1
}

/// Remove trailing zero words, always keeping at least one word.
pub(crate) fn strip_trailing(digits: &mut Words) {
    while digits.len() > 1 && digits.last() == Some(&0) {
        digits.pop();
    }
}

/// Remove leading zero words, returning how many were removed.
pub(crate) fn strip_leading(digits: &mut Words) -> usize {
    let zeros = digits.iter().take_while(|&&w| w == 0).count();
    if zeros == digits.len() {
        digits.clear();
        digits.push(0);
        return zeros.saturating_sub(1);
    }
    if zeros > 0 {
        digits.drain(..zeros);
    }
    zeros
}

/// True when every word is zero.
#[inline]
pub(crate) fn is_zero_words(digits: &[u32]) -> bool {
    digits.iter().all(|&w| w == 0)
}

/// All digits of a word array, the first word unpadded, trailing zeros removed.
pub(crate) fn digits_to_string(digits: &[u32]) -> String {
    let mut out = String::with_capacity(digits.len() * LOG_BASE as usize);
    let mut iter = digits.iter();
    if let Some(first) = iter.next() {
        out.push_str(&first.to_string());
    }
    for w in iter {
        out.push_str(&format!("{:07}", w));
    }
    let trimmed = out.trim_end_matches('0').len();
    if trimmed == 0 {
        out.truncate(1);
    } else {
        out.truncate(trimmed);
    }
    out
}

/// Number of significant digits, excluding trailing zeros.
pub(crate) fn significant_digits(digits: &[u32]) -> i64 {
    let last_index = digits.len().saturating_sub(1);
    let mut len = last_index as i64 * LOG_BASE + 1;
    let mut last = digits.get(last_index).copied().unwrap_or(0);
    if last != 0 {
        while last % 10 == 0 {
            last /= 10;
            len -= 1;
        }
        len += word_digits(digits[0]) - 1;
    }
    len
}

/// Decimal digit at `index` counting from the most significant digit of the
/// array (first word unpadded). Digits past the end read as zero.
pub(crate) fn digit_at(digits: &[u32], index: i64) -> u32 {
    if index < 0 {
        return 0;
    }
    let first_len = word_digits(digits.first().copied().unwrap_or(0));
    let (word, pos) = if index < first_len {
        (0usize, first_len - 1 - index)
    } else {
        let rest = index - first_len;
        ((rest / LOG_BASE) as usize + 1, LOG_BASE - 1 - rest % LOG_BASE)
    };
    match digits.get(word) {
        Some(&w) => (w / POWS_TEN[pos as usize]) % 10,
        None => 0,
    }
}

/// True when any digit at or after `index` is non-zero.
pub(crate) fn nonzero_from(digits: &[u32], index: i64) -> bool {
    if index <= 0 {
        return !is_zero_words(digits);
    }
    let first_len = word_digits(digits.first().copied().unwrap_or(0));
    let (word, pos) = if index < first_len {
        (0usize, first_len - 1 - index)
    } else {
        let rest = index - first_len;
        ((rest / LOG_BASE) as usize + 1, LOG_BASE - 1 - rest % LOG_BASE)
    };
    match digits.get(word) {
        Some(&w) => w % POWS_TEN[pos as usize + 1] != 0 || !is_zero_words(&digits[word + 1..]),
        None => false,
    }
}
