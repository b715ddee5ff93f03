// ============================================================================
// Random Values
// Uniform decimals in [0, 1) with a chosen number of significant digits
// ============================================================================

use super::context::Context;
use crate::domain::MAX_DIGITS;
use crate::interfaces::{RandomSource, SecureRandom, ThreadRandom};
use crate::numeric::digits::{Words, LOG_BASE, POWS_TEN};
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};

impl Context {
    /// Uniform value in `[0, 1)` with up to `precision` decimal places,
    /// drawn from the operating system when `crypto` is set.
    ///
    /// # Errors
    /// `SecureRandomUnavailable` if the secure source fails.
    pub fn random(&self) -> DecimalResult<Decimal> {
        self.random_digits(self.pr)
    }

    /// Uniform value in `[0, 1)` with up to `sd` decimal places.
    ///
    /// # Errors
    /// `InvalidArgument` unless `1 <= sd <= 1e9`.
    pub fn random_with(&self, sd: u32) -> DecimalResult<Decimal> {
        if sd < 1 || sd > MAX_DIGITS {
            return Err(DecimalError::invalid(sd));
        }
        self.random_digits(sd as i64)
    }

    /// Uniform value in `[0, 1)` drawn from `source`, with `sd` (default
    /// precision) decimal places.
    pub fn random_from(
        &self,
        source: &mut impl RandomSource,
        sd: Option<u32>,
    ) -> DecimalResult<Decimal> {
        let sd = match sd {
            Some(sd) if sd < 1 || sd > MAX_DIGITS => return Err(DecimalError::invalid(sd)),
            Some(sd) => sd as i64,
            None => self.pr,
        };
        random_words(source, sd)
    }

    fn random_digits(&self, sd: i64) -> DecimalResult<Decimal> {
        if self.config().crypto {
            random_words(&mut SecureRandom, sd)
        } else {
            random_words(&mut ThreadRandom, sd)
        }
    }
}

/// `0.w₀w₁…` from `ceil(sd / 7)` words, the digits past `sd` cleared.
fn random_words(source: &mut impl RandomSource, sd: i64) -> DecimalResult<Decimal> {
    let k = ((sd + LOG_BASE - 1) / LOG_BASE) as usize;
    let mut words = Words::with_capacity(k);
    for _ in 0..k {
        words.push(source.next_word()?);
    }

    let partial = sd % LOG_BASE;
    if partial != 0 {
        if let Some(last) = words.last_mut() {
            let unit = POWS_TEN[(LOG_BASE - partial) as usize];
            *last = *last / unit * unit;
        }
    }

    tracing::trace!(sd, words = k, "random decimal drawn");
    Ok(Decimal::Finite(Finite::from_words(false, words, -1)))
}

// ============================================================================
// Tests
// ============================================================================
