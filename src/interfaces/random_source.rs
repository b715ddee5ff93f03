// ============================================================================
// Random Source Interface
// Supplies the base-1e7 words that random decimals are built from
// ============================================================================

use crate::numeric::digits::BASE;
use crate::numeric::{DecimalError, DecimalResult};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, SeedableRng, TryRngCore};

/// Largest accepted raw value from the secure source; anything at or above
/// it is redrawn so every word stays uniform.
const SECURE_LIMIT: u32 = 4_290_000_000;

/// Source of uniformly distributed words in `[0, 1e7)`.
pub trait RandomSource {
    /// Next word.
    fn next_word(&mut self) -> DecimalResult<u32>;
}

/// Thread-local generator, used unless `crypto` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    #[inline]
    fn next_word(&mut self) -> DecimalResult<u32> {
        Ok(rand::rng().random_range(0..BASE))
    }
}

/// Operating system entropy, used when `crypto` is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecureRandom;

impl SecureRandom {
    /// Whether the operating system can supply entropy.
    pub fn is_available() -> bool {
        let available = OsRng.try_next_u32().is_ok();
        if !available {
            tracing::debug!("operating system entropy unavailable");
        }
        available
    }
}

impl RandomSource for SecureRandom {
    fn next_word(&mut self) -> DecimalResult<u32> {
        loop {
            let n = OsRng
                .try_next_u32()
                .map_err(|_| DecimalError::SecureRandomUnavailable)?;
            // 0 <= n < 4.29e9 keeps n % 1e7 uniform
            if n < SECURE_LIMIT {
                return Ok(n % BASE);
            }
        }
    }
}

/// Reproducible generator for tests and simulations.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        SeededRandom {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    #[inline]
    fn next_word(&mut self) -> DecimalResult<u32> {
        Ok(self.rng.random_range(0..BASE))
    }
}
