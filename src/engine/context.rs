// ============================================================================
// Decimal Context
// Owns a configuration and applies it to every rounded operation
// ============================================================================

use crate::domain::{Config, ModuloMode, Rounding};
use crate::interfaces::SecureRandom;
use crate::numeric::{Decimal, DecimalError, DecimalResult, Finite};

/// A configured decimal arithmetic environment.
///
/// Contexts are plain values: copying one yields an independently
/// configurable context, and values produced by one context can be used
/// with any other.
///
/// # Example
/// ```
/// use decimal_engine::prelude::*;
///
/// let mut ctx = Context::default();
/// ctx.set_precision(10).unwrap();
///
/// let two = Decimal::from(2);
/// let root = ctx.pow(&two, &ctx.parse("0.5").unwrap()).unwrap();
/// assert_eq!(root.to_string(), "1.414213562");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    config: Config,

    /// Working precision in significant digits
    pub(crate) pr: i64,

    /// Working rounding mode
    pub(crate) rm: Rounding,

    /// Results are rounded and bounded on completion. Internal algorithms
    /// clear this to keep intermediate sums and products exact.
    pub(crate) external: bool,
}

impl Default for Context {
    fn default() -> Self {
        Context::from_valid(Config::default())
    }
}

impl Context {
    /// Create a context after validating `config`.
    ///
    /// # Errors
    /// - `InvalidArgument` if a field is out of range
    /// - `SecureRandomUnavailable` if `crypto` is set and the operating
    ///   system provides no entropy
    pub fn new(config: Config) -> DecimalResult<Self> {
        check(&config)?;
        tracing::debug!(?config, "decimal context created");
        Ok(Context::from_valid(config))
    }

    fn from_valid(config: Config) -> Self {
        Context {
            config,
            pr: config.precision as i64,
            rm: config.rounding,
            external: true,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn precision(&self) -> u32 {
        self.config.precision
    }

    #[inline]
    pub fn rounding(&self) -> Rounding {
        self.config.rounding
    }

    #[inline]
    pub fn modulo_mode(&self) -> ModuloMode {
        self.config.modulo
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replace the whole configuration. On error the context is unchanged.
    pub fn configure(&mut self, config: Config) -> DecimalResult<()> {
        check(&config)?;
        tracing::debug!(?config, "decimal context reconfigured");
        *self = Context::from_valid(config);
        Ok(())
    }

    pub fn set_precision(&mut self, precision: u32) -> DecimalResult<()> {
        self.configure(self.config.with_precision(precision))
    }

    pub fn set_rounding(&mut self, rounding: Rounding) {
        tracing::debug!(%rounding, "rounding mode changed");
        self.config.rounding = rounding;
        self.rm = rounding;
    }

    pub fn set_modulo(&mut self, modulo: ModuloMode) {
        tracing::debug!(?modulo, "modulo mode changed");
        self.config.modulo = modulo;
    }

    /// Switch between the thread-local and the operating system random source.
    pub fn set_crypto(&mut self, crypto: bool) -> DecimalResult<()> {
        self.configure(self.config.with_crypto(crypto))
    }

    /// Restore library defaults.
    pub fn reset(&mut self) {
        tracing::debug!("decimal context reset to defaults");
        *self = Context::default();
    }

    // ========================================================================
    // Working State
    // ========================================================================

    /// Copy with a different working precision and rounding mode.
    #[inline]
    pub(crate) fn working(&self, pr: i64, rm: Rounding) -> Context {
        Context { pr, rm, ..*self }
    }

    /// Copy that leaves sums, differences and products unrounded.
    #[inline]
    pub(crate) fn internal(&self) -> Context {
        Context {
            external: false,
            ..*self
        }
    }

    /// Round `x` to `sd` significant digits (when given) and, in external
    /// mode, apply the exponent bounds: overflow gives ±Infinity and
    /// underflow gives a zero of the same sign.
    pub(crate) fn finalise(
        &self,
        x: Decimal,
        sd: Option<i64>,
        rm: Rounding,
        truncated: bool,
    ) -> Decimal {
        let mut x = match x {
            Decimal::Finite(x) => x,
            special => return special,
        };
        if let Some(sd) = sd {
            x.round(sd, rm, truncated);
        }
        if self.external {
            self.bound(x)
        } else {
            Decimal::Finite(x)
        }
    }

    /// Round to the working precision and rounding mode.
    #[inline]
    pub(crate) fn round_working(&self, x: Decimal) -> Decimal {
        self.finalise(x, Some(self.pr), self.rm, false)
    }

    /// Round to the working precision only in external mode.
    #[inline]
    pub(crate) fn settle(&self, x: Decimal) -> Decimal {
        if self.external {
            self.round_working(x)
        } else {
            x
        }
    }

    fn bound(&self, x: Finite) -> Decimal {
        if x.exponent > self.config.max_e {
            Decimal::infinity(x.negative)
        } else if x.exponent < self.config.min_e {
            Decimal::signed_zero(x.negative)
        } else {
            Decimal::Finite(x)
        }
    }
}

fn check(config: &Config) -> DecimalResult<()> {
    config.validate()?;
    if config.crypto && !SecureRandom::is_available() {
        return Err(DecimalError::SecureRandomUnavailable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_context() {
        let ctx = Context::default();
        assert_eq!(ctx.precision(), 20);
        assert_eq!(ctx.rounding(), Rounding::HalfUp);
        assert_eq!(ctx.modulo_mode(), ModuloMode::Down);
        assert_eq!(ctx.pr, 20);
        assert!(ctx.external);
    }

    #[test]
    fn test_internal_copy_leaves_original_external() {
        let ctx = Context::default();
        let inner = ctx.internal().working(40, Rounding::Down);
        assert!(!inner.external);
        assert_eq!(inner.pr, 40);
        assert!(ctx.external);
        assert_eq!(ctx.pr, 20);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Context::new(Config::new().with_precision(0)).is_err());

        let mut ctx = Context::default();
        assert!(ctx.set_precision(1_000_000_001).is_err());
        assert_eq!(ctx.precision(), 20);
    }

    #[test]
    fn test_clones_are_independent() {
        let base = Context::default();
        let mut clone = base;
        clone.set_precision(5).unwrap();
        clone.set_rounding(Rounding::Floor);

        assert_eq!(base.precision(), 20);
        assert_eq!(clone.precision(), 5);
        assert_eq!(clone.rm, Rounding::Floor);

        clone.reset();
        assert_eq!(clone, base);
    }

    #[test]
    fn test_finalise_bounds() {
        let ctx = Context::new(Config::new().with_exponent_bounds(-5, 5)).unwrap();

        let big = ctx.parse("123456").unwrap();
        assert_eq!(big, Decimal::infinity(false));

        let tiny = ctx.parse("-0.000001").unwrap();
        assert!(tiny.is_zero());
        assert!(tiny.is_negative());

        let inner = Context::default().parse("123456").unwrap();
        assert_eq!(ctx.internal().finalise(inner.clone(), None, Rounding::HalfUp, false), inner);
    }
}
