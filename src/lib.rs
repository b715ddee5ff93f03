// ============================================================================
// Decimal Engine Library
// Arbitrary-precision decimal arithmetic with configurable rounding
// ============================================================================

//! # Decimal Engine
//!
//! Base-10 arbitrary-precision numbers with correctly rounded results.
//!
//! ## Features
//!
//! - **Configurable precision** from 1 to 1e9 significant digits
//! - **Nine rounding modes** plus a Euclidean modulo mode
//! - **Transcendental functions** (exp, ln, log, pow, trigonometric,
//!   hyperbolic and their inverses, square and cube roots)
//! - **Radix literals and output** in binary, octal and hexadecimal
//! - **Signed zero, Infinity and NaN** with IEEE-style propagation
//! - **Random values** from a thread-local or operating system source
//!
//! ## Example
//!
//! ```rust
//! use decimal_engine::prelude::*;
//!
//! // Every configuration-dependent operation goes through a context
//! let mut ctx = Context::default();
//!
//! let third = ctx.div(&Decimal::from(1), &Decimal::from(3));
//! assert_eq!(third.to_string(), "0.33333333333333333333");
//!
//! // Contexts are independent values
//! let mut coarse = ctx;
//! coarse.set_precision(5).unwrap();
//! coarse.set_rounding(Rounding::Floor);
//! assert_eq!(coarse.sqrt(&Decimal::from(2)).to_string(), "1.4142");
//!
//! // Radix notation
//! let x = ctx.parse("0x1.8p+1").unwrap();
//! assert_eq!(x.to_string(), "3");
//! assert_eq!(ctx.to_hexadecimal(&Decimal::from(255)), "0xff");
//!
//! ctx.set_precision(10).unwrap();
//! let pi = ctx.acos(&Decimal::from(-1)).unwrap();
//! assert_eq!(pi.to_string(), "3.141592654");
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{Config, ModuloMode, Rounding};
    pub use crate::engine::{Context, Radix};
    pub use crate::interfaces::{RandomSource, SecureRandom, SeededRandom, ThreadRandom};
    pub use crate::numeric::{Decimal, DecimalError, DecimalResult};
}

#[cfg(test)]
mod integration_tests {
    use super::prelude::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_values_are_thread_safe() {
        assert_send_sync::<Context>();
        assert_send_sync::<Config>();
        assert_send_sync::<Decimal>();
    }

    #[test]
    fn test_one_third() {
        let ctx = Context::default();
        assert_eq!(ctx.div(&d("1"), &d("3")).to_string(), "0.33333333333333333333");
    }

    #[test]
    fn test_square_root_as_power() {
        let mut ctx = Context::default();
        ctx.set_precision(10).unwrap();
        assert_eq!(ctx.pow(&d("2"), &d("0.5")).unwrap().to_string(), "1.414213562");
    }

    #[test]
    fn test_no_binary_float_artifacts() {
        let ctx = Context::default();
        assert_eq!(ctx.add(&d("0.1"), &d("0.2")).to_string(), "0.3");
    }

    #[test]
    fn test_negative_half_rounding() {
        let mut ctx = Context::default();
        ctx.set_rounding(Rounding::Floor);
        assert_eq!(ctx.round(&d("-0.5")).to_string(), "-1");
        ctx.set_rounding(Rounding::Ceil);
        assert_eq!(ctx.round(&d("-0.5")).to_string(), "-0");
    }

    #[test]
    fn test_rounding_mode_table() {
        let expected = [
            (Rounding::Up, "1.3", "-1.3"),
            (Rounding::Down, "1.2", "-1.2"),
            (Rounding::Ceil, "1.3", "-1.2"),
            (Rounding::Floor, "1.2", "-1.3"),
            (Rounding::HalfUp, "1.3", "-1.3"),
            (Rounding::HalfDown, "1.2", "-1.2"),
            (Rounding::HalfEven, "1.2", "-1.2"),
            (Rounding::HalfCeil, "1.3", "-1.2"),
            (Rounding::HalfFloor, "1.2", "-1.3"),
        ];
        let ctx = Context::default();
        for (rm, positive, negative) in expected {
            let up = ctx.to_significant_digits(&d("1.25"), 2, Some(rm)).unwrap();
            let down = ctx.to_significant_digits(&d("-1.25"), 2, Some(rm)).unwrap();
            assert_eq!(up.to_string(), positive, "{}", rm);
            assert_eq!(down.to_string(), negative, "{}", rm);

            let zero = ctx.to_significant_digits(&d("-0"), 2, Some(rm)).unwrap();
            assert!(zero.is_zero() && zero.is_negative(), "{}", rm);
        }
    }

    #[test]
    fn test_special_value_algebra() {
        let ctx = Context::default();
        let inf = Decimal::infinity(false);
        let ninf = Decimal::infinity(true);

        assert_eq!(ctx.div(&d("5"), &d("0")), inf);
        assert_eq!(ctx.div(&d("-5"), &d("0")), ninf);
        assert_eq!(ctx.div(&d("5"), &d("-0")), ninf);
        assert!(ctx.div(&d("0"), &d("0")).is_nan());
        assert!(ctx.sub(&inf, &inf).is_nan());
        assert_eq!(ctx.add(&inf, &inf), inf);
        assert_eq!(ctx.pow(&d("0"), &d("0")).unwrap(), Decimal::one());
        assert_eq!(ctx.pow(&ninf, &d("3")).unwrap(), ninf);
    }

    #[test]
    fn test_context_clones_share_values() {
        let base = Context::default();
        let mut narrow = base;
        narrow.set_precision(3).unwrap();

        let x = narrow.div(&d("2"), &d("3"));
        assert_eq!(x.to_string(), "0.667");
        assert_eq!(base.mul(&x, &d("3")).to_string(), "2.001");
        assert_eq!(base.precision(), 20);
    }

    #[test]
    fn test_log_and_power_agree() {
        let ctx = Context::default();
        let x = ctx.pow(&d("10"), &d("-3")).unwrap();
        assert_eq!(x.to_string(), "0.001");
        assert_eq!(ctx.log10(&x).unwrap().to_string(), "-3");
    }

    // ========================================================================
    // Properties
    // ========================================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        /// Decimal literal built from a signed mantissa and an exponent.
        fn literal() -> impl Strategy<Value = String> {
            (any::<i64>(), -40i64..40).prop_map(|(m, e)| format!("{}e{}", m, e))
        }

        /// Within one unit of the last digit of `expected` at `precision`.
        fn close(ctx: &Context, actual: &Decimal, expected: &Decimal, precision: i64) -> bool {
            let e = expected.exponent().unwrap_or(0);
            let tolerance = Decimal::from_scaled(false, 1, e - precision + 1);
            ctx.sub(actual, expected).abs() <= tolerance
        }

        proptest! {
            #[test]
            fn parse_format_round_trip(text in literal()) {
                let ctx = Context::default();
                let x = ctx.parse(&text).unwrap();
                prop_assert_eq!(ctx.parse(&x.to_string()).unwrap(), x.clone());
                prop_assert_eq!(ctx.parse(&ctx.to_exponential(&x)).unwrap(), x.clone());
                prop_assert_eq!(ctx.parse(&ctx.to_fixed(&x)).unwrap(), x);
            }

            #[test]
            fn rounding_is_idempotent(text in literal(), sd in 1u32..25, mode in 0usize..9) {
                let ctx = Context::default();
                let rm = Rounding::ALL[mode];
                let x = ctx.parse(&text).unwrap();
                let once = ctx.to_significant_digits(&x, sd, Some(rm)).unwrap();
                let twice = ctx.to_significant_digits(&once, sd, Some(rm)).unwrap();
                prop_assert_eq!(once, twice);
            }

            #[test]
            fn add_and_mul_commute(a in literal(), b in literal()) {
                let ctx = Context::default();
                let (x, y) = (ctx.parse(&a).unwrap(), ctx.parse(&b).unwrap());
                prop_assert_eq!(ctx.add(&x, &y), ctx.add(&y, &x));
                prop_assert_eq!(ctx.mul(&x, &y), ctx.mul(&y, &x));
            }

            #[test]
            fn exp_inverts_ln(m in 1u64..1_000_000_000, e in -20i64..20) {
                let ctx = Context::default();
                let x = Decimal::from_scaled(false, u128::from(m), e);
                let back = ctx.exp(&ctx.ln(&x).unwrap());
                prop_assert!(close(&ctx, &back, &x, 18), "{} vs {}", back, x);
            }

            #[test]
            fn pythagorean_identity(m in -1_000_000i64..1_000_000, e in -8i64..2) {
                let ctx = Context::default();
                let x = Decimal::from_scaled(m < 0, u128::from(m.unsigned_abs()), e);
                let s = ctx.sin(&x).unwrap();
                let c = ctx.cos(&x).unwrap();
                let one = ctx.add(&ctx.mul(&s, &s), &ctx.mul(&c, &c));
                prop_assert!(close(&ctx, &one, &Decimal::one(), 18), "{} at {}", one, x);
            }
        }

        #[test]
        fn subtraction_undoes_addition() {
            fn property(a: i64, b: i64) -> bool {
                let ctx = Context::default();
                let (x, y) = (Decimal::from(a), Decimal::from(b));
                ctx.sub(&ctx.add(&x, &y), &y) == x
            }
            quickcheck::quickcheck(property as fn(i64, i64) -> bool);
        }
    }
}
