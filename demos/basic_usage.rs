// ============================================================================
// Basic Usage Example
// ============================================================================

use decimal_engine::prelude::*;

fn main() -> DecimalResult<()> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Decimal Engine Example ===\n");

    let mut ctx = Context::default();
    let one = Decimal::from(1);
    let three = Decimal::from(3);

    // Exact decimal arithmetic
    println!("0.1 + 0.2 = {}", ctx.add(&ctx.parse("0.1")?, &ctx.parse("0.2")?));
    println!("1 / 3     = {}", ctx.div(&one, &three));

    // Transcendental functions at the context precision
    println!("\n=== Functions (precision {}) ===", ctx.precision());
    println!("sqrt(2)   = {}", ctx.sqrt(&Decimal::from(2)));
    println!("exp(1)    = {}", ctx.exp(&one));
    println!("ln(10)    = {}", ctx.ln(&Decimal::from(10))?);
    println!("sin(1)    = {}", ctx.sin(&one)?);
    println!("atan2(1, -1) = {}", ctx.atan2(&one, &Decimal::from(-1))?);

    // Rounding modes
    println!("\n=== Rounding -2.5 ===");
    let x = ctx.parse("-2.5")?;
    for rm in Rounding::ALL {
        ctx.set_rounding(rm);
        println!("  {:<16} {}", rm.to_string(), ctx.round(&x));
    }
    ctx.reset();

    // Formatting
    println!("\n=== Formatting 255.5 ===");
    let y = ctx.parse("255.5")?;
    println!("  to_fixed_dp(3)       {}", ctx.to_fixed_dp(&y, 3, None)?);
    println!("  to_exponential_dp(2) {}", ctx.to_exponential_dp(&y, 2, None)?);
    println!("  to_precision_sd(2)   {}", ctx.to_precision_sd(&y, 2, None)?);
    println!("  to_hexadecimal       {}", ctx.to_hexadecimal(&y));
    println!("  to_binary            {}", ctx.to_binary(&y));
    println!("  to_radix(hex, 3)     {}", ctx.to_radix(&y, Radix::Hexadecimal, Some(3), None)?);

    // An independent context with its own configuration
    let mut money = Context::new(Config::bankers())?;
    money.set_precision(10)?;
    println!("\n=== Banker's rounding ===");
    println!("  2.345 to 2 dp = {}", money.to_decimal_places(&money.parse("2.345")?, 2, None)?);

    // Random values
    println!("\n=== Random ===");
    println!("  random()          {}", ctx.random()?);
    println!("  seeded, 10 digits {}", ctx.random_from(&mut SeededRandom::new(1), Some(10))?);

    Ok(())
}
