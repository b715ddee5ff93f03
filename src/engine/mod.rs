// ============================================================================
// Engine Module
// Contains the decimal arithmetic and function evaluation
// ============================================================================

mod arithmetic;
mod context;
mod division;
mod exponential;
mod format;
mod hyperbolic;
mod parse;
mod random;
mod roots;
mod rounding;
mod trigonometry;

pub use context::Context;
pub use format::Radix;

pub(crate) use parse::parse_plain;
