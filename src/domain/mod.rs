// ============================================================================
// Domain Models Module
// Configuration values shared by every decimal context
// ============================================================================

pub mod config;

pub use config::{Config, ModuloMode, Rounding, EXP_LIMIT, MAX_DIGITS};
