//! CER scoring: sequence alignment and error-rate computation.

pub mod align;
pub mod cer;

pub use cer::{calculate_cer, detailed_cer, CerBreakdown};
