//! OCR pipeline: image variants, VLM prediction, and response normalization.

pub mod client;
pub mod normalize;
pub mod preprocess;

pub use client::{PlatePredictor, VlmClient};
pub use normalize::normalize_prediction;
pub use preprocess::generate_variants;
