pub mod normalizer;

pub use normalizer::{normalize, NormalizeError, NormalizedImage};
