pub mod crossover;

pub use crossover::{cross_indices, detect_cross};
