pub mod core;
pub mod error;
pub mod models;
pub mod prelude;
pub mod utils;

// Re-export types
pub use crate::core::{Activation, Dense, LayerTrait, Loss};
pub use crate::models::{Sequential, TrainConfig};
