// src/core.rs
pub mod activations;
pub mod layers;
pub mod losses;

// Re-export commonly used items
pub use activations::Activation;
pub use layers::{Dense, LayerTrait};
pub use losses::{criteria, Loss};
