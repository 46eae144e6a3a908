pub use serde::{Deserialize, Serialize};

pub use ndarray::*;
pub use ndarray_rand::rand_distr::{Normal, Uniform};
pub use ndarray_rand::RandomExt;

pub use crate::error::*;
pub use crate::models::{Sequential, TrainConfig};

// Internal re-exports
pub use crate::core::{Activation, Dense, LayerTrait, Loss};
