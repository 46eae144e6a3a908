use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Model construction errors
    InvalidLayerConfiguration(String),
    EmptyModel,

    // Training errors
    InvalidTrainingConfiguration(String),
    ShapeMismatch(String),

    // Activation / loss selection errors
    InvalidActivation(String),
    InvalidLoss(String),

    // Call-order errors
    StaleCache(String),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::InvalidLayerConfiguration(msg) => {
                write!(f, "Invalid layer configuration: {}", msg)
            }
            NNError::EmptyModel => write!(f, "Model has no layers"),
            NNError::InvalidTrainingConfiguration(msg) => {
                write!(f, "Invalid training configuration: {}", msg)
            }
            NNError::ShapeMismatch(msg) => write!(f, "Shape mismatch: {}", msg),
            NNError::InvalidActivation(msg) => write!(f, "Invalid activation function: {}", msg),
            NNError::InvalidLoss(msg) => write!(f, "Invalid loss function: {}", msg),
            NNError::StaleCache(msg) => write!(f, "Stale layer cache: {}", msg),
        }
    }
}

impl Error for NNError {}

pub type Result<T> = std::result::Result<T, NNError>;
