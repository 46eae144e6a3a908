#[allow(unused)]
use crate::prelude::*;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Linear,
    Relu,
    Sigmoid,
    Tanh,
}

impl Activation {
    /// Elementwise forward transform.
    pub fn apply(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Linear => z.clone(),
            Self::Relu => relu_forward(z),
            Self::Sigmoid => sigmoid_forward(z),
            Self::Tanh => tanh_forward(z),
        }
    }

    /// Elementwise derivative, evaluated from the pre-activation `z`.
    ///
    /// Always recomputed from `z`, never read back from a cached output.
    pub fn derivative(&self, z: &Array2<f64>) -> Array2<f64> {
        match self {
            Self::Linear => Array2::ones(z.raw_dim()),
            Self::Relu => relu_derivative(z),
            Self::Sigmoid => sigmoid_derivative(z),
            Self::Tanh => tanh_derivative(z),
        }
    }
}

impl FromStr for Activation {
    type Err = NNError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Self::Linear),
            "relu" => Ok(Self::Relu),
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            other => Err(NNError::InvalidActivation(format!(
                "unknown activation '{}', expected one of linear/relu/sigmoid/tanh",
                other
            ))),
        }
    }
}

// Clamp before exponentiating so large-magnitude inputs saturate instead
// of overflowing.
fn sigmoid(z: f64) -> f64 {
    let z = z.clamp(-500.0, 500.0);
    1.0 / (1.0 + (-z).exp())
}

fn sigmoid_forward(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(sigmoid)
}

fn sigmoid_derivative(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| {
        let s = sigmoid(z);
        s * (1.0 - s)
    })
}

fn relu_forward(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| if z > 0.0 { z } else { 0.0 })
}

// Derivative at exactly 0 is taken as 0.
fn relu_derivative(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| if z > 0.0 { 1.0 } else { 0.0 })
}

fn tanh_forward(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(f64::tanh)
}

fn tanh_derivative(z: &Array2<f64>) -> Array2<f64> {
    z.mapv(|z| {
        let t = z.tanh();
        1.0 - t * t
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_saturates_without_overflow() {
        let z = array![[0.0, 1000.0, -1000.0]];
        let y = Activation::Sigmoid.apply(&z);
        assert_relative_eq!(y[[0, 0]], 0.5);
        assert_relative_eq!(y[[0, 1]], 1.0);
        assert_relative_eq!(y[[0, 2]], 0.0, epsilon = 1e-200);
        assert!(y.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sigmoid_derivative_peaks_at_origin() {
        let z = array![[0.0, 2.0, -2.0]];
        let d = Activation::Sigmoid.derivative(&z);
        assert_relative_eq!(d[[0, 0]], 0.25);
        // symmetric in z
        assert_relative_eq!(d[[0, 1]], d[[0, 2]]);
        assert!(d[[0, 1]] < 0.25);
    }

    #[test]
    fn relu_zeroes_negative_inputs() {
        let z = array![[-1.5, 0.0, 2.0]];
        assert_eq!(Activation::Relu.apply(&z), array![[0.0, 0.0, 2.0]]);
        assert_eq!(Activation::Relu.derivative(&z), array![[0.0, 0.0, 1.0]]);
    }

    #[test]
    fn tanh_derivative_matches_identity() {
        let z = array![[0.7, -0.3]];
        let d = Activation::Tanh.derivative(&z);
        assert_relative_eq!(d[[0, 0]], 1.0 - 0.7_f64.tanh().powi(2));
        assert_relative_eq!(d[[0, 1]], 1.0 - 0.3_f64.tanh().powi(2));
    }

    #[test]
    fn linear_is_identity_with_unit_derivative() {
        let z = array![[1.0, -2.0], [3.0, 0.0]];
        assert_eq!(Activation::Linear.apply(&z), z);
        assert_eq!(Activation::Linear.derivative(&z), Array2::ones((2, 2)));
    }

    #[test]
    fn parses_known_tokens() {
        assert_eq!("sigmoid".parse::<Activation>().unwrap(), Activation::Sigmoid);
        assert_eq!("relu".parse::<Activation>().unwrap(), Activation::Relu);
        assert_eq!("tanh".parse::<Activation>().unwrap(), Activation::Tanh);
        assert_eq!("linear".parse::<Activation>().unwrap(), Activation::Linear);
    }

    #[test]
    fn rejects_unknown_token() {
        let err = "swish".parse::<Activation>().unwrap_err();
        assert!(matches!(err, NNError::InvalidActivation(_)));
    }
}
