use crate::prelude::*;
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    Mse,
    CrossEntropy,
}

impl FromStr for Loss {
    type Err = NNError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mse" => Ok(Self::Mse),
            "cross_entropy" => Ok(Self::CrossEntropy),
            other => Err(NNError::InvalidLoss(format!(
                "unknown loss '{}', expected mse or cross_entropy",
                other
            ))),
        }
    }
}

/// Scalar loss plus its gradient with respect to the prediction.
///
/// The gradient is normalized by the number of batch rows, so batch size
/// scales out of the per-step update.
pub fn criteria(
    y_hat: &Array2<f64>,
    y: &Array2<f64>,
    loss_ty: Loss,
) -> Result<(f64, Array2<f64>)> {
    if y_hat.shape() != y.shape() {
        return Err(NNError::ShapeMismatch(format!(
            "prediction shape {:?} doesn't match target shape {:?}",
            y_hat.shape(),
            y.shape()
        )));
    }
    if y.is_empty() {
        return Err(NNError::ShapeMismatch(
            "loss is undefined for an empty batch".to_string(),
        ));
    }
    let batch = y.nrows() as f64;

    match loss_ty {
        Loss::Mse => {
            let diff = y_hat - y;
            let loss = diff.mapv(|d| d * d).mean().unwrap();
            let da = 2.0 * diff / batch;
            Ok((loss, da))
        }
        Loss::CrossEntropy => {
            // Avoid log(0)
            let epsilon = 1e-15;
            let y_hat_safe = y_hat.mapv(|p| p.clamp(epsilon, 1.0 - epsilon));
            let loss = -(y * &y_hat_safe.mapv(f64::ln))
                .sum_axis(Axis(1))
                .mean()
                .unwrap();
            // Softmax-output shortcut, kept as the reference defines it.
            let da = (y_hat - y) / batch;
            Ok((loss, da))
        }
    }
}
