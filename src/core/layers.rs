use crate::prelude::*;
use rand::Rng;

pub trait LayerTrait {
    fn new(input_size: usize, output_size: usize, activation: Activation) -> Result<Self>
    where
        Self: Sized;

    fn typ(&self) -> String;
}

/// Tensors captured during `forward`, consumed by the matching `backward`.
///
/// Single slot: every `forward` call overwrites it, every `backward` call
/// takes it. A `backward` without a pending slot is a caller bug and is
/// reported as `NNError::StaleCache`.
#[derive(Debug, Clone)]
struct ForwardCache {
    input: Array2<f64>,
    pre_activation: Array2<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Dense {
    pub w: Array2<f64>,
    pub b: Array2<f64>,
    pub activation: Activation,
    #[serde(skip)]
    cache: Option<ForwardCache>,
}

impl LayerTrait for Dense {
    fn new(input_size: usize, output_size: usize, activation: Activation) -> Result<Self> {
        Self::random_using(input_size, output_size, activation, &mut rand::thread_rng())
    }

    fn typ(&self) -> String {
        "Dense".into()
    }
}

impl Dense {
    /// Xavier/Glorot initialization with a caller-supplied RNG: weights are
    /// standard-normal draws scaled by `sqrt(2 / (input_size + output_size))`,
    /// biases start at zero.
    pub fn random_using<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if input_size == 0 || output_size == 0 {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "layer dimensions must be greater than 0, got {}x{}",
                input_size, output_size
            )));
        }
        let scale = (2.0 / (input_size + output_size) as f64).sqrt();
        let w = Array2::random_using((input_size, output_size), Normal::new(0.0, 1.0).unwrap(), rng)
            * scale;
        Ok(Self {
            w,
            b: Array2::zeros((1, output_size)),
            activation,
            cache: None,
        })
    }

    pub fn input_size(&self) -> usize {
        self.w.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.w.ncols()
    }

    /// Affine transform plus nonlinearity over a `(batch, input_size)` tensor.
    ///
    /// Overwrites the layer's cache; the returned tensor has shape
    /// `(batch, output_size)`.
    pub fn forward(&mut self, input: Array2<f64>) -> Result<Array2<f64>> {
        if input.ncols() != self.input_size() {
            return Err(NNError::ShapeMismatch(format!(
                "input has {} features, layer expects {}",
                input.ncols(),
                self.input_size()
            )));
        }
        let pre_activation = input.dot(&self.w) + &self.b;
        let output = self.activation.apply(&pre_activation);
        self.cache = Some(ForwardCache {
            input,
            pre_activation,
        });
        Ok(output)
    }

    /// One gradient-descent step through this layer.
    ///
    /// `output_gradient` is dLoss/dOutput of shape `(batch, output_size)`.
    /// Consumes the cache from the preceding `forward`, updates `w` and `b`
    /// in place, and returns dLoss/dInput for the previous layer.
    pub fn backward(
        &mut self,
        output_gradient: Array2<f64>,
        learning_rate: f64,
    ) -> Result<Array2<f64>> {
        let cache = self.cache.take().ok_or_else(|| {
            NNError::StaleCache("backward called without a preceding forward".to_string())
        })?;
        if output_gradient.shape() != cache.pre_activation.shape() {
            return Err(NNError::ShapeMismatch(format!(
                "output gradient shape {:?} does not match layer output shape {:?}",
                output_gradient.shape(),
                cache.pre_activation.shape()
            )));
        }

        let dz = output_gradient * self.activation.derivative(&cache.pre_activation);
        let dw = cache.input.t().dot(&dz);
        let db = dz.sum_axis(Axis(0)).insert_axis(Axis(0));
        let dx = dz.dot(&self.w.t());

        self.w = self.w.clone() - learning_rate * dw;
        self.b = self.b.clone() - learning_rate * db;

        Ok(dx)
    }
}
