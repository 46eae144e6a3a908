use crate::core::losses::criteria;
use crate::prelude::*;
use rand::seq::SliceRandom;
use rand::Rng;

/// Options for one `fit` run. `batch_size` defaults to 32 and `loss` to
/// mean squared error; `verbose` only gates progress printing.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub batch_size: usize,
    pub loss: Loss,
    pub verbose: bool,
}

impl TrainConfig {
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        Self {
            epochs,
            learning_rate,
            batch_size: 32,
            loss: Loss::Mse,
            verbose: false,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(NNError::InvalidTrainingConfiguration(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        // Also rejects NaN
        if !(self.learning_rate > 0.0) || !self.learning_rate.is_finite() {
            return Err(NNError::InvalidTrainingConfiguration(format!(
                "learning_rate must be a positive finite number, got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sequential<T: LayerTrait> {
    pub layers: Vec<T>,
}

impl Sequential<Dense> {
    pub fn new(layers: Vec<Dense>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NNError::EmptyModel);
        }
        for pair in layers.windows(2) {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(NNError::InvalidLayerConfiguration(format!(
                    "layer output size {} doesn't feed next layer input size {}",
                    pair[0].output_size(),
                    pair[1].input_size()
                )));
            }
        }
        Ok(Self { layers })
    }

    /// Build a network from consecutive layer sizes, e.g. `[784, 128, 10]`.
    ///
    /// `activations` must hold one entry per layer (`sizes.len() - 1`); when
    /// omitted, hidden layers get ReLU and the final layer is linear.
    pub fn from_sizes(sizes: &[usize], activations: Option<&[Activation]>) -> Result<Self> {
        Self::from_sizes_using(sizes, activations, &mut rand::thread_rng())
    }

    /// `from_sizes` with a caller-supplied RNG for the weight initialization.
    pub fn from_sizes_using<R: Rng + ?Sized>(
        sizes: &[usize],
        activations: Option<&[Activation]>,
        rng: &mut R,
    ) -> Result<Self> {
        if sizes.len() < 2 {
            return Err(NNError::InvalidLayerConfiguration(format!(
                "need at least 2 layer sizes, got {}",
                sizes.len()
            )));
        }
        let n_layers = sizes.len() - 1;
        let activations: Vec<Activation> = match activations {
            Some(list) => {
                if list.len() != n_layers {
                    return Err(NNError::InvalidLayerConfiguration(format!(
                        "{} layer sizes require {} activations, got {}",
                        sizes.len(),
                        n_layers,
                        list.len()
                    )));
                }
                list.to_vec()
            }
            None => {
                let mut defaults = vec![Activation::Relu; n_layers];
                defaults[n_layers - 1] = Activation::Linear;
                defaults
            }
        };

        let mut layers = Vec::with_capacity(n_layers);
        for i in 0..n_layers {
            layers.push(Dense::random_using(
                sizes[i],
                sizes[i + 1],
                activations[i],
                rng,
            )?);
        }
        Self::new(layers)
    }

    pub fn summary(&self) {
        let mut total_param = 0;
        let mut res = "\nModel Sequential\n".to_string();
        res.push_str("-------------------------------------------------------------\n");
        res.push_str("Layer (Type)\t\t Output shape\t\t No.of params\n");
        for layer in self.layers.iter() {
            let n = layer.w.len() + layer.b.len();
            total_param += n;
            res.push_str(&format!(
                "{}\t\t\t  (None, {})\t\t  {}\n",
                layer.typ(),
                layer.output_size(),
                n
            ));
        }
        res.push_str("-------------------------------------------------------------\n");
        res.push_str(&format!("Total params: {}\n", total_param));
        println!("{}", res);
    }

    pub fn count_parameters(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| layer.w.len() + layer.b.len())
            .sum()
    }

    /// Forward pass through all layers; each layer's output feeds the next.
    /// Refreshes every layer's cache but never touches parameters.
    pub fn forward(&mut self, x: Array2<f64>) -> Result<Array2<f64>> {
        let mut a = x;
        for layer in self.layers.iter_mut() {
            a = layer.forward(a)?;
        }
        Ok(a)
    }

    /// Backward pass in strict reverse layer order. Each layer consumes its
    /// cached forward tensors, updates its parameters once, and hands the
    /// input gradient to the layer before it.
    pub fn backward(&mut self, output_gradient: Array2<f64>, learning_rate: f64) -> Result<()> {
        let mut grad = output_gradient;
        for layer in self.layers.iter_mut().rev() {
            grad = layer.backward(grad, learning_rate)?;
        }
        Ok(())
    }

    /// One atomic unit of learning: forward, loss, backward, update.
    pub fn train_step(
        &mut self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        learning_rate: f64,
        loss_ty: Loss,
    ) -> Result<f64> {
        let prediction = self.forward(x.clone())?;
        let (loss, output_gradient) = criteria(&prediction, y, loss_ty)?;
        self.backward(output_gradient, learning_rate)?;
        Ok(loss)
    }

    /// Mini-batch gradient descent over the whole training set.
    ///
    /// Each epoch draws a fresh permutation, applies it to `x` and `y`
    /// identically, partitions the rows into contiguous batches (the final
    /// batch may be short), and runs `train_step` on each. Returns the mean
    /// batch loss of every epoch, in order.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array2<f64>, config: &TrainConfig) -> Result<Vec<f64>> {
        config.validate()?;
        if x.nrows() != y.nrows() {
            return Err(NNError::ShapeMismatch(format!(
                "x has {} rows but y has {}",
                x.nrows(),
                y.nrows()
            )));
        }
        if x.nrows() == 0 {
            return Err(NNError::InvalidTrainingConfiguration(
                "training set is empty".to_string(),
            ));
        }

        let n_samples = x.nrows();
        let mut rng = rand::thread_rng();
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut losses = Vec::with_capacity(config.epochs);

        for epoch in 0..config.epochs {
            indices.shuffle(&mut rng);
            let x_shuffled = x.select(Axis(0), &indices);
            let y_shuffled = y.select(Axis(0), &indices);

            let mut epoch_losses = Vec::new();
            let mut start = 0;
            while start < n_samples {
                let end = (start + config.batch_size).min(n_samples);
                let x_batch = x_shuffled.slice(s![start..end, ..]).to_owned();
                let y_batch = y_shuffled.slice(s![start..end, ..]).to_owned();
                epoch_losses.push(self.train_step(
                    &x_batch,
                    &y_batch,
                    config.learning_rate,
                    config.loss,
                )?);
                start = end;
            }

            let avg_loss = epoch_losses.iter().sum::<f64>() / epoch_losses.len() as f64;
            losses.push(avg_loss);

            if config.verbose && (epoch + 1) % (config.epochs / 10).max(1) == 0 {
                println!("Epoch {}/{}, loss: {:.6}", epoch + 1, config.epochs, avg_loss);
            }
        }

        Ok(losses)
    }

    /// Forward pass for inference. Parameters are untouched; only the
    /// per-layer caches are refreshed, which no caller observes unless it
    /// follows up with `backward`.
    pub fn predict(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.forward(x.clone())
    }

    pub fn evaluate(&mut self, x: &Array2<f64>, y: &Array2<f64>, loss_ty: Loss) -> Result<f64> {
        let prediction = self.predict(x)?;
        let (loss, _) = criteria(&prediction, y, loss_ty)?;
        Ok(loss)
    }
}
