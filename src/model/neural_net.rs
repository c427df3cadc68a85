use crate::parsing::Dataset;
use log::info;
use ndarray::Array2;
use rand::distributions::{Distribution, Uniform};

use super::tensor::{self, TensorError};
use super::Model;

pub const INPUT_SIZE: usize = 784;
pub const HIDDEN_SIZE: usize = 100;
pub const OUTPUT_SIZE: usize = 10;

/// A two-layer feed-forward network: a sigmoid hidden layer followed by a
/// softmax output layer over the ten digit classes.
///
/// The parameters are owned here exclusively and mutated only by the
/// per-sample gradient step.
pub struct NeuralNet {
    hidden_weights: Array2<f64>, // 100x784
    hidden_bias: Array2<f64>,    // 100x1
    output_weights: Array2<f64>, // 10x100
    output_bias: Array2<f64>,    // 10x1
    learning_rate: f64,
}

/// Activated layer outputs kept from a forward pass for backprop.
struct Activations {
    hidden: Array2<f64>, // 100x1
    output: Array2<f64>, // 10x1
}

struct Gradients {
    hidden_weights: Array2<f64>,
    hidden_bias: Array2<f64>,
    output_weights: Array2<f64>,
    output_bias: Array2<f64>,
}

impl NeuralNet {
    /// Construct a network with weights drawn from a small uniform
    /// distribution and zero biases.
    pub fn new(learning_rate: f64) -> NeuralNet {
        let mut rng = rand::thread_rng();
        let distribution = Uniform::new(-0.3, 0.3);

        NeuralNet {
            hidden_weights: Array2::zeros((HIDDEN_SIZE, INPUT_SIZE))
                .map(|_: &f64| distribution.sample(&mut rng)),
            hidden_bias: Array2::zeros((HIDDEN_SIZE, 1)),
            output_weights: Array2::zeros((OUTPUT_SIZE, HIDDEN_SIZE))
                .map(|_: &f64| distribution.sample(&mut rng)),
            output_bias: Array2::zeros((OUTPUT_SIZE, 1)),
            learning_rate,
        }
    }

    /// Construct a network from explicit parameters, checking every shape
    /// against the fixed architecture.
    pub fn from_parameters(
        hidden_weights: Array2<f64>,
        hidden_bias: Array2<f64>,
        output_weights: Array2<f64>,
        output_bias: Array2<f64>,
        learning_rate: f64,
    ) -> Result<NeuralNet, TensorError> {
        expect_shape("hidden weights", &hidden_weights, HIDDEN_SIZE, INPUT_SIZE)?;
        expect_shape("hidden bias", &hidden_bias, HIDDEN_SIZE, 1)?;
        expect_shape("output weights", &output_weights, OUTPUT_SIZE, HIDDEN_SIZE)?;
        expect_shape("output bias", &output_bias, OUTPUT_SIZE, 1)?;

        Ok(NeuralNet {
            hidden_weights,
            hidden_bias,
            output_weights,
            output_bias,
            learning_rate,
        })
    }

    /// Count the samples of a dataset the network classifies incorrectly.
    pub fn mistakes(&self, dataset: &Dataset) -> Result<usize, TensorError> {
        let mut num_mistakes = 0;

        for i in 0..dataset.len() {
            if self.predict(&dataset.input(i))? != dataset.label(i) as usize {
                num_mistakes += 1;
            }
        }

        Ok(num_mistakes)
    }

    // Run the network forwards on one normalized 784x1 input.
    fn forward(&self, input: &Array2<f64>) -> Result<Activations, TensorError> {
        let hidden = tensor::add(&tensor::dot(&self.hidden_weights, input)?, &self.hidden_bias)?;
        let activated_hidden = tensor::sigmoid(&hidden);

        let output = tensor::add(
            &tensor::dot(&self.output_weights, &activated_hidden)?,
            &self.output_bias,
        )?;
        let activated_output = tensor::softmax(&output);

        Ok(Activations {
            hidden: activated_hidden,
            output: activated_output,
        })
    }

    // Gradients of the loss with respect to every parameter, from the
    // activations of one forward pass and the one-hot target.
    fn backward(
        &self,
        input: &Array2<f64>,
        target: &Array2<f64>,
        activations: &Activations,
    ) -> Result<Gradients, TensorError> {
        let output_gradient = tensor::sub(&activations.output, target)?;
        let output_weights_gradient =
            tensor::dot(&output_gradient, &tensor::transpose(&activations.hidden))?;

        // Sigmoid derivative expressed through the activated output, a * (1 - a).
        let sigmoid_slope = tensor::hadamard(
            &activations.hidden,
            &activations.hidden.mapv(|a| 1f64 - a),
        )?;
        let hidden_gradient = tensor::hadamard(
            &tensor::dot(&tensor::transpose(&self.output_weights), &output_gradient)?,
            &sigmoid_slope,
        )?;
        let hidden_weights_gradient = tensor::dot(&hidden_gradient, &tensor::transpose(input))?;

        Ok(Gradients {
            hidden_weights: hidden_weights_gradient,
            hidden_bias: hidden_gradient,
            output_weights: output_weights_gradient,
            output_bias: output_gradient,
        })
    }

    // One gradient descent step, batch size 1.
    fn update(&mut self, gradients: &Gradients) {
        self.hidden_weights =
            &self.hidden_weights - tensor::scale(&gradients.hidden_weights, self.learning_rate);
        self.hidden_bias =
            &self.hidden_bias - tensor::scale(&gradients.hidden_bias, self.learning_rate);
        self.output_weights =
            &self.output_weights - tensor::scale(&gradients.output_weights, self.learning_rate);
        self.output_bias =
            &self.output_bias - tensor::scale(&gradients.output_bias, self.learning_rate);
    }
}

impl Model for NeuralNet {
    /// Train with per-sample stochastic gradient descent, visiting the
    /// samples of every epoch sequentially in dataset order.
    fn fit(&mut self, dataset: &Dataset, epochs: usize) -> Result<Vec<(usize, f64)>, TensorError> {
        let mut losses = Vec::with_capacity(epochs);

        for epoch in 0..epochs {
            let mut epoch_loss = 0f64;

            for i in 0..dataset.len() {
                let input = dataset.input(i);
                let target = dataset.target(i);

                let activations = self.forward(&input)?;
                epoch_loss += tensor::mean_squared_error(&target, &activations.output)?;

                let gradients = self.backward(&input, &target, &activations)?;
                self.update(&gradients);
            }

            let mean_loss = epoch_loss / dataset.len() as f64;
            info!("epoch: {}, mean loss: {}", epoch + 1, mean_loss);
            losses.push((epoch, mean_loss));
        }

        Ok(losses)
    }

    fn predict(&self, input: &Array2<f64>) -> Result<usize, TensorError> {
        let activations = self.forward(input)?;

        Ok(argmax(&activations.output))
    }
}

fn expect_shape(
    op: &'static str,
    parameter: &Array2<f64>,
    rows: usize,
    cols: usize,
) -> Result<(), TensorError> {
    if parameter.dim() != (rows, cols) {
        return Err(TensorError::DimensionMismatch {
            op,
            lhs_rows: parameter.nrows(),
            lhs_cols: parameter.ncols(),
            rhs_rows: rows,
            rhs_cols: cols,
        });
    }

    Ok(())
}

/// Index of the largest component of a column vector. Ties are broken by
/// the first maximum encountered.
fn argmax(output: &Array2<f64>) -> usize {
    let mut best = 0;

    for (i, &value) in output.iter().enumerate() {
        if value > output[[best, 0]] {
            best = i;
        }
    }

    best
}
