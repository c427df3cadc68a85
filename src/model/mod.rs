use ndarray::Array2;

use crate::parsing::Dataset;

pub mod neural_net;
pub mod tensor;

use self::tensor::TensorError;

pub trait Model {
    /// Train on every sample of the dataset for the given number of epochs.
    /// Returns the mean loss per epoch, for monitoring.
    fn fit(&mut self, dataset: &Dataset, epochs: usize) -> Result<Vec<(usize, f64)>, TensorError>;

    /// The predicted digit class for one input column vector.
    fn predict(&self, input: &Array2<f64>) -> Result<usize, TensorError>;
}
