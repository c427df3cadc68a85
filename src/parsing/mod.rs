//! Parsing of the MNIST binary record files into in-memory datasets.

use ndarray::Array2;

pub mod idx;
pub mod mnist;

use self::mnist::{GREYSCALE_SIZE, IMAGE_SIZE, NUM_CLASSES};

/// A loaded set of samples: parallel image and label buffers indexed
/// identically, immutable once loaded.
pub struct Dataset {
    /// Raw intensity values, one 784-byte image after another in file order.
    pub images: Vec<u8>,
    /// One label per image, each in 0..=9.
    pub labels: Vec<u8>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, i: usize) -> u8 {
        self.labels[i]
    }

    /// The i-th image as a 784x1 column vector with intensities normalized
    /// from [0, 255] to [0, 1].
    pub fn input(&self, i: usize) -> Array2<f64> {
        let pixels = &self.images[i * IMAGE_SIZE..(i + 1) * IMAGE_SIZE];
        let scaled: Vec<f64> = pixels.iter().map(|&p| p as f64 / GREYSCALE_SIZE).collect();

        Array2::from_shape_vec((IMAGE_SIZE, 1), scaled).unwrap()
    }

    /// One-hot encoding of the i-th label as a 10x1 column vector.
    pub fn target(&self, i: usize) -> Array2<f64> {
        let label = self.labels[i] as usize;

        Array2::from_shape_fn((NUM_CLASSES, 1), |(class, _)| {
            if class == label {
                1f64
            } else {
                0f64
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sample_dataset() -> Dataset {
        let mut images = vec![0u8; 2 * IMAGE_SIZE];
        images[0] = 255;
        images[IMAGE_SIZE + 1] = 51;

        Dataset {
            images,
            labels: vec![3, 9],
        }
    }

    #[test]
    fn test_input_is_normalized_column_vector() {
        let dataset = two_sample_dataset();

        let first = dataset.input(0);
        assert_eq!(first.dim(), (IMAGE_SIZE, 1));
        assert_eq!(first[[0, 0]], 1.0);
        assert_eq!(first[[1, 0]], 0.0);

        let second = dataset.input(1);
        assert_eq!(second[[0, 0]], 0.0);
        assert_eq!(second[[1, 0]], 0.2);
    }

    #[test]
    fn test_target_is_one_hot() {
        let dataset = two_sample_dataset();

        let target = dataset.target(0);
        assert_eq!(target.dim(), (NUM_CLASSES, 1));
        assert_eq!(target.sum(), 1.0);
        assert_eq!(target[[3, 0]], 1.0);

        assert_eq!(dataset.target(1)[[9, 0]], 1.0);
    }
}
