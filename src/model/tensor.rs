//! Dense tensor primitives for the network, with explicit dimension
//! contracts on every binary operation.

use ndarray::Array2;
use thiserror::Error;

/// Shape-contract violations. Fatal: no operation attempts recovery.
#[derive(Debug, Error)]
pub enum TensorError {
    #[error("dimension mismatch in {op}: {lhs_rows}x{lhs_cols} against {rhs_rows}x{rhs_cols}")]
    DimensionMismatch {
        op: &'static str,
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
}

fn mismatch(op: &'static str, lhs: &Array2<f64>, rhs: &Array2<f64>) -> TensorError {
    TensorError::DimensionMismatch {
        op,
        lhs_rows: lhs.nrows(),
        lhs_cols: lhs.ncols(),
        rhs_rows: rhs.nrows(),
        rhs_cols: rhs.ncols(),
    }
}

fn same_shape(
    op: &'static str,
    lhs: &Array2<f64>,
    rhs: &Array2<f64>,
) -> Result<(), TensorError> {
    if lhs.dim() != rhs.dim() {
        return Err(mismatch(op, lhs, rhs));
    }

    Ok(())
}

/// Matrix product of `a` (m x k) and `b` (k x n).
pub fn dot(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, TensorError> {
    if a.ncols() != b.nrows() {
        return Err(mismatch("dot", a, b));
    }

    Ok(a.dot(b))
}

pub fn add(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, TensorError> {
    same_shape("add", a, b)?;

    Ok(a + b)
}

pub fn sub(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, TensorError> {
    same_shape("sub", a, b)?;

    Ok(a - b)
}

/// Element-wise product.
pub fn hadamard(a: &Array2<f64>, b: &Array2<f64>) -> Result<Array2<f64>, TensorError> {
    same_shape("hadamard", a, b)?;

    Ok(a * b)
}

pub fn transpose(a: &Array2<f64>) -> Array2<f64> {
    a.t().to_owned()
}

pub fn scale(a: &Array2<f64>, factor: f64) -> Array2<f64> {
    a * factor
}

/// Element-wise logistic function, 1 / (1 + e^-z).
pub fn sigmoid(a: &Array2<f64>) -> Array2<f64> {
    a.mapv(|z| (1f64 + (-z).exp()).recip())
}

/// Convert a column vector of scores into a probability distribution.
///
/// The elements are shifted by the maximum score before exponentiation,
/// because otherwise the exp of large scores would overflow to infinity
/// and the division would return NaN.
pub fn softmax(scores: &Array2<f64>) -> Array2<f64> {
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp_scores = scores.mapv(|z| (z - max).exp());
    let sum = exp_scores.sum();

    exp_scores / sum
}

/// Mean squared error between a target and an output of the same shape.
/// Used for monitoring only; it does not feed the gradient computation.
pub fn mean_squared_error(
    target: &Array2<f64>,
    output: &Array2<f64>,
) -> Result<f64, TensorError> {
    same_shape("mean_squared_error", target, output)?;

    let total: f64 = target
        .iter()
        .zip(output.iter())
        .map(|(t, o)| (t - o).powi(2))
        .sum();

    Ok(total / target.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[macro_export]
    macro_rules! assert_eq_float {
        ($a:expr, $b:expr) => {
            assert!((($a) - ($b)).abs() < 1e-9);
        };
    }

    #[test]
    fn test_dot_shapes_and_values() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let b = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

        let c = dot(&a, &b).unwrap();
        assert_eq!(c.dim(), (2, 2));
        assert_eq!(c, array![[4.0, 5.0], [10.0, 11.0]]);
    }

    #[test]
    fn test_dot_inner_dimension_mismatch() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let b = array![[1.0, 0.0], [0.0, 1.0]];

        assert!(matches!(
            dot(&a, &b),
            Err(TensorError::DimensionMismatch { op: "dot", .. })
        ));
    }

    #[test]
    fn test_elementwise_ops() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[5.0, 6.0], [7.0, 8.0]];

        assert_eq!(add(&a, &b).unwrap(), array![[6.0, 8.0], [10.0, 12.0]]);
        assert_eq!(sub(&b, &a).unwrap(), array![[4.0, 4.0], [4.0, 4.0]]);
        assert_eq!(hadamard(&a, &b).unwrap(), array![[5.0, 12.0], [21.0, 32.0]]);
    }

    #[test]
    fn test_elementwise_shape_mismatch() {
        let a = array![[1.0, 2.0], [3.0, 4.0]];
        let b = array![[1.0], [2.0]];

        assert!(add(&a, &b).is_err());
        assert!(sub(&a, &b).is_err());
        assert!(hadamard(&a, &b).is_err());
        assert!(mean_squared_error(&a, &b).is_err());
    }

    #[test]
    fn test_transpose() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let t = transpose(&a);

        assert_eq!(t.dim(), (3, 2));
        assert_eq!(t, array![[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]);
    }

    #[test]
    fn test_scale() {
        let a = array![[1.0, -2.0]];

        assert_eq!(scale(&a, 0.5), array![[0.5, -1.0]]);
    }

    #[test]
    fn test_sigmoid() {
        let a = array![[0.0], [100.0], [-100.0]];
        let s = sigmoid(&a);

        assert_eq_float!(s[[0, 0]], 0.5);
        assert!(s[[1, 0]] > 0.999);
        assert!(s[[2, 0]] < 0.001);
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let scores = array![[1.0], [2.0], [3.0], [4.0]];
        let probs = softmax(&scores);

        assert_eq_float!(probs.sum(), 1.0);
    }

    #[test]
    fn test_softmax_preserves_ordering() {
        let scores = array![[0.2], [3.0], [-1.0], [1.5]];
        let probs = softmax(&scores);

        assert!(probs[[1, 0]] > probs[[3, 0]]);
        assert!(probs[[3, 0]] > probs[[0, 0]]);
        assert!(probs[[0, 0]] > probs[[2, 0]]);
    }

    #[test]
    fn test_softmax_is_stable_for_large_scores() {
        let scores = array![[1000.0], [999.0], [998.0]];
        let probs = softmax(&scores);

        assert!(probs.iter().all(|p| p.is_finite()));
        assert_eq_float!(probs.sum(), 1.0);
    }

    #[test]
    fn test_mean_squared_error() {
        let target = array![[1.0], [0.0]];
        let output = array![[0.5], [0.5]];

        assert_eq_float!(mean_squared_error(&target, &output).unwrap(), 0.25);
    }
}
