//! kernel.rs
//! Numeric kernels over `Value`: the crate's tensor-math boundary.
//!
//! Every shape check happens here, before any work is handed to `ndarray`
//! (whose own operators panic on mismatch; this boundary returns
//! [`ComputationError::ShapeMismatch`] instead). The node behaviors in
//! `compute::engine` never validate shapes themselves.

use crate::compute::ledger::ComputationError;
use crate::compute::value::Value;

fn mismatch(op: &'static str, a: &Value, b: &Value) -> ComputationError {
    ComputationError::ShapeMismatch {
        op,
        msg: format!("{} vs {}", a.shape_desc(), b.shape_desc()),
    }
}

/// Elementwise addition.
///
/// A scalar broadcasts over either array shape; a vector broadcasts over
/// matrix rows (the bias-add case of an affine transform). Anything else
/// must shape-match.
pub fn add(a: &Value, b: &Value) -> Result<Value, ComputationError> {
    use Value::*;
    match (a, b) {
        (Scalar(x), Scalar(y)) => Ok(Scalar(x + y)),
        (Scalar(s), Vector(v)) | (Vector(v), Scalar(s)) => Ok(Vector(v.mapv(|x| x + s))),
        (Scalar(s), Matrix(m)) | (Matrix(m), Scalar(s)) => Ok(Matrix(m.mapv(|x| x + s))),
        (Vector(x), Vector(y)) => {
            if x.len() != y.len() {
                return Err(mismatch("add", a, b));
            }
            Ok(Vector(x + y))
        }
        (Matrix(x), Matrix(y)) => {
            if x.dim() != y.dim() {
                return Err(mismatch("add", a, b));
            }
            Ok(Matrix(x + y))
        }
        (Matrix(m), Vector(v)) | (Vector(v), Matrix(m)) => {
            if m.ncols() != v.len() {
                return Err(mismatch("add", a, b));
            }
            Ok(Matrix(m + v))
        }
    }
}

/// Generalized dot product, following numpy semantics for the shapes the
/// graph can produce: scalars multiply, vectors take the inner product, and
/// matrix operands contract along their adjacent dimension.
pub fn dot(a: &Value, b: &Value) -> Result<Value, ComputationError> {
    use Value::*;
    match (a, b) {
        (Scalar(x), Scalar(y)) => Ok(Scalar(x * y)),
        (Scalar(s), Vector(v)) | (Vector(v), Scalar(s)) => Ok(Vector(v.mapv(|x| x * s))),
        (Scalar(s), Matrix(m)) | (Matrix(m), Scalar(s)) => Ok(Matrix(m.mapv(|x| x * s))),
        (Vector(x), Vector(y)) => {
            if x.len() != y.len() {
                return Err(mismatch("dot", a, b));
            }
            Ok(Scalar(x.dot(y)))
        }
        (Vector(v), Matrix(m)) => {
            if v.len() != m.nrows() {
                return Err(mismatch("dot", a, b));
            }
            Ok(Vector(v.dot(m)))
        }
        (Matrix(m), Vector(v)) => {
            if m.ncols() != v.len() {
                return Err(mismatch("dot", a, b));
            }
            Ok(Vector(m.dot(v)))
        }
        (Matrix(x), Matrix(y)) => {
            if x.ncols() != y.nrows() {
                return Err(mismatch("dot", a, b));
            }
            Ok(Matrix(x.dot(y)))
        }
    }
}

/// Elementwise logistic function: `1 / (1 + exp(-x))`.
pub fn sigmoid(a: &Value) -> Value {
    fn logistic(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
    match a {
        Value::Scalar(x) => Value::Scalar(logistic(*x)),
        Value::Vector(v) => Value::Vector(v.mapv(logistic)),
        Value::Matrix(m) => Value::Matrix(m.mapv(logistic)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};
    use rstest::rstest;

    #[rstest]
    #[case(Value::Scalar(5.0), Value::Scalar(10.0), Value::Scalar(15.0))]
    #[case(
        Value::Vector(arr1(&[1.0, 2.0])),
        Value::Vector(arr1(&[3.0, 4.0])),
        Value::Vector(arr1(&[4.0, 6.0]))
    )]
    #[case(
        Value::Scalar(1.0),
        Value::Vector(arr1(&[1.0, 2.0])),
        Value::Vector(arr1(&[2.0, 3.0]))
    )]
    #[case(
        Value::Matrix(arr2(&[[1.0, 2.0], [3.0, 4.0]])),
        Value::Scalar(1.0),
        Value::Matrix(arr2(&[[2.0, 3.0], [4.0, 5.0]]))
    )]
    #[case(
        Value::Matrix(arr2(&[[1.0, 2.0], [3.0, 4.0]])),
        Value::Vector(arr1(&[10.0, 20.0])),
        Value::Matrix(arr2(&[[11.0, 22.0], [13.0, 24.0]]))
    )]
    fn add_cases(#[case] a: Value, #[case] b: Value, #[case] expected: Value) {
        assert_eq!(add(&a, &b).unwrap(), expected);
    }

    #[rstest]
    #[case(Value::Vector(arr1(&[1.0, 2.0])), Value::Vector(arr1(&[1.0, 2.0, 3.0])))]
    #[case(
        Value::Matrix(arr2(&[[1.0, 2.0], [3.0, 4.0]])),
        Value::Matrix(arr2(&[[1.0], [2.0]]))
    )]
    #[case(
        Value::Matrix(arr2(&[[1.0, 2.0], [3.0, 4.0]])),
        Value::Vector(arr1(&[1.0, 2.0, 3.0]))
    )]
    fn add_rejects_shape_mismatch(#[case] a: Value, #[case] b: Value) {
        assert!(matches!(
            add(&a, &b),
            Err(ComputationError::ShapeMismatch { op: "add", .. })
        ));
    }

    #[test]
    fn dot_vector_matrix() {
        let v = Value::Vector(arr1(&[1.0, 2.0]));
        let m = Value::Matrix(arr2(&[[1.0, 1.0], [1.0, 1.0]]));
        assert_eq!(dot(&v, &m).unwrap(), Value::Vector(arr1(&[3.0, 3.0])));
    }

    #[test]
    fn dot_inner_product() {
        let x = Value::Vector(arr1(&[1.0, 2.0, 3.0]));
        let y = Value::Vector(arr1(&[4.0, 5.0, 6.0]));
        assert_eq!(dot(&x, &y).unwrap(), Value::Scalar(32.0));
    }

    #[test]
    fn dot_matrix_matrix() {
        let x = Value::Matrix(arr2(&[[1.0, 0.0], [0.0, 1.0]]));
        let y = Value::Matrix(arr2(&[[2.0, 3.0], [4.0, 5.0]]));
        assert_eq!(dot(&x, &y).unwrap(), y);
    }

    #[rstest]
    #[case(Value::Vector(arr1(&[1.0, 2.0])), Value::Vector(arr1(&[1.0, 2.0, 3.0])))]
    #[case(
        Value::Vector(arr1(&[1.0, 2.0, 3.0])),
        Value::Matrix(arr2(&[[1.0, 1.0], [1.0, 1.0]]))
    )]
    #[case(
        Value::Matrix(arr2(&[[1.0, 1.0], [1.0, 1.0]])),
        Value::Vector(arr1(&[1.0, 2.0, 3.0]))
    )]
    fn dot_rejects_dimension_mismatch(#[case] a: Value, #[case] b: Value) {
        assert!(matches!(
            dot(&a, &b),
            Err(ComputationError::ShapeMismatch { op: "dot", .. })
        ));
    }

    #[test]
    fn sigmoid_of_zero_is_one_half() {
        match sigmoid(&Value::Scalar(0.0)) {
            Value::Scalar(s) => assert!((s - 0.5).abs() < 1e-12),
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn sigmoid_is_symmetric_around_zero() {
        // sigmoid(x) + sigmoid(-x) == 1 for every element.
        let v = Value::Vector(arr1(&[-3.0, -0.5, 0.0, 0.5, 3.0]));
        let neg = Value::Vector(arr1(&[3.0, 0.5, 0.0, -0.5, -3.0]));
        let (Value::Vector(p), Value::Vector(q)) = (sigmoid(&v), sigmoid(&neg)) else {
            panic!("expected vectors");
        };
        for (a, b) in p.iter().zip(q.iter()) {
            assert!((a + b - 1.0).abs() < 1e-12);
        }
    }
}
