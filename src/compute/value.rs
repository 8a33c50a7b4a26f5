//! value.rs
//! The variant value type flowing through the graph.

use ndarray::{Array1, Array2};

/// The atomic unit of data in the engine.
///
/// A node's current value is one of three shapes; keeping them a closed set
/// keeps the math boundary in [`crate::compute::kernel`] type-checked instead
/// of an untyped slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Array1<f64>),
    Matrix(Array2<f64>),
}

impl Value {
    /// Human-readable shape, for error messages and traces.
    pub fn shape_desc(&self) -> String {
        match self {
            Value::Scalar(_) => "scalar".to_string(),
            Value::Vector(v) => format!("vector[{}]", v.len()),
            Value::Matrix(m) => format!("matrix[{}x{}]", m.nrows(), m.ncols()),
        }
    }
}
