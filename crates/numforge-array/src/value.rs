//! Runtime values.
//!
//! A [`Value`] is an n-dimensional array of reals or complex numbers.
//! Scalars are zero-dimensional arrays, so scalar and array evaluation
//! share one code path and scalar inputs produce scalar outputs.

use ndarray::{arr0, Array, ArrayD, Dimension, IxDyn};
use num_complex::Complex64;

use crate::broadcast::zip_with;
use crate::error::EvalError;

/// A real or complex array value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Real-valued array.
    Real(ArrayD<f64>),
    /// Complex-valued array.
    Complex(ArrayD<Complex64>),
}

impl Value {
    /// Creates a real scalar.
    #[must_use]
    pub fn real(x: f64) -> Self {
        Value::Real(arr0(x).into_dyn())
    }

    /// Creates a complex scalar.
    #[must_use]
    pub fn complex(z: Complex64) -> Self {
        Value::Complex(arr0(z).into_dyn())
    }

    /// Returns the shape of the value; empty for scalars.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Value::Real(a) => a.shape(),
            Value::Complex(a) => a.shape(),
        }
    }

    /// Returns true for zero-dimensional values.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape().is_empty()
    }

    /// Returns true if the value holds complex numbers.
    #[must_use]
    pub fn is_complex(&self) -> bool {
        matches!(self, Value::Complex(_))
    }

    /// Returns the real array, if the value is real.
    #[must_use]
    pub fn as_real(&self) -> Option<&ArrayD<f64>> {
        match self {
            Value::Real(a) => Some(a),
            Value::Complex(_) => None,
        }
    }

    /// Returns the value as a complex array, promoting reals.
    #[must_use]
    pub fn to_complex(&self) -> ArrayD<Complex64> {
        match self {
            Value::Real(a) => a.mapv(|x| Complex64::new(x, 0.0)),
            Value::Complex(a) => a.clone(),
        }
    }

    /// Returns the single element of a scalar value.
    #[must_use]
    pub fn scalar(&self) -> Option<Complex64> {
        if !self.is_scalar() {
            return None;
        }
        match self {
            Value::Real(a) => a.first().map(|x| Complex64::new(*x, 0.0)),
            Value::Complex(a) => a.first().copied(),
        }
    }

    /// Returns the single element of a real scalar value.
    #[must_use]
    pub fn real_scalar(&self) -> Option<f64> {
        match self {
            Value::Real(a) if a.ndim() == 0 => a.first().copied(),
            _ => None,
        }
    }

    /// Broadcasts the value to `shape`.
    ///
    /// # Errors
    ///
    /// Fails if the value's shape does not broadcast to `shape`.
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Value, EvalError> {
        let shape_error = || EvalError::Shape {
            lhs: self.shape().to_vec(),
            rhs: shape.to_vec(),
        };
        let dim = IxDyn(shape);
        Ok(match self {
            Value::Real(a) => Value::Real(a.broadcast(dim).ok_or_else(shape_error)?.to_owned()),
            Value::Complex(a) => {
                Value::Complex(a.broadcast(dim).ok_or_else(shape_error)?.to_owned())
            }
        })
    }

    /// Element-wise `self + rhs`.
    ///
    /// # Errors
    ///
    /// Fails if the shapes do not broadcast.
    pub fn add(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.binary(rhs, |a, b| a + b, |a, b| a + b)
    }

    /// Element-wise `self - rhs`.
    ///
    /// # Errors
    ///
    /// Fails if the shapes do not broadcast.
    pub fn sub(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.binary(rhs, |a, b| a - b, |a, b| a - b)
    }

    /// Element-wise `self * rhs`.
    ///
    /// # Errors
    ///
    /// Fails if the shapes do not broadcast.
    pub fn mul(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.binary(rhs, |a, b| a * b, |a, b| a * b)
    }

    /// Element-wise `self / rhs`, with IEEE semantics for real division by zero.
    ///
    /// # Errors
    ///
    /// Fails if the shapes do not broadcast.
    pub fn div(&self, rhs: &Value) -> Result<Value, EvalError> {
        self.binary(rhs, |a, b| a / b, |a, b| a / b)
    }

    /// Applies a real and a complex element-wise operation, promoting to
    /// complex when either side is complex.
    pub(crate) fn binary(
        &self,
        rhs: &Value,
        real_op: impl Fn(f64, f64) -> f64,
        complex_op: impl Fn(Complex64, Complex64) -> Complex64,
    ) -> Result<Value, EvalError> {
        match (self, rhs) {
            (Value::Real(a), Value::Real(b)) => Ok(Value::Real(zip_with(a, b, real_op)?)),
            _ => Ok(Value::Complex(zip_with(
                &self.to_complex(),
                &rhs.to_complex(),
                complex_op,
            )?)),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::real(x)
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Value::complex(z)
    }
}

impl<D: Dimension> From<Array<f64, D>> for Value {
    fn from(a: Array<f64, D>) -> Self {
        Value::Real(a.into_dyn())
    }
}

impl<D: Dimension> From<Array<Complex64, D>> for Value {
    fn from(a: Array<Complex64, D>) -> Self {
        Value::Complex(a.into_dyn())
    }
}
