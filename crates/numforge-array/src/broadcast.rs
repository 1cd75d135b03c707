//! Shape broadcasting.
//!
//! Follows the usual array-language rules: shapes are aligned on their
//! trailing axes and each pair of extents must be equal or contain a 1.

use ndarray::{ArrayD, IxDyn, Zip};

use crate::error::EvalError;

/// Computes the broadcast shape of two operands.
///
/// # Errors
///
/// Returns [`EvalError::Shape`] when an axis pair has different extents
/// and neither is 1.
pub fn broadcast_shape(lhs: &[usize], rhs: &[usize]) -> Result<Vec<usize>, EvalError> {
    let ndim = lhs.len().max(rhs.len());
    let mut shape = vec![0; ndim];

    for axis in 0..ndim {
        let a = extent_from_back(lhs, ndim - 1 - axis);
        let b = extent_from_back(rhs, ndim - 1 - axis);
        shape[axis] = match (a, b) {
            (a, b) if a == b => a,
            (1, b) => b,
            (a, 1) => a,
            _ => {
                return Err(EvalError::Shape {
                    lhs: lhs.to_vec(),
                    rhs: rhs.to_vec(),
                })
            }
        };
    }
    Ok(shape)
}

fn extent_from_back(shape: &[usize], back: usize) -> usize {
    if back < shape.len() {
        shape[shape.len() - 1 - back]
    } else {
        1
    }
}

/// Combines two arrays element-wise after broadcasting them to a common shape.
///
/// # Errors
///
/// Returns [`EvalError::Shape`] when the shapes are incompatible.
pub fn zip_with<A, B, C, F>(lhs: &ArrayD<A>, rhs: &ArrayD<B>, f: F) -> Result<ArrayD<C>, EvalError>
where
    A: Copy,
    B: Copy,
    F: Fn(A, B) -> C,
{
    let shape = broadcast_shape(lhs.shape(), rhs.shape())?;
    let dim = IxDyn(&shape);
    let shape_error = || EvalError::Shape {
        lhs: lhs.shape().to_vec(),
        rhs: rhs.shape().to_vec(),
    };

    let a = lhs.broadcast(dim.clone()).ok_or_else(shape_error)?;
    let b = rhs.broadcast(dim).ok_or_else(shape_error)?;

    Ok(Zip::from(a).and(b).map_collect(|&x, &y| f(x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shape(&[3], &[3]), Ok(vec![3]));
        assert_eq!(broadcast_shape(&[], &[2, 3]), Ok(vec![2, 3]));
        assert_eq!(broadcast_shape(&[2, 1], &[1, 4]), Ok(vec![2, 4]));
        assert_eq!(broadcast_shape(&[4, 3], &[3]), Ok(vec![4, 3]));
        assert!(broadcast_shape(&[2], &[3]).is_err());
    }

    #[test]
    fn test_zip_with_row_and_column() {
        let col = arr2(&[[1.0], [2.0]]).into_dyn();
        let row = arr1(&[10.0, 20.0, 30.0]).into_dyn();

        let sum = zip_with(&col, &row, |a: f64, b: f64| a + b).unwrap();
        assert_eq!(sum.shape(), &[2, 3]);
        assert_eq!(
            sum,
            arr2(&[[11.0, 21.0, 31.0], [12.0, 22.0, 32.0]]).into_dyn()
        );
    }

    #[test]
    fn test_zip_with_mismatch() {
        let a = arr1(&[1.0, 2.0]).into_dyn();
        let b = arr1(&[1.0, 2.0, 3.0]).into_dyn();
        assert_eq!(
            zip_with(&a, &b, |x: f64, y: f64| x * y),
            Err(EvalError::Shape {
                lhs: vec![2],
                rhs: vec![3],
            })
        );
    }
}
