//! Function assembly.
//!
//! Wraps a lowered body into a callable whose positional parameters are the
//! declared variables, in declaration order.

use std::fmt;
use std::sync::Arc;

use numforge_array::{broadcast_shape, EvalError, Value};
use rayon::prelude::*;

use crate::ir::Ir;

#[derive(Debug)]
struct Body {
    params: Vec<String>,
    ir: Ir,
}

/// A compiled numeric function.
///
/// Immutable once assembled; clones share the body and calls may run
/// concurrently from any number of threads.
#[derive(Clone, Debug)]
pub struct CompiledFunction {
    body: Arc<Body>,
}

/// Assembles `ir` into a function of `variables`, in order.
///
/// Parameter indices in `ir` must refer to positions in `variables`, as
/// produced by [`Lowerer::lower`](crate::Lowerer::lower) with the same list.
#[must_use]
pub fn assemble<S: AsRef<str>>(ir: Ir, variables: &[S]) -> CompiledFunction {
    CompiledFunction {
        body: Arc::new(Body {
            params: variables.iter().map(|v| v.as_ref().to_string()).collect(),
            ir,
        }),
    }
}

impl CompiledFunction {
    /// Parameter names, in positional order.
    #[must_use]
    pub fn params(&self) -> &[String] {
        &self.body.params
    }

    /// Number of parameters.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.body.params.len()
    }

    /// The lowered body.
    #[must_use]
    pub fn body(&self) -> &Ir {
        &self.body.ir
    }

    /// Calls the function.
    ///
    /// Scalar arguments give a scalar result; array arguments are broadcast
    /// against each other and the result has the broadcast shape of all
    /// arguments, including those the body does not use.
    ///
    /// # Errors
    ///
    /// Fails on a wrong argument count, on arguments whose shapes do not
    /// broadcast, or on a kernel applied to the wrong number of operands.
    pub fn call(&self, args: &[Value]) -> Result<Value, EvalError> {
        if args.len() != self.arity() {
            return Err(EvalError::Arity {
                expected: self.arity(),
                found: args.len(),
            });
        }

        let mut shape = Vec::new();
        for arg in args {
            shape = broadcast_shape(&shape, arg.shape())?;
        }

        let out = self.body.ir.eval(args)?;
        if out.shape() == shape.as_slice() {
            Ok(out)
        } else {
            out.broadcast_to(&shape)
        }
    }

    /// Calls the function with real scalar arguments.
    ///
    /// # Errors
    ///
    /// As for [`CompiledFunction::call`].
    pub fn call_scalars(&self, args: &[f64]) -> Result<Value, EvalError> {
        let values: Vec<Value> = args.iter().copied().map(Value::real).collect();
        self.call(&values)
    }

    /// Calls the function once per argument set, in parallel.
    ///
    /// Results are returned in input order.
    #[must_use]
    pub fn call_batch(&self, batch: &[Vec<Value>]) -> Vec<Result<Value, EvalError>> {
        batch.par_iter().map(|args| self.call(args)).collect()
    }

    /// Diagnostic rendering of the function, e.g. `fn(x, y) = (sin(x) + cos(y))`.
    #[must_use]
    pub fn source(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CompiledFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) = {}", self.body.params.join(", "), self.body.ir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{InfixOp, Literal};
    use numforge_array::ndarray::arr1;

    fn x_over_y() -> CompiledFunction {
        let ir = Ir::Infix {
            op: InfixOp::Div,
            operands: vec![
                Ir::Param {
                    index: 0,
                    name: "x".to_string(),
                },
                Ir::Param {
                    index: 1,
                    name: "y".to_string(),
                },
            ],
        };
        assemble(ir, &["x", "y"])
    }

    #[test]
    fn test_positional_binding() {
        let f = x_over_y();
        assert_eq!(f.params(), &["x".to_string(), "y".to_string()]);
        assert_eq!(f.call_scalars(&[1.0, 4.0]).unwrap().real_scalar(), Some(0.25));
        assert_eq!(f.call_scalars(&[4.0, 1.0]).unwrap().real_scalar(), Some(4.0));
    }

    #[test]
    fn test_arity_checked() {
        let f = x_over_y();
        assert_eq!(
            f.call_scalars(&[1.0]),
            Err(EvalError::Arity {
                expected: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_array_arguments() {
        let f = x_over_y();
        let out = f
            .call(&[Value::from(arr1(&[2.0, 4.0, 8.0])), Value::real(2.0)])
            .unwrap();
        assert_eq!(out, Value::from(arr1(&[1.0, 2.0, 4.0])));
    }

    #[test]
    fn test_output_takes_shape_of_unused_arguments() {
        let constant = assemble(Ir::Literal(Literal::Real(2.0)), &["x"]);
        let out = constant.call(&[Value::from(arr1(&[1.0, 2.0, 3.0]))]).unwrap();
        assert_eq!(out, Value::from(arr1(&[2.0, 2.0, 2.0])));

        let only_y = assemble(
            Ir::Param {
                index: 1,
                name: "y".to_string(),
            },
            &["x", "y"],
        );
        let out = only_y
            .call(&[Value::from(arr1(&[1.0, 2.0, 3.0])), Value::real(0.5)])
            .unwrap();
        assert_eq!(out.shape(), &[3]);

        let err = only_y
            .call(&[
                Value::from(arr1(&[1.0, 2.0, 3.0])),
                Value::from(arr1(&[1.0, 2.0])),
            ])
            .unwrap_err();
        assert!(matches!(err, EvalError::Shape { .. }));
    }

    #[test]
    fn test_batch_preserves_order() {
        let f = x_over_y();
        let batch: Vec<Vec<Value>> = (1..=8)
            .map(|i| vec![Value::real(f64::from(i)), Value::real(2.0)])
            .collect();

        let results = f.call_batch(&batch);
        for (i, result) in results.into_iter().enumerate() {
            let expected = (i + 1) as f64 / 2.0;
            assert_eq!(result.unwrap().real_scalar(), Some(expected));
        }
    }

    #[test]
    fn test_source_rendering() {
        assert_eq!(x_over_y().source(), "fn(x, y) = (x / y)");

        let constant = assemble(Ir::Literal(Literal::Real(1.5)), &[] as &[&str]);
        assert_eq!(constant.source(), "fn() = 1.5");
        assert_eq!(constant.call(&[]).unwrap().real_scalar(), Some(1.5));
    }
}
