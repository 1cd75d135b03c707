//! Numerical evaluation of closed-form expressions.
//!
//! Evaluates an expression containing no free variables to a complex
//! floating-point value. Real inputs stay on the real line wherever the
//! result is real, so `sqrt(4)` is exactly `2` and `2^10` is exactly `1024`.

use num_complex::Complex64;
use num_traits::Zero;
use thiserror::Error;

use crate::arena::ExprArena;
use crate::expr::{functions, ExprNode, FunctionId};
use crate::handle::ExprHandle;

/// Reasons an expression has no numeric value.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NumericError {
    /// The expression depends on a symbol that is not a known constant.
    #[error("free symbol `{0}`")]
    FreeSymbol(String),

    /// The expression applies a function with no numeric definition.
    #[error("no numeric definition for function `{0}`")]
    UnknownFunction(String),

    /// A function was applied to the wrong number of arguments.
    #[error("`{function}` expects {expected} argument(s), got {found}")]
    Arity {
        /// Printed function name.
        function: String,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// The expression is not a number at all (e.g. a relation).
    #[error("`{0}` is not a numeric expression")]
    NotNumeric(String),
}

/// Value of a named constant, if `name` denotes one.
#[must_use]
pub fn named_constant(name: &str) -> Option<Complex64> {
    match name {
        "pi" => Some(Complex64::new(std::f64::consts::PI, 0.0)),
        "e" => Some(Complex64::new(std::f64::consts::E, 0.0)),
        "I" => Some(Complex64::i()),
        _ => None,
    }
}

impl ExprArena {
    /// Evaluates `handle` numerically.
    ///
    /// # Errors
    ///
    /// Returns the first reason found that the expression has no closed-form
    /// value: a free symbol, an unknown function, a relation, or a
    /// malformed function application.
    pub fn numeric_value(&self, handle: ExprHandle) -> Result<Complex64, NumericError> {
        self.evaluate(handle, &[])
    }

    /// Evaluates `handle` numerically with symbols substituted by value.
    ///
    /// Bindings take precedence over named constants.
    ///
    /// # Errors
    ///
    /// As for [`ExprArena::numeric_value`], for symbols left unbound.
    pub fn numeric_value_at(
        &self,
        handle: ExprHandle,
        bindings: &[(&str, Complex64)],
    ) -> Result<Complex64, NumericError> {
        self.evaluate(handle, bindings)
    }

    fn evaluate(
        &self,
        handle: ExprHandle,
        bindings: &[(&str, Complex64)],
    ) -> Result<Complex64, NumericError> {
        match self.get(handle) {
            ExprNode::Integer(n) => Ok(real(*n as f64)),
            ExprNode::Rational(num, den) => Ok(real(*num as f64 / *den as f64)),
            ExprNode::Symbol(id) => {
                let name = self.symbol_name(*id).unwrap_or_default();
                bindings
                    .iter()
                    .find(|(bound, _)| *bound == name)
                    .map(|(_, value)| *value)
                    .or_else(|| named_constant(name))
                    .ok_or_else(|| NumericError::FreeSymbol(name.to_string()))
            }
            ExprNode::Add(args) => {
                let mut sum = Complex64::zero();
                for arg in args {
                    sum += self.evaluate(*arg, bindings)?;
                }
                Ok(sum)
            }
            ExprNode::Mul(args) => {
                let mut product = real(1.0);
                for arg in args {
                    product *= self.evaluate(*arg, bindings)?;
                }
                Ok(product)
            }
            ExprNode::Sub { lhs, rhs } => Ok(self.evaluate(*lhs, bindings)? - self.evaluate(*rhs, bindings)?),
            ExprNode::Div { num, den } => Ok(divide(
                self.evaluate(*num, bindings)?,
                self.evaluate(*den, bindings)?,
            )),
            ExprNode::Pow { base, exp } => Ok(power(
                self.evaluate(*base, bindings)?,
                self.evaluate(*exp, bindings)?,
            )),
            ExprNode::Neg(arg) => Ok(-self.evaluate(*arg, bindings)?),
            ExprNode::Function { id, args } => {
                let values = args
                    .iter()
                    .map(|a| self.evaluate(*a, bindings))
                    .collect::<Result<Vec<_>, _>>()?;
                self.apply_function(*id, &values)
            }
            ExprNode::Relation { .. } => {
                Err(NumericError::NotNumeric(self.display(handle).to_string()))
            }
        }
    }

    fn apply_function(&self, id: FunctionId, args: &[Complex64]) -> Result<Complex64, NumericError> {
        let name = self.function_name(id).unwrap_or("?");
        if id >= functions::FIRST_USER {
            return Err(NumericError::UnknownFunction(name.to_string()));
        }
        let [z] = args else {
            return Err(NumericError::Arity {
                function: name.to_string(),
                expected: 1,
                found: args.len(),
            });
        };
        let z = *z;

        let value = match id {
            functions::SIN => z.sin(),
            functions::COS => z.cos(),
            functions::TAN => z.tan(),
            functions::EXP => z.exp(),
            functions::LN => z.ln(),
            functions::LOG10 => z.log10(),
            functions::SQRT if z.im == 0.0 && z.re >= 0.0 => real(z.re.sqrt()),
            functions::SQRT => z.sqrt(),
            functions::ABS => real(z.norm()),
            functions::ASIN => z.asin(),
            functions::ACOS => z.acos(),
            functions::ATAN => z.atan(),
            functions::SINH => z.sinh(),
            functions::COSH => z.cosh(),
            functions::TANH => z.tanh(),
            functions::ASINH => z.asinh(),
            functions::ACOSH => z.acosh(),
            functions::ATANH => z.atanh(),
            _ => return Err(NumericError::UnknownFunction(name.to_string())),
        };
        Ok(value)
    }
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

fn divide(a: Complex64, b: Complex64) -> Complex64 {
    if a.im == 0.0 && b.im == 0.0 {
        real(a.re / b.re)
    } else {
        a / b
    }
}

fn power(base: Complex64, exp: Complex64) -> Complex64 {
    let real_args = base.im == 0.0 && exp.im == 0.0;
    if real_args && (base.re >= 0.0 || exp.re.fract() == 0.0) {
        real(base.re.powf(exp.re))
    } else if base.is_zero() {
        Complex64::zero()
    } else {
        base.powc(exp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::RelOp;

    fn close(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-12
    }

    #[test]
    fn test_closed_forms() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let ten = arena.integer(10);
        let p = arena.pow(two, ten);
        assert_eq!(arena.numeric_value(p), Ok(real(1024.0)));

        let pi = arena.symbol("pi");
        let s = arena.call("sin", &[pi]);
        assert!(close(arena.numeric_value(s).unwrap(), real(0.0)));

        let half = arena.rational(1, 2);
        let e = arena.symbol("e");
        let sum = arena.add([half, e]);
        assert!(close(
            arena.numeric_value(sum).unwrap(),
            real(0.5 + std::f64::consts::E)
        ));
    }

    #[test]
    fn test_complex_results() {
        let mut arena = ExprArena::new();
        let minus_four = arena.integer(-4);
        let root = arena.call("sqrt", &[minus_four]);
        assert!(close(arena.numeric_value(root).unwrap(), Complex64::new(0.0, 2.0)));

        let i = arena.symbol("I");
        let sq = arena.mul([i, i]);
        assert!(close(arena.numeric_value(sq).unwrap(), real(-1.0)));
    }

    #[test]
    fn test_bindings() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let e = arena.symbol("e");
        let prod = arena.mul([x, e]);

        let at_two = arena.numeric_value_at(prod, &[("x", real(2.0))]).unwrap();
        assert!(close(at_two, real(2.0 * std::f64::consts::E)));

        // A binding shadows the named constant.
        let shadowed = arena
            .numeric_value_at(prod, &[("x", real(1.0)), ("e", real(3.0))])
            .unwrap();
        assert!(close(shadowed, real(3.0)));
    }

    #[test]
    fn test_failure_reasons() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.integer(1);

        let sum = arena.add([x, one]);
        assert_eq!(
            arena.numeric_value(sum),
            Err(NumericError::FreeSymbol("x".to_string()))
        );

        let g = arena.call("gamma", &[one]);
        assert_eq!(
            arena.numeric_value(g),
            Err(NumericError::UnknownFunction("gamma".to_string()))
        );

        let rel = arena.relation(RelOp::Eq, one, one);
        assert_eq!(
            arena.numeric_value(rel),
            Err(NumericError::NotNumeric("1 == 1".to_string()))
        );

        let bad = arena.call("sin", &[one, one]);
        assert!(matches!(
            arena.numeric_value(bad),
            Err(NumericError::Arity { expected: 1, found: 2, .. })
        ));
    }
}
