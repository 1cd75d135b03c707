//! Element-wise numeric kernels.
//!
//! Kernels whose real result is undefined on part of the real line
//! (`sqrt`, `log`, `arcsin`, `power`, ...) follow scimath semantics: when a
//! real operand has any element outside the real domain, the whole operand
//! is promoted to complex and evaluated on the principal branch.

use std::fmt;

use ndarray::ArrayD;
use num_complex::Complex64;
use num_traits::Zero;

use crate::error::EvalError;
use crate::value::Value;

/// An element-wise function of the array runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kernel {
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Tangent.
    Tan,
    /// Inverse sine.
    Arcsin,
    /// Inverse cosine.
    Arccos,
    /// Inverse tangent.
    Arctan,
    /// Hyperbolic sine.
    Sinh,
    /// Hyperbolic cosine.
    Cosh,
    /// Hyperbolic tangent.
    Tanh,
    /// Inverse hyperbolic sine.
    Arcsinh,
    /// Inverse hyperbolic cosine.
    Arccosh,
    /// Inverse hyperbolic tangent.
    Arctanh,
    /// Natural exponential.
    Exp,
    /// Natural logarithm.
    Log,
    /// Base-10 logarithm.
    Log10,
    /// Absolute value (modulus for complex input, always real).
    Abs,
    /// Arithmetic negation.
    Negative,
    /// Square root.
    Sqrt,
    /// Power `base^exponent`.
    Power,
}

impl Kernel {
    /// Returns the runtime name of the kernel.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kernel::Sin => "sin",
            Kernel::Cos => "cos",
            Kernel::Tan => "tan",
            Kernel::Arcsin => "arcsin",
            Kernel::Arccos => "arccos",
            Kernel::Arctan => "arctan",
            Kernel::Sinh => "sinh",
            Kernel::Cosh => "cosh",
            Kernel::Tanh => "tanh",
            Kernel::Arcsinh => "arcsinh",
            Kernel::Arccosh => "arccosh",
            Kernel::Arctanh => "arctanh",
            Kernel::Exp => "exp",
            Kernel::Log => "log",
            Kernel::Log10 => "log10",
            Kernel::Abs => "abs",
            Kernel::Negative => "negative",
            Kernel::Sqrt => "sqrt",
            Kernel::Power => "power",
        }
    }

    /// Number of operands the kernel takes.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Kernel::Power => 2,
            _ => 1,
        }
    }

    /// Applies the kernel to its operands.
    ///
    /// # Errors
    ///
    /// Fails on an operand count other than [`Kernel::arity`] or on
    /// operands that do not broadcast.
    pub fn apply(self, args: &[Value]) -> Result<Value, EvalError> {
        match (self, args) {
            (Kernel::Power, [base, exponent]) => power(base, exponent),
            (Kernel::Power, _) => Err(self.arity_error(args.len())),
            (_, [x]) => Ok(self.unary(x)),
            _ => Err(self.arity_error(args.len())),
        }
    }

    fn arity_error(self, found: usize) -> EvalError {
        EvalError::KernelArity {
            kernel: self.name(),
            expected: self.arity(),
            found,
        }
    }

    /// Whether `x` lies where the kernel's real-valued result is defined.
    fn in_real_domain(self, x: f64) -> bool {
        match self {
            Kernel::Sqrt | Kernel::Log | Kernel::Log10 => x >= 0.0,
            Kernel::Arcsin | Kernel::Arccos | Kernel::Arctanh => (-1.0..=1.0).contains(&x),
            Kernel::Arccosh => x >= 1.0,
            _ => true,
        }
    }

    fn unary(self, x: &Value) -> Value {
        match x {
            Value::Real(a) if self.stays_real(a) => Value::Real(a.mapv(|v| self.real_scalar(v))),
            _ => {
                let z = x.to_complex();
                match self {
                    Kernel::Abs => Value::Real(z.mapv(|v| v.norm())),
                    _ => Value::Complex(z.mapv(|v| self.complex_scalar(v))),
                }
            }
        }
    }

    fn stays_real(self, a: &ArrayD<f64>) -> bool {
        // NaN inputs stay NaN on the real path.
        a.iter().all(|&v| v.is_nan() || self.in_real_domain(v))
    }

    fn real_scalar(self, x: f64) -> f64 {
        match self {
            Kernel::Sin => x.sin(),
            Kernel::Cos => x.cos(),
            Kernel::Tan => x.tan(),
            Kernel::Arcsin => x.asin(),
            Kernel::Arccos => x.acos(),
            Kernel::Arctan => x.atan(),
            Kernel::Sinh => x.sinh(),
            Kernel::Cosh => x.cosh(),
            Kernel::Tanh => x.tanh(),
            Kernel::Arcsinh => x.asinh(),
            Kernel::Arccosh => x.acosh(),
            Kernel::Arctanh => x.atanh(),
            Kernel::Exp => x.exp(),
            Kernel::Log => x.ln(),
            Kernel::Log10 => x.log10(),
            Kernel::Abs => x.abs(),
            Kernel::Negative => -x,
            Kernel::Sqrt => x.sqrt(),
            Kernel::Power => f64::NAN,
        }
    }

    fn complex_scalar(self, z: Complex64) -> Complex64 {
        match self {
            Kernel::Sin => z.sin(),
            Kernel::Cos => z.cos(),
            Kernel::Tan => z.tan(),
            Kernel::Arcsin => z.asin(),
            Kernel::Arccos => z.acos(),
            Kernel::Arctan => z.atan(),
            Kernel::Sinh => z.sinh(),
            Kernel::Cosh => z.cosh(),
            Kernel::Tanh => z.tanh(),
            Kernel::Arcsinh => z.asinh(),
            Kernel::Arccosh => z.acosh(),
            Kernel::Arctanh => z.atanh(),
            Kernel::Exp => z.exp(),
            Kernel::Log => z.ln(),
            Kernel::Log10 => z.log10(),
            Kernel::Abs => Complex64::new(z.norm(), 0.0),
            Kernel::Negative => -z,
            Kernel::Sqrt => z.sqrt(),
            Kernel::Power => Complex64::new(f64::NAN, f64::NAN),
        }
    }
}

impl fmt::Display for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scimath power: a real base with any negative element is promoted to
/// complex before exponentiation.
fn power(base: &Value, exponent: &Value) -> Result<Value, EvalError> {
    let negative_base = base
        .as_real()
        .is_some_and(|a| a.iter().any(|&v| v < 0.0));

    if negative_base {
        let promoted = Value::Complex(base.to_complex());
        return promoted.binary(exponent, f64::powf, complex_pow);
    }
    base.binary(exponent, f64::powf, complex_pow)
}

fn complex_pow(base: Complex64, exponent: Complex64) -> Complex64 {
    if exponent.im == 0.0 && exponent.re.fract() == 0.0 && exponent.re.abs() <= f64::from(i32::MAX) {
        return base.powi(exponent.re as i32);
    }
    if base.is_zero() {
        return if exponent.re > 0.0 {
            Complex64::zero()
        } else {
            Complex64::new(f64::INFINITY, 0.0)
        };
    }
    base.powc(exponent)
}
