//! # Symbolic Engine Derivatives Module
//!
//! Extends [`Expr`] with symbolic differentiation and numeric evaluation.
//!
//! ## Key Methods
//!
//! ### Differentiation
//! - `diff(var)` - analytical partial derivative, always a brand-new tree
//! - `nth_derivative(var, n)` - repeated differentiation with simplification
//!
//! ### Evaluation
//! - `eval_expression(bindings)` - post-order numeric evaluation
//! - `lambdify1D(var)` - closure of one variable over `eval_expression`
//!
//! ### Numerical validation
//! - `compare_num1D()` - analytic derivative against a central finite difference
//!
//! Operands referenced twice by a rule (product, quotient, power, chain rule) are
//! deep-cloned, so the derivative never shares nodes with its source.

use crate::symbolic::symbolic_engine::{BinaryOp, EPS, Expr, Symbol, UnaryFunc};
use crate::symbolic::symbolic_errors::EvalError;
use crate::symbolic::utils::{linspace, norm, numerical_derivative};
use log::debug;
use std::collections::HashMap;

impl Expr {
    /// DIFFERENTIATION

    /// Computes the analytical derivative of the expression with respect to a variable.
    ///
    /// - Sum rule: d(u +- v) = du +- dv
    /// - Product rule: d(u*v) = du*v + u*dv
    /// - Quotient rule: d(u/v) = (du*v - u*dv) / v^2
    /// - Power with constant exponent n: n*u^(n-1)*du (0 for n = 0, du for n = 1)
    /// - Power with symbolic exponent: u^v * (dv*ln(u) + v*(du/u))
    /// - Chain rule for sin, cos, tan, ln
    ///
    /// # Examples
    /// ```rust, ignore
    /// let x = Symbol::new('x').unwrap();
    /// let f = Expr::Var(x) * Expr::Var(x);
    /// let df_dx = f.diff(x); // ((1 * x) + (x * 1))
    /// ```
    pub fn diff(&self, var: Symbol) -> Expr {
        match self {
            Expr::Const(_) => Expr::Const(0.0),
            Expr::Var(name) => {
                if *name == var {
                    Expr::Const(1.0)
                } else {
                    Expr::Const(0.0)
                }
            }
            Expr::Func(func, u) => {
                let du = u.diff(var);
                let u = u.as_ref().clone();
                match func {
                    UnaryFunc::Sin => u.cos() * du,
                    UnaryFunc::Cos => (Expr::Const(-1.0) * u.sin()) * du,
                    UnaryFunc::Tan => {
                        (Expr::Const(1.0) / u.cos().pow(Expr::Const(2.0))) * du
                    }
                    UnaryFunc::Ln => du / u,
                }
            }
            Expr::Op(op, u, v) => {
                let du = u.diff(var);
                let dv = v.diff(var);
                let u = u.as_ref();
                let v = v.as_ref();
                match op {
                    BinaryOp::Add => du + dv,
                    BinaryOp::Sub => du - dv,
                    BinaryOp::Mul => du * v.clone() + u.clone() * dv,
                    BinaryOp::Div => {
                        (du * v.clone() - u.clone() * dv) / v.clone().pow(Expr::Const(2.0))
                    }
                    BinaryOp::Pow => match v {
                        // dv is discarded, the exponent is constant
                        Expr::Const(n) if n.abs() < EPS => Expr::Const(0.0),
                        Expr::Const(n) if (n - 1.0).abs() < EPS => du,
                        Expr::Const(n) => {
                            (Expr::Const(*n) * u.clone().pow(Expr::Const(n - 1.0))) * du
                        }
                        _ => {
                            let outer = u.clone().pow(v.clone());
                            let inside = dv * u.clone().ln() + v.clone() * (du / u.clone());
                            outer * inside
                        }
                    },
                }
            }
        }
    } // end of diff

    /// Computes the nth derivative, simplifying after every step.
    ///
    /// # Arguments
    /// * `var` - Variable to differentiate with respect to
    /// * `n` - Order of derivative (0 = the simplified expression itself)
    pub fn nth_derivative(&self, var: Symbol, n: usize) -> Expr {
        let mut expr = self.simplify();
        for _ in 0..n {
            expr = expr.diff(var).simplify();
        }
        debug!("derivative of order {} has {} nodes", n, expr.node_count());
        expr
    }

    /// EVALUATION

    /// Evaluates the expression under the given variable bindings.
    ///
    /// The walk is post-order; the first error met in a child aborts the parent.
    ///
    /// # Errors
    /// * `UnboundVariable` - a variable without a value in `bindings`
    /// * `DivisionByZero` - a divisor closer to zero than 1e-12
    /// * `DomainError` - `ln` of a non-positive number
    pub fn eval_expression(&self, bindings: &HashMap<char, f64>) -> Result<f64, EvalError> {
        match self {
            Expr::Const(val) => Ok(*val),
            Expr::Var(name) => bindings
                .get(&name.as_char())
                .copied()
                .ok_or(EvalError::UnboundVariable(name.as_char())),
            Expr::Func(func, arg) => {
                let x = arg.eval_expression(bindings)?;
                func.apply(x).ok_or(EvalError::DomainError(*func, x))
            }
            Expr::Op(op, lhs, rhs) => {
                let x = lhs.eval_expression(bindings)?;
                let y = rhs.eval_expression(bindings)?;
                op.apply(x, y).ok_or(EvalError::DivisionByZero)
            }
        }
    }

    /// Turns the expression into a function of one variable.
    ///
    /// Every other variable of the expression is reported as unbound when called.
    pub fn lambdify1D(&self, var: char) -> impl Fn(f64) -> Result<f64, EvalError> + '_ {
        move |x| {
            let bindings = HashMap::from([(var, x)]);
            self.eval_expression(&bindings)
        }
    }

    /// NUMERICAL VALIDATION

    /// Compares the analytic derivative with a central finite difference on
    /// `num_values` points of `[start, end]`.
    ///
    /// # Returns
    /// The norm of the difference and whether it stays below `max_norm`.
    pub fn compare_num1D(
        &self,
        var: Symbol,
        start: f64,
        end: f64,
        num_values: usize,
        max_norm: f64,
    ) -> Result<(f64, bool), EvalError> {
        let points = linspace(start, end, num_values);
        let derivative = self.diff(var).simplify();
        let df = derivative.lambdify1D(var.as_char());
        let analytical = points.iter().map(|&x| df(x)).collect::<Result<Vec<f64>, _>>()?;

        // the finite difference cannot return errors, so evaluate the samples first
        let f = self.lambdify1D(var.as_char());
        let h = 1e-6;
        for &x in &points {
            f(x - h)?;
            f(x + h)?;
        }
        let numerical = numerical_derivative(|x| f(x).unwrap_or(f64::NAN), points, h);

        let norm_res = norm(analytical, numerical);
        debug!("analytical vs numerical derivative norm = {}", norm_res);
        Ok((norm_res, norm_res < max_norm))
    }
}
