//! # Symbolic Engine Module
//!
//! Core node model of the expression engine. An expression is an owned binary tree
//! of [`Expr`] nodes: numeric leaves, single-letter variables, unary functions
//! (`sin`, `cos`, `tan`, `ln`) and binary operators (`+ - * / ^`).
//!
//! ## Main Structures
//!
//! - [`Symbol`] - a variable identifier, one ASCII lowercase letter (26 unknowns at most)
//! - [`UnaryFunc`] - closed set of unary functions with their postfix suffix codes
//! - [`BinaryOp`] - closed set of binary operators
//! - [`Expr`] - the tree itself; every child is a `Box<Expr>` owned by exactly one parent
//!
//! Invalid operator/function codes and malformed nodes (a number with children, an
//! operator with one operand) cannot be constructed. Cloning an `Expr` deep-copies
//! the whole subtree, dropping it releases every descendant once.
//!
//! ## Key Methods
//! - `to_postfix()` and `Display` (fully parenthesized infix) - serialization
//! - `structurally_eq()` - node-by-node comparison used by the simplifier
//! - `collect_variables()`, `contains_variable()`
//! - `set_variable()`, `set_variable_from_map()`, `substitute_variable()` - substitution
//! - `subtree()`, `wrap_at()` - path addressing of subexpressions
//!
//! Evaluation and differentiation live in `symbolic_engine_derivatives`,
//! simplification in `symbolic_simplify`.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Absolute tolerance used for zero/one tests and number comparison.
pub const EPS: f64 = 1e-12;

/// A variable name: exactly one ASCII lowercase letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u8);

impl Symbol {
    /// Returns `None` unless `c` is in `a..=z`.
    pub fn new(c: char) -> Option<Symbol> {
        if c.is_ascii_lowercase() {
            Some(Symbol(c as u8))
        } else {
            None
        }
    }

    pub fn as_char(&self) -> char {
        self.0 as char
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Unary functions. `Display` gives the function name used in infix output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum UnaryFunc {
    Sin,
    Cos,
    Tan,
    Ln,
}

impl UnaryFunc {
    /// One-letter suffix written after the operand in postfix output.
    pub fn code(&self) -> char {
        match self {
            UnaryFunc::Sin => 's',
            UnaryFunc::Cos => 'c',
            UnaryFunc::Tan => 't',
            UnaryFunc::Ln => 'l',
        }
    }

    pub fn from_code(code: char) -> Option<UnaryFunc> {
        match code {
            's' => Some(UnaryFunc::Sin),
            'c' => Some(UnaryFunc::Cos),
            't' => Some(UnaryFunc::Tan),
            'l' => Some(UnaryFunc::Ln),
            _ => None,
        }
    }

    /// Numeric value of the function, `None` outside its domain (`ln` of x <= 0).
    pub fn apply(&self, x: f64) -> Option<f64> {
        match self {
            UnaryFunc::Sin => Some(x.sin()),
            UnaryFunc::Cos => Some(x.cos()),
            UnaryFunc::Tan => Some(x.tan()),
            UnaryFunc::Ln => {
                if x <= 0.0 {
                    None
                } else {
                    Some(x.ln())
                }
            }
        }
    }
}

/// Binary operators. `Display` gives the operator character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl BinaryOp {
    pub fn symbol(&self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Pow => '^',
        }
    }

    pub fn from_char(c: char) -> Option<BinaryOp> {
        BinaryOp::iter().find(|op| op.symbol() == c)
    }

    /// Numeric value of `x op y`, `None` for a divisor closer to zero than [`EPS`].
    pub fn apply(&self, x: f64, y: f64) -> Option<f64> {
        match self {
            BinaryOp::Add => Some(x + y),
            BinaryOp::Sub => Some(x - y),
            BinaryOp::Mul => Some(x * y),
            BinaryOp::Div => {
                if y.abs() < EPS {
                    None
                } else {
                    Some(x / y)
                }
            }
            BinaryOp::Pow => Some(x.powf(y)),
        }
    }
}

/// Expression tree node.
///
/// # Examples
/// ```rust, ignore
/// let x = Expr::var('x').unwrap();
/// let expr = x.clone() * x + Expr::Const(2.0); // ((x * x) + 2)
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Numerical constant
    Const(f64),
    /// Symbolic variable
    Var(Symbol),
    /// Unary function applied to one operand
    Func(UnaryFunc, Box<Expr>),
    /// Binary operation: left op right
    Op(BinaryOp, Box<Expr>, Box<Expr>),
}

/// Step from a node to one of its children. A unary function's operand is `Left`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Left,
    Right,
}

/// Fully parenthesized infix: `((a + b) * c)`, `sin(x)`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Func(func, arg) => write!(f, "{}({})", func, arg),
            Expr::Op(op, lhs, rhs) => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Op(BinaryOp::Add, self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Op(BinaryOp::Sub, self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Op(BinaryOp::Mul, self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Op(BinaryOp::Div, self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Op(BinaryOp::Mul, Box::new(Expr::Const(-1.0)), Box::new(self))
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Variable leaf, `None` if `c` is not a lowercase ASCII letter.
    pub fn var(c: char) -> Option<Expr> {
        Symbol::new(c).map(Expr::Var)
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Op(BinaryOp::Pow, self.boxed(), rhs.boxed())
    }

    pub fn apply(self, func: UnaryFunc) -> Expr {
        Expr::Func(func, self.boxed())
    }

    pub fn sin(self) -> Expr {
        self.apply(UnaryFunc::Sin)
    }

    pub fn cos(self) -> Expr {
        self.apply(UnaryFunc::Cos)
    }

    pub fn tan(self) -> Expr {
        self.apply(UnaryFunc::Tan)
    }

    pub fn ln(self) -> Expr {
        self.apply(UnaryFunc::Ln)
    }

    /// `Some(value)` for a numeric leaf.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// Numeric leaf equal to `value` within [`EPS`].
    pub fn is_const(&self, value: f64) -> bool {
        matches!(self, Expr::Const(val) if (val - value).abs() < EPS)
    }

    pub fn is_zero(&self) -> bool {
        self.is_const(0.0)
    }

    /// Node-by-node equality: numbers within [`EPS`], operands compared in order,
    /// so `x*y` and `y*x` are different trees.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        match (self, other) {
            (Expr::Const(a), Expr::Const(b)) => (a - b).abs() < EPS,
            (Expr::Var(a), Expr::Var(b)) => a == b,
            (Expr::Func(f1, a1), Expr::Func(f2, a2)) => f1 == f2 && a1.structurally_eq(a2),
            (Expr::Op(op1, l1, r1), Expr::Op(op2, l2, r2)) => {
                op1 == op2 && l1.structurally_eq(l2) && r1.structurally_eq(r2)
            }
            _ => false,
        }
    }

    pub fn node_count(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Func(_, arg) => 1 + arg.node_count(),
            Expr::Op(_, lhs, rhs) => 1 + lhs.node_count() + rhs.node_count(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Expr::Const(_) | Expr::Var(_) => 1,
            Expr::Func(_, arg) => 1 + arg.depth(),
            Expr::Op(_, lhs, rhs) => 1 + lhs.depth().max(rhs.depth()),
        }
    }

    //___________________________________SERIALIZATION____________________________________

    /// Postfix text of the tree.
    ///
    /// Integers in `0..=9` are written as one digit, any other number as a
    /// bracket-delimited literal (`[12]`, `[0.5]`, `[-1]`); a unary function is
    /// written as its operand followed by the suffix code.
    pub fn to_postfix(&self) -> String {
        let mut out = String::new();
        self.write_postfix(&mut out);
        out
    }

    fn write_postfix(&self, out: &mut String) {
        match self {
            Expr::Const(val) => {
                if val.fract() == 0.0 && (0.0..=9.0).contains(val) {
                    out.push(char::from(b'0' + *val as u8));
                } else {
                    out.push('[');
                    out.push_str(&val.to_string());
                    out.push(']');
                }
            }
            Expr::Var(name) => out.push(name.as_char()),
            Expr::Func(func, arg) => {
                arg.write_postfix(out);
                out.push(func.code());
            }
            Expr::Op(op, lhs, rhs) => {
                lhs.write_postfix(out);
                rhs.write_postfix(out);
                out.push(op.symbol());
            }
        }
    }

    /// Fully parenthesized infix text, same as `Display`.
    pub fn to_infix(&self) -> String {
        self.to_string()
    }

    //___________________________________VARIABLES____________________________________

    /// All variable names present in the tree, sorted.
    pub fn collect_variables(&self) -> BTreeSet<char> {
        let mut vars = BTreeSet::new();
        self.collect_into(&mut vars);
        vars
    }

    fn collect_into(&self, vars: &mut BTreeSet<char>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(name) => {
                vars.insert(name.as_char());
            }
            Expr::Func(_, arg) => arg.collect_into(vars),
            Expr::Op(_, lhs, rhs) => {
                lhs.collect_into(vars);
                rhs.collect_into(vars);
            }
        }
    }

    /// check if the expression contains a variable
    pub fn contains_variable(&self, var: char) -> bool {
        match self {
            Expr::Const(_) => false,
            Expr::Var(name) => name.as_char() == var,
            Expr::Func(_, arg) => arg.contains_variable(var),
            Expr::Op(_, lhs, rhs) => lhs.contains_variable(var) || rhs.contains_variable(var),
        }
    }

    /// Replaces every occurrence of `var` with `replacement` (deep-copied at each site).
    pub fn substitute_variable(&self, var: char, replacement: &Expr) -> Expr {
        self.map_leaves(&|name| {
            if name.as_char() == var {
                Some(replacement.clone())
            } else {
                None
            }
        })
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: char, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// Replaces the variables present in `var_map` with numeric leaves, leaving the
    /// others symbolic.
    pub fn set_variable_from_map(&self, var_map: &HashMap<char, f64>) -> Expr {
        self.map_leaves(&|name| var_map.get(&name.as_char()).map(|val| Expr::Const(*val)))
    }

    fn map_leaves(&self, replace: &dyn Fn(Symbol) -> Option<Expr>) -> Expr {
        match self {
            Expr::Const(_) => self.clone(),
            Expr::Var(name) => replace(*name).unwrap_or_else(|| self.clone()),
            Expr::Func(func, arg) => Expr::Func(*func, Box::new(arg.map_leaves(replace))),
            Expr::Op(op, lhs, rhs) => Expr::Op(
                *op,
                Box::new(lhs.map_leaves(replace)),
                Box::new(rhs.map_leaves(replace)),
            ),
        }
    }

    //___________________________________PATHS____________________________________

    /// Subexpression reached by following `path` from this node.
    pub fn subtree(&self, path: &[Branch]) -> Option<&Expr> {
        match (path.split_first(), self) {
            (None, _) => Some(self),
            (Some((Branch::Left, rest)), Expr::Func(_, arg)) => arg.subtree(rest),
            (Some((Branch::Left, rest)), Expr::Op(_, lhs, _)) => lhs.subtree(rest),
            (Some((Branch::Right, rest)), Expr::Op(_, _, rhs)) => rhs.subtree(rest),
            _ => None,
        }
    }

    /// New tree in which the subexpression at `path` is wrapped in `func`;
    /// `None` if the path leaves the tree.
    pub fn wrap_at(&self, path: &[Branch], func: UnaryFunc) -> Option<Expr> {
        match (path.split_first(), self) {
            (None, _) => Some(self.clone().apply(func)),
            (Some((Branch::Left, rest)), Expr::Func(f, arg)) => {
                Some(Expr::Func(*f, Box::new(arg.wrap_at(rest, func)?)))
            }
            (Some((Branch::Left, rest)), Expr::Op(op, lhs, rhs)) => {
                Some(Expr::Op(*op, Box::new(lhs.wrap_at(rest, func)?), rhs.clone()))
            }
            (Some((Branch::Right, rest)), Expr::Op(op, lhs, rhs)) => {
                Some(Expr::Op(*op, lhs.clone(), Box::new(rhs.wrap_at(rest, func)?)))
            }
            _ => None,
        }
    }
}
