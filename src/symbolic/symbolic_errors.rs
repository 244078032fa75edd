//! Error types returned by the expression engine.
//!
//! Every engine operation reports failure as a value. Nested recursive calls pass
//! their error up unchanged, and whatever part of a tree was under construction is
//! dropped before the error reaches the caller.

use crate::symbolic::symbolic_engine::UnaryFunc;
use std::fmt;

/// Failures of [`crate::symbolic::parse_expr::parse_postfix`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// a character outside the postfix alphabet
    InvalidToken(char),
    /// an operator found fewer than two operands on the stack
    InsufficientOperands,
    /// the stack did not hold exactly one tree after the last token
    MalformedExpression,
    /// a bracket-delimited literal that is unterminated or not a number
    InvalidLiteral(String),
    /// the tree would be deeper than the given limit
    NestingTooDeep(usize),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::InvalidToken(c) => write!(f, "Invalid token '{}'", c),
            ParseError::InsufficientOperands => {
                write!(f, "Operator needs two operands, fewer are available")
            }
            ParseError::MalformedExpression => {
                write!(f, "Malformed expression: the operand stack does not hold exactly one tree")
            }
            ParseError::InvalidLiteral(lit) => write!(f, "Invalid numeric literal '[{}'", lit),
            ParseError::NestingTooDeep(limit) => {
                write!(f, "Expression is nested deeper than {} levels", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Failures of numeric evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UnboundVariable(char),
    DivisionByZero,
    /// function applied outside its domain, with the offending argument
    DomainError(UnaryFunc, f64),
    EmptyExpression,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalError::UnboundVariable(c) => write!(f, "Variable '{}' has no value", c),
            EvalError::DivisionByZero => write!(f, "Division by zero"),
            EvalError::DomainError(func, arg) => {
                write!(f, "{}({}) is outside the domain of {}", func, arg, func)
            }
            EvalError::EmptyExpression => write!(f, "Cannot evaluate an empty expression"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Failures of symbolic differentiation.
#[derive(Debug, Clone, PartialEq)]
pub enum DerivError {
    UnsupportedOperator(char),
    UnsupportedFunction(char),
    EmptyExpression,
    /// the requested variable is not a lowercase ASCII letter
    InvalidVariable(char),
}

impl fmt::Display for DerivError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DerivError::UnsupportedOperator(c) => write!(f, "Cannot differentiate operator '{}'", c),
            DerivError::UnsupportedFunction(c) => write!(f, "Cannot differentiate function '{}'", c),
            DerivError::EmptyExpression => write!(f, "Cannot differentiate an empty expression"),
            DerivError::InvalidVariable(c) => write!(f, "'{}' is not a variable name", c),
        }
    }
}

impl std::error::Error for DerivError {}

/// Failures of [`crate::symbolic::expr_tree::ExprTree::compose`].
#[derive(Debug, Clone, PartialEq)]
pub enum ComposeError {
    InvalidOperator(char),
    EmptyOperand,
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ComposeError::InvalidOperator(c) => write!(f, "'{}' is not a binary operator", c),
            ComposeError::EmptyOperand => write!(f, "Both operands of a composition must be non-empty"),
        }
    }
}

impl std::error::Error for ComposeError {}
