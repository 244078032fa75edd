//! # Expression Tree Module
//!
//! [`ExprTree`] is the value handed to callers of the engine: an optional root
//! [`Expr`] together with the postfix text it was built from and the cached infix
//! rendering. An empty tree is a valid value (a cleared slot); operations that need
//! a root report it through their error type.
//!
//! Every operation here reads `self` and returns a new, independently owned tree.
//!
//! ## Example
//! ```
//! use RustedExprTree::symbolic::expr_tree::ExprTree;
//! use std::collections::HashMap;
//! let tree = ExprTree::build_from_postfix("xx*").unwrap();
//! let d = tree.derivative('x').unwrap().simplify();
//! let value = d.evaluate(&HashMap::from([('x', 1.5)])).unwrap();
//! assert!((value - 3.0).abs() < 1e-12);
//! ```

use crate::symbolic::parse_expr::parse_postfix;
use crate::symbolic::symbolic_engine::{BinaryOp, Branch, Expr, Symbol, UnaryFunc};
use crate::symbolic::symbolic_errors::{ComposeError, DerivError, EvalError, ParseError};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Clone, Debug, Default)]
pub struct ExprTree {
    root: Option<Expr>,
    /// postfix text the tree was built from, regenerated for derived trees
    postfix_raw: String,
    infix_cache: String,
}

impl ExprTree {
    /// Wraps an existing expression, caches are generated from it.
    pub fn from_expr(expr: Expr) -> ExprTree {
        let mut tree = ExprTree {
            root: Some(expr),
            ..Default::default()
        };
        tree.update_caches();
        tree
    }

    /// Parses postfix text, see [`parse_postfix`]. The trimmed input is kept as the
    /// raw postfix text of the tree.
    pub fn build_from_postfix(text: &str) -> Result<ExprTree, ParseError> {
        let root = parse_postfix(text)?;
        let infix_cache = root.to_string();
        debug!("built {} from '{}', {} nodes", infix_cache, text.trim(), root.node_count());
        Ok(ExprTree {
            root: Some(root),
            postfix_raw: text.trim().to_string(),
            infix_cache,
        })
    }

    pub fn root(&self) -> Option<&Expr> {
        self.root.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops the root and both caches.
    pub fn clear(&mut self) {
        self.root = None;
        self.postfix_raw.clear();
        self.infix_cache.clear();
    }

    /// Regenerates the postfix and infix caches from the root.
    pub fn update_caches(&mut self) {
        match &self.root {
            Some(root) => {
                self.postfix_raw = root.to_postfix();
                self.infix_cache = root.to_string();
            }
            None => {
                self.postfix_raw.clear();
                self.infix_cache.clear();
            }
        }
    }

    /// Postfix text as recorded: the parsed input, the concatenation for composed
    /// trees or the regenerated text for derived ones.
    pub fn postfix_raw(&self) -> &str {
        &self.postfix_raw
    }

    /// Postfix text regenerated from the root; empty for an empty tree.
    pub fn to_postfix(&self) -> String {
        self.root.as_ref().map(Expr::to_postfix).unwrap_or_default()
    }

    pub fn to_infix(&self) -> String {
        self.infix_cache.clone()
    }

    pub fn collect_variables(&self) -> BTreeSet<char> {
        self.root
            .as_ref()
            .map(Expr::collect_variables)
            .unwrap_or_default()
    }

    pub fn evaluate(&self, bindings: &HashMap<char, f64>) -> Result<f64, EvalError> {
        let root = self.root.as_ref().ok_or(EvalError::EmptyExpression)?;
        root.eval_expression(bindings)
    }

    /// Partial derivative with respect to `var`, not simplified.
    pub fn derivative(&self, var: char) -> Result<ExprTree, DerivError> {
        let root = self.root.as_ref().ok_or(DerivError::EmptyExpression)?;
        let symbol = Symbol::new(var).ok_or(DerivError::InvalidVariable(var))?;
        let derived = ExprTree::from_expr(root.diff(symbol));
        info!(
            "d/d{} of {} has {} nodes",
            var,
            self.infix_cache,
            derived.root().map_or(0, Expr::node_count)
        );
        Ok(derived)
    }

    pub fn simplify(&self) -> ExprTree {
        match &self.root {
            Some(root) => {
                let simplified = ExprTree::from_expr(root.simplify());
                debug!("simplified {} -> {}", self.infix_cache, simplified.infix_cache);
                simplified
            }
            None => ExprTree::default(),
        }
    }

    /// `A op B` from deep copies of both roots. The raw postfix text is
    /// `A.postfix_raw + B.postfix_raw + op`.
    pub fn compose(a: &ExprTree, b: &ExprTree, op: char) -> Result<ExprTree, ComposeError> {
        let op_kind = BinaryOp::from_char(op).ok_or(ComposeError::InvalidOperator(op))?;
        let (Some(lhs), Some(rhs)) = (&a.root, &b.root) else {
            return Err(ComposeError::EmptyOperand);
        };
        let root = Expr::Op(op_kind, Box::new(lhs.clone()), Box::new(rhs.clone()));
        let infix_cache = root.to_string();
        Ok(ExprTree {
            root: Some(root),
            postfix_raw: format!("{}{}{}", a.postfix_raw, b.postfix_raw, op),
            infix_cache,
        })
    }

    /// Replaces the variables present in `bindings` by numeric leaves.
    pub fn substitute_bound_variables(&self, bindings: &HashMap<char, f64>) -> ExprTree {
        match &self.root {
            Some(root) => ExprTree::from_expr(root.set_variable_from_map(bindings)),
            None => ExprTree::default(),
        }
    }

    /// New tree with the subexpression at `path` wrapped in `func`.
    /// `None` for an empty tree or a path that leaves the tree.
    pub fn wrap_subtree(&self, path: &[Branch], func: UnaryFunc) -> Option<ExprTree> {
        let wrapped = self.root.as_ref()?.wrap_at(path, func)?;
        Some(ExprTree::from_expr(wrapped))
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.infix_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tree_is_empty() {
        let tree = ExprTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.to_postfix(), "");
        assert_eq!(tree.to_infix(), "");
        assert!(tree.collect_variables().is_empty());
    }

    #[test]
    fn test_clear_releases_root_and_caches() {
        let mut tree = ExprTree::build_from_postfix("ab+").unwrap();
        assert!(!tree.is_empty());
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.postfix_raw(), "");
        assert_eq!(tree.to_string(), "");
    }

    #[test]
    fn test_raw_postfix_keeps_input() {
        let tree = ExprTree::build_from_postfix("  a b + ").unwrap();
        assert_eq!(tree.postfix_raw(), "a b +");
        assert_eq!(tree.to_postfix(), "ab+");
    }

    #[test]
    fn test_empty_tree_errors() {
        let tree = ExprTree::default();
        assert_eq!(tree.evaluate(&HashMap::new()), Err(EvalError::EmptyExpression));
        assert!(matches!(tree.derivative('x'), Err(DerivError::EmptyExpression)));
        assert!(tree.simplify().is_empty());
        assert!(tree.wrap_subtree(&[], UnaryFunc::Sin).is_none());
    }

    #[test]
    fn test_derivative_rejects_non_letter() {
        let tree = ExprTree::build_from_postfix("x").unwrap();
        assert!(matches!(tree.derivative('X'), Err(DerivError::InvalidVariable('X'))));
        assert!(matches!(tree.derivative('1'), Err(DerivError::InvalidVariable('1'))));
    }

    #[test]
    fn test_compose_errors() {
        let a = ExprTree::build_from_postfix("a").unwrap();
        let empty = ExprTree::default();
        assert!(matches!(
            ExprTree::compose(&a, &a, '%'),
            Err(ComposeError::InvalidOperator('%'))
        ));
        assert!(matches!(
            ExprTree::compose(&a, &empty, '+'),
            Err(ComposeError::EmptyOperand)
        ));
        assert!(matches!(
            ExprTree::compose(&empty, &a, '*'),
            Err(ComposeError::EmptyOperand)
        ));
    }

    #[test]
    fn test_deep_input_is_rejected() {
        let deep = format!("1{}", "1+".repeat(100_000));
        assert!(matches!(
            ExprTree::build_from_postfix(&deep),
            Err(ParseError::NestingTooDeep(_))
        ));
        // a chain just under the limit still evaluates
        let chain = format!("x{}", "1+".repeat(200));
        let tree = ExprTree::build_from_postfix(&chain).unwrap();
        let value = tree.evaluate(&HashMap::from([('x', 0.5)])).unwrap();
        assert_eq!(value, 200.5);
    }
}
