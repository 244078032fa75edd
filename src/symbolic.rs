/// a module turns a postfix (Reverse-Polish) string into a symbolic expression
///
///# Example
/// ```
/// use RustedExprTree::symbolic::symbolic_engine::Expr;
/// let parsed_expression = Expr::parse_expression("ab+c*").unwrap();
/// println!(" parsed_expression {}", parsed_expression);
/// assert_eq!(parsed_expression.to_postfix(), "ab+c*");
///  ```
/// ________________________________________________________________________________________________________________________________
pub mod parse_expr;
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree: numbers, one-letter variables, sin/cos/tan/ln and + - * / ^
/// 2) turns a symbolic expression back into postfix and fully parenthesized infix text
/// 3) substitutes variables and addresses subexpressions by paths
///# Example#
/// ```
/// use RustedExprTree::symbolic::symbolic_engine::Expr;
/// use std::collections::HashMap;
/// let expr = Expr::parse_expression("xy*x+").unwrap();
/// println!("variables {:?}", expr.collect_variables());
/// let expr_at_y = expr.set_variable('y', 2.0);
/// println!("{}", expr_at_y);
/// let value = expr_at_y.eval_expression(&HashMap::from([('x', 3.0)])).unwrap();
/// assert_eq!(value, 9.0);
/// ```
/// Example2#
/// ```
/// use RustedExprTree::symbolic::symbolic_engine::{Expr, Symbol};
/// let f = Expr::parse_expression("xx*x+").unwrap().ln();
/// let x = Symbol::new('x').unwrap();
/// // differentiate and simplify
/// let df_dx = f.diff(x).simplify();
/// println!("df_dx = {}", df_dx);
/// // compare numerical and analtical derivatives on a linspace
/// let (norm, res) = f.compare_num1D(x, 1.0, 3.0, 50, 1e-6).unwrap();
/// println!("norm = {}, res = {}", norm, res);
/// assert!(res);
/// ```
/// ________________________________________________________________________________________________________________________________________________
pub mod symbolic_engine;
pub mod symbolic_engine_derivatives;
/// rewrite rules: constant folding, like terms and like factors, identities
pub mod symbolic_simplify;
///________________________________________________________________________________________________________________________________________________
///
/// tree value used by callers: build, evaluate, derive, simplify, compose and wrap
/// Example#
/// ```
/// use RustedExprTree::symbolic::expr_tree::ExprTree;
/// let a = ExprTree::build_from_postfix("ab+").unwrap();
/// let b = ExprTree::build_from_postfix("c").unwrap();
/// let composed = ExprTree::compose(&a, &b, '*').unwrap();
/// assert_eq!(composed.to_infix(), "((a + b) * c)");
/// assert_eq!(composed.postfix_raw(), "ab+c*");
/// ```
pub mod expr_tree;
pub mod symbolic_errors;
///______________________________________________________________________________________________________________________________________________
/// numeric helpers: linspace, finite differences and norms
/// _____________________________________________________________________________________________________________________________________________
pub mod utils;

mod symbolic_engine_tests;
mod symbolic_proptests;
