//! # Symbolic Expression Simplification Module
//!
//! Bottom-up rewrite of an expression into a reduced equivalent form. Children are
//! simplified first, then the node itself is rewritten by the first rule that applies:
//!
//! 1. **Unary constant folding**: `sin(0)` -> `0`; `ln` of a non-positive number stays symbolic
//! 2. **Binary constant folding**: `2 + 3` -> `5`; division by a number closer to zero than 1e-12 stays symbolic
//! 3. **Like-term collection** on chains of `+`: `a + a*4 + 2 + a` -> `a*6 + 2`
//! 4. **Like-factor collection** on chains of `*`: `2 * a * a * 3` -> `6 * a^2`
//! 5. **Identity elimination**: `x+0`, `0+x`, `x-0`, `x*0`, `0*x`, `x*1`, `1*x`, `x/1`, `x^0`, `x^1`
//!
//! A node rebuilt by rules 3 and 4 is simplified again. Grouping compares bases with
//! [`Expr::structurally_eq`], so it is order-sensitive: `x*y` and `y*x` are different
//! terms.
//!
//! The input is never modified; `simplify` returns a new tree.

use crate::symbolic::symbolic_engine::{BinaryOp, EPS, Expr, UnaryFunc};
use log::trace;

impl Expr {
    //___________________________________SIMPLIFICATION____________________________________

    /// Returns the simplified copy of the expression. Never fails; in the worst case
    /// the result is structurally equal to the input.
    ///
    /// # Examples
    /// ```
    /// use RustedExprTree::symbolic::symbolic_engine::Expr;
    /// let expr = Expr::parse_expression("aa+a+").unwrap();
    /// assert_eq!(expr.simplify().to_string(), "(a * 3)");
    /// ```
    pub fn simplify(&self) -> Expr {
        match self {
            Expr::Const(_) | Expr::Var(_) => self.clone(),
            Expr::Func(func, arg) => fold_unary(*func, arg.simplify()),
            Expr::Op(op, lhs, rhs) => rewrite_binary(*op, lhs.simplify(), rhs.simplify()),
        }
    }
}

fn fold_unary(func: UnaryFunc, arg: Expr) -> Expr {
    if let Some(value) = arg.as_const().and_then(|x| func.apply(x)) {
        return Expr::Const(value);
    }
    Expr::Func(func, Box::new(arg))
}

/// Rewrites `lhs op rhs` whose operands are already simplified.
fn rewrite_binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    if let (Some(a), Some(b)) = (lhs.as_const(), rhs.as_const()) {
        if let Some(value) = op.apply(a, b) {
            return Expr::Const(value);
        }
    }

    let node = Expr::Op(op, Box::new(lhs), Box::new(rhs));
    match op {
        BinaryOp::Add => {
            if let Some(collected) = collect_like_terms(&node) {
                trace!("like terms: {} -> {}", node, collected);
                return collected.simplify();
            }
        }
        BinaryOp::Mul => {
            if let Some(collected) = collect_like_factors(&node) {
                trace!("like factors: {} -> {}", node, collected);
                return collected.simplify();
            }
        }
        _ => {}
    }
    eliminate_identity(node)
}

/// `x+0`, `0+x`, `x-0`, `x*0`, `0*x`, `x*1`, `1*x`, `x/1`, `x^0`, `x^1`.
fn eliminate_identity(node: Expr) -> Expr {
    let Expr::Op(op, lhs, rhs) = node else {
        return node;
    };
    match op {
        BinaryOp::Add if rhs.is_zero() => *lhs,
        BinaryOp::Add if lhs.is_zero() => *rhs,
        BinaryOp::Sub if rhs.is_zero() => *lhs,
        BinaryOp::Mul if lhs.is_zero() || rhs.is_zero() => Expr::Const(0.0),
        BinaryOp::Mul if rhs.is_const(1.0) => *lhs,
        BinaryOp::Mul if lhs.is_const(1.0) => *rhs,
        BinaryOp::Div if rhs.is_const(1.0) => *lhs,
        BinaryOp::Pow if rhs.is_zero() => Expr::Const(1.0),
        BinaryOp::Pow if rhs.is_const(1.0) => *lhs,
        _ => Expr::Op(op, lhs, rhs),
    }
}

/// Flattens the maximal chain of nested `op` nodes into its operands, left to right.
fn flatten<'a>(expr: &'a Expr, op: BinaryOp, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Op(inner, lhs, rhs) if *inner == op => {
            flatten(lhs, op, out);
            flatten(rhs, op, out);
        }
        _ => out.push(expr),
    }
}

/// Splits a term into `(base, coefficient)`: a number has no base, `base*n` and
/// `n*base` carry coefficient `n`, anything else is its own base with coefficient 1.
fn split_coefficient(term: &Expr) -> (Option<&Expr>, f64) {
    match term {
        Expr::Const(c) => (None, *c),
        Expr::Op(BinaryOp::Mul, lhs, rhs) => match (lhs.as_const(), rhs.as_const()) {
            (None, Some(c)) => (Some(lhs.as_ref()), c),
            (Some(c), None) => (Some(rhs.as_ref()), c),
            _ => (Some(term), 1.0),
        },
        _ => (Some(term), 1.0),
    }
}

fn same_base(a: Option<&Expr>, b: Option<&Expr>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.structurally_eq(b),
        _ => false,
    }
}

/// Like-term collection on an addition chain. `None` if grouping does not reduce
/// the number of terms.
fn collect_like_terms(expr: &Expr) -> Option<Expr> {
    let mut terms = Vec::new();
    flatten(expr, BinaryOp::Add, &mut terms);
    if terms.len() < 2 {
        return None;
    }

    // groups keep the order of their first occurrence
    let mut groups: Vec<(Option<&Expr>, f64)> = Vec::new();
    for &term in &terms {
        let (base, coeff) = split_coefficient(term);
        match groups.iter_mut().find(|(b, _)| same_base(*b, base)) {
            Some((_, total)) => *total += coeff,
            None => groups.push((base, coeff)),
        }
    }
    if groups.len() >= terms.len() {
        return None;
    }

    let rebuilt = groups
        .into_iter()
        .filter(|(_, coeff)| coeff.abs() >= EPS)
        .map(|(base, coeff)| match base {
            None => Expr::Const(coeff),
            Some(base) if (coeff - 1.0).abs() < EPS => base.clone(),
            Some(base) => base.clone() * Expr::Const(coeff),
        })
        .reduce(|acc, term| acc + term);
    Some(rebuilt.unwrap_or(Expr::Const(0.0)))
}

/// Like-factor collection on a multiplication chain. `None` if neither numbers were
/// folded nor factors grouped.
fn collect_like_factors(expr: &Expr) -> Option<Expr> {
    let mut factors = Vec::new();
    flatten(expr, BinaryOp::Mul, &mut factors);
    if factors.len() < 2 {
        return None;
    }

    let mut product = 1.0;
    let mut numbers = 0;
    let mut symbolic: Vec<&Expr> = Vec::new();
    for &factor in &factors {
        match factor.as_const() {
            Some(c) => {
                product *= c;
                numbers += 1;
            }
            None => symbolic.push(factor),
        }
    }
    if numbers > 0 && product.abs() < EPS {
        return Some(Expr::Const(0.0));
    }

    let mut groups: Vec<(&Expr, usize)> = Vec::new();
    for &factor in &symbolic {
        match groups.iter_mut().find(|(f, _)| f.structurally_eq(factor)) {
            Some((_, count)) => *count += 1,
            None => groups.push((factor, 1)),
        }
    }

    let keeps_number = (product - 1.0).abs() >= EPS;
    let expected = symbolic.len() + usize::from(keeps_number);
    let folded_numbers = factors.len() > expected;
    let grouped_factors = groups.len() < symbolic.len();
    if !folded_numbers && !grouped_factors {
        return None;
    }

    let prefix = keeps_number.then_some(Expr::Const(product));
    let rebuilt = prefix
        .into_iter()
        .chain(groups.into_iter().map(|(factor, count)| {
            if count == 1 {
                factor.clone()
            } else {
                factor.clone().pow(Expr::Const(count as f64))
            }
        }))
        .reduce(|acc, factor| acc * factor);
    Some(rebuilt.unwrap_or(Expr::Const(product)))
}
