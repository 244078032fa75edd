// Copyright (c)  by Gleb E. Zaslavkiy
//MIT License
#![allow(non_snake_case)]

use crate::Utils::task::EngineTask;
use crate::symbolic::expr_tree::ExprTree;
use crate::symbolic::symbolic_engine::{Branch, Expr, Symbol, UnaryFunc};
use std::collections::HashMap;
use std::error::Error;

/// number of examples `sym_examples` knows
pub const NUMBER_OF_EXAMPLES: usize = 6;

#[allow(dead_code)]
pub fn sym_examples(example: usize) {
    let res = match example {
        0 => parse_and_print(),
        1 => evaluate_and_differentiate(),
        2 => simplify_examples(),
        3 => compose_and_wrap(),
        4 => derivative_check_1D(),
        5 => task_from_text(),
        _ => {
            println!("no such example: {}", example);
            Ok(())
        }
    };
    if let Err(e) = res {
        println!("example {} failed: {}", example, e);
    }
}

fn parse_and_print() -> Result<(), Box<dyn Error>> {
    // postfix in, infix and postfix out
    let input = "ab+c*";
    let tree = ExprTree::build_from_postfix(input)?;
    println!("{} -> infix {}, postfix {}", input, tree.to_infix(), tree.to_postfix());
    println!("variables {:?}", tree.collect_variables());
    // numbers outside 0..9 are written as bracket literals
    let expr = Expr::parse_expression("x[2.5]*[12]+")?;
    println!("{} -> postfix {}", expr, expr.to_postfix());
    // errors are values
    for bad in ["ab%", "+", "ab", "[1.2"] {
        if let Err(e) = ExprTree::build_from_postfix(bad) {
            println!("'{}': {}", bad, e);
        }
    }
    Ok(())
}

fn evaluate_and_differentiate() -> Result<(), Box<dyn Error>> {
    let tree = ExprTree::build_from_postfix("xx*y*x+")?;
    let bindings = HashMap::from([('x', 2.0), ('y', 3.0)]);
    println!("{} at {:?} = {}", tree, bindings, tree.evaluate(&bindings)?);
    // partial derivatives, raw and simplified
    for var in ['x', 'y'] {
        let d = tree.derivative(var)?;
        println!("d/d{} = {}", var, d);
        println!("      = {}", d.simplify());
    }
    // function of one variable
    let f = Expr::parse_expression("x3^")?;
    let f_of_x = f.lambdify1D('x');
    println!("f(2) = {}", f_of_x(2.0)?);
    let x = Symbol::new('x').ok_or("'x' is not a variable name")?;
    for n in 0..=4 {
        println!("d^{}f/dx^{} = {}", n, n, f.nth_derivative(x, n));
    }
    // evaluation errors
    let ln = Expr::Const(-1.0).ln();
    println!("{} -> {:?}", ln, ln.eval_expression(&HashMap::new()));
    let div = Expr::parse_expression("1a/")?;
    println!("{} -> {:?}", div, div.eval_expression(&HashMap::from([('a', 0.0)])));
    Ok(())
}

fn simplify_examples() -> Result<(), Box<dyn Error>> {
    for input in ["aa+a+", "a4*5a*+", "ab*a*", "2x*3*", "x0+1*", "23^x*", "xy*yx*+"] {
        let tree = ExprTree::build_from_postfix(input)?;
        println!("{:>10}  {} => {}", input, tree, tree.simplify());
    }
    Ok(())
}

fn compose_and_wrap() -> Result<(), Box<dyn Error>> {
    let a = ExprTree::build_from_postfix("ab+")?;
    let b = ExprTree::build_from_postfix("c2^")?;
    for op in ['+', '-', '*', '/', '^'] {
        let composed = ExprTree::compose(&a, &b, op)?;
        println!("{} (raw postfix {})", composed, composed.postfix_raw());
    }
    if let Err(e) = ExprTree::compose(&a, &ExprTree::default(), '+') {
        println!("compose with an empty tree: {}", e);
    }
    // wrap the left operand of the product in sin
    let tree = ExprTree::build_from_postfix("ab+c*")?;
    if let Some(wrapped) = tree.wrap_subtree(&[Branch::Left], UnaryFunc::Sin) {
        println!("{} -> {}", tree, wrapped);
    }
    let bindings = HashMap::from([('a', 1.0), ('c', 2.0)]);
    println!("partially bound: {}", tree.substitute_bound_variables(&bindings));
    Ok(())
}

fn derivative_check_1D() -> Result<(), Box<dyn Error>> {
    let x = Symbol::new('x').ok_or("'x' is not a variable name")?;
    let functions = vec![
        Expr::parse_expression("xx*1+")?.ln(),
        Expr::parse_expression("xx^")?,
        Expr::parse_expression("x")?.sin() * Expr::parse_expression("x")?.cos(),
        Expr::parse_expression("x")?.tan() / Expr::parse_expression("x")?,
    ];
    let start = 0.2;
    let end = 1.2;
    let num_values = 100;
    let max_norm = 1e-6;
    for f in functions {
        // a norm of the difference between analytical and numerical derivative and
        // whether it is below max_norm
        let (norm, res) = f.compare_num1D(x, start, end, num_values, max_norm)?;
        println!("{}: norm = {:e}, res = {}", f, norm, res);
    }
    Ok(())
}

fn task_from_text() -> Result<(), Box<dyn Error>> {
    let document = r#"
    // derivative of ln(x*x + y) at x = 1.5, y = 4
    expression
      postfix: xx*
      compose_with: y
      operator: +
    bindings
      x: 1.5
      y: 4
    operations
      wrap: ln
      derivative: x
      simplify: true
      evaluate: true
    sampling
      variable: x
      start: 0
      end: 2
      points: 5
    "#;
    let task = EngineTask::from_document(document)?;
    let report = task.run()?;
    println!("{}", report);
    println!("{}", report.samples_table('x'));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_examples_run() {
        for example in 0..NUMBER_OF_EXAMPLES {
            sym_examples(example);
        }
        assert!(parse_and_print().is_ok());
        assert!(evaluate_and_differentiate().is_ok());
        assert!(simplify_examples().is_ok());
        assert!(compose_and_wrap().is_ok());
        assert!(derivative_check_1D().is_ok());
        assert!(task_from_text().is_ok());
    }
}
