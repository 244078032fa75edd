//___________________________________TESTS____________________________________

#[cfg(test)]
mod tests {
    use crate::symbolic::expr_tree::ExprTree;
    use crate::symbolic::symbolic_engine::{BinaryOp, Branch, Expr, Symbol, UnaryFunc};
    use crate::symbolic::symbolic_errors::{DerivError, EvalError};
    use approx::assert_relative_eq;
    use std::collections::HashMap;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn var(c: char) -> Expr {
        Expr::var(c).unwrap()
    }

    fn x() -> Symbol {
        Symbol::new('x').unwrap()
    }

    fn parse(s: &str) -> Expr {
        Expr::parse_expression(s).unwrap()
    }

    /// central difference of `f` at `v` against the analytic derivative
    fn check_derivative(f: &Expr, points: &[f64]) {
        let df = f.diff(x()).simplify();
        let h = 1e-5;
        for &v in points {
            let at = |p: f64| f.eval_expression(&HashMap::from([('x', p)])).unwrap();
            let numerical = (at(v + h) - at(v - h)) / (2.0 * h);
            let analytical = df.eval_expression(&HashMap::from([('x', v)])).unwrap();
            assert_relative_eq!(analytical, numerical, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_symbol_accepts_lowercase_only() {
        assert_eq!(Symbol::new('q').map(|s| s.as_char()), Some('q'));
        assert!(Symbol::new('Q').is_none());
        assert!(Symbol::new('1').is_none());
        assert!(Symbol::new('+').is_none());
    }

    #[test]
    fn test_unary_func_names_and_codes() {
        let names: Vec<String> = UnaryFunc::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["sin", "cos", "tan", "ln"]);
        for func in UnaryFunc::iter() {
            assert_eq!(UnaryFunc::from_code(func.code()), Some(func));
            assert_eq!(UnaryFunc::from_str(&func.to_string()).ok(), Some(func));
        }
        assert_eq!(UnaryFunc::Ln.apply(0.0), None);
        assert_eq!(UnaryFunc::Ln.apply(-2.0), None);
    }

    #[test]
    fn test_binary_op_chars() {
        for op in BinaryOp::iter() {
            assert_eq!(BinaryOp::from_char(op.symbol()), Some(op));
            assert_eq!(op.to_string(), op.symbol().to_string());
        }
        let chars: String = BinaryOp::iter().map(|op| op.to_string()).collect();
        assert_eq!(chars, "+-*/^");
        assert_eq!(BinaryOp::from_char('%'), None);
        assert_eq!(BinaryOp::Div.apply(1.0, 1e-13), None);
    }

    #[test]
    fn test_operator_overloading() {
        let expr = -(var('x') + Expr::Const(2.0));
        let expected = Expr::Op(
            BinaryOp::Mul,
            Box::new(Expr::Const(-1.0)),
            Box::new(Expr::Op(
                BinaryOp::Add,
                Box::new(var('x')),
                Box::new(Expr::Const(2.0)),
            )),
        );
        assert_eq!(expr, expected);
    }

    //___________________________________SERIALIZATION____________________________________

    #[test]
    fn test_sum_of_digits() {
        let tree = ExprTree::build_from_postfix("23+").unwrap();
        assert_eq!(tree.evaluate(&HashMap::new()).unwrap(), 5.0);
        assert_eq!(tree.to_infix(), "(2 + 3)");
    }

    #[test]
    fn test_infix_and_unbound_variable() {
        let tree = ExprTree::build_from_postfix("ab+c*").unwrap();
        assert_eq!(tree.to_infix(), "((a + b) * c)");
        let bindings = HashMap::from([('b', 1.0), ('c', 1.0)]);
        assert_eq!(tree.evaluate(&bindings), Err(EvalError::UnboundVariable('a')));
    }

    #[test]
    fn test_postfix_numbers() {
        assert_eq!(Expr::Const(7.0).to_postfix(), "7");
        assert_eq!(Expr::Const(0.0).to_postfix(), "0");
        assert_eq!(Expr::Const(12.0).to_postfix(), "[12]");
        assert_eq!(Expr::Const(-1.0).to_postfix(), "[-1]");
        assert_eq!(Expr::Const(0.5).to_postfix(), "[0.5]");
        let expr = var('x') * Expr::Const(2.5);
        assert_eq!(expr.to_postfix(), "x[2.5]*");
        assert_eq!(expr.to_infix(), "(x * 2.5)");
    }

    #[test]
    fn test_postfix_functions() {
        let expr = (var('x') + var('y')).ln().cos();
        assert_eq!(expr.to_postfix(), "xy+lc");
        assert_eq!(expr.to_string(), "cos(ln((x + y)))");
        assert_eq!(var('t').tan().to_postfix(), "tt");
    }

    #[test]
    fn test_bracket_literals_reparse() {
        let expr = var('x') * Expr::Const(12.0) + Expr::Const(-0.25);
        let reparsed = parse(&expr.to_postfix());
        assert!(reparsed.structurally_eq(&expr));
    }

    //___________________________________STRUCTURE____________________________________

    #[test]
    fn test_structural_equality() {
        assert!(Expr::Const(1.0).structurally_eq(&Expr::Const(1.0 + 1e-13)));
        assert!(!Expr::Const(1.0).structurally_eq(&Expr::Const(1.001)));
        assert!(!parse("xy*").structurally_eq(&parse("yx*")));
        assert!(parse("xy*").structurally_eq(&parse("xy*")));
        assert!(!var('x').sin().structurally_eq(&var('x').cos()));
        assert!(!var('x').structurally_eq(&Expr::Const(1.0)));
    }

    #[test]
    fn test_statistics_and_variables() {
        let expr = parse("ab+c*a+");
        assert_eq!(expr.node_count(), 7);
        assert_eq!(expr.depth(), 4);
        let vars: Vec<char> = expr.collect_variables().into_iter().collect();
        assert_eq!(vars, vec!['a', 'b', 'c']);
        assert!(expr.contains_variable('c'));
        assert!(!expr.contains_variable('x'));
        assert!(Expr::Const(3.0).collect_variables().is_empty());
    }

    #[test]
    fn test_subtree_paths() {
        let expr = parse("ab+c*").sin();
        assert_eq!(expr.subtree(&[]), Some(&expr));
        assert_eq!(expr.subtree(&[Branch::Left, Branch::Right]), Some(&var('c')));
        assert_eq!(
            expr.subtree(&[Branch::Left, Branch::Left, Branch::Right]),
            Some(&var('b'))
        );
        // a function has no right operand, a leaf has no children
        assert_eq!(expr.subtree(&[Branch::Right]), None);
        assert_eq!(expr.subtree(&[Branch::Left, Branch::Right, Branch::Left]), None);
    }

    #[test]
    fn test_wrap_subtree() {
        let tree = ExprTree::build_from_postfix("ab+c*").unwrap();
        let wrapped = tree.wrap_subtree(&[Branch::Left], UnaryFunc::Sin).unwrap();
        assert_eq!(wrapped.to_infix(), "(sin((a + b)) * c)");
        assert_eq!(wrapped.postfix_raw(), "ab+sc*");
        let whole = tree.wrap_subtree(&[], UnaryFunc::Ln).unwrap();
        assert_eq!(whole.to_infix(), "ln(((a + b) * c))");
        assert!(tree.wrap_subtree(&[Branch::Right, Branch::Left], UnaryFunc::Cos).is_none());
        // source tree untouched
        assert_eq!(tree.to_infix(), "((a + b) * c)");
    }

    //___________________________________SUBSTITUTION____________________________________

    #[test]
    fn test_substitute_bound_variables() {
        let tree = ExprTree::build_from_postfix("xy*z+").unwrap();
        let bindings = HashMap::from([('x', 2.0), ('z', 1.0)]);
        let substituted = tree.substitute_bound_variables(&bindings);
        assert_eq!(substituted.to_infix(), "((2 * y) + 1)");
        assert_eq!(substituted.postfix_raw(), "2y*1+");
        let vars: Vec<char> = substituted.collect_variables().into_iter().collect();
        assert_eq!(vars, vec!['y']);
        assert_eq!(tree.to_infix(), "((x * y) + z)");
    }

    #[test]
    fn test_substitute_variable_with_expression() {
        let expr = parse("xx*");
        let replaced = expr.substitute_variable('x', &(var('a') + Expr::Const(1.0)));
        assert_eq!(replaced.to_string(), "((a + 1) * (a + 1))");
        let value = expr.set_variable('x', 3.0).eval_expression(&HashMap::new()).unwrap();
        assert_eq!(value, 9.0);
    }

    //___________________________________EVALUATION____________________________________

    #[test]
    fn test_evaluate() {
        let expr = parse("xy^2/");
        let value = expr
            .eval_expression(&HashMap::from([('x', 3.0), ('y', 2.0)]))
            .unwrap();
        assert_relative_eq!(value, 4.5);
        let expr = var('x').sin().pow(Expr::Const(2.0)) + var('x').cos().pow(Expr::Const(2.0));
        let value = expr.eval_expression(&HashMap::from([('x', 0.7)])).unwrap();
        assert_relative_eq!(value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ln_of_negative_number() {
        let tree = ExprTree::from_expr(Expr::Const(-1.0).ln());
        let simplified = tree.simplify();
        assert_eq!(simplified.root(), Some(&Expr::Const(-1.0).ln()));
        assert_eq!(
            simplified.evaluate(&HashMap::new()),
            Err(EvalError::DomainError(UnaryFunc::Ln, -1.0))
        );
    }

    #[test]
    fn test_division_by_bound_zero() {
        let tree = ExprTree::build_from_postfix("1a/").unwrap();
        let bindings = HashMap::from([('a', 0.0)]);
        assert_eq!(tree.evaluate(&bindings), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_first_error_wins() {
        // left operand is evaluated first
        let expr = parse("ab/");
        let err = expr.eval_expression(&HashMap::from([('b', 0.0)]));
        assert_eq!(err, Err(EvalError::UnboundVariable('a')));
    }

    #[test]
    fn test_lambdify1D() {
        let f = parse("x2^");
        let fn_closure = f.lambdify1D('x');
        assert_eq!(fn_closure(2.0), Ok(4.0));
        let g = parse("xy+");
        assert_eq!(g.lambdify1D('x')(1.0), Err(EvalError::UnboundVariable('y')));
    }

    //___________________________________DERIVATIVES____________________________________

    #[test]
    fn test_diff_of_square_merges_coefficient() {
        let tree = ExprTree::build_from_postfix("xx*").unwrap();
        let d = tree.derivative('x').unwrap().simplify();
        let root = d.root().unwrap();
        assert!(root.structurally_eq(&(var('x') * Expr::Const(2.0))));
        assert_eq!(d.to_infix(), "(x * 2)");
    }

    #[test]
    fn test_diff_raw_rules() {
        assert_eq!(Expr::Const(4.0).diff(x()), Expr::Const(0.0));
        assert_eq!(var('x').diff(x()), Expr::Const(1.0));
        assert_eq!(var('y').diff(x()), Expr::Const(0.0));
        assert_eq!(var('x').sin().diff(x()), var('x').cos() * Expr::Const(1.0));
        assert_eq!(var('x').ln().diff(x()), Expr::Const(1.0) / var('x'));
        // constant exponent special cases
        assert_eq!(parse("x0^").diff(x()), Expr::Const(0.0));
        assert_eq!(parse("x1^").diff(x()), Expr::Const(1.0));
    }

    #[test]
    fn test_diff_does_not_touch_input() {
        let expr = parse("xy*x/");
        let before = expr.clone();
        let _ = expr.diff(x());
        assert_eq!(expr, before);
    }

    #[test]
    fn test_partial_derivative_treats_others_as_constants() {
        let expr = parse("xy*y+");
        let d = expr.diff(x()).simplify();
        assert!(d.structurally_eq(&var('y')));
    }

    #[test]
    fn test_derivatives_match_finite_differences() {
        let points = [0.4, 0.7, 1.0, 1.3, 1.9];
        check_derivative(&parse("xx*x*"), &points);
        check_derivative(&parse("x3^2x*-"), &points);
        check_derivative(&(var('x').sin() * var('x')), &points);
        check_derivative(&(var('x').cos().pow(Expr::Const(3.0))), &points);
        check_derivative(&(parse("xx*1+").ln()), &points);
        check_derivative(&parse("xx^"), &points);
        check_derivative(&(parse("1x/") - var('x').sin()), &points);
        check_derivative(&(var('x').tan() / var('x')), &[0.3, 0.6, 0.9, 1.2]);
        check_derivative(&(parse("2x^")), &points);
    }

    #[test]
    fn test_compare_num1D() {
        let f = (var('x') * var('x') + Expr::Const(1.0)).ln();
        let (norm, res) = f.compare_num1D(x(), 0.0, 2.0, 50, 1e-5).unwrap();
        assert!(res, "norm = {}", norm);
        let g = var('x').ln();
        assert!(matches!(
            g.compare_num1D(x(), -1.0, 1.0, 10, 1e-5),
            Err(EvalError::DomainError(UnaryFunc::Ln, _))
        ));
    }

    #[test]
    fn test_nth_derivative() {
        let f = parse("x3^");
        let d2 = f.nth_derivative(x(), 2);
        assert!(d2.structurally_eq(&(Expr::Const(6.0) * var('x'))));
        let d0 = f.nth_derivative(x(), 0);
        assert!(d0.structurally_eq(&f));
        let d4 = f.nth_derivative(x(), 4);
        assert!(d4.structurally_eq(&Expr::Const(0.0)));
    }

    #[test]
    fn test_derivative_errors() {
        let tree = ExprTree::default();
        assert!(matches!(tree.derivative('x'), Err(DerivError::EmptyExpression)));
    }

    //___________________________________SIMPLIFY____________________________________

    #[test]
    fn test_simplify_a_plus_a_plus_a() {
        let tree = ExprTree::build_from_postfix("aa+a+").unwrap();
        let simplified = tree.simplify();
        assert!(
            simplified
                .root()
                .unwrap()
                .structurally_eq(&(var('a') * Expr::Const(3.0)))
        );
        assert_eq!(simplified.postfix_raw(), "a3*");
    }

    #[test]
    fn test_constant_subexpressions_fold() {
        let tree = ExprTree::build_from_postfix("x23*+45+*").unwrap();
        assert_eq!(tree.simplify().to_infix(), "((x + 6) * 9)");
        let tree = ExprTree::from_expr(var('x') * Expr::Const(0.0).cos());
        assert_eq!(tree.simplify().to_infix(), "x");
    }

    //___________________________________COMPOSE____________________________________

    #[test]
    fn test_compose() {
        let a = ExprTree::build_from_postfix("ab+").unwrap();
        let b = ExprTree::build_from_postfix("c2^").unwrap();
        let composed = ExprTree::compose(&a, &b, '/').unwrap();
        assert_eq!(composed.to_infix(), "((a + b) / (c ^ 2))");
        assert_eq!(composed.postfix_raw(), "ab+c2^/");
        assert_eq!(composed.to_postfix(), "ab+c2^/");
        let bindings = HashMap::from([('a', 1.0), ('b', 3.0), ('c', 2.0)]);
        assert_relative_eq!(composed.evaluate(&bindings).unwrap(), 1.0);
        // operands are untouched and independent
        assert_eq!(a.to_infix(), "(a + b)");
        assert_eq!(b.to_infix(), "(c ^ 2)");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut tree = ExprTree::build_from_postfix("ab*").unwrap();
        let copy = tree.clone();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(copy.to_infix(), "(a * b)");
    }
}
