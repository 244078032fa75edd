use crate::symbolic::symbolic_engine::{BinaryOp, Expr, Symbol};
use crate::symbolic::symbolic_errors::ParseError;
use log::trace;

/// deepest tree `parse_postfix` builds; derivatives and simplification recurse on it
pub const MAX_NESTING_DEPTH: usize = 256;

/// a module turns a postfix (Reverse-Polish) string into a symbolic expression
///# Example
/// ```
/// use RustedExprTree::symbolic::parse_expr::parse_postfix;
/// let parsed_expression = parse_postfix("ab+c*").unwrap();
/// assert_eq!(parsed_expression.to_string(), "((a + b) * c)");
/// ```
//        token stream  "ab+c*"           operand stack
//        ____________________________________________
//        'a'  push Var                   [a]
//        'b'  push Var                   [a, b]
//        '+'  pop b (right), a (left)    [(a + b)]
//        'c'  push Var                   [(a + b), c]
//        '*'  pop c, (a + b)             [((a + b) * c)]
//        end  exactly one entry left  -> Ok
pub fn parse_postfix(input: &str) -> Result<Expr, ParseError> {
    // each entry carries the depth of its tree
    let mut stack: Vec<(Expr, usize)> = Vec::new();
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c.is_ascii_whitespace() {
            continue;
        }
        if let Some(digit) = c.to_digit(10) {
            stack.push((Expr::Const(digit as f64), 1));
        } else if let Some(name) = Symbol::new(c) {
            stack.push((Expr::Var(name), 1));
        } else if let Some(op) = BinaryOp::from_char(c) {
            // right operand is on top of the stack
            let (Some((rhs, rhs_depth)), Some((lhs, lhs_depth))) = (stack.pop(), stack.pop())
            else {
                return Err(ParseError::InsufficientOperands);
            };
            let depth = lhs_depth.max(rhs_depth) + 1;
            if depth > MAX_NESTING_DEPTH {
                return Err(ParseError::NestingTooDeep(MAX_NESTING_DEPTH));
            }
            stack.push((Expr::Op(op, Box::new(lhs), Box::new(rhs)), depth));
        } else if c == '[' {
            stack.push((Expr::Const(parse_bracket_literal(&mut chars)?), 1));
        } else {
            return Err(ParseError::InvalidToken(c));
        }
        trace!("token '{}' -> stack depth {}", c, stack.len());
    }

    if stack.len() != 1 {
        return Err(ParseError::MalformedExpression);
    }
    stack
        .pop()
        .map(|(expr, _)| expr)
        .ok_or(ParseError::MalformedExpression)
}

/// Reads the body of a `[...]` literal; the opening bracket is already consumed.
fn parse_bracket_literal(chars: &mut std::str::Chars) -> Result<f64, ParseError> {
    let mut body = String::new();
    for c in chars.by_ref() {
        if c == ']' {
            return body
                .trim()
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidLiteral(format!("{}]", body)));
        }
        body.push(c);
    }
    Err(ParseError::InvalidLiteral(body))
}

impl Expr {
    /// Parses postfix text into an expression, see [`parse_postfix`].
    pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
        parse_postfix(input)
    }
}
