use pathcheck_core::ir::{Operator, TreeNode};
use regex::Regex;
use std::sync::LazyLock;

static LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("valid regex"));
// `@2:max` is the delimited form; `@2max` is still accepted since names cannot start with a digit.
static CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@(?<count>[0-9]+):?(?<callee>[A-Za-z_][A-Za-z0-9_]*)$").expect("valid regex")
});
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

#[derive(Debug, PartialEq)]
pub(crate) enum Token<'t> {
    Literal(TreeNode),
    Operator(Operator),
    Call { count: usize, callee: &'t str },
    Identifier(&'t str),
    Unrecognized,
}

pub(crate) fn classify(token: &str) -> Token<'_> {
    if let Some(op) = Operator::from_symbol(token) {
        return Token::Operator(op);
    }
    if LITERAL.is_match(token) {
        return TreeNode::literal(token).map_or(Token::Unrecognized, Token::Literal);
    }
    if let Some(captures) = CALL.captures(token) {
        let callee = captures.name("callee").map_or("", |m| m.as_str());
        return match captures["count"].parse() {
            Ok(count) => Token::Call { count, callee },
            Err(_) => Token::Unrecognized,
        };
    }
    if IDENTIFIER.is_match(token) {
        return Token::Identifier(token);
    }
    Token::Unrecognized
}
