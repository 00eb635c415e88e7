/*
 *  The phrase signatures a skeleton is matched against, in priority
 *  order. In a skeleton every nested brace group has been replaced by
 *  `{}`, and whitespace runs are collapsed to a single space.
 *
 *  A slot is either `{}` (the next child, in textual order), a numeric
 *  literal, or an identifier. Member and callee names are always plain
 *  identifiers.
 */

use pathcheck_core::ir::{Operator, TreeNode};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const SLOT: &str = r"(?:\{\}|-?[0-9]+(?:\.[0-9]+)?|[A-Za-z_][A-Za-z0-9_]*)";
const NAME: &str = r"(?<name>[A-Za-z_][A-Za-z0-9_]*)";

enum Shape {
    ArrayIndex,
    ArrayChain,
    Dereference,
    Member(Operator),
    Arithmetic(Operator),
    FunctionCall,
    MethodCall(Operator),
}

struct Template {
    shape: Shape,
    regex: Regex,
}

fn slot(name: &str) -> String {
    format!("(?<{name}>{SLOT})")
}

fn arguments() -> String {
    format!("(?: with arguments (?<args>{SLOT}(?:, ?{SLOT})*))?")
}

static CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("{}-th element of ", slot("index"))).expect("valid template")
});

static TEMPLATES: LazyLock<Vec<Template>> = LazyLock::new(|| {
    let object = slot("object");
    [
        (Shape::ArrayIndex, format!("{}-th element of array {}", slot("index"), slot("array"))),
        (Shape::ArrayChain, format!("(?<clauses>(?:{SLOT}-th element of )+)array {}", slot("array"))),
        (Shape::Dereference, format!("value pointed to by {}", slot("operand"))),
        (Shape::Member(Operator::Dot), format!("field {NAME} of {object}")),
        (Shape::Member(Operator::Arrow), format!("field {NAME} of object pointed to by {object}")),
        (Shape::Arithmetic(Operator::Add), arithmetic("sum")),
        (Shape::Arithmetic(Operator::Subtract), arithmetic("difference")),
        (Shape::Arithmetic(Operator::Multiply), arithmetic("product")),
        (Shape::Arithmetic(Operator::Divide), arithmetic("quotient")),
        (Shape::FunctionCall, format!("call of function {NAME}{}", arguments())),
        (Shape::MethodCall(Operator::Dot), format!("call of method {NAME} of {object}{}", arguments())),
        (
            Shape::MethodCall(Operator::Arrow),
            format!("call of method {NAME} of object pointed to by {object}{}", arguments()),
        ),
    ]
    .into_iter()
    .map(|(shape, pattern)| Template {
        shape,
        regex: Regex::new(&format!("^{pattern}$")).expect("valid template"),
    })
    .collect()
});

fn arithmetic(word: &str) -> String {
    format!("{word} of {} and {}", slot("lhs"), slot("rhs"))
}

/// Builds the tree for the first signature `skeleton` matches. `children` are the trees of the
/// skeleton's `{}` placeholders, in order.
pub(crate) fn match_skeleton(skeleton: &str, children: Vec<TreeNode>) -> Option<TreeNode> {
    let (template, captures) = TEMPLATES.iter().find_map(|template| {
        template
            .regex
            .captures(skeleton)
            .map(|captures| (template, captures))
    })?;
    build(&template.shape, &captures, children)
}

fn build(shape: &Shape, captures: &Captures, children: Vec<TreeNode>) -> Option<TreeNode> {
    let mut children = children.into_iter();
    let mut next = |text: &str| resolve(text, &mut children);
    let name = || captures.name("name").map_or("", |m| m.as_str());
    Some(match shape {
        Shape::ArrayIndex => {
            let index = next(&captures["index"])?;
            let array = next(&captures["array"])?;
            TreeNode::binary(Operator::ArrayIndex, array, index)
        }
        Shape::ArrayChain => {
            let indices = CLAUSE
                .captures_iter(&captures["clauses"])
                .map(|clause| next(&clause["index"]))
                .collect::<Option<Vec<_>>>()?;
            let array = next(&captures["array"])?;
            // The last clause is the innermost access.
            indices.into_iter().rev().fold(array, |base, index| {
                TreeNode::binary(Operator::ArrayIndex, base, index)
            })
        }
        Shape::Dereference => TreeNode::op(Operator::Dereference, vec![next(&captures["operand"])?]),
        Shape::Member(op) => {
            let object = next(&captures["object"])?;
            TreeNode::binary(op.clone(), object, TreeNode::variable(name()))
        }
        Shape::Arithmetic(op) => {
            let lhs = next(&captures["lhs"])?;
            let rhs = next(&captures["rhs"])?;
            TreeNode::binary(op.clone(), lhs, rhs)
        }
        Shape::FunctionCall => {
            let args = arguments_of(captures, &mut next)?;
            TreeNode::call(name(), args)
        }
        Shape::MethodCall(op) => {
            let object = next(&captures["object"])?;
            let args = arguments_of(captures, &mut next)?;
            TreeNode::binary(op.clone(), object, TreeNode::call(name(), args))
        }
    })
}

fn arguments_of(
    captures: &Captures,
    next: &mut impl FnMut(&str) -> Option<TreeNode>,
) -> Option<Vec<TreeNode>> {
    match captures.name("args") {
        None => Some(Vec::new()),
        Some(args) => args.as_str().split(',').map(|arg| next(arg.trim())).collect(),
    }
}

/// Turns a slot into a tree: the next child for `{}`, a constant for a literal, a variable
/// otherwise. `None` if a child is missing or a literal does not fit.
pub(crate) fn resolve(
    text: &str,
    children: &mut impl Iterator<Item = TreeNode>,
) -> Option<TreeNode> {
    match text {
        "{}" => children.next(),
        text if text.starts_with(|c: char| c == '-' || c.is_ascii_digit()) => {
            TreeNode::literal(text)
        }
        text => Some(TreeNode::variable(text)),
    }
}
